// ==========================================
// 快递运费计算系统 - 命令行入口
// ==========================================
// 用法:
//   freight-calc rule list|show|import|delete
//   freight-calc quote --rule <id> --dest <目的地> --weight <kg> [--waybill <单号>]
//   freight-calc batch --rule <id> <订单文件>... [-o <输出.csv|.json>]
//   freight-calc config get [key] | set <key> <value> | unset <key>
//   freight-calc regions
// ==========================================

use std::io::Write;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

use freight_calc::api::FileQuote;
use freight_calc::app::{get_default_db_path, AppState};
use freight_calc::domain::{Order, Region};
use freight_calc::importer::field_mapper::parse_weight;
use freight_calc::importer::RegionNormalizer;

#[derive(Parser)]
#[command(name = "freight-calc", version, about = "快递运费计算")]
struct Cli {
    /// 数据库文件路径（默认读取 FREIGHT_DB_PATH 或用户数据目录）
    #[arg(long, global = true)]
    db: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 计费规则管理
    Rule {
        #[command(subcommand)]
        action: RuleAction,
    },
    /// 单票报价
    Quote {
        /// 规则ID（缺省使用配置的默认规则）
        #[arg(long)]
        rule: Option<String>,
        /// 目的地（区域代码、省份名称或地址）
        #[arg(long)]
        dest: String,
        /// 实际重量 (kg)
        #[arg(long)]
        weight: String,
        /// 运单号（缺省按配置的占位前缀生成）
        #[arg(long)]
        waybill: Option<String>,
    },
    /// 订单文件批量计算
    Batch {
        /// 规则ID（缺省使用配置的默认规则）
        #[arg(long)]
        rule: Option<String>,
        /// 订单文件（CSV/Excel），可多个
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// 输出文件（.csv/.json，仅单个输入时可用；缺省输出 CSV 到 stdout）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// 系统配置
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// 列出支持的区域
    Regions,
}

#[derive(Subcommand)]
enum RuleAction {
    /// 列出全部规则
    List,
    /// 查看规则详情（JSON）
    Show { id: String },
    /// 从 JSON 文件导入规则（单个或数组）
    Import { file: PathBuf },
    /// 删除规则
    Delete { id: String },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// 查看配置（缺省列出全部）
    Get { key: Option<String> },
    /// 设置配置
    Set { key: String, value: String },
    /// 删除配置
    Unset { key: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    freight_calc::logging::init_with_default("warn");
    let cli = Cli::parse();

    let db_path = cli.db.unwrap_or_else(get_default_db_path);
    let state = AppState::new(db_path).context("初始化失败")?;
    tracing::info!("使用数据库: {}", state.get_db_path());

    match cli.command {
        Commands::Rule { action } => run_rule(&state, action),
        Commands::Quote {
            rule,
            dest,
            weight,
            waybill,
        } => run_quote(&state, rule.as_deref(), &dest, &weight, waybill.as_deref()),
        Commands::Batch {
            rule,
            files,
            output,
        } => run_batch(&state, rule.as_deref(), files, output).await,
        Commands::Config { action } => run_config(&state, action),
        Commands::Regions => {
            for region in Region::ALL {
                println!("{}\t{}\t{}", region.code(), region.full_name(), region.pinyin());
            }
            Ok(())
        }
    }
}

fn run_rule(state: &AppState, action: RuleAction) -> Result<()> {
    match action {
        RuleAction::List => {
            for rule in state.rule_api.list_rules()? {
                println!(
                    "{}\t{}\t{}\t{}",
                    rule.id,
                    rule.mode(),
                    rule.name,
                    rule.updated_at.format("%Y-%m-%d %H:%M:%S")
                );
            }
        }
        RuleAction::Show { id } => {
            let rule = state.rule_api.get_rule(&id)?;
            println!("{}", serde_json::to_string_pretty(&rule)?);
        }
        RuleAction::Import { file } => {
            let json = std::fs::read_to_string(&file)
                .with_context(|| format!("无法读取规则文件 {}", file.display()))?;
            for rule in state.rule_api.import_drafts_json(&json)? {
                println!("{}\t{}", rule.id, rule.name);
            }
        }
        RuleAction::Delete { id } => {
            state.rule_api.delete_rule(&id)?;
            println!("已删除 {}", id);
        }
    }
    Ok(())
}

fn run_quote(
    state: &AppState,
    rule: Option<&str>,
    dest: &str,
    weight: &str,
    waybill: Option<&str>,
) -> Result<()> {
    let rule_id = state.resolve_rule_id(rule)?;
    let waybill = state.quote_waybill_id(waybill)?;
    let weight: Decimal = match parse_weight(weight) {
        Some(w) => w,
        None => bail!("无法解析重量: {}", weight),
    };

    // 省份名称/地址先归一化为区域代码，无法识别时原样交给引擎报错
    let destination = RegionNormalizer
        .normalize(dest)
        .map(|r| r.code().to_string())
        .unwrap_or_else(|| dest.to_string());

    let result = state
        .freight_api
        .quote(&rule_id, &Order::new(waybill, destination, weight))?;
    println!("{}", serde_json::to_string_pretty(&result)?);

    if let Some(err) = &result.error {
        bail!("计算失败: {}", err);
    }
    Ok(())
}

async fn run_batch(
    state: &AppState,
    rule: Option<&str>,
    files: Vec<PathBuf>,
    output: Option<PathBuf>,
) -> Result<()> {
    let rule_id = state.resolve_rule_id(rule)?;

    if let Some(output) = output {
        if files.len() != 1 {
            bail!("指定输出文件时只能有一个输入文件");
        }
        let quote = state.freight_api.quote_file_to(&rule_id, &files[0], &output)?;
        print_summary(&quote);
        return Ok(());
    }

    let quotes = state.freight_api.quote_files(&rule_id, files.clone()).await?;
    let mut failed_files = 0;
    let stdout = std::io::stdout();

    for (path, quote) in files.iter().zip(quotes) {
        match quote {
            Ok(quote) => {
                print_summary(&quote);
                state.freight_api.exporter().write_csv(&quote.batch, stdout.lock())?;
            }
            Err(e) => {
                failed_files += 1;
                eprintln!("{}: {}", path.display(), e);
            }
        }
    }
    stdout.lock().flush()?;

    if failed_files > 0 {
        bail!("{} 个文件处理失败", failed_files);
    }
    Ok(())
}

fn print_summary(quote: &FileQuote) {
    let batch = &quote.batch;
    eprintln!(
        "[{}] 规则: {} | 订单: {} | 成功: {} | 失败: {} | 跳过行: {} | 总运费: {}",
        quote.import.source,
        batch.rule_name,
        batch.total_orders,
        batch.success_count,
        batch.error_count,
        quote.import.skipped_count(),
        batch.total_price
    );
    for issue in &quote.import.issues {
        eprintln!("  第 {} 行: {}", issue.row_number, issue.message);
    }
    for failed in batch.failures() {
        if let Some(err) = &failed.error {
            eprintln!("  运单 {}: {}", failed.waybill_id, err);
        }
    }
}

fn run_config(state: &AppState, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Get { key: Some(key) } => match state.config.get_global_config_value(&key)? {
            Some(value) => println!("{}", value),
            None => bail!("配置项 {} 未设置", key),
        },
        ConfigAction::Get { key: None } => {
            for (key, value) in state.config.list_global_configs()? {
                println!("{} = {}", key, value);
            }
        }
        ConfigAction::Set { key, value } => {
            state.config.set_global_config_value(&key, &value)?;
        }
        ConfigAction::Unset { key } => {
            if !state.config.remove_global_config_value(&key)? {
                bail!("配置项 {} 未设置", key);
            }
        }
    }
    Ok(())
}
