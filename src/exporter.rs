// ==========================================
// 快递运费计算系统 - 计算结果导出
// ==========================================
// 支持: CSV（金额按配置小数位四舍五入）/ JSON（完整 BatchResult）
// ==========================================

use crate::config::config_manager::DEFAULT_MONEY_SCALE;
use crate::domain::order::{BatchResult, CalculationResult};
use rust_decimal::{Decimal, RoundingStrategy};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// CSV 表头
pub const CSV_HEADERS: [&str; 9] = [
    "运单号",
    "目的地",
    "实际重量",
    "计费重量",
    "首重/固定费用",
    "续重费用",
    "附加费",
    "总运费",
    "错误信息",
];

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("导出格式不支持: {0}（仅支持 .csv/.json）")]
    UnsupportedFormat(String),

    #[error("文件写入失败: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV 写入失败: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON 序列化失败: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ExportResult<T> = Result<T, ExportError>;

pub struct ResultExporter {
    money_scale: u32,
}

impl Default for ResultExporter {
    fn default() -> Self {
        Self::new(DEFAULT_MONEY_SCALE)
    }
}

impl ResultExporter {
    pub fn new(money_scale: u32) -> Self {
        Self { money_scale }
    }

    fn money(&self, value: Decimal) -> String {
        let mut rounded =
            value.round_dp_with_strategy(self.money_scale, RoundingStrategy::MidpointAwayFromZero);
        // 补齐小数位: 12 → 12.00
        rounded.rescale(self.money_scale);
        rounded.to_string()
    }

    fn csv_record(&self, r: &CalculationResult) -> [String; 9] {
        [
            r.waybill_id.clone(),
            r.destination.clone(),
            r.original_weight.normalize().to_string(),
            r.billing_weight.normalize().to_string(),
            self.money(r.breakdown.base_fee),
            self.money(r.breakdown.continued_fee),
            self.money(r.breakdown.area_charge),
            self.money(r.total_price),
            r.error.as_ref().map(|e| e.to_string()).unwrap_or_default(),
        ]
    }

    /// 写出 CSV（逐票一行，顺序与批量结果一致）
    pub fn write_csv<W: Write>(&self, batch: &BatchResult, writer: W) -> ExportResult<()> {
        let mut w = csv::Writer::from_writer(writer);
        w.write_record(CSV_HEADERS)?;
        for result in &batch.results {
            w.write_record(self.csv_record(result))?;
        }
        w.flush()?;
        Ok(())
    }

    /// 写出 JSON（完整 BatchResult）
    pub fn write_json<W: Write>(&self, batch: &BatchResult, writer: W) -> ExportResult<()> {
        serde_json::to_writer_pretty(writer, batch)?;
        Ok(())
    }

    /// 按扩展名导出到文件
    pub fn export_to_path<P: AsRef<Path>>(&self, batch: &BatchResult, path: P) -> ExportResult<()> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "csv" => {
                let mut file = File::create(path)?;
                // Excel 打开 UTF-8 CSV 需要 BOM
                file.write_all("\u{feff}".as_bytes())?;
                self.write_csv(batch, BufWriter::new(file))?;
            }
            "json" => self.write_json(batch, BufWriter::new(File::create(path)?))?,
            other => return Err(ExportError::UnsupportedFormat(other.to_string())),
        }

        info!(
            path = %path.display(),
            rows = batch.results.len(),
            "计算结果已导出"
        );
        Ok(())
    }
}
