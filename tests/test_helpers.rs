// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的规则构造、临时数据库与订单文件
// ==========================================
#![allow(dead_code)]

use chrono::{TimeZone, Utc};
use freight_calc::app::AppState;
use freight_calc::domain::{
    FlatPlusRatePricing, PricingRule, Region, RegionPriceTable, RuleBody, RuleDraft,
    ThresholdTieredPricing, WeightTier,
};
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::str::FromStr;
use tempfile::{NamedTempFile, TempDir};

/// 十进制字面量
pub fn d(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

/// 构造区域价格表
pub fn prices(entries: &[(Region, &str)]) -> RegionPriceTable {
    entries.iter().map(|(r, p)| (*r, d(p))).collect()
}

/// 模式 A 计价参数（非阶梯，价格表为空）
pub fn threshold_pricing(threshold: &str) -> ThresholdTieredPricing {
    ThresholdTieredPricing {
        first_weight_threshold: d(threshold),
        use_step_pricing: false,
        first_weight_prices: RegionPriceTable::new(),
        weight_tiers: Vec::new(),
        overweight_first_prices: RegionPriceTable::new(),
        continued_weight_prices: RegionPriceTable::new(),
    }
}

/// 重量阶梯
pub fn tier(ceiling: &str, entries: &[(Region, &str)]) -> WeightTier {
    WeightTier {
        ceiling: d(ceiling),
        prices: prices(entries),
    }
}

/// 模式 B 计价参数
pub fn flat_pricing(fixed: &[(Region, &str)], rates: &[(Region, &str)]) -> FlatPlusRatePricing {
    FlatPlusRatePricing {
        fixed_prices: prices(fixed),
        weight_rates: prices(rates),
    }
}

/// 构造规则（固定 ID 与时间戳）
pub fn make_rule(id: &str, body: RuleBody, area_charges: RegionPriceTable) -> PricingRule {
    let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    PricingRule {
        id: id.to_string(),
        name: format!("规则-{}", id),
        description: None,
        area_charges,
        body,
        created_at: ts,
        updated_at: ts,
    }
}

/// 构造规则草稿
pub fn make_draft(name: &str, body: RuleBody) -> RuleDraft {
    RuleDraft {
        name: name.to_string(),
        description: None,
        area_charges: RegionPriceTable::new(),
        body,
    }
}

/// 标准首重规则: 阈值 3kg，BJ 首重 10，超重首公斤 12，续重 2
pub fn standard_threshold_rule() -> PricingRule {
    let mut pricing = threshold_pricing("3");
    pricing.first_weight_prices = prices(&[(Region::Beijing, "10")]);
    pricing.overweight_first_prices = prices(&[(Region::Beijing, "12")]);
    pricing.continued_weight_prices = prices(&[(Region::Beijing, "2")]);
    make_rule(
        "std",
        RuleBody::ThresholdTiered(pricing),
        prices(&[(Region::Beijing, "0")]),
    )
}

/// 创建临时测试数据库路径
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> (NamedTempFile, String) {
    let temp_file = NamedTempFile::new().unwrap();
    let db_path = temp_file.path().to_str().unwrap().to_string();
    (temp_file, db_path)
}

/// 创建完整应用状态（临时目录需保持存活）
pub fn create_test_state() -> (TempDir, AppState) {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("freight.db").to_string_lossy().to_string();
    let state = AppState::new(db_path).unwrap();
    (dir, state)
}

/// 在目录下写入文件
pub fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}
