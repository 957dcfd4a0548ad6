// ==========================================
// 快递运费计算系统 - 计费规则领域模型
// ==========================================
// 规则 = 公共字段 + 计费模式（二选一）
// 红线: 价格表"未配置"与"配置为 0"必须区分
// ==========================================

use crate::domain::types::{Region, RuleMode};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// RegionPriceTable - 区域价格表
// ==========================================
// 部分映射: 缺失键表示该区域未配置
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionPriceTable(BTreeMap<Region, Decimal>);

impl RegionPriceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// 查询区域价格（None = 未配置）
    pub fn get(&self, region: Region) -> Option<Decimal> {
        self.0.get(&region).copied()
    }

    pub fn set(&mut self, region: Region, price: Decimal) {
        self.0.insert(region, price);
    }

    pub fn remove(&mut self, region: Region) -> Option<Decimal> {
        self.0.remove(&region)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Region, Decimal)> + '_ {
        self.0.iter().map(|(r, p)| (*r, *p))
    }
}

impl FromIterator<(Region, Decimal)> for RegionPriceTable {
    fn from_iter<I: IntoIterator<Item = (Region, Decimal)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// ==========================================
// WeightTier - 重量阶梯
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightTier {
    /// 阶梯上限（含），单位 kg
    pub ceiling: Decimal,
    pub prices: RegionPriceTable,
}

// ==========================================
// 模式 A: 首重阈值 + 续重
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThresholdTieredPricing {
    /// 首重阈值 (kg)，重量 ≤ 阈值走首重计价
    pub first_weight_threshold: Decimal,
    /// 首重区间是否启用阶梯价
    #[serde(default)]
    pub use_step_pricing: bool,
    #[serde(default)]
    pub first_weight_prices: RegionPriceTable,
    #[serde(default)]
    pub weight_tiers: Vec<WeightTier>,
    /// 超阈值时的首公斤价格
    #[serde(default)]
    pub overweight_first_prices: RegionPriceTable,
    /// 超阈值时的续重单价（元/kg）
    #[serde(default)]
    pub continued_weight_prices: RegionPriceTable,
}

// ==========================================
// 模式 B: 固定费用 + 单价
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatPlusRatePricing {
    #[serde(default)]
    pub fixed_prices: RegionPriceTable,
    /// 每公斤单价
    #[serde(default)]
    pub weight_rates: RegionPriceTable,
}

/// 计费模式（恰好一个生效）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RuleBody {
    ThresholdTiered(ThresholdTieredPricing),
    FlatPlusRate(FlatPlusRatePricing),
}

impl RuleBody {
    pub fn mode(&self) -> RuleMode {
        match self {
            RuleBody::ThresholdTiered(_) => RuleMode::ThresholdTiered,
            RuleBody::FlatPlusRate(_) => RuleMode::FlatPlusRate,
        }
    }
}

// ==========================================
// PricingRule - 计费规则
// ==========================================
// 计算引擎只读，不修改规则
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingRule {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// 区域附加费（未配置按 0 计）
    #[serde(default)]
    pub area_charges: RegionPriceTable,
    #[serde(flatten)]
    pub body: RuleBody,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PricingRule {
    pub fn mode(&self) -> RuleMode {
        self.body.mode()
    }

    /// 区域附加费，未配置返回 0
    pub fn area_charge(&self, region: Region) -> Decimal {
        self.area_charges.get(region).unwrap_or(Decimal::ZERO)
    }
}

// ==========================================
// RuleDraft - 规则编辑草稿
// ==========================================
// 由规则编辑器提交，id/时间戳由 API 层生成
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleDraft {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub area_charges: RegionPriceTable,
    #[serde(flatten)]
    pub body: RuleBody,
}

impl RuleDraft {
    /// 生成规则实体
    pub fn into_rule(
        self,
        id: String,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> PricingRule {
        PricingRule {
            id,
            name: self.name.trim().to_string(),
            description: self
                .description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
            area_charges: self.area_charges,
            body: self.body,
            created_at,
            updated_at,
        }
    }
}

impl From<PricingRule> for RuleDraft {
    fn from(rule: PricingRule) -> Self {
        Self {
            name: rule.name,
            description: rule.description,
            area_charges: rule.area_charges,
            body: rule.body,
        }
    }
}
