// ==========================================
// 快递运费计算系统 - 订单与计算结果
// ==========================================
// 红线: error 存在时 total_price 与明细均为 0，不得视为报价
// ==========================================

use crate::domain::types::Region;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ==========================================
// Order - 待计费订单
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub waybill_id: String,
    /// 目的地区域代码（上游归一化后的值，引擎再做一次枚举校验）
    pub destination: String,
    /// 实际重量 (kg)
    pub weight: Decimal,
}

impl Order {
    pub fn new(
        waybill_id: impl Into<String>,
        destination: impl Into<String>,
        weight: Decimal,
    ) -> Self {
        Self {
            waybill_id: waybill_id.into(),
            destination: destination.into(),
            weight,
        }
    }
}

impl From<Region> for String {
    fn from(region: Region) -> Self {
        region.code().to_string()
    }
}

// ==========================================
// CalcError - 单票计算错误
// ==========================================
// 只影响当前订单，不中断批量计算
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CalcError {
    #[error("区域 {region} 未配置阶梯价格")]
    MissingTierPrice { region: Region },

    #[error("区域 {region} 未配置首重价格")]
    MissingFirstWeightPrice { region: Region },

    #[error("区域 {region} 未配置超重首公斤价格")]
    MissingOverweightFirstPrice { region: Region },

    #[error("区域 {region} 未配置续重价格")]
    MissingContinuedWeightPrice { region: Region },

    #[error("区域 {region} 未配置固定费用")]
    MissingFixedPrice { region: Region },

    #[error("区域 {region} 未配置每公斤单价")]
    MissingWeightRate { region: Region },

    #[error("未知目的地区域: {destination}")]
    UnknownRegion { destination: String },

    #[error("重量必须大于 0，实际为 {weight}")]
    InvalidWeight { weight: Decimal },

    #[error("目的地 {destination} 运费金额超出可计算范围")]
    AmountOverflow { destination: String },
}

/// 费用明细
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeBreakdown {
    /// 首重费用（模式 B 为固定费用）
    pub base_fee: Decimal,
    /// 续重费用（模式 B 为计费重量 × 单价）
    pub continued_fee: Decimal,
    pub area_charge: Decimal,
}

impl FeeBreakdown {
    /// 明细求和；超出 Decimal 表示范围时返回 None
    pub fn checked_total(&self) -> Option<Decimal> {
        self.base_fee
            .checked_add(self.continued_fee)?
            .checked_add(self.area_charge)
    }
}

// ==========================================
// CalculationResult - 单票计算结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResult {
    pub waybill_id: String,
    pub destination: String,
    pub billing_weight: Decimal,
    pub original_weight: Decimal,
    pub total_price: Decimal,
    pub breakdown: FeeBreakdown,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<CalcError>,
}

impl CalculationResult {
    /// 成功结果，total_price 由明细求和
    ///
    /// 明细求和溢出时返回 `AmountOverflow`
    pub fn priced(
        order: &Order,
        region: Region,
        billing_weight: Decimal,
        breakdown: FeeBreakdown,
    ) -> Result<Self, CalcError> {
        let total_price = breakdown
            .checked_total()
            .ok_or_else(|| CalcError::AmountOverflow {
                destination: region.code().to_string(),
            })?;

        Ok(Self {
            waybill_id: order.waybill_id.clone(),
            destination: region.code().to_string(),
            billing_weight,
            original_weight: order.weight,
            total_price,
            breakdown,
            error: None,
        })
    }

    /// 失败结果，所有金额字段为 0
    pub fn failed(order: &Order, error: CalcError) -> Self {
        Self {
            waybill_id: order.waybill_id.clone(),
            destination: order.destination.trim().to_string(),
            billing_weight: Decimal::ZERO,
            original_weight: order.weight,
            total_price: Decimal::ZERO,
            breakdown: FeeBreakdown::default(),
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// 将已有结果改记为失败（金额字段清零，运单号与目的地保留）
    fn into_failed(self, error: CalcError) -> Self {
        Self {
            billing_weight: Decimal::ZERO,
            total_price: Decimal::ZERO,
            breakdown: FeeBreakdown::default(),
            error: Some(error),
            ..self
        }
    }
}

// ==========================================
// BatchResult - 批量计算汇总
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResult {
    pub rule_name: String,
    pub total_orders: usize,
    pub success_count: usize,
    pub error_count: usize,
    /// 仅统计成功结果
    pub total_price: Decimal,
    /// 与输入订单顺序一致
    pub results: Vec<CalculationResult>,
}

impl BatchResult {
    /// 由有序结果汇总
    ///
    /// 累加某票成功结果会使总额溢出时，该票改记为 `AmountOverflow`，
    /// 总额保持为此前成功结果之和
    pub fn from_results(rule_name: impl Into<String>, results: Vec<CalculationResult>) -> Self {
        let mut total_price = Decimal::ZERO;
        let results: Vec<CalculationResult> = results
            .into_iter()
            .map(|r| {
                if !r.is_success() {
                    return r;
                }
                match total_price.checked_add(r.total_price) {
                    Some(sum) => {
                        total_price = sum;
                        r
                    }
                    None => {
                        let destination = r.destination.clone();
                        r.into_failed(CalcError::AmountOverflow { destination })
                    }
                }
            })
            .collect();
        let success_count = results.iter().filter(|r| r.is_success()).count();

        Self {
            rule_name: rule_name.into(),
            total_orders: results.len(),
            success_count,
            error_count: results.len() - success_count,
            total_price,
            results,
        }
    }

    pub fn failures(&self) -> impl Iterator<Item = &CalculationResult> {
        self.results.iter().filter(|r| !r.is_success())
    }
}
