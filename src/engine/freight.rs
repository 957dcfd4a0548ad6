// ==========================================
// 快递运费计算系统 - 单票运费计算
// ==========================================
// 纯函数: (规则, 订单) → 计算结果，无 I/O，无共享状态
// 红线: 价格缺失只体现在结果 error 中，不向上抛出
// ==========================================

use crate::domain::order::{CalcError, CalculationResult, FeeBreakdown, Order};
use crate::domain::rule::{FlatPlusRatePricing, PricingRule, RuleBody, ThresholdTieredPricing};
use crate::domain::types::Region;
use crate::engine::tier_resolver::resolve_tier_price;
use rust_decimal::Decimal;
use tracing::debug;

/// 计费中间结果（不含附加费）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Priced {
    billing_weight: Decimal,
    base_fee: Decimal,
    continued_fee: Decimal,
}

/// 计算单票运费
///
/// # 返回
/// 永远返回结果对象；配置缺失、未知区域、非法重量记录在 `error` 中
pub fn calculate_freight(rule: &PricingRule, order: &Order) -> CalculationResult {
    let region = match Region::from_code(&order.destination) {
        Some(r) => r,
        None => {
            return reject(
                rule,
                order,
                CalcError::UnknownRegion {
                    destination: order.destination.trim().to_string(),
                },
            )
        }
    };

    if order.weight <= Decimal::ZERO {
        return reject(rule, order, CalcError::InvalidWeight { weight: order.weight });
    }

    let priced = match &rule.body {
        RuleBody::ThresholdTiered(pricing) => price_threshold_tiered(pricing, order.weight, region),
        RuleBody::FlatPlusRate(pricing) => price_flat_plus_rate(pricing, order.weight, region),
    };

    let result = priced.and_then(|p| {
        CalculationResult::priced(
            order,
            region,
            p.billing_weight,
            FeeBreakdown {
                base_fee: p.base_fee,
                continued_fee: p.continued_fee,
                area_charge: rule.area_charge(region),
            },
        )
    });

    match result {
        Ok(r) => r,
        Err(e) => reject(rule, order, e),
    }
}

fn overflow(region: Region) -> CalcError {
    CalcError::AmountOverflow {
        destination: region.code().to_string(),
    }
}

fn reject(rule: &PricingRule, order: &Order, error: CalcError) -> CalculationResult {
    debug!(
        rule_id = %rule.id,
        waybill_id = %order.waybill_id,
        destination = %order.destination,
        error = %error,
        "运费计算失败"
    );
    CalculationResult::failed(order, error)
}

// ==========================================
// 模式 A: 首重阈值 + 续重
// ==========================================
// 重量 ≤ 阈值: 首重价（平价或阶梯），计费重量 = 实际重量
// 重量 > 阈值: 超重首公斤价 + ceil(重量 - 1) × 续重单价
fn price_threshold_tiered(
    pricing: &ThresholdTieredPricing,
    weight: Decimal,
    region: Region,
) -> Result<Priced, CalcError> {
    if weight <= pricing.first_weight_threshold {
        let base_fee = if pricing.use_step_pricing && !pricing.weight_tiers.is_empty() {
            resolve_tier_price(weight, &pricing.weight_tiers, region)
                .ok_or(CalcError::MissingTierPrice { region })?
        } else {
            pricing
                .first_weight_prices
                .get(region)
                .ok_or(CalcError::MissingFirstWeightPrice { region })?
        };

        return Ok(Priced {
            billing_weight: weight,
            base_fee,
            continued_fee: Decimal::ZERO,
        });
    }

    // 检查顺序: 超重首公斤价 → 续重单价
    let overweight_first = pricing
        .overweight_first_prices
        .get(region)
        .ok_or(CalcError::MissingOverweightFirstPrice { region })?;
    let continued_price = pricing
        .continued_weight_prices
        .get(region)
        .ok_or(CalcError::MissingContinuedWeightPrice { region })?;

    let continued_kg = continued_kilograms(weight);
    let continued_fee = continued_kg
        .checked_mul(continued_price)
        .ok_or_else(|| overflow(region))?;
    let billing_weight = Decimal::ONE
        .checked_add(continued_kg)
        .ok_or_else(|| overflow(region))?;

    Ok(Priced {
        billing_weight,
        base_fee: overweight_first,
        continued_fee,
    })
}

/// 续重公斤数: ceil(重量 - 1)，阈值低于 1kg 时不小于 0
fn continued_kilograms(weight: Decimal) -> Decimal {
    (weight - Decimal::ONE).ceil().max(Decimal::ZERO)
}

// ==========================================
// 模式 B: 固定费用 + 单价
// ==========================================
// 计费重量向上取整到整公斤
fn price_flat_plus_rate(
    pricing: &FlatPlusRatePricing,
    weight: Decimal,
    region: Region,
) -> Result<Priced, CalcError> {
    let fixed = pricing
        .fixed_prices
        .get(region)
        .ok_or(CalcError::MissingFixedPrice { region })?;
    let rate = pricing
        .weight_rates
        .get(region)
        .ok_or(CalcError::MissingWeightRate { region })?;

    let billing_weight = weight.ceil();
    let continued_fee = billing_weight
        .checked_mul(rate)
        .ok_or_else(|| overflow(region))?;

    Ok(Priced {
        billing_weight,
        base_fee: fixed,
        continued_fee,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_continued_kilograms_rounds_up() {
        assert_eq!(continued_kilograms(d("4.1")), d("4"));
        assert_eq!(continued_kilograms(d("2")), d("1"));
        assert_eq!(continued_kilograms(d("1.01")), d("1"));
        assert_eq!(continued_kilograms(d("0.8")), Decimal::ZERO);
    }

    #[test]
    fn test_flat_plus_rate_checks_fixed_before_rate() {
        let pricing = FlatPlusRatePricing {
            fixed_prices: Default::default(),
            weight_rates: Default::default(),
        };
        let err = price_flat_plus_rate(&pricing, d("1"), Region::Shanghai).unwrap_err();
        assert_eq!(err, CalcError::MissingFixedPrice { region: Region::Shanghai });
    }

    #[test]
    fn test_flat_plus_rate_overflow_is_error() {
        let pricing = FlatPlusRatePricing {
            fixed_prices: [(Region::Shanghai, d("5"))].into_iter().collect(),
            weight_rates: [(Region::Shanghai, d("3"))].into_iter().collect(),
        };
        let err = price_flat_plus_rate(&pricing, Decimal::MAX, Region::Shanghai).unwrap_err();
        assert!(matches!(err, CalcError::AmountOverflow { destination } if destination == "SH"));
    }
}
