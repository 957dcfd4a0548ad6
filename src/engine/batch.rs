// ==========================================
// 快递运费计算系统 - 批量运费汇总
// ==========================================
// 逐票计算，保持输入顺序；单票失败不影响后续订单
// 总金额只累加成功结果
// ==========================================

use crate::domain::order::{BatchResult, CalculationResult, Order};
use crate::domain::rule::PricingRule;
use crate::engine::freight::calculate_freight;
use tracing::{info, instrument, warn};

/// 批量计算运费
#[instrument(skip(rule, orders), fields(rule_id = %rule.id, order_count = orders.len()))]
pub fn calculate_batch(rule: &PricingRule, orders: &[Order]) -> BatchResult {
    let results: Vec<CalculationResult> = orders
        .iter()
        .map(|order| calculate_freight(rule, order))
        .collect();

    let batch = BatchResult::from_results(rule.name.clone(), results);

    info!(
        rule_name = %batch.rule_name,
        total_orders = batch.total_orders,
        success_count = batch.success_count,
        error_count = batch.error_count,
        total_price = %batch.total_price,
        "批量运费计算完成"
    );
    if batch.error_count > 0 {
        warn!(error_count = batch.error_count, "部分订单计算失败，请检查规则区域配置");
    }

    batch
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::rule::{FlatPlusRatePricing, RegionPriceTable, RuleBody};
    use crate::domain::types::Region;
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn flat_rule() -> PricingRule {
        let now = Utc::now();
        PricingRule {
            id: "r-flat".to_string(),
            name: "固定加单价".to_string(),
            description: None,
            area_charges: RegionPriceTable::new(),
            body: RuleBody::FlatPlusRate(FlatPlusRatePricing {
                fixed_prices: [(Region::Shanghai, Decimal::new(5, 0))].into_iter().collect(),
                weight_rates: [(Region::Shanghai, Decimal::new(3, 0))].into_iter().collect(),
            }),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_empty_batch() {
        let batch = calculate_batch(&flat_rule(), &[]);
        assert_eq!(batch.total_orders, 0);
        assert_eq!(batch.success_count, 0);
        assert_eq!(batch.error_count, 0);
        assert_eq!(batch.total_price, Decimal::ZERO);
        assert_eq!(batch.rule_name, "固定加单价");
    }

    #[test]
    fn test_failure_does_not_stop_following_orders() {
        let orders = vec![
            Order::new("W1", Region::Guangdong, Decimal::new(1, 0)),
            Order::new("W2", Region::Shanghai, Decimal::new(2, 0)),
        ];
        let batch = calculate_batch(&flat_rule(), &orders);

        assert_eq!(batch.error_count, 1);
        assert_eq!(batch.success_count, 1);
        assert_eq!(batch.results[0].waybill_id, "W1");
        assert!(batch.results[0].error.is_some());
        // 5 + 2 × 3
        assert_eq!(batch.results[1].total_price, Decimal::new(11, 0));
        assert_eq!(batch.total_price, Decimal::new(11, 0));
    }
}
