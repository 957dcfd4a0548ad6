// ==========================================
// 快递运费计算系统 - 重量阶梯解析
// ==========================================
// 规则: 按上限升序取第一个 上限 ≥ 重量 的阶梯
// 超出全部上限时按最高阶梯计价（封顶，不报错）
// 同上限阶梯: 稳定排序后靠前者生效
// ==========================================

use crate::domain::rule::WeightTier;
use crate::domain::types::Region;
use rust_decimal::Decimal;

/// 解析阶梯价格
///
/// # 返回
/// - Some(price): 命中阶梯在该区域的价格
/// - None: 无阶梯，或命中阶梯未配置该区域
pub fn resolve_tier_price(weight: Decimal, tiers: &[WeightTier], region: Region) -> Option<Decimal> {
    let tier = select_tier(weight, tiers)?;
    tier.prices.get(region)
}

/// 选取适用阶梯（输入顺序无要求）
pub fn select_tier(weight: Decimal, tiers: &[WeightTier]) -> Option<&WeightTier> {
    let mut sorted: Vec<&WeightTier> = tiers.iter().collect();
    // sort_by 为稳定排序
    sorted.sort_by(|a, b| a.ceiling.cmp(&b.ceiling));

    sorted
        .iter()
        .copied()
        .find(|t| t.ceiling >= weight)
        .or_else(|| sorted.last().copied())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::rule::RegionPriceTable;
    use std::str::FromStr;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn tier(ceiling: &str, bj: &str) -> WeightTier {
        WeightTier {
            ceiling: d(ceiling),
            prices: [(Region::Beijing, d(bj))].into_iter().collect(),
        }
    }

    #[test]
    fn test_first_tier_reaching_weight_wins() {
        let tiers = vec![tier("0.5", "6"), tier("1", "8"), tier("2", "11")];
        assert_eq!(resolve_tier_price(d("0.3"), &tiers, Region::Beijing), Some(d("6")));
        assert_eq!(resolve_tier_price(d("0.8"), &tiers, Region::Beijing), Some(d("8")));
        assert_eq!(resolve_tier_price(d("2"), &tiers, Region::Beijing), Some(d("11")));
    }

    #[test]
    fn test_ceiling_is_inclusive() {
        let tiers = vec![tier("1", "8"), tier("2", "11")];
        assert_eq!(resolve_tier_price(d("1"), &tiers, Region::Beijing), Some(d("8")));
        assert_eq!(resolve_tier_price(d("1.0001"), &tiers, Region::Beijing), Some(d("11")));
    }

    #[test]
    fn test_unsorted_tiers_are_sorted_first() {
        let tiers = vec![tier("2", "11"), tier("0.5", "6"), tier("1", "8")];
        assert_eq!(resolve_tier_price(d("0.7"), &tiers, Region::Beijing), Some(d("8")));
    }

    #[test]
    fn test_weight_above_all_ceilings_clamps_to_top_tier() {
        let tiers = vec![tier("0.5", "6"), tier("1", "8"), tier("2", "11")];
        assert_eq!(resolve_tier_price(d("5"), &tiers, Region::Beijing), Some(d("11")));
    }

    #[test]
    fn test_equal_ceilings_keep_input_order() {
        let tiers = vec![tier("1", "7"), tier("1", "9")];
        assert_eq!(resolve_tier_price(d("1"), &tiers, Region::Beijing), Some(d("7")));
    }

    #[test]
    fn test_empty_tiers_not_configured() {
        assert_eq!(resolve_tier_price(d("1"), &[], Region::Beijing), None);
    }

    #[test]
    fn test_missing_region_in_resolved_tier_not_configured() {
        let tiers = vec![
            tier("1", "8"),
            WeightTier {
                ceiling: d("2"),
                prices: RegionPriceTable::new(),
            },
        ];
        assert_eq!(resolve_tier_price(d("1.5"), &tiers, Region::Beijing), None);
        // 其他阶梯有价格也不回退
        assert_eq!(resolve_tier_price(d("0.5"), &tiers, Region::Shanghai), None);
    }
}
