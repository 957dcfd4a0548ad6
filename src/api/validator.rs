// ==========================================
// 快递运费计算系统 - 规则校验器
// ==========================================
// 职责: 规则编辑提交时的结构校验
// 说明: 区域价格缺失不是校验错误（计算时逐票报错）
// ==========================================

use crate::api::error::{ApiError, ApiResult, ValidationViolation};
use crate::domain::rule::{RegionPriceTable, RuleBody, RuleDraft};
use rust_decimal::Decimal;

pub struct RuleValidator;

impl RuleValidator {
    /// 校验规则草稿，收集全部违规后统一返回
    pub fn validate(&self, draft: &RuleDraft) -> ApiResult<()> {
        let violations = self.collect_violations(draft);
        if violations.is_empty() {
            Ok(())
        } else {
            Err(ApiError::ValidationError { violations })
        }
    }

    pub fn collect_violations(&self, draft: &RuleDraft) -> Vec<ValidationViolation> {
        let mut v = Vec::new();

        if draft.name.trim().is_empty() {
            v.push(ValidationViolation::new("name", "规则名称不能为空"));
        }
        check_non_negative(&mut v, "areaCharges", &draft.area_charges);

        match &draft.body {
            RuleBody::ThresholdTiered(p) => {
                if p.first_weight_threshold <= Decimal::ZERO {
                    v.push(ValidationViolation::new(
                        "firstWeightThreshold",
                        "首重阈值必须大于 0",
                    ));
                }
                if p.use_step_pricing && p.weight_tiers.is_empty() {
                    v.push(ValidationViolation::new(
                        "weightTiers",
                        "启用阶梯价时至少需要一个重量阶梯",
                    ));
                }
                for (i, tier) in p.weight_tiers.iter().enumerate() {
                    if tier.ceiling <= Decimal::ZERO {
                        v.push(ValidationViolation::new(
                            format!("weightTiers[{}].ceiling", i),
                            "阶梯上限必须大于 0",
                        ));
                    }
                    check_non_negative(&mut v, &format!("weightTiers[{}].prices", i), &tier.prices);
                }
                check_non_negative(&mut v, "firstWeightPrices", &p.first_weight_prices);
                check_non_negative(&mut v, "overweightFirstPrices", &p.overweight_first_prices);
                check_non_negative(&mut v, "continuedWeightPrices", &p.continued_weight_prices);
            }
            RuleBody::FlatPlusRate(p) => {
                check_non_negative(&mut v, "fixedPrices", &p.fixed_prices);
                check_non_negative(&mut v, "weightRates", &p.weight_rates);
            }
        }

        v
    }
}

fn check_non_negative(v: &mut Vec<ValidationViolation>, field: &str, table: &RegionPriceTable) {
    for (region, price) in table.iter() {
        if price < Decimal::ZERO {
            v.push(ValidationViolation::new(
                format!("{}.{}", field, region),
                format!("价格不能为负数: {}", price),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::rule::{FlatPlusRatePricing, ThresholdTieredPricing, WeightTier};
    use crate::domain::types::Region;

    fn threshold_draft() -> RuleDraft {
        RuleDraft {
            name: "标准".to_string(),
            description: None,
            area_charges: RegionPriceTable::new(),
            body: RuleBody::ThresholdTiered(ThresholdTieredPricing {
                first_weight_threshold: Decimal::new(3, 0),
                use_step_pricing: false,
                first_weight_prices: RegionPriceTable::new(),
                weight_tiers: Vec::new(),
                overweight_first_prices: RegionPriceTable::new(),
                continued_weight_prices: RegionPriceTable::new(),
            }),
        }
    }

    #[test]
    fn test_valid_draft_passes() {
        assert!(RuleValidator.validate(&threshold_draft()).is_ok());
    }

    #[test]
    fn test_collects_all_violations() {
        let mut draft = threshold_draft();
        draft.name = "  ".to_string();
        if let RuleBody::ThresholdTiered(p) = &mut draft.body {
            p.first_weight_threshold = Decimal::ZERO;
            p.use_step_pricing = true;
        }

        let fields: Vec<String> = RuleValidator
            .collect_violations(&draft)
            .into_iter()
            .map(|v| v.field)
            .collect();
        assert_eq!(fields, vec!["name", "firstWeightThreshold", "weightTiers"]);
    }

    #[test]
    fn test_tier_ceiling_and_negative_price() {
        let mut draft = threshold_draft();
        if let RuleBody::ThresholdTiered(p) = &mut draft.body {
            p.weight_tiers.push(WeightTier {
                ceiling: Decimal::ZERO,
                prices: [(Region::Beijing, Decimal::new(-1, 0))].into_iter().collect(),
            });
        }

        let fields: Vec<String> = RuleValidator
            .collect_violations(&draft)
            .into_iter()
            .map(|v| v.field)
            .collect();
        assert_eq!(fields, vec!["weightTiers[0].ceiling", "weightTiers[0].prices.BJ"]);
    }

    #[test]
    fn test_flat_rule_negative_rate() {
        let draft = RuleDraft {
            name: "固定".to_string(),
            description: None,
            area_charges: RegionPriceTable::new(),
            body: RuleBody::FlatPlusRate(FlatPlusRatePricing {
                fixed_prices: RegionPriceTable::new(),
                weight_rates: [(Region::Shanghai, Decimal::new(-5, 1))].into_iter().collect(),
            }),
        };
        assert!(matches!(
            RuleValidator.validate(&draft),
            Err(ApiError::ValidationError { .. })
        ));
    }
}
