// ==========================================
// 快递运费计算系统 - 领域模型层
// ==========================================
// 职责: 定义计费规则、订单、计算结果等领域实体
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod order;
pub mod rule;
pub mod types;

// 重导出核心类型
pub use order::{BatchResult, CalcError, CalculationResult, FeeBreakdown, Order};
pub use rule::{
    FlatPlusRatePricing, PricingRule, RegionPriceTable, RuleBody, RuleDraft,
    ThresholdTieredPricing, WeightTier,
};
pub use types::{Region, RuleMode};
