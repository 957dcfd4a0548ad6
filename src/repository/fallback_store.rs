// ==========================================
// 快递运费计算系统 - 主存储 + 本地兜底
// ==========================================
// 主存储失败时记录告警，并由本地存储完成同一操作
// ==========================================

use crate::domain::rule::PricingRule;
use crate::repository::error::RepositoryResult;
use crate::repository::rule_store::RuleStore;
use std::sync::Arc;
use tracing::warn;

pub struct FallbackRuleStore {
    primary: Arc<dyn RuleStore>,
    fallback: Arc<dyn RuleStore>,
}

impl FallbackRuleStore {
    pub fn new(primary: Arc<dyn RuleStore>, fallback: Arc<dyn RuleStore>) -> Self {
        Self { primary, fallback }
    }

    fn with_fallback<T>(
        &self,
        op: &'static str,
        f: impl Fn(&dyn RuleStore) -> RepositoryResult<T>,
    ) -> RepositoryResult<T> {
        match f(self.primary.as_ref()) {
            Ok(v) => Ok(v),
            Err(e) => {
                warn!(operation = op, error = %e, "主规则存储不可用，改用本地存储");
                f(self.fallback.as_ref())
            }
        }
    }
}

impl RuleStore for FallbackRuleStore {
    fn list_rules(&self) -> RepositoryResult<Vec<PricingRule>> {
        self.with_fallback("list_rules", |s| s.list_rules())
    }

    fn get_rule(&self, rule_id: &str) -> RepositoryResult<Option<PricingRule>> {
        self.with_fallback("get_rule", |s| s.get_rule(rule_id))
    }

    fn save_rule(&self, rule: &PricingRule) -> RepositoryResult<()> {
        self.with_fallback("save_rule", |s| s.save_rule(rule))
    }

    fn delete_rule(&self, rule_id: &str) -> RepositoryResult<bool> {
        self.with_fallback("delete_rule", |s| s.delete_rule(rule_id))
    }
}
