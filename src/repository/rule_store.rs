// ==========================================
// 快递运费计算系统 - 规则存储 Trait
// ==========================================
// 职责: 定义规则读写接口（不包含实现）
// 实现者: SqliteRuleRepository, JsonFileRuleStore, FallbackRuleStore
// 红线: Repository 不含业务逻辑（校验在 API 层）
// ==========================================

use crate::domain::rule::PricingRule;
use crate::repository::error::RepositoryResult;

pub trait RuleStore: Send + Sync {
    /// 查询全部规则
    fn list_rules(&self) -> RepositoryResult<Vec<PricingRule>>;

    /// 按 ID 查询
    ///
    /// # 返回
    /// - Ok(Some(rule)): 找到
    /// - Ok(None): 未找到
    fn get_rule(&self, rule_id: &str) -> RepositoryResult<Option<PricingRule>>;

    /// 保存规则（按 ID 插入或覆盖）
    fn save_rule(&self, rule: &PricingRule) -> RepositoryResult<()>;

    /// 删除规则
    ///
    /// # 返回
    /// - Ok(true): 已删除
    /// - Ok(false): 规则不存在
    fn delete_rule(&self, rule_id: &str) -> RepositoryResult<bool>;
}
