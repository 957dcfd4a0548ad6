// ==========================================
// 快递运费计算系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// 职责: 提供规则存取接口,屏蔽数据库/文件细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod error;
pub mod fallback_store;
pub mod json_rule_store;
pub mod rule_repo;
pub mod rule_store;

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use fallback_store::FallbackRuleStore;
pub use json_rule_store::JsonFileRuleStore;
pub use rule_repo::SqliteRuleRepository;
pub use rule_store::RuleStore;
