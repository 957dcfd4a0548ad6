// ==========================================
// 快递运费计算系统 - API 层
// ==========================================
// 职责: 提供规则管理与运费计算接口,供 CLI 调用
// ==========================================

pub mod error;
pub mod freight_api;
pub mod rule_api;
pub mod validator;

// 重导出核心类型
pub use error::{ApiError, ApiResult, ValidationViolation};
pub use freight_api::{FileQuote, FreightApi};
pub use rule_api::RuleApi;
pub use validator::RuleValidator;
