// ==========================================
// 快递运费计算系统 - 引擎层
// ==========================================
// 职责: 运费计算规则引擎,不拼 SQL,不做 I/O
// 红线: 单票失败写入结果,不中断批量
// ==========================================

pub mod batch;
pub mod freight;
pub mod tier_resolver;

// 重导出核心引擎
pub use batch::calculate_batch;
pub use freight::calculate_freight;
pub use tier_resolver::{resolve_tier_price, select_tier};
