// ==========================================
// 快递运费计算系统 - 核心库
// ==========================================
// 功能: 按计费规则计算快递运费（单票/批量）
// 技术栈: Rust + SQLite
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 规则存取
pub mod repository;

// 引擎层 - 计费规则
pub mod engine;

// 导入层 - 订单表格
pub mod importer;

// 导出层 - 计算结果
pub mod exporter;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// 应用层 - 组装
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{Region, RuleMode};

// 领域实体
pub use domain::{
    BatchResult, CalcError, CalculationResult, FeeBreakdown, Order, PricingRule, RuleBody,
    RuleDraft,
};

// 引擎
pub use engine::{calculate_batch, calculate_freight};

// API
pub use api::{FreightApi, RuleApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "快递运费计算系统";
