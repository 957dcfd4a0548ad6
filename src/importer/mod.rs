// ==========================================
// 快递运费计算系统 - 导入层
// ==========================================
// 职责: 外部订单表格导入,生成规范化订单
// 支持: Excel, CSV
// ==========================================

// 模块声明
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod order_importer_impl;
pub mod order_importer_trait;
pub mod region_normalizer;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use field_mapper::{ColumnMapping, FieldMapper};
pub use file_parser::{CsvParser, ExcelParser, UniversalFileParser};
pub use order_importer_impl::OrderImporterImpl;
pub use region_normalizer::RegionNormalizer;

// 重导出 Trait 接口
pub use order_importer_trait::{
    FileParser, IssueLevel, OrderImportReport, OrderImporter, RawRow, RawTable, RowIssue,
};
