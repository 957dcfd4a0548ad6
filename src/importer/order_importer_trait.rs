// ==========================================
// 快递运费计算系统 - 订单导入 Trait
// ==========================================
// 职责: 定义订单导入接口（不包含实现）
// 管道: 文件解析 → 列识别/字段映射 → 区域归一化
// ==========================================

use crate::domain::order::Order;
use crate::importer::error::ImportResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

// ==========================================
// 导入中间/输出结构
// ==========================================

/// 解析后的原始表格（保留表头顺序）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

/// 原始数据行
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    /// 源文件中的数据行号（从 1 开始，不含表头，被跳过的全空行也计数）
    pub row_number: usize,
    pub values: HashMap<String, String>,
}

/// 行级问题等级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueLevel {
    Warning, // 已导入，但需关注
    Skipped, // 未导入
}

/// 行级问题
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowIssue {
    /// 源文件数据行号（从 1 开始，不含表头，全空行也计数）
    pub row_number: usize,
    pub level: IssueLevel,
    pub message: String,
}

/// 订单导入报告
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderImportReport {
    pub source: String,
    pub total_rows: usize,
    pub orders: Vec<Order>,
    pub issues: Vec<RowIssue>,
}

impl OrderImportReport {
    pub fn skipped_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.level == IssueLevel::Skipped)
            .count()
    }
}

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 文件解析接口
// 实现者: CsvParser, ExcelParser
pub trait FileParser: Send + Sync {
    /// 解析文件为原始表格
    ///
    /// # 返回
    /// - Ok(RawTable): 表头 + 行记录（已跳过全空行）
    /// - Err: 文件读取错误、格式错误
    fn parse_to_raw_table(&self, file_path: &Path) -> ImportResult<RawTable>;
}

// ==========================================
// OrderImporter Trait
// ==========================================
// 用途: 订单导入主接口
// 实现者: OrderImporterImpl
#[async_trait]
pub trait OrderImporter: Send + Sync {
    /// 导入单个文件（按扩展名选择解析器）
    fn import_file(&self, file_path: &Path) -> ImportResult<OrderImportReport>;

    /// 批量导入多个文件（并发执行）
    ///
    /// # 说明
    /// - 每个文件的导入是独立的，互不影响
    /// - 返回结果与输入路径顺序一致
    async fn import_many(&self, file_paths: Vec<PathBuf>) -> Vec<ImportResult<OrderImportReport>>;
}
