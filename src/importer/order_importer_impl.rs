// ==========================================
// 快递运费计算系统 - 订单导入器实现
// ==========================================
// 流程:
// 1. 文件解析（CSV/Excel）
// 2. 列识别
// 3. 逐行映射（重量解析、运单号占位）
// 4. 目的地归一化（无法识别时原文透传，由引擎逐票报错）
// ==========================================

use crate::config::config_manager::DEFAULT_WAYBILL_PLACEHOLDER_PREFIX;
use crate::domain::order::Order;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::FieldMapper;
use crate::importer::file_parser::UniversalFileParser;
use crate::importer::order_importer_trait::{
    FileParser, IssueLevel, OrderImportReport, OrderImporter, RawTable, RowIssue,
};
use crate::importer::region_normalizer::RegionNormalizer;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Clone)]
pub struct OrderImporterImpl {
    placeholder_prefix: String,
}

impl Default for OrderImporterImpl {
    fn default() -> Self {
        Self::new(DEFAULT_WAYBILL_PLACEHOLDER_PREFIX)
    }
}

impl OrderImporterImpl {
    pub fn new(placeholder_prefix: impl Into<String>) -> Self {
        Self {
            placeholder_prefix: placeholder_prefix.into(),
        }
    }

    /// 将已解析的表格转换为订单
    pub fn import_table(&self, source: &str, table: RawTable) -> ImportResult<OrderImportReport> {
        if table.headers.iter().all(|h| h.trim().is_empty()) {
            return Err(ImportError::EmptyFile);
        }

        debug!("步骤 2: 列识别");
        let mapping = FieldMapper.infer_columns(&table.headers)?;
        info!(
            waybill_column = ?mapping.waybill,
            destination_column = %mapping.destination,
            weight_column = %mapping.weight,
            "列识别完成"
        );

        debug!("步骤 3: 行映射与区域归一化");
        let total_rows = table.rows.len();
        let mut orders = Vec::with_capacity(total_rows);
        let mut issues = Vec::new();

        for row in &table.rows {
            let row_number = row.row_number;

            let mapped = match FieldMapper.map_row(&mapping, &row.values) {
                Ok(m) => m,
                Err(message) => {
                    warn!(row_number, error = %message, "行映射失败，已跳过");
                    issues.push(RowIssue {
                        row_number,
                        level: IssueLevel::Skipped,
                        message,
                    });
                    continue;
                }
            };

            let destination = match RegionNormalizer.normalize(&mapped.destination) {
                Some(region) => region.code().to_string(),
                None => {
                    issues.push(RowIssue {
                        row_number,
                        level: IssueLevel::Warning,
                        message: format!("无法识别目的地: {}", mapped.destination),
                    });
                    mapped.destination.clone()
                }
            };

            let waybill_id = mapped
                .waybill_id
                .unwrap_or_else(|| format!("{}{}", self.placeholder_prefix, row_number));

            orders.push(Order {
                waybill_id,
                destination,
                weight: mapped.weight,
            });
        }

        let report = OrderImportReport {
            source: source.to_string(),
            total_rows,
            orders,
            issues,
        };

        info!(
            total_rows = report.total_rows,
            imported = report.orders.len(),
            skipped = report.skipped_count(),
            "订单导入完成"
        );
        Ok(report)
    }
}

#[async_trait]
impl OrderImporter for OrderImporterImpl {
    #[instrument(skip(self), fields(file = %file_path.display()))]
    fn import_file(&self, file_path: &Path) -> ImportResult<OrderImportReport> {
        debug!("步骤 1: 解析文件");
        let table = UniversalFileParser.parse_to_raw_table(file_path)?;
        info!(rows = table.rows.len(), "文件解析完成");

        self.import_table(&file_path.display().to_string(), table)
    }

    async fn import_many(&self, file_paths: Vec<PathBuf>) -> Vec<ImportResult<OrderImportReport>> {
        let tasks = file_paths.into_iter().map(|path| {
            let importer = self.clone();
            tokio::task::spawn_blocking(move || importer.import_file(&path))
        });

        // join_all 保持输入顺序
        futures::future::join_all(tasks)
            .await
            .into_iter()
            .map(|joined| {
                joined.unwrap_or_else(|e| Err(ImportError::InternalError(e.to_string())))
            })
            .collect()
    }
}
