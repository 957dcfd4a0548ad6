// ==========================================
// 快递运费计算系统 - 运费计算 API
// ==========================================
// 职责: 单票报价、订单文件批量计算、结果导出
// 说明: 规则加载失败、文件解析失败以 Err 返回（计算无法开始）；
//       单票失败写入 CalculationResult.error，不中断批量
// ==========================================

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::api::error::ApiResult;
use crate::api::rule_api::RuleApi;
use crate::domain::order::{BatchResult, CalculationResult, Order};
use crate::engine::{calculate_batch, calculate_freight};
use crate::exporter::ResultExporter;
use crate::importer::{OrderImportReport, OrderImporter, OrderImporterImpl};

/// 单个订单文件的计算结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileQuote {
    /// 导入报告（含跳过行与警告）
    pub import: OrderImportReport,
    /// 批量计算结果
    pub batch: BatchResult,
}

// ==========================================
// FreightApi - 运费计算 API
// ==========================================
pub struct FreightApi {
    rule_api: Arc<RuleApi>,
    importer: OrderImporterImpl,
    exporter: ResultExporter,
}

impl FreightApi {
    pub fn new(rule_api: Arc<RuleApi>, importer: OrderImporterImpl, exporter: ResultExporter) -> Self {
        Self {
            rule_api,
            importer,
            exporter,
        }
    }

    /// 单票报价
    ///
    /// # 返回
    /// - Ok(CalculationResult): 计算结果（价格缺失等问题记录在 error 字段）
    /// - Err(NotFound): 规则不存在
    pub fn quote(&self, rule_id: &str, order: &Order) -> ApiResult<CalculationResult> {
        let rule = self.rule_api.get_rule(rule_id)?;
        Ok(calculate_freight(&rule, order))
    }

    /// 导入订单文件并按规则批量计算
    #[instrument(skip(self, path), fields(file = %path.as_ref().display()))]
    pub fn quote_file<P: AsRef<Path>>(&self, rule_id: &str, path: P) -> ApiResult<FileQuote> {
        let rule = self.rule_api.get_rule(rule_id)?;
        let import = self.importer.import_file(path.as_ref())?;
        let batch = calculate_batch(&rule, &import.orders);

        Ok(FileQuote { import, batch })
    }

    /// 批量计算并导出结果（按输出扩展名选择 CSV/JSON）
    pub fn quote_file_to<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        rule_id: &str,
        input: P,
        output: Q,
    ) -> ApiResult<FileQuote> {
        let quote = self.quote_file(rule_id, input)?;
        self.exporter.export_to_path(&quote.batch, output)?;
        Ok(quote)
    }

    /// 并发导入多个订单文件并逐个计算（结果顺序与输入一致）
    ///
    /// 规则不存在时整体失败；单个文件解析失败只影响该文件
    pub async fn quote_files(
        &self,
        rule_id: &str,
        paths: Vec<PathBuf>,
    ) -> ApiResult<Vec<ApiResult<FileQuote>>> {
        let rule = self.rule_api.get_rule(rule_id)?;
        let file_count = paths.len();

        let quotes: Vec<ApiResult<FileQuote>> = self
            .importer
            .import_many(paths)
            .await
            .into_iter()
            .map(|imported| -> ApiResult<FileQuote> {
                let import = imported?;
                let batch = calculate_batch(&rule, &import.orders);
                Ok(FileQuote { import, batch })
            })
            .collect();

        info!(
            rule_id = %rule.id,
            file_count,
            failed_files = quotes.iter().filter(|q| q.is_err()).count(),
            "多文件计算完成"
        );
        Ok(quotes)
    }

    /// 导出器（CLI 按需写出已有结果）
    pub fn exporter(&self) -> &ResultExporter {
        &self.exporter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::error::ApiError;
    use crate::repository::json_rule_store::JsonFileRuleStore;
    use rust_decimal::Decimal;

    fn setup() -> (tempfile::TempDir, Arc<RuleApi>, FreightApi) {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileRuleStore::new(dir.path().join("rules.json"));
        let rule_api = Arc::new(RuleApi::new(Arc::new(store)));
        let api = FreightApi::new(
            rule_api.clone(),
            OrderImporterImpl::default(),
            ResultExporter::default(),
        );
        (dir, rule_api, api)
    }

    #[test]
    fn test_quote_unknown_rule_is_not_found() {
        let (_dir, _rules, api) = setup();
        let order = Order::new("SF1", "BJ", Decimal::ONE);
        assert!(matches!(api.quote("missing", &order), Err(ApiError::NotFound(_))));
    }

    #[test]
    fn test_quote_file_missing_file_is_import_error() {
        let (dir, rules, api) = setup();
        let rule = rules
            .import_drafts_json(
                r#"{"name":"r","mode":"flat_plus_rate","fixedPrices":{},"weightRates":{}}"#,
            )
            .unwrap()
            .remove(0);

        let result = api.quote_file(&rule.id, dir.path().join("none.csv"));
        assert!(matches!(result, Err(ApiError::ImportError(_))));
    }
}
