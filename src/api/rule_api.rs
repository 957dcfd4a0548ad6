// ==========================================
// 快递运费计算系统 - 计费规则管理 API
// ==========================================
// 职责: 规则的新建、编辑、删除、查询
// 约束: 新建生成唯一 ID 与当前时间；编辑保留 ID 与创建时间
// ==========================================

use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult};
use crate::api::validator::RuleValidator;
use crate::domain::rule::{PricingRule, RuleDraft};
use crate::repository::rule_store::RuleStore;

/// 规则导入文件: 单个草稿或草稿数组
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DraftFile {
    Many(Vec<RuleDraft>),
    One(Box<RuleDraft>),
}

// ==========================================
// RuleApi - 计费规则管理 API
// ==========================================
pub struct RuleApi {
    store: Arc<dyn RuleStore>,
}

impl RuleApi {
    /// 创建新的RuleApi实例
    pub fn new(store: Arc<dyn RuleStore>) -> Self {
        Self { store }
    }

    /// 查询全部规则（最近更新在前）
    pub fn list_rules(&self) -> ApiResult<Vec<PricingRule>> {
        Ok(self.store.list_rules()?)
    }

    /// 按 ID 查询规则
    ///
    /// # 返回
    /// - Ok(PricingRule)
    /// - Err(NotFound): 规则不存在
    pub fn get_rule(&self, rule_id: &str) -> ApiResult<PricingRule> {
        let rule_id = rule_id.trim();
        if rule_id.is_empty() {
            return Err(ApiError::InvalidInput("规则ID不能为空".to_string()));
        }

        self.store
            .get_rule(rule_id)?
            .ok_or_else(|| ApiError::NotFound(format!("计费规则(id={})不存在", rule_id)))
    }

    /// 新建规则
    pub fn create_rule(&self, draft: RuleDraft) -> ApiResult<PricingRule> {
        RuleValidator.validate(&draft)?;

        let now = Utc::now();
        let rule = draft.into_rule(Uuid::new_v4().to_string(), now, now);
        self.store.save_rule(&rule)?;

        info!(rule_id = %rule.id, rule_name = %rule.name, mode = %rule.mode(), "计费规则已创建");
        Ok(rule)
    }

    /// 编辑规则（原地更新）
    pub fn update_rule(&self, rule_id: &str, draft: RuleDraft) -> ApiResult<PricingRule> {
        let existing = self.get_rule(rule_id)?;
        RuleValidator.validate(&draft)?;

        // 更新时间不早于创建时间
        let updated_at = Utc::now().max(existing.created_at);
        let rule = draft.into_rule(existing.id, existing.created_at, updated_at);
        self.store.save_rule(&rule)?;

        info!(rule_id = %rule.id, rule_name = %rule.name, "计费规则已更新");
        Ok(rule)
    }

    /// 删除规则
    pub fn delete_rule(&self, rule_id: &str) -> ApiResult<()> {
        let rule_id = rule_id.trim();
        if !self.store.delete_rule(rule_id)? {
            return Err(ApiError::NotFound(format!("计费规则(id={})不存在", rule_id)));
        }

        info!(rule_id = %rule_id, "计费规则已删除");
        Ok(())
    }

    /// 从 JSON 文本批量新建规则（单个草稿或数组）
    pub fn import_drafts_json(&self, json: &str) -> ApiResult<Vec<PricingRule>> {
        let drafts = match serde_json::from_str::<DraftFile>(json)
            .map_err(|e| ApiError::InvalidInput(format!("规则 JSON 格式错误: {}", e)))?
        {
            DraftFile::Many(drafts) => drafts,
            DraftFile::One(draft) => vec![*draft],
        };

        // 全部校验通过后再落库
        for draft in &drafts {
            RuleValidator.validate(draft)?;
        }
        drafts.into_iter().map(|d| self.create_rule(d)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::json_rule_store::JsonFileRuleStore;

    fn api() -> (tempfile::TempDir, RuleApi) {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileRuleStore::new(dir.path().join("rules.json"));
        (dir, RuleApi::new(Arc::new(store)))
    }

    const FLAT_DRAFT: &str = r#"{
        "name": "华东",
        "mode": "flat_plus_rate",
        "fixedPrices": {"SH": 5},
        "weightRates": {"SH": 3}
    }"#;

    #[test]
    fn test_import_single_and_array() {
        let (_dir, api) = api();
        assert_eq!(api.import_drafts_json(FLAT_DRAFT).unwrap().len(), 1);

        let many = format!("[{},{}]", FLAT_DRAFT, FLAT_DRAFT);
        assert_eq!(api.import_drafts_json(&many).unwrap().len(), 2);
        assert_eq!(api.list_rules().unwrap().len(), 3);
    }

    #[test]
    fn test_import_rejects_bad_json() {
        let (_dir, api) = api();
        assert!(matches!(
            api.import_drafts_json("{not json"),
            Err(ApiError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_get_rule_blank_id() {
        let (_dir, api) = api();
        assert!(matches!(api.get_rule("  "), Err(ApiError::InvalidInput(_))));
    }
}
