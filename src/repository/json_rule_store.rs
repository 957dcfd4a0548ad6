// ==========================================
// 快递运费计算系统 - 本地规则文件存储
// ==========================================
// 用途: 数据库不可用时的本地兜底存储
// 格式: 单个 JSON 数组文件；文件不存在视为空
// ==========================================

use crate::domain::rule::PricingRule;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::rule_store::RuleStore;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub struct JsonFileRuleStore {
    path: PathBuf,
    // 串行化读-改-写
    write_lock: Mutex<()>,
}

impl JsonFileRuleStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> RepositoryResult<Vec<PricingRule>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let raw = fs::read_to_string(&self.path)?;
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&raw)?)
    }

    fn write_all(&self, rules: &[PricingRule]) -> RepositoryResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let raw = serde_json::to_string_pretty(rules)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }

    fn lock(&self) -> RepositoryResult<std::sync::MutexGuard<()>> {
        self.write_lock
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }
}

impl RuleStore for JsonFileRuleStore {
    fn list_rules(&self) -> RepositoryResult<Vec<PricingRule>> {
        let _guard = self.lock()?;
        let mut rules = self.read_all()?;
        rules.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then_with(|| a.id.cmp(&b.id)));
        Ok(rules)
    }

    fn get_rule(&self, rule_id: &str) -> RepositoryResult<Option<PricingRule>> {
        let _guard = self.lock()?;
        Ok(self.read_all()?.into_iter().find(|r| r.id == rule_id))
    }

    fn save_rule(&self, rule: &PricingRule) -> RepositoryResult<()> {
        let _guard = self.lock()?;
        let mut rules = self.read_all()?;
        match rules.iter_mut().find(|r| r.id == rule.id) {
            Some(existing) => *existing = rule.clone(),
            None => rules.push(rule.clone()),
        }
        self.write_all(&rules)
    }

    fn delete_rule(&self, rule_id: &str) -> RepositoryResult<bool> {
        let _guard = self.lock()?;
        let mut rules = self.read_all()?;
        let before = rules.len();
        rules.retain(|r| r.id != rule_id);
        if rules.len() == before {
            return Ok(false);
        }
        self.write_all(&rules)?;
        Ok(true)
    }
}
