// ==========================================
// 快递运费计算系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::db::open_sqlite_connection;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// 运单号缺失时的占位前缀
pub const DEFAULT_WAYBILL_PLACEHOLDER_PREFIX: &str = "未知单号-";

/// 导出金额保留小数位
pub const DEFAULT_MONEY_SCALE: u32 = 2;

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let conn_guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 读取 global scope 的配置值
    pub fn get_global_config_value(&self, key: &str) -> RepositoryResult<Option<String>> {
        let conn = self.get_conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// 写入 global scope 的配置值（存在则覆盖）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }

    /// 删除 global scope 的配置值
    pub fn remove_global_config_value(&self, key: &str) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "DELETE FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
        )?;
        Ok(affected > 0)
    }

    /// 列出 global scope 的全部配置
    pub fn list_global_configs(&self) -> RepositoryResult<BTreeMap<String, String>> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;

        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut configs = BTreeMap::new();
        for row in rows {
            let (key, value) = row?;
            configs.insert(key, value);
        }
        Ok(configs)
    }

    fn get_config_or_default(&self, key: &str, default: &str) -> RepositoryResult<String> {
        Ok(self
            .get_global_config_value(key)?
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| default.to_string()))
    }

    // ===== 导入配置 =====

    /// 运单号占位前缀
    pub fn waybill_placeholder_prefix(&self) -> RepositoryResult<String> {
        self.get_config_or_default(
            config_keys::WAYBILL_PLACEHOLDER_PREFIX,
            DEFAULT_WAYBILL_PLACEHOLDER_PREFIX,
        )
    }

    // ===== 规则存储配置 =====

    /// 本地兜底规则文件路径（未配置返回 None）
    pub fn rule_fallback_path(&self) -> RepositoryResult<Option<PathBuf>> {
        Ok(self
            .get_global_config_value(config_keys::RULE_FALLBACK_PATH)?
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from))
    }

    /// 默认计费规则 ID
    pub fn default_rule_id(&self) -> RepositoryResult<Option<String>> {
        Ok(self
            .get_global_config_value(config_keys::DEFAULT_RULE_ID)?
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty()))
    }

    // ===== 导出配置 =====

    /// 导出金额小数位（格式错误时回退默认值）
    pub fn money_scale(&self) -> RepositoryResult<u32> {
        let value =
            self.get_config_or_default(config_keys::MONEY_SCALE, &DEFAULT_MONEY_SCALE.to_string())?;
        Ok(value.trim().parse::<u32>().unwrap_or_else(|_| {
            tracing::warn!(
                config_key = config_keys::MONEY_SCALE,
                raw_value = %value,
                "金额小数位配置格式错误，使用默认值"
            );
            DEFAULT_MONEY_SCALE
        }))
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 导入
    pub const WAYBILL_PLACEHOLDER_PREFIX: &str = "import.waybill_placeholder_prefix";

    // 规则存储
    pub const RULE_FALLBACK_PATH: &str = "rule.fallback_path";
    pub const DEFAULT_RULE_ID: &str = "freight.default_rule_id";

    // 导出
    pub const MONEY_SCALE: &str = "export.money_scale";
}

#[cfg(test)]
mod tests {
    use super::*;

    fn in_memory() -> ConfigManager {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::init_schema(&conn).unwrap();
        ConfigManager::from_connection(Arc::new(Mutex::new(conn))).unwrap()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = in_memory();
        assert_eq!(
            config.waybill_placeholder_prefix().unwrap(),
            DEFAULT_WAYBILL_PLACEHOLDER_PREFIX
        );
        assert_eq!(config.money_scale().unwrap(), DEFAULT_MONEY_SCALE);
        assert!(config.rule_fallback_path().unwrap().is_none());
        assert!(config.default_rule_id().unwrap().is_none());
    }

    #[test]
    fn test_set_overrides_and_list() {
        let config = in_memory();
        config
            .set_global_config_value(config_keys::WAYBILL_PLACEHOLDER_PREFIX, "ROW-")
            .unwrap();
        config.set_global_config_value(config_keys::MONEY_SCALE, "3").unwrap();
        config.set_global_config_value(config_keys::MONEY_SCALE, "4").unwrap();

        assert_eq!(config.waybill_placeholder_prefix().unwrap(), "ROW-");
        assert_eq!(config.money_scale().unwrap(), 4);
        assert_eq!(config.list_global_configs().unwrap().len(), 2);
    }

    #[test]
    fn test_new_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("config.db").to_string_lossy().to_string();

        ConfigManager::new(&db_path)
            .unwrap()
            .set_global_config_value(config_keys::DEFAULT_RULE_ID, "r1")
            .unwrap();

        let reopened = ConfigManager::new(&db_path).unwrap();
        assert_eq!(reopened.default_rule_id().unwrap().as_deref(), Some("r1"));
    }

    #[test]
    fn test_bad_money_scale_falls_back() {
        let config = in_memory();
        config.set_global_config_value(config_keys::MONEY_SCALE, "two").unwrap();
        assert_eq!(config.money_scale().unwrap(), DEFAULT_MONEY_SCALE);
    }

    #[test]
    fn test_remove_config() {
        let config = in_memory();
        config.set_global_config_value(config_keys::DEFAULT_RULE_ID, "r1").unwrap();
        assert!(config.remove_global_config_value(config_keys::DEFAULT_RULE_ID).unwrap());
        assert!(!config.remove_global_config_value(config_keys::DEFAULT_RULE_ID).unwrap());
    }
}
