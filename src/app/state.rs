// ==========================================
// 快递运费计算系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// ==========================================

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::api::{ApiError, ApiResult, FreightApi, RuleApi};
use crate::config::config_manager::ConfigManager;
use crate::db::{open_sqlite_connection, read_schema_version};
use crate::exporter::ResultExporter;
use crate::importer::OrderImporterImpl;
use crate::repository::{FallbackRuleStore, JsonFileRuleStore, RuleStore, SqliteRuleRepository};

/// 数据库路径环境变量
pub const DB_PATH_ENV: &str = "FREIGHT_DB_PATH";

/// 应用状态
///
/// 包含所有API实例和共享资源
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 配置管理器
    pub config: Arc<ConfigManager>,

    /// 计费规则管理API
    pub rule_api: Arc<RuleApi>,

    /// 运费计算API
    pub freight_api: Arc<FreightApi>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 说明
    /// 该方法会：
    /// 1. 打开共享数据库连接并初始化表结构
    /// 2. 组装规则存储（配置了兜底文件时主库失败回退到本地 JSON）
    /// 3. 按配置创建导入器、导出器与 API 实例
    ///
    /// 配置项在创建时读取，运行期间修改需重新创建
    pub fn new(db_path: String) -> ApiResult<Self> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        if let Some(parent) = PathBuf::from(&db_path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    ApiError::DatabaseConnectionError(format!("无法创建数据库目录: {}", e))
                })?;
            }
        }

        let conn = open_sqlite_connection(&db_path)
            .map_err(|e| ApiError::DatabaseConnectionError(format!("无法打开数据库: {}", e)))?;
        if let Ok(Some(version)) = read_schema_version(&conn) {
            tracing::debug!(schema_version = version, "数据库表结构就绪");
        }
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 配置
        // ==========================================
        let config = Arc::new(ConfigManager::from_connection(conn.clone())?);

        // ==========================================
        // 规则存储
        // ==========================================
        let sqlite_store: Arc<dyn RuleStore> = Arc::new(SqliteRuleRepository::from_connection(conn));
        let rule_store: Arc<dyn RuleStore> = match config.rule_fallback_path()? {
            Some(path) => {
                tracing::info!("规则兜底文件: {}", path.display());
                Arc::new(FallbackRuleStore::new(
                    sqlite_store,
                    Arc::new(JsonFileRuleStore::new(path)),
                ))
            }
            None => sqlite_store,
        };

        // ==========================================
        // API
        // ==========================================
        let rule_api = Arc::new(RuleApi::new(rule_store));
        let freight_api = Arc::new(FreightApi::new(
            rule_api.clone(),
            OrderImporterImpl::new(config.waybill_placeholder_prefix()?),
            ResultExporter::new(config.money_scale()?),
        ));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            config,
            rule_api,
            freight_api,
        })
    }

    /// 获取数据库路径
    pub fn get_db_path(&self) -> &str {
        &self.db_path
    }

    /// 确定本次计算使用的规则: 显式指定优先，其次为配置的默认规则
    pub fn resolve_rule_id(&self, explicit: Option<&str>) -> ApiResult<String> {
        if let Some(id) = explicit.map(str::trim).filter(|id| !id.is_empty()) {
            return Ok(id.to_string());
        }

        self.config.default_rule_id()?.ok_or_else(|| {
            ApiError::InvalidInput("未指定计费规则，且未配置默认规则 (freight.default_rule_id)".to_string())
        })
    }

    /// 单票报价的运单号: 显式指定优先，否则按导入规则生成占位单号（第 1 行）
    pub fn quote_waybill_id(&self, explicit: Option<&str>) -> ApiResult<String> {
        if let Some(id) = explicit.map(str::trim).filter(|id| !id.is_empty()) {
            return Ok(id.to_string());
        }

        Ok(format!("{}1", self.config.waybill_placeholder_prefix()?))
    }
}

/// 获取默认数据库路径
///
/// 优先读取 FREIGHT_DB_PATH；否则使用用户数据目录下的 freight-calc/freight.db
pub fn get_default_db_path() -> String {
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let path = match dirs::data_dir() {
        Some(data_dir) => data_dir.join("freight-calc").join("freight.db"),
        None => PathBuf::from("./freight.db"),
    };

    path.to_string_lossy().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::config_keys;

    #[test]
    fn test_get_default_db_path() {
        let path = get_default_db_path();
        assert!(!path.is_empty());
        assert!(path.ends_with(".db"));
    }

    #[test]
    fn test_resolve_rule_id_prefers_explicit() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("nested").join("freight.db");
        let state = AppState::new(db.to_string_lossy().to_string()).unwrap();

        assert!(matches!(state.resolve_rule_id(None), Err(ApiError::InvalidInput(_))));

        state
            .config
            .set_global_config_value(config_keys::DEFAULT_RULE_ID, "r-default")
            .unwrap();
        assert_eq!(state.resolve_rule_id(None).unwrap(), "r-default");
        assert_eq!(state.resolve_rule_id(Some(" r1 ")).unwrap(), "r1");
        assert_eq!(state.resolve_rule_id(Some("")).unwrap(), "r-default");
    }

    #[test]
    fn test_quote_waybill_id_uses_placeholder_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("freight.db");
        let state = AppState::new(db.to_string_lossy().to_string()).unwrap();
        assert_eq!(state.get_db_path(), db.to_string_lossy().as_ref());

        assert_eq!(state.quote_waybill_id(Some(" SF9 ")).unwrap(), "SF9");

        state
            .config
            .set_global_config_value(config_keys::WAYBILL_PLACEHOLDER_PREFIX, "NO-")
            .unwrap();
        assert_eq!(state.quote_waybill_id(None).unwrap(), "NO-1");
        assert_eq!(state.quote_waybill_id(Some("  ")).unwrap(), "NO-1");
    }
}
