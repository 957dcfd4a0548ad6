// ==========================================
// 快递运费计算系统 - 计费规则数据仓储
// ==========================================
// 存储: pricing_rule 表（键值记录: rule_id → payload_json）
// name/mode/时间戳冗余为列，便于列表排序（时间戳定长，字符串序即时间序）
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::rule::PricingRule;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::rule_store::RuleStore;
use chrono::SecondsFormat;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

// ==========================================
// SqliteRuleRepository - 规则仓储
// ==========================================
pub struct SqliteRuleRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteRuleRepository {
    /// 创建新的 SqliteRuleRepository 实例
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例（调用方负责建表）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 规则数量
    pub fn count(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM pricing_rule", [], |row| row.get(0))?;
        Ok(n)
    }
}

fn decode_payload(rule_id: &str, payload: &str) -> RepositoryResult<PricingRule> {
    serde_json::from_str(payload).map_err(|e| {
        RepositoryError::SerializationError(format!("rule_id={}: {}", rule_id, e))
    })
}

impl RuleStore for SqliteRuleRepository {
    fn list_rules(&self) -> RepositoryResult<Vec<PricingRule>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT rule_id, payload_json
            FROM pricing_rule
            ORDER BY updated_at DESC, rule_id ASC
            "#,
        )?;

        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.iter()
            .map(|(id, payload)| decode_payload(id, payload))
            .collect()
    }

    fn get_rule(&self, rule_id: &str) -> RepositoryResult<Option<PricingRule>> {
        let conn = self.get_conn()?;
        let payload: Option<String> = conn
            .query_row(
                "SELECT payload_json FROM pricing_rule WHERE rule_id = ?1",
                params![rule_id],
                |row| row.get(0),
            )
            .optional()?;

        payload.map(|p| decode_payload(rule_id, &p)).transpose()
    }

    fn save_rule(&self, rule: &PricingRule) -> RepositoryResult<()> {
        let payload = serde_json::to_string(rule)?;
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO pricing_rule (rule_id, name, mode, payload_json, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(rule_id) DO UPDATE SET
                name = excluded.name,
                mode = excluded.mode,
                payload_json = excluded.payload_json,
                created_at = excluded.created_at,
                updated_at = excluded.updated_at
            "#,
            params![
                rule.id,
                rule.name,
                rule.mode().to_db_str(),
                payload,
                rule.created_at.to_rfc3339_opts(SecondsFormat::Nanos, true),
                rule.updated_at.to_rfc3339_opts(SecondsFormat::Nanos, true),
            ],
        )?;
        Ok(())
    }

    fn delete_rule(&self, rule_id: &str) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM pricing_rule WHERE rule_id = ?1", params![rule_id])?;
        Ok(affected > 0)
    }
}
