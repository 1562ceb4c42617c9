// ==========================================
// 人事档案系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::import_config_trait::ImportConfigReader;
use crate::db::{configure_sqlite_connection, ensure_schema, open_sqlite_connection};
use crate::domain::types::{EmploymentStatus, EmploymentType};
use crate::repository::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// 配置键
pub mod config_keys {
    pub const DEFAULT_EMPLOYMENT_TYPE: &str = "import/default_employment_type";
    pub const DEFAULT_STATUS: &str = "import/default_status";
    pub const MAX_UPLOAD_BYTES: &str = "upload/max_file_bytes";
    pub const UPLOAD_DIR: &str = "upload/dir";
}

/// 内置默认值
pub mod config_defaults {
    pub const DEFAULT_EMPLOYMENT_TYPE: &str = "Full-time";
    pub const DEFAULT_STATUS: &str = "Active";
    pub const MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;
    pub const UPLOAD_DIR: &str = "uploads";
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        ensure_schema(&conn)?;

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
            configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    fn get_config_value(&self, key: &str) -> RepositoryResult<Option<String>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;

        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;

        Ok(value)
    }

    /// 从 config_kv 表读取配置值，带默认值
    fn get_config_or_default(&self, key: &str, default: &str) -> RepositoryResult<String> {
        Ok(self
            .get_config_value(key)?
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| default.to_string()))
    }

    /// 写入 global scope 配置（UPSERT）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;

        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }
}

fn invalid_value(key: &str, message: String) -> RepositoryError {
    RepositoryError::FieldValueError {
        field: key.to_string(),
        message,
    }
}

#[async_trait]
impl ImportConfigReader for ConfigManager {
    async fn get_default_employment_type(&self) -> RepositoryResult<EmploymentType> {
        let key = config_keys::DEFAULT_EMPLOYMENT_TYPE;
        self.get_config_or_default(key, config_defaults::DEFAULT_EMPLOYMENT_TYPE)?
            .parse::<EmploymentType>()
            .map_err(|e| invalid_value(key, e))
    }

    async fn get_default_status(&self) -> RepositoryResult<EmploymentStatus> {
        let key = config_keys::DEFAULT_STATUS;
        self.get_config_or_default(key, config_defaults::DEFAULT_STATUS)?
            .parse::<EmploymentStatus>()
            .map_err(|e| invalid_value(key, e))
    }

    async fn get_max_upload_bytes(&self) -> RepositoryResult<u64> {
        let key = config_keys::MAX_UPLOAD_BYTES;
        match self.get_config_value(key)? {
            None => Ok(config_defaults::MAX_UPLOAD_BYTES),
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|e| invalid_value(key, format!("无法解析为整数: {} ({})", raw, e))),
        }
    }

    async fn get_upload_dir(&self) -> RepositoryResult<PathBuf> {
        let dir = self.get_config_or_default(config_keys::UPLOAD_DIR, config_defaults::UPLOAD_DIR)?;
        Ok(PathBuf::from(dir))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> ConfigManager {
        let conn = Connection::open_in_memory().unwrap();
        ensure_schema(&conn).unwrap();
        ConfigManager::from_connection(Arc::new(Mutex::new(conn))).unwrap()
    }

    #[tokio::test]
    async fn test_defaults_when_unset() {
        let config = setup();
        assert_eq!(config.get_default_employment_type().await.unwrap(), EmploymentType::FullTime);
        assert_eq!(config.get_default_status().await.unwrap(), EmploymentStatus::Active);
        assert_eq!(config.get_max_upload_bytes().await.unwrap(), 5 * 1024 * 1024);
        assert_eq!(config.get_upload_dir().await.unwrap(), PathBuf::from("uploads"));
    }

    #[tokio::test]
    async fn test_override_and_invalid_value() {
        let config = setup();
        config
            .set_global_config_value(config_keys::DEFAULT_EMPLOYMENT_TYPE, "Contract")
            .unwrap();
        assert_eq!(config.get_default_employment_type().await.unwrap(), EmploymentType::Contract);

        config
            .set_global_config_value(config_keys::MAX_UPLOAD_BYTES, "lots")
            .unwrap();
        assert!(matches!(
            config.get_max_upload_bytes().await,
            Err(RepositoryError::FieldValueError { .. })
        ));
    }
}
