// ==========================================
// 人事档案系统 - 用户账号 Repository
// ==========================================
// 职责: 用户注册表的数据访问（存在性批量查询 + 验证标记单字段更新）
// 红线: Repository 不含业务规则，只做数据 CRUD
// ==========================================

use crate::db::{ensure_schema, open_sqlite_connection};
use crate::domain::types::Role;
use crate::domain::user::UserAccount;
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// UserAccountRepository Trait
// ==========================================
#[async_trait]
pub trait UserAccountRepository: Send + Sync {
    /// 新增账号
    async fn insert(&self, account: UserAccount) -> RepositoryResult<()>;

    /// 按 ID 查询
    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<UserAccount>>;

    /// 按 ID 集合批量查询（一次查询，只返回存在的账号）
    async fn find_by_ids(&self, ids: &[String]) -> RepositoryResult<Vec<UserAccount>>;

    /// 设置 is_verified = true
    ///
    /// # 返回
    /// - Ok(true): 命中账号（已验证账号重复设置同样返回 true）
    /// - Ok(false): 账号不存在
    async fn mark_verified(&self, id: &str) -> RepositoryResult<bool>;
}

// ==========================================
// UserAccountRepositoryImpl（rusqlite）
// ==========================================
pub struct UserAccountRepositoryImpl {
    conn: Arc<Mutex<Connection>>,
}

impl UserAccountRepositoryImpl {
    /// 打开数据库并建表
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        ensure_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 复用已有连接（调用方负责建表）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn map_row(row: &Row<'_>) -> rusqlite::Result<UserAccount> {
        let role_raw: String = row.get("role")?;
        let role = role_raw.parse::<Role>().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                3,
                rusqlite::types::Type::Text,
                e.into(),
            )
        })?;

        Ok(UserAccount {
            id: row.get("id")?,
            username: row.get("username")?,
            email: row.get("email")?,
            role,
            is_verified: row.get::<_, i64>("is_verified")? != 0,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    fn lock(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }
}

#[async_trait]
impl UserAccountRepository for UserAccountRepositoryImpl {
    async fn insert(&self, account: UserAccount) -> RepositoryResult<()> {
        let conn = self.lock()?;
        conn.execute(
            r#"
            INSERT INTO user_account (id, username, email, role, is_verified, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                account.id,
                account.username,
                account.email,
                account.role.as_str(),
                account.is_verified as i64,
                account.created_at,
                account.updated_at,
            ],
        )?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<UserAccount>> {
        let conn = self.lock()?;
        let account = conn
            .query_row(
                "SELECT * FROM user_account WHERE id = ?1",
                params![id],
                Self::map_row,
            )
            .optional()?;
        Ok(account)
    }

    async fn find_by_ids(&self, ids: &[String]) -> RepositoryResult<Vec<UserAccount>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; ids.len()].join(", ");
        let sql = format!("SELECT * FROM user_account WHERE id IN ({})", placeholders);

        let conn = self.lock()?;
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(ids.iter()), Self::map_row)?;

        let mut accounts = Vec::new();
        for row in rows {
            accounts.push(row?);
        }
        Ok(accounts)
    }

    async fn mark_verified(&self, id: &str) -> RepositoryResult<bool> {
        let conn = self.lock()?;
        let affected = conn.execute(
            "UPDATE user_account SET is_verified = 1, updated_at = ?2 WHERE id = ?1",
            params![id, Utc::now()],
        )?;
        Ok(affected > 0)
    }
}
