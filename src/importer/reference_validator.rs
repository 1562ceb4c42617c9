// ==========================================
// 人事档案系统 - 账号引用校验器
// ==========================================
// 职责: 批次内所有 userAccount 引用必须存在（全有或全无）
// 约束: 一次批量查询；在任何落库之前完成
// ==========================================

use crate::domain::employee::EmployeeRecord;
use crate::importer::error::{ImportError, ImportResult};
use crate::repository::UserAccountRepository;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

pub struct ReferenceValidator<U>
where
    U: UserAccountRepository,
{
    user_repo: Arc<U>,
}

impl<U> ReferenceValidator<U>
where
    U: UserAccountRepository,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    /// 校验批次内的账号引用
    ///
    /// # 返回
    /// - Ok(()): 无引用或全部存在
    /// - Err(MissingReferences): 列出全部缺失的账号 ID（按首次出现顺序，去重）
    pub async fn validate(&self, records: &[EmployeeRecord]) -> ImportResult<()> {
        let requested = collect_references(records);
        if requested.is_empty() {
            debug!("批次不含账号引用，跳过校验");
            return Ok(());
        }

        let found = self.user_repo.find_by_ids(&requested).await?;
        let found_ids: HashSet<&str> = found.iter().map(|u| u.id.as_str()).collect();

        if found_ids.len() >= requested.len() {
            return Ok(());
        }

        let missing: Vec<String> = requested
            .into_iter()
            .filter(|id| !found_ids.contains(id.as_str()))
            .collect();

        warn!(missing = ?missing, "账号引用缺失，整批拒绝");
        Err(ImportError::MissingReferences { missing })
    }
}

/// 去重后的非空账号引用（保持首次出现顺序）
pub fn collect_references(records: &[EmployeeRecord]) -> Vec<String> {
    let mut seen = HashSet::new();
    records
        .iter()
        .filter_map(|r| r.user_account.as_deref())
        .filter(|id| !id.is_empty())
        .filter(|id| seen.insert(*id))
        .map(|id| id.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::ensure_schema;
    use crate::domain::user::UserAccount;
    use crate::repository::UserAccountRepositoryImpl;
    use rusqlite::Connection;
    use std::sync::Mutex;

    async fn setup(existing: &[&str]) -> Arc<UserAccountRepositoryImpl> {
        let conn = Connection::open_in_memory().unwrap();
        ensure_schema(&conn).unwrap();
        let repo = UserAccountRepositoryImpl::from_connection(Arc::new(Mutex::new(conn)));
        for id in existing {
            let mut account = UserAccount::new(&format!("user-{}", id), &format!("{}@corp.test", id));
            account.id = id.to_string();
            repo.insert(account).await.unwrap();
        }
        Arc::new(repo)
    }

    fn with_account(id: Option<&str>) -> EmployeeRecord {
        EmployeeRecord {
            user_account: id.map(|s| s.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_no_references_passes() {
        let validator = ReferenceValidator::new(setup(&[]).await);
        let records = vec![with_account(None), with_account(None)];
        assert!(validator.validate(&records).await.is_ok());
    }

    #[tokio::test]
    async fn test_all_present_passes_with_repeats() {
        let validator = ReferenceValidator::new(setup(&["u-1", "u-2"]).await);
        let records = vec![
            with_account(Some("u-1")),
            with_account(Some("u-1")),
            with_account(Some("u-2")),
        ];
        assert!(validator.validate(&records).await.is_ok());
    }

    #[tokio::test]
    async fn test_missing_ids_reported_exactly() {
        let validator = ReferenceValidator::new(setup(&["u-1"]).await);
        let records = vec![
            with_account(Some("u-9")),
            with_account(Some("u-1")),
            with_account(Some("u-7")),
            with_account(Some("u-9")),
            with_account(None),
        ];

        let err = validator.validate(&records).await.unwrap_err();

        match err {
            ImportError::MissingReferences { missing } => {
                let got: HashSet<String> = missing.iter().cloned().collect();
                let want: HashSet<String> = ["u-9", "u-7"].iter().map(|s| s.to_string()).collect();
                assert_eq!(got, want);
                assert_eq!(missing.len(), 2);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_collect_references_dedups_in_order() {
        let records = vec![
            with_account(Some("b")),
            with_account(Some("a")),
            with_account(Some("b")),
            with_account(Some("")),
        ];
        assert_eq!(collect_references(&records), vec!["b".to_string(), "a".to_string()]);
    }
}
