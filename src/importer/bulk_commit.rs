// ==========================================
// 人事档案系统 - 批量落库协调器
// ==========================================
// 职责: 两阶段落库
// - 主阶段: 无序批量插入（遇错继续，逐条记录失败）
// - 补偿阶段: 对已插入记录引用的账号并发执行 isVerified = true
// 约束: 两阶段之间无事务；补偿阶段尽力而为，可单独重试
// ==========================================

use crate::domain::import::{
    CommitFailure, CommitFailureKind, CommitReport, NormalizedRow, VerificationOutcome,
};
use crate::importer::error::{ImportError, ImportResult};
use crate::repository::{duplicate_field, EmployeeRepository, RepositoryError, UserAccountRepository};
use futures::future::join_all;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, warn};

pub struct BulkCommitCoordinator<E, U>
where
    E: EmployeeRepository,
    U: UserAccountRepository,
{
    employee_repo: Arc<E>,
    user_repo: Arc<U>,
}

impl<E, U> BulkCommitCoordinator<E, U>
where
    E: EmployeeRepository,
    U: UserAccountRepository,
{
    pub fn new(employee_repo: Arc<E>, user_repo: Arc<U>) -> Self {
        Self {
            employee_repo,
            user_repo,
        }
    }

    /// 执行两阶段落库
    ///
    /// # 返回
    /// - Ok(CommitReport): 主阶段已执行（逐条失败记录在 failures 中）
    /// - Err(InternalCommitFailure): 批量插入整体失败（如连接错误）
    pub async fn commit(&self, rows: Vec<NormalizedRow>) -> ImportResult<CommitReport> {
        let row_numbers: Vec<usize> = rows.iter().map(|r| r.row_number).collect();
        let employee_ids: Vec<Option<String>> =
            rows.iter().map(|r| r.record.employee_id.clone()).collect();
        let records = rows.into_iter().map(|r| r.record).collect();

        // === 主阶段 ===
        let outcome = self.employee_repo.insert_many_unordered(records).await?;

        let failures: Vec<CommitFailure> = outcome
            .failures
            .into_iter()
            .map(|f| CommitFailure {
                index: f.index,
                row_number: row_numbers.get(f.index).copied(),
                employee_id: employee_ids.get(f.index).cloned().flatten(),
                kind: classify_failure(f.error),
            })
            .collect();

        info!(
            inserted = outcome.inserted.len(),
            failed = failures.len(),
            "主阶段插入完成"
        );

        // === 补偿阶段 ===
        let mut seen = HashSet::new();
        let accounts: Vec<String> = outcome
            .inserted
            .iter()
            .filter_map(|e| e.record.user_account.clone())
            .filter(|id| seen.insert(id.clone()))
            .collect();

        let verifications = self.verify_accounts(accounts).await;

        Ok(CommitReport {
            inserted: outcome.inserted,
            failures,
            verifications,
        })
    }

    /// 并发标记账号已验证（幂等，互不影响）
    pub async fn verify_accounts(&self, account_ids: Vec<String>) -> Vec<VerificationOutcome> {
        if account_ids.is_empty() {
            return Vec::new();
        }

        let updates = account_ids.into_iter().map(|id| {
            let user_repo = Arc::clone(&self.user_repo);
            async move {
                match user_repo.mark_verified(&id).await {
                    Ok(true) => VerificationOutcome {
                        user_account: id,
                        verified: true,
                        error: None,
                    },
                    Ok(false) => VerificationOutcome {
                        user_account: id,
                        verified: false,
                        error: Some("user account not found".to_string()),
                    },
                    Err(e) => {
                        warn!(user_account = %id, error = %e, "账号验证更新失败");
                        VerificationOutcome {
                            user_account: id,
                            verified: false,
                            error: Some(e.to_string()),
                        }
                    }
                }
            }
        });

        let outcomes = join_all(updates).await;
        let verified = outcomes.iter().filter(|o| o.verified).count();
        info!(verified, total = outcomes.len(), "补偿阶段完成");
        outcomes
    }

    /// 仅重试补偿阶段中未成功的账号
    pub async fn retry_verifications(&self, report: &CommitReport) -> Vec<VerificationOutcome> {
        self.verify_accounts(report.pending_verifications()).await
    }
}

/// 逐条失败分类
fn classify_failure(error: RepositoryError) -> CommitFailureKind {
    if let Some(field) = duplicate_field(&error) {
        return CommitFailureKind::DuplicateKey {
            field: field.as_str().to_string(),
        };
    }
    match error {
        RepositoryError::UniqueConstraintViolation(msg) => CommitFailureKind::DuplicateKey { field: msg },
        RepositoryError::RecordInvalid(violations) => CommitFailureKind::Validation { violations },
        other => CommitFailureKind::Storage {
            message: other.to_string(),
        },
    }
}

/// 从落库结果中选出对外报告的主错误
///
/// 优先级: DuplicateKey (409) > Validation (400) > Storage (500)
pub fn primary_error(report: &CommitReport) -> Option<ImportError> {
    let duplicate = report.failures.iter().find_map(|f| match &f.kind {
        CommitFailureKind::DuplicateKey { field } => Some(ImportError::DuplicateKey {
            field: field.clone(),
            employee_id: f.employee_id.clone(),
        }),
        _ => None,
    });
    if duplicate.is_some() {
        return duplicate;
    }

    let validation = report.failures.iter().find_map(|f| match &f.kind {
        CommitFailureKind::Validation { violations } => Some(ImportError::RecordValidation {
            row: f.row_number,
            message: violations
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join("; "),
        }),
        _ => None,
    });
    if validation.is_some() {
        return validation;
    }

    report.failures.iter().find_map(|f| match &f.kind {
        CommitFailureKind::Storage { message } => {
            Some(ImportError::InternalCommitFailure(message.clone()))
        }
        _ => None,
    })
}
