// ==========================================
// 人事档案系统 - 员工档案 API
// ==========================================
// 职责: 文件批量导入、单条录入、查询
// 说明: 所有入口均返回统一响应信封（错误在此处收敛）
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::api::response::ApiResponse;
use crate::config::ImportSettings;
use crate::domain::employee::{ContactInfo, Employee, EmployeeRecord, EmploymentInfo};
use crate::domain::import::{CommitReport, ImportReport, VerificationOutcome};
use crate::domain::types::{Gender, Lenient};
use crate::importer::{
    primary_error, BulkCommitCoordinator, EmployeeImporter, EmployeeImporterImpl, TempUpload,
    UploadIntake,
};
use crate::repository::{EmployeeRepository, RepositoryError, UserAccountRepository};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// 单条录入请求体
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmployeeRequest {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub employee_id: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<Lenient<NaiveDate>>,
    #[serde(default)]
    pub gender: Option<Lenient<Gender>>,
    #[serde(default)]
    pub nationality: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub employment_info: Option<EmploymentInfo>,
    #[serde(default)]
    pub contact_info: Option<ContactInfo>,
    #[serde(default)]
    pub user_account: Option<String>,
}

impl CreateEmployeeRequest {
    /// 必填项检查（fullName / employeeId / dateOfBirth / employmentInfo / contactInfo）
    fn into_record(self) -> ApiResult<EmployeeRecord> {
        let present = |s: &Option<String>| s.as_deref().map_or(false, |v| !v.trim().is_empty());

        match (self.employment_info, self.contact_info) {
            (Some(employment_info), Some(contact_info))
                if present(&self.full_name)
                    && present(&self.employee_id)
                    && self.date_of_birth.is_some() =>
            {
                Ok(EmployeeRecord {
                    employee_id: self.employee_id,
                    user_account: self.user_account.filter(|u| !u.trim().is_empty()),
                    full_name: self.full_name,
                    date_of_birth: self.date_of_birth,
                    gender: self.gender,
                    nationality: self.nationality,
                    photo_url: self.photo_url,
                    employment_info,
                    contact_info,
                })
            }
            _ => Err(ApiError::InvalidInput(
                "Missing required fields for manual entry.".to_string(),
            )),
        }
    }
}

// ==========================================
// EmployeeApi
// ==========================================
pub struct EmployeeApi<E, U>
where
    E: EmployeeRepository + 'static,
    U: UserAccountRepository + 'static,
{
    employee_repo: Arc<E>,
    user_repo: Arc<U>,
    importer: EmployeeImporterImpl<E, U>,
    verifier: BulkCommitCoordinator<E, U>,
    intake: UploadIntake,
}

impl<E, U> EmployeeApi<E, U>
where
    E: EmployeeRepository + 'static,
    U: UserAccountRepository + 'static,
{
    pub fn new(employee_repo: Arc<E>, user_repo: Arc<U>, settings: ImportSettings) -> Self {
        Self {
            importer: EmployeeImporterImpl::new(
                Arc::clone(&employee_repo),
                Arc::clone(&user_repo),
                settings.defaults,
            ),
            verifier: BulkCommitCoordinator::new(Arc::clone(&employee_repo), Arc::clone(&user_repo)),
            intake: UploadIntake::new(settings.upload),
            employee_repo,
            user_repo,
        }
    }

    // ==========================================
    // 文件批量导入
    // ==========================================

    /// 导入上传内容
    ///
    /// # 参数
    /// - original_name: 上传时的文件名（决定解码器）
    /// - mime_type: 上传声明的 MIME 类型
    /// - bytes: 文件内容
    pub async fn import_employees(&self, original_name: &str, mime_type: &str, bytes: &[u8]) -> ApiResponse {
        match self.intake.accept(original_name, mime_type, bytes) {
            Ok(upload) => self.import_upload(upload).await,
            Err(e) => ApiError::from(e).into(),
        }
    }

    /// 导入本地文件（复制暂存后导入，原文件保留）
    pub async fn import_local_file(&self, path: &Path, mime_type: &str) -> ApiResponse {
        match self.intake.accept_file(path, mime_type) {
            Ok(upload) => self.import_upload(upload).await,
            Err(e) => ApiError::from(e).into(),
        }
    }

    async fn import_upload(&self, upload: TempUpload) -> ApiResponse {
        match self.importer.import_upload(upload).await {
            Ok(report) => Self::import_response(report),
            Err(e) => ApiError::from(e).into(),
        }
    }

    /// 落库结果 → 响应
    ///
    /// 存在逐条失败时返回主错误，已提交的记录仍列在 employees 中
    fn import_response(report: ImportReport) -> ApiResponse {
        let ImportReport {
            batch_id, commit, ..
        } = report;

        match primary_error(&commit) {
            None => ApiResponse::created(format!(
                "{} employees created successfully",
                commit.inserted.len()
            ))
            .with_employees(commit.inserted)
            .with_verifications(commit.verifications),
            Some(err) => ApiResponse::from(ApiError::from(err))
                .with_details(json!({
                    "batchId": batch_id,
                    "committed": commit.inserted.len(),
                    "failures": commit.failures,
                }))
                .with_employees(commit.inserted)
                .with_verifications(commit.verifications),
        }
    }

    /// 重试未成功的账号验证更新
    pub async fn retry_verifications(&self, previous: &[VerificationOutcome]) -> ApiResponse {
        let report = CommitReport {
            verifications: previous.to_vec(),
            ..Default::default()
        };
        let outcomes = self.verifier.retry_verifications(&report).await;
        let pending = outcomes.iter().filter(|o| !o.verified).count();

        ApiResponse::ok(format!(
            "{} account verifications retried, {} still pending",
            outcomes.len(),
            pending
        ))
        .with_verifications(outcomes)
    }

    // ==========================================
    // 单条录入
    // ==========================================

    pub async fn create_employee(&self, request: CreateEmployeeRequest) -> ApiResponse {
        match self.try_create_employee(request).await {
            Ok((employee, verifications)) => ApiResponse::created("Employee created successfully")
                .with_employee(employee)
                .with_verifications(verifications),
            Err(e) => e.into(),
        }
    }

    async fn try_create_employee(
        &self,
        request: CreateEmployeeRequest,
    ) -> ApiResult<(Employee, Vec<VerificationOutcome>)> {
        let record = request.into_record()?;

        if let Some(account) = &record.user_account {
            if self.user_repo.find_by_id(account).await?.is_none() {
                return Err(ApiError::NotFound("User account not found.".to_string()));
            }
        }

        let employee = self.employee_repo.insert_one(record).await.map_err(|e| match e {
            RepositoryError::UniqueConstraintViolation(_) => {
                ApiError::Conflict("Duplicate employee ID or email found.".to_string())
            }
            other => other.into(),
        })?;
        info!(employee_id = ?employee.record.employee_id, "员工档案已创建");

        let verifications = match &employee.record.user_account {
            Some(account) => {
                let outcomes = self.verifier.verify_accounts(vec![account.clone()]).await;
                if outcomes.iter().any(|o| !o.verified) {
                    warn!(user_account = %account, "账号验证更新未成功，可稍后重试");
                }
                outcomes
            }
            None => Vec::new(),
        };

        Ok((employee, verifications))
    }

    // ==========================================
    // 查询
    // ==========================================

    pub async fn list_employees(&self) -> ApiResponse {
        match self.employee_repo.list_all().await {
            Ok(employees) => ApiResponse::ok(format!("{} employees found", employees.len()))
                .with_employees(employees),
            Err(e) => ApiError::from(e).into(),
        }
    }

    pub async fn get_employee(&self, employee_id: &str) -> ApiResponse {
        match self.employee_repo.find_by_employee_id(employee_id).await {
            Ok(Some(employee)) => ApiResponse::ok("Employee details").with_employee(employee),
            Ok(None) => ApiError::NotFound("Employee not found.".to_string()).into(),
            Err(e) => ApiError::from(e).into(),
        }
    }
}
