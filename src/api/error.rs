// ==========================================
// 人事档案系统 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，将导入/仓储错误转换为统一响应状态
// ==========================================

use crate::importer::ImportError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 请求错误
    // ==========================================
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    // ==========================================
    // 导入错误（状态码由导入错误决定）
    // ==========================================
    #[error(transparent)]
    Import(#[from] ImportError),

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl ApiError {
    /// HTTP 等价状态码
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::InvalidInput(_) => 400,
            ApiError::NotFound(_) => 404,
            ApiError::Conflict(_) => 409,
            ApiError::Import(e) => e.status_code(),
            ApiError::DatabaseError(_) => 500,
        }
    }

    /// 机器可读错误码
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::InvalidInput(_) => "INVALID_INPUT",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::Import(e) => e.error_code(),
            ApiError::DatabaseError(_) => "DATABASE_ERROR",
        }
    }
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{} `{}` not found.", entity, id))
            }
            RepositoryError::UniqueConstraintViolation(_) => {
                ApiError::Conflict("Duplicate employee ID or email found".to_string())
            }
            RepositoryError::ForeignKeyViolation(msg) => ApiError::InvalidInput(msg),
            RepositoryError::RecordInvalid(violations) => ApiError::InvalidInput(format!(
                "Invalid employee record: {}",
                violations
                    .iter()
                    .map(|v| v.to_string())
                    .collect::<Vec<_>>()
                    .join("; ")
            )),
            RepositoryError::FieldValueError { field, message } => {
                ApiError::InvalidInput(format!("Invalid value for `{}`: {}", field, message))
            }
            RepositoryError::LockError(msg) | RepositoryError::DatabaseQueryError(msg) => {
                ApiError::DatabaseError(msg)
            }
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_conversion() {
        let api_err: ApiError = RepositoryError::UniqueConstraintViolation(
            "UNIQUE constraint failed: employee.employee_id".to_string(),
        )
        .into();
        assert_eq!(api_err.status_code(), 409);

        let api_err: ApiError = RepositoryError::NotFound {
            entity: "Employee".to_string(),
            id: "E404".to_string(),
        }
        .into();
        assert_eq!(api_err.status_code(), 404);
        assert!(api_err.to_string().contains("E404"));

        let api_err: ApiError = RepositoryError::LockError("poisoned".to_string()).into();
        assert_eq!(api_err.status_code(), 500);
    }

    #[test]
    fn test_import_error_keeps_status() {
        let api_err: ApiError = ImportError::MissingReferences {
            missing: vec!["u-1".to_string()],
        }
        .into();
        assert_eq!(api_err.status_code(), 404);
        assert_eq!(api_err.error_code(), "MISSING_REFERENCES");
    }
}
