// ==========================================
// 人事档案系统 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 错误消息面向 API 调用方，status_code() 给出 HTTP 等价状态码
// ==========================================

use crate::repository::RepositoryError;
use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 上传受理错误 =====
    #[error("Uploaded file path is missing: {0}")]
    FileNotFound(String),

    #[error("Invalid file type `{0}`. Only .xlsx and .csv files are allowed.")]
    UploadRejected(String),

    #[error("File too large: {size} bytes exceeds the {max} byte limit")]
    FileTooLarge { size: u64, max: u64 },

    #[error("Failed to read uploaded file: {0}")]
    FileReadError(String),

    // ===== 解码错误 =====
    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),

    #[error("The uploaded file does not contain a valid worksheet: {0}")]
    InvalidWorksheet(String),

    #[error("Failed to parse file{}: {message}", .row.map(|r| format!(" (row {})", r)).unwrap_or_default())]
    ParseFailure { row: Option<usize>, message: String },

    // ===== 引用校验错误 =====
    #[error("One or more user accounts not found. Missing IDs: {}", .missing.join(", "))]
    MissingReferences { missing: Vec<String> },

    // ===== 落库错误 =====
    #[error("Duplicate employee ID or email found in file ({field}{})", .employee_id.as_ref().map(|id| format!(", employee {}", id)).unwrap_or_default())]
    DuplicateKey {
        field: String,
        employee_id: Option<String>,
    },

    #[error("Invalid employee record{}: {message}", .row.map(|r| format!(" at row {}", r)).unwrap_or_default())]
    RecordValidation { row: Option<usize>, message: String },

    #[error("File processing failed: {0}")]
    InternalCommitFailure(String),
}

impl ImportError {
    /// HTTP 等价状态码
    pub fn status_code(&self) -> u16 {
        match self {
            ImportError::FileNotFound(_)
            | ImportError::UploadRejected(_)
            | ImportError::FileTooLarge { .. }
            | ImportError::UnsupportedFormat(_)
            | ImportError::InvalidWorksheet(_)
            | ImportError::ParseFailure { .. }
            | ImportError::RecordValidation { .. } => 400,
            ImportError::MissingReferences { .. } => 404,
            ImportError::DuplicateKey { .. } => 409,
            ImportError::FileReadError(_) | ImportError::InternalCommitFailure(_) => 500,
        }
    }

    /// 机器可读错误码
    pub fn error_code(&self) -> &'static str {
        match self {
            ImportError::FileNotFound(_) => "FILE_NOT_FOUND",
            ImportError::UploadRejected(_) => "UPLOAD_REJECTED",
            ImportError::FileTooLarge { .. } => "FILE_TOO_LARGE",
            ImportError::FileReadError(_) => "FILE_READ_ERROR",
            ImportError::UnsupportedFormat(_) => "UNSUPPORTED_FORMAT",
            ImportError::InvalidWorksheet(_) => "INVALID_WORKSHEET",
            ImportError::ParseFailure { .. } => "PARSE_FAILURE",
            ImportError::MissingReferences { .. } => "MISSING_REFERENCES",
            ImportError::DuplicateKey { .. } => "DUPLICATE_KEY",
            ImportError::RecordValidation { .. } => "RECORD_VALIDATION",
            ImportError::InternalCommitFailure(_) => "INTERNAL_COMMIT_FAILURE",
        }
    }
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::ParseFailure {
            row: err.position().map(|p| p.line() as usize),
            message: err.to_string(),
        }
    }
}

// 实现 From<calamine::XlsxError>
impl From<calamine::XlsxError> for ImportError {
    fn from(err: calamine::XlsxError) -> Self {
        ImportError::ParseFailure {
            row: None,
            message: err.to_string(),
        }
    }
}

// 实现 From<RepositoryError>
impl From<RepositoryError> for ImportError {
    fn from(err: RepositoryError) -> Self {
        ImportError::InternalCommitFailure(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
