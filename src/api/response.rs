// ==========================================
// 人事档案系统 - API 响应信封
// ==========================================
// 格式: { success, message, employees | employee, error { code, details }, status }
// ==========================================

use crate::api::error::ApiError;
use crate::domain::employee::Employee;
use crate::domain::import::VerificationOutcome;
use serde::{Deserialize, Serialize};

/// 错误负载
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// 统一响应信封
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employees: Option<Vec<Employee>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee: Option<Employee>,
    /// 账号验证结果（仅在有账号引用时出现）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verifications: Option<Vec<VerificationOutcome>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
    /// HTTP 等价状态码
    pub status: u16,
}

impl ApiResponse {
    fn success(status: u16, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            employees: None,
            employee: None,
            verifications: None,
            error: None,
            status,
        }
    }

    /// 201 Created
    pub fn created(message: impl Into<String>) -> Self {
        Self::success(201, message)
    }

    /// 200 OK
    pub fn ok(message: impl Into<String>) -> Self {
        Self::success(200, message)
    }

    pub fn from_error(err: &ApiError) -> Self {
        Self {
            success: false,
            message: err.to_string(),
            employees: None,
            employee: None,
            verifications: None,
            error: Some(ErrorBody {
                code: err.error_code().to_string(),
                details: None,
            }),
            status: err.status_code(),
        }
    }

    pub fn with_employees(mut self, employees: Vec<Employee>) -> Self {
        self.employees = Some(employees);
        self
    }

    pub fn with_employee(mut self, employee: Employee) -> Self {
        self.employee = Some(employee);
        self
    }

    /// 空列表不输出
    pub fn with_verifications(mut self, verifications: Vec<VerificationOutcome>) -> Self {
        if !verifications.is_empty() {
            self.verifications = Some(verifications);
        }
        self
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        if let Some(error) = self.error.as_mut() {
            error.details = Some(details);
        }
        self
    }
}

impl From<ApiError> for ApiResponse {
    fn from(err: ApiError) -> Self {
        ApiResponse::from_error(&err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importer::ImportError;
    use serde_json::json;

    #[test]
    fn test_error_envelope_shape() {
        let response: ApiResponse = ApiError::from(ImportError::UnsupportedFormat(".txt".to_string())).into();
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["success"], false);
        assert_eq!(value["status"], 400);
        assert_eq!(value["error"]["code"], "UNSUPPORTED_FORMAT");
        assert!(value.get("employees").is_none());
    }

    #[test]
    fn test_success_envelope_shape() {
        let response = ApiResponse::created("0 employees created successfully")
            .with_employees(Vec::new())
            .with_verifications(Vec::new());
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["success"], true);
        assert_eq!(value["status"], 201);
        assert_eq!(value["employees"], json!([]));
        assert!(value.get("verifications").is_none());
        assert!(value.get("error").is_none());
    }
}
