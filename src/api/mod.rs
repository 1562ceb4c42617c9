// ==========================================
// 人事档案系统 - API 层
// ==========================================
// 职责: 提供业务 API 接口，输出统一响应信封
// ==========================================

pub mod employee_api;
pub mod error;
pub mod response;

// 重导出核心类型
pub use employee_api::{CreateEmployeeRequest, EmployeeApi};
pub use error::{ApiError, ApiResult};
pub use response::{ApiResponse, ErrorBody};
