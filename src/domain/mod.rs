// ==========================================
// 人事档案系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑，不含导入流程逻辑
// ==========================================

pub mod employee;
pub mod import;
pub mod types;
pub mod user;

// 重导出核心类型
pub use employee::{ContactInfo, Employee, EmployeeRecord, EmploymentInfo, FieldPath, FieldViolation};
pub use import::{
    CommitFailure, CommitFailureKind, CommitReport, FlatRow, ImportReport, NormalizedRow,
    VerificationOutcome,
};
pub use types::{CellValue, Department, EmploymentStatus, EmploymentType, Gender, Lenient, Role};
pub use user::UserAccount;
