// ==========================================
// 人事档案系统 - 员工领域模型
// ==========================================
// 依据: employee schema（嵌套 employmentInfo / contactInfo）
// ==========================================

use crate::domain::types::{Department, EmploymentStatus, EmploymentType, Gender, Lenient};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// FieldPath - 目标字段路径
// ==========================================
// 每个可识别的表头对应唯一一个 FieldPath
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldPath {
    // ===== 顶层字段 =====
    FullName,
    EmployeeId,
    DateOfBirth,
    Gender,
    Nationality,
    PhotoUrl,
    UserAccount,

    // ===== employmentInfo.* =====
    JobTitle,
    Manager,
    Department,
    HireDate,
    EmploymentType,
    Status,
    TerminationDate,

    // ===== contactInfo.* =====
    HomeAddress,
    PersonalPhoneNumber,
    WorkPhoneNumber,
    PersonalEmail,
    WorkEmail,
}

impl FieldPath {
    pub const ALL: [FieldPath; 19] = [
        FieldPath::FullName,
        FieldPath::EmployeeId,
        FieldPath::DateOfBirth,
        FieldPath::Gender,
        FieldPath::Nationality,
        FieldPath::PhotoUrl,
        FieldPath::UserAccount,
        FieldPath::JobTitle,
        FieldPath::Manager,
        FieldPath::Department,
        FieldPath::HireDate,
        FieldPath::EmploymentType,
        FieldPath::Status,
        FieldPath::TerminationDate,
        FieldPath::HomeAddress,
        FieldPath::PersonalPhoneNumber,
        FieldPath::WorkPhoneNumber,
        FieldPath::PersonalEmail,
        FieldPath::WorkEmail,
    ];

    /// 点分路径（如 `employmentInfo.hireDate`）
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldPath::FullName => "fullName",
            FieldPath::EmployeeId => "employeeId",
            FieldPath::DateOfBirth => "dateOfBirth",
            FieldPath::Gender => "gender",
            FieldPath::Nationality => "nationality",
            FieldPath::PhotoUrl => "photoUrl",
            FieldPath::UserAccount => "userAccount",
            FieldPath::JobTitle => "employmentInfo.jobTitle",
            FieldPath::Manager => "employmentInfo.manager",
            FieldPath::Department => "employmentInfo.department",
            FieldPath::HireDate => "employmentInfo.hireDate",
            FieldPath::EmploymentType => "employmentInfo.employmentType",
            FieldPath::Status => "employmentInfo.status",
            FieldPath::TerminationDate => "employmentInfo.terminationDate",
            FieldPath::HomeAddress => "contactInfo.homeAddress",
            FieldPath::PersonalPhoneNumber => "contactInfo.personalPhoneNumber",
            FieldPath::WorkPhoneNumber => "contactInfo.workPhoneNumber",
            FieldPath::PersonalEmail => "contactInfo.personalEmail",
            FieldPath::WorkEmail => "contactInfo.workEmail",
        }
    }

    /// 日期型目标字段
    pub fn is_date(&self) -> bool {
        matches!(
            self,
            FieldPath::DateOfBirth | FieldPath::HireDate | FieldPath::TerminationDate
        )
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ==========================================
// EmploymentInfo - 雇佣信息（嵌套）
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmploymentInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manager: Option<String>, // 上级员工引用（自引用，不做存在性校验）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<Lenient<Department>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hire_date: Option<Lenient<NaiveDate>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employment_type: Option<Lenient<EmploymentType>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Lenient<EmploymentStatus>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub termination_date: Option<Lenient<NaiveDate>>,
}

// ==========================================
// ContactInfo - 联系方式（嵌套）
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personal_phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_phone_number: Option<String>, // 非空时唯一
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personal_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_email: Option<String>, // 必填，唯一
}

// ==========================================
// EmployeeRecord - 员工档案（导入/录入单元）
// ==========================================
// 生命周期: 由文件行归一化或请求体构造 → 批量落库 → 不再被导入管道修改
// 必填字段在结构上为 Option，是否缺失由 validate() 判定
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRecord {
    // ===== 身份 =====
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_account: Option<String>,

    // ===== 个人信息 =====
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<Lenient<NaiveDate>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Lenient<Gender>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nationality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,

    // ===== 嵌套分组 =====
    #[serde(default)]
    pub employment_info: EmploymentInfo,
    #[serde(default)]
    pub contact_info: ContactInfo,
}

/// 约束校验违规
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub path: String,
    pub message: String,
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}`: {}", self.path, self.message)
    }
}

impl EmployeeRecord {
    /// 落库前的约束校验（必填、日期有效性、枚举取值）
    pub fn validate(&self) -> Result<(), Vec<FieldViolation>> {
        let mut violations = Vec::new();

        require(&mut violations, FieldPath::FullName, self.full_name.as_ref());
        require(&mut violations, FieldPath::EmployeeId, self.employee_id.as_ref());
        require(&mut violations, FieldPath::DateOfBirth, self.date_of_birth.as_ref());
        check_lenient(&mut violations, FieldPath::DateOfBirth, self.date_of_birth.as_ref());
        check_lenient(&mut violations, FieldPath::Gender, self.gender.as_ref());

        let info = &self.employment_info;
        require(&mut violations, FieldPath::JobTitle, info.job_title.as_ref());
        require(&mut violations, FieldPath::HireDate, info.hire_date.as_ref());
        check_lenient(&mut violations, FieldPath::HireDate, info.hire_date.as_ref());
        check_lenient(&mut violations, FieldPath::Department, info.department.as_ref());
        check_lenient(&mut violations, FieldPath::EmploymentType, info.employment_type.as_ref());
        check_lenient(&mut violations, FieldPath::Status, info.status.as_ref());
        check_lenient(&mut violations, FieldPath::TerminationDate, info.termination_date.as_ref());

        require(&mut violations, FieldPath::WorkEmail, self.contact_info.work_email.as_ref());

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

fn require<T>(violations: &mut Vec<FieldViolation>, path: FieldPath, value: Option<&T>) {
    if value.is_none() {
        violations.push(FieldViolation {
            path: path.as_str().to_string(),
            message: "is required".to_string(),
        });
    }
}

fn check_lenient<T>(violations: &mut Vec<FieldViolation>, path: FieldPath, value: Option<&Lenient<T>>) {
    if let Some(Lenient::Invalid(raw)) = value {
        violations.push(FieldViolation {
            path: path.as_str().to_string(),
            message: format!("invalid value `{}`", raw),
        });
    }
}

// ==========================================
// Employee - 已落库员工档案
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: String,
    #[serde(flatten)]
    pub record: EmployeeRecord,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_record() -> EmployeeRecord {
        EmployeeRecord {
            employee_id: Some("E001".to_string()),
            full_name: Some("Ada Lovelace".to_string()),
            date_of_birth: Some(Lenient::Valid(NaiveDate::from_ymd_opt(1990, 5, 1).unwrap())),
            employment_info: EmploymentInfo {
                job_title: Some("Engineer".to_string()),
                hire_date: Some(Lenient::Valid(NaiveDate::from_ymd_opt(2020, 1, 6).unwrap())),
                ..Default::default()
            },
            contact_info: ContactInfo {
                work_email: Some("ada@corp.test".to_string()),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_complete_record() {
        assert!(complete_record().validate().is_ok());
    }

    #[test]
    fn test_validate_reports_missing_and_invalid() {
        let mut record = complete_record();
        record.full_name = None;
        record.employment_info.hire_date = Some(Lenient::Invalid("not a date".to_string()));

        let violations = record.validate().unwrap_err();
        let paths: Vec<&str> = violations.iter().map(|v| v.path.as_str()).collect();
        assert_eq!(paths, vec!["fullName", "employmentInfo.hireDate"]);
    }

    #[test]
    fn test_serialize_nested_camel_case() {
        let json = serde_json::to_value(complete_record()).unwrap();
        assert_eq!(json["employmentInfo"]["hireDate"], "2020-01-06");
        assert_eq!(json["contactInfo"]["workEmail"], "ada@corp.test");
        assert!(json.get("gender").is_none());
    }

    #[test]
    fn test_field_path_dotted() {
        assert_eq!(FieldPath::HireDate.as_str(), "employmentInfo.hireDate");
        assert!(FieldPath::TerminationDate.is_date());
        assert!(!FieldPath::WorkEmail.is_date());
    }
}
