// ==========================================
// 人事档案系统 - 领域类型定义
// ==========================================
// 依据: 员工档案 schema（employee / user_account）
// 职责: 枚举类型、宽松字段值、单元格标量
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// Gender - 性别
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Male" => Ok(Gender::Male),
            "Female" => Ok(Gender::Female),
            "Other" => Ok(Gender::Other),
            _ => Err(format!("`{}` is not a valid gender", s)),
        }
    }
}

// ==========================================
// Department - 部门
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Department {
    #[serde(rename = "Web-Dev")]
    WebDev,
    #[serde(rename = "Mobile-Dev")]
    MobileDev,
    #[serde(rename = "Data-Analyst")]
    DataAnalyst,
    #[serde(rename = "HR")]
    Hr,
}

impl Department {
    pub fn as_str(&self) -> &'static str {
        match self {
            Department::WebDev => "Web-Dev",
            Department::MobileDev => "Mobile-Dev",
            Department::DataAnalyst => "Data-Analyst",
            Department::Hr => "HR",
        }
    }
}

impl FromStr for Department {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Web-Dev" => Ok(Department::WebDev),
            "Mobile-Dev" => Ok(Department::MobileDev),
            "Data-Analyst" => Ok(Department::DataAnalyst),
            "HR" => Ok(Department::Hr),
            _ => Err(format!("`{}` is not a valid department", s)),
        }
    }
}

// ==========================================
// EmploymentType - 用工类型
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmploymentType {
    #[serde(rename = "Full-time")]
    FullTime,
    #[serde(rename = "Part-time")]
    PartTime,
    Contract,
    Intern,
}

impl EmploymentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmploymentType::FullTime => "Full-time",
            EmploymentType::PartTime => "Part-time",
            EmploymentType::Contract => "Contract",
            EmploymentType::Intern => "Intern",
        }
    }
}

impl FromStr for EmploymentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Full-time" => Ok(EmploymentType::FullTime),
            "Part-time" => Ok(EmploymentType::PartTime),
            "Contract" => Ok(EmploymentType::Contract),
            "Intern" => Ok(EmploymentType::Intern),
            _ => Err(format!("`{}` is not a valid employment type", s)),
        }
    }
}

// ==========================================
// EmploymentStatus - 在职状态
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmploymentStatus {
    Active,
    #[serde(rename = "On Leave")]
    OnLeave,
    Terminated,
}

impl EmploymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmploymentStatus::Active => "Active",
            EmploymentStatus::OnLeave => "On Leave",
            EmploymentStatus::Terminated => "Terminated",
        }
    }
}

impl FromStr for EmploymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Active" => Ok(EmploymentStatus::Active),
            "On Leave" => Ok(EmploymentStatus::OnLeave),
            "Terminated" => Ok(EmploymentStatus::Terminated),
            _ => Err(format!("`{}` is not a valid employment status", s)),
        }
    }
}

// ==========================================
// Role - 账号角色
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    User,
    Developer,
    Teamlead,
    Hr,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Developer => "DEVELOPER",
            Role::Teamlead => "TEAMLEAD",
            Role::Hr => "HR",
            Role::Admin => "ADMIN",
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USER" => Ok(Role::User),
            "DEVELOPER" => Ok(Role::Developer),
            "TEAMLEAD" => Ok(Role::Teamlead),
            "HR" => Ok(Role::Hr),
            "ADMIN" => Ok(Role::Admin),
            _ => Err(format!("`{}` is not a valid role", s)),
        }
    }
}

// ==========================================
// Lenient<T> - 宽松字段值
// ==========================================
// 用途: 归一化阶段不拒绝无法解析的值，保留原文，
//       由落库前的约束校验决定是否有效
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Lenient<T> {
    Valid(T),
    Invalid(String),
}

impl<T> Lenient<T> {
    pub fn valid(&self) -> Option<&T> {
        match self {
            Lenient::Valid(v) => Some(v),
            Lenient::Invalid(_) => None,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Lenient::Valid(_))
    }
}

impl<T: FromStr> Lenient<T> {
    /// 按 FromStr 解析，失败时保留原文
    pub fn parse(raw: &str) -> Self {
        raw.parse::<T>()
            .map(Lenient::Valid)
            .unwrap_or_else(|_| Lenient::Invalid(raw.to_string()))
    }
}

impl<T> From<T> for Lenient<T> {
    fn from(value: T) -> Self {
        Lenient::Valid(value)
    }
}

// ==========================================
// CellValue - 单元格标量（带标签）
// ==========================================
// 解码器输出的原始值，替代动态类型，避免数值/字符串混淆
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Date(NaiveDate),
    Empty,
}

impl CellValue {
    /// 空字符串/空白视为缺失
    pub fn is_absent(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            CellValue::Number(n) => !n.is_finite(),
            CellValue::Date(_) => false,
        }
    }

    /// 标量转字符串（已去除首尾空白）；缺失返回 None
    pub fn to_trimmed_string(&self) -> Option<String> {
        if self.is_absent() {
            return None;
        }
        let s = match self {
            CellValue::Text(s) => s.trim().to_string(),
            CellValue::Number(n) => format_number(*n),
            CellValue::Date(d) => d.format("%Y-%m-%d").to_string(),
            CellValue::Empty => return None,
        };
        Some(s)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Number(n) => write!(f, "{}", format_number(*n)),
            CellValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            CellValue::Empty => Ok(()),
        }
    }
}

/// 整数值不带小数点（Excel 中 1001 读出为 1001.0）
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_round_trip_labels() {
        assert_eq!("On Leave".parse::<EmploymentStatus>(), Ok(EmploymentStatus::OnLeave));
        assert_eq!(EmploymentType::FullTime.as_str(), "Full-time");
        assert_eq!("Data-Analyst".parse::<Department>(), Ok(Department::DataAnalyst));
        assert!("full-time".parse::<EmploymentType>().is_err());
    }

    #[test]
    fn test_lenient_parse_keeps_raw_text() {
        let ok: Lenient<Gender> = Lenient::parse("Female");
        assert_eq!(ok, Lenient::Valid(Gender::Female));

        let bad: Lenient<Gender> = Lenient::parse("F");
        assert_eq!(bad, Lenient::Invalid("F".to_string()));
        assert!(!bad.is_valid());
    }

    #[test]
    fn test_cell_number_coerced_without_fraction() {
        assert_eq!(CellValue::Number(1001.0).to_trimmed_string(), Some("1001".to_string()));
        assert_eq!(CellValue::Number(2.5).to_trimmed_string(), Some("2.5".to_string()));
    }

    #[test]
    fn test_cell_blank_text_is_absent() {
        assert!(CellValue::Text("   ".to_string()).is_absent());
        assert_eq!(CellValue::Text("  a ".to_string()).to_trimmed_string(), Some("a".to_string()));
        assert_eq!(CellValue::Empty.to_trimmed_string(), None);
    }
}
