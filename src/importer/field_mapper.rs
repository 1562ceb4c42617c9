// ==========================================
// 人事档案系统 - 表头映射器实现
// ==========================================
// 职责: 源表头 → 目标字段路径（静态映射表）
// 规则: 区分大小写、精确匹配；未识别表头静默忽略
// ==========================================

use crate::domain::employee::FieldPath;
use crate::importer::employee_importer_trait::HeaderMapper;

/// 标准表头映射表
const HEADER_TABLE: &[(&str, FieldPath)] = &[
    // 顶层字段
    ("Full Name", FieldPath::FullName),
    ("Employee ID", FieldPath::EmployeeId),
    ("Date of Birth", FieldPath::DateOfBirth),
    ("Gender", FieldPath::Gender),
    ("Nationality", FieldPath::Nationality),
    ("Photo URL", FieldPath::PhotoUrl),
    ("User Account ID", FieldPath::UserAccount),
    // employmentInfo.*
    ("Job Title", FieldPath::JobTitle),
    ("Manager ID", FieldPath::Manager),
    ("Department", FieldPath::Department),
    ("Hire Date", FieldPath::HireDate),
    ("Employment Type", FieldPath::EmploymentType),
    ("Status", FieldPath::Status),
    ("Termination Date", FieldPath::TerminationDate),
    // contactInfo.*
    ("Home Address", FieldPath::HomeAddress),
    ("Personal Phone Number", FieldPath::PersonalPhoneNumber),
    ("Work Phone Number", FieldPath::WorkPhoneNumber),
    ("Personal Email", FieldPath::PersonalEmail),
    ("Work Email", FieldPath::WorkEmail),
];

pub struct FieldMapper;

impl HeaderMapper for FieldMapper {
    fn map_header(&self, header: &str) -> Option<FieldPath> {
        HEADER_TABLE
            .iter()
            .find(|(name, _)| *name == header)
            .map(|(_, path)| *path)
    }
}

impl FieldMapper {
    /// 某字段路径对应的标准表头
    pub fn header_for(path: FieldPath) -> &'static str {
        HEADER_TABLE
            .iter()
            .find(|(_, p)| *p == path)
            .map(|(name, _)| *name)
            .unwrap_or_else(|| path.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_field_path_has_a_header() {
        for path in FieldPath::ALL {
            let header = FieldMapper::header_for(path);
            assert_eq!(FieldMapper.map_header(header), Some(path), "header {}", header);
        }
    }

    #[test]
    fn test_nested_paths() {
        assert_eq!(
            FieldMapper.map_header("Hire Date").map(|p| p.as_str()),
            Some("employmentInfo.hireDate")
        );
        assert_eq!(
            FieldMapper.map_header("Work Email").map(|p| p.as_str()),
            Some("contactInfo.workEmail")
        );
    }

    #[test]
    fn test_exact_match_only() {
        assert_eq!(FieldMapper.map_header("full name"), None);
        assert_eq!(FieldMapper.map_header(" Full Name"), None);
        assert_eq!(FieldMapper.map_header("Notes"), None);
        assert_eq!(FieldMapper.map_header(""), None);
    }
}
