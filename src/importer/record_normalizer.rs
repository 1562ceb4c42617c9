// ==========================================
// 人事档案系统 - 记录归一化器
// ==========================================
// 职责: FlatRow → EmployeeRecord
// 规则:
// - 表头经映射器定位字段，未识别表头丢弃
// - 缺失值（空/空白）省略，字符串统一去首尾空白
// - 日期字段解析为日历日期；无法解析时保留原文交由落库校验
// - employmentType / status 缺失时填充缺省值
// ==========================================

use crate::config::RecordDefaults;
use crate::domain::employee::{EmployeeRecord, FieldPath};
use crate::domain::import::{FlatRow, NormalizedRow};
use crate::domain::types::{CellValue, Lenient};
use crate::importer::employee_importer_trait::HeaderMapper;
use crate::importer::field_mapper::FieldMapper;
use chrono::{DateTime, Days, NaiveDate};

/// 支持的文本日期格式（按顺序尝试）
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d", "%d.%m.%Y"];

// Excel 可表示的最大日期 9999-12-31
const MAX_EXCEL_SERIAL: f64 = 2_958_465.0;

pub struct RecordNormalizer {
    mapper: Box<dyn HeaderMapper>,
    defaults: RecordDefaults,
}

impl RecordNormalizer {
    pub fn new(mapper: Box<dyn HeaderMapper>, defaults: RecordDefaults) -> Self {
        Self { mapper, defaults }
    }

    /// 使用标准表头映射
    pub fn with_defaults(defaults: RecordDefaults) -> Self {
        Self::new(Box::new(FieldMapper), defaults)
    }

    /// 归一化单行
    pub fn normalize(&self, row: &FlatRow) -> EmployeeRecord {
        let mut record = EmployeeRecord::default();

        for (header, value) in row.iter() {
            if let Some(path) = self.mapper.map_header(header) {
                assign(&mut record, path, value);
            }
        }

        // 缺省值
        let info = &mut record.employment_info;
        if info.employment_type.is_none() {
            info.employment_type = Some(Lenient::Valid(self.defaults.employment_type));
        }
        if info.status.is_none() {
            info.status = Some(Lenient::Valid(self.defaults.status));
        }

        record
    }

    /// 归一化全部行（保持输入顺序）
    pub fn normalize_all(&self, rows: &[FlatRow]) -> Vec<NormalizedRow> {
        rows.iter()
            .map(|row| NormalizedRow {
                row_number: row.row_number,
                record: self.normalize(row),
            })
            .collect()
    }
}

/// 将单元格值写入目标字段；缺失值直接跳过
fn assign(record: &mut EmployeeRecord, path: FieldPath, value: &CellValue) {
    if path.is_date() {
        let Some(date) = to_date(value) else {
            return;
        };
        match path {
            FieldPath::DateOfBirth => record.date_of_birth = Some(date),
            FieldPath::HireDate => record.employment_info.hire_date = Some(date),
            FieldPath::TerminationDate => record.employment_info.termination_date = Some(date),
            _ => {}
        }
        return;
    }

    let Some(text) = value.to_trimmed_string() else {
        return;
    };

    let info = &mut record.employment_info;
    let contact = &mut record.contact_info;
    match path {
        FieldPath::FullName => record.full_name = Some(text),
        FieldPath::EmployeeId => record.employee_id = Some(text),
        FieldPath::Gender => record.gender = Some(Lenient::parse(&text)),
        FieldPath::Nationality => record.nationality = Some(text),
        FieldPath::PhotoUrl => record.photo_url = Some(text),
        FieldPath::UserAccount => record.user_account = Some(text),
        FieldPath::JobTitle => info.job_title = Some(text),
        FieldPath::Manager => info.manager = Some(text),
        FieldPath::Department => info.department = Some(Lenient::parse(&text)),
        FieldPath::EmploymentType => info.employment_type = Some(Lenient::parse(&text)),
        FieldPath::Status => info.status = Some(Lenient::parse(&text)),
        FieldPath::HomeAddress => contact.home_address = Some(text),
        FieldPath::PersonalPhoneNumber => contact.personal_phone_number = Some(text),
        FieldPath::WorkPhoneNumber => contact.work_phone_number = Some(text),
        FieldPath::PersonalEmail => contact.personal_email = Some(text),
        FieldPath::WorkEmail => contact.work_email = Some(text),
        FieldPath::DateOfBirth | FieldPath::HireDate | FieldPath::TerminationDate => {}
    }
}

/// 单元格 → 日期（宽松）
///
/// - 日期单元格直接使用
/// - 数值按 Excel 序列号换算（1899-12-30 为第 0 天）
/// - 文本按 DATE_FORMATS / RFC 3339 解析
fn to_date(value: &CellValue) -> Option<Lenient<NaiveDate>> {
    match value {
        CellValue::Date(d) => Some(Lenient::Valid(*d)),
        CellValue::Number(n) if n.is_finite() => Some(
            excel_serial_to_date(*n)
                .map(Lenient::Valid)
                .unwrap_or_else(|| Lenient::Invalid(value.to_string())),
        ),
        _ => {
            let text = value.to_trimmed_string()?;
            Some(
                parse_date_text(&text)
                    .map(Lenient::Valid)
                    .unwrap_or(Lenient::Invalid(text)),
            )
        }
    }
}

pub fn parse_date_text(text: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        .or_else(|| DateTime::parse_from_rfc3339(text).ok().map(|dt| dt.date_naive()))
}

pub fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !(1.0..=MAX_EXCEL_SERIAL).contains(&serial) {
        return None;
    }
    NaiveDate::from_ymd_opt(1899, 12, 30)?.checked_add_days(Days::new(serial.floor() as u64))
}
