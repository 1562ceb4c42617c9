// ==========================================
// 人事档案系统 - 导入中间结构与结果模型
// ==========================================
// 用途: 导入管道中间产物（解码 → 映射/归一化 → 落库结果）
// 生命周期: 仅在单次导入请求内
// ==========================================

use crate::domain::employee::{Employee, EmployeeRecord, FieldViolation};
use crate::domain::types::CellValue;
use serde::{Deserialize, Serialize};

// ==========================================
// FlatRow - 解码后的一行（表头 → 原始值）
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct FlatRow {
    /// 文件中的行号（表头为第 1 行）
    pub row_number: usize,
    cells: Vec<(String, CellValue)>,
}

impl FlatRow {
    pub fn new(row_number: usize) -> Self {
        Self {
            row_number,
            cells: Vec::new(),
        }
    }

    /// 追加单元格；同名表头后者覆盖前者
    pub fn push(&mut self, header: impl Into<String>, value: CellValue) {
        let header = header.into();
        if let Some(slot) = self.cells.iter_mut().find(|(h, _)| *h == header) {
            slot.1 = value;
        } else {
            self.cells.push((header, value));
        }
    }

    pub fn get(&self, header: &str) -> Option<&CellValue> {
        self.cells.iter().find(|(h, _)| h == header).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.cells.iter().map(|(h, v)| (h.as_str(), v))
    }

    /// 所有单元格均为空
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|(_, v)| v.is_absent())
    }
}

// ==========================================
// NormalizedRow - 归一化后的员工档案（携带源行号）
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRow {
    pub row_number: usize,
    pub record: EmployeeRecord,
}

// ==========================================
// 落库结果（两阶段：主插入 + 补偿更新）
// ==========================================

/// 单条插入失败原因
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommitFailureKind {
    /// 唯一键冲突（employeeId / workEmail / workPhoneNumber）
    DuplicateKey { field: String },
    /// 约束校验失败（必填缺失、日期无效、枚举越界）
    Validation { violations: Vec<FieldViolation> },
    /// 其他存储错误
    Storage { message: String },
}

/// 单条插入失败
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitFailure {
    /// 在批次中的下标（0 起）
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_number: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<String>,
    #[serde(flatten)]
    pub kind: CommitFailureKind,
}

/// 单个账号的验证更新结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationOutcome {
    pub user_account: String,
    pub verified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// 批量落库的组合结果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitReport {
    /// 主阶段：成功插入的员工
    pub inserted: Vec<Employee>,
    /// 主阶段：逐条失败
    pub failures: Vec<CommitFailure>,
    /// 补偿阶段：账号验证结果
    pub verifications: Vec<VerificationOutcome>,
}

impl CommitReport {
    /// 补偿阶段中未成功的账号（可单独重试）
    pub fn pending_verifications(&self) -> Vec<String> {
        self.verifications
            .iter()
            .filter(|v| !v.verified)
            .map(|v| v.user_account.clone())
            .collect()
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// 一次文件导入的完整结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub batch_id: String,
    pub file_name: String,
    pub total_rows: usize,
    pub commit: CommitReport,
    pub elapsed_ms: u64,
}
