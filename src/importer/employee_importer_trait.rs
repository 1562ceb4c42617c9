// ==========================================
// 人事档案系统 - 员工导入 Trait
// ==========================================
// 职责: 定义导入管道各组件接口（不包含实现）
// ==========================================

use crate::domain::employee::FieldPath;
use crate::domain::import::{CommitReport, FlatRow, ImportReport, VerificationOutcome};
use crate::importer::error::ImportResult;
use crate::importer::temp_upload::TempUpload;
use async_trait::async_trait;
use std::path::Path;

// ==========================================
// EmployeeImporter Trait
// ==========================================
// 用途: 员工批量导入主接口
// 实现者: EmployeeImporterImpl
#[async_trait]
pub trait EmployeeImporter: Send + Sync {
    /// 导入一个已受理的上传文件
    ///
    /// # 导入流程
    /// 1. 按扩展名选择解码器，完整解码为 FlatRow 序列
    /// 2. 表头映射 + 归一化为 EmployeeRecord
    /// 3. 批量校验 userAccount 引用（全有或全无）
    /// 4. 无序批量插入 + 并发补偿更新（标记账号已验证）
    ///
    /// # 资源
    /// - 无论成功或失败，临时文件在返回前删除且仅删除一次
    ///
    /// # 返回
    /// - Ok(ImportReport): 已进入落库阶段（可能含逐条失败）
    /// - Err: 解码失败 / 引用缺失 / 整体落库失败
    async fn import_upload(&self, upload: TempUpload) -> ImportResult<ImportReport>;

    /// 重试补偿阶段（不重新解码、不重新插入）
    ///
    /// # 参数
    /// - report: 上次落库结果，仅对未验证成功的账号重试
    async fn retry_verifications(&self, report: &CommitReport) -> Vec<VerificationOutcome>;
}

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 文件解码接口
// 实现者: ExcelParser, CsvParser
pub trait FileParser: Send + Sync {
    /// 解码文件为有序 FlatRow 列表（保持文件行序）
    ///
    /// # 返回
    /// - Ok(Vec<FlatRow>): 行记录列表（跳过完全空白的行）
    /// - Err: 工作表无效、解析失败、文件读取错误
    fn parse_to_flat_rows(&self, file_path: &Path) -> ImportResult<Vec<FlatRow>>;
}

// ==========================================
// HeaderMapper Trait
// ==========================================
// 用途: 表头 → 字段路径
// 实现者: FieldMapper
pub trait HeaderMapper: Send + Sync {
    /// 未识别的表头返回 None（不是错误）
    fn map_header(&self, header: &str) -> Option<FieldPath>;
}
