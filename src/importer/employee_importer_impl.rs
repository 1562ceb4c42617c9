// ==========================================
// 人事档案系统 - 员工批量导入器实现
// ==========================================
// 职责: 整合导入流程，从上传文件到数据库
// 流程: 选择解码器 → 解码 → 映射/归一化 → 引用校验 → 两阶段落库
// 约束: 解码/引用校验失败时不产生任何写入；临时文件在返回前删除
// ==========================================

use crate::config::RecordDefaults;
use crate::domain::employee::EmployeeRecord;
use crate::domain::import::{CommitReport, ImportReport, NormalizedRow, VerificationOutcome};
use crate::importer::bulk_commit::BulkCommitCoordinator;
use crate::importer::employee_importer_trait::{EmployeeImporter, HeaderMapper};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::FieldMapper;
use crate::importer::file_parser::FileFormat;
use crate::importer::record_normalizer::RecordNormalizer;
use crate::importer::reference_validator::ReferenceValidator;
use crate::importer::temp_upload::TempUpload;
use crate::repository::{EmployeeRepository, UserAccountRepository};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

// ==========================================
// EmployeeImporterImpl - 员工批量导入器实现
// ==========================================
pub struct EmployeeImporterImpl<E, U>
where
    E: EmployeeRepository,
    U: UserAccountRepository,
{
    // 导入组件
    normalizer: RecordNormalizer,
    reference_validator: ReferenceValidator<U>,
    committer: BulkCommitCoordinator<E, U>,
}

impl<E, U> EmployeeImporterImpl<E, U>
where
    E: EmployeeRepository,
    U: UserAccountRepository,
{
    /// 创建导入器（使用标准表头映射）
    ///
    /// # 参数
    /// - employee_repo: 员工档案仓储
    /// - user_repo: 用户账号仓储
    /// - defaults: 归一化缺省值
    pub fn new(employee_repo: Arc<E>, user_repo: Arc<U>, defaults: RecordDefaults) -> Self {
        Self::with_mapper(employee_repo, user_repo, Box::new(FieldMapper), defaults)
    }

    pub fn with_mapper(
        employee_repo: Arc<E>,
        user_repo: Arc<U>,
        mapper: Box<dyn HeaderMapper>,
        defaults: RecordDefaults,
    ) -> Self {
        Self {
            normalizer: RecordNormalizer::new(mapper, defaults),
            reference_validator: ReferenceValidator::new(Arc::clone(&user_repo)),
            committer: BulkCommitCoordinator::new(employee_repo, user_repo),
        }
    }

    async fn run_pipeline(&self, batch_id: &str, upload: &TempUpload) -> ImportResult<ImportReport> {
        let start = Instant::now();

        // === 步骤 1: 选择解码器（未知扩展名在读取任何行之前拒绝） ===
        let format = FileFormat::from_file_name(upload.original_name())?;

        // === 步骤 2: 完整解码 ===
        let path = upload.path().to_path_buf();
        let flat_rows = tokio::task::spawn_blocking(move || format.parser().parse_to_flat_rows(&path))
            .await
            .map_err(|e| ImportError::FileReadError(format!("decode task failed: {}", e)))??;
        info!(batch_id = %batch_id, format = ?format, total_rows = flat_rows.len(), "文件解码完成");

        // === 步骤 3: 映射 + 归一化 ===
        let total_rows = flat_rows.len();
        let (row_numbers, records): (Vec<usize>, Vec<EmployeeRecord>) = self
            .normalizer
            .normalize_all(&flat_rows)
            .into_iter()
            .map(|r| (r.row_number, r.record))
            .unzip();

        // === 步骤 4: 账号引用校验（全有或全无） ===
        self.reference_validator.validate(&records).await?;
        info!(batch_id = %batch_id, "账号引用校验通过");

        // === 步骤 5: 两阶段落库 ===
        let rows: Vec<NormalizedRow> = row_numbers
            .into_iter()
            .zip(records)
            .map(|(row_number, record)| NormalizedRow { row_number, record })
            .collect();
        let commit = self.committer.commit(rows).await?;

        let elapsed_ms = start.elapsed().as_millis() as u64;
        info!(
            batch_id = %batch_id,
            inserted = commit.inserted.len(),
            failed = commit.failures.len(),
            pending_verifications = commit.pending_verifications().len(),
            elapsed_ms,
            "导入完成"
        );

        Ok(ImportReport {
            batch_id: batch_id.to_string(),
            file_name: upload.original_name().to_string(),
            total_rows,
            commit,
            elapsed_ms,
        })
    }
}

#[async_trait]
impl<E, U> EmployeeImporter for EmployeeImporterImpl<E, U>
where
    E: EmployeeRepository + 'static,
    U: UserAccountRepository + 'static,
{
    #[instrument(skip(self, upload), fields(file_name = %upload.original_name(), batch_id))]
    async fn import_upload(&self, mut upload: TempUpload) -> ImportResult<ImportReport> {
        let batch_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("batch_id", batch_id.as_str());
        info!(batch_id = %batch_id, "开始导入员工档案");

        let result = self.run_pipeline(&batch_id, &upload).await;

        // 所有路径上都删除临时文件
        if let Err(e) = upload.release() {
            warn!(batch_id = %batch_id, error = %e, "临时文件删除失败");
        }

        if let Err(e) = &result {
            error!(batch_id = %batch_id, code = e.error_code(), error = %e, "导入失败");
        }
        result
    }

    async fn retry_verifications(&self, report: &CommitReport) -> Vec<VerificationOutcome> {
        self.committer.retry_verifications(report).await
    }
}
