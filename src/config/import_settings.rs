// ==========================================
// 人事档案系统 - 导入设置
// ==========================================
// 职责: 将配置读取结果组装为导入组件直接消费的结构体
// ==========================================

use crate::config::config_manager::config_defaults;
use crate::config::import_config_trait::ImportConfigReader;
use crate::domain::types::{EmploymentStatus, EmploymentType};
use crate::repository::RepositoryResult;
use std::path::PathBuf;

/// 允许上传的 MIME 类型
pub const MIME_XLSX: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const MIME_CSV: &str = "text/csv";

/// 归一化缺省值（字段缺失时填充）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordDefaults {
    pub employment_type: EmploymentType,
    pub status: EmploymentStatus,
}

impl Default for RecordDefaults {
    fn default() -> Self {
        Self {
            employment_type: EmploymentType::FullTime,
            status: EmploymentStatus::Active,
        }
    }
}

/// 上传限制
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadLimits {
    pub upload_dir: PathBuf,
    pub max_bytes: u64,
    pub allowed_mime_types: Vec<String>,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from(config_defaults::UPLOAD_DIR),
            max_bytes: config_defaults::MAX_UPLOAD_BYTES,
            allowed_mime_types: vec![MIME_XLSX.to_string(), MIME_CSV.to_string()],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSettings {
    pub defaults: RecordDefaults,
    pub upload: UploadLimits,
}

impl ImportSettings {
    /// 从配置读取器加载
    pub async fn load<C: ImportConfigReader + ?Sized>(config: &C) -> RepositoryResult<Self> {
        Ok(Self {
            defaults: RecordDefaults {
                employment_type: config.get_default_employment_type().await?,
                status: config.get_default_status().await?,
            },
            upload: UploadLimits {
                upload_dir: config.get_upload_dir().await?,
                max_bytes: config.get_max_upload_bytes().await?,
                ..UploadLimits::default()
            },
        })
    }
}
