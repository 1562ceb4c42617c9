// ==========================================
// 人事档案系统 - 导入配置读取 Trait
// ==========================================
// 职责: 定义导入模块所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::domain::types::{EmploymentStatus, EmploymentType};
use crate::repository::RepositoryResult;
use async_trait::async_trait;
use std::path::PathBuf;

// ==========================================
// ImportConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait ImportConfigReader: Send + Sync {
    // ===== 归一化默认值 =====

    /// 缺省用工类型
    ///
    /// # 默认值
    /// - Full-time
    async fn get_default_employment_type(&self) -> RepositoryResult<EmploymentType>;

    /// 缺省在职状态
    ///
    /// # 默认值
    /// - Active
    async fn get_default_status(&self) -> RepositoryResult<EmploymentStatus>;

    // ===== 上传限制 =====

    /// 上传文件大小上限（字节）
    ///
    /// # 默认值
    /// - 5 MiB
    async fn get_max_upload_bytes(&self) -> RepositoryResult<u64>;

    /// 上传暂存目录
    ///
    /// # 默认值
    /// - uploads
    async fn get_upload_dir(&self) -> RepositoryResult<PathBuf>;
}
