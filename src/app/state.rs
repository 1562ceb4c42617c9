// ==========================================
// 人事档案系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// ==========================================

use std::sync::{Arc, Mutex};

use crate::api::EmployeeApi;
use crate::config::{ConfigManager, ImportSettings};
use crate::db::{ensure_schema, open_sqlite_connection};
use crate::repository::{EmployeeRepositoryImpl, UserAccountRepositoryImpl};

/// 使用 SQLite 仓储的员工 API
pub type SqliteEmployeeApi = EmployeeApi<EmployeeRepositoryImpl, UserAccountRepositoryImpl>;

/// 应用状态
///
/// 所有仓储共享同一个连接
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 生效的导入设置（启动时从 config_kv 读取）
    pub settings: ImportSettings,

    /// 配置管理器
    pub config_manager: Arc<ConfigManager>,

    /// 用户账号仓储
    pub user_repo: Arc<UserAccountRepositoryImpl>,

    /// 员工档案仓储
    pub employee_repo: Arc<EmployeeRepositoryImpl>,

    /// 员工档案API
    pub employee_api: Arc<SqliteEmployeeApi>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 说明
    /// 1. 打开数据库并建表
    /// 2. 初始化Repository
    /// 3. 读取导入设置
    /// 4. 创建API实例
    pub async fn new(db_path: String) -> Result<Self, String> {
        tracing::info!(db_path = %db_path, "初始化AppState");

        let conn = open_sqlite_connection(&db_path).map_err(|e| format!("无法打开数据库: {}", e))?;
        ensure_schema(&conn).map_err(|e| format!("建表失败: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 初始化Repository层
        // ==========================================
        let user_repo = Arc::new(UserAccountRepositoryImpl::from_connection(conn.clone()));
        let employee_repo = Arc::new(EmployeeRepositoryImpl::from_connection(conn.clone()));

        // ==========================================
        // 配置
        // ==========================================
        let config_manager = Arc::new(
            ConfigManager::from_connection(conn)
                .map_err(|e| format!("无法创建ConfigManager: {}", e))?,
        );
        let settings = ImportSettings::load(config_manager.as_ref())
            .await
            .map_err(|e| format!("读取导入设置失败: {}", e))?;

        tracing::debug!(
            max_upload_bytes = settings.upload.max_bytes,
            upload_dir = %settings.upload.upload_dir.display(),
            "导入设置已加载"
        );

        // ==========================================
        // 初始化API层
        // ==========================================
        let employee_api = Arc::new(EmployeeApi::new(
            employee_repo.clone(),
            user_repo.clone(),
            settings.clone(),
        ));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            settings,
            config_manager,
            user_repo,
            employee_repo,
            employee_api,
        })
    }
}

/// 获取默认数据库路径
///
/// 优先级: 环境变量 HR_RECORDS_DB_PATH > 用户数据目录 > 当前目录
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    if let Ok(path) = std::env::var("HR_RECORDS_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./hr_records.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("hr-records");
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("hr_records.db");
        }
    }

    path.to_string_lossy().to_string()
}
