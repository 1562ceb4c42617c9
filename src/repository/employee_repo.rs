// ==========================================
// 人事档案系统 - 员工档案 Repository Trait
// ==========================================
// 职责: 定义员工档案数据访问接口（不包含业务逻辑）
// 红线: Repository 不含业务规则，只做数据 CRUD
// ==========================================

use crate::domain::employee::{Employee, EmployeeRecord};
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;

/// 单条插入失败（保留批次下标）
#[derive(Debug)]
pub struct BulkInsertFailure {
    pub index: usize,
    pub error: RepositoryError,
}

/// 无序批量插入结果
#[derive(Debug, Default)]
pub struct BulkInsertOutcome {
    pub inserted: Vec<Employee>,
    pub failures: Vec<BulkInsertFailure>,
}

// ==========================================
// EmployeeRepository Trait
// ==========================================
// 实现者: EmployeeRepositoryImpl（使用 rusqlite）
#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    /// 无序批量插入（遇错继续）
    ///
    /// # 说明
    /// - 每条记录先做约束校验，再独立插入
    /// - 某条唯一键冲突不影响其余记录
    /// - 不开启跨记录事务
    ///
    /// # 返回
    /// - Ok(BulkInsertOutcome): 成功插入的记录 + 逐条失败
    /// - Err: 连接/锁等整体性错误
    async fn insert_many_unordered(
        &self,
        records: Vec<EmployeeRecord>,
    ) -> RepositoryResult<BulkInsertOutcome>;

    /// 插入单条记录（约束校验失败或唯一键冲突返回 Err）
    async fn insert_one(&self, record: EmployeeRecord) -> RepositoryResult<Employee>;

    /// 按员工编号查询
    async fn find_by_employee_id(&self, employee_id: &str) -> RepositoryResult<Option<Employee>>;

    /// 全量列表（按创建时间）
    async fn list_all(&self) -> RepositoryResult<Vec<Employee>>;

    /// 记录总数
    async fn count(&self) -> RepositoryResult<usize>;
}
