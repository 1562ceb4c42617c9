// ==========================================
// 人事档案系统 - 员工档案 Repository 实现
// ==========================================
// 职责: 实现员工档案数据访问（使用 rusqlite）
// 约束: 唯一性由 employee 表 UNIQUE 约束保证
// ==========================================

use crate::db::{ensure_schema, open_sqlite_connection};
use crate::domain::employee::{ContactInfo, Employee, EmployeeRecord, EmploymentInfo, FieldPath};
use crate::domain::types::Lenient;
use crate::repository::employee_repo::{BulkInsertFailure, BulkInsertOutcome, EmployeeRepository};
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex};
use tracing::debug;
use uuid::Uuid;

const INSERT_EMPLOYEE_SQL: &str = r#"
    INSERT INTO employee (
        id, employee_id, full_name, date_of_birth, gender, nationality, photo_url,
        job_title, manager_id, department, hire_date, employment_type, status,
        termination_date, home_address, personal_phone, work_phone, personal_email,
        work_email, user_account_id, created_at, updated_at
    ) VALUES (
        ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11,
        ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22
    )
"#;

/// 唯一约束列 → 字段路径
pub fn duplicate_field(err: &RepositoryError) -> Option<FieldPath> {
    match err.unique_column()? {
        "employee_id" => Some(FieldPath::EmployeeId),
        "work_email" => Some(FieldPath::WorkEmail),
        "work_phone" => Some(FieldPath::WorkPhoneNumber),
        _ => None,
    }
}

fn valid<T>(value: &Option<Lenient<T>>) -> Option<&T> {
    value.as_ref().and_then(|v| v.valid())
}

// ==========================================
// EmployeeRepositoryImpl
// ==========================================
pub struct EmployeeRepositoryImpl {
    conn: Arc<Mutex<Connection>>,
}

impl EmployeeRepositoryImpl {
    /// 打开数据库并建表
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        ensure_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 复用已有连接（调用方负责建表）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn lock(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 约束校验 + 单条插入（自动提交）
    fn insert_record(conn: &Connection, record: &EmployeeRecord) -> RepositoryResult<Employee> {
        record.validate().map_err(RepositoryError::RecordInvalid)?;

        let now = Utc::now();
        let id = Uuid::new_v4().to_string();
        let info = &record.employment_info;
        let contact = &record.contact_info;

        conn.execute(
            INSERT_EMPLOYEE_SQL,
            params![
                id,
                record.employee_id,
                record.full_name,
                valid(&record.date_of_birth),
                valid(&record.gender).map(|g| g.as_str()),
                record.nationality,
                record.photo_url,
                info.job_title,
                info.manager,
                valid(&info.department).map(|d| d.as_str()),
                valid(&info.hire_date),
                valid(&info.employment_type).map(|t| t.as_str()),
                valid(&info.status).map(|s| s.as_str()),
                valid(&info.termination_date),
                contact.home_address,
                contact.personal_phone_number,
                contact.work_phone_number,
                contact.personal_email,
                contact.work_email,
                record.user_account,
                now,
                now,
            ],
        )?;

        Ok(Employee {
            id,
            record: record.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    fn map_row(row: &Row<'_>) -> rusqlite::Result<Employee> {
        let lenient_text = |col: &str| -> rusqlite::Result<Option<String>> { row.get(col) };

        let record = EmployeeRecord {
            employee_id: row.get("employee_id")?,
            user_account: row.get("user_account_id")?,
            full_name: row.get("full_name")?,
            date_of_birth: row
                .get::<_, Option<NaiveDate>>("date_of_birth")?
                .map(Lenient::Valid),
            gender: lenient_text("gender")?.map(|s| Lenient::parse(&s)),
            nationality: row.get("nationality")?,
            photo_url: row.get("photo_url")?,
            employment_info: EmploymentInfo {
                job_title: row.get("job_title")?,
                manager: row.get("manager_id")?,
                department: lenient_text("department")?.map(|s| Lenient::parse(&s)),
                hire_date: row
                    .get::<_, Option<NaiveDate>>("hire_date")?
                    .map(Lenient::Valid),
                employment_type: lenient_text("employment_type")?.map(|s| Lenient::parse(&s)),
                status: lenient_text("status")?.map(|s| Lenient::parse(&s)),
                termination_date: row
                    .get::<_, Option<NaiveDate>>("termination_date")?
                    .map(Lenient::Valid),
            },
            contact_info: ContactInfo {
                home_address: row.get("home_address")?,
                personal_phone_number: row.get("personal_phone")?,
                work_phone_number: row.get("work_phone")?,
                personal_email: row.get("personal_email")?,
                work_email: row.get("work_email")?,
            },
        };

        Ok(Employee {
            id: row.get("id")?,
            record,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }
}

#[async_trait]
impl EmployeeRepository for EmployeeRepositoryImpl {
    async fn insert_many_unordered(
        &self,
        records: Vec<EmployeeRecord>,
    ) -> RepositoryResult<BulkInsertOutcome> {
        let conn = self.lock()?;
        let mut outcome = BulkInsertOutcome::default();

        for (index, record) in records.iter().enumerate() {
            match Self::insert_record(&conn, record) {
                Ok(employee) => outcome.inserted.push(employee),
                Err(error) => {
                    debug!(index, error = %error, "单条插入失败，继续处理后续记录");
                    outcome.failures.push(BulkInsertFailure { index, error });
                }
            }
        }

        Ok(outcome)
    }

    async fn insert_one(&self, record: EmployeeRecord) -> RepositoryResult<Employee> {
        let conn = self.lock()?;
        Self::insert_record(&conn, &record)
    }

    async fn find_by_employee_id(&self, employee_id: &str) -> RepositoryResult<Option<Employee>> {
        let conn = self.lock()?;
        let employee = conn
            .query_row(
                "SELECT * FROM employee WHERE employee_id = ?1",
                params![employee_id],
                Self::map_row,
            )
            .optional()?;
        Ok(employee)
    }

    async fn list_all(&self) -> RepositoryResult<Vec<Employee>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT * FROM employee ORDER BY created_at, rowid")?;
        let rows = stmt.query_map([], Self::map_row)?;

        let mut employees = Vec::new();
        for row in rows {
            employees.push(row?);
        }
        Ok(employees)
    }

    async fn count(&self) -> RepositoryResult<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM employee", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::EmploymentStatus;

    fn setup() -> EmployeeRepositoryImpl {
        let conn = Connection::open_in_memory().unwrap();
        ensure_schema(&conn).unwrap();
        EmployeeRepositoryImpl::from_connection(Arc::new(Mutex::new(conn)))
    }

    fn record(employee_id: &str, work_email: &str) -> EmployeeRecord {
        EmployeeRecord {
            employee_id: Some(employee_id.to_string()),
            full_name: Some("Test Person".to_string()),
            date_of_birth: Some(Lenient::Valid(NaiveDate::from_ymd_opt(1991, 3, 4).unwrap())),
            employment_info: EmploymentInfo {
                job_title: Some("Analyst".to_string()),
                hire_date: Some(Lenient::Valid(NaiveDate::from_ymd_opt(2021, 7, 1).unwrap())),
                status: Some(Lenient::Valid(EmploymentStatus::Active)),
                ..Default::default()
            },
            contact_info: ContactInfo {
                work_email: Some(work_email.to_string()),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_insert_many_continues_after_duplicate() {
        let repo = setup();
        let outcome = repo
            .insert_many_unordered(vec![
                record("E001", "a@corp.test"),
                record("E001", "b@corp.test"),
                record("E002", "c@corp.test"),
            ])
            .await
            .unwrap();

        assert_eq!(outcome.inserted.len(), 2);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].index, 1);
        assert_eq!(duplicate_field(&outcome.failures[0].error), Some(FieldPath::EmployeeId));
        assert_eq!(repo.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_work_phone_unique_only_when_present() {
        let repo = setup();
        let mut first = record("E001", "a@corp.test");
        first.contact_info.work_phone_number = Some("555-0100".to_string());
        let mut clash = record("E002", "b@corp.test");
        clash.contact_info.work_phone_number = Some("555-0100".to_string());

        let outcome = repo
            .insert_many_unordered(vec![
                first,
                clash,
                record("E003", "c@corp.test"),
                record("E004", "d@corp.test"),
            ])
            .await
            .unwrap();

        assert_eq!(outcome.inserted.len(), 3);
        assert_eq!(duplicate_field(&outcome.failures[0].error), Some(FieldPath::WorkPhoneNumber));
    }

    #[tokio::test]
    async fn test_invalid_record_rejected_before_insert() {
        let repo = setup();
        let mut bad = record("E009", "z@corp.test");
        bad.date_of_birth = Some(Lenient::Invalid("31/31/1990".to_string()));

        let err = repo.insert_one(bad).await.unwrap_err();
        assert!(matches!(err, RepositoryError::RecordInvalid(_)));
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_round_trip_through_storage() {
        let repo = setup();
        let inserted = repo.insert_one(record("E100", "x@corp.test")).await.unwrap();

        let found = repo.find_by_employee_id("E100").await.unwrap().unwrap();
        assert_eq!(found.id, inserted.id);
        assert_eq!(found.record, inserted.record);
        assert!(repo.find_by_employee_id("nope").await.unwrap().is_none());
    }
}
