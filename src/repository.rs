use async_trait::async_trait;

use crate::db::{Database, DbError, SqlValue};
use crate::model::attendance::{
    Attendance, AttendanceStatus, DateRange, NewAttendance, StatusCount,
};
use crate::model::employee::{Employee, NewEmployee};
use crate::model::stats::DashboardStats;

/// Every query the HTTP layer issues. Handlers hold this behind `web::Data<dyn HrmsRepository>`.
#[async_trait]
pub trait HrmsRepository: Send + Sync {
    /// Newest first.
    async fn list_employees(&self) -> Result<Vec<Employee>, DbError>;

    /// Fails with a unique-violation `DbError` when the code or email is taken.
    async fn create_employee(&self, employee: &NewEmployee) -> Result<Employee, DbError>;

    /// Returns the number of rows removed (0 or 1).
    async fn delete_employee(&self, id: i32) -> Result<u64, DbError>;

    async fn dashboard_stats(&self) -> Result<DashboardStats, DbError>;

    /// Records for one employee code, latest date first.
    async fn attendance_records(
        &self,
        employee_id: &str,
        range: Option<DateRange>,
    ) -> Result<Vec<Attendance>, DbError>;

    /// Per-status totals over the same filter as `attendance_records`.
    async fn attendance_status_counts(
        &self,
        employee_id: &str,
        range: Option<DateRange>,
    ) -> Result<Vec<StatusCount>, DbError>;

    /// Inserts, or overwrites the status of the existing (employee, date) row.
    async fn mark_attendance(&self, mark: &NewAttendance) -> Result<Attendance, DbError>;
}

const EMPLOYEE_COLUMNS: &str = "id, employee_id, full_name, email, department, created_at";
const ATTENDANCE_COLUMNS: &str = "id, employee_id, date, status";

/// WHERE clause shared by the record listing and the summary count.
pub(crate) fn attendance_filter(
    employee_id: &str,
    range: Option<DateRange>,
) -> (String, Vec<SqlValue>) {
    let mut clause = String::from("WHERE employee_id = $1");
    let mut params = vec![SqlValue::from(employee_id)];

    if let Some(range) = range {
        clause.push_str(" AND date BETWEEN $2 AND $3");
        params.push(range.start.into());
        params.push(range.end.into());
    }

    (clause, params)
}

pub struct PgRepository {
    db: Database,
}

impl PgRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl HrmsRepository for PgRepository {
    async fn list_employees(&self) -> Result<Vec<Employee>, DbError> {
        let sql = format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees ORDER BY created_at DESC, id DESC"
        );
        self.db.fetch_all_as(&sql, &[]).await
    }

    async fn create_employee(&self, employee: &NewEmployee) -> Result<Employee, DbError> {
        let sql = format!(
            "INSERT INTO employees (employee_id, full_name, email, department) \
             VALUES ($1, $2, $3, $4) RETURNING {EMPLOYEE_COLUMNS}"
        );
        let params = [
            SqlValue::from(employee.employee_id.as_str()),
            SqlValue::from(employee.full_name.as_str()),
            SqlValue::from(employee.email.as_str()),
            SqlValue::from(employee.department.as_str()),
        ];
        self.db.fetch_one_as(&sql, &params).await
    }

    async fn delete_employee(&self, id: i32) -> Result<u64, DbError> {
        let rows = self
            .db
            .execute(
                "DELETE FROM employees WHERE id = $1 RETURNING id",
                &[SqlValue::from(id)],
            )
            .await?;
        Ok(rows.len() as u64)
    }

    async fn dashboard_stats(&self) -> Result<DashboardStats, DbError> {
        let total_employees = self
            .db
            .fetch_scalar("SELECT COUNT(*) FROM employees", &[])
            .await?;

        let today_attendance = self
            .db
            .fetch_scalar(
                "SELECT COUNT(*) FROM attendance WHERE date = CURRENT_DATE AND status = $1",
                &[SqlValue::from(AttendanceStatus::Present.to_string())],
            )
            .await?;

        let department_groups = self
            .db
            .execute(
                "SELECT department, COUNT(*) AS count FROM employees GROUP BY department",
                &[],
            )
            .await?;

        Ok(DashboardStats {
            total_employees,
            today_attendance,
            departments: department_groups.len() as i64,
        })
    }

    async fn attendance_records(
        &self,
        employee_id: &str,
        range: Option<DateRange>,
    ) -> Result<Vec<Attendance>, DbError> {
        let (filter, params) = attendance_filter(employee_id, range);
        let sql = format!("SELECT {ATTENDANCE_COLUMNS} FROM attendance {filter} ORDER BY date DESC");
        self.db.fetch_all_as(&sql, &params).await
    }

    async fn attendance_status_counts(
        &self,
        employee_id: &str,
        range: Option<DateRange>,
    ) -> Result<Vec<StatusCount>, DbError> {
        let (filter, params) = attendance_filter(employee_id, range);
        let sql = format!("SELECT status, COUNT(*) AS count FROM attendance {filter} GROUP BY status");
        self.db.fetch_all_as(&sql, &params).await
    }

    async fn mark_attendance(&self, mark: &NewAttendance) -> Result<Attendance, DbError> {
        let sql = format!(
            "INSERT INTO attendance (employee_id, date, status) VALUES ($1, $2, $3) \
             ON CONFLICT (employee_id, date) DO UPDATE SET status = EXCLUDED.status \
             RETURNING {ATTENDANCE_COLUMNS}"
        );
        let params = [
            SqlValue::from(mark.employee_id.as_str()),
            SqlValue::from(mark.date),
            SqlValue::from(mark.status.to_string()),
        ];
        self.db.fetch_one_as(&sql, &params).await
    }
}
