//! In-process stand-in for [`PgRepository`](crate::repository::PgRepository) used by handler tests.
//!
//! Mirrors the schema's constraints: unique employee code and email, one attendance row per
//! (code, date), and no cascade from employees to attendance.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, Utc};

use crate::db::{DbError, UNIQUE_VIOLATION};
use crate::model::attendance::{
    Attendance, AttendanceStatus, DateRange, NewAttendance, StatusCount,
};
use crate::model::employee::{Employee, NewEmployee};
use crate::model::stats::DashboardStats;
use crate::repository::HrmsRepository;

/// Builds the API service over `$repo` (an `Arc` of any repository) for `actix_web::test` calls.
macro_rules! test_app {
    ($repo:expr) => {{
        let repo: std::sync::Arc<dyn $crate::repository::HrmsRepository> = $repo.clone();
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::from(repo))
                .configure(|cfg| $crate::routes::configure(cfg, "/api")),
        )
        .await
    }};
}
pub(crate) use test_app;

#[derive(Default)]
struct State {
    employees: Vec<Employee>,
    attendance: Vec<Attendance>,
    next_employee_id: i32,
    next_attendance_id: i32,
}

#[derive(Default)]
pub struct MemoryRepository {
    state: Mutex<State>,
    fail_with: Mutex<Option<String>>,
}

impl MemoryRepository {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Makes every following call fail with a driver error carrying `message`.
    pub fn fail_all(&self, message: &str) {
        *self.fail_with.lock().unwrap() = Some(message.to_string());
    }

    pub fn attendance_rows(&self) -> Vec<Attendance> {
        self.state.lock().unwrap().attendance.clone()
    }

    /// Seeds a row directly, bypassing status validation.
    pub fn insert_raw_attendance(&self, employee_id: &str, date: chrono::NaiveDate, status: &str) {
        let mut state = self.state.lock().unwrap();
        state.next_attendance_id += 1;
        let id = state.next_attendance_id;
        state.attendance.push(Attendance {
            id,
            employee_id: employee_id.to_string(),
            date,
            status: status.to_string(),
        });
    }

    fn check_failure(&self) -> Result<(), DbError> {
        match self.fail_with.lock().unwrap().as_deref() {
            Some(message) => Err(DbError::new(Some("08006"), message)),
            None => Ok(()),
        }
    }

    fn filtered(state: &State, employee_id: &str, range: Option<DateRange>) -> Vec<Attendance> {
        state
            .attendance
            .iter()
            .filter(|a| a.employee_id == employee_id)
            .filter(|a| range.is_none_or(|r| r.contains(a.date)))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl HrmsRepository for MemoryRepository {
    async fn list_employees(&self) -> Result<Vec<Employee>, DbError> {
        self.check_failure()?;
        let mut employees = self.state.lock().unwrap().employees.clone();
        employees.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(employees)
    }

    async fn create_employee(&self, employee: &NewEmployee) -> Result<Employee, DbError> {
        self.check_failure()?;
        let mut state = self.state.lock().unwrap();

        let taken = state
            .employees
            .iter()
            .any(|e| e.employee_id == employee.employee_id || e.email == employee.email);
        if taken {
            return Err(DbError::new(
                Some(UNIQUE_VIOLATION),
                "duplicate key value violates unique constraint",
            ));
        }

        state.next_employee_id += 1;
        let id = state.next_employee_id;
        let row = Employee {
            id,
            employee_id: employee.employee_id.clone(),
            full_name: employee.full_name.clone(),
            email: employee.email.clone(),
            department: employee.department.clone(),
            // Spread timestamps so creation order survives clock granularity.
            created_at: Utc::now() + Duration::milliseconds(i64::from(id)),
        };
        state.employees.push(row.clone());
        Ok(row)
    }

    async fn delete_employee(&self, id: i32) -> Result<u64, DbError> {
        self.check_failure()?;
        let mut state = self.state.lock().unwrap();
        let before = state.employees.len();
        state.employees.retain(|e| e.id != id);
        Ok((before - state.employees.len()) as u64)
    }

    async fn dashboard_stats(&self) -> Result<DashboardStats, DbError> {
        self.check_failure()?;
        let state = self.state.lock().unwrap();
        let today = Utc::now().date_naive();
        let present = AttendanceStatus::Present.to_string();

        let departments: HashSet<&str> =
            state.employees.iter().map(|e| e.department.as_str()).collect();

        Ok(DashboardStats {
            total_employees: state.employees.len() as i64,
            today_attendance: state
                .attendance
                .iter()
                .filter(|a| a.date == today && a.status == present)
                .count() as i64,
            departments: departments.len() as i64,
        })
    }

    async fn attendance_records(
        &self,
        employee_id: &str,
        range: Option<DateRange>,
    ) -> Result<Vec<Attendance>, DbError> {
        self.check_failure()?;
        let state = self.state.lock().unwrap();
        let mut records = Self::filtered(&state, employee_id, range);
        records.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(records)
    }

    async fn attendance_status_counts(
        &self,
        employee_id: &str,
        range: Option<DateRange>,
    ) -> Result<Vec<StatusCount>, DbError> {
        self.check_failure()?;
        let state = self.state.lock().unwrap();
        let mut counts: Vec<StatusCount> = Vec::new();
        for record in Self::filtered(&state, employee_id, range) {
            match counts.iter_mut().find(|c| c.status == record.status) {
                Some(c) => c.count += 1,
                None => counts.push(StatusCount {
                    status: record.status,
                    count: 1,
                }),
            }
        }
        Ok(counts)
    }

    async fn mark_attendance(&self, mark: &NewAttendance) -> Result<Attendance, DbError> {
        self.check_failure()?;
        let mut state = self.state.lock().unwrap();
        let status = mark.status.to_string();

        if let Some(existing) = state
            .attendance
            .iter_mut()
            .find(|a| a.employee_id == mark.employee_id && a.date == mark.date)
        {
            existing.status = status;
            return Ok(existing.clone());
        }

        state.next_attendance_id += 1;
        let row = Attendance {
            id: state.next_attendance_id,
            employee_id: mark.employee_id.clone(),
            date: mark.date,
            status,
        };
        state.attendance.push(row.clone());
        Ok(row)
    }
}
