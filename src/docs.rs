use crate::api::attendance::{AttendanceReport, MarkAttendance};
use crate::api::employee::CreateEmployee;
use crate::api::health::HealthResponse;
use crate::error::ErrorBody;
use crate::model::attendance::{Attendance, AttendanceStatus, AttendanceSummary};
use crate::model::employee::Employee;
use crate::model::stats::DashboardStats;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HRMS Lite API",
        version = "1.0.0",
        description = r#"
## HRMS Lite

Employee records and daily attendance for a single administrative client.

### Key Features
- **Employees**: create, list (newest first) and delete
- **Attendance**: mark a day as Present/Absent (re-marking overwrites), query per
  employee with an optional inclusive date range and per-status totals
- **Dashboard**: head count, today's presence, number of departments

### Errors
Every failure answers with `{ "error": "<message>" }`. Missing fields and duplicate
employee codes/emails are `400`; database failures are `500` with a generic message.

---
Built with **Rust**, **Actix Web**, **SQLx** (PostgreSQL), and **Utoipa**.
"#,
    ),
    paths(
        crate::api::employee::list_employees,
        crate::api::employee::create_employee,
        crate::api::employee::delete_employee,

        crate::api::attendance::mark_attendance,
        crate::api::attendance::employee_attendance,

        crate::api::stats::dashboard,

        crate::api::health::health
    ),
    components(
        schemas(
            Employee,
            CreateEmployee,
            Attendance,
            AttendanceStatus,
            AttendanceSummary,
            AttendanceReport,
            MarkAttendance,
            DashboardStats,
            HealthResponse,
            ErrorBody
        )
    ),
    tags(
        (name = "Employee", description = "Employee management APIs"),
        (name = "Attendance", description = "Attendance management APIs"),
        (name = "Stats", description = "Dashboard aggregates"),
        (name = "Health", description = "Liveness probe"),
    )
)]
pub struct ApiDoc;
