use crate::{
    api::{required, scalar_text},
    error::{ApiError, FIELDS_REQUIRED},
    model::attendance::{
        Attendance, AttendanceStatus, AttendanceSummary, DateRange, NewAttendance,
    },
    repository::HrmsRepository,
};
use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use utoipa::{IntoParams, ToSchema};

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct MarkAttendance {
    #[schema(example = "EMP-001", value_type = String)]
    #[serde(default, deserialize_with = "scalar_text")]
    pub employee_id: Option<String>,
    #[schema(example = "2024-01-01", format = "date", value_type = String)]
    #[serde(default, deserialize_with = "scalar_text")]
    pub date: Option<String>,
    #[schema(example = "Present", value_type = AttendanceStatus)]
    #[serde(default, deserialize_with = "scalar_text")]
    pub status: Option<String>,
}

impl MarkAttendance {
    pub fn validate(self) -> Result<NewAttendance, ApiError> {
        let (employee_id, date, status) =
            match (required(self.employee_id), required(self.date), required(self.status)) {
                (Some(e), Some(d), Some(s)) => (e, d, s),
                _ => return Err(ApiError::validation(FIELDS_REQUIRED)),
            };

        let date = parse_date(&date)?;
        let status = status
            .parse::<AttendanceStatus>()
            .map_err(|_| ApiError::validation("Status must be Present or Absent"))?;

        Ok(NewAttendance {
            employee_id,
            date,
            status,
        })
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct AttendanceQuery {
    /// Inclusive lower bound (YYYY-MM-DD); ignored unless `endDate` is also given
    pub start_date: Option<String>,
    /// Inclusive upper bound (YYYY-MM-DD); ignored unless `startDate` is also given
    pub end_date: Option<String>,
}

impl AttendanceQuery {
    /// Both bounds or no filter at all; a lone bound is dropped.
    pub fn date_range(&self) -> Result<Option<DateRange>, ApiError> {
        match (
            required(self.start_date.clone()),
            required(self.end_date.clone()),
        ) {
            (Some(start), Some(end)) => Ok(Some(DateRange {
                start: parse_date(&start)?,
                end: parse_date(&end)?,
            })),
            _ => Ok(None),
        }
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|_| ApiError::validation("Invalid date format, expected YYYY-MM-DD"))
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AttendanceReport {
    pub records: Vec<Attendance>,
    pub summary: AttendanceSummary,
}

/// Mark Attendance
#[utoipa::path(
    post,
    path = "/api/attendance",
    request_body = MarkAttendance,
    responses(
        (status = 201, description = "Attendance recorded (created or overwritten)", body = Attendance),
        (status = 400, description = "Missing or invalid fields", body = ErrorBody, example = json!({
            "error": "All fields are required"
        })),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tag = "Attendance"
)]
pub async fn mark_attendance(
    repo: web::Data<dyn HrmsRepository>,
    payload: web::Json<MarkAttendance>,
) -> Result<HttpResponse, ApiError> {
    let mark = payload.into_inner().validate()?;

    let record = repo
        .mark_attendance(&mark)
        .await
        .map_err(ApiError::database("Failed to mark attendance"))?;

    info!(
        employee_id = %record.employee_id,
        date = %record.date,
        status = %record.status,
        "Attendance marked"
    );
    // 201 for both insert and overwrite.
    Ok(HttpResponse::Created().json(record))
}

/// Attendance for one employee
#[utoipa::path(
    get,
    path = "/api/attendance/{employee_id}",
    params(
        ("employee_id", Path, description = "Employee code"),
        AttendanceQuery
    ),
    responses(
        (status = 200, description = "Records (latest first) and per-status totals", body = AttendanceReport),
        (status = 400, description = "Malformed date", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tag = "Attendance"
)]
pub async fn employee_attendance(
    repo: web::Data<dyn HrmsRepository>,
    path: web::Path<String>,
    query: web::Query<AttendanceQuery>,
) -> Result<HttpResponse, ApiError> {
    let employee_id = path.into_inner();
    let range = query.date_range()?;

    let records = repo
        .attendance_records(&employee_id, range)
        .await
        .map_err(ApiError::database("Failed to fetch attendance records"))?;

    let counts = repo
        .attendance_status_counts(&employee_id, range)
        .await
        .map_err(ApiError::database("Failed to summarise attendance"))?;

    debug!(employee_id = %employee_id, ?range, records = records.len(), "Attendance fetched");
    Ok(HttpResponse::Ok().json(AttendanceReport {
        records,
        summary: AttendanceSummary::from_counts(&counts),
    }))
}
