use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
pub enum AttendanceStatus {
    Present,
    Absent,
}

/// A stored attendance row. `status` is kept as the raw column text so rows written
/// before status validation existed still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "employee_id": "EMP-001",
        "date": "2024-01-01",
        "status": "Present"
    })
)]
pub struct Attendance {
    #[schema(example = 1)]
    pub id: i32,

    #[schema(example = "EMP-001")]
    pub employee_id: String,

    #[schema(example = "2024-01-01", value_type = String, format = "date")]
    pub date: NaiveDate,

    #[schema(example = "Present")]
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAttendance {
    pub employee_id: String,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
}

/// Inclusive date window applied to attendance queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// One row of a `GROUP BY status` count.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AttendanceSummary {
    #[serde(rename = "Present")]
    #[schema(example = 20)]
    pub present: i64,

    #[serde(rename = "Absent")]
    #[schema(example = 2)]
    pub absent: i64,
}

impl AttendanceSummary {
    /// Folds grouped counts into the two known statuses; anything else is dropped.
    pub fn from_counts<'a, I>(counts: I) -> Self
    where
        I: IntoIterator<Item = &'a StatusCount>,
    {
        let mut summary = Self::default();
        for row in counts {
            match row.status.parse::<AttendanceStatus>() {
                Ok(AttendanceStatus::Present) => summary.present = row.count,
                Ok(AttendanceStatus::Absent) => summary.absent = row.count,
                Err(_) => {}
            }
        }
        summary
    }
}
