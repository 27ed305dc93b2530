use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    #[schema(example = 42)]
    pub total_employees: i64,

    /// `Present` marks dated today by the database clock.
    #[schema(example = 37)]
    pub today_attendance: i64,

    #[schema(example = 5)]
    pub departments: i64,
}
