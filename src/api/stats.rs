use crate::{error::ApiError, repository::HrmsRepository};
use actix_web::{HttpResponse, web};
use tracing::debug;

/// Dashboard counters
///
/// "Today" is the database server's `CURRENT_DATE`, so the count follows its time zone.
#[utoipa::path(
    get,
    path = "/api/stats/dashboard",
    responses(
        (status = 200, description = "Headline counts", body = DashboardStats),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tag = "Stats"
)]
pub async fn dashboard(repo: web::Data<dyn HrmsRepository>) -> Result<HttpResponse, ApiError> {
    let stats = repo
        .dashboard_stats()
        .await
        .map_err(ApiError::database("Failed to load dashboard stats"))?;

    debug!(?stats, "Dashboard stats");
    Ok(HttpResponse::Ok().json(stats))
}
