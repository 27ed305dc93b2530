use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

use crate::db::DbError;

pub const FIELDS_REQUIRED: &str = "All fields are required";
pub const DUPLICATE_EMPLOYEE: &str = "Employee ID or Email already exists";
pub const INTERNAL_ERROR: &str = "Internal Server Error";

/// Body shared by every failing endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    #[schema(example = "All fields are required")]
    pub error: String,
}

#[derive(Debug, Display)]
pub enum ApiError {
    /// Missing or malformed input.
    #[display(fmt = "{}", _0)]
    Validation(String),

    /// Unique constraint hit on insert.
    #[display(fmt = "{}", DUPLICATE_EMPLOYEE)]
    Conflict,

    /// Anything else the driver reported; the detail never leaves the server.
    #[display(fmt = "{}", INTERNAL_ERROR)]
    Database(DbError),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation(message.into())
    }

    /// Logs the driver error with `context` and wraps it for the response.
    pub fn database(context: &'static str) -> impl FnOnce(DbError) -> ApiError {
        move |e| {
            error!(error = %e, code = ?e.code(), "{}", context);
            ApiError::Database(e)
        }
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        ApiError::Database(e)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            // Duplicates answer 400 rather than 409; existing clients key off it.
            ApiError::Validation(_) | ApiError::Conflict => StatusCode::BAD_REQUEST,
            ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.to_string(),
        })
    }
}

pub fn json_error_handler(
    err: actix_web::error::JsonPayloadError,
    _req: &HttpRequest,
) -> actix_web::Error {
    tracing::debug!(error = %err, "Rejected JSON body");
    ApiError::validation("Invalid JSON body").into()
}

pub fn path_error_handler(
    err: actix_web::error::PathError,
    _req: &HttpRequest,
) -> actix_web::Error {
    tracing::debug!(error = %err, "Rejected path parameter");
    ApiError::validation("Invalid path parameter").into()
}

pub fn query_error_handler(
    err: actix_web::error::QueryPayloadError,
    _req: &HttpRequest,
) -> actix_web::Error {
    tracing::debug!(error = %err, "Rejected query string");
    ApiError::validation("Invalid query string").into()
}
