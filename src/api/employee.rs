use crate::{
    api::{required, scalar_text},
    error::{ApiError, FIELDS_REQUIRED},
    model::employee::NewEmployee,
    repository::HrmsRepository,
};
use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use utoipa::ToSchema;

/// Fields are optional at the wire level so a missing one answers with the shared
/// validation message instead of a deserializer error.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct CreateEmployee {
    #[schema(example = "EMP-001", value_type = String)]
    #[serde(default, deserialize_with = "scalar_text")]
    pub employee_id: Option<String>,
    #[schema(example = "John Doe", value_type = String)]
    #[serde(default, deserialize_with = "scalar_text")]
    pub full_name: Option<String>,
    #[schema(example = "john@email.com", format = "email", value_type = String)]
    #[serde(default, deserialize_with = "scalar_text")]
    pub email: Option<String>,
    #[schema(example = "Engineering", value_type = String)]
    #[serde(default, deserialize_with = "scalar_text")]
    pub department: Option<String>,
}

impl CreateEmployee {
    pub fn validate(self) -> Result<NewEmployee, ApiError> {
        match (
            required(self.employee_id),
            required(self.full_name),
            required(self.email),
            required(self.department),
        ) {
            (Some(employee_id), Some(full_name), Some(email), Some(department)) => Ok(NewEmployee {
                employee_id,
                full_name,
                email,
                department,
            }),
            _ => Err(ApiError::validation(FIELDS_REQUIRED)),
        }
    }
}

/// List Employees
#[utoipa::path(
    get,
    path = "/api/employees",
    responses(
        (status = 200, description = "All employees, newest first", body = [Employee]),
        (status = 500, description = "Internal server error", body = ErrorBody, example = json!({
            "error": "Internal Server Error"
        }))
    ),
    tag = "Employee"
)]
pub async fn list_employees(
    repo: web::Data<dyn HrmsRepository>,
) -> Result<HttpResponse, ApiError> {
    let employees = repo
        .list_employees()
        .await
        .map_err(ApiError::database("Failed to fetch employees"))?;

    debug!(count = employees.len(), "Listed employees");
    Ok(HttpResponse::Ok().json(employees))
}

/// Create Employee
#[utoipa::path(
    post,
    path = "/api/employees",
    request_body = CreateEmployee,
    responses(
        (status = 201, description = "Employee created", body = Employee),
        (status = 400, description = "Missing fields or duplicate code/email", body = ErrorBody, example = json!({
            "error": "Employee ID or Email already exists"
        })),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tag = "Employee"
)]
pub async fn create_employee(
    repo: web::Data<dyn HrmsRepository>,
    payload: web::Json<CreateEmployee>,
) -> Result<HttpResponse, ApiError> {
    let new_employee = payload.into_inner().validate()?;

    let employee = repo.create_employee(&new_employee).await.map_err(|e| {
        if e.is_unique_violation() {
            warn!(employee_id = %new_employee.employee_id, "Duplicate employee code or email");
            ApiError::Conflict
        } else {
            ApiError::database("Failed to create employee")(e)
        }
    })?;

    info!(id = employee.id, employee_id = %employee.employee_id, "Employee created");
    Ok(HttpResponse::Created().json(employee))
}

/// Delete Employee
#[utoipa::path(
    delete,
    path = "/api/employees/{id}",
    params(
        ("id", Path, description = "Internal employee id")
    ),
    responses(
        (status = 204, description = "Deleted, or there was nothing to delete"),
        (status = 400, description = "Non-numeric id", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tag = "Employee"
)]
pub async fn delete_employee(
    repo: web::Data<dyn HrmsRepository>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();

    // Ids are SERIAL, so anything outside i32 cannot match a row.
    let removed = match i32::try_from(id) {
        Ok(id) => repo
            .delete_employee(id)
            .await
            .map_err(ApiError::database("Failed to delete employee"))?,
        Err(_) => 0,
    };

    // Attendance rows keyed by the employee code stay in place.
    info!(id, removed, "Employee delete processed");
    Ok(HttpResponse::NoContent().finish())
}
