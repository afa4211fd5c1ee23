use actix_web::{HttpResponse, Responder, web};
use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;
use utoipa::ToSchema;

use crate::model::employee::Employee;
use crate::store::{AttendanceStore, SqlStore};

#[derive(Deserialize, Serialize, ToSchema)]
pub struct CreateEmployee {
    #[schema(example = "EMP-001")]
    pub employee_id: String,
    #[schema(example = "John Doe")]
    pub name: String,
    #[schema(example = "john@email.com", format = "email")]
    pub email: String,
    /// Optional initial biometric descriptor blob.
    pub face_descriptor: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct EmployeeResponse {
    pub id: i64,
    pub employee_id: String,
    pub name: String,
    pub email: String,
    #[schema(value_type = String, format = "date-time")]
    pub created_at: NaiveDateTime,
}

impl From<Employee> for EmployeeResponse {
    fn from(e: Employee) -> Self {
        Self {
            id: e.id,
            employee_id: e.employee_id,
            name: e.name,
            email: e.email,
            created_at: e.created_at,
        }
    }
}

/// Register an employee
#[utoipa::path(
    post,
    path = "/api/employees",
    request_body = CreateEmployee,
    responses(
        (status = 201, description = "Employee created", body = EmployeeResponse),
        (status = 400, description = "Employee ID already exists", body = Object, example = json!({
            "message": "Employee ID already exists"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee"
)]
pub async fn create_employee(
    store: web::Data<SqlStore>,
    payload: web::Json<CreateEmployee>,
) -> actix_web::Result<impl Responder> {
    let existing = store
        .find_employee(&payload.employee_id)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to look up employee");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    if existing.is_some() {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Employee ID already exists"
        })));
    }

    let employee = store
        .insert_employee(
            &payload.employee_id,
            &payload.name,
            &payload.email,
            payload.face_descriptor.as_deref(),
            Utc::now().naive_utc(),
        )
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to create employee");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Created().json(EmployeeResponse::from(employee)))
}

/// List all employees
#[utoipa::path(
    get,
    path = "/api/employees",
    responses(
        (status = 200, description = "All employees", body = [EmployeeResponse]),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee"
)]
pub async fn list_employees(store: web::Data<SqlStore>) -> actix_web::Result<impl Responder> {
    let employees = store.list_employees().await.map_err(|e| {
        error!(error = %e, "Failed to list employees");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let employees: Vec<EmployeeResponse> =
        employees.into_iter().map(EmployeeResponse::from).collect();
    Ok(HttpResponse::Ok().json(employees))
}

/// Get one employee by business identifier
#[utoipa::path(
    get,
    path = "/api/employees/{employee_id}",
    params(
        ("employee_id", Path, description = "Business employee identifier")
    ),
    responses(
        (status = 200, description = "Employee found", body = EmployeeResponse),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "message": "Employee not found"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee"
)]
pub async fn get_employee(
    store: web::Data<SqlStore>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    let employee_id = path.into_inner();

    let employee = store.find_employee(&employee_id).await.map_err(|e| {
        error!(error = %e, employee_id, "Failed to fetch employee");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    match employee {
        Some(emp) => Ok(HttpResponse::Ok().json(EmployeeResponse::from(emp))),
        None => Ok(HttpResponse::NotFound().json(json!({ "message": "Employee not found" }))),
    }
}
