use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;

use crate::ledger::{
    AttendanceLedger, ClockInRequest, ClockInResult, ClockOutRequest, ClockOutResult,
};
use crate::model::attendance::AttendanceRecord;
use crate::query::{self, DayStatus};
use crate::store::SqlStore;

pub type Ledger = AttendanceLedger<SqlStore>;

#[derive(Debug, Deserialize, ToSchema)]
pub struct HistoryQuery {
    pub limit: Option<i64>,
}

/// Clock in for a session
#[utoipa::path(
    post,
    path = "/api/attendance/clock-in",
    request_body = ClockInRequest,
    responses(
        (status = 200, description = "Clocked in successfully", body = ClockInResult),
        (status = 400, description = "Rejected", body = Object, example = json!({
            "message": "Already clocked in for morning session today"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn clock_in(
    ledger: web::Data<Ledger>,
    payload: web::Json<ClockInRequest>,
) -> actix_web::Result<impl Responder> {
    let result = ledger.clock_in(&payload).await.map_err(|e| {
        tracing::error!(error = %e, employee_id = %payload.employee_id, "Clock-in failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    if !result.success {
        return Ok(HttpResponse::BadRequest().json(json!({ "message": result.message })));
    }

    Ok(HttpResponse::Ok().json(result))
}

/// Clock out from a session
#[utoipa::path(
    post,
    path = "/api/attendance/clock-out",
    request_body = ClockOutRequest,
    responses(
        (status = 200, description = "Clocked out successfully", body = ClockOutResult),
        (status = 400, description = "Rejected", body = Object, example = json!({
            "message": "No active clock-in found for morning session today"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn clock_out(
    ledger: web::Data<Ledger>,
    payload: web::Json<ClockOutRequest>,
) -> actix_web::Result<impl Responder> {
    let result = ledger.clock_out(&payload).await.map_err(|e| {
        tracing::error!(error = %e, employee_id = %payload.employee_id, "Clock-out failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    if !result.success {
        return Ok(HttpResponse::BadRequest().json(json!({ "message": result.message })));
    }

    Ok(HttpResponse::Ok().json(result))
}

/// Today's status across the four session windows
#[utoipa::path(
    get,
    path = "/api/attendance/status/{employee_id}",
    params(
        ("employee_id", Path, description = "Business employee identifier")
    ),
    responses(
        (status = 200, description = "Per-session status for today", body = DayStatus),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "message": "Employee not found"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn status(
    store: web::Data<SqlStore>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    let employee_id = path.into_inner();

    let status = query::status_for_today(store.get_ref(), &employee_id)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, employee_id, "Failed to build status");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    match status {
        Some(day) => Ok(HttpResponse::Ok().json(day)),
        None => Ok(HttpResponse::NotFound().json(json!({ "message": "Employee not found" }))),
    }
}

/// Attendance history for one employee
#[utoipa::path(
    get,
    path = "/api/attendance/history/{employee_id}",
    params(
        ("employee_id", Path, description = "Business employee identifier"),
        ("limit", Query, description = "Maximum records to return, default 50")
    ),
    responses(
        (status = 200, description = "Records, newest first", body = [AttendanceRecord]),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn history(
    store: web::Data<SqlStore>,
    path: web::Path<String>,
    q: web::Query<HistoryQuery>,
) -> actix_web::Result<impl Responder> {
    let employee_id = path.into_inner();
    let limit = q.limit.unwrap_or(query::DEFAULT_HISTORY_LIMIT).max(0);

    let records = query::history(store.get_ref(), &employee_id, limit)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, employee_id, "Failed to fetch history");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(records))
}

/// Attendance records across all employees
#[utoipa::path(
    get,
    path = "/api/attendance/all",
    params(
        ("limit", Query, description = "Maximum records to return, default 100")
    ),
    responses(
        (status = 200, description = "Records, newest first", body = [AttendanceRecord]),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn all_records(
    store: web::Data<SqlStore>,
    q: web::Query<HistoryQuery>,
) -> actix_web::Result<impl Responder> {
    let limit = q.limit.unwrap_or(query::DEFAULT_ALL_RECORDS_LIMIT).max(0);

    let records = query::all_records(store.get_ref(), limit).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to fetch records");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(records))
}
