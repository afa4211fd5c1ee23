use chrono::{NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::geofence;
use crate::store::AttendanceStore;

pub const MSG_LOCATION_NOT_AUTHORIZED: &str =
    "Location not authorized. You must be within range of an authorized location.";
pub const MSG_EMPLOYEE_NOT_FOUND: &str = "Employee not found";

/// Start of the UTC calendar day containing `now`.
pub fn utc_day_start(now: NaiveDateTime) -> NaiveDateTime {
    now.date().and_time(NaiveTime::MIN)
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ClockInRequest {
    #[schema(example = "EMP-001")]
    pub employee_id: String,
    /// morning, lunch, afternoon or evening.
    #[schema(example = "morning")]
    pub session_type: String,
    #[schema(example = 37.0)]
    pub latitude: f64,
    #[schema(example = -122.0)]
    pub longitude: f64,
    /// Fresh capture from the device; overwrites the stored one when present.
    pub face_descriptor: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ClockOutRequest {
    #[schema(example = "EMP-001")]
    pub employee_id: String,
    #[schema(example = "morning")]
    pub session_type: String,
    #[schema(example = 37.0)]
    pub latitude: f64,
    #[schema(example = -122.0)]
    pub longitude: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ClockInResult {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attendance_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, format = "date-time")]
    pub clock_in_time: Option<NaiveDateTime>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ClockOutResult {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attendance_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, format = "date-time")]
    pub clock_out_time: Option<NaiveDateTime>,
}

impl ClockInResult {
    fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            attendance_id: None,
            clock_in_time: None,
        }
    }
}

impl ClockOutResult {
    fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            attendance_id: None,
            clock_out_time: None,
        }
    }
}

/// The attendance session state machine. Each (employee, session_type, UTC
/// day) slot moves NoRecord -> Open -> Closed, one full cycle per day.
/// Rejections come back as ordinary results; only the storage boundary
/// produces errors.
pub struct AttendanceLedger<S> {
    store: S,
}

impl<S: AttendanceStore> AttendanceLedger<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Preconditions in order: geofence, employee, free slot. The duplicate
    /// check does not distinguish an open record from a closed one, so a
    /// slot stays exhausted for the day once used.
    pub async fn clock_in(&self, req: &ClockInRequest) -> sqlx::Result<ClockInResult> {
        let zones = self.store.list_zones().await?;
        if !geofence::is_within_authorized(req.latitude, req.longitude, &zones) {
            return Ok(ClockInResult::rejected(MSG_LOCATION_NOT_AUTHORIZED));
        }

        let Some(employee) = self.store.find_employee(&req.employee_id).await? else {
            return Ok(ClockInResult::rejected(MSG_EMPLOYEE_NOT_FOUND));
        };

        if let Some(descriptor) = req.face_descriptor.as_deref() {
            self.store
                .update_face_descriptor(employee.id, descriptor)
                .await?;
        }

        let now = Utc::now().naive_utc();
        let inserted = self
            .store
            .insert_clock_in(
                employee.id,
                &req.session_type,
                now,
                req.latitude,
                req.longitude,
                utc_day_start(now),
            )
            .await?;

        match inserted {
            Some(attendance_id) => {
                info!(
                    employee_id = %req.employee_id,
                    session = %req.session_type,
                    attendance_id,
                    "clocked in"
                );
                Ok(ClockInResult {
                    success: true,
                    message: format!(
                        "Successfully clocked in for {} session",
                        req.session_type
                    ),
                    attendance_id: Some(attendance_id),
                    clock_in_time: Some(now),
                })
            }
            None => Ok(ClockInResult::rejected(format!(
                "Already clocked in for {} session today",
                req.session_type
            ))),
        }
    }

    /// Closes the most recent open record whose clock-in falls on the
    /// clock-out request's UTC day. The close is guarded, so a record is
    /// only ever closed once.
    pub async fn clock_out(&self, req: &ClockOutRequest) -> sqlx::Result<ClockOutResult> {
        let zones = self.store.list_zones().await?;
        if !geofence::is_within_authorized(req.latitude, req.longitude, &zones) {
            return Ok(ClockOutResult::rejected(MSG_LOCATION_NOT_AUTHORIZED));
        }

        let Some(employee) = self.store.find_employee(&req.employee_id).await? else {
            return Ok(ClockOutResult::rejected(MSG_EMPLOYEE_NOT_FOUND));
        };

        let now = Utc::now().naive_utc();
        let open = self
            .store
            .find_open_record(employee.id, &req.session_type, utc_day_start(now))
            .await?;

        let Some(record) = open else {
            return Ok(ClockOutResult::rejected(format!(
                "No active clock-in found for {} session today",
                req.session_type
            )));
        };

        let applied = self
            .store
            .close_record(record.id, now, req.latitude, req.longitude)
            .await?;
        if !applied {
            // Lost the race against a concurrent clock-out.
            return Ok(ClockOutResult::rejected(format!(
                "No active clock-in found for {} session today",
                req.session_type
            )));
        }

        info!(
            employee_id = %req.employee_id,
            session = %req.session_type,
            attendance_id = record.id,
            "clocked out"
        );
        Ok(ClockOutResult {
            success: true,
            message: format!("Successfully clocked out for {} session", req.session_type),
            attendance_id: Some(record.id),
            clock_out_time: Some(now),
        })
    }
}
