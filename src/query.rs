use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;
use strum::IntoEnumIterator;
use utoipa::ToSchema;

use crate::ledger::utc_day_start;
use crate::model::attendance::{AttendanceRecord, SessionType, SlotState};
use crate::store::AttendanceStore;

pub const DEFAULT_HISTORY_LIMIT: i64 = 50;
pub const DEFAULT_ALL_RECORDS_LIMIT: i64 = 100;

#[derive(Debug, Serialize, ToSchema)]
pub struct SessionStatus {
    pub clocked_in: bool,
    pub clocked_out: bool,
    #[schema(value_type = Option<String>, format = "date-time")]
    pub clock_in_time: Option<NaiveDateTime>,
    #[schema(value_type = Option<String>, format = "date-time")]
    pub clock_out_time: Option<NaiveDateTime>,
}

impl SessionStatus {
    fn from_slot(record: Option<&AttendanceRecord>) -> Self {
        let state = SlotState::of(record);
        Self {
            clocked_in: state != SlotState::NoRecord,
            clocked_out: state == SlotState::Closed,
            clock_in_time: record.and_then(|r| r.clock_in_time),
            clock_out_time: record.and_then(|r| r.clock_out_time),
        }
    }
}

/// Today's attendance for one employee, one entry per session window.
/// The shape is fixed; sessions without a record report false/null.
#[derive(Debug, Serialize, ToSchema)]
pub struct DayStatus {
    pub employee_id: String,
    pub employee_name: String,
    #[schema(value_type = String, format = "date")]
    pub date: NaiveDate,
    pub sessions: BTreeMap<SessionType, SessionStatus>,
}

/// Builds the fixed four-session projection for the current UTC day.
/// `None` when the employee identifier does not resolve; the boundary maps
/// that to a not-found response.
pub async fn status_for_today<S: AttendanceStore>(
    store: &S,
    employee_id: &str,
) -> sqlx::Result<Option<DayStatus>> {
    let Some(employee) = store.find_employee(employee_id).await? else {
        return Ok(None);
    };

    let now = Utc::now().naive_utc();
    let day_start = utc_day_start(now);

    let mut sessions = BTreeMap::new();
    for session in SessionType::iter() {
        let record = store
            .find_record_for_day(employee.id, &session.to_string(), day_start)
            .await?;
        sessions.insert(session, SessionStatus::from_slot(record.as_ref()));
    }

    Ok(Some(DayStatus {
        employee_id: employee.employee_id,
        employee_name: employee.name,
        date: now.date(),
        sessions,
    }))
}

/// Attendance history for one employee, newest created first. An unknown
/// employee yields an empty list, not an error.
pub async fn history<S: AttendanceStore>(
    store: &S,
    employee_id: &str,
    limit: i64,
) -> sqlx::Result<Vec<AttendanceRecord>> {
    let Some(employee) = store.find_employee(employee_id).await? else {
        return Ok(Vec::new());
    };
    store.records_for_employee(employee.id, limit).await
}

/// All attendance records across employees, newest created first.
pub async fn all_records<S: AttendanceStore>(
    store: &S,
    limit: i64,
) -> sqlx::Result<Vec<AttendanceRecord>> {
    store.all_records(limit).await
}
