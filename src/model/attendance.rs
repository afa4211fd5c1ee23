use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};
use utoipa::ToSchema;

/// One clock-in/clock-out cycle for a single session slot.
/// At most one per (employee, session_type, UTC day); the ledger enforces
/// this procedurally, not with a unique constraint.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct AttendanceRecord {
    pub id: i64,
    /// Internal employee primary key, not the business employee_id.
    pub employee_id: i64,
    pub session_type: String,
    #[schema(value_type = Option<String>, format = "date-time")]
    pub clock_in_time: Option<NaiveDateTime>,
    #[schema(value_type = Option<String>, format = "date-time")]
    pub clock_out_time: Option<NaiveDateTime>,
    pub clock_in_latitude: Option<f64>,
    pub clock_in_longitude: Option<f64>,
    pub clock_out_latitude: Option<f64>,
    pub clock_out_longitude: Option<f64>,
    #[schema(value_type = String, format = "date-time")]
    pub created_at: NaiveDateTime,
}

/// The four daily attendance windows. Stored session_type stays a free
/// string; this enum drives the fixed status projection.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
    ToSchema,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SessionType {
    Morning,
    Lunch,
    Afternoon,
    Evening,
}

/// Lifecycle of one session slot, read off the stored record's field
/// nullness instead of repeating the null checks at every call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    NoRecord,
    Open,
    Closed,
}

impl SlotState {
    pub fn of(record: Option<&AttendanceRecord>) -> Self {
        match record {
            Some(r) if r.clock_in_time.is_some() => {
                if r.clock_out_time.is_some() {
                    SlotState::Closed
                } else {
                    SlotState::Open
                }
            }
            _ => SlotState::NoRecord,
        }
    }
}
