use crate::api::employee::{CreateEmployee, EmployeeResponse};
use crate::api::location::{CreateLocation, LocationResponse};
use crate::ledger::{ClockInRequest, ClockInResult, ClockOutRequest, ClockOutResult};
use crate::model::attendance::{AttendanceRecord, SessionType};
use crate::model::employee::Employee;
use crate::model::location::AuthorizedLocation;
use crate::query::{DayStatus, SessionStatus};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Attendance Tracker API",
        version = "1.0.0",
        description = r#"
## Employee Attendance Tracker

Tracks clock-in/clock-out attendance per employee across four daily session
windows (morning, lunch, afternoon, evening), gated by GPS proximity to a set
of authorized locations.

### Key Features
- **Clock In / Clock Out**
  - One cycle per employee, session and UTC day
  - Requests are accepted only inside an authorized geofence
- **Status & History**
  - Per-session status for today, per-employee history, all records
- **Employees & Locations**
  - Register employees, define circular authorized zones

Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::attendance::clock_in,
        crate::api::attendance::clock_out,
        crate::api::attendance::status,
        crate::api::attendance::history,
        crate::api::attendance::all_records,

        crate::api::employee::create_employee,
        crate::api::employee::list_employees,
        crate::api::employee::get_employee,

        crate::api::location::create_location,
        crate::api::location::list_locations
    ),
    components(
        schemas(
            Employee,
            AuthorizedLocation,
            AttendanceRecord,
            SessionType,
            ClockInRequest,
            ClockOutRequest,
            ClockInResult,
            ClockOutResult,
            DayStatus,
            SessionStatus,
            CreateEmployee,
            EmployeeResponse,
            CreateLocation,
            LocationResponse
        )
    ),
    tags(
        (name = "Attendance", description = "Clock-in/out and attendance queries"),
        (name = "Employee", description = "Employee registration APIs"),
        (name = "Location", description = "Authorized location APIs"),
    )
)]
pub struct ApiDoc;
