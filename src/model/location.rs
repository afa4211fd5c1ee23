use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const DEFAULT_RADIUS_METERS: f64 = 200.0;

/// A named circular geofence. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "location_name": "Head Office",
        "latitude": 37.0,
        "longitude": -122.0,
        "radius_meters": 200.0,
        "created_at": "2026-01-01T09:00:00"
    })
)]
pub struct AuthorizedLocation {
    #[schema(example = 1)]
    pub id: i64,

    #[schema(example = "Head Office")]
    pub location_name: String,

    #[schema(example = 37.0)]
    pub latitude: f64,

    #[schema(example = -122.0)]
    pub longitude: f64,

    #[schema(example = 200.0)]
    pub radius_meters: f64,

    #[serde(skip_serializing)]
    #[schema(value_type = String, format = "date-time")]
    pub created_at: NaiveDateTime,
}
