use actix_web::{HttpResponse, Responder, web};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

use crate::model::location::{AuthorizedLocation, DEFAULT_RADIUS_METERS};
use crate::store::{AttendanceStore, SqlStore};

fn default_radius() -> f64 {
    DEFAULT_RADIUS_METERS
}

#[derive(Deserialize, Serialize, ToSchema)]
pub struct CreateLocation {
    #[schema(example = "Head Office")]
    pub location_name: String,
    #[schema(example = 37.0)]
    pub latitude: f64,
    #[schema(example = -122.0)]
    pub longitude: f64,
    #[serde(default = "default_radius")]
    #[schema(example = 200.0)]
    pub radius_meters: f64,
}

#[derive(Serialize, ToSchema)]
pub struct LocationResponse {
    pub id: i64,
    pub location_name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub radius_meters: f64,
}

impl From<AuthorizedLocation> for LocationResponse {
    fn from(l: AuthorizedLocation) -> Self {
        Self {
            id: l.id,
            location_name: l.location_name,
            latitude: l.latitude,
            longitude: l.longitude,
            radius_meters: l.radius_meters,
        }
    }
}

/// Create an authorized location
#[utoipa::path(
    post,
    path = "/api/locations",
    request_body = CreateLocation,
    responses(
        (status = 201, description = "Location created", body = LocationResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "Location"
)]
pub async fn create_location(
    store: web::Data<SqlStore>,
    payload: web::Json<CreateLocation>,
) -> actix_web::Result<impl Responder> {
    let location = store
        .insert_zone(
            &payload.location_name,
            payload.latitude,
            payload.longitude,
            payload.radius_meters,
            Utc::now().naive_utc(),
        )
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to create location");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Created().json(LocationResponse::from(location)))
}

/// List all authorized locations
#[utoipa::path(
    get,
    path = "/api/locations",
    responses(
        (status = 200, description = "All authorized locations", body = [LocationResponse]),
        (status = 500, description = "Internal server error")
    ),
    tag = "Location"
)]
pub async fn list_locations(store: web::Data<SqlStore>) -> actix_web::Result<impl Responder> {
    let locations = store.list_zones().await.map_err(|e| {
        error!(error = %e, "Failed to list locations");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let locations: Vec<LocationResponse> =
        locations.into_iter().map(LocationResponse::from).collect();
    Ok(HttpResponse::Ok().json(locations))
}
