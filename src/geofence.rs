use crate::model::location::AuthorizedLocation;

/// Earth radius in meters, as used by the haversine formula.
const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Great-circle distance between two GPS coordinates in meters (haversine).
pub fn distance_meters(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_METERS * c
}

/// True iff the coordinates fall inside at least one authorized zone.
/// The radius check is inclusive; an empty zone set authorizes nothing.
pub fn is_within_authorized(latitude: f64, longitude: f64, zones: &[AuthorizedLocation]) -> bool {
    zones.iter().any(|zone| {
        distance_meters(latitude, longitude, zone.latitude, zone.longitude) <= zone.radius_meters
    })
}
