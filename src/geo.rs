use serde::{Deserialize, Serialize};

const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// A point on the globe in floating degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// Great-circle distance in meters between two points (haversine).
///
/// Coordinates are expected to be valid lat/lng degrees; out-of-range input
/// is a caller contract, not checked here.
pub fn haversine_meters(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat_a = a.latitude.to_radians();
    let lat_b = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lng = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lng / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_METERS * h.sqrt().asin()
}

/// True iff `point` lies within `radius_meters` of `center` (boundary inclusive).
pub fn within_radius(center: GeoPoint, point: GeoPoint, radius_meters: f64) -> bool {
    haversine_meters(center, point) <= radius_meters
}
