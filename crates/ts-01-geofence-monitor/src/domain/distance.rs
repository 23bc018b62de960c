//! Great-circle distance.

use shared_types::{Coordinates, GeofenceRegion};

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Haversine distance between two points in meters.
pub fn haversine_distance_m(from: Coordinates, to: Coordinates) -> f64 {
    let phi1 = from.latitude.to_radians();
    let phi2 = to.latitude.to_radians();
    let d_phi = (to.latitude - from.latitude).to_radians();
    let d_lambda = (to.longitude - from.longitude).to_radians();

    let a = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}

/// Signed distance from `point` to the region boundary.
///
/// Negative inside the circle, positive outside. Diagnostic only; membership
/// is never derived from it.
pub fn distance_to_boundary_m(region: &GeofenceRegion, point: Coordinates) -> f64 {
    haversine_distance_m(region.center, point) - region.radius_m
}
