//! Geographic primitives: great-circle distance, rectangle containment and
//! rectangle normalization.
//!
//! None of these fail. NaN inputs propagate to NaN distances and `false`
//! containment, which excludes them from every radius or region match.

use crate::{GeoPoint, Rectangle};

/// Earth mean radius in meters.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Haversine distance between two points in meters.
pub fn haversine_distance(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlat = (b.latitude - a.latitude).to_radians();
    let dlng = (b.longitude - a.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_METERS * c
}

/// Inclusive containment: `south <= lat <= north` and `west <= lng <= east`.
pub fn contains(rect: &Rectangle, point: &GeoPoint) -> bool {
    rect.south <= point.latitude
        && point.latitude <= rect.north
        && rect.west <= point.longitude
        && point.longitude <= rect.east
}

/// Build a rectangle from two arbitrary corners (min/max per axis).
///
/// Coincident corners yield a zero-area rectangle.
pub fn normalize_rectangle(a: &GeoPoint, b: &GeoPoint) -> Rectangle {
    Rectangle {
        south: a.latitude.min(b.latitude),
        west: a.longitude.min(b.longitude),
        north: a.latitude.max(b.latitude),
        east: a.longitude.max(b.longitude),
    }
}

