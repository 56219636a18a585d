//! Great-circle distance and straight-line walking estimates.

use std::fmt;

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Mean Earth radius used by the haversine formula, in meters.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Assumed walking speed when nothing better is known (about 5 km/h).
pub const DEFAULT_WALKING_SPEED_MPS: f64 = 1.4;

/// A WGS84 latitude/longitude pair in degrees.
#[derive(Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Key for hashing and caching, quantized to micro-degrees (~0.1 m).
    pub fn key(&self) -> (i64, i64) {
        (
            (self.lat * 1e6).round() as i64,
            (self.lon * 1e6).round() as i64,
        )
    }
}

impl fmt::Debug for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Coordinate({:.6}, {:.6})", self.lat, self.lon)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6},{:.6}", self.lat, self.lon)
    }
}

/// Haversine distance between two points, in meters.
///
/// Symmetric, non-negative, and zero for identical points.
///
/// ```
/// use transit_planner::domain::{Coordinate, distance_meters};
///
/// let a = Coordinate::new(49.2606, -123.2460);
/// assert_eq!(distance_meters(a, a), 0.0);
/// ```
pub fn distance_meters(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let delta_lat = (b.lat - a.lat).to_radians();
    let delta_lon = (b.lon - a.lon).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
    // Rounding can push h a hair past 1 for antipodal points
    let c = 2.0 * h.clamp(0.0, 1.0).sqrt().asin();

    EARTH_RADIUS_METERS * c
}

/// Straight-line walking time for a distance at the given speed, in seconds.
pub fn estimated_walk_seconds(distance_meters: f64, speed_mps: f64) -> f64 {
    if speed_mps <= 0.0 {
        return f64::INFINITY;
    }
    distance_meters.max(0.0) / speed_mps
}

/// Straight-line walking time as a duration, rounded up to a whole second.
pub fn estimated_walk(distance_meters: f64, speed_mps: f64) -> Duration {
    let secs = estimated_walk_seconds(distance_meters, speed_mps).ceil();
    if secs.is_finite() {
        Duration::seconds(secs as i64)
    } else {
        Duration::MAX
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_distance() {
        // One degree of latitude is ~111.19 km on a 6371 km sphere
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(1.0, 0.0);
        let d = distance_meters(a, b);
        assert!((d - 111_194.9).abs() < 1.0, "got {d}");
    }

    #[test]
    fn antipodal_points() {
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(0.0, 180.0);
        let d = distance_meters(a, b);
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_METERS).abs() < 1.0);
    }

    #[test]
    fn walk_estimate() {
        assert_eq!(estimated_walk_seconds(140.0, 1.4), 100.0);
        assert_eq!(estimated_walk(140.0, 1.4), Duration::seconds(100));
        // Partial seconds round up
        assert_eq!(estimated_walk(141.0, 1.4), Duration::seconds(101));
        assert_eq!(estimated_walk(0.0, 1.4), Duration::zero());
    }

    #[test]
    fn walk_estimate_non_positive_speed() {
        assert!(estimated_walk_seconds(10.0, 0.0).is_infinite());
        assert_eq!(estimated_walk(10.0, 0.0), Duration::MAX);
    }

    #[test]
    fn coordinate_key_quantizes() {
        let a = Coordinate::new(49.2606001, -123.2460001);
        let b = Coordinate::new(49.2606002, -123.2460002);
        assert_eq!(a.key(), b.key());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn coordinate() -> impl Strategy<Value = Coordinate> {
        (-90.0f64..=90.0, -180.0f64..=180.0).prop_map(|(lat, lon)| Coordinate::new(lat, lon))
    }

    proptest! {
        #[test]
        fn symmetric(a in coordinate(), b in coordinate()) {
            let ab = distance_meters(a, b);
            let ba = distance_meters(b, a);
            prop_assert!((ab - ba).abs() < 1e-6);
        }

        #[test]
        fn non_negative_and_bounded(a in coordinate(), b in coordinate()) {
            let d = distance_meters(a, b);
            prop_assert!(d >= 0.0);
            prop_assert!(d <= std::f64::consts::PI * EARTH_RADIUS_METERS + 1e-6);
        }

        #[test]
        fn zero_for_identical(a in coordinate()) {
            prop_assert_eq!(distance_meters(a, a), 0.0);
        }
    }
}
