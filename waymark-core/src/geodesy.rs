//! Great-circle distance and proximity checks.
//!
//! Distances use the spherical law of cosines and are reported in statute
//! miles. Neither function allocates or fails.
//!
//! # Examples
//! ```
//! use waymark_core::{distance_miles, is_near, lat_lon};
//!
//! let museum = lat_lon(0.0, 0.0);
//! let visitor = lat_lon(1.0, 0.0);
//! assert!(distance_miles(museum, visitor) > 69.0);
//! assert!(!is_near(visitor, museum, 10.0));
//! assert!(is_near(visitor, museum, 200.0));
//! ```

use geo::Coord;

/// Conversion factor from nautical miles to statute miles.
pub const STATUTE_MILES_PER_NAUTICAL_MILE: f64 = 1.150_779_45;

/// Nautical miles per degree of arc.
const NAUTICAL_MILES_PER_DEGREE: f64 = 60.0;

/// Build a coordinate from latitude and longitude in degrees.
///
/// Values are not range checked.
#[must_use]
pub const fn lat_lon(latitude: f64, longitude: f64) -> Coord<f64> {
    Coord {
        x: longitude,
        y: latitude,
    }
}

/// Great-circle distance between two coordinates, in statute miles.
///
/// The cosine argument is clamped to `[-1.0, 1.0]` so rounding overshoot
/// cannot produce `NaN`. Identical points return exactly `0.0`; rounding can
/// otherwise leave the cosine a hair under `1.0`.
#[expect(
    clippy::float_arithmetic,
    reason = "spherical trigonometry requires floating-point arithmetic"
)]
#[must_use]
pub fn distance_miles(a: Coord<f64>, b: Coord<f64>) -> f64 {
    if a == b {
        return 0.0;
    }
    let lat1 = a.y.to_radians();
    let lon1 = a.x.to_radians();
    let lat2 = b.y.to_radians();
    let lon2 = b.x.to_radians();

    let cosine = lat1.sin() * lat2.sin() + lat1.cos() * lat2.cos() * (lon1 - lon2).cos();
    let angle = cosine.clamp(-1.0, 1.0).acos();

    let nautical_miles = NAUTICAL_MILES_PER_DEGREE * angle.to_degrees();
    STATUTE_MILES_PER_NAUTICAL_MILE * nautical_miles
}

/// Whether `point` lies within `radius_miles` of `target`.
///
/// The boundary is inclusive: a point exactly `radius_miles` away is near.
#[must_use]
pub fn is_near(point: Coord<f64>, target: Coord<f64>, radius_miles: f64) -> bool {
    distance_miles(point, target) <= radius_miles
}
