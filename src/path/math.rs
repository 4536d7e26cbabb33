//! Numeric helpers shared by the path builders

use std::f64::consts::PI;

use super::Point;

/// Multiply degrees by this to get radians
pub const RADIANS: f64 = PI / 180.0;
/// Multiply radians by this to get degrees
pub const DEGREES: f64 = 180.0 / PI;

/// Round to `precision` decimals, halves away from zero.
///
/// Negative zero comes back as positive zero so it never prints as `-0`.
#[inline]
pub fn round(value: f64, precision: i32) -> f64 {
    let scale = 10f64.powi(precision);
    (value * scale).round() / scale + 0.0
}

/// Sine of an angle in degrees, rounded to 10 decimals so cardinal angles are exact
#[inline]
pub fn sin(degrees: f64) -> f64 {
    round((degrees * RADIANS).sin(), 10)
}

/// Cosine of an angle in degrees, rounded to 10 decimals so cardinal angles are exact
#[inline]
pub fn cos(degrees: f64) -> f64 {
    round((degrees * RADIANS).cos(), 10)
}

/// Clamp without panicking when `min > max`; the lower bound wins.
#[inline]
pub fn fit_to_range(value: f64, min: f64, max: f64) -> f64 {
    value.min(max).max(min)
}

/// Point on an ellipse centered at the origin
#[inline]
pub fn polar(angle: f64, radius: f64, radius_y: f64) -> Point {
    Point::new(cos(angle) * radius, sin(angle) * radius_y)
}

/// Path number: 4 decimals, no negative zero
#[inline]
pub(crate) fn num(value: f64) -> f64 {
    round(value, 4)
}
