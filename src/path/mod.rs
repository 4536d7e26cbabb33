//! SVG path fragment builders
//!
//! Every function returns a fragment of the path mini-language; concatenating
//! fragments in order yields a complete outline. Coordinates are rounded to 4
//! decimals. Angles are in degrees, measured clockwise from the positive x
//! axis in SVG (y-down) space.
//!
//! This module is organized into submodules:
//! - `math`: rounding and degree-based trigonometry
//! - `arc`: rounded annular arc slices
//! - `smoothing`: point series to curves
//! - `sample`: arc-length sampling through a [`RenderSurface`]
//! - `measure`: a native [`RenderSurface`] that measures path data itself

pub mod arc;
pub mod math;
pub mod measure;
pub mod sample;
pub mod smoothing;

pub use arc::{ArcGeometry, ArcParams, arc};
pub use measure::MeasuringSurface;
pub use sample::{RenderSurface, path_to_points};
pub use smoothing::{Smoother, Smoothing, Tension};

use glam::dvec2;

use self::math::{num, polar};

/// A point in local drawing space
pub type Point = glam::DVec2;

/// Axis-aligned rectangle with its origin at the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Corners clockwise from the origin
    pub fn corners(&self) -> [Point; 4] {
        [
            dvec2(self.x, self.y),
            dvec2(self.x + self.width, self.y),
            dvec2(self.x + self.width, self.y + self.height),
            dvec2(self.x, self.y + self.height),
        ]
    }
}

pub fn move_to(point: Point) -> String {
    format!(" M{},{} ", num(point.x), num(point.y))
}

pub fn line_to(point: Point) -> String {
    format!(" L{},{} ", num(point.x), num(point.y))
}

pub fn quadratic_curve_to(point: Point, control: Point) -> String {
    format!(
        " Q{},{} {},{}",
        num(control.x),
        num(control.y),
        num(point.x),
        num(point.y)
    )
}

pub fn cubic_curve_to(point: Point, control_a: Point, control_b: Point) -> String {
    format!(
        " C{},{} {},{} {},{}",
        num(control_a.x),
        num(control_a.y),
        num(control_b.x),
        num(control_b.y),
        num(point.x),
        num(point.y)
    )
}

pub fn close_path() -> String {
    " Z".to_string()
}

/// Move to the first point, then line to each point farther than one unit
/// from the last point emitted.
pub fn polyline(points: &[Point]) -> String {
    let Some((&first, rest)) = points.split_first() else {
        return String::new();
    };

    let mut path = move_to(first);
    let mut prev = first;
    for &point in rest {
        if point.distance(prev) > 1.0 {
            path.push_str(&line_to(point));
            prev = point;
        }
    }
    path
}

/// Elliptical arc around the origin, starting on the ellipse at
/// `start_angle` and sweeping `sweep` degrees (negative is counterclockwise).
///
/// The current point must already be at the start of the arc. The arc is split
/// into half-turn pieces, each a relative `a` command from the end of the
/// previous one.
pub fn arc_to(start_angle: f64, sweep: f64, radius: f64, radius_y: Option<f64>) -> String {
    if sweep == 0.0 || !sweep.is_finite() {
        return String::new();
    }
    let radius_y = radius_y.unwrap_or(radius);

    // Huge radius, tiny sweep: the arc is indistinguishable from its chord
    if sweep.abs() < 0.5 && radius > 3000.0 {
        return line_to(polar(start_angle + sweep, radius, radius_y));
    }

    let segments = (sweep.abs() / 180.0).ceil() as usize;
    let sweep_flag = u8::from(sweep > 0.0);
    let start = polar(start_angle, radius, radius_y);

    let mut path = String::new();
    let mut emitted = Point::ZERO;
    for i in 1..=segments {
        let end_angle = start_angle + sweep / segments as f64 * i as f64;
        let end = polar(end_angle, radius, radius_y) - start;
        let dx = num(end.x - emitted.x);
        let dy = num(end.y - emitted.y);
        path.push_str(&format!(
            " a{radius},{radius_y},0,0,{sweep_flag},{dx},{dy}"
        ));
        emitted += dvec2(dx, dy);
    }
    path
}

/// A single absolute elliptical arc to `point`.
///
/// Radii are written as given; only the end point is rounded.
pub fn arc_to_point(
    point: Point,
    radius: f64,
    radius_y: Option<f64>,
    sweep: bool,
    large_arc: bool,
    rotation: f64,
) -> String {
    if radius == 0.0 {
        return String::new();
    }
    let radius_y = radius_y.unwrap_or(radius);
    format!(
        " A{radius},{radius_y},{rotation},{},{},{},{}",
        u8::from(large_arc),
        u8::from(sweep),
        num(point.x),
        num(point.y)
    )
}

/// Clockwise closed rectangle starting at `(x, y)`
pub fn rectangle(width: f64, height: f64, x: f64, y: f64) -> String {
    let [a, b, c, d] = Rect::new(x, y, width, height).corners();
    let mut path = move_to(a);
    for corner in [b, c, d] {
        path.push_str(&line_to(corner));
    }
    path.push_str(&close_path());
    path
}

/// Closed rectangle with an explicit winding.
///
/// The last corner is written twice before closing; downstream consumers
/// count on that vertex.
pub fn rect_to_path(rect: &Rect, ccw: bool) -> String {
    let [a, b, c, d] = rect.corners();
    let order = if ccw { [d, c, b] } else { [b, c, d] };
    let mut path = move_to(a);
    for corner in order {
        path.push_str(&line_to(corner));
    }
    path.push_str(&line_to(order[2]));
    path.push_str(&close_path());
    path
}
