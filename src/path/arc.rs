//! Pie and donut slices with optional rounded corners.
//!
//! [`ArcParams`] is what the caller asks for; [`ArcGeometry`] is what gets
//! drawn after the radii have been normalized and the corner radii clamped so
//! that corner circles always fit inside the slice.

use glam::dvec2;

use super::math::{DEGREES, cos, fit_to_range, polar, round, sin};
use super::{Point, arc_to, arc_to_point, close_path, line_to, move_to};

/// Requested slice outline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcParams {
    /// Degrees, clockwise from the positive x axis
    pub start_angle: f64,
    /// Signed angular extent in degrees
    pub sweep: f64,
    pub radius: f64,
    /// Zero draws a pie wedge instead of a donut slice
    pub inner_radius: f64,
    /// Vertical radius for elliptical slices; defaults to `radius`
    pub radius_y: Option<f64>,
    pub corner_radius: f64,
    /// Defaults to `corner_radius`
    pub inner_corner_radius: Option<f64>,
}

impl ArcParams {
    pub fn new(start_angle: f64, sweep: f64, radius: f64) -> Self {
        Self {
            start_angle,
            sweep,
            radius,
            inner_radius: 0.0,
            radius_y: None,
            corner_radius: 0.0,
            inner_corner_radius: None,
        }
    }

    pub fn with_inner_radius(mut self, inner_radius: f64) -> Self {
        self.inner_radius = inner_radius;
        self
    }

    pub fn with_radius_y(mut self, radius_y: f64) -> Self {
        self.radius_y = Some(radius_y);
        self
    }

    pub fn with_corner_radius(mut self, corner_radius: f64) -> Self {
        self.corner_radius = corner_radius;
        self
    }

    pub fn with_inner_corner_radius(mut self, inner_corner_radius: f64) -> Self {
        self.inner_corner_radius = Some(inner_corner_radius);
        self
    }
}

/// Normalized slice geometry
///
/// Every corner radius lies within `0..=(radius - inner_radius) / 2`, and
/// within the chord the slice can spare at its sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcGeometry {
    pub start_angle: f64,
    /// Clamped to `-360..=360`
    pub sweep: f64,
    pub radius: f64,
    pub radius_y: f64,
    pub inner_radius: f64,
    pub inner_radius_y: f64,
    pub corner_radius: f64,
    pub corner_radius_y: f64,
    pub inner_corner_radius: f64,
    pub inner_corner_radius_y: f64,
    /// Angle the outer corners take out of the outer arc, in degrees
    pub corner_angle: f64,
    pub corner_angle_y: f64,
    /// Angle the inner corners take out of the inner arc, in degrees
    pub inner_corner_angle: f64,
    pub inner_corner_angle_y: f64,
}

impl ArcGeometry {
    /// Normalize `params`. Returns `None` when there is nothing to draw.
    pub fn new(params: &ArcParams) -> Option<Self> {
        let sweep = params.sweep;
        if sweep == 0.0 || !sweep.is_finite() {
            return None;
        }

        // Negative and NaN radii collapse to zero
        let mut radius = params.radius.max(0.0);
        let mut inner_radius = params.inner_radius.max(0.0);
        if radius == 0.0 && inner_radius == 0.0 {
            return None;
        }
        let mut radius_y = params.radius_y.unwrap_or(radius).max(0.0);

        // Swapped radii are normalized; radius_y follows the outer radius
        if radius < inner_radius {
            if radius > 0.0 {
                radius_y = radius_y / radius * inner_radius;
            } else {
                radius_y = inner_radius;
            }
            std::mem::swap(&mut radius, &mut inner_radius);
        }

        let sweep = sweep.clamp(-360.0, 360.0);
        let full_circle = sweep.abs() == 360.0;

        let (mut corner, mut inner_corner) = if full_circle {
            (0.0, 0.0)
        } else {
            let corner = params.corner_radius.max(0.0);
            (corner, params.inner_corner_radius.unwrap_or(corner).max(0.0))
        };

        let ratio = radius_y / radius;
        let inner_radius_y = ratio * inner_radius;
        let mut corner_y = ratio * corner;
        let mut inner_corner_y = ratio * inner_corner;

        let band = ((radius - inner_radius) / 2.0).max(0.0);
        let band_y = ((radius_y - inner_radius_y) / 2.0).max(0.0);
        let chord = sin(sweep.abs().min(45.0) / 2.0);

        corner = fit_to_range(corner, 0.0, band);
        corner_y = fit_to_range(corner_y, 0.0, band_y);
        inner_corner = fit_to_range(inner_corner, 0.0, band);
        inner_corner_y = fit_to_range(inner_corner_y, 0.0, band_y);

        corner = round(fit_to_range(corner, 0.0, radius * chord), 4).min(band);
        corner_y = round(fit_to_range(corner_y, 0.0, radius_y * chord), 4).min(band_y);
        inner_corner = round(fit_to_range(inner_corner, 0.0, inner_radius * chord), 4).min(band);
        inner_corner_y =
            round(fit_to_range(inner_corner_y, 0.0, inner_radius_y * chord), 4).min(band_y);

        Some(Self {
            start_angle: params.start_angle,
            sweep,
            radius,
            radius_y,
            inner_radius,
            inner_radius_y,
            corner_radius: corner,
            corner_radius_y: corner_y,
            inner_corner_radius: inner_corner,
            inner_corner_radius_y: inner_corner_y,
            corner_angle: corner_angle(corner, radius),
            corner_angle_y: corner_angle(corner_y, radius_y),
            inner_corner_angle: corner_angle(inner_corner, inner_radius),
            inner_corner_angle_y: corner_angle(inner_corner_y, inner_radius_y),
        })
    }

    pub fn end_angle(&self) -> f64 {
        self.start_angle + self.sweep
    }

    pub fn is_full_circle(&self) -> bool {
        self.sweep.abs() == 360.0
    }

    pub fn has_hole(&self) -> bool {
        self.inner_radius > 0.0
    }

    /// +1 for clockwise sweeps, -1 for counterclockwise
    fn direction(&self) -> f64 {
        self.sweep.signum()
    }

    /// Closed outline of the slice
    pub fn to_path(&self) -> String {
        if self.is_full_circle() {
            return self.ring_path();
        }

        let start = self.start_angle;
        let end = self.end_angle();
        let dir = self.direction();
        let clockwise = self.sweep > 0.0;

        let inner_inset = (
            self.inner_radius + self.inner_corner_radius,
            self.inner_radius_y + self.inner_corner_radius_y,
        );
        let outer_inset = (
            self.radius - self.corner_radius,
            self.radius_y - self.corner_radius_y,
        );

        let a0 = polar(start, inner_inset.0, inner_inset.1);
        let b0 = polar(start, outer_inset.0, outer_inset.1);
        let c0 = polar(end, outer_inset.0, outer_inset.1);
        let d0 = polar(end, inner_inset.0, inner_inset.1);

        let b1 = dvec2(
            cos(start + dir * self.corner_angle) * self.radius,
            sin(start + dir * self.corner_angle_y) * self.radius_y,
        );

        let mut path = move_to(a0);
        path.push_str(&line_to(b0));
        path.push_str(&arc_to_point(
            b1,
            self.corner_radius,
            Some(self.corner_radius_y),
            clockwise,
            false,
            0.0,
        ));
        path.push_str(&arc_to(
            start + dir * self.corner_angle,
            self.sweep - 2.0 * dir * self.corner_angle,
            self.radius,
            Some(self.radius_y),
        ));
        path.push_str(&arc_to_point(
            c0,
            self.corner_radius,
            Some(self.corner_radius_y),
            clockwise,
            false,
            0.0,
        ));

        if self.has_hole() {
            // Corners meet in the middle when the inner arc is too short for both
            let d1 = if self.inner_corner_angle > self.sweep.abs() / 2.0 {
                let middle = start + self.sweep / 2.0;
                dvec2(
                    round(cos(middle) * self.inner_radius, 4),
                    sin(middle) * self.inner_radius_y,
                )
            } else {
                dvec2(
                    cos(end - dir * self.inner_corner_angle) * self.inner_radius,
                    sin(end - dir * self.inner_corner_angle_y) * self.inner_radius_y,
                )
            };

            // The inner corner circle sits on a concave edge and needs a little more radius
            let inner_corner = self.inner_corner_radius
                + self.inner_corner_radius * sin(self.inner_corner_angle / 2.0);
            let inner_corner_y = self.inner_corner_radius_y
                + self.inner_corner_radius_y * sin(self.inner_corner_angle_y / 2.0);

            path.push_str(&line_to(d0));
            path.push_str(&arc_to_point(
                d1,
                inner_corner,
                Some(inner_corner_y),
                clockwise,
                false,
                0.0,
            ));
            path.push_str(&arc_to(
                end - dir * self.inner_corner_angle,
                -(self.sweep - 2.0 * dir * self.inner_corner_angle),
                self.inner_radius,
                Some(self.inner_radius_y),
            ));
            path.push_str(&arc_to_point(
                a0,
                inner_corner,
                Some(inner_corner_y),
                clockwise,
                false,
                0.0,
            ));
        } else {
            path.push_str(&line_to(a0));
        }

        path.push_str(&close_path());
        path
    }

    /// Full rings: the outer circle and, for donuts, the inner circle in the
    /// opposite direction, each its own closed subpath.
    fn ring_path(&self) -> String {
        let start = self.start_angle;
        let mut path = move_to(polar(start, self.radius, self.radius_y));
        path.push_str(&arc_to(start, self.sweep, self.radius, Some(self.radius_y)));
        path.push_str(&close_path());

        if self.has_hole() {
            path.push_str(&move_to(polar(start, self.inner_radius, self.inner_radius_y)));
            path.push_str(&arc_to(
                start,
                -self.sweep,
                self.inner_radius,
                Some(self.inner_radius_y),
            ));
            path.push_str(&close_path());
        }
        path
    }
}

/// Angle subtended by a corner circle of radius `corner` on a circle of radius `radius`
fn corner_angle(corner: f64, radius: f64) -> f64 {
    let angle = (corner / radius / 2.0).asin() * DEGREES * 2.0;
    if angle.is_finite() { angle } else { 0.0 }
}

/// Outline of a pie or donut slice, empty when there is nothing to draw.
pub fn arc(params: &ArcParams) -> String {
    ArcGeometry::new(params)
        .map(|geometry| geometry.to_path())
        .unwrap_or_default()
}

/// Center of the slice's outer arc, handy for placing labels
pub fn arc_midpoint(params: &ArcParams) -> Option<Point> {
    let geometry = ArcGeometry::new(params)?;
    Some(polar(
        geometry.start_angle + geometry.sweep / 2.0,
        geometry.radius,
        geometry.radius_y,
    ))
}
