//! Turning a point series into a path

use enum_dispatch::enum_dispatch;

use super::math::round;
use super::{Point, cubic_curve_to, move_to, polyline};

/// Strategy for drawing a line through a series of points
#[enum_dispatch]
pub trait Smoothing {
    /// Complete path through `points`, starting with a move to the first one
    fn smooth(&self, points: &[Point]) -> String;
}

/// Any of the built-in strategies
#[enum_dispatch(Smoothing)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Smoother {
    Linear,
    Tension,
}

impl Default for Smoother {
    fn default() -> Self {
        Smoother::Linear(Linear)
    }
}

/// Straight segments, see [`polyline`]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Linear;

impl Smoothing for Linear {
    fn smooth(&self, points: &[Point]) -> String {
        polyline(points)
    }
}

/// Cubic curves whose bend is controlled per axis.
///
/// A tension of 1 draws straight lines; lower values round the corners off.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tension {
    pub tension_x: f64,
    pub tension_y: f64,
}

impl Default for Tension {
    fn default() -> Self {
        Self::new(1.0, 1.0)
    }
}

impl Tension {
    pub fn new(tension_x: f64, tension_y: f64) -> Self {
        Self {
            tension_x,
            tension_y,
        }
    }

    pub fn uniform(tension: f64) -> Self {
        Self::new(tension, tension)
    }
}

impl Smoothing for Tension {
    fn smooth(&self, points: &[Point]) -> String {
        let points = coalesce(points);
        if points.len() < 3 || (self.tension_x >= 1.0 && self.tension_y >= 1.0) {
            return polyline(&points);
        }

        let first = points[0];
        let last = points[points.len() - 1];
        let closed =
            round(first.x, 3) == round(last.x, 3) && round(first.y, 3) == round(last.y, 3);

        let tension = Point::new(adjust(self.tension_x), adjust(self.tension_y));
        let end = points.len() - 1;

        let mut path = move_to(first);
        for i in 0..end {
            let p1 = points[i];
            let p2 = points[i + 1];
            // Closed series borrow their neighbours from the other end
            let p0 = match i {
                0 if closed => points[end - 1],
                0 => p1,
                _ => points[i - 1],
            };
            let p3 = match points.get(i + 2) {
                Some(&p) => p,
                _ if closed => points[1],
                _ => p2,
            };

            let control_a = (-p0 + p1 / tension + p2) * tension;
            let control_b = (p1 + p2 / tension - p3) * tension;
            path.push_str(&cubic_curve_to(p2, control_a, control_b));
        }
        path
    }
}

fn adjust(tension: f64) -> f64 {
    1.0 - tension + 0.00001
}

/// Drop points within 0.1 of their successor on both axes
fn coalesce(points: &[Point]) -> Vec<Point> {
    let mut kept: Vec<Point> = Vec::with_capacity(points.len());
    for &point in points.iter().rev() {
        match kept.last() {
            Some(next) if (point - *next).abs().max_element() < 0.1 => {}
            _ => kept.push(point),
        }
    }
    kept.reverse();
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::dvec2;

    #[test]
    fn few_points_fall_back_to_polyline() {
        let points = [dvec2(0.0, 0.0), dvec2(10.0, 10.0)];
        assert_eq!(Tension::uniform(0.5).smooth(&points), polyline(&points));
    }

    #[test]
    fn full_tension_is_straight() {
        let points = [dvec2(0.0, 0.0), dvec2(10.0, 10.0), dvec2(20.0, 0.0)];
        assert_eq!(Tension::default().smooth(&points), polyline(&points));
    }

    #[test]
    fn curves_pass_through_every_point() {
        let points = [dvec2(0.0, 0.0), dvec2(10.0, 10.0), dvec2(20.0, 0.0)];
        let path = Tension::uniform(0.5).smooth(&points);
        assert!(path.starts_with(" M0,0 "));
        assert_eq!(path.matches(" C").count(), 2);
        assert!(path.contains(" 10,10 C"));
        assert!(path.ends_with(" 20,0"));
    }

    #[test]
    fn near_duplicates_are_coalesced() {
        let points = [
            dvec2(0.0, 0.0),
            dvec2(0.05, 0.05),
            dvec2(10.0, 10.0),
            dvec2(20.0, 0.0),
        ];
        let path = Tension::uniform(0.5).smooth(&points);
        assert_eq!(path.matches(" C").count(), 2);
    }

    #[test]
    fn dispatch_through_smoother() {
        let points = [dvec2(0.0, 0.0), dvec2(10.0, 10.0), dvec2(20.0, 0.0)];
        let smoother: Smoother = Tension::uniform(0.5).into();
        assert_eq!(smoother.smooth(&points), Tension::uniform(0.5).smooth(&points));
        assert_eq!(Smoother::default().smooth(&points), polyline(&points));
    }
}
