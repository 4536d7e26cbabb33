//! Native path measuring.
//!
//! [`MeasuringSurface`] parses path data, flattens curves and elliptical arcs
//! into line segments, and answers length queries on the result. It lets
//! [`path_to_points`](super::path_to_points) run without a browser.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use glam::dvec2;

use super::Point;
use super::sample::RenderSurface;
use crate::log::debug;

/// Handle to a path held by a [`MeasuringSurface`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PathNode(usize);

/// Path flattened to line segments
#[derive(Debug, Clone, Default, PartialEq)]
struct Outline {
    /// First point moved to, where zero-length queries land
    start: Option<Point>,
    segments: Vec<(Point, Point)>,
}

impl Outline {
    fn length(&self) -> f64 {
        self.segments.iter().map(|(a, b)| a.distance(*b)).sum()
    }

    fn point_at(&self, length: f64) -> Option<Point> {
        let mut remaining = length.max(0.0);
        for &(a, b) in &self.segments {
            let segment = a.distance(b);
            if remaining <= segment {
                let t = if segment > 0.0 { remaining / segment } else { 0.0 };
                return Some(a.lerp(b, t));
            }
            remaining -= segment;
        }
        // Past the end: clamp to the last point
        self.segments.last().map(|&(_, b)| b).or(self.start)
    }
}

/// In-memory [`RenderSurface`] that measures path data itself
#[derive(Debug, Clone)]
pub struct MeasuringSurface {
    nodes: Vec<Option<Outline>>,
    /// Slots released by `remove`, reused before growing `nodes`
    free: Vec<usize>,
    tolerance: f64,
    measures: bool,
}

impl Default for MeasuringSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl MeasuringSurface {
    /// Maximum distance between a curve and its flattened segments
    pub const DEFAULT_TOLERANCE: f64 = 0.01;

    pub fn new() -> Self {
        Self::with_tolerance(Self::DEFAULT_TOLERANCE)
    }

    pub fn with_tolerance(tolerance: f64) -> Self {
        Self {
            nodes: Vec::new(),
            free: Vec::new(),
            tolerance: tolerance.max(f64::EPSILON),
            measures: true,
        }
    }

    /// A surface that holds paths but cannot measure them
    pub fn unsupported() -> Self {
        Self {
            measures: false,
            ..Self::new()
        }
    }

    /// Nodes created and not yet removed
    pub fn live_nodes(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    /// Slots allocated so far, live or free
    pub fn slots(&self) -> usize {
        self.nodes.len()
    }

    fn outline(&self, node: PathNode) -> Option<&Outline> {
        if !self.measures {
            return None;
        }
        self.nodes.get(node.0)?.as_ref()
    }
}

impl RenderSurface for MeasuringSurface {
    type Node = PathNode;

    /// Handles of removed nodes may be handed out again
    fn create_path(&mut self) -> PathNode {
        match self.free.pop() {
            Some(index) => {
                self.nodes[index] = Some(Outline::default());
                PathNode(index)
            }
            None => {
                self.nodes.push(Some(Outline::default()));
                PathNode(self.nodes.len() - 1)
            }
        }
    }

    fn set_path_data(&mut self, node: PathNode, d: &str) {
        let tolerance = self.tolerance;
        if let Some(Some(outline)) = self.nodes.get_mut(node.0) {
            *outline = flatten(d, tolerance);
        }
    }

    fn total_length(&self, node: PathNode) -> Option<f64> {
        self.outline(node).map(Outline::length)
    }

    fn point_at_length(&self, node: PathNode, length: f64) -> Option<Point> {
        self.outline(node)?.point_at(length)
    }

    fn remove(&mut self, node: PathNode) {
        if let Some(slot) = self.nodes.get_mut(node.0) {
            if slot.take().is_some() {
                self.free.push(node.0);
            }
        }
    }
}

// ============================================================================
// Path data parsing
// ============================================================================

struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(d: &'a str) -> Self {
        Self {
            bytes: d.as_bytes(),
            pos: 0,
        }
    }

    fn skip_separators(&mut self) {
        while let Some(c) = self.bytes.get(self.pos) {
            if c.is_ascii_whitespace() || *c == b',' {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn at_end(&mut self) -> bool {
        self.skip_separators();
        self.pos >= self.bytes.len()
    }

    /// Consume a command letter if one is next
    fn command(&mut self) -> Option<u8> {
        self.skip_separators();
        let c = *self.bytes.get(self.pos)?;
        if c.is_ascii_alphabetic() && c != b'e' && c != b'E' {
            self.pos += 1;
            Some(c)
        } else {
            None
        }
    }

    fn number(&mut self) -> Option<f64> {
        self.skip_separators();
        let start = self.pos;
        let bytes = self.bytes;
        let mut i = self.pos;
        if matches!(bytes.get(i), Some(b'+' | b'-')) {
            i += 1;
        }
        let digits = |i: &mut usize| {
            let from = *i;
            while bytes.get(*i).is_some_and(u8::is_ascii_digit) {
                *i += 1;
            }
            *i > from
        };
        let mut seen = digits(&mut i);
        if bytes.get(i) == Some(&b'.') {
            i += 1;
            seen |= digits(&mut i);
        }
        if !seen {
            return None;
        }
        if matches!(bytes.get(i), Some(b'e' | b'E')) {
            let mut j = i + 1;
            if matches!(bytes.get(j), Some(b'+' | b'-')) {
                j += 1;
            }
            if digits(&mut j) {
                i = j;
            }
        }
        let text = std::str::from_utf8(&bytes[start..i]).ok()?;
        let value = text.parse().ok()?;
        self.pos = i;
        Some(value)
    }

    /// Arc flags may be written without separators (`a5 5 0 0110 10`)
    fn flag(&mut self) -> Option<bool> {
        self.skip_separators();
        let flag = match self.bytes.get(self.pos)? {
            b'0' => false,
            b'1' => true,
            _ => return None,
        };
        self.pos += 1;
        Some(flag)
    }

    fn point(&mut self) -> Option<Point> {
        Some(dvec2(self.number()?, self.number()?))
    }
}

/// Accumulates line segments while walking path commands
struct Flattener {
    outline: Outline,
    current: Point,
    subpath_start: Point,
    tolerance: f64,
}

impl Flattener {
    fn move_to(&mut self, point: Point) {
        self.outline.start.get_or_insert(point);
        self.current = point;
        self.subpath_start = point;
    }

    fn line_to(&mut self, point: Point) {
        self.outline.segments.push((self.current, point));
        self.current = point;
    }

    fn close(&mut self) {
        let start = self.subpath_start;
        if self.current != start {
            self.line_to(start);
        }
        self.current = start;
    }

    fn quadratic_to(&mut self, control: Point, end: Point) {
        let start = self.current;
        self.cubic_to(
            start + (control - start) * (2.0 / 3.0),
            end + (control - end) * (2.0 / 3.0),
            end,
        );
    }

    fn cubic_to(&mut self, c1: Point, c2: Point, end: Point) {
        let mut points = Vec::new();
        flatten_cubic(&mut points, self.current, c1, c2, end, self.tolerance, 0);
        for point in points {
            self.line_to(point);
        }
    }

    /// Endpoint-parameterized elliptical arc, converted to center form
    fn arc_to(
        &mut self,
        rx: f64,
        ry: f64,
        rotation: f64,
        large_arc: bool,
        sweep: bool,
        end: Point,
    ) {
        let start = self.current;
        if start == end {
            return;
        }
        let (mut rx, mut ry) = (rx.abs(), ry.abs());
        if rx == 0.0 || ry == 0.0 {
            self.line_to(end);
            return;
        }

        let (sin_phi, cos_phi) = rotation.to_radians().sin_cos();
        let half = (start - end) / 2.0;
        let x1 = cos_phi * half.x + sin_phi * half.y;
        let y1 = -sin_phi * half.x + cos_phi * half.y;

        // Radii too small to reach the end point are scaled up
        let lambda = (x1 * x1) / (rx * rx) + (y1 * y1) / (ry * ry);
        if lambda > 1.0 {
            let scale = lambda.sqrt();
            rx *= scale;
            ry *= scale;
        }

        let numerator = rx * rx * ry * ry - rx * rx * y1 * y1 - ry * ry * x1 * x1;
        let denominator = rx * rx * y1 * y1 + ry * ry * x1 * x1;
        let sign = if large_arc == sweep { -1.0 } else { 1.0 };
        let coef = sign * (numerator / denominator).max(0.0).sqrt();
        let cx1 = coef * rx * y1 / ry;
        let cy1 = -coef * ry * x1 / rx;

        let mid = (start + end) / 2.0;
        let center = dvec2(
            cos_phi * cx1 - sin_phi * cy1 + mid.x,
            sin_phi * cx1 + cos_phi * cy1 + mid.y,
        );

        let u = dvec2((x1 - cx1) / rx, (y1 - cy1) / ry);
        let v = dvec2((-x1 - cx1) / rx, (-y1 - cy1) / ry);
        let theta = angle_between(dvec2(1.0, 0.0), u);
        let mut delta = angle_between(u, v) % TAU;
        if !sweep && delta > 0.0 {
            delta -= TAU;
        } else if sweep && delta < 0.0 {
            delta += TAU;
        }

        let radius = rx.max(ry);
        let step = if self.tolerance < radius {
            2.0 * (1.0 - self.tolerance / radius).acos()
        } else {
            FRAC_PI_2
        };
        let steps = ((delta.abs() / step).ceil() as usize).clamp(1, 4096);

        for i in 1..steps {
            let t = theta + delta * i as f64 / steps as f64;
            let (sin_t, cos_t) = t.sin_cos();
            self.line_to(dvec2(
                center.x + rx * cos_t * cos_phi - ry * sin_t * sin_phi,
                center.y + rx * cos_t * sin_phi + ry * sin_t * cos_phi,
            ));
        }
        self.line_to(end);
    }

    /// One argument group of `command`; `None` on malformed input
    fn step(&mut self, command: u8, cursor: &mut Cursor<'_>) -> Option<()> {
        let relative = command.is_ascii_lowercase();
        let origin = if relative { self.current } else { Point::ZERO };
        match command.to_ascii_uppercase() {
            b'M' => {
                let point = origin + cursor.point()?;
                self.move_to(point);
            }
            b'L' => {
                let point = origin + cursor.point()?;
                self.line_to(point);
            }
            b'H' => {
                let x = origin.x + cursor.number()?;
                self.line_to(dvec2(x, self.current.y));
            }
            b'V' => {
                let y = origin.y + cursor.number()?;
                self.line_to(dvec2(self.current.x, y));
            }
            b'Q' => {
                let control = origin + cursor.point()?;
                let end = origin + cursor.point()?;
                self.quadratic_to(control, end);
            }
            b'C' => {
                let c1 = origin + cursor.point()?;
                let c2 = origin + cursor.point()?;
                let end = origin + cursor.point()?;
                self.cubic_to(c1, c2, end);
            }
            b'A' => {
                let rx = cursor.number()?;
                let ry = cursor.number()?;
                let rotation = cursor.number()?;
                let large_arc = cursor.flag()?;
                let sweep = cursor.flag()?;
                let end = origin + cursor.point()?;
                self.arc_to(rx, ry, rotation, large_arc, sweep, end);
            }
            _ => return None,
        }
        Some(())
    }
}

/// Flatten path data into line segments.
///
/// Parsing stops at the first malformed command; everything before it is kept.
fn flatten(d: &str, tolerance: f64) -> Outline {
    let mut flattener = Flattener {
        outline: Outline::default(),
        current: Point::ZERO,
        subpath_start: Point::ZERO,
        tolerance,
    };
    let mut cursor = Cursor::new(d);
    let mut command: Option<u8> = None;

    while !cursor.at_end() {
        if let Some(c) = cursor.command() {
            if c.eq_ignore_ascii_case(&b'z') {
                flattener.close();
                command = None;
                continue;
            }
            command = Some(c);
        }
        let Some(c) = command else {
            debug!(pos = cursor.pos, "path data without a command");
            break;
        };
        if flattener.step(c, &mut cursor).is_none() {
            debug!(pos = cursor.pos, command = %char::from(c), "malformed path data");
            break;
        }
        // Extra coordinate pairs after a move are implicit lines
        command = match c {
            b'M' => Some(b'L'),
            b'm' => Some(b'l'),
            other => Some(other),
        };
    }
    flattener.outline
}

/// Recursive midpoint subdivision until the control points lie within
/// `tolerance` of the chord
fn flatten_cubic(
    points: &mut Vec<Point>,
    p0: Point,
    p1: Point,
    p2: Point,
    p3: Point,
    tolerance: f64,
    depth: u32,
) {
    let flatness = distance_to_segment(p1, p0, p3).max(distance_to_segment(p2, p0, p3));
    if flatness <= tolerance || depth > 16 {
        points.push(p3);
        return;
    }
    let p01 = mid(p0, p1);
    let p12 = mid(p1, p2);
    let p23 = mid(p2, p3);
    let p012 = mid(p01, p12);
    let p123 = mid(p12, p23);
    let p0123 = mid(p012, p123);
    flatten_cubic(points, p0, p01, p012, p0123, tolerance, depth + 1);
    flatten_cubic(points, p0123, p123, p23, p3, tolerance, depth + 1);
}

fn mid(a: Point, b: Point) -> Point {
    (a + b) * 0.5
}

fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let ab = b - a;
    let len2 = ab.length_squared();
    if len2 == 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len2).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// Signed angle from `u` to `v`, in `-PI..=PI`
fn angle_between(u: Point, v: Point) -> f64 {
    let angle = u.perp_dot(v).atan2(u.dot(v));
    if angle == -PI { PI } else { angle }
}
