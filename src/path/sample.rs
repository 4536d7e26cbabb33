//! Sampling points along existing path data

use super::Point;

/// Host rendering surface able to hold path nodes and measure them.
///
/// Hosts without length queries return `None` from the measuring methods.
pub trait RenderSurface {
    type Node: Copy;

    fn create_path(&mut self) -> Self::Node;
    fn set_path_data(&mut self, node: Self::Node, d: &str);
    fn total_length(&self, node: Self::Node) -> Option<f64>;
    fn point_at_length(&self, node: Self::Node, length: f64) -> Option<Point>;
    fn remove(&mut self, node: Self::Node);
}

/// A node that is removed from its surface when dropped
struct ScopedNode<'s, S: RenderSurface> {
    surface: &'s mut S,
    node: S::Node,
}

impl<'s, S: RenderSurface> ScopedNode<'s, S> {
    fn new(surface: &'s mut S) -> Self {
        let node = surface.create_path();
        Self { surface, node }
    }
}

impl<S: RenderSurface> Drop for ScopedNode<'_, S> {
    fn drop(&mut self) {
        self.surface.remove(self.node);
    }
}

/// Sample `count` points spaced evenly by arc length along `d`, starting at
/// its beginning.
///
/// Returns `None` when the surface cannot measure paths. The temporary node is
/// removed from the surface on every path out of this function.
pub fn path_to_points<S: RenderSurface>(
    surface: &mut S,
    d: &str,
    count: usize,
) -> Option<Vec<Point>> {
    let mut scoped = ScopedNode::new(surface);
    scoped.surface.set_path_data(scoped.node, d);

    let length = scoped.surface.total_length(scoped.node)?;
    let mut points = Vec::with_capacity(count);
    for i in 0..count {
        let at = i as f64 / count as f64 * length;
        points.push(scoped.surface.point_at_length(scoped.node, at)?);
    }
    Some(points)
}
