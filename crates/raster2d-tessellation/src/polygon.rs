//! Unordered edge-list polygons, the common currency between the Stroker,
//! the Filler and the trapezoid tessellator.

use raster2d_fixed::{Fixed16, Point};

/// The fill rule used to decide which bands of the sweep are interior.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FillRule {
    Winding,
    EvenOdd,
}

/// A directed line segment, normalized so `p1.y <= p2.y`. `direction` is
/// `+1` if the original (pre-normalization) segment ran downward, `-1` if
/// it had to be flipped; the winding counter in the tessellator adds this
/// value per edge crossed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Edge {
    pub p1: Point,
    pub p2: Point,
    pub direction: i8,
}

impl Edge {
    /// Builds a normalized edge from `a` to `b`. Returns `None` for
    /// horizontal segments, which the tessellator discards up front.
    pub fn new(a: Point, b: Point) -> Option<Self> {
        use core::cmp::Ordering;
        match a.y.cmp(&b.y) {
            Ordering::Less => Some(Edge { p1: a, p2: b, direction: 1 }),
            Ordering::Greater => Some(Edge { p1: b, p2: a, direction: -1 }),
            Ordering::Equal => None,
        }
    }

    pub fn top(&self) -> Fixed16 {
        self.p1.y
    }

    pub fn bottom(&self) -> Fixed16 {
        self.p2.y
    }

    /// The x coordinate of this edge at height `y`, via linear
    /// interpolation between its endpoints. `y` must lie within
    /// `[top(), bottom()]` for the result to be meaningful.
    pub fn x_at(&self, y: Fixed16) -> Fixed16 {
        let dy = self.p2.y - self.p1.y;
        if dy == Fixed16::ZERO {
            return self.p1.x;
        }
        let t = (y - self.p1.y).div(dy);
        self.p1.x + (self.p2.x - self.p1.x).mul(t)
    }

    /// Approximate intersection height with `other`, computed in floating
    /// point for numerical simplicity and truncated back to `Fixed16`.
    /// Returns `None` for parallel (equal-slope) edges, matching the "exact
    /// equal slopes produce no intersection" tie-break.
    pub fn intersect_y(&self, other: &Edge) -> Option<Fixed16> {
        let (x1_0, y1_0) = (self.p1.x.to_f64(), self.p1.y.to_f64());
        let (x1_1, y1_1) = (self.p2.x.to_f64(), self.p2.y.to_f64());
        let (x2_0, y2_0) = (other.p1.x.to_f64(), other.p1.y.to_f64());
        let (x2_1, y2_1) = (other.p2.x.to_f64(), other.p2.y.to_f64());
        let b1 = (x1_1 - x1_0) / (y1_1 - y1_0);
        let b2 = (x2_1 - x2_0) / (y2_1 - y2_0);
        if (b1 - b2).abs() < 1e-12 {
            return None;
        }
        let a1 = x1_0 - b1 * y1_0;
        let a2 = x2_0 - b2 * y2_0;
        let y = (a2 - a1) / (b1 - b2);
        Some(Fixed16::from_f64(y))
    }
}

/// An unordered edge-list polygon: possibly self-intersecting, possibly
/// with several disjoint contours, exactly the shape the trapezoid
/// tessellator expects as input.
#[derive(Clone, Debug, Default)]
pub struct Polygon {
    edges: Vec<Edge>,
}

impl Polygon {
    pub fn new() -> Self {
        Polygon { edges: Vec::new() }
    }

    pub fn add_line(&mut self, a: Point, b: Point) {
        if let Some(edge) = Edge::new(a, b) {
            self.edges.push(edge);
        }
    }

    /// Adds every edge of a closed polyline (`points[0]` implicitly closes
    /// back to `points[last]`).
    pub fn add_closed_polyline(&mut self, points: &[Point]) {
        if points.len() < 2 {
            return;
        }
        for pair in points.windows(2) {
            self.add_line(pair[0], pair[1]);
        }
        self.add_line(points[points.len() - 1], points[0]);
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn extend(&mut self, other: &Polygon) {
        self.edges.extend_from_slice(&other.edges);
    }

    /// `true` if every edge is axis-aligned-vertical after rounding to the
    /// pixel grid, enabling the box-tessellator fast path.
    pub fn is_rectilinear(&self) -> bool {
        self.edges.iter().all(|e| e.p1.x == e.p2.x)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn pt(x: f64, y: f64) -> Point {
        Point::from_f64(x, y)
    }

    #[test]
    fn horizontal_edges_are_discarded() {
        assert!(Edge::new(pt(0.0, 5.0), pt(10.0, 5.0)).is_none());
    }

    #[test]
    fn normalization_records_original_direction() {
        let down = Edge::new(pt(0.0, 0.0), pt(0.0, 10.0)).unwrap();
        assert_eq!(down.direction, 1);
        let up = Edge::new(pt(0.0, 10.0), pt(0.0, 0.0)).unwrap();
        assert_eq!(up.direction, -1);
        assert_eq!(up.p1, down.p1);
    }

    #[test]
    fn x_at_interpolates_linearly() {
        let edge = Edge::new(pt(0.0, 0.0), pt(10.0, 10.0)).unwrap();
        let x = edge.x_at(Fixed16::from_f64(5.0)).to_f64();
        assert!((x - 5.0).abs() < 1e-3);
    }

    #[test]
    fn parallel_edges_do_not_intersect() {
        let a = Edge::new(pt(0.0, 0.0), pt(0.0, 10.0)).unwrap();
        let b = Edge::new(pt(5.0, 0.0), pt(5.0, 10.0)).unwrap();
        assert!(a.intersect_y(&b).is_none());
    }

    #[test]
    fn crossing_edges_intersect_at_the_midpoint() {
        let a = Edge::new(pt(0.0, 0.0), pt(10.0, 10.0)).unwrap();
        let b = Edge::new(pt(10.0, 0.0), pt(0.0, 10.0)).unwrap();
        let y = a.intersect_y(&b).unwrap().to_f64();
        assert!((y - 5.0).abs() < 1e-6);
    }
}
