//! Recursive de Casteljau flattening of cubic Bezier splines into line
//! segments, bounded by a device-space tolerance.
//!
//! The recursion is expressed as an explicit stack of pending sub-curves
//! (grounded in `lyon_geom::cubic_bezier::Flattened`'s own preference for
//! heap-driven iteration over
//! deep call recursion, see `lyon_geom::cubic_bezier::Flattened`) rather than
//! a recursive function, so curve depth is bounded by the stack's capacity
//! rather than the machine call stack.

use raster2d_fixed::{Fixed16, Point};

/// One control point quadruple of a cubic Bezier segment.
#[derive(Clone, Copy, Debug)]
pub struct CubicSegment {
    pub from: Point,
    pub ctrl1: Point,
    pub ctrl2: Point,
    pub to: Point,
}

/// A spline whose four control points all coincide (within `Fixed16::EPSILON`
/// of each other) produces no flattened output; callers should skip it
/// rather than emit a zero-length line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Degenerate;

impl CubicSegment {
    fn is_degenerate(&self) -> bool {
        let eps = Fixed16::EPSILON;
        let close = |p: Point, q: Point| (p.x - q.x).abs() <= eps && (p.y - q.y).abs() <= eps;
        close(self.from, self.ctrl1) && close(self.ctrl1, self.ctrl2) && close(self.ctrl2, self.to)
    }

    fn split(&self, t: f64) -> (CubicSegment, CubicSegment) {
        let lerp = |p: Point, q: Point| {
            Point::new(
                Fixed16::from_f64(p.x.to_f64() + (q.x.to_f64() - p.x.to_f64()) * t),
                Fixed16::from_f64(p.y.to_f64() + (q.y.to_f64() - p.y.to_f64()) * t),
            )
        };
        let ab = lerp(self.from, self.ctrl1);
        let bc = lerp(self.ctrl1, self.ctrl2);
        let cd = lerp(self.ctrl2, self.to);
        let abc = lerp(ab, bc);
        let bcd = lerp(bc, cd);
        let abcd = lerp(abc, bcd);
        (
            CubicSegment {
                from: self.from,
                ctrl1: ab,
                ctrl2: abc,
                to: abcd,
            },
            CubicSegment {
                from: abcd,
                ctrl1: bcd,
                ctrl2: cd,
                to: self.to,
            },
        )
    }

    /// Maximum perpendicular distance of either control point from the
    /// chord `from -> to`.
    fn flatness(&self) -> f64 {
        let (fx, fy) = (self.from.x.to_f64(), self.from.y.to_f64());
        let (tx, ty) = (self.to.x.to_f64(), self.to.y.to_f64());
        let (dx, dy) = (tx - fx, ty - fy);
        let chord_len_sq = dx * dx + dy * dy;
        if chord_len_sq < 1e-12 {
            // Degenerate chord: fall back to distance from the endpoint.
            let d1 = ((self.ctrl1.x.to_f64() - fx).powi(2) + (self.ctrl1.y.to_f64() - fy).powi(2)).sqrt();
            let d2 = ((self.ctrl2.x.to_f64() - fx).powi(2) + (self.ctrl2.y.to_f64() - fy).powi(2)).sqrt();
            return d1.max(d2);
        }
        let dist = |p: Point| {
            let (px, py) = (p.x.to_f64() - fx, p.y.to_f64() - fy);
            (px * dy - py * dx).abs() / chord_len_sq.sqrt()
        };
        dist(self.ctrl1).max(dist(self.ctrl2))
    }
}

/// Flattens `curve` into line segment endpoints, invoking `emit(point)` for
/// every vertex after `curve.from` (the caller already has `from`). Stops
/// subdividing a sub-curve once [`CubicSegment::flatness`] is below
/// `tolerance`.
///
/// Returns `Err(Degenerate)` without calling `emit` if all four control
/// points coincide.
pub fn flatten_cubic<F: FnMut(Point)>(
    curve: &CubicSegment,
    tolerance: f64,
    mut emit: F,
) -> Result<(), Degenerate> {
    if curve.is_degenerate() {
        return Err(Degenerate);
    }

    // Bound recursion depth: each split halves the flatness error by
    // roughly a factor of 4, so 32 levels is enormously more than any
    // sane tolerance could ever require.
    const MAX_DEPTH: u32 = 32;

    let mut stack: Vec<(CubicSegment, u32)> = vec![(*curve, 0)];
    // Process in the order the curve should be emitted: since we push both
    // halves of a split, pop the *last* pushed (second half) after pushing
    // the first half, i.e. use the stack as a depth-first left-to-right
    // walk by pushing the second half first.
    let mut ordered = Vec::new();
    while let Some((seg, depth)) = stack.pop() {
        if depth >= MAX_DEPTH || seg.flatness() <= tolerance {
            ordered.push(seg);
        } else {
            let (left, right) = seg.split(0.5);
            stack.push((right, depth + 1));
            stack.push((left, depth + 1));
        }
    }

    for seg in ordered {
        emit(seg.to);
    }

    Ok(())
}
