//! Arc-to-cubic-Bezier lowering.
//!
//! Grounded on the standard per-quadrant four-point cubic approximation of a
//! circular arc (the same approach `lyon_geom::Arc::for_each_cubic_bezier`
//! takes, adapted here to emit directly into a [`Path`] instead of a generic
//! callback, and split so no single emitted cubic spans more than a quarter
//! turn, which keeps the approximation error low regardless of tolerance).

use crate::path::Path;
use raster2d_fixed::Point;

/// Appends `move_to(start); curve_to...` tracing the arc centered at
/// `(xc, yc)` with the given `radius`, sweeping from `angle1` to `angle2`
/// (radians, clockwise in user space since Y increases downward).
pub fn arc(path: &mut Path, xc: f64, yc: f64, radius: f64, angle1: f64, angle2: f64) {
    arc_impl(path, xc, yc, radius, angle1, angle2);
}

/// Counter-clockwise counterpart of [`arc`]: sweeps from `angle1` down to
/// `angle2`.
pub fn arc_negative(path: &mut Path, xc: f64, yc: f64, radius: f64, angle1: f64, angle2: f64) {
    arc_impl(path, xc, yc, radius, angle1, angle2);
}

fn arc_impl(path: &mut Path, xc: f64, yc: f64, radius: f64, angle1: f64, angle2: f64) {
    let total_sweep = angle2 - angle1;
    if total_sweep.abs() < 1e-12 {
        return;
    }

    let point_at = |angle: f64| Point::from_f64(xc + radius * angle.cos(), yc + radius * angle.sin());

    let start = point_at(angle1);
    if path.current_point().is_some() {
        path.line_to(start);
    } else {
        path.move_to(start);
    }

    // Split into segments of at most a quarter turn (pi/2) each, so the
    // per-segment kappa approximation stays accurate.
    const MAX_SEGMENT: f64 = core::f64::consts::FRAC_PI_2;
    let segments = (total_sweep.abs() / MAX_SEGMENT).ceil().max(1.0) as usize;
    let step = total_sweep / segments as f64;

    let mut a0 = angle1;
    for _ in 0..segments {
        let a1 = a0 + step;
        emit_cubic_arc_segment(path, xc, yc, radius, a0, a1);
        a0 = a1;
    }
}

fn emit_cubic_arc_segment(path: &mut Path, xc: f64, yc: f64, radius: f64, a0: f64, a1: f64) {
    let sweep = a1 - a0;
    // Standard circle-to-cubic-Bezier magic number: for a sweep `sweep`,
    // the control point distance along the tangent is
    // `radius * 4/3 * tan(sweep/4)`.
    let k = (4.0 / 3.0) * (sweep / 4.0).tan();

    let (s0, c0) = a0.sin_cos();
    let (s1, c1) = a1.sin_cos();

    let p0 = Point::from_f64(xc + radius * c0, yc + radius * s0);
    let p3 = Point::from_f64(xc + radius * c1, yc + radius * s1);
    let p1 = Point::from_f64(p0.x.to_f64() - k * radius * s0, p0.y.to_f64() + k * radius * c0);
    let p2 = Point::from_f64(p3.x.to_f64() + k * radius * s1, p3.y.to_f64() - k * radius * c1);

    path.curve_to(p1, p2, p3);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::Verb;

    #[test]
    fn full_circle_emits_four_cubic_quadrants() {
        let mut path = Path::new();
        arc(&mut path, 0.0, 0.0, 10.0, 0.0, core::f64::consts::TAU);
        let curve_count = path.verbs().iter().filter(|v| **v == Verb::CurveTo).count();
        assert_eq!(curve_count, 4);
    }

    #[test]
    fn arc_endpoints_lie_on_the_circle() {
        let mut path = Path::new();
        arc(&mut path, 1.0, 2.0, 5.0, 0.0, core::f64::consts::PI);
        let end = path.current_point().unwrap();
        let (dx, dy) = (end.x.to_f64() - 1.0, end.y.to_f64() - 2.0);
        let r = (dx * dx + dy * dy).sqrt();
        assert!((r - 5.0).abs() < 1e-6);
    }
}
