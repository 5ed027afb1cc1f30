//! Stroke-to-polygon conversion: offsets every segment by the
//! half-width, decomposes joins/caps into small convex pieces, and unions
//! them all via the nonzero winding rule. Grounded on
//! `tessellation/src/stroke.rs`'s event-driven segment walk (kept HOW: one
//! pass over the flattened polyline carrying `prev_face`/`first_face`
//! state) but producing trapezoid-ready polygon edges (WHAT) instead of
//! that file's triangle strip, per `xrstroker.c`'s join/cap table.

use crate::polygon::Polygon;
use raster2d_fixed::Point as FxPoint;
use raster2d_geom::flatten::{flatten_cubic, CubicSegment};
use raster2d_geom::Matrix;
use raster2d_path::{Path, Pen, Verb};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineCap {
    Butt,
    Round,
    Square,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineJoin {
    Miter,
    Round,
    Bevel,
}

/// Stroke parameters. `half_width`, the dash array and the dash offset are
/// all expected in the same (device) space as the path being stroked;
/// nothing below the gstate layer ever sees unprojected user-space
/// numbers.
#[derive(Clone, Debug)]
pub struct StrokeStyle {
    pub half_width: f64,
    pub cap: LineCap,
    pub join: LineJoin,
    pub miter_limit: f64,
    pub dash: Vec<f64>,
    pub dash_offset: f64,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        StrokeStyle {
            half_width: 0.5,
            cap: LineCap::Butt,
            join: LineJoin::Miter,
            miter_limit: 10.0,
            dash: Vec::new(),
            dash_offset: 0.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct V2 {
    x: f64,
    y: f64,
}

impl V2 {
    fn new(x: f64, y: f64) -> Self {
        V2 { x, y }
    }
    fn from_fx(p: FxPoint) -> Self {
        V2 { x: p.x.to_f64(), y: p.y.to_f64() }
    }
    fn to_fx(self) -> FxPoint {
        FxPoint::from_f64(self.x, self.y)
    }
    fn sub(self, o: V2) -> V2 {
        V2::new(self.x - o.x, self.y - o.y)
    }
    fn add(self, o: V2) -> V2 {
        V2::new(self.x + o.x, self.y + o.y)
    }
    fn scale(self, s: f64) -> V2 {
        V2::new(self.x * s, self.y * s)
    }
    fn length(self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
    fn normalized(self) -> V2 {
        let len = self.length();
        if len < 1e-9 {
            V2::new(0.0, 0.0)
        } else {
            self.scale(1.0 / len)
        }
    }
    /// The left-hand perpendicular (rotate 90 degrees counter-clockwise in
    /// the downward-Y device space used throughout).
    fn perp(self) -> V2 {
        V2::new(-self.y, self.x)
    }
    fn cross(self, o: V2) -> f64 {
        self.x * o.y - self.y * o.x
    }
}

struct Subpath {
    points: Vec<V2>,
    closed: bool,
}

/// Flattens a path (already in device space) into polylines, expanding
/// every `CurveTo` through the spline flattener.
fn flatten_path(path: &Path, tolerance: f64) -> Vec<Subpath> {
    let mut subpaths = Vec::new();
    let mut current: Vec<V2> = Vec::new();
    let mut closed = false;
    let mut start = V2::new(0.0, 0.0);
    let mut last = V2::new(0.0, 0.0);

    let flush = |subpaths: &mut Vec<Subpath>, current: &mut Vec<V2>, closed: &mut bool| {
        if current.len() >= 2 {
            subpaths.push(Subpath { points: std::mem::take(current), closed: *closed });
        } else {
            current.clear();
        }
        *closed = false;
    };

    for (verb, pts) in path.iter_forward() {
        match verb {
            Verb::MoveTo => {
                flush(&mut subpaths, &mut current, &mut closed);
                start = V2::from_fx(pts[0]);
                last = start;
                current.push(start);
            }
            Verb::LineTo => {
                last = V2::from_fx(pts[0]);
                current.push(last);
            }
            Verb::CurveTo => {
                let curve = CubicSegment {
                    from: last.to_fx(),
                    ctrl1: pts[0],
                    ctrl2: pts[1],
                    to: pts[2],
                };
                let _ = flatten_cubic(&curve, tolerance, |p| current.push(V2::from_fx(p)));
                last = V2::from_fx(pts[2]);
            }
            Verb::ClosePath => {
                if (last.sub(start)).length() > 1e-9 {
                    current.push(start);
                }
                closed = true;
            }
        }
    }
    flush(&mut subpaths, &mut current, &mut closed);
    subpaths
}

/// Splits a polyline into its dash "on" segments, walking its cumulative
/// length against the dash pattern starting from `dash_offset`.
fn apply_dashes(points: &[V2], closed: bool, dash: &[f64], dash_offset: f64) -> Vec<(Vec<V2>, bool)> {
    if dash.is_empty() || dash.iter().all(|&d| d <= 0.0) {
        return vec![(points.to_vec(), closed)];
    }
    let total: f64 = dash.iter().sum();
    if total <= 0.0 {
        return vec![(points.to_vec(), closed)];
    }

    let mut offset = dash_offset.rem_euclid(total);
    let mut dash_index = 0usize;
    while offset >= dash[dash_index] {
        offset -= dash[dash_index];
        dash_index = (dash_index + 1) % dash.len();
    }
    let mut remaining = dash[dash_index] - offset;
    let mut on = dash_index % 2 == 0;

    let mut segments = Vec::new();
    let mut current: Vec<V2> = Vec::new();
    if on {
        current.push(points[0]);
    }

    for pair in points.windows(2) {
        let (mut a, b) = (pair[0], pair[1]);
        let mut seg_len = b.sub(a).length();
        let dir = if seg_len > 1e-9 { b.sub(a).scale(1.0 / seg_len) } else { V2::new(0.0, 0.0) };

        while seg_len > remaining {
            let cut = a.add(dir.scale(remaining));
            if on {
                current.push(cut);
                segments.push((std::mem::take(&mut current), false));
            } else {
                current.clear();
                current.push(cut);
            }
            a = cut;
            seg_len -= remaining;
            dash_index = (dash_index + 1) % dash.len();
            remaining = dash[dash_index];
            on = !on;
        }
        remaining -= seg_len;
        if on {
            current.push(b);
        }
    }
    if on && current.len() >= 2 {
        segments.push((current, false));
    }
    segments
}

/// Converts `path` (already device-space) into a stroke outline polygon
/// suitable for nonzero-winding trapezoid tessellation.
pub fn stroke_to_polygon(path: &Path, style: &StrokeStyle, tolerance: f64) -> Polygon {
    let mut polygon = Polygon::new();
    let pen = (style.join == LineJoin::Round || style.cap == LineCap::Round)
        .then(|| Pen::new(style.half_width, tolerance, &Matrix::IDENTITY));

    for subpath in flatten_path(path, tolerance) {
        for (points, seg_closed) in apply_dashes(&subpath.points, subpath.closed, &style.dash, style.dash_offset) {
            if points.len() < 2 {
                continue;
            }
            stroke_polyline(&points, seg_closed, style, pen.as_ref(), &mut polygon);
        }
    }
    polygon
}

fn emit_quad(polygon: &mut Polygon, a: V2, b: V2, c: V2, d: V2) {
    polygon.add_closed_polyline(&[a.to_fx(), b.to_fx(), c.to_fx(), d.to_fx()]);
}

fn emit_triangle(polygon: &mut Polygon, a: V2, b: V2, c: V2) {
    polygon.add_closed_polyline(&[a.to_fx(), b.to_fx(), c.to_fx()]);
}

fn stroke_polyline(points: &[V2], closed: bool, style: &StrokeStyle, pen: Option<&Pen>, polygon: &mut Polygon) {
    let n = points.len();
    let segment_count = if closed { n } else { n - 1 };
    let hw = style.half_width;

    for i in 0..segment_count {
        let p0 = points[i];
        let p1 = points[(i + 1) % n];
        let dir = p1.sub(p0).normalized();
        if dir.length() < 1e-9 {
            continue;
        }
        let offset = dir.perp().scale(hw);
        emit_quad(polygon, p0.add(offset), p1.add(offset), p1.sub(offset), p0.sub(offset));
    }

    let joint_count = if closed { n } else { n.saturating_sub(2) };
    for j in 0..joint_count {
        let vertex_index = if closed { j } else { j + 1 };
        let prev = points[(vertex_index + n - 1) % n];
        let here = points[vertex_index];
        let next = points[(vertex_index + 1) % n];
        emit_join(here, prev, next, hw, style, pen, polygon);
    }

    if !closed {
        emit_cap(points[0], points[1], hw, style, pen, polygon, true);
        emit_cap(points[n - 1], points[n - 2], hw, style, pen, polygon, false);
    }
}

fn emit_join(here: V2, prev: V2, next: V2, hw: f64, style: &StrokeStyle, pen: Option<&Pen>, polygon: &mut Polygon) {
    let in_dir = here.sub(prev).normalized();
    let out_dir = next.sub(here).normalized();
    if in_dir.length() < 1e-9 || out_dir.length() < 1e-9 {
        return;
    }
    let turn = in_dir.cross(out_dir);
    if turn.abs() < 1e-9 {
        return;
    }
    // The outer corner is on the side the path turns away from.
    let sign = if turn > 0.0 { -1.0 } else { 1.0 };
    let in_outer = here.add(in_dir.perp().scale(hw * sign));
    let out_outer = here.add(out_dir.perp().scale(hw * sign));

    match style.join {
        LineJoin::Bevel => emit_triangle(polygon, here, in_outer, out_outer),
        LineJoin::Miter => {
            if let Some(miter_point) = miter_intersection(here, in_dir, in_outer, out_dir, out_outer) {
                let miter_len = miter_point.sub(here).length();
                if miter_len <= style.miter_limit * hw {
                    emit_quad(polygon, here, in_outer, miter_point, out_outer);
                    return;
                }
            }
            emit_triangle(polygon, here, in_outer, out_outer);
        }
        LineJoin::Round => {
            if let Some(pen) = pen {
                emit_round_fan(here, in_dir.perp().scale(sign), out_dir.perp().scale(sign), pen, polygon);
            } else {
                emit_triangle(polygon, here, in_outer, out_outer);
            }
        }
    }
}

fn miter_intersection(here: V2, in_dir: V2, in_outer: V2, out_dir: V2, out_outer: V2) -> Option<V2> {
    // Solve in_outer + t*in_dir == out_outer + s*out_dir.
    let denom = in_dir.cross(out_dir);
    if denom.abs() < 1e-9 {
        return None;
    }
    let d = out_outer.sub(in_outer);
    let t = d.cross(out_dir) / denom;
    let _ = here;
    Some(in_outer.add(in_dir.scale(t)))
}

/// Fans triangles from `here` through the pen's vertices whose offset
/// directions lie between the incoming and outgoing outward normals,
/// approximating a round join/cap with the pen polygon.
fn emit_round_fan(here: V2, from_normal: V2, to_normal: V2, pen: &Pen, polygon: &mut Polygon) {
    use raster2d_fixed::Slope;
    let slope_of = |v: V2| Slope::new(
        raster2d_fixed::Fixed16::from_f64(v.x),
        raster2d_fixed::Fixed16::from_f64(v.y),
    );
    let from_idx = pen.find_active_cw(slope_of(from_normal));
    let to_idx = pen.find_active_ccw(slope_of(to_normal));
    let arc = pen.walk_cw(from_idx, to_idx);
    for pair in arc.windows(2) {
        let a = here.add(V2::from_fx(pair[0]));
        let b = here.add(V2::from_fx(pair[1]));
        emit_triangle(polygon, here, a, b);
    }
}

fn emit_cap(end: V2, inward_neighbor: V2, hw: f64, style: &StrokeStyle, pen: Option<&Pen>, polygon: &mut Polygon, is_start: bool) {
    let mut dir = end.sub(inward_neighbor).normalized();
    if is_start {
        dir = dir.scale(-1.0);
    }
    if dir.length() < 1e-9 {
        return;
    }
    let offset = dir.perp().scale(hw);
    let left = end.add(offset);
    let right = end.sub(offset);

    match style.cap {
        LineCap::Butt => {}
        LineCap::Square => {
            let forward = dir.scale(hw);
            emit_quad(polygon, left, left.add(forward), right.add(forward), right);
        }
        LineCap::Round => {
            if let Some(pen) = pen {
                emit_round_fan(end, offset.scale(1.0 / hw), offset.scale(-1.0 / hw), pen, polygon);
            } else {
                let forward = dir.scale(hw);
                emit_quad(polygon, left, left.add(forward), right.add(forward), right);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use raster2d_fixed::Point as FxPt;

    fn pt(x: f64, y: f64) -> FxPt {
        FxPt::from_f64(x, y)
    }

    #[test]
    fn straight_segment_produces_a_quad() {
        let mut path = Path::new();
        path.move_to(pt(0.0, 0.0));
        path.line_to(pt(10.0, 0.0));
        let style = StrokeStyle { half_width: 1.0, ..StrokeStyle::default() };
        let poly = stroke_to_polygon(&path, &style, 0.1);
        assert!(!poly.is_empty());
    }

    #[test]
    fn dash_pattern_produces_multiple_disjoint_pieces() {
        let mut path = Path::new();
        path.move_to(pt(0.0, 0.0));
        path.line_to(pt(100.0, 0.0));
        let style = StrokeStyle {
            half_width: 1.0,
            dash: vec![10.0, 10.0],
            ..StrokeStyle::default()
        };
        let poly = stroke_to_polygon(&path, &style, 0.1);
        // Five "on" dashes of length 10 each produce at least five quads'
        // worth of edges (4 edges per quad).
        assert!(poly.edges().len() >= 5 * 4);
    }

    #[test]
    fn closed_square_has_no_caps() {
        let mut path = Path::new();
        path.move_to(pt(0.0, 0.0));
        path.line_to(pt(10.0, 0.0));
        path.line_to(pt(10.0, 10.0));
        path.line_to(pt(0.0, 10.0));
        path.close();
        let style = StrokeStyle { half_width: 1.0, join: LineJoin::Bevel, ..StrokeStyle::default() };
        let poly = stroke_to_polygon(&path, &style, 0.1);
        assert!(!poly.is_empty());
    }
}
