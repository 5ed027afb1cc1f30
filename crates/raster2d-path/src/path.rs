//! The append-only path buffer.
//!
//! Grounded on `lyon_path::Path`'s layout (a buffer of verbs alongside a
//! buffer of point arguments — cairo's "pair of linked lists of fixed-size
//! buffers" simplified here to growable `Vec`s, keeping the verb/point
//! buffer *shape* without the intrusive fixed-block allocator). The verb
//! alphabet here is just four verbs, unlike `lyon_path`'s six (`LineTo,
//! QuadraticTo, CubicTo, Begin, Close, End`) — quadratics and the
//! `Begin`/`End` bookkeeping verbs are not part of this format.

use crate::error::NoCurrentPoint;
use raster2d_fixed::Point;

/// One of the four path verbs. Verb *k* consumes `arity(k)` points.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verb {
    MoveTo,
    LineTo,
    CurveTo,
    ClosePath,
}

impl Verb {
    /// Number of points this verb consumes from the point buffer.
    pub fn arity(self) -> usize {
        match self {
            Verb::MoveTo => 1,
            Verb::LineTo => 1,
            Verb::CurveTo => 3,
            Verb::ClosePath => 0,
        }
    }
}

/// An axis-aligned rectangle, used by [`Path::is_box`] and [`Path::bounds`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl Rect {
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }
    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }
}

/// The append-only verb+point path buffer.
///
/// Invariant: `sum(verb.arity() for verb in verbs) == points.len()` always
/// holds; every mutating method maintains it atomically.
#[derive(Clone, Debug, Default)]
pub struct Path {
    verbs: Vec<Verb>,
    points: Vec<Point>,
    current_point: Option<Point>,
    subpath_start: Option<Point>,
    /// True once at least one verb has been appended *since the last
    /// `new_path`/construction*; used to implement "first verb, if any, is
    /// treated as MoveTo even if written LineTo".
    has_current_subpath: bool,
}

impl Path {
    pub fn new() -> Self {
        Path::default()
    }

    pub fn is_empty(&self) -> bool {
        self.verbs.is_empty()
    }

    /// Overwrites `self` with `other`'s verbs/points, reusing `self`'s
    /// existing buffer capacity instead of allocating fresh `Vec`s the way
    /// `self.clone_from(other)` (or `*self = other.clone()`) would. Used by
    /// pooled clip-node reuse, where a freed node's `Path` buffers are
    /// recycled into a new one.
    pub fn copy_from(&mut self, other: &Path) {
        self.verbs.clear();
        self.verbs.extend_from_slice(&other.verbs);
        self.points.clear();
        self.points.extend_from_slice(&other.points);
        self.current_point = other.current_point;
        self.subpath_start = other.subpath_start;
        self.has_current_subpath = other.has_current_subpath;
    }

    pub fn current_point(&self) -> Option<Point> {
        self.current_point
    }

    pub fn verbs(&self) -> &[Verb] {
        &self.verbs
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Discards all verbs and points, but per the C heritage of this design,
    /// does *not* reset the current point (a `new_path` that starts a fresh
    /// sub-path still continues from wherever drawing left off until the
    /// next explicit `move_to`). Call sites that want to also clear the
    /// current point use `new_sub_path`-style semantics at the gstate layer.
    pub fn new_path(&mut self) {
        self.verbs.clear();
        self.points.clear();
        self.has_current_subpath = false;
    }

    pub fn move_to(&mut self, p: Point) {
        self.verbs.push(Verb::MoveTo);
        self.points.push(p);
        self.current_point = Some(p);
        self.subpath_start = Some(p);
        self.has_current_subpath = true;
    }

    /// First verb, if any, is implicitly a `MoveTo` even if the caller
    /// writes `line_to` first; subsequent verbs require a current
    /// point that only `move_to`/`rel_move_to` establish explicitly, so we
    /// auto-insert a `MoveTo` at `(0, 0)` the one time this can happen.
    fn ensure_subpath_started(&mut self) {
        if !self.has_current_subpath {
            let origin = self.current_point.unwrap_or(Point::from_f64(0.0, 0.0));
            self.move_to(origin);
        }
    }

    pub fn line_to(&mut self, p: Point) {
        self.ensure_subpath_started();
        self.verbs.push(Verb::LineTo);
        self.points.push(p);
        self.current_point = Some(p);
    }

    pub fn curve_to(&mut self, c1: Point, c2: Point, to: Point) {
        self.ensure_subpath_started();
        self.verbs.push(Verb::CurveTo);
        self.points.push(c1);
        self.points.push(c2);
        self.points.push(to);
        self.current_point = Some(to);
    }

    /// Forgets the current point without discarding any geometry already
    /// appended (cairo's `new_sub_path`): the next `line_to` will insert a
    /// fresh implicit `move_to` rather than continuing from wherever the
    /// path left off.
    pub fn forget_current_point(&mut self) {
        self.current_point = None;
        self.has_current_subpath = false;
    }

    pub fn close(&mut self) {
        if !self.has_current_subpath {
            return;
        }
        self.verbs.push(Verb::ClosePath);
        self.current_point = self.subpath_start;
    }

    pub fn rel_line_to(&mut self, dx: f64, dy: f64) -> Result<(), NoCurrentPoint> {
        let cur = self.current_point.ok_or(NoCurrentPoint)?;
        self.line_to(Point::from_f64(cur.x.to_f64() + dx, cur.y.to_f64() + dy));
        Ok(())
    }

    pub fn rel_move_to(&mut self, dx: f64, dy: f64) -> Result<(), NoCurrentPoint> {
        let cur = self.current_point.ok_or(NoCurrentPoint)?;
        self.move_to(Point::from_f64(cur.x.to_f64() + dx, cur.y.to_f64() + dy));
        Ok(())
    }

    pub fn rel_curve_to(
        &mut self,
        dx1: f64,
        dy1: f64,
        dx2: f64,
        dy2: f64,
        dx3: f64,
        dy3: f64,
    ) -> Result<(), NoCurrentPoint> {
        let cur = self.current_point.ok_or(NoCurrentPoint)?;
        let (cx, cy) = (cur.x.to_f64(), cur.y.to_f64());
        self.curve_to(
            Point::from_f64(cx + dx1, cy + dy1),
            Point::from_f64(cx + dx2, cy + dy2),
            Point::from_f64(cx + dx3, cy + dy3),
        );
        Ok(())
    }

    /// Appends a rectangle as `move_to; line_to x3; close`, matching the
    /// shape `is_box` looks for.
    pub fn rectangle(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.move_to(Point::from_f64(x, y));
        self.line_to(Point::from_f64(x + w, y));
        self.line_to(Point::from_f64(x + w, y + h));
        self.line_to(Point::from_f64(x, y + h));
        self.close();
    }

    /// If this path is exactly one closed axis-aligned rectangle (possibly
    /// missing the trailing `ClosePath`, which cairo also tolerates),
    /// returns its corners.
    pub fn is_box(&self) -> Option<Rect> {
        let segments = self.rectilinear_corners()?;
        if segments.len() != 4 {
            return None;
        }
        let xs: Vec<f64> = segments.iter().map(|p| p.x.to_f64()).collect();
        let ys: Vec<f64> = segments.iter().map(|p| p.y.to_f64()).collect();
        let (x0, x1) = (xs.iter().cloned().fold(f64::MAX, f64::min), xs.iter().cloned().fold(f64::MIN, f64::max));
        let (y0, y1) = (ys.iter().cloned().fold(f64::MAX, f64::min), ys.iter().cloned().fold(f64::MIN, f64::max));
        // A box has exactly two distinct x values and two distinct y values.
        let distinct_x = xs.iter().filter(|&&x| (x - x0).abs() > 1e-9 && (x - x1).abs() > 1e-9).count();
        let distinct_y = ys.iter().filter(|&&y| (y - y0).abs() > 1e-9 && (y - y1).abs() > 1e-9).count();
        if distinct_x == 0 && distinct_y == 0 {
            Some(Rect { x0, y0, x1, y1 })
        } else {
            None
        }
    }

    /// Returns the corner points of the path if every segment is either
    /// horizontal or vertical (no curves); `None` if any `CurveTo` is
    /// present, matching `is_rectilinear`'s contract.
    fn rectilinear_corners(&self) -> Option<Vec<Point>> {
        if self.verbs.iter().any(|v| matches!(v, Verb::CurveTo)) {
            return None;
        }
        let mut corners = Vec::new();
        let mut point_index = 0;
        let mut prev: Option<Point> = None;
        for &verb in &self.verbs {
            let n = verb.arity();
            let pts = &self.points[point_index..point_index + n];
            point_index += n;
            match verb {
                Verb::MoveTo => {
                    corners.push(pts[0]);
                    prev = Some(pts[0]);
                }
                Verb::LineTo => {
                    if let Some(p) = prev {
                        let horiz = p.x == pts[0].x;
                        let vert = p.y == pts[0].y;
                        if !horiz && !vert {
                            return None;
                        }
                    }
                    corners.push(pts[0]);
                    prev = Some(pts[0]);
                }
                Verb::ClosePath => {}
                Verb::CurveTo => unreachable!(),
            }
        }
        Some(corners)
    }

    pub fn is_rectilinear(&self) -> bool {
        self.rectilinear_corners().is_some()
    }

    /// Approximate bounding box: the convex hull of curve control points
    /// always contains the curve itself, so using raw point data (rather
    /// than flattening) gives a correct, if occasionally loose, bound. This
    /// matches cairo's own fast-path path extents.
    pub fn bounds(&self) -> Rect {
        if self.points.is_empty() {
            return Rect { x0: 0.0, y0: 0.0, x1: 0.0, y1: 0.0 };
        }
        let mut x0 = f64::MAX;
        let mut y0 = f64::MAX;
        let mut x1 = f64::MIN;
        let mut y1 = f64::MIN;
        for p in &self.points {
            let (x, y) = (p.x.to_f64(), p.y.to_f64());
            x0 = x0.min(x);
            y0 = y0.min(y);
            x1 = x1.max(x);
            y1 = y1.max(y);
        }
        Rect { x0, y0, x1, y1 }
    }
}
