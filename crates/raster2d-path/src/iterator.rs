//! Forward and reverse traversal over a [`Path`].
//!
//! Grounded on `lyon_path::iterator`'s explicit-iterator traversal
//! style — `next()`-based rather than callback-based, so tessellators can
//! pull events lazily.

use crate::path::{Path, Verb};
use raster2d_fixed::Point;

/// Forward iterator over `(Verb, &[Point])` pairs.
pub struct Iter<'l> {
    path: &'l Path,
    verb_index: usize,
    point_index: usize,
}

impl<'l> Iter<'l> {
    pub fn new(path: &'l Path) -> Self {
        Iter {
            path,
            verb_index: 0,
            point_index: 0,
        }
    }
}

impl<'l> Iterator for Iter<'l> {
    type Item = (Verb, &'l [Point]);

    fn next(&mut self) -> Option<Self::Item> {
        let verb = *self.path.verbs().get(self.verb_index)?;
        self.verb_index += 1;
        let n = verb.arity();
        let pts = &self.path.points()[self.point_index..self.point_index + n];
        self.point_index += n;
        Some((verb, pts))
    }
}

/// A single sub-path worth of verbs for the reverse iterator to replay
/// backwards.
struct SubPath<'l> {
    verbs: &'l [Verb],
    points: &'l [Point],
    closed: bool,
}

/// Reverse iterator: sub-paths are visited in reverse order, each sub-path's
/// segments are reversed, curve control points are swapped
/// (`ctrl1,ctrl2,to` becomes a `CurveTo` ending at the segment's start with
/// control points `ctrl2,ctrl1`), and a synthesized `Close` is emitted
/// first for any sub-path that was closed.
pub struct ReverseIter {
    // Fully materialized because reversal requires random access to the
    // whole sub-path; this mirrors how `lyon_path`'s own path builder
    // buffers a whole path before offering non-builder traversal.
    events: Vec<(Verb, [Point; 3], usize)>,
    cursor: usize,
}

impl ReverseIter {
    pub fn new(path: &Path) -> Self {
        let subpaths = split_subpaths(path);
        let mut events = Vec::new();
        for sub in subpaths.iter().rev() {
            emit_reversed_subpath(sub, &mut events);
        }
        ReverseIter { events, cursor: 0 }
    }
}

impl Iterator for ReverseIter {
    type Item = (Verb, Vec<Point>);

    fn next(&mut self) -> Option<Self::Item> {
        let (verb, pts, n) = *self.events.get(self.cursor)?;
        self.cursor += 1;
        Some((verb, pts[..n].to_vec()))
    }
}

fn split_subpaths(path: &Path) -> Vec<SubPath<'_>> {
    let mut subpaths = Vec::new();
    let mut verb_start = 0;
    let mut point_start = 0;
    let mut point_cursor = 0;
    let verbs = path.verbs();
    let points = path.points();
    for (i, &verb) in verbs.iter().enumerate() {
        if verb == Verb::MoveTo && i != verb_start {
            subpaths.push(SubPath {
                verbs: &verbs[verb_start..i],
                points: &points[point_start..point_cursor],
                closed: verbs[verb_start..i].last() == Some(&Verb::ClosePath),
            });
            verb_start = i;
            point_start = point_cursor;
        }
        point_cursor += verb.arity();
    }
    if verb_start < verbs.len() {
        subpaths.push(SubPath {
            verbs: &verbs[verb_start..],
            points: &points[point_start..point_cursor],
            closed: verbs.last() == Some(&Verb::ClosePath),
        });
    }
    subpaths
}

fn emit_reversed_subpath(sub: &SubPath<'_>, out: &mut Vec<(Verb, [Point; 3], usize)>) {
    // Collect (verb, points) pairs for the sub-path, in forward order,
    // excluding the leading MoveTo and trailing ClosePath (handled
    // specially).
    let mut segments: Vec<(Verb, Vec<Point>)> = Vec::new();
    let mut point_index = 0;
    let mut start_point = None;
    for &verb in sub.verbs {
        let n = verb.arity();
        let pts = sub.points[point_index..point_index + n].to_vec();
        point_index += n;
        match verb {
            Verb::MoveTo => start_point = Some(pts[0]),
            Verb::ClosePath => {}
            _ => segments.push((verb, pts)),
        }
    }
    let start_point = match start_point {
        Some(p) => p,
        None => return,
    };
    let end_point = segments
        .last()
        .map(|(_, pts)| *pts.last().unwrap())
        .unwrap_or(start_point);

    let _ = end_point;

    if sub.closed {
        out.push((Verb::ClosePath, [Point::default(); 3], 0));
    }

    // Move to the sub-path's end point (reverse traversal starts there).
    out.push((Verb::MoveTo, [end_point, Point::default(), Point::default()], 1));

    // Thread "from" through the reversal by first building the plain list
    // of endpoints in forward order, then emitting segments back to front
    // using adjacent pairs from that list.
    let mut all_points = vec![start_point];
    for (_, pts) in &segments {
        all_points.push(*pts.last().copied().unwrap());
    }
    for (i, (verb, pts)) in segments.iter().enumerate().rev() {
        let seg_to = all_points[i];
        match verb {
            Verb::LineTo => {
                out.push((Verb::LineTo, [seg_to, Point::default(), Point::default()], 1));
            }
            Verb::CurveTo => {
                // Forward control points are [ctrl1, ctrl2, to]; reversed
                // the curve runs to `seg_to` with control points swapped.
                out.push((Verb::CurveTo, [pts[1], pts[0], seg_to], 3));
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use raster2d_fixed::Point;

    fn pt(x: f64, y: f64) -> Point {
        Point::from_f64(x, y)
    }

    #[test]
    fn forward_iterator_yields_verb_and_points() {
        let mut path = Path::new();
        path.move_to(pt(0.0, 0.0));
        path.line_to(pt(1.0, 0.0));
        path.close();
        let events: Vec<_> = Iter::new(&path).map(|(v, p)| (v, p.to_vec())).collect();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].0, Verb::MoveTo);
        assert_eq!(events[1].0, Verb::LineTo);
        assert_eq!(events[2].0, Verb::ClosePath);
    }

    #[test]
    fn reverse_iterator_emits_close_first_for_closed_subpath() {
        let mut path = Path::new();
        path.move_to(pt(0.0, 0.0));
        path.line_to(pt(1.0, 0.0));
        path.line_to(pt(1.0, 1.0));
        path.close();
        let events: Vec<_> = ReverseIter::new(&path).collect();
        assert_eq!(events[0].0, Verb::ClosePath);
        assert_eq!(events[1].0, Verb::MoveTo);
        assert_eq!(events[1].1[0], pt(1.0, 1.0));
    }

    #[test]
    fn reverse_of_two_segment_line_visits_endpoints_in_reverse() {
        let mut path = Path::new();
        path.move_to(pt(0.0, 0.0));
        path.line_to(pt(1.0, 0.0));
        path.line_to(pt(2.0, 5.0));
        let events: Vec<_> = ReverseIter::new(&path).collect();
        // MoveTo(2,5), LineTo(1,0), LineTo(0,0)
        assert_eq!(events[0], (Verb::MoveTo, vec![pt(2.0, 5.0)]));
        assert_eq!(events[1], (Verb::LineTo, vec![pt(1.0, 0.0)]));
        assert_eq!(events[2], (Verb::LineTo, vec![pt(0.0, 0.0)]));
    }
}
