//! The scanline trapezoid tessellator: a Bentley-Ottmann
//! flavored sweep limited to the events the Surface contract actually
//! needs — no general-purpose intersection reporting, just enough to
//! decompose a polygon into fill-rule-correct trapezoids.
//!
//! Grounded in architecture on `tessellation/src/{event_queue.rs,fill.rs}`'s
//! event-queue + active list split (a sweep off a sorted event queue and an
//! active edge list kept in sweep order); the *output* here is trapezoids
//! rather than triangles, which that tessellator has no concept of, so the
//! emission step below is new.

use crate::polygon::{Edge, FillRule, Polygon};
use crate::trapezoid::{Trapezoid, Trapezoids};
use log::trace;
use raster2d_fixed::Fixed16;

struct Active {
    edge: Edge,
}

/// Tessellates `polygon` into trapezoids under `fill_rule`.
pub fn tessellate(polygon: &Polygon, fill_rule: FillRule) -> Trapezoids {
    if polygon.is_rectilinear() {
        trace!("tessellate: rectilinear fast path, {} edges", polygon.edges().len());
        return tessellate_rectilinear(polygon);
    }
    trace!("tessellate: general sweep, {} edges", polygon.edges().len());

    let mut pending: Vec<Edge> = polygon.edges().to_vec();
    pending.sort_by(|a, b| a.top().cmp(&b.top()).then(a.x_at(a.top()).cmp(&b.x_at(b.top()))));

    let mut active: Vec<Active> = Vec::new();
    let mut out = Trapezoids::new();
    let mut cursor = 0usize;

    let mut y = match pending.first() {
        Some(e) => e.top(),
        None => return out,
    };

    loop {
        while cursor < pending.len() && pending[cursor].top() <= y {
            active.push(Active { edge: pending[cursor] });
            cursor += 1;
        }
        active.sort_by(|a, b| a.edge.x_at(y).cmp(&b.edge.x_at(y)));

        if active.is_empty() && cursor >= pending.len() {
            break;
        }

        let mut next_y = if cursor < pending.len() {
            Some(pending[cursor].top())
        } else {
            None
        };
        for a in &active {
            next_y = Some(match next_y {
                Some(ny) => ny.min(a.edge.bottom()),
                None => a.edge.bottom(),
            });
        }
        for pair in active.windows(2) {
            if let Some(iy) = pair[0].edge.intersect_y(&pair[1].edge) {
                if iy > y {
                    let nudged = iy - Fixed16::EPSILON;
                    next_y = Some(match next_y {
                        Some(ny) => ny.min(nudged.max(y)),
                        None => nudged.max(y),
                    });
                }
            }
        }

        let next_y = match next_y {
            Some(ny) if ny > y => ny,
            _ => {
                // No forward progress available (shouldn't normally
                // happen); advance past the next pending edge to avoid an
                // infinite loop on degenerate input.
                if cursor < pending.len() {
                    cursor += 1;
                    continue;
                } else {
                    break;
                }
            }
        };

        emit_band(&active, y, next_y, fill_rule, &mut out);

        y = next_y;
        active.retain(|a| a.edge.bottom() > y);
    }

    out
}

fn emit_band(active: &[Active], top: Fixed16, bottom: Fixed16, fill_rule: FillRule, out: &mut Trapezoids) {
    match fill_rule {
        FillRule::Winding => {
            let mut winding = 0i32;
            let mut span_start: Option<&Edge> = None;
            for a in active {
                let was_zero = winding == 0;
                winding += a.edge.direction as i32;
                let is_zero = winding == 0;
                if was_zero && !is_zero {
                    span_start = Some(&a.edge);
                } else if !was_zero && is_zero {
                    if let Some(left) = span_start.take() {
                        out.push(Trapezoid { top, bottom, left: *left, right: a.edge });
                    }
                }
            }
        }
        FillRule::EvenOdd => {
            let mut inside = false;
            let mut span_start: Option<&Edge> = None;
            for a in active {
                inside = !inside;
                if inside {
                    span_start = Some(&a.edge);
                } else if let Some(left) = span_start.take() {
                    out.push(Trapezoid { top, bottom, left: *left, right: a.edge });
                }
            }
        }
    }
}

/// The box-tessellator fast path for all-vertical-edge polygons: sort the
/// distinct x columns, sweep y per pair of adjacent vertical edges without
/// any intersection handling at all.
fn tessellate_rectilinear(polygon: &Polygon) -> Trapezoids {
    let mut edges: Vec<Edge> = polygon.edges().to_vec();
    edges.sort_by(|a, b| a.p1.x.cmp(&b.p1.x).then(a.top().cmp(&b.top())));

    let mut breakpoints: Vec<Fixed16> = Vec::new();
    for e in &edges {
        breakpoints.push(e.top());
        breakpoints.push(e.bottom());
    }
    breakpoints.sort();
    breakpoints.dedup();

    let mut out = Trapezoids::new();
    for window in breakpoints.windows(2) {
        let (top, bottom) = (window[0], window[1]);
        let mut spanning: Vec<&Edge> = edges
            .iter()
            .filter(|e| e.top() <= top && e.bottom() >= bottom)
            .collect();
        spanning.sort_by(|a, b| a.p1.x.cmp(&b.p1.x));

        let mut winding = 0i32;
        let mut span_start: Option<&Edge> = None;
        for e in spanning.drain(..) {
            let was_zero = winding == 0;
            winding += e.direction as i32;
            let is_zero = winding == 0;
            if was_zero && !is_zero {
                span_start = Some(e);
            } else if !was_zero && is_zero {
                if let Some(left) = span_start.take() {
                    out.push(Trapezoid { top, bottom, left: *left, right: *e });
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use raster2d_fixed::Point;

    fn pt(x: f64, y: f64) -> Point {
        Point::from_f64(x, y)
    }

    #[test]
    fn unit_square_produces_one_trapezoid() {
        let mut poly = Polygon::new();
        poly.add_closed_polyline(&[pt(0.0, 0.0), pt(10.0, 0.0), pt(10.0, 10.0), pt(0.0, 10.0)]);
        let traps = tessellate(&poly, FillRule::Winding);
        assert_eq!(traps.as_slice().len(), 1);
        let t = traps.as_slice()[0];
        assert_eq!(t.top.to_f64(), 0.0);
        assert_eq!(t.bottom.to_f64(), 10.0);
    }

    #[test]
    fn even_odd_hole_produces_two_bands() {
        // Outer CCW square with an inner CW square forms a ring under
        // even-odd: one interior annulus band top, middle "hole" band,
        // bottom band.
        let mut poly = Polygon::new();
        poly.add_closed_polyline(&[pt(0.0, 0.0), pt(20.0, 0.0), pt(20.0, 20.0), pt(0.0, 20.0)]);
        poly.add_closed_polyline(&[pt(5.0, 5.0), pt(15.0, 5.0), pt(15.0, 15.0), pt(5.0, 15.0)]);
        let traps = tessellate(&poly, FillRule::EvenOdd);
        assert!(traps.as_slice().len() >= 3);
    }

    #[test]
    fn crossing_bowtie_has_zero_winding_in_the_middle() {
        let mut poly = Polygon::new();
        // A self-intersecting bowtie: winding cancels out around the
        // crossing point, so Winding fill rule should still produce
        // non-degenerate bands above and below it.
        poly.add_closed_polyline(&[pt(0.0, 0.0), pt(10.0, 10.0), pt(10.0, 0.0), pt(0.0, 10.0)]);
        let traps = tessellate(&poly, FillRule::Winding);
        assert!(!traps.is_empty());
    }

    #[test]
    fn rectilinear_polygon_uses_box_fast_path() {
        let mut poly = Polygon::new();
        poly.add_closed_polyline(&[pt(0.0, 0.0), pt(10.0, 0.0), pt(10.0, 10.0), pt(0.0, 10.0)]);
        assert!(poly.is_rectilinear());
        let traps = tessellate(&poly, FillRule::Winding);
        assert_eq!(traps.as_slice().len(), 1);
    }
}
