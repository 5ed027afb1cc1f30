//! The Filler: turns a device-space [`Path`] into a fill-ready [`Polygon`],
//! flattening curves through the tolerance-bounded splitter and implicitly
//! closing every subpath (fill semantics treat an open subpath as closed).

use raster2d_fixed::Point;
use raster2d_geom::{flatten_cubic, CubicSegment, Matrix};
use raster2d_path::{Path, Verb};

use crate::polygon::Polygon;

/// Builds a fill-ready polygon directly from a device-space path.
pub fn path_to_polygon(path: &Path, tolerance: f64) -> Polygon {
    walk(path, tolerance, |p| p)
}

/// Positions a glyph outline (in font space, relative to its own origin)
/// at `(gx, gy)` in user space and projects it through the CTM, flattening
/// curves in device space.
pub fn glyph_outline_to_polygon(path: &Path, gx: f64, gy: f64, ctm: &Matrix, tolerance: f64) -> Polygon {
    walk(path, tolerance, |p| {
        let (dx, dy) = ctm.transform_point(p.x.to_f64() + gx, p.y.to_f64() + gy);
        Point::from_f64(dx, dy)
    })
}

/// Shared walk over a path's verbs, flattening curves and closing every
/// subpath that collects at least two points. `project` maps a raw
/// path-space point into whatever space the caller's polygon should live
/// in (the identity for a plain device-space fill, CTM-projected font
/// coordinates for a glyph outline).
fn walk(path: &Path, tolerance: f64, project: impl Fn(Point) -> Point) -> Polygon {
    let mut polygon = Polygon::new();
    let mut current: Vec<Point> = Vec::new();
    let mut last = Point::from_f64(0.0, 0.0);
    for (verb, pts) in path.iter_forward() {
        match verb {
            Verb::MoveTo => {
                if current.len() >= 2 {
                    polygon.add_closed_polyline(&current);
                }
                current.clear();
                current.push(project(pts[0]));
                last = pts[0];
            }
            Verb::LineTo => {
                current.push(project(pts[0]));
                last = pts[0];
            }
            Verb::CurveTo => {
                let curve = CubicSegment {
                    from: project(last),
                    ctrl1: project(pts[0]),
                    ctrl2: project(pts[1]),
                    to: project(pts[2]),
                };
                let _ = flatten_cubic(&curve, tolerance, |p| current.push(p));
                last = pts[2];
            }
            Verb::ClosePath => {}
        }
    }
    if current.len() >= 2 {
        polygon.add_closed_polyline(&current);
    }
    polygon
}

#[cfg(test)]
mod tests {
    use super::*;
    use raster2d_path::Path as DevicePath;

    #[test]
    fn triangle_path_becomes_a_single_closed_polyline() {
        let mut path = DevicePath::new();
        path.move_to(Point::from_f64(0.0, 0.0));
        path.line_to(Point::from_f64(4.0, 0.0));
        path.line_to(Point::from_f64(0.0, 4.0));
        path.close();
        let polygon = path_to_polygon(&path, 0.1);
        assert!(!polygon.edges().is_empty());
    }

    #[test]
    fn open_subpath_with_one_point_contributes_no_edges() {
        let mut path = DevicePath::new();
        path.move_to(Point::from_f64(0.0, 0.0));
        let polygon = path_to_polygon(&path, 0.1);
        assert!(polygon.edges().is_empty());
    }
}
