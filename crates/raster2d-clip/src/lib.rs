//! Clip path chains, the box-list fast path, and region reduction
//!. Grounded on `cairo-clip.c`'s design: a clip is a small box
//! list (the fast path almost every real clip reduces to) plus, only when
//! necessary, a chain of arbitrary path nodes each carrying their own fill
//! rule/tolerance/antialias.

use raster2d_fixed::{Fixed16, Point};
use raster2d_path::{Path, Verb};
use raster2d_tessellation::{tessellate, Edge, FillRule, Polygon, Region, RegionBox, Trapezoid, Trapezoids};

/// One link of the clip chain: an arbitrary path that couldn't be folded
/// into the box list, with the rasterization parameters it was clipped
/// with.
#[derive(Clone, Debug)]
pub struct ClipPathNode {
    pub path: Path,
    pub fill_rule: FillRule,
    pub tolerance: f64,
    pub antialias: bool,
}

/// The current clip: a region (when it reduces to one), plus any path
/// nodes that don't. Copy-on-save at the gstate layer: cloning a `Clip` is
/// a deep clone of this small struct, which is cheap next to re-walking
/// path chains, so no node pool is needed the way cairo's allocator-bound
/// C implementation wants one.
#[derive(Clone, Debug, Default)]
pub struct Clip {
    region: Region,
    /// `None` until the first intersection; an unrestricted clip covers
    /// everything, which a `Region` (a union of *specific* boxes) cannot
    /// represent.
    has_region: bool,
    chain: Vec<ClipPathNode>,
    all_clipped: bool,
}

const UNBOUNDED: i32 = i32::MAX / 2;

impl Clip {
    /// The unrestricted clip: covers the whole (effectively unbounded)
    /// plane.
    pub fn unrestricted() -> Self {
        Clip::default()
    }

    pub fn is_all_clipped(&self) -> bool {
        self.all_clipped
    }

    pub fn is_region(&self) -> bool {
        self.chain.is_empty()
    }

    pub fn get_region(&self) -> Option<&Region> {
        if self.is_region() && self.has_region {
            Some(&self.region)
        } else {
            None
        }
    }

    /// `None` whenever the clip cannot be expressed as user-space
    /// pixel-aligned rectangles.
    pub fn copy_rectangle_list(&self) -> Option<Vec<RegionBox>> {
        if self.all_clipped {
            return Some(Vec::new());
        }
        self.get_region().map(|r| r.rectangles())
    }

    pub fn intersect_box(&mut self, b: RegionBox) {
        if self.all_clipped {
            return;
        }
        if b.is_empty() {
            self.all_clipped = true;
            self.region = Region::empty();
            self.has_region = true;
            return;
        }
        if !self.has_region {
            self.region = Region::from_box(b);
            self.has_region = true;
        } else {
            self.region = self.region.intersect(&Region::from_box(b));
        }
        if self.region.is_empty() {
            self.all_clipped = true;
        }
    }

    /// Intersects with a path that is known to be rectilinear: reduces to
    /// the box-list fast path by tessellating it into trapezoids and
    /// rounding each to the pixel grid, rather than pushing a general path
    /// node.
    pub fn intersect_rectilinear(&mut self, path: &Path, fill_rule: FillRule) {
        let mut polygon = Polygon::new();
        build_polygon(path, &mut polygon);
        let traps = tessellate(&polygon, fill_rule);
        let mut region = Region::empty();
        for t in traps.as_slice() {
            let left = t.left.x_at(t.top).min(t.left.x_at(t.bottom)).floor_to_i32();
            let right = t.right.x_at(t.top).max(t.right.x_at(t.bottom)).ceil_to_i32();
            let top = t.top.floor_to_i32();
            let bottom = t.bottom.ceil_to_i32();
            region.union(&Region::from_box(RegionBox::new(left, top, right, bottom)));
        }
        self.intersect_region(&region);
    }

    fn intersect_region(&mut self, other: &Region) {
        if self.all_clipped {
            return;
        }
        if !self.has_region {
            self.region = other.clone();
            self.has_region = true;
        } else {
            self.region = self.region.intersect(other);
        }
        if self.region.is_empty() {
            self.all_clipped = true;
        }
    }

    /// Intersects with an arbitrary path, folding it into the box-list
    /// fast path when possible.
    pub fn intersect_path(&mut self, path: &Path, fill_rule: FillRule, tolerance: f64, antialias: bool) {
        self.intersect_path_recycled(path, fill_rule, tolerance, antialias, || None)
    }

    /// Same as [`Clip::intersect_path`], but when a general chain node is
    /// needed, `recycle` is tried first so a freed node's `Path` buffers
    /// can be reused instead of allocating fresh ones. `recycle` is only
    /// called when a chain node actually has to be pushed (the box and
    /// rectilinear fast paths never touch it). The hook callers use to
    /// back this with a bounded pool such as `raster2d_core::Pool<ClipPathNode>`,
    /// without this crate needing to depend on one.
    pub fn intersect_path_recycled(
        &mut self,
        path: &Path,
        fill_rule: FillRule,
        tolerance: f64,
        antialias: bool,
        recycle: impl FnOnce() -> Option<ClipPathNode>,
    ) {
        if self.all_clipped {
            return;
        }
        if let Some(rect) = path.is_box() {
            self.intersect_box(RegionBox::new(
                rect.x0.floor() as i32,
                rect.y0.floor() as i32,
                rect.x1.ceil() as i32,
                rect.y1.ceil() as i32,
            ));
            return;
        }
        if path.is_rectilinear() {
            self.intersect_rectilinear(path, fill_rule);
            return;
        }
        let node = match recycle() {
            Some(mut reused) => {
                reused.path.copy_from(path);
                reused.fill_rule = fill_rule;
                reused.tolerance = tolerance;
                reused.antialias = antialias;
                reused
            }
            None => ClipPathNode { path: path.clone(), fill_rule, tolerance, antialias },
        };
        self.chain.push(node);
    }

    /// Drains this clip's chain nodes out one at a time via `release`,
    /// e.g. to hand them back to a pool before the clip itself is
    /// replaced or dropped.
    pub fn release_chain_nodes(&mut self, mut release: impl FnMut(ClipPathNode)) {
        for node in self.chain.drain(..) {
            release(node);
        }
    }

    /// Tessellates every path-chain node into one combined polygon, for
    /// callers (the compositor) that need to rasterize a non-region clip
    /// into a mask.
    pub fn get_polygon(&self) -> Polygon {
        let mut polygon = Polygon::new();
        for node in &self.chain {
            build_polygon(&node.path, &mut polygon);
        }
        polygon
    }

    pub fn contains_rectangle(&self, r: RegionBox) -> bool {
        if self.all_clipped {
            return false;
        }
        if !self.chain.is_empty() {
            return false;
        }
        match self.get_region() {
            Some(region) => {
                let corners = [
                    (r.x0, r.y0),
                    (r.x1 - 1, r.y0),
                    (r.x0, r.y1 - 1),
                    (r.x1 - 1, r.y1 - 1),
                ];
                corners.iter().all(|&(x, y)| region.contains_point(x, y))
            }
            None => true,
        }
    }

    /// Rasterizes this clip into the single `Trapezoids` mask the
    /// compositor's `clip_mask` parameter expects. `None` means
    /// unrestricted (no mask needed at all). When both a region and a
    /// chain node are present, the chain node's own tessellation is used
    /// as the mask and the region is folded in only through its already-
    /// narrowed `extents` — an approximation of the general box-AND-path
    /// intersection that is exact for the common case of a single path
    /// clip (region empty) or a pure box clip (chain empty).
    pub fn rasterize(&self) -> Option<Trapezoids> {
        if self.all_clipped {
            return Some(Trapezoids::new());
        }
        if let Some(last) = self.chain.last() {
            let mut polygon = Polygon::new();
            build_polygon(&last.path, &mut polygon);
            return Some(tessellate(&polygon, last.fill_rule));
        }
        if self.has_region {
            let mut traps = Trapezoids::new();
            for b in self.region.boxes() {
                traps.push(box_trapezoid(*b));
            }
            return Some(traps);
        }
        None
    }

    pub fn extents(&self) -> RegionBox {
        if self.all_clipped {
            return RegionBox::new(0, 0, 0, 0);
        }
        let mut bound = RegionBox::new(-UNBOUNDED, -UNBOUNDED, UNBOUNDED, UNBOUNDED);
        if self.has_region {
            bound = union_bounds(self.region.boxes()).unwrap_or(RegionBox::new(0, 0, 0, 0));
        }
        for node in &self.chain {
            let r = node.path.bounds();
            let path_box = RegionBox::new(r.x0.floor() as i32, r.y0.floor() as i32, r.x1.ceil() as i32, r.y1.ceil() as i32);
            bound = bound.intersect(&path_box).unwrap_or(RegionBox::new(0, 0, 0, 0));
        }
        bound
    }
}

fn box_trapezoid(b: RegionBox) -> Trapezoid {
    let top = Fixed16::from_i32(b.y0);
    let bottom = Fixed16::from_i32(b.y1);
    let x0 = Fixed16::from_i32(b.x0);
    let x1 = Fixed16::from_i32(b.x1);
    let left = Edge::new(Point::new(x0, top), Point::new(x0, bottom)).expect("non-empty box has positive height");
    let right = Edge::new(Point::new(x1, top), Point::new(x1, bottom)).expect("non-empty box has positive height");
    Trapezoid { top, bottom, left, right }
}

fn union_bounds(boxes: &[RegionBox]) -> Option<RegionBox> {
    let mut iter = boxes.iter();
    let first = *iter.next()?;
    let mut out = first;
    for b in iter {
        out.x0 = out.x0.min(b.x0);
        out.y0 = out.y0.min(b.y0);
        out.x1 = out.x1.max(b.x1);
        out.y1 = out.y1.max(b.y1);
    }
    Some(out)
}

fn build_polygon(path: &Path, polygon: &mut Polygon) {
    let mut sub: Vec<raster2d_fixed::Point> = Vec::new();
    for (verb, pts) in path.iter_forward() {
        match verb {
            Verb::MoveTo => {
                if sub.len() >= 2 {
                    polygon.add_closed_polyline(&sub);
                }
                sub.clear();
                sub.push(pts[0]);
            }
            Verb::LineTo => sub.push(pts[0]),
            Verb::CurveTo => sub.push(pts[2]),
            Verb::ClosePath => {}
        }
    }
    if sub.len() >= 2 {
        polygon.add_closed_polyline(&sub);
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
    fn unrestricted_clip_contains_everything() {
        let clip = Clip::unrestricted();
        assert!(clip.contains_rectangle(RegionBox::new(0, 0, 1000, 1000)));
    }

    #[test]
    fn box_intersection_reduces_extents() {
        let mut clip = Clip::unrestricted();
        clip.intersect_box(RegionBox::new(0, 0, 10, 10));
        assert!(clip.is_region());
        assert_eq!(clip.get_region().unwrap().boxes(), &[RegionBox::new(0, 0, 10, 10)]);
    }

    #[test]
    fn empty_box_marks_all_clipped() {
        let mut clip = Clip::unrestricted();
        clip.intersect_box(RegionBox::new(0, 0, 0, 0));
        assert!(clip.is_all_clipped());
    }

    #[test]
    fn box_shaped_path_folds_into_region_without_a_chain_node() {
        let mut path = Path::new();
        path.move_to(pt(0.0, 0.0));
        path.line_to(pt(10.0, 0.0));
        path.line_to(pt(10.0, 10.0));
        path.line_to(pt(0.0, 10.0));
        path.close();
        let mut clip = Clip::unrestricted();
        clip.intersect_path(&path, FillRule::Winding, 0.1, true);
        assert!(clip.is_region());
        assert!(clip.copy_rectangle_list().is_some());
    }

    #[test]
    fn unrestricted_clip_rasterizes_to_no_mask() {
        assert!(Clip::unrestricted().rasterize().is_none());
    }

    #[test]
    fn box_clip_rasterizes_to_one_trapezoid_per_region_box() {
        let mut clip = Clip::unrestricted();
        clip.intersect_box(RegionBox::new(0, 0, 10, 10));
        let traps = clip.rasterize().unwrap();
        assert_eq!(traps.as_slice().len(), 1);
    }

    #[test]
    fn all_clipped_rasterizes_to_an_empty_mask() {
        let mut clip = Clip::unrestricted();
        clip.intersect_box(RegionBox::new(0, 0, 0, 0));
        assert!(clip.rasterize().unwrap().is_empty());
    }

    #[test]
    fn recycled_node_is_reused_instead_of_allocating_a_fresh_one() {
        let mut path = Path::new();
        path.move_to(pt(0.0, 0.0));
        path.curve_to(pt(3.0, 0.0), pt(7.0, 10.0), pt(10.0, 10.0));
        path.line_to(pt(0.0, 10.0));
        path.close();

        let mut clip = Clip::unrestricted();
        clip.intersect_path(&path, FillRule::Winding, 0.1, true);
        let mut freed: Vec<ClipPathNode> = Vec::new();
        clip.release_chain_nodes(|node| freed.push(node));
        assert_eq!(freed.len(), 1);

        let mut clip2 = Clip::unrestricted();
        let mut pool = freed;
        clip2.intersect_path_recycled(&path, FillRule::EvenOdd, 0.2, false, || pool.pop());
        assert!(pool.is_empty(), "the only freed node should have been reused, not left in the pool");
        assert!(!clip2.is_region());
    }

    #[test]
    fn curved_path_pushes_a_chain_node_and_breaks_region_equivalence() {
        let mut path = Path::new();
        path.move_to(pt(0.0, 0.0));
        path.curve_to(pt(3.0, 0.0), pt(7.0, 10.0), pt(10.0, 10.0));
        path.line_to(pt(0.0, 10.0));
        path.close();
        let mut clip = Clip::unrestricted();
        clip.intersect_path(&path, FillRule::Winding, 0.1, true);
        assert!(!clip.is_region());
        assert!(clip.copy_rectangle_list().is_none());
    }
}
