//! `Context`: the facade tying the graphics state stack, sticky status,
//! glyph cache and a target surface into the single entry point an
//! application drives.
//!
//! Grounded on cairo's `cairo_t`: every public method here is a thin,
//! status-gated wrapper that either mutates the current [`GState`] or
//! drives the tessellation/clip/compositor crates against it. Once
//! [`Context::status`] leaves `Success` every mutator and drawing entry
//! point becomes a no-op; only `status()` itself keeps working.

use raster2d_clip::{Clip, ClipPathNode};
use raster2d_color::{Color, Extend, Filter, GradientStop, LinearGradient, Pattern, PatternState, Point2, RadialGradient};
use raster2d_compositor::{composite_trapezoids, Operator};
use raster2d_fixed::Point as FxPoint;
use raster2d_geom::Matrix;
use raster2d_path::Rect;
use raster2d_surface::{Antialias, DeviceRect, Surface};
use raster2d_tessellation::{
    glyph_outline_to_polygon, path_to_polygon, stroke_to_polygon, tessellate, FillRule, LineCap, LineJoin, Polygon,
    StrokeStyle,
};
use std::rc::Rc;

use crate::config::RenderConfig;
use crate::error::{Status, StickyStatus};
use crate::font::{AlphaBitmap, Glyph, GlyphCache, RenderedGlyph, ScaledFont};
use crate::gstate::{GState, GStateStack};
use crate::pool::Pool;

/// Bound on how many freed `ClipPathNode`s the clip-node pool keeps around
/// for reuse; mirrors cairo's small fixed-size `clip_path_pool` free list.
const CLIP_NODE_POOL_CAPACITY: usize = 8;

/// A drawing context bound to one target surface. Not `Send`/`Sync`: the
/// whole stack is built on `Rc`, matching the single-threaded-per-context
/// model cairo itself uses.
pub struct Context {
    surface: Rc<dyn Surface>,
    status: StickyStatus,
    stack: GStateStack,
    glyph_cache: GlyphCache,
    config: RenderConfig,
    clip_node_pool: Pool<ClipPathNode>,
}

impl Context {
    pub fn new(surface: Rc<dyn Surface>) -> Self {
        Self::with_config(surface, RenderConfig::default())
    }

    pub fn with_config(surface: Rc<dyn Surface>, config: RenderConfig) -> Self {
        let initial = GState::initial(config.tolerance, config.miter_limit, config.antialias);
        Context {
            surface,
            status: StickyStatus::new(),
            stack: GStateStack::new(initial),
            glyph_cache: GlyphCache::new(config.glyph_cache_capacity),
            config,
            clip_node_pool: Pool::new(CLIP_NODE_POOL_CAPACITY),
        }
    }

    pub fn config(&self) -> RenderConfig {
        self.config
    }

    /// The sticky status of this context. Once this leaves `Success` it
    /// never changes again.
    pub fn status(&self) -> Status {
        self.status.get()
    }

    fn ok(&self) -> bool {
        self.status().is_success()
    }

    // -- save/restore --------------------------------------------------

    pub fn save(&mut self) {
        if !self.ok() {
            return;
        }
        self.stack.save();
    }

    pub fn restore(&mut self) {
        if !self.ok() {
            return;
        }
        if self.stack.restore().is_err() {
            self.status.set_if_success(Status::InvalidRestore);
        }
    }

    pub fn save_depth(&self) -> usize {
        self.stack.depth()
    }

    // -- source / paint parameters --------------------------------------

    pub fn set_source(&mut self, pattern: PatternState) {
        if !self.ok() {
            return;
        }
        self.stack.current_mut().source = Rc::new(pattern);
    }

    pub fn set_source_rgb(&mut self, r: f64, g: f64, b: f64) {
        self.set_source(PatternState::solid(Color::new_rgb(r, g, b)));
    }

    pub fn set_source_rgba(&mut self, r: f64, g: f64, b: f64, a: f64) {
        self.set_source(PatternState::solid(Color::new_rgba(r, g, b, a)));
    }

    /// Sets the source to a linear gradient between `(x0, y0)` and
    /// `(x1, y1)` in user space, ramping through `stops`.
    pub fn set_source_linear_gradient(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, stops: Vec<GradientStop>) {
        let gradient = LinearGradient::new(Point2 { x: x0, y: y0 }, Point2 { x: x1, y: y1 }, stops);
        self.set_source(PatternState::linear(gradient));
    }

    /// Sets the source to a radial gradient between the circle `(x0, y0,
    /// r0)` and `(x1, y1, r1)` in user space, ramping through `stops`.
    pub fn set_source_radial_gradient(
        &mut self,
        x0: f64,
        y0: f64,
        r0: f64,
        x1: f64,
        y1: f64,
        r1: f64,
        stops: Vec<GradientStop>,
    ) {
        let gradient = RadialGradient::new(Point2 { x: x0, y: y0 }, r0, Point2 { x: x1, y: y1 }, r1, stops);
        self.set_source(PatternState::radial(gradient));
    }

    /// Overrides the current source pattern's extend mode; a no-op for a
    /// solid source, which has no domain to extend beyond.
    pub fn set_source_extend(&mut self, extend: Extend) {
        if !self.ok() {
            return;
        }
        Rc::make_mut(&mut self.stack.current_mut().source).set_extend(extend);
    }

    /// Overrides the current source pattern's resampling filter.
    pub fn set_source_filter(&mut self, filter: Filter) {
        if !self.ok() {
            return;
        }
        Rc::make_mut(&mut self.stack.current_mut().source).set_filter(filter);
    }

    pub fn set_operator(&mut self, op: Operator) {
        if !self.ok() {
            return;
        }
        self.stack.current_mut().operator = op;
    }

    pub fn set_tolerance(&mut self, tolerance: f64) {
        if !self.ok() {
            return;
        }
        self.stack.current_mut().tolerance = tolerance;
    }

    pub fn set_antialias(&mut self, antialias: Antialias) {
        if !self.ok() {
            return;
        }
        self.stack.current_mut().antialias = antialias;
    }

    pub fn set_fill_rule(&mut self, fill_rule: FillRule) {
        if !self.ok() {
            return;
        }
        self.stack.current_mut().fill_rule = fill_rule;
    }

    pub fn set_line_width(&mut self, width: f64) {
        if !self.ok() {
            return;
        }
        self.stack.current_mut().line_width = width;
    }

    pub fn set_line_cap(&mut self, cap: LineCap) {
        if !self.ok() {
            return;
        }
        self.stack.current_mut().line_cap = cap;
    }

    pub fn set_line_join(&mut self, join: LineJoin) {
        if !self.ok() {
            return;
        }
        self.stack.current_mut().line_join = join;
    }

    pub fn set_miter_limit(&mut self, limit: f64) {
        if !self.ok() {
            return;
        }
        self.stack.current_mut().miter_limit = limit;
    }

    /// Sets the dash pattern, rejecting negative/NaN entries or a
    /// non-finite offset with `InvalidDashSize`/`InvalidDashOffset`.
    pub fn set_dash(&mut self, dash: Vec<f64>, offset: f64) {
        if !self.ok() {
            return;
        }
        if dash.iter().any(|d| !d.is_finite() || *d < 0.0) {
            self.status.set_if_success(Status::InvalidDashSize);
            return;
        }
        if !offset.is_finite() {
            self.status.set_if_success(Status::InvalidDashOffset);
            return;
        }
        let g = self.stack.current_mut();
        g.dash = dash;
        g.dash_offset = offset;
    }

    pub fn get_matrix(&self) -> Matrix {
        self.stack.current().ctm
    }

    // -- CTM --------------------------------------------------------------

    fn set_ctm(&mut self, ctm: Matrix) {
        match ctm.invert() {
            Ok(inverse) => {
                let g = self.stack.current_mut();
                g.ctm = ctm;
                g.ctm_inverse = inverse;
                // Cached glyph outlines/bitmaps are scaled for the old CTM.
                self.glyph_cache.invalidate_all();
            }
            Err(_) => self.status.set_if_success(Status::InvalidMatrix),
        }
    }

    pub fn translate(&mut self, tx: f64, ty: f64) {
        if !self.ok() {
            return;
        }
        let old = self.stack.current().ctm;
        self.set_ctm(Matrix::translation(tx, ty).then(&old));
    }

    pub fn scale(&mut self, sx: f64, sy: f64) {
        if !self.ok() {
            return;
        }
        let old = self.stack.current().ctm;
        self.set_ctm(Matrix::scale(sx, sy).then(&old));
    }

    pub fn rotate(&mut self, radians: f64) {
        if !self.ok() {
            return;
        }
        let old = self.stack.current().ctm;
        self.set_ctm(Matrix::rotation(radians).then(&old));
    }

    pub fn transform(&mut self, m: &Matrix) {
        if !self.ok() {
            return;
        }
        let old = self.stack.current().ctm;
        self.set_ctm(m.then(&old));
    }

    pub fn set_matrix(&mut self, m: Matrix) {
        if !self.ok() {
            return;
        }
        self.set_ctm(m);
    }

    pub fn identity_matrix(&mut self) {
        if !self.ok() {
            return;
        }
        self.set_ctm(Matrix::IDENTITY);
    }

    // -- path construction (user-space coordinates are pushed through the
    // CTM immediately, so nothing below the gstate ever sees unprojected
    // user-space numbers) -------------------------------------------------

    fn to_device_point(&self, x: f64, y: f64) -> FxPoint {
        let (dx, dy) = self.stack.current().ctm.transform_point(x, y);
        FxPoint::from_f64(dx, dy)
    }

    pub fn move_to(&mut self, x: f64, y: f64) {
        if !self.ok() {
            return;
        }
        let p = self.to_device_point(x, y);
        self.stack.current_mut().path_mut().move_to(p);
    }

    pub fn line_to(&mut self, x: f64, y: f64) {
        if !self.ok() {
            return;
        }
        let p = self.to_device_point(x, y);
        self.stack.current_mut().path_mut().line_to(p);
    }

    pub fn curve_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x3: f64, y3: f64) {
        if !self.ok() {
            return;
        }
        let c1 = self.to_device_point(x1, y1);
        let c2 = self.to_device_point(x2, y2);
        let to = self.to_device_point(x3, y3);
        self.stack.current_mut().path_mut().curve_to(c1, c2, to);
    }

    pub fn rel_move_to(&mut self, dx: f64, dy: f64) {
        if !self.ok() {
            return;
        }
        let (ddx, ddy) = self.stack.current().ctm.transform_distance(dx, dy);
        if let Err(e) = self.stack.current_mut().path_mut().rel_move_to(ddx, ddy) {
            self.status.set_if_success(Status::from(e));
        }
    }

    pub fn rel_line_to(&mut self, dx: f64, dy: f64) {
        if !self.ok() {
            return;
        }
        let (ddx, ddy) = self.stack.current().ctm.transform_distance(dx, dy);
        if let Err(e) = self.stack.current_mut().path_mut().rel_line_to(ddx, ddy) {
            self.status.set_if_success(Status::from(e));
        }
    }

    pub fn rel_curve_to(&mut self, dx1: f64, dy1: f64, dx2: f64, dy2: f64, dx3: f64, dy3: f64) {
        if !self.ok() {
            return;
        }
        let ctm = self.stack.current().ctm;
        let (ddx1, ddy1) = ctm.transform_distance(dx1, dy1);
        let (ddx2, ddy2) = ctm.transform_distance(dx2, dy2);
        let (ddx3, ddy3) = ctm.transform_distance(dx3, dy3);
        if let Err(e) = self.stack.current_mut().path_mut().rel_curve_to(ddx1, ddy1, ddx2, ddy2, ddx3, ddy3) {
            self.status.set_if_success(Status::from(e));
        }
    }

    pub fn close_path(&mut self) {
        if !self.ok() {
            return;
        }
        self.stack.current_mut().path_mut().close();
    }

    pub fn new_path(&mut self) {
        if !self.ok() {
            return;
        }
        self.stack.current_mut().path_mut().new_path();
    }

    pub fn new_sub_path(&mut self) {
        if !self.ok() {
            return;
        }
        self.stack.current_mut().path_mut().forget_current_point();
    }

    pub fn rectangle(&mut self, x: f64, y: f64, w: f64, h: f64) {
        if !self.ok() {
            return;
        }
        self.move_to(x, y);
        self.line_to(x + w, y);
        self.line_to(x + w, y + h);
        self.line_to(x, y + h);
        self.close_path();
    }

    /// The current point, transformed back into user space. `None` if no
    /// current point is established.
    pub fn current_point(&self) -> Option<(f64, f64)> {
        let g = self.stack.current();
        g.path.current_point().map(|p| g.ctm_inverse.transform_point(p.x.to_f64(), p.y.to_f64()))
    }

    pub fn path_extents(&self) -> Rect {
        self.stack.current().path.bounds()
    }

    // -- clip ---------------------------------------------------------------

    fn clip_impl(&mut self, preserve: bool) {
        if !self.ok() {
            return;
        }
        let (path, fill_rule, tolerance, antialias) = {
            let g = self.stack.current();
            (g.path.clone(), g.fill_rule, g.tolerance, g.antialias)
        };
        let pool = self.clip_node_pool.clone();
        self.stack.current_mut().clip_mut().intersect_path_recycled(
            &path,
            fill_rule,
            tolerance,
            antialias != Antialias::None,
            || pool.acquire(),
        );
        if !preserve {
            self.stack.current_mut().path_mut().new_path();
        }
    }

    pub fn clip(&mut self) {
        self.clip_impl(false);
    }

    pub fn clip_preserve(&mut self) {
        self.clip_impl(true);
    }

    pub fn reset_clip(&mut self) {
        if !self.ok() {
            return;
        }
        let pool = self.clip_node_pool.clone();
        // Only reclaim nodes when this frame is the sole owner of the old
        // clip: if a saved frame still holds a reference via `Rc`, its
        // nodes are still live and must not be handed back to the pool.
        if let Some(old) = Rc::get_mut(&mut self.stack.current_mut().clip) {
            old.release_chain_nodes(|node| pool.release(node));
        }
        self.stack.current_mut().clip = Rc::new(Clip::unrestricted());
    }

    // -- drawing (drives the tessellator/clip/compositor) -------------------

    /// Tessellates `polygon` under `fill_rule`, intersects with the
    /// current clip's rasterized mask, and composites the current source
    /// through it onto the target surface.
    fn composite(&mut self, polygon: &Polygon, fill_rule: FillRule) {
        if !self.ok() {
            return;
        }
        let (source, clip, operator) = {
            let g = self.stack.current();
            (g.source.clone(), g.clip.clone(), g.operator)
        };
        if clip.is_all_clipped() {
            return;
        }
        let traps = tessellate(polygon, fill_rule);
        if traps.is_empty() {
            return;
        }
        let clip_mask = clip.rasterize();
        if let Err(e) = composite_trapezoids(self.surface.as_ref(), &source, clip_mask.as_ref(), &traps, operator) {
            self.status.set_if_success(Status::from(e));
        }
    }

    fn fill_impl(&mut self, preserve: bool) {
        if !self.ok() {
            return;
        }
        let (path, fill_rule, tolerance) = {
            let g = self.stack.current();
            (g.path.clone(), g.fill_rule, g.tolerance)
        };
        let polygon = path_to_polygon(&path, tolerance);
        self.composite(&polygon, fill_rule);
        if !preserve {
            self.stack.current_mut().path_mut().new_path();
        }
    }

    pub fn fill(&mut self) {
        self.fill_impl(false);
    }

    pub fn fill_preserve(&mut self) {
        self.fill_impl(true);
    }

    fn stroke_impl(&mut self, preserve: bool) {
        if !self.ok() {
            return;
        }
        let (path, style, tolerance) = {
            let g = self.stack.current();
            let style = StrokeStyle {
                half_width: g.line_width / 2.0,
                cap: g.line_cap,
                join: g.line_join,
                miter_limit: g.miter_limit,
                dash: g.dash.clone(),
                dash_offset: g.dash_offset,
            };
            (g.path.clone(), style, g.tolerance)
        };
        let polygon = stroke_to_polygon(&path, &style, tolerance);
        self.composite(&polygon, FillRule::Winding);
        if !preserve {
            self.stack.current_mut().path_mut().new_path();
        }
    }

    pub fn stroke(&mut self) {
        self.stroke_impl(false);
    }

    pub fn stroke_preserve(&mut self) {
        self.stroke_impl(true);
    }

    pub fn paint(&mut self) {
        if !self.ok() {
            return;
        }
        let extents = match self.surface.get_extents() {
            Some(e) => e,
            None => return,
        };
        let polygon = rect_polygon(extents);
        self.composite(&polygon, FillRule::Winding);
    }

    /// Paints the current source through `mask_pattern`'s alpha channel.
    /// Exact only for a solid mask pattern (the common "paint at a fixed
    /// group alpha" case); a gradient or surface mask is approximated as
    /// full coverage, logged once per call — see `DESIGN.md`.
    pub fn mask(&mut self, mask_pattern: &PatternState) {
        if !self.ok() {
            return;
        }
        let alpha = match mask_pattern.as_solid() {
            Some(c) => c.alpha(),
            None => {
                log::debug!("mask: non-solid mask patterns are approximated as fully opaque coverage");
                1.0
            }
        };
        if alpha <= 0.0 {
            return;
        }
        let extents = match self.surface.get_extents() {
            Some(e) => e,
            None => return,
        };
        let effective_source = scale_pattern_alpha(&self.stack.current().source, alpha);
        let polygon = rect_polygon(extents);
        let (clip, operator) = {
            let g = self.stack.current();
            (g.clip.clone(), g.operator)
        };
        if clip.is_all_clipped() {
            return;
        }
        let traps = tessellate(&polygon, FillRule::Winding);
        if traps.is_empty() {
            return;
        }
        let clip_mask = clip.rasterize();
        if let Err(e) = composite_trapezoids(self.surface.as_ref(), &effective_source, clip_mask.as_ref(), &traps, operator) {
            self.status.set_if_success(Status::from(e));
        }
    }

    // -- glyphs ---------------------------------------------------------------

    /// Renders `glyphs` using `font`, routing each resolved outline through
    /// `fill`'s pipeline and each resolved bitmap through `mask`'s. A glyph
    /// with neither (e.g. a space) is silently skipped.
    pub fn glyphs(&mut self, font: &Rc<dyn ScaledFont>, glyphs: &[Glyph]) {
        if !self.ok() {
            return;
        }
        self.stack.current_mut().scaled_font = Some(font.clone());
        let (ctm, tolerance) = {
            let g = self.stack.current();
            (g.ctm, g.tolerance)
        };
        for glyph in glyphs {
            let rendered = match self.glyph_cache.get_or_insert(font.as_ref(), glyph.id, 0) {
                Some(r) => r,
                None => continue,
            };
            match rendered {
                RenderedGlyph::Outline(path) => {
                    let polygon = glyph_outline_to_polygon(&path, glyph.x, glyph.y, &ctm, tolerance);
                    self.composite(&polygon, FillRule::Winding);
                }
                RenderedGlyph::Bitmap(bitmap) => {
                    self.composite_glyph_bitmap(&bitmap, glyph.x, glyph.y, &ctm);
                }
            }
        }
    }

    /// Bitmap glyphs (hinted/embedded-bitmap fonts) are routed through
    /// `mask` without tessellation, approximated here as a solid
    /// rectangular mask the size of the bitmap, since the trapezoid-based
    /// compositor has no native per-pixel alpha mask input (see
    /// `DESIGN.md`).
    fn composite_glyph_bitmap(&mut self, bitmap: &AlphaBitmap, gx: f64, gy: f64, ctm: &Matrix) {
        let (dx, dy) = ctm.transform_point(gx, gy);
        let rect = DeviceRect::new(dx.round() as i32, dy.round() as i32, bitmap.width, bitmap.height);
        log::debug!("glyphs: bitmap glyph mask approximated as a solid rectangle, ignoring per-pixel coverage");
        let polygon = rect_polygon(rect);
        self.composite(&polygon, FillRule::Winding);
    }
}

fn scale_pattern_alpha(source: &PatternState, factor: f64) -> PatternState {
    match &source.pattern {
        Pattern::Solid(c) => PatternState { pattern: Pattern::Solid(c.with_alpha(c.alpha() * factor)), matrix: source.matrix },
        _ => {
            log::debug!("mask: alpha modulation of a non-solid source pattern is not implemented, masking at full source alpha");
            source.clone()
        }
    }
}

fn rect_polygon(r: DeviceRect) -> Polygon {
    let mut polygon = Polygon::new();
    polygon.add_closed_polyline(&[
        FxPoint::from_f64(r.x as f64, r.y as f64),
        FxPoint::from_f64((r.x + r.width) as f64, r.y as f64),
        FxPoint::from_f64((r.x + r.width) as f64, (r.y + r.height) as f64),
        FxPoint::from_f64(r.x as f64, (r.y + r.height) as f64),
    ]);
    polygon
}

#[cfg(test)]
mod tests {
    use super::*;
    use raster2d_surface::{Format, ImageSurface};

    fn red_on(size: i32) -> (Rc<ImageSurface>, Context) {
        let surface = Rc::new(ImageSurface::create(Format::ARGB32, size, size));
        let ctx = Context::new(surface.clone());
        (surface, ctx)
    }

    #[test]
    fn fresh_context_starts_successful() {
        let (_surface, ctx) = red_on(4);
        assert_eq!(ctx.status(), Status::Success);
    }

    #[test]
    fn restore_without_save_sets_invalid_restore() {
        let (_surface, mut ctx) = red_on(4);
        ctx.restore();
        assert_eq!(ctx.status(), Status::InvalidRestore);
    }

    #[test]
    fn sticky_status_blocks_further_mutation() {
        let (_surface, mut ctx) = red_on(4);
        ctx.restore();
        ctx.set_line_width(99.0);
        ctx.restore();
        assert_eq!(ctx.status(), Status::InvalidRestore);
    }

    #[test]
    fn filling_a_rectangle_paints_red_pixels() {
        let (surface, mut ctx) = red_on(4);
        ctx.set_source_rgb(1.0, 0.0, 0.0);
        ctx.rectangle(0.0, 0.0, 4.0, 4.0);
        ctx.fill();
        assert_eq!(ctx.status(), Status::Success);
        let image = surface.acquire_source_image().unwrap();
        assert!(image.data.iter().any(|&b| b != 0));
    }

    #[test]
    fn save_restore_round_trips_line_width() {
        let (_surface, mut ctx) = red_on(4);
        ctx.set_line_width(5.0);
        ctx.save();
        ctx.set_line_width(9.0);
        ctx.restore();
        assert_eq!(ctx.stack.current().line_width, 5.0);
    }

    #[test]
    fn negative_dash_entry_is_rejected() {
        let (_surface, mut ctx) = red_on(4);
        ctx.set_dash(vec![1.0, -1.0], 0.0);
        assert_eq!(ctx.status(), Status::InvalidDashSize);
    }

    #[test]
    fn clip_outside_fill_path_paints_nothing() {
        let (surface, mut ctx) = red_on(4);
        ctx.rectangle(0.0, 0.0, 1.0, 1.0);
        ctx.clip();
        ctx.set_source_rgb(1.0, 1.0, 1.0);
        ctx.rectangle(2.0, 2.0, 2.0, 2.0);
        ctx.fill();
        let image = surface.acquire_source_image().unwrap();
        // Pixel (3,3) is the fill rectangle's center but outside the clip.
        let offset = 3 * image.stride as usize + 3 * 4;
        assert_eq!(image.data[offset + 3], 0);
    }

    #[test]
    fn reset_clip_recycles_chain_nodes_into_the_pool() {
        let (_surface, mut ctx) = red_on(4);
        // A curved path can't fold into the box-list fast path, so it
        // pushes a real chain node.
        ctx.move_to(0.0, 0.0);
        ctx.curve_to(1.0, 0.0, 3.0, 4.0, 4.0, 4.0);
        ctx.line_to(0.0, 4.0);
        ctx.close_path();
        ctx.clip();
        assert_eq!(ctx.clip_node_pool.len(), 0);
        ctx.reset_clip();
        assert_eq!(ctx.clip_node_pool.len(), 1);

        // Clipping again reuses the pooled node rather than growing the
        // pool further.
        ctx.move_to(0.0, 0.0);
        ctx.curve_to(1.0, 0.0, 3.0, 4.0, 4.0, 4.0);
        ctx.line_to(0.0, 4.0);
        ctx.close_path();
        ctx.clip();
        assert_eq!(ctx.clip_node_pool.len(), 0);
    }

    #[test]
    fn linear_gradient_source_fills_without_error() {
        let (surface, mut ctx) = red_on(4);
        ctx.set_source_linear_gradient(
            0.0,
            0.0,
            4.0,
            0.0,
            vec![
                GradientStop { offset: 0.0, color: Color::new_rgb(1.0, 0.0, 0.0) },
                GradientStop { offset: 1.0, color: Color::new_rgb(0.0, 0.0, 1.0) },
            ],
        );
        ctx.set_source_extend(Extend::Repeat);
        ctx.rectangle(0.0, 0.0, 4.0, 4.0);
        ctx.fill();
        assert_eq!(ctx.status(), Status::Success);
        let image = surface.acquire_source_image().unwrap();
        assert!(image.data.iter().any(|&b| b != 0));
    }
}
