//! The pattern tagged union.

use crate::color::Color;
use raster2d_geom::Matrix;
use raster2d_surface::Surface;
use std::rc::Rc;

/// Behavior of a pattern outside its natural domain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Extend {
    #[default]
    None,
    Repeat,
    Reflect,
    Pad,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Filter {
    Nearest,
    Bilinear,
    #[default]
    Good,
    Best,
}

/// A color stop along a gradient ramp, offsets in `[0.0, 1.0]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientStop {
    pub offset: f64,
    pub color: Color,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

#[derive(Clone, Debug)]
pub struct LinearGradient {
    pub p0: Point2,
    pub p1: Point2,
    pub stops: Vec<GradientStop>,
    pub extend: Extend,
    pub filter: Filter,
}

impl LinearGradient {
    pub fn new(p0: Point2, p1: Point2, stops: Vec<GradientStop>) -> Self {
        LinearGradient { p0, p1, stops, extend: Extend::Pad, filter: Filter::Good }
    }
}

#[derive(Clone, Debug)]
pub struct RadialGradient {
    pub c0: Point2,
    pub r0: f64,
    pub c1: Point2,
    pub r1: f64,
    pub stops: Vec<GradientStop>,
    pub extend: Extend,
    pub filter: Filter,
}

impl RadialGradient {
    pub fn new(c0: Point2, r0: f64, c1: Point2, r1: f64, stops: Vec<GradientStop>) -> Self {
        RadialGradient { c0, r0, c1, r1, stops, extend: Extend::Pad, filter: Filter::Good }
    }
}

/// A pattern backed by another surface's pixels, used directly with its
/// own matrix and extend mode rather than resampled into a gradient ramp
///.
#[derive(Clone)]
pub struct SurfacePattern {
    pub surface: Rc<dyn Surface>,
    pub extend: Extend,
    pub filter: Filter,
}

/// A source of color: solid, gradient, or another surface. Carries a
/// matrix mapping destination coordinates to pattern coordinates.
#[derive(Clone)]
pub enum Pattern {
    Solid(Color),
    Linear(LinearGradient),
    Radial(RadialGradient),
    Surface(SurfacePattern),
}

/// The matrix/extend/filter envelope shared by every non-solid variant;
/// solids don't need one since a constant color is the same in every
/// coordinate space.
#[derive(Clone)]
pub struct PatternState {
    pub pattern: Pattern,
    pub matrix: Matrix,
}

impl PatternState {
    pub fn solid(color: Color) -> Self {
        PatternState { pattern: Pattern::Solid(color), matrix: Matrix::IDENTITY }
    }

    pub fn linear(gradient: LinearGradient) -> Self {
        PatternState { pattern: Pattern::Linear(gradient), matrix: Matrix::IDENTITY }
    }

    pub fn radial(gradient: RadialGradient) -> Self {
        PatternState { pattern: Pattern::Radial(gradient), matrix: Matrix::IDENTITY }
    }

    pub fn extend(&self) -> Extend {
        match &self.pattern {
            Pattern::Solid(_) => Extend::None,
            Pattern::Linear(lg) => lg.extend,
            Pattern::Radial(rg) => rg.extend,
            Pattern::Surface(sp) => sp.extend,
        }
    }

    pub fn filter(&self) -> Filter {
        match &self.pattern {
            Pattern::Solid(_) => Filter::Good,
            Pattern::Linear(lg) => lg.filter,
            Pattern::Radial(rg) => rg.filter,
            Pattern::Surface(sp) => sp.filter,
        }
    }

    /// Overrides the extend mode of a gradient or surface pattern; a no-op
    /// for solids, which have no domain to extend beyond.
    pub fn set_extend(&mut self, extend: Extend) {
        match &mut self.pattern {
            Pattern::Solid(_) => {}
            Pattern::Linear(lg) => lg.extend = extend,
            Pattern::Radial(rg) => rg.extend = extend,
            Pattern::Surface(sp) => sp.extend = extend,
        }
    }

    /// Overrides the resampling filter of a gradient or surface pattern; a
    /// no-op for solids.
    pub fn set_filter(&mut self, filter: Filter) {
        match &mut self.pattern {
            Pattern::Solid(_) => {}
            Pattern::Linear(lg) => lg.filter = filter,
            Pattern::Radial(rg) => rg.filter = filter,
            Pattern::Surface(sp) => sp.filter = filter,
        }
    }

    /// A solid color equivalent to this pattern at the natural gradient
    /// domain endpoint, used for the "solids become 1x1 repeated" fast
    /// path in source resolution. Returns `None` for gradients
    /// and surface patterns, which have no single representative color.
    pub fn as_solid(&self) -> Option<Color> {
        match &self.pattern {
            Pattern::Solid(c) => Some(*c),
            _ => None,
        }
    }
}

/// Evaluates a gradient ramp at parameter `t`, clamping/wrapping `t`
/// according to `extend` before sampling stops. Stops are assumed sorted
/// by `offset`; callers that build gradients out of order must sort first.
pub fn sample_stops(stops: &[GradientStop], t: f64, extend: Extend) -> Color {
    if stops.is_empty() {
        return Color::TRANSPARENT;
    }
    let t = match extend {
        Extend::None => t,
        Extend::Pad => t.clamp(0.0, 1.0),
        Extend::Repeat => t - t.floor(),
        Extend::Reflect => {
            let period = t.rem_euclid(2.0);
            if period > 1.0 { 2.0 - period } else { period }
        }
    };
    if t <= stops[0].offset {
        return stops[0].color;
    }
    if t >= stops[stops.len() - 1].offset {
        return stops[stops.len() - 1].color;
    }
    for pair in stops.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        if t >= a.offset && t <= b.offset {
            let span = b.offset - a.offset;
            let frac = if span > 0.0 { (t - a.offset) / span } else { 0.0 };
            return Color::new_rgba(
                a.color.red() + (b.color.red() - a.color.red()) * frac,
                a.color.green() + (b.color.green() - a.color.green()) * frac,
                a.color.blue() + (b.color.blue() - a.color.blue()) * frac,
                a.color.alpha() + (b.color.alpha() - a.color.alpha()) * frac,
            );
        }
    }
    stops[stops.len() - 1].color
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stops() -> Vec<GradientStop> {
        vec![
            GradientStop { offset: 0.0, color: Color::new_rgb(0.0, 0.0, 0.0) },
            GradientStop { offset: 1.0, color: Color::new_rgb(1.0, 1.0, 1.0) },
        ]
    }

    #[test]
    fn midpoint_interpolates_linearly() {
        let c = sample_stops(&stops(), 0.5, Extend::Pad);
        assert!((c.red() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn pad_clamps_out_of_range_offsets() {
        let c = sample_stops(&stops(), 2.0, Extend::Pad);
        assert_eq!(c.red(), 1.0);
        let c = sample_stops(&stops(), -1.0, Extend::Pad);
        assert_eq!(c.red(), 0.0);
    }

    #[test]
    fn repeat_wraps_into_range() {
        let c = sample_stops(&stops(), 1.5, Extend::Repeat);
        assert!((c.red() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn solid_pattern_reports_its_own_color() {
        let p = PatternState::solid(Color::new_rgb(1.0, 0.0, 0.0));
        assert_eq!(p.as_solid().unwrap().red(), 1.0);
        assert_eq!(p.extend(), Extend::None);
    }

    #[test]
    fn linear_gradient_extend_and_filter_are_settable() {
        let lg = LinearGradient::new(Point2 { x: 0.0, y: 0.0 }, Point2 { x: 1.0, y: 0.0 }, stops());
        let mut p = PatternState { pattern: Pattern::Linear(lg), matrix: Matrix::IDENTITY };
        assert_eq!(p.extend(), Extend::Pad);
        assert_eq!(p.filter(), Filter::Good);
        p.set_extend(Extend::Repeat);
        p.set_filter(Filter::Nearest);
        assert_eq!(p.extend(), Extend::Repeat);
        assert_eq!(p.filter(), Filter::Nearest);
    }

    #[test]
    fn radial_gradient_defaults_match_surface_pattern_style() {
        let rg = RadialGradient::new(Point2 { x: 0.0, y: 0.0 }, 0.0, Point2 { x: 0.0, y: 0.0 }, 1.0, stops());
        let p = PatternState { pattern: Pattern::Radial(rg), matrix: Matrix::IDENTITY };
        assert_eq!(p.extend(), Extend::Pad);
        assert_eq!(p.filter(), Filter::Good);
    }
}
