//! `RenderConfig`: the non-global equivalent of cairo's handful of
//! compile-time tunables.

use raster2d_surface::Antialias;

/// Default tolerances and fallbacks a [`crate::context::Context`] is
/// constructed with, overridable explicitly rather than through cairo's
/// global `CAIRO_GSTATE_*_DEFAULT` macros.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderConfig {
    /// Matches cairo's classic `CAIRO_GSTATE_TOLERANCE_DEFAULT`.
    pub tolerance: f64,
    pub miter_limit: f64,
    /// DPI-like sizing used only when a mask must be rasterized for an
    /// unbounded clip with no other natural resolution.
    pub fallback_resolution_x: f64,
    pub fallback_resolution_y: f64,
    pub antialias: Antialias,
    /// Capacity of the glyph LRU cache.
    pub glyph_cache_capacity: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            tolerance: 0.1,
            miter_limit: 10.0,
            fallback_resolution_x: 300.0,
            fallback_resolution_y: 300.0,
            antialias: Antialias::Gray,
            glyph_cache_capacity: 256,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_classic_cairo_values() {
        let cfg = RenderConfig::default();
        assert_eq!(cfg.tolerance, 0.1);
        assert_eq!(cfg.miter_limit, 10.0);
        assert_eq!(cfg.glyph_cache_capacity, 256);
    }
}
