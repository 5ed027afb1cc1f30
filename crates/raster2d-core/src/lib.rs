//! The graphics state stack, sticky error status, freed-object pools,
//! glyph cache, and the [`Context`] facade that ties them together.
//!
//! Every lower layer (`raster2d-fixed`, `raster2d-geom`, `raster2d-path`,
//! `raster2d-color`, `raster2d-tessellation`, `raster2d-clip`,
//! `raster2d-surface`, `raster2d-compositor`) is geometry- or
//! pixel-shaped and knows nothing about save/restore, current state, or
//! error stickiness; this crate is where those pieces become a context
//! an application actually drives.

mod config;
mod context;
mod error;
mod font;
mod gstate;
mod pool;

pub use config::RenderConfig;
pub use context::Context;
pub use error::{Status, StickyStatus};
pub use font::{AlphaBitmap, Glyph, GlyphCache, GlyphMetrics, RenderedGlyph, ScaledFont};
pub use gstate::{GState, GStateStack};
pub use pool::Pool;
