//! Porter-Duff operators, blend modes, and the trapezoid-to-pixel
//! compositing pipeline. `raster2d-core` drives this crate
//! from the graphics-state layer; nothing here knows about paths,
//! gstate, or the `Context` facade.
//!
//! Open Question decision: [`pipeline::composite_trapezoids`] walks the combined
//! (bounded ∪ clip) extents once, doing the ordinary composite inside
//! the bounded region and the unbounded fix-up outside it in the same
//! pass, rather than compositing then re-walking a second mask.

mod operator;
mod pipeline;

pub use operator::{composite_pixel, Operator, Rgba};
pub use pipeline::composite_trapezoids;
