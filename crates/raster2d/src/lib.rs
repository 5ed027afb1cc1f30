//! 2D vector graphics rendering: cairo-like path representation,
//! stroke-to-polygon conversion, polygon-to-trapezoid tessellation,
//! Porter-Duff/blend-mode compositing, and the graphics-state `Context`
//! that drives them against a pluggable [`Surface`].
//!
//! # Crates
//!
//! This meta-crate (`raster2d`) reexports the following sub-crates for
//! convenience:
//!
//! * **raster2d_fixed** - 16.16/32.32 fixed-point numerics.
//! * **raster2d_geom** - affine matrices and spline flattening.
//! * **raster2d_path** - the path verb/point buffer, iterators, pen.
//! * **raster2d_color** - premultiplied color and the pattern union.
//! * **raster2d_tessellation** - stroking, the trapezoid tessellator, regions.
//! * **raster2d_clip** - clip path chains and the box-list fast path.
//! * **raster2d_surface** - the `Surface` contract and the image/recording backends.
//! * **raster2d_compositor** - Porter-Duff operators, blend modes, the traps pipeline.
//! * **raster2d_core** - the graphics state stack, error taxonomy, and `Context`.
//!
//! Each `raster2d_<name>` crate is reexported as a `<name>` module here,
//! and `Context` is reexported directly at the crate root since it is the
//! one entry point almost every caller needs.
//!
//! ```no_run
//! use raster2d::{Context, surface::{Format, ImageSurface}};
//! use std::rc::Rc;
//!
//! let surface = Rc::new(ImageSurface::create(Format::ARGB32, 256, 256));
//! let mut cx = Context::new(surface);
//! cx.set_source_rgb(1.0, 0.0, 0.0);
//! cx.rectangle(10.0, 10.0, 100.0, 100.0);
//! cx.fill();
//! ```

pub use raster2d_clip as clip;
pub use raster2d_color as color;
pub use raster2d_compositor as compositor;
pub use raster2d_core as core;
pub use raster2d_fixed as fixed;
pub use raster2d_geom as geom;
pub use raster2d_path as path;
pub use raster2d_surface as surface;
pub use raster2d_tessellation as tessellation;

pub use crate::core::Context;
