//! Stroke-to-polygon conversion, the scanline trapezoid tessellator, and
//! rectilinear region algebra.

pub mod fill;
pub mod filler;
pub mod polygon;
pub mod region;
pub mod stroke;
pub mod trapezoid;

pub use fill::tessellate;
pub use filler::{glyph_outline_to_polygon, path_to_polygon};
pub use polygon::{Edge, FillRule, Polygon};
pub use region::{Region, RegionBox};
pub use stroke::{stroke_to_polygon, LineCap, LineJoin, StrokeStyle};
pub use trapezoid::{Trapezoid, Trapezoids};
