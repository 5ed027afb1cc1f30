//! Affine matrices and cubic Bezier flattening.
//!
//! This crate plays the role `lyon_geom` plays in a lyon-style tessellation
//! pipeline, scoped down to exactly the affine matrix and spline flattener
//! pieces the rest of this workspace needs.

mod flatten;
mod matrix;

pub use flatten::{flatten_cubic, CubicSegment, Degenerate};
pub use matrix::{InvalidMatrix, Matrix};
