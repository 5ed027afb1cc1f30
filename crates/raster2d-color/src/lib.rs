//! Premultiplied colors and the pattern tagged union.

mod color;
mod pattern;

pub use color::{Color, PremultipliedShorts};
pub use pattern::{
    sample_stops, Extend, Filter, GradientStop, LinearGradient, Pattern, PatternState, Point2,
    RadialGradient, SurfacePattern,
};
