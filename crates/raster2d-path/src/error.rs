use core::fmt;

/// A relative path operation (`rel_line_to`, `rel_curve_to`, ...) was issued
/// before any `move_to` established a current point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NoCurrentPoint;

impl fmt::Display for NoCurrentPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no current point")
    }
}

impl std::error::Error for NoCurrentPoint {}
