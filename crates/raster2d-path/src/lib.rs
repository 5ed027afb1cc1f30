//! Path representation/traversal and the stroking pen.

mod arc;
mod error;
mod iterator;
mod path;
mod pen;

pub use arc::{arc, arc_negative};
pub use error::NoCurrentPoint;
pub use iterator::{Iter, ReverseIter};
pub use path::{Path, Rect, Verb};
pub use pen::{pen_radius_from_fixed, Pen, PenVertex};

impl path::Path {
    pub fn iter_forward(&self) -> Iter<'_> {
        Iter::new(self)
    }

    pub fn iter_reverse(&self) -> ReverseIter {
        ReverseIter::new(self)
    }
}
