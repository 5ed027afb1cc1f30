//! The graphics state stack.
//!
//! Grounded on cairo's `xrgstate.c` save/restore frame linked list, with
//! its manual refcounting replaced by `Rc`/`Rc::make_mut` copy-on-write:
//! `save` is a cheap `Clone` of a handful of `Rc`s, and a mutation after
//! a `save` transparently clones the pointee the first time it is
//! touched rather than corrupting the saved frame.

use raster2d_clip::Clip;
use raster2d_color::{Color, PatternState};
use raster2d_compositor::Operator;
use raster2d_geom::Matrix;
use raster2d_path::Path;
use raster2d_surface::{Antialias, FontOptions};
use raster2d_tessellation::{FillRule, LineCap, LineJoin};
use std::rc::Rc;

use crate::font::ScaledFont;

/// One frame of the graphics state stack.
#[derive(Clone)]
pub struct GState {
    pub operator: Operator,
    pub tolerance: f64,
    pub antialias: Antialias,
    pub fill_rule: FillRule,
    pub line_width: f64,
    pub line_cap: LineCap,
    pub line_join: LineJoin,
    pub miter_limit: f64,
    pub dash: Vec<f64>,
    pub dash_offset: f64,
    pub source: Rc<PatternState>,
    pub scaled_font: Option<Rc<dyn ScaledFont>>,
    pub ctm: Matrix,
    pub ctm_inverse: Matrix,
    pub font_matrix: Matrix,
    pub font_options: FontOptions,
    pub path: Rc<Path>,
    pub clip: Rc<Clip>,
}

impl GState {
    /// The state a fresh `Context` starts with: `Over`, opaque black
    /// source, identity CTM, unrestricted clip, cairo's classic
    /// defaults for everything else.
    pub fn initial(tolerance: f64, miter_limit: f64, antialias: Antialias) -> Self {
        GState {
            operator: Operator::Over,
            tolerance,
            antialias,
            fill_rule: FillRule::Winding,
            line_width: 2.0,
            line_cap: LineCap::Butt,
            line_join: LineJoin::Miter,
            miter_limit,
            dash: Vec::new(),
            dash_offset: 0.0,
            source: Rc::new(PatternState::solid(Color::BLACK)),
            scaled_font: None,
            ctm: Matrix::IDENTITY,
            ctm_inverse: Matrix::IDENTITY,
            font_matrix: Matrix::IDENTITY,
            font_options: FontOptions::default(),
            path: Rc::new(Path::new()),
            clip: Rc::new(Clip::unrestricted()),
        }
    }

    /// Mutable access to the path, cloning it first if a `save` still
    /// holds a reference to the same `Rc` (copy-on-write).
    pub fn path_mut(&mut self) -> &mut Path {
        Rc::make_mut(&mut self.path)
    }

    /// Mutable access to the clip, copy-on-write for the same reason.
    pub fn clip_mut(&mut self) -> &mut Clip {
        Rc::make_mut(&mut self.clip)
    }
}

/// The save/restore stack. `current` is always valid; `save`
/// pushes a copy onto `frames`, `restore` pops one back.
pub struct GStateStack {
    current: GState,
    frames: Vec<GState>,
}

impl GStateStack {
    pub fn new(initial: GState) -> Self {
        GStateStack { current: initial, frames: Vec::new() }
    }

    pub fn current(&self) -> &GState {
        &self.current
    }

    pub fn current_mut(&mut self) -> &mut GState {
        &mut self.current
    }

    /// Pushes a frame.
    pub fn save(&mut self) {
        self.frames.push(self.current.clone());
    }

    /// Pops the most recent frame. `Err(())` (mapped to
    /// `Status::InvalidRestore` by the caller) if the stack is already
    /// at its initial frame.
    pub fn restore(&mut self) -> Result<(), ()> {
        match self.frames.pop() {
            Some(prev) => {
                self.current = prev;
                Ok(())
            }
            None => Err(()),
        }
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh() -> GStateStack {
        GStateStack::new(GState::initial(0.1, 10.0, Antialias::Gray))
    }

    #[test]
    fn restore_on_initial_frame_fails() {
        let mut stack = fresh();
        assert_eq!(stack.restore(), Err(()));
    }

    #[test]
    fn save_restore_round_trips_scalar_state() {
        let mut stack = fresh();
        stack.save();
        stack.current_mut().line_width = 7.0;
        assert_eq!(stack.current().line_width, 7.0);
        stack.restore().unwrap();
        assert_eq!(stack.current().line_width, 2.0);
    }

    #[test]
    fn mutating_path_after_save_does_not_mutate_the_saved_frame() {
        use raster2d_fixed::Point;
        let mut stack = fresh();
        stack.save();
        stack.current_mut().path_mut().move_to(Point::from_f64(1.0, 1.0));
        assert!(!stack.current().path.is_empty());
        stack.restore().unwrap();
        assert!(stack.current().path.is_empty());
    }

    #[test]
    fn mutating_clip_after_save_does_not_mutate_the_saved_frame() {
        use raster2d_tessellation::RegionBox;
        let mut stack = fresh();
        stack.save();
        stack.current_mut().clip_mut().intersect_box(RegionBox::new(0, 0, 10, 10));
        assert!(stack.current().clip.is_region());
        stack.restore().unwrap();
        assert!(!stack.current().clip.is_all_clipped());
    }
}
