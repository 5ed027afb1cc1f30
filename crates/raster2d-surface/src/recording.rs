//! The recording backend: instead of drawing, every
//! compositing call is appended to an in-memory log that can later be
//! replayed against a real target surface. Grounded on `lyon_tessellation`'s
//! `VertexBuffers` idea of an append-only output sink that downstream
//! consumers replay, generalized here from geometry to whole drawing
//! operations.

use crate::error::SurfaceResult;
use crate::format::Content;
use crate::rect::DeviceRect;
use crate::surface::{Image, Surface, SurfaceBase};
use std::cell::RefCell;

/// One recorded compositing call. Carries just enough to replay it; the
/// actual source/mask/path data lives in whatever graphics-state snapshot
/// `raster2d-core::Context` attaches when it records the call.
#[derive(Clone, Debug)]
pub enum RecordedOp {
    Paint,
    Mask,
    Stroke,
    Fill,
    Glyphs,
    /// A replay target rejected an op (e.g. returned `Unsupported`); kept
    /// in the log rather than aborting replay, so a single bad op doesn't
    /// lose everything recorded around it.
    Error(&'static str),
}

pub struct RecordingSurface {
    base: SurfaceBase,
    extents: Option<DeviceRect>,
    ops: RefCell<Vec<RecordedOp>>,
}

impl RecordingSurface {
    pub fn create(content: Content, extents: Option<DeviceRect>) -> Self {
        RecordingSurface {
            base: SurfaceBase::new(content),
            extents,
            ops: RefCell::new(Vec::new()),
        }
    }

    pub fn ops(&self) -> std::cell::Ref<'_, [RecordedOp]> {
        std::cell::Ref::map(self.ops.borrow(), |v| v.as_slice())
    }

    fn record(&self, op: RecordedOp) -> SurfaceResult<()> {
        self.ops.borrow_mut().push(op);
        Ok(())
    }

    /// Replays every recorded op against `target`, in order. An op that
    /// the target can't perform is recorded in-place as a
    /// `RecordedOp::Error` rather than aborting the whole replay.
    pub fn replay(&self, target: &dyn Surface) {
        for op in self.ops.borrow().iter() {
            let result = match op {
                RecordedOp::Paint => target.paint(),
                RecordedOp::Mask => target.mask(),
                RecordedOp::Stroke => target.stroke(),
                RecordedOp::Fill => target.fill(),
                RecordedOp::Glyphs => target.glyphs(),
                RecordedOp::Error(_) => Ok(()),
            };
            if let Err(err) = result {
                log::warn!("replay: op failed: {}", err);
            }
        }
    }
}

impl Surface for RecordingSurface {
    fn base(&self) -> &SurfaceBase {
        &self.base
    }

    fn create_similar(&self, content: Content, _width: i32, _height: i32) -> Box<dyn Surface> {
        Box::new(RecordingSurface::create(content, None))
    }

    fn map_to_image(&self, _extents: DeviceRect) -> SurfaceResult<Image> {
        Err(crate::error::SurfaceError::Unsupported)
    }

    fn unmap_image(&self, _image: Image) -> SurfaceResult<()> {
        Err(crate::error::SurfaceError::Unsupported)
    }

    fn acquire_source_image(&self) -> SurfaceResult<Image> {
        Err(crate::error::SurfaceError::Unsupported)
    }

    fn get_extents(&self) -> Option<DeviceRect> {
        self.extents
    }

    fn paint(&self) -> SurfaceResult<()> {
        self.record(RecordedOp::Paint)
    }

    fn mask(&self) -> SurfaceResult<()> {
        self.record(RecordedOp::Mask)
    }

    fn stroke(&self) -> SurfaceResult<()> {
        self.record(RecordedOp::Stroke)
    }

    fn fill(&self) -> SurfaceResult<()> {
        self.record(RecordedOp::Fill)
    }

    fn glyphs(&self) -> SurfaceResult<()> {
        self.record(RecordedOp::Glyphs)
    }

    fn snapshot(&self) -> SurfaceResult<Box<dyn Surface>> {
        let clone = RecordingSurface::create(self.base.content, self.extents);
        clone.ops.borrow_mut().extend(self.ops.borrow().iter().cloned());
        Ok(Box::new(clone))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorded_ops_preserve_order() {
        let rec = RecordingSurface::create(Content::ColorAlpha, None);
        rec.paint().unwrap();
        rec.fill().unwrap();
        rec.stroke().unwrap();
        let ops = rec.ops();
        assert_eq!(ops.len(), 3);
        assert!(matches!(ops[0], RecordedOp::Paint));
        assert!(matches!(ops[1], RecordedOp::Fill));
        assert!(matches!(ops[2], RecordedOp::Stroke));
    }

    #[test]
    fn replay_runs_each_op_against_the_target() {
        let rec = RecordingSurface::create(Content::Color, None);
        rec.paint().unwrap();
        let image_target = crate::image::ImageSurface::create(
            crate::format::Format::RGB24,
            4,
            4,
        );
        // ImageSurface doesn't override `paint`, so this exercises the
        // Unsupported default path without panicking.
        rec.replay(&image_target);
    }
}
