//! The Surface contract and the shared bookkeeping (refcount via
//! `Rc`, content type, device transform, fallback resolution, finished flag,
//! user-data) every backend carries.
//!
//! Grounded on `lyon_path::traits`'s default-method idiom (blanket default
//! implementations so consumers only override what they need), generalized
//! here into a vtable-style trait where every
//! drawing entry point defaults to `Err(SurfaceError::Unsupported)`:
//! backends opt in only to what they accelerate, everything else is
//! expected to fall back to the traps compositor (wired up in
//! `raster2d-compositor`, not here).

use crate::error::{SurfaceError, SurfaceResult};
use crate::format::{Content, Format};
use crate::rect::DeviceRect;
use raster2d_geom::Matrix;
use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

/// Backend-preferred font rendering defaults (hinting/antialiasing); kept
/// intentionally minimal since font shaping itself is out of scope here.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct FontOptions {
    pub antialias: Antialias,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Antialias {
    None,
    #[default]
    Gray,
    Subpixel,
}

/// A mapped, directly addressable view of a surface's pixels. Always backed by an
/// [`crate::image::ImageSurface`]; other backends materialize one on
/// demand.
pub struct Image {
    pub format: Format,
    pub width: i32,
    pub height: i32,
    pub stride: i32,
    pub data: Vec<u8>,
}

/// Fields every backend shares.
/// Embedded by value in each concrete backend (not via inheritance, per
/// Rust idiom) and exposed through the [`SurfaceBase`] accessor methods of
/// the [`Surface`] trait.
pub struct SurfaceBase {
    pub content: Content,
    pub device_transform: RefCell<Matrix>,
    pub fallback_resolution: (f64, f64),
    pub finished: Cell<bool>,
    user_data: RefCell<HashMap<&'static str, Box<dyn Any>>>,
}

impl SurfaceBase {
    pub fn new(content: Content) -> Self {
        SurfaceBase {
            content,
            device_transform: RefCell::new(Matrix::IDENTITY),
            fallback_resolution: (300.0, 300.0),
            finished: Cell::new(false),
            user_data: RefCell::new(HashMap::new()),
        }
    }

    pub fn set_user_data(&self, key: &'static str, value: Box<dyn Any>) {
        self.user_data.borrow_mut().insert(key, value);
    }

    pub fn user_data_is_set(&self, key: &'static str) -> bool {
        self.user_data.borrow().contains_key(key)
    }

    fn check_finished(&self) -> SurfaceResult<()> {
        if self.finished.get() {
            Err(SurfaceError::SurfaceFinished)
        } else {
            Ok(())
        }
    }
}

/// The operation set every backend implements.
///
/// Every drawing entry point (`paint`, `mask`, `stroke`, `fill`, `glyphs`)
/// defaults to `Unsupported`; a backend overrides only the ones it
/// accelerates natively. `raster2d-compositor` is the canonical consumer
/// that calls these and, on `Unsupported`, performs the operation itself
/// via the trapezoid pipeline against whatever `map_to_image` hands back.
pub trait Surface {
    fn base(&self) -> &SurfaceBase;

    fn create_similar(&self, content: Content, width: i32, height: i32) -> Box<dyn Surface>;

    fn create_similar_image(&self, format: Format, width: i32, height: i32) -> Image {
        let stride = format.stride_for_width(width.max(0) as usize) as i32;
        Image {
            format,
            width,
            height,
            stride,
            data: vec![0u8; (stride.max(0) as usize) * (height.max(0) as usize)],
        }
    }

    /// Returns a mapped, writable view of `extents`. Must be paired with
    /// [`Surface::unmap_image`].
    fn map_to_image(&self, extents: DeviceRect) -> SurfaceResult<Image>;

    /// Commits `image`'s contents (assumed to have been produced by
    /// [`Surface::map_to_image`] on `self`) back to the surface.
    fn unmap_image(&self, image: Image) -> SurfaceResult<()>;

    /// A cheap read-only view suitable for use as a compositing source.
    fn acquire_source_image(&self) -> SurfaceResult<Image>;

    /// Releases a view obtained from [`Surface::acquire_source_image`]. The
    /// default is a no-op; backends that need to unlock something override
    /// it.
    fn release_source_image(&self, _image: Image) {}

    fn flush(&self) -> SurfaceResult<()> {
        self.base().check_finished()
    }

    fn mark_dirty(&self, _rect: DeviceRect) -> SurfaceResult<()> {
        self.base().check_finished()
    }

    fn get_extents(&self) -> Option<DeviceRect>;

    fn get_font_options(&self) -> FontOptions {
        FontOptions::default()
    }

    fn paint(&self) -> SurfaceResult<()> {
        Err(SurfaceError::Unsupported)
    }

    fn mask(&self) -> SurfaceResult<()> {
        Err(SurfaceError::Unsupported)
    }

    fn stroke(&self) -> SurfaceResult<()> {
        Err(SurfaceError::Unsupported)
    }

    fn fill(&self) -> SurfaceResult<()> {
        Err(SurfaceError::Unsupported)
    }

    fn glyphs(&self) -> SurfaceResult<()> {
        Err(SurfaceError::Unsupported)
    }

    fn copy_page(&self) {}

    fn show_page(&self) {}

    /// A copy-on-write immutable view of the current contents.
    fn snapshot(&self) -> SurfaceResult<Box<dyn Surface>>;

    fn content(&self) -> Content {
        self.base().content
    }

    fn finish(&self) {
        self.base().finished.set(true);
    }

    fn is_finished(&self) -> bool {
        self.base().finished.get()
    }
}
