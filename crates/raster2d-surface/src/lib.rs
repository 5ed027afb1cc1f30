//! The surface layer: pixel formats, the [`Surface`] trait contract, the
//! in-memory [`ImageSurface`] backend, and the [`RecordingSurface`] replay
//! log.

mod error;
mod format;
mod image;
mod recording;
mod rect;
mod surface;

pub use error::{SurfaceError, SurfaceResult};
pub use format::{Content, Format};
pub use image::ImageSurface;
pub use recording::{RecordedOp, RecordingSurface};
pub use rect::DeviceRect;
pub use surface::{Antialias, FontOptions, Image, Surface, SurfaceBase};
