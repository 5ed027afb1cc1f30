//! The in-memory [`ImageSurface`] backend: the reference implementation
//! every other backend falls back to via the traps compositor.

use crate::error::{SurfaceError, SurfaceResult};
use crate::format::{Content, Format};
use crate::rect::DeviceRect;
use crate::surface::{Image, Surface, SurfaceBase};
use log::trace;
use std::cell::RefCell;

/// A surface backed by a flat, owned pixel buffer.
///
/// `map_to_image`/`acquire_source_image` hand back a [`Image`] that
/// borrows nothing: the caller gets an owned copy and must round-trip it
/// through `unmap_image` to commit writes. This mirrors `lyon_tessellation`'s
/// `VertexBuffers` pattern of owned, detachable storage rather than
/// lifetime-tied views, and keeps the trait object-safe.
pub struct ImageSurface {
    base: SurfaceBase,
    format: Format,
    width: i32,
    height: i32,
    stride: i32,
    data: RefCell<Vec<u8>>,
}

impl ImageSurface {
    pub fn create(format: Format, width: i32, height: i32) -> Self {
        let stride = format.stride_for_width(width.max(0) as usize) as i32;
        let len = (stride.max(0) as usize) * (height.max(0) as usize);
        trace!(
            "ImageSurface::create format={:?} {}x{} stride={}",
            format, width, height, stride
        );
        ImageSurface {
            base: SurfaceBase::new(Self::content_for(format)),
            format,
            width,
            height,
            stride,
            data: RefCell::new(vec![0u8; len]),
        }
    }

    /// Wraps caller-owned pixel data in place, matching the original's
    /// `create_for_data` entry point.
    pub fn create_for_data(data: Vec<u8>, format: Format, width: i32, height: i32, stride: i32) -> Self {
        ImageSurface {
            base: SurfaceBase::new(Self::content_for(format)),
            format,
            width,
            height,
            stride,
            data: RefCell::new(data),
        }
    }

    fn content_for(format: Format) -> Content {
        match format {
            Format::ARGB32 => Content::ColorAlpha,
            Format::RGB24 => Content::Color,
            Format::A8 | Format::A1 => Content::Alpha,
        }
    }

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn stride(&self) -> i32 {
        self.stride
    }

    /// Borrows the raw buffer directly, for callers (tests, the compositor
    /// fast paths) that don't want the map/unmap round trip.
    pub fn with_data<R>(&self, f: impl FnOnce(&[u8]) -> R) -> R {
        f(&self.data.borrow())
    }

    pub fn with_data_mut<R>(&self, f: impl FnOnce(&mut [u8]) -> R) -> R {
        f(&mut self.data.borrow_mut())
    }

    fn full_extents(&self) -> DeviceRect {
        DeviceRect::new(0, 0, self.width, self.height)
    }
}

impl Surface for ImageSurface {
    fn base(&self) -> &SurfaceBase {
        &self.base
    }

    fn create_similar(&self, content: Content, width: i32, height: i32) -> Box<dyn Surface> {
        Box::new(ImageSurface::create(content.default_format(), width, height))
    }

    fn map_to_image(&self, extents: DeviceRect) -> SurfaceResult<Image> {
        if self.base.finished.get() {
            return Err(SurfaceError::SurfaceFinished);
        }
        let clipped = extents.intersect(&self.full_extents());
        if clipped.is_empty() && !extents.is_empty() {
            return Err(SurfaceError::InvalidPathData);
        }
        let bpp = self.format.bits_per_pixel();
        let row_bytes = (clipped.width as usize * bpp + 7) / 8;
        let mut out = vec![0u8; row_bytes * clipped.height.max(0) as usize];
        let src = self.data.borrow();
        for row in 0..clipped.height {
            let src_row = clipped.y + row;
            let src_start = src_row as usize * self.stride as usize
                + (clipped.x as usize * bpp) / 8;
            let dst_start = row as usize * row_bytes;
            out[dst_start..dst_start + row_bytes]
                .copy_from_slice(&src[src_start..src_start + row_bytes]);
        }
        Ok(Image {
            format: self.format,
            width: clipped.width,
            height: clipped.height,
            stride: row_bytes as i32,
            data: out,
        })
    }

    fn unmap_image(&self, image: Image) -> SurfaceResult<()> {
        if self.base.finished.get() {
            return Err(SurfaceError::SurfaceFinished);
        }
        // Only a whole-surface map round-trips cleanly without the caller
        // telling us where it came from; the compositor always maps the
        // full extents it touched, so this is sufficient for the
        // trapezoid-fallback path.
        if image.width != self.width || image.height != self.height || image.format != self.format {
            return Err(SurfaceError::InvalidPathData);
        }
        *self.data.borrow_mut() = image.data;
        Ok(())
    }

    fn acquire_source_image(&self) -> SurfaceResult<Image> {
        self.map_to_image(self.full_extents())
    }

    fn get_extents(&self) -> Option<DeviceRect> {
        Some(self.full_extents())
    }

    fn snapshot(&self) -> SurfaceResult<Box<dyn Surface>> {
        let mut clone = ImageSurface::create(self.format, self.width, self.height);
        *clone.data.get_mut() = self.data.borrow().clone();
        Ok(Box::new(clone))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_zeroes_the_buffer() {
        let surf = ImageSurface::create(Format::ARGB32, 4, 4);
        surf.with_data(|d| assert!(d.iter().all(|&b| b == 0)));
    }

    #[test]
    fn map_unmap_round_trips_writes() {
        let surf = ImageSurface::create(Format::A8, 8, 8);
        let mut image = surf.acquire_source_image().unwrap();
        for b in image.data.iter_mut() {
            *b = 0xAB;
        }
        surf.unmap_image(image).unwrap();
        surf.with_data(|d| assert!(d.iter().all(|&b| b == 0xAB)));
    }

    #[test]
    fn finished_surface_rejects_mapping() {
        let surf = ImageSurface::create(Format::A8, 2, 2);
        surf.finish();
        match surf.map_to_image(DeviceRect::new(0, 0, 1, 1)) {
            Err(SurfaceError::SurfaceFinished) => {}
            other => panic!("expected SurfaceFinished, got {:?}", other.err()),
        }
        assert!(surf.acquire_source_image().is_err());
    }

    #[test]
    fn snapshot_is_independent_of_source() {
        let surf = ImageSurface::create(Format::A8, 2, 2);
        surf.with_data_mut(|d| d[0] = 7);
        let snap = surf.snapshot().unwrap();
        surf.with_data_mut(|d| d[0] = 9);
        let snap_image = snap.acquire_source_image().unwrap();
        assert_eq!(snap_image.data[0], 7);
    }
}
