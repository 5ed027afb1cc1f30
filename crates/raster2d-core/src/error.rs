//! The exhaustive `Status` taxonomy and the sticky-at-first-error cell
//! that embeds it. Grounded on cairo's `cairo_status_t`:
//! a single closed enum shared by every layer, most of whose variants
//! exist only because upstream cairo ships backends (PDF, FreeType, PDF
//! JBIG2, Win GDI) this crate does not — they are kept for taxonomy
//! completeness and are simply never constructed here.

use core::cell::Cell;
use core::fmt;

/// Every status this engine can report. `Success` is the non-error rest
/// state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Status {
    Success,
    NoMemory,
    InvalidRestore,
    InvalidPopGroup,
    NoCurrentPoint,
    InvalidMatrix,
    InvalidStatus,
    NullPointer,
    InvalidString,
    InvalidPathData,
    ReadError,
    WriteError,
    SurfaceFinished,
    SurfaceTypeMismatch,
    PatternTypeMismatch,
    FontTypeMismatch,
    DeviceTypeMismatch,
    InvalidContent,
    InvalidFormat,
    InvalidVisual,
    FileNotFound,
    InvalidDashSize,
    InvalidDashOffset,
    UserFontError,
    UserFontImmutable,
    NegativeCount,
    InvalidClusters,
    InvalidSlant,
    InvalidWeight,
    InvalidSize,
    UserFontNotImplemented,
    DeviceError,
    DeviceFinished,
    JbigError,
    Jbig2GlobalMissing,
    PngError,
    FreetypeError,
    WinGdiError,
    TagError,
}

impl Status {
    pub fn is_success(self) -> bool {
        matches!(self, Status::Success)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Status::Success => "success",
            Status::NoMemory => "out of memory",
            Status::InvalidRestore => "restore with an empty graphics state stack",
            Status::InvalidPopGroup => "pop_group without a matching push_group",
            Status::NoCurrentPoint => "no current point",
            Status::InvalidMatrix => "matrix is not invertible",
            Status::InvalidStatus => "status code out of range",
            Status::NullPointer => "required argument missing",
            Status::InvalidString => "input text is not valid UTF-8",
            Status::InvalidPathData => "malformed path iteration input",
            Status::ReadError => "I/O read failure",
            Status::WriteError => "I/O write failure",
            Status::SurfaceFinished => "operation on a finished surface",
            Status::SurfaceTypeMismatch => "surface is not of the expected type",
            Status::PatternTypeMismatch => "pattern is not of the expected type",
            Status::FontTypeMismatch => "font is not of the expected type",
            Status::DeviceTypeMismatch => "device is not of the expected type",
            Status::InvalidContent => "invalid content type",
            Status::InvalidFormat => "invalid pixel format",
            Status::InvalidVisual => "invalid visual",
            Status::FileNotFound => "file not found",
            Status::InvalidDashSize => "negative or NaN dash entry",
            Status::InvalidDashOffset => "negative or NaN dash offset",
            Status::UserFontError => "user font callback failed",
            Status::UserFontImmutable => "user font already immutable",
            Status::NegativeCount => "negative glyph/cluster count",
            Status::InvalidClusters => "invalid cluster mapping",
            Status::InvalidSlant => "invalid font slant",
            Status::InvalidWeight => "invalid font weight",
            Status::InvalidSize => "invalid font size",
            Status::UserFontNotImplemented => "user font callback not implemented",
            Status::DeviceError => "device-level I/O error",
            Status::DeviceFinished => "operation on a finished device",
            Status::JbigError => "JBIG2 encoding error",
            Status::Jbig2GlobalMissing => "JBIG2 global segment missing",
            Status::PngError => "PNG encoding/decoding error",
            Status::FreetypeError => "FreeType error",
            Status::WinGdiError => "Windows GDI error",
            Status::TagError => "tagged PDF structure error",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for Status {}

impl From<raster2d_surface::SurfaceError> for Status {
    fn from(e: raster2d_surface::SurfaceError) -> Self {
        match e {
            raster2d_surface::SurfaceError::SurfaceFinished => Status::SurfaceFinished,
            raster2d_surface::SurfaceError::Unsupported => Status::InvalidStatus,
            raster2d_surface::SurfaceError::InvalidPathData => Status::InvalidPathData,
        }
    }
}

impl From<raster2d_geom::InvalidMatrix> for Status {
    fn from(_: raster2d_geom::InvalidMatrix) -> Self {
        Status::InvalidMatrix
    }
}

impl From<raster2d_path::NoCurrentPoint> for Status {
    fn from(_: raster2d_path::NoCurrentPoint) -> Self {
        Status::NoCurrentPoint
    }
}

/// A `Cell<Status>` that only ever moves away from `Success` once. `Context` embeds one;
/// every `Surface` impl has its own independent copy via `SurfaceBase` —
/// wiring that status into this type is left to the backend since
/// `raster2d-surface` predates `raster2d-core` in the dependency graph.
#[derive(Debug, Default)]
pub struct StickyStatus(Cell<Status>);

impl StickyStatus {
    pub fn new() -> Self {
        StickyStatus(Cell::new(Status::Success))
    }

    pub fn get(&self) -> Status {
        self.0.get()
    }

    pub fn is_success(&self) -> bool {
        self.0.get().is_success()
    }

    /// Records `status` only if nothing has gone wrong yet; later errors
    /// never overwrite the first one.
    pub fn set_if_success(&self, status: Status) {
        if self.0.get().is_success() {
            self.0.set(status);
        }
    }
}

impl Default for Status {
    fn default() -> Self {
        Status::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_error_sticks() {
        let status = StickyStatus::new();
        status.set_if_success(Status::InvalidRestore);
        status.set_if_success(Status::NoMemory);
        assert_eq!(status.get(), Status::InvalidRestore);
    }

    #[test]
    fn success_is_not_sticky() {
        let status = StickyStatus::new();
        assert!(status.is_success());
    }
}
