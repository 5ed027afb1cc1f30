use core::fmt;

/// Errors local to the surface layer. `raster2d-core::error::Status` embeds
/// each of these as one of its own variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SurfaceError {
    /// Operation attempted on a surface whose `finish()` was already called.
    SurfaceFinished,
    /// The backend does not implement this entry point and has no traps
    /// compositor fallback wired up for it.
    Unsupported,
    /// `map_to_image`/`acquire_source_image` region falls outside the
    /// surface's extents.
    InvalidPathData,
}

impl fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurfaceError::SurfaceFinished => write!(f, "operation on a finished surface"),
            SurfaceError::Unsupported => write!(f, "operation not supported by this surface"),
            SurfaceError::InvalidPathData => write!(f, "region out of bounds"),
        }
    }
}

impl std::error::Error for SurfaceError {}

pub type SurfaceResult<T> = Result<T, SurfaceError>;
