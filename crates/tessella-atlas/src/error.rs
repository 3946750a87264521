//! Atlas error types.

use std::error::Error;
use std::fmt;

use tessella_core::{Alignment, Extent, SurfaceDimension, SurfaceError};

/// Errors detected by [`AtlasConfig::validate()`](crate::AtlasConfig::validate)
/// or while creating the initial surface.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// Only 2D and 2D-array surfaces can back an atlas.
    InvalidDimension {
        /// The rejected dimension.
        dimension: SurfaceDimension,
    },
    /// The surface format is unset.
    UnknownFormat,
    /// Surface width is zero.
    ZeroWidth,
    /// Surface height is zero.
    ZeroHeight,
    /// `min_alignment` is nonzero but not a power of two.
    MinAlignmentNotPowerOfTwo {
        /// The configured value.
        min_alignment: u32,
    },
    /// Surface width is not a multiple of `min_alignment`.
    WidthNotAligned {
        /// Surface width.
        width: u32,
        /// The configured minimum alignment.
        min_alignment: u32,
    },
    /// Surface height is not a multiple of `min_alignment`.
    HeightNotAligned {
        /// Surface height.
        height: u32,
        /// The configured minimum alignment.
        min_alignment: u32,
    },
    /// The backend failed to create the initial surface.
    Surface(SurfaceError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDimension { dimension } => write!(
                f,
                "{dimension} is not a valid atlas dimension; only 2D and 2D-array surfaces are allowed"
            ),
            Self::UnknownFormat => write!(f, "surface format must not be unknown"),
            Self::ZeroWidth => write!(f, "surface width must not be zero"),
            Self::ZeroHeight => write!(f, "surface height must not be zero"),
            Self::MinAlignmentNotPowerOfTwo { min_alignment } => {
                write!(f, "minimum alignment ({min_alignment}) is not a power of two")
            }
            Self::WidthNotAligned {
                width,
                min_alignment,
            } => write!(
                f,
                "surface width ({width}) is not a multiple of minimum alignment ({min_alignment})"
            ),
            Self::HeightNotAligned {
                height,
                min_alignment,
            } => write!(
                f,
                "surface height ({height}) is not a multiple of minimum alignment ({min_alignment})"
            ),
            Self::Surface(e) => write!(f, "initial surface: {e}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Surface(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SurfaceError> for ConfigError {
    fn from(e: SurfaceError) -> Self {
        Self::Surface(e)
    }
}

/// Errors returned by [`Atlas::allocate`](crate::Atlas::allocate).
///
/// `ZeroSize` signals a caller bug; the rest mean the atlas is out of
/// room for this request and the caller may retry after other
/// suballocations are released.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AllocError {
    /// Width or height is zero.
    ZeroSize {
        /// The rejected request.
        requested: Extent,
    },
    /// The request is larger than the surface.
    ExceedsSurface {
        /// The rejected request.
        requested: Extent,
        /// Surface dimensions.
        surface: Extent,
    },
    /// After padding to its alignment class the request no longer fits
    /// the per-slice cell grid.
    ExceedsSliceGrid {
        /// The rejected request.
        requested: Extent,
        /// The resolved alignment class, if it fits in a `u32`.
        alignment: Option<Alignment>,
    },
    /// No slice up to the maximum slice count had room.
    NoSpace {
        /// The rejected request.
        requested: Extent,
        /// The slice cap that was exhausted.
        max_slices: u32,
    },
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroSize { requested } => {
                write!(f, "suballocation size must not be zero, got {requested}")
            }
            Self::ExceedsSurface { requested, surface } => write!(
                f,
                "requested region size {requested} exceeds atlas dimensions {surface}"
            ),
            Self::ExceedsSliceGrid {
                requested,
                alignment: Some(alignment),
            } => write!(
                f,
                "requested region size {requested} does not fit a slice at alignment {alignment}"
            ),
            Self::ExceedsSliceGrid {
                requested,
                alignment: None,
            } => write!(f, "requested region size {requested} has no representable alignment"),
            Self::NoSpace {
                requested,
                max_slices,
            } => write!(
                f,
                "failed to suballocate region {requested} from atlas ({max_slices} slices searched)"
            ),
        }
    }
}

impl Error for AllocError {}

/// Errors returned by [`Atlas::surface`](crate::Atlas::surface).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GrowthError {
    /// The atlas gained slices and must grow its surface, but no backend
    /// was supplied.
    BackendRequired {
        /// Layers the current surface has.
        surface_layers: u32,
        /// Layers the slice table now needs.
        required_layers: u32,
    },
    /// The backend failed to create the grown surface. The previous
    /// surface and version are retained.
    Surface(SurfaceError),
}

impl fmt::Display for GrowthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BackendRequired {
                surface_layers,
                required_layers,
            } => write!(
                f,
                "atlas must grow from {surface_layers} to {required_layers} layers but no backend was supplied"
            ),
            Self::Surface(e) => write!(f, "surface growth: {e}"),
        }
    }
}

impl Error for GrowthError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Surface(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SurfaceError> for GrowthError {
    fn from(e: SurfaceError) -> Self {
        Self::Surface(e)
    }
}
