//! Error types for the collaborator capabilities.

use std::error::Error;
use std::fmt;

use crate::geometry::CellRect;

/// Errors reported by a [`RegionManager`](crate::RegionManager).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PackError {
    /// The region handed to `free` is not live in this manager.
    UnknownRegion {
        /// Placement of the rejected region.
        rect: CellRect,
    },
}

impl fmt::Display for PackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownRegion { rect } => {
                write!(f, "region {rect} is not allocated in this manager")
            }
        }
    }
}

impl Error for PackError {}

/// Errors reported by a [`SurfaceBackend`](crate::SurfaceBackend).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SurfaceError {
    /// The backend could not create the requested surface.
    CreationFailed {
        /// Backend-supplied description of the failure.
        reason: String,
    },
}

impl fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreationFailed { reason } => write!(f, "surface creation failed: {reason}"),
        }
    }
}

impl Error for SurfaceError {}
