//! Core types and traits for the Tessella atlas allocator.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the vocabulary shared by the rest of the workspace: slice and
//! alignment ids, cell-grid geometry, surface descriptors, and the two
//! capabilities the atlas consumes but does not implement: per-slice
//! rectangle packing ([`RegionManager`]) and backing-surface creation
//! and copying ([`SurfaceBackend`]).

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod format;
pub mod geometry;
pub mod id;
pub mod surface;
pub mod traits;

pub use error::{PackError, SurfaceError};
pub use format::TexelFormat;
pub use geometry::{CellRect, Extent, Origin};
pub use id::{Alignment, SliceIndex};
pub use surface::{LayerCopy, SurfaceBackend, SurfaceDesc, SurfaceDimension};
pub use traits::{PackedRegion, RegionManager};
