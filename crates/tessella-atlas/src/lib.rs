//! Concurrent, growable texture-array atlas for Tessella.
//!
//! An [`Atlas`] packs rectangular requests into the layers ("slices") of
//! one 2D-array surface and hands back reference-counted
//! [`Suballocation`] handles. Freeing is implicit: the region returns to
//! its slice when the last handle clone is dropped.
//!
//! # Architecture
//!
//! ```text
//! Atlas<M, S>
//! ├── AtlasConfig (surface desc, min alignment, growth policy, slice cap)
//! ├── Mutex<SliceTable<M>>          structural lock
//! │   ├── Vec<Option<Arc<Slice<M>>>>
//! │   │   └── Slice: Mutex<M>       one packer per layer
//! │   └── AlignmentBuckets           alignment -> ascending slice indices
//! ├── Mutex<Option<S>>              backing surface, grown lazily
//! └── UsageCounters + version        atomics, read without locks
//! ```
//!
//! # Alignment classes
//!
//! Every request is padded to a power-of-two alignment: starting at the
//! configured minimum (or 1), doubled while it is below the request's
//! shorter side. Each slice serves a single class, so a slice's packer
//! works on a coarse grid of alignment-sized cells.
//!
//! # Growth
//!
//! Creating a slice may lengthen the slice table past the surface's layer
//! count. [`Atlas::surface`] notices, creates a larger surface through a
//! [`SurfaceBackend`](tessella_core::SurfaceBackend), copies the old
//! layers across, and bumps [`Atlas::version`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod atlas;
pub mod bucket;
pub mod config;
pub mod error;
pub mod slice;
pub mod stats;
pub mod suballocation;

// Public re-exports for the primary API surface.
pub use atlas::Atlas;
pub use bucket::AlignmentBuckets;
pub use config::AtlasConfig;
pub use error::{AllocError, ConfigError, GrowthError};
pub use stats::UsageStats;
pub use suballocation::{Suballocation, UserData};
