//! Tessella: a concurrent, growable texture-array atlas allocator.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all Tessella sub-crates. For most users, adding `tessella` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use tessella::prelude::*;
//!
//! // A backend whose "surfaces" are just their descriptors.
//! struct DescBackend;
//! impl SurfaceBackend for DescBackend {
//!     type Surface = SurfaceDesc;
//!     fn create_surface(&mut self, desc: &SurfaceDesc) -> Result<SurfaceDesc, SurfaceError> {
//!         Ok(desc.clone())
//!     }
//!     fn copy_layer(&mut self, _src: &SurfaceDesc, _dst: &SurfaceDesc, _copy: LayerCopy) {}
//! }
//!
//! let desc = SurfaceDesc::new("glyphs", TexelFormat::R8Unorm, 256, 256);
//! let atlas: std::sync::Arc<Atlas<GuillotineManager, SurfaceDesc>> =
//!     Atlas::new(AtlasConfig::new(desc)).unwrap();
//!
//! let glyph = atlas.allocate(64, 64).unwrap();
//! assert_eq!(glyph.alignment().get(), 64);
//! assert_eq!(glyph.uv_scale_bias()[0], 0.25);
//!
//! // Slices were added, so the next surface call grows the backing surface.
//! let surface = atlas.surface(Some(&mut DescBackend)).unwrap().unwrap();
//! assert_eq!(surface.array_size, 1);
//! assert_eq!(atlas.version(), 1);
//!
//! drop(glyph);
//! assert_eq!(atlas.usage_stats().allocation_count, 0);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `tessella-core` | Geometry, ids, formats, surface and packer traits |
//! | [`pack`] | `tessella-pack` | Guillotine and shelf packers |
//! | [`atlas`] | `tessella-atlas` | The atlas, suballocation handles, statistics |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types and capability traits (`tessella-core`).
///
/// Implement [`types::SurfaceBackend`] to connect an atlas to a graphics
/// API, or [`types::RegionManager`] to supply a custom packer.
pub use tessella_core as types;

/// Per-slice rectangle packers (`tessella-pack`).
///
/// [`pack::GuillotineManager`] for general use, [`pack::ShelfManager`] for
/// uniform heights.
pub use tessella_pack as pack;

/// Atlas and suballocations (`tessella-atlas`).
pub use tessella_atlas as atlas;

/// Common imports for typical Tessella usage.
///
/// ```rust
/// use tessella::prelude::*;
/// ```
pub mod prelude {
    // Atlas
    pub use tessella_atlas::{Atlas, AtlasConfig, Suballocation, UsageStats, UserData};

    // Errors
    pub use tessella_atlas::{AllocError, ConfigError, GrowthError};
    pub use tessella_core::{PackError, SurfaceError};

    // Core types and traits
    pub use tessella_core::{
        Alignment, Extent, LayerCopy, Origin, RegionManager, SliceIndex, SurfaceBackend,
        SurfaceDesc, SurfaceDimension, TexelFormat,
    };

    // Packers
    pub use tessella_pack::{GuillotineManager, ShelfManager};
}
