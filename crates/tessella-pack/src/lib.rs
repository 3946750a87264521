//! Rectangle packing strategies for Tessella atlas slices.
//!
//! Each type here implements [`RegionManager`] and can be plugged into an
//! atlas as its per-slice packer:
//!
//! - [`GuillotineManager`]: guillotine tree packing via the
//!   [`guillotiere`] crate. Good general-purpose density, handles mixed
//!   sizes well, merges freed space back together.
//! - [`ShelfManager`]: row-based shelf packing. Cheap and predictable,
//!   best when requests sharing a slice have similar heights (which the
//!   atlas's alignment bucketing encourages).
//!
//! Both managers keep a table of live regions and reject frees of regions
//! they did not hand out. Every manager instance carries a process-unique
//! owner token that is stamped into its regions, so a region from another
//! manager is rejected even when its local id collides with a live one.
//!
//! [`RegionManager`]: tessella_core::RegionManager

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod guillotine;
pub mod shelf;

pub use guillotine::{GuillotineManager, GuillotineRegion};
pub use shelf::{ShelfManager, ShelfRegion};

use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_OWNER: AtomicU64 = AtomicU64::new(0);

/// Token identifying one manager instance for the life of the process.
pub(crate) fn next_owner() -> u64 {
    NEXT_OWNER.fetch_add(1, Ordering::Relaxed)
}

#[cfg(test)]
pub(crate) mod compliance;
