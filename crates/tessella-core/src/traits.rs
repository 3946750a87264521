//! The per-slice packing capability.

use crate::error::PackError;
use crate::geometry::{CellRect, Extent};

/// A rectangle handed out by a [`RegionManager`].
///
/// Regions are move-only: whoever holds one is the only party able to
/// hand it back, which makes double frees unrepresentable.
pub trait PackedRegion: Send + Sync {
    /// Placement of the region in cell units.
    fn rect(&self) -> CellRect;
}

/// Packs rectangles into a fixed grid of cells.
///
/// One manager is created per atlas slice, sized to
/// `surface_width / alignment` x `surface_height / alignment` cells. The
/// atlas serialises calls on a given manager behind that slice's lock.
///
/// Implementations must never return a rectangle that leaves the grid or
/// that intersects another live rectangle of the same manager.
pub trait RegionManager: Send {
    /// Region type produced by this manager.
    type Region: PackedRegion;

    /// Create an empty manager covering `cells`.
    fn for_grid(cells: Extent) -> Self
    where
        Self: Sized;

    /// Reserve a `cells.width` x `cells.height` rectangle.
    ///
    /// Returns `None` when no free space fits the request.
    fn allocate(&mut self, cells: Extent) -> Option<Self::Region>;

    /// Return a previously allocated region.
    ///
    /// Returns [`PackError::UnknownRegion`] if the region was not issued
    /// by this manager or is no longer live; the manager's state is left
    /// unchanged in that case.
    fn free(&mut self, region: Self::Region) -> Result<(), PackError>;

    /// Number of live regions.
    fn allocation_count(&self) -> usize;

    /// Whether no regions are live.
    fn is_empty(&self) -> bool {
        self.allocation_count() == 0
    }
}
