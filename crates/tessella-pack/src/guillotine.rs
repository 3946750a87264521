//! Guillotine-tree packing backed by the `guillotiere` crate.

use guillotiere::{size2, AllocId, AtlasAllocator};
use indexmap::IndexSet;
use tessella_core::{CellRect, Extent, PackError, PackedRegion, RegionManager};

/// Region issued by a [`GuillotineManager`].
#[derive(Debug)]
pub struct GuillotineRegion {
    owner: u64,
    id: AllocId,
    rect: CellRect,
}

impl PackedRegion for GuillotineRegion {
    fn rect(&self) -> CellRect {
        self.rect
    }
}

/// Guillotine packer over a cell grid.
///
/// Free space is kept as a guillotine tree; freed rectangles are merged
/// with their free siblings, so long-lived slices do not fragment into
/// unusable slivers.
pub struct GuillotineManager {
    owner: u64,
    allocator: AtlasAllocator,
    grid: Extent,
    /// Serialized ids of live allocations. `guillotiere` panics on ids it
    /// does not recognise, so frees are checked here first.
    live: IndexSet<u32>,
}

impl GuillotineManager {
    /// Size of the managed grid in cells.
    ///
    /// Capped at `i32::MAX` cells per side, the most `guillotiere` can
    /// address; requests past the cap are refused by `allocate`.
    pub fn grid(&self) -> Extent {
        self.grid
    }
}

const MAX_SIDE: u32 = i32::MAX as u32;

/// The part of `cells` that `guillotiere`'s `i32` coordinates can address.
fn addressable(cells: Extent) -> Extent {
    Extent::new(cells.width.min(MAX_SIDE), cells.height.min(MAX_SIDE))
}

impl RegionManager for GuillotineManager {
    type Region = GuillotineRegion;

    fn for_grid(cells: Extent) -> Self {
        let grid = addressable(cells);
        // guillotiere needs a non-degenerate area; an empty grid is still
        // honoured by the `contains` check in `allocate`.
        let size = size2(grid.width.max(1) as i32, grid.height.max(1) as i32);
        Self {
            owner: crate::next_owner(),
            allocator: AtlasAllocator::new(size),
            grid,
            live: IndexSet::new(),
        }
    }

    fn allocate(&mut self, cells: Extent) -> Option<GuillotineRegion> {
        if cells.is_empty() || !self.grid.contains(cells) {
            return None;
        }
        let size = size2(i32::try_from(cells.width).ok()?, i32::try_from(cells.height).ok()?);
        let alloc = self.allocator.allocate(size)?;
        let min = alloc.rectangle.min;
        let (Ok(x), Ok(y)) = (u32::try_from(min.x), u32::try_from(min.y)) else {
            self.allocator.deallocate(alloc.id);
            return None;
        };
        let rect = CellRect::new(x, y, cells.width, cells.height);
        self.live.insert(alloc.id.serialize());
        Some(GuillotineRegion {
            owner: self.owner,
            id: alloc.id,
            rect,
        })
    }

    fn free(&mut self, region: GuillotineRegion) -> Result<(), PackError> {
        if region.owner != self.owner || !self.live.swap_remove(&region.id.serialize()) {
            return Err(PackError::UnknownRegion { rect: region.rect });
        }
        self.allocator.deallocate(region.id);
        Ok(())
    }

    fn allocation_count(&self) -> usize {
        self.live.len()
    }
}
