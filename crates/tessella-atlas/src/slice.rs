//! Atlas slices and the append-only slice table.
//!
//! A [`Slice`] is one layer of the array surface: a region manager behind
//! its own mutex. The [`SliceTable`] owns every slice plus the alignment
//! buckets and is guarded as a whole by the atlas's structural lock.
//! Slices are reference counted so a caller can drop the structural lock
//! and keep packing into a slice while other threads grow the table.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tessella_core::{Alignment, Extent, PackError, RegionManager, SliceIndex};

use crate::bucket::AlignmentBuckets;

/// One layer of the atlas.
pub struct Slice<M> {
    index: SliceIndex,
    alignment: Alignment,
    grid: Extent,
    manager: Mutex<M>,
}

impl<M: RegionManager> Slice<M> {
    /// Create a slice whose manager covers `grid` cells.
    pub fn new(index: SliceIndex, alignment: Alignment, grid: Extent) -> Self {
        Self {
            index,
            alignment,
            grid,
            manager: Mutex::new(M::for_grid(grid)),
        }
    }

    /// Position in the slice table.
    pub fn index(&self) -> SliceIndex {
        self.index
    }

    /// Alignment class this slice is dedicated to.
    pub fn alignment(&self) -> Alignment {
        self.alignment
    }

    /// Size of the cell grid.
    pub fn grid(&self) -> Extent {
        self.grid
    }

    /// Reserve `cells` under the slice lock.
    pub fn allocate(&self, cells: Extent) -> Option<M::Region> {
        self.lock().allocate(cells)
    }

    /// Return `region` under the slice lock.
    pub fn free(&self, region: M::Region) -> Result<(), PackError> {
        self.lock().free(region)
    }

    /// Number of live regions in this slice.
    pub fn allocation_count(&self) -> usize {
        self.lock().allocation_count()
    }

    // Every manager call either completes or leaves the manager as it
    // was, so a poisoned lock still guards consistent state.
    fn lock(&self) -> MutexGuard<'_, M> {
        self.manager.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Growable table of slices plus the alignment index.
///
/// Table length is the atlas's logical layer count. Entries above
/// `next_unused` are reserved but not yet created.
pub struct SliceTable<M> {
    slices: Vec<Option<Arc<Slice<M>>>>,
    buckets: AlignmentBuckets,
    next_unused: u32,
}

impl<M: RegionManager> SliceTable<M> {
    /// A table with `initial_len` reserved, uncreated entries.
    pub fn new(initial_len: u32) -> Self {
        Self {
            slices: (0..initial_len).map(|_| None).collect(),
            buckets: AlignmentBuckets::new(),
            next_unused: 0,
        }
    }

    /// Logical layer count.
    pub fn layer_count(&self) -> u32 {
        self.slices.len() as u32
    }

    /// Number of slices actually created.
    pub fn created(&self) -> u32 {
        self.next_unused
    }

    /// The alignment index.
    pub fn buckets(&self) -> &AlignmentBuckets {
        &self.buckets
    }

    /// The created slice at `index`, if any.
    pub fn get(&self, index: SliceIndex) -> Option<Arc<Slice<M>>> {
        self.slices.get(index.as_usize()).and_then(Clone::clone)
    }

    /// Find the next slice to try for `alignment`, starting at `candidate`.
    ///
    /// Returns the first existing slice of that class at or after
    /// `candidate`. If there is none, creates a new slice at the next
    /// unused index (growing the table by `growth` entries, or doubling
    /// when `growth` is zero, capped at `max_slices`) and registers it
    /// under `alignment`. Returns `None` when a new slice is needed but
    /// `max_slices` have already been created.
    pub fn slice_for(
        &mut self,
        alignment: Alignment,
        candidate: u32,
        grid: Extent,
        growth: u32,
        max_slices: u32,
    ) -> Option<Arc<Slice<M>>> {
        let index = self
            .buckets
            .first_at_or_after(alignment, candidate)
            .map_or(self.next_unused, |s| s.0);

        if index == self.next_unused {
            if index >= max_slices {
                return None;
            }
            self.reserve(index, growth, max_slices);

            let slot = &mut self.slices[index as usize];
            debug_assert!(slot.is_none(), "slice {index} has already been created");
            let slice = Arc::new(Slice::new(SliceIndex(index), alignment, grid));
            *slot = Some(Arc::clone(&slice));
            self.buckets.register(alignment, SliceIndex(index));
            self.next_unused += 1;

            tracing::debug!(
                slice = index,
                alignment = alignment.get(),
                grid_width = grid.width,
                grid_height = grid.height,
                "created atlas slice"
            );
            return Some(slice);
        }

        self.get(SliceIndex(index))
    }

    fn reserve(&mut self, index: u32, growth: u32, max_slices: u32) {
        while index >= self.layer_count() {
            let step = (if growth != 0 { growth } else { self.layer_count() }).max(1);
            let new_len = index.saturating_add(step).min(max_slices);
            tracing::debug!(from = self.layer_count(), to = new_len, "growing slice table");
            self.slices.resize_with(new_len as usize, || None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessella_pack::ShelfManager;

    fn a(v: u32) -> Alignment {
        Alignment::new(v).unwrap()
    }

    const GRID: Extent = Extent::new(4, 4);

    #[test]
    fn new_table_reserves_initial_entries() {
        let table = SliceTable::<ShelfManager>::new(3);
        assert_eq!(table.layer_count(), 3);
        assert_eq!(table.created(), 0);
        assert!(table.get(SliceIndex(0)).is_none());
    }

    #[test]
    fn first_request_creates_slice_zero() {
        let mut table = SliceTable::<ShelfManager>::new(0);
        let s = table.slice_for(a(64), 0, GRID, 1, 8).unwrap();
        assert_eq!(s.index(), SliceIndex(0));
        assert_eq!(s.alignment(), a(64));
        assert_eq!(s.grid(), GRID);
        assert_eq!(table.layer_count(), 1);
        assert_eq!(table.created(), 1);
        assert!(table.buckets().contains(a(64), SliceIndex(0)));
    }

    #[test]
    fn same_alignment_reuses_existing_slice() {
        let mut table = SliceTable::<ShelfManager>::new(0);
        let first = table.slice_for(a(8), 0, GRID, 1, 8).unwrap();
        let again = table.slice_for(a(8), 0, GRID, 1, 8).unwrap();
        assert!(Arc::ptr_eq(&first, &again));
        assert_eq!(table.created(), 1);
    }

    #[test]
    fn different_alignment_opens_new_slice() {
        let mut table = SliceTable::<ShelfManager>::new(0);
        table.slice_for(a(8), 0, GRID, 1, 8).unwrap();
        let s = table.slice_for(a(16), 0, GRID, 1, 8).unwrap();
        assert_eq!(s.index(), SliceIndex(1));
        assert_eq!(table.buckets().slices(a(8)), &[SliceIndex(0)]);
        assert_eq!(table.buckets().slices(a(16)), &[SliceIndex(1)]);
    }

    #[test]
    fn advancing_past_last_slice_of_class_creates_next_unused() {
        let mut table = SliceTable::<ShelfManager>::new(0);
        table.slice_for(a(8), 0, GRID, 1, 8).unwrap();
        table.slice_for(a(16), 0, GRID, 1, 8).unwrap();
        let s = table.slice_for(a(8), 1, GRID, 1, 8).unwrap();
        assert_eq!(s.index(), SliceIndex(2));
        assert_eq!(table.buckets().slices(a(8)), &[SliceIndex(0), SliceIndex(2)]);
    }

    #[test]
    fn cap_stops_creation() {
        let mut table = SliceTable::<ShelfManager>::new(0);
        table.slice_for(a(8), 0, GRID, 1, 1).unwrap();
        assert!(table.slice_for(a(8), 1, GRID, 1, 1).is_none());
        assert!(table.slice_for(a(16), 0, GRID, 1, 1).is_none());
        assert_eq!(table.created(), 1);
    }

    #[test]
    fn zero_growth_doubles_and_starts_from_one() {
        let mut table = SliceTable::<ShelfManager>::new(0);
        table.slice_for(a(1), 0, GRID, 0, 64).unwrap();
        assert_eq!(table.layer_count(), 1);
        table.slice_for(a(2), 0, GRID, 0, 64).unwrap();
        assert_eq!(table.layer_count(), 2);
        table.slice_for(a(4), 0, GRID, 0, 64).unwrap();
        assert_eq!(table.layer_count(), 4);
        table.slice_for(a(8), 0, GRID, 0, 64).unwrap();
        assert_eq!(table.layer_count(), 4);
        table.slice_for(a(16), 0, GRID, 0, 64).unwrap();
        assert_eq!(table.layer_count(), 8);
    }

    #[test]
    fn growth_is_capped_at_max() {
        let mut table = SliceTable::<ShelfManager>::new(0);
        table.slice_for(a(1), 0, GRID, 10, 3).unwrap();
        assert_eq!(table.layer_count(), 3);
    }

    #[test]
    fn initial_entries_are_used_before_growing() {
        let mut table = SliceTable::<ShelfManager>::new(2);
        table.slice_for(a(1), 0, GRID, 1, 8).unwrap();
        table.slice_for(a(2), 0, GRID, 1, 8).unwrap();
        assert_eq!(table.layer_count(), 2);
        table.slice_for(a(4), 0, GRID, 1, 8).unwrap();
        assert_eq!(table.layer_count(), 3);
    }

    #[test]
    fn slice_allocate_and_free_round_trip() {
        let slice = Slice::<ShelfManager>::new(SliceIndex(0), a(1), GRID);
        let r = slice.allocate(Extent::new(2, 2)).unwrap();
        assert_eq!(slice.allocation_count(), 1);
        slice.free(r).unwrap();
        assert_eq!(slice.allocation_count(), 0);
    }
}
