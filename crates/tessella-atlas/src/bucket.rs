//! Alignment-class to slice-list index.
//!
//! Each slice is dedicated to one alignment class when it is created.
//! Requests look up their class here first so they land on slices that
//! already hold similarly sized content, and only open a fresh slice
//! when none of those has room.

use indexmap::IndexMap;
use smallvec::SmallVec;
use tessella_core::{Alignment, SliceIndex};

/// Per-alignment ordered lists of slice indices.
///
/// Lists are append-only and, because slice indices are handed out in
/// increasing order, always sorted.
#[derive(Debug, Default)]
pub struct AlignmentBuckets {
    buckets: IndexMap<Alignment, SmallVec<[SliceIndex; 4]>>,
}

impl AlignmentBuckets {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// First slice of `alignment` whose index is at least `from`.
    ///
    /// Creates the (empty) bucket for `alignment` if it did not exist.
    pub fn first_at_or_after(&mut self, alignment: Alignment, from: u32) -> Option<SliceIndex> {
        let list = self.buckets.entry(alignment).or_default();
        let pos = list.partition_point(|s| s.0 < from);
        list.get(pos).copied()
    }

    /// Record that `slice` now hosts `alignment`.
    ///
    /// # Panics
    ///
    /// Debug builds panic if `slice` is not greater than every slice
    /// already in the bucket.
    pub fn register(&mut self, alignment: Alignment, slice: SliceIndex) {
        let list = self.buckets.entry(alignment).or_default();
        debug_assert!(
            list.last().is_none_or(|&last| last < slice),
            "slice {slice} registered out of order for alignment {alignment}"
        );
        list.push(slice);
    }

    /// Whether `slice` is registered under `alignment`.
    pub fn contains(&self, alignment: Alignment, slice: SliceIndex) -> bool {
        self.buckets
            .get(&alignment)
            .is_some_and(|list| list.binary_search(&slice).is_ok())
    }

    /// Slices registered under `alignment`, in increasing order.
    pub fn slices(&self, alignment: Alignment) -> &[SliceIndex] {
        self.buckets.get(&alignment).map_or(&[], |list| list.as_slice())
    }
}
