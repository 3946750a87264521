//! Placement checks and logging setup shared by atlas tests.

use std::collections::BTreeMap;

use tessella_core::{Extent, Origin, SliceIndex};

/// Where a suballocation landed, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    pub slice: SliceIndex,
    pub origin: Origin,
    pub size: Extent,
}

impl Placement {
    pub fn new(slice: SliceIndex, origin: Origin, size: Extent) -> Self {
        Self {
            slice,
            origin,
            size,
        }
    }

    fn overlaps(&self, other: &Placement) -> bool {
        let (ax, ay) = (u64::from(self.origin.x), u64::from(self.origin.y));
        let (bx, by) = (u64::from(other.origin.x), u64::from(other.origin.y));
        ax < bx + u64::from(other.size.width)
            && bx < ax + u64::from(self.size.width)
            && ay < by + u64::from(other.size.height)
            && by < ay + u64::from(self.size.height)
    }
}

/// Panic if two placements in the same slice overlap, or if any placement
/// leaves the `surface` bounds.
pub fn assert_no_overlap(placements: &[Placement], surface: Extent) {
    let mut by_slice: BTreeMap<SliceIndex, Vec<&Placement>> = BTreeMap::new();
    for p in placements {
        assert!(
            u64::from(p.origin.x) + u64::from(p.size.width) <= u64::from(surface.width)
                && u64::from(p.origin.y) + u64::from(p.size.height) <= u64::from(surface.height),
            "{p:?} leaves the {surface} surface"
        );
        by_slice.entry(p.slice).or_default().push(p);
    }
    for (slice, group) in by_slice {
        for (i, a) in group.iter().enumerate() {
            for b in &group[i + 1..] {
                assert!(!a.overlaps(b), "slice {slice}: {a:?} overlaps {b:?}");
            }
        }
    }
}

/// Install a test-writer `tracing` subscriber honoring `RUST_LOG`.
///
/// Safe to call from every test; only the first call installs.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
