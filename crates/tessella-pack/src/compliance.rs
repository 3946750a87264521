//! RegionManager contract test helpers.
//!
//! These functions verify that a packing strategy satisfies the
//! invariants the atlas relies on. Reused by every manager's test module.

use tessella_core::{CellRect, Extent, PackedRegion, RegionManager};

/// Assert that no two live rectangles intersect and all lie inside `grid`.
pub fn assert_disjoint_in_grid(rects: &[CellRect], grid: Extent) {
    for (i, a) in rects.iter().enumerate() {
        assert!(a.fits_within(grid), "{a} escapes the {grid} grid");
        for b in &rects[i + 1..] {
            assert!(!a.intersects(b), "{a} overlaps {b}");
        }
    }
}

/// Requests for the full grid succeed once, then fail until freed.
pub fn assert_full_grid_round_trip<M: RegionManager>() {
    let grid = Extent::new(4, 4);
    let mut mgr = M::for_grid(grid);
    let whole = mgr.allocate(grid).expect("empty manager must fit the full grid");
    assert_eq!(whole.rect(), CellRect::new(0, 0, 4, 4));
    assert!(mgr.allocate(Extent::new(1, 1)).is_none());
    mgr.free(whole).unwrap();
    assert!(mgr.is_empty());
    assert!(mgr.allocate(grid).is_some());
}

/// Oversized and empty requests are refused without changing state.
pub fn assert_rejects_unfit_requests<M: RegionManager>() {
    let mut mgr = M::for_grid(Extent::new(4, 2));
    assert!(mgr.allocate(Extent::new(5, 1)).is_none());
    assert!(mgr.allocate(Extent::new(1, 3)).is_none());
    assert!(mgr.allocate(Extent::new(0, 1)).is_none());
    assert_eq!(mgr.allocation_count(), 0);
}

/// Filling with unit cells yields exactly `grid.area()` disjoint regions.
pub fn assert_unit_fill<M: RegionManager>() {
    let grid = Extent::new(4, 4);
    let mut mgr = M::for_grid(grid);
    let mut regions = Vec::new();
    while let Some(r) = mgr.allocate(Extent::new(1, 1)) {
        regions.push(r);
        assert!(regions.len() <= 16, "manager over-committed a 4x4 grid");
    }
    assert_eq!(regions.len(), 16);
    let rects: Vec<_> = regions.iter().map(|r| r.rect()).collect();
    assert_disjoint_in_grid(&rects, grid);
    assert_eq!(mgr.allocation_count(), 16);
    for r in regions {
        mgr.free(r).unwrap();
    }
    assert!(mgr.is_empty());
}

/// Freed space becomes reusable.
pub fn assert_free_enables_reuse<M: RegionManager>() {
    let grid = Extent::new(4, 4);
    let mut mgr = M::for_grid(grid);
    let halves: Vec<_> = (0..2)
        .map(|_| mgr.allocate(Extent::new(4, 2)).unwrap())
        .collect();
    assert!(mgr.allocate(Extent::new(4, 2)).is_none());
    let mut halves = halves.into_iter();
    mgr.free(halves.next().unwrap()).unwrap();
    let again = mgr.allocate(Extent::new(4, 2)).expect("freed half must be reusable");
    let rects = [again.rect(), halves.next().unwrap().rect()];
    assert_disjoint_in_grid(&rects, grid);
}

/// Run every contract check on manager type `M`.
pub fn run_full_compliance<M: RegionManager>() {
    assert_full_grid_round_trip::<M>();
    assert_rejects_unfit_requests::<M>();
    assert_unit_fill::<M>();
    assert_free_enables_reuse::<M>();
}
