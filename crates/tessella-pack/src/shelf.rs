//! Shelf (row) packing.
//!
//! The grid is cut into horizontal shelves stacked from the top. Each
//! shelf tracks its free horizontal spans; a request goes to the
//! tightest shelf that is tall enough and has a wide enough span, or
//! opens a new shelf of exactly its height below the last one.

use indexmap::IndexMap;
use smallvec::SmallVec;
use tessella_core::{CellRect, Extent, PackError, PackedRegion, RegionManager};

/// Region issued by a [`ShelfManager`].
#[derive(Debug)]
pub struct ShelfRegion {
    owner: u64,
    id: u64,
    rect: CellRect,
}

impl PackedRegion for ShelfRegion {
    fn rect(&self) -> CellRect {
        self.rect
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Span {
    x: u32,
    width: u32,
}

#[derive(Debug)]
struct Shelf {
    y: u32,
    height: u32,
    /// Free spans, sorted by `x`, never adjacent.
    free: SmallVec<[Span; 4]>,
    live: u32,
}

impl Shelf {
    fn new(y: u32, height: u32, width: u32) -> Self {
        let mut free = SmallVec::new();
        free.push(Span { x: 0, width });
        Self {
            y,
            height,
            free,
            live: 0,
        }
    }

    fn fitting_span(&self, width: u32) -> Option<usize> {
        self.free.iter().position(|s| s.width >= width)
    }

    fn take(&mut self, span_idx: usize, width: u32) -> u32 {
        let span = &mut self.free[span_idx];
        let x = span.x;
        span.x += width;
        span.width -= width;
        if span.width == 0 {
            self.free.remove(span_idx);
        }
        self.live += 1;
        x
    }

    fn give_back(&mut self, x: u32, width: u32) {
        let idx = self.free.partition_point(|s| s.x < x);
        self.free.insert(idx, Span { x, width });
        // Merge with the right neighbour, then the left.
        let ends_at = |s: &Span| s.x + s.width;
        if idx + 1 < self.free.len() && ends_at(&self.free[idx]) == self.free[idx + 1].x {
            self.free[idx].width += self.free[idx + 1].width;
            self.free.remove(idx + 1);
        }
        if idx > 0 && ends_at(&self.free[idx - 1]) == self.free[idx].x {
            self.free[idx - 1].width += self.free[idx].width;
            self.free.remove(idx);
        }
        self.live -= 1;
    }
}

/// Shelf packer over a cell grid.
pub struct ShelfManager {
    owner: u64,
    grid: Extent,
    shelves: Vec<Shelf>,
    live: IndexMap<u64, CellRect>,
    next_id: u64,
}

impl ShelfManager {
    /// Number of open shelves.
    pub fn shelf_count(&self) -> usize {
        self.shelves.len()
    }

    /// Rows below the last shelf that no shelf covers yet.
    pub fn remaining_height(&self) -> u32 {
        self.grid.height - self.shelves.last().map_or(0, |s| s.y + s.height)
    }

    fn best_shelf(&self, cells: Extent) -> Option<(usize, usize)> {
        self.shelves
            .iter()
            .enumerate()
            .filter(|(_, shelf)| shelf.height >= cells.height)
            .filter_map(|(i, shelf)| shelf.fitting_span(cells.width).map(|s| (i, s, shelf.height)))
            .min_by_key(|&(_, _, height)| height)
            .map(|(i, s, _)| (i, s))
    }

    fn trim_trailing_empty_shelves(&mut self) {
        while self.shelves.last().is_some_and(|s| s.live == 0) {
            self.shelves.pop();
        }
    }
}

impl RegionManager for ShelfManager {
    type Region = ShelfRegion;

    fn for_grid(cells: Extent) -> Self {
        Self {
            owner: crate::next_owner(),
            grid: cells,
            shelves: Vec::new(),
            live: IndexMap::new(),
            next_id: 0,
        }
    }

    fn allocate(&mut self, cells: Extent) -> Option<ShelfRegion> {
        if cells.is_empty() || !self.grid.contains(cells) {
            return None;
        }

        let (shelf_idx, span_idx) = match self.best_shelf(cells) {
            Some(found) => found,
            None => {
                if self.remaining_height() < cells.height {
                    return None;
                }
                let y = self.grid.height - self.remaining_height();
                self.shelves.push(Shelf::new(y, cells.height, self.grid.width));
                (self.shelves.len() - 1, 0)
            }
        };

        let shelf = &mut self.shelves[shelf_idx];
        let x = shelf.take(span_idx, cells.width);
        let rect = CellRect::new(x, shelf.y, cells.width, cells.height);

        let id = self.next_id;
        self.next_id += 1;
        self.live.insert(id, rect);
        Some(ShelfRegion {
            owner: self.owner,
            id,
            rect,
        })
    }

    fn free(&mut self, region: ShelfRegion) -> Result<(), PackError> {
        if region.owner != self.owner {
            return Err(PackError::UnknownRegion { rect: region.rect });
        }
        match self.live.get(&region.id) {
            Some(rect) if *rect == region.rect => {}
            _ => return Err(PackError::UnknownRegion { rect: region.rect }),
        }
        let Some(shelf) = self.shelves.iter_mut().find(|s| s.y == region.rect.y) else {
            return Err(PackError::UnknownRegion { rect: region.rect });
        };
        self.live.swap_remove(&region.id);
        shelf.give_back(region.rect.x, region.rect.width);
        self.trim_trailing_empty_shelves();
        Ok(())
    }

    fn allocation_count(&self) -> usize {
        self.live.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance;
    use proptest::prelude::*;

    #[test]
    fn compliance_suite() {
        compliance::run_full_compliance::<ShelfManager>();
    }

    #[test]
    fn same_height_requests_share_a_shelf() {
        let mut mgr = ShelfManager::for_grid(Extent::new(8, 8));
        let a = mgr.allocate(Extent::new(3, 2)).unwrap();
        let b = mgr.allocate(Extent::new(3, 2)).unwrap();
        assert_eq!(a.rect(), CellRect::new(0, 0, 3, 2));
        assert_eq!(b.rect(), CellRect::new(3, 0, 3, 2));
        assert_eq!(mgr.shelf_count(), 1);
        assert_eq!(mgr.remaining_height(), 6);
    }

    #[test]
    fn short_request_prefers_tightest_shelf() {
        let mut mgr = ShelfManager::for_grid(Extent::new(4, 8));
        let _tall = mgr.allocate(Extent::new(2, 4)).unwrap();
        let _short = mgr.allocate(Extent::new(4, 1)).unwrap();
        // The 1-high shelf is full, so the 1x1 lands on the 4-high shelf.
        let r = mgr.allocate(Extent::new(1, 1)).unwrap();
        assert_eq!(r.rect().y, 0);
        assert_eq!(mgr.shelf_count(), 2);
    }

    #[test]
    fn freed_spans_coalesce() {
        let mut mgr = ShelfManager::for_grid(Extent::new(6, 2));
        let a = mgr.allocate(Extent::new(2, 2)).unwrap();
        let b = mgr.allocate(Extent::new(2, 2)).unwrap();
        let c = mgr.allocate(Extent::new(2, 2)).unwrap();
        mgr.free(a).unwrap();
        mgr.free(c).unwrap();
        assert!(mgr.allocate(Extent::new(4, 2)).is_none());
        mgr.free(b).unwrap();
        // Everything freed: the shelf is gone and the whole grid is usable.
        assert_eq!(mgr.shelf_count(), 0);
        let whole = mgr.allocate(Extent::new(6, 2)).unwrap();
        assert_eq!(whole.rect(), CellRect::new(0, 0, 6, 2));
    }

    #[test]
    fn trailing_empty_shelf_releases_height() {
        let mut mgr = ShelfManager::for_grid(Extent::new(4, 4));
        let _top = mgr.allocate(Extent::new(4, 1)).unwrap();
        let bottom = mgr.allocate(Extent::new(4, 3)).unwrap();
        assert_eq!(mgr.remaining_height(), 0);
        mgr.free(bottom).unwrap();
        assert_eq!(mgr.shelf_count(), 1);
        assert_eq!(mgr.remaining_height(), 3);
    }

    #[test]
    fn foreign_region_is_rejected() {
        let mut a = ShelfManager::for_grid(Extent::new(4, 4));
        let mut b = ShelfManager::for_grid(Extent::new(4, 4));
        let r = a.allocate(Extent::new(1, 1)).unwrap();
        assert!(matches!(b.free(r), Err(PackError::UnknownRegion { .. })));
        assert_eq!(a.allocation_count(), 1);
    }

    #[test]
    fn foreign_region_with_colliding_id_and_rect_is_rejected() {
        let mut a = ShelfManager::for_grid(Extent::new(4, 4));
        let mut b = ShelfManager::for_grid(Extent::new(4, 4));
        let ra = a.allocate(Extent::new(2, 2)).unwrap();
        let rb = b.allocate(Extent::new(2, 2)).unwrap();
        assert_eq!((ra.id, ra.rect), (rb.id, rb.rect));

        assert!(matches!(b.free(ra), Err(PackError::UnknownRegion { .. })));
        assert_eq!(b.allocation_count(), 1);

        let next = b.allocate(Extent::new(2, 2)).unwrap();
        assert!(!next.rect().intersects(&rb.rect()));
        assert!(b.free(rb).is_ok());
        assert!(b.free(next).is_ok());
    }

    proptest! {
        #[test]
        fn live_regions_never_overlap(
            ops in proptest::collection::vec((1u32..6, 1u32..6, any::<bool>()), 1..60),
        ) {
            let grid = Extent::new(16, 16);
            let mut mgr = ShelfManager::for_grid(grid);
            let mut live: Vec<ShelfRegion> = Vec::new();
            for (w, h, release) in ops {
                if release && !live.is_empty() {
                    let r = live.swap_remove(0);
                    prop_assert!(mgr.free(r).is_ok());
                } else if let Some(r) = mgr.allocate(Extent::new(w, h)) {
                    live.push(r);
                }
                let rects: Vec<_> = live.iter().map(|r| r.rect()).collect();
                compliance::assert_disjoint_in_grid(&rects, grid);
                prop_assert_eq!(mgr.allocation_count(), live.len());
            }
        }
    }
}
