//! Reference-counted suballocation handles.

use std::any::Any;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tessella_core::{Alignment, CellRect, Extent, Origin, PackedRegion, RegionManager, SliceIndex};

use crate::atlas::Atlas;

/// Opaque caller data attached to a [`Suballocation`].
pub type UserData = Arc<dyn Any + Send + Sync>;

/// A reserved region of an [`Atlas`].
///
/// Cloning shares the reservation. When the last clone is dropped the
/// region goes back to its slice and the atlas counters are updated.
/// Each handle keeps its atlas alive, so the atlas outlives every
/// suballocation it issued.
pub struct Suballocation<M: RegionManager, S> {
    lease: Arc<Lease<M, S>>,
}

struct Lease<M: RegionManager, S> {
    atlas: Arc<Atlas<M, S>>,
    slice: SliceIndex,
    alignment: Alignment,
    rect: CellRect,
    size: Extent,
    // Taken exactly once, on drop.
    region: Option<M::Region>,
    user_data: Mutex<Option<UserData>>,
}

impl<M: RegionManager, S> Suballocation<M, S> {
    pub(crate) fn new(
        atlas: Arc<Atlas<M, S>>,
        slice: SliceIndex,
        alignment: Alignment,
        region: M::Region,
        size: Extent,
    ) -> Self {
        Self {
            lease: Arc::new(Lease {
                atlas,
                slice,
                alignment,
                rect: region.rect(),
                size,
                region: Some(region),
                user_data: Mutex::new(None),
            }),
        }
    }

    /// Top-left pixel of the region within its slice.
    pub fn origin(&self) -> Origin {
        let a = self.lease.alignment.get();
        Origin::new(self.lease.rect.x * a, self.lease.rect.y * a)
    }

    /// Slice (array layer) holding the region.
    pub fn slice(&self) -> SliceIndex {
        self.lease.slice
    }

    /// Requested size in pixels.
    pub fn size(&self) -> Extent {
        self.lease.size
    }

    /// Alignment class the region was placed under.
    pub fn alignment(&self) -> Alignment {
        self.lease.alignment
    }

    /// The region in units of alignment cells.
    pub fn cell_rect(&self) -> CellRect {
        self.lease.rect
    }

    /// Reserved size in pixels, including alignment padding.
    pub fn padded_size(&self) -> Extent {
        let a = self.lease.alignment.get();
        Extent::new(self.lease.rect.width * a, self.lease.rect.height * a)
    }

    /// `[scale_u, scale_v, bias_u, bias_v]` mapping the unit square onto
    /// this region in normalized surface coordinates.
    pub fn uv_scale_bias(&self) -> [f32; 4] {
        let surface = self.lease.atlas.config().desc.extent();
        let (w, h) = (surface.width as f32, surface.height as f32);
        let origin = self.origin();
        [
            self.lease.size.width as f32 / w,
            self.lease.size.height as f32 / h,
            origin.x as f32 / w,
            origin.y as f32 / h,
        ]
    }

    /// The atlas this region belongs to.
    pub fn atlas(&self) -> &Arc<Atlas<M, S>> {
        &self.lease.atlas
    }

    /// Attach `data`, replacing whatever was attached before. Shared by
    /// all clones of this handle.
    pub fn set_user_data(&self, data: UserData) {
        *self.user_data_slot() = Some(data);
    }

    /// Detach and return the attached data.
    pub fn clear_user_data(&self) -> Option<UserData> {
        self.user_data_slot().take()
    }

    /// The attached data, if any.
    pub fn user_data(&self) -> Option<UserData> {
        self.user_data_slot().clone()
    }

    /// The attached data if it is a `T`.
    pub fn user_data_as<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.user_data()?.downcast::<T>().ok()
    }

    /// Number of live clones of this handle.
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.lease)
    }

    /// Whether `self` and `other` share one reservation.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.lease, &other.lease)
    }

    fn user_data_slot(&self) -> MutexGuard<'_, Option<UserData>> {
        self.lease
            .user_data
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl<M: RegionManager, S> Clone for Suballocation<M, S> {
    fn clone(&self) -> Self {
        Self {
            lease: Arc::clone(&self.lease),
        }
    }
}

impl<M: RegionManager, S> Drop for Lease<M, S> {
    fn drop(&mut self) {
        if let Some(region) = self.region.take() {
            self.atlas
                .release(self.slice, self.alignment, region, self.size);
        }
    }
}

impl<M: RegionManager, S> fmt::Debug for Suballocation<M, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Suballocation")
            .field("slice", &self.lease.slice)
            .field("origin", &self.origin())
            .field("size", &self.lease.size)
            .field("alignment", &self.lease.alignment)
            .finish()
    }
}
