//! The atlas: slice placement, release, growth, and statistics.
//!
//! Two lock domains keep allocation traffic concurrent:
//!
//! 1. The **structural lock** guards the [`SliceTable`] (slice list,
//!    alignment buckets, next-unused counter). It is held only while
//!    looking up or creating a slice, never across a packing call.
//! 2. Each [`Slice`](crate::slice::Slice) has its own lock around its
//!    region manager. Traffic on different slices never contends.
//!
//! A third mutex guards the backing surface handle. It is only taken by
//! [`Atlas::surface`], which may briefly take the structural lock to
//! read the layer count; nothing takes them in the opposite order.

use std::fmt;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tessella_core::{
    Alignment, Extent, LayerCopy, PackedRegion, RegionManager, SliceIndex, SurfaceBackend,
    SurfaceDesc,
};

use crate::config::AtlasConfig;
use crate::error::{AllocError, ConfigError, GrowthError};
use crate::slice::SliceTable;
use crate::stats::{UsageCounters, UsageStats};
use crate::suballocation::Suballocation;

/// A dynamically growing 2D-array texture atlas.
///
/// Packs rectangular requests into the layers of one array surface.
/// Requests are bucketed by a power-of-two alignment class so that
/// similarly sized content shares slices, and new slices are created on
/// demand up to the configured maximum. The backing surface is grown
/// lazily by [`surface`](Self::surface).
///
/// `M` is the per-slice packing strategy and `S` the backend's surface
/// handle type. Atlases are always shared through `Arc`: every
/// [`Suballocation`] keeps its atlas alive until it has been released.
pub struct Atlas<M, S> {
    config: AtlasConfig,
    max_slices: u32,
    table: Mutex<SliceTable<M>>,
    surface: Mutex<Option<S>>,
    /// Layer count of the surface held in `surface`.
    surface_layers: AtomicU32,
    /// Mirror of the table's created-slice count.
    slices_created: AtomicU32,
    version: AtomicU64,
    counters: UsageCounters,
}

// Both locks protect data that is consistent between statements, so a
// panic elsewhere never leaves them half-updated.
fn relock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<M: RegionManager, S> Atlas<M, S> {
    /// Create an atlas without a backing surface.
    ///
    /// The first [`surface`](Self::surface) call that sees at least one
    /// layer creates it.
    pub fn new(config: AtlasConfig) -> Result<Arc<Self>, ConfigError> {
        Self::check(&config)?;
        Ok(Self::assemble(config, None))
    }

    /// Create an atlas and, if `config.desc.array_size` is nonzero, its
    /// initial surface. The version starts at 0 either way.
    pub fn with_backend<B>(config: AtlasConfig, backend: &mut B) -> Result<Arc<Self>, ConfigError>
    where
        B: SurfaceBackend<Surface = S>,
    {
        Self::check(&config)?;
        let surface = if config.desc.array_size > 0 {
            let surface = backend.create_surface(&config.desc).map_err(|e| {
                tracing::error!(atlas = %config.desc.name, error = %e, "failed to create atlas surface");
                ConfigError::from(e)
            })?;
            Some(surface)
        } else {
            None
        };
        Ok(Self::assemble(config, surface))
    }

    fn check(config: &AtlasConfig) -> Result<(), ConfigError> {
        config.validate().inspect_err(|e| {
            tracing::error!(atlas = %config.desc.name, error = %e, "invalid atlas configuration");
        })
    }

    fn assemble(config: AtlasConfig, surface: Option<S>) -> Arc<Self> {
        let surface_layers = if surface.is_some() {
            config.desc.array_size
        } else {
            0
        };
        Arc::new(Self {
            max_slices: config.effective_max_slice_count(),
            table: Mutex::new(SliceTable::new(config.desc.array_size)),
            surface: Mutex::new(surface),
            surface_layers: AtomicU32::new(surface_layers),
            slices_created: AtomicU32::new(0),
            version: AtomicU64::new(0),
            counters: UsageCounters::default(),
            config,
        })
    }

    /// The configuration this atlas was built from.
    pub fn config(&self) -> &AtlasConfig {
        &self.config
    }

    /// Slice cap after applying the surface dimensionality.
    pub fn max_slice_count(&self) -> u32 {
        self.max_slices
    }

    /// Reserve a `width` x `height` pixel region.
    ///
    /// The returned [`Suballocation`] releases the region when its last
    /// clone is dropped. On failure nothing is reserved and the usage
    /// counters are untouched.
    pub fn allocate(self: &Arc<Self>, width: u32, height: u32) -> Result<Suballocation<M, S>, AllocError> {
        let requested = Extent::new(width, height);
        let surface = self.config.desc.extent();

        if requested.is_empty() {
            tracing::error!(width, height, "suballocation size must not be zero");
            return Err(AllocError::ZeroSize { requested });
        }
        if !surface.contains(requested) {
            return Err(self.reject(AllocError::ExceedsSurface { requested, surface }));
        }

        let Some(alignment) = Alignment::resolve(self.config.min_alignment, width, height) else {
            return Err(self.reject(AllocError::ExceedsSliceGrid {
                requested,
                alignment: None,
            }));
        };
        let grid = Extent::new(alignment.cells_in(surface.width), alignment.cells_in(surface.height));
        let cells = Extent::new(width.div_ceil(alignment.get()), height.div_ceil(alignment.get()));
        if !grid.contains(cells) {
            return Err(self.reject(AllocError::ExceedsSliceGrid {
                requested,
                alignment: Some(alignment),
            }));
        }

        let mut candidate = 0u32;
        let placed = loop {
            if candidate >= self.max_slices {
                break None;
            }
            let slice = {
                let mut table = relock(&self.table);
                let slice = table.slice_for(
                    alignment,
                    candidate,
                    grid,
                    self.config.slice_growth_increment,
                    self.max_slices,
                );
                self.slices_created.store(table.created(), Ordering::Release);
                slice
            };
            let Some(slice) = slice else {
                break None;
            };
            if let Some(region) = slice.allocate(cells) {
                break Some((slice.index(), region));
            }
            candidate = slice.index().0 + 1;
        };

        let Some((index, region)) = placed else {
            return Err(self.reject(AllocError::NoSpace {
                requested,
                max_slices: self.max_slices,
            }));
        };

        let padded = alignment.align_up(width) * alignment.align_up(height);
        self.counters.record(requested.area(), padded);
        Ok(Suballocation::new(
            Arc::clone(self),
            index,
            alignment,
            region,
            requested,
        ))
    }

    fn reject(&self, error: AllocError) -> AllocError {
        tracing::error!(atlas = %self.config.desc.name, %error, "atlas suballocation failed");
        error
    }

    /// Return a region to its slice. Called once per suballocation, from
    /// the last handle's drop.
    pub(crate) fn release(
        &self,
        slice: SliceIndex,
        alignment: Alignment,
        region: M::Region,
        requested: Extent,
    ) {
        let rect = region.rect();
        let a = alignment.get();
        let padded = Extent::new(rect.width * a, rect.height * a).area();
        self.counters.release(requested.area(), padded);

        let owner = {
            let table = relock(&self.table);
            debug_assert!(
                table.buckets().contains(alignment, slice),
                "slice {slice} does not use alignment {alignment}"
            );
            table.get(slice)
        };
        let result = match owner {
            Some(owner) => owner.free(region).map_err(|e| e.to_string()),
            None => Err(format!("slice {slice} was never created")),
        };
        if let Err(reason) = result {
            tracing::error!(slice = slice.0, %rect, %reason, "rejected atlas free");
            debug_assert!(false, "rejected atlas free of {rect} in slice {slice}: {reason}");
        }
    }

    /// Number of times the backing surface has been replaced.
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::Acquire)
    }

    /// Logical layer count: the length of the slice table.
    ///
    /// May exceed [`surface_layer_count`](Self::surface_layer_count) until
    /// the next [`surface`](Self::surface) call grows the surface.
    pub fn layer_count(&self) -> u32 {
        relock(&self.table).layer_count()
    }

    /// Layer count of the surface currently held.
    pub fn surface_layer_count(&self) -> u32 {
        self.surface_layers.load(Ordering::Acquire)
    }

    /// Whether the next [`surface`](Self::surface) call will grow.
    pub fn needs_growth(&self) -> bool {
        self.layer_count() != self.surface_layer_count()
    }

    /// Descriptor of the surface currently held.
    pub fn desc(&self) -> SurfaceDesc {
        let mut desc = self.config.desc.clone();
        desc.array_size = self.surface_layer_count();
        desc
    }

    /// Slices dedicated to `alignment`, in increasing order.
    pub fn slices_for(&self, alignment: Alignment) -> Vec<SliceIndex> {
        relock(&self.table).buckets().slices(alignment).to_vec()
    }

    /// Live regions in slice `index`, or `None` if it was never created.
    pub fn slice_allocation_count(&self, index: SliceIndex) -> Option<usize> {
        let slice = relock(&self.table).get(index)?;
        Some(slice.allocation_count())
    }

    /// Usage figures from independent atomic loads.
    pub fn usage_stats(&self) -> UsageStats {
        let desc = self.desc();
        let layers = u64::from(desc.array_size);
        UsageStats {
            total_area: desc.extent().area() * layers,
            allocated_area: self.counters.allocated_area(),
            used_area: self.counters.used_area(),
            allocation_count: self.counters.allocation_count(),
            total_byte_size: desc.total_bytes(),
            slice_count: self.slices_created.load(Ordering::Acquire),
        }
    }
}

impl<M: RegionManager, S: Clone> Atlas<M, S> {
    /// The surface currently held, without attempting to grow.
    pub fn current_surface(&self) -> Option<S> {
        relock(&self.surface).clone()
    }

    /// The backing surface, grown first if slices were added since the
    /// last call.
    ///
    /// Growth creates a surface with the new layer count, asks `backend`
    /// to copy every existing layer and mip level across, swaps it in and
    /// bumps the [`version`](Self::version) by one. If the backend fails
    /// to create the surface, the old surface and version are kept.
    ///
    /// Growth is not transactional with respect to concurrent callers;
    /// call this from one render/update context.
    ///
    /// Returns `Ok(None)` while the atlas has zero layers.
    pub fn surface<B>(&self, backend: Option<&mut B>) -> Result<Option<S>, GrowthError>
    where
        B: SurfaceBackend<Surface = S>,
    {
        let mut current = relock(&self.surface);
        let required = self.layer_count();
        let layers = self.surface_layer_count();
        if required == layers {
            return Ok(current.clone());
        }

        let Some(backend) = backend else {
            tracing::error!(
                atlas = %self.config.desc.name,
                surface_layers = layers,
                required_layers = required,
                "atlas surface must grow but no backend was supplied"
            );
            return Err(GrowthError::BackendRequired {
                surface_layers: layers,
                required_layers: required,
            });
        };

        let old_desc = self.desc();
        let mut new_desc = old_desc.clone();
        new_desc.array_size = required;
        let grown = backend.create_surface(&new_desc).map_err(|e| {
            tracing::error!(atlas = %new_desc.name, layers = required, error = %e, "atlas surface growth failed");
            GrowthError::from(e)
        })?;

        if let Some(old) = current.as_ref() {
            for layer in 0..old_desc.array_size {
                for mip in 0..old_desc.mip_count() {
                    backend.copy_layer(old, &grown, LayerCopy::same_location(layer, mip));
                }
            }
        }

        *current = Some(grown.clone());
        self.surface_layers.store(required, Ordering::Release);
        let version = self.version.fetch_add(1, Ordering::AcqRel) + 1;

        tracing::info!(
            atlas = %new_desc.name,
            width = new_desc.width,
            height = new_desc.height,
            mip_levels = new_desc.mip_count(),
            format = %new_desc.format,
            layers = required,
            version,
            "expanded atlas surface"
        );
        Ok(Some(grown))
    }
}

impl<M, S> Drop for Atlas<M, S> {
    fn drop(&mut self) {
        // Suballocations hold the atlas alive, so by now every one of
        // them has been released.
        debug_assert!(
            self.counters.is_zero(),
            "atlas dropped with live usage: area {} used {} count {}",
            self.counters.allocated_area(),
            self.counters.used_area(),
            self.counters.allocation_count()
        );
    }
}

impl<M, S> fmt::Debug for Atlas<M, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Atlas")
            .field("name", &self.config.desc.name)
            .field("extent", &self.config.desc.extent())
            .field("surface_layers", &self.surface_layers.load(Ordering::Relaxed))
            .field("version", &self.version.load(Ordering::Relaxed))
            .field("allocation_count", &self.counters.allocation_count())
            .finish()
    }
}
