//! Atlas configuration parameters.

use tessella_core::{SurfaceDesc, SurfaceDimension, TexelFormat};

use crate::error::ConfigError;

/// Configuration for an [`Atlas`](crate::Atlas).
///
/// Controls the backing surface, alignment granularity, and how the
/// slice table grows. Validated at construction; immutable afterwards.
#[derive(Clone, Debug)]
pub struct AtlasConfig {
    /// Backing surface description.
    ///
    /// `desc.array_size` is the initial layer count; the atlas grows
    /// past it on demand, up to the maximum slice count.
    pub desc: SurfaceDesc,

    /// Smallest alignment class, in pixels.
    ///
    /// Default: 0 (start from one pixel). When nonzero it must be a power
    /// of two that divides both surface dimensions.
    pub min_alignment: u32,

    /// Number of slices added when the slice table grows.
    ///
    /// Default: 0, meaning "double the current table length".
    pub slice_growth_increment: u32,

    /// Upper bound on the number of slices.
    ///
    /// Default: [`MAX_ARRAY_SLICES`](Self::MAX_ARRAY_SLICES). See
    /// [`effective_max_slice_count`](Self::effective_max_slice_count) for
    /// the bound actually applied.
    pub max_slice_count: u32,
}

impl AtlasConfig {
    /// Hard cap on slices for 2D-array surfaces.
    pub const MAX_ARRAY_SLICES: u32 = 2048;

    /// Create a config for `desc` with default values for everything else.
    pub fn new(desc: SurfaceDesc) -> Self {
        Self {
            desc,
            min_alignment: 0,
            slice_growth_increment: 0,
            max_slice_count: Self::MAX_ARRAY_SLICES,
        }
    }

    /// Set the minimum alignment.
    pub fn with_min_alignment(mut self, min_alignment: u32) -> Self {
        self.min_alignment = min_alignment;
        self
    }

    /// Set the slice growth increment.
    pub fn with_slice_growth_increment(mut self, increment: u32) -> Self {
        self.slice_growth_increment = increment;
        self
    }

    /// Set the maximum slice count.
    pub fn with_max_slice_count(mut self, max_slice_count: u32) -> Self {
        self.max_slice_count = max_slice_count;
        self
    }

    /// Slice cap after applying the surface dimensionality.
    ///
    /// 2D-array surfaces are capped at [`MAX_ARRAY_SLICES`](Self::MAX_ARRAY_SLICES);
    /// plain 2D surfaces always have exactly one slice.
    pub fn effective_max_slice_count(&self) -> u32 {
        if self.desc.dimension == SurfaceDimension::Tex2DArray {
            self.max_slice_count.min(Self::MAX_ARRAY_SLICES)
        } else {
            1
        }
    }

    /// Check all structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let desc = &self.desc;
        // 1. Only 2D layouts can be packed.
        if !desc.dimension.is_2d() {
            return Err(ConfigError::InvalidDimension {
                dimension: desc.dimension,
            });
        }
        // 2. Format must be set.
        if desc.format == TexelFormat::Unknown {
            return Err(ConfigError::UnknownFormat);
        }
        // 3. Non-degenerate surface.
        if desc.width == 0 {
            return Err(ConfigError::ZeroWidth);
        }
        if desc.height == 0 {
            return Err(ConfigError::ZeroHeight);
        }
        // 4. Minimum alignment, if set, must be a power of two that tiles
        //    the surface exactly.
        let min_alignment = self.min_alignment;
        if min_alignment != 0 {
            if !min_alignment.is_power_of_two() {
                return Err(ConfigError::MinAlignmentNotPowerOfTwo { min_alignment });
            }
            if desc.width % min_alignment != 0 {
                return Err(ConfigError::WidthNotAligned {
                    width: desc.width,
                    min_alignment,
                });
            }
            if desc.height % min_alignment != 0 {
                return Err(ConfigError::HeightNotAligned {
                    height: desc.height,
                    min_alignment,
                });
            }
        }
        Ok(())
    }
}
