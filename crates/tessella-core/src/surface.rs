//! Backing-surface descriptors and the growth capability.
//!
//! The atlas decides *when* its array surface must grow and *which*
//! layer/mip ranges must be migrated; actually creating a surface and
//! copying texels is delegated to a [`SurfaceBackend`].

use std::fmt;

use crate::error::SurfaceError;
use crate::format::TexelFormat;
use crate::geometry::Extent;

/// Dimensionality of a surface resource.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SurfaceDimension {
    /// One-dimensional texture.
    Tex1D,
    /// Array of one-dimensional textures.
    Tex1DArray,
    /// Single two-dimensional texture.
    Tex2D,
    /// Array of two-dimensional textures.
    #[default]
    Tex2DArray,
    /// Volume texture.
    Tex3D,
    /// Cube map.
    TexCube,
}

impl SurfaceDimension {
    /// Whether the dimension is `Tex2D` or `Tex2DArray`.
    pub fn is_2d(self) -> bool {
        matches!(self, Self::Tex2D | Self::Tex2DArray)
    }

    /// Whether the surface can hold more than one layer.
    pub fn is_array(self) -> bool {
        matches!(self, Self::Tex1DArray | Self::Tex2DArray)
    }
}

impl fmt::Display for SurfaceDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Tex1D => "1D",
            Self::Tex1DArray => "1D-array",
            Self::Tex2D => "2D",
            Self::Tex2DArray => "2D-array",
            Self::Tex3D => "3D",
            Self::TexCube => "cube",
        };
        f.write_str(s)
    }
}

/// Description of an array surface.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SurfaceDesc {
    /// Debug name carried into log output.
    pub name: String,
    /// Resource dimensionality.
    pub dimension: SurfaceDimension,
    /// Texel format.
    pub format: TexelFormat,
    /// Width of mip 0 in pixels.
    pub width: u32,
    /// Height of mip 0 in pixels.
    pub height: u32,
    /// Number of layers.
    pub array_size: u32,
    /// Number of mip levels. Zero is treated as one.
    pub mip_levels: u32,
}

impl SurfaceDesc {
    /// Name used when none is given.
    pub const DEFAULT_NAME: &'static str = "Dynamic texture atlas";

    /// A 2D-array descriptor with one mip level and zero layers.
    pub fn new(name: impl Into<String>, format: TexelFormat, width: u32, height: u32) -> Self {
        let name = name.into();
        Self {
            name: if name.is_empty() {
                Self::DEFAULT_NAME.to_string()
            } else {
                name
            },
            dimension: SurfaceDimension::Tex2DArray,
            format,
            width,
            height,
            array_size: 0,
            mip_levels: 1,
        }
    }

    /// Set the initial layer count.
    pub fn with_array_size(mut self, array_size: u32) -> Self {
        self.array_size = array_size;
        self
    }

    /// Set the mip level count.
    pub fn with_mip_levels(mut self, mip_levels: u32) -> Self {
        self.mip_levels = mip_levels;
        self
    }

    /// Set the dimensionality.
    pub fn with_dimension(mut self, dimension: SurfaceDimension) -> Self {
        self.dimension = dimension;
        self
    }

    /// Size of mip 0.
    pub fn extent(&self) -> Extent {
        Extent::new(self.width, self.height)
    }

    /// Effective mip count (at least one).
    pub fn mip_count(&self) -> u32 {
        self.mip_levels.max(1)
    }

    /// Size of mip level `mip`; each axis halves and bottoms out at 1.
    pub fn mip_extent(&self, mip: u32) -> Extent {
        let shrink = |v: u32| v.checked_shr(mip).unwrap_or(0).max(1);
        Extent::new(shrink(self.width), shrink(self.height))
    }

    /// Byte size of one layer of mip level `mip`.
    pub fn mip_bytes(&self, mip: u32) -> u64 {
        let e = self.mip_extent(mip);
        self.format.image_bytes(e.width, e.height)
    }

    /// Byte size of one layer across all mip levels.
    pub fn layer_bytes(&self) -> u64 {
        (0..self.mip_count()).map(|mip| self.mip_bytes(mip)).sum()
    }

    /// Byte size of all layers and mip levels.
    pub fn total_bytes(&self) -> u64 {
        self.layer_bytes() * u64::from(self.array_size)
    }
}

/// One layer/mip copy issued while migrating content to a grown surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LayerCopy {
    /// Layer read from the old surface.
    pub src_layer: u32,
    /// Mip level read from the old surface.
    pub src_mip: u32,
    /// Layer written in the new surface.
    pub dst_layer: u32,
    /// Mip level written in the new surface.
    pub dst_mip: u32,
}

impl LayerCopy {
    /// A copy of `layer`/`mip` to the same location in the destination.
    pub fn same_location(layer: u32, mip: u32) -> Self {
        Self {
            src_layer: layer,
            src_mip: mip,
            dst_layer: layer,
            dst_mip: mip,
        }
    }
}

/// Creates backing surfaces and copies layers between them.
///
/// Supplied by the caller of `Atlas::surface` (in `tessella-atlas`)
/// whenever the atlas may have gained slices since the previous call.
/// The atlas holds on to the returned `Surface` handles but never
/// inspects them.
pub trait SurfaceBackend {
    /// Handle to a created surface.
    type Surface: Clone;

    /// Create a surface matching `desc`.
    fn create_surface(&mut self, desc: &SurfaceDesc) -> Result<Self::Surface, SurfaceError>;

    /// Copy one layer/mip of `src` into `dst`.
    fn copy_layer(&mut self, src: &Self::Surface, dst: &Self::Surface, copy: LayerCopy);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_defaults() {
        let desc = SurfaceDesc::new("", TexelFormat::Rgba8Unorm, 256, 128);
        assert_eq!(desc.name, SurfaceDesc::DEFAULT_NAME);
        assert_eq!(desc.dimension, SurfaceDimension::Tex2DArray);
        assert_eq!(desc.array_size, 0);
        assert_eq!(desc.mip_levels, 1);
    }

    #[test]
    fn mip_extent_halves_and_clamps() {
        let desc = SurfaceDesc::new("a", TexelFormat::R8Unorm, 256, 64).with_mip_levels(9);
        assert_eq!(desc.mip_extent(0), Extent::new(256, 64));
        assert_eq!(desc.mip_extent(1), Extent::new(128, 32));
        assert_eq!(desc.mip_extent(6), Extent::new(4, 1));
        assert_eq!(desc.mip_extent(8), Extent::new(1, 1));
        assert_eq!(desc.mip_extent(40), Extent::new(1, 1));
    }

    #[test]
    fn total_bytes_sums_mips_times_layers() {
        let desc = SurfaceDesc::new("a", TexelFormat::Rgba8Unorm, 4, 4)
            .with_mip_levels(3)
            .with_array_size(2);
        // 4x4 + 2x2 + 1x1 texels, 4 bytes each.
        assert_eq!(desc.layer_bytes(), (16 + 4 + 1) * 4);
        assert_eq!(desc.total_bytes(), (16 + 4 + 1) * 4 * 2);
    }

    #[test]
    fn zero_mip_levels_counts_as_one() {
        let desc = SurfaceDesc::new("a", TexelFormat::R8Unorm, 8, 8).with_mip_levels(0);
        assert_eq!(desc.mip_count(), 1);
        assert_eq!(desc.layer_bytes(), 64);
    }

    #[test]
    fn dimension_predicates() {
        assert!(SurfaceDimension::Tex2D.is_2d());
        assert!(!SurfaceDimension::Tex2D.is_array());
        assert!(SurfaceDimension::Tex2DArray.is_array());
        assert!(!SurfaceDimension::TexCube.is_2d());
        assert_eq!(SurfaceDimension::Tex3D.to_string(), "3D");
    }
}
