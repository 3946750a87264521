//! Texel formats and their storage footprint.

use std::fmt;

/// Pixel storage format of the backing surface.
///
/// The atlas never reads texel data; the format only feeds validation
/// (it must not be [`Unknown`](TexelFormat::Unknown)), the byte-size
/// figure in usage statistics, and log output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TexelFormat {
    /// Unset format. Rejected by atlas configuration.
    #[default]
    Unknown,
    /// 8-bit single channel.
    R8Unorm,
    /// 8-bit two channel.
    Rg8Unorm,
    /// 8-bit RGBA.
    Rgba8Unorm,
    /// 8-bit RGBA, sRGB encoded.
    Rgba8UnormSrgb,
    /// 8-bit BGRA.
    Bgra8Unorm,
    /// 16-bit float single channel.
    R16Float,
    /// 16-bit float RGBA.
    Rgba16Float,
    /// 32-bit float single channel.
    R32Float,
    /// 32-bit float RGBA.
    Rgba32Float,
    /// BC1 block compression (4x4 blocks, 8 bytes each).
    Bc1Unorm,
    /// BC3 block compression (4x4 blocks, 16 bytes each).
    Bc3Unorm,
    /// BC7 block compression (4x4 blocks, 16 bytes each).
    Bc7Unorm,
}

impl TexelFormat {
    /// Bytes occupied by one block (one texel for uncompressed formats).
    pub fn block_bytes(self) -> u32 {
        match self {
            Self::Unknown => 0,
            Self::R8Unorm => 1,
            Self::Rg8Unorm | Self::R16Float => 2,
            Self::Rgba8Unorm | Self::Rgba8UnormSrgb | Self::Bgra8Unorm | Self::R32Float => 4,
            Self::Rgba16Float | Self::Bc1Unorm => 8,
            Self::Rgba32Float | Self::Bc3Unorm | Self::Bc7Unorm => 16,
        }
    }

    /// Edge length, in texels, of one storage block.
    pub fn block_dim(self) -> u32 {
        match self {
            Self::Bc1Unorm | Self::Bc3Unorm | Self::Bc7Unorm => 4,
            _ => 1,
        }
    }

    /// Whether this format is block compressed.
    pub fn is_compressed(self) -> bool {
        self.block_dim() > 1
    }

    /// Byte size of a `width` x `height` image in this format.
    pub fn image_bytes(self, width: u32, height: u32) -> u64 {
        let dim = self.block_dim();
        let blocks_x = u64::from(width.div_ceil(dim));
        let blocks_y = u64::from(height.div_ceil(dim));
        blocks_x * blocks_y * u64::from(self.block_bytes())
    }

    /// Short human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Unknown => "UNKNOWN",
            Self::R8Unorm => "R8_UNORM",
            Self::Rg8Unorm => "RG8_UNORM",
            Self::Rgba8Unorm => "RGBA8_UNORM",
            Self::Rgba8UnormSrgb => "RGBA8_UNORM_SRGB",
            Self::Bgra8Unorm => "BGRA8_UNORM",
            Self::R16Float => "R16_FLOAT",
            Self::Rgba16Float => "RGBA16_FLOAT",
            Self::R32Float => "R32_FLOAT",
            Self::Rgba32Float => "RGBA32_FLOAT",
            Self::Bc1Unorm => "BC1_UNORM",
            Self::Bc3Unorm => "BC3_UNORM",
            Self::Bc7Unorm => "BC7_UNORM",
        }
    }
}

impl fmt::Display for TexelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
