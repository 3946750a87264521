//! Benchmark profiles and workloads for the Tessella texture atlas.
//!
//! - [`glyph_profile`]: 1024x1024 single-channel atlas of small, similar
//!   sizes, the typical font cache shape
//! - [`sprite_profile`]: 2048x2048 RGBA atlas with a wide size spread
//! - [`request_sizes`]: deterministic request stream via seeded ChaCha

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tessella_atlas::AtlasConfig;
use tessella_core::{Extent, SurfaceDesc, TexelFormat};

/// Glyph cache profile: 1024x1024 `R8Unorm`, min alignment 4, grows one
/// slice at a time.
pub fn glyph_profile() -> AtlasConfig {
    let desc = SurfaceDesc::new("glyph bench", TexelFormat::R8Unorm, 1024, 1024);
    AtlasConfig::new(desc)
        .with_min_alignment(4)
        .with_slice_growth_increment(1)
}

/// Sprite profile: 2048x2048 `Rgba8Unorm`, default doubling growth.
pub fn sprite_profile() -> AtlasConfig {
    let desc = SurfaceDesc::new("sprite bench", TexelFormat::Rgba8Unorm, 2048, 2048)
        .with_array_size(1);
    AtlasConfig::new(desc).with_max_slice_count(256)
}

/// Generate `n` request sizes with sides in `1..=max_side`.
///
/// The same `seed` always yields the same stream.
pub fn request_sizes(n: usize, max_side: u32, seed: u64) -> Vec<Extent> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            Extent::new(
                rng.random_range(1..=max_side),
                rng.random_range(1..=max_side),
            )
        })
        .collect()
}
