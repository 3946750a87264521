//! Strongly-typed identifiers: [`SliceIndex`] and [`Alignment`].

use std::fmt;

/// Index of one layer ("slice") of the atlas's array surface.
///
/// Slice indices are assigned once when a slice is created and are never
/// reused: slices are append-only for the lifetime of an atlas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SliceIndex(pub u32);

impl SliceIndex {
    /// The index as a `usize`, for indexing the slice table.
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for SliceIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for SliceIndex {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// A power-of-two grid granularity, in surface pixels.
///
/// Every allocation is padded up to a multiple of its alignment, and all
/// allocations sharing an alignment are packed into the same slices.
/// The inner value is always a nonzero power of two.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Alignment(u32);

impl Alignment {
    /// Alignment of one pixel: no padding.
    pub const ONE: Alignment = Alignment(1);

    /// Wrap `value` if it is a nonzero power of two.
    pub fn new(value: u32) -> Option<Self> {
        value.is_power_of_two().then_some(Self(value))
    }

    /// Resolve the alignment class for a `width` x `height` request.
    ///
    /// Starts at `min_alignment` (or 1 when it is 0) and doubles while the
    /// alignment is smaller than the shorter side of the request, so the
    /// result never exceeds twice the shorter side unless `min_alignment`
    /// already does. A pure function of its inputs.
    ///
    /// Returns `None` only if the doubled value would not fit in a `u32`,
    /// or if a nonzero `min_alignment` is not a power of two.
    pub fn resolve(min_alignment: u32, width: u32, height: u32) -> Option<Self> {
        let mut alignment = if min_alignment == 0 {
            1u64
        } else if min_alignment.is_power_of_two() {
            u64::from(min_alignment)
        } else {
            return None;
        };
        let shorter = u64::from(width.min(height));
        while alignment < shorter {
            alignment *= 2;
        }
        u32::try_from(alignment).ok().map(Self)
    }

    /// The alignment in pixels.
    pub fn get(self) -> u32 {
        self.0
    }

    /// Round `value` up to the next multiple of this alignment.
    ///
    /// Computed in 64-bit; the result can exceed `u32::MAX` for values
    /// near the top of the range.
    pub fn align_up(self, value: u32) -> u64 {
        let a = u64::from(self.0);
        u64::from(value).div_ceil(a) * a
    }

    /// Number of whole cells of this alignment that fit in `pixels`.
    pub fn cells_in(self, pixels: u32) -> u32 {
        pixels / self.0
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn new_rejects_zero_and_non_powers() {
        assert!(Alignment::new(0).is_none());
        assert!(Alignment::new(3).is_none());
        assert!(Alignment::new(96).is_none());
        assert_eq!(Alignment::new(64).map(Alignment::get), Some(64));
    }

    #[test]
    fn resolve_unset_minimum_doubles_to_shorter_side() {
        let a = Alignment::resolve(0, 64, 64).unwrap();
        assert_eq!(a.get(), 64);
        let a = Alignment::resolve(0, 200, 50).unwrap();
        assert_eq!(a.get(), 64);
    }

    #[test]
    fn resolve_keeps_minimum_for_small_requests() {
        let a = Alignment::resolve(16, 3, 5).unwrap();
        assert_eq!(a.get(), 16);
    }

    #[test]
    fn resolve_one_by_one_is_one() {
        assert_eq!(Alignment::resolve(0, 1, 1), Some(Alignment::ONE));
    }

    #[test]
    fn resolve_rejects_non_power_minimum() {
        assert!(Alignment::resolve(12, 64, 64).is_none());
    }

    #[test]
    fn resolve_near_u32_max_does_not_overflow() {
        let a = Alignment::resolve(0, u32::MAX, u32::MAX);
        assert!(a.is_none());
        let a = Alignment::resolve(0, 1 << 31, 1 << 31).unwrap();
        assert_eq!(a.get(), 1 << 31);
    }

    #[test]
    fn align_up_rounds_to_multiple() {
        let a = Alignment::new(64).unwrap();
        assert_eq!(a.align_up(1), 64);
        assert_eq!(a.align_up(64), 64);
        assert_eq!(a.align_up(200), 256);
        assert_eq!(a.cells_in(256), 4);
    }

    #[test]
    fn slice_index_display() {
        assert_eq!(SliceIndex(7).to_string(), "7");
        assert_eq!(SliceIndex::from(3).as_usize(), 3);
    }

    proptest! {
        #[test]
        fn resolve_is_pure_and_bounded(
            min_exp in prop::option::of(0u32..8),
            w in 1u32..4096,
            h in 1u32..4096,
        ) {
            let min = min_exp.map_or(0, |e| 1 << e);
            let first = Alignment::resolve(min, w, h).unwrap();
            let second = Alignment::resolve(min, w, h).unwrap();
            prop_assert_eq!(first, second);

            let shorter = w.min(h);
            let floor = min.max(1);
            prop_assert!(first.get() >= shorter || first.get() == floor);
            prop_assert!(first.get() >= floor);
            // Never more than one doubling past the shorter side.
            prop_assert!(first.get() == floor || first.get() / 2 < shorter);
        }
    }
}
