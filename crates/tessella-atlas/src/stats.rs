//! Usage counters and the statistics snapshot.

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

/// Point-in-time usage figures for an atlas.
///
/// Each field is read independently: under concurrent traffic a snapshot
/// may reflect an allocation in `allocated_area` that `allocation_count`
/// does not show yet. Good for telemetry, not for decisions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UsageStats {
    /// Pixel capacity of the current surface: width x height x layers.
    pub total_area: u64,
    /// Sum of requested (unpadded) areas of live suballocations.
    pub allocated_area: u64,
    /// Sum of padded areas actually reserved by live suballocations.
    pub used_area: u64,
    /// Number of live suballocations.
    pub allocation_count: u32,
    /// Byte footprint of the current surface across all mips and layers.
    pub total_byte_size: u64,
    /// Number of slices created so far.
    pub slice_count: u32,
}

impl UsageStats {
    /// `used_area / total_area`, or 0 for an empty surface.
    pub fn occupancy(&self) -> f64 {
        if self.total_area == 0 {
            0.0
        } else {
            self.used_area as f64 / self.total_area as f64
        }
    }

    /// Share of reserved area lost to alignment padding.
    pub fn padding_ratio(&self) -> f64 {
        if self.used_area == 0 {
            0.0
        } else {
            1.0 - self.allocated_area as f64 / self.used_area as f64
        }
    }
}

/// Atlas-wide atomic counters.
///
/// Updated without any surrounding lock. Every `release` pairs with an
/// earlier `record` for the same amounts, so the counters never wrap.
#[derive(Debug, Default)]
pub(crate) struct UsageCounters {
    allocated_area: AtomicU64,
    used_area: AtomicU64,
    allocation_count: AtomicU32,
}

impl UsageCounters {
    pub(crate) fn record(&self, allocated: u64, used: u64) {
        self.allocated_area.fetch_add(allocated, Ordering::Relaxed);
        self.used_area.fetch_add(used, Ordering::Relaxed);
        self.allocation_count.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn release(&self, allocated: u64, used: u64) {
        self.allocated_area.fetch_sub(allocated, Ordering::Relaxed);
        self.used_area.fetch_sub(used, Ordering::Relaxed);
        self.allocation_count.fetch_sub(1, Ordering::Relaxed);
    }

    pub(crate) fn allocated_area(&self) -> u64 {
        self.allocated_area.load(Ordering::Relaxed)
    }

    pub(crate) fn used_area(&self) -> u64 {
        self.used_area.load(Ordering::Relaxed)
    }

    pub(crate) fn allocation_count(&self) -> u32 {
        self.allocation_count.load(Ordering::Relaxed)
    }

    pub(crate) fn is_zero(&self) -> bool {
        self.allocated_area() == 0 && self.used_area() == 0 && self.allocation_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_then_release_returns_to_zero() {
        let c = UsageCounters::default();
        c.record(100, 256);
        c.record(1, 1);
        assert_eq!(c.allocated_area(), 101);
        assert_eq!(c.used_area(), 257);
        assert_eq!(c.allocation_count(), 2);
        c.release(1, 1);
        c.release(100, 256);
        assert!(c.is_zero());
    }

    #[test]
    fn ratios_handle_empty_atlas() {
        let s = UsageStats::default();
        assert_eq!(s.occupancy(), 0.0);
        assert_eq!(s.padding_ratio(), 0.0);
    }

    #[test]
    fn ratios() {
        let s = UsageStats {
            total_area: 1000,
            allocated_area: 150,
            used_area: 200,
            ..UsageStats::default()
        };
        assert!((s.occupancy() - 0.2).abs() < 1e-12);
        assert!((s.padding_ratio() - 0.25).abs() < 1e-12);
    }
}
