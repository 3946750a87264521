//! Integer geometry in pixels and in alignment-grid cells.

use std::fmt;

/// A width x height pair.
///
/// Used both for pixel sizes (requests, surface dimensions) and for cell
/// counts handed to a [`RegionManager`](crate::RegionManager).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Extent {
    /// Horizontal size.
    pub width: u32,
    /// Vertical size.
    pub height: u32,
}

impl Extent {
    /// Create a new extent.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// `width * height`, widened so it cannot overflow.
    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Whether either side is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Whether `other` fits inside `self` on both axes.
    pub fn contains(&self, other: Extent) -> bool {
        other.width <= self.width && other.height <= self.height
    }
}

impl fmt::Display for Extent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Top-left corner of a sub-region, in surface pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Origin {
    /// Horizontal offset from the left edge.
    pub x: u32,
    /// Vertical offset from the top edge.
    pub y: u32,
}

impl Origin {
    /// Create a new origin.
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// A rectangle of whole grid cells inside one slice.
///
/// Produced by region managers; the atlas multiplies by the slice's
/// alignment to get pixel coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CellRect {
    /// Left column.
    pub x: u32,
    /// Top row.
    pub y: u32,
    /// Width in cells.
    pub width: u32,
    /// Height in cells.
    pub height: u32,
}

impl CellRect {
    /// Create a new cell rectangle.
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Size of the rectangle in cells.
    pub fn extent(&self) -> Extent {
        Extent::new(self.width, self.height)
    }

    /// One past the rightmost column.
    pub fn right(&self) -> u64 {
        u64::from(self.x) + u64::from(self.width)
    }

    /// One past the bottom row.
    pub fn bottom(&self) -> u64 {
        u64::from(self.y) + u64::from(self.height)
    }

    /// Whether the two rectangles share at least one cell.
    ///
    /// Empty rectangles intersect nothing.
    pub fn intersects(&self, other: &CellRect) -> bool {
        if self.extent().is_empty() || other.extent().is_empty() {
            return false;
        }
        u64::from(self.x) < other.right()
            && u64::from(other.x) < self.right()
            && u64::from(self.y) < other.bottom()
            && u64::from(other.y) < self.bottom()
    }

    /// Whether the rectangle lies fully inside a `grid`-sized area
    /// anchored at the origin.
    pub fn fits_within(&self, grid: Extent) -> bool {
        self.right() <= u64::from(grid.width) && self.bottom() <= u64::from(grid.height)
    }
}

impl fmt::Display for CellRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}; {}x{}]",
            self.x, self.y, self.width, self.height
        )
    }
}
