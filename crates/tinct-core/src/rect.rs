//! Crop regions for [`ImageView`](crate::ImageView).
//!
//! Coordinates are in pixels with the origin at the top-left; `x` grows
//! right and `y` grows down.
//!
//! ```rust
//! use tinct_core::Rect;
//!
//! let roi = Rect::new(2, 1, 4, 3);
//! assert_eq!((roi.right(), roi.bottom()), (6, 4));
//! assert!(roi.fits_within(6, 4));
//! assert!(!roi.fits_within(5, 4));
//! ```

use std::fmt;

/// A pixel region: origin plus extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    /// Left column
    pub x: u32,
    /// Top row
    pub y: u32,
    /// Columns covered
    pub width: u32,
    /// Rows covered
    pub height: u32,
}

impl Rect {
    /// Region at `(x, y)` of `width` x `height` pixels.
    #[inline]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Whole-image region.
    #[inline]
    pub const fn full(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// One past the last column, widened so it cannot overflow.
    #[inline]
    pub const fn right(&self) -> u64 {
        self.x as u64 + self.width as u64
    }

    /// One past the last row.
    #[inline]
    pub const fn bottom(&self) -> u64 {
        self.y as u64 + self.height as u64
    }

    /// Number of pixels covered.
    #[inline]
    pub const fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// No pixels covered.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Whether the region lies inside a `width` x `height` image.
    #[inline]
    pub const fn fits_within(&self, width: u32, height: u32) -> bool {
        self.right() <= width as u64 && self.bottom() <= height as u64
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}+{}+{}", self.width, self.height, self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges_do_not_overflow() {
        let r = Rect::new(u32::MAX, 0, 1, 1);
        assert_eq!(r.right(), u32::MAX as u64 + 1);
        assert!(!r.fits_within(u32::MAX, 1));
    }

    #[test]
    fn test_fits_within() {
        assert!(Rect::full(4, 3).fits_within(4, 3));
        assert!(!Rect::new(1, 0, 4, 3).fits_within(4, 3));
        assert!(Rect::new(0, 0, 0, 3).is_empty());
        assert_eq!(Rect::new(1, 1, 2, 3).pixel_count(), 6);
    }

    #[test]
    fn test_display() {
        assert_eq!(Rect::new(1, 2, 3, 4).to_string(), "3x4+1+2");
    }
}
