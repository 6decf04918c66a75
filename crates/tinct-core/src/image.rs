//! Image buffer geometry and non-owning image views.
//!
//! This module provides:
//! - [`Geometry`] - Block size, row pitch and byte length of a buffer
//! - [`FormatRegistry`] - Maps a format family to its geometry callback
//! - [`ImageView`] - Borrowed window into raw pixel bytes
//!
//! # Memory Layout
//!
//! Images store pixels in **row-major** order, top-to-bottom. Rows are
//! `row_pitch` bytes apart; a row holds `ceil(width * bits_per_pixel / 8)`
//! bytes of pixel data followed by optional padding:
//!
//! ```text
//! offset ─► [px px px px .. pad]  ← Row 0
//!           [px px px px .. pad]  ← Row 1
//!           ...
//! ```
//!
//! # Views
//!
//! Views never own pixel data. Cropping only moves the start offset and
//! shrinks the extent; the bytes are shared with the parent view.
//! Metadata is likewise a borrowed slice that crop carries along
//! untouched; callers drop or replace it explicitly with
//! [`ImageView::strip_metadata`] and [`ImageView::with_metadata`].
//!
//! ```rust
//! use tinct_core::{ImageView, PixelFormat, Rect};
//!
//! let fmt = PixelFormat::parse("rgb:r8g8b8").unwrap();
//! let data: Vec<u8> = (0..4 * 4 * 3).map(|i| i as u8).collect();
//! let view = ImageView::new(&data, fmt, 4, 4).unwrap();
//!
//! let roi = view.crop(Rect::new(1, 1, 2, 2)).unwrap();
//! assert_eq!(roi.dimensions(), (2, 2));
//! assert_eq!(roi.pixel_bytes(0, 0), Some(&data[15..18]));
//! ```
//!
//! # Dependencies
//!
//! - [`crate::format::PixelFormat`] - per-pixel bit layout
//! - [`crate::rect::Rect`] - crop regions
//! - [`crate::error::Error`] - geometry errors
//!
//! # Used By
//!
//! - `tinct-color` - whole-image conversion
//! - `tinct-cli` - `inspect` geometry output

use crate::format::{Family, PixelFormat, MAX_COMPONENTS};
use crate::{Error, Rect, Result};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Buffer geometry for one format at a given size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Geometry {
    /// Bits per block (one pixel for uncompressed families)
    pub bits_per_block: u32,
    /// Block width in pixels
    pub block_width: u32,
    /// Block height in pixels
    pub block_height: u32,
    /// Bytes per row of blocks, `ceil(width * bits_per_block / 8)`
    pub row_pitch: usize,
    /// Total bytes, `row_pitch * height`
    pub byte_len: usize,
}

impl Geometry {
    /// Tightly packed geometry of a `width` x `height` image in `format`.
    pub fn for_format(format: &PixelFormat, width: u32, height: u32) -> Self {
        let bits = format.bits_per_pixel();
        let row_pitch = (u64::from(width) * u64::from(bits)).div_ceil(8) as usize;
        Self {
            bits_per_block: bits,
            block_width: 1,
            block_height: 1,
            row_pitch,
            byte_len: row_pitch.saturating_mul(height as usize),
        }
    }
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} bits/block, {}x{} block, pitch {} B, {} B total",
            self.bits_per_block, self.block_width, self.block_height, self.row_pitch, self.byte_len
        )
    }
}

/// Geometry callback: format string, width, height.
pub type GeometryFn = fn(&str, u32, u32) -> Result<Geometry>;

fn family_geometry(family: Family) -> impl Fn(&str, u32, u32) -> Result<Geometry> {
    move |format, width, height| {
        let fmt = PixelFormat::parse(format)?;
        if *fmt.family() != family {
            return Err(Error::parse(format, format!("not a {family} format")));
        }
        Ok(Geometry::for_format(&fmt, width, height))
    }
}

fn rgb_geometry(format: &str, width: u32, height: u32) -> Result<Geometry> {
    family_geometry(Family::Rgb)(format, width, height)
}

fn xyz_geometry(format: &str, width: u32, height: u32) -> Result<Geometry> {
    family_geometry(Family::Xyz)(format, width, height)
}

/// Registry of geometry callbacks keyed by format family.
///
/// The default registry knows `"rgb"` and `"xyz"`. Other families can be
/// added with [`register`](Self::register).
///
/// ```rust
/// use tinct_core::FormatRegistry;
///
/// let reg = FormatRegistry::default();
/// let g = reg.geometry("rgb:r5g6b5", 3, 2).unwrap();
/// assert_eq!(g.row_pitch, 6);
/// assert!(reg.geometry("yuv:r8g8b8", 3, 2).unwrap_err().is_unsupported());
/// ```
#[derive(Clone)]
pub struct FormatRegistry {
    families: HashMap<String, GeometryFn>,
}

impl FormatRegistry {
    /// Creates a registry with no families.
    pub fn empty() -> Self {
        Self {
            families: HashMap::new(),
        }
    }

    /// Registers (or replaces) the geometry callback of a family.
    pub fn register(&mut self, family: impl Into<String>, geometry: GeometryFn) {
        self.families.insert(family.into(), geometry);
    }

    /// Whether a family is registered.
    pub fn contains(&self, family: &str) -> bool {
        self.families.contains_key(family)
    }

    /// Registered family keys, sorted.
    pub fn families(&self) -> Vec<&str> {
        let mut keys: Vec<_> = self.families.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// Geometry of a `width` x `height` buffer in `format`.
    ///
    /// Fails with [`Error::UnsupportedFormatFamily`] when the family is not
    /// registered, and with the callback's error when the string is not a
    /// valid format of that family.
    pub fn geometry(&self, format: &str, width: u32, height: u32) -> Result<Geometry> {
        let (family, _) = format
            .split_once(':')
            .ok_or_else(|| Error::parse(format, "missing family prefix"))?;
        let callback = self
            .families
            .get(family)
            .ok_or_else(|| Error::unsupported_family(family))?;
        callback(format, width, height)
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        let mut reg = Self::empty();
        reg.register("rgb", rgb_geometry);
        reg.register("xyz", xyz_geometry);
        reg
    }
}

impl fmt::Debug for FormatRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormatRegistry")
            .field("families", &self.families())
            .finish()
    }
}

/// Immutable borrowed view of raw pixel bytes.
///
/// Cloning a view copies only its geometry and an [`Arc`] to the format.
#[derive(Clone)]
pub struct ImageView<'a> {
    data: &'a [u8],
    format: Arc<PixelFormat>,
    width: u32,
    height: u32,
    row_pitch: usize,
    /// Byte offset of the first pixel within `data`
    offset: usize,
    metadata: Option<&'a [u8]>,
}

impl<'a> ImageView<'a> {
    /// Creates a tightly packed view over `data`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidDimensions`] for a zero-sized image and
    /// [`Error::BufferTooSmall`] if `data` cannot hold it.
    pub fn new(data: &'a [u8], format: PixelFormat, width: u32, height: u32) -> Result<Self> {
        let pitch = Geometry::for_format(&format, width, height).row_pitch;
        Self::with_pitch(data, format, width, height, pitch)
    }

    /// Creates a view whose rows are `row_pitch` bytes apart.
    pub fn with_pitch(
        data: &'a [u8],
        format: PixelFormat,
        width: u32,
        height: u32,
        row_pitch: usize,
    ) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::invalid_dimensions(width, height, "empty image"));
        }
        let min_pitch = Geometry::for_format(&format, width, height).row_pitch;
        if row_pitch < min_pitch {
            return Err(Error::invalid_dimensions(
                width,
                height,
                format!("row pitch {row_pitch} below {min_pitch}"),
            ));
        }
        let needed = row_pitch
            .checked_mul(height as usize - 1)
            .and_then(|n| n.checked_add(min_pitch))
            .ok_or_else(|| {
                Error::invalid_dimensions(width, height, format!("row pitch {row_pitch} overflows"))
            })?;
        if data.len() < needed {
            return Err(Error::buffer_too_small(needed, data.len()));
        }
        Ok(Self {
            data,
            format: Arc::new(format),
            width,
            height,
            row_pitch,
            offset: 0,
            metadata: None,
        })
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns (width, height).
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Number of pixels.
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Pixel format of the view.
    #[inline]
    pub fn format(&self) -> &PixelFormat {
        &self.format
    }

    /// Bytes between row starts.
    #[inline]
    pub fn row_pitch(&self) -> usize {
        self.row_pitch
    }

    /// Byte offset of the first pixel in the underlying buffer.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Pixel bytes of row `y`, without trailing pitch padding.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    pub fn row(&self, y: u32) -> &'a [u8] {
        assert!(y < self.height, "row {y} out of bounds");
        let start = self.offset + y as usize * self.row_pitch;
        let len = (u64::from(self.width) * u64::from(self.format.bits_per_pixel())).div_ceil(8) as usize;
        &self.data[start..start + len]
    }

    /// Rows top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &'a [u8]> + '_ {
        (0..self.height).map(move |y| self.row(y))
    }

    /// Bytes of the pixel at (x, y).
    ///
    /// Returns `None` outside the view or when pixels are not a whole
    /// number of bytes.
    pub fn pixel_bytes(&self, x: u32, y: u32) -> Option<&'a [u8]> {
        let bits = self.format.bits_per_pixel();
        if x >= self.width || y >= self.height || bits % 8 != 0 {
            return None;
        }
        let size = (bits / 8) as usize;
        let start = x as usize * size;
        Some(&self.row(y)[start..start + size])
    }

    /// Decodes every component of the pixel at (x, y).
    ///
    /// Works for packed formats too.
    pub fn decode_pixel(&self, x: u32, y: u32) -> Result<[f64; MAX_COMPONENTS]> {
        if x >= self.width || y >= self.height {
            return Err(Error::invalid_region(x, y, 1, 1, self.width, self.height));
        }
        let bit = u64::from(x) * u64::from(self.format.bits_per_pixel());
        self.format.decode_components_at(self.row(y), bit)
    }

    /// Returns a view of a sub-region.
    ///
    /// No pixel data is copied; the start offset and extent change and
    /// metadata is carried over unchanged.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidRegion`] if the region is empty, exceeds the view,
    /// or starts at a pixel that is not byte addressable (packed formats).
    pub fn crop(&self, region: Rect) -> Result<ImageView<'a>> {
        let bits = u64::from(self.format.bits_per_pixel());
        let start_bit = u64::from(region.x) * bits;
        if region.is_empty() || !region.fits_within(self.width, self.height) || start_bit % 8 != 0 {
            return Err(Error::invalid_region(
                region.x,
                region.y,
                region.width,
                region.height,
                self.width,
                self.height,
            ));
        }
        Ok(ImageView {
            data: self.data,
            format: Arc::clone(&self.format),
            width: region.width,
            height: region.height,
            row_pitch: self.row_pitch,
            offset: self.offset + region.y as usize * self.row_pitch + (start_bit / 8) as usize,
            metadata: self.metadata,
        })
    }

    /// Attached metadata, if any.
    #[inline]
    pub fn metadata(&self) -> Option<&'a [u8]> {
        self.metadata
    }

    /// Attaches borrowed metadata, replacing any previous attachment.
    #[must_use]
    pub fn with_metadata(mut self, metadata: &'a [u8]) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Drops the metadata attachment.
    #[must_use]
    pub fn strip_metadata(mut self) -> Self {
        self.metadata = None;
        self
    }
}

impl fmt::Debug for ImageView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageView")
            .field("format", &self.format.to_string())
            .field("width", &self.width)
            .field("height", &self.height)
            .field("row_pitch", &self.row_pitch)
            .field("offset", &self.offset)
            .field("metadata", &self.metadata.map(<[u8]>::len))
            .finish()
    }
}
