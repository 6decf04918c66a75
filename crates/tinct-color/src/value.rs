//! Pixel values bound to a runtime format.

use crate::layout::ChannelMap;
use std::fmt;
use tinct_core::codec::{read_bits, write_bits};
use tinct_core::{ComponentKind, ComponentValue, Error, MAX_COMPONENTS, PixelFormat, Result};
use tinct_math::Vec3;
use tinct_primaries::ColorSpaceRegistry;

/// A pixel of a runtime [`PixelFormat`], one tagged value per component.
///
/// Only operable formats can hold values; bit-packed formats are read
/// through [`PixelFormat::decode_components`] instead.
///
/// ```rust
/// use tinct_color::PixelValue;
/// use tinct_core::{ComponentKind, ComponentValue, PixelFormat};
///
/// let fmt = PixelFormat::parse("rgb:b8g8r8a8").unwrap();
/// let px = PixelValue::read(&fmt, &[0x00, 0x80, 0xFF, 0x40]).unwrap();
/// assert_eq!(px.get(ComponentKind::R), Some(ComponentValue::U8(0xFF)));
/// assert_eq!(px.tristimulus().unwrap(), [1.0, 128.0 / 255.0, 0.0]);
///
/// let packed = PixelFormat::parse("rgb:r5g6b5").unwrap();
/// assert!(PixelValue::read(&packed, &[0, 0]).is_err());
/// ```
#[derive(Clone, PartialEq)]
pub struct PixelValue<'f> {
    format: &'f PixelFormat,
    values: [ComponentValue; MAX_COMPONENTS],
}

impl<'f> PixelValue<'f> {
    fn check(format: &PixelFormat) -> Result<()> {
        format.ensure_operable()?;
        format.check_codecs()
    }

    /// Encodes decoded component values, in storage order.
    ///
    /// Missing trailing values encode as zero.
    pub fn new(format: &'f PixelFormat, decoded: &[f64]) -> Result<Self> {
        Self::check(format)?;
        let mut values = [ComponentValue::U8(0); MAX_COMPONENTS];
        for (i, (slot, c)) in values.iter_mut().zip(format.components()).enumerate() {
            *slot = ComponentValue::encode(c, decoded.get(i).copied().unwrap_or(0.0))?;
        }
        Ok(Self { format, values })
    }

    /// Reads one pixel from bytes.
    pub fn read(format: &'f PixelFormat, bytes: &[u8]) -> Result<Self> {
        Self::check(format)?;
        let needed = format.bytes_per_pixel();
        if bytes.len() < needed {
            return Err(Error::buffer_too_small(needed, bytes.len()));
        }
        let mut values = [ComponentValue::U8(0); MAX_COMPONENTS];
        for ((slot, c), offset) in values
            .iter_mut()
            .zip(format.components())
            .zip(format.bit_offsets())
        {
            *slot = ComponentValue::from_raw(c, read_bits(bytes, offset, c.bits))?;
        }
        Ok(Self { format, values })
    }

    /// Builds a value from real `[r, g, b, a]` using the built-in spaces.
    ///
    /// Luminance, if the format has it, is derived with the luma weights
    /// of the format's color space.
    pub fn from_rgba(format: &'f PixelFormat, rgba: [f64; 4]) -> Result<Self> {
        Self::from_rgba_in(format, rgba, ColorSpaceRegistry::global())
    }

    /// Like [`from_rgba`](Self::from_rgba) with a caller-supplied
    /// registry.
    pub fn from_rgba_in(
        format: &'f PixelFormat,
        rgba: [f64; 4],
        registry: &ColorSpaceRegistry,
    ) -> Result<Self> {
        Self::check(format)?;
        let map = ChannelMap::from_components(format.components());
        let weights = match format.color_space_id() {
            Some(id) if map.has_luma() => registry.resolve(&id)?.luma_weights(),
            _ => Vec3::ZERO,
        };
        let mut decoded = [0.0; MAX_COMPONENTS];
        map.pack(rgba, weights, &mut decoded);
        Self::new(format, &decoded)
    }

    /// The format this value belongs to.
    #[inline]
    pub fn format(&self) -> &'f PixelFormat {
        self.format
    }

    /// Stored components in storage order.
    #[inline]
    pub fn values(&self) -> &[ComponentValue] {
        &self.values[..self.format.components().len()]
    }

    /// The stored component of `kind`, if present.
    pub fn get(&self, kind: ComponentKind) -> Option<ComponentValue> {
        self.format.position(kind).map(|i| self.values[i])
    }

    /// Every component decoded, in storage order.
    pub fn decode(&self) -> Result<[f64; MAX_COMPONENTS]> {
        let mut out = [0.0; MAX_COMPONENTS];
        for ((slot, v), c) in out.iter_mut().zip(self.values()).zip(self.format.components()) {
            *slot = v.decode(c)?;
        }
        Ok(out)
    }

    /// Decoded `(r, g, b)` regardless of storage order.
    pub fn tristimulus(&self) -> Result<[f64; 3]> {
        let [r, g, b, _] = self.tristimulus_with_alpha()?;
        Ok([r, g, b])
    }

    /// Decoded `(r, g, b, a)`; alpha is zero if the format has none.
    pub fn tristimulus_with_alpha(&self) -> Result<[f64; 4]> {
        let map = ChannelMap::from_components(self.format.components());
        Ok(map.unpack(&self.decode()?))
    }

    /// Writes the pixel into `out`.
    pub fn write(&self, out: &mut [u8]) -> Result<()> {
        let needed = self.format.bytes_per_pixel();
        if out.len() < needed {
            return Err(Error::buffer_too_small(needed, out.len()));
        }
        self.store(out);
        Ok(())
    }

    /// The pixel as a new byte vector.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = vec![0u8; self.format.bytes_per_pixel()];
        self.store(&mut out);
        out
    }

    fn store(&self, out: &mut [u8]) {
        for ((v, c), offset) in self
            .values()
            .iter()
            .zip(self.format.components())
            .zip(self.format.bit_offsets())
        {
            write_bits(out, offset, c.bits, v.to_raw());
        }
    }
}

impl fmt::Debug for PixelValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PixelValue")
            .field("format", &self.format.to_string())
            .field("values", &self.values())
            .finish()
    }
}
