//! Runtime component codec.
//!
//! The dynamic counterpart of [`Channel`](crate::Channel): components
//! are described by a [`Component`] value instead of a type, and read
//! from or written to raw pixel bytes at a bit offset.
//!
//! Bits are addressed LSB-first across the little-endian pixel, so a
//! byte aligned component at a byte offset reads exactly like a
//! little-endian integer, and a packed layout such as `r5g6b5` puts red
//! in the low five bits of the 16-bit element.
//!
//! Both directions produce the same numbers as the static codec for the
//! same form and width.

use crate::format::{Component, NumericForm, PixelFormat, MAX_COMPONENTS};
use crate::{Error, Result};
use half::f16;

/// Mask covering the low `bits` bits.
#[inline]
fn mask(bits: u32) -> u64 {
    if bits >= 64 { u64::MAX } else { (1u64 << bits) - 1 }
}

#[inline]
fn sign_extend(raw: u64, bits: u32) -> i64 {
    let shift = 64 - bits;
    ((raw << shift) as i64) >> shift
}

/// Checks that a codec exists for the component's form and width.
pub fn check_component(c: &Component) -> Result<()> {
    let ok = match c.form {
        NumericForm::Float => matches!(c.bits, 16 | 32 | 64),
        NumericForm::SignedNormalized => c.bits >= 2,
        NumericForm::FixedPoint | NumericForm::SignedFixedPoint => c.fraction_bits < 64,
        NumericForm::UnsignedNormalized | NumericForm::UnsignedInt | NumericForm::SignedInt => true,
    };
    if ok && (1..=64).contains(&c.bits) {
        Ok(())
    } else {
        Err(Error::unsupported_form(c.form.name(), c.bits))
    }
}

/// Reads `bits` bits starting at bit `offset`, LSB-first.
///
/// # Panics
///
/// Panics if the range runs past the end of `bytes`.
pub fn read_bits(bytes: &[u8], offset: u32, bits: u32) -> u64 {
    if offset % 8 == 0 && bits % 8 == 0 {
        let start = (offset / 8) as usize;
        return bytes[start..start + (bits / 8) as usize]
            .iter()
            .rev()
            .fold(0u64, |acc, &b| (acc << 8) | u64::from(b));
    }

    let mut value = 0u64;
    let mut done = 0;
    while done < bits {
        let pos = offset + done;
        let shift = pos % 8;
        let take = (8 - shift).min(bits - done);
        let chunk = (u64::from(bytes[(pos / 8) as usize]) >> shift) & mask(take);
        value |= chunk << done;
        done += take;
    }
    value
}

/// Writes the low `bits` bits of `value` starting at bit `offset`,
/// LSB-first, leaving the surrounding bits untouched.
///
/// # Panics
///
/// Panics if the range runs past the end of `out`.
pub fn write_bits(out: &mut [u8], offset: u32, bits: u32, value: u64) {
    let mut done = 0;
    while done < bits {
        let pos = offset + done;
        let shift = pos % 8;
        let take = (8 - shift).min(bits - done);
        let m = (mask(take) as u8) << shift;
        let chunk = (((value >> done) & mask(take)) as u8) << shift;
        let byte = &mut out[(pos / 8) as usize];
        *byte = (*byte & !m) | chunk;
        done += take;
    }
}

/// Maps a raw stored bit pattern to a real number.
pub fn decode_raw(c: &Component, raw: u64) -> Result<f64> {
    check_component(c)?;
    let raw = raw & mask(c.bits);
    let scale = || 2f64.powi(c.fraction_bits as i32);
    Ok(match c.form {
        NumericForm::UnsignedNormalized => raw as f64 / mask(c.bits) as f64,
        NumericForm::SignedNormalized => {
            let max = mask(c.bits - 1) as f64;
            (sign_extend(raw, c.bits) as f64 / max).max(-1.0)
        }
        NumericForm::UnsignedInt => raw as f64,
        NumericForm::SignedInt => sign_extend(raw, c.bits) as f64,
        NumericForm::Float => match c.bits {
            16 => f16::from_bits(raw as u16).to_f64(),
            32 => f64::from(f32::from_bits(raw as u32)),
            _ => f64::from_bits(raw),
        },
        NumericForm::FixedPoint => raw as f64 / scale(),
        NumericForm::SignedFixedPoint => sign_extend(raw, c.bits) as f64 / scale(),
    })
}

/// Maps a real number to the nearest storable bit pattern.
///
/// Integer forms round half away from zero and saturate; NaN becomes
/// zero. Float forms propagate NaN and infinities.
pub fn encode_raw(c: &Component, v: f64) -> Result<u64> {
    check_component(c)?;
    let bits = c.bits;
    let signed = |q: f64| {
        let hi = mask(bits - 1) as i64;
        let lo = -hi - 1;
        ((q as i64).clamp(lo, hi) as u64) & mask(bits)
    };
    let unsigned = |q: f64| (q as u64).min(mask(bits));
    let scale = || 2f64.powi(c.fraction_bits as i32);

    Ok(match c.form {
        NumericForm::UnsignedNormalized => {
            unsigned((v.clamp(0.0, 1.0) * mask(bits) as f64).round())
        }
        NumericForm::SignedNormalized => {
            signed((v.clamp(-1.0, 1.0) * mask(bits - 1) as f64).round())
        }
        NumericForm::UnsignedInt => unsigned(v.round()),
        NumericForm::SignedInt => signed(v.round()),
        NumericForm::Float => match bits {
            16 => u64::from(f16::from_f64(v).to_bits()),
            32 => u64::from((v as f32).to_bits()),
            _ => v.to_bits(),
        },
        NumericForm::FixedPoint => unsigned((v * scale()).round()),
        NumericForm::SignedFixedPoint => signed((v * scale()).round()),
    })
}

/// Decodes the component stored at bit `offset` of `pixel`.
#[inline]
pub fn decode_component(c: &Component, pixel: &[u8], offset: u32) -> Result<f64> {
    decode_raw(c, read_bits(pixel, offset, c.bits))
}

/// Encodes `v` into the component at bit `offset` of `out`.
#[inline]
pub fn encode_component(c: &Component, v: f64, out: &mut [u8], offset: u32) -> Result<()> {
    let raw = encode_raw(c, v)?;
    write_bits(out, offset, c.bits, raw);
    Ok(())
}

impl PixelFormat {
    /// Checks every component for codec support.
    pub fn check_codecs(&self) -> Result<()> {
        self.components().iter().try_for_each(check_component)
    }

    /// Decodes every component of one pixel to a real number.
    ///
    /// Works for any format, packed or not; this is the only access
    /// offered for non-operable formats. Entries past the component
    /// count are zero.
    pub fn decode_components(&self, pixel: &[u8]) -> Result<[f64; MAX_COMPONENTS]> {
        self.decode_components_at(pixel, 0)
    }

    /// Decodes the pixel starting `bit_offset` bits into `bytes`.
    ///
    /// Pixels of packed formats need not start on a byte boundary.
    pub fn decode_components_at(&self, bytes: &[u8], bit_offset: u64) -> Result<[f64; MAX_COMPONENTS]> {
        let start = (bit_offset / 8) as usize;
        let shift = (bit_offset % 8) as u32;
        let needed = start + (shift + self.bits_per_pixel()).div_ceil(8) as usize;
        if bytes.len() < needed {
            return Err(Error::buffer_too_small(needed, bytes.len()));
        }
        let pixel = &bytes[start..];
        let mut out = [0.0; MAX_COMPONENTS];
        for ((slot, c), offset) in out.iter_mut().zip(self.components()).zip(self.bit_offsets()) {
            *slot = decode_component(c, pixel, shift + offset)?;
        }
        Ok(out)
    }

    /// Encodes one value per component into `out`.
    ///
    /// Missing trailing values encode as zero.
    pub fn encode_components(&self, values: &[f64], out: &mut [u8]) -> Result<()> {
        let needed = self.bytes_per_pixel();
        if out.len() < needed {
            return Err(Error::buffer_too_small(needed, out.len()));
        }
        for (i, (c, offset)) in self.components().iter().zip(self.bit_offsets()).enumerate() {
            let v = values.get(i).copied().unwrap_or(0.0);
            encode_component(c, v, out, offset)?;
        }
        Ok(())
    }
}

/// One stored component of an erased pixel, tagged by storage type.
///
/// The tag is chosen from signedness and width only; the numeric form
/// (normalized, raw count or fixed point) comes from the owning
/// [`Component`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ComponentValue {
    /// 8-bit unsigned storage
    U8(u8),
    /// 16-bit unsigned storage
    U16(u16),
    /// 32-bit unsigned storage
    U32(u32),
    /// 64-bit unsigned storage
    U64(u64),
    /// 8-bit signed storage
    I8(i8),
    /// 16-bit signed storage
    I16(i16),
    /// 32-bit signed storage
    I32(i32),
    /// 64-bit signed storage
    I64(i64),
    /// Half float
    F16(f16),
    /// Single float
    F32(f32),
    /// Double float
    F64(f64),
}

impl ComponentValue {
    /// Wraps a raw bit pattern in the storage type of `c`.
    ///
    /// Fails with [`Error::UnsupportedNumericForm`] for widths that are
    /// not byte aligned.
    pub fn from_raw(c: &Component, raw: u64) -> Result<Self> {
        check_component(c)?;
        let float = c.form == NumericForm::Float;
        let signed = !float && c.form.is_signed();
        Ok(match (c.bits, float, signed) {
            (16, true, _) => Self::F16(f16::from_bits(raw as u16)),
            (32, true, _) => Self::F32(f32::from_bits(raw as u32)),
            (64, true, _) => Self::F64(f64::from_bits(raw)),
            (8, _, false) => Self::U8(raw as u8),
            (16, _, false) => Self::U16(raw as u16),
            (32, _, false) => Self::U32(raw as u32),
            (64, _, false) => Self::U64(raw),
            (8, _, true) => Self::I8(raw as u8 as i8),
            (16, _, true) => Self::I16(raw as u16 as i16),
            (32, _, true) => Self::I32(raw as u32 as i32),
            (64, _, true) => Self::I64(raw as i64),
            _ => return Err(Error::unsupported_form(c.form.name(), c.bits)),
        })
    }

    /// Encodes a real number into the storage type of `c`.
    #[inline]
    pub fn encode(c: &Component, v: f64) -> Result<Self> {
        Self::from_raw(c, encode_raw(c, v)?)
    }

    /// The stored bit pattern, zero extended.
    pub fn to_raw(self) -> u64 {
        match self {
            Self::U8(v) => u64::from(v),
            Self::U16(v) => u64::from(v),
            Self::U32(v) => u64::from(v),
            Self::U64(v) => v,
            Self::I8(v) => u64::from(v as u8),
            Self::I16(v) => u64::from(v as u16),
            Self::I32(v) => u64::from(v as u32),
            Self::I64(v) => v as u64,
            Self::F16(v) => u64::from(v.to_bits()),
            Self::F32(v) => u64::from(v.to_bits()),
            Self::F64(v) => v.to_bits(),
        }
    }

    /// Decodes the stored value as described by `c`.
    #[inline]
    pub fn decode(self, c: &Component) -> Result<f64> {
        decode_raw(c, self.to_raw())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::ComponentKind;
    use approx::assert_abs_diff_eq;

    fn comp(form: NumericForm, bits: u32) -> Component {
        Component::new(ComponentKind::R, form, bits)
    }

    #[test]
    fn test_bit_io_packed() {
        // r5g6b5: r=31, g=0, b=31
        let bytes = [0x1F, 0xF8];
        assert_eq!(read_bits(&bytes, 0, 5), 31);
        assert_eq!(read_bits(&bytes, 5, 6), 0);
        assert_eq!(read_bits(&bytes, 11, 5), 31);

        let mut out = [0u8; 2];
        write_bits(&mut out, 0, 5, 31);
        write_bits(&mut out, 11, 5, 31);
        assert_eq!(out, bytes);
    }

    #[test]
    fn test_aligned_read_is_little_endian() {
        let bytes = [0x34, 0x12, 0x78, 0x56];
        assert_eq!(read_bits(&bytes, 0, 16), 0x1234);
        assert_eq!(read_bits(&bytes, 16, 16), 0x5678);
        assert_eq!(read_bits(&bytes, 0, 32), 0x5678_1234);
    }

    #[test]
    fn test_unorm_matches_static_codec() {
        let c = comp(NumericForm::UnsignedNormalized, 8);
        assert_eq!(decode_raw(&c, 0x80).unwrap(), 128.0 / 255.0);
        assert_eq!(encode_raw(&c, 0.5).unwrap(), 128);
        assert_eq!(encode_raw(&c, 2.0).unwrap(), 255);
        assert_eq!(encode_raw(&c, f64::NAN).unwrap(), 0);
    }

    #[test]
    fn test_packed_unorm_widths() {
        let c = comp(NumericForm::UnsignedNormalized, 5);
        assert_eq!(decode_raw(&c, 31).unwrap(), 1.0);
        assert_eq!(encode_raw(&c, 1.0).unwrap(), 31);
        let a2 = comp(NumericForm::UnsignedNormalized, 2);
        assert_eq!(decode_raw(&a2, 1).unwrap(), 1.0 / 3.0);
    }

    #[test]
    fn test_snorm_extremes() {
        let c = comp(NumericForm::SignedNormalized, 8);
        assert_eq!(decode_raw(&c, 0x80).unwrap(), -1.0);
        assert_eq!(decode_raw(&c, 0x81).unwrap(), -1.0);
        assert_eq!(decode_raw(&c, 0x7F).unwrap(), 1.0);
        assert_eq!(encode_raw(&c, -1.0).unwrap(), 0x81);
        assert_eq!(encode_raw(&c, -9.0).unwrap(), 0x81);
        assert!(check_component(&comp(NumericForm::SignedNormalized, 1)).is_err());
    }

    #[test]
    fn test_int_saturates() {
        let u = comp(NumericForm::UnsignedInt, 8);
        assert_eq!(encode_raw(&u, 300.0).unwrap(), 255);
        assert_eq!(encode_raw(&u, -3.0).unwrap(), 0);
        let s = comp(NumericForm::SignedInt, 8);
        assert_eq!(encode_raw(&s, -300.0).unwrap(), 0x80);
        assert_eq!(decode_raw(&s, 0xFF).unwrap(), -1.0);
    }

    #[test]
    fn test_float_widths() {
        let h = comp(NumericForm::Float, 16);
        assert_eq!(decode_raw(&h, 0x3C00).unwrap(), 1.0);
        assert_eq!(encode_raw(&h, 0.5).unwrap(), 0x3800);
        let f = comp(NumericForm::Float, 32);
        assert!(decode_raw(&f, encode_raw(&f, f64::NAN).unwrap()).unwrap().is_nan());
        let bad = comp(NumericForm::Float, 8);
        assert!(matches!(
            decode_raw(&bad, 0),
            Err(Error::UnsupportedNumericForm { bits: 8, .. })
        ));
    }

    #[test]
    fn test_fixed_point() {
        let c = Component::fixed(ComponentKind::R, NumericForm::SignedFixedPoint, 16, 8);
        assert_eq!(decode_raw(&c, 0xFF80).unwrap(), -0.5);
        assert_eq!(encode_raw(&c, -0.5).unwrap(), 0xFF80);
    }

    #[test]
    fn test_decode_components_packed() {
        let fmt = PixelFormat::parse("rgb:r5g6b5").unwrap();
        let vals = fmt.decode_components(&[0x1F, 0xF8]).unwrap();
        assert_eq!(&vals[..3], &[1.0, 0.0, 1.0]);
        assert!(matches!(
            fmt.decode_components(&[0]),
            Err(Error::BufferTooSmall { needed: 2, got: 1 })
        ));
    }

    #[test]
    fn test_encode_components_roundtrip() {
        let fmt = PixelFormat::parse("rgb:r10g10b10a2").unwrap();
        let mut out = [0u8; 4];
        fmt.encode_components(&[1.0, 0.0, 0.5, 1.0], &mut out).unwrap();
        let back = fmt.decode_components(&out).unwrap();
        assert_eq!(back[0], 1.0);
        assert_eq!(back[1], 0.0);
        assert_abs_diff_eq!(back[2], 0.5, epsilon = 1.0 / 1023.0);
        assert_eq!(back[3], 1.0);
    }

    #[test]
    fn test_component_value_tags() {
        let c = comp(NumericForm::SignedNormalized, 8);
        let v = ComponentValue::encode(&c, -1.0).unwrap();
        assert_eq!(v, ComponentValue::I8(-127));
        assert_eq!(v.decode(&c).unwrap(), -1.0);

        let f = comp(NumericForm::Float, 32);
        assert_eq!(ComponentValue::encode(&f, 0.25).unwrap(), ComponentValue::F32(0.25));

        let packed = comp(NumericForm::UnsignedNormalized, 5);
        assert!(ComponentValue::from_raw(&packed, 3).is_err());
    }
}
