//! Statically typed channel codecs.
//!
//! [`Channel`] is the compile-time half of the component codec: each
//! implementing type fixes a [`NumericForm`] and bit width, and maps its
//! stored value to and from an `f64`.
//!
//! | Type | Form | Decoded range |
//! |------|------|---------------|
//! | `u8`, `u16`, `u32`, `u64` | unsigned normalized | `[0, 1]` |
//! | `i8`, `i16`, `i32`, `i64` | signed normalized | `[-1, 1]` |
//! | [`f16`], `f32`, `f64` | float | unbounded |
//! | [`Raw<T>`] | unsigned/signed int | the stored count |
//! | [`Fixed<T, F>`] | fixed point | `v / 2^F` |
//!
//! All codecs are pure. Encoding rounds half away from zero and clamps
//! to the representable range; NaN encodes to zero for integer storage
//! and propagates through float storage.
//!
//! ```
//! use tinct_core::Channel;
//!
//! assert_eq!(0x80u8.decode(), 128.0 / 255.0);
//! assert_eq!(u8::encode(0.5), 128);
//! assert_eq!(i8::encode(-2.0), -127);
//! assert_eq!((-128i8).decode(), -1.0);
//! ```

use crate::format::{Component, ComponentKind, NumericForm};
use half::f16;
use std::fmt;

/// A stored channel type with a fixed numeric form.
pub trait Channel: Copy + Default + PartialEq + fmt::Debug + Send + Sync + 'static {
    /// Numeric form of the stored value.
    const FORM: NumericForm;

    /// Width in bits.
    const BITS: u32;

    /// Fraction bits for fixed point types.
    const FRACTION_BITS: u32 = 0;

    /// Maps the stored value to a real number.
    fn decode(self) -> f64;

    /// Maps a real number to the nearest storable value.
    fn encode(v: f64) -> Self;

    /// Writes the value little-endian into the first `BITS / 8` bytes.
    ///
    /// # Panics
    ///
    /// Panics if `out` is shorter than the channel.
    fn write_le(self, out: &mut [u8]);

    /// Reads a little-endian value from the first `BITS / 8` bytes.
    ///
    /// # Panics
    ///
    /// Panics if `bytes` is shorter than the channel.
    fn read_le(bytes: &[u8]) -> Self;

    /// The codec zero value.
    #[inline]
    fn zero() -> Self {
        Self::default()
    }

    /// Size of the stored value in bytes.
    #[inline]
    fn size() -> usize {
        (Self::BITS / 8) as usize
    }

    /// Runtime component descriptor for a channel of this type.
    #[inline]
    fn component(kind: ComponentKind) -> Component {
        Component::fixed(kind, Self::FORM, Self::BITS, Self::FRACTION_BITS)
    }
}

macro_rules! le_bytes {
    ($t:ty) => {
        #[inline]
        fn write_le(self, out: &mut [u8]) {
            out[..std::mem::size_of::<$t>()].copy_from_slice(&self.to_le_bytes());
        }

        #[inline]
        fn read_le(bytes: &[u8]) -> Self {
            let mut buf = [0u8; std::mem::size_of::<$t>()];
            buf.copy_from_slice(&bytes[..std::mem::size_of::<$t>()]);
            <$t>::from_le_bytes(buf)
        }
    };
}

macro_rules! unorm_channel {
    ($($t:ty),*) => {$(
        impl Channel for $t {
            const FORM: NumericForm = NumericForm::UnsignedNormalized;
            const BITS: u32 = <$t>::BITS;

            #[inline]
            fn decode(self) -> f64 {
                self as f64 / <$t>::MAX as f64
            }

            #[inline]
            fn encode(v: f64) -> Self {
                (v.clamp(0.0, 1.0) * <$t>::MAX as f64).round() as $t
            }

            le_bytes!($t);
        }
    )*};
}

macro_rules! snorm_channel {
    ($($t:ty),*) => {$(
        impl Channel for $t {
            const FORM: NumericForm = NumericForm::SignedNormalized;
            const BITS: u32 = <$t>::BITS;

            // The most negative stored value has no positive counterpart;
            // it decodes to -1 like its neighbour.
            #[inline]
            fn decode(self) -> f64 {
                (self as f64 / <$t>::MAX as f64).max(-1.0)
            }

            #[inline]
            fn encode(v: f64) -> Self {
                (v.clamp(-1.0, 1.0) * <$t>::MAX as f64).round() as $t
            }

            le_bytes!($t);
        }
    )*};
}

unorm_channel!(u8, u16, u32, u64);
snorm_channel!(i8, i16, i32, i64);

impl Channel for f16 {
    const FORM: NumericForm = NumericForm::Float;
    const BITS: u32 = 16;

    #[inline]
    fn decode(self) -> f64 {
        self.to_f64()
    }

    #[inline]
    fn encode(v: f64) -> Self {
        f16::from_f64(v)
    }

    le_bytes!(f16);
}

impl Channel for f32 {
    const FORM: NumericForm = NumericForm::Float;
    const BITS: u32 = 32;

    #[inline]
    fn decode(self) -> f64 {
        f64::from(self)
    }

    #[inline]
    fn encode(v: f64) -> Self {
        v as f32
    }

    le_bytes!(f32);
}

impl Channel for f64 {
    const FORM: NumericForm = NumericForm::Float;
    const BITS: u32 = 64;

    #[inline]
    fn decode(self) -> f64 {
        self
    }

    #[inline]
    fn encode(v: f64) -> Self {
        v
    }

    le_bytes!(f64);
}

/// A raw integer count, stored without normalization.
///
/// Used for exponent and mantissa channels of shared-exponent formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Raw<T>(pub T);

macro_rules! raw_channel {
    ($form:expr => $($t:ty),*) => {$(
        impl Channel for Raw<$t> {
            const FORM: NumericForm = $form;
            const BITS: u32 = <$t>::BITS;

            #[inline]
            fn decode(self) -> f64 {
                self.0 as f64
            }

            #[inline]
            fn encode(v: f64) -> Self {
                Raw(v.round() as $t)
            }

            #[inline]
            fn write_le(self, out: &mut [u8]) {
                self.0.write_le(out)
            }

            #[inline]
            fn read_le(bytes: &[u8]) -> Self {
                Raw(<$t>::read_le(bytes))
            }
        }
    )*};
}

raw_channel!(NumericForm::UnsignedInt => u8, u16, u32, u64);
raw_channel!(NumericForm::SignedInt => i8, i16, i32, i64);

/// A fixed point value with `F` fraction bits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Fixed<T, const F: u32>(pub T);

macro_rules! fixed_channel {
    ($form:expr => $($t:ty),*) => {$(
        impl<const F: u32> Channel for Fixed<$t, F> {
            const FORM: NumericForm = $form;
            const BITS: u32 = <$t>::BITS;
            const FRACTION_BITS: u32 = F;

            #[inline]
            fn decode(self) -> f64 {
                self.0 as f64 / 2f64.powi(F as i32)
            }

            #[inline]
            fn encode(v: f64) -> Self {
                Fixed((v * 2f64.powi(F as i32)).round() as $t)
            }

            #[inline]
            fn write_le(self, out: &mut [u8]) {
                self.0.write_le(out)
            }

            #[inline]
            fn read_le(bytes: &[u8]) -> Self {
                Fixed(<$t>::read_le(bytes))
            }
        }
    )*};
}

fixed_channel!(NumericForm::FixedPoint => u8, u16, u32, u64);
fixed_channel!(NumericForm::SignedFixedPoint => i8, i16, i32, i64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unorm_extremes() {
        assert_eq!(0u8.decode(), 0.0);
        assert_eq!(255u8.decode(), 1.0);
        assert_eq!(u16::MAX.decode(), 1.0);
        assert_eq!(u64::MAX.decode(), 1.0);
        assert_eq!(u64::encode(1.0), u64::MAX);
    }

    #[test]
    fn test_unorm_rounds_and_clamps() {
        assert_eq!(u8::encode(0.5), 128);
        assert_eq!(u8::encode(1.5), 255);
        assert_eq!(u8::encode(-0.2), 0);
        assert_eq!(u8::encode(f64::NAN), 0);
        assert_eq!(u16::encode(f64::INFINITY), u16::MAX);
    }

    #[test]
    fn test_snorm_asymmetric_extreme() {
        assert_eq!(127i8.decode(), 1.0);
        assert_eq!((-127i8).decode(), -1.0);
        assert_eq!((-128i8).decode(), -1.0);
        assert_eq!(i8::encode(-1.0), -127);
        assert_eq!(i8::encode(-5.0), -127);
        assert_eq!(i16::encode(0.5), 16384);
    }

    #[test]
    fn test_float_propagates_non_finite() {
        assert!(f32::encode(f64::NAN).is_nan());
        assert_eq!(f32::encode(f64::INFINITY), f32::INFINITY);
        assert!(f16::encode(f64::NEG_INFINITY).is_infinite());
        assert_eq!(f16::from_f32(0.5).decode(), 0.5);
    }

    #[test]
    fn test_raw_is_identity() {
        assert_eq!(Raw(200u8).decode(), 200.0);
        assert_eq!(Raw::<u8>::encode(300.0), Raw(255));
        assert_eq!(Raw::<i16>::encode(-7.4), Raw(-7));
        assert_eq!(<Raw<u8> as Channel>::FORM, NumericForm::UnsignedInt);
    }

    #[test]
    fn test_fixed_point() {
        assert_eq!(Fixed::<u16, 8>(0x0180).decode(), 1.5);
        assert_eq!(Fixed::<u16, 8>::encode(2.25), Fixed(0x0240));
        assert_eq!(Fixed::<i16, 4>::encode(-1.0), Fixed(-16));
        assert_eq!(<Fixed<i16, 4> as Channel>::FRACTION_BITS, 4);
        assert_eq!(<Fixed<i16, 4> as Channel>::FORM, NumericForm::SignedFixedPoint);
    }

    #[test]
    fn test_le_roundtrip() {
        let mut buf = [0u8; 8];
        0x1234u16.write_le(&mut buf);
        assert_eq!(&buf[..2], &[0x34, 0x12]);
        assert_eq!(u16::read_le(&buf), 0x1234);
        (-2.5f32).write_le(&mut buf);
        assert_eq!(f32::read_le(&buf), -2.5);
    }
}
