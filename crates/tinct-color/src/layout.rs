//! Channel layouts and canonical RGBA unpacking.
//!
//! A [`Layout`] is a zero-sized marker naming an ordered list of
//! component kinds, the static counterpart of the component list in a
//! [`PixelFormat`](tinct_core::PixelFormat). [`ChannelMap`] finds R, G,
//! B, alpha, luminance and a shared exponent in such a list, and moves
//! decoded values between storage order and canonical `[r, g, b, a]`.
//!
//! Both conversion engines go through the same map, so a static value
//! and an erased pixel of the same format unpack identically.
//!
//! # Layouts
//!
//! | Marker | Kinds |
//! |--------|-------|
//! | [`Rgb`], [`Rgba`] | r g b (a) |
//! | [`Bgr`], [`Bgra`] | b g r (a) |
//! | [`Argb`], [`Abgr`] | alpha first |
//! | [`Rgbx`], [`Bgrx`] | trailing padding |
//! | [`Luma`], [`LumaAlpha`] | greyscale |
//! | [`Rgbe`] | r g b + shared exponent |
//! | [`LumaExp`] | luminance mantissa + shared exponent |
//!
//! # Shared Exponent
//!
//! With an exponent `E` of `ebits` bits and mantissas of `mbits` bits,
//! a mantissa count `m` decodes to `m * 2^(E - bias - mbits)` where
//! `bias = 2^(ebits - 1)`. `E = 0` decodes to zero regardless of the
//! mantissas.

use std::fmt;
use tinct_core::{Component, ComponentKind, MAX_COMPONENTS};
use tinct_math::Vec3;

/// An ordered list of component kinds known at compile time.
pub trait Layout: Copy + Default + fmt::Debug + Send + Sync + 'static {
    /// Component kinds in storage order.
    const KINDS: &'static [ComponentKind];

    /// Short lowercase name, e.g. `"bgra"`.
    const NAME: &'static str;
}

macro_rules! layout {
    ($(#[$meta:meta])* $ty:ident, $name:literal, [$($kind:ident),+ $(,)?]) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
        pub struct $ty;

        impl Layout for $ty {
            const KINDS: &'static [ComponentKind] = &[$(ComponentKind::$kind),+];
            const NAME: &'static str = $name;
        }
    };
}

layout!(
    /// Red, green, blue.
    Rgb, "rgb", [R, G, B]
);
layout!(
    /// Red, green, blue, alpha.
    Rgba, "rgba", [R, G, B, A]
);
layout!(
    /// Blue, green, red.
    Bgr, "bgr", [B, G, R]
);
layout!(
    /// Blue, green, red, alpha.
    Bgra, "bgra", [B, G, R, A]
);
layout!(
    /// Alpha, red, green, blue.
    Argb, "argb", [A, R, G, B]
);
layout!(
    /// Alpha, blue, green, red.
    Abgr, "abgr", [A, B, G, R]
);
layout!(
    /// Red, green, blue, padding.
    Rgbx, "rgbx", [R, G, B, Padding]
);
layout!(
    /// Blue, green, red, padding.
    Bgrx, "bgrx", [B, G, R, Padding]
);
layout!(
    /// Luminance only.
    Luma, "l", [Luminance]
);
layout!(
    /// Luminance, alpha.
    LumaAlpha, "la", [Luminance, A]
);
layout!(
    /// Red, green, blue mantissas and a shared exponent.
    Rgbe, "rgbe", [R, G, B, Exponent]
);
layout!(
    /// Luminance mantissa and exponent.
    LumaExp, "me", [Mantissa, Exponent]
);

/// Positions of the canonical channels within a component list.
///
/// CIE X, Y and Z occupy the red, green and blue slots, so XYZ formats
/// unpack through the same map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelMap {
    len: usize,
    rgb: [Option<usize>; 3],
    alpha: Option<usize>,
    luma: Option<usize>,
    exponent: Option<(usize, u32)>,
    mantissa_bits: u32,
}

impl ChannelMap {
    /// Builds a map from `(kind, bits)` pairs in storage order.
    pub fn new(components: impl IntoIterator<Item = (ComponentKind, u32)>) -> Self {
        let mut map = Self {
            len: 0,
            rgb: [None; 3],
            alpha: None,
            luma: None,
            exponent: None,
            mantissa_bits: 0,
        };
        for (i, (kind, bits)) in components.into_iter().enumerate().take(MAX_COMPONENTS) {
            map.len = i + 1;
            let slot = match kind {
                ComponentKind::R | ComponentKind::X => &mut map.rgb[0],
                ComponentKind::G | ComponentKind::Y => &mut map.rgb[1],
                ComponentKind::B | ComponentKind::Z => &mut map.rgb[2],
                ComponentKind::A => &mut map.alpha,
                ComponentKind::Luminance | ComponentKind::Mantissa => &mut map.luma,
                ComponentKind::Exponent => {
                    map.exponent = Some((i, bits));
                    continue;
                }
                ComponentKind::Padding => continue,
            };
            if slot.is_none() {
                *slot = Some(i);
                if map.mantissa_bits == 0 && kind != ComponentKind::A {
                    map.mantissa_bits = bits;
                }
            }
        }
        map
    }

    /// Map of a runtime component list.
    pub fn from_components(components: &[Component]) -> Self {
        Self::new(components.iter().map(|c| (c.kind, c.bits)))
    }

    /// Map of a static layout whose components are all `bits` wide.
    pub fn for_layout<L: Layout>(bits: u32) -> Self {
        Self::new(L::KINDS.iter().map(|&kind| (kind, bits)))
    }

    /// Number of components, padding included.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the list is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether any of R, G or B is present.
    #[inline]
    pub fn has_rgb(&self) -> bool {
        self.rgb.iter().any(Option::is_some)
    }

    /// Whether an alpha channel is present.
    #[inline]
    pub fn has_alpha(&self) -> bool {
        self.alpha.is_some()
    }

    /// Whether a luminance (or luminance mantissa) channel is present.
    #[inline]
    pub fn has_luma(&self) -> bool {
        self.luma.is_some()
    }

    /// Whether the list uses a shared exponent.
    #[inline]
    pub fn has_exponent(&self) -> bool {
        self.exponent.is_some()
    }

    /// Whether values go straight into their slots, with no luminance to
    /// derive and no exponent to share.
    #[inline]
    pub fn is_direct(&self) -> bool {
        self.luma.is_none() && self.exponent.is_none()
    }

    /// Decoded storage-order values to canonical `[r, g, b, a]`.
    ///
    /// A missing color channel takes the luminance, or zero without
    /// one. Missing alpha is zero.
    pub fn unpack(&self, values: &[f64]) -> [f64; 4] {
        let at = |pos: Option<usize>| pos.and_then(|i| values.get(i).copied());
        let scale = match self.exponent {
            Some((i, ebits)) => {
                decode_scale(values.get(i).copied().unwrap_or(0.0), ebits, self.mantissa_bits)
            }
            None => 1.0,
        };
        let luma = at(self.luma).unwrap_or(0.0);

        let mut out = [0.0; 4];
        for (slot, pos) in out.iter_mut().zip(self.rgb) {
            *slot = at(pos).unwrap_or(luma) * scale;
        }
        out[3] = at(self.alpha).unwrap_or(0.0);
        out
    }

    /// Canonical `[r, g, b, a]` to storage-order values.
    ///
    /// Luminance is `weights . (r, g, b)` over the values as given.
    /// Padding is zero.
    pub fn pack(&self, rgba: [f64; 4], weights: Vec3, out: &mut [f64; MAX_COMPONENTS]) {
        *out = [0.0; MAX_COMPONENTS];
        let rgb = [rgba[0], rgba[1], rgba[2]];
        let luma = if self.luma.is_some() {
            weights.dot(Vec3::from_array(rgb))
        } else {
            0.0
        };

        let inv = match self.exponent {
            Some((i, ebits)) => {
                let peak = if self.has_rgb() {
                    rgb.iter()
                        .zip(self.rgb)
                        .filter(|(_, pos)| pos.is_some())
                        .fold(0.0, |acc: f64, (v, _)| acc.max(*v))
                } else {
                    luma
                };
                let (e, scale) = encode_exponent(peak, ebits, self.mantissa_bits);
                out[i] = e;
                if scale > 0.0 { 1.0 / scale } else { 0.0 }
            }
            None => 1.0,
        };

        for (v, pos) in rgb.into_iter().zip(self.rgb) {
            if let Some(i) = pos {
                out[i] = v * inv;
            }
        }
        if let Some(i) = self.luma {
            out[i] = luma * inv;
        }
        if let Some(i) = self.alpha {
            out[i] = rgba[3];
        }
    }
}

#[inline]
fn exponent_bias(ebits: u32) -> f64 {
    (f64::from(ebits) - 1.0).exp2()
}

#[inline]
fn scale_for(e: f64, bias: f64, mbits: u32) -> f64 {
    (e - bias - f64::from(mbits)).exp2()
}

fn decode_scale(e: f64, ebits: u32, mbits: u32) -> f64 {
    if e == 0.0 {
        0.0
    } else {
        scale_for(e, exponent_bias(ebits), mbits)
    }
}

/// Smallest exponent whose scale keeps `peak` within `mbits` bits.
///
/// Returns the stored exponent and its scale; `(0, 0)` for values that
/// are not positive.
fn encode_exponent(peak: f64, ebits: u32, mbits: u32) -> (f64, f64) {
    if peak.is_nan() || peak <= 0.0 {
        return (0.0, 0.0);
    }
    let bias = exponent_bias(ebits);
    let max_e = f64::from(ebits).exp2() - 1.0;
    let mut e = (peak.log2().floor() + 1.0 + bias).clamp(1.0, max_e);
    if (peak / scale_for(e, bias, mbits)).round() >= f64::from(mbits).exp2() && e < max_e {
        e += 1.0;
    }
    (e, scale_for(e, bias, mbits))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const REC709: Vec3 = Vec3::new(0.2126, 0.7152, 0.0722);

    #[test]
    fn test_bgra_positions() {
        let map = ChannelMap::for_layout::<Bgra>(8);
        assert_eq!(map.len(), 4);
        assert_eq!(map.unpack(&[0.1, 0.2, 0.3, 0.4]), [0.3, 0.2, 0.1, 0.4]);

        let mut out = [0.0; MAX_COMPONENTS];
        map.pack([0.3, 0.2, 0.1, 0.4], REC709, &mut out);
        assert_eq!(&out[..4], &[0.1, 0.2, 0.3, 0.4]);
    }

    #[test]
    fn test_missing_alpha_and_padding() {
        let map = ChannelMap::for_layout::<Rgbx>(8);
        assert!(!map.has_alpha());
        assert_eq!(map.unpack(&[1.0, 0.5, 0.25, 0.9]), [1.0, 0.5, 0.25, 0.0]);

        let mut out = [9.0; MAX_COMPONENTS];
        map.pack([1.0, 0.5, 0.25, 1.0], REC709, &mut out);
        assert_eq!(&out[..4], &[1.0, 0.5, 0.25, 0.0]);
    }

    #[test]
    fn test_luma_replicates() {
        let map = ChannelMap::for_layout::<LumaAlpha>(16);
        assert_eq!(map.unpack(&[0.6, 0.5]), [0.6, 0.6, 0.6, 0.5]);
    }

    #[test]
    fn test_luma_derived_on_pack() {
        let map = ChannelMap::for_layout::<Luma>(8);
        let mut out = [0.0; MAX_COMPONENTS];
        map.pack([1.0, 32.0 / 255.0, 64.0 / 255.0, 0.0], REC709, &mut out);
        assert_abs_diff_eq!(out[0] * 255.0, 81.72, epsilon = 0.01);
    }

    #[test]
    fn test_shared_exponent_roundtrip() {
        let map = ChannelMap::for_layout::<Rgbe>(8);
        let mut out = [0.0; MAX_COMPONENTS];
        map.pack([1.0, 0.5, 0.25, 0.0], REC709, &mut out);
        assert_eq!(&out[..4], &[128.0, 64.0, 32.0, 129.0]);
        assert_eq!(map.unpack(&out), [1.0, 0.5, 0.25, 0.0]);
    }

    #[test]
    fn test_shared_exponent_mantissa_overflow() {
        let map = ChannelMap::for_layout::<Rgbe>(8);
        let mut out = [0.0; MAX_COMPONENTS];
        map.pack([0.999, 0.0, 0.0, 0.0], REC709, &mut out);
        assert_eq!(out[3], 129.0);
        assert!(out[0].round() <= 255.0);
    }

    #[test]
    fn test_shared_exponent_zero() {
        let map = ChannelMap::for_layout::<Rgbe>(8);
        assert_eq!(map.unpack(&[200.0, 10.0, 3.0, 0.0]), [0.0; 4]);

        let mut out = [1.0; MAX_COMPONENTS];
        map.pack([0.0, -1.0, f64::NAN, 0.0], REC709, &mut out);
        assert_eq!(out[3], 0.0);
    }

    #[test]
    fn test_luminance_mantissa() {
        let map = ChannelMap::for_layout::<LumaExp>(8);
        let mut out = [0.0; MAX_COMPONENTS];
        map.pack([0.5, 0.5, 0.5, 0.0], REC709, &mut out);
        let rgba = map.unpack(&[out[0].round(), out[1]]);
        for v in &rgba[..3] {
            assert_abs_diff_eq!(*v, 0.5, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_xyz_kinds_use_rgb_slots() {
        let map = ChannelMap::new([
            (ComponentKind::X, 32),
            (ComponentKind::Y, 32),
            (ComponentKind::Z, 32),
        ]);
        assert!(map.is_direct());
        assert_eq!(map.unpack(&[0.9, 1.0, 1.1]), [0.9, 1.0, 1.1, 0.0]);
    }
}
