//! Statically typed pixel values.
//!
//! [`Rgb<L, T, C>`](Rgb) is the generic RGB value: the layout marker `L`
//! fixes which components exist and in what order, the channel type `T`
//! fixes how each is stored, and the color-space marker `C` fixes what
//! the numbers mean. Every combination is operable by construction.
//!
//! [`Xyz<T>`](Xyz) is the device-independent pivot.
//!
//! # Usage
//!
//! ```rust
//! use tinct_color::{Luma8, Rgb8, Rgba8};
//! use tinct_core::ComponentKind;
//!
//! let px = Rgba8::from_rgba(0xFF, 0x80, 0x00, 0x40);
//! assert_eq!(px.get(ComponentKind::G), Some(0x80));
//!
//! // Greyscale layouts derive luminance at construction
//! let grey = Luma8::from_rgb(0xFF, 0x20, 0x40);
//! assert_eq!(grey.channel(ComponentKind::Luminance), 82);
//!
//! // and replicate it back out
//! assert_eq!(Rgb8::from_luminance(0x40).components(), &[0x40, 0x40, 0x40]);
//! ```

use crate::layout::{self, ChannelMap, Layout};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use tinct_core::{
    Channel, ColorSpace, ComponentKind, Error, Family, LinearSrgb, MAX_COMPONENTS, NumericForm,
    PixelFormat, Raw, Result, Srgb, f16, split_color_space_id,
};
use tinct_math::Vec3;
use tinct_primaries::RgbSpace;

/// Luma weights used when a marker's primaries cannot produce a matrix.
const REC709_LUMA: Vec3 = Vec3::new(0.2126, 0.7152, 0.0722);

/// A pixel type with a runtime descriptor.
///
/// Implemented by [`Rgb`] and [`Xyz`]; this is what lets the dynamic
/// engine produce statically typed output.
pub trait PixelType: Copy + Send + Sync + 'static {
    /// The equivalent runtime descriptor.
    fn format() -> Result<PixelFormat>;

    /// The color space of the type, `None` for XYZ.
    fn color_space() -> Result<Option<Arc<RgbSpace>>>;

    /// Builds a value from decoded components in storage order.
    fn from_values(values: &[f64]) -> Self;
}

/// A generic RGB pixel value.
///
/// Storage holds exactly the components of `L`, in order. Accessors look
/// components up by kind; an absent kind reads as the codec zero.
///
/// Equality is component by component over the stored values.
pub struct Rgb<L: Layout, T: Channel, C: ColorSpace = Srgb> {
    values: [T; MAX_COMPONENTS],
    _marker: PhantomData<(L, C)>,
}

impl<L: Layout, T: Channel, C: ColorSpace> Clone for Rgb<L, T, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<L: Layout, T: Channel, C: ColorSpace> Copy for Rgb<L, T, C> {}

impl<L: Layout, T: Channel, C: ColorSpace> Rgb<L, T, C> {
    #[inline]
    fn from_storage(values: [T; MAX_COMPONENTS]) -> Self {
        Self {
            values,
            _marker: PhantomData,
        }
    }

    /// Builds a value from stored components in layout order.
    ///
    /// Missing trailing components are zero; extra ones are ignored.
    pub fn from_components(components: &[T]) -> Self {
        let mut values = [T::zero(); MAX_COMPONENTS];
        for (slot, v) in values.iter_mut().zip(components).take(L::KINDS.len()) {
            *slot = *v;
        }
        Self::from_storage(values)
    }

    /// Builds a value from red, green and blue.
    ///
    /// Alpha, if the layout has one, is the codec zero.
    #[inline]
    pub fn from_rgb(r: T, g: T, b: T) -> Self {
        Self::from_rgba(r, g, b, T::zero())
    }

    /// Builds a value from red, green, blue and alpha.
    ///
    /// Components the layout lacks are dropped. A layout with a
    /// luminance channel gets the color space's luma of the stored
    /// `r`, `g`, `b`; a shared-exponent layout re-quantizes all three.
    pub fn from_rgba(r: T, g: T, b: T, a: T) -> Self {
        if Self::channel_map().is_direct() {
            let mut values = [T::zero(); MAX_COMPONENTS];
            for (slot, kind) in values.iter_mut().zip(L::KINDS) {
                *slot = match kind {
                    ComponentKind::R => r,
                    ComponentKind::G => g,
                    ComponentKind::B => b,
                    ComponentKind::A => a,
                    _ => T::zero(),
                };
            }
            Self::from_storage(values)
        } else {
            Self::from_tristimulus([r.decode(), g.decode(), b.decode(), a.decode()])
        }
    }

    /// Builds a greyscale value.
    #[inline]
    pub fn from_luminance(l: T) -> Self {
        Self::from_luminance_alpha(l, T::zero())
    }

    /// Builds a greyscale value with alpha.
    ///
    /// Without a luminance channel, `l` is replicated into R, G and B.
    pub fn from_luminance_alpha(l: T, a: T) -> Self {
        if Self::channel_map().has_exponent() {
            let v = l.decode();
            return Self::from_tristimulus([v, v, v, a.decode()]);
        }
        let mut values = [T::zero(); MAX_COMPONENTS];
        for (slot, kind) in values.iter_mut().zip(L::KINDS) {
            *slot = match kind {
                ComponentKind::R | ComponentKind::G | ComponentKind::B | ComponentKind::Luminance => l,
                ComponentKind::A => a,
                _ => T::zero(),
            };
        }
        Self::from_storage(values)
    }

    /// Builds a value from real `[r, g, b, a]`, encoding each component.
    pub fn from_tristimulus(rgba: [f64; 4]) -> Self {
        Self::pack(rgba, luma_weights::<C>())
    }

    pub(crate) fn pack(rgba: [f64; 4], weights: Vec3) -> Self {
        let mut decoded = [0.0; MAX_COMPONENTS];
        Self::channel_map().pack(rgba, weights, &mut decoded);
        Self::encode_values(&decoded)
    }

    fn encode_values(decoded: &[f64]) -> Self {
        let mut values = [T::zero(); MAX_COMPONENTS];
        for (slot, v) in values.iter_mut().zip(decoded).take(L::KINDS.len()) {
            *slot = T::encode(*v);
        }
        Self::from_storage(values)
    }

    /// Channel positions of this layout.
    #[inline]
    pub fn channel_map() -> ChannelMap {
        ChannelMap::for_layout::<L>(T::BITS)
    }

    /// Component kinds in storage order.
    #[inline]
    pub fn kinds() -> &'static [ComponentKind] {
        L::KINDS
    }

    /// Stored components in layout order.
    #[inline]
    pub fn components(&self) -> &[T] {
        &self.values[..L::KINDS.len()]
    }

    /// The stored component of `kind`, if the layout has one.
    #[inline]
    pub fn get(&self, kind: ComponentKind) -> Option<T> {
        L::KINDS
            .iter()
            .position(|&k| k == kind)
            .map(|i| self.values[i])
    }

    /// The stored component of `kind`, or the codec zero.
    #[inline]
    pub fn channel(&self, kind: ComponentKind) -> T {
        self.get(kind).unwrap_or_else(T::zero)
    }

    /// Every component decoded, in layout order.
    pub fn decode(&self) -> [f64; MAX_COMPONENTS] {
        let mut out = [0.0; MAX_COMPONENTS];
        for (slot, v) in out.iter_mut().zip(self.components()) {
            *slot = v.decode();
        }
        out
    }

    /// Decoded `(r, g, b)` regardless of storage order.
    ///
    /// Greyscale layouts report their luminance in all three slots.
    #[inline]
    pub fn tristimulus(&self) -> [f64; 3] {
        let [r, g, b, _] = self.tristimulus_with_alpha();
        [r, g, b]
    }

    /// Decoded `(r, g, b, a)`; alpha is zero if the layout has none.
    #[inline]
    pub fn tristimulus_with_alpha(&self) -> [f64; 4] {
        Self::channel_map().unpack(&self.decode())
    }

    /// Fails with [`Error::UnsupportedFormat`] for a shared exponent
    /// stored in anything but raw unsigned counts.
    pub(crate) fn check_layout() -> Result<()> {
        if Self::channel_map().has_exponent() && T::FORM != NumericForm::UnsignedInt {
            return Err(Error::unsupported_format(format!(
                "{} with {} channels",
                L::NAME,
                T::FORM
            )));
        }
        Ok(())
    }

    /// Writes the components little-endian into `out`.
    ///
    /// # Panics
    ///
    /// Panics if `out` is shorter than the pixel.
    pub fn write_le(&self, out: &mut [u8]) {
        for (v, chunk) in self.components().iter().zip(out.chunks_exact_mut(T::size())) {
            v.write_le(chunk);
        }
    }

    /// Reads a pixel from little-endian bytes.
    ///
    /// # Panics
    ///
    /// Panics if `bytes` is shorter than the pixel.
    pub fn read_le(bytes: &[u8]) -> Self {
        let mut values = [T::zero(); MAX_COMPONENTS];
        for (slot, chunk) in values
            .iter_mut()
            .zip(bytes.chunks_exact(T::size()))
            .take(L::KINDS.len())
        {
            *slot = T::read_le(chunk);
        }
        Self::from_storage(values)
    }
}

impl<L: Layout, T: Channel, C: ColorSpace> Default for Rgb<L, T, C> {
    fn default() -> Self {
        Self::from_storage([T::zero(); MAX_COMPONENTS])
    }
}

impl<L: Layout, T: Channel, C: ColorSpace> PartialEq for Rgb<L, T, C> {
    fn eq(&self, other: &Self) -> bool {
        self.components() == other.components()
    }
}

impl<L: Layout, T: Channel, C: ColorSpace> fmt::Debug for Rgb<L, T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut t = f.debug_tuple(&format!("Rgb<{}@{}>", L::NAME, C::ID));
        for v in self.components() {
            t.field(v);
        }
        t.finish()
    }
}

impl<L: Layout, T: Channel, C: ColorSpace> PixelType for Rgb<L, T, C> {
    fn format() -> Result<PixelFormat> {
        Self::check_layout()?;
        let (name, gamma) = split_color_space_id(C::ID);
        PixelFormat::new(
            Family::Rgb,
            L::KINDS.iter().map(|&kind| T::component(kind)).collect(),
            Some(name.to_string()),
            gamma.map(str::to_string),
        )
    }

    fn color_space() -> Result<Option<Arc<RgbSpace>>> {
        RgbSpace::of::<C>().map(Some)
    }

    fn from_values(values: &[f64]) -> Self {
        Self::encode_values(values)
    }
}

/// CIE XYZ tristimulus value.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Xyz<T = f64> {
    /// X
    pub x: T,
    /// Y (luminance)
    pub y: T,
    /// Z
    pub z: T,
}

impl<T: Channel> Xyz<T> {
    /// Creates a value from stored components.
    #[inline]
    pub const fn new(x: T, y: T, z: T) -> Self {
        Self { x, y, z }
    }

    /// Encodes real `[x, y, z]`.
    #[inline]
    pub fn from_array(xyz: [f64; 3]) -> Self {
        Self::new(T::encode(xyz[0]), T::encode(xyz[1]), T::encode(xyz[2]))
    }

    /// Decoded `[x, y, z]`.
    #[inline]
    pub fn to_array(&self) -> [f64; 3] {
        [self.x.decode(), self.y.decode(), self.z.decode()]
    }
}

impl<T: Channel> PixelType for Xyz<T> {
    fn format() -> Result<PixelFormat> {
        PixelFormat::new(
            Family::Xyz,
            [ComponentKind::X, ComponentKind::Y, ComponentKind::Z]
                .into_iter()
                .map(T::component)
                .collect(),
            None,
            None,
        )
    }

    fn color_space() -> Result<Option<Arc<RgbSpace>>> {
        Ok(None)
    }

    fn from_values(values: &[f64]) -> Self {
        let at = |i: usize| values.get(i).copied().unwrap_or(0.0);
        Self::from_array([at(0), at(1), at(2)])
    }
}

/// Luma weights of a marker's color space.
pub(crate) fn luma_weights<C: ColorSpace>() -> Vec3 {
    match RgbSpace::of::<C>() {
        Ok(space) => space.luma_weights(),
        Err(err) => {
            tracing::warn!(space = C::ID, %err, "falling back to Rec. 709 luma weights");
            REC709_LUMA
        }
    }
}

/// 8-bit RGB in sRGB.
pub type Rgb8 = Rgb<layout::Rgb, u8>;
/// 8-bit RGBA in sRGB.
pub type Rgba8 = Rgb<layout::Rgba, u8>;
/// 8-bit BGRA in sRGB.
pub type Bgra8 = Rgb<layout::Bgra, u8>;
/// 16-bit RGB in sRGB.
pub type Rgb16 = Rgb<layout::Rgb, u16>;
/// 16-bit RGBA in sRGB.
pub type Rgba16 = Rgb<layout::Rgba, u16>;
/// Half float RGBA in linear sRGB.
pub type RgbaF16 = Rgb<layout::Rgba, f16, LinearSrgb>;
/// Float RGB in sRGB.
pub type RgbF32 = Rgb<layout::Rgb, f32>;
/// Float RGBA in sRGB.
pub type RgbaF32 = Rgb<layout::Rgba, f32>;
/// 8-bit greyscale in sRGB.
pub type Luma8 = Rgb<layout::Luma, u8>;
/// 16-bit greyscale in sRGB.
pub type Luma16 = Rgb<layout::Luma, u16>;
/// 8-bit greyscale with alpha in sRGB.
pub type LumaAlpha8 = Rgb<layout::LumaAlpha, u8>;
/// Radiance-style shared exponent RGB in linear sRGB.
pub type Rgbe8 = Rgb<layout::Rgbe, Raw<u8>, LinearSrgb>;
