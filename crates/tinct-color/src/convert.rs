//! Static color conversion.
//!
//! Conversions between [`Rgb`] values and to or from [`Xyz`], with
//! source and target fixed by type parameters.
//!
//! # Algorithm
//!
//! RGB to RGB, given the decoded source `(r, g, b, a)`:
//!
//! 1. Identical color-space identifiers: re-encode each channel as is.
//! 2. Otherwise decode through the source gamma (unless it is linear),
//!    apply `XYZ->RGB_dst * RGB_src->XYZ` if the space names differ,
//!    then encode through the target gamma (unless linear).
//!
//! Alpha is only ever re-encoded. All intermediate math is `f64`; only
//! the final encode quantizes.
//!
//! # Example
//!
//! ```rust
//! use tinct_color::{Rgb8, RgbaF32, Xyz};
//!
//! let px = RgbaF32::from_rgba(1.0, 0.5, 0.0, 1.0);
//! let out: Rgb8 = px.convert().unwrap();
//! assert_eq!(out.components(), &[0xFF, 0x80, 0x00]);
//!
//! let xyz: Xyz = out.to_xyz().unwrap();
//! assert!(xyz.y > 0.0);
//! ```

use crate::layout::Layout;
use crate::pixel::{Rgb, Xyz};
use std::sync::Arc;
use tinct_core::{Channel, ColorSpace, Result};
use tinct_math::{Mat3, Vec3};
use tinct_primaries::RgbSpace;

/// A resolved RGB to RGB transform between two color spaces.
///
/// Built once per space pair. The matrix is the composed
/// `XYZ->RGB_dst * RGB_src->XYZ`, present only when the space names
/// differ.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorTransform {
    src: Arc<RgbSpace>,
    dst: Arc<RgbSpace>,
    matrix: Option<Mat3>,
}

impl ColorTransform {
    /// Resolves the transform from `src` to `dst`.
    pub fn new(src: Arc<RgbSpace>, dst: Arc<RgbSpace>) -> Self {
        let matrix = (!src.same_primaries(&dst)).then(|| src.matrix_to(&dst));
        Self { src, dst, matrix }
    }

    /// Source space.
    #[inline]
    pub fn source(&self) -> &RgbSpace {
        &self.src
    }

    /// Target space.
    #[inline]
    pub fn target(&self) -> &RgbSpace {
        &self.dst
    }

    /// Composed RGB matrix, if primaries differ.
    #[inline]
    pub fn matrix(&self) -> Option<&Mat3> {
        self.matrix.as_ref()
    }

    /// Whether the identifiers are equal, making this a no-op.
    #[inline]
    pub fn is_identity(&self) -> bool {
        self.src.id() == self.dst.id()
    }

    /// Transforms one `(r, g, b)` triple.
    pub fn apply(&self, rgb: Vec3) -> Vec3 {
        if self.is_identity() {
            return rgb;
        }
        let decode = self.src.transfer();
        let encode = self.dst.transfer();

        let mut v = rgb;
        if !decode.is_identity() {
            v = v.map(|c| decode.to_linear(c));
        }
        if let Some(m) = &self.matrix {
            v = *m * v;
        }
        if !encode.is_identity() {
            v = v.map(|c| encode.to_gamma(c));
        }
        v
    }

    /// Transforms `(r, g, b)` and passes alpha through.
    #[inline]
    pub fn apply_rgba(&self, rgba: [f64; 4]) -> [f64; 4] {
        let v = self.apply(Vec3::new(rgba[0], rgba[1], rgba[2]));
        [v.x, v.y, v.z, rgba[3]]
    }
}

/// Gamma-encoded RGB to XYZ in `space`.
pub(crate) fn rgb_to_xyz(space: &RgbSpace, rgb: [f64; 3]) -> [f64; 3] {
    let transfer = space.transfer();
    let mut v = Vec3::from_array(rgb);
    if !transfer.is_identity() {
        v = v.map(|c| transfer.to_linear(c));
    }
    (*space.rgb_to_xyz() * v).to_array()
}

/// XYZ to gamma-encoded RGB in `space`.
pub(crate) fn xyz_to_rgb(space: &RgbSpace, xyz: [f64; 3]) -> [f64; 3] {
    let transfer = space.transfer();
    let mut v = *space.xyz_to_rgb() * Vec3::from_array(xyz);
    if !transfer.is_identity() {
        v = v.map(|c| transfer.to_gamma(c));
    }
    v.to_array()
}

/// Converts an RGB value to another layout, storage type or space.
///
/// Fails with [`UnsupportedFormat`](tinct_core::Error::UnsupportedFormat)
/// for a shared-exponent layout without raw counts, and with a registry
/// error for a marker whose primaries are degenerate.
pub fn convert<L1, T1, C1, L2, T2, C2>(src: &Rgb<L1, T1, C1>) -> Result<Rgb<L2, T2, C2>>
where
    L1: Layout,
    T1: Channel,
    C1: ColorSpace,
    L2: Layout,
    T2: Channel,
    C2: ColorSpace,
{
    Rgb::<L1, T1, C1>::check_layout()?;
    Rgb::<L2, T2, C2>::check_layout()?;

    let dst = RgbSpace::of::<C2>()?;
    let rgba = src.tristimulus_with_alpha();
    let rgba = if C1::ID == C2::ID {
        rgba
    } else {
        ColorTransform::new(RgbSpace::of::<C1>()?, Arc::clone(&dst)).apply_rgba(rgba)
    };
    Ok(Rgb::pack(rgba, dst.luma_weights()))
}

/// Converts an RGB value to XYZ. Alpha is dropped.
pub fn to_xyz<L, T, C, U>(src: &Rgb<L, T, C>) -> Result<Xyz<U>>
where
    L: Layout,
    T: Channel,
    C: ColorSpace,
    U: Channel,
{
    Rgb::<L, T, C>::check_layout()?;
    let space = RgbSpace::of::<C>()?;
    Ok(Xyz::from_array(rgb_to_xyz(&space, src.tristimulus())))
}

/// Converts XYZ to an RGB value. Alpha, if any, is the codec zero.
pub fn from_xyz<U, L, T, C>(xyz: &Xyz<U>) -> Result<Rgb<L, T, C>>
where
    U: Channel,
    L: Layout,
    T: Channel,
    C: ColorSpace,
{
    Rgb::<L, T, C>::check_layout()?;
    let space = RgbSpace::of::<C>()?;
    let [r, g, b] = xyz_to_rgb(&space, xyz.to_array());
    Ok(Rgb::pack([r, g, b, 0.0], space.luma_weights()))
}

impl<L: Layout, T: Channel, C: ColorSpace> Rgb<L, T, C> {
    /// Converts to another RGB type; see [`convert`].
    #[inline]
    pub fn convert<L2: Layout, T2: Channel, C2: ColorSpace>(&self) -> Result<Rgb<L2, T2, C2>> {
        convert(self)
    }

    /// Converts to XYZ; see [`to_xyz`].
    #[inline]
    pub fn to_xyz<U: Channel>(&self) -> Result<Xyz<U>> {
        to_xyz(self)
    }
}

impl<U: Channel> Xyz<U> {
    /// Converts to an RGB type; see [`from_xyz`].
    #[inline]
    pub fn to_rgb<L: Layout, T: Channel, C: ColorSpace>(&self) -> Result<Rgb<L, T, C>> {
        from_xyz(self)
    }
}
