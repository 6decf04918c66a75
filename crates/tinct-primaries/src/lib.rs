//! # tinct-primaries
//!
//! Color primaries, RGB-XYZ matrix generation, and the color-space
//! registry.
//!
//! This crate provides the numbers behind every RGB color space: the
//! chromaticity coordinates of its primaries and white point, the
//! matrices derived from them, and the gamma curve of its identifier.
//!
//! # Integration with tinct-core
//!
//! The built-in table is seeded from the marker types in
//! [`tinct_core::colorspace`], so static and dynamic conversions use the
//! same constants:
//!
//! ```rust
//! use tinct_core::{AcesCg, Srgb};
//! use tinct_primaries::{ColorSpaceRegistry, Primaries, rgb_to_rgb_matrix};
//!
//! let reg = ColorSpaceRegistry::global();
//! let aces = reg.resolve("ACEScg").unwrap();
//! assert_eq!(aces.primaries(), &Primaries::of::<AcesCg>());
//!
//! let m = rgb_to_rgb_matrix(&Primaries::of::<Srgb>(), &Primaries::of::<AcesCg>()).unwrap();
//! assert!((m.m[0][0] - 1.0).abs() > 0.01);
//! ```
//!
//! # Chromatic Adaptation
//!
//! None. Spaces with different white points are related by the direct
//! `XYZ -> RGB_dst * RGB_src -> XYZ` product.
//!
//! # Dependencies
//!
//! - `tinct-core` - color-space markers and error type
//! - `tinct-math` - Matrix operations
//! - `tinct-transfer` - gamma expression resolution
//!
//! # Used By
//!
//! - `tinct-color` - Full color space conversions

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod registry;

pub use registry::{ColorSpaceRegistry, RgbSpace};

use tinct_core::{ColorSpace, ColorSpaceInfo};
use tinct_math::{Mat3, Vec3};

/// RGB color space primaries definition.
///
/// Defines a color space by its three primary colors (R, G, B) and white
/// point, all specified as CIE xy chromaticity coordinates.
///
/// # Example
///
/// ```rust
/// use tinct_primaries::Primaries;
///
/// let my_space = Primaries {
///     r: (0.64, 0.33),
///     g: (0.30, 0.60),
///     b: (0.15, 0.06),
///     w: (0.3127, 0.3290),
/// };
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Primaries {
    /// Red primary (x, y) chromaticity
    pub r: (f64, f64),
    /// Green primary (x, y) chromaticity
    pub g: (f64, f64),
    /// Blue primary (x, y) chromaticity
    pub b: (f64, f64),
    /// White point (x, y) chromaticity
    pub w: (f64, f64),
}

impl Primaries {
    /// Primaries of a color space marker.
    pub const fn of<C: ColorSpace>() -> Self {
        Self::from_info(&C::INFO)
    }

    /// Primaries of a color-space table entry.
    pub const fn from_info(info: &ColorSpaceInfo) -> Self {
        Self {
            r: info.primaries[0],
            g: info.primaries[1],
            b: info.primaries[2],
            w: info.white_point,
        }
    }

    /// White point as XYZ (Y=1).
    #[inline]
    pub fn white_xyz(&self) -> Vec3 {
        xy_to_xyz(self.w.0, self.w.1)
    }
}

/// Converts xy chromaticity to XYZ (with Y=1).
fn xy_to_xyz(x: f64, y: f64) -> Vec3 {
    if y.abs() < 1e-12 {
        Vec3::ZERO
    } else {
        Vec3::new(x / y, 1.0, (1.0 - x - y) / y)
    }
}

/// Computes the RGB to XYZ matrix for a set of primaries.
///
/// # Algorithm
///
/// 1. Convert xy chromaticities to XYZ (with Y=1)
/// 2. Compute scaling factors so white point maps correctly
/// 3. Multiply primaries by scaling factors
///
/// Returns `None` when the primaries are collinear.
///
/// # Example
///
/// ```rust
/// use tinct_core::Srgb;
/// use tinct_math::Vec3;
/// use tinct_primaries::{Primaries, rgb_to_xyz_matrix};
///
/// let m = rgb_to_xyz_matrix(&Primaries::of::<Srgb>()).unwrap();
///
/// // White (1,1,1) maps to the white point with Y = 1
/// let white = m * Vec3::ONE;
/// assert!((white.y - 1.0).abs() < 1e-12);
/// ```
pub fn rgb_to_xyz_matrix(primaries: &Primaries) -> Option<Mat3> {
    let r_xyz = xy_to_xyz(primaries.r.0, primaries.r.1);
    let g_xyz = xy_to_xyz(primaries.g.0, primaries.g.1);
    let b_xyz = xy_to_xyz(primaries.b.0, primaries.b.1);
    let w_xyz = primaries.white_xyz();

    // Solve M * S = W for the per-primary scale
    let m = Mat3::from_col_vecs(r_xyz, g_xyz, b_xyz);
    let s = m.inverse()? * w_xyz;

    Some(Mat3::from_col_vecs(r_xyz * s.x, g_xyz * s.y, b_xyz * s.z))
}

/// Computes the XYZ to RGB matrix for a set of primaries.
///
/// This is the inverse of [`rgb_to_xyz_matrix`].
pub fn xyz_to_rgb_matrix(primaries: &Primaries) -> Option<Mat3> {
    rgb_to_xyz_matrix(primaries)?.inverse()
}

/// Computes a matrix to convert from one RGB color space to another.
///
/// The two steps `RGB_src -> XYZ -> RGB_dst` are composed into a single
/// matrix. No chromatic adaptation is applied.
pub fn rgb_to_rgb_matrix(src: &Primaries, dst: &Primaries) -> Option<Mat3> {
    Some(xyz_to_rgb_matrix(dst)? * rgb_to_xyz_matrix(src)?)
}
