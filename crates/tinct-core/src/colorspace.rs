//! Color space definitions and compile-time color space safety.
//!
//! This module provides the [`ColorSpace`] trait and marker types for the
//! built-in RGB color spaces. Static pixel types carry a marker as a type
//! parameter; the runtime registry in `tinct-primaries` is seeded from
//! the same constants, so both engines agree on every number.
//!
//! # Identifiers
//!
//! A color-space identifier is `name` or `name^gamma`. The name selects
//! primaries and white point, the optional suffix overrides the default
//! gamma expression. [`LinearSrgb`] is the marker for `sRGB^1`.
//!
//! # Supported Color Spaces
//!
//! | Marker | Name | Default gamma | White |
//! |--------|------|---------------|-------|
//! | [`Srgb`] | `sRGB` | `sRGB` | D65 |
//! | [`Rec709`] | `Rec709` | `Rec709` | D65 |
//! | [`Rec2020`] | `Rec2020` | `Rec709` | D65 |
//! | [`DciP3`] | `DCI-P3` | `2.6` | DCI |
//! | [`DisplayP3`] | `DisplayP3` | `sRGB` | D65 |
//! | [`AdobeRgb`] | `AdobeRGB` | `2.19921875` | D65 |
//! | [`ProPhotoRgb`] | `ProPhotoRGB` | `1.8` | D50 |
//! | [`AcesCg`] | `ACEScg` | `1` | ACES |
//! | [`Aces2065`] | `ACES2065-1` | `1` | ACES |
//!
//! # Usage
//!
//! ```
//! use tinct_core::{ColorSpace, LinearSrgb, Srgb};
//!
//! assert_eq!(Srgb::ID, "sRGB");
//! assert_eq!(LinearSrgb::ID, "sRGB^1");
//! assert_eq!(LinearSrgb::NAME, Srgb::NAME);
//! assert!(LinearSrgb::is_linear());
//! ```
//!
//! # Used By
//!
//! - `tinct-primaries` - builds the default registry from [`BUILTIN_SPACES`]
//! - `tinct-color` - static conversions between marker-typed values

use std::fmt;

/// CIE xy chromaticity of D65.
pub const D65: (f64, f64) = (0.3127, 0.3290);

/// CIE xy chromaticity of D50.
pub const D50: (f64, f64) = (0.3457, 0.3585);

/// CIE xy chromaticity of the ACES white (~D60).
pub const ACES_WHITE: (f64, f64) = (0.32168, 0.33767);

/// CIE xy chromaticity of the DCI projector white.
pub const DCI_WHITE: (f64, f64) = (0.314, 0.351);

const REC709_PRIMARIES: [(f64, f64); 3] = [(0.640, 0.330), (0.300, 0.600), (0.150, 0.060)];
const P3_PRIMARIES: [(f64, f64); 3] = [(0.680, 0.320), (0.265, 0.690), (0.150, 0.060)];
const AP1_PRIMARIES: [(f64, f64); 3] = [(0.713, 0.293), (0.165, 0.830), (0.128, 0.044)];

/// Plain data describing one named color space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorSpaceInfo {
    /// Registry name (no gamma suffix)
    pub name: &'static str,
    /// Default gamma expression
    pub gamma: &'static str,
    /// White point chromaticity
    pub white_point: (f64, f64),
    /// Red, green, blue chromaticities
    pub primaries: [(f64, f64); 3],
    /// Grouping for listings
    pub family: Option<&'static str>,
}

/// Trait for color space marker types.
///
/// # Implementing Custom Color Spaces
///
/// ```
/// use tinct_core::ColorSpace;
///
/// #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
/// pub struct Wide;
///
/// impl ColorSpace for Wide {
///     const ID: &'static str = "Wide^2.2";
///     const NAME: &'static str = "Wide";
///     const GAMMA: &'static str = "2.2";
///     const WHITE_POINT: (f64, f64) = (0.3127, 0.3290);
///     const PRIMARIES: [(f64, f64); 3] = [(0.70, 0.29), (0.17, 0.79), (0.13, 0.05)];
/// }
///
/// assert!(!Wide::is_linear());
/// ```
///
/// A marker whose `NAME` is not registered with the runtime registry
/// still converts statically, but cannot be named in format strings.
pub trait ColorSpace: Copy + Clone + Default + Send + Sync + fmt::Debug + 'static {
    /// Full identifier, including any gamma suffix.
    ///
    /// Conversions whose identifiers are textually equal take the fast
    /// path.
    const ID: &'static str;

    /// Name without gamma suffix; equal names share primaries.
    const NAME: &'static str;

    /// Effective gamma expression.
    const GAMMA: &'static str;

    /// CIE xy chromaticity coordinates of the white point.
    const WHITE_POINT: (f64, f64);

    /// CIE xy chromaticity coordinates of RGB primaries.
    ///
    /// Order: `[Red, Green, Blue]`
    const PRIMARIES: [(f64, f64); 3];

    /// Optional family/category for grouping related color spaces.
    const FAMILY: Option<&'static str> = None;

    /// All of the above as plain data.
    const INFO: ColorSpaceInfo = ColorSpaceInfo {
        name: Self::NAME,
        gamma: Self::GAMMA,
        white_point: Self::WHITE_POINT,
        primaries: Self::PRIMARIES,
        family: Self::FAMILY,
    };

    /// Whether values are stored in linear light.
    #[inline]
    fn is_linear() -> bool {
        matches!(Self::GAMMA, "1" | "1.0")
    }
}

macro_rules! color_space {
    (
        $(#[$meta:meta])*
        $ty:ident {
            id: $id:expr,
            name: $name:expr,
            gamma: $gamma:expr,
            white: $white:expr,
            primaries: $prim:expr,
            family: $family:expr $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
        pub struct $ty;

        impl ColorSpace for $ty {
            const ID: &'static str = $id;
            const NAME: &'static str = $name;
            const GAMMA: &'static str = $gamma;
            const WHITE_POINT: (f64, f64) = $white;
            const PRIMARIES: [(f64, f64); 3] = $prim;
            const FAMILY: Option<&'static str> = Some($family);
        }
    };
}

// ============================================================================
// sRGB / Rec.709
// ============================================================================

color_space! {
    /// sRGB - Standard RGB color space for web and consumer displays.
    ///
    /// # Transfer Function
    /// ```text
    /// if L <= 0.0031308:
    ///     V = 12.92 * L
    /// else:
    ///     V = 1.055 * L^(1/2.4) - 0.055
    /// ```
    Srgb { id: "sRGB", name: "sRGB", gamma: "sRGB", white: D65, primaries: REC709_PRIMARIES, family: "sRGB" }
}

color_space! {
    /// Linear sRGB - sRGB primaries with linear transfer (`sRGB^1`).
    LinearSrgb { id: "sRGB^1", name: "sRGB", gamma: "1", white: D65, primaries: REC709_PRIMARIES, family: "sRGB" }
}

color_space! {
    /// Rec.709 - ITU-R BT.709 broadcast color space with the BT.709 OETF.
    Rec709 { id: "Rec709", name: "Rec709", gamma: "Rec709", white: D65, primaries: REC709_PRIMARIES, family: "Rec" }
}

// ============================================================================
// Wide Gamut
// ============================================================================

color_space! {
    /// Rec.2020 - ITU-R BT.2020 wide gamut, same curve shape as BT.709.
    Rec2020 {
        id: "Rec2020",
        name: "Rec2020",
        gamma: "Rec709",
        white: D65,
        primaries: [(0.708, 0.292), (0.170, 0.797), (0.131, 0.046)],
        family: "Rec",
    }
}

color_space! {
    /// DCI-P3 - Digital cinema projection, 2.6 gamma, DCI white.
    DciP3 { id: "DCI-P3", name: "DCI-P3", gamma: "2.6", white: DCI_WHITE, primaries: P3_PRIMARIES, family: "P3" }
}

color_space! {
    /// Display P3 - P3 primaries with D65 white and the sRGB curve.
    DisplayP3 { id: "DisplayP3", name: "DisplayP3", gamma: "sRGB", white: D65, primaries: P3_PRIMARIES, family: "P3" }
}

color_space! {
    /// Adobe RGB (1998).
    AdobeRgb {
        id: "AdobeRGB",
        name: "AdobeRGB",
        gamma: "2.19921875",
        white: D65,
        primaries: [(0.640, 0.330), (0.210, 0.710), (0.150, 0.060)],
        family: "Adobe",
    }
}

color_space! {
    /// ProPhoto RGB (ROMM), D50 white.
    ProPhotoRgb {
        id: "ProPhotoRGB",
        name: "ProPhotoRGB",
        gamma: "1.8",
        white: D50,
        primaries: [(0.7347, 0.2653), (0.1596, 0.8404), (0.0366, 0.0001)],
        family: "Adobe",
    }
}

// ============================================================================
// ACES
// ============================================================================

color_space! {
    /// ACEScg - The standard ACES working color space (AP1, linear).
    AcesCg { id: "ACEScg", name: "ACEScg", gamma: "1", white: ACES_WHITE, primaries: AP1_PRIMARIES, family: "ACES" }
}

color_space! {
    /// ACES2065-1 - The archival ACES color space (AP0, linear).
    ///
    /// The blue primary lies outside the spectral locus.
    Aces2065 {
        id: "ACES2065-1",
        name: "ACES2065-1",
        gamma: "1",
        white: ACES_WHITE,
        primaries: [(0.7347, 0.2653), (0.0000, 1.0000), (0.0001, -0.0770)],
        family: "ACES",
    }
}

/// Every built-in color space, one entry per name.
pub const BUILTIN_SPACES: [ColorSpaceInfo; 9] = [
    Srgb::INFO,
    Rec709::INFO,
    Rec2020::INFO,
    DciP3::INFO,
    DisplayP3::INFO,
    AdobeRgb::INFO,
    ProPhotoRgb::INFO,
    AcesCg::INFO,
    Aces2065::INFO,
];

/// Splits an identifier into its name and optional gamma suffix.
///
/// ```
/// use tinct_core::split_color_space_id;
///
/// assert_eq!(split_color_space_id("sRGB^1"), ("sRGB", Some("1")));
/// assert_eq!(split_color_space_id("ACEScg"), ("ACEScg", None));
/// ```
pub fn split_color_space_id(id: &str) -> (&str, Option<&str>) {
    match id.split_once('^') {
        Some((name, gamma)) => (name, Some(gamma)),
        None => (id, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colorspace_ids() {
        assert_eq!(Srgb::ID, "sRGB");
        assert_eq!(AcesCg::ID, "ACEScg");
        assert_eq!(Rec2020::NAME, "Rec2020");
        assert_eq!(split_color_space_id(LinearSrgb::ID).0, Srgb::NAME);
    }

    #[test]
    fn test_colorspace_linearity() {
        assert!(!Srgb::is_linear());
        assert!(AcesCg::is_linear());
        assert!(LinearSrgb::is_linear());
        assert!(!DciP3::is_linear());
    }

    #[test]
    fn test_builtin_names_unique() {
        for (i, a) in BUILTIN_SPACES.iter().enumerate() {
            assert!(!a.name.contains('^'));
            for b in &BUILTIN_SPACES[i + 1..] {
                assert_ne!(a.name, b.name);
            }
        }
    }

    #[test]
    fn test_info_matches_marker() {
        assert_eq!(DisplayP3::INFO.primaries, DciP3::PRIMARIES);
        assert_eq!(DisplayP3::INFO.white_point, D65);
        assert_eq!(ProPhotoRgb::INFO.gamma, "1.8");
    }
}
