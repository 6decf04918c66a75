//! # tinct-transfer
//!
//! Gamma curves for color encoding and decoding.
//!
//! Transfer functions convert between linear light values and encoded
//! values for storage. All functions take and return `f64`; negative
//! inputs are mirrored through the origin and NaN propagates.
//!
//! # Terminology
//!
//! - **OETF**: Linear -> Encoded (`to_gamma`)
//! - **EOTF**: Encoded -> Linear (`to_linear`)
//!
//! # Supported Transfer Functions
//!
//! | Function | Use Case |
//! |----------|----------|
//! | [`srgb`] | Web, consumer displays, Display P3 |
//! | [`rec709`] | HDTV broadcast, Rec.2020 |
//! | [`gamma`] | Pure power law (Adobe RGB, ProPhoto, DCI-P3) |
//!
//! [`Transfer`] resolves gamma expressions from color-space identifiers
//! to one of these curves.
//!
//! # Dependencies
//!
//! - `tinct-core` - error type
//!
//! # Used By
//!
//! - `tinct-primaries` - resolving a space's default gamma
//! - `tinct-color` - Full color space conversions

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod gamma;
pub mod rec709;
pub mod srgb;
mod transfer;

pub use transfer::Transfer;

/// Applies `f` to `|v|` and restores the sign.
#[inline]
pub(crate) fn mirror(v: f64, f: impl Fn(f64) -> f64) -> f64 {
    if v < 0.0 { -f(-v) } else { f(v) }
}
