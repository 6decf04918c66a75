//! # tinct-core
//!
//! Core types for pixel-format description and color conversion.
//!
//! This crate provides the foundational types used throughout tinct:
//!
//! - [`PixelFormat`] - Runtime pixel format descriptor and its string parser
//! - [`Channel`] - Statically typed component codec (`u8`, `i16`, `f32`, ...)
//! - [`codec`] - Runtime component codec over raw bytes and packed bits
//! - [`ColorSpace`] - Marker types for the built-in color spaces
//! - [`ImageView`], [`FormatRegistry`] - Buffer geometry and borrowed views
//!
//! ## Crate Structure
//!
//! This crate has no internal dependencies. All other tinct crates
//! depend on `tinct-core`:
//!
//! ```text
//! tinct-core (this crate)
//!    ^
//!    |
//!    +-- tinct-math (matrices)
//!    +-- tinct-transfer (gamma curves)
//!    +-- tinct-primaries (color-space registry)
//!    +-- tinct-color (values and conversion engines)
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod channel;
pub mod codec;
pub mod colorspace;
pub mod error;
pub mod format;
pub mod image;
pub mod rect;

// Re-exports for convenience
pub use channel::{Channel, Fixed, Raw};
pub use codec::ComponentValue;
pub use colorspace::*;
pub use error::*;
pub use format::*;
pub use half::f16;
pub use image::*;
pub use rect::Rect;

/// Prelude module for convenient imports.
///
/// # Usage
///
/// ```
/// use tinct_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::channel::{Channel, Fixed, Raw};
    pub use crate::colorspace::{
        Aces2065, AcesCg, AdobeRgb, ColorSpace, DciP3, DisplayP3, LinearSrgb, ProPhotoRgb,
        Rec2020, Rec709, Srgb,
    };
    pub use crate::error::{Error, Result};
    pub use crate::format::{Component, ComponentKind, NumericForm, PixelFormat};
    pub use crate::image::{FormatRegistry, Geometry, ImageView};
    pub use crate::rect::Rect;
    pub use half::f16;
}
