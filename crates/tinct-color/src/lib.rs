//! # tinct-color
//!
//! Generic RGB values and color conversion between pixel encodings.
//!
//! This crate combines the component codecs, gamma curves and primaries
//! of the lower crates into two conversion engines:
//!
//! - **Static** - [`Rgb<L, T, C>`](Rgb) values whose layout, storage and
//!   color space are type parameters; see [`convert`]
//! - **Dynamic** - [`ConversionPlan`]s resolved once from runtime
//!   [`PixelFormat`](tinct_core::PixelFormat)s and applied per pixel
//!
//! Both engines share one algorithm and produce identical values for
//! identical formats.
//!
//! # Architecture
//!
//! ```text
//!                    tinct-color
//!                        |
//!          +-------------+-------------+
//!          |                           |
//!   tinct-transfer              tinct-primaries
//!          |                           |
//!          |                      tinct-math
//!          |                           |
//!          +-------------+-------------+
//!                        |
//!                    tinct-core
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use tinct_color::{ConversionPlan, Luma8, Rgb8, RgbaF32, Xyz};
//!
//! // Static: float RGBA to 8-bit RGB in the same space
//! let px: Rgb8 = RgbaF32::from_rgba(1.0, 0.5, 0.0, 1.0).convert().unwrap();
//! assert_eq!(px.components(), &[0xFF, 0x80, 0x00]);
//!
//! // Greyscale target
//! let grey: Luma8 = Rgb8::from_rgb(0xFF, 0x20, 0x40).convert().unwrap();
//! assert_eq!(grey.components(), &[82]);
//!
//! // XYZ pivot
//! let xyz: Xyz = px.to_xyz().unwrap();
//! assert!(xyz.y > 0.0 && xyz.y < 1.0);
//!
//! // Dynamic: formats as data
//! let plan = ConversionPlan::parse("rgb:r8g8b8", "rgb:r16g16b16@ACEScg^1").unwrap();
//! let mut out = [0u8; 6];
//! plan.convert_pixel(&[0xFF, 0xFF, 0xFF], &mut out).unwrap();
//! ```
//!
//! # Features
//!
//! - `parallel` (default) - row-parallel image conversion with rayon
//!
//! # Dependencies
//!
//! - [`tinct-core`] - Formats, codecs, color-space markers, image views
//! - [`tinct-math`] - Matrix and vector types
//! - [`tinct-transfer`] - Gamma curves
//! - [`tinct-primaries`] - RGB/XYZ matrices and the color-space registry
//!
//! # Used By
//!
//! - `tinct-cli` - Command line conversion
//! - `tinct-bench` - Benchmarks

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod convert;
pub mod layout;
pub mod pixel;
pub mod plan;
mod value;

pub use convert::{ColorTransform, convert, from_xyz, to_xyz};
pub use layout::{ChannelMap, Layout};
pub use pixel::{
    Bgra8, Luma8, Luma16, LumaAlpha8, PixelType, Rgb, Rgb8, Rgb16, Rgba8, Rgba16, RgbaF16,
    RgbaF32, RgbF32, Rgbe8, Xyz,
};
pub use plan::{ConversionPlan, PlanCache, Route, TypedPlan, convert_image};
pub use value::PixelValue;

// Re-export sub-crates for convenience
pub use tinct_math as math;
pub use tinct_primaries as primaries;
pub use tinct_transfer as transfer;

/// Prelude with commonly used types
pub mod prelude {
    pub use crate::layout::{self, Layout};
    pub use crate::{
        ColorTransform, ConversionPlan, PixelType, PixelValue, PlanCache, Rgb, Route, TypedPlan,
        Xyz,
    };
    pub use tinct_core::prelude::*;
    pub use tinct_primaries::{ColorSpaceRegistry, RgbSpace};
}
