//! # tinct-math
//!
//! Math primitives for color conversion.
//!
//! - [`Mat3`] - 3x3 matrices for color space transformations
//! - [`Vec3`] - 3D vectors for XYZ/RGB triplets
//!
//! # Design
//!
//! Everything is `f64`: the conversion engines decode any storage width
//! into the widest real type, do all gamma and matrix work there, and
//! quantize only once at the final encode. [`glam`]'s double precision
//! types back the determinant and inverse.
//!
//! All matrix operations assume **row-major** storage and **column vectors**:
//!
//! ```text
//! result = matrix * vector
//! ```
//!
//! # Dependencies
//!
//! - [`glam`] - `DMat3` inverse and interop
//!
//! # Used By
//!
//! - `tinct-primaries` - RGB/XYZ matrix generation
//! - `tinct-color` - Color space conversions

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod mat3;
mod vec3;

pub use mat3::*;
pub use vec3::*;

/// Re-export glam types for direct use
pub mod glam {
    pub use ::glam::{DMat3, DVec3};
}
