//! Error types for tinct operations.
//!
//! Every fallible operation in the workspace reports through [`Error`].
//! Conversion is a pure computation layer: nothing here is transient, so
//! no variant is retryable and none is ever logged and swallowed.
//!
//! # Categories
//!
//! - **Descriptor errors**: [`Parse`](Error::Parse)
//! - **Capability errors**: [`UnsupportedFormat`](Error::UnsupportedFormat),
//!   [`UnsupportedNumericForm`](Error::UnsupportedNumericForm),
//!   [`UnsupportedFormatFamily`](Error::UnsupportedFormatFamily)
//! - **Registry misses**: [`UnknownColorSpace`](Error::UnknownColorSpace),
//!   [`UnknownGamma`](Error::UnknownGamma)
//! - **Registry definitions**: [`InvalidColorSpace`](Error::InvalidColorSpace)
//! - **Buffer geometry**: [`BufferTooSmall`](Error::BufferTooSmall),
//!   [`InvalidRegion`](Error::InvalidRegion),
//!   [`InvalidDimensions`](Error::InvalidDimensions)
//!
//! # Usage
//!
//! ```rust
//! use tinct_core::{Error, Result};
//!
//! fn check_family(family: &str) -> Result<()> {
//!     match family {
//!         "rgb" | "xyz" => Ok(()),
//!         other => Err(Error::unsupported_family(other)),
//!     }
//! }
//!
//! assert!(check_family("yuv").is_err());
//! ```

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while describing, decoding or converting pixels.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A format string could not be parsed into a descriptor.
    ///
    /// Surfaced unchanged to the caller; a malformed format is never
    /// replaced by a default.
    #[error("invalid pixel format {input:?}: {reason}")]
    Parse {
        /// The offending format string
        input: String,
        /// What was wrong with it
        reason: String,
    },

    /// The format is not operable (bit-packed, mixed widths or mixed
    /// numeric forms) and cannot be constructed or converted directly.
    #[error("unsupported pixel format: {format}")]
    UnsupportedFormat {
        /// Format name or description
        format: String,
    },

    /// A component uses a numeric form/width combination with no codec.
    #[error("unsupported numeric form: {form} at {bits} bits")]
    UnsupportedNumericForm {
        /// Numeric form name
        form: String,
        /// Component width in bits
        bits: u32,
    },

    /// The dynamic engine has no unpack strategy for this format family.
    #[error("unsupported format family: {family}")]
    UnsupportedFormatFamily {
        /// Family key (e.g. "yuv")
        family: String,
    },

    /// A color-space identifier is not registered.
    #[error("unknown color space: {0}")]
    UnknownColorSpace(String),

    /// A gamma expression does not name a known curve.
    #[error("unknown gamma expression: {0}")]
    UnknownGamma(String),

    /// A color-space definition cannot yield an RGB/XYZ matrix.
    #[error("invalid color space {name}: {reason}")]
    InvalidColorSpace {
        /// Color-space name
        name: String,
        /// What is wrong with it
        reason: String,
    },

    /// A byte slice is shorter than the format requires.
    #[error("buffer too small: need {needed} bytes, got {got}")]
    BufferTooSmall {
        /// Bytes required
        needed: usize,
        /// Bytes available
        got: usize,
    },

    /// Region of interest extends beyond image bounds, or starts at a
    /// position that is not byte addressable.
    #[error("region ({rx}, {ry}, {rw}x{rh}) exceeds image bounds {width}x{height}")]
    InvalidRegion {
        /// Region X origin
        rx: u32,
        /// Region Y origin
        ry: u32,
        /// Region width
        rw: u32,
        /// Region height
        rh: u32,
        /// Image width
        width: u32,
        /// Image height
        height: u32,
    },

    /// Invalid image dimensions or pitch.
    #[error("invalid dimensions: {width}x{height} ({reason})")]
    InvalidDimensions {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
        /// Reason why dimensions are invalid
        reason: String,
    },
}

impl Error {
    /// Creates an [`Error::Parse`] error.
    #[inline]
    pub fn parse(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Parse {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Creates an [`Error::UnsupportedFormat`] error.
    #[inline]
    pub fn unsupported_format(format: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            format: format.into(),
        }
    }

    /// Creates an [`Error::UnsupportedNumericForm`] error.
    #[inline]
    pub fn unsupported_form(form: impl Into<String>, bits: u32) -> Self {
        Self::UnsupportedNumericForm {
            form: form.into(),
            bits,
        }
    }

    /// Creates an [`Error::UnsupportedFormatFamily`] error.
    #[inline]
    pub fn unsupported_family(family: impl Into<String>) -> Self {
        Self::UnsupportedFormatFamily {
            family: family.into(),
        }
    }

    /// Creates an [`Error::InvalidColorSpace`] error.
    #[inline]
    pub fn invalid_color_space(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidColorSpace {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Creates an [`Error::BufferTooSmall`] error.
    #[inline]
    pub fn buffer_too_small(needed: usize, got: usize) -> Self {
        Self::BufferTooSmall { needed, got }
    }

    /// Creates an [`Error::InvalidRegion`] error.
    #[inline]
    pub fn invalid_region(rx: u32, ry: u32, rw: u32, rh: u32, width: u32, height: u32) -> Self {
        Self::InvalidRegion {
            rx,
            ry,
            rw,
            rh,
            width,
            height,
        }
    }

    /// Creates an [`Error::InvalidDimensions`] error.
    #[inline]
    pub fn invalid_dimensions(width: u32, height: u32, reason: impl Into<String>) -> Self {
        Self::InvalidDimensions {
            width,
            height,
            reason: reason.into(),
        }
    }

    /// Returns `true` if the error reports a missing capability rather
    /// than bad input.
    #[inline]
    pub fn is_unsupported(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedFormat { .. }
                | Self::UnsupportedNumericForm { .. }
                | Self::UnsupportedFormatFamily { .. }
        )
    }

    /// Returns `true` if this is a registry lookup miss.
    #[inline]
    pub fn is_lookup_error(&self) -> bool {
        matches!(self, Self::UnknownColorSpace(_) | Self::UnknownGamma(_))
    }

    /// Returns `true` if this is a buffer geometry error.
    #[inline]
    pub fn is_geometry_error(&self) -> bool {
        matches!(
            self,
            Self::BufferTooSmall { .. } | Self::InvalidRegion { .. } | Self::InvalidDimensions { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_message() {
        let err = Error::parse("rgb:q8", "unknown component 'q'");
        let msg = err.to_string();
        assert!(msg.contains("rgb:q8"));
        assert!(msg.contains("unknown component"));
    }

    #[test]
    fn test_unsupported_predicates() {
        assert!(Error::unsupported_format("rgb:r5g6b5").is_unsupported());
        assert!(Error::unsupported_form("float", 8).is_unsupported());
        assert!(Error::unsupported_family("yuv").is_unsupported());
        assert!(!Error::UnknownGamma("x".into()).is_unsupported());
    }

    #[test]
    fn test_lookup_errors_carry_identifier() {
        let err = Error::UnknownColorSpace("Bogus".into());
        assert!(err.is_lookup_error());
        assert!(err.to_string().contains("Bogus"));
    }

    #[test]
    fn test_region_error() {
        let err = Error::invalid_region(10, 10, 100, 100, 50, 50);
        assert!(err.is_geometry_error());
        assert!(err.to_string().contains("50x50"));
    }
}
