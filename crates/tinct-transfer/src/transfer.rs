//! Gamma expressions resolved to curve pairs.
//!
//! A color-space identifier may carry a gamma expression (`sRGB^1`,
//! `AdobeRGB^2.2`), and every registered space has a default one.
//! [`Transfer::resolve`] turns the expression into a curve:
//!
//! | Expression | Curve |
//! |------------|-------|
//! | `1`, `1.0` (any number equal to one) | [`Transfer::Linear`] |
//! | positive decimal `γ` | [`Transfer::Power`] |
//! | `sRGB`, `srgb` | [`Transfer::Srgb`] |
//! | `Rec709`, `BT709` | [`Transfer::Rec709`] |
//!
//! Anything else fails with [`Error::UnknownGamma`].
//!
//! # Usage
//!
//! ```rust
//! use tinct_transfer::Transfer;
//!
//! let t = Transfer::resolve("2.2").unwrap();
//! let lin = t.to_linear(0.5);
//! assert!((t.to_gamma(lin) - 0.5).abs() < 1e-12);
//! assert!(Transfer::resolve("1").unwrap().is_identity());
//! assert!(Transfer::resolve("PQ").is_err());
//! ```

use crate::{gamma, rec709, srgb};
use std::fmt;
use tinct_core::{Error, Result};

/// A gamma function pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transfer {
    /// Identity
    Linear,
    /// Pure power law, `v^γ` to linear
    Power(f64),
    /// IEC 61966-2-1 piecewise curve
    Srgb,
    /// ITU-R BT.709 OETF and its inverse
    Rec709,
}

impl Transfer {
    /// Resolves a gamma expression.
    pub fn resolve(expr: &str) -> Result<Self> {
        match expr {
            "sRGB" | "srgb" => return Ok(Self::Srgb),
            "Rec709" | "BT709" => return Ok(Self::Rec709),
            _ => {}
        }
        match expr.parse::<f64>() {
            Ok(g) if g == 1.0 => Ok(Self::Linear),
            Ok(g) if g > 0.0 && g.is_finite() => Ok(Self::Power(g)),
            _ => Err(Error::UnknownGamma(expr.to_string())),
        }
    }

    /// Whether both directions are the identity.
    #[inline]
    pub fn is_identity(self) -> bool {
        matches!(self, Self::Linear)
    }

    /// Decodes a gamma-encoded value to linear light.
    #[inline]
    pub fn to_linear(self, v: f64) -> f64 {
        match self {
            Self::Linear => v,
            Self::Power(g) => gamma::gamma_eotf(v, g),
            Self::Srgb => srgb::eotf(v),
            Self::Rec709 => rec709::eotf(v),
        }
    }

    /// Encodes a linear value.
    #[inline]
    pub fn to_gamma(self, v: f64) -> f64 {
        match self {
            Self::Linear => v,
            Self::Power(g) => gamma::gamma_oetf(v, g),
            Self::Srgb => srgb::oetf(v),
            Self::Rec709 => rec709::oetf(v),
        }
    }
}

impl fmt::Display for Transfer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear => f.write_str("1"),
            Self::Power(g) => write!(f, "{g}"),
            Self::Srgb => f.write_str("sRGB"),
            Self::Rec709 => f.write_str("Rec709"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_resolve_names() {
        assert_eq!(Transfer::resolve("sRGB").unwrap(), Transfer::Srgb);
        assert_eq!(Transfer::resolve("srgb").unwrap(), Transfer::Srgb);
        assert_eq!(Transfer::resolve("BT709").unwrap(), Transfer::Rec709);
        assert_eq!(Transfer::resolve("1.0").unwrap(), Transfer::Linear);
        assert_eq!(Transfer::resolve("2.6").unwrap(), Transfer::Power(2.6));
    }

    #[test]
    fn test_resolve_rejects() {
        for bad in ["", "0", "-2.2", "inf", "NaN", "SRGB", "gamma"] {
            assert!(
                matches!(Transfer::resolve(bad), Err(Error::UnknownGamma(ref e)) if e == bad),
                "{bad}"
            );
        }
    }

    #[test]
    fn test_identity_passthrough() {
        let t = Transfer::Linear;
        assert_eq!(t.to_linear(0.3), 0.3);
        assert_eq!(t.to_gamma(-4.0), -4.0);
        assert!(t.to_gamma(f64::NAN).is_nan());
    }

    #[test]
    fn test_inverse_pairs() {
        for t in [Transfer::Srgb, Transfer::Rec709, Transfer::Power(1.8)] {
            for i in 0..=10 {
                let v = i as f64 / 10.0;
                assert_abs_diff_eq!(t.to_gamma(t.to_linear(v)), v, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_display_resolves_back() {
        for t in [Transfer::Linear, Transfer::Power(2.2), Transfer::Srgb, Transfer::Rec709] {
            assert_eq!(Transfer::resolve(&t.to_string()).unwrap(), t);
        }
    }
}
