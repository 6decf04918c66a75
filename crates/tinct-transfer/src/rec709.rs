//! Rec.709 (BT.709) transfer function.
//!
//! The Rec.709 OETF is used for HDTV encoding; the same curve shape
//! encodes Rec.2020. Decoding uses the exact inverse of the OETF, not
//! the BT.1886 display EOTF.
//!
//! # Range
//!
//! - Input/Output: [0, 1]; negatives are mirrored
//!
//! # Reference
//!
//! ITU-R BT.709-6

use crate::mirror;

const ALPHA: f64 = 1.099;
const BETA: f64 = 0.018;

/// Rec.709 OETF: Encodes linear to Rec.709.
///
/// # Formula
///
/// ```text
/// if L < 0.018:
///     V = 4.5 * L
/// else:
///     V = 1.099 * L^0.45 - 0.099
/// ```
#[inline]
pub fn oetf(l: f64) -> f64 {
    mirror(l, |l| {
        if l < BETA {
            4.5 * l
        } else {
            ALPHA * l.powf(0.45) - (ALPHA - 1.0)
        }
    })
}

/// Rec.709 inverse OETF: Decodes Rec.709 to linear.
#[inline]
pub fn eotf(v: f64) -> f64 {
    mirror(v, |v| {
        if v < 4.5 * BETA {
            v / 4.5
        } else {
            ((v + (ALPHA - 1.0)) / ALPHA).powf(1.0 / 0.45)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_roundtrip() {
        for i in 0..=100 {
            let v = i as f64 / 100.0;
            assert_abs_diff_eq!(oetf(eotf(v)), v, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_boundaries() {
        assert_eq!(oetf(0.0), 0.0);
        assert_abs_diff_eq!(oetf(1.0), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(oetf(-0.01), -0.045, epsilon = 1e-15);
    }
}
