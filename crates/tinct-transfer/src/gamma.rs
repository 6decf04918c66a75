//! Pure power-law gamma.
//!
//! - 1.8: ProPhoto RGB
//! - 2.19921875: Adobe RGB (1998), `563/256`
//! - 2.6: DCI theatrical projection
//!
//! # Range
//!
//! - Input/Output: [0, 1]; negatives are mirrored

use crate::mirror;

/// EOTF for arbitrary gamma: `v^gamma`
///
/// # Example
///
/// ```rust
/// use tinct_transfer::gamma::gamma_eotf;
///
/// assert_eq!(gamma_eotf(0.5, 2.0), 0.25);
/// assert_eq!(gamma_eotf(-0.5, 2.0), -0.25);
/// ```
#[inline]
pub fn gamma_eotf(v: f64, gamma: f64) -> f64 {
    mirror(v, |v| v.powf(gamma))
}

/// OETF for arbitrary gamma: `l^(1/gamma)`
#[inline]
pub fn gamma_oetf(l: f64, gamma: f64) -> f64 {
    mirror(l, |l| l.powf(1.0 / gamma))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_roundtrip() {
        for gamma in [1.8, 2.19921875, 2.6] {
            for i in 0..=20 {
                let v = i as f64 / 20.0;
                assert_abs_diff_eq!(gamma_oetf(gamma_eotf(v, gamma), gamma), v, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_endpoints_fixed() {
        assert_eq!(gamma_eotf(0.0, 2.6), 0.0);
        assert_eq!(gamma_eotf(1.0, 2.6), 1.0);
        assert!(gamma_oetf(f64::NAN, 2.2).is_nan());
    }
}
