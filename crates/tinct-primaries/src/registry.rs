//! Named color spaces resolved to matrices and curves.
//!
//! [`ColorSpaceRegistry`] maps a color-space name to its primaries and
//! default gamma. [`resolve`](ColorSpaceRegistry::resolve) accepts the
//! full identifier grammar `name["^" gamma]` and returns an [`RgbSpace`]
//! carrying everything a conversion needs.
//!
//! Lookup is case-sensitive. A process-wide registry holding the
//! built-ins is available through [`ColorSpaceRegistry::global`]; custom
//! spaces go into an owned instance.

use crate::{Primaries, rgb_to_xyz_matrix};
use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock, RwLock};
use tinct_core::{BUILTIN_SPACES, ColorSpace, Error, Result, split_color_space_id};
use tinct_math::{Mat3, Vec3};
use tinct_transfer::Transfer;

/// A resolved RGB color space.
///
/// Immutable once built; conversions hold it behind an [`Arc`].
#[derive(Debug, Clone, PartialEq)]
pub struct RgbSpace {
    id: String,
    name: String,
    gamma: String,
    primaries: Primaries,
    transfer: Transfer,
    rgb_to_xyz: Mat3,
    xyz_to_rgb: Mat3,
}

impl RgbSpace {
    /// Builds a space from its name, primaries and gamma expression.
    ///
    /// The identifier is `name` when `gamma` is the space's own default
    /// and no override was given; use [`with_gamma`](Self::with_gamma)
    /// for overrides.
    pub fn new(name: impl Into<String>, primaries: Primaries, gamma: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let gamma = gamma.into();
        if name.is_empty() || name.contains('^') {
            return Err(Error::invalid_color_space(name, "name must be non-empty without '^'"));
        }
        let transfer = Transfer::resolve(&gamma)?;
        let rgb_to_xyz = rgb_to_xyz_matrix(&primaries)
            .ok_or_else(|| Error::invalid_color_space(&name, "primaries are collinear"))?;
        let xyz_to_rgb = rgb_to_xyz
            .inverse()
            .ok_or_else(|| Error::invalid_color_space(&name, "RGB to XYZ matrix is singular"))?;
        Ok(Self {
            id: name.clone(),
            name,
            gamma,
            primaries,
            transfer,
            rgb_to_xyz,
            xyz_to_rgb,
        })
    }

    /// The same primaries under a different gamma expression.
    ///
    /// The identifier becomes `name^gamma`.
    pub fn with_gamma(&self, gamma: &str) -> Result<Self> {
        Ok(Self {
            id: format!("{}^{gamma}", self.name),
            gamma: gamma.to_string(),
            transfer: Transfer::resolve(gamma)?,
            ..self.clone()
        })
    }

    /// The space described by a marker type, cached per type.
    ///
    /// Works for markers that are not in any registry.
    pub fn of<C: ColorSpace>() -> Result<Arc<Self>> {
        static CACHE: OnceLock<RwLock<HashMap<TypeId, Arc<RgbSpace>>>> = OnceLock::new();
        let cache = CACHE.get_or_init(Default::default);
        let key = TypeId::of::<C>();

        if let Some(space) = cache.read().ok().and_then(|map| map.get(&key).cloned()) {
            return Ok(space);
        }

        let mut space = Self::new(C::NAME, Primaries::of::<C>(), C::GAMMA)?;
        space.id = C::ID.to_string();
        let space = Arc::new(space);
        match cache.write() {
            Ok(mut map) => Ok(Arc::clone(map.entry(key).or_insert(space))),
            Err(_) => Ok(space),
        }
    }

    /// Full identifier, including any gamma suffix.
    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Name without gamma suffix.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Effective gamma expression.
    #[inline]
    pub fn gamma_expr(&self) -> &str {
        &self.gamma
    }

    /// Chromaticities of primaries and white.
    #[inline]
    pub fn primaries(&self) -> &Primaries {
        &self.primaries
    }

    /// White point chromaticity.
    #[inline]
    pub fn white_point(&self) -> (f64, f64) {
        self.primaries.w
    }

    /// Gamma curve pair.
    #[inline]
    pub fn transfer(&self) -> Transfer {
        self.transfer
    }

    /// Linear RGB to XYZ.
    #[inline]
    pub fn rgb_to_xyz(&self) -> &Mat3 {
        &self.rgb_to_xyz
    }

    /// XYZ to linear RGB.
    #[inline]
    pub fn xyz_to_rgb(&self) -> &Mat3 {
        &self.xyz_to_rgb
    }

    /// Luma weights: the Y row of the RGB to XYZ matrix.
    #[inline]
    pub fn luma_weights(&self) -> Vec3 {
        self.rgb_to_xyz.row(1)
    }

    /// Whether both spaces share primaries, ignoring gamma suffixes.
    #[inline]
    pub fn same_primaries(&self, other: &Self) -> bool {
        self.name == other.name
    }

    /// Composed linear RGB matrix from `self` to `dst`.
    #[inline]
    pub fn matrix_to(&self, dst: &Self) -> Mat3 {
        dst.xyz_to_rgb * self.rgb_to_xyz
    }
}

impl fmt::Display for RgbSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

/// Registry of named RGB color spaces.
///
/// ```rust
/// use tinct_primaries::{ColorSpaceRegistry, Primaries, RgbSpace};
///
/// let mut reg = ColorSpaceRegistry::with_builtins();
/// let wide = Primaries { r: (0.70, 0.29), g: (0.17, 0.79), b: (0.13, 0.05), w: (0.3127, 0.3290) };
/// reg.register(RgbSpace::new("Wide", wide, "2.2").unwrap());
///
/// let lin = reg.resolve("Wide^1").unwrap();
/// assert_eq!(lin.id(), "Wide^1");
/// assert!(lin.transfer().is_identity());
/// assert!(reg.resolve("wide").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ColorSpaceRegistry {
    spaces: HashMap<String, Arc<RgbSpace>>,
}

impl ColorSpaceRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding every built-in space.
    pub fn with_builtins() -> Self {
        let mut reg = Self::new();
        for info in &BUILTIN_SPACES {
            match RgbSpace::new(info.name, Primaries::from_info(info), info.gamma) {
                Ok(space) => reg.register(space),
                Err(err) => tracing::warn!(name = info.name, %err, "skipping built-in color space"),
            }
        }
        reg
    }

    /// The shared registry of built-in spaces.
    pub fn global() -> &'static Self {
        static GLOBAL: OnceLock<ColorSpaceRegistry> = OnceLock::new();
        GLOBAL.get_or_init(Self::with_builtins)
    }

    /// Registers (or replaces) a space under its name.
    pub fn register(&mut self, space: RgbSpace) {
        tracing::debug!(name = space.name(), gamma = space.gamma_expr(), "registering color space");
        self.spaces.insert(space.name().to_string(), Arc::new(space));
    }

    /// Whether a name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.spaces.contains_key(name)
    }

    /// Registered spaces, sorted by name.
    pub fn spaces(&self) -> Vec<Arc<RgbSpace>> {
        let mut all: Vec<_> = self.spaces.values().cloned().collect();
        all.sort_by(|a, b| a.name().cmp(b.name()));
        all
    }

    /// Resolves an identifier `name` or `name^gamma`.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownColorSpace`] with the full identifier if the name is
    /// not registered, [`Error::UnknownGamma`] if the suffix is not a known
    /// gamma expression.
    pub fn resolve(&self, id: &str) -> Result<Arc<RgbSpace>> {
        let (name, gamma) = split_color_space_id(id);
        let base = self
            .spaces
            .get(name)
            .ok_or_else(|| Error::UnknownColorSpace(id.to_string()))?;
        match gamma {
            None => Ok(Arc::clone(base)),
            Some(g) => Ok(Arc::new(base.with_gamma(g)?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use tinct_core::{LinearSrgb, Srgb};

    #[test]
    fn test_builtins_registered() {
        let reg = ColorSpaceRegistry::global();
        for name in [
            "sRGB", "Rec709", "Rec2020", "DCI-P3", "DisplayP3", "AdobeRGB", "ProPhotoRGB", "ACEScg",
            "ACES2065-1",
        ] {
            assert!(reg.contains(name), "{name}");
        }
        assert_eq!(reg.spaces().len(), 9);
    }

    #[test]
    fn test_resolve_gamma_suffix() {
        let reg = ColorSpaceRegistry::global();
        let srgb = reg.resolve("sRGB").unwrap();
        let lin = reg.resolve("sRGB^1").unwrap();
        assert_eq!(srgb.transfer(), Transfer::Srgb);
        assert_eq!(lin.transfer(), Transfer::Linear);
        assert_eq!(lin.id(), "sRGB^1");
        assert!(srgb.same_primaries(&lin));
        assert_eq!(srgb.rgb_to_xyz(), lin.rgb_to_xyz());
    }

    #[test]
    fn test_resolve_errors_carry_identifier() {
        let reg = ColorSpaceRegistry::global();
        assert_eq!(
            reg.resolve("srgb").unwrap_err(),
            Error::UnknownColorSpace("srgb".into())
        );
        assert_eq!(
            reg.resolve("Bogus^1").unwrap_err(),
            Error::UnknownColorSpace("Bogus^1".into())
        );
        assert_eq!(
            reg.resolve("sRGB^PQ").unwrap_err(),
            Error::UnknownGamma("PQ".into())
        );
    }

    #[test]
    fn test_luma_weights_rec709() {
        let w = ColorSpaceRegistry::global().resolve("sRGB").unwrap().luma_weights();
        assert_abs_diff_eq!(w.x, 0.2126, epsilon = 1e-4);
        assert_abs_diff_eq!(w.y, 0.7152, epsilon = 1e-4);
        assert_abs_diff_eq!(w.z, 0.0722, epsilon = 1e-4);
        assert_abs_diff_eq!(w.x + w.y + w.z, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_marker_matches_registry() {
        let marker = RgbSpace::of::<LinearSrgb>().unwrap();
        assert_eq!(marker.id(), "sRGB^1");
        let resolved = ColorSpaceRegistry::global().resolve("sRGB^1").unwrap();
        assert_eq!(*marker, *resolved);
        assert!(Arc::ptr_eq(&RgbSpace::of::<Srgb>().unwrap(), &RgbSpace::of::<Srgb>().unwrap()));
    }

    #[test]
    fn test_matrix_to_composes() {
        let reg = ColorSpaceRegistry::global();
        let src = reg.resolve("sRGB").unwrap();
        let dst = reg.resolve("Rec2020").unwrap();
        let v = Vec3::new(0.2, 0.5, 0.9);
        let once = src.matrix_to(&dst) * v;
        let twice = *dst.xyz_to_rgb() * (*src.rgb_to_xyz() * v);
        for i in 0..3 {
            assert_abs_diff_eq!(once[i], twice[i], epsilon = 1e-12);
        }
    }

    #[test]
    fn test_invalid_definitions() {
        let p = Primaries::of::<Srgb>();
        assert!(matches!(RgbSpace::new("A^B", p, "1"), Err(Error::InvalidColorSpace { .. })));
        assert!(matches!(RgbSpace::new("A", p, "bogus"), Err(Error::UnknownGamma(_))));
    }
}
