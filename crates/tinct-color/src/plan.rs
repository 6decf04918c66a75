//! Plan-based conversion for runtime pixel formats.
//!
//! When a pixel format arrives as data (a format string attached to an
//! image buffer), everything that depends only on the format pair is
//! resolved once into a [`ConversionPlan`]: families, operability,
//! codecs, color spaces and the [`Route`] between them. Applying a plan
//! to a pixel is decode, transform, encode.
//!
//! # Usage
//!
//! ```rust
//! use tinct_color::{ConversionPlan, Route, TypedPlan, Rgba16};
//! use tinct_core::PixelFormat;
//!
//! let plan = ConversionPlan::parse("rgb:b8g8r8a8", "rgb:r16g16b16a16@sRGB^1").unwrap();
//! assert!(matches!(plan.route(), Route::Transform(_)));
//!
//! let mut out = [0u8; 8];
//! plan.convert_pixel(&[0x02, 0x80, 0xFF, 0x40], &mut out).unwrap();
//! assert_eq!(out, [0xFF, 0xFF, 0x42, 0x37, 0x28, 0x00, 0x40, 0x40]);
//!
//! // Statically typed target
//! let typed = TypedPlan::<Rgba16>::new(&PixelFormat::parse("rgb:b8g8r8a8").unwrap()).unwrap();
//! let px = typed.convert_pixel(&[0x02, 0x80, 0xFF, 0x40]).unwrap();
//! assert_eq!(px.components(), &[0xFFFF, 0x8080, 0x0202, 0x4040]);
//! ```
//!
//! # Caching
//!
//! [`PlanCache`] memoizes plans per (source format string, target) pair
//! and is safe to share between threads.

use crate::convert::{ColorTransform, rgb_to_xyz, xyz_to_rgb};
use crate::layout::ChannelMap;
use crate::pixel::PixelType;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::{Arc, OnceLock, RwLock};
use tinct_core::{Error, Family, ImageView, MAX_COMPONENTS, PixelFormat, Result};
use tinct_math::Vec3;
use tinct_primaries::{ColorSpaceRegistry, RgbSpace};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// How values travel from source to target.
#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    /// Identical color-space identifiers: numeric re-encode only.
    SameSpace,
    /// RGB to RGB through gamma curves and, if needed, a matrix.
    Transform(ColorTransform),
    /// RGB in the given space to XYZ.
    RgbToXyz(Arc<RgbSpace>),
    /// XYZ to RGB in the given space.
    XyzToRgb(Arc<RgbSpace>),
    /// XYZ to XYZ: numeric re-encode only.
    XyzToXyz,
}

impl Route {
    /// Short name for logs and diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Self::SameSpace => "same-space",
            Self::Transform(_) => "transform",
            Self::RgbToXyz(_) => "rgb-to-xyz",
            Self::XyzToRgb(_) => "xyz-to-rgb",
            Self::XyzToXyz => "xyz-to-xyz",
        }
    }

    /// Applies the route to canonical `[r, g, b, a]` (or `[x, y, z, _]`).
    pub fn apply(&self, rgba: [f64; 4]) -> [f64; 4] {
        match self {
            Self::SameSpace | Self::XyzToXyz => rgba,
            Self::Transform(t) => t.apply_rgba(rgba),
            Self::RgbToXyz(space) => {
                let [x, y, z] = rgb_to_xyz(space, [rgba[0], rgba[1], rgba[2]]);
                [x, y, z, 0.0]
            }
            Self::XyzToRgb(space) => {
                let [r, g, b] = xyz_to_rgb(space, [rgba[0], rgba[1], rgba[2]]);
                [r, g, b, 0.0]
            }
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transform(t) => write!(f, "{} -> {}", t.source(), t.target()),
            Self::RgbToXyz(space) => write!(f, "{space} -> XYZ"),
            Self::XyzToRgb(space) => write!(f, "XYZ -> {space}"),
            other => f.write_str(other.name()),
        }
    }
}

/// A conversion between two runtime formats, resolved once.
///
/// Immutable and `Send + Sync`; share it by reference across threads.
#[derive(Debug, Clone)]
pub struct ConversionPlan {
    source: PixelFormat,
    target: PixelFormat,
    source_map: ChannelMap,
    target_map: ChannelMap,
    route: Route,
    luma: Vec3,
    source_stride: usize,
    target_stride: usize,
}

impl ConversionPlan {
    /// Resolves a plan against the built-in color spaces.
    ///
    /// # Errors
    ///
    /// - [`Error::UnsupportedFormatFamily`] for a family other than rgb
    ///   or xyz
    /// - [`Error::UnsupportedFormat`] for a non-operable format
    /// - [`Error::UnsupportedNumericForm`] for a component without codec
    /// - [`Error::UnknownColorSpace`] / [`Error::UnknownGamma`] for
    ///   registry misses
    pub fn new(source: &PixelFormat, target: &PixelFormat) -> Result<Self> {
        Self::with_registry(source, target, ColorSpaceRegistry::global())
    }

    /// Resolves a plan against a caller-supplied registry.
    pub fn with_registry(
        source: &PixelFormat,
        target: &PixelFormat,
        registry: &ColorSpaceRegistry,
    ) -> Result<Self> {
        Self::build(source, target, None, registry)
    }

    /// Parses both format strings and resolves a plan.
    pub fn parse(source: &str, target: &str) -> Result<Self> {
        Self::new(&PixelFormat::parse(source)?, &PixelFormat::parse(target)?)
    }

    fn build(
        source: &PixelFormat,
        target: &PixelFormat,
        target_space: Option<Arc<RgbSpace>>,
        registry: &ColorSpaceRegistry,
    ) -> Result<Self> {
        for fmt in [source, target] {
            if let Family::Other(key) = fmt.family() {
                return Err(Error::unsupported_family(key.as_str()));
            }
            fmt.ensure_operable()?;
            fmt.check_codecs()?;
        }

        let resolve = |fmt: &PixelFormat| {
            fmt.color_space_id()
                .map(|id| registry.resolve(&id))
                .transpose()
        };
        let src_space = resolve(source)?;
        let dst_space = match target_space {
            Some(space) => Some(space),
            None => resolve(target)?,
        };

        let luma = dst_space
            .as_ref()
            .map_or(Vec3::ZERO, |space| space.luma_weights());
        let route = match (src_space, dst_space) {
            (Some(s), Some(d)) if s.id() == d.id() => Route::SameSpace,
            (Some(s), Some(d)) => Route::Transform(ColorTransform::new(s, d)),
            (Some(s), None) => Route::RgbToXyz(s),
            (None, Some(d)) => Route::XyzToRgb(d),
            (None, None) => Route::XyzToXyz,
        };

        tracing::debug!(from = %source, to = %target, route = %route, "built conversion plan");

        Ok(Self {
            source_map: ChannelMap::from_components(source.components()),
            target_map: ChannelMap::from_components(target.components()),
            source_stride: source.bytes_per_pixel(),
            target_stride: target.bytes_per_pixel(),
            source: source.clone(),
            target: target.clone(),
            route,
            luma,
        })
    }

    /// Source format.
    #[inline]
    pub fn source(&self) -> &PixelFormat {
        &self.source
    }

    /// Target format.
    #[inline]
    pub fn target(&self) -> &PixelFormat {
        &self.target
    }

    /// Resolved route.
    #[inline]
    pub fn route(&self) -> &Route {
        &self.route
    }

    /// Bytes per source pixel.
    #[inline]
    pub fn source_stride(&self) -> usize {
        self.source_stride
    }

    /// Bytes per target pixel.
    #[inline]
    pub fn target_stride(&self) -> usize {
        self.target_stride
    }

    /// Converts decoded source components into decoded target
    /// components, both in storage order.
    pub fn convert_values(&self, decoded: &[f64]) -> [f64; MAX_COMPONENTS] {
        let rgba = self.route.apply(self.source_map.unpack(decoded));
        let mut out = [0.0; MAX_COMPONENTS];
        self.target_map.pack(rgba, self.luma, &mut out);
        out
    }

    fn decode_source(&self, pixel: &[u8]) -> Result<[f64; MAX_COMPONENTS]> {
        self.source.decode_components(pixel)
    }

    /// Converts one pixel from `src` bytes into `dst` bytes.
    pub fn convert_pixel(&self, src: &[u8], dst: &mut [u8]) -> Result<()> {
        let values = self.convert_values(&self.decode_source(src)?);
        self.target.encode_components(&values, dst)
    }

    /// Converts a packed run of pixels; returns the pixel count.
    ///
    /// Trailing bytes that do not form a whole source pixel are ignored.
    pub fn convert_buffer(&self, src: &[u8], dst: &mut [u8]) -> Result<usize> {
        let count = src.len() / self.source_stride;
        let needed = count * self.target_stride;
        if dst.len() < needed {
            return Err(Error::buffer_too_small(needed, dst.len()));
        }
        for (s, d) in src
            .chunks_exact(self.source_stride)
            .zip(dst.chunks_exact_mut(self.target_stride))
        {
            self.convert_pixel(s, d)?;
        }
        Ok(count)
    }

    fn check_image(&self, image: &ImageView<'_>) -> Result<()> {
        if image.format() == &self.source {
            Ok(())
        } else {
            Err(Error::unsupported_format(format!(
                "{} (plan expects {})",
                image.format(),
                self.source
            )))
        }
    }

    /// Converts every pixel of `image` into tightly packed target bytes.
    pub fn convert_image(&self, image: &ImageView<'_>) -> Result<Vec<u8>> {
        self.check_image(image)?;
        tracing::trace!(
            width = image.width(),
            height = image.height(),
            route = self.route.name(),
            "converting image"
        );
        let row_bytes = image.width() as usize * self.target_stride;
        let mut out = vec![0u8; row_bytes * image.height() as usize];
        for (row, dst) in image.rows().zip(out.chunks_exact_mut(row_bytes)) {
            self.convert_buffer(row, dst)?;
        }
        Ok(out)
    }

    /// Row-parallel [`convert_image`](Self::convert_image).
    #[cfg(feature = "parallel")]
    pub fn convert_image_par(&self, image: &ImageView<'_>) -> Result<Vec<u8>> {
        self.check_image(image)?;
        tracing::trace!(
            width = image.width(),
            height = image.height(),
            route = self.route.name(),
            "converting image in parallel"
        );
        let row_bytes = image.width() as usize * self.target_stride;
        let mut out = vec![0u8; row_bytes * image.height() as usize];
        out.par_chunks_mut(row_bytes)
            .enumerate()
            .try_for_each(|(y, dst)| self.convert_buffer(image.row(y as u32), dst).map(|_| ()))?;
        Ok(out)
    }
}

/// A plan whose target is a static pixel type.
pub struct TypedPlan<T> {
    plan: ConversionPlan,
    _target: PhantomData<fn() -> T>,
}

impl<T> Clone for TypedPlan<T> {
    fn clone(&self) -> Self {
        Self {
            plan: self.plan.clone(),
            _target: PhantomData,
        }
    }
}

impl<T> fmt::Debug for TypedPlan<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedPlan")
            .field("target", &std::any::type_name::<T>())
            .field("plan", &self.plan)
            .finish()
    }
}

impl<T: PixelType> TypedPlan<T> {
    /// Resolves a plan from `source` against the built-in color spaces.
    ///
    /// The target's color space comes from its marker, so custom markers
    /// need no registration.
    pub fn new(source: &PixelFormat) -> Result<Self> {
        Self::with_registry(source, ColorSpaceRegistry::global())
    }

    /// Resolves the source space in a caller-supplied registry.
    pub fn with_registry(source: &PixelFormat, registry: &ColorSpaceRegistry) -> Result<Self> {
        let plan = ConversionPlan::build(source, &T::format()?, T::color_space()?, registry)?;
        Ok(Self {
            plan,
            _target: PhantomData,
        })
    }

    /// The underlying runtime plan.
    #[inline]
    pub fn plan(&self) -> &ConversionPlan {
        &self.plan
    }

    /// Converts one pixel.
    pub fn convert_pixel(&self, src: &[u8]) -> Result<T> {
        let decoded = self.plan.decode_source(src)?;
        Ok(T::from_values(&self.plan.convert_values(&decoded)))
    }

    fn convert_row(&self, row: &[u8], width: usize) -> Result<Vec<T>> {
        row.chunks_exact(self.plan.source_stride)
            .take(width)
            .map(|px| self.convert_pixel(px))
            .collect()
    }

    /// Converts every pixel of `image`, row-major.
    pub fn convert_image(&self, image: &ImageView<'_>) -> Result<Vec<T>> {
        self.plan.check_image(image)?;
        tracing::trace!(
            width = image.width(),
            height = image.height(),
            route = self.plan.route.name(),
            "converting image"
        );
        let width = image.width() as usize;
        let mut out = Vec::with_capacity(image.pixel_count());
        for row in image.rows() {
            out.extend(self.convert_row(row, width)?);
        }
        Ok(out)
    }

    /// Row-parallel [`convert_image`](Self::convert_image).
    #[cfg(feature = "parallel")]
    pub fn convert_image_par(&self, image: &ImageView<'_>) -> Result<Vec<T>> {
        self.plan.check_image(image)?;
        let width = image.width() as usize;
        let rows = (0..image.height())
            .into_par_iter()
            .map(|y| self.convert_row(image.row(y), width))
            .collect::<Result<Vec<_>>>()?;
        Ok(rows.concat())
    }
}

type CacheKey<K> = (String, K);

/// Thread-safe memo of conversion plans.
///
/// Keys are the source format string as given plus the target (a format
/// string or a pixel type).
#[derive(Default)]
pub struct PlanCache {
    registry: Option<Arc<ColorSpaceRegistry>>,
    plans: RwLock<HashMap<CacheKey<String>, Arc<ConversionPlan>>>,
    typed: RwLock<HashMap<CacheKey<TypeId>, Arc<dyn Any + Send + Sync>>>,
}

impl fmt::Debug for PlanCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlanCache")
            .field("custom_registry", &self.registry.is_some())
            .field("len", &self.len())
            .finish()
    }
}

impl PlanCache {
    /// Creates an empty cache resolving against the built-in spaces.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty cache resolving against `registry`.
    pub fn with_registry(registry: Arc<ColorSpaceRegistry>) -> Self {
        Self {
            registry: Some(registry),
            ..Self::default()
        }
    }

    /// The process-wide cache used by [`convert_image`].
    pub fn global() -> &'static Self {
        static GLOBAL: OnceLock<PlanCache> = OnceLock::new();
        GLOBAL.get_or_init(Self::new)
    }

    fn registry(&self) -> &ColorSpaceRegistry {
        self.registry
            .as_deref()
            .unwrap_or_else(|| ColorSpaceRegistry::global())
    }

    /// Plan between two format strings, built on first use.
    pub fn plan(&self, source: &str, target: &str) -> Result<Arc<ConversionPlan>> {
        let key = (source.to_string(), target.to_string());
        if let Some(plan) = self.plans.read().ok().and_then(|map| map.get(&key).cloned()) {
            tracing::debug!(from = source, to = target, "plan cache hit");
            return Ok(plan);
        }

        tracing::debug!(from = source, to = target, "plan cache miss");
        let plan = Arc::new(ConversionPlan::with_registry(
            &PixelFormat::parse(source)?,
            &PixelFormat::parse(target)?,
            self.registry(),
        )?);
        match self.plans.write() {
            Ok(mut map) => Ok(Arc::clone(map.entry(key).or_insert(plan))),
            Err(_) => Ok(plan),
        }
    }

    /// Typed plan from a source format string, built on first use.
    pub fn typed<T: PixelType>(&self, source: &str) -> Result<Arc<TypedPlan<T>>> {
        let key = (source.to_string(), TypeId::of::<T>());
        let hit = self.typed.read().ok().and_then(|map| map.get(&key).cloned());
        if let Some(plan) = hit.and_then(|any| any.downcast::<TypedPlan<T>>().ok()) {
            tracing::debug!(from = source, to = std::any::type_name::<T>(), "plan cache hit");
            return Ok(plan);
        }

        tracing::debug!(from = source, to = std::any::type_name::<T>(), "plan cache miss");
        let plan = Arc::new(TypedPlan::<T>::with_registry(
            &PixelFormat::parse(source)?,
            self.registry(),
        )?);
        if let Ok(mut map) = self.typed.write() {
            map.entry(key).or_insert_with(|| plan.clone() as Arc<dyn Any + Send + Sync>);
        }
        Ok(plan)
    }

    /// Number of cached plans.
    pub fn len(&self) -> usize {
        let count = |n: Option<usize>| n.unwrap_or(0);
        count(self.plans.read().ok().map(|m| m.len())) + count(self.typed.read().ok().map(|m| m.len()))
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every cached plan.
    pub fn clear(&self) {
        if let Ok(mut map) = self.plans.write() {
            map.clear();
        }
        if let Ok(mut map) = self.typed.write() {
            map.clear();
        }
    }
}

/// Converts an image of any operable rgb or xyz format to `T`.
///
/// Plans are memoized in [`PlanCache::global`], so repeated calls for
/// the same source format resolve once.
pub fn convert_image<T: PixelType>(image: &ImageView<'_>) -> Result<Vec<T>> {
    PlanCache::global()
        .typed::<T>(&image.format().to_string())?
        .convert_image(image)
}
