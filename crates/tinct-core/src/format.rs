//! Pixel format descriptors.
//!
//! A [`PixelFormat`] is the runtime description of one pixel encoding: an
//! ordered list of [`Component`]s, a format [`Family`], and (for the rgb
//! family) the color-space identifier the values are expressed in.
//!
//! # Format strings
//!
//! ```text
//! format   := family ":" channels [ "_" form ] [ "@" space ]
//! channels := ( kind width )+
//! kind     := r | g | b | a | l | e | m | x     rgb family, x = padding
//!           | x | y | z                          xyz family
//! form     := unorm | snorm | uint | sint | float | ufixed<n> | sfixed<n>
//! space    := name [ "^" gamma ]
//! ```
//!
//! The form defaults to `unorm` for rgb and `float` for xyz; the space
//! defaults to `sRGB` for rgb. Multi-byte components are little-endian.
//!
//! ```rust
//! use tinct_core::{ComponentKind, PixelFormat};
//!
//! let fmt: PixelFormat = "rgb:b8g8r8a8@sRGB".parse().unwrap();
//! assert_eq!(fmt.components().len(), 4);
//! assert_eq!(fmt.components()[0].kind, ComponentKind::B);
//! assert!(fmt.is_operable());
//!
//! let packed = PixelFormat::parse("rgb:r5g6b5").unwrap();
//! assert!(!packed.is_operable());
//! assert_eq!(packed.bytes_per_pixel(), 2);
//! ```
//!
//! # Operability
//!
//! A format is *operable* when every component shares one numeric form,
//! one bit width, and that width is byte aligned (8, 16, 32 or 64).
//! Only operable formats admit direct construction and conversion; the
//! rest support decode-based access only.

use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Maximum number of components in one pixel.
pub const MAX_COMPONENTS: usize = 6;

/// Color space assumed when an rgb format string names none.
pub const DEFAULT_COLOR_SPACE: &str = "sRGB";

/// The role of one component within a pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    /// Red
    R,
    /// Green
    G,
    /// Blue
    B,
    /// Alpha (coverage), never gamma or matrix transformed
    A,
    /// Luminance for greyscale formats
    Luminance,
    /// Shared exponent
    Exponent,
    /// Luminance mantissa of a shared-exponent greyscale format
    Mantissa,
    /// Unused bits
    Padding,
    /// CIE X
    X,
    /// CIE Y
    Y,
    /// CIE Z
    Z,
}

impl ComponentKind {
    /// Format-string letter for this kind.
    pub const fn letter(self) -> char {
        match self {
            Self::R => 'r',
            Self::G => 'g',
            Self::B => 'b',
            Self::A => 'a',
            Self::Luminance => 'l',
            Self::Exponent => 'e',
            Self::Mantissa => 'm',
            Self::Padding | Self::X => 'x',
            Self::Y => 'y',
            Self::Z => 'z',
        }
    }

    /// Whether this kind carries color information (as opposed to alpha,
    /// exponent or padding).
    #[inline]
    pub const fn is_color(self) -> bool {
        matches!(
            self,
            Self::R | Self::G | Self::B | Self::Luminance | Self::Mantissa
        )
    }

    fn from_rgb_letter(c: char) -> Option<Self> {
        Some(match c {
            'r' => Self::R,
            'g' => Self::G,
            'b' => Self::B,
            'a' => Self::A,
            'l' => Self::Luminance,
            'e' => Self::Exponent,
            'm' => Self::Mantissa,
            'x' => Self::Padding,
            _ => return None,
        })
    }

    fn from_xyz_letter(c: char) -> Option<Self> {
        Some(match c {
            'x' => Self::X,
            'y' => Self::Y,
            'z' => Self::Z,
            _ => return None,
        })
    }
}

/// How a stored integer or float maps to a real number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericForm {
    /// `[0, 2ⁿ−1]` maps to `[0, 1]`
    UnsignedNormalized,
    /// `[−2ⁿ⁻¹, 2ⁿ⁻¹−1]` maps to `[−1, 1]`
    SignedNormalized,
    /// Raw unsigned count
    UnsignedInt,
    /// Raw signed count
    SignedInt,
    /// IEEE float (16, 32 or 64 bits)
    Float,
    /// Unsigned fixed point, `v / 2^fraction_bits`
    FixedPoint,
    /// Signed fixed point, `v / 2^fraction_bits`
    SignedFixedPoint,
}

impl NumericForm {
    /// Short name as used in format strings.
    pub const fn name(self) -> &'static str {
        match self {
            Self::UnsignedNormalized => "unorm",
            Self::SignedNormalized => "snorm",
            Self::UnsignedInt => "uint",
            Self::SignedInt => "sint",
            Self::Float => "float",
            Self::FixedPoint => "ufixed",
            Self::SignedFixedPoint => "sfixed",
        }
    }

    /// Whether stored values are two's complement signed.
    #[inline]
    pub const fn is_signed(self) -> bool {
        matches!(
            self,
            Self::SignedNormalized | Self::SignedInt | Self::SignedFixedPoint | Self::Float
        )
    }

    /// Whether this form carries a fraction-bit count.
    #[inline]
    pub const fn is_fixed(self) -> bool {
        matches!(self, Self::FixedPoint | Self::SignedFixedPoint)
    }
}

impl fmt::Display for NumericForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One named channel of a pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Component {
    /// Role of the channel
    pub kind: ComponentKind,
    /// Numeric representation
    pub form: NumericForm,
    /// Width in bits
    pub bits: u32,
    /// Fraction bits for fixed point forms, zero otherwise
    pub fraction_bits: u32,
}

impl Component {
    /// Creates a component without fraction bits.
    #[inline]
    pub const fn new(kind: ComponentKind, form: NumericForm, bits: u32) -> Self {
        Self {
            kind,
            form,
            bits,
            fraction_bits: 0,
        }
    }

    /// Creates a fixed point component.
    #[inline]
    pub const fn fixed(kind: ComponentKind, form: NumericForm, bits: u32, fraction_bits: u32) -> Self {
        Self {
            kind,
            form,
            bits,
            fraction_bits,
        }
    }

    /// Whether the component occupies whole bytes of a natively sized
    /// integer or float.
    #[inline]
    pub const fn is_byte_aligned(&self) -> bool {
        matches!(self.bits, 8 | 16 | 32 | 64)
    }

    /// Storage size in bytes for byte aligned components.
    #[inline]
    pub const fn bytes(&self) -> usize {
        (self.bits as usize).div_ceil(8)
    }
}

/// A format family: which unpack strategy applies to a pixel.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Family {
    /// RGB-family encodings (including greyscale and shared exponent)
    Rgb,
    /// CIE XYZ tristimulus
    Xyz,
    /// Anything else; carried so that consumers can reject it by name
    Other(String),
}

impl Family {
    /// Registry key of this family.
    pub fn key(&self) -> &str {
        match self {
            Self::Rgb => "rgb",
            Self::Xyz => "xyz",
            Self::Other(name) => name,
        }
    }

    fn from_key(key: &str) -> Self {
        match key {
            "rgb" => Self::Rgb,
            "xyz" => Self::Xyz,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Capability flags derived from the component list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FormatFlags {
    /// Every component has the same [`NumericForm`]
    pub all_same_form: bool,
    /// Every component is 8, 16, 32 or 64 bits wide
    pub all_byte_aligned: bool,
    /// Every component has the same width
    pub all_same_bits: bool,
}

impl FormatFlags {
    /// Whether all three flags hold.
    #[inline]
    pub const fn is_operable(&self) -> bool {
        self.all_same_form && self.all_byte_aligned && self.all_same_bits
    }
}

/// Runtime pixel format descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PixelFormat {
    family: Family,
    components: Vec<Component>,
    color_space: Option<String>,
    gamma: Option<String>,
    flags: FormatFlags,
}

impl PixelFormat {
    /// Builds and validates a descriptor.
    ///
    /// `color_space` is the color-space name without any gamma suffix;
    /// `gamma` is the optional override expression.
    pub fn new(
        family: Family,
        components: Vec<Component>,
        color_space: Option<String>,
        gamma: Option<String>,
    ) -> Result<Self> {
        let flags = compute_flags(&components);
        let fmt = Self {
            family,
            components,
            color_space,
            gamma,
            flags,
        };
        fmt.validate()?;
        Ok(fmt)
    }

    /// Parses a format string.
    pub fn parse(input: &str) -> Result<Self> {
        parse_format(input)
    }

    /// Format family.
    #[inline]
    pub fn family(&self) -> &Family {
        &self.family
    }

    /// Components in storage order.
    #[inline]
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Color-space name without the gamma suffix.
    #[inline]
    pub fn color_space(&self) -> Option<&str> {
        self.color_space.as_deref()
    }

    /// Gamma override expression, if any.
    #[inline]
    pub fn gamma(&self) -> Option<&str> {
        self.gamma.as_deref()
    }

    /// Full color-space identifier (`name` or `name^gamma`).
    pub fn color_space_id(&self) -> Option<String> {
        self.color_space.as_ref().map(|name| match &self.gamma {
            Some(g) => format!("{name}^{g}"),
            None => name.clone(),
        })
    }

    /// Derived capability flags.
    #[inline]
    pub fn flags(&self) -> FormatFlags {
        self.flags
    }

    /// Whether the format admits direct construction and conversion.
    #[inline]
    pub fn is_operable(&self) -> bool {
        self.flags.is_operable()
    }

    /// Returns an [`Error::UnsupportedFormat`] unless the format is operable.
    pub fn ensure_operable(&self) -> Result<()> {
        if self.is_operable() {
            Ok(())
        } else {
            Err(Error::unsupported_format(self.to_string()))
        }
    }

    /// Index of the first component of `kind`.
    #[inline]
    pub fn position(&self, kind: ComponentKind) -> Option<usize> {
        self.components.iter().position(|c| c.kind == kind)
    }

    /// Whether a component of `kind` is present.
    #[inline]
    pub fn has(&self, kind: ComponentKind) -> bool {
        self.position(kind).is_some()
    }

    /// Whether any of R, G or B is present.
    #[inline]
    pub fn has_rgb(&self) -> bool {
        self.has(ComponentKind::R) || self.has(ComponentKind::G) || self.has(ComponentKind::B)
    }

    /// Whether the format uses a shared exponent.
    #[inline]
    pub fn is_shared_exponent(&self) -> bool {
        self.has(ComponentKind::Exponent)
    }

    /// Total bits of one pixel.
    #[inline]
    pub fn bits_per_pixel(&self) -> u32 {
        self.components.iter().map(|c| c.bits).sum()
    }

    /// Bytes occupied by one pixel (rounded up).
    #[inline]
    pub fn bytes_per_pixel(&self) -> usize {
        (self.bits_per_pixel() as usize).div_ceil(8)
    }

    /// Bit offset of each component from the start of the pixel.
    pub fn bit_offsets(&self) -> impl Iterator<Item = u32> + '_ {
        self.components.iter().scan(0u32, |acc, c| {
            let at = *acc;
            *acc += c.bits;
            Some(at)
        })
    }

    fn validate(&self) -> Result<()> {
        let fail = |reason: &str| Err(Error::parse(self.to_string(), reason));

        if self.components.is_empty() {
            return fail("no components");
        }
        if self.components.len() > MAX_COMPONENTS {
            return fail("too many components");
        }
        for (i, c) in self.components.iter().enumerate() {
            if c.bits == 0 || c.bits > 64 {
                return fail("component width must be 1..=64 bits");
            }
            if c.form.is_fixed() && c.fraction_bits > c.bits {
                return fail("fraction bits exceed component width");
            }
            if c.kind != ComponentKind::Padding
                && self.components[..i].iter().any(|p| p.kind == c.kind)
            {
                return fail("duplicate component");
            }
        }

        match self.family {
            Family::Rgb => {
                if !self.components.iter().any(|c| c.kind.is_color()) {
                    return fail("no color component");
                }
                if self.color_space.is_none() {
                    return fail("rgb formats need a color space");
                }
                if let Some(e) = self.position(ComponentKind::Exponent) {
                    if self.components[e].form != NumericForm::UnsignedInt {
                        return fail("shared exponent formats must use uint");
                    }
                    if !self.has_rgb() && !self.has(ComponentKind::Mantissa) {
                        return fail("shared exponent without mantissa channels");
                    }
                } else if self.has(ComponentKind::Mantissa) {
                    return fail("mantissa without exponent");
                }
            }
            Family::Xyz => {
                let kinds: Vec<_> = self.components.iter().map(|c| c.kind).collect();
                if kinds != [ComponentKind::X, ComponentKind::Y, ComponentKind::Z] {
                    return fail("xyz formats must be exactly x, y, z");
                }
                if self.color_space.is_some() {
                    return fail("xyz formats carry no color space");
                }
            }
            Family::Other(_) => {}
        }
        Ok(())
    }
}

fn compute_flags(components: &[Component]) -> FormatFlags {
    let first = components.first();
    FormatFlags {
        all_same_form: components
            .iter()
            .all(|c| Some((c.form, c.fraction_bits)) == first.map(|f| (f.form, f.fraction_bits))),
        all_byte_aligned: components.iter().all(Component::is_byte_aligned),
        all_same_bits: components.iter().all(|c| Some(c.bits) == first.map(|f| f.bits)),
    }
}

fn parse_form(input: &str, text: &str) -> Result<(NumericForm, u32)> {
    let fixed = |rest: &str, form| {
        rest.parse::<u32>()
            .map(|frac| (form, frac))
            .map_err(|_| Error::parse(input, format!("bad fraction bits in {text:?}")))
    };
    match text {
        "unorm" => Ok((NumericForm::UnsignedNormalized, 0)),
        "snorm" => Ok((NumericForm::SignedNormalized, 0)),
        "uint" => Ok((NumericForm::UnsignedInt, 0)),
        "sint" => Ok((NumericForm::SignedInt, 0)),
        "float" => Ok((NumericForm::Float, 0)),
        _ => {
            if let Some(rest) = text.strip_prefix("ufixed") {
                fixed(rest, NumericForm::FixedPoint)
            } else if let Some(rest) = text.strip_prefix("sfixed") {
                fixed(rest, NumericForm::SignedFixedPoint)
            } else {
                Err(Error::parse(input, format!("unknown numeric form {text:?}")))
            }
        }
    }
}

fn parse_channels(
    input: &str,
    family: &Family,
    text: &str,
) -> Result<Vec<(ComponentKind, u32)>> {
    let mut out = Vec::new();
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        let kind = match family {
            Family::Xyz => ComponentKind::from_xyz_letter(c),
            _ => ComponentKind::from_rgb_letter(c),
        }
        .ok_or_else(|| Error::parse(input, format!("unknown component {c:?}")))?;

        let mut digits = String::new();
        while let Some(d) = chars.peek().copied().filter(char::is_ascii_digit) {
            digits.push(d);
            chars.next();
        }
        let bits = digits
            .parse::<u32>()
            .map_err(|_| Error::parse(input, format!("component {c:?} has no width")))?;
        out.push((kind, bits));
    }
    if out.is_empty() {
        return Err(Error::parse(input, "no components"));
    }
    Ok(out)
}

fn parse_format(input: &str) -> Result<PixelFormat> {
    let (family_key, rest) = input
        .split_once(':')
        .ok_or_else(|| Error::parse(input, "missing family prefix"))?;
    if family_key.is_empty() {
        return Err(Error::parse(input, "empty family"));
    }
    let family = Family::from_key(family_key);

    let (body, space) = match rest.split_once('@') {
        Some((body, space)) => (body, Some(space)),
        None => (rest, None),
    };
    let (channels, form) = match body.split_once('_') {
        Some((channels, form)) => (channels, Some(form)),
        None => (body, None),
    };

    let (form, fraction_bits) = match form {
        Some(text) => parse_form(input, text)?,
        None if family == Family::Xyz => (NumericForm::Float, 0),
        None => (NumericForm::UnsignedNormalized, 0),
    };

    let components = parse_channels(input, &family, channels)?
        .into_iter()
        .map(|(kind, bits)| Component::fixed(kind, form, bits, fraction_bits))
        .collect();

    let (color_space, gamma) = match space {
        Some(text) => {
            let (name, gamma) = match text.split_once('^') {
                Some((name, gamma)) => (name, Some(gamma)),
                None => (text, None),
            };
            if name.is_empty() || gamma.is_some_and(str::is_empty) {
                return Err(Error::parse(input, "empty color space or gamma"));
            }
            (Some(name.to_string()), gamma.map(str::to_string))
        }
        None if family == Family::Xyz => (None, None),
        None => (Some(DEFAULT_COLOR_SPACE.to_string()), None),
    };

    PixelFormat::new(family, components, color_space, gamma).map_err(|err| match err {
        Error::Parse { reason, .. } => Error::parse(input, reason),
        other => other,
    })
}

impl FromStr for PixelFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.family)?;
        for c in &self.components {
            write!(f, "{}{}", c.kind.letter(), c.bits)?;
        }
        if let Some(first) = self.components.first() {
            if self.flags.all_same_form {
                write!(f, "_{}", first.form)?;
                if first.form.is_fixed() {
                    write!(f, "{}", first.fraction_bits)?;
                }
            }
        }
        if let Some(id) = self.color_space_id() {
            write!(f, "@{id}")?;
        }
        Ok(())
    }
}
