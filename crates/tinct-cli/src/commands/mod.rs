//! CLI command implementations

pub mod convert;
pub mod inspect;
pub mod spaces;
pub mod xyz;

use anyhow::{Context, Result, bail};
use tinct_core::PixelFormat;

/// Parse a format string
pub fn parse_format(text: &str) -> Result<PixelFormat> {
    PixelFormat::parse(text).with_context(|| format!("Invalid format: {text}"))
}

/// Decode hex runs into bytes, ignoring `_`, `:` and a `0x` prefix.
pub fn parse_hex(runs: &[String]) -> Result<Vec<u8>> {
    let mut digits = String::new();
    for run in runs {
        let run = run.strip_prefix("0x").unwrap_or(run);
        for c in run.chars().filter(|c| !matches!(c, '_' | ':')) {
            if !c.is_ascii_hexdigit() {
                bail!("Invalid hex digit: {c:?}");
            }
            digits.push(c);
        }
    }
    if digits.len() % 2 != 0 {
        bail!("Odd number of hex digits: {}", digits.len());
    }
    (0..digits.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .with_context(|| format!("Invalid hex byte: {:?}", &digits[i..i + 2]))
        })
        .collect()
}

/// Bytes as lowercase hex, one group per pixel.
pub fn format_hex(bytes: &[u8], stride: usize) -> String {
    bytes
        .chunks(stride.max(1))
        .map(|px| px.iter().map(|b| format!("{b:02x}")).collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Decoded values, labelled by component letter.
pub fn format_components(format: &PixelFormat, values: &[f64]) -> String {
    format
        .components()
        .iter()
        .zip(values)
        .map(|(c, v)| format!("{}={v:.6}", c.kind.letter()))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Check that `bytes` holds whole pixels of `format`.
pub fn pixel_count(format: &PixelFormat, bytes: &[u8]) -> Result<usize> {
    let stride = format.bytes_per_pixel();
    if bytes.len() % stride != 0 {
        bail!(
            "{} bytes is not a whole number of {} pixels ({} bytes each)",
            bytes.len(),
            format,
            stride
        );
    }
    Ok(bytes.len() / stride)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        let runs = vec!["0xFF80".to_string(), "02_40".to_string()];
        assert_eq!(parse_hex(&runs).unwrap(), [0xFF, 0x80, 0x02, 0x40]);
        assert!(parse_hex(&["abc".to_string()]).is_err());
        assert!(parse_hex(&["zz".to_string()]).is_err());
        assert!(parse_hex(&["aéb".to_string()]).is_err());
        assert!(parse_hex(&["0xé1".to_string()]).is_err());
    }

    #[test]
    fn test_format_hex() {
        assert_eq!(format_hex(&[0xFF, 0x00, 0x80, 0x01, 0x02, 0x03], 3), "ff0080 010203");
    }

    #[test]
    fn test_pixel_count() {
        let fmt = parse_format("rgb:r16g16b16").unwrap();
        assert_eq!(pixel_count(&fmt, &[0; 12]).unwrap(), 2);
        assert!(pixel_count(&fmt, &[0; 7]).is_err());
    }
}
