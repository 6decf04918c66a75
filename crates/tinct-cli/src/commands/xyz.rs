//! CIE XYZ command.

use crate::XyzArgs;
use anyhow::{Context, Result};
use tinct_color::ConversionPlan;
use tinct_core::PixelFormat;

/// Runs the xyz command, printing one `X Y Z` line per pixel.
pub fn run(args: XyzArgs) -> Result<()> {
    let from = super::parse_format(&args.from)?;
    let xyz = PixelFormat::parse("xyz:x64y64z64")?;
    let plan = ConversionPlan::new(&from, &xyz)
        .with_context(|| format!("Cannot convert {from} to XYZ"))?;

    let src = super::parse_hex(&args.pixels)?;
    let count = super::pixel_count(&from, &src)?;
    let mut out = vec![0u8; count * plan.target_stride()];
    plan.convert_buffer(&src, &mut out).context("Conversion failed")?;

    for px in out.chunks_exact(plan.target_stride()) {
        let [x, y, z, ..] = xyz.decode_components(px)?;
        println!("X={x:.6} Y={y:.6} Z={z:.6}");
    }
    Ok(())
}
