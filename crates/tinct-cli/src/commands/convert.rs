//! Pixel conversion command.
//!
//! Converts a run of hex-encoded pixels, or an image when a size is
//! given, and prints the result with decoded components.

use crate::ConvertArgs;
use anyhow::{Context, Result};
use tinct_color::ConversionPlan;
use tinct_core::ImageView;

/// Runs the convert command.
pub fn run(args: ConvertArgs, verbose: bool) -> Result<()> {
    let from = super::parse_format(&args.from)?;
    let to = super::parse_format(&args.to)?;
    let plan = ConversionPlan::new(&from, &to)
        .with_context(|| format!("Cannot convert {from} to {to}"))?;

    let src = super::parse_hex(&args.pixels)?;
    let out = match (args.width, args.height) {
        (Some(w), Some(h)) => {
            let image = ImageView::new(&src, from.clone(), w, h)
                .with_context(|| format!("Input is not a {w}x{h} {from} image"))?;
            plan.convert_image_par(&image).context("Conversion failed")?
        }
        _ => {
            let count = super::pixel_count(&from, &src)?;
            let mut out = vec![0u8; count * plan.target_stride()];
            plan.convert_buffer(&src, &mut out).context("Conversion failed")?;
            out
        }
    };

    tracing::debug!(bytes = out.len(), route = %plan.route(), "converted");

    if args.hex {
        println!("{}", super::format_hex(&out, plan.target_stride()));
        return Ok(());
    }

    if verbose {
        println!("{} -> {} ({})", plan.source(), plan.target(), plan.route());
    }
    for (i, px) in out.chunks_exact(plan.target_stride()).enumerate() {
        let values = to
            .decode_components(px)
            .with_context(|| format!("Cannot decode output pixel {i}"))?;
        println!(
            "{}  {}",
            super::format_hex(px, px.len()),
            super::format_components(&to, &values)
        );
    }

    Ok(())
}
