//! Format inspection command.
//!
//! Prints the parsed descriptor, capability flags and, given a size,
//! buffer geometry from the family registry.

use crate::InspectArgs;
use anyhow::{Context, Result};
use tinct_core::FormatRegistry;

/// Runs the inspect command.
pub fn run(args: InspectArgs, verbose: bool) -> Result<()> {
    let registry = FormatRegistry::default();

    // Geometry works for any registered family, even bit-packed ones.
    let geometry = match (args.width, args.height) {
        (Some(w), Some(h)) => Some(
            registry
                .geometry(&args.format, w, h)
                .with_context(|| format!("No geometry for {}", args.format))?,
        ),
        _ => None,
    };

    let format = super::parse_format(&args.format)?;
    let flags = format.flags();

    println!("{format}");
    println!("  Family:     {}", format.family());
    match format.color_space_id() {
        Some(id) => println!("  Space:      {id}"),
        None => println!("  Space:      -"),
    }
    println!("  Components: {}", format.components().len());
    for (c, offset) in format.components().iter().zip(format.bit_offsets()) {
        let fixed = if c.form.is_fixed() {
            format!(" ({} fraction bits)", c.fraction_bits)
        } else {
            String::new()
        };
        println!(
            "    {:<3} {:>2} bits {:<6}{} @ bit {}",
            c.kind.letter(),
            c.bits,
            c.form.name(),
            fixed,
            offset
        );
    }
    println!("  Pixel:      {} bits", format.bits_per_pixel());
    println!(
        "  Operable:   {}",
        if format.is_operable() { "yes" } else { "no" }
    );
    if verbose || !format.is_operable() {
        println!("    same form:    {}", flags.all_same_form);
        println!("    byte aligned: {}", flags.all_byte_aligned);
        println!("    same width:   {}", flags.all_same_bits);
    }
    if format.is_shared_exponent() {
        println!("  Shared exponent");
    }
    if let Some(g) = geometry {
        println!("  Geometry:   {g}");
    }

    Ok(())
}
