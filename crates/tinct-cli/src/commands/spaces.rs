//! Color space listing command.

use crate::SpacesArgs;
use anyhow::Result;
use tinct_primaries::ColorSpaceRegistry;

/// Runs the spaces command.
pub fn run(args: SpacesArgs) -> Result<()> {
    for space in ColorSpaceRegistry::global().spaces() {
        let (wx, wy) = space.white_point();
        let luma = space.luma_weights();
        println!(
            "{:<12} gamma {:<11} white ({wx:.4}, {wy:.4})  luma {:.4} {:.4} {:.4}",
            space.name(),
            space.gamma_expr(),
            luma.x,
            luma.y,
            luma.z
        );
        if args.matrices {
            for i in 0..3 {
                let row = space.rgb_to_xyz().row(i);
                println!("    [{:>9.6} {:>9.6} {:>9.6}]", row.x, row.y, row.z);
            }
        }
    }
    Ok(())
}
