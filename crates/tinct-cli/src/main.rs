//! tinct - pixel format inspection and color conversion CLI
//!
//! Pixels are given and printed as hex bytes in storage order.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "tinct")]
#[command(author, version, about = "Pixel format inspection and color conversion")]
#[command(long_about = "
Inspects pixel format strings and converts raw pixels between them.

Format strings look like `rgb:b8g8r8a8`, `rgb:r16g16b16_snorm@Rec2020^1`
or `xyz:x32y32z32_float`.

Examples:
  tinct inspect rgb:r5g6b5 --width 640 --height 480
  tinct convert --from rgb:r8g8b8a8 --to rgb:r16g16b16a16@sRGB^1 ff800240
  tinct convert --from rgb:r8g8b8 --to rgb:l8 ff2040
  tinct convert --from rgb:r8g8b8 --to rgb:b8g8r8 -W 2 -H 1 ff0000 00ff00
  tinct xyz --from rgb:r8g8b8 ffffff
  tinct spaces
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Number of threads (0 = auto)
    #[arg(short = 'j', long, global = true, default_value = "0")]
    threads: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// Describe a format string
    #[command(visible_alias = "i")]
    Inspect(InspectArgs),

    /// Convert pixels between formats
    #[command(visible_alias = "c")]
    Convert(ConvertArgs),

    /// Print the CIE XYZ of pixels
    Xyz(XyzArgs),

    /// List built-in color spaces
    Spaces(SpacesArgs),
}

#[derive(Args)]
struct InspectArgs {
    /// Format string
    format: String,

    /// Image width for geometry
    #[arg(short = 'W', long, requires = "height")]
    width: Option<u32>,

    /// Image height for geometry
    #[arg(short = 'H', long, requires = "width")]
    height: Option<u32>,
}

#[derive(Args)]
struct ConvertArgs {
    /// Source format
    #[arg(short, long)]
    from: String,

    /// Target format
    #[arg(short, long)]
    to: String,

    /// Source pixels as hex bytes; separate runs are joined
    #[arg(required = true, value_name = "HEX")]
    pixels: Vec<String>,

    /// Treat the input as an image of this width
    #[arg(short = 'W', long, requires = "height")]
    width: Option<u32>,

    /// Treat the input as an image of this height
    #[arg(short = 'H', long, requires = "width")]
    height: Option<u32>,

    /// Print only the converted hex bytes
    #[arg(long)]
    hex: bool,
}

#[derive(Args)]
struct XyzArgs {
    /// Source format
    #[arg(short, long)]
    from: String,

    /// Source pixels as hex bytes
    #[arg(required = true, value_name = "HEX")]
    pixels: Vec<String>,
}

#[derive(Args)]
struct SpacesArgs {
    /// Also print RGB to XYZ matrices
    #[arg(short, long)]
    matrices: bool,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "tinct=debug" } else { "tinct=warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Configure thread pool
    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    match cli.command {
        Commands::Inspect(args) => commands::inspect::run(args, cli.verbose),
        Commands::Convert(args) => commands::convert::run(args, cli.verbose),
        Commands::Xyz(args) => commands::xyz::run(args),
        Commands::Spaces(args) => commands::spaces::run(args),
    }
}
