//! litho: Command-line lithophane generator.
//!
//! Converts an image into a solid, 3D-printable STL whose thickness encodes
//! luminance, with optional decorative borders, curved shapes, background
//! removal, and mounting holes.
//!
//! # Logging
//!
//! Set the `RUST_LOG` environment variable to control log output:
//! - `RUST_LOG=litho_relief=info` - Basic pipeline logging
//! - `RUST_LOG=litho_relief=debug` - Detailed stage logging
//! - `RUST_LOG=debug` - All debug output
//!
//! # Example
//!
//! ```bash
//! # 120mm wide lithophane with a rounded border
//! litho generate photo.png -o photo.stl --width 120 --border rounded
//!
//! # Cylindrical night-light insert
//! litho generate photo.png -o shade.stl --shape cylinder --invert
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;

use litho_relief::{BorderKind, ShapeKind};

/// litho - turn images into 3D-printable lithophanes.
#[derive(Parser)]
#[command(name = "litho")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Suppress all non-error output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Increase output verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(long, short, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a lithophane STL from an image
    Generate {
        /// Input image (PNG, JPEG, ...)
        input: PathBuf,

        /// Output STL path
        #[arg(short, long)]
        output: PathBuf,

        /// Also write the height-field preview as a PNG
        #[arg(long)]
        preview: Option<PathBuf>,

        #[command(flatten)]
        options: ConfigArgs,
    },

    /// Write only the height-field preview raster as a PNG
    Preview {
        /// Input image (PNG, JPEG, ...)
        input: PathBuf,

        /// Output PNG path
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        options: ConfigArgs,
    },

    /// Generate in memory and print mesh statistics
    Info {
        /// Input image (PNG, JPEG, ...)
        input: PathBuf,

        #[command(flatten)]
        options: ConfigArgs,
    },
}

/// Render options shared by all subcommands. Explicit flags override values
/// loaded from `--config`.
#[derive(Args)]
struct ConfigArgs {
    /// Load a full configuration from a JSON file first
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of quantized height levels (>= 2)
    #[arg(long)]
    layers: Option<u32>,

    /// Thickness of the brightest cell in mm
    #[arg(long)]
    min_height: Option<f64>,

    /// Thickness of the darkest cell in mm
    #[arg(long)]
    max_height: Option<f64>,

    /// Physical print width in mm
    #[arg(long)]
    width: Option<f64>,

    /// Size of one grid cell in mm
    #[arg(long)]
    pixel_size: Option<f64>,

    /// Swap dark/light height mapping
    #[arg(long)]
    invert: bool,

    /// Smoothing factor in [0, 1]
    #[arg(long)]
    smoothing: Option<f64>,

    /// Contrast factor around mid-gray
    #[arg(long)]
    contrast: Option<f64>,

    /// Brightness multiplier
    #[arg(long)]
    brightness: Option<f64>,

    /// Gamma (1.0 = off)
    #[arg(long)]
    gamma: Option<f64>,

    /// Cut cells brighter than the background threshold
    #[arg(long)]
    remove_background: bool,

    /// Background luminance cutoff (0-255)
    #[arg(long)]
    background_threshold: Option<u8>,

    /// Solid floor thickness in mm
    #[arg(long)]
    base: Option<f64>,

    /// Border profile
    #[arg(long)]
    border: Option<BorderArg>,

    /// Border band width in mm
    #[arg(long)]
    border_width: Option<f64>,

    /// Border peak height in mm
    #[arg(long)]
    border_depth: Option<f64>,

    /// Surface shape
    #[arg(long)]
    shape: Option<ShapeArg>,

    /// Arc sweep in degrees (shape = arc)
    #[arg(long)]
    angle: Option<f64>,

    /// Cut a mounting hole near the top edge
    #[arg(long)]
    mounting_hole: bool,

    /// Mounting hole diameter in mm
    #[arg(long)]
    mounting_diameter: Option<f64>,

    /// Mounting hole center distance from the top edge in mm
    #[arg(long)]
    mounting_offset: Option<f64>,

    /// Comma-separated height levels to hide (0 = thinnest)
    #[arg(long)]
    hide_layers: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum BorderArg {
    None,
    Flat,
    Rounded,
    Chamfer,
    Frame,
    Oval,
}

impl From<BorderArg> for BorderKind {
    fn from(arg: BorderArg) -> Self {
        match arg {
            BorderArg::None => BorderKind::None,
            BorderArg::Flat => BorderKind::Flat,
            BorderArg::Rounded => BorderKind::Rounded,
            BorderArg::Chamfer => BorderKind::Chamfer,
            BorderArg::Frame => BorderKind::Frame,
            BorderArg::Oval => BorderKind::Oval,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ShapeArg {
    Flat,
    Cylinder,
    Arc,
    Sphere,
    Circle,
}

impl From<ShapeArg> for ShapeKind {
    fn from(arg: ShapeArg) -> Self {
        match arg {
            ShapeArg::Flat => ShapeKind::Flat,
            ShapeArg::Cylinder => ShapeKind::Cylinder,
            ShapeArg::Arc => ShapeKind::Arc,
            ShapeArg::Sphere => ShapeKind::Sphere,
            ShapeArg::Circle => ShapeKind::Circle,
        }
    }
}

/// Initialize the tracing subscriber based on verbosity level.
fn init_tracing(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        let level = match verbose {
            0 => "warn",
            1 => "litho_relief=info,litho_mesh=info",
            2 => "litho_relief=debug,litho_mesh=debug",
            _ => "trace",
        };
        EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    #[cfg(debug_assertions)]
    miette::set_panic_hook();

    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Commands::Generate {
            input,
            output,
            preview,
            options,
        } => commands::generate(input, output, preview.as_deref(), options, cli.quiet),
        Commands::Preview {
            input,
            output,
            options,
        } => commands::preview(input, output, options, cli.quiet),
        Commands::Info { input, options } => commands::info(input, options),
    };

    if let Err(e) = &result {
        if !cli.quiet {
            if let Some(relief_err) = e.downcast_ref::<litho_relief::ReliefError>() {
                eprintln!("{}: {}", "Error".red().bold(), relief_err);
                eprintln!("  {}: {}", "Code".cyan(), relief_err.code());
            } else {
                eprintln!("{}: {}", "Error".red().bold(), e);
                for cause in e.chain().skip(1) {
                    eprintln!("  {}: {}", "Caused by".yellow(), cause);
                }
            }
        }
        std::process::exit(1);
    }

    Ok(())
}
