mod png;

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use hexdraw_core::{decode, Encoder, Raster};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "hexdraw-compress",
    about = "Compress a 16-colour hex image into drawing commands"
)]
struct Cli {
    /// Input image file: one row per line, one hex digit per pixel
    input: PathBuf,

    /// Output drawing file path (default: input with .drawing extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also render the input image to this PNG file
    #[arg(long)]
    png: Option<PathBuf>,

    /// Skip replaying the drawing to check it reproduces the image
    #[arg(long)]
    no_verify: bool,

    /// Ceiling on encoder steps (default: four per pixel)
    #[arg(long)]
    max_iterations: Option<usize>,

    /// More log output (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let output_path = cli.output.unwrap_or_else(|| {
        let mut p = cli.input.clone();
        p.set_extension("drawing");
        p
    });

    let text = fs::read_to_string(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;
    let raster: Raster = text
        .parse()
        .with_context(|| format!("invalid image {}", cli.input.display()))?;
    let colours = raster.histogram().iter().filter(|&&n| n > 0).count();
    info!(
        "Image: {}x{} pixels, {} colours",
        raster.width(),
        raster.height(),
        colours
    );

    let mut encoder = Encoder::new(&raster);
    if let Some(limit) = cli.max_iterations {
        encoder = encoder.with_iteration_limit(limit);
    }
    let drawing = encoder.encode().context("encoding failed")?;

    let pixels = raster.width() * raster.height();
    info!(
        "{} commands for {} pixels ({:.1}%)",
        drawing.len(),
        pixels,
        100.0 * drawing.len() as f64 / pixels as f64
    );

    if cli.no_verify {
        warn!("Skipping replay check");
    } else {
        let replayed = decode(&drawing).context("drawing failed to replay")?;
        if replayed != raster {
            anyhow::bail!("drawing does not reproduce {}", cli.input.display());
        }
        info!("Replay matches the input image");
    }

    fs::write(&output_path, drawing.to_string())
        .with_context(|| format!("failed to create {}", output_path.display()))?;
    info!("Wrote {}", output_path.display());

    if let Some(png_path) = cli.png {
        png::write_png(&raster, &png_path)?;
        info!("Wrote {}", png_path.display());
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
