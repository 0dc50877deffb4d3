mod render;

use std::fs;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEvent};
use crossterm::terminal;
use hexdraw_core::{decode, Canvas, Drawing};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hexdraw-view", about = "Replay drawing files in the terminal")]
struct Cli {
    /// Path to drawing file
    input: PathBuf,

    /// Print the decoded image as hex digits instead of colour blocks
    #[arg(long, conflicts_with = "fps")]
    text: bool,

    /// Animate the replay, one command per frame, at this frame rate
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
    fps: Option<u16>,

    /// More log output (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// How a replay ended.
enum Replay {
    Finished,
    Quit,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let text = fs::read_to_string(&cli.input)
        .with_context(|| format!("failed to open {}", cli.input.display()))?;
    let drawing: Drawing = text
        .parse()
        .with_context(|| format!("invalid drawing {}", cli.input.display()))?;
    info!(
        "Drawing: {}x{} pixels, background {}, {} commands",
        drawing.width,
        drawing.height,
        drawing.background,
        drawing.len()
    );

    if let Some(fps) = cli.fps {
        return animate(&drawing, fps);
    }

    let raster = decode(&drawing).context("drawing failed to replay")?;
    let stdout = std::io::stdout();
    let mut stdout = BufWriter::new(stdout.lock());
    if cli.text {
        write!(stdout, "{raster}")?;
    } else {
        let mut render_buf = Vec::new();
        render::render_raster(&raster, &mut render_buf);
        stdout.write_all(&render_buf)?;
        stdout.write_all(b"\n")?;
    }
    stdout.flush()?;

    Ok(())
}

fn animate(drawing: &Drawing, fps: u16) -> anyhow::Result<()> {
    let mut canvas = Canvas::new(drawing)?;

    // Check terminal size
    let (term_cols, term_rows) = terminal::size()?;
    let rows = drawing.height.div_ceil(2);
    if (term_cols as usize) < drawing.width || (term_rows as usize) < rows {
        warn!(
            "terminal is {}x{} but the drawing needs {}x{}; resize your terminal for best results",
            term_cols, term_rows, drawing.width, rows
        );
    }

    // Set up panic hook for terminal cleanup
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        cleanup_terminal();
        original_hook(info);
    }));

    // Enter alternate screen, raw mode, hide cursor
    terminal::enable_raw_mode()?;
    let stdout = std::io::stdout();
    let mut stdout = BufWriter::with_capacity(64 * 1024, stdout.lock());
    stdout.write_all(b"\x1b[?1049h")?; // enter alternate screen
    stdout.write_all(b"\x1b[?25l")?; // hide cursor
    stdout.write_all(b"\x1b[2J\x1b[H")?;

    let mut render_buf = Vec::with_capacity(64 * 1024);
    render::render_raster(canvas.raster(), &mut render_buf);
    stdout.write_all(&render_buf)?;
    stdout.flush()?;

    let frame_duration = Duration::from_secs_f64(1.0 / f64::from(fps));
    let result = run_replay_loop(drawing, &mut canvas, &mut stdout, &mut render_buf, frame_duration)
        .and_then(|replay| match replay {
            Replay::Finished => wait_for_key(),
            Replay::Quit => Ok(()),
        });

    // Cleanup
    stdout.write_all(b"\x1b[0m")?; // reset colors
    stdout.write_all(b"\x1b[?25h")?; // show cursor
    stdout.write_all(b"\x1b[?1049l")?; // leave alternate screen
    stdout.flush()?;
    terminal::disable_raw_mode()?;

    result
}

fn run_replay_loop(
    drawing: &Drawing,
    canvas: &mut Canvas,
    stdout: &mut impl Write,
    render_buf: &mut Vec<u8>,
    frame_duration: Duration,
) -> anyhow::Result<Replay> {
    let playback_start = Instant::now();

    for (index, instruction) in drawing.instructions.iter().enumerate() {
        // Check for input (non-blocking)
        if event::poll(Duration::ZERO)? {
            if let Event::Key(KeyEvent { code, .. }) = event::read()? {
                match code {
                    KeyCode::Char('q') | KeyCode::Esc => return Ok(Replay::Quit),
                    _ => {}
                }
            }
        }

        let from = canvas.cursor();
        canvas
            .apply(index, instruction)
            .with_context(|| format!("command {} ({instruction}) failed", index + 1))?;
        render::render_pixels(canvas.raster(), instruction.stroke(from), render_buf);
        stdout.write_all(render_buf)?;
        stdout.flush()?;

        // Sleep until next frame
        let elapsed = playback_start.elapsed();
        let next_frame_time = frame_duration * (index as u32 + 1);
        if let Some(sleep_time) = next_frame_time.checked_sub(elapsed) {
            std::thread::sleep(sleep_time);
        }
    }

    Ok(Replay::Finished)
}

fn wait_for_key() -> anyhow::Result<()> {
    loop {
        if let Event::Key(_) = event::read()? {
            return Ok(());
        }
    }
}

fn cleanup_terminal() {
    let _ = std::io::stdout().write_all(b"\x1b[0m\x1b[?25h\x1b[?1049l");
    let _ = std::io::stdout().flush();
    let _ = terminal::disable_raw_mode();
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
