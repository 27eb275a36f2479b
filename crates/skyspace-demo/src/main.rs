#![forbid(unsafe_code)]

//! skyspace terminal viewer entry point.

use std::fs::File;
use std::io::{self, Write};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use skyspace_demo::cli::{self, Command, Opts};
use skyspace_demo::presenter::{encode_half_blocks, pixel_grid};
use skyspace_demo::session::ViewerSession;
use skyspace_fx::{LightField, ShapeKind};
use skyspace_render::PixelBuffer;
use tracing_subscriber::EnvFilter;

const FRAME_INTERVAL: Duration = Duration::from_millis(16);
const LOG_FILTER_ENV: &str = "SKYSPACE_LOG";
const LOG_FILE_ENV: &str = "SKYSPACE_LOG_FILE";
const DEFAULT_LOG_FILE: &str = "skyspace.log";

fn main() {
    let opts = match Opts::parse_from(std::env::args().skip(1)) {
        Ok(Command::Run(opts)) => opts,
        Ok(Command::Help) => {
            println!("{}", cli::HELP_TEXT);
            return;
        }
        Ok(Command::Version) => {
            println!("{}", cli::version_line());
            return;
        }
        Err(e) => {
            eprintln!("{e}");
            eprintln!("Run with --help for usage information.");
            std::process::exit(1);
        }
    };

    if let Err(e) = init_logging() {
        eprintln!("Failed to open log file: {e}");
        std::process::exit(1);
    }

    let (config, errors) = opts.resolve_config(|key| std::env::var(key).ok());
    for err in &errors {
        eprintln!("warning: {err}");
        tracing::warn!(%err, "configuration adjusted");
    }
    tracing::info!(config = %config.summary_short(), "starting viewer");

    let field = LightField::from_config(&config);
    if let Err(e) = run(field, opts.exit_after_ms) {
        eprintln!("Runtime error: {e}");
        std::process::exit(1);
    }
}

/// File logging, enabled only when `SKYSPACE_LOG` is set. The terminal is
/// owned by the viewer, so nothing is logged to stdout or stderr.
fn init_logging() -> io::Result<()> {
    let Ok(filter) = EnvFilter::try_from_env(LOG_FILTER_ENV) else {
        return Ok(());
    };
    let path = std::env::var(LOG_FILE_ENV).unwrap_or_else(|_| DEFAULT_LOG_FILE.to_string());
    let file = File::create(path)?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
    Ok(())
}

fn run(mut field: LightField, exit_after_ms: u64) -> io::Result<()> {
    let session = ViewerSession::enter()?;
    let (cols, rows) = session.size()?;
    let mut grid = pixel_grid(cols, rows);
    let mut buffer = PixelBuffer::new(grid.width, grid.height);
    field.on_viewport_resize_px(grid.width, grid.height);

    let mut stdout = io::stdout();
    let mut frame_bytes = Vec::new();
    let start = Instant::now();

    loop {
        if let Some(event) = session.poll_event(FRAME_INTERVAL)? {
            match event {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if !handle_key(&mut field, key) {
                        break;
                    }
                }
                Event::Resize(cols, rows) => {
                    grid = pixel_grid(cols, rows);
                    buffer.resize(grid.width, grid.height);
                    field.on_viewport_resize_px(grid.width, grid.height);
                    tracing::debug!(cols, rows, "terminal resized");
                }
                _ => {}
            }
        }

        let elapsed = start.elapsed();
        if exit_after_ms > 0 && elapsed >= Duration::from_millis(exit_after_ms) {
            break;
        }

        field.tick(elapsed.as_secs_f64() * 1000.0);
        field.render(&mut buffer);
        frame_bytes.clear();
        encode_half_blocks(&buffer, &mut frame_bytes)?;
        stdout.write_all(&frame_bytes)?;
        stdout.flush()?;
    }

    tracing::info!(frames = field.frame(), "viewer stopped");
    Ok(())
}

/// Apply a key press. Returns `false` when the viewer should quit.
fn handle_key(field: &mut LightField, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return false,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return false,
        KeyCode::Char('1') => field.set_variant(ShapeKind::Radial),
        KeyCode::Char('2') => field.set_variant(ShapeKind::Rectangular),
        KeyCode::Char('3') => field.set_variant(ShapeKind::Flood),
        KeyCode::Char('g') => {
            let on = !field.ganzfeld();
            field.set_ganzfeld(on);
        }
        _ => {}
    }
    true
}
