//! taskdeck - a terminal client for a to-do list REST API.
//!
//! Keyboard-driven browsing of tasks, analytics, and profile data, with
//! cached and retried API access and seeded sample data for offline
//! use.

mod api;
mod app;
mod config;
mod data;
mod demo;
mod models;
mod storage;
mod ui;
mod utils;

use std::io;
use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use app::App;
use config::Config;
use ui::input::handle_input;
use ui::nav::Page;
use ui::render::render;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

/// Log file name in the data directory
const LOG_FILE: &str = "taskdeck.log";

/// Initialize tracing into a log file; stderr would corrupt the TUI.
/// Returns the guard that flushes buffered log lines on drop.
fn init_tracing(data_dir: &Path) -> tracing_appender::non_blocking::WorkerGuard {
    let appender = tracing_appender::rolling::never(data_dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    // Use RUST_LOG to control the log level (e.g. RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .with(filter)
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let args: Vec<String> = std::env::args().collect();
    if args.len() > 1 && args[1] == "--seed-demo" {
        return seed_demo(false);
    }
    if args.len() > 1 && args[1] == "--reset-demo" {
        return seed_demo(true);
    }

    let config = Config::load()?;
    // Write the file back so the api_base_url knob is discoverable
    config.save()?;
    let data_dir = Config::data_dir()?;
    std::fs::create_dir_all(&data_dir)?;

    let _guard = init_tracing(&data_dir);
    info!("taskdeck starting");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(&config, &data_dir)?;
    if app.is_logged_in() {
        app.refresh(false);
    }

    // Honor a requested start page, subject to the route policy
    if let Some(i) = args.iter().position(|a| a == "--open") {
        match args.get(i + 1).and_then(|id| Page::from_id(id)) {
            Some(page) => app.navigate(page),
            None => warn!("Unrecognized --open target"),
        }
    }

    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    info!("taskdeck shutting down");
    Ok(())
}

/// Seed (or reset) the sample data from the command line.
fn seed_demo(reset: bool) -> Result<()> {
    let data_dir = Config::data_dir()?;
    let store = storage::LocalStore::open(&data_dir)?;

    if reset {
        demo::reset(&store)?;
    } else {
        demo::ensure_seeded(&store)?;
    }

    let tasks = demo::tasks(&store);
    let stats = demo::stats(&tasks);
    println!(
        "Sample data ready: {} tasks ({} completed, {} in progress, {} pending)",
        stats.total, stats.completed, stats.in_progress, stats.pending
    );
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        // Pick up finished background loads and session events
        app.process_events();

        terminal.draw(|f| render(f, app))?;

        // Poll for events with timeout to allow background updates
        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            if let Event::Key(key) = event::read()? {
                // Ctrl+C to quit
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    return Ok(());
                }

                handle_input(app, key);
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
