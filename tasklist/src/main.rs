//! `Tasklist`, a single-list terminal to-do manager.
//!
//! Launches the TUI over the in-process document store. Configuration via
//! CLI flags, environment variables, or config file
//! (`~/.config/tasklist/config.toml`).
//!
//! ```bash
//! cargo run --bin tasklist
//!
//! # Use another collection and a custom log file
//! cargo run --bin tasklist -- --collection chores --log-file /tmp/tl.log
//! ```

use std::io;
use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::mpsc;
use tracing_appender::non_blocking::WorkerGuard;

use tasklist::app::App;
use tasklist::config::{CliArgs, ClientConfig};
use tasklist::store::memory::MemoryStore;
use tasklist::ui;
use tasklist::worker::{self, TaskCommand, TaskEvent};

#[tokio::main]
async fn main() -> io::Result<()> {
    let cli = CliArgs::parse();

    let config = match ClientConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Warning: failed to load config file: {e}");
            ClientConfig::default()
        }
    };

    // Initialize logging before terminal setup (logs go to file, not stdout).
    let _log_guard = init_logging(&cli.log_level, cli.log_file.as_deref());

    tracing::info!(collection = %config.collection, "tasklist starting");

    let store = Arc::new(MemoryStore::new());
    let (cmd_tx, evt_rx) = worker::spawn_worker(store, config.to_worker_config())
        .await
        .map_err(io::Error::other)?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &config, &cmd_tx, evt_rx);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    let _ = cmd_tx.try_send(TaskCommand::Shutdown);
    tracing::info!("tasklist exiting");
    result
}

/// Initialize file-based logging.
///
/// Logs are written to a file (never stdout, since ratatui owns the terminal).
/// Returns a [`WorkerGuard`] that must be held until shutdown to ensure all
/// buffered log entries are flushed.
fn init_logging(level: &str, file_path: Option<&Path>) -> Option<WorkerGuard> {
    let default_path = std::env::temp_dir().join("tasklist.log");
    let log_path = file_path.unwrap_or(&default_path);

    let log_dir = log_path.parent()?;
    let file_name = log_path.file_name()?.to_str()?;

    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(env_filter)
        .with_ansi(false)
        .init();

    Some(guard)
}

/// Main application loop.
///
/// Runs on the runtime's main thread; the store worker makes progress on
/// the other runtime threads while this loop blocks in `event::poll`.
fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    config: &ClientConfig,
    cmd_tx: &mpsc::Sender<TaskCommand>,
    mut evt_rx: mpsc::Receiver<TaskEvent>,
) -> io::Result<()> {
    let mut app = App::new();

    loop {
        // Step 1: Draw the UI frame.
        terminal.draw(|frame| ui::draw(frame, &app))?;

        // Step 2: Drain all pending worker events (non-blocking).
        while let Ok(event) = evt_rx.try_recv() {
            app.apply_event(event);
        }

        // Step 3: Poll for terminal input events.
        if event::poll(config.poll_timeout)?
            && let Event::Key(key) = event::read()?
        {
            if key.kind != KeyEventKind::Press {
                continue;
            }

            if let Some(cmd) = app.handle_key_event(key) {
                dispatch(&mut app, cmd_tx, cmd);
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

/// Hand a command to the worker, releasing the in-flight guard if it
/// cannot be queued.
fn dispatch(app: &mut App, tx: &mpsc::Sender<TaskCommand>, cmd: TaskCommand) {
    let reason = match tx.try_send(cmd) {
        Ok(()) => return,
        Err(mpsc::error::TrySendError::Full(_)) => "Store busy, command dropped",
        Err(mpsc::error::TrySendError::Closed(_)) => "Store worker stopped",
    };
    tracing::warn!(reason, "command not dispatched");
    app.in_flight = false;
    app.status_message = Some(reason.to_string());
}
