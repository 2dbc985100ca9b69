//! regdesk binary entry point.
//!
//! Parses the command line, sets up logging, initializes the terminal in raw
//! mode, runs the TUI event loop and restores the terminal state on exit.
//!
use anyhow::{Context, Result, anyhow};
use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

use regdesk::api::ApiClient;
use regdesk::app::{self, AppState};
use regdesk::config::Cli;

/// Initialize a Crossterm-backed `ratatui` terminal in raw mode.
fn init_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>) {
    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .ok();
    terminal.show_cursor().ok();
}

/// Logs never go to the terminal the TUI draws on: either a file or nowhere.
fn init_logging(path: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_env("REGDESK_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    let writer = match path {
        Some(p) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(p)
                .with_context(|| format!("open log file {}", p.display()))?;
            BoxMakeWriter::new(Mutex::new(file))
        }
        None => BoxMakeWriter::new(std::io::sink),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow!("init logging: {e}"))
}

/// Program entry point: run the TUI and report any top-level error to stderr.
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref())?;

    let client = ApiClient::new(&cli.api_url).context("build API client")?;
    tracing::info!(api_url = client.base_url(), "starting");
    let options = cli.app_options();

    let mut terminal = init_terminal().context("init terminal")?;
    let mut state = AppState::new(Box::new(client), options);
    let res = app::run(&mut terminal, &mut state);
    restore_terminal(&mut terminal);

    if let Err(err) = res {
        tracing::error!(error = %err, "application error");
        eprintln!("application error: {err:#}");
    }
    Ok(())
}
