// src/main.rs

use clap::Parser;
use color_eyre::eyre::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::prelude::*;
use std::io::stdout;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info};

mod app;
mod cli;
mod config;
mod core;
mod logging;
mod ui;
mod worker;

use app::{App, AppState};
use cli::Cli;
use config::ReconConfig;
use crate::core::models::ReconReport;
use crate::core::scanner::target::ScanTarget;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    let headless = cli.target.is_some();
    logging::initialize_logging(headless)?;

    let config = ReconConfig::from_cli(&cli)?;

    if let Some(target) = &cli.target {
        return match worker::run_headless(target, cli.output.clone(), &config).await {
            Ok(_) => Ok(()),
            Err(e) => {
                error!(error = ?e, "Headless scan failed.");
                Err(e)
            }
        };
    }

    run_tui(config).await
}

async fn run_tui(config: ReconConfig) -> Result<()> {
    // --- Setup ---
    stdout().execute(EnterAlternateScreen)?;
    stdout().execute(EnableMouseCapture)?;
    enable_raw_mode()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    terminal.clear()?;

    let mut app = App::new(config);
    let (tx, mut rx) = mpsc::channel(1);

    let result = event_loop(&mut terminal, &mut app, &tx, &mut rx).await;

    // --- Restore Terminal ---
    stdout().execute(LeaveAlternateScreen)?;
    stdout().execute(DisableMouseCapture)?;
    disable_raw_mode()?;
    result
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut App,
    tx: &mpsc::Sender<ReconReport>,
    rx: &mut mpsc::Receiver<ReconReport>,
) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        if event::poll(Duration::from_millis(100))? {
            handle_events(app, tx)?;
        }
        app.on_tick();

        if let Ok(report) = rx.try_recv() {
            app.finish_scan(report);
        }
    }
    Ok(())
}

fn handle_events(app: &mut App, tx: &mpsc::Sender<ReconReport>) -> Result<()> {
    if let Event::Key(key) = event::read()? {
        if key.kind == KeyEventKind::Press {
            match app.state {
                AppState::Disclaimer => match key.code {
                    KeyCode::Enter => app.state = AppState::Idle,
                    KeyCode::Char('q') | KeyCode::Char('Q') => app.quit(),
                    _ => {}
                },
                AppState::Idle => handle_idle_input(app, key.code, tx),
                AppState::Finished => handle_finished_input(app, key.code),
                AppState::Scanning => {
                    if matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q')) {
                        app.quit();
                    }
                }
            }
        }
    }
    Ok(())
}

fn handle_idle_input(app: &mut App, key_code: KeyCode, tx: &mpsc::Sender<ReconReport>) {
    match key_code {
        KeyCode::Esc => app.quit(),
        KeyCode::Char(c) => {
            app.input.push(c);
            app.input_error = None;
        }
        KeyCode::Backspace => {
            app.input.pop();
            app.input_error = None;
        }
        KeyCode::Enter => {
            if app.input.trim().is_empty() {
                return;
            }
            let target = match ScanTarget::parse(&app.input) {
                Ok(target) => target,
                Err(e) => {
                    app.input_error = Some(e.to_string());
                    return;
                }
            };

            info!(url = %target.url, "Scan requested from the UI.");
            app.state = AppState::Scanning;
            let tx_clone = tx.clone();
            let config = app.config.clone();
            tokio::spawn(async move {
                let report = core::scanner::run_full_scan(&target, &config).await;
                let _ = tx_clone.send(report).await;
            });
        }
        _ => {}
    }
}

fn handle_finished_input(app: &mut App, key_code: KeyCode) {
    match key_code {
        KeyCode::Char('q') | KeyCode::Char('Q') => app.quit(),
        KeyCode::Char('n') | KeyCode::Char('N') => app.reset(),
        KeyCode::Char('e') | KeyCode::Char('E') => app.export_report(),
        KeyCode::Up => app.select_previous(),
        KeyCode::Down => app.select_next(),
        _ => {}
    }
}
