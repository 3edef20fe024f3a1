pub mod app;
pub mod event;
pub mod theme;
pub mod ui;

pub use app::App;
pub use theme::{resolve_theme, Theme, ThemeColors};

use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use event::{Event, EventHandler};

use crate::model::Fund;
use crate::pipeline::{run_pipeline, MatchReport, Pipeline};

/// Upper bound for one background analysis (fetch with retries plus the model call).
const RUN_TIMEOUT: Duration = Duration::from_secs(90);

type PendingRun = tokio::task::JoinHandle<Result<anyhow::Result<MatchReport>, tokio::time::error::Elapsed>>;

fn spawn_run(app: &App, pipeline: &Pipeline, funds: &Arc<Vec<Fund>>) -> PendingRun {
    let pipeline = pipeline.clone();
    let request = app.request.clone();
    let funds = Arc::clone(funds);

    tokio::spawn(async move {
        tokio::time::timeout(RUN_TIMEOUT, run_pipeline(&pipeline, &request, &funds)).await
    })
}

/// Run the dashboard until the user quits.
///
/// Starts an analysis in the background when `app` has no report yet.
pub async fn run_tui(mut app: App, pipeline: Pipeline, funds: Arc<Vec<Fund>>) -> anyhow::Result<()> {
    // Buffer stderr while TUI is active to prevent output corrupting the display
    crate::stderr_buffer::activate();

    // Init terminal (sets up panic hooks automatically)
    let mut terminal = ratatui::init();
    let mut events = EventHandler::new(250);

    let mut pending_run: Option<PendingRun> = if app.report.is_none() {
        app.is_loading = true;
        Some(spawn_run(&app, &pipeline, &funds))
    } else {
        None
    };

    let result: anyhow::Result<()> = loop {
        if let Err(e) = terminal.draw(|frame| ui::draw(frame, &mut app)) {
            break Err(e.into());
        }

        match events.next().await {
            Event::Key(key) => handle_key_event(&mut app, key),
            Event::Tick => {
                app.update_flash();
                app.advance_spinner();
            }
        }

        // Check if the background analysis has completed
        if let Some(handle) = pending_run.take_if(|h| h.is_finished()) {
            match handle.await {
                Ok(Ok(Ok(report))) => app.update_report(report),
                Ok(Ok(Err(e))) => {
                    tracing::warn!(error = %format!("{:#}", e), "analysis failed");
                    app.show_flash(format!("Failed: {:#}", e));
                }
                Ok(Err(_elapsed)) => {
                    app.show_flash(format!(
                        "Analysis timed out ({}s). Press r to retry.",
                        RUN_TIMEOUT.as_secs()
                    ));
                }
                Err(e) => {
                    app.show_flash(format!("Failed: analysis task panicked: {}", e));
                }
            }
            app.is_loading = false;
        }

        // Start a re-run if requested and nothing is in flight
        if app.needs_refresh && pending_run.is_none() {
            app.needs_refresh = false;
            app.is_loading = true;
            pending_run = Some(spawn_run(&app, &pipeline, &funds));
        }

        if app.should_quit {
            break Ok(());
        }
    };

    if let Some(handle) = pending_run {
        handle.abort();
    }

    // Restore terminal
    ratatui::restore();

    // Flush buffered stderr messages now that the terminal is restored
    for msg in crate::stderr_buffer::drain() {
        eprintln!("{}", msg);
    }

    result
}

fn handle_key_event(app: &mut App, key: KeyEvent) {
    match app.input_mode {
        app::InputMode::Normal => match key.code {
            KeyCode::Char('q') => app.should_quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                app.should_quit = true
            }

            KeyCode::Char('j') | KeyCode::Down => app.next_row(),
            KeyCode::Char('k') | KeyCode::Up => app.previous_row(),

            KeyCode::Char('o') => {
                let url = app.company_url().to_string();
                if let Err(e) = app.open_company_site() {
                    app.show_flash(format!("Failed to open browser: {}", e));
                } else {
                    app.show_flash(format!("Opened: {}", url));
                }
            }

            KeyCode::Char('r') => {
                if app.is_loading {
                    app.show_flash("Analysis already running".to_string());
                } else {
                    app.needs_refresh = true;
                    app.show_flash("Re-running analysis...".to_string());
                }
            }

            KeyCode::Char('?') => app.show_help(),
            KeyCode::Char('b') | KeyCode::Enter => app.show_breakdown(),

            _ => {}
        },
        app::InputMode::Breakdown => match key.code {
            KeyCode::Esc | KeyCode::Char('b') | KeyCode::Enter => app.dismiss_breakdown(),
            KeyCode::Char('q') => app.should_quit = true,
            KeyCode::Char('j') | KeyCode::Down => app.next_row(),
            KeyCode::Char('k') | KeyCode::Up => app.previous_row(),
            _ => {}
        },
        app::InputMode::Help => {
            // Any key exits help
            app.dismiss_help();
        }
    }
}
