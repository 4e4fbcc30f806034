pub mod events;
pub mod state;
pub mod ui;

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use archlens_eval::MetricsReport;
use crossterm::{
    cursor::Show,
    event, execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::CliError;
use events::handle_key;
use state::App;
use ui::draw_ui;

const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Run the dashboard until the user quits. The terminal is restored on every
/// exit path, including a failed setup.
pub fn run(report: MetricsReport, input: PathBuf, out_dir: PathBuf) -> Result<(), CliError> {
    let mut app = App::new(report, input, out_dir);
    tracing::info!(event = "dashboard_opened", input = %app.input.display());

    let guard = TerminalGuard::enter()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, &mut app);
    drop(guard);

    tracing::info!(event = "dashboard_closed");
    result
}

/// Raw mode plus alternate screen, undone on drop.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        // Built before entering the alternate screen so a failure there still
        // leaves raw mode.
        let guard = TerminalGuard;
        execute!(io::stdout(), EnterAlternateScreen)?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(err) = disable_raw_mode() {
            tracing::warn!(event = "terminal_restore_failed", error = %err);
        }
        if let Err(err) = execute!(io::stdout(), LeaveAlternateScreen, Show) {
            tracing::warn!(event = "terminal_restore_failed", error = %err);
        }
    }
}

fn run_loop<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<(), CliError> {
    while !app.should_quit {
        terminal.draw(|frame| draw_ui(frame, app))?;

        if event::poll(POLL_INTERVAL)? {
            if let event::Event::Key(key) = event::read()? {
                handle_key(app, key);
            }
        }
    }
    Ok(())
}
