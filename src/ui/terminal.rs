use std::io::{self, Stdout};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::info;

use super::app::App;
use crate::codec::Location;

/// Short enough for the search debounce and copy feedback timers.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Spin up the terminal backend, open the first section, and keep processing
/// input until the user quits.
pub fn run_app(app: &mut App, location: Option<Location>) -> Result<()> {
    let mut stdout = io::stdout();
    enable_raw_mode().context("failed to enable raw mode")?;
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal backend")?;

    let size = terminal.size().context("failed to read terminal size")?;
    app.start(size.width, size.height, location);

    let result = event_loop(&mut terminal, app);
    cleanup_terminal(&mut terminal)?;
    info!("session ended");
    result
}

fn event_loop(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal
            .draw(|frame| app.draw(frame))
            .context("failed to draw frame")?;

        if event::poll(POLL_INTERVAL).context("event polling failed")? {
            match event::read().context("failed to read event")? {
                Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                    if key_event.modifiers.contains(KeyModifiers::CONTROL)
                        && key_event.code == KeyCode::Char('c')
                    {
                        return Ok(());
                    }
                    if app.handle_key(key_event.code)? {
                        return Ok(());
                    }
                }
                Event::Resize(width, _) => app.handle_resize(width),
                _ => {}
            }
        }

        app.tick(Instant::now());
    }
}

fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal
        .show_cursor()
        .context("failed to restore cursor visibility")
}
