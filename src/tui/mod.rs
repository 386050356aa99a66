mod app;
mod help_text;
pub mod theme;
pub mod tty;
mod ui;
mod watcher;

pub use app::{App, AppMode, Focus};
pub use theme::{Theme, ThemeName};

use color_eyre::Result;
use crossterm::ExecutableCommand;
use crossterm::event::{Event, KeyEventKind};
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::io::{Stdout, stdout};
use std::time::{Duration, Instant};
use watcher::FileWatcher;

/// Idle poll interval.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Poll interval while a scroll animation is running.
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Enter raw mode and the alternate screen.
///
/// Keyboard input is read from `/dev/tty` when stdin is piped.
pub fn init_terminal() -> Result<Tui> {
    tty::enable_raw_mode()?;
    if let Err(e) = stdout().execute(EnterAlternateScreen) {
        tty::disable_raw_mode().ok();
        return Err(e.into());
    }
    Terminal::new(CrosstermBackend::new(stdout())).map_err(|e| {
        restore_terminal();
        e.into()
    })
}

pub fn restore_terminal() {
    stdout().execute(LeaveAlternateScreen).ok();
    tty::disable_raw_mode().ok();
}

/// Run the event loop until the user quits.
///
/// Between keystrokes the loop wakes at least every [`POLL_INTERVAL`] so a
/// due search debounce fires without further input, and reloads the
/// document when the watched file changes.
pub fn run(terminal: &mut Tui, mut app: App) -> Result<()> {
    let mut file_watcher = app.file_path.as_deref().and_then(|path| {
        FileWatcher::new(path)
            .inspect_err(|e| tracing::warn!(path = %path.display(), "cannot watch file: {}", e))
            .ok()
    });

    loop {
        terminal.draw(|frame| ui::render(frame, &mut app))?;

        let now = Instant::now();
        let mut timeout = if app.viewport.is_moving() {
            FRAME_INTERVAL
        } else {
            POLL_INTERVAL
        };
        if let Some(due) = app.search.time_until_due(now) {
            timeout = timeout.min(due);
        }

        if tty::poll_event(timeout)?
            && let Event::Key(key) = tty::read_event()?
            && key.kind == KeyEventKind::Press
        {
            app.handle_key(key, Instant::now());
        }

        app.tick(Instant::now());

        if let Some(watcher) = file_watcher.as_mut()
            && watcher.check_for_changes()
        {
            tracing::debug!(path = %watcher.path().display(), "file changed");
            if let Err(e) = app.reload() {
                tracing::warn!("{}", e);
                app.status_message = Some(e);
            }
            // Editors that save by rename replace the watched inode.
            watcher.rewatch();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
