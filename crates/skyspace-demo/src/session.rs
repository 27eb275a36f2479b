#![forbid(unsafe_code)]

//! Terminal session guard.
//!
//! Entering a [`ViewerSession`] switches the terminal to raw mode, enters the
//! alternate screen, and hides the cursor. Dropping it undoes all three in
//! reverse order, including during panic unwinding. A panic hook performs the
//! same cleanup so a panic message is readable even under `panic = "abort"`.

use std::io::{self, Write};
use std::sync::OnceLock;
use std::time::Duration;

use crossterm::event::Event;

#[derive(Debug)]
pub struct ViewerSession {
    alternate_screen_enabled: bool,
}

impl ViewerSession {
    /// Enter raw mode and the alternate screen.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal refuses raw mode or the alternate
    /// screen.
    pub fn enter() -> io::Result<Self> {
        install_panic_hook();

        crossterm::terminal::enable_raw_mode()?;
        tracing::info!("terminal raw mode enabled");

        let mut session = Self {
            alternate_screen_enabled: false,
        };
        let mut stdout = io::stdout();
        crossterm::execute!(stdout, crossterm::terminal::EnterAlternateScreen)?;
        session.alternate_screen_enabled = true;
        crossterm::execute!(stdout, crossterm::cursor::Hide)?;
        tracing::info!("alternate screen enabled");
        Ok(session)
    }

    /// Current terminal size (columns, rows).
    pub fn size(&self) -> io::Result<(u16, u16)> {
        crossterm::terminal::size()
    }

    /// Wait up to `timeout` for an event.
    pub fn poll_event(&self, timeout: Duration) -> io::Result<Option<Event>> {
        if crossterm::event::poll(timeout)? {
            crossterm::event::read().map(Some)
        } else {
            Ok(None)
        }
    }

    fn cleanup(&mut self) {
        let mut stdout = io::stdout();
        let _ = crossterm::execute!(
            stdout,
            crossterm::style::ResetColor,
            crossterm::cursor::Show
        );
        if self.alternate_screen_enabled {
            let _ = crossterm::execute!(stdout, crossterm::terminal::LeaveAlternateScreen);
            self.alternate_screen_enabled = false;
            tracing::info!("alternate screen disabled");
        }
        let _ = crossterm::terminal::disable_raw_mode();
        tracing::info!("terminal raw mode disabled");
        let _ = stdout.flush();
    }
}

impl Drop for ViewerSession {
    fn drop(&mut self) {
        self.cleanup();
    }
}

fn install_panic_hook() {
    static HOOK: OnceLock<()> = OnceLock::new();
    HOOK.get_or_init(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            best_effort_cleanup();
            previous(info);
        }));
    });
}

fn best_effort_cleanup() {
    let mut stdout = io::stdout();
    let _ = crossterm::execute!(stdout, crossterm::style::ResetColor);
    let _ = crossterm::execute!(stdout, crossterm::cursor::Show);
    let _ = crossterm::execute!(stdout, crossterm::terminal::LeaveAlternateScreen);
    let _ = crossterm::terminal::disable_raw_mode();
    let _ = stdout.flush();
}
