//! Terminal mode guard
//!
//! Switches the terminal into the mode the simulation draws in (alternate
//! screen, raw input, hidden cursor, no line wrap) and puts everything
//! back when dropped, including on early returns and errors.

use std::io::{self, Write};

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute,
    style::{Attribute, ResetColor, SetAttribute},
    terminal::{
        self, Clear, ClearType, DisableLineWrap, EnableLineWrap, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use tracing::{debug, warn};

/// Owns the terminal display mode for its lifetime
pub struct TerminalGuard {
    active: bool,
}

impl TerminalGuard {
    /// Enter the drawing mode.
    ///
    /// Warns if the terminal is smaller than `needed` (columns, rows); the
    /// simulation still runs, clipped.
    pub fn enter(needed: (usize, usize)) -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut guard = Self { active: true };

        let mut stdout = io::stdout();
        if let Err(e) = execute!(
            stdout,
            EnterAlternateScreen,
            DisableLineWrap,
            Hide,
            Clear(ClearType::All),
            MoveTo(0, 0)
        ) {
            guard.restore();
            return Err(e);
        }

        match terminal::size() {
            Ok((cols, rows)) if (cols as usize) < needed.0 || (rows as usize) < needed.1 => {
                warn!(
                    "Terminal is {}x{} but the display needs {}x{}",
                    cols, rows, needed.0, needed.1
                );
            }
            Ok((cols, rows)) => debug!("Terminal size: {}x{}", cols, rows),
            Err(e) => warn!("Could not query terminal size: {}", e),
        }
        Ok(guard)
    }

    fn restore(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;

        let mut stdout = io::stdout();
        let _ = execute!(stdout, ResetColor, SetAttribute(Attribute::Reset));
        let _ = execute!(stdout, Show, EnableLineWrap, LeaveAlternateScreen);
        let _ = stdout.flush();
        let _ = terminal::disable_raw_mode();
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        self.restore();
    }
}
