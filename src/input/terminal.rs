//! Raw terminal input for the IPAC-4 encoder
//!
//! The encoder shows up as a USB keyboard. Each read puts the terminal in
//! raw mode just long enough to take one keystroke, so anything printed
//! between keystrokes goes through the normal terminal settings.

use std::io::{self, Stdin};

use crossterm::terminal;
use tracing::{debug, warn};

use super::source::{CharacterSource, ReaderSource, SourceError};

/// Holds the terminal in raw mode until dropped
pub struct RawModeGuard {
    _private: (),
}

impl RawModeGuard {
    /// Enter raw mode
    pub fn acquire() -> Result<Self, SourceError> {
        terminal::enable_raw_mode().map_err(SourceError::RawMode)?;
        Ok(Self { _private: () })
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if let Err(e) = terminal::disable_raw_mode() {
            warn!(?e, "failed to restore terminal mode");
        }
    }
}

/// Restore the terminal outside of any guard (signal and panic paths)
pub fn restore_terminal() {
    match terminal::is_raw_mode_enabled() {
        Ok(true) => {
            if let Err(e) = terminal::disable_raw_mode() {
                warn!(?e, "failed to restore terminal mode");
            } else {
                debug!("terminal mode restored");
            }
        }
        Ok(false) => {}
        Err(e) => warn!(?e, "failed to query terminal mode"),
    }
}

/// Reads keystrokes from stdin, one per raw-mode acquisition
pub struct TerminalSource {
    inner: ReaderSource<Stdin>,
}

impl TerminalSource {
    pub fn new() -> Self {
        Self {
            inner: ReaderSource::new(io::stdin()),
        }
    }
}

impl Default for TerminalSource {
    fn default() -> Self {
        Self::new()
    }
}

impl CharacterSource for TerminalSource {
    fn read_char(&mut self) -> Result<char, SourceError> {
        let _guard = RawModeGuard::acquire()?;
        self.inner.read_char()
    }
}
