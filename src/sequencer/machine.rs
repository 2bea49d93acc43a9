//! Command sequencer implementation
//!
//! Reads raw characters until EXECUTE or the quit character, recording
//! which switches were pressed and in what order.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::input::{CharacterSource, SourceError};
use crate::switch::{is_execute, map_char_to_switch, SwitchSet};

/// Callback invoked once per accepted character
pub type Observer = Box<dyn FnMut(char) + Send>;

/// Result of reading one command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// EXECUTE was pressed; holds the command as it stood at that moment
    Completed(CommandSnapshot),
    /// The quit character was read; the session should end
    Quit,
}

/// Read-only view of a command
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandSnapshot {
    /// Number of switches seen during the command
    pub active_count: usize,
    /// Accepted characters in arrival order
    pub sequence: String,
    /// Distinct accepted characters, sorted
    pub sorted_unique: String,
    /// Per-switch state
    pub switches: SwitchSet,
}

impl CommandSnapshot {
    /// EXECUTE can be reported while it is still being scanned, before any
    /// other switch registers. Such a command carries no switches and
    /// should be ignored.
    pub fn is_noop(&self) -> bool {
        self.active_count == 0
    }
}

/// State of the command being entered
#[derive(Debug, Default)]
struct CommandState {
    /// Accepted characters since the last reset. May repeat a character
    /// when the same switch was released and pressed again.
    sequence: String,
    /// Switches seen since the last reset
    switches: SwitchSet,
}

/// Decodes encoder keystrokes into commands
pub struct SwitchSequencer {
    /// Character that ends the session
    quit_char: char,
    /// Command currently being entered
    state: CommandState,
    /// Notified of every accepted character
    observer: Option<Observer>,
}

impl SwitchSequencer {
    /// Create a sequencer without an observer
    pub fn new(quit_char: char) -> Self {
        Self {
            quit_char,
            state: CommandState::default(),
            observer: None,
        }
    }

    /// Create a sequencer that reports accepted characters to `observer`
    pub fn with_observer<F>(quit_char: char, observer: F) -> Self
    where
        F: FnMut(char) + Send + 'static,
    {
        Self {
            observer: Some(Box::new(observer)),
            ..Self::new(quit_char)
        }
    }

    /// Character that ends the session
    pub fn quit_char(&self) -> char {
        self.quit_char
    }

    /// Discard the current command
    pub fn reset_command(&mut self) {
        self.state.sequence.clear();
        self.state.switches.clear();
    }

    /// Record a character as part of the current command
    ///
    /// Returns false, leaving the command untouched, if the character does
    /// not belong to any switch.
    pub fn accept_character(&mut self, ch: char) -> bool {
        let Some(switch) = map_char_to_switch(ch) else {
            warn!(
                ordinal = ch as u32,
                "unhandled mapping, ordinal value of key was {}",
                ch as u32
            );
            return false;
        };

        self.state.sequence.push(ch);
        if self.state.switches.insert(switch) {
            debug!(%switch, "switch activated");
        }

        if let Some(observer) = self.observer.as_mut() {
            observer(ch);
        }

        true
    }

    /// Read characters until EXECUTE or the quit character
    ///
    /// Immediately repeated characters are treated as auto-repeat of a held
    /// switch and skipped. Fails only if the source fails.
    pub fn read_command<S>(&mut self, source: &mut S) -> Result<Outcome, SourceError>
    where
        S: CharacterSource + ?Sized,
    {
        self.reset_command();
        let mut last: Option<char> = None;

        loop {
            let ch = source.read_char()?;

            if ch == self.quit_char {
                info!("quit character received");
                return Ok(Outcome::Quit);
            }

            if last == Some(ch) {
                continue;
            }
            last = Some(ch);

            if is_execute(ch) {
                let snapshot = self.state();
                debug!(
                    active = snapshot.active_count,
                    sequence = %snapshot.sequence,
                    "execute received"
                );
                return Ok(Outcome::Completed(snapshot));
            }

            self.accept_character(ch);
        }
    }

    /// Snapshot of the current command
    pub fn state(&self) -> CommandSnapshot {
        let unique: BTreeSet<char> = self.state.sequence.chars().collect();
        CommandSnapshot {
            active_count: self.state.switches.active_count(),
            sequence: self.state.sequence.clone(),
            sorted_unique: unique.into_iter().collect(),
            switches: self.state.switches,
        }
    }
}
