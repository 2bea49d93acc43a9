//! Events module for decoder activity
//!
//! Events are sent from the reader thread to the effect player so the
//! reader never waits on playback.

use serde::{Deserialize, Serialize};

use crate::switch::Switch;

/// Events emitted while a session is running
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SwitchEvent {
    /// A mapped, non-repeated key was accepted
    SwitchPressed {
        /// Switch that sent the key
        switch: Switch,
        /// Raw character from the encoder
        character: char,
    },

    /// EXECUTE was pressed with at least one active switch
    CommandCompleted {
        /// Number of active switches
        active_count: usize,
        /// Keys in the order they were accepted
        sequence: String,
    },

    /// EXECUTE was pressed before any switch registered
    CommandIgnored,

    /// The session ended (quit character or input failure)
    SessionEnded,
}

impl std::fmt::Display for SwitchEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SwitchEvent::SwitchPressed { switch, character } => {
                write!(f, "SWITCH_PRESSED ({} {:?})", switch, character)
            }
            SwitchEvent::CommandCompleted { active_count, sequence } => {
                write!(f, "COMMAND_COMPLETED ({} active, {:?})", active_count, sequence)
            }
            SwitchEvent::CommandIgnored => write!(f, "COMMAND_IGNORED"),
            SwitchEvent::SessionEnded => write!(f, "SESSION_ENDED"),
        }
    }
}
