//! Sequencer module for command decoding
//!
//! Turns the raw keystroke stream into commands: the switches active
//! when EXECUTE fires and the order they were pressed in.

mod machine;

pub use machine::{CommandSnapshot, Outcome, SwitchSequencer};
