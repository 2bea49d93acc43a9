//! Input module for reading the encoder
//!
//! Provides the `CharacterSource` seam used by the sequencer, a plain
//! byte reader, and a raw-mode terminal reader for the real panel.

mod source;
mod terminal;

pub use source::{CharacterSource, ReaderSource, SourceError};
pub use terminal::restore_terminal;

use terminal::TerminalSource;

use std::io;

/// Open the configured input: raw terminal, or stdin as a plain byte stream
pub fn open(raw_mode: bool) -> Box<dyn CharacterSource + Send> {
    if raw_mode {
        Box::new(TerminalSource::new())
    } else {
        Box::new(ReaderSource::new(io::stdin()))
    }
}
