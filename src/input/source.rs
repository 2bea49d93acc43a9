//! Character sources feeding the sequencer

use std::io::{self, Read};

/// Errors that can occur while reading from the encoder
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("input stream closed")]
    Closed,

    #[error("failed to read from input: {0}")]
    Io(#[from] io::Error),

    #[error("failed to switch terminal raw mode: {0}")]
    RawMode(#[source] io::Error),
}

/// Supplies one character at a time, blocking until one is available
pub trait CharacterSource {
    fn read_char(&mut self) -> Result<char, SourceError>;
}

impl<S: CharacterSource + ?Sized> CharacterSource for Box<S> {
    fn read_char(&mut self) -> Result<char, SourceError> {
        (**self).read_char()
    }
}

/// Reads single bytes from any reader
///
/// The encoder only sends ASCII, so each byte is taken as one character.
#[derive(Debug)]
pub struct ReaderSource<R> {
    reader: R,
}

impl<R: Read> ReaderSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: Read> CharacterSource for ReaderSource<R> {
    fn read_char(&mut self) -> Result<char, SourceError> {
        let mut buf = [0u8; 1];
        loop {
            match self.reader.read(&mut buf) {
                Ok(0) => return Err(SourceError::Closed),
                Ok(_) => return Ok(char::from(buf[0])),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }
}
