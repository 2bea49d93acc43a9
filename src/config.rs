//! Configuration loading and management

use std::path::PathBuf;
use std::str::FromStr;

use crate::switch::{is_execute, map_char_to_switch};

/// Errors in the environment configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("SMEK_QUIT_CHAR must be exactly one character, got {0:?}")]
    QuitChar(String),

    #[error("quit character {0:?} must be ASCII and not EXECUTE or a switch key")]
    QuitCharReserved(char),

    #[error("unknown output format {0:?} (expected \"text\" or \"json\")")]
    OutputFormat(String),

    #[error("SMEK_RAW must be a boolean, got {0:?}")]
    RawMode(String),

    #[error("HOME is not set and SMEK_SOUNDS was not given")]
    MissingHome,
}

/// How completed commands are written to stdout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable report with the panel grid
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(ConfigError::OutputFormat(s.to_string())),
        }
    }
}

/// Decoder configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Character that ends the session
    pub quit_char: char,

    /// Report format for completed commands
    pub output: OutputFormat,

    /// Put the terminal in raw mode for each keystroke
    pub raw_mode: bool,

    /// Sound manifest; a missing file means the built-in table is used
    pub sounds_path: PathBuf,
}

impl Config {
    /// Load configuration from environment and defaults
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from a variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let quit_char = match lookup("SMEK_QUIT_CHAR") {
            Some(value) => {
                let mut chars = value.chars();
                match (chars.next(), chars.next()) {
                    (Some(ch), None) => validate_quit_char(ch)?,
                    _ => return Err(ConfigError::QuitChar(value)),
                }
            }
            None => 'Q',
        };

        let output = match lookup("SMEK_OUTPUT") {
            Some(value) => value.parse()?,
            None => OutputFormat::default(),
        };

        let raw_mode = match lookup("SMEK_RAW") {
            Some(value) => parse_bool(&value).ok_or(ConfigError::RawMode(value))?,
            None => true,
        };

        let sounds_path = match lookup("SMEK_SOUNDS") {
            Some(path) => PathBuf::from(path),
            None => {
                let home = lookup("HOME").ok_or(ConfigError::MissingHome)?;
                PathBuf::from(home)
                    .join(".local")
                    .join("share")
                    .join("smek")
                    .join("sounds.json")
            }
        };

        Ok(Self {
            quit_char,
            output,
            raw_mode,
            sounds_path,
        })
    }
}

/// The encoder is read one byte at a time, so only ASCII can ever match
fn validate_quit_char(ch: char) -> Result<char, ConfigError> {
    if !ch.is_ascii() || is_execute(ch) || map_char_to_switch(ch).is_some() {
        return Err(ConfigError::QuitCharReserved(ch));
    }
    Ok(ch)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
