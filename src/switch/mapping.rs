//! Character to switch mapping for the IPAC-4 encoder
//!
//! The encoder is programmed so that every SMEK switch sends one key:
//!
//! | Keys  | Switches | Encoder pins   |
//! |-------|----------|----------------|
//! | a-z   | S1-S26   | 1COIN-3UP      |
//! | 0-9   | S27-S36  | 3LEFT-4SW4     |
//! | `-`   | S37      | 4SW5           |
//! | `.`   | S38      | 4SW6           |
//! | Enter | S39      | 2COIN          |
//!
//! CLEAR (S40) is not wired to any key.

use serde::{Deserialize, Serialize};

/// Number of physical switches on the panel
pub const SWITCH_COUNT: u8 = 41;

/// Raw ordinal sent by the encoder when EXECUTE is pressed (Enter)
pub const EXECUTE_CODE: u32 = 13;

/// A physical switch, numbered 1 to 41
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Switch(u8);

impl Switch {
    /// End-of-command switch, reported as a literal Enter keystroke
    pub const EXECUTE: Switch = Switch(39);
    /// Wired in the layout but never produced by the decoder
    pub const CLEAR: Switch = Switch(40);

    /// Create a switch from its number, if it is on the panel
    pub fn new(number: u8) -> Option<Self> {
        (1..=SWITCH_COUNT).contains(&number).then_some(Self(number))
    }

    /// The 1-based switch number
    pub fn number(self) -> u8 {
        self.0
    }

    /// Iterate over every switch on the panel in numeric order
    pub fn all() -> impl Iterator<Item = Switch> {
        (1..=SWITCH_COUNT).map(Switch)
    }

    /// Whether some character can ever select this switch
    pub fn is_reachable(self) -> bool {
        self.0 <= 38
    }
}

impl std::fmt::Display for Switch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "S{:02}", self.0)
    }
}

impl TryFrom<u8> for Switch {
    type Error = String;

    fn try_from(number: u8) -> Result<Self, Self::Error> {
        Switch::new(number)
            .ok_or_else(|| format!("switch {} is outside 1..={}", number, SWITCH_COUNT))
    }
}

impl From<Switch> for u8 {
    fn from(switch: Switch) -> Self {
        switch.0
    }
}

/// Map a character from the encoder to the switch that sent it
///
/// Returns `None` for anything the encoder is not programmed to send,
/// including Enter (EXECUTE is detected by ordinal, not through this table).
pub fn map_char_to_switch(ch: char) -> Option<Switch> {
    let number = match ch {
        'a'..='z' => ch as u8 - b'a' + 1,
        '0'..='9' => ch as u8 - b'0' + 27,
        '-' => 37,
        '.' => 38,
        _ => return None,
    };
    Some(Switch(number))
}

/// Whether a raw character is the EXECUTE keystroke
pub fn is_execute(ch: char) -> bool {
    ch as u32 == EXECUTE_CODE
}
