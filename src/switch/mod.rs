//! Switch module for the SMEK panel
//!
//! Maps encoder characters to physical switches and tracks which
//! switches are active within a command.

pub mod layout;
mod mapping;
mod set;

pub use mapping::{is_execute, map_char_to_switch, Switch};
pub use set::SwitchSet;
