//! Effects module for per-key sound selection
//!
//! The registry is built once at startup and handed to the player; the
//! decoder itself never sees it.

mod player;
mod registry;

pub use player::EffectPlayer;
pub use registry::SoundRegistry;
