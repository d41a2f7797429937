//! Audio module - card sound effects through kira.

mod plugin;

pub use plugin::{AudioEffectsPlugin, SoundEffects};
