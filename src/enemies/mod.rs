//! Enemies module - enemy data, AI, waves and status tints.

mod ai;
mod components;
pub mod data;
mod plugin;
mod status;
pub mod waves;

pub use ai::state_after_stun;
pub use components::*;
pub use data::{EnemyDefinition, EnemyRegistry};
pub use plugin::EnemyPlugin;
pub use status::status_tint;
pub use waves::{WaveState, WaveTable};
