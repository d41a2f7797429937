//! Combat module - health, damage and deaths.

mod components;
mod plugin;
mod systems;

pub use components::*;
pub use plugin::CombatPlugin;
pub use systems::{apply_damage, detect_deaths, CombatSet};
