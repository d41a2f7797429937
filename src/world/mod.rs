//! World module - the arena.

mod arena;
mod plugin;

pub use arena::{wall_layout, ArenaConfig, ArenaGeometry};
pub use plugin::{setup_arena, WorldPlugin};
