//! Player module - player entity, top-down movement, aiming and camera.

mod components;
mod movement;
mod plugin;

pub use components::*;
pub use movement::{ground_point, spawn_player, spawn_player_camera, wasd_direction};
pub use plugin::PlayerPlugin;
