//! Player-related components and resources.

use bevy::prelude::*;

/// Marker component for the player entity.
#[derive(Component)]
pub struct Player;

/// Top-down camera that trails the player.
#[derive(Component)]
pub struct PlayerCamera {
    /// Camera position relative to the player
    pub offset: Vec3,
}

impl Default for PlayerCamera {
    fn default() -> Self {
        Self {
            offset: Vec3::new(0.0, 16.0, 9.0),
        }
    }
}

/// Where the cursor points on the ground plane, if it is over the window.
#[derive(Resource, Default, Debug, Clone, Copy)]
pub struct AimPoint(pub Option<Vec3>);

/// Half the length of the straight part of the player's capsule collider.
pub const PLAYER_CAPSULE_HALF_HEIGHT: f32 = 0.5;
pub const PLAYER_CAPSULE_RADIUS: f32 = 0.3;

/// Tuning for the player character.
#[derive(Resource)]
pub struct PlayerConfig {
    /// Movement speed in units per second
    pub move_speed: f32,
    pub max_health: f32,
    /// Height of the capsule centre above the floor; the capsule bottom must not sink below it
    pub body_height: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            move_speed: 6.0,
            max_health: 100.0,
            body_height: 0.8,
        }
    }
}
