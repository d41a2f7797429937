//! Enemy-related components.

use bevy::prelude::*;

/// Marker component for all enemies.
#[derive(Component)]
pub struct Enemy;

/// Enemy type identifier (matches RON file name).
#[derive(Component, Clone, Debug)]
pub struct EnemyType(pub String);

/// AI state machine for enemy behavior.
#[derive(Component, Default, PartialEq, Clone, Copy, Debug)]
pub enum AiState {
    /// Standing still, waiting for player to enter detection range.
    #[default]
    Idle,
    /// Moving toward the player.
    Chasing,
    /// Hitting the player on a cooldown.
    Attacking,
    /// Shrinking away before despawn.
    Dying,
}

/// Enemy stats loaded from RON data files.
#[derive(Component, Clone, Debug)]
pub struct EnemyStats {
    pub max_health: f32,
    pub damage: f32,
    pub move_speed: f32,
    pub detection_range: f32,
    pub attack_range: f32,
    pub attack_cooldown: f32,
}

impl Default for EnemyStats {
    fn default() -> Self {
        Self {
            max_health: 30.0,
            damage: 8.0,
            move_speed: 3.0,
            detection_range: 40.0,
            attack_range: 1.4,
            attack_cooldown: 1.0,
        }
    }
}

/// Timer for attack cooldown between enemy attacks.
#[derive(Component)]
pub struct AttackTimer(pub Timer);

impl AttackTimer {
    pub fn new(cooldown: f32) -> Self {
        Self(Timer::from_seconds(cooldown.max(0.05), TimerMode::Once))
    }
}

impl Default for AttackTimer {
    fn default() -> Self {
        Self::new(1.0)
    }
}

/// Timer for the death shrink before despawn.
#[derive(Component)]
pub struct DeathTimer(pub Timer);

impl Default for DeathTimer {
    fn default() -> Self {
        Self(Timer::from_seconds(0.6, TimerMode::Once))
    }
}

/// Untinted colour and size of an enemy, restored when status effects end.
#[derive(Component, Clone, Copy, Debug)]
pub struct EnemyLook {
    pub base_color: Color,
    pub scale: f32,
}
