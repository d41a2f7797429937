//! Global events used for cross-system communication.
//!
//! Events allow decoupled systems to communicate. Enemy attacks and poison
//! ticks send DamageEvents, and the combat module applies them to health.

use bevy::prelude::*;

/// Sent when an entity takes damage.
#[derive(Event, Debug, Clone, Copy)]
pub struct DamageEvent {
    /// Entity receiving damage
    pub target: Entity,
    /// Entity that caused the damage, if it is known
    pub source: Option<Entity>,
    pub amount: f32,
}

/// Sent when an entity dies (health reaches 0).
///
/// Systems listen for this to start death animations, count kills
/// and end the run when the player falls.
#[derive(Event, Debug, Clone, Copy)]
pub struct DeathEvent {
    /// Entity that died
    pub entity: Entity,
    /// Entity that killed them (if any)
    pub killed_by: Option<Entity>,
}
