//! Card-related components, resources and events.

use bevy::prelude::*;

use super::effects::PoisonEffect;
use super::upgrades::{UpgradeEntry, UpgradeType};
use super::variant::CardVariant;

/// The entity that threw a card. Its collisions with the card are ignored.
#[derive(Component, Debug, Clone, Copy)]
pub struct CardOwner(pub Entity);

/// Damage-over-time running on an entity.
#[derive(Component, Debug, Clone, Copy)]
pub struct Poisoned(pub PoisonEffect);

/// Movement and attacks suppressed until the timer runs out.
#[derive(Component, Debug, Clone)]
pub struct Stunned {
    pub timer: Timer,
}

impl Stunned {
    pub fn new(duration: f32) -> Self {
        Self {
            timer: Timer::from_seconds(duration.max(0.0), TimerMode::Once),
        }
    }

    /// Start over with a full `duration`; remaining time is discarded, not added.
    pub fn restart(&mut self, duration: f32) {
        self.timer = Timer::from_seconds(duration.max(0.0), TimerMode::Once);
    }

    pub fn remaining_secs(&self) -> f32 {
        self.timer.remaining_secs()
    }
}

/// Short-lived flash spawned where a card hit.
#[derive(Component)]
pub struct ImpactFlash {
    pub timer: Timer,
    pub radius: f32,
}

/// Meshes and materials shared by all cards.
#[derive(Resource, Default)]
pub struct CardAssets {
    pub card_mesh: Handle<Mesh>,
    pub flash_mesh: Handle<Mesh>,
    /// Indexed by `CardVariant::index`
    pub card_materials: [Handle<StandardMaterial>; 3],
    /// Indexed by `CardVariant::index`
    pub flash_materials: [Handle<StandardMaterial>; 3],
}

/// Kills counted toward the next upgrade offer, and the offer being shown.
#[derive(Resource, Default, Debug)]
pub struct UpgradeProgress {
    pub kills_since_offer: u32,
    pub offer: Vec<UpgradeEntry>,
}

/// Sent when a card leaves the thrower.
#[derive(Event, Debug, Clone, Copy)]
pub struct CardThrownEvent {
    pub thrower: Entity,
    pub variant: CardVariant,
    pub position: Vec3,
}

/// Sent when a card hits something.
#[derive(Event, Debug, Clone, Copy)]
pub struct CardImpactEvent {
    pub variant: CardVariant,
    pub position: Vec3,
    pub radius: f32,
    pub damage: u32,
}

/// Sent when the player picks an upgrade.
#[derive(Event, Debug, Clone, Copy)]
pub struct UpgradeChosenEvent(pub UpgradeType);
