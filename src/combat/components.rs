//! Combat-related components.

use bevy::prelude::*;

// Re-export from core to avoid duplication
pub use crate::core::{DamageEvent, DeathEvent};

/// Something that can lose health.
pub trait Damageable {
    /// Apply `amount` damage and return how much was actually taken.
    fn take_damage(&mut self, amount: f32) -> f32;
}

/// Something that can regain health.
pub trait Healable {
    /// Heal by `amount` and return how much was actually restored.
    fn heal(&mut self, amount: f32) -> f32;
}

/// Component for entities that can take damage.
#[derive(Component, Debug, Clone)]
pub struct Health {
    pub current: f32,
    pub maximum: f32,
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self {
            current: max,
            maximum: max,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.current <= 0.0
    }

    pub fn percentage(&self) -> f32 {
        if self.maximum <= 0.0 {
            return 0.0;
        }
        self.current / self.maximum
    }
}

impl Damageable for Health {
    fn take_damage(&mut self, amount: f32) -> f32 {
        let actual = amount.max(0.0).min(self.current.max(0.0));
        self.current -= actual;
        actual
    }
}

impl Healable for Health {
    fn heal(&mut self, amount: f32) -> f32 {
        let actual = amount.max(0.0).min(self.maximum - self.current).max(0.0);
        self.current += actual;
        actual
    }
}

/// Seconds during which incoming damage is ignored.
#[derive(Component, Default, Debug)]
pub struct HitInvulnerability {
    pub remaining: f32,
}

impl HitInvulnerability {
    pub fn is_active(&self) -> bool {
        self.remaining > 0.0
    }

    pub fn grant(&mut self, duration: f32) {
        self.remaining = self.remaining.max(duration);
    }
}

/// Marker component for entities that have died (prevents multiple death events).
#[derive(Component)]
pub struct Dead;
