//! Card projectile state: flight, fan-shot split, impact.
//!
//! [`Card`] is a plain component with no engine calls in its logic, so the whole
//! lifecycle can be stepped in tests by calling [`Card::advance`] directly.

use bevy::prelude::*;
use rand::Rng;

use super::config::SplitSettings;
use super::stats::StatBlock;
use super::variant::{CardUpgrades, CardVariant};

/// Direction used when an aim vector is degenerate ("up" on screen).
pub const DEFAULT_DIRECTION: Vec3 = Vec3::NEG_Z;

/// Number of cards a fan shot splits into.
pub const SPLIT_COUNT: usize = 3;

/// Lifecycle phase of a card.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CardPhase {
    Flying,
    /// Already split; waits out the grace period with its collider disabled.
    Splitting { grace: f32 },
    Destroyed,
}

/// Why a card reached [`CardPhase::Destroyed`] without hitting anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestroyReason {
    Expired,
    SplitFinished,
}

/// Outcome of one simulation step.
#[derive(Debug, Clone, PartialEq)]
pub enum FlightStep {
    Continue,
    Split([Card; SPLIT_COUNT]),
    Destroyed(DestroyReason),
}

/// A thrown card.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Card {
    pub variant: CardVariant,
    /// Private copy of the thrower's stats at throw time
    pub stats: StatBlock,
    /// Unit vector in the XZ plane
    pub direction: Vec3,
    pub damage_modifier: f32,
    pub should_split: bool,
    pub has_split: bool,
    pub upgrades: CardUpgrades,
    pub split: SplitSettings,
    /// Homing strength added on top of the stat when Homing Precision is active
    pub homing_bonus: f32,
    pub age: f32,
    pub lifetime: f32,
    pub scale: f32,
    pub phase: CardPhase,
}

impl Card {
    pub fn new(
        variant: CardVariant,
        stats: StatBlock,
        direction: Vec3,
        lifetime: f32,
        split: SplitSettings,
    ) -> Self {
        Self {
            variant,
            stats,
            direction: planar_direction(direction),
            damage_modifier: 1.0,
            should_split: false,
            has_split: false,
            upgrades: CardUpgrades::default(),
            split,
            homing_bonus: 0.0,
            age: 0.0,
            lifetime,
            scale: 1.0,
            phase: CardPhase::Flying,
        }
    }

    /// Attach an upgrade snapshot. Fan shot turns on splitting.
    pub fn with_upgrades(mut self, upgrades: CardUpgrades, homing_bonus: f32) -> Self {
        self.upgrades = upgrades;
        self.should_split = upgrades.fan_shot;
        self.homing_bonus = homing_bonus;
        self
    }

    pub fn with_damage_modifier(mut self, damage_modifier: f32) -> Self {
        self.damage_modifier = damage_modifier;
        self
    }

    pub fn is_flying(&self) -> bool {
        self.phase == CardPhase::Flying
    }

    pub fn speed(&self) -> f32 {
        self.stats.speed.value()
    }

    pub fn homing_strength(&self) -> f32 {
        let bonus = if self.upgrades.homing_precision {
            self.homing_bonus
        } else {
            0.0
        };
        (self.stats.homing_strength.value() + bonus).max(0.0)
    }

    /// Advance the card by `dt`, moving `position` along its direction.
    ///
    /// `homing_target` is the nearest eligible enemy, if the caller found one.
    pub fn advance(&mut self, dt: f32, position: &mut Vec3, homing_target: Option<Vec3>) -> FlightStep {
        match self.phase {
            CardPhase::Destroyed => FlightStep::Continue,
            CardPhase::Splitting { grace } => {
                let grace = grace - dt;
                if grace <= 0.0 {
                    self.phase = CardPhase::Destroyed;
                    FlightStep::Destroyed(DestroyReason::SplitFinished)
                } else {
                    self.phase = CardPhase::Splitting { grace };
                    FlightStep::Continue
                }
            }
            CardPhase::Flying => {
                self.age += dt;
                if self.age >= self.lifetime {
                    self.phase = CardPhase::Destroyed;
                    return FlightStep::Destroyed(DestroyReason::Expired);
                }

                let homing = self.homing_strength();
                if homing > 0.0 {
                    if let Some(target) = homing_target {
                        self.steer_toward(*position, target, homing * dt);
                    }
                }

                *position += self.direction * self.speed() * dt;

                if self.should_split && !self.has_split && self.age >= self.split.time {
                    return FlightStep::Split(self.split_now());
                }

                FlightStep::Continue
            }
        }
    }

    /// Lerp the direction toward `target` by at most `amount` (clamped to 1).
    fn steer_toward(&mut self, position: Vec3, target: Vec3, amount: f32) {
        let Some(to_target) = (target - position).with_y(0.0).try_normalize() else {
            return;
        };
        let blended = self.direction.lerp(to_target, amount.min(1.0));
        self.direction = blended.try_normalize().unwrap_or(self.direction);
    }

    /// Mark the card as split and build its three children.
    fn split_now(&mut self) -> [Card; SPLIT_COUNT] {
        self.has_split = true;
        self.phase = CardPhase::Splitting {
            grace: self.split.grace,
        };

        let angle = self.split.angle_degrees.to_radians();
        let remaining = (self.lifetime - self.age).max(0.0);

        [0.0, angle, -angle].map(|offset| {
            let mut child = self.clone();
            child.direction = planar_direction(Quat::from_rotation_y(offset) * self.direction);
            child.damage_modifier = self.damage_modifier * self.split.damage_multiplier;
            child.scale = self.scale * self.split.child_scale;
            child.should_split = false;
            child.has_split = false;
            child.age = 0.0;
            child.lifetime = remaining;
            child.phase = CardPhase::Flying;
            child
        })
    }

    /// Consume the card on a hit. Returns false if it cannot impact any more.
    pub fn begin_impact(&mut self) -> bool {
        if !self.is_flying() {
            return false;
        }
        self.phase = CardPhase::Destroyed;
        true
    }

    /// Roll the damage of one hit.
    ///
    /// The critical roll makes this non-idempotent: call it once per impact and reuse
    /// the result.
    pub fn roll_damage<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        let base = (self.stats.damage.value() * self.damage_modifier).round().max(0.0) as u32;
        let critical = rng.gen::<f32>() < self.stats.critical_chance.value();
        let damage = if critical { base * 2 } else { base };
        damage.max(1)
    }
}

/// Flatten `direction` onto the XZ plane and normalise it, falling back to
/// [`DEFAULT_DIRECTION`] when it has no length.
pub fn planar_direction(direction: Vec3) -> Vec3 {
    direction
        .with_y(0.0)
        .try_normalize()
        .unwrap_or(DEFAULT_DIRECTION)
}
