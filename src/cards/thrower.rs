//! The player's card launcher: cooldown, per-variant stats and upgrade flags.

use std::collections::BTreeSet;

use bevy::prelude::*;
use rand::Rng;

use super::card::{planar_direction, Card};
use super::config::CardConfig;
use super::stats::StatBlock;
use super::upgrades::UpgradeType;
use super::variant::{CardUpgrades, CardVariant, EffectKind};

/// A card ready to be spawned.
#[derive(Debug, Clone)]
pub struct CardLaunch {
    pub card: Card,
    pub position: Vec3,
}

/// Throws cards on a cooldown and holds the upgrades applied to future cards.
#[derive(Component, Debug, Clone)]
pub struct CardThrower {
    /// Seconds between throws
    pub cooldown: f32,
    pub cooldown_remaining: f32,
    /// Stat blocks in `CardVariant::ALL` order
    pub stats: [StatBlock; 3],
    /// Added to the base damage modifier of 1.0
    pub damage_bonus: f32,
    enabled: BTreeSet<(CardVariant, EffectKind)>,
}

impl CardThrower {
    pub fn new(cooldown: f32, stats: [StatBlock; 3]) -> Self {
        Self {
            cooldown,
            cooldown_remaining: 0.0,
            stats,
            damage_bonus: 0.0,
            enabled: BTreeSet::new(),
        }
    }

    pub fn from_config(config: &CardConfig) -> Self {
        Self::new(config.cooldown, config.stat_blocks())
    }

    pub fn tick(&mut self, dt: f32) {
        if self.cooldown_remaining > 0.0 {
            self.cooldown_remaining -= dt;
        }
    }

    pub fn is_ready(&self) -> bool {
        self.cooldown_remaining <= 0.0
    }

    /// Fraction of the cooldown still to wait, for the HUD.
    pub fn cooldown_fraction(&self) -> f32 {
        if self.cooldown <= 0.0 {
            return 0.0;
        }
        (self.cooldown_remaining / self.cooldown).clamp(0.0, 1.0)
    }

    pub fn damage_modifier(&self) -> f32 {
        1.0 + self.damage_bonus
    }

    pub fn increase_damage(&mut self, amount: f32) {
        self.damage_bonus += amount;
    }

    /// Throw a card of a random variant from `origin` toward `target`.
    ///
    /// Returns `None` while cooling down.
    pub fn try_fire<R: Rng + ?Sized>(
        &mut self,
        origin: Vec3,
        target: Vec3,
        config: &CardConfig,
        rng: &mut R,
    ) -> Option<CardLaunch> {
        if !self.is_ready() {
            return None;
        }

        let variant = CardVariant::ALL[rng.gen_range(0..CardVariant::ALL.len())];
        let direction = planar_direction(target - origin);

        let card = Card::new(
            variant,
            self.stats[variant.index()].clone(),
            direction,
            config.lifetime,
            config.split,
        )
        .with_upgrades(self.upgrades_for(variant), config.homing_precision_bonus)
        .with_damage_modifier(self.damage_modifier());

        self.cooldown_remaining = self.cooldown;

        Some(CardLaunch {
            card,
            position: origin + direction * config.spawn_offset,
        })
    }

    /// Switch on the flags of an upgrade. Applying the same upgrade again changes nothing.
    pub fn apply_upgrade(&mut self, upgrade: UpgradeType) {
        let kind = upgrade.effect();
        match upgrade.variant() {
            Some(variant) => {
                self.enabled.insert((variant, kind));
            }
            None => {
                for variant in CardVariant::ALL {
                    self.enabled.insert((variant, kind));
                }
            }
        }
    }

    pub fn has_upgrade(&self, variant: CardVariant, kind: EffectKind) -> bool {
        self.enabled.contains(&(variant, kind))
    }

    /// The flags a new card of `variant` gets.
    pub fn upgrades_for(&self, variant: CardVariant) -> CardUpgrades {
        let mut upgrades = CardUpgrades::default();
        for (_, kind) in self.enabled.iter().filter(|(v, _)| *v == variant) {
            upgrades.set(*kind, true);
        }
        upgrades
    }

    /// Every enabled `(variant, effect)` pair, in a stable order.
    pub fn active_upgrades(&self) -> impl Iterator<Item = (CardVariant, EffectKind)> + '_ {
        self.enabled.iter().copied()
    }
}
