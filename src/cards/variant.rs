//! Card variants and the effect kinds upgrades can toggle.

use bevy::prelude::*;
use serde::Deserialize;

/// Elemental card variant.
///
/// Each variant has its own stat block and a default effect family:
/// Red cards favour splash, Blue cards stun, Green cards poison.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CardVariant {
    Red,
    Blue,
    Green,
}

impl CardVariant {
    pub const ALL: [CardVariant; 3] = [CardVariant::Red, CardVariant::Blue, CardVariant::Green];

    pub fn index(self) -> usize {
        match self {
            CardVariant::Red => 0,
            CardVariant::Blue => 1,
            CardVariant::Green => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            CardVariant::Red => "Red",
            CardVariant::Blue => "Blue",
            CardVariant::Green => "Green",
        }
    }

    /// Tint used for the card mesh and its impact flash.
    pub fn color(self) -> Color {
        match self {
            CardVariant::Red => Color::srgb(0.9, 0.2, 0.15),
            CardVariant::Blue => Color::srgb(0.2, 0.45, 0.95),
            CardVariant::Green => Color::srgb(0.25, 0.85, 0.3),
        }
    }
}

/// Secondary behaviour an upgrade can switch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EffectKind {
    AreaOfEffect,
    Stun,
    Poison,
    Vampire,
    FanShot,
    HomingPrecision,
    ChainLightning,
}

impl EffectKind {
    pub fn name(self) -> &'static str {
        match self {
            EffectKind::AreaOfEffect => "Area of Effect",
            EffectKind::Stun => "Stun",
            EffectKind::Poison => "Poison",
            EffectKind::Vampire => "Vampire",
            EffectKind::FanShot => "Fan Shot",
            EffectKind::HomingPrecision => "Homing Precision",
            EffectKind::ChainLightning => "Chain Lightning",
        }
    }
}

/// Upgrade flags resolved for one variant, copied into every card at spawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CardUpgrades {
    pub area_of_effect: bool,
    pub stun: bool,
    pub poison: bool,
    pub vampire: bool,
    pub fan_shot: bool,
    pub homing_precision: bool,
    pub chain_lightning: bool,
}

impl CardUpgrades {
    pub fn set(&mut self, kind: EffectKind, enabled: bool) {
        match kind {
            EffectKind::AreaOfEffect => self.area_of_effect = enabled,
            EffectKind::Stun => self.stun = enabled,
            EffectKind::Poison => self.poison = enabled,
            EffectKind::Vampire => self.vampire = enabled,
            EffectKind::FanShot => self.fan_shot = enabled,
            EffectKind::HomingPrecision => self.homing_precision = enabled,
            EffectKind::ChainLightning => self.chain_lightning = enabled,
        }
    }
}
