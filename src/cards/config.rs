//! Card tuning loaded from `assets/data/cards.ron`.
//!
//! Every field has a built-in default, so a partial file only overrides what it names.
//! A missing or unreadable file falls back to the defaults with a warning.

use bevy::prelude::*;
use serde::Deserialize;

use super::stats::{Stat, StatBlock};
use super::variant::CardVariant;
use crate::core::{load_ron, DataLoadError};

/// Location of the card tuning file.
pub const CARD_CONFIG_PATH: &str = "assets/data/cards.ron";

/// Fan-shot split behaviour.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct SplitSettings {
    /// Seconds of flight before the card splits
    pub time: f32,
    /// Angle between the middle child and each side child, in degrees
    pub angle_degrees: f32,
    /// Damage modifier multiplier applied to each child
    pub damage_multiplier: f32,
    /// Visual scale multiplier applied to each child
    pub child_scale: f32,
    /// Seconds the parent lingers (without collider) before it is destroyed
    pub grace: f32,
}

impl Default for SplitSettings {
    fn default() -> Self {
        Self {
            time: 0.35,
            angle_degrees: 20.0,
            damage_multiplier: 0.6,
            child_scale: 0.6,
            grace: 0.05,
        }
    }
}

/// Damage-over-time applied by poison upgrades.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct PoisonSettings {
    pub dps: f32,
    pub duration: f32,
}

impl Default for PoisonSettings {
    fn default() -> Self {
        Self {
            dps: 4.0,
            duration: 3.0,
        }
    }
}

/// Chain lightning arcs.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct ChainSettings {
    /// Maximum number of additional enemies hit
    pub jumps: u32,
    /// Maximum distance of a single jump
    pub range: f32,
    /// Fraction of the impact damage dealt by each arc
    pub damage_fraction: f32,
}

impl Default for ChainSettings {
    fn default() -> Self {
        Self {
            jumps: 3,
            range: 4.0,
            damage_fraction: 0.5,
        }
    }
}

/// All card tuning values.
#[derive(Resource, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct CardConfig {
    /// Seconds between throws
    pub cooldown: f32,
    /// Seconds a card flies before it is destroyed without hitting anything
    pub lifetime: f32,
    /// Distance in front of the player where cards spawn
    pub spawn_offset: f32,
    /// Radius of the card sensor collider
    pub collider_radius: f32,
    /// Search radius for homing targets
    pub homing_radius: f32,
    /// Homing strength added by the Homing Precision upgrade
    pub homing_precision_bonus: f32,
    pub split: SplitSettings,
    /// Explosion radius multiplier of the Area of Effect upgrades
    pub aoe_radius_multiplier: f32,
    pub poison: PoisonSettings,
    /// Seconds of stun applied by stun upgrades
    pub stun_duration: f32,
    /// Fraction of dealt damage returned to the thrower by vampire upgrades
    pub vampire_heal_percent: f32,
    pub chain: ChainSettings,
    pub red: StatBlock,
    pub blue: StatBlock,
    pub green: StatBlock,
    /// Kills needed before an upgrade is offered
    pub kills_per_upgrade: u32,
    /// Number of upgrades offered at once
    pub upgrade_offer_size: usize,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            cooldown: 0.5,
            lifetime: 2.5,
            spawn_offset: 0.8,
            collider_radius: 0.25,
            homing_radius: 8.0,
            homing_precision_bonus: 4.0,
            split: SplitSettings::default(),
            aoe_radius_multiplier: 1.75,
            poison: PoisonSettings::default(),
            stun_duration: 1.5,
            vampire_heal_percent: 0.2,
            chain: ChainSettings::default(),
            red: StatBlock {
                speed: Stat::new(1, 13.0, 1.0),
                damage: Stat::new(1, 12.0, 2.0),
                explosion_radius: Stat::new(1, 1.6, 0.3),
                critical_chance: Stat::new(1, 0.1, 0.05),
                homing_strength: Stat::flat(0.0),
            },
            blue: StatBlock {
                speed: Stat::new(1, 16.0, 1.5),
                damage: Stat::new(1, 9.0, 1.5),
                explosion_radius: Stat::new(1, 1.0, 0.2),
                critical_chance: Stat::new(1, 0.15, 0.05),
                homing_strength: Stat::flat(0.0),
            },
            green: StatBlock {
                speed: Stat::new(1, 14.0, 1.0),
                damage: Stat::new(1, 8.0, 1.5),
                explosion_radius: Stat::new(1, 1.2, 0.2),
                critical_chance: Stat::new(1, 0.2, 0.05),
                homing_strength: Stat::flat(0.0),
            },
            kills_per_upgrade: 5,
            upgrade_offer_size: 3,
        }
    }
}

impl CardConfig {
    pub fn stats_for(&self, variant: CardVariant) -> &StatBlock {
        match variant {
            CardVariant::Red => &self.red,
            CardVariant::Blue => &self.blue,
            CardVariant::Green => &self.green,
        }
    }

    /// Stat blocks in `CardVariant::ALL` order.
    pub fn stat_blocks(&self) -> [StatBlock; 3] {
        CardVariant::ALL.map(|variant| self.stats_for(variant).clone())
    }

    /// Clamp out-of-range values. Returns true if anything changed.
    pub fn sanitize(&mut self) -> bool {
        let mut changed = false;
        for block in [&mut self.red, &mut self.blue, &mut self.green] {
            changed |= block.sanitize();
        }
        if self.cooldown < 0.0 {
            self.cooldown = 0.0;
            changed = true;
        }
        if self.upgrade_offer_size == 0 {
            self.upgrade_offer_size = 1;
            changed = true;
        }
        if self.kills_per_upgrade == 0 {
            self.kills_per_upgrade = 1;
            changed = true;
        }
        changed
    }
}

/// Load the card config, falling back to defaults.
pub fn load_card_config(mut commands: Commands) {
    let mut config = match load_ron::<CardConfig>(CARD_CONFIG_PATH) {
        Ok(config) => {
            info!("Loaded card config from {}", CARD_CONFIG_PATH);
            config
        }
        Err(DataLoadError::FileNotFound(path)) => {
            warn!("Card config not found at {}, using defaults", path);
            CardConfig::default()
        }
        Err(e) => {
            error!("{}; using default card config", e);
            CardConfig::default()
        }
    };

    if config.sanitize() {
        warn!("Card config had out-of-range values; they were clamped");
    }

    commands.insert_resource(config);
}
