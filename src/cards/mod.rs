//! Cards module - the card projectile weapon, its effects and upgrades.
//!
//! The pure rules live in `stats`, `card`, `effects`, `thrower` and `upgrades`
//! and never touch the ECS. `systems` wires them to entities and events.

pub mod card;
mod components;
pub mod config;
pub mod effects;
mod plugin;
pub mod stats;
mod systems;
pub mod thrower;
pub mod upgrades;
pub mod variant;

pub use card::{Card, CardPhase, FlightStep};
pub use components::*;
pub use config::CardConfig;
pub use plugin::CardsPlugin;
pub use systems::{spawn_card, ImpactTargets};
pub use thrower::CardThrower;
pub use upgrades::{UpgradeCatalog, UpgradeEntry, UpgradeType};
pub use variant::{CardVariant, EffectKind};
