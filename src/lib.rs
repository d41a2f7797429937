//! Card Slinger - a top-down arena game about throwing upgradeable cards.
//!
//! # Architecture
//!
//! The game is organized into plugins, each handling a specific aspect:
//!
//! - **Core**: Game states, global events, data loading, tweening
//! - **Audio**: Card sound effects
//! - **Player**: Top-down movement, cursor aiming, follow camera
//! - **Combat**: Health, damage application, deaths
//! - **Cards**: Card throwing, flight, impact effects, upgrades
//! - **Enemies**: Enemy data, AI, waves
//! - **World**: The arena
//! - **UI**: Menus, HUD, upgrade screen

pub mod audio;
pub mod cards;
pub mod combat;
pub mod core;
pub mod enemies;
pub mod player;
pub mod ui;
pub mod world;

use bevy::prelude::*;

/// Main game plugin that adds all sub-plugins.
pub struct CardSlingerPlugin;

impl Plugin for CardSlingerPlugin {
    fn build(&self, app: &mut App) {
        app
            // Core systems (must be first)
            .add_plugins(core::CorePlugin)

            // Sound effects
            .add_plugins(audio::AudioEffectsPlugin)

            // Player systems
            .add_plugins(player::PlayerPlugin)

            // Combat systems
            .add_plugins(combat::CombatPlugin)

            // Card weapon
            .add_plugins(cards::CardsPlugin)

            // Enemy systems
            .add_plugins(enemies::EnemyPlugin)

            // World systems
            .add_plugins(world::WorldPlugin)

            // UI systems
            .add_plugins(ui::UiPlugin);
    }
}
