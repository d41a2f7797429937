//! Enemy plugin - registers all enemy systems.

use bevy::prelude::*;

use super::ai;
use super::components::Enemy;
use super::data::{load_enemy_definitions, EnemyRegistry};
use super::status::update_status_tint;
use super::waves::{advance_waves, load_wave_table, reset_waves, WaveState, WaveTable};
use crate::combat::CombatSet;
use crate::core::{GameState, PlayState};

/// Enemy plugin - handles enemy data, waves, AI and death.
pub struct EnemyPlugin;

impl Plugin for EnemyPlugin {
    fn build(&self, app: &mut App) {
        app
            .init_resource::<EnemyRegistry>()
            .init_resource::<WaveTable>()
            .init_resource::<WaveState>()
            // Load definitions once at startup
            .add_systems(Startup, (load_enemy_definitions, load_wave_table))
            .add_systems(OnEnter(GameState::InGame), reset_waves)
            .add_systems(OnExit(GameState::InGame), despawn_enemies)
            // AI produces damage alongside the cards
            .add_systems(
                Update,
                (
                    ai::tick_stuns,
                    ai::ai_detection,
                    ai::ai_chase,
                    ai::ai_attack,
                )
                    .chain()
                    .in_set(CombatSet::Damage),
            )
            // Deaths and waves once damage has been resolved
            .add_systems(
                Update,
                (
                    ai::handle_enemy_death,
                    ai::despawn_dead_enemies,
                    advance_waves,
                    update_status_tint,
                )
                    .chain()
                    .after(CombatSet::Resolve)
                    .run_if(in_state(PlayState::Fighting)),
            );
    }
}

fn despawn_enemies(mut commands: Commands, enemies: Query<Entity, With<Enemy>>) {
    for entity in enemies.iter() {
        commands.entity(entity).despawn_recursive();
    }
}
