//! World plugin - arena setup and teardown.

use bevy::prelude::*;

use crate::cards::CardConfig;
use crate::core::GameState;
use crate::player::{spawn_player, spawn_player_camera, Player, PlayerCamera, PlayerConfig};

use super::arena::{spawn_arena, ArenaConfig, ArenaGeometry};

/// World plugin - handles the arena and the player's place in it.
pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ArenaConfig>()
            .insert_resource(AmbientLight {
                color: Color::srgb(0.7, 0.7, 0.8),
                brightness: 300.0,
            })
            .add_systems(OnEnter(GameState::InGame), setup_arena)
            .add_systems(OnExit(GameState::InGame), cleanup_arena);
    }
}

/// Build the arena and put the player in the middle.
pub fn setup_arena(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    arena_config: Res<ArenaConfig>,
    player_config: Res<PlayerConfig>,
    card_config: Res<CardConfig>,
) {
    info!("Building arena ({0}x{0})", arena_config.half_extent * 2.0);

    spawn_arena(&mut commands, &mut meshes, &mut materials, &arena_config);

    let player = spawn_player(
        &mut commands,
        &mut meshes,
        &mut materials,
        Vec3::ZERO,
        &player_config,
        &card_config,
    );
    debug!("Spawned player {:?}", player);
    spawn_player_camera(&mut commands, Vec3::new(0.0, player_config.body_height, 0.0));
}

/// Clean up arena entities when leaving InGame state.
fn cleanup_arena(
    mut commands: Commands,
    arena_query: Query<Entity, With<ArenaGeometry>>,
    player_query: Query<Entity, Or<(With<Player>, With<PlayerCamera>)>>,
) {
    for entity in arena_query.iter().chain(player_query.iter()) {
        commands.entity(entity).despawn_recursive();
    }
}
