//! Top-down player movement, cursor aiming and the follow camera.

use bevy::prelude::*;
use bevy::render::camera::ClearColorConfig;
use bevy::window::PrimaryWindow;
use bevy_rapier3d::prelude::*;

use super::components::*;
use crate::cards::{CardConfig, CardThrower};
use crate::combat::{CombatSet, Health, HitInvulnerability};
use crate::core::{GameState, PlayState, SmoothTransform};

/// Set up player movement systems.
pub fn setup_movement_systems(app: &mut App) {
    app
        .init_resource::<PlayerConfig>()
        .init_resource::<AimPoint>()
        .add_systems(
            Update,
            (update_aim_point, player_movement, face_aim_point)
                .chain()
                .before(CombatSet::Damage)
                .run_if(in_state(PlayState::Fighting)),
        )
        .add_systems(
            Update,
            follow_player.run_if(in_state(GameState::InGame)),
        );
}

/// Direction from the held WASD keys on the ground plane; W moves up the screen.
pub fn wasd_direction(keyboard: &ButtonInput<KeyCode>) -> Vec3 {
    let mut direction = Vec3::ZERO;
    if keyboard.pressed(KeyCode::KeyW) {
        direction.z -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyS) {
        direction.z += 1.0;
    }
    if keyboard.pressed(KeyCode::KeyA) {
        direction.x -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyD) {
        direction.x += 1.0;
    }

    // Normalize to prevent faster diagonal movement
    direction.normalize_or_zero()
}

/// Point where `ray` crosses the horizontal plane at `height`.
pub fn ground_point(ray: Ray3d, height: f32) -> Option<Vec3> {
    let distance = ray.intersect_plane(Vec3::Y * height, InfinitePlane3d::new(Vec3::Y))?;
    Some(ray.get_point(distance))
}

/// Project the cursor onto the plane the player stands on.
fn update_aim_point(
    window_query: Query<&Window, With<PrimaryWindow>>,
    camera_query: Query<(&Camera, &GlobalTransform), With<PlayerCamera>>,
    player_query: Query<&Transform, With<Player>>,
    mut aim: ResMut<AimPoint>,
) {
    aim.0 = None;

    let Ok(window) = window_query.get_single() else {
        return;
    };
    let Some(cursor) = window.cursor_position() else {
        return;
    };
    let Ok((camera, camera_transform)) = camera_query.get_single() else {
        return;
    };
    let Ok(player_transform) = player_query.get_single() else {
        return;
    };
    let Ok(ray) = camera.viewport_to_world(camera_transform, cursor) else {
        return;
    };

    aim.0 = ground_point(ray, player_transform.translation.y);
}

/// Handle WASD movement.
///
/// Uses Rapier's KinematicCharacterController for collision detection.
fn player_movement(
    keyboard: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    config: Res<PlayerConfig>,
    mut player_query: Query<&mut KinematicCharacterController, With<Player>>,
) {
    let Ok(mut controller) = player_query.get_single_mut() else {
        return;
    };

    let direction = wasd_direction(&keyboard);
    if direction == Vec3::ZERO {
        return;
    }

    controller.translation = Some(direction * config.move_speed * time.delta_secs());
}

/// Turn the player body toward the cursor.
fn face_aim_point(aim: Res<AimPoint>, mut player_query: Query<&mut Transform, With<Player>>) {
    let Some(target) = aim.0 else {
        return;
    };
    let Ok(mut transform) = player_query.get_single_mut() else {
        return;
    };

    let flat_target = target.with_y(transform.translation.y);
    if flat_target.distance_squared(transform.translation) > 1e-4 {
        transform.look_at(flat_target, Vec3::Y);
    }
}

/// Keep the camera's tween target above the player.
fn follow_player(
    player_query: Query<&Transform, With<Player>>,
    mut camera_query: Query<(&PlayerCamera, &mut SmoothTransform), Without<Player>>,
) {
    let Ok(player_transform) = player_query.get_single() else {
        return;
    };
    for (camera, mut smooth) in camera_query.iter_mut() {
        smooth.target_translation = Some(player_transform.translation + camera.offset);
    }
}

/// Spawn the player entity.
pub fn spawn_player(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    position: Vec3,
    player_config: &PlayerConfig,
    card_config: &CardConfig,
) -> Entity {
    commands
        .spawn((
            Name::new("Player"),
            Player,
            Health::new(player_config.max_health),
            HitInvulnerability::default(),
            CardThrower::from_config(card_config),
            // Visuals
            Mesh3d(meshes.add(Capsule3d::new(
                PLAYER_CAPSULE_RADIUS,
                PLAYER_CAPSULE_HALF_HEIGHT * 2.0,
            ))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: Color::srgb(0.85, 0.8, 0.65),
                ..default()
            })),
            Transform::from_translation(position.with_y(player_config.body_height)),
            // Rapier physics components
            RigidBody::KinematicPositionBased,
            Collider::capsule_y(PLAYER_CAPSULE_HALF_HEIGHT, PLAYER_CAPSULE_RADIUS),
            KinematicCharacterController {
                offset: CharacterLength::Absolute(0.01),
                ..default()
            },
        ))
        .id()
}

/// Spawn the top-down camera looking at `focus`.
pub fn spawn_player_camera(commands: &mut Commands, focus: Vec3) -> Entity {
    let camera = PlayerCamera::default();
    let position = focus + camera.offset;
    commands
        .spawn((
            Name::new("Player Camera"),
            Camera3d::default(),
            Camera {
                clear_color: ClearColorConfig::Custom(Color::srgb(0.05, 0.04, 0.07)),
                ..default()
            },
            Transform::from_translation(position).looking_at(focus, Vec3::Y),
            SmoothTransform::new(6.0, 6.0),
            camera,
        ))
        .id()
}
