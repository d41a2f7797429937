//! The walled arena the run takes place in.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

/// Marker for arena entities, despawned when the run ends.
#[derive(Component)]
pub struct ArenaGeometry;

/// Size and look of the arena.
#[derive(Resource, Debug, Clone)]
pub struct ArenaConfig {
    /// Distance from the centre to the inner face of each wall
    pub half_extent: f32,
    pub wall_height: f32,
    pub wall_thickness: f32,
    pub floor_color: Color,
    pub wall_color: Color,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            half_extent: 20.0,
            wall_height: 1.5,
            wall_thickness: 1.0,
            floor_color: Color::srgb(0.16, 0.15, 0.18),
            wall_color: Color::srgb(0.3, 0.27, 0.32),
        }
    }
}

/// Half thickness of the floor slab.
const FLOOR_HALF_THICKNESS: f32 = 0.05;

/// Centre and half-size of the floor collider. Its top face sits at y = 0.
pub fn floor_slab(config: &ArenaConfig) -> (Vec3, Vec3) {
    (
        Vec3::new(0.0, -FLOOR_HALF_THICKNESS, 0.0),
        Vec3::new(config.half_extent, FLOOR_HALF_THICKNESS, config.half_extent),
    )
}

/// Centre and half-size of each of the four walls.
pub fn wall_layout(config: &ArenaConfig) -> [(Vec3, Vec3); 4] {
    let half_thickness = config.wall_thickness * 0.5;
    let half_height = config.wall_height * 0.5;
    let offset = config.half_extent + half_thickness;
    let span = config.half_extent + config.wall_thickness;

    [
        (Vec3::new(0.0, half_height, -offset), Vec3::new(span, half_height, half_thickness)),
        (Vec3::new(0.0, half_height, offset), Vec3::new(span, half_height, half_thickness)),
        (Vec3::new(-offset, half_height, 0.0), Vec3::new(half_thickness, half_height, span)),
        (Vec3::new(offset, half_height, 0.0), Vec3::new(half_thickness, half_height, span)),
    ]
}

/// Spawn floor, walls and lighting.
pub fn spawn_arena(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    config: &ArenaConfig,
) {
    let floor_size = config.half_extent * 2.0;
    commands.spawn((
        Name::new("Arena Floor"),
        Mesh3d(meshes.add(Plane3d::default().mesh().size(floor_size, floor_size))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: config.floor_color,
            perceptual_roughness: 0.9,
            ..default()
        })),
        Transform::default(),
        ArenaGeometry,
    ));

    let (floor_center, floor_half) = floor_slab(config);
    commands.spawn((
        Name::new("Arena Floor Collider"),
        Transform::from_translation(floor_center),
        RigidBody::Fixed,
        Collider::cuboid(floor_half.x, floor_half.y, floor_half.z),
        ArenaGeometry,
    ));

    let wall_material = materials.add(StandardMaterial {
        base_color: config.wall_color,
        ..default()
    });
    for (center, half_size) in wall_layout(config) {
        commands.spawn((
            Name::new("Arena Wall"),
            Mesh3d(meshes.add(Cuboid::from_size(half_size * 2.0))),
            MeshMaterial3d(wall_material.clone()),
            Transform::from_translation(center),
            RigidBody::Fixed,
            Collider::cuboid(half_size.x, half_size.y, half_size.z),
            ArenaGeometry,
        ));
    }

    commands.spawn((
        Name::new("Arena Sun"),
        DirectionalLight {
            illuminance: 6000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(8.0, 20.0, 6.0).looking_at(Vec3::ZERO, Vec3::Y),
        ArenaGeometry,
    ));
}
