//! Wave table loading and wave progression.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use rand::Rng;
use serde::Deserialize;

use super::components::*;
use super::data::{EnemyDefinition, EnemyRegistry};
use crate::cards::CardThrower;
use crate::combat::{Dead, Health};
use crate::core::{load_ron, DataLoadError, GameState};
use crate::player::Player;
use crate::world::ArenaConfig;

pub const WAVE_TABLE_PATH: &str = "assets/data/waves.ron";

/// Height of an enemy's body centre at scale 1.
const ENEMY_BODY_HEIGHT: f32 = 0.8;

/// Closest an enemy may spawn to an arena wall.
const WALL_MARGIN: f32 = 1.0;

/// A number of enemies of one type.
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct WaveGroup {
    pub enemy_type: String,
    pub count: u32,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct WaveDefinition {
    pub enemies: Vec<WaveGroup>,
}

impl WaveDefinition {
    pub fn enemy_count(&self) -> u32 {
        self.enemies.iter().map(|group| group.count).sum()
    }
}

/// Every wave of a run, in order.
#[derive(Resource, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct WaveTable {
    pub waves: Vec<WaveDefinition>,
    /// Added to the player's card damage modifier after each cleared wave
    pub damage_bonus_per_wave: f32,
    /// Distance from the player at which a wave appears
    pub spawn_radius: f32,
    /// Seconds between clearing a wave and the next one arriving
    pub intermission: f32,
}

impl Default for WaveTable {
    fn default() -> Self {
        let group = |enemy_type: &str, count| WaveGroup {
            enemy_type: enemy_type.to_string(),
            count,
        };
        Self {
            waves: vec![
                WaveDefinition {
                    enemies: vec![group("grunt", 4)],
                },
                WaveDefinition {
                    enemies: vec![group("grunt", 6), group("brute", 1)],
                },
            ],
            damage_bonus_per_wave: 0.15,
            spawn_radius: 12.0,
            intermission: 2.0,
        }
    }
}

/// What the wave tracker wants done this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaveStep {
    Waiting,
    /// The wave with this index was just cleared
    Cleared(usize),
    /// Spawn the wave with this index
    Spawn(usize),
    /// The last wave was cleared
    Victory,
}

/// Progress through the wave table.
#[derive(Resource, Default, Debug)]
pub struct WaveState {
    /// Index of the next wave to spawn
    pub next_wave: usize,
    pub in_progress: bool,
    pub finished: bool,
    pub kills: u32,
    intermission_remaining: f32,
}

impl WaveState {
    /// 1-based number of the wave being fought or about to start, for display.
    pub fn current_wave_number(&self) -> usize {
        if self.in_progress {
            self.next_wave
        } else {
            self.next_wave + 1
        }
    }

    /// Advance by `dt`. `arena_clear` is true when no living enemy is left.
    pub fn update(&mut self, dt: f32, arena_clear: bool, table: &WaveTable) -> WaveStep {
        if self.finished {
            return WaveStep::Waiting;
        }

        if self.in_progress {
            if !arena_clear {
                return WaveStep::Waiting;
            }
            self.in_progress = false;
            if self.next_wave >= table.waves.len() {
                self.finished = true;
                return WaveStep::Victory;
            }
            self.intermission_remaining = table.intermission;
            return WaveStep::Cleared(self.next_wave - 1);
        }

        if self.intermission_remaining > 0.0 {
            self.intermission_remaining -= dt;
            return WaveStep::Waiting;
        }

        if self.next_wave >= table.waves.len() {
            self.finished = true;
            return WaveStep::Victory;
        }

        let index = self.next_wave;
        self.next_wave += 1;
        self.in_progress = true;
        WaveStep::Spawn(index)
    }
}

/// Load the wave table, falling back to defaults.
pub fn load_wave_table(mut commands: Commands) {
    let table = match load_ron::<WaveTable>(WAVE_TABLE_PATH) {
        Ok(table) if table.waves.is_empty() => {
            warn!("Wave table at {} has no waves, using defaults", WAVE_TABLE_PATH);
            WaveTable::default()
        }
        Ok(table) => {
            info!("Loaded {} waves from {}", table.waves.len(), WAVE_TABLE_PATH);
            table
        }
        Err(DataLoadError::FileNotFound(path)) => {
            warn!("Wave table not found at {}, using defaults", path);
            WaveTable::default()
        }
        Err(e) => {
            error!("{}; using default wave table", e);
            WaveTable::default()
        }
    };

    commands.insert_resource(table);
}

pub fn reset_waves(mut wave_state: ResMut<WaveState>) {
    *wave_state = WaveState::default();
}

/// Spawn waves when the arena is clear and reward cleared waves.
#[allow(clippy::too_many_arguments)]
pub fn advance_waves(
    mut commands: Commands,
    time: Res<Time>,
    table: Res<WaveTable>,
    registry: Res<EnemyRegistry>,
    mut wave_state: ResMut<WaveState>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    arena: Option<Res<ArenaConfig>>,
    living: Query<(), (With<Enemy>, Without<Dead>)>,
    mut player_query: Query<(&Transform, &mut CardThrower), With<Player>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    let Ok((player_transform, mut thrower)) = player_query.get_single_mut() else {
        return;
    };

    match wave_state.update(time.delta_secs(), living.is_empty(), &table) {
        WaveStep::Waiting => {}
        WaveStep::Cleared(index) => {
            thrower.increase_damage(table.damage_bonus_per_wave);
            info!(
                "Wave {} cleared! Card damage is now x{:.2}",
                index + 1,
                thrower.damage_modifier()
            );
        }
        WaveStep::Spawn(index) => {
            let wave = &table.waves[index];
            info!("Wave {} begins: {} enemies", index + 1, wave.enemy_count());
            let center = player_transform.translation.with_y(0.0);
            let bounds = arena.map(|arena| (arena.half_extent - WALL_MARGIN).max(0.0));
            spawn_wave(
                &mut commands,
                &mut meshes,
                &mut materials,
                &registry,
                wave,
                center,
                table.spawn_radius,
                bounds,
            );
        }
        WaveStep::Victory => {
            info!("All waves cleared! Transitioning to Victory...");
            next_state.set(GameState::Victory);
        }
    }
}

/// Evenly spaced points on a ring, rotated by a random phase.
pub fn ring_positions<R: Rng + ?Sized>(center: Vec3, radius: f32, count: usize, rng: &mut R) -> Vec<Vec3> {
    if count == 0 {
        return Vec::new();
    }
    let phase = rng.gen_range(0.0..std::f32::consts::TAU);
    let step = std::f32::consts::TAU / count as f32;
    (0..count)
        .map(|i| {
            let angle = phase + step * i as f32;
            center + Vec3::new(angle.cos(), 0.0, angle.sin()) * radius
        })
        .collect()
}

/// Keep a ground position within `limit` of the origin on both axes.
pub fn clamp_to_square(position: Vec3, limit: f32) -> Vec3 {
    Vec3::new(
        position.x.clamp(-limit, limit),
        position.y,
        position.z.clamp(-limit, limit),
    )
}

#[allow(clippy::too_many_arguments)]
fn spawn_wave(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    registry: &EnemyRegistry,
    wave: &WaveDefinition,
    center: Vec3,
    radius: f32,
    bounds: Option<f32>,
) {
    let mut rng = rand::thread_rng();
    let mut roster = Vec::new();
    for group in &wave.enemies {
        let Some(definition) = registry.get(&group.enemy_type) else {
            warn!("Unknown enemy type '{}' in wave table", group.enemy_type);
            continue;
        };
        for _ in 0..group.count {
            roster.push((group.enemy_type.as_str(), definition));
        }
    }

    let positions = ring_positions(center, radius, roster.len(), &mut rng);
    for ((enemy_type, definition), position) in roster.into_iter().zip(positions) {
        let position = match bounds {
            Some(limit) => clamp_to_square(position, limit),
            None => position,
        };
        spawn_enemy(commands, meshes, materials, enemy_type, definition, position);
    }
}

/// Spawn one enemy standing on the floor at `position`.
pub fn spawn_enemy(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    enemy_type: &str,
    definition: &EnemyDefinition,
    position: Vec3,
) -> Entity {
    let stats = definition.to_stats();
    let base_color = definition.body_color();
    let scale = definition.scale.max(0.1);

    commands
        .spawn((
            Name::new(definition.name.clone()),
            Enemy,
            EnemyType(enemy_type.to_string()),
            AiState::default(),
            AttackTimer::new(stats.attack_cooldown),
            Health::new(stats.max_health),
            stats,
            EnemyLook { base_color, scale },
            Mesh3d(meshes.add(Capsule3d::new(0.35, 0.9))),
            // Own material so status tints do not leak to other enemies
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color,
                ..default()
            })),
            Transform::from_translation(position.with_y(ENEMY_BODY_HEIGHT * scale))
                .with_scale(Vec3::splat(scale)),
            RigidBody::KinematicPositionBased,
            Collider::capsule_y(0.45, 0.35),
        ))
        .id()
}
