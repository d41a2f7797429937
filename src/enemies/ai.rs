//! Enemy AI behavior systems.
//!
//! Stunned enemies are left out of every query here except `tick_stuns`, so a
//! stun freezes movement and attacks until it runs out.

use bevy::prelude::*;
use bevy_rapier3d::prelude::Collider;

use super::components::{AiState, AttackTimer, DeathTimer, Enemy, EnemyLook, EnemyStats, EnemyType};
use super::waves::WaveState;
use crate::cards::{Poisoned, Stunned};
use crate::combat::Dead;
use crate::core::DamageEvent;
use crate::player::Player;

/// Distance on the ground plane.
fn horizontal_distance(a: Vec3, b: Vec3) -> f32 {
    (a - b).with_y(0.0).length()
}

/// Face `target` without tilting.
fn face(transform: &mut Transform, target: Vec3) {
    let look_target = target.with_y(transform.translation.y);
    if look_target.distance_squared(transform.translation) > 1e-4 {
        transform.look_at(look_target, Vec3::Y);
    }
}

/// State to resume in when a stun ends: attack if the player stands in reach,
/// otherwise carry on with what the enemy was doing.
pub fn state_after_stun(current: AiState, distance_to_player: f32, stats: &EnemyStats) -> AiState {
    if current == AiState::Dying {
        return current;
    }
    if distance_to_player <= stats.attack_range {
        AiState::Attacking
    } else {
        current
    }
}

/// Detect player and transition from Idle to Chasing.
pub fn ai_detection(
    player_query: Query<&Transform, (With<Player>, Without<Enemy>)>,
    mut enemy_query: Query<
        (&Transform, &EnemyStats, &mut AiState),
        (With<Enemy>, Without<Player>, Without<Stunned>, Without<Dead>),
    >,
) {
    let Ok(player_transform) = player_query.get_single() else {
        return;
    };

    for (enemy_transform, stats, mut ai_state) in enemy_query.iter_mut() {
        // Only check detection when idle
        if *ai_state != AiState::Idle {
            continue;
        }

        let distance = horizontal_distance(player_transform.translation, enemy_transform.translation);
        if distance <= stats.detection_range {
            *ai_state = AiState::Chasing;
        }
    }
}

/// Chase player and transition to Attacking when in range.
pub fn ai_chase(
    time: Res<Time>,
    player_query: Query<&Transform, (With<Player>, Without<Enemy>)>,
    mut enemy_query: Query<
        (&mut Transform, &EnemyStats, &mut AiState),
        (With<Enemy>, Without<Player>, Without<Stunned>, Without<Dead>),
    >,
) {
    let Ok(player_transform) = player_query.get_single() else {
        return;
    };
    let player_pos = player_transform.translation;

    for (mut enemy_transform, stats, mut ai_state) in enemy_query.iter_mut() {
        // Only move when chasing
        if *ai_state != AiState::Chasing {
            continue;
        }

        let direction = (player_pos - enemy_transform.translation).with_y(0.0);
        let distance = direction.length();

        if distance <= stats.attack_range {
            *ai_state = AiState::Attacking;
            continue;
        }

        // Player escaped detection range (with some buffer)
        if distance > stats.detection_range * 1.5 {
            *ai_state = AiState::Idle;
            continue;
        }

        let step = (stats.move_speed * time.delta_secs()).min(distance - stats.attack_range * 0.9);
        if step > 0.0 {
            enemy_transform.translation += direction / distance * step;
        }
        face(&mut enemy_transform, player_pos);
    }
}

/// Hit the player whenever the attack timer runs out while in range.
pub fn ai_attack(
    time: Res<Time>,
    player_query: Query<(Entity, &Transform), (With<Player>, Without<Enemy>)>,
    mut enemy_query: Query<
        (Entity, &mut Transform, &EnemyStats, &mut AiState, &mut AttackTimer),
        (With<Enemy>, Without<Player>, Without<Stunned>, Without<Dead>),
    >,
    mut damage_events: EventWriter<DamageEvent>,
) {
    let Ok((player, player_transform)) = player_query.get_single() else {
        return;
    };
    let player_pos = player_transform.translation;

    for (entity, mut enemy_transform, stats, mut ai_state, mut attack_timer) in enemy_query.iter_mut() {
        // Only process when attacking
        if *ai_state != AiState::Attacking {
            continue;
        }

        face(&mut enemy_transform, player_pos);

        attack_timer.0.tick(time.delta());
        if !attack_timer.0.finished() {
            continue;
        }

        attack_timer
            .0
            .set_duration(std::time::Duration::from_secs_f32(stats.attack_cooldown.max(0.05)));
        attack_timer.0.reset();

        if horizontal_distance(player_pos, enemy_transform.translation) > stats.attack_range {
            // Player moved out of reach, go back to chasing
            *ai_state = AiState::Chasing;
            continue;
        }

        damage_events.send(DamageEvent {
            target: player,
            source: Some(entity),
            amount: stats.damage,
        });
    }
}

/// Count down stuns and pick the state to resume in when they end.
pub fn tick_stuns(
    mut commands: Commands,
    time: Res<Time>,
    player_query: Query<&Transform, (With<Player>, Without<Enemy>)>,
    mut enemy_query: Query<
        (Entity, &Transform, &EnemyStats, &mut AiState, &mut Stunned),
        (With<Enemy>, Without<Player>, Without<Dead>),
    >,
) {
    let player_pos = player_query.get_single().ok().map(|t| t.translation);

    for (entity, transform, stats, mut ai_state, mut stunned) in enemy_query.iter_mut() {
        stunned.timer.tick(time.delta());
        if !stunned.timer.finished() {
            continue;
        }

        commands.entity(entity).remove::<Stunned>();
        if let Some(player_pos) = player_pos {
            let distance = horizontal_distance(player_pos, transform.translation);
            *ai_state = state_after_stun(*ai_state, distance, stats);
        }
    }
}

/// Start the death shrink for enemies that just died.
pub fn handle_enemy_death(
    mut commands: Commands,
    mut wave_state: ResMut<WaveState>,
    mut enemy_query: Query<
        (Entity, &EnemyType, &mut AiState),
        (With<Enemy>, With<Dead>, Without<DeathTimer>),
    >,
) {
    for (entity, enemy_type, mut ai_state) in enemy_query.iter_mut() {
        *ai_state = AiState::Dying;
        wave_state.kills += 1;
        debug!("{} {:?} died ({} kills)", enemy_type.0, entity, wave_state.kills);
        commands
            .entity(entity)
            .insert(DeathTimer::default())
            .remove::<(Collider, Stunned, Poisoned)>();
    }
}

/// Shrink dying enemies and despawn them when the timer runs out.
pub fn despawn_dead_enemies(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut DeathTimer, &mut Transform, Option<&EnemyLook>)>,
) {
    for (entity, mut death_timer, mut transform, look) in query.iter_mut() {
        death_timer.0.tick(time.delta());

        if death_timer.0.finished() {
            commands.entity(entity).despawn_recursive();
            continue;
        }

        let base_scale = look.map_or(1.0, |look| look.scale);
        transform.scale = Vec3::splat(base_scale * (1.0 - death_timer.0.fraction()).max(0.05));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::time::TimeUpdateStrategy;
    use std::time::Duration;

    fn stepped_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(100)));
        app.add_event::<DamageEvent>();
        app
    }

    fn spawn_enemy(app: &mut App, position: Vec3, state: AiState) -> Entity {
        app.world_mut()
            .spawn((
                Enemy,
                EnemyStats::default(),
                state,
                AttackTimer::new(0.2),
                Transform::from_translation(position),
            ))
            .id()
    }

    fn damage_events(app: &App) -> usize {
        let events = app.world().resource::<Events<DamageEvent>>();
        events.get_cursor().read(events).count()
    }

    #[test]
    fn stun_end_in_reach_switches_to_attacking() {
        let stats = EnemyStats::default();
        assert_eq!(state_after_stun(AiState::Chasing, 0.5, &stats), AiState::Attacking);
        assert_eq!(state_after_stun(AiState::Chasing, 10.0, &stats), AiState::Chasing);
        assert_eq!(state_after_stun(AiState::Idle, 10.0, &stats), AiState::Idle);
        assert_eq!(state_after_stun(AiState::Dying, 0.0, &stats), AiState::Dying);
    }

    #[test]
    fn expired_stun_is_removed_and_state_reevaluated() {
        let mut app = stepped_app();
        app.add_systems(Update, tick_stuns);
        app.world_mut().spawn((Player, Transform::default()));
        let enemy = spawn_enemy(&mut app, Vec3::new(1.0, 0.0, 0.0), AiState::Chasing);
        app.world_mut().entity_mut(enemy).insert(Stunned::new(0.3));

        for _ in 0..8 {
            app.update();
        }

        assert!(app.world().get::<Stunned>(enemy).is_none());
        assert_eq!(app.world().get::<AiState>(enemy), Some(&AiState::Attacking));
    }

    #[test]
    fn stunned_enemy_neither_moves_nor_attacks() {
        let mut app = stepped_app();
        app.add_systems(Update, (ai_chase, ai_attack));
        app.world_mut().spawn((Player, Transform::default()));
        let chaser = spawn_enemy(&mut app, Vec3::new(10.0, 0.0, 0.0), AiState::Chasing);
        let attacker = spawn_enemy(&mut app, Vec3::new(1.0, 0.0, 0.0), AiState::Attacking);
        for entity in [chaser, attacker] {
            app.world_mut().entity_mut(entity).insert(Stunned::new(100.0));
        }

        for _ in 0..10 {
            app.update();
        }

        let chaser_pos = app.world().get::<Transform>(chaser).map(|t| t.translation);
        assert_eq!(chaser_pos, Some(Vec3::new(10.0, 0.0, 0.0)));
        assert_eq!(damage_events(&app), 0);
    }

    #[test]
    fn attacking_enemy_damages_player_in_reach() {
        let mut app = stepped_app();
        app.add_systems(Update, ai_attack);
        let player = app.world_mut().spawn((Player, Transform::default())).id();
        spawn_enemy(&mut app, Vec3::new(1.0, 0.0, 0.0), AiState::Attacking);

        // Collect after every frame; events only live for two updates
        let mut hits = Vec::new();
        let mut cursor = app.world().resource::<Events<DamageEvent>>().get_cursor();
        for _ in 0..5 {
            app.update();
            let events = app.world().resource::<Events<DamageEvent>>();
            hits.extend(cursor.read(events).copied());
        }

        assert_eq!(hits.len(), 1, "cooldown allows a single hit in half a second");
        assert!(hits.iter().all(|hit| hit.target == player));
        assert!(hits.iter().all(|hit| hit.amount == EnemyStats::default().damage));
    }

    #[test]
    fn chasing_enemy_closes_distance() {
        let mut app = stepped_app();
        app.add_systems(Update, ai_chase);
        app.world_mut().spawn((Player, Transform::default()));
        let enemy = spawn_enemy(&mut app, Vec3::new(10.0, 0.0, 0.0), AiState::Chasing);

        for _ in 0..5 {
            app.update();
        }

        let x = app
            .world()
            .get::<Transform>(enemy)
            .map(|t| t.translation.x)
            .expect("enemy exists");
        assert!(x < 10.0);
    }
}
