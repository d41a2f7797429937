//! Combat systems - damage application and deaths.

use bevy::prelude::*;

use super::components::*;
use crate::core::{GameState, PlayState};
use crate::player::Player;

/// Seconds of invulnerability the player gets after being hit.
const PLAYER_HIT_INVULNERABILITY: f32 = 0.4;

/// System set ordering for combat.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum CombatSet {
    /// Systems that produce damage (card impacts, enemy attacks, poison)
    Damage,
    /// Damage events are applied and deaths detected
    Resolve,
}

/// Configure combat systems.
pub fn setup_combat_systems(app: &mut App) {
    app
        // System ordering
        .configure_sets(
            Update,
            (CombatSet::Damage, CombatSet::Resolve)
                .chain()
                .run_if(in_state(PlayState::Fighting)),
        )

        .add_systems(Update, update_invulnerability.in_set(CombatSet::Damage))
        .add_systems(
            Update,
            (apply_damage, detect_deaths, check_player_death)
                .chain()
                .in_set(CombatSet::Resolve),
        );
}

/// Count down invulnerability windows.
fn update_invulnerability(time: Res<Time>, mut query: Query<&mut HitInvulnerability>) {
    for mut inv in query.iter_mut() {
        if inv.remaining > 0.0 {
            inv.remaining -= time.delta_secs();
        }
    }
}

/// Apply damage events to health.
///
/// Events aimed at entities that no longer exist or already died are dropped.
pub fn apply_damage(
    mut damage_events: EventReader<DamageEvent>,
    mut health_query: Query<(&mut Health, Option<&mut HitInvulnerability>), Without<Dead>>,
) {
    for event in damage_events.read() {
        let Ok((mut health, invulnerability)) = health_query.get_mut(event.target) else {
            continue;
        };

        if let Some(mut inv) = invulnerability {
            if inv.is_active() {
                continue;
            }
            inv.grant(PLAYER_HIT_INVULNERABILITY);
        }

        health.take_damage(event.amount);
    }
}

/// Mark entities whose health ran out and send one death event each.
pub fn detect_deaths(
    mut commands: Commands,
    query: Query<(Entity, &Health), Without<Dead>>,
    mut death_events: EventWriter<DeathEvent>,
) {
    for (entity, health) in query.iter() {
        if health.is_dead() {
            commands.entity(entity).insert(Dead);
            death_events.send(DeathEvent {
                entity,
                killed_by: None,
            });
        }
    }
}

/// Switch to the game over screen when the player dies.
fn check_player_death(
    mut death_events: EventReader<DeathEvent>,
    player_query: Query<Entity, With<Player>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    for event in death_events.read() {
        if player_query.get(event.entity).is_ok() {
            info!("Player died! Transitioning to Game Over...");
            next_state.set(GameState::GameOver);
        }
    }
}
