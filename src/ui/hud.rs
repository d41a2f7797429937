//! In-game HUD - health, card cooldown, wave progress and active upgrades.

use bevy::prelude::*;

use crate::cards::{CardThrower, CardVariant};
use crate::combat::Health;
use crate::core::GameState;
use crate::enemies::{WaveState, WaveTable};
use crate::player::Player;

/// Marker for HUD root entity.
#[derive(Component)]
pub struct HudRoot;

/// Marker for health bar fill.
#[derive(Component)]
pub struct HealthBar;

/// Marker for card cooldown bar fill.
#[derive(Component)]
pub struct CooldownBar;

/// Marker for the wave and kill counter.
#[derive(Component)]
pub struct WaveText;

/// Marker for the active upgrade list.
#[derive(Component)]
pub struct UpgradeListText;

/// Setup HUD systems.
pub fn setup_hud_systems(app: &mut App) {
    app.add_systems(OnEnter(GameState::InGame), spawn_hud)
        .add_systems(OnExit(GameState::InGame), cleanup_hud)
        .add_systems(
            Update,
            (update_health_bar, update_cooldown_bar, update_wave_text, update_upgrade_list)
                .run_if(in_state(GameState::InGame)),
        );
}

/// One line per variant with upgrades, e.g. `Red: Poison, Stun`.
pub fn upgrade_summary(thrower: &CardThrower) -> String {
    let mut lines = Vec::new();
    for variant in CardVariant::ALL {
        let effects: Vec<&str> = thrower
            .active_upgrades()
            .filter(|(v, _)| *v == variant)
            .map(|(_, kind)| kind.name())
            .collect();
        if !effects.is_empty() {
            lines.push(format!("{}: {}", variant.name(), effects.join(", ")));
        }
    }
    if lines.is_empty() {
        "No upgrades yet".to_string()
    } else {
        lines.join("\n")
    }
}

/// Spawn the HUD UI.
fn spawn_hud(mut commands: Commands) {
    // Bars (bottom-left corner)
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::End,
                align_items: AlignItems::Start,
                padding: UiRect::all(Val::Px(20.0)),
                position_type: PositionType::Absolute,
                ..default()
            },
            HudRoot,
        ))
        .with_children(|parent| {
            spawn_bar(parent, "Cards", Color::srgb(0.9, 0.75, 0.3), CooldownBar);
            spawn_bar(parent, "Health", Color::srgb(0.8, 0.2, 0.2), HealthBar);
        });

    // Wave counter and upgrade list (top-right corner)
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Start,
                align_items: AlignItems::End,
                padding: UiRect::all(Val::Px(20.0)),
                position_type: PositionType::Absolute,
                ..default()
            },
            HudRoot,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("Wave 1"),
                TextFont {
                    font_size: 22.0,
                    ..default()
                },
                TextColor(Color::srgb(0.9, 0.9, 0.9)),
                Node {
                    margin: UiRect::bottom(Val::Px(10.0)),
                    ..default()
                },
                WaveText,
            ));
            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(Color::srgb(0.75, 0.75, 0.8)),
                TextLayout::new_with_justify(JustifyText::Right),
                UpgradeListText,
            ));
        });
}

/// Helper to spawn a labelled status bar.
fn spawn_bar<M: Component>(parent: &mut ChildBuilder, label: &str, color: Color, bar_marker: M) {
    parent
        .spawn(Node {
            flex_direction: FlexDirection::Row,
            align_items: AlignItems::Center,
            margin: UiRect::bottom(Val::Px(5.0)),
            ..default()
        })
        .with_children(|bar_parent| {
            bar_parent.spawn((
                Text::new(label),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(Color::srgb(0.8, 0.8, 0.8)),
                Node {
                    width: Val::Px(60.0),
                    ..default()
                },
            ));

            bar_parent
                .spawn((
                    Node {
                        width: Val::Px(150.0),
                        height: Val::Px(12.0),
                        ..default()
                    },
                    BackgroundColor(Color::srgb(0.1, 0.1, 0.1)),
                ))
                .with_children(|bg| {
                    bg.spawn((
                        Node {
                            width: Val::Percent(100.0),
                            height: Val::Percent(100.0),
                            ..default()
                        },
                        BackgroundColor(color),
                        bar_marker,
                    ));
                });
        });
}

/// Update health bar based on player health.
fn update_health_bar(
    player_query: Query<&Health, With<Player>>,
    mut bar_query: Query<&mut Node, With<HealthBar>>,
) {
    let Ok(health) = player_query.get_single() else {
        return;
    };
    let Ok(mut bar) = bar_query.get_single_mut() else {
        return;
    };

    bar.width = Val::Percent(health.percentage().clamp(0.0, 1.0) * 100.0);
}

/// Fill the cooldown bar as the thrower gets ready again.
fn update_cooldown_bar(
    player_query: Query<&CardThrower, With<Player>>,
    mut bar_query: Query<&mut Node, With<CooldownBar>>,
) {
    let Ok(thrower) = player_query.get_single() else {
        return;
    };
    let Ok(mut bar) = bar_query.get_single_mut() else {
        return;
    };

    bar.width = Val::Percent((1.0 - thrower.cooldown_fraction()) * 100.0);
}

fn update_wave_text(
    wave_state: Res<WaveState>,
    table: Res<WaveTable>,
    mut text_query: Query<&mut Text, With<WaveText>>,
) {
    if !wave_state.is_changed() {
        return;
    }
    let Ok(mut text) = text_query.get_single_mut() else {
        return;
    };

    let wave = wave_state.current_wave_number().min(table.waves.len().max(1));
    text.0 = format!("Wave {}/{}   Kills {}", wave, table.waves.len(), wave_state.kills);
}

fn update_upgrade_list(
    player_query: Query<&CardThrower, (With<Player>, Changed<CardThrower>)>,
    mut text_query: Query<&mut Text, With<UpgradeListText>>,
) {
    let Ok(thrower) = player_query.get_single() else {
        return;
    };
    let Ok(mut text) = text_query.get_single_mut() else {
        return;
    };

    text.0 = upgrade_summary(thrower);
}

/// Clean up HUD entities.
fn cleanup_hud(mut commands: Commands, query: Query<Entity, With<HudRoot>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}
