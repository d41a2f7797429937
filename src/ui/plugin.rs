//! UI plugin - menus, HUD, and interface elements.

use bevy::prelude::*;

use super::{hud, upgrade_screen};
use crate::core::{GameState, PlayState};
use crate::enemies::WaveState;

/// UI plugin - handles all user interface.
pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        hud::setup_hud_systems(app);
        upgrade_screen::setup_upgrade_screen_systems(app);

        app
            // Main menu
            .add_systems(OnEnter(GameState::MainMenu), setup_main_menu)
            .add_systems(OnExit(GameState::MainMenu), cleanup_screen::<MainMenuUi>)

            // Pause menu
            .add_systems(OnEnter(PlayState::Paused), setup_pause_menu)
            .add_systems(OnExit(PlayState::Paused), cleanup_screen::<PauseMenuUi>)

            // Game over
            .add_systems(OnEnter(GameState::GameOver), setup_game_over)
            .add_systems(OnExit(GameState::GameOver), cleanup_screen::<GameOverUi>)

            // Victory
            .add_systems(OnEnter(GameState::Victory), setup_victory)
            .add_systems(OnExit(GameState::Victory), cleanup_screen::<VictoryUi>)

            .add_systems(Update, menu_button_input);
    }
}

const BUTTON_IDLE: Color = Color::srgb(0.15, 0.15, 0.2);
const BUTTON_HOVERED: Color = Color::srgb(0.25, 0.25, 0.3);
const BUTTON_PRESSED: Color = Color::srgb(0.3, 0.3, 0.35);

/// Marker for main menu UI entities.
#[derive(Component, Clone)]
struct MainMenuUi;

/// Marker for pause menu UI entities.
#[derive(Component, Clone)]
struct PauseMenuUi;

/// Marker for game over UI entities.
#[derive(Component, Clone)]
struct GameOverUi;

/// Marker for victory UI entities.
#[derive(Component, Clone)]
struct VictoryUi;

/// What a menu button does.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
enum MenuButton {
    NewGame,
    Quit,
    Resume,
    MainMenu,
}

/// Spawn a full-screen menu with a title, an optional subtitle and buttons.
///
/// Screens outside the run bring their own 2D camera, tagged with the same marker
/// so it is cleaned up with the screen.
fn spawn_menu_screen<M: Component + Clone>(
    commands: &mut Commands,
    marker: M,
    with_camera: bool,
    background: Color,
    title: (&str, f32, Color),
    subtitle: Option<String>,
    buttons: &[(&str, MenuButton)],
) {
    if with_camera {
        commands.spawn((Camera2d, marker.clone()));
    }

    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            BackgroundColor(background),
            marker,
        ))
        .with_children(|parent| {
            let (text, size, color) = title;
            parent.spawn((
                Text::new(text),
                TextFont {
                    font_size: size,
                    ..default()
                },
                TextColor(color),
                Node {
                    margin: UiRect::bottom(Val::Px(30.0)),
                    ..default()
                },
            ));

            if let Some(subtitle) = subtitle {
                parent.spawn((
                    Text::new(subtitle),
                    TextFont {
                        font_size: 24.0,
                        ..default()
                    },
                    TextColor(Color::srgb(0.55, 0.55, 0.6)),
                    Node {
                        margin: UiRect::bottom(Val::Px(40.0)),
                        ..default()
                    },
                ));
            }

            for (label, button) in buttons {
                spawn_menu_button(parent, label, *button);
            }
        });
}

/// Helper to spawn a menu button.
fn spawn_menu_button(parent: &mut ChildBuilder, text: &str, button: MenuButton) {
    parent
        .spawn((
            Button,
            Node {
                width: Val::Px(220.0),
                height: Val::Px(50.0),
                margin: UiRect::all(Val::Px(10.0)),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            BackgroundColor(BUTTON_IDLE),
            button,
        ))
        .with_children(|button| {
            button.spawn((
                Text::new(text),
                TextFont {
                    font_size: 24.0,
                    ..default()
                },
                TextColor(Color::srgb(0.8, 0.8, 0.85)),
            ));
        });
}

fn setup_main_menu(mut commands: Commands) {
    spawn_menu_screen(
        &mut commands,
        MainMenuUi,
        true,
        Color::srgb(0.05, 0.05, 0.08),
        ("CARD SLINGER", 80.0, Color::srgb(0.9, 0.75, 0.4)),
        Some("WASD to move, hold left mouse to throw".to_string()),
        &[("New Game", MenuButton::NewGame), ("Quit", MenuButton::Quit)],
    );
}

fn setup_pause_menu(mut commands: Commands) {
    spawn_menu_screen(
        &mut commands,
        PauseMenuUi,
        false,
        Color::srgba(0.0, 0.0, 0.0, 0.7),
        ("PAUSED", 48.0, Color::srgb(0.8, 0.8, 0.85)),
        None,
        &[("Resume", MenuButton::Resume), ("Main Menu", MenuButton::MainMenu)],
    );
}

fn setup_game_over(mut commands: Commands, wave_state: Res<WaveState>) {
    spawn_menu_screen(
        &mut commands,
        GameOverUi,
        true,
        Color::srgba(0.1, 0.0, 0.0, 0.9),
        ("YOU DIED", 72.0, Color::srgb(0.8, 0.2, 0.2)),
        Some(format!(
            "Fell in wave {} after {} kills",
            wave_state.current_wave_number(),
            wave_state.kills
        )),
        &[("Retry", MenuButton::NewGame), ("Main Menu", MenuButton::MainMenu)],
    );
}

fn setup_victory(mut commands: Commands, wave_state: Res<WaveState>) {
    spawn_menu_screen(
        &mut commands,
        VictoryUi,
        true,
        Color::srgba(0.02, 0.06, 0.03, 0.95),
        ("ARENA CLEARED", 72.0, Color::srgb(0.4, 0.85, 0.45)),
        Some(format!("{} enemies defeated", wave_state.kills)),
        &[("Play Again", MenuButton::NewGame), ("Main Menu", MenuButton::MainMenu)],
    );
}

/// Handle button interactions on every menu screen.
fn menu_button_input(
    mut interaction_query: Query<
        (&Interaction, &MenuButton, &mut BackgroundColor),
        (Changed<Interaction>, With<Button>),
    >,
    mut next_game_state: ResMut<NextState<GameState>>,
    mut next_play_state: ResMut<NextState<PlayState>>,
    mut exit: EventWriter<AppExit>,
) {
    for (interaction, button, mut bg_color) in interaction_query.iter_mut() {
        match interaction {
            Interaction::Pressed => {
                *bg_color = BUTTON_PRESSED.into();
                match button {
                    MenuButton::NewGame => next_game_state.set(GameState::InGame),
                    MenuButton::Resume => next_play_state.set(PlayState::Fighting),
                    MenuButton::MainMenu => next_game_state.set(GameState::MainMenu),
                    MenuButton::Quit => {
                        exit.send(AppExit::Success);
                    }
                }
            }
            Interaction::Hovered => {
                *bg_color = BUTTON_HOVERED.into();
            }
            Interaction::None => {
                *bg_color = BUTTON_IDLE.into();
            }
        }
    }
}

/// Despawn everything tagged with `M`.
fn cleanup_screen<M: Component>(mut commands: Commands, query: Query<Entity, With<M>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}
