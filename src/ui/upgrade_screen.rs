//! Upgrade offer overlay shown every few kills.

use bevy::prelude::*;

use crate::cards::{UpgradeChosenEvent, UpgradeProgress, UpgradeType};
use crate::core::PlayState;

const OPTION_IDLE: Color = Color::srgb(0.12, 0.12, 0.18);
const OPTION_HOVERED: Color = Color::srgb(0.22, 0.2, 0.3);

/// Marker for the overlay root.
#[derive(Component)]
struct UpgradeScreenUi;

/// Button that picks one upgrade.
#[derive(Component, Clone, Copy, Debug)]
struct UpgradeOption(UpgradeType);

const NUMBER_KEYS: [KeyCode; 9] = [
    KeyCode::Digit1,
    KeyCode::Digit2,
    KeyCode::Digit3,
    KeyCode::Digit4,
    KeyCode::Digit5,
    KeyCode::Digit6,
    KeyCode::Digit7,
    KeyCode::Digit8,
    KeyCode::Digit9,
];

pub fn setup_upgrade_screen_systems(app: &mut App) {
    app.add_systems(OnEnter(PlayState::ChoosingUpgrade), spawn_upgrade_screen)
        .add_systems(OnExit(PlayState::ChoosingUpgrade), cleanup_upgrade_screen)
        .add_systems(
            Update,
            upgrade_screen_input.run_if(in_state(PlayState::ChoosingUpgrade)),
        );
}

fn spawn_upgrade_screen(
    mut commands: Commands,
    progress: Res<UpgradeProgress>,
    mut next_state: ResMut<NextState<PlayState>>,
) {
    if progress.offer.is_empty() {
        warn!("Upgrade screen opened without an offer");
        next_state.set(PlayState::Fighting);
        return;
    }

    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                position_type: PositionType::Absolute,
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.75)),
            UpgradeScreenUi,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("CHOOSE AN UPGRADE"),
                TextFont {
                    font_size: 40.0,
                    ..default()
                },
                TextColor(Color::srgb(0.9, 0.8, 0.5)),
                Node {
                    margin: UiRect::bottom(Val::Px(30.0)),
                    ..default()
                },
            ));

            parent
                .spawn(Node {
                    flex_direction: FlexDirection::Row,
                    ..default()
                })
                .with_children(|row| {
                    for (index, entry) in progress.offer.iter().enumerate() {
                        row.spawn((
                            Button,
                            Node {
                                width: Val::Px(220.0),
                                min_height: Val::Px(140.0),
                                margin: UiRect::all(Val::Px(12.0)),
                                padding: UiRect::all(Val::Px(14.0)),
                                flex_direction: FlexDirection::Column,
                                align_items: AlignItems::Center,
                                ..default()
                            },
                            BackgroundColor(OPTION_IDLE),
                            UpgradeOption(entry.kind),
                        ))
                        .with_children(|card| {
                            card.spawn((
                                Text::new(format!("{}. {}", index + 1, entry.title)),
                                TextFont {
                                    font_size: 22.0,
                                    ..default()
                                },
                                TextColor(Color::srgb(0.95, 0.95, 0.95)),
                                Node {
                                    margin: UiRect::bottom(Val::Px(10.0)),
                                    ..default()
                                },
                            ));
                            card.spawn((
                                Text::new(entry.description.clone()),
                                TextFont {
                                    font_size: 15.0,
                                    ..default()
                                },
                                TextColor(Color::srgb(0.7, 0.7, 0.75)),
                            ));
                        });
                    }
                });
        });
}

/// Pick an upgrade by clicking it or pressing its number.
fn upgrade_screen_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    progress: Res<UpgradeProgress>,
    mut interaction_query: Query<
        (&Interaction, &UpgradeOption, &mut BackgroundColor),
        (Changed<Interaction>, With<Button>),
    >,
    mut chosen: EventWriter<UpgradeChosenEvent>,
    mut next_state: ResMut<NextState<PlayState>>,
) {
    let mut pick = NUMBER_KEYS
        .iter()
        .zip(progress.offer.iter())
        .find(|(key, _)| keyboard.just_pressed(**key))
        .map(|(_, entry)| entry.kind);

    for (interaction, option, mut bg_color) in interaction_query.iter_mut() {
        match interaction {
            Interaction::Pressed => pick = Some(option.0),
            Interaction::Hovered => *bg_color = OPTION_HOVERED.into(),
            Interaction::None => *bg_color = OPTION_IDLE.into(),
        }
    }

    if let Some(upgrade) = pick {
        chosen.send(UpgradeChosenEvent(upgrade));
        next_state.set(PlayState::Fighting);
    }
}

fn cleanup_upgrade_screen(mut commands: Commands, query: Query<Entity, With<UpgradeScreenUi>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::UpgradeCatalog;
    use crate::core::GameState;
    use bevy::state::app::StatesPlugin;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn choosing_app() -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin));
        app.init_state::<GameState>();
        app.add_sub_state::<PlayState>();
        app.init_resource::<ButtonInput<KeyCode>>();
        app.add_event::<UpgradeChosenEvent>();

        let offer = UpgradeCatalog::standard().pick_random_upgrades(3, &mut StdRng::seed_from_u64(5));
        app.insert_resource(UpgradeProgress {
            kills_since_offer: 0,
            offer,
        });
        app.add_systems(
            Update,
            upgrade_screen_input.run_if(in_state(PlayState::ChoosingUpgrade)),
        );

        app.world_mut()
            .resource_mut::<NextState<GameState>>()
            .set(GameState::InGame);
        app.update();
        app.update();
        app.world_mut()
            .resource_mut::<NextState<PlayState>>()
            .set(PlayState::ChoosingUpgrade);
        app.update();
        app.update();
        app
    }

    fn chosen(app: &App) -> Vec<UpgradeType> {
        let events = app.world().resource::<Events<UpgradeChosenEvent>>();
        events.get_cursor().read(events).map(|e| e.0).collect()
    }

    #[test]
    fn number_key_picks_matching_offer() {
        let mut app = choosing_app();
        let expected = app.world().resource::<UpgradeProgress>().offer[1].kind;

        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::Digit2);
        app.update();

        assert_eq!(chosen(&app), vec![expected]);
        app.update();
        assert_eq!(*app.world().resource::<State<PlayState>>().get(), PlayState::Fighting);
    }

    #[test]
    fn clicking_an_option_picks_it() {
        let mut app = choosing_app();
        app.world_mut().spawn((
            Button,
            Interaction::Pressed,
            BackgroundColor(OPTION_IDLE),
            UpgradeOption(UpgradeType::ChainLightning),
        ));
        app.update();

        assert_eq!(chosen(&app), vec![UpgradeType::ChainLightning]);
    }
}
