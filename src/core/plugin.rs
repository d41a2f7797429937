//! Core plugin that sets up game states, events, and fundamental systems.

use bevy::prelude::*;

use super::events::*;
use super::states::*;
use super::tween::*;

/// Core plugin - must be added first as other plugins depend on it.
///
/// This plugin sets up:
/// - Game states (Loading, MainMenu, InGame, etc.)
/// - Global events (DamageEvent, DeathEvent)
/// - Pausing and transform smoothing
pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app
            // Initialize game states
            .init_state::<GameState>()
            .add_sub_state::<PlayState>()

            // Register global events
            .add_event::<DamageEvent>()
            .add_event::<DeathEvent>()

            // Data files are read in Startup, so Loading only has to hand over
            .add_systems(OnEnter(GameState::Loading), transition_to_main_menu)

            // Pause/unpause with Escape key
            .add_systems(Update, handle_pause_input.run_if(in_state(GameState::InGame)))

            // Smooth transform interpolation (runs for all game states)
            .add_systems(Update, update_smooth_transforms);
    }
}

fn transition_to_main_menu(mut next_state: ResMut<NextState<GameState>>) {
    next_state.set(GameState::MainMenu);
}

/// Handle Escape key to pause/unpause the game.
///
/// Ignored while an upgrade offer is open; the offer has to be answered.
fn handle_pause_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    current_state: Res<State<PlayState>>,
    mut next_state: ResMut<NextState<PlayState>>,
) {
    if keyboard.just_pressed(KeyCode::Escape) {
        match current_state.get() {
            PlayState::Fighting => next_state.set(PlayState::Paused),
            PlayState::Paused => next_state.set(PlayState::Fighting),
            PlayState::ChoosingUpgrade => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::state::app::StatesPlugin;

    fn core_app() -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin));
        app.init_resource::<ButtonInput<KeyCode>>();
        app.add_plugins(CorePlugin);
        app
    }

    fn settle(app: &mut App) {
        for _ in 0..3 {
            app.update();
        }
    }

    /// Press Escape for exactly one frame.
    fn tap_escape(app: &mut App) {
        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::Escape);
        app.update();
        let mut keyboard = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
        keyboard.release(KeyCode::Escape);
        keyboard.clear();
        app.update();
    }

    fn play_state(app: &App) -> PlayState {
        *app.world().resource::<State<PlayState>>().get()
    }

    #[test]
    fn loading_hands_over_to_main_menu() {
        let mut app = core_app();
        settle(&mut app);
        assert_eq!(*app.world().resource::<State<GameState>>().get(), GameState::MainMenu);
    }

    #[test]
    fn escape_toggles_pause_without_leaving_the_run() {
        let mut app = core_app();
        settle(&mut app);
        app.world_mut()
            .resource_mut::<NextState<GameState>>()
            .set(GameState::InGame);
        settle(&mut app);
        assert_eq!(play_state(&app), PlayState::Fighting);

        tap_escape(&mut app);
        assert_eq!(play_state(&app), PlayState::Paused);
        assert_eq!(*app.world().resource::<State<GameState>>().get(), GameState::InGame);

        tap_escape(&mut app);
        assert_eq!(play_state(&app), PlayState::Fighting);
    }
}
