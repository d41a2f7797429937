//! Game state definitions that control the overall flow of the game.
//!
//! States determine which systems run at any given time. For example,
//! card throwing only runs while fighting, while menu systems only run
//! in the MainMenu state.

use bevy::prelude::*;

/// Main game states - controls overall game flow.
///
/// - Start in `Loading` to read data files
/// - Move to `MainMenu` when loading completes
/// - Enter `InGame` when the player starts a run
/// - `GameOver` when the player dies
/// - `Victory` when the last wave is cleared
#[derive(States, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum GameState {
    /// Initial state - loading data files
    #[default]
    Loading,
    /// Main menu / title screen
    MainMenu,
    /// Active run
    InGame,
    /// Player has died
    GameOver,
    /// Every wave was cleared
    Victory,
}

/// Sub-states for gameplay - only active when GameState::InGame.
///
/// Pausing is a sub-state so the arena stays spawned while the game is frozen.
#[derive(SubStates, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
#[source(GameState = GameState::InGame)]
pub enum PlayState {
    /// Normal gameplay - movement, throwing, enemies
    #[default]
    Fighting,
    /// Upgrade offer is on screen, gameplay frozen
    ChoosingUpgrade,
    /// Pause overlay is open
    Paused,
}
