//! Audio plugin - plays card sounds when the matching events fire.

use std::path::Path;

use bevy::prelude::*;
use bevy_kira_audio::{Audio, AudioControl, AudioSource};

use crate::cards::{CardImpactEvent, CardThrownEvent};
use crate::core::GameState;

const THROW_SOUND: &str = "sounds/card_throw.ogg";
const IMPACT_SOUND: &str = "sounds/card_impact.ogg";

/// Sound handles. A sound whose file is missing stays `None` and is never played.
#[derive(Resource, Default)]
pub struct SoundEffects {
    pub throw: Option<Handle<AudioSource>>,
    pub impact: Option<Handle<AudioSource>>,
}

/// Audio plugin - expects `bevy_kira_audio::AudioPlugin` to be added by the app.
pub struct AudioEffectsPlugin;

impl Plugin for AudioEffectsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SoundEffects>()
            .add_systems(Startup, load_sound_effects)
            .add_systems(
                Update,
                (play_throw_sounds, play_impact_sounds).run_if(in_state(GameState::InGame)),
            );
    }
}

/// Load `path` only if the file exists under `assets/`.
fn load_if_present(asset_server: &AssetServer, path: &str) -> Option<Handle<AudioSource>> {
    if Path::new("assets").join(path).exists() {
        Some(asset_server.load(path.to_string()))
    } else {
        info!("Sound {} not found, it will be skipped", path);
        None
    }
}

fn load_sound_effects(asset_server: Res<AssetServer>, mut sounds: ResMut<SoundEffects>) {
    sounds.throw = load_if_present(&asset_server, THROW_SOUND);
    sounds.impact = load_if_present(&asset_server, IMPACT_SOUND);
}

fn play_throw_sounds(
    audio: Res<Audio>,
    sounds: Res<SoundEffects>,
    mut thrown: EventReader<CardThrownEvent>,
) {
    for _ in thrown.read() {
        if let Some(handle) = &sounds.throw {
            audio.play(handle.clone());
        }
    }
}

fn play_impact_sounds(
    audio: Res<Audio>,
    sounds: Res<SoundEffects>,
    mut impacts: EventReader<CardImpactEvent>,
) {
    // Several cards landing in the same frame play one sound
    if impacts.read().count() == 0 {
        return;
    }
    if let Some(handle) = &sounds.impact {
        audio.play(handle.clone());
    }
}
