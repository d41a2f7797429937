//! Cards plugin - card config, assets, throwing and upgrades.

use bevy::prelude::*;

use super::components::*;
use super::config::{load_card_config, CardConfig};
use super::systems;
use super::upgrades::UpgradeCatalog;

/// Cards plugin - handles the card weapon and its upgrades.
pub struct CardsPlugin;

impl Plugin for CardsPlugin {
    fn build(&self, app: &mut App) {
        app
            // Replaced by the loaded file in Startup
            .init_resource::<CardConfig>()
            .init_resource::<CardAssets>()
            .init_resource::<UpgradeCatalog>()
            .init_resource::<UpgradeProgress>()

            .add_event::<CardThrownEvent>()
            .add_event::<CardImpactEvent>()
            .add_event::<UpgradeChosenEvent>()

            .add_systems(Startup, load_card_config);

        systems::setup_card_systems(app);
    }
}
