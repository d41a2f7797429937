//! Enemy data loading from RON files.

use bevy::prelude::*;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use super::components::EnemyStats;
use crate::core::load_ron;

/// Directory holding one RON file per enemy type.
pub const ENEMY_DATA_DIR: &str = "assets/data/enemies";

/// Enemy definition loaded from RON file.
#[derive(Deserialize, Clone, Debug)]
pub struct EnemyDefinition {
    pub name: String,
    pub max_health: f32,
    pub damage: f32,
    pub move_speed: f32,
    pub detection_range: f32,
    pub attack_range: f32,
    pub attack_cooldown: f32,
    pub scale: f32,
    /// sRGB body colour
    pub color: (f32, f32, f32),
}

impl EnemyDefinition {
    /// Convert to EnemyStats component.
    pub fn to_stats(&self) -> EnemyStats {
        EnemyStats {
            max_health: self.max_health,
            damage: self.damage,
            move_speed: self.move_speed,
            detection_range: self.detection_range,
            attack_range: self.attack_range,
            attack_cooldown: self.attack_cooldown,
        }
    }

    pub fn body_color(&self) -> Color {
        Color::srgb(self.color.0, self.color.1, self.color.2)
    }

    fn grunt() -> Self {
        Self {
            name: "Grunt".to_string(),
            max_health: 30.0,
            damage: 8.0,
            move_speed: 3.2,
            detection_range: 40.0,
            attack_range: 1.4,
            attack_cooldown: 1.0,
            scale: 1.0,
            color: (0.55, 0.3, 0.6),
        }
    }

    fn brute() -> Self {
        Self {
            name: "Brute".to_string(),
            max_health: 90.0,
            damage: 20.0,
            move_speed: 2.0,
            detection_range: 40.0,
            attack_range: 1.8,
            attack_cooldown: 1.6,
            scale: 1.5,
            color: (0.7, 0.45, 0.2),
        }
    }
}

/// Resource holding all loaded enemy definitions.
#[derive(Resource, Default)]
pub struct EnemyRegistry {
    pub definitions: HashMap<String, EnemyDefinition>,
}

impl EnemyRegistry {
    /// The definitions the game ships with, used when no data files are found.
    pub fn builtin() -> Self {
        let mut definitions = HashMap::new();
        definitions.insert("grunt".to_string(), EnemyDefinition::grunt());
        definitions.insert("brute".to_string(), EnemyDefinition::brute());
        Self { definitions }
    }

    /// Get an enemy definition by type name.
    pub fn get(&self, enemy_type: &str) -> Option<&EnemyDefinition> {
        self.definitions.get(enemy_type)
    }
}

/// Load all enemy definitions from the assets/data/enemies/ directory.
pub fn load_enemy_definitions(mut registry: ResMut<EnemyRegistry>) {
    let enemies_dir = Path::new(ENEMY_DATA_DIR);

    if !enemies_dir.exists() {
        warn!("Enemy definitions directory not found: {:?}, using built-in enemies", enemies_dir);
        *registry = EnemyRegistry::builtin();
        return;
    }

    let Ok(entries) = fs::read_dir(enemies_dir) else {
        warn!("Failed to read enemy definitions directory, using built-in enemies");
        *registry = EnemyRegistry::builtin();
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();

        if !path.extension().is_some_and(|ext| ext == "ron") {
            continue;
        }

        let Some(enemy_type) = path.file_stem().and_then(|s| s.to_str()).map(str::to_string) else {
            warn!("Skipping enemy file with unreadable name: {:?}", path);
            continue;
        };

        match load_ron::<EnemyDefinition>(&path) {
            Ok(definition) => {
                info!("Loaded enemy definition: {} ({})", definition.name, enemy_type);
                registry.definitions.insert(enemy_type, definition);
            }
            Err(e) => {
                error!("Failed to load enemy definition: {}", e);
            }
        }
    }

    if registry.definitions.is_empty() {
        warn!("No enemy definitions loaded, using built-in enemies");
        *registry = EnemyRegistry::builtin();
    }

    info!(
        "Loaded {} enemy definitions",
        registry.definitions.len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::parse_ron;

    #[test]
    fn builtin_registry_has_grunt_and_brute() {
        let registry = EnemyRegistry::builtin();
        assert!(registry.get("grunt").is_some());
        assert!(registry.get("brute").is_some());
        assert!(registry.get("dragon").is_none());
    }

    #[test]
    fn shipped_enemy_files_parse() {
        for (name, contents) in [
            ("grunt", include_str!("../../assets/data/enemies/grunt.ron")),
            ("brute", include_str!("../../assets/data/enemies/brute.ron")),
        ] {
            let definition: EnemyDefinition = parse_ron(contents, name).expect("shipped file parses");
            let stats = definition.to_stats();
            assert!(stats.max_health > 0.0);
            assert!(stats.attack_range > 0.0);
        }
    }
}
