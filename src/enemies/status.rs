//! Status effect tinting.

use bevy::prelude::*;

use super::components::{Enemy, EnemyLook};
use crate::cards::{Poisoned, Stunned};

const POISON_TINT: Color = Color::srgb(0.35, 0.9, 0.3);
const STUN_TINT: Color = Color::srgb(0.7, 0.85, 1.0);

/// Colour an enemy should show. Stun wins over poison.
pub fn status_tint(base: Color, poisoned: bool, stunned: bool) -> Color {
    if stunned {
        STUN_TINT
    } else if poisoned {
        POISON_TINT
    } else {
        base
    }
}

/// Tint poisoned and stunned enemies, and restore the base colour afterwards.
pub fn update_status_tint(
    mut materials: ResMut<Assets<StandardMaterial>>,
    enemies: Query<
        (&EnemyLook, &MeshMaterial3d<StandardMaterial>, Has<Poisoned>, Has<Stunned>),
        With<Enemy>,
    >,
) {
    for (look, material, poisoned, stunned) in enemies.iter() {
        let Some(material) = materials.get_mut(&material.0) else {
            continue;
        };
        let tint = status_tint(look.base_color, poisoned, stunned);
        if material.base_color != tint {
            material.base_color = tint;
        }
    }
}
