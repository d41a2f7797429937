//! Exponential-style smoothing toward a target transform.

use bevy::prelude::*;

/// Moves a transform a fraction of the way to its targets every frame.
#[derive(Component, Debug, Clone)]
pub struct SmoothTransform {
    /// Target translation (None = leave translation alone)
    pub target_translation: Option<Vec3>,
    /// Target rotation (None = leave rotation alone)
    pub target_rotation: Option<Quat>,
    /// Fraction of the remaining distance covered per second
    pub translation_speed: f32,
    pub rotation_speed: f32,
}

impl Default for SmoothTransform {
    fn default() -> Self {
        Self {
            target_translation: None,
            target_rotation: None,
            translation_speed: 12.0,
            rotation_speed: 12.0,
        }
    }
}

impl SmoothTransform {
    pub fn new(translation_speed: f32, rotation_speed: f32) -> Self {
        Self {
            translation_speed,
            rotation_speed,
            ..default()
        }
    }

    /// Move `transform` toward the targets for a frame of `dt` seconds.
    pub fn step(&self, transform: &mut Transform, dt: f32) {
        if let Some(target) = self.target_translation {
            let t = (self.translation_speed * dt).min(1.0);
            transform.translation = transform.translation.lerp(target, t);
        }
        if let Some(target) = self.target_rotation {
            let t = (self.rotation_speed * dt).min(1.0);
            transform.rotation = transform.rotation.slerp(target, t);
        }
    }
}

/// System that interpolates transforms toward their targets.
pub fn update_smooth_transforms(time: Res<Time>, mut query: Query<(&mut Transform, &SmoothTransform)>) {
    let dt = time.delta_secs();
    for (mut transform, smooth) in query.iter_mut() {
        smooth.step(&mut transform, dt);
    }
}
