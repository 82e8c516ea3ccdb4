//! Вертикаль: гравитация, пол, GravityFlip

use bevy::prelude::*;

use crate::components::{Dead, GravityScale, Grounded, Velocity};

/// см/с²
pub const GRAVITY: f32 = 980.0;
pub const MAX_VERTICAL_SPEED: f32 = 2000.0;
/// Перевёрнутая гравитация поднимает актора не выше этой высоты
pub const FLIPPED_CEILING: f32 = 600.0;

/// Один шаг вертикальной интеграции. Пол на y = 0.
pub fn integrate_vertical(
    translation: &mut Vec3,
    velocity: &mut Vec3,
    gravity_scale: f32,
    grounded: &mut bool,
    delta: f32,
) {
    // На земле и не толкают вверх: стоим
    if *grounded && gravity_scale > 0.0 && velocity.y <= 0.0 {
        velocity.y = 0.0;
        return;
    }

    velocity.y = (velocity.y - GRAVITY * gravity_scale * delta).clamp(-MAX_VERTICAL_SPEED, MAX_VERTICAL_SPEED);
    translation.y += velocity.y * delta;

    if translation.y <= 0.0 {
        translation.y = 0.0;
        velocity.y = 0.0;
        *grounded = gravity_scale > 0.0;
        return;
    }

    *grounded = false;
    if gravity_scale < 0.0 && translation.y >= FLIPPED_CEILING {
        translation.y = FLIPPED_CEILING;
        velocity.y = 0.0;
    }
}

/// Система: гравитация для всех живых акторов
pub fn apply_gravity(
    mut actors: Query<(&mut Transform, &mut Velocity, &GravityScale, &mut Grounded), Without<Dead>>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (mut transform, mut velocity, gravity, mut grounded) in actors.iter_mut() {
        let mut translation = transform.translation;
        let mut vertical = velocity.0;
        let mut on_ground = grounded.0;

        integrate_vertical(&mut translation, &mut vertical, gravity.0, &mut on_ground, delta);

        if translation != transform.translation {
            transform.translation = translation;
        }
        if vertical != velocity.0 {
            velocity.0 = vertical;
        }
        if on_ground != grounded.0 {
            grounded.0 = on_ground;
        }
    }
}
