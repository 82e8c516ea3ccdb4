//! Kinematic movement executor
//!
//! Исполняет `MovementCommand` вместо внешней навигации:
//! - прямая линия к точке / за entity со скоростью `MovementSpeed`
//! - `is_immobilized` (SystemFreeze) держит актора на месте
//! - `Impulse` (dodge, dash) перекрывает команду на время импульса
//! - вертикаль: гравитация × `GravityScale`, пол y = 0
//!
//! Все системы в фазе `GameplaySet::Movement` (после решений и эффектов тика).

use bevy::prelude::*;

pub mod executor;
pub mod gravity;

#[cfg(test)]
mod movement_tests;

pub use executor::{execute_movement_commands, step_towards};
pub use gravity::{apply_gravity, integrate_vertical, GRAVITY, MAX_VERTICAL_SPEED, FLIPPED_CEILING};

use crate::GameplaySet;

pub struct MovementPlugin;

impl Plugin for MovementPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            (execute_movement_commands, apply_gravity)
                .chain()
                .in_set(GameplaySet::Movement),
        );
    }
}
