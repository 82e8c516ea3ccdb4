//! Targeting: цель под прицелом, часть тела, target lock

use bevy::prelude::*;

pub mod body_part;
pub mod crosshair;
pub mod events;
pub mod lock;

#[cfg(test)]
mod targeting_tests;

pub use body_part::{classify_hit, BodyPart, UPPER_BODY_THRESHOLD};
pub use crosshair::{first_actor_hit, update_crosshair_targets, CrosshairHit, CrosshairRay, Targeting};
pub use events::*;
pub use lock::{handle_target_lock_intents, maintain_target_lock, TargetLock};

use crate::GameplaySet;

pub struct TargetingPlugin;

impl Plugin for TargetingPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<TargetChanged>()
            .add_event::<BodyPartChanged>()
            .add_event::<TargetLockIntent>()
            .add_event::<TargetLockChanged>();

        app.add_systems(
            FixedUpdate,
            (update_crosshair_targets, handle_target_lock_intents, maintain_target_lock)
                .chain()
                .in_set(GameplaySet::Perception),
        );
    }
}
