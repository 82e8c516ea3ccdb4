//! Player movement abilities: Dash, DoubleJump
//!
//! Обе способности тратят `Stamina` (attributes) и двигают актора через
//! movement executor (`Impulse` для рывка, `Velocity` для прыжка).

use bevy::prelude::*;

pub mod dash;
pub mod events;
pub mod jump;

#[cfg(test)]
mod player_tests;

pub use dash::{handle_dash_intents, regenerate_dash_charges, DashAbility};
pub use events::*;
pub use jump::{handle_jump_intents, reset_air_jumps, DoubleJump, JumpOutcome};

use crate::abilities::tick_ability_cooldowns;
use crate::GameplaySet;

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<DashIntent>()
            .add_event::<JumpIntent>()
            .add_event::<DashPerformed>()
            .add_event::<Jumped>();

        app.add_systems(
            FixedUpdate,
            (
                (tick_ability_cooldowns::<DashAbility>, regenerate_dash_charges, reset_air_jumps)
                    .in_set(GameplaySet::Timers),
                (handle_dash_intents, handle_jump_intents)
                    .chain()
                    .in_set(GameplaySet::Action),
            ),
        );
    }
}
