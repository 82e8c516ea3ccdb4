//! Combat module: Slash, Attack, Block/Dodge, Hack, пассивки
//!
//! Все способности пишут `DamageRequest`, применяет урон
//! `attributes::apply_damage_requests` (фаза Resolution).
//!
//! Поток:
//! - SlashIntent (input) → resolve_slash → Block / Dodge / урон
//! - AttackIntent (AI) → resolve_attacks → урон по integrity игрока
//! - HackIntent (AI) → handle_hack_intents → tick_hack → hack progress игрока

use bevy::prelude::*;

pub mod attack;
pub mod defense;
pub mod events;
pub mod hack;
pub mod passives;
pub mod slash;

#[cfg(test)]
mod combat_tests;

pub use attack::{resolve_attacks, AttackAbility};
pub use defense::{regenerate_defense_charges, BlockAbility, ChargeResource, DodgeAbility};
pub use events::*;
pub use hack::{handle_hack_intents, tick_hack, HackAbility};
pub use passives::{ExecutionChains, SystemOvercharge};
pub use slash::{resolve_slash, SlashAbility};

use crate::abilities::tick_ability_cooldowns;
use crate::GameplaySet;

/// Combat Plugin
///
/// Порядок внутри фаз:
/// 1. Timers - cooldown'ы, регенерация зарядов, окно ExecutionChains
/// 2. Action - hack intents → slash → attack → тик взлома
/// 3. Reactions - ExecutionChains по ActorDied
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<SlashIntent>()
            .add_event::<AttackIntent>()
            .add_event::<HackIntent>()
            .add_event::<SlashBlocked>()
            .add_event::<SlashDodged>()
            .add_event::<SlashHit>()
            .add_event::<AttackLanded>();

        app.add_systems(
            FixedUpdate,
            (
                (
                    tick_ability_cooldowns::<SlashAbility>,
                    tick_ability_cooldowns::<AttackAbility>,
                    tick_ability_cooldowns::<HackAbility>,
                    regenerate_defense_charges,
                    passives::tick_execution_chains,
                )
                    .in_set(GameplaySet::Timers),
                (handle_hack_intents, resolve_slash, resolve_attacks, tick_hack)
                    .chain()
                    .in_set(GameplaySet::Action),
                passives::open_execution_chains.in_set(GameplaySet::Reactions),
            ),
        );
    }
}
