//! QuickHack system: касты с cast time, слоты игрока, эффекты
//!
//! Поток:
//! 1. QuickHackIntent / QuickHackSlotIntent → `handle_quickhack_intents` (старт каста)
//! 2. `advance_quickhack_casts` → CastProgress / QuickHackCompleted / QuickHackInterrupted
//! 3. `apply_quickhack_effects` → статус-флаги, летальные запросы, таймеры
//! 4. `process_deferred_effects` → снятие эффектов по таймеру (начало тика)
//! 5. `propagate_cascade` → цепочка CascadeVirus по ActorDied

use bevy::prelude::*;

pub mod cast;
pub mod effects;
pub mod events;
pub mod slots;
pub mod systems;
pub mod types;


pub use cast::{CastStep, QuickHack, QuickHackLoadout};
pub use effects::{CascadeMark, GravityRestore, QuickHackMarks};
pub use events::*;
pub use slots::{QuickHackSlots, SLOT_COUNT};
pub use types::{QuickHackType, CASCADE_CHAIN_DELAY, CASCADE_CHAIN_RADIUS, CASCADE_MAX_CHAIN, DEFAULT_QUICKHACK_RANGE};

use crate::abilities::tick_ability_cooldowns;
use crate::GameplaySet;

pub struct QuickHackPlugin;

impl Plugin for QuickHackPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<QuickHackIntent>()
            .add_event::<QuickHackSlotIntent>()
            .add_event::<QuickHackCancelIntent>()
            .add_event::<QuickHackStarted>()
            .add_event::<CastProgress>()
            .add_event::<QuickHackCompleted>()
            .add_event::<QuickHackInterrupted>()
            .add_event::<QuickHackResisted>();

        app.add_systems(
            FixedUpdate,
            (
                (effects::process_deferred_effects, tick_ability_cooldowns::<QuickHackLoadout>)
                    .chain()
                    .in_set(GameplaySet::Timers),
                // Тик до старта: каст, начатый в этом тике, копит время со следующего
                (systems::advance_quickhack_casts, systems::handle_quickhack_intents)
                    .chain()
                    .in_set(GameplaySet::Action),
                effects::apply_quickhack_effects.in_set(GameplaySet::Effects),
                effects::propagate_cascade.in_set(GameplaySet::Reactions),
            ),
        );
    }
}
