//! Enemy AI: perception, physical/hacking контроллеры, alert propagation
//!
//! Порядок по фазам (`GameplaySet`):
//! 1. Perception - update_perception (LOS, GhostProtocol)
//! 2. Decision - physical_ai_decisions, hacking_ai_decisions (пишут MovementCommand и intents)
//! 3. Broadcast - broadcast_alerts (после собственных переходов отправителя)
//! 4. Reactions - reset_ai_on_player_death

use bevy::prelude::*;

pub mod alert;
pub mod events;
pub mod hacking;
pub mod perception;
pub mod physical;


pub use alert::{broadcast_alerts, AlertState};
pub use events::*;
pub use hacking::{choose_quickhack, hacking_ai_decisions, HackingController};
pub use perception::{update_perception, Perception};
pub use physical::{face_towards, physical_ai_decisions, PhysicalController, PhysicalState};

use crate::attributes::ActorDied;
use crate::components::MovementCommand;
use crate::GameplaySet;

/// AI Plugin
///
/// Все системы в FixedUpdate, порядок задают фазы `GameplaySet`.
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<TargetSpotted>()
            .add_event::<TargetLost>()
            .add_event::<AllyAlert>();

        app.add_systems(
            FixedUpdate,
            (
                update_perception.in_set(GameplaySet::Perception),
                (physical_ai_decisions, hacking_ai_decisions)
                    .chain()
                    .in_set(GameplaySet::Decision),
                broadcast_alerts.in_set(GameplaySet::Broadcast),
                reset_ai_on_player_death.in_set(GameplaySet::Reactions),
            ),
        );
    }
}

/// Система: смерть игрока возвращает все контроллеры в Idle и гасит тревогу
pub fn reset_ai_on_player_death(
    mut died: EventReader<ActorDied>,
    mut physical: Query<
        (&mut PhysicalController, &mut AlertState, &mut MovementCommand),
        Without<HackingController>,
    >,
    mut hacking: Query<(&mut HackingController, &mut AlertState), Without<PhysicalController>>,
) {
    // Читаем все события (без short-circuit), чтобы не копить хвост
    let player_died = died.read().filter(|event| event.was_player).count() > 0;
    if !player_died {
        return;
    }

    for (mut controller, mut alert, mut command) in physical.iter_mut() {
        controller.reset();
        alert.stop_alerting();
        *command = MovementCommand::Stop;
    }
    for (mut controller, mut alert) in hacking.iter_mut() {
        controller.reset();
        alert.stop_alerting();
    }

    crate::log_info("🏁 Player died, AI reset to Idle");
}
