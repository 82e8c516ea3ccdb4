//! Hacking AI: нетраннеры, никогда не двигаются
//!
//! Пока игрок виден (и не под GhostProtocol):
//! - разово оповещает союзников при каждом новом обнаружении
//! - смотрит на цель, держит непрерывный Hack в радиусе
//! - раз в `decision_interval` выбирает максимум один QuickHack:
//!   InterruptProtocol (игрок кастует) > Firewall (нет щита) > SystemFreeze
//!
//! Игрок не виден: взлом и оповещение остановлены.

use bevy::prelude::*;

use super::alert::AlertState;
use super::perception::Perception;
use super::physical::face_towards;
use crate::attributes::StatusEffects;
use crate::combat::{HackAbility, HackIntent};
use crate::components::{Dead, Enemy, Player};
use crate::config::HackingAiTuning;
use crate::quickhack::{QuickHackIntent, QuickHackLoadout, QuickHackType, DEFAULT_QUICKHACK_RANGE};

#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub struct HackingController {
    pub hack_range: f32,
    /// Решения по QuickHack принимаются только в этом радиусе
    pub quickhack_range: f32,
    pub decision_interval: f32,
    pub decision_timer: f32,
    pub was_visible: bool,
}

impl Default for HackingController {
    fn default() -> Self {
        Self::new(&HackingAiTuning::default(), DEFAULT_QUICKHACK_RANGE)
    }
}

impl HackingController {
    pub fn new(tuning: &HackingAiTuning, quickhack_range: f32) -> Self {
        Self {
            hack_range: tuning.hack_range,
            quickhack_range,
            decision_interval: tuning.quickhack_decision_interval,
            decision_timer: 0.0,
            was_visible: false,
        }
    }

    pub fn reset(&mut self) {
        self.was_visible = false;
        self.decision_timer = 0.0;
    }
}

/// Выбор QuickHack по приоритету (None - ничего не кастуем)
pub fn choose_quickhack(
    loadout: &QuickHackLoadout,
    status: &StatusEffects,
    player_is_casting: bool,
) -> Option<QuickHackType> {
    if !status.can_use_abilities || loadout.is_casting_any() {
        return None;
    }

    let ready = |hack_type: QuickHackType| {
        loadout
            .get(hack_type)
            .is_some_and(|hack| hack.ability.can_activate(true).is_ok())
    };

    if player_is_casting && ready(QuickHackType::InterruptProtocol) {
        return Some(QuickHackType::InterruptProtocol);
    }
    if !status.has_firewall && ready(QuickHackType::Firewall) {
        return Some(QuickHackType::Firewall);
    }
    if ready(QuickHackType::SystemFreeze) {
        return Some(QuickHackType::SystemFreeze);
    }
    None
}

/// Система: решения hacking AI
pub fn hacking_ai_decisions(
    mut controllers: Query<
        (
            Entity,
            &mut Transform,
            &mut HackingController,
            &Perception,
            &mut AlertState,
            &StatusEffects,
            Option<&HackAbility>,
            Option<&QuickHackLoadout>,
        ),
        (With<Enemy>, Without<Dead>),
    >,
    players: Query<(Entity, &Transform, Option<&QuickHackLoadout>), (With<Player>, Without<Enemy>, Without<Dead>)>,
    mut hack_events: EventWriter<HackIntent>,
    mut quickhack_events: EventWriter<QuickHackIntent>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();
    let player = players.iter().min_by_key(|(entity, ..)| *entity);

    for (entity, mut transform, mut controller, perception, mut alert, status, hack, loadout) in controllers.iter_mut() {
        let is_hacking = hack.is_some_and(HackAbility::is_hacking);

        let visible_player = player.filter(|(player_entity, ..)| {
            perception.can_see_target && perception.target == Some(*player_entity)
        });

        let Some((player_entity, player_transform, player_loadout)) = visible_player else {
            if controller.was_visible || is_hacking {
                controller.reset();
                alert.stop_alerting();
                if is_hacking {
                    hack_events.write(HackIntent {
                        hacker: entity,
                        target: None,
                    });
                }
                crate::log(&format!("❓ {:?} lost hack target", entity));
            }
            continue;
        };
        let player_position = player_transform.translation;

        if !controller.was_visible {
            controller.was_visible = true;
            controller.decision_timer = 0.0;
            alert.alert_once(player_entity, player_position);
            crate::log(&format!("👁️ {:?} spotted player, alerting allies", entity));
        }

        face_towards(&mut transform, player_position);
        let distance = transform.translation.distance(player_position);

        if hack.is_some() {
            if distance <= controller.hack_range && !is_hacking {
                hack_events.write(HackIntent {
                    hacker: entity,
                    target: Some(player_entity),
                });
            } else if distance > controller.hack_range && is_hacking {
                hack_events.write(HackIntent {
                    hacker: entity,
                    target: None,
                });
            }
        }

        controller.decision_timer -= delta;
        if controller.decision_timer > 0.0 {
            continue;
        }
        controller.decision_timer = controller.decision_interval;

        let Some(loadout) = loadout else {
            continue;
        };
        if distance > controller.quickhack_range {
            continue;
        }

        let player_is_casting = player_loadout.is_some_and(QuickHackLoadout::is_casting_any);
        if let Some(hack_type) = choose_quickhack(loadout, status, player_is_casting) {
            let target = if hack_type.is_self_targeted() { None } else { Some(player_entity) };
            crate::log(&format!("🧠 {:?} decides {:?}", entity, hack_type));
            quickhack_events.write(QuickHackIntent {
                caster: entity,
                hack_type,
                target,
            });
        }
    }
}
