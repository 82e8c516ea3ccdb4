//! QuickHack системы: intents → старт каста, тик каста, прерывания

use bevy::prelude::*;

use super::cast::{CastStep, QuickHackLoadout};
use super::events::*;
use super::slots::QuickHackSlots;
use super::types::QuickHackType;
use crate::attributes::StatusEffects;
use crate::combat::SystemOvercharge;
use crate::components::Dead;
use crate::error::AbilityError;

type CasterQuery<'w, 's> = Query<
    'w,
    's,
    (
        Entity,
        &'static Transform,
        &'static mut QuickHackLoadout,
        &'static StatusEffects,
        Has<Dead>,
        Option<&'static QuickHackSlots>,
        Option<&'static SystemOvercharge>,
    ),
>;

/// Система: обработка QuickHack intents (по типу, по слоту, отмена слота)
///
/// Rejection → silent no-op (debug лог), как и у остальных способностей.
pub fn handle_quickhack_intents(
    mut intents: EventReader<QuickHackIntent>,
    mut slot_intents: EventReader<QuickHackSlotIntent>,
    mut cancel_intents: EventReader<QuickHackCancelIntent>,
    mut casters: CasterQuery,
    dead: Query<(), With<Dead>>,
    mut started_events: EventWriter<QuickHackStarted>,
    mut interrupted_events: EventWriter<QuickHackInterrupted>,
) {
    for intent in cancel_intents.read() {
        let Ok((_, _, mut loadout, _, _, Some(slots), _)) = casters.get_mut(intent.caster) else {
            continue;
        };
        if let Some((hack_type, target)) = slots.cancel_slot(intent.slot, &mut loadout) {
            crate::log(&format!("✋ {:?} cancelled {:?} (slot {})", intent.caster, hack_type, intent.slot));
            interrupted_events.write(QuickHackInterrupted {
                caster: intent.caster,
                hack_type,
                target,
            });
        }
    }

    let mut requests: Vec<(Entity, QuickHackType, Option<Entity>)> =
        intents.read().map(|intent| (intent.caster, intent.hack_type, intent.target)).collect();

    for intent in slot_intents.read() {
        let Ok((_, _, loadout, status, is_dead, slots, overcharge)) = casters.get(intent.caster) else {
            continue;
        };
        let Some(slots) = slots else {
            crate::log(&format!("{:?} has no QuickHack slots", intent.caster));
            continue;
        };

        let overcharge_active = overcharge.is_some_and(|passive| passive.active);
        match slots
            .can_activate_slot(intent.slot, loadout, !is_dead, status, overcharge_active)
            .and_then(|_| slots.resolve(intent.slot))
        {
            Ok(hack_type) => requests.push((intent.caster, hack_type, intent.target)),
            Err(error) => crate::log(&format!("⛔ Slot {} rejected for {:?}: {}", intent.slot, intent.caster, error)),
        }
    }

    for (caster, hack_type, target) in requests {
        match start_quickhack(caster, hack_type, target, &mut casters, &dead) {
            Ok((target, cast_time)) => {
                crate::log_info(&format!(
                    "🧠 {:?} started {:?} on {:?} (cast {:.1}s)",
                    caster, hack_type, target, cast_time
                ));
                started_events.write(QuickHackStarted {
                    caster,
                    target,
                    hack_type,
                    cast_time,
                });
            }
            Err(error) => {
                crate::log(&format!("⛔ {:?} cannot start {:?}: {}", caster, hack_type, error));
            }
        }
    }
}

/// Разрешает цель и стартует каст. Ok((цель, cast_time)).
fn start_quickhack(
    caster: Entity,
    hack_type: QuickHackType,
    requested_target: Option<Entity>,
    casters: &mut CasterQuery,
    dead: &Query<(), With<Dead>>,
) -> Result<(Entity, f32), AbilityError> {
    let auto_target = if hack_type == QuickHackType::InterruptProtocol && requested_target.is_none() {
        nearest_casting_actor(caster, casters)
    } else {
        None
    };

    let (_, _, mut loadout, status, is_dead, _, _) = casters.get_mut(caster).map_err(|_| AbilityError::NotAvailable)?;
    if !status.can_use_abilities {
        return Err(AbilityError::AbilitiesDisabled);
    }

    let hack = loadout.get_mut(hack_type).ok_or(AbilityError::NotAvailable)?;
    let target = if hack.is_self_targeted() {
        Some(caster)
    } else {
        requested_target.or(auto_target)
    };
    // Мёртвые цели не принимаются
    let target = target.filter(|entity| !dead.contains(*entity));

    hack.start(target, !is_dead)?;
    let target = hack.current_target.ok_or(AbilityError::NoTarget)?;
    Ok((target, hack.cast_time))
}

/// Ближайший другой живой актор, который сейчас кастует QuickHack
fn nearest_casting_actor(caster: Entity, casters: &CasterQuery) -> Option<Entity> {
    let origin = casters.get(caster).ok()?.1.translation;

    casters
        .iter()
        .filter(|(entity, _, loadout, _, is_dead, _, _)| *entity != caster && !*is_dead && loadout.is_casting_any())
        .map(|(entity, transform, ..)| (entity, transform.translation.distance(origin)))
        .min_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0)))
        .map(|(entity, _)| entity)
}

/// Система: тик кастов
///
/// Смерть кастера во время каста = прерывание без эффекта.
/// Завершение → QuickHackCompleted (эффект применяет `apply_quickhack_effects`).
pub fn advance_quickhack_casts(
    mut casters: Query<(Entity, &mut QuickHackLoadout, Has<Dead>)>,
    time: Res<Time<Fixed>>,
    mut progress_events: EventWriter<CastProgress>,
    mut completed_events: EventWriter<QuickHackCompleted>,
    mut interrupted_events: EventWriter<QuickHackInterrupted>,
) {
    let delta = time.delta_secs();

    for (caster, mut loadout, is_dead) in casters.iter_mut() {
        if !loadout.is_casting_any() {
            continue;
        }

        if is_dead {
            for (hack_type, target) in loadout.interrupt_all() {
                crate::log(&format!("💀 {:?} died while casting {:?}", caster, hack_type));
                interrupted_events.write(QuickHackInterrupted { caster, hack_type, target });
            }
            continue;
        }

        for hack in loadout.hacks.iter_mut() {
            let hack_type = hack.hack_type;
            let effect_duration = hack.effect_duration;

            match hack.advance(delta) {
                CastStep::Idle => {}
                CastStep::Casting { elapsed, total } => {
                    progress_events.write(CastProgress {
                        caster,
                        hack_type,
                        elapsed,
                        total,
                    });
                }
                CastStep::Completed { target } => {
                    crate::log_info(&format!("✅ {:?} completed {:?} on {:?}", caster, hack_type, target));
                    completed_events.write(QuickHackCompleted {
                        caster,
                        target,
                        hack_type,
                        effect_duration,
                    });
                }
            }
        }
    }
}
