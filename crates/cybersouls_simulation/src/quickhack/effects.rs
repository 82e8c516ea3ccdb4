//! Эффекты QuickHack + исполнение отложенных эффектов + каскад CascadeVirus
//!
//! Все таймерные эффекты снимаются через `ScheduledEffects`:
//! эффект ставит флаг и планирует `DeferredEffect`, `process_deferred_effects`
//! снимает флаг только если токен совпадает (новое окно заменило старое → старый no-op).

use bevy::prelude::*;

use super::events::{QuickHackCompleted, QuickHackInterrupted, QuickHackResisted};
use super::types::{QuickHackType, CASCADE_CHAIN_DELAY, CASCADE_CHAIN_RADIUS, CASCADE_MAX_CHAIN};
use super::QuickHackLoadout;
use crate::attributes::{ActorDied, DamageKind, DamageRequest, StatusEffects, StatusFlag};
use crate::combat::{BlockAbility, DodgeAbility};
use crate::components::{Dead, Enemy, GravityScale};
use crate::environment::actors_in_radius;
use crate::timers::{DeferredEffect, ScheduledEffects, TimerToken};

/// Метка CascadeVirus на цели
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct CascadeMark {
    pub source: Entity,
    pub token: TimerToken,
}

/// Активный GravityFlip: исходная гравитация + таймер возврата
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct GravityRestore {
    pub original: f32,
    pub token: TimerToken,
}

/// Незатаймеренные флаги QuickHack'ов на акторе (не статус-гейты)
#[derive(Component, Debug, Clone, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct QuickHackMarks {
    pub cascade: Option<CascadeMark>,
    pub gravity: Option<GravityRestore>,
}

/// Включает таймерный флаг; предыдущий таймер этого флага отменяется
fn apply_timed_status(
    status: &mut StatusEffects,
    flag: StatusFlag,
    duration: f32,
    effect: DeferredEffect,
    scheduled: &mut ScheduledEffects,
    now: f64,
) {
    let token = scheduled.schedule(now, duration, effect);
    if let Some(previous) = status.apply_timed(flag, token) {
        scheduled.cancel(previous);
    }
}

/// Система: применение эффектов завершённых QuickHack'ов
pub fn apply_quickhack_effects(
    mut completed: EventReader<QuickHackCompleted>,
    mut targets: Query<(
        &mut StatusEffects,
        &mut QuickHackMarks,
        &mut GravityScale,
        Option<&mut QuickHackLoadout>,
        Option<&mut BlockAbility>,
        Option<&mut DodgeAbility>,
        Has<Dead>,
    )>,
    mut scheduled: ResMut<ScheduledEffects>,
    time: Res<Time<Fixed>>,
    mut damage_events: EventWriter<DamageRequest>,
    mut interrupted_events: EventWriter<QuickHackInterrupted>,
    mut resisted_events: EventWriter<QuickHackResisted>,
) {
    let now = time.elapsed_secs_f64();

    for event in completed.read() {
        let Ok((mut status, mut marks, mut gravity, loadout, block, dodge, is_dead)) = targets.get_mut(event.target)
        else {
            // Цель despawned - эффект некуда применять
            continue;
        };
        if is_dead {
            continue;
        }

        let hostile = !event.hack_type.is_self_targeted() && event.target != event.caster;
        if hostile && status.has_firewall {
            crate::log_info(&format!("🛡️ {:?} resisted {:?} (firewall)", event.target, event.hack_type));
            resisted_events.write(QuickHackResisted {
                caster: event.caster,
                target: event.target,
                hack_type: event.hack_type,
            });
            continue;
        }

        let duration = event.effect_duration;
        match event.hack_type {
            QuickHackType::InterruptProtocol => {
                if let Some(mut loadout) = loadout {
                    for (hack_type, target) in loadout.interrupt_all() {
                        crate::log_info(&format!("⚡ {:?} interrupted {:?} of {:?}", event.caster, hack_type, event.target));
                        interrupted_events.write(QuickHackInterrupted {
                            caster: event.target,
                            hack_type,
                            target,
                        });
                    }
                }
                // Опциональный lockout способностей
                if duration > 0.0 {
                    apply_timed_status(
                        &mut status,
                        StatusFlag::AbilitiesDisabled,
                        duration,
                        DeferredEffect::RestoreAbilities(event.target),
                        &mut scheduled,
                        now,
                    );
                }
            }
            QuickHackType::SystemFreeze => {
                apply_timed_status(
                    &mut status,
                    StatusFlag::Immobilized,
                    duration,
                    DeferredEffect::ClearImmobilized(event.target),
                    &mut scheduled,
                    now,
                );
                crate::log_info(&format!("🧊 {:?} frozen for {:.1}s", event.target, duration));
            }
            QuickHackType::Firewall => {
                apply_timed_status(
                    &mut status,
                    StatusFlag::Firewall,
                    duration,
                    DeferredEffect::ClearFirewall(event.target),
                    &mut scheduled,
                    now,
                );
                crate::log_info(&format!("🛡️ {:?} firewall up for {:.1}s", event.target, duration));
            }
            QuickHackType::GhostProtocol => {
                apply_timed_status(
                    &mut status,
                    StatusFlag::InvisibleToHackers,
                    duration,
                    DeferredEffect::ClearInvisibility(event.target),
                    &mut scheduled,
                    now,
                );
                crate::log_info(&format!("👻 {:?} invisible to hackers for {:.1}s", event.target, duration));
            }
            QuickHackType::Kill => {
                damage_events.write(DamageRequest {
                    target: event.target,
                    source: Some(event.caster),
                    kind: DamageKind::Lethal,
                });
            }
            QuickHackType::CascadeVirus => {
                let token = scheduled.schedule(now, duration, DeferredEffect::ClearCascadeMark(event.target));
                if let Some(previous) = marks.cascade.replace(CascadeMark {
                    source: event.caster,
                    token,
                }) {
                    scheduled.cancel(previous.token);
                }
                crate::log_info(&format!("🦠 {:?} infected by cascade virus", event.target));
            }
            QuickHackType::ChargeDrain => {
                if let Some(mut block) = block {
                    block.charges.drain();
                }
                if let Some(mut dodge) = dodge {
                    dodge.charges.drain();
                }
                crate::log_info(&format!("🔋 {:?} defense charges drained", event.target));
            }
            QuickHackType::GravityFlip => {
                // Повторный flip продлевает окно, но не инвертирует обратно
                let original = match marks.gravity {
                    Some(active) => {
                        scheduled.cancel(active.token);
                        active.original
                    }
                    None => {
                        let original = gravity.0;
                        gravity.0 = -original;
                        original
                    }
                };
                let token = scheduled.schedule(
                    now,
                    duration,
                    DeferredEffect::RestoreGravity {
                        entity: event.target,
                        original,
                    },
                );
                marks.gravity = Some(GravityRestore { original, token });
                crate::log_info(&format!("🙃 {:?} gravity flipped for {:.1}s", event.target, duration));
            }
        }
    }
}

/// Система: исполнение созревших отложенных эффектов
///
/// Entity может быть уже despawned - тогда эффект просто пропускается.
pub fn process_deferred_effects(
    mut scheduled: ResMut<ScheduledEffects>,
    time: Res<Time<Fixed>>,
    mut actors: Query<(&mut StatusEffects, &mut GravityScale, &mut QuickHackMarks)>,
    mut damage_events: EventWriter<DamageRequest>,
) {
    let now = time.elapsed_secs_f64();

    for (token, effect) in scheduled.drain_due(now) {
        if let DeferredEffect::LethalHit { target, source } = effect {
            crate::log_info(&format!("🦠 Cascade lethal hit on {:?}", target));
            damage_events.write(DamageRequest {
                target,
                source,
                kind: DamageKind::Lethal,
            });
            continue;
        }

        let Ok((mut status, mut gravity, mut marks)) = actors.get_mut(effect.entity()) else {
            continue;
        };

        match effect {
            DeferredEffect::ClearImmobilized(_) => {
                status.expire(StatusFlag::Immobilized, token);
            }
            DeferredEffect::ClearFirewall(_) => {
                status.expire(StatusFlag::Firewall, token);
            }
            DeferredEffect::ClearInvisibility(_) => {
                status.expire(StatusFlag::InvisibleToHackers, token);
            }
            DeferredEffect::RestoreAbilities(_) => {
                status.expire(StatusFlag::AbilitiesDisabled, token);
            }
            DeferredEffect::RestoreGravity { original, .. } => {
                if marks.gravity.is_some_and(|active| active.token == token) {
                    gravity.0 = original;
                    marks.gravity = None;
                }
            }
            DeferredEffect::ClearCascadeMark(_) => {
                if marks.cascade.is_some_and(|mark| mark.token == token) {
                    marks.cascade = None;
                }
            }
            DeferredEffect::LethalHit { .. } => {}
        }
    }
}

/// Система: смерть помеченного CascadeVirus врага заражает до
/// `CASCADE_MAX_CHAIN` ближайших живых врагов (летальный удар с задержкой)
pub fn propagate_cascade(
    mut died: EventReader<ActorDied>,
    mut marked: Query<(&Transform, &mut QuickHackMarks)>,
    candidates: Query<(Entity, &Transform), (With<Enemy>, Without<Dead>)>,
    mut scheduled: ResMut<ScheduledEffects>,
    time: Res<Time<Fixed>>,
) {
    let now = time.elapsed_secs_f64();

    for event in died.read() {
        let Ok((transform, mut marks)) = marked.get_mut(event.entity) else {
            continue;
        };
        let Some(mark) = marks.cascade.take() else {
            continue;
        };
        scheduled.cancel(mark.token);

        let victims = actors_in_radius(
            transform.translation,
            CASCADE_CHAIN_RADIUS,
            candidates.iter().filter(|(entity, _)| *entity != event.entity),
        );

        for (victim, _) in victims.into_iter().take(CASCADE_MAX_CHAIN) {
            crate::log_info(&format!("🦠 Cascade spreads {:?} → {:?}", event.entity, victim));
            scheduled.schedule(
                now,
                CASCADE_CHAIN_DELAY,
                DeferredEffect::LethalHit {
                    target: victim,
                    source: Some(mark.source),
                },
            );
        }
    }
}
