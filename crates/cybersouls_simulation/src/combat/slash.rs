//! Slash: удар игрока по врагам в радиусе
//!
//! Порядок резолва на каждого кандидата фиксирован:
//! 1. Block (если принимает часть тела и есть заряд) → без урона
//! 2. Dodge (аналогично) → импульс прочь от атакующего, без урона
//! 3. Урон
//!
//! ExecutionChains пропускает шаг 1, SystemOvercharge - шаги 1 и 2.

use bevy::prelude::*;

use super::defense::{BlockAbility, DodgeAbility};
use super::events::{SlashBlocked, SlashDodged, SlashHit, SlashIntent};
use super::passives::{ExecutionChains, SystemOvercharge};
use crate::abilities::{Ability, AbilityKind, Activatable};
use crate::attributes::{DamageKind, DamageRequest, StatusEffects};
use crate::components::{Dead, Enemy, Impulse};
use crate::config::SlashTuning;
use crate::error::AbilityError;
use crate::targeting::{BodyPart, TargetLock, Targeting};

#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct SlashAbility {
    pub ability: Ability,
    pub damage: f32,
    pub range: f32,
}

impl Default for SlashAbility {
    fn default() -> Self {
        Self::new(&SlashTuning::default())
    }
}

impl SlashAbility {
    pub fn new(tuning: &SlashTuning) -> Self {
        Self {
            ability: Ability::new(tuning.cooldown),
            damage: tuning.damage,
            range: tuning.range,
        }
    }
}

impl Activatable for SlashAbility {
    fn tick_cooldowns(&mut self, delta: f32) -> Vec<AbilityKind> {
        if self.ability.tick(delta) {
            vec![AbilityKind::Slash]
        } else {
            Vec::new()
        }
    }
}

/// Выбранная цель Slash + часть тела, по которой бьём
fn aimed_target(targeting: Option<&Targeting>, lock: Option<&TargetLock>) -> (Option<Entity>, BodyPart) {
    let crosshair = targeting.and_then(|targeting| targeting.current_target);
    let locked = lock.and_then(|lock| lock.locked);
    let target = locked.or(crosshair);

    let part = match targeting {
        Some(targeting) if target.is_some() && targeting.current_target == target => targeting.current_body_part,
        _ => BodyPart::None,
    };
    let part = if part == BodyPart::None { BodyPart::UpperBody } else { part };

    (target, part)
}

/// Система: резолв SlashIntent
pub fn resolve_slash(
    mut intents: EventReader<SlashIntent>,
    mut attackers: Query<
        (
            &Transform,
            &mut SlashAbility,
            &StatusEffects,
            Has<Dead>,
            Option<&Targeting>,
            Option<&TargetLock>,
            Option<&ExecutionChains>,
            Option<&SystemOvercharge>,
        ),
        Without<Enemy>,
    >,
    mut defenders: Query<
        (
            Entity,
            &Transform,
            Option<&mut BlockAbility>,
            Option<&mut DodgeAbility>,
            &mut Impulse,
        ),
        (With<Enemy>, Without<Dead>),
    >,
    mut damage_events: EventWriter<DamageRequest>,
    mut blocked_events: EventWriter<SlashBlocked>,
    mut dodged_events: EventWriter<SlashDodged>,
    mut hit_events: EventWriter<SlashHit>,
) {
    for intent in intents.read() {
        let Ok((attacker_transform, mut slash, status, is_dead, targeting, lock, chains, overcharge)) =
            attackers.get_mut(intent.attacker)
        else {
            continue;
        };

        if !status.can_use_abilities {
            crate::log(&format!("⛔ Slash rejected for {:?}: {}", intent.attacker, AbilityError::AbilitiesDisabled));
            continue;
        }
        if let Err(error) = slash.ability.activate(!is_dead) {
            crate::log(&format!("⛔ Slash rejected for {:?}: {}", intent.attacker, error));
            continue;
        }

        let origin = attacker_transform.translation;
        let (aimed, body_part) = aimed_target(targeting, lock);
        let overcharged = overcharge.is_some_and(|passive| passive.active);
        let skip_block = overcharged || chains.is_some_and(ExecutionChains::is_active);
        let skip_dodge = overcharged;

        let mut candidates: Vec<(Entity, f32)> = defenders
            .iter()
            .map(|(entity, transform, ..)| (entity, transform.translation.distance(origin)))
            .filter(|(_, distance)| *distance <= slash.range)
            .collect();
        candidates.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0)));

        // Цель под прицелом (или залоченная) сужает набор до неё одной
        if let Some(aimed) = aimed {
            if candidates.iter().any(|(entity, _)| *entity == aimed) {
                candidates.retain(|(entity, _)| *entity == aimed);
            }
        }

        for (defender, _) in candidates {
            let Ok((_, transform, block, dodge, mut impulse)) = defenders.get_mut(defender) else {
                continue;
            };

            if !skip_block {
                if let Some(mut block) = block {
                    if block.try_block(body_part, true).is_ok() {
                        crate::log_info(&format!(
                            "🛡️ {:?} blocked slash ({:?}), {} charges left",
                            defender, body_part, block.charges.current
                        ));
                        blocked_events.write(SlashBlocked {
                            attacker: intent.attacker,
                            defender,
                            body_part,
                        });
                        continue;
                    }
                }
            }

            if !skip_dodge {
                if let Some(mut dodge) = dodge {
                    if dodge.try_dodge(body_part, true).is_ok() {
                        *impulse = Impulse::timed(dodge.impulse(transform, Some(origin)), dodge.impulse_duration());
                        crate::log_info(&format!(
                            "💨 {:?} dodged slash ({:?}), {} charges left",
                            defender, body_part, dodge.charges.current
                        ));
                        dodged_events.write(SlashDodged {
                            attacker: intent.attacker,
                            defender,
                            body_part,
                        });
                        continue;
                    }
                }
            }

            damage_events.write(DamageRequest {
                target: defender,
                source: Some(intent.attacker),
                kind: DamageKind::Integrity(slash.damage),
            });
            hit_events.write(SlashHit {
                attacker: intent.attacker,
                defender,
                body_part,
                damage: slash.damage,
            });
        }

        // Slash мгновенный: active снимается сразу, cooldown продолжает идти
        slash.ability.deactivate();
    }
}
