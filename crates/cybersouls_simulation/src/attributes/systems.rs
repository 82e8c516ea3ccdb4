//! Attribute системы: применение урона, смерть, stamina

use bevy::prelude::*;

use super::events::*;
use super::{crossed_milestones, EnemyAttributes, HackOutcome, PlayerAttributes, Stamina, StatusEffects};
use crate::components::Dead;

/// Система: apply damage от DamageRequest событий
///
/// 1. Читаем DamageRequest
/// 2. Применяем через методы компонентов (clamp + change detection)
/// 3. IntegrityChanged / HackProgressChanged - только при реальном изменении
/// 4. ActorDied + маркер Dead - ровно один раз
///
/// Мёртвые (`Dead`) отфильтрованы query, повторный летальный запрос
/// в том же тике отсекается самим компонентом (integrity уже 0).
pub fn apply_damage_requests(
    mut commands: Commands,
    mut requests: EventReader<DamageRequest>,
    mut enemies: Query<&mut EnemyAttributes, Without<Dead>>,
    mut players: Query<(&mut PlayerAttributes, &StatusEffects), Without<Dead>>,
    mut applied_events: EventWriter<DamageApplied>,
    mut integrity_events: EventWriter<IntegrityChanged>,
    mut hack_events: EventWriter<HackProgressChanged>,
    mut died_events: EventWriter<ActorDied>,
) {
    for request in requests.read() {
        if let Ok(mut attributes) = enemies.get_mut(request.target) {
            let outcome = match request.kind {
                DamageKind::Integrity(amount) => attributes.take_damage(amount),
                DamageKind::Lethal => attributes.kill(),
                // Враги не взламываются
                DamageKind::HackProgress(_) => continue,
            };

            if !outcome.change.changed() {
                continue;
            }

            integrity_events.write(IntegrityChanged {
                entity: request.target,
                previous: outcome.change.previous,
                current: outcome.change.current,
                max: attributes.max_integrity,
            });
            applied_events.write(DamageApplied {
                target: request.target,
                source: request.source,
                kind: request.kind,
                target_died: outcome.killed,
            });

            if outcome.killed {
                commands.entity(request.target).insert(Dead);
                died_events.write(ActorDied {
                    entity: request.target,
                    killer: request.source,
                    was_player: false,
                });
                crate::log_info(&format!(
                    "💀 Enemy {:?} killed by {:?}",
                    request.target, request.source
                ));
            }
            continue;
        }

        let Ok((mut attributes, status)) = players.get_mut(request.target) else {
            // Цель мертва, despawned или без атрибутов - silent no-op
            continue;
        };

        match request.kind {
            DamageKind::Integrity(amount) => {
                let change = attributes.take_damage(amount);
                if !change.changed() {
                    continue;
                }
                report_player_integrity(request.target, &attributes, change.previous, &mut integrity_events);
                applied_events.write(DamageApplied {
                    target: request.target,
                    source: request.source,
                    kind: request.kind,
                    target_died: false,
                });
            }
            DamageKind::Lethal => {
                // Игрока нельзя убить уроном по integrity: Lethal = обнулить integrity
                let max_integrity = attributes.max_integrity;
                let change = attributes.take_damage(max_integrity);
                if change.changed() {
                    report_player_integrity(request.target, &attributes, change.previous, &mut integrity_events);
                }
            }
            DamageKind::HackProgress(amount) => match attributes.increase_hack_progress(amount, status) {
                HackOutcome::Blocked => {
                    crate::log(&format!("🛡️ Firewall blocked {:.2} hack progress on {:?}", amount, request.target));
                }
                HackOutcome::Applied { change, killed } => {
                    if !change.changed() {
                        continue;
                    }
                    hack_events.write(HackProgressChanged {
                        entity: request.target,
                        previous: change.previous,
                        current: change.current,
                        max: attributes.max_hack_progress,
                    });
                    applied_events.write(DamageApplied {
                        target: request.target,
                        source: request.source,
                        kind: request.kind,
                        target_died: killed,
                    });

                    if killed {
                        commands.entity(request.target).insert(Dead);
                        died_events.write(ActorDied {
                            entity: request.target,
                            killer: request.source,
                            was_player: true,
                        });
                        crate::log_warning(&format!("☠️ Player {:?} fully hacked by {:?}", request.target, request.source));
                    }
                }
            },
        }
    }
}

fn report_player_integrity(
    entity: Entity,
    attributes: &PlayerAttributes,
    previous: f32,
    integrity_events: &mut EventWriter<IntegrityChanged>,
) {
    integrity_events.write(IntegrityChanged {
        entity,
        previous,
        current: attributes.integrity,
        max: attributes.max_integrity,
    });

    let previous_percent = if attributes.max_integrity > 0.0 {
        previous / attributes.max_integrity * 100.0
    } else {
        0.0
    };
    for milestone in crossed_milestones(previous_percent, attributes.integrity_percent()) {
        crate::log_warning(&format!("⚠️ Player integrity dropped below {}%", milestone));
    }
}

/// Система: регенерация stamina (с задержкой после траты)
pub fn regenerate_stamina(
    mut query: Query<(Entity, &mut Stamina), Without<Dead>>,
    mut stamina_events: EventWriter<StaminaChanged>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (entity, mut stamina) in query.iter_mut() {
        if stamina.regenerate(delta) {
            stamina_events.write(StaminaChanged {
                entity,
                current: stamina.current,
                max: stamina.max,
            });
        }
    }
}
