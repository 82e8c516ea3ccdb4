//! Hack: непрерывный взлом игрока нетраннером
//!
//! Активен пока владелец жив и есть цель; каждый тик в радиусе
//! добавляет `rate * dt` к hack progress цели.

use bevy::prelude::*;

use super::events::HackIntent;
use crate::abilities::{Ability, AbilityKind, Activatable};
use crate::attributes::{DamageKind, DamageRequest, StatusEffects};
use crate::components::Dead;
use crate::config::HackStats;
use crate::error::AbilityResult;

#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct HackAbility {
    pub ability: Ability,
    pub rate: f32,
    pub range: f32,
    pub target: Option<Entity>,
}

impl Default for HackAbility {
    fn default() -> Self {
        Self::new(&HackStats::default())
    }
}

impl HackAbility {
    pub fn new(stats: &HackStats) -> Self {
        Self {
            ability: Ability::new(0.0),
            rate: stats.rate,
            range: stats.range,
            target: None,
        }
    }

    pub fn is_hacking(&self) -> bool {
        self.ability.is_active && self.target.is_some()
    }

    /// Начать взлом. Тот же target повторно - no-op (Ok).
    pub fn start(&mut self, target: Entity, owner_alive: bool) -> AbilityResult {
        if self.ability.is_active && self.target == Some(target) {
            return Ok(());
        }
        if self.ability.is_active {
            self.ability.deactivate();
        }
        self.ability.activate(owner_alive)?;
        self.target = Some(target);
        Ok(())
    }

    pub fn stop(&mut self) {
        self.ability.deactivate();
        self.target = None;
    }
}

impl Activatable for HackAbility {
    fn tick_cooldowns(&mut self, delta: f32) -> Vec<AbilityKind> {
        if self.ability.tick(delta) {
            vec![AbilityKind::Hack]
        } else {
            Vec::new()
        }
    }
}

/// Система: HackIntent → start/stop
pub fn handle_hack_intents(
    mut intents: EventReader<HackIntent>,
    mut hackers: Query<(&mut HackAbility, &StatusEffects, Has<Dead>)>,
) {
    for intent in intents.read() {
        let Ok((mut hack, status, is_dead)) = hackers.get_mut(intent.hacker) else {
            continue;
        };

        match intent.target {
            None => {
                if hack.ability.is_active {
                    hack.stop();
                    crate::log(&format!("🔌 {:?} stopped hacking", intent.hacker));
                }
            }
            Some(target) if status.can_use_abilities => {
                let was_hacking = hack.is_hacking();
                match hack.start(target, !is_dead) {
                    Ok(()) if !was_hacking => {
                        crate::log(&format!("💻 {:?} started hacking {:?}", intent.hacker, target));
                    }
                    Ok(()) => {}
                    Err(error) => crate::log(&format!("⛔ Hack rejected for {:?}: {}", intent.hacker, error)),
                }
            }
            Some(_) => {}
        }
    }
}

/// Система: тик взлома
pub fn tick_hack(
    mut hackers: Query<(Entity, &Transform, &mut HackAbility, &StatusEffects, Has<Dead>)>,
    targets: Query<(&Transform, Has<Dead>)>,
    mut damage_events: EventWriter<DamageRequest>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (hacker, transform, mut hack, status, is_dead) in hackers.iter_mut() {
        if !hack.ability.is_active {
            continue;
        }

        let target = hack
            .target
            .and_then(|target| targets.get(target).ok().map(|(position, dead)| (target, position, dead)));

        let Some((target, target_transform, target_dead)) = target.filter(|_| !is_dead) else {
            // Владелец мёртв или цели больше нет
            hack.stop();
            continue;
        };
        if target_dead {
            hack.stop();
            continue;
        }

        if !status.can_use_abilities || transform.translation.distance(target_transform.translation) > hack.range {
            continue;
        }

        damage_events.write(DamageRequest {
            target,
            source: Some(hacker),
            kind: DamageKind::HackProgress(hack.rate * delta),
        });
    }
}
