//! Attack: ближняя атака врага по игроку (фиксированный урон по integrity)

use bevy::prelude::*;

use super::events::{AttackIntent, AttackLanded};
use crate::abilities::{Ability, AbilityKind, Activatable};
use crate::attributes::{DamageKind, DamageRequest, PlayerAttributes, StatusEffects};
use crate::components::{Dead, Player};
use crate::config::AttackStats;
use crate::error::{AbilityError, AbilityResult};

#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct AttackAbility {
    pub ability: Ability,
    pub damage: f32,
    pub range: f32,
}

impl Default for AttackAbility {
    fn default() -> Self {
        Self::new(&AttackStats::default())
    }
}

impl AttackAbility {
    pub fn new(stats: &AttackStats) -> Self {
        Self {
            ability: Ability::new(stats.cooldown),
            damage: stats.damage,
            range: stats.range,
        }
    }

    pub fn in_range(&self, from: Vec3, to: Vec3) -> bool {
        from.distance(to) <= self.range
    }
}

impl Activatable for AttackAbility {
    fn tick_cooldowns(&mut self, delta: f32) -> Vec<AbilityKind> {
        if self.ability.tick(delta) {
            vec![AbilityKind::Attack]
        } else {
            Vec::new()
        }
    }
}

/// Система: резолв AttackIntent
///
/// Цель обязана быть живым игроком в радиусе атаки, иначе no-op
/// (cooldown не тратится).
pub fn resolve_attacks(
    mut intents: EventReader<AttackIntent>,
    mut attackers: Query<(&Transform, &mut AttackAbility, &StatusEffects, Has<Dead>)>,
    targets: Query<(&Transform, &PlayerAttributes), (With<Player>, Without<Dead>)>,
    mut damage_events: EventWriter<DamageRequest>,
    mut landed_events: EventWriter<AttackLanded>,
) {
    for intent in intents.read() {
        let Ok((transform, mut attack, status, is_dead)) = attackers.get_mut(intent.attacker) else {
            continue;
        };

        let target = targets.get(intent.target).ok();
        let result = check_attack(&attack, transform, status, target).and_then(|_| attack.ability.activate(!is_dead));

        if let Err(error) = result {
            crate::log(&format!("⛔ Attack rejected for {:?}: {}", intent.attacker, error));
            continue;
        }

        crate::log(&format!("⚔️ {:?} hits {:?} for {:.1}", intent.attacker, intent.target, attack.damage));
        damage_events.write(DamageRequest {
            target: intent.target,
            source: Some(intent.attacker),
            kind: DamageKind::Integrity(attack.damage),
        });
        landed_events.write(AttackLanded {
            attacker: intent.attacker,
            target: intent.target,
            damage: attack.damage,
        });

        attack.ability.deactivate();
    }
}

/// Проверки поверх базовой способности: статус атакующего, живая цель в радиусе
fn check_attack(
    attack: &AttackAbility,
    transform: &Transform,
    status: &StatusEffects,
    target: Option<(&Transform, &PlayerAttributes)>,
) -> AbilityResult {
    if !status.can_use_abilities {
        return Err(AbilityError::AbilitiesDisabled);
    }
    let (target_transform, attributes) = target.ok_or(AbilityError::NoTarget)?;
    if !attributes.is_alive() || !attack.in_range(transform.translation, target_transform.translation) {
        return Err(AbilityError::NoTarget);
    }
    Ok(())
}
