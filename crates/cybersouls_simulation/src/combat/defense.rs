//! Защитные способности: Block / Dodge на зарядах
//!
//! Заряды тратятся по одному на успешную защиту. Регенерация опциональна:
//! таймер идёт пока выполняется условие (для Block/Dodge - всегда),
//! сбрасывается при трате, каждый полный `regen_period` даёт один заряд.

use bevy::prelude::*;

use crate::error::{AbilityError, AbilityResult};
use crate::targeting::BodyPart;

/// Ресурс зарядов (Block, Dodge, Dash)
///
/// Инвариант: 0 ≤ current ≤ max
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct ChargeResource {
    pub current: u32,
    pub max: u32,
    /// None - заряды не восстанавливаются
    pub regen_period: Option<f32>,
    pub regen_timer: f32,
}

impl ChargeResource {
    pub fn new(max: u32, regen_period: Option<f32>) -> Self {
        Self {
            current: max,
            max,
            regen_period: regen_period.filter(|period| *period > 0.0),
            regen_timer: 0.0,
        }
    }

    pub fn has_charge(&self) -> bool {
        self.current > 0
    }

    pub fn consume(&mut self) -> AbilityResult {
        if !self.has_charge() {
            return Err(AbilityError::NoCharges);
        }
        self.current -= 1;
        self.regen_timer = 0.0;
        Ok(())
    }

    /// ChargeDrain: все заряды в 0
    pub fn drain(&mut self) {
        self.current = 0;
        self.regen_timer = 0.0;
    }

    /// Тик регенерации. true - выдан заряд на этом тике.
    pub fn tick_regen(&mut self, delta: f32, prerequisite: bool) -> bool {
        let Some(period) = self.regen_period else {
            return false;
        };
        if !prerequisite || self.current >= self.max {
            return false;
        }

        self.regen_timer += delta;
        if self.regen_timer < period {
            return false;
        }

        self.regen_timer = 0.0;
        self.current += 1;
        true
    }
}

/// Block: принимает удары по UpperBody
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct BlockAbility {
    pub charges: ChargeResource,
    pub accepted_parts: Vec<BodyPart>,
}

impl BlockAbility {
    pub fn new(max_charges: u32, regen_period: Option<f32>) -> Self {
        Self {
            charges: ChargeResource::new(max_charges, regen_period),
            accepted_parts: vec![BodyPart::UpperBody],
        }
    }

    pub fn accepts(&self, part: BodyPart) -> bool {
        self.accepted_parts.contains(&part)
    }

    /// Успех тратит ровно один заряд
    pub fn try_block(&mut self, part: BodyPart, owner_alive: bool) -> AbilityResult {
        if !owner_alive {
            return Err(AbilityError::OwnerDead);
        }
        if !self.accepts(part) {
            return Err(AbilityError::NotAvailable);
        }
        self.charges.consume()
    }
}

/// Dodge: уход от ударов по ногам + импульс от атакующего
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct DodgeAbility {
    pub charges: ChargeResource,
    pub accepted_parts: Vec<BodyPart>,
    pub dodge_speed: f32,
    pub dodge_distance: f32,
}

impl DodgeAbility {
    pub fn new(max_charges: u32, regen_period: Option<f32>, dodge_speed: f32, dodge_distance: f32) -> Self {
        Self {
            charges: ChargeResource::new(max_charges, regen_period),
            accepted_parts: vec![BodyPart::LeftLeg, BodyPart::RightLeg],
            dodge_speed,
            dodge_distance,
        }
    }

    pub fn accepts(&self, part: BodyPart) -> bool {
        self.accepted_parts.contains(&part)
    }

    pub fn try_dodge(&mut self, part: BodyPart, owner_alive: bool) -> AbilityResult {
        if !owner_alive {
            return Err(AbilityError::OwnerDead);
        }
        if !self.accepts(part) {
            return Err(AbilityError::NotAvailable);
        }
        self.charges.consume()
    }

    /// Горизонтальный импульс прочь от атакующего (без атакующего - назад)
    pub fn impulse(&self, owner: &Transform, attacker_position: Option<Vec3>) -> Vec3 {
        let away = attacker_position
            .map(|attacker| owner.translation - attacker)
            .unwrap_or_else(|| owner.back().as_vec3());

        let horizontal = Vec3::new(away.x, 0.0, away.z).normalize_or_zero();
        let direction = if horizontal == Vec3::ZERO {
            let back = owner.back().as_vec3();
            Vec3::new(back.x, 0.0, back.z).normalize_or_zero()
        } else {
            horizontal
        };

        direction * self.dodge_speed
    }

    /// Сколько длится импульс, чтобы пройти `dodge_distance`
    pub fn impulse_duration(&self) -> f32 {
        if self.dodge_speed > 0.0 {
            self.dodge_distance / self.dodge_speed
        } else {
            0.0
        }
    }
}

/// Система: регенерация зарядов Block/Dodge
pub fn regenerate_defense_charges(
    mut blocks: Query<&mut BlockAbility>,
    mut dodges: Query<&mut DodgeAbility>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for mut block in blocks.iter_mut() {
        block.charges.tick_regen(delta, true);
    }
    for mut dodge in dodges.iter_mut() {
        dodge.charges.tick_regen(delta, true);
    }
}
