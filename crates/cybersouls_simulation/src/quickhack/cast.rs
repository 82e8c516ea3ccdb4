//! QuickHack: способность с cast time и отложенным эффектом
//!
//! State machine: Idle → Casting → Idle (эффект применён)
//!                        Casting → Idle (прерван, эффекта нет)
//! `current_target` очищается при любом выходе из Casting.

use bevy::prelude::*;

use super::types::QuickHackType;
use crate::abilities::{Ability, AbilityKind, Activatable};
use crate::config::{QuickHackTable, QuickHackTiming};
use crate::error::{AbilityError, AbilityResult};

/// Допуск на накопление f32 при сравнении с cast_time
const CAST_EPSILON: f32 = 1e-4;

/// Результат одного тика каста
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CastStep {
    /// Не кастуется
    Idle,
    /// Каст продолжается (elapsed, total)
    Casting { elapsed: f32, total: f32 },
    /// Каст завершён на этом тике, эффект нужно применить к target
    Completed { target: Entity },
}

#[derive(Debug, Clone, PartialEq, Reflect)]
pub struct QuickHack {
    pub hack_type: QuickHackType,
    pub ability: Ability,
    pub cast_time: f32,
    pub current_cast_time: f32,
    pub effect_duration: f32,
    pub current_target: Option<Entity>,
}

impl QuickHack {
    pub fn new(hack_type: QuickHackType, timing: QuickHackTiming) -> Self {
        Self {
            hack_type,
            ability: Ability::new(timing.cooldown),
            cast_time: timing.cast_time.max(0.0),
            current_cast_time: 0.0,
            effect_duration: timing.effect_duration.max(0.0),
            current_target: None,
        }
    }

    pub fn is_self_targeted(&self) -> bool {
        self.hack_type.is_self_targeted()
    }

    pub fn is_casting(&self) -> bool {
        self.ability.is_active
    }

    pub fn cast_time_remaining(&self) -> f32 {
        if self.is_casting() {
            (self.cast_time - self.current_cast_time).max(0.0)
        } else {
            0.0
        }
    }

    /// Начать каст по уже разрешённой цели (для self-targeted - сам кастер)
    pub fn start(&mut self, target: Option<Entity>, owner_alive: bool) -> AbilityResult {
        let target = target.ok_or(AbilityError::NoTarget)?;
        self.ability.activate(owner_alive)?;
        self.current_cast_time = 0.0;
        self.current_target = Some(target);
        Ok(())
    }

    /// Продвинуть каст на delta
    pub fn advance(&mut self, delta: f32) -> CastStep {
        if !self.is_casting() {
            return CastStep::Idle;
        }

        self.current_cast_time = (self.current_cast_time + delta).min(self.cast_time);
        if self.current_cast_time + CAST_EPSILON < self.cast_time {
            return CastStep::Casting {
                elapsed: self.current_cast_time,
                total: self.cast_time,
            };
        }

        match self.finish() {
            Some(target) => CastStep::Completed { target },
            None => CastStep::Idle,
        }
    }

    /// Прервать каст (эффект не применяется). Возвращает цель, если каст шёл.
    pub fn interrupt(&mut self) -> Option<Entity> {
        if !self.is_casting() {
            return None;
        }
        self.finish()
    }

    fn finish(&mut self) -> Option<Entity> {
        self.ability.deactivate();
        self.current_cast_time = 0.0;
        self.current_target.take()
    }
}

/// Набор QuickHack'ов актора (игрок и нетраннеры)
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct QuickHackLoadout {
    pub hacks: Vec<QuickHack>,
}

impl QuickHackLoadout {
    pub fn from_types(types: impl IntoIterator<Item = QuickHackType>, table: &QuickHackTable) -> Self {
        let mut loadout = Self::default();
        for hack_type in types {
            loadout.ensure(hack_type, table.timing(hack_type));
        }
        loadout
    }

    /// Добавляет хак, если его ещё нет
    pub fn ensure(&mut self, hack_type: QuickHackType, timing: QuickHackTiming) {
        if self.get(hack_type).is_none() {
            self.hacks.push(QuickHack::new(hack_type, timing));
        }
    }

    pub fn get(&self, hack_type: QuickHackType) -> Option<&QuickHack> {
        self.hacks.iter().find(|hack| hack.hack_type == hack_type)
    }

    pub fn get_mut(&mut self, hack_type: QuickHackType) -> Option<&mut QuickHack> {
        self.hacks.iter_mut().find(|hack| hack.hack_type == hack_type)
    }

    pub fn is_casting_any(&self) -> bool {
        self.hacks.iter().any(QuickHack::is_casting)
    }

    /// Прерывает все касты, возвращает (тип, цель) прерванных
    pub fn interrupt_all(&mut self) -> Vec<(QuickHackType, Option<Entity>)> {
        self.hacks
            .iter_mut()
            .filter(|hack| hack.is_casting())
            .map(|hack| (hack.hack_type, hack.interrupt()))
            .collect()
    }
}

impl Activatable for QuickHackLoadout {
    fn tick_cooldowns(&mut self, delta: f32) -> Vec<AbilityKind> {
        self.hacks
            .iter_mut()
            .filter_map(|hack| hack.ability.tick(delta).then_some(AbilityKind::QuickHack(hack.hack_type)))
            .collect()
    }
}
