//! Атрибуты врага: integrity, смерть при 0

use bevy::prelude::*;

/// Результат изменения одного атрибута
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttributeChange {
    pub previous: f32,
    pub current: f32,
}

impl AttributeChange {
    pub fn unchanged(value: f32) -> Self {
        Self { previous: value, current: value }
    }

    pub fn changed(&self) -> bool {
        self.previous != self.current
    }
}

/// Результат урона по врагу
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageOutcome {
    pub change: AttributeChange,
    /// Этот вызов перевёл врага в мёртвые
    pub killed: bool,
}

/// Integrity врага
///
/// Инвариант: 0 ≤ integrity ≤ max_integrity
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct EnemyAttributes {
    pub integrity: f32,
    pub max_integrity: f32,
}

impl Default for EnemyAttributes {
    fn default() -> Self {
        Self::new(100.0)
    }
}

impl EnemyAttributes {
    pub fn new(max_integrity: f32) -> Self {
        Self {
            integrity: max_integrity,
            max_integrity,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.integrity > 0.0
    }

    pub fn integrity_percent(&self) -> f32 {
        if self.max_integrity > 0.0 {
            self.integrity / self.max_integrity
        } else {
            0.0
        }
    }

    /// Урон. No-op если уже мёртв или amount ≤ 0.
    pub fn take_damage(&mut self, amount: f32) -> DamageOutcome {
        if !self.is_alive() || amount <= 0.0 {
            return DamageOutcome {
                change: AttributeChange::unchanged(self.integrity),
                killed: false,
            };
        }

        let previous = self.integrity;
        self.integrity = (self.integrity - amount).clamp(0.0, self.max_integrity);

        DamageOutcome {
            change: AttributeChange { previous, current: self.integrity },
            killed: !self.is_alive(),
        }
    }

    /// Летальная операция (Kill / CascadeVirus): integrity → 0
    pub fn kill(&mut self) -> DamageOutcome {
        if !self.is_alive() {
            return DamageOutcome {
                change: AttributeChange::unchanged(self.integrity),
                killed: false,
            };
        }

        let previous = self.integrity;
        self.integrity = 0.0;

        DamageOutcome {
            change: AttributeChange { previous, current: 0.0 },
            killed: true,
        }
    }

    /// Лечение живого врага (мёртвых не воскрешаем)
    pub fn heal(&mut self, amount: f32) -> AttributeChange {
        if !self.is_alive() || amount <= 0.0 {
            return AttributeChange::unchanged(self.integrity);
        }

        let previous = self.integrity;
        self.integrity = (self.integrity + amount).clamp(0.0, self.max_integrity);
        AttributeChange { previous, current: self.integrity }
    }
}
