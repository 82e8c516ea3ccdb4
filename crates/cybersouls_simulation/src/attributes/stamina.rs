//! Stamina игрока (dash, double jump)

use bevy::prelude::*;

/// Выносливость
///
/// Инвариант: 0.0 ≤ current ≤ max
/// Regen: `regen_rate`/сек, стартует через `regen_delay` после последней траты
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Stamina {
    pub current: f32,
    pub max: f32,
    pub regen_rate: f32,
    pub regen_delay: f32,
    pub time_since_use: f32,
}

impl Default for Stamina {
    fn default() -> Self {
        Self::new(100.0, 10.0, 1.0)
    }
}

impl Stamina {
    pub fn new(max: f32, regen_rate: f32, regen_delay: f32) -> Self {
        Self {
            current: max,
            max,
            regen_rate,
            regen_delay,
            time_since_use: 0.0,
        }
    }

    pub fn has_enough(&self, amount: f32) -> bool {
        self.current >= amount
    }

    pub fn percentage(&self) -> f32 {
        if self.max > 0.0 {
            self.current / self.max
        } else {
            0.0
        }
    }

    /// Тратит stamina (clamp к 0). Возвращает true если значение изменилось.
    pub fn use_stamina(&mut self, amount: f32) -> bool {
        if amount <= 0.0 {
            return false;
        }

        let previous = self.current;
        self.current = (self.current - amount).clamp(0.0, self.max);
        self.time_since_use = 0.0;
        previous != self.current
    }

    /// Тик регенерации. Возвращает true если значение изменилось.
    pub fn regenerate(&mut self, delta: f32) -> bool {
        self.time_since_use += delta;
        if self.time_since_use < self.regen_delay || self.current >= self.max {
            return false;
        }

        let previous = self.current;
        self.current = (self.current + self.regen_rate * delta).clamp(0.0, self.max);
        previous != self.current
    }
}
