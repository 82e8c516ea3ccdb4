//! Атрибуты игрока: integrity (не убивает) + hack progress (убивает при max)

use bevy::prelude::*;

use super::enemy::AttributeChange;
use super::status::StatusEffects;

/// Пороги integrity (%), пересечение вниз логируется
pub const INTEGRITY_MILESTONES: [f32; 3] = [75.0, 50.0, 25.0];

/// Результат увеличения hack progress
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HackOutcome {
    /// Firewall активен: ничего не изменилось, событий нет
    Blocked,
    Applied {
        change: AttributeChange,
        /// Этот вызов довёл прогресс до max
        killed: bool,
    },
}

/// Атрибуты игрока
///
/// Инварианты:
/// - 0 ≤ integrity ≤ max_integrity
/// - 0 ≤ hack_progress ≤ max_hack_progress
/// - потеря integrity сама по себе не убивает
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct PlayerAttributes {
    pub integrity: f32,
    pub max_integrity: f32,
    pub hack_progress: f32,
    pub max_hack_progress: f32,
}

impl Default for PlayerAttributes {
    fn default() -> Self {
        Self::new(100.0, 100.0)
    }
}

impl PlayerAttributes {
    pub fn new(max_integrity: f32, max_hack_progress: f32) -> Self {
        Self {
            integrity: max_integrity,
            max_integrity,
            hack_progress: 0.0,
            max_hack_progress,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.hack_progress < self.max_hack_progress
    }

    pub fn integrity_percent(&self) -> f32 {
        if self.max_integrity > 0.0 {
            self.integrity / self.max_integrity * 100.0
        } else {
            0.0
        }
    }

    pub fn take_damage(&mut self, amount: f32) -> AttributeChange {
        if amount <= 0.0 {
            return AttributeChange::unchanged(self.integrity);
        }

        let previous = self.integrity;
        self.integrity = (self.integrity - amount).clamp(0.0, self.max_integrity);
        AttributeChange { previous, current: self.integrity }
    }

    pub fn restore_integrity(&mut self, amount: f32) -> AttributeChange {
        if amount <= 0.0 {
            return AttributeChange::unchanged(self.integrity);
        }

        let previous = self.integrity;
        self.integrity = (self.integrity + amount).clamp(0.0, self.max_integrity);
        AttributeChange { previous, current: self.integrity }
    }

    /// Прогресс взлома. Firewall блокирует полностью.
    pub fn increase_hack_progress(&mut self, amount: f32, status: &StatusEffects) -> HackOutcome {
        if status.has_firewall {
            return HackOutcome::Blocked;
        }

        let was_alive = self.is_alive();
        if !was_alive || amount <= 0.0 {
            return HackOutcome::Applied {
                change: AttributeChange::unchanged(self.hack_progress),
                killed: false,
            };
        }

        let previous = self.hack_progress;
        self.hack_progress = (self.hack_progress + amount).clamp(0.0, self.max_hack_progress);

        HackOutcome::Applied {
            change: AttributeChange { previous, current: self.hack_progress },
            killed: was_alive && !self.is_alive(),
        }
    }
}

/// Пороги, пересечённые вниз при переходе previous → current (в процентах)
pub fn crossed_milestones(previous_percent: f32, current_percent: f32) -> impl Iterator<Item = f32> {
    INTEGRITY_MILESTONES
        .into_iter()
        .filter(move |milestone| previous_percent > *milestone && current_percent <= *milestone)
}
