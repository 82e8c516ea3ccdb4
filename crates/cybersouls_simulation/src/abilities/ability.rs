//! Базовая state machine способности: cooldown + active
//!
//! Конкретные способности встраивают `Ability` и реализуют `Activatable`,
//! добавляя свои проверки ПОВЕРХ базовой (никогда вместо неё).

use bevy::prelude::*;

use crate::error::{AbilityError, AbilityResult};

/// Какая способность (для UI событий и логов)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AbilityKind {
    Slash,
    Attack,
    Hack,
    Dash,
    QuickHack(crate::quickhack::QuickHackType),
}

/// Cooldown/active state одной способности
///
/// Инварианты:
/// - 0 ≤ cooldown_remaining ≤ cooldown_duration
/// - активация только при cooldown_remaining ≤ 0 && !is_active && owner жив
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct Ability {
    pub cooldown_duration: f32,
    pub cooldown_remaining: f32,
    pub is_active: bool,
}

impl Ability {
    pub fn new(cooldown_duration: f32) -> Self {
        Self {
            cooldown_duration: cooldown_duration.max(0.0),
            cooldown_remaining: 0.0,
            is_active: false,
        }
    }

    pub fn can_activate(&self, owner_alive: bool) -> AbilityResult {
        if !owner_alive {
            return Err(AbilityError::OwnerDead);
        }
        if self.cooldown_remaining > 0.0 {
            return Err(AbilityError::OnCooldown {
                remaining: self.cooldown_remaining,
            });
        }
        if self.is_active {
            return Err(AbilityError::AlreadyActive);
        }
        Ok(())
    }

    /// No-op (Err) если нельзя; иначе active + полный cooldown
    pub fn activate(&mut self, owner_alive: bool) -> AbilityResult {
        self.can_activate(owner_alive)?;
        self.is_active = true;
        self.cooldown_remaining = self.cooldown_duration;
        Ok(())
    }

    pub fn deactivate(&mut self) {
        self.is_active = false;
    }

    /// Декремент cooldown (floor 0). true - cooldown закончился на этом тике.
    pub fn tick(&mut self, delta: f32) -> bool {
        if self.cooldown_remaining <= 0.0 {
            return false;
        }
        self.cooldown_remaining = (self.cooldown_remaining - delta).max(0.0);
        self.cooldown_remaining <= 0.0
    }

    pub fn is_ready(&self) -> bool {
        self.cooldown_remaining <= 0.0 && !self.is_active
    }
}

/// Capability: компонент содержит одну или несколько `Ability`
pub trait Activatable: Component<Mutability = bevy::ecs::component::Mutable> {
    /// Тикает все встроенные способности, возвращает те, что стали ready
    fn tick_cooldowns(&mut self, delta: f32) -> Vec<AbilityKind>;
}

/// Событие: cooldown способности истёк
#[derive(Event, Debug, Clone, PartialEq)]
pub struct AbilityReady {
    pub entity: Entity,
    pub ability: AbilityKind,
}

/// Система: тик cooldown'ов для любого `Activatable` компонента
///
/// Регистрируется по разу на тип способности (generic system).
pub fn tick_ability_cooldowns<T: Activatable>(
    mut query: Query<(Entity, &mut T)>,
    mut ready_events: EventWriter<AbilityReady>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (entity, mut component) in query.iter_mut() {
        for ability in component.tick_cooldowns(delta) {
            ready_events.write(AbilityReady { entity, ability });
        }
    }
}
