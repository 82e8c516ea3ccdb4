//! Attribute события (UI boundary + реакции AI/game mode)

use bevy::prelude::*;

/// Что именно наносится цели
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DamageKind {
    /// Урон по integrity
    Integrity(f32),
    /// Гарантированная смерть (Kill, CascadeVirus): integrity → 0
    Lethal,
    /// Прогресс взлома игрока
    HackProgress(f32),
}

/// Запрос на изменение атрибутов цели
///
/// Единственный путь внешних систем к EnemyAttributes/PlayerAttributes:
/// способности пишут запрос, `apply_damage_requests` применяет через методы компонентов.
#[derive(Event, Debug, Clone)]
pub struct DamageRequest {
    pub target: Entity,
    pub source: Option<Entity>,
    pub kind: DamageKind,
}

/// Событие: урон реально применён (значение изменилось)
#[derive(Event, Debug, Clone)]
pub struct DamageApplied {
    pub target: Entity,
    pub source: Option<Entity>,
    pub kind: DamageKind,
    pub target_died: bool,
}

#[derive(Event, Debug, Clone, PartialEq)]
pub struct IntegrityChanged {
    pub entity: Entity,
    pub previous: f32,
    pub current: f32,
    pub max: f32,
}

#[derive(Event, Debug, Clone, PartialEq)]
pub struct HackProgressChanged {
    pub entity: Entity,
    pub previous: f32,
    pub current: f32,
    pub max: f32,
}

#[derive(Event, Debug, Clone, PartialEq)]
pub struct StaminaChanged {
    pub entity: Entity,
    pub current: f32,
    pub max: f32,
}

/// Событие: актор умер (ровно один раз на актора)
#[derive(Event, Debug, Clone, PartialEq)]
pub struct ActorDied {
    pub entity: Entity,
    pub killer: Option<Entity>,
    /// Игрок умирает от взлома, враги - от потери integrity
    pub was_player: bool,
}
