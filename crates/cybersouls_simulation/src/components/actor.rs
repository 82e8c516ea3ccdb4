//! Роли акторов: Actor, Player, Enemy + capability-маркеры

use bevy::prelude::*;

use crate::archetype::EnemyArchetype;
use crate::attributes::StatusEffects;
use crate::components::{GravityScale, Grounded, Impulse, MovementCommand, NavigationState, Velocity};
use crate::quickhack::QuickHackMarks;

/// Актор - любая entity с позицией и набором capability-компонентов
///
/// Автоматически добавляет Transform, StatusEffects и movement state через Required Components.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
#[require(
    Transform,
    StatusEffects,
    BodyExtent,
    Velocity,
    Impulse,
    GravityScale,
    Grounded,
    MovementCommand,
    NavigationState,
    QuickHackMarks
)]
pub struct Actor;

/// Marker component для player-controlled entity
///
/// AI systems используют `Without<Player>` / `With<Enemy>`, input-события
/// адресуются entity с этим маркером.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
#[require(Actor)]
pub struct Player;

/// Враг конкретного архетипа (роль "enemy" для overlap/alert запросов)
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
#[require(Actor)]
pub struct Enemy {
    pub archetype: EnemyArchetype,
}

/// Capability "можно навести прицел"
///
/// Акторы без этого компонента, но с ролью Enemy, всё равно таргетятся
/// (legacy путь для старых архетипов).
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Targetable {
    pub can_be_targeted: bool,
}

impl Default for Targetable {
    fn default() -> Self {
        Self { can_be_targeted: true }
    }
}

/// Габариты тела (капсула вокруг Transform.translation)
///
/// `half_height` - от центра до макушки, используется для классификации body part.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct BodyExtent {
    pub half_height: f32,
    pub radius: f32,
}

impl Default for BodyExtent {
    fn default() -> Self {
        Self {
            half_height: 96.0,
            radius: 42.0,
        }
    }
}

/// Компонент-маркер: актор мёртв
///
/// Ставится ровно один раз вместе с `ActorDied`. Все entry points
/// (урон, способности, AI) проверяют его и становятся no-op.
/// Деспавн не автоматический - трупы остаются на месте.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Dead;
