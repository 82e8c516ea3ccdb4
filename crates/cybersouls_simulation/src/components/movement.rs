//! Movement компоненты: команды перемещения, скорость, импульсы, гравитация

use bevy::prelude::*;

/// Команда движения для актора (high-level intent от AI)
///
/// Архитектура:
/// - AI система пишет MovementCommand
/// - executor (`crate::movement`) или внешняя навигация исполняет её
/// - по достижении цели NavigationState.is_target_reached = true
#[derive(Component, Debug, Clone, PartialEq, Default, Reflect)]
#[reflect(Component)]
pub enum MovementCommand {
    /// Стоять на месте
    #[default]
    Idle,
    /// Двигаться к позиции (world coordinates)
    MoveToPosition { target: Vec3, acceptance_radius: f32 },
    /// Следовать за entity
    FollowEntity { target: Entity, acceptance_radius: f32 },
    /// Остановиться немедленно (сбросить velocity)
    Stop,
}

impl MovementCommand {
    /// Команда уже "в полёте" (не нужно перевыпускать такой же запрос)
    pub fn is_following(&self, entity: Entity) -> bool {
        matches!(self, MovementCommand::FollowEntity { target, .. } if *target == entity)
    }

    pub fn is_moving(&self) -> bool {
        matches!(
            self,
            MovementCommand::MoveToPosition { .. } | MovementCommand::FollowEntity { .. }
        )
    }
}

/// Состояние навигации актора
///
/// Флаг is_target_reached трекает ПЕРЕХОД unreached → reached и
/// сбрасывается executor'ом при смене команды.
#[derive(Component, Default, Clone, Debug, Reflect)]
#[reflect(Component)]
pub struct NavigationState {
    pub is_target_reached: bool,
    /// Последняя исполненная команда (детект смены цели)
    pub last_command: Option<MovementCommand>,
}

/// Скорость движения актора (см/сек)
#[derive(Component, Clone, Copy, Debug, Reflect)]
#[reflect(Component)]
pub struct MovementSpeed {
    pub speed: f32,
}

impl Default for MovementSpeed {
    fn default() -> Self {
        Self { speed: 400.0 }
    }
}

/// Вертикальная скорость (прыжки, гравитация). Горизонталь - через `Impulse`.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Velocity(pub Vec3);

/// Горизонтальный импульс (dodge, dash): постоянная скорость на `remaining` секунд
///
/// Пока импульс активен, executor игнорирует MovementCommand.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Impulse {
    pub velocity: Vec3,
    pub remaining: f32,
}

impl Impulse {
    pub fn timed(velocity: Vec3, duration: f32) -> Self {
        Self {
            velocity,
            remaining: duration.max(0.0),
        }
    }

    /// Импульс, проходящий `distance` за `duration`
    pub fn over_distance(direction: Vec3, distance: f32, duration: f32) -> Self {
        if duration <= 0.0 {
            return Self::default();
        }
        Self::timed(direction.normalize_or_zero() * (distance / duration), duration)
    }

    pub fn is_active(&self) -> bool {
        self.remaining > 0.0
    }

    /// Смещение за тик (обрезается по остатку времени)
    pub fn step(&mut self, delta: f32) -> Vec3 {
        if !self.is_active() {
            return Vec3::ZERO;
        }
        let dt = delta.min(self.remaining);
        self.remaining -= dt;
        if self.remaining <= 0.0 {
            self.remaining = 0.0;
        }
        self.velocity * dt
    }
}

/// Множитель гравитации (GravityFlip инвертирует знак)
#[derive(Component, Clone, Copy, Debug, PartialEq, Reflect)]
#[reflect(Component)]
pub struct GravityScale(pub f32);

impl Default for GravityScale {
    fn default() -> Self {
        Self(1.0)
    }
}

/// Стоит ли актор на земле (условие регенерации зарядов dash, сброс прыжков)
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct Grounded(pub bool);

impl Default for Grounded {
    fn default() -> Self {
        Self(true)
    }
}
