//! AI события: зрение + оповещение союзников

use bevy::prelude::*;

/// Враг увидел цель (переход not visible → visible)
#[derive(Event, Debug, Clone, PartialEq)]
pub struct TargetSpotted {
    pub observer: Entity,
    pub target: Entity,
}

/// Враг потерял цель из виду
#[derive(Event, Debug, Clone, PartialEq)]
pub struct TargetLost {
    pub observer: Entity,
    pub target: Entity,
}

/// Что получает союзник от бродкаста
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum AlertKind {
    /// Получатель сам видит ту же цель: только обновить позицию
    LocationUpdate,
    /// Получатель цель не видит: флаг тревоги + позиция
    Alert,
}

/// Оповещение от союзника (доставляется в фазе Broadcast, читается в Decision)
#[derive(Event, Debug, Clone, PartialEq)]
pub struct AllyAlert {
    pub sender: Entity,
    pub recipient: Entity,
    pub target: Entity,
    pub location: Vec3,
    pub kind: AlertKind,
}
