//! QuickHack события: intents (вход) + жизненный цикл каста (UI boundary)

use bevy::prelude::*;

use super::types::QuickHackType;

/// Intent: начать QuickHack по типу (AI и скрипты)
///
/// `target: None` допустим для self-targeted хаков и InterruptProtocol
/// (цель ищется автоматически - ближайший кастующий).
#[derive(Event, Debug, Clone)]
pub struct QuickHackIntent {
    pub caster: Entity,
    pub hack_type: QuickHackType,
    pub target: Option<Entity>,
}

/// Intent: активировать слот игрока (1-based)
#[derive(Event, Debug, Clone)]
pub struct QuickHackSlotIntent {
    pub caster: Entity,
    pub slot: usize,
    pub target: Option<Entity>,
}

/// Intent: отменить каст в слоте
#[derive(Event, Debug, Clone)]
pub struct QuickHackCancelIntent {
    pub caster: Entity,
    pub slot: usize,
}

#[derive(Event, Debug, Clone, PartialEq)]
pub struct QuickHackStarted {
    pub caster: Entity,
    pub target: Entity,
    pub hack_type: QuickHackType,
    pub cast_time: f32,
}

/// Прогресс каста (каждый тик, пока идёт каст)
#[derive(Event, Debug, Clone, PartialEq)]
pub struct CastProgress {
    pub caster: Entity,
    pub hack_type: QuickHackType,
    pub elapsed: f32,
    pub total: f32,
}

/// Каст завершён - эффект применяется в этом же тике
#[derive(Event, Debug, Clone, PartialEq)]
pub struct QuickHackCompleted {
    pub caster: Entity,
    pub target: Entity,
    pub hack_type: QuickHackType,
    pub effect_duration: f32,
}

/// Каст прерван (смерть кастера, InterruptProtocol, отмена слота)
#[derive(Event, Debug, Clone, PartialEq)]
pub struct QuickHackInterrupted {
    pub caster: Entity,
    pub hack_type: QuickHackType,
    pub target: Option<Entity>,
}

/// Эффект отклонён Firewall'ом цели
#[derive(Event, Debug, Clone, PartialEq)]
pub struct QuickHackResisted {
    pub caster: Entity,
    pub target: Entity,
    pub hack_type: QuickHackType,
}
