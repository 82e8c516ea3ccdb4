//! Combat события: intents от input/AI + результаты резолва

use bevy::prelude::*;

use crate::targeting::BodyPart;

/// Intent: игрок бьёт Slash
#[derive(Event, Debug, Clone)]
pub struct SlashIntent {
    pub attacker: Entity,
}

/// Intent: враг атакует в ближнем бою
#[derive(Event, Debug, Clone)]
pub struct AttackIntent {
    pub attacker: Entity,
    pub target: Entity,
}

/// Intent: начать (Some) или остановить (None) непрерывный взлом
#[derive(Event, Debug, Clone)]
pub struct HackIntent {
    pub hacker: Entity,
    pub target: Option<Entity>,
}

#[derive(Event, Debug, Clone, PartialEq)]
pub struct SlashBlocked {
    pub attacker: Entity,
    pub defender: Entity,
    pub body_part: BodyPart,
}

#[derive(Event, Debug, Clone, PartialEq)]
pub struct SlashDodged {
    pub attacker: Entity,
    pub defender: Entity,
    pub body_part: BodyPart,
}

#[derive(Event, Debug, Clone, PartialEq)]
pub struct SlashHit {
    pub attacker: Entity,
    pub defender: Entity,
    pub body_part: BodyPart,
    pub damage: f32,
}

/// Атака врага достигла игрока
#[derive(Event, Debug, Clone, PartialEq)]
pub struct AttackLanded {
    pub attacker: Entity,
    pub target: Entity,
    pub damage: f32,
}
