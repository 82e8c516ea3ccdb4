use bevy::prelude::*;

use super::body_part::BodyPart;

#[derive(Event, Debug, Clone, PartialEq)]
pub struct TargetChanged {
    pub observer: Entity,
    pub previous: Option<Entity>,
    pub current: Option<Entity>,
}

#[derive(Event, Debug, Clone, PartialEq)]
pub struct BodyPartChanged {
    pub observer: Entity,
    pub previous: BodyPart,
    pub current: BodyPart,
}

/// Intent: переключить target lock
#[derive(Event, Debug, Clone)]
pub struct TargetLockIntent {
    pub entity: Entity,
}

#[derive(Event, Debug, Clone, PartialEq)]
pub struct TargetLockChanged {
    pub observer: Entity,
    pub locked: Option<Entity>,
}
