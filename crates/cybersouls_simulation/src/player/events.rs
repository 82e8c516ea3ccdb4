//! Player movement events

use bevy::prelude::*;

/// Намерение сделать рывок (input)
///
/// `direction` - горизонтальное направление; None или нулевой вектор → вперёд по Transform.
#[derive(Event, Debug, Clone)]
pub struct DashIntent {
    pub entity: Entity,
    pub direction: Option<Vec3>,
}

/// Намерение прыгнуть (input). В воздухе - двойной прыжок.
#[derive(Event, Debug, Clone)]
pub struct JumpIntent {
    pub entity: Entity,
}

#[derive(Event, Debug, Clone, PartialEq)]
pub struct DashPerformed {
    pub entity: Entity,
    pub charges_left: u32,
}

#[derive(Event, Debug, Clone, PartialEq)]
pub struct Jumped {
    pub entity: Entity,
    pub air_jump: bool,
}
