//! Части тела и классификация точки попадания

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::components::BodyExtent;

/// Доля half_height над центром, выше которой попадание = UpperBody
pub const UPPER_BODY_THRESHOLD: f32 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect, Serialize, Deserialize)]
pub enum BodyPart {
    #[default]
    None,
    UpperBody,
    LeftLeg,
    RightLeg,
}

/// Классифицирует точку попадания в локальном пространстве актора (Y-up, +X - вправо)
pub fn classify_hit(hit_point: Vec3, actor: &Transform, extent: &BodyExtent) -> BodyPart {
    let local = actor.rotation.inverse() * (hit_point - actor.translation);

    if local.y > UPPER_BODY_THRESHOLD * extent.half_height {
        BodyPart::UpperBody
    } else if local.x > 0.0 {
        BodyPart::RightLeg
    } else {
        BodyPart::LeftLeg
    }
}
