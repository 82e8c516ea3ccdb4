//! Цель под прицелом: трассировка CrosshairRay → актор → часть тела
//!
//! `CrosshairRay` пишет внешний слой камеры/ввода. Статическая геометрия
//! из `Environment` обрезает луч, первый задетый актор - кандидат в цели.

use bevy::prelude::*;

use super::body_part::{classify_hit, BodyPart};
use super::events::{BodyPartChanged, TargetChanged};
use crate::components::{BodyExtent, Dead, Enemy, Targetable};
use crate::environment::{ray_capsule_hit, Environment};

/// Луч прицела (world space)
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct CrosshairRay {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Default for CrosshairRay {
    fn default() -> Self {
        Self {
            origin: Vec3::ZERO,
            direction: Vec3::NEG_Z,
        }
    }
}

/// Текущая цель наблюдателя (игрока)
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
#[require(CrosshairRay)]
pub struct Targeting {
    pub max_range: f32,
    pub current_target: Option<Entity>,
    pub current_body_part: BodyPart,
}

impl Targeting {
    pub fn new(max_range: f32) -> Self {
        Self {
            max_range,
            current_target: None,
            current_body_part: BodyPart::None,
        }
    }
}

impl Default for Targeting {
    fn default() -> Self {
        Self::new(5000.0)
    }
}

/// Первый актор на луче
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrosshairHit {
    pub entity: Entity,
    pub point: Vec3,
    pub body_part: BodyPart,
    /// Может ли стать целью (Targetable или legacy Enemy)
    pub targetable: bool,
}

/// Трассирует луч по акторам; геометрия мира уже учтена в `end`
pub fn first_actor_hit<'a>(
    origin: Vec3,
    end: Vec3,
    observer: Entity,
    actors: impl IntoIterator<Item = (Entity, &'a Transform, &'a BodyExtent, Option<&'a Targetable>, bool)>,
) -> Option<CrosshairHit> {
    let delta = end - origin;

    actors
        .into_iter()
        .filter(|(entity, ..)| *entity != observer)
        .filter_map(|(entity, transform, extent, targetable, is_enemy)| {
            let (t, point) = ray_capsule_hit(origin, delta, transform.translation, extent.half_height, extent.radius)?;
            let targetable = match targetable {
                Some(targetable) => targetable.can_be_targeted,
                None => is_enemy,
            };
            Some((
                t,
                CrosshairHit {
                    entity,
                    point,
                    body_part: classify_hit(point, transform, extent),
                    targetable,
                },
            ))
        })
        .min_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.entity.cmp(&b.1.entity)))
        .map(|(_, hit)| hit)
}

/// Система: обновление цели под прицелом
///
/// TargetChanged / BodyPartChanged - только при реальном изменении.
pub fn update_crosshair_targets(
    mut observers: Query<(Entity, &CrosshairRay, &mut Targeting), Without<Dead>>,
    actors: Query<(Entity, &Transform, &BodyExtent, Option<&Targetable>, Has<Enemy>), Without<Dead>>,
    environment: Res<Environment>,
    mut target_events: EventWriter<TargetChanged>,
    mut part_events: EventWriter<BodyPartChanged>,
) {
    for (observer, ray, mut targeting) in observers.iter_mut() {
        let direction = ray.direction.normalize_or_zero();
        let hit = if direction == Vec3::ZERO {
            None
        } else {
            let far = ray.origin + direction * targeting.max_range;
            // Стена обрезает луч
            let end = environment.line_trace(ray.origin, far).unwrap_or(far);
            first_actor_hit(ray.origin, end, observer, actors.iter())
        };

        let (target, body_part) = match hit {
            Some(hit) if hit.targetable => (Some(hit.entity), hit.body_part),
            _ => (None, BodyPart::None),
        };

        if targeting.current_target != target {
            let previous = targeting.current_target;
            targeting.current_target = target;
            target_events.write(TargetChanged {
                observer,
                previous,
                current: target,
            });
        }

        if targeting.current_body_part != body_part {
            let previous = targeting.current_body_part;
            targeting.current_body_part = body_part;
            part_events.write(BodyPartChanged {
                observer,
                previous,
                current: body_part,
            });
        }
    }
}
