//! Perception: видит ли враг игрока (дистанция + line of sight от глаз)

use bevy::prelude::*;

use super::events::{TargetLost, TargetSpotted};
use crate::attributes::StatusEffects;
use crate::components::{Dead, Enemy, Player};
use crate::environment::Environment;

/// Зрение врага
///
/// Пишет только `update_perception`; контроллеры читают.
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Perception {
    pub sight_range: f32,
    pub eye_height: f32,
    /// Не видит цели под GhostProtocol (хакеры)
    pub blind_to_ghosts: bool,
    pub target: Option<Entity>,
    pub can_see_target: bool,
    pub last_known_location: Option<Vec3>,
}

impl Default for Perception {
    fn default() -> Self {
        Self::new(2000.0, 80.0, false)
    }
}

impl Perception {
    pub fn new(sight_range: f32, eye_height: f32, blind_to_ghosts: bool) -> Self {
        Self {
            sight_range,
            eye_height,
            blind_to_ghosts,
            target: None,
            can_see_target: false,
            last_known_location: None,
        }
    }

    pub fn eye_position(&self, transform: &Transform) -> Vec3 {
        transform.translation + Vec3::Y * self.eye_height
    }

    /// Видна ли цель из `eye` (без учёта статусов)
    pub fn can_see(&self, eye: Vec3, target: Vec3, environment: &Environment) -> bool {
        eye.distance(target) <= self.sight_range && environment.has_line_of_sight(eye, target)
    }
}

/// Живой игрок с наименьшим id (симуляция однопользовательская)
pub fn find_player<'a>(
    players: impl IntoIterator<Item = (Entity, &'a Transform, &'a StatusEffects)>,
) -> Option<(Entity, &'a Transform, &'a StatusEffects)> {
    players.into_iter().min_by_key(|(entity, ..)| *entity)
}

/// Система: обновление зрения всех врагов
pub fn update_perception(
    mut observers: Query<(Entity, &Transform, &mut Perception), (With<Enemy>, Without<Dead>)>,
    players: Query<(Entity, &Transform, &StatusEffects), (With<Player>, Without<Enemy>, Without<Dead>)>,
    environment: Res<Environment>,
    mut spotted_events: EventWriter<TargetSpotted>,
    mut lost_events: EventWriter<TargetLost>,
) {
    let player = find_player(players.iter());

    for (observer, transform, mut perception) in observers.iter_mut() {
        let previous_target = perception.target;
        let was_visible = perception.can_see_target;

        let visible = player.filter(|(_, player_transform, status)| {
            if perception.blind_to_ghosts && status.is_invisible_to_hackers {
                return false;
            }
            perception.can_see(perception.eye_position(transform), player_transform.translation, &environment)
        });

        match visible {
            Some((player_entity, player_transform, _)) => {
                perception.target = Some(player_entity);
                perception.can_see_target = true;
                perception.last_known_location = Some(player_transform.translation);
                if !was_visible {
                    spotted_events.write(TargetSpotted {
                        observer,
                        target: player_entity,
                    });
                }
            }
            None => {
                perception.can_see_target = false;
                if player.is_none() {
                    perception.target = None;
                }
                if was_visible {
                    if let Some(target) = previous_target {
                        lost_events.write(TargetLost { observer, target });
                    }
                }
            }
        }
    }
}
