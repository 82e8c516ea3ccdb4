//! Горизонтальное движение: MovementCommand + Impulse

use bevy::prelude::*;
use std::collections::HashMap;

use crate::attributes::StatusEffects;
use crate::components::{Dead, Impulse, MovementCommand, MovementSpeed, NavigationState};

/// Шаг по горизонтали к `goal`, не дальше `max_step`.
/// Возвращает новую позицию (y не меняется).
pub fn step_towards(position: Vec3, goal: Vec3, max_step: f32) -> Vec3 {
    let offset = Vec3::new(goal.x - position.x, 0.0, goal.z - position.z);
    let distance = offset.length();
    if distance <= max_step || distance <= f32::EPSILON {
        return Vec3::new(goal.x, position.y, goal.z);
    }
    position + offset / distance * max_step
}

fn horizontal_distance(a: Vec3, b: Vec3) -> f32 {
    Vec2::new(a.x - b.x, a.z - b.z).length()
}

/// Система: исполнение команд движения
///
/// NavigationState.is_target_reached сбрасывается при смене команды и
/// выставляется когда актор в acceptance_radius от цели.
pub fn execute_movement_commands(
    mut actors: Query<
        (
            Entity,
            &mut Transform,
            &MovementCommand,
            &mut NavigationState,
            &mut Impulse,
            &StatusEffects,
            Option<&MovementSpeed>,
        ),
        Without<Dead>,
    >,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    // Снимок позиций для FollowEntity (цель может быть в том же query)
    let positions: HashMap<Entity, Vec3> = actors
        .iter()
        .map(|(entity, transform, ..)| (entity, transform.translation))
        .collect();

    for (entity, mut transform, command, mut navigation, mut impulse, status, speed) in actors.iter_mut() {
        if navigation.last_command.as_ref() != Some(command) {
            navigation.is_target_reached = false;
            navigation.last_command = Some(command.clone());
        }

        if impulse.is_active() {
            let offset = impulse.step(delta);
            transform.translation += Vec3::new(offset.x, 0.0, offset.z);
            continue;
        }

        if status.is_immobilized {
            continue;
        }

        let (goal, acceptance_radius) = match *command {
            MovementCommand::MoveToPosition {
                target,
                acceptance_radius,
            } => (target, acceptance_radius),
            MovementCommand::FollowEntity {
                target,
                acceptance_radius,
            } => {
                let Some(position) = positions.get(&target) else {
                    continue;
                };
                (*position, acceptance_radius)
            }
            MovementCommand::Idle | MovementCommand::Stop => continue,
        };

        let distance = horizontal_distance(transform.translation, goal);
        if distance <= acceptance_radius {
            if !navigation.is_target_reached {
                navigation.is_target_reached = true;
                crate::log(&format!("🎯 {:?} reached movement target", entity));
            }
            continue;
        }
        navigation.is_target_reached = false;

        let speed = speed.map_or(MovementSpeed::default().speed, |speed| speed.speed);
        let max_step = (speed * delta).min(distance - acceptance_radius);
        let next = step_towards(transform.translation, goal, max_step);

        let flat_goal = Vec3::new(goal.x, next.y, goal.z);
        if flat_goal.distance_squared(next) > f32::EPSILON {
            transform.look_at(flat_goal, Vec3::Y);
        }
        transform.translation = next;

        if horizontal_distance(next, goal) <= acceptance_radius + 1e-3 {
            navigation.is_target_reached = true;
            crate::log(&format!("🎯 {:?} reached movement target", entity));
        }
    }
}
