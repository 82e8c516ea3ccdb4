//! Tests for actor components.

use bevy::prelude::*;

use crate::archetype::EnemyArchetype;
use crate::attributes::StatusEffects;
use crate::components::*;

#[test]
fn test_enemy_requires_actor_components() {
    let mut world = World::new();
    let entity = world
        .spawn(Enemy { archetype: EnemyArchetype::Basic })
        .id();

    // Required components добавились автоматически
    assert!(world.get::<Actor>(entity).is_some());
    assert!(world.get::<StatusEffects>(entity).is_some());
    assert!(world.get::<Transform>(entity).is_some());
    assert_eq!(world.get::<GravityScale>(entity), Some(&GravityScale(1.0)));
    assert_eq!(world.get::<MovementCommand>(entity), Some(&MovementCommand::Idle));
}

#[test]
fn test_targetable_default_enabled() {
    assert!(Targetable::default().can_be_targeted);
}

#[test]
fn test_movement_command_in_flight() {
    let target = Entity::PLACEHOLDER;
    let command = MovementCommand::FollowEntity { target, acceptance_radius: 50.0 };

    assert!(command.is_following(target));
    assert!(command.is_moving());
    assert!(!MovementCommand::Stop.is_moving());
}
