use bevy::prelude::*;

use super::*;
use crate::components::{BodyExtent, Targetable};

fn extent() -> BodyExtent {
    BodyExtent {
        half_height: 100.0,
        radius: 40.0,
    }
}

#[test]
fn test_classify_upper_body() {
    let actor = Transform::from_xyz(0.0, 100.0, 0.0);
    let part = classify_hit(Vec3::new(0.0, 140.0, 0.0), &actor, &extent());
    assert_eq!(part, BodyPart::UpperBody);
}

#[test]
fn test_classify_legs_by_lateral_offset() {
    let actor = Transform::from_xyz(0.0, 100.0, 0.0);

    // Ровно на пороге 0.3 * half_height - ещё не UpperBody
    assert_eq!(classify_hit(Vec3::new(10.0, 130.0, 0.0), &actor, &extent()), BodyPart::RightLeg);
    assert_eq!(classify_hit(Vec3::new(-10.0, 60.0, 0.0), &actor, &extent()), BodyPart::LeftLeg);
    // lateral == 0 → LeftLeg
    assert_eq!(classify_hit(Vec3::new(0.0, 60.0, 0.0), &actor, &extent()), BodyPart::LeftLeg);
}

#[test]
fn test_classify_respects_actor_rotation() {
    // Актор развёрнут на 180° вокруг Y: его правая сторона - мировой -X
    let actor = Transform::from_xyz(0.0, 100.0, 0.0).with_rotation(Quat::from_rotation_y(std::f32::consts::PI));
    assert_eq!(classify_hit(Vec3::new(-10.0, 60.0, 0.0), &actor, &extent()), BodyPart::RightLeg);
}

#[test]
fn test_first_actor_hit_picks_nearest() {
    let observer = Entity::from_raw(1);
    let near = Entity::from_raw(2);
    let far = Entity::from_raw(3);
    let near_transform = Transform::from_xyz(0.0, 0.0, -500.0);
    let far_transform = Transform::from_xyz(0.0, 0.0, -1000.0);
    let body = extent();

    let hit = first_actor_hit(
        Vec3::new(0.0, 50.0, 0.0),
        Vec3::new(0.0, 50.0, -3000.0),
        observer,
        [
            (far, &far_transform, &body, None, true),
            (near, &near_transform, &body, None, true),
        ],
    )
    .expect("ray crosses both actors");

    assert_eq!(hit.entity, near);
    assert!(hit.targetable);
    assert_eq!(hit.body_part, BodyPart::UpperBody);
}

#[test]
fn test_non_targetable_actor_occludes() {
    let observer = Entity::from_raw(1);
    let blocker = Entity::from_raw(2);
    let enemy = Entity::from_raw(3);
    let blocker_transform = Transform::from_xyz(0.0, 0.0, -300.0);
    let enemy_transform = Transform::from_xyz(0.0, 0.0, -900.0);
    let body = extent();
    let disabled = Targetable { can_be_targeted: false };

    let hit = first_actor_hit(
        Vec3::ZERO,
        Vec3::new(0.0, 0.0, -3000.0),
        observer,
        [
            (blocker, &blocker_transform, &body, Some(&disabled), true),
            (enemy, &enemy_transform, &body, None, true),
        ],
    )
    .expect("blocker is struck first");

    assert_eq!(hit.entity, blocker);
    assert!(!hit.targetable);
}

#[test]
fn test_legacy_path_requires_enemy_role() {
    let observer = Entity::from_raw(1);
    let npc = Entity::from_raw(2);
    let npc_transform = Transform::from_xyz(0.0, 0.0, -300.0);
    let body = extent();

    let hit = first_actor_hit(
        Vec3::ZERO,
        Vec3::new(0.0, 0.0, -3000.0),
        observer,
        [(npc, &npc_transform, &body, None, false)],
    )
    .expect("ray crosses the actor");
    assert!(!hit.targetable);
}

#[test]
fn test_observer_is_ignored() {
    let observer = Entity::from_raw(1);
    let own_transform = Transform::from_xyz(0.0, 0.0, 0.0);
    let body = extent();

    let hit = first_actor_hit(
        Vec3::ZERO,
        Vec3::new(0.0, 0.0, -3000.0),
        observer,
        [(observer, &own_transform, &body, None, true)],
    );
    assert!(hit.is_none());
}

#[test]
fn test_target_lock_toggle() {
    let mut lock = TargetLock::new(2000.0);
    let target = Entity::from_raw(5);

    assert_eq!(lock.toggle(Some(target)), Some(target));
    assert!(lock.is_locked());
    // Повторное нажатие снимает lock
    assert_eq!(lock.toggle(Some(Entity::from_raw(6))), None);
    assert_eq!(lock.toggle(None), None);
    assert!(!lock.is_locked());
}
