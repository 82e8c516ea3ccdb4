use bevy::prelude::*;

use super::*;
use crate::components::Impulse;

#[test]
fn test_step_towards_clamps_to_goal() {
    let start = Vec3::new(0.0, 10.0, 0.0);

    let next = step_towards(start, Vec3::new(100.0, 0.0, 0.0), 30.0);
    assert_eq!(next, Vec3::new(30.0, 10.0, 0.0));

    // Шаг больше дистанции: ровно в цель, высота не меняется
    let next = step_towards(start, Vec3::new(10.0, 0.0, 0.0), 30.0);
    assert_eq!(next, Vec3::new(10.0, 10.0, 0.0));
}

#[test]
fn test_grounded_actor_stays_on_floor() {
    let mut translation = Vec3::ZERO;
    let mut velocity = Vec3::ZERO;
    let mut grounded = true;

    integrate_vertical(&mut translation, &mut velocity, 1.0, &mut grounded, 1.0 / 60.0);

    assert_eq!(translation, Vec3::ZERO);
    assert!(grounded);
}

#[test]
fn test_jump_lands_back_on_floor() {
    let mut translation = Vec3::ZERO;
    let mut velocity = Vec3::new(0.0, 700.0, 0.0);
    let mut grounded = false;

    integrate_vertical(&mut translation, &mut velocity, 1.0, &mut grounded, 1.0 / 60.0);
    assert!(translation.y > 0.0);
    assert!(!grounded);

    for _ in 0..180 {
        integrate_vertical(&mut translation, &mut velocity, 1.0, &mut grounded, 1.0 / 60.0);
    }
    assert_eq!(translation.y, 0.0);
    assert!(grounded);
}

#[test]
fn test_flipped_gravity_lifts_to_ceiling() {
    let mut translation = Vec3::ZERO;
    let mut velocity = Vec3::ZERO;
    let mut grounded = true;

    for _ in 0..300 {
        integrate_vertical(&mut translation, &mut velocity, -1.0, &mut grounded, 1.0 / 60.0);
    }

    assert!(!grounded);
    assert_eq!(translation.y, FLIPPED_CEILING);
}

#[test]
fn test_impulse_covers_exact_distance() {
    let mut impulse = Impulse::over_distance(Vec3::X, 1000.0, 0.2);
    let mut travelled = Vec3::ZERO;

    for _ in 0..20 {
        travelled += impulse.step(1.0 / 60.0);
    }

    assert!(!impulse.is_active());
    assert!((travelled.x - 1000.0).abs() < 1e-2);
}
