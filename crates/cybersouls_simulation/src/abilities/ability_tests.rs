//! Tests for the base ability state machine.

use crate::abilities::Ability;
use crate::error::AbilityError;

#[test]
fn test_activate_sets_active_and_full_cooldown() {
    let mut ability = Ability::new(2.0);

    assert!(ability.activate(true).is_ok());
    assert!(ability.is_active);
    assert_eq!(ability.cooldown_remaining, 2.0);
}

#[test]
fn test_rejected_activation_leaves_state_unchanged() {
    let mut ability = Ability::new(2.0);
    ability.activate(true).unwrap();
    ability.deactivate();
    let before = ability;

    // Cooldown > 0 → no-op
    assert_eq!(
        ability.activate(true),
        Err(AbilityError::OnCooldown { remaining: 2.0 })
    );
    assert_eq!(ability, before);
}

#[test]
fn test_active_ability_cannot_reactivate() {
    let mut ability = Ability::new(0.0);
    ability.activate(true).unwrap();

    assert_eq!(ability.activate(true), Err(AbilityError::AlreadyActive));
    assert!(ability.is_active);
}

#[test]
fn test_dead_owner_cannot_activate() {
    let mut ability = Ability::new(1.0);
    assert_eq!(ability.activate(false), Err(AbilityError::OwnerDead));
    assert!(!ability.is_active);
    assert_eq!(ability.cooldown_remaining, 0.0);
}

#[test]
fn test_cooldown_decays_and_floors_at_zero() {
    let mut ability = Ability::new(1.0);
    ability.activate(true).unwrap();
    ability.deactivate();

    assert!(!ability.tick(0.25));
    assert_eq!(ability.cooldown_remaining, 0.75);

    // Перелёт через 0 → floor, сигнал ready ровно один раз
    assert!(ability.tick(5.0));
    assert_eq!(ability.cooldown_remaining, 0.0);
    assert!(!ability.tick(5.0));
    assert!(ability.is_ready());
}

#[test]
fn test_deactivate_is_unconditional() {
    let mut ability = Ability::new(1.0);
    ability.deactivate();
    assert!(!ability.is_active);

    ability.activate(true).unwrap();
    ability.deactivate();
    ability.deactivate();
    assert!(!ability.is_active);
}
