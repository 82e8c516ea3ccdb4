use bevy::prelude::*;

use super::*;
use crate::abilities::{AbilityKind, Activatable};
use crate::attributes::{Stamina, StatusEffects};
use crate::error::AbilityError;

#[test]
fn test_dash_consumes_charge_and_stamina() {
    let mut dash = DashAbility::default();
    let mut stamina = Stamina::default();
    let status = StatusEffects::default();

    let impulse = dash.perform(Vec3::X, true, true, &status, &mut stamina).unwrap();

    assert_eq!(dash.charges.current, 1);
    assert_eq!(stamina.current, 75.0);
    assert!(dash.ability.is_active);
    assert!((impulse.velocity - Vec3::new(5000.0, 0.0, 0.0)).length() < 1e-2);
    assert!((impulse.remaining - 0.2).abs() < 1e-6);
}

#[test]
fn test_dash_cooldown_and_active_window() {
    let mut dash = DashAbility::default();
    let mut stamina = Stamina::default();
    let status = StatusEffects::default();
    dash.perform(Vec3::X, true, true, &status, &mut stamina).unwrap();

    assert!(matches!(
        dash.perform(Vec3::X, true, true, &status, &mut stamina),
        Err(AbilityError::OnCooldown { .. })
    ));

    assert!(dash.tick_cooldowns(0.25).is_empty());
    assert!(!dash.ability.is_active);
    assert_eq!(dash.tick_cooldowns(0.25), vec![AbilityKind::Dash]);

    dash.perform(Vec3::X, true, true, &status, &mut stamina).unwrap();
    assert_eq!(dash.charges.current, 0);
}

#[test]
fn test_dash_without_charges_or_stamina() {
    let mut dash = DashAbility::default();
    let status = StatusEffects::default();

    let mut tired = Stamina::default();
    tired.use_stamina(90.0);
    assert!(matches!(
        dash.perform(Vec3::X, true, true, &status, &mut tired),
        Err(AbilityError::InsufficientStamina { .. })
    ));
    assert_eq!(dash.charges.current, 2);

    let mut stamina = Stamina::default();
    dash.charges.drain();
    assert_eq!(
        dash.perform(Vec3::X, true, true, &status, &mut stamina).unwrap_err(),
        AbilityError::NoCharges
    );
    assert_eq!(stamina.current, 100.0);
}

#[test]
fn test_dash_blocked_when_frozen() {
    let dash = DashAbility::default();
    let stamina = Stamina::default();
    let mut frozen = StatusEffects::default();
    frozen.is_immobilized = true;

    assert_eq!(
        dash.can_dash(true, true, &frozen, &stamina),
        Err(AbilityError::NotAvailable)
    );
}

#[test]
fn test_dash_charges_regenerate_only_grounded() {
    let mut dash = DashAbility::default();
    dash.charges.consume().unwrap();

    assert!(!dash.charges.tick_regen(2.0, false));
    assert_eq!(dash.charges.current, 1);

    assert!(!dash.charges.tick_regen(1.0, true));
    assert!(dash.charges.tick_regen(0.5, true));
    assert_eq!(dash.charges.current, 2);
}

#[test]
fn test_ground_jump_is_free() {
    let mut jump = DoubleJump::default();
    let mut stamina = Stamina::default();
    let status = StatusEffects::default();

    let outcome = jump.jump(true, true, &status, &mut stamina).unwrap();

    assert_eq!(outcome, JumpOutcome { velocity: 700.0, air_jump: false });
    assert_eq!(stamina.current, 100.0);
    assert_eq!(jump.air_jumps_used, 0);
}

#[test]
fn test_double_jump_limited_until_landing() {
    let mut jump = DoubleJump::default();
    let mut stamina = Stamina::default();
    let status = StatusEffects::default();

    let outcome = jump.jump(true, false, &status, &mut stamina).unwrap();
    assert_eq!(outcome, JumpOutcome { velocity: 600.0, air_jump: true });
    assert_eq!(stamina.current, 80.0);

    assert_eq!(
        jump.jump(true, false, &status, &mut stamina).unwrap_err(),
        AbilityError::NoCharges
    );

    jump.land();
    assert!(jump.jump(true, false, &status, &mut stamina).is_ok());
}

#[test]
fn test_dead_player_cannot_jump() {
    let mut jump = DoubleJump::default();
    let mut stamina = Stamina::default();

    assert_eq!(
        jump.jump(false, true, &StatusEffects::default(), &mut stamina).unwrap_err(),
        AbilityError::OwnerDead
    );
}
