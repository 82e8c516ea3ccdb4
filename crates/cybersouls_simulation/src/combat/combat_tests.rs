use bevy::prelude::*;

use super::*;
use crate::config::{AttackStats, HackStats};
use crate::error::AbilityError;
use crate::targeting::BodyPart;

#[test]
fn test_charge_consume_until_empty() {
    let mut charges = ChargeResource::new(2, None);

    assert!(charges.consume().is_ok());
    assert!(charges.consume().is_ok());
    assert_eq!(charges.consume(), Err(AbilityError::NoCharges));
    assert_eq!(charges.current, 0);
}

#[test]
fn test_charge_regen_grants_one_per_period() {
    let mut charges = ChargeResource::new(3, Some(1.5));
    charges.consume().unwrap();
    charges.consume().unwrap();

    assert!(!charges.tick_regen(1.0, true));
    assert!(charges.tick_regen(0.5, true));
    assert_eq!(charges.current, 2);

    // Таймер сбрасывается после выдачи заряда
    assert!(!charges.tick_regen(1.0, true));
    assert_eq!(charges.current, 2);
}

#[test]
fn test_charge_regen_requires_prerequisite() {
    let mut charges = ChargeResource::new(2, Some(1.0));
    charges.consume().unwrap();

    assert!(!charges.tick_regen(5.0, false));
    assert_eq!(charges.current, 1);
    assert_eq!(charges.regen_timer, 0.0);
}

#[test]
fn test_charge_regen_resets_on_use() {
    let mut charges = ChargeResource::new(3, Some(1.0));
    charges.consume().unwrap();
    charges.tick_regen(0.8, true);

    charges.consume().unwrap();
    assert_eq!(charges.regen_timer, 0.0);
    assert!(!charges.tick_regen(0.8, true));
}

#[test]
fn test_charge_drain() {
    let mut charges = ChargeResource::new(3, None);
    charges.drain();
    assert!(!charges.has_charge());
}

#[test]
fn test_block_accepts_upper_body_only() {
    let mut block = BlockAbility::new(3, None);

    assert_eq!(block.try_block(BodyPart::LeftLeg, true), Err(AbilityError::NotAvailable));
    assert_eq!(block.charges.current, 3);

    assert!(block.try_block(BodyPart::UpperBody, true).is_ok());
    assert_eq!(block.charges.current, 2);

    assert_eq!(block.try_block(BodyPart::UpperBody, false), Err(AbilityError::OwnerDead));
    assert_eq!(block.charges.current, 2);
}

#[test]
fn test_block_charge_exhaustion() {
    let mut block = BlockAbility::new(3, None);

    for _ in 0..3 {
        assert!(block.try_block(BodyPart::UpperBody, true).is_ok());
    }
    assert_eq!(block.try_block(BodyPart::UpperBody, true), Err(AbilityError::NoCharges));
}

#[test]
fn test_dodge_accepts_legs() {
    let mut dodge = DodgeAbility::new(3, None, 800.0, 300.0);

    assert_eq!(dodge.try_dodge(BodyPart::UpperBody, true), Err(AbilityError::NotAvailable));
    assert!(dodge.try_dodge(BodyPart::LeftLeg, true).is_ok());
    assert!(dodge.try_dodge(BodyPart::RightLeg, true).is_ok());
    assert_eq!(dodge.charges.current, 1);
}

#[test]
fn test_dodge_impulse_away_from_attacker() {
    let dodge = DodgeAbility::new(3, None, 800.0, 300.0);
    let owner = Transform::from_xyz(100.0, 0.0, 0.0);

    let impulse = dodge.impulse(&owner, Some(Vec3::new(0.0, 50.0, 0.0)));
    assert!((impulse - Vec3::new(800.0, 0.0, 0.0)).length() < 1e-3);

    // Без атакующего - назад (+Z для identity rotation)
    let impulse = dodge.impulse(&owner, None);
    assert!((impulse - Vec3::new(0.0, 0.0, 800.0)).length() < 1e-3);
}

#[test]
fn test_execution_chains_window() {
    let mut chains = ExecutionChains::new(5.0);
    assert!(!chains.is_active());

    chains.open();
    chains.tick(4.9);
    assert!(chains.is_active());
    chains.tick(0.2);
    assert!(!chains.is_active());
}

#[test]
fn test_attack_range_check() {
    let attack = AttackAbility::new(&AttackStats::default());

    assert!(attack.in_range(Vec3::ZERO, Vec3::new(300.0, 0.0, 0.0)));
    assert!(!attack.in_range(Vec3::ZERO, Vec3::new(301.0, 0.0, 0.0)));
}

#[test]
fn test_hack_start_stop() {
    let mut hack = HackAbility::new(&HackStats::default());
    let target = Entity::from_raw(1);

    assert!(hack.start(target, true).is_ok());
    assert!(hack.is_hacking());
    // Повторный старт по той же цели - без ошибки
    assert!(hack.start(target, true).is_ok());

    hack.stop();
    assert!(!hack.is_hacking());
    assert_eq!(hack.target, None);

    assert_eq!(hack.start(target, false), Err(AbilityError::OwnerDead));
    assert!(!hack.is_hacking());
}
