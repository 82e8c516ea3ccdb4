//! Combat integration: Slash / Block / Dodge / Hack через полный SimulationPlugin
//!
//! Игрок в начале координат смотрит вдоль -Z, враги на дистанции удара.
//! Тики шагаются вручную (`step_simulation`), без wall clock.

use bevy::prelude::*;
use cybersouls_simulation::attributes::{
    ActorDied, DamageKind, DamageRequest, EnemyAttributes, HackProgressChanged, PlayerAttributes, StatusEffects,
};
use cybersouls_simulation::combat::{BlockAbility, DodgeAbility, SlashBlocked, SlashDodged, SlashHit, SlashIntent};
use cybersouls_simulation::targeting::{BodyPart, CrosshairRay, Targeting};
use cybersouls_simulation::*;

const DT: f32 = 1.0 / 60.0;
/// Чуть больше cooldown Slash (0.5s)
const SLASH_COOLDOWN_TICKS: u32 = 31;

fn event_count<E: Event>(app: &App) -> usize {
    app.world().resource::<Events<E>>().len()
}

fn step(app: &mut App, ticks: u32) {
    for _ in 0..ticks {
        step_simulation(app, DT);
    }
}

/// Прицел игрока: высота луча задаёт часть тела (выше 0.3 * half_height - корпус)
fn aim(app: &mut App, player: Entity, height: f32) {
    if let Some(mut ray) = app.world_mut().get_mut::<CrosshairRay>(player) {
        ray.origin = Vec3::new(0.0, height, 0.0);
        ray.direction = Vec3::NEG_Z;
    }
}

fn slash(app: &mut App, player: Entity) {
    app.world_mut().send_event(SlashIntent { attacker: player });
    step_simulation(app, DT);
}

#[test]
fn test_lethal_slash_kills_once() {
    let mut config = SimulationConfig::default();
    config.enemies.basic.max_integrity = 10.0;
    let mut app = create_headless_app_with_config(config);

    let player = spawn_player_now(&mut app, Transform::default());
    let enemy = spawn_enemy_now(&mut app, EnemyArchetype::Basic, Transform::from_xyz(0.0, 0.0, -150.0));
    aim(&mut app, player, 60.0);

    slash(&mut app, player);

    let attributes = app.world().get::<EnemyAttributes>(enemy).unwrap();
    assert_eq!(attributes.integrity, 0.0);
    assert!(app.world().get::<Dead>(enemy).is_some());
    assert_eq!(event_count::<ActorDied>(&app), 1);

    // Повторный удар по мёртвому: без второй смерти
    step(&mut app, SLASH_COOLDOWN_TICKS);
    slash(&mut app, player);
    assert_eq!(event_count::<ActorDied>(&app), 1);
}

#[test]
fn test_crosshair_reports_body_part() {
    let mut app = create_headless_app(1);
    let player = spawn_player_now(&mut app, Transform::default());
    let enemy = spawn_enemy_now(&mut app, EnemyArchetype::Block, Transform::from_xyz(0.0, 0.0, -150.0));

    aim(&mut app, player, 60.0);
    step(&mut app, 1);
    let targeting = *app.world().get::<Targeting>(player).unwrap();
    assert_eq!(targeting.current_target, Some(enemy));
    assert_eq!(targeting.current_body_part, BodyPart::UpperBody);

    aim(&mut app, player, 0.0);
    step(&mut app, 1);
    let targeting = *app.world().get::<Targeting>(player).unwrap();
    assert!(matches!(
        targeting.current_body_part,
        BodyPart::LeftLeg | BodyPart::RightLeg
    ));
}

#[test]
fn test_block_takes_precedence_over_dodge() {
    let mut app = create_headless_app(2);
    let player = spawn_player_now(&mut app, Transform::default());
    let enemy = spawn_enemy_now(&mut app, EnemyArchetype::Block, Transform::from_xyz(0.0, 0.0, -150.0));

    // Dodge, принимающий тот же корпус: решает порядок проверок
    let mut dodge = DodgeAbility::new(3, None, 800.0, 300.0);
    dodge.accepted_parts = vec![BodyPart::UpperBody];
    app.world_mut().entity_mut(enemy).insert(dodge);

    aim(&mut app, player, 60.0);
    slash(&mut app, player);

    assert_eq!(event_count::<SlashBlocked>(&app), 1);
    assert_eq!(event_count::<SlashDodged>(&app), 0);
    assert_eq!(event_count::<SlashHit>(&app), 0);
    assert_eq!(app.world().get::<BlockAbility>(enemy).unwrap().charges.current, 2);
    assert_eq!(app.world().get::<DodgeAbility>(enemy).unwrap().charges.current, 3);
    assert_eq!(app.world().get::<EnemyAttributes>(enemy).unwrap().integrity, 100.0);
}

#[test]
fn test_block_charges_exhaust() {
    let mut app = create_headless_app(3);
    let player = spawn_player_now(&mut app, Transform::default());
    let enemy = spawn_enemy_now(&mut app, EnemyArchetype::Block, Transform::from_xyz(0.0, 0.0, -150.0));
    aim(&mut app, player, 60.0);

    for _ in 0..4 {
        slash(&mut app, player);
        step(&mut app, SLASH_COOLDOWN_TICKS);
    }

    assert_eq!(event_count::<SlashBlocked>(&app), 3);
    assert_eq!(event_count::<SlashHit>(&app), 1);
    assert_eq!(app.world().get::<BlockAbility>(enemy).unwrap().charges.current, 0);
    assert_eq!(app.world().get::<EnemyAttributes>(enemy).unwrap().integrity, 90.0);
}

#[test]
fn test_slash_respects_cooldown() {
    let mut app = create_headless_app(4);
    let player = spawn_player_now(&mut app, Transform::default());
    let enemy = spawn_enemy_now(&mut app, EnemyArchetype::Block, Transform::from_xyz(0.0, 0.0, -150.0));
    aim(&mut app, player, 60.0);

    // Второй intent через тик - ещё cooldown
    slash(&mut app, player);
    slash(&mut app, player);

    assert_eq!(event_count::<SlashBlocked>(&app), 1);
    assert_eq!(app.world().get::<BlockAbility>(enemy).unwrap().charges.current, 2);
}

#[test]
fn test_dodge_on_legs_pushes_enemy_away() {
    let mut app = create_headless_app(5);
    let player = spawn_player_now(&mut app, Transform::default());
    let enemy = spawn_enemy_now(&mut app, EnemyArchetype::Dodge, Transform::from_xyz(0.0, 0.0, -150.0));
    aim(&mut app, player, 0.0);
    step(&mut app, 1);

    slash(&mut app, player);

    assert_eq!(event_count::<SlashDodged>(&app), 1);
    assert_eq!(event_count::<ActorDied>(&app), 0);
    assert_eq!(app.world().get::<DodgeAbility>(enemy).unwrap().charges.current, 2);

    step(&mut app, 24);
    let position = app.world().get::<Transform>(enemy).unwrap().translation;
    assert!(position.length() > 400.0, "dodge should carry enemy away, got {:?}", position);
}

#[test]
fn test_firewall_blocks_hack_progress() {
    let mut app = create_headless_app(6);
    let player = spawn_player_now(&mut app, Transform::default());

    app.world_mut().get_mut::<StatusEffects>(player).unwrap().has_firewall = true;
    app.world_mut().send_event(DamageRequest {
        target: player,
        source: None,
        kind: DamageKind::HackProgress(5.0),
    });
    step(&mut app, 1);

    assert_eq!(app.world().get::<PlayerAttributes>(player).unwrap().hack_progress, 0.0);
    assert_eq!(event_count::<HackProgressChanged>(&app), 0);

    app.world_mut().get_mut::<StatusEffects>(player).unwrap().has_firewall = false;
    app.world_mut().send_event(DamageRequest {
        target: player,
        source: None,
        kind: DamageKind::HackProgress(5.0),
    });
    step(&mut app, 1);

    assert_eq!(app.world().get::<PlayerAttributes>(player).unwrap().hack_progress, 5.0);
    assert_eq!(event_count::<HackProgressChanged>(&app), 1);
}

#[test]
fn test_netrunner_hacks_player_continuously() {
    let mut app = create_headless_app(7);
    let player = spawn_player_now(&mut app, Transform::default());
    spawn_enemy_now(&mut app, EnemyArchetype::Netrunner, Transform::from_xyz(0.0, 0.0, -800.0));

    step(&mut app, 120);

    let hack = app.world().get::<PlayerAttributes>(player).unwrap().hack_progress;
    assert!((3.5..=4.5).contains(&hack), "2/s for 2s, got {}", hack);
}

#[test]
fn test_player_fully_hacked_dies_once() {
    let mut app = create_headless_app(8);
    let player = spawn_player_now(&mut app, Transform::default());

    for _ in 0..3 {
        app.world_mut().send_event(DamageRequest {
            target: player,
            source: None,
            kind: DamageKind::HackProgress(60.0),
        });
    }
    step(&mut app, 1);

    let attributes = app.world().get::<PlayerAttributes>(player).unwrap();
    assert_eq!(attributes.hack_progress, 100.0);
    assert!(app.world().get::<Dead>(player).is_some());
    assert_eq!(event_count::<ActorDied>(&app), 1);
}
