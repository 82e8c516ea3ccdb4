//! QuickHack integration: каст → эффект → истечение через ScheduledEffects
//!
//! Цели стоят далеко за пределами зрения врагов (5000), чтобы AI не вмешивался.

use bevy::prelude::*;
use cybersouls_simulation::attributes::{ActorDied, DamageKind, DamageRequest, StatusEffects};
use cybersouls_simulation::config::QuickHackTiming;
use cybersouls_simulation::quickhack::{
    QuickHackCompleted, QuickHackIntent, QuickHackInterrupted, QuickHackLoadout, QuickHackMarks, QuickHackStarted,
    QuickHackType,
};
use cybersouls_simulation::*;

const DT: f32 = 1.0 / 60.0;
const FAR: f32 = -5000.0;

fn event_count<E: Event>(app: &App) -> usize {
    app.world().resource::<Events<E>>().len()
}

fn step(app: &mut App, ticks: u32) {
    for _ in 0..ticks {
        step_simulation(app, DT);
    }
}

/// Шагает, пока `done` не вернёт true. Возвращает число тиков.
fn step_until(app: &mut App, max_ticks: u32, mut done: impl FnMut(&World) -> bool) -> u32 {
    for tick in 1..=max_ticks {
        step_simulation(app, DT);
        if done(app.world()) {
            return tick;
        }
    }
    panic!("condition not reached in {} ticks", max_ticks);
}

fn cast(app: &mut App, caster: Entity, hack_type: QuickHackType, target: Entity) {
    app.world_mut().send_event(QuickHackIntent {
        caster,
        hack_type,
        target: Some(target),
    });
}

fn is_frozen(world: &World, entity: Entity) -> bool {
    world.get::<StatusEffects>(entity).is_some_and(|status| status.is_immobilized)
}

#[test]
fn test_system_freeze_lasts_effect_duration() {
    let mut app = create_headless_app(11);
    let player = spawn_player_now(&mut app, Transform::default());
    let enemy = spawn_enemy_now(&mut app, EnemyArchetype::Block, Transform::from_xyz(0.0, 0.0, FAR));

    cast(&mut app, player, QuickHackType::SystemFreeze, enemy);
    let ticks = step_until(&mut app, 600, |world| is_frozen(world, enemy));
    // cast_time 7s: старт в первом тике, время копится со второго
    assert!((420..=423).contains(&ticks), "freeze landed after {} ticks", ticks);
    assert_eq!(event_count::<QuickHackStarted>(&app), 1);

    step(&mut app, 174);
    assert!(is_frozen(app.world(), enemy), "still frozen at 2.9s");

    step(&mut app, 12);
    assert!(!is_frozen(app.world(), enemy), "free at 3.1s");
}

#[test]
fn test_reapplied_freeze_ignores_stale_expiry() {
    let mut app = create_headless_app(12);
    let player = spawn_player_now(&mut app, Transform::default());
    let enemy = spawn_enemy_now(&mut app, EnemyArchetype::Block, Transform::from_xyz(0.0, 0.0, FAR));

    cast(&mut app, player, QuickHackType::SystemFreeze, enemy);
    step_until(&mut app, 600, |world| is_frozen(world, enemy));

    // Второе окно через 1s после первого
    step(&mut app, 60);
    app.world_mut().send_event(QuickHackCompleted {
        caster: player,
        target: enemy,
        hack_type: QuickHackType::SystemFreeze,
        effect_duration: 3.0,
    });
    step(&mut app, 1);

    // Первое окно истекло бы на 3s - флаг держится
    step(&mut app, 144);
    assert!(is_frozen(app.world(), enemy), "stale expiry must not clear the newer window");

    step(&mut app, 60);
    assert!(!is_frozen(app.world(), enemy));
}

#[test]
fn test_firewall_resists_hostile_quickhack() {
    let mut app = create_headless_app(13);
    let player = spawn_player_now(&mut app, Transform::default());
    let enemy = spawn_enemy_now(&mut app, EnemyArchetype::Block, Transform::from_xyz(0.0, 0.0, FAR));

    app.world_mut().get_mut::<StatusEffects>(enemy).unwrap().has_firewall = true;
    app.world_mut().send_event(QuickHackCompleted {
        caster: player,
        target: enemy,
        hack_type: QuickHackType::SystemFreeze,
        effect_duration: 3.0,
    });
    step(&mut app, 1);

    assert!(!is_frozen(app.world(), enemy));
}

#[test]
fn test_kill_quickhack_is_lethal() {
    let mut app = create_headless_app(14);
    let player = spawn_player_now(&mut app, Transform::default());
    let enemy = spawn_enemy_now(&mut app, EnemyArchetype::Block, Transform::from_xyz(0.0, 0.0, FAR));

    cast(&mut app, player, QuickHackType::Kill, enemy);
    step_until(&mut app, 300, |world| world.get::<Dead>(enemy).is_some());

    assert_eq!(event_count::<ActorDied>(&app), 1);
    let loadout = app.world().get::<QuickHackLoadout>(player).unwrap();
    assert!(!loadout.is_casting_any());
}

#[test]
fn test_cast_on_dead_target_is_rejected() {
    let mut app = create_headless_app(15);
    let player = spawn_player_now(&mut app, Transform::default());
    let enemy = spawn_enemy_now(&mut app, EnemyArchetype::Basic, Transform::from_xyz(0.0, 0.0, FAR));

    app.world_mut().send_event(DamageRequest {
        target: enemy,
        source: None,
        kind: DamageKind::Lethal,
    });
    step(&mut app, 1);
    assert!(app.world().get::<Dead>(enemy).is_some());

    cast(&mut app, player, QuickHackType::Kill, enemy);
    step(&mut app, 1);

    assert_eq!(event_count::<QuickHackStarted>(&app), 0);
    assert!(!app.world().get::<QuickHackLoadout>(player).unwrap().is_casting_any());
}

#[test]
fn test_cascade_spreads_to_two_nearest() {
    let mut app = create_headless_app(16);
    let player = spawn_player_now(&mut app, Transform::default());
    let origin = spawn_enemy_now(&mut app, EnemyArchetype::Basic, Transform::from_xyz(0.0, 0.0, FAR));
    let neighbours = [
        spawn_enemy_now(&mut app, EnemyArchetype::Basic, Transform::from_xyz(200.0, 0.0, FAR)),
        spawn_enemy_now(&mut app, EnemyArchetype::Basic, Transform::from_xyz(-300.0, 0.0, FAR)),
        spawn_enemy_now(&mut app, EnemyArchetype::Basic, Transform::from_xyz(500.0, 0.0, FAR)),
    ];

    cast(&mut app, player, QuickHackType::CascadeVirus, origin);
    step_until(&mut app, 400, |world| {
        world
            .get::<QuickHackMarks>(origin)
            .is_some_and(|marks| marks.cascade.is_some())
    });

    app.world_mut().send_event(DamageRequest {
        target: origin,
        source: Some(player),
        kind: DamageKind::Lethal,
    });
    step(&mut app, 1);
    assert_eq!(event_count::<ActorDied>(&app), 1);

    // Задержка цепочки 0.5s
    step(&mut app, 20);
    assert_eq!(event_count::<ActorDied>(&app), 1);
    step(&mut app, 16);

    let dead: Vec<Entity> = neighbours
        .iter()
        .copied()
        .filter(|entity| app.world().get::<Dead>(*entity).is_some())
        .collect();
    assert_eq!(dead, vec![neighbours[0], neighbours[1]], "two nearest die, the third survives");
    assert_eq!(event_count::<ActorDied>(&app), 3);
}

#[test]
fn test_cascade_mark_expires() {
    let mut app = create_headless_app(17);
    let player = spawn_player_now(&mut app, Transform::default());
    let origin = spawn_enemy_now(&mut app, EnemyArchetype::Basic, Transform::from_xyz(0.0, 0.0, FAR));
    let neighbour = spawn_enemy_now(&mut app, EnemyArchetype::Basic, Transform::from_xyz(200.0, 0.0, FAR));

    cast(&mut app, player, QuickHackType::CascadeVirus, origin);
    step_until(&mut app, 400, |world| {
        world
            .get::<QuickHackMarks>(origin)
            .is_some_and(|marks| marks.cascade.is_some())
    });

    // Метка живёт 5s
    step(&mut app, 306);
    assert!(app.world().get::<QuickHackMarks>(origin).unwrap().cascade.is_none());

    app.world_mut().send_event(DamageRequest {
        target: origin,
        source: Some(player),
        kind: DamageKind::Lethal,
    });
    step(&mut app, 60);

    assert!(app.world().get::<Dead>(neighbour).is_none());
    assert_eq!(event_count::<ActorDied>(&app), 1);
}

#[test]
fn test_interrupt_with_duration_locks_abilities() {
    let mut config = SimulationConfig::default();
    config.quickhacks.overrides.insert(
        QuickHackType::InterruptProtocol.config_key().to_string(),
        QuickHackTiming {
            cast_time: 0.5,
            cooldown: 8.0,
            effect_duration: 2.0,
        },
    );
    let mut app = create_headless_app_with_config(config);
    let player = spawn_player_now(&mut app, Transform::default());
    let far_enemy = spawn_enemy_now(&mut app, EnemyArchetype::Basic, Transform::from_xyz(0.0, 0.0, FAR));

    // Игрок кастует Kill (3s), нетраннер успевает прервать
    cast(&mut app, player, QuickHackType::Kill, far_enemy);
    step(&mut app, 1);
    spawn_enemy_now(&mut app, EnemyArchetype::DebuffNetrunner, Transform::from_xyz(0.0, 0.0, -800.0));

    let abilities_locked = |world: &World| {
        world
            .get::<StatusEffects>(player)
            .is_some_and(|status| !status.can_use_abilities)
    };
    step_until(&mut app, 120, abilities_locked);

    assert_eq!(event_count::<QuickHackInterrupted>(&app), 1);
    assert!(!app.world().get::<QuickHackLoadout>(player).unwrap().is_casting_any());
    assert!(app.world().get::<Dead>(far_enemy).is_none());

    step(&mut app, 114);
    assert!(abilities_locked(app.world()), "still locked at 1.9s");

    step(&mut app, 12);
    assert!(!abilities_locked(app.world()), "abilities restored after 2s");
}
