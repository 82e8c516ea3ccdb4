//! Headless симуляция Cybersouls
//!
//! Маленькая арена: игрок против Basic/Block/Dodge + нетраннер.
//! Игрок целится в ближайшего живого врага и бьёт Slash, как только готов.
//!
//! Запуск: `cybersouls_simulation [config.toml]`

use bevy::prelude::*;
use cybersouls_simulation::attributes::PlayerAttributes;
use cybersouls_simulation::combat::{SlashAbility, SlashIntent};
use cybersouls_simulation::progression::{PlayerProgression, QuestTracker};
use cybersouls_simulation::targeting::CrosshairRay;
use cybersouls_simulation::{
    create_headless_app_with_config, log_error, log_info, spawn_enemy_now, spawn_player_now, step_simulation, Dead,
    Enemy, EnemyArchetype, MovementCommand, SimulationConfig,
};

const MAX_TICKS: u32 = 60 * 60;
const EYE_HEIGHT: f32 = 80.0;

fn main() {
    let config = match std::env::args().nth(1) {
        Some(path) => match SimulationConfig::load(&path) {
            Ok(config) => config,
            Err(error) => {
                eprintln!("Failed to load config {}: {}", path, error);
                std::process::exit(1);
            }
        },
        None => SimulationConfig::default(),
    };

    let seed = config.seed;
    let dt = (1.0 / config.tick_hz) as f32;
    println!("Starting Cybersouls headless simulation (seed: {})", seed);

    let mut app = create_headless_app_with_config(config);

    let player = spawn_player_now(&mut app, Transform::default());
    spawn_enemy_now(&mut app, EnemyArchetype::Basic, Transform::from_xyz(0.0, 0.0, -600.0));
    spawn_enemy_now(&mut app, EnemyArchetype::Block, Transform::from_xyz(400.0, 0.0, -900.0));
    spawn_enemy_now(&mut app, EnemyArchetype::Dodge, Transform::from_xyz(-400.0, 0.0, -900.0));
    spawn_enemy_now(&mut app, EnemyArchetype::BuffNetrunner, Transform::from_xyz(0.0, 0.0, -1400.0));

    for tick in 0..MAX_TICKS {
        aim_and_slash(&mut app, player);
        step_simulation(&mut app, dt);

        if tick % 300 == 0 {
            report(&mut app, player, tick);
        }

        if app.world().resource::<QuestTracker>().completed {
            log_info(&format!("🏁 Quest completed at tick {}", tick));
            break;
        }
        if app.world().get::<Dead>(player).is_some() {
            log_error(&format!("💀 Player died at tick {}", tick));
            break;
        }
    }

    report(&mut app, player, MAX_TICKS);
    let progression = *app.world().resource::<PlayerProgression>();
    println!(
        "Simulation complete! XP: integrity {:.1}, hacking {:.1}",
        progression.integrity_xp, progression.hacking_xp
    );
}

/// Простейший "игрок": прицел на ближайшего живого врага + Slash когда готов
fn aim_and_slash(app: &mut App, player: Entity) {
    let world = app.world_mut();
    let Some(player_position) = world.get::<Transform>(player).map(|transform| transform.translation) else {
        return;
    };

    let mut enemies = world.query_filtered::<(Entity, &Transform), (With<Enemy>, Without<Dead>)>();
    let nearest = enemies
        .iter(world)
        .map(|(entity, transform)| (entity, transform.translation))
        .min_by(|a, b| {
            a.1.distance(player_position)
                .total_cmp(&b.1.distance(player_position))
                .then_with(|| a.0.cmp(&b.0))
        });
    let Some((_, enemy_position)) = nearest else {
        return;
    };

    let eye = player_position + Vec3::Y * EYE_HEIGHT;
    if let Some(mut ray) = world.get_mut::<CrosshairRay>(player) {
        ray.origin = eye;
        ray.direction = (enemy_position + Vec3::Y * EYE_HEIGHT - eye).normalize_or_zero();
    }

    // Подходим к цели
    if let Some(mut command) = world.get_mut::<MovementCommand>(player) {
        let next = MovementCommand::MoveToPosition {
            target: enemy_position,
            acceptance_radius: 150.0,
        };
        if *command != next {
            *command = next;
        }
    }

    let ready = world
        .get::<SlashAbility>(player)
        .is_some_and(|slash| slash.ability.is_ready() && enemy_position.distance(player_position) <= slash.range);
    if ready {
        world.send_event(SlashIntent { attacker: player });
    }
}

fn report(app: &mut App, player: Entity, tick: u32) {
    let world = app.world_mut();
    let alive = world
        .query_filtered::<Entity, (With<Enemy>, Without<Dead>)>()
        .iter(world)
        .count();
    let (integrity, hack) = world
        .get::<PlayerAttributes>(player)
        .map_or((0.0, 0.0), |attributes| (attributes.integrity, attributes.hack_progress));

    println!(
        "Tick {}: {} enemies alive, player integrity {:.1}, hack progress {:.1}",
        tick, alive, integrity, hack
    );
}
