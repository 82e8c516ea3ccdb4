//! Cybersouls Simulation Core
//!
//! Headless ECS-симуляция боевого ядра на Bevy 0.16:
//! способности, атрибуты, прицел/body parts, Slash/Block/Dodge,
//! QuickHack'и, physical/hacking AI и alert propagation.
//!
//! Один тик = один прогон `FixedUpdate`. Порядок фаз фиксирован (`GameplaySet`),
//! поэтому два прогона с одинаковым seed и вводом дают одинаковый мир.
//! Рендер, навигация и ввод - внешние collaborator'ы: они пишут intents
//! и читают события.

use std::time::Duration;

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod abilities;
pub mod ai;
pub mod archetype;
pub mod attributes;
pub mod combat;
pub mod components;
pub mod config;
pub mod environment;
pub mod error;
pub mod logger;
pub mod movement;
pub mod player;
pub mod progression;
pub mod quickhack;
pub mod targeting;
pub mod timers;

// Re-export для удобства (внешний слой + тесты)
pub use abilities::{Ability, AbilityKind, AbilityReady};
pub use ai::AIPlugin;
pub use archetype::{spawn_enemy, spawn_player, EnemyArchetype};
pub use attributes::AttributesPlugin;
pub use combat::CombatPlugin;
pub use components::*;
pub use config::SimulationConfig;
pub use environment::{Environment, Obstacle, StaticObstacles, WorldGeometry};
pub use error::{AbilityError, AbilityResult, ConfigError};
pub use logger::{init_logger, log, log_error, log_info, log_warning, set_log_level, LogLevel};
pub use movement::MovementPlugin;
pub use player::PlayerPlugin;
pub use progression::ProgressionPlugin;
pub use quickhack::{QuickHackPlugin, QuickHackType};
pub use targeting::{BodyPart, TargetingPlugin};
pub use timers::ScheduledEffects;

/// Фазы тика (FixedUpdate), выполняются строго по порядку
///
/// 1. Timers - cooldown'ы, регенерация, истёкшие отложенные эффекты
/// 2. Perception - прицел игрока, зрение врагов
/// 3. Decision - AI пишет MovementCommand и intents
/// 4. Action - обработка intents: Slash, Attack, Hack, QuickHack, Dash, Jump
/// 5. Effects - эффекты завершённых QuickHack'ов
/// 6. Resolution - применение DamageRequest, смерти
/// 7. Reactions - реакции на смерти (cascade, execution chains, квест, reset AI)
/// 8. Broadcast - оповещение союзников
/// 9. Movement - исполнение движения, гравитация
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameplaySet {
    Timers,
    Perception,
    Decision,
    Action,
    Effects,
    Resolution,
    Reactions,
    Broadcast,
    Movement,
}

/// Главный plugin симуляции (объединяет все подсистемы)
///
/// Использует `SimulationConfig`, если он уже вставлен в App, иначе дефолтный.
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        let config = app
            .world()
            .get_resource::<SimulationConfig>()
            .cloned()
            .unwrap_or_default();

        if let Some(level) = LogLevel::parse(&config.log_level) {
            set_log_level(level);
        }

        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(config.seed));
        }

        app
            // Fixed timestep для simulation tick
            .insert_resource(Time::<Fixed>::from_hz(config.tick_hz))
            .insert_resource(config)
            .init_resource::<ScheduledEffects>()
            .init_resource::<Environment>()
            .add_event::<AbilityReady>();

        app.configure_sets(
            FixedUpdate,
            (
                GameplaySet::Timers,
                GameplaySet::Perception,
                GameplaySet::Decision,
                GameplaySet::Action,
                GameplaySet::Effects,
                GameplaySet::Resolution,
                GameplaySet::Reactions,
                GameplaySet::Broadcast,
                GameplaySet::Movement,
            )
                .chain(),
        );

        // Подсистемы
        app.add_plugins((
            AttributesPlugin,
            TargetingPlugin,
            CombatPlugin,
            QuickHackPlugin,
            AIPlugin,
            MovementPlugin,
            PlayerPlugin,
            ProgressionPlugin,
        ));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
pub fn create_headless_app(seed: u64) -> App {
    create_headless_app_with_config(SimulationConfig {
        seed,
        ..Default::default()
    })
}

/// Headless App с заданными stat tables
pub fn create_headless_app_with_config(config: SimulationConfig) -> App {
    init_logger();

    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(config.seed))
        .insert_resource(config)
        .add_plugins(SimulationPlugin);

    app
}

/// Один детерминированный тик: сдвигает `Time<Fixed>` на `dt` и гоняет FixedUpdate
///
/// Не зависит от wall clock (в отличие от `app.update()`).
pub fn step_simulation(app: &mut App, dt: f32) {
    app.world_mut()
        .resource_mut::<Time<Fixed>>()
        .advance_by(Duration::from_secs_f32(dt));
    app.world_mut().run_schedule(FixedUpdate);
}

/// `ticks` тиков с шагом из `Time<Fixed>::timestep`
pub fn run_ticks(app: &mut App, ticks: u32) {
    let dt = app.world().resource::<Time<Fixed>>().timestep().as_secs_f32();
    for _ in 0..ticks {
        step_simulation(app, dt);
    }
}

/// Спавн врага прямо в мир App (flush команд сразу)
pub fn spawn_enemy_now(app: &mut App, archetype: EnemyArchetype, transform: Transform) -> Entity {
    let config = app.world().resource::<SimulationConfig>().clone();
    let world = app.world_mut();
    let entity = spawn_enemy(&mut world.commands(), archetype, transform, &config);
    world.flush();
    entity
}

/// Спавн игрока прямо в мир App
pub fn spawn_player_now(app: &mut App, transform: Transform) -> Entity {
    let config = app.world().resource::<SimulationConfig>().clone();
    let world = app.world_mut();
    let entity = spawn_player(&mut world.commands(), transform, &config);
    world.flush();
    entity
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
