//! Архетипы врагов + сборка акторов (spawn)
//!
//! Поведение архетипа - это набор capability-компонентов и статы из
//! `ArchetypeTable`, а не отдельный тип. Контроллер выбирается по роли:
//! физические архетипы получают `PhysicalController`, нетраннеры - `HackingController`.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::ai::{AlertState, HackingController, Perception, PhysicalController};
use crate::attributes::{EnemyAttributes, PlayerAttributes, Stamina};
use crate::combat::{AttackAbility, BlockAbility, DodgeAbility, ExecutionChains, HackAbility, SlashAbility, SystemOvercharge};
use crate::components::{BodyExtent, Enemy, MovementSpeed, Player, Targetable};
use crate::config::SimulationConfig;
use crate::player::{DashAbility, DoubleJump};
use crate::quickhack::{QuickHackLoadout, QuickHackSlots, QuickHackType, DEFAULT_QUICKHACK_RANGE};
use crate::targeting::{TargetLock, Targeting};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Reflect, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyArchetype {
    Basic,
    Block,
    Dodge,
    Netrunner,
    BuffNetrunner,
    DebuffNetrunner,
}

impl EnemyArchetype {
    pub const ALL: [EnemyArchetype; 6] = [
        EnemyArchetype::Basic,
        EnemyArchetype::Block,
        EnemyArchetype::Dodge,
        EnemyArchetype::Netrunner,
        EnemyArchetype::BuffNetrunner,
        EnemyArchetype::DebuffNetrunner,
    ];

    /// Ключ секции `[enemies.<key>]` в конфиге
    pub fn config_key(self) -> &'static str {
        match self {
            EnemyArchetype::Basic => "basic",
            EnemyArchetype::Block => "block",
            EnemyArchetype::Dodge => "dodge",
            EnemyArchetype::Netrunner => "netrunner",
            EnemyArchetype::BuffNetrunner => "buff_netrunner",
            EnemyArchetype::DebuffNetrunner => "debuff_netrunner",
        }
    }

    pub fn from_config_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|archetype| archetype.config_key() == key)
    }

    /// Нетраннеры стоят на месте и воюют взломом
    pub fn is_hacker(self) -> bool {
        matches!(
            self,
            EnemyArchetype::Netrunner | EnemyArchetype::BuffNetrunner | EnemyArchetype::DebuffNetrunner
        )
    }
}

/// Спавн врага архетипа `archetype` со всеми capability-компонентами
pub fn spawn_enemy(
    commands: &mut Commands,
    archetype: EnemyArchetype,
    transform: Transform,
    config: &SimulationConfig,
) -> Entity {
    let stats = config.enemies.get(archetype);
    let ai = &config.ai;

    let mut entity = commands.spawn((
        Enemy { archetype },
        transform,
        EnemyAttributes::new(stats.max_integrity),
        MovementSpeed {
            speed: stats.movement_speed,
        },
        BodyExtent {
            half_height: stats.half_height,
            ..Default::default()
        },
        Targetable::default(),
        AlertState::new(ai.alert_radius, ai.alert_update_interval),
    ));

    if archetype.is_hacker() {
        let quickhack_range = stats.quickhack_range.unwrap_or(DEFAULT_QUICKHACK_RANGE);
        entity.insert((
            Perception::new(ai.hacking.sight_range, ai.eye_height, true),
            HackingController::new(&ai.hacking, quickhack_range),
        ));
    } else {
        entity.insert((
            Perception::new(ai.physical.sight_range, ai.eye_height, false),
            PhysicalController::new(&ai.physical),
        ));
    }

    if let Some(attack) = &stats.attack {
        entity.insert(AttackAbility::new(attack));
    }
    if let Some(hack) = &stats.hack {
        entity.insert(HackAbility::new(hack));
    }
    if stats.block_charges > 0 {
        entity.insert(BlockAbility::new(stats.block_charges, stats.charge_regen_period));
    }
    if stats.dodge_charges > 0 {
        entity.insert(DodgeAbility::new(
            stats.dodge_charges,
            stats.charge_regen_period,
            stats.dodge_speed,
            stats.dodge_distance,
        ));
    }
    if !stats.quickhacks.is_empty() {
        entity.insert(QuickHackLoadout::from_types(
            stats.quickhacks.iter().copied(),
            &config.quickhacks,
        ));
    }

    let id = entity.id();
    crate::log(&format!(
        "🤖 Spawned {:?} {:?} at {:?} (integrity {})",
        archetype, id, transform.translation, stats.max_integrity
    ));
    id
}

/// Спавн игрока: атрибуты, stamina, Slash, прицел, QuickHack'и, пассивки, Dash/DoubleJump
pub fn spawn_player(commands: &mut Commands, transform: Transform, config: &SimulationConfig) -> Entity {
    let tuning = &config.player;

    let id = commands
        .spawn((
            Player,
            transform,
            PlayerAttributes::new(tuning.max_integrity, tuning.max_hack_progress),
            Stamina::new(tuning.stamina.max, tuning.stamina.regen_rate, tuning.stamina.regen_delay),
            MovementSpeed {
                speed: tuning.movement_speed,
            },
            SlashAbility::new(&tuning.slash),
            Targeting::new(tuning.targeting_range),
            TargetLock::new(tuning.max_lock_distance),
            QuickHackLoadout::from_types(QuickHackType::ALL, &config.quickhacks),
            QuickHackSlots::default(),
            ExecutionChains::new(tuning.execution_chains_window),
            SystemOvercharge {
                active: tuning.system_overcharge,
            },
            DashAbility::new(&tuning.dash),
            DoubleJump::new(&tuning.double_jump),
        ))
        .id();

    crate::log(&format!("🧍 Spawned player {:?} at {:?}", id, transform.translation));
    id
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spawn(world: &mut World, archetype: EnemyArchetype) -> Entity {
        let config = SimulationConfig::default();
        let mut commands = world.commands();
        let entity = spawn_enemy(&mut commands, archetype, Transform::default(), &config);
        world.flush();
        entity
    }

    #[test]
    fn test_block_archetype_components() {
        let mut world = World::new();
        let entity = spawn(&mut world, EnemyArchetype::Block);

        assert_eq!(world.get::<EnemyAttributes>(entity).map(|a| a.integrity), Some(100.0));
        assert_eq!(world.get::<BlockAbility>(entity).map(|b| b.charges.current), Some(3));
        assert!(world.get::<DodgeAbility>(entity).is_none());
        assert!(world.get::<AttackAbility>(entity).is_some());
        assert!(world.get::<PhysicalController>(entity).is_some());
        assert!(world.get::<HackingController>(entity).is_none());
    }

    #[test]
    fn test_debuff_netrunner_components() {
        let mut world = World::new();
        let entity = spawn(&mut world, EnemyArchetype::DebuffNetrunner);

        let controller = world.get::<HackingController>(entity).unwrap();
        assert_eq!(controller.quickhack_range, 1200.0);
        assert!(world.get::<Perception>(entity).unwrap().blind_to_ghosts);

        let loadout = world.get::<QuickHackLoadout>(entity).unwrap();
        assert!(loadout.get(QuickHackType::SystemFreeze).is_some());
        assert!(loadout.get(QuickHackType::InterruptProtocol).is_some());
        assert!(loadout.get(QuickHackType::Firewall).is_none());
        assert!(world.get::<AttackAbility>(entity).is_none());
    }

    #[test]
    fn test_player_components() {
        let mut world = World::new();
        let config = SimulationConfig::default();
        let mut commands = world.commands();
        let player = spawn_player(&mut commands, Transform::default(), &config);
        world.flush();

        assert_eq!(world.get::<QuickHackLoadout>(player).map(|l| l.hacks.len()), Some(8));
        assert_eq!(world.get::<DashAbility>(player).map(|d| d.charges.current), Some(2));
        assert!(world.get::<SlashAbility>(player).is_some());
        assert!(world.get::<Targetable>(player).is_none());
    }
}
