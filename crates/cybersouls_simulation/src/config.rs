//! Stat tables и тюнинг симуляции (serde + TOML).
//!
//! Все структуры имеют `Default` с боевыми значениями и `#[serde(default)]`,
//! поэтому TOML может переопределять только нужные секции. Секция архетипа -
//! патч поверх строки этого архетипа в `ArchetypeTable::default()`: Block с одним
//! `max_integrity` сохраняет заряды блока и атаку.
//!
//! ```toml
//! seed = 7
//!
//! [enemies.block]
//! max_integrity = 150.0
//!
//! [ai.physical]
//! max_search_duration = 8.0
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use bevy::prelude::*;
use serde::{de, Deserialize, Deserializer, Serialize};

use crate::archetype::EnemyArchetype;
use crate::error::ConfigError;
use crate::quickhack::QuickHackType;

/// Корневой конфиг симуляции
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Частота FixedUpdate
    pub tick_hz: f64,
    /// Seed для DeterministicRng
    pub seed: u64,
    /// Минимальный уровень логов ("debug" | "info" | "warning" | "error")
    pub log_level: String,
    pub player: PlayerTuning,
    pub enemies: ArchetypeTable,
    pub ai: AiTuning,
    pub quickhacks: QuickHackTable,
    pub progression: ProgressionRatios,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_hz: 60.0,
            seed: 42,
            log_level: "debug".to_string(),
            player: PlayerTuning::default(),
            enemies: ArchetypeTable::default(),
            ai: AiTuning::default(),
            quickhacks: QuickHackTable::default(),
            progression: ProgressionRatios::default(),
        }
    }
}

impl SimulationConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: SimulationConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.tick_hz.is_finite() && self.tick_hz > 0.0) {
            return Err(ConfigError::Invalid {
                field: "tick_hz",
                reason: format!("must be positive, got {}", self.tick_hz),
            });
        }
        if crate::logger::LogLevel::parse(&self.log_level).is_none() {
            return Err(ConfigError::Invalid {
                field: "log_level",
                reason: format!("unknown level '{}'", self.log_level),
            });
        }
        if self.player.max_hack_progress <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "player.max_hack_progress",
                reason: "must be positive".to_string(),
            });
        }
        for archetype in EnemyArchetype::ALL {
            if self.enemies.get(archetype).max_integrity <= 0.0 {
                return Err(ConfigError::Invalid {
                    field: "enemies.max_integrity",
                    reason: format!("{:?} must start alive", archetype),
                });
            }
        }
        Ok(())
    }
}

// ============================================================================
// Player
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub max_integrity: f32,
    pub max_hack_progress: f32,
    pub movement_speed: f32,
    pub stamina: StaminaTuning,
    pub slash: SlashTuning,
    pub dash: DashTuning,
    pub double_jump: DoubleJumpTuning,
    /// Дальность crosshair ray
    pub targeting_range: f32,
    /// Дистанция удержания target lock
    pub max_lock_distance: f32,
    /// Окно ExecutionChains после убийства (секунды)
    pub execution_chains_window: f32,
    /// Пассивка SystemOvercharge (игнор защит, блок QuickHack)
    pub system_overcharge: bool,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            max_integrity: 100.0,
            max_hack_progress: 100.0,
            movement_speed: 500.0,
            stamina: StaminaTuning::default(),
            slash: SlashTuning::default(),
            dash: DashTuning::default(),
            double_jump: DoubleJumpTuning::default(),
            targeting_range: 5000.0,
            max_lock_distance: 2000.0,
            execution_chains_window: 5.0,
            system_overcharge: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaminaTuning {
    pub max: f32,
    pub regen_rate: f32,
    pub regen_delay: f32,
}

impl Default for StaminaTuning {
    fn default() -> Self {
        Self {
            max: 100.0,
            regen_rate: 10.0,
            regen_delay: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlashTuning {
    pub damage: f32,
    pub range: f32,
    pub cooldown: f32,
}

impl Default for SlashTuning {
    fn default() -> Self {
        Self {
            damage: 10.0,
            range: 200.0,
            cooldown: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashTuning {
    pub max_charges: u32,
    /// Период восстановления заряда (только на земле)
    pub regen_period: f32,
    pub stamina_cost: f32,
    pub distance: f32,
    pub duration: f32,
    pub cooldown: f32,
    pub can_dash_in_air: bool,
}

impl Default for DashTuning {
    fn default() -> Self {
        Self {
            max_charges: 2,
            regen_period: 1.5,
            stamina_cost: 25.0,
            distance: 1000.0,
            duration: 0.2,
            cooldown: 0.5,
            can_dash_in_air: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DoubleJumpTuning {
    pub max_jumps_in_air: u32,
    pub stamina_cost: f32,
    pub jump_velocity: f32,
    pub double_jump_velocity: f32,
}

impl Default for DoubleJumpTuning {
    fn default() -> Self {
        Self {
            max_jumps_in_air: 1,
            stamina_cost: 20.0,
            jump_velocity: 700.0,
            double_jump_velocity: 600.0,
        }
    }
}

// ============================================================================
// Enemy archetypes
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttackStats {
    pub damage: f32,
    pub cooldown: f32,
    pub range: f32,
}

impl Default for AttackStats {
    fn default() -> Self {
        Self {
            damage: 10.0,
            cooldown: 2.0,
            // совпадает с attack_range physical AI, иначе AI бьёт в пустоту
            range: 300.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HackStats {
    pub rate: f32,
    pub range: f32,
}

impl Default for HackStats {
    fn default() -> Self {
        Self {
            rate: 2.0,
            range: 1500.0,
        }
    }
}

/// Статы одного архетипа врага
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchetypeStats {
    pub max_integrity: f32,
    pub movement_speed: f32,
    pub attack: Option<AttackStats>,
    pub hack: Option<HackStats>,
    pub block_charges: u32,
    pub dodge_charges: u32,
    /// Период регенерации зарядов Block/Dodge (None = без регенерации)
    pub charge_regen_period: Option<f32>,
    pub dodge_speed: f32,
    pub dodge_distance: f32,
    pub quickhacks: Vec<QuickHackType>,
    /// Переопределение дальности QuickHack этого архетипа
    pub quickhack_range: Option<f32>,
    /// Полувысота тела (классификация body part)
    pub half_height: f32,
}

impl Default for ArchetypeStats {
    fn default() -> Self {
        Self {
            max_integrity: 100.0,
            movement_speed: 400.0,
            attack: None,
            hack: None,
            block_charges: 0,
            dodge_charges: 0,
            charge_regen_period: None,
            dodge_speed: 800.0,
            dodge_distance: 300.0,
            quickhacks: Vec::new(),
            quickhack_range: None,
            half_height: 96.0,
        }
    }
}

impl ArchetypeStats {
    fn melee(max_integrity: f32) -> Self {
        Self {
            max_integrity,
            attack: Some(AttackStats::default()),
            ..Default::default()
        }
    }

    fn netrunner(max_integrity: f32, rate: f32, quickhacks: Vec<QuickHackType>) -> Self {
        Self {
            max_integrity,
            hack: Some(HackStats { rate, ..Default::default() }),
            quickhacks,
            ..Default::default()
        }
    }
}

/// Таблица статов по архетипам
///
/// Deserialize ручной: секции TOML накладываются на табличные значения.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArchetypeTable {
    pub basic: ArchetypeStats,
    pub block: ArchetypeStats,
    pub dodge: ArchetypeStats,
    pub netrunner: ArchetypeStats,
    pub buff_netrunner: ArchetypeStats,
    pub debuff_netrunner: ArchetypeStats,
}

impl Default for ArchetypeTable {
    fn default() -> Self {
        Self {
            basic: ArchetypeStats::melee(1.0),
            block: ArchetypeStats {
                block_charges: 3,
                ..ArchetypeStats::melee(100.0)
            },
            dodge: ArchetypeStats {
                dodge_charges: 3,
                ..ArchetypeStats::melee(1.0)
            },
            netrunner: ArchetypeStats::netrunner(1.0, 2.0, Vec::new()),
            buff_netrunner: ArchetypeStats::netrunner(1.0, 1.5, vec![QuickHackType::Firewall]),
            debuff_netrunner: ArchetypeStats {
                quickhack_range: Some(1200.0),
                ..ArchetypeStats::netrunner(
                    100.0,
                    2.0,
                    vec![QuickHackType::SystemFreeze, QuickHackType::InterruptProtocol],
                )
            },
        }
    }
}

impl ArchetypeTable {
    pub fn get(&self, archetype: EnemyArchetype) -> &ArchetypeStats {
        match archetype {
            EnemyArchetype::Basic => &self.basic,
            EnemyArchetype::Block => &self.block,
            EnemyArchetype::Dodge => &self.dodge,
            EnemyArchetype::Netrunner => &self.netrunner,
            EnemyArchetype::BuffNetrunner => &self.buff_netrunner,
            EnemyArchetype::DebuffNetrunner => &self.debuff_netrunner,
        }
    }

    pub fn get_mut(&mut self, archetype: EnemyArchetype) -> &mut ArchetypeStats {
        match archetype {
            EnemyArchetype::Basic => &mut self.basic,
            EnemyArchetype::Block => &mut self.block,
            EnemyArchetype::Dodge => &mut self.dodge,
            EnemyArchetype::Netrunner => &mut self.netrunner,
            EnemyArchetype::BuffNetrunner => &mut self.buff_netrunner,
            EnemyArchetype::DebuffNetrunner => &mut self.debuff_netrunner,
        }
    }
}

const ARCHETYPE_KEYS: &[&str] = &[
    "basic",
    "block",
    "dodge",
    "netrunner",
    "buff_netrunner",
    "debuff_netrunner",
];

impl<'de> Deserialize<'de> for ArchetypeTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let sections = BTreeMap::<String, toml::Table>::deserialize(deserializer)?;
        let mut table = ArchetypeTable::default();

        for (key, patch) in sections {
            let archetype = EnemyArchetype::from_config_key(&key)
                .ok_or_else(|| <D::Error as de::Error>::unknown_field(&key, ARCHETYPE_KEYS))?;
            let stats = table.get_mut(archetype);
            *stats = stats
                .patched(patch)
                .map_err(|reason| <D::Error as de::Error>::custom(format!("enemies.{}: {}", key, reason)))?;
        }

        Ok(table)
    }
}

impl ArchetypeStats {
    /// Наложить TOML-секцию на текущие статы (вложенные таблицы - рекурсивно)
    fn patched(&self, patch: toml::Table) -> Result<Self, String> {
        let toml::Value::Table(mut merged) = toml::Value::try_from(self).map_err(|error| error.to_string())? else {
            return Err("archetype stats must serialize to a table".to_string());
        };
        merge_tables(&mut merged, patch);
        toml::Value::Table(merged)
            .try_into()
            .map_err(|error: toml::de::Error| error.to_string())
    }
}

fn merge_tables(base: &mut toml::Table, patch: toml::Table) {
    for (key, value) in patch {
        match value {
            toml::Value::Table(nested) if base.get(&key).is_some_and(toml::Value::is_table) => {
                if let Some(toml::Value::Table(existing)) = base.get_mut(&key) {
                    merge_tables(existing, nested);
                }
            }
            value => {
                base.insert(key, value);
            }
        }
    }
}

// ============================================================================
// AI
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiTuning {
    pub eye_height: f32,
    pub alert_radius: f32,
    pub alert_update_interval: f32,
    pub physical: PhysicalAiTuning,
    pub hacking: HackingAiTuning,
}

impl Default for AiTuning {
    fn default() -> Self {
        Self {
            eye_height: 80.0,
            alert_radius: 2000.0,
            alert_update_interval: 1.0,
            physical: PhysicalAiTuning::default(),
            hacking: HackingAiTuning::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicalAiTuning {
    pub sight_range: f32,
    pub attack_range: f32,
    pub acceptance_radius: f32,
    pub max_search_duration: f32,
    /// Скорость поворота при сканировании (рад/с)
    pub scan_turn_rate: f32,
}

impl Default for PhysicalAiTuning {
    fn default() -> Self {
        Self {
            sight_range: 1500.0,
            attack_range: 300.0,
            acceptance_radius: 50.0,
            max_search_duration: 5.0,
            scan_turn_rate: 1.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HackingAiTuning {
    pub sight_range: f32,
    pub hack_range: f32,
    pub quickhack_decision_interval: f32,
}

impl Default for HackingAiTuning {
    fn default() -> Self {
        Self {
            sight_range: 2000.0,
            hack_range: 1500.0,
            quickhack_decision_interval: 1.0,
        }
    }
}

// ============================================================================
// QuickHacks
// ============================================================================

/// Тайминги одного QuickHack
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuickHackTiming {
    pub cast_time: f32,
    pub cooldown: f32,
    #[serde(default)]
    pub effect_duration: f32,
}

/// Переопределения таймингов по типу (остальные берутся из `QuickHackType::default_timing`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuickHackTable {
    /// Ключ - имя варианта (`"Kill"`, `"SystemFreeze"`, ...)
    pub overrides: BTreeMap<String, QuickHackTiming>,
}

impl QuickHackTable {
    pub fn timing(&self, hack_type: QuickHackType) -> QuickHackTiming {
        self.overrides
            .get(hack_type.config_key())
            .copied()
            .unwrap_or_else(|| hack_type.default_timing())
    }
}

// ============================================================================
// Progression
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionRatios {
    pub integrity_to_xp: f32,
    pub hack_resistance_to_xp: f32,
}

impl Default for ProgressionRatios {
    fn default() -> Self {
        Self {
            integrity_to_xp: 1.0,
            hack_resistance_to_xp: 0.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_roster() {
        let config = SimulationConfig::default();
        assert_eq!(config.enemies.basic.max_integrity, 1.0);
        assert_eq!(config.enemies.block.block_charges, 3);
        assert_eq!(config.enemies.dodge.dodge_charges, 3);
        assert_eq!(config.enemies.debuff_netrunner.max_integrity, 100.0);
        assert_eq!(config.enemies.buff_netrunner.hack.as_ref().map(|h| h.rate), Some(1.5));
        assert_eq!(config.ai.alert_radius, 2000.0);
        assert_eq!(config.ai.physical.attack_range, 300.0);
    }

    #[test]
    fn test_partial_toml_override() {
        let source = r#"
            seed = 7

            [enemies.block]
            max_integrity = 150.0

            [ai.physical]
            max_search_duration = 8.0
        "#;

        let config = SimulationConfig::from_toml_str(source).expect("valid toml");
        assert_eq!(config.seed, 7);
        assert_eq!(config.enemies.block.max_integrity, 150.0);
        // Остальные поля Block - из его строки таблицы, а не из ArchetypeStats::default()
        assert_eq!(config.enemies.block.block_charges, 3);
        assert!(config.enemies.block.attack.is_some());
        // Незатронутые архетипы сохраняют табличные значения
        assert_eq!(config.enemies.basic.max_integrity, 1.0);
        assert_eq!(config.ai.physical.max_search_duration, 8.0);
        assert_eq!(config.ai.physical.attack_range, 300.0);
    }

    #[test]
    fn test_partial_netrunner_override_keeps_loadout() {
        let source = r#"
            [enemies.debuff_netrunner]
            max_integrity = 40.0

            [enemies.debuff_netrunner.hack]
            rate = 5.0
        "#;

        let config = SimulationConfig::from_toml_str(source).expect("valid toml");
        let stats = &config.enemies.debuff_netrunner;
        assert_eq!(stats.max_integrity, 40.0);
        assert_eq!(
            stats.quickhacks,
            vec![QuickHackType::SystemFreeze, QuickHackType::InterruptProtocol]
        );
        assert_eq!(stats.quickhack_range, Some(1200.0));

        let hack = stats.hack.as_ref().expect("netrunner keeps hack");
        assert_eq!(hack.rate, 5.0);
        assert_eq!(hack.range, 1500.0);
    }

    #[test]
    fn test_unknown_archetype_section_rejected() {
        assert!(matches!(
            SimulationConfig::from_toml_str("[enemies.boss]\nmax_integrity = 10.0\n"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_quickhack_override() {
        let source = r#"
            [quickhacks.overrides.Kill]
            cast_time = 1.0
            cooldown = 4.0
        "#;

        let config = SimulationConfig::from_toml_str(source).expect("valid toml");
        let kill = config.quickhacks.timing(QuickHackType::Kill);
        assert_eq!(kill.cast_time, 1.0);
        assert_eq!(kill.effect_duration, 0.0);

        let freeze = config.quickhacks.timing(QuickHackType::SystemFreeze);
        assert_eq!(freeze.cast_time, 7.0);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            SimulationConfig::from_toml_str("tick_hz = 0.0"),
            Err(ConfigError::Invalid { field: "tick_hz", .. })
        ));
        assert!(matches!(
            SimulationConfig::from_toml_str("log_level = \"loud\""),
            Err(ConfigError::Invalid { field: "log_level", .. })
        ));
        assert!(matches!(
            SimulationConfig::from_toml_str("seed = \"abc\""),
            Err(ConfigError::Parse(_))
        ));
    }
}
