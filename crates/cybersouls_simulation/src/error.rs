//! Error types симуляции.
//!
//! Отказ способности - нормальный путь (silent no-op): системы логируют
//! причину на debug-уровне и идут дальше. Фатальных ошибок в gameplay нет.

use thiserror::Error;

/// Причина, по которой способность не активировалась
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum AbilityError {
    #[error("owner is dead")]
    OwnerDead,

    #[error("ability on cooldown ({remaining:.2}s left)")]
    OnCooldown { remaining: f32 },

    #[error("ability already active")]
    AlreadyActive,

    #[error("no valid target")]
    NoTarget,

    #[error("abilities disabled for this actor")]
    AbilitiesDisabled,

    #[error("quickhack slot {0} is out of range")]
    InvalidSlot(usize),

    #[error("quickhack slot {0} is empty")]
    EmptySlot(usize),

    #[error("quickhack type is not unlocked")]
    NotAvailable,

    #[error("blocked by passive ability")]
    BlockedByPassive,

    #[error("not enough stamina (need {required:.1}, have {available:.1})")]
    InsufficientStamina { required: f32, available: f32 },

    #[error("no charges left")]
    NoCharges,
}

/// Ошибки загрузки stat tables
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

pub type AbilityResult = std::result::Result<(), AbilityError>;
