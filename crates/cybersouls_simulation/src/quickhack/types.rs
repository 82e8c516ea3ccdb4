//! Типы QuickHack и их тайминги по умолчанию

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::QuickHackTiming;

/// Дальность QuickHack по умолчанию
pub const DEFAULT_QUICKHACK_RANGE: f32 = 1000.0;

/// CascadeVirus: радиус поиска следующих жертв
pub const CASCADE_CHAIN_RADIUS: f32 = 1000.0;
/// CascadeVirus: задержка перед летальным ударом по цепочке
pub const CASCADE_CHAIN_DELAY: f32 = 0.5;
/// CascadeVirus: сколько врагов максимум заражается от одной смерти
pub const CASCADE_MAX_CHAIN: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Reflect, Serialize, Deserialize)]
pub enum QuickHackType {
    InterruptProtocol,
    SystemFreeze,
    Firewall,
    Kill,
    CascadeVirus,
    GhostProtocol,
    ChargeDrain,
    GravityFlip,
}

impl QuickHackType {
    pub const ALL: [QuickHackType; 8] = [
        QuickHackType::InterruptProtocol,
        QuickHackType::SystemFreeze,
        QuickHackType::Firewall,
        QuickHackType::Kill,
        QuickHackType::CascadeVirus,
        QuickHackType::GhostProtocol,
        QuickHackType::ChargeDrain,
        QuickHackType::GravityFlip,
    ];

    /// Ключ в `[quickhacks.overrides.<key>]`
    pub fn config_key(self) -> &'static str {
        match self {
            QuickHackType::InterruptProtocol => "InterruptProtocol",
            QuickHackType::SystemFreeze => "SystemFreeze",
            QuickHackType::Firewall => "Firewall",
            QuickHackType::Kill => "Kill",
            QuickHackType::CascadeVirus => "CascadeVirus",
            QuickHackType::GhostProtocol => "GhostProtocol",
            QuickHackType::ChargeDrain => "ChargeDrain",
            QuickHackType::GravityFlip => "GravityFlip",
        }
    }

    /// Имя для presentation слоя (HUD слотов)
    pub fn display_name(self) -> &'static str {
        match self {
            QuickHackType::InterruptProtocol => "Interrupt Protocol",
            QuickHackType::SystemFreeze => "System Freeze",
            QuickHackType::Firewall => "Firewall",
            QuickHackType::Kill => "Kill",
            QuickHackType::CascadeVirus => "Cascade Virus",
            QuickHackType::GhostProtocol => "Ghost Protocol",
            QuickHackType::ChargeDrain => "Charge Drain",
            QuickHackType::GravityFlip => "Gravity Flip",
        }
    }

    /// Self-targeted хаки всегда применяются к самому кастеру
    pub fn is_self_targeted(self) -> bool {
        matches!(self, QuickHackType::Firewall | QuickHackType::GhostProtocol)
    }

    pub fn default_timing(self) -> QuickHackTiming {
        let (cast_time, cooldown, effect_duration) = match self {
            QuickHackType::InterruptProtocol => (5.0, 8.0, 0.0),
            QuickHackType::SystemFreeze => (7.0, 14.0, 3.0),
            QuickHackType::Firewall => (6.0, 12.0, 3.0),
            QuickHackType::Kill => (3.0, 10.0, 0.0),
            QuickHackType::CascadeVirus => (4.0, 20.0, 5.0),
            QuickHackType::GhostProtocol => (3.0, 15.0, 5.0),
            QuickHackType::ChargeDrain => (2.0, 10.0, 0.0),
            QuickHackType::GravityFlip => (4.0, 16.0, 3.0),
        };

        QuickHackTiming {
            cast_time,
            cooldown,
            effect_duration,
        }
    }
}
