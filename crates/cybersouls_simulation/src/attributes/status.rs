//! Статус-флаги актора (пишут только эффекты QuickHack и их таймеры)

use bevy::prelude::*;

use crate::timers::TimerToken;

/// Флаг с ограниченным временем действия
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusFlag {
    AbilitiesDisabled,
    Immobilized,
    Firewall,
    InvisibleToHackers,
}

impl StatusFlag {
    fn index(self) -> usize {
        match self {
            StatusFlag::AbilitiesDisabled => 0,
            StatusFlag::Immobilized => 1,
            StatusFlag::Firewall => 2,
            StatusFlag::InvisibleToHackers => 3,
        }
    }
}

/// Boolean-гейты, которые читают способности, AI и movement
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct StatusEffects {
    pub can_use_abilities: bool,
    pub is_immobilized: bool,
    pub has_firewall: bool,
    pub is_invisible_to_hackers: bool,
    /// Токен таймера, который снимет флаг (None - флаг не таймерный)
    #[reflect(ignore)]
    expiry: [Option<TimerToken>; 4],
}

impl Default for StatusEffects {
    fn default() -> Self {
        Self {
            can_use_abilities: true,
            is_immobilized: false,
            has_firewall: false,
            is_invisible_to_hackers: false,
            expiry: [None; 4],
        }
    }
}

impl StatusEffects {
    pub fn is_set(&self, flag: StatusFlag) -> bool {
        match flag {
            StatusFlag::AbilitiesDisabled => !self.can_use_abilities,
            StatusFlag::Immobilized => self.is_immobilized,
            StatusFlag::Firewall => self.has_firewall,
            StatusFlag::InvisibleToHackers => self.is_invisible_to_hackers,
        }
    }

    fn write(&mut self, flag: StatusFlag, value: bool) {
        match flag {
            StatusFlag::AbilitiesDisabled => self.can_use_abilities = !value,
            StatusFlag::Immobilized => self.is_immobilized = value,
            StatusFlag::Firewall => self.has_firewall = value,
            StatusFlag::InvisibleToHackers => self.is_invisible_to_hackers = value,
        }
    }

    /// Включает флаг до срабатывания `expiry`. Возвращает предыдущий токен
    /// (его нужно отменить в ScheduledEffects, новое окно заменяет старое).
    pub fn apply_timed(&mut self, flag: StatusFlag, expiry: TimerToken) -> Option<TimerToken> {
        self.write(flag, true);
        self.expiry[flag.index()].replace(expiry)
    }

    /// Снимает флаг, если его держит именно этот таймер
    pub fn expire(&mut self, flag: StatusFlag, token: TimerToken) -> bool {
        if self.expiry[flag.index()] != Some(token) {
            return false;
        }
        self.expiry[flag.index()] = None;
        self.write(flag, false);
        true
    }

    pub fn expiry_token(&self, flag: StatusFlag) -> Option<TimerToken> {
        self.expiry[flag.index()]
    }
}
