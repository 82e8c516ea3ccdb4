//! Слоты QuickHack игрока (1-based, 4 слота) + список разблокированных
//!
//! Слот хранит только тип; состояние каста/cooldown живёт в `QuickHackLoadout`.

use bevy::prelude::*;

use super::cast::QuickHackLoadout;
use super::types::QuickHackType;
use crate::attributes::StatusEffects;
use crate::error::{AbilityError, AbilityResult};

pub const SLOT_COUNT: usize = 4;

const EMPTY_SLOT_NAME: &str = "Empty";
const INVALID_SLOT_NAME: &str = "Invalid Slot";

#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub struct QuickHackSlots {
    slots: [Option<QuickHackType>; SLOT_COUNT],
    pub available: Vec<QuickHackType>,
}

impl Default for QuickHackSlots {
    fn default() -> Self {
        let starting = [
            QuickHackType::InterruptProtocol,
            QuickHackType::SystemFreeze,
            QuickHackType::Firewall,
            QuickHackType::Kill,
        ];

        Self {
            slots: starting.map(Some),
            available: starting.to_vec(),
        }
    }
}

impl QuickHackSlots {
    fn index(slot: usize) -> Result<usize, AbilityError> {
        if (1..=SLOT_COUNT).contains(&slot) {
            Ok(slot - 1)
        } else {
            Err(AbilityError::InvalidSlot(slot))
        }
    }

    pub fn slot(&self, slot: usize) -> Option<QuickHackType> {
        Self::index(slot).ok().and_then(|index| self.slots[index])
    }

    /// Тип в слоте или причина, почему его нет
    pub fn resolve(&self, slot: usize) -> Result<QuickHackType, AbilityError> {
        let index = Self::index(slot)?;
        self.slots[index].ok_or(AbilityError::EmptySlot(slot))
    }

    pub fn is_available(&self, hack_type: QuickHackType) -> bool {
        self.available.contains(&hack_type)
    }

    /// Экипировать хак в слот (только из `available`)
    pub fn set_slot(&mut self, slot: usize, hack_type: QuickHackType) -> AbilityResult {
        let index = Self::index(slot)?;
        if !self.is_available(hack_type) {
            return Err(AbilityError::NotAvailable);
        }
        self.slots[index] = Some(hack_type);
        Ok(())
    }

    pub fn clear_slot(&mut self, slot: usize) -> AbilityResult {
        let index = Self::index(slot)?;
        self.slots[index] = None;
        Ok(())
    }

    pub fn swap_slots(&mut self, first: usize, second: usize) -> AbilityResult {
        let a = Self::index(first)?;
        let b = Self::index(second)?;
        self.slots.swap(a, b);
        Ok(())
    }

    /// Разблокировать хак. false - уже был доступен.
    pub fn unlock(&mut self, hack_type: QuickHackType) -> bool {
        if self.is_available(hack_type) {
            return false;
        }
        self.available.push(hack_type);
        true
    }

    /// Полная проверка активации слота (слот + пассивки + статус + базовая способность)
    pub fn can_activate_slot(
        &self,
        slot: usize,
        loadout: &QuickHackLoadout,
        owner_alive: bool,
        status: &StatusEffects,
        overcharge_active: bool,
    ) -> AbilityResult {
        let hack_type = self.resolve(slot)?;
        if overcharge_active {
            return Err(AbilityError::BlockedByPassive);
        }
        if !status.can_use_abilities {
            return Err(AbilityError::AbilitiesDisabled);
        }
        let hack = loadout.get(hack_type).ok_or(AbilityError::NotAvailable)?;
        hack.ability.can_activate(owner_alive)
    }

    pub fn cooldown_remaining(&self, slot: usize, loadout: &QuickHackLoadout) -> f32 {
        self.slot(slot)
            .and_then(|hack_type| loadout.get(hack_type))
            .map_or(0.0, |hack| hack.ability.cooldown_remaining)
    }

    pub fn cast_time_remaining(&self, slot: usize, loadout: &QuickHackLoadout) -> f32 {
        self.slot(slot)
            .and_then(|hack_type| loadout.get(hack_type))
            .map_or(0.0, |hack| hack.cast_time_remaining())
    }

    pub fn is_slot_casting(&self, slot: usize, loadout: &QuickHackLoadout) -> bool {
        self.slot(slot)
            .and_then(|hack_type| loadout.get(hack_type))
            .is_some_and(|hack| hack.is_casting())
    }

    /// Прервать каст в слоте. Some(тип, цель) - если каст шёл.
    pub fn cancel_slot(
        &self,
        slot: usize,
        loadout: &mut QuickHackLoadout,
    ) -> Option<(QuickHackType, Option<Entity>)> {
        let hack_type = self.slot(slot)?;
        let hack = loadout.get_mut(hack_type)?;
        if !hack.is_casting() {
            return None;
        }
        Some((hack_type, hack.interrupt()))
    }

    pub fn slot_display_name(&self, slot: usize) -> &'static str {
        match Self::index(slot) {
            Err(_) => INVALID_SLOT_NAME,
            Ok(index) => self.slots[index].map_or(EMPTY_SLOT_NAME, QuickHackType::display_name),
        }
    }
}
