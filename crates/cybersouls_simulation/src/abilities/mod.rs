//! Ability framework: cooldown/active state machine, общий для всех способностей

pub mod ability;

#[cfg(test)]
mod ability_tests;

pub use ability::{tick_ability_cooldowns, Ability, AbilityKind, AbilityReady, Activatable};
