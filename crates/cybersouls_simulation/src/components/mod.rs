//! ECS Components для игровых entity
//!
//! Организация по доменам:
//! - actor: роли акторов (Actor, Player, Enemy), Targetable, BodyExtent, Dead
//! - movement: команды перемещения, скорость, импульсы, гравитация

pub mod actor;
pub mod movement;

#[cfg(test)]
mod actor_tests;

// Re-exports для удобного импорта
pub use actor::*;
pub use movement::*;
