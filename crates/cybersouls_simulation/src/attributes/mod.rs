//! Attribute / health model
//!
//! - EnemyAttributes: integrity, смерть при 0
//! - PlayerAttributes: integrity (не убивает) + hack progress (убивает при max)
//! - StatusEffects: флаги от QuickHack эффектов (freeze, firewall, ghost, lockout)
//! - Stamina: ресурс dash/double jump
//!
//! Внешние системы меняют атрибуты только через DamageRequest
//! (или методы компонентов), никогда прямой записью полей.

use bevy::prelude::*;

pub mod enemy;
pub mod events;
pub mod player;
pub mod stamina;
pub mod status;
pub mod systems;


pub use enemy::{AttributeChange, DamageOutcome, EnemyAttributes};
pub use events::*;
pub use player::{crossed_milestones, HackOutcome, PlayerAttributes, INTEGRITY_MILESTONES};
pub use stamina::Stamina;
pub use status::{StatusEffects, StatusFlag};

/// Системы атрибутов (порядок задаёт `SimulationPlugin` через `GameplaySet`)
pub struct AttributesPlugin;

impl Plugin for AttributesPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<DamageRequest>()
            .add_event::<DamageApplied>()
            .add_event::<IntegrityChanged>()
            .add_event::<HackProgressChanged>()
            .add_event::<StaminaChanged>()
            .add_event::<ActorDied>();

        app.add_systems(
            FixedUpdate,
            (
                systems::apply_damage_requests.in_set(crate::GameplaySet::Resolution),
                systems::regenerate_stamina.in_set(crate::GameplaySet::Timers),
            ),
        );
    }
}
