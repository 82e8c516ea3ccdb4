//! Прыжок + двойной прыжок

use bevy::prelude::*;

use super::events::{JumpIntent, Jumped};
use crate::attributes::{Stamina, StaminaChanged, StatusEffects};
use crate::components::{Dead, Grounded, Velocity};
use crate::config::DoubleJumpTuning;
use crate::error::{AbilityError, AbilityResult};

/// Прыжки игрока
///
/// С земли прыжок бесплатный; в воздухе до `max_jumps_in_air` прыжков
/// за stamina. Счётчик сбрасывается при приземлении.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct DoubleJump {
    pub max_jumps_in_air: u32,
    pub air_jumps_used: u32,
    pub stamina_cost: f32,
    pub jump_velocity: f32,
    pub double_jump_velocity: f32,
}

impl Default for DoubleJump {
    fn default() -> Self {
        Self::new(&DoubleJumpTuning::default())
    }
}

/// Результат прыжка: вертикальная скорость + был ли он воздушным
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JumpOutcome {
    pub velocity: f32,
    pub air_jump: bool,
}

impl DoubleJump {
    pub fn new(tuning: &DoubleJumpTuning) -> Self {
        Self {
            max_jumps_in_air: tuning.max_jumps_in_air,
            air_jumps_used: 0,
            stamina_cost: tuning.stamina_cost,
            jump_velocity: tuning.jump_velocity,
            double_jump_velocity: tuning.double_jump_velocity,
        }
    }

    pub fn can_jump(&self, owner_alive: bool, grounded: bool, status: &StatusEffects, stamina: &Stamina) -> AbilityResult {
        if !owner_alive {
            return Err(AbilityError::OwnerDead);
        }
        if status.is_immobilized {
            return Err(AbilityError::NotAvailable);
        }
        if grounded {
            return Ok(());
        }
        if self.air_jumps_used >= self.max_jumps_in_air {
            return Err(AbilityError::NoCharges);
        }
        if !stamina.has_enough(self.stamina_cost) {
            return Err(AbilityError::InsufficientStamina {
                required: self.stamina_cost,
                available: stamina.current,
            });
        }
        Ok(())
    }

    pub fn jump(
        &mut self,
        owner_alive: bool,
        grounded: bool,
        status: &StatusEffects,
        stamina: &mut Stamina,
    ) -> Result<JumpOutcome, AbilityError> {
        self.can_jump(owner_alive, grounded, status, stamina)?;

        if grounded {
            return Ok(JumpOutcome {
                velocity: self.jump_velocity,
                air_jump: false,
            });
        }

        stamina.use_stamina(self.stamina_cost);
        self.air_jumps_used += 1;
        Ok(JumpOutcome {
            velocity: self.double_jump_velocity,
            air_jump: true,
        })
    }

    pub fn land(&mut self) {
        self.air_jumps_used = 0;
    }
}

/// Система: сброс воздушных прыжков на земле
pub fn reset_air_jumps(mut query: Query<(&mut DoubleJump, &Grounded)>) {
    for (mut jump, grounded) in query.iter_mut() {
        if grounded.0 && jump.air_jumps_used > 0 {
            jump.land();
        }
    }
}

/// Система: обработка JumpIntent
pub fn handle_jump_intents(
    mut intents: EventReader<JumpIntent>,
    mut jumpers: Query<(
        &mut DoubleJump,
        &mut Stamina,
        &mut Velocity,
        &mut Grounded,
        &StatusEffects,
        Has<Dead>,
    )>,
    mut jumped_events: EventWriter<Jumped>,
    mut stamina_events: EventWriter<StaminaChanged>,
) {
    for intent in intents.read() {
        let Ok((mut jump, mut stamina, mut velocity, mut grounded, status, is_dead)) = jumpers.get_mut(intent.entity)
        else {
            continue;
        };

        match jump.jump(!is_dead, grounded.0, status, &mut stamina) {
            Ok(outcome) => {
                velocity.0.y = outcome.velocity;
                grounded.0 = false;

                if outcome.air_jump {
                    stamina_events.write(StaminaChanged {
                        entity: intent.entity,
                        current: stamina.current,
                        max: stamina.max,
                    });
                }
                jumped_events.write(Jumped {
                    entity: intent.entity,
                    air_jump: outcome.air_jump,
                });
                crate::log(&format!(
                    "🦘 {:?} {}",
                    intent.entity,
                    if outcome.air_jump { "double jumped" } else { "jumped" }
                ));
            }
            Err(error) => {
                crate::log(&format!("⛔ Jump rejected for {:?}: {}", intent.entity, error));
            }
        }
    }
}
