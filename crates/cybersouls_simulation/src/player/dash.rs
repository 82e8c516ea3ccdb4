//! Dash: рывок на зарядах + stamina

use bevy::prelude::*;

use super::events::{DashIntent, DashPerformed};
use crate::abilities::{Ability, AbilityKind, Activatable};
use crate::attributes::{Stamina, StaminaChanged, StatusEffects};
use crate::combat::ChargeResource;
use crate::components::{Dead, Grounded, Impulse};
use crate::config::DashTuning;
use crate::error::{AbilityError, AbilityResult};

/// Dash игрока
///
/// Заряды восстанавливаются только на земле. Пока идёт рывок
/// (`active_remaining > 0`), `ability.is_active`.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct DashAbility {
    pub ability: Ability,
    pub charges: ChargeResource,
    pub stamina_cost: f32,
    pub distance: f32,
    pub duration: f32,
    pub can_dash_in_air: bool,
    pub active_remaining: f32,
}

impl Default for DashAbility {
    fn default() -> Self {
        Self::new(&DashTuning::default())
    }
}

impl DashAbility {
    pub fn new(tuning: &DashTuning) -> Self {
        Self {
            ability: Ability::new(tuning.cooldown),
            charges: ChargeResource::new(tuning.max_charges, Some(tuning.regen_period)),
            stamina_cost: tuning.stamina_cost,
            distance: tuning.distance,
            duration: tuning.duration,
            can_dash_in_air: tuning.can_dash_in_air,
            active_remaining: 0.0,
        }
    }

    pub fn can_dash(&self, owner_alive: bool, grounded: bool, status: &StatusEffects, stamina: &Stamina) -> AbilityResult {
        if !status.can_use_abilities {
            return Err(AbilityError::AbilitiesDisabled);
        }
        if status.is_immobilized || (!grounded && !self.can_dash_in_air) {
            return Err(AbilityError::NotAvailable);
        }
        self.ability.can_activate(owner_alive)?;
        if !self.charges.has_charge() {
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

    /// Тратит заряд + stamina, возвращает импульс рывка в `direction`
    pub fn perform(
        &mut self,
        direction: Vec3,
        owner_alive: bool,
        grounded: bool,
        status: &StatusEffects,
        stamina: &mut Stamina,
    ) -> Result<Impulse, AbilityError> {
        self.can_dash(owner_alive, grounded, status, stamina)?;

        self.charges.consume()?;
        stamina.use_stamina(self.stamina_cost);
        self.ability.activate(owner_alive)?;
        self.active_remaining = self.duration;

        let horizontal = Vec3::new(direction.x, 0.0, direction.z);
        Ok(Impulse::over_distance(horizontal, self.distance, self.duration))
    }
}

impl Activatable for DashAbility {
    fn tick_cooldowns(&mut self, delta: f32) -> Vec<AbilityKind> {
        if self.active_remaining > 0.0 {
            self.active_remaining = (self.active_remaining - delta).max(0.0);
            if self.active_remaining <= 0.0 {
                self.ability.deactivate();
            }
        }

        if self.ability.tick(delta) {
            vec![AbilityKind::Dash]
        } else {
            Vec::new()
        }
    }
}

/// Система: регенерация зарядов dash (только на земле)
pub fn regenerate_dash_charges(mut query: Query<(Entity, &mut DashAbility, &Grounded)>, time: Res<Time<Fixed>>) {
    let delta = time.delta_secs();

    for (entity, mut dash, grounded) in query.iter_mut() {
        if dash.charges.tick_regen(delta, grounded.0) {
            crate::log(&format!(
                "🔋 {:?} dash charge restored ({}/{})",
                entity, dash.charges.current, dash.charges.max
            ));
        }
    }
}

/// Система: обработка DashIntent
pub fn handle_dash_intents(
    mut intents: EventReader<DashIntent>,
    mut dashers: Query<(
        &Transform,
        &mut DashAbility,
        &mut Stamina,
        &mut Impulse,
        &StatusEffects,
        &Grounded,
        Has<Dead>,
    )>,
    mut performed_events: EventWriter<DashPerformed>,
    mut stamina_events: EventWriter<StaminaChanged>,
) {
    for intent in intents.read() {
        let Ok((transform, mut dash, mut stamina, mut impulse, status, grounded, is_dead)) =
            dashers.get_mut(intent.entity)
        else {
            continue;
        };

        let direction = intent
            .direction
            .filter(|direction| Vec3::new(direction.x, 0.0, direction.z).length_squared() > f32::EPSILON)
            .unwrap_or_else(|| transform.forward().as_vec3());

        match dash.perform(direction, !is_dead, grounded.0, status, &mut stamina) {
            Ok(dash_impulse) => {
                *impulse = dash_impulse;
                stamina_events.write(StaminaChanged {
                    entity: intent.entity,
                    current: stamina.current,
                    max: stamina.max,
                });
                performed_events.write(DashPerformed {
                    entity: intent.entity,
                    charges_left: dash.charges.current,
                });
                crate::log(&format!(
                    "💨 {:?} dashed, {} charges left",
                    intent.entity, dash.charges.current
                ));
            }
            Err(error) => {
                crate::log(&format!("⛔ Dash rejected for {:?}: {}", intent.entity, error));
            }
        }
    }
}
