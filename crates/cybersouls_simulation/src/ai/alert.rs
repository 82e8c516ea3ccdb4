//! Alert propagation: периодический бродкаст позиции цели союзникам в радиусе
//!
//! Первый бродкаст - сразу после `start_alerting`, дальше раз в
//! `update_interval`. Получатели - множество (порядок не гарантирован).

use bevy::prelude::*;

use super::events::{AlertKind, AllyAlert};
use super::perception::Perception;
use crate::components::{Dead, Enemy};
use crate::environment::actors_in_radius;

#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub struct AlertState {
    pub target: Option<Entity>,
    pub location: Option<Vec3>,
    pub is_alerting: bool,
    pub radius: f32,
    pub update_interval: f32,
    /// До следующего бродкаста
    pub timer: f32,
    /// Разовый бродкаст без периодики
    pub one_shot: bool,
}

impl Default for AlertState {
    fn default() -> Self {
        Self::new(2000.0, 1.0)
    }
}

impl AlertState {
    pub fn new(radius: f32, update_interval: f32) -> Self {
        Self {
            target: None,
            location: None,
            is_alerting: false,
            radius,
            update_interval,
            timer: 0.0,
            one_shot: false,
        }
    }

    /// Начать периодический бродкаст. Повторный вызов по той же цели
    /// только обновляет позицию (таймер не сбрасывается).
    pub fn start_alerting(&mut self, target: Entity, location: Vec3) {
        self.location = Some(location);
        if self.is_alerting && self.target == Some(target) {
            return;
        }
        self.target = Some(target);
        self.is_alerting = true;
        self.timer = 0.0;
    }

    /// Один бродкаст в ближайшую фазу Broadcast
    pub fn alert_once(&mut self, target: Entity, location: Vec3) {
        self.target = Some(target);
        self.location = Some(location);
        self.one_shot = true;
    }

    pub fn update_location(&mut self, location: Vec3) {
        if self.target.is_some() {
            self.location = Some(location);
        }
    }

    pub fn stop_alerting(&mut self) {
        self.target = None;
        self.location = None;
        self.is_alerting = false;
        self.one_shot = false;
        self.timer = 0.0;
    }

    /// Тик таймера. true - пора бродкастить.
    pub fn tick(&mut self, delta: f32) -> bool {
        if self.one_shot {
            self.one_shot = false;
            return self.target.is_some();
        }
        if !self.is_alerting {
            return false;
        }

        self.timer -= delta;
        if self.timer > 0.0 {
            return false;
        }
        self.timer = self.update_interval;
        true
    }
}

/// Система: бродкаст тревоги союзникам
///
/// Получатель видит ту же цель → LocationUpdate, иначе → Alert.
pub fn broadcast_alerts(
    mut broadcasters: Query<(Entity, &Transform, &mut AlertState), Without<Dead>>,
    recipients: Query<(Entity, &Transform, Option<&Perception>), (With<Enemy>, Without<Dead>)>,
    mut alert_events: EventWriter<AllyAlert>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (sender, transform, mut alert) in broadcasters.iter_mut() {
        if !alert.tick(delta) {
            continue;
        }
        let (Some(target), Some(location)) = (alert.target, alert.location) else {
            continue;
        };

        let nearby = actors_in_radius(
            transform.translation,
            alert.radius,
            recipients
                .iter()
                .filter(|(entity, ..)| *entity != sender)
                .map(|(entity, transform, _)| (entity, transform)),
        );

        for (recipient, _) in nearby {
            let sees_target = recipients
                .get(recipient)
                .ok()
                .and_then(|(_, _, perception)| perception)
                .is_some_and(|perception| perception.can_see_target && perception.target == Some(target));

            alert_events.write(AllyAlert {
                sender,
                recipient,
                target,
                location,
                kind: if sees_target { AlertKind::LocationUpdate } else { AlertKind::Alert },
            });
        }

        crate::log(&format!("📢 {:?} alert broadcast at {:?}", sender, location));
    }
}
