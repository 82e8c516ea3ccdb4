//! Target lock: фиксация цели, авто-сброс при смерти / удалении

use bevy::prelude::*;

use super::crosshair::Targeting;
use super::events::{TargetLockChanged, TargetLockIntent};
use crate::components::{Dead, Enemy};
use crate::environment::actors_in_radius;

#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct TargetLock {
    pub locked: Option<Entity>,
    pub max_distance: f32,
}

impl Default for TargetLock {
    fn default() -> Self {
        Self::new(2000.0)
    }
}

impl TargetLock {
    pub fn new(max_distance: f32) -> Self {
        Self {
            locked: None,
            max_distance,
        }
    }

    pub fn is_locked(&self) -> bool {
        self.locked.is_some()
    }

    /// Повторное нажатие снимает lock; иначе лочит кандидата (если есть)
    pub fn toggle(&mut self, candidate: Option<Entity>) -> Option<Entity> {
        self.locked = match self.locked {
            Some(_) => None,
            None => candidate,
        };
        self.locked
    }

    pub fn release(&mut self) -> Option<Entity> {
        self.locked.take()
    }
}

/// Система: TargetLockIntent → toggle
///
/// Кандидат: цель под прицелом, иначе ближайший живой враг в `max_distance`.
pub fn handle_target_lock_intents(
    mut intents: EventReader<TargetLockIntent>,
    mut observers: Query<(&Transform, &mut TargetLock, Option<&Targeting>), Without<Dead>>,
    enemies: Query<(Entity, &Transform), (With<Enemy>, Without<Dead>)>,
    mut lock_events: EventWriter<TargetLockChanged>,
) {
    for intent in intents.read() {
        let Ok((transform, mut lock, targeting)) = observers.get_mut(intent.entity) else {
            continue;
        };

        let candidate = targeting.and_then(|targeting| targeting.current_target).or_else(|| {
            actors_in_radius(transform.translation, lock.max_distance, enemies.iter())
                .first()
                .map(|(entity, _)| *entity)
        });

        let previous = lock.locked;
        let locked = lock.toggle(candidate);
        if previous != locked {
            crate::log(&format!("🎯 {:?} target lock: {:?}", intent.entity, locked));
            lock_events.write(TargetLockChanged {
                observer: intent.entity,
                locked,
            });
        }
    }
}

/// Система: авто-сброс lock'а (цель мертва, despawned или слишком далеко)
pub fn maintain_target_lock(
    mut observers: Query<(Entity, &Transform, &mut TargetLock)>,
    targets: Query<(&Transform, Has<Dead>)>,
    mut lock_events: EventWriter<TargetLockChanged>,
) {
    for (observer, transform, mut lock) in observers.iter_mut() {
        let Some(locked) = lock.locked else {
            continue;
        };

        let keep = targets.get(locked).is_ok_and(|(target, is_dead)| {
            !is_dead && target.translation.distance(transform.translation) <= lock.max_distance
        });
        if keep {
            continue;
        }

        lock.release();
        crate::log(&format!("🎯 {:?} lost target lock on {:?}", observer, locked));
        lock_events.write(TargetLockChanged { observer, locked: None });
    }
}
