//! Очередь отложенных эффектов (fire time → effect, с токеном отмены).
//!
//! Таймеры эффектов QuickHack (снятие freeze/firewall, возврат гравитации,
//! отложенный каскадный kill) живут здесь, а не в компонентах.
//! Эффект - данные (`DeferredEffect`), исполняет их система
//! `crate::quickhack::effects::process_deferred_effects` с доступом к ECS.
//!
//! Инварианты:
//! - отменённый токен никогда не срабатывает
//! - эффекты с одинаковым fire time выполняются в порядке планирования
//! - entity в эффекте может быть уже despawned - исполнитель обязан это терпеть

use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashSet};

use bevy::prelude::*;

/// Токен отмены запланированного эффекта
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Reflect)]
pub struct TimerToken(pub u64);

/// Что сделать, когда таймер сработает
#[derive(Debug, Clone, PartialEq)]
pub enum DeferredEffect {
    /// Снять SystemFreeze
    ClearImmobilized(Entity),
    /// Снять Firewall
    ClearFirewall(Entity),
    /// Снять GhostProtocol
    ClearInvisibility(Entity),
    /// Вернуть способности после lockout
    RestoreAbilities(Entity),
    /// Вернуть гравитацию после GravityFlip
    RestoreGravity { entity: Entity, original: f32 },
    /// Снять метку CascadeVirus
    ClearCascadeMark(Entity),
    /// Каскадный летальный удар
    LethalHit { target: Entity, source: Option<Entity> },
}

impl DeferredEffect {
    pub fn entity(&self) -> Entity {
        match self {
            DeferredEffect::ClearImmobilized(entity)
            | DeferredEffect::ClearFirewall(entity)
            | DeferredEffect::ClearInvisibility(entity)
            | DeferredEffect::RestoreAbilities(entity)
            | DeferredEffect::ClearCascadeMark(entity) => *entity,
            DeferredEffect::RestoreGravity { entity, .. } => *entity,
            DeferredEffect::LethalHit { target, .. } => *target,
        }
    }
}

#[derive(Debug, Clone)]
struct ScheduledEntry {
    fire_at: f64,
    token: TimerToken,
    effect: DeferredEffect,
}

impl PartialEq for ScheduledEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ScheduledEntry {}

impl PartialOrd for ScheduledEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScheduledEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Токены монотонные → при равном fire_at сохраняется порядок планирования
        self.fire_at
            .total_cmp(&other.fire_at)
            .then_with(|| self.token.cmp(&other.token))
    }
}

/// Priority queue отложенных эффектов (sim-clock = `Time<Fixed>::elapsed`)
#[derive(Resource, Debug, Default)]
pub struct ScheduledEffects {
    queue: BinaryHeap<Reverse<ScheduledEntry>>,
    pending: HashSet<TimerToken>,
    next_token: u64,
}

/// Допуск на накопление f32/f64 при сравнении fire time
const FIRE_EPSILON: f64 = 1e-6;

impl ScheduledEffects {
    pub fn schedule(&mut self, now: f64, delay: f32, effect: DeferredEffect) -> TimerToken {
        self.next_token += 1;
        let token = TimerToken(self.next_token);
        let fire_at = now + f64::from(delay.max(0.0));

        self.queue.push(Reverse(ScheduledEntry { fire_at, token, effect }));
        self.pending.insert(token);
        token
    }

    /// Отменяет таймер. `false` если он уже сработал или был отменён.
    pub fn cancel(&mut self, token: TimerToken) -> bool {
        self.pending.remove(&token)
    }

    pub fn is_pending(&self, token: TimerToken) -> bool {
        self.pending.contains(&token)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Отменяет все таймеры, касающиеся entity (despawn, смерть)
    pub fn cancel_for_entity(&mut self, entity: Entity) -> usize {
        let tokens: Vec<TimerToken> = self
            .queue
            .iter()
            .filter(|Reverse(entry)| entry.effect.entity() == entity)
            .map(|Reverse(entry)| entry.token)
            .collect();

        tokens.into_iter().filter(|token| self.cancel(*token)).count()
    }

    /// Забирает все созревшие (и не отменённые) эффекты в порядке fire time
    pub fn drain_due(&mut self, now: f64) -> Vec<(TimerToken, DeferredEffect)> {
        let mut due = Vec::new();

        while let Some(Reverse(entry)) = self.queue.peek() {
            if entry.fire_at > now + FIRE_EPSILON {
                break;
            }
            let Some(Reverse(entry)) = self.queue.pop() else {
                break;
            };
            // Отменённые просто выбрасываем
            if self.pending.remove(&entry.token) {
                due.push((entry.token, entry.effect));
            }
        }

        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(index: u32) -> Entity {
        Entity::from_raw(index)
    }

    #[test]
    fn test_effects_fire_in_time_order() {
        let mut effects = ScheduledEffects::default();
        effects.schedule(0.0, 3.0, DeferredEffect::ClearFirewall(entity(1)));
        effects.schedule(0.0, 1.0, DeferredEffect::ClearImmobilized(entity(2)));

        assert!(effects.drain_due(0.5).is_empty());

        let due = effects.drain_due(1.0);
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].1, DeferredEffect::ClearImmobilized(entity(2)));

        let due = effects.drain_due(10.0);
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].1, DeferredEffect::ClearFirewall(entity(1)));
        assert_eq!(effects.pending_count(), 0);
    }

    #[test]
    fn test_cancelled_token_never_fires() {
        let mut effects = ScheduledEffects::default();
        let token = effects.schedule(0.0, 1.0, DeferredEffect::ClearFirewall(entity(1)));

        assert!(effects.cancel(token));
        assert!(!effects.cancel(token)); // повторная отмена - false
        assert!(effects.drain_due(5.0).is_empty());
    }

    #[test]
    fn test_same_fire_time_keeps_schedule_order() {
        let mut effects = ScheduledEffects::default();
        effects.schedule(0.0, 0.5, DeferredEffect::LethalHit { target: entity(3), source: None });
        effects.schedule(0.0, 0.5, DeferredEffect::LethalHit { target: entity(4), source: None });

        let due: Vec<Entity> = effects.drain_due(0.5).into_iter().map(|(_, e)| e.entity()).collect();
        assert_eq!(due, vec![entity(3), entity(4)]);
    }

    #[test]
    fn test_cancel_for_entity() {
        let mut effects = ScheduledEffects::default();
        effects.schedule(0.0, 1.0, DeferredEffect::ClearFirewall(entity(1)));
        effects.schedule(0.0, 2.0, DeferredEffect::ClearInvisibility(entity(1)));
        let other = effects.schedule(0.0, 2.0, DeferredEffect::ClearFirewall(entity(2)));

        assert_eq!(effects.cancel_for_entity(entity(1)), 2);
        assert!(effects.is_pending(other));
        assert_eq!(effects.drain_due(10.0).len(), 1);
    }
}
