//! Quest tracking + progression XP
//!
//! Квест: убить всех зарегистрированных врагов. Враг регистрируется при
//! появлении `Enemy`, каждая смерть врага уменьшает счётчик. Последняя
//! смерть → `QuestCompleted` → оставшиеся integrity и сопротивление взлому
//! игрока конвертируются в XP.

use bevy::prelude::*;

use crate::attributes::{ActorDied, PlayerAttributes};
use crate::components::{Enemy, Player};
use crate::config::{ProgressionRatios, SimulationConfig};
use crate::GameplaySet;

/// Счётчик врагов текущего квеста
#[derive(Resource, Debug, Clone, Default, PartialEq, Reflect)]
#[reflect(Resource)]
pub struct QuestTracker {
    pub registered: u32,
    pub remaining: u32,
    pub completed: bool,
}

impl QuestTracker {
    pub fn register(&mut self) {
        self.registered += 1;
        self.remaining += 1;
    }

    /// Смерть врага. true - квест завершился на этой смерти.
    pub fn record_kill(&mut self) -> bool {
        if self.completed || self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        if self.remaining == 0 {
            self.completed = true;
            return true;
        }
        false
    }
}

/// Накопленный опыт игрока (переживает рестарт уровня)
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Resource)]
pub struct PlayerProgression {
    pub integrity_xp: f32,
    pub hacking_xp: f32,
}

impl PlayerProgression {
    /// Добавляет каждую часть, только если она > 0
    pub fn add(&mut self, integrity_xp: f32, hacking_xp: f32) {
        if integrity_xp > 0.0 {
            self.integrity_xp += integrity_xp;
        }
        if hacking_xp > 0.0 {
            self.hacking_xp += hacking_xp;
        }
    }
}

#[derive(Event, Debug, Clone, PartialEq)]
pub struct QuestCompleted {
    pub enemies_defeated: u32,
}

/// Опыт за квест (для persistence collaborator'а)
#[derive(Event, Debug, Clone, PartialEq)]
pub struct ExperienceAwarded {
    pub integrity_xp: f32,
    pub hacking_xp: f32,
    pub total: PlayerProgression,
}

/// (integrity_xp, hacking_xp) из оставшихся статов игрока
pub fn experience_for(attributes: &PlayerAttributes, ratios: &ProgressionRatios) -> (f32, f32) {
    let integrity_xp = attributes.integrity * ratios.integrity_to_xp;
    let hack_resistance = attributes.max_hack_progress - attributes.hack_progress;
    let hacking_xp = hack_resistance * ratios.hack_resistance_to_xp;
    (integrity_xp, hacking_xp)
}

/// Система: регистрация новых врагов в квесте
pub fn register_quest_targets(mut tracker: ResMut<QuestTracker>, added: Query<Entity, Added<Enemy>>) {
    for _ in added.iter() {
        tracker.register();
    }
}

/// Система: смерти врагов → QuestCompleted
pub fn track_quest_progress(
    mut died: EventReader<ActorDied>,
    mut tracker: ResMut<QuestTracker>,
    mut completed_events: EventWriter<QuestCompleted>,
) {
    for event in died.read() {
        if event.was_player {
            continue;
        }
        if tracker.record_kill() {
            crate::log_info(&format!("🏆 Quest complete: {} enemies defeated", tracker.registered));
            completed_events.write(QuestCompleted {
                enemies_defeated: tracker.registered,
            });
        }
    }
}

/// Система: QuestCompleted → XP игроку
pub fn award_experience(
    mut completed: EventReader<QuestCompleted>,
    players: Query<&PlayerAttributes, With<Player>>,
    config: Res<SimulationConfig>,
    mut progression: ResMut<PlayerProgression>,
    mut awarded_events: EventWriter<ExperienceAwarded>,
) {
    for _ in completed.read() {
        let Some(attributes) = players.iter().next() else {
            crate::log_warning("⚠️ Quest completed without a player, no XP awarded");
            continue;
        };

        let (integrity_xp, hacking_xp) = experience_for(attributes, &config.progression);
        progression.add(integrity_xp, hacking_xp);

        crate::log_info(&format!(
            "✨ XP gained: integrity {:.1}, hacking {:.1} (total {:.1} / {:.1})",
            integrity_xp, hacking_xp, progression.integrity_xp, progression.hacking_xp
        ));
        awarded_events.write(ExperienceAwarded {
            integrity_xp: integrity_xp.max(0.0),
            hacking_xp: hacking_xp.max(0.0),
            total: *progression,
        });
    }
}

pub struct ProgressionPlugin;

impl Plugin for ProgressionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<QuestTracker>()
            .init_resource::<PlayerProgression>()
            .add_event::<QuestCompleted>()
            .add_event::<ExperienceAwarded>();

        app.add_systems(
            FixedUpdate,
            (
                register_quest_targets.in_set(GameplaySet::Timers),
                (track_quest_progress, award_experience)
                    .chain()
                    .in_set(GameplaySet::Reactions),
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quest_completes_on_last_kill() {
        let mut tracker = QuestTracker::default();
        tracker.register();
        tracker.register();

        assert!(!tracker.record_kill());
        assert!(tracker.record_kill());
        assert!(tracker.completed);
        // Повторно не завершается
        assert!(!tracker.record_kill());
    }

    #[test]
    fn test_empty_quest_never_completes() {
        let mut tracker = QuestTracker::default();
        assert!(!tracker.record_kill());
        assert!(!tracker.completed);
    }

    #[test]
    fn test_experience_from_remaining_stats() {
        let mut attributes = PlayerAttributes::default();
        attributes.integrity = 60.0;
        attributes.hack_progress = 30.0;

        let (integrity_xp, hacking_xp) = experience_for(&attributes, &ProgressionRatios::default());
        assert_eq!(integrity_xp, 60.0);
        assert_eq!(hacking_xp, 35.0);
    }

    #[test]
    fn test_progression_skips_non_positive_parts() {
        let mut progression = PlayerProgression::default();
        progression.add(0.0, 12.5);
        progression.add(-5.0, 0.0);

        assert_eq!(progression.integrity_xp, 0.0);
        assert_eq!(progression.hacking_xp, 12.5);
    }
}
