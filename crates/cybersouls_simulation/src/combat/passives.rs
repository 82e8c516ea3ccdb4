//! Пассивные способности игрока

use bevy::prelude::*;

use crate::attributes::ActorDied;
use crate::components::Player;

/// ExecutionChains: после убийства врага открывается окно, в котором
/// Slash игнорирует Block
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct ExecutionChains {
    pub window: f32,
    pub remaining: f32,
}

impl ExecutionChains {
    pub fn new(window: f32) -> Self {
        Self {
            window: window.max(0.0),
            remaining: 0.0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.remaining > 0.0
    }

    /// Открыть (или перезапустить) окно
    pub fn open(&mut self) {
        self.remaining = self.window;
    }

    pub fn tick(&mut self, delta: f32) {
        self.remaining = (self.remaining - delta).max(0.0);
    }
}

/// SystemOvercharge: Slash игнорирует Block и Dodge, слоты QuickHack заблокированы
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct SystemOvercharge {
    pub active: bool,
}

/// Система: убийство врага игроком открывает окно ExecutionChains
pub fn open_execution_chains(
    mut died: EventReader<ActorDied>,
    mut players: Query<&mut ExecutionChains, With<Player>>,
) {
    for event in died.read() {
        if event.was_player {
            continue;
        }
        let Some(killer) = event.killer else {
            continue;
        };
        if let Ok(mut chains) = players.get_mut(killer) {
            chains.open();
            crate::log(&format!("⛓️ Execution chains open ({:.1}s)", chains.window));
        }
    }
}

pub fn tick_execution_chains(mut query: Query<&mut ExecutionChains>, time: Res<Time<Fixed>>) {
    let delta = time.delta_secs();

    for mut chains in query.iter_mut() {
        if chains.is_active() {
            chains.tick(delta);
        }
    }
}
