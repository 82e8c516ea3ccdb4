//! Physical AI: ближний бой
//!
//! FSM: Idle → Chasing → Attacking ⇄ Chasing → Searching → Idle
//!
//! - видим игрока: запоминаем позицию, отменяем поиск, оповещаем союзников
//! - в радиусе атаки: стоп, разворот, атака когда cooldown готов
//! - вне радиуса: FollowEntity (тот же запрос повторно не выпускаем)
//! - потеряли из виду: ищем у точки тревоги союзника или у last known
//! - поиск: дойти, крутиться на месте, сдаться через max_search_duration

use bevy::prelude::*;
use rand::Rng;

use super::alert::AlertState;
use super::events::{AlertKind, AllyAlert};
use super::perception::Perception;
use crate::combat::{AttackAbility, AttackIntent};
use crate::components::{Dead, Enemy, MovementCommand, NavigationState, Player};
use crate::config::PhysicalAiTuning;
use crate::DeterministicRng;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum PhysicalState {
    #[default]
    Idle,
    Chasing,
    Attacking,
    Searching,
}

#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub struct PhysicalController {
    pub state: PhysicalState,
    pub attack_range: f32,
    pub acceptance_radius: f32,
    pub max_search_duration: f32,
    pub scan_turn_rate: f32,
    /// Видел ли игрока на прошлом тике (per instance)
    pub was_visible: bool,
    pub last_known_location: Option<Vec3>,
    /// Тревога от союзника, ещё не отработанная
    pub pending_alert: Option<Vec3>,
    pub search_location: Option<Vec3>,
    pub search_elapsed: f32,
    /// +1 / -1: направление вращения при осмотре
    pub scan_direction: f32,
}

impl Default for PhysicalController {
    fn default() -> Self {
        Self::new(&PhysicalAiTuning::default())
    }
}

impl PhysicalController {
    pub fn new(tuning: &PhysicalAiTuning) -> Self {
        Self {
            state: PhysicalState::Idle,
            attack_range: tuning.attack_range,
            acceptance_radius: tuning.acceptance_radius,
            max_search_duration: tuning.max_search_duration,
            scan_turn_rate: tuning.scan_turn_rate,
            was_visible: false,
            last_known_location: None,
            pending_alert: None,
            search_location: None,
            search_elapsed: 0.0,
            scan_direction: 1.0,
        }
    }

    pub fn begin_search(&mut self, location: Vec3, scan_direction: f32) {
        self.state = PhysicalState::Searching;
        self.search_location = Some(location);
        self.search_elapsed = 0.0;
        self.scan_direction = scan_direction;
    }

    pub fn cancel_search(&mut self) {
        self.search_location = None;
        self.search_elapsed = 0.0;
    }

    /// Полный сброс в Idle (смерть игрока, конец поиска)
    pub fn reset(&mut self) {
        self.state = PhysicalState::Idle;
        self.was_visible = false;
        self.pending_alert = None;
        self.cancel_search();
    }

    /// Реакция на оповещение союзника. Поиск запускает только `Alert`;
    /// `LocationUpdate` получают те, кто и так видит игрока.
    pub fn receive_alert(&mut self, kind: AlertKind, location: Vec3, sees_player: bool) {
        if sees_player || kind != AlertKind::Alert {
            return;
        }
        self.pending_alert = Some(location);
    }
}

/// Повернуть актора к точке (только по горизонтали)
pub fn face_towards(transform: &mut Transform, point: Vec3) {
    let flat = Vec3::new(point.x, transform.translation.y, point.z);
    if flat.distance_squared(transform.translation) > f32::EPSILON {
        transform.look_at(flat, Vec3::Y);
    }
}

fn set_command(command: &mut MovementCommand, next: MovementCommand) {
    if *command != next {
        *command = next;
    }
}

/// Система: решения physical AI
pub fn physical_ai_decisions(
    mut controllers: Query<
        (
            Entity,
            &mut Transform,
            &mut PhysicalController,
            &Perception,
            &mut AlertState,
            &mut MovementCommand,
            &NavigationState,
            Option<&AttackAbility>,
        ),
        (With<Enemy>, Without<Dead>),
    >,
    players: Query<(Entity, &Transform), (With<Player>, Without<Enemy>, Without<Dead>)>,
    mut alerts: EventReader<AllyAlert>,
    mut attack_events: EventWriter<AttackIntent>,
    mut rng: ResMut<DeterministicRng>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for alert in alerts.read() {
        if let Ok((_, _, mut controller, perception, ..)) = controllers.get_mut(alert.recipient) {
            controller.receive_alert(alert.kind, alert.location, perception.can_see_target);
        }
    }

    let player = players.iter().min_by_key(|(entity, _)| *entity);

    for (entity, mut transform, mut controller, perception, mut alert, mut command, navigation, attack) in
        controllers.iter_mut()
    {
        let Some((player_entity, player_transform)) = player else {
            // Игрока нет - всё в Idle
            if controller.state != PhysicalState::Idle {
                controller.reset();
                alert.stop_alerting();
                set_command(&mut command, MovementCommand::Stop);
            }
            continue;
        };
        let player_position = player_transform.translation;
        let visible = perception.can_see_target && perception.target == Some(player_entity);

        if visible {
            controller.last_known_location = Some(player_position);
            if !controller.was_visible {
                controller.cancel_search();
                controller.pending_alert = None;
                alert.start_alerting(player_entity, player_position);
                crate::log(&format!("👁️ {:?} spotted player", entity));
            } else {
                alert.update_location(player_position);
            }

            let distance = transform.translation.distance(player_position);
            if distance <= controller.attack_range {
                controller.state = PhysicalState::Attacking;
                set_command(&mut command, MovementCommand::Stop);
                face_towards(&mut transform, player_position);

                if attack.is_some_and(|attack| attack.ability.is_ready()) {
                    attack_events.write(AttackIntent {
                        attacker: entity,
                        target: player_entity,
                    });
                }
            } else {
                controller.state = PhysicalState::Chasing;
                // Уже следуем за этой целью - не перевыпускаем запрос
                if !command.is_following(player_entity) {
                    *command = MovementCommand::FollowEntity {
                        target: player_entity,
                        acceptance_radius: controller.acceptance_radius,
                    };
                }
            }

            controller.was_visible = true;
            continue;
        }

        // Игрок не виден
        if controller.was_visible {
            controller.was_visible = false;
            alert.stop_alerting();
            crate::log(&format!("❓ {:?} lost sight of player", entity));

            let location = controller.pending_alert.take().or(controller.last_known_location);
            match location {
                Some(location) => start_search(&mut controller, &mut command, location, &mut rng),
                None => {
                    controller.reset();
                    set_command(&mut command, MovementCommand::Stop);
                }
            }
            continue;
        }

        if controller.state != PhysicalState::Searching {
            if let Some(location) = controller.pending_alert.take() {
                crate::log(&format!("📢 {:?} responds to ally alert", entity));
                start_search(&mut controller, &mut command, location, &mut rng);
            } else if controller.state != PhysicalState::Idle {
                // Chasing/Attacking без видимости (например, цель сменилась) - ищем у last known
                match controller.last_known_location {
                    Some(location) => start_search(&mut controller, &mut command, location, &mut rng),
                    None => controller.reset(),
                }
            }
            continue;
        }

        tick_search(&mut controller, &mut transform, &mut command, navigation, delta, entity);
    }
}

fn start_search(
    controller: &mut PhysicalController,
    command: &mut MovementCommand,
    location: Vec3,
    rng: &mut DeterministicRng,
) {
    let scan_direction = if rng.rng.gen_bool(0.5) { 1.0 } else { -1.0 };
    controller.begin_search(location, scan_direction);
    set_command(
        command,
        MovementCommand::MoveToPosition {
            target: location,
            acceptance_radius: controller.acceptance_radius,
        },
    );
}

fn tick_search(
    controller: &mut PhysicalController,
    transform: &mut Transform,
    command: &mut MovementCommand,
    navigation: &NavigationState,
    delta: f32,
    entity: Entity,
) {
    controller.search_elapsed += delta;
    if controller.search_elapsed >= controller.max_search_duration {
        crate::log(&format!("🤷 {:?} gave up searching", entity));
        controller.reset();
        set_command(command, MovementCommand::Stop);
        return;
    }

    let Some(location) = controller.search_location else {
        controller.reset();
        return;
    };

    let flat_distance = Vec2::new(transform.translation.x - location.x, transform.translation.z - location.z).length();
    let arrived = flat_distance <= controller.acceptance_radius
        || (navigation.is_target_reached && matches!(command, MovementCommand::MoveToPosition { .. }));

    if arrived {
        // Осмотр: вращение на месте
        set_command(command, MovementCommand::Idle);
        transform.rotate_y(controller.scan_direction * controller.scan_turn_rate * delta);
    }
}
