//! Enemy patrol decisions
//!
//! Grounded enemies walk back and forth between their patrol bounds and turn
//! around when a wall blocks them. Airborne enemies are left alone.

use crate::ecs::component::ComponentKind;
use crate::ecs::components::{EnemyPatrolComponent, MovementComponent, State, StateComponent, SuperState};
use crate::ecs::system::{warn_missing, System, SystemPhase, TickContext, WorkingSet};
use crate::ecs::{Entity, EntityRegistry};

/// Turns patrolling enemies at their bounds
#[derive(Debug, Default)]
pub struct EnemyPatrolSystem {
    entities: WorkingSet,
}

impl EnemyPatrolSystem {
    /// Create the system with an empty working set
    pub fn new() -> Self {
        Self::default()
    }
}

impl System for EnemyPatrolSystem {
    fn name(&self) -> &'static str {
        "enemy_patrol"
    }

    fn phase(&self) -> SystemPhase {
        SystemPhase::Input
    }

    fn add_entity(&mut self, entity: Entity, registry: &EntityRegistry) {
        if registry.has::<EnemyPatrolComponent>(entity)
            && registry.has::<StateComponent>(entity)
            && registry.has::<MovementComponent>(entity)
        {
            self.entities.insert(entity);
        }
    }

    fn remove_entity(&mut self, entity: Entity) {
        self.entities.remove(entity);
    }

    fn tick(&mut self, context: &mut TickContext<'_>, _delta_time: f32) {
        for entity in self.entities.iter() {
            if !context.registry.is_active(entity) {
                continue;
            }
            let store = context.registry.components_mut();
            let Some(state) = store.state.get_mut(entity) else {
                warn_missing(self.name(), entity, ComponentKind::State);
                continue;
            };
            if matches!(state.super_state(), SuperState::Appearing | SuperState::Dead) {
                continue;
            }
            let Some(movement) = store.movement.get(entity) else {
                warn_missing(self.name(), entity, ComponentKind::Movement);
                continue;
            };
            let Some(patrol) = store.patrol.get_mut(entity) else {
                warn_missing(self.name(), entity, ComponentKind::Patrol);
                continue;
            };

            patrol.update(movement.position().x);
            if state.super_state() == SuperState::OnGround {
                steer(state, patrol);
            }
        }
    }
}

fn steer(state: &mut StateComponent, patrol: &EnemyPatrolComponent) {
    match state.state() {
        State::WalkLeft => {
            if patrol.should_turn_right() || !state.can_move_left() {
                state.set_state(State::WalkRight);
            }
        }
        State::WalkRight => {
            if patrol.should_turn_left() || !state.can_move_right() {
                state.set_state(State::WalkLeft);
            }
        }
        _ => {
            state.set_state(state.default_state());
            if !state.can_move_left() {
                state.set_state(State::WalkRight);
            } else if !state.can_move_right() {
                state.set_state(State::WalkLeft);
            }
        }
    }
}
