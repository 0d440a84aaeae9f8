//! Player input interpretation
//!
//! Samples the bound keys once per tick into the entity's
//! [`PlayerInputComponent`] and turns them into primary-state requests.
//! Kinematics acts on those requests later in the same tick.

use crate::ecs::component::ComponentKind;
use crate::ecs::components::{PlayerInputComponent, State, StateComponent, SuperState};
use crate::ecs::system::{warn_missing, System, SystemPhase, TickContext, WorkingSet};
use crate::ecs::{Entity, EntityRegistry};

/// Maps held keys onto walk and jump requests
#[derive(Debug, Default)]
pub struct PlayerInputSystem {
    entities: WorkingSet,
}

impl PlayerInputSystem {
    /// Create the system with an empty working set
    pub fn new() -> Self {
        Self::default()
    }
}

impl System for PlayerInputSystem {
    fn name(&self) -> &'static str {
        "player_input"
    }

    fn phase(&self) -> SystemPhase {
        SystemPhase::Input
    }

    fn add_entity(&mut self, entity: Entity, registry: &EntityRegistry) {
        if registry.has::<PlayerInputComponent>(entity) && registry.has::<StateComponent>(entity) {
            self.entities.insert(entity);
        }
    }

    fn remove_entity(&mut self, entity: Entity) {
        self.entities.remove(entity);
    }

    fn tick(&mut self, context: &mut TickContext<'_>, _delta_time: f32) {
        let sampled = context.config.input.sample(context.input);

        for entity in self.entities.iter() {
            let active = context.registry.is_active(entity);
            let store = context.registry.components_mut();
            let Some(input) = store.input.get_mut(entity) else {
                warn_missing(self.name(), entity, ComponentKind::Input);
                continue;
            };
            *input = sampled;

            let Some(state) = store.state.get_mut(entity) else {
                warn_missing(self.name(), entity, ComponentKind::State);
                continue;
            };
            if !active || matches!(state.super_state(), SuperState::Dead | SuperState::Appearing) {
                continue;
            }
            interpret(state, sampled);
        }
    }
}

/// Apply one input sample to a character state machine
fn interpret(state: &mut StateComponent, input: PlayerInputComponent) {
    let idle = input.left == input.right;

    if state.state() == State::Slide {
        // only the key pointing away from the wall breaks a slide
        if !idle {
            if input.left && state.horizontal_direction == 1 {
                state.set_state(State::WalkLeft);
            } else if input.right && state.horizontal_direction == -1 {
                state.set_state(State::WalkRight);
            }
        }
    } else if idle {
        state.set_state(State::Idle);
    } else if input.left {
        state.set_state(State::WalkLeft);
    } else {
        state.set_state(State::WalkRight);
    }

    let wants_jump = input.jump && !input.horizontal_cancels();
    match state.super_state() {
        SuperState::OnGround => {
            state.jumps_performed = 0;
            if wants_jump {
                state.jumps_performed = 1;
                state.set_state(State::Jump);
            }
        }
        SuperState::Falling => {
            if state.state() == State::Slide {
                state.jumps_performed = 1;
            } else if wants_jump {
                match state.jumps_performed {
                    0 => state.set_state(State::Jump),
                    1 => state.set_state(State::DoubleJump),
                    _ => {}
                }
                state.jumps_performed = state.jumps_performed.saturating_add(1);
            }
        }
        _ => {}
    }
}
