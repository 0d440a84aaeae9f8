//! Kinematic integration
//!
//! Turns the state machine's requests into velocity and acceleration, then
//! integrates one semi-implicit Euler step. Super-state transitions that
//! follow directly from the motion (take-off, apex) happen here; transitions
//! caused by contact belong to the collision systems.

use crate::core::PhysicsConfig;
use crate::ecs::component::ComponentKind;
use crate::ecs::components::{MovementComponent, State, StateComponent, SuperState};
use crate::ecs::system::{warn_missing, System, SystemPhase, TickContext, WorkingSet};
use crate::ecs::{Entity, EntityRegistry};
use crate::events::Message;
use crate::foundation::math::Vec2;

/// Integrates every moving character
#[derive(Debug, Default)]
pub struct MovementSystem {
    entities: WorkingSet,
}

impl MovementSystem {
    /// Create the system with an empty working set
    pub fn new() -> Self {
        Self::default()
    }
}

impl System for MovementSystem {
    fn name(&self) -> &'static str {
        "movement"
    }

    fn phase(&self) -> SystemPhase {
        SystemPhase::Physics
    }

    fn add_entity(&mut self, entity: Entity, registry: &EntityRegistry) {
        if registry.has::<StateComponent>(entity) && registry.has::<MovementComponent>(entity) {
            self.entities.insert(entity);
        }
    }

    fn remove_entity(&mut self, entity: Entity) {
        self.entities.remove(entity);
    }

    fn tick(&mut self, context: &mut TickContext<'_>, delta_time: f32) {
        let physics = &context.config.physics;
        let level_bottom = context.config.level_bottom();

        for entity in self.entities.iter() {
            if !context.registry.is_active(entity) {
                continue;
            }
            let store = context.registry.components_mut();
            let Some(state) = store.state.get_mut(entity) else {
                warn_missing(self.name(), entity, ComponentKind::State);
                continue;
            };
            if state.super_state() == SuperState::Appearing {
                continue;
            }
            let Some(movement) = store.movement.get_mut(entity) else {
                warn_missing(self.name(), entity, ComponentKind::Movement);
                continue;
            };

            vertical(state, movement, physics);
            horizontal(state, movement, physics);
            let clamp = (state.super_state() != SuperState::OnGround).then_some(physics.walk_speed);
            movement.integrate(delta_time, clamp);

            if let Some(collision_box) = store.collision_box.get_mut(entity) {
                collision_box.update_position(movement.position(), state.horizontal_direction);
            }
            if movement.position().y >= level_bottom {
                log::debug!("{entity:?} fell out of the level");
                context.bus.publish(&Message::ReloadLevel);
            }
        }
    }
}

fn vertical(state: &mut StateComponent, movement: &mut MovementComponent, physics: &PhysicsConfig) {
    match state.super_state() {
        SuperState::OnGround => {
            movement.stop();
            if state.state() == State::Jump {
                movement.velocity.y = physics.jump_speed;
                state.set_super_state(SuperState::Jumping);
            }
        }
        SuperState::Falling => {
            let gravity = if state.state() == State::Slide {
                physics.gravity / 10.0
            } else {
                physics.gravity
            };
            movement.acceleration = Vec2::new(0.0, gravity);
            if state.state() == State::DoubleJump {
                movement.velocity.y += physics.jump_speed;
                state.set_super_state(SuperState::DoubleJumping);
            }
        }
        SuperState::Jumping | SuperState::DoubleJumping => {
            movement.acceleration = Vec2::new(0.0, physics.gravity);
            if movement.velocity.y > 0.0 {
                state.set_super_state(SuperState::Falling);
            }
        }
        SuperState::Dead | SuperState::Sliding | SuperState::Appearing => {}
    }
}

fn horizontal(state: &mut StateComponent, movement: &mut MovementComponent, physics: &PhysicsConfig) {
    match state.state() {
        State::WalkLeft => {
            state.horizontal_direction = -1;
            movement.velocity.x -= physics.walk_speed;
        }
        State::WalkRight => {
            state.horizontal_direction = 1;
            movement.velocity.x += physics.walk_speed;
        }
        _ => {}
    }
}
