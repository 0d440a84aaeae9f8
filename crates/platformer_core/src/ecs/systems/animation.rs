//! Sprite animation playback
//!
//! Follows the animation intent of the state machine: a change of intent
//! rewinds the strips involved, then the current strip advances at its own
//! frame rate. Drawing mirrors the sprite for entities facing left.

use crate::ecs::component::ComponentKind;
use crate::ecs::components::{AnimationComponent, MovementComponent, StateComponent};
use crate::ecs::system::{warn_missing, System, SystemPhase, TickContext, WorkingSet};
use crate::ecs::{Entity, EntityRegistry};
use crate::render::RenderSurface;

/// Plays and draws character animations
#[derive(Debug, Default)]
pub struct AnimationSystem {
    entities: WorkingSet,
}

impl AnimationSystem {
    /// Create the system with an empty working set
    pub fn new() -> Self {
        Self::default()
    }
}

impl System for AnimationSystem {
    fn name(&self) -> &'static str {
        "animation"
    }

    fn phase(&self) -> SystemPhase {
        SystemPhase::Presentation
    }

    fn add_entity(&mut self, entity: Entity, registry: &EntityRegistry) {
        if registry.has::<AnimationComponent>(entity)
            && registry.has::<StateComponent>(entity)
            && registry.has::<MovementComponent>(entity)
        {
            self.entities.insert(entity);
        }
    }

    fn remove_entity(&mut self, entity: Entity) {
        self.entities.remove(entity);
    }

    fn tick(&mut self, context: &mut TickContext<'_>, delta_time: f32) {
        for entity in self.entities.iter() {
            if !context.registry.is_active(entity) {
                continue;
            }
            let store = context.registry.components_mut();
            let Some(state) = store.state.get(entity) else {
                warn_missing(self.name(), entity, ComponentKind::State);
                continue;
            };
            let Some(animation) = store.animation.get_mut(entity) else {
                warn_missing(self.name(), entity, ComponentKind::Animation);
                continue;
            };
            animation.set_current_action(state.animation());
            animation.update(delta_time);
        }
    }

    fn draw(&self, registry: &EntityRegistry, surface: &mut dyn RenderSurface) {
        let store = registry.components();
        for entity in self.entities.iter().filter(|&entity| registry.is_active(entity)) {
            let (Some(animation), Some(state), Some(movement)) = (
                store.animation.get(entity),
                store.state.get(entity),
                store.movement.get(entity),
            ) else {
                continue;
            };
            let Some(strip) = animation.current_strip() else {
                continue;
            };
            let Some((width, height)) = surface.texture_size(strip.texture()) else {
                log::trace!("texture '{}' not loaded, {entity:?} not drawn", strip.texture());
                continue;
            };
            surface.draw_sprite(
                strip.texture(),
                strip.frame_rect(width, height),
                movement.position(),
                state.horizontal_direction == -1,
            );
        }
    }
}
