//! Respawn countdown
//!
//! Entities the death system parked (inactive, countdown running) are put
//! back at their respawn point once the delay has elapsed. They come back in
//! the `Appearing` regime and the appear system takes over from there.

use crate::ecs::component::ComponentKind;
use crate::ecs::components::{MovementComponent, RespawnComponent, StateComponent, SuperState};
use crate::ecs::system::{warn_missing, System, SystemPhase, TickContext, WorkingSet};
use crate::ecs::{Entity, EntityRegistry};
use crate::events::Message;

/// Brings parked entities back after their delay
#[derive(Debug, Default)]
pub struct RespawnSystem {
    entities: WorkingSet,
}

impl RespawnSystem {
    /// Create the system with an empty working set
    pub fn new() -> Self {
        Self::default()
    }
}

impl System for RespawnSystem {
    fn name(&self) -> &'static str {
        "respawn"
    }

    fn phase(&self) -> SystemPhase {
        SystemPhase::Lifecycle
    }

    fn add_entity(&mut self, entity: Entity, registry: &EntityRegistry) {
        if registry.has::<RespawnComponent>(entity)
            && registry.has::<MovementComponent>(entity)
            && registry.has::<StateComponent>(entity)
        {
            self.entities.insert(entity);
        }
    }

    fn remove_entity(&mut self, entity: Entity) {
        self.entities.remove(entity);
    }

    fn tick(&mut self, context: &mut TickContext<'_>, delta_time: f32) {
        for entity in self.entities.iter() {
            if context.registry.is_active(entity) {
                continue;
            }
            let store = context.registry.components_mut();
            let Some(respawn) = store.respawn.get_mut(entity) else {
                warn_missing(self.name(), entity, ComponentKind::Respawn);
                continue;
            };
            if !respawn.advance(delta_time) {
                continue;
            }
            let point = respawn.position();

            let Some(state) = store.state.get_mut(entity) else {
                warn_missing(self.name(), entity, ComponentKind::State);
                continue;
            };
            state.set_super_state(SuperState::Appearing);
            state.horizontal_direction = state.default_direction();
            let direction = state.horizontal_direction;

            let Some(movement) = store.movement.get_mut(entity) else {
                warn_missing(self.name(), entity, ComponentKind::Movement);
                continue;
            };
            movement.set_position(point);
            movement.stop();

            if let Some(collision_box) = store.collision_box.get_mut(entity) {
                collision_box.update_position(point, direction);
            }
            if let Err(error) = context.registry.set_active(entity, true) {
                log::warn!("{}: {error}", self.name());
                continue;
            }
            log::debug!("{entity:?} respawned at ({}, {})", point.x, point.y);
            context.bus.publish(&Message::EntityReappeared(entity));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GameConfig;
    use crate::ecs::components::State;
    use crate::events::{EventBus, Mailbox, MessageKind, SubscriptionSet};
    use crate::foundation::math::Vec2;
    use crate::input::NoInput;

    fn run(system: &mut RespawnSystem, registry: &mut EntityRegistry, bus: &EventBus, delta_time: f32) {
        let config = GameConfig::default();
        let mut context = TickContext {
            registry,
            bus,
            input: &NoInput,
            config: &config,
        };
        system.tick(&mut context, delta_time);
    }

    fn parked_enemy(registry: &mut EntityRegistry) -> Entity {
        let entity = registry.spawn(false);
        let mut movement = MovementComponent::new(Vec2::new(300.0, 200.0));
        movement.velocity = Vec2::new(0.0, 80.0);
        registry.add(entity, movement).unwrap();
        let mut state =
            StateComponent::with_current(State::WalkLeft, SuperState::Falling, State::Idle, SuperState::Dead);
        state.horizontal_direction = 1;
        registry.add(entity, state).unwrap();
        let mut respawn = RespawnComponent::new(Vec2::new(100.0, 50.0), 1.0);
        respawn.start();
        registry.add(entity, respawn).unwrap();
        entity
    }

    #[test]
    fn test_respawn_after_delay() {
        let mut registry = EntityRegistry::new();
        let bus = EventBus::new();
        let reappeared = Mailbox::new();
        let mut subscriptions = SubscriptionSet::new();
        subscriptions.forward_entities(&bus, MessageKind::EntityReappeared, &reappeared);

        let enemy = parked_enemy(&mut registry);
        let mut system = RespawnSystem::new();
        system.add_entity(enemy, &registry);

        run(&mut system, &mut registry, &bus, 0.5);
        assert!(!registry.is_active(enemy));
        assert!(reappeared.is_empty());

        run(&mut system, &mut registry, &bus, 0.5);
        assert!(registry.is_active(enemy));
        assert_eq!(reappeared.drain(), vec![enemy]);

        let movement = registry.get::<MovementComponent>(enemy).unwrap();
        assert_eq!(movement.position(), Vec2::new(100.0, 50.0));
        assert_eq!(movement.velocity, Vec2::zeros());
        let state = registry.get::<StateComponent>(enemy).unwrap();
        assert_eq!(state.super_state(), SuperState::Appearing);
        assert_eq!(state.horizontal_direction, -1);
    }

    #[test]
    fn test_active_entities_are_ignored() {
        let mut registry = EntityRegistry::new();
        let bus = EventBus::new();
        let enemy = parked_enemy(&mut registry);
        registry.set_active(enemy, true).unwrap();
        let mut system = RespawnSystem::new();
        system.add_entity(enemy, &registry);

        run(&mut system, &mut registry, &bus, 5.0);
        assert!(registry.get::<RespawnComponent>(enemy).unwrap().is_respawning());
    }
}
