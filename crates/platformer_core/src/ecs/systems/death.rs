//! Death handling
//!
//! Dead entities keep playing their death strip. When it has finished the
//! player takes the level down with it, respawnable actors are parked until
//! their countdown ends, and everything else is queued for destruction.
//! Destruction itself is deferred: this system only publishes the request.

use crate::ecs::component::ComponentKind;
use crate::ecs::components::{AnimationComponent, AnimationId, EntityKind, StateComponent, SuperState};
use crate::ecs::system::{warn_missing, System, SystemPhase, TickContext, WorkingSet};
use crate::ecs::{Entity, EntityRegistry};
use crate::events::{EventBus, Mailbox, Message, MessageKind, SubscriptionSet};

/// Finishes off entities whose death strip has played
#[derive(Debug, Default)]
pub struct DeathSystem {
    eligible: WorkingSet,
    dying: WorkingSet,
    died: Mailbox<Entity>,
    subscriptions: SubscriptionSet,
}

impl DeathSystem {
    /// Create the system with empty working sets
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entities whose death is being played
    pub fn pending(&self) -> usize {
        self.dying.len()
    }

    fn finish(context: &mut TickContext<'_>, entity: Entity) {
        let is_player = context
            .registry
            .get::<EntityKind>(entity)
            .is_ok_and(|kind| *kind == EntityKind::Player);
        if is_player {
            log::info!("player {entity:?} died, reloading level");
            context.bus.publish(&Message::DestroyEntity(entity));
            context.bus.publish(&Message::ReloadLevel);
            return;
        }

        let store = context.registry.components_mut();
        if let Some(respawn) = store.respawn.get_mut(entity) {
            respawn.start();
            if let Some(animation) = store.animation.get_mut(entity) {
                animation.reset(AnimationId::Death);
            }
            if let Err(error) = context.registry.set_active(entity, false) {
                log::warn!("death: {error}");
            }
            log::debug!("{entity:?} parked for respawn");
        } else {
            context.bus.publish(&Message::DestroyEntity(entity));
        }
    }
}

impl System for DeathSystem {
    fn name(&self) -> &'static str {
        "death"
    }

    fn phase(&self) -> SystemPhase {
        SystemPhase::Teardown
    }

    fn add_entity(&mut self, entity: Entity, registry: &EntityRegistry) {
        let Ok(state) = registry.get::<StateComponent>(entity) else {
            return;
        };
        if !registry.has::<AnimationComponent>(entity) {
            return;
        }
        self.eligible.insert(entity);
        if state.super_state() == SuperState::Dead {
            self.dying.insert(entity);
        }
    }

    fn remove_entity(&mut self, entity: Entity) {
        self.eligible.remove(entity);
        self.dying.remove(entity);
    }

    fn subscribe(&mut self, bus: &EventBus) {
        self.subscriptions.forward_entities(bus, MessageKind::EntityDied, &self.died);
    }

    fn unsubscribe(&mut self, bus: &EventBus) {
        self.subscriptions.revoke_all(bus);
        self.died.clear();
    }

    fn tick(&mut self, context: &mut TickContext<'_>, _delta_time: f32) {
        for entity in self.died.drain() {
            if self.eligible.contains(entity) {
                self.dying.insert(entity);
            }
        }

        for entity in self.dying.snapshot() {
            let Ok(animation) = context.registry.get::<AnimationComponent>(entity) else {
                warn_missing(self.name(), entity, ComponentKind::Animation);
                continue;
            };
            if !animation.is_finished(AnimationId::Death) {
                continue;
            }
            Self::finish(context, entity);
            self.dying.remove(entity);
        }
    }
}
