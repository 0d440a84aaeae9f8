//! Spawn animation bookkeeping
//!
//! Entities start (and respawn) in the `Appearing` regime, frozen in place
//! while the appear strip plays. Once it has finished the entity switches to
//! its default state pair with both directions unblocked.

use crate::ecs::component::ComponentKind;
use crate::ecs::components::{AnimationComponent, AnimationId, StateComponent, SuperState};
use crate::ecs::system::{warn_missing, System, SystemPhase, TickContext, WorkingSet};
use crate::ecs::{Entity, EntityRegistry};
use crate::events::{EventBus, Mailbox, MessageKind, SubscriptionSet};

/// Releases entities from `Appearing` when their strip is done
#[derive(Debug, Default)]
pub struct AppearSystem {
    eligible: WorkingSet,
    appearing: WorkingSet,
    reappeared: Mailbox<Entity>,
    subscriptions: SubscriptionSet,
}

impl AppearSystem {
    /// Create the system with empty working sets
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entities waiting for their appear strip
    pub fn pending(&self) -> usize {
        self.appearing.len()
    }
}

impl System for AppearSystem {
    fn name(&self) -> &'static str {
        "appear"
    }

    fn phase(&self) -> SystemPhase {
        SystemPhase::Lifecycle
    }

    fn add_entity(&mut self, entity: Entity, registry: &EntityRegistry) {
        let Ok(state) = registry.get::<StateComponent>(entity) else {
            return;
        };
        if !registry.has::<AnimationComponent>(entity) {
            return;
        }
        self.eligible.insert(entity);
        if state.super_state() == SuperState::Appearing {
            self.appearing.insert(entity);
        }
    }

    fn remove_entity(&mut self, entity: Entity) {
        self.eligible.remove(entity);
        self.appearing.remove(entity);
    }

    fn subscribe(&mut self, bus: &EventBus) {
        self.subscriptions
            .forward_entities(bus, MessageKind::EntityReappeared, &self.reappeared);
    }

    fn unsubscribe(&mut self, bus: &EventBus) {
        self.subscriptions.revoke_all(bus);
        self.reappeared.clear();
    }

    fn tick(&mut self, context: &mut TickContext<'_>, _delta_time: f32) {
        for entity in self.reappeared.drain() {
            if self.eligible.contains(entity) {
                self.appearing.insert(entity);
            }
        }

        for entity in self.appearing.snapshot() {
            let store = context.registry.components_mut();
            let Some(animation) = store.animation.get(entity) else {
                warn_missing(self.name(), entity, ComponentKind::Animation);
                continue;
            };
            if !animation.is_finished(AnimationId::Appear) {
                continue;
            }
            let Some(state) = store.state.get_mut(entity) else {
                warn_missing(self.name(), entity, ComponentKind::State);
                continue;
            };
            state.restore_defaults();
            log::debug!("{entity:?} appeared as {:?}/{:?}", state.super_state(), state.state());
            self.appearing.remove(entity);
        }
    }
}
