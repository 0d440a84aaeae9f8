//! System trait and per-tick context
//!
//! A system owns a private working set of entity handles, filtered at
//! registration time by the components it needs. Each tick it looks those
//! components up in the registry. Event handlers never touch the registry;
//! they fill a mailbox the system drains at the start of its own tick.

use crate::core::GameConfig;
use crate::ecs::component::ComponentKind;
use crate::ecs::{Entity, EntityRegistry};
use crate::events::EventBus;
use crate::input::InputSource;
use crate::render::RenderSurface;

/// System execution phases with explicit ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SystemPhase {
    /// Input interpretation and enemy decisions
    Input = 0,
    /// Kinematics and collision resolution
    Physics = 1,
    /// Respawn and appear bookkeeping
    Lifecycle = 2,
    /// Animation, backgrounds, level and HUD drawing
    Presentation = 3,
    /// Death handling, which may queue destruction
    Teardown = 4,
}

/// Everything a system may touch during one tick
pub struct TickContext<'a> {
    /// Component storage
    pub registry: &'a mut EntityRegistry,
    /// Message bus for behavioral events
    pub bus: &'a EventBus,
    /// Raw key state
    pub input: &'a dyn InputSource,
    /// Game configuration
    pub config: &'a GameConfig,
}

/// One behavior of the simulation
pub trait System {
    /// Name used in logs
    fn name(&self) -> &'static str;

    /// Which phase this system belongs to
    fn phase(&self) -> SystemPhase;

    /// Offer a newly added entity; the system keeps it if it has the components it needs
    fn add_entity(&mut self, entity: Entity, registry: &EntityRegistry);

    /// Forget an entity that is leaving the world
    fn remove_entity(&mut self, entity: Entity);

    /// Register message handlers
    fn subscribe(&mut self, _bus: &EventBus) {}

    /// Revoke message handlers
    fn unsubscribe(&mut self, _bus: &EventBus) {}

    /// Advance by `delta_time` seconds
    fn tick(&mut self, context: &mut TickContext<'_>, delta_time: f32);

    /// Describe what this system draws
    fn draw(&self, _registry: &EntityRegistry, _surface: &mut dyn RenderSurface) {}
}

/// Report a tracked entity whose component disappeared; the caller skips it
pub(crate) fn warn_missing(system: &str, entity: Entity, kind: ComponentKind) {
    log::warn!("{system}: {entity:?} has no {kind:?} component, skipping");
}

/// Insertion-ordered set of entity handles
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkingSet {
    entities: Vec<Entity>,
}

impl WorkingSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `entity` unless present; true if it was added
    pub fn insert(&mut self, entity: Entity) -> bool {
        if self.entities.contains(&entity) {
            return false;
        }
        self.entities.push(entity);
        true
    }

    /// Remove `entity`; true if it was present
    pub fn remove(&mut self, entity: Entity) -> bool {
        let before = self.entities.len();
        self.entities.retain(|&tracked| tracked != entity);
        before != self.entities.len()
    }

    /// Whether `entity` is tracked
    pub fn contains(&self, entity: Entity) -> bool {
        self.entities.contains(&entity)
    }

    /// Copy of the handles, safe to iterate while the set changes
    pub fn snapshot(&self) -> Vec<Entity> {
        self.entities.clone()
    }

    /// Tracked handles
    pub fn iter(&self) -> impl Iterator<Item = Entity> + '_ {
        self.entities.iter().copied()
    }

    /// Number of tracked handles
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether nothing is tracked
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Forget every handle
    pub fn clear(&mut self) {
        self.entities.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_ordering() {
        assert!(SystemPhase::Input < SystemPhase::Physics);
        assert!(SystemPhase::Physics < SystemPhase::Lifecycle);
        assert!(SystemPhase::Presentation < SystemPhase::Teardown);
    }

    #[test]
    fn test_working_set_keeps_order_without_duplicates() {
        let mut registry = EntityRegistry::new();
        let (a, b) = (registry.spawn(true), registry.spawn(true));
        let mut set = WorkingSet::new();
        assert!(set.insert(a));
        assert!(set.insert(b));
        assert!(!set.insert(a));
        assert_eq!(set.snapshot(), vec![a, b]);

        assert!(set.remove(a));
        assert!(!set.remove(a));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![b]);
    }
}
