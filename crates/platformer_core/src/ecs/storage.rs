//! Entity registry
//!
//! Owns every entity handle and every component instance. Systems keep only
//! handles and look components up here each tick.
//!
//! Registry misuse is reported, never silently absorbed: adding a kind twice
//! is rejected with the original kept, removing an absent kind is a logged
//! no-op, and reading an absent kind is an error rather than a default.

use slotmap::SlotMap;

use crate::core::CoreError;
use crate::ecs::component::{Component, ComponentSnapshot, ComponentStore};
use crate::ecs::entity::{Entity, EntityMeta};

/// Entity and component storage
#[derive(Debug, Default)]
pub struct EntityRegistry {
    entities: SlotMap<Entity, EntityMeta>,
    components: ComponentStore,
}

impl EntityRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a new entity with no components
    pub fn spawn(&mut self, active: bool) -> Entity {
        let entity = self.entities.insert(EntityMeta { active });
        log::trace!("spawned {entity:?} (active: {active})");
        entity
    }

    /// Remove an entity and all of its components; false if it was not registered
    pub fn despawn(&mut self, entity: Entity) -> bool {
        if self.entities.remove(entity).is_none() {
            log::warn!("despawn of unknown entity {entity:?}");
            return false;
        }
        self.components.remove_all(entity);
        true
    }

    /// Whether `entity` is registered
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.contains_key(entity)
    }

    /// Whether `entity` is registered and active
    pub fn is_active(&self, entity: Entity) -> bool {
        self.entities.get(entity).is_some_and(|meta| meta.active)
    }

    /// Toggle the active flag
    pub fn set_active(&mut self, entity: Entity, active: bool) -> Result<(), CoreError> {
        let meta = self.entities.get_mut(entity).ok_or(CoreError::UnknownEntity(entity))?;
        meta.active = active;
        Ok(())
    }

    /// Number of registered entities
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether no entity is registered
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Every registered entity
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.entities.keys()
    }

    /// Remove every entity and component
    pub fn clear(&mut self) {
        self.entities.clear();
        self.components.clear();
    }

    /// Attach a component; rejected if the kind is already present
    pub fn add<T: Component>(&mut self, entity: Entity, component: T) -> Result<(), CoreError> {
        if !self.is_alive(entity) {
            return Err(CoreError::UnknownEntity(entity));
        }
        let column = T::column_mut(&mut self.components);
        if column.contains_key(entity) {
            log::warn!("{entity:?} already has a {:?} component, keeping the original", T::KIND);
            return Err(CoreError::DuplicateComponent { entity, kind: T::KIND });
        }
        column.insert(entity, component);
        Ok(())
    }

    /// Detach a component, returning it if it was present
    pub fn remove<T: Component>(&mut self, entity: Entity) -> Option<T> {
        let removed = T::column_mut(&mut self.components).remove(entity);
        if removed.is_none() {
            log::warn!("{entity:?} has no {:?} component to remove", T::KIND);
        }
        removed
    }

    /// Whether `entity` carries a component of kind `T`
    pub fn has<T: Component>(&self, entity: Entity) -> bool {
        T::column(&self.components).contains_key(entity)
    }

    /// Borrow a component
    pub fn get<T: Component>(&self, entity: Entity) -> Result<&T, CoreError> {
        T::column(&self.components)
            .get(entity)
            .ok_or(CoreError::MissingComponent { entity, kind: T::KIND })
    }

    /// Mutably borrow a component
    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> Result<&mut T, CoreError> {
        T::column_mut(&mut self.components)
            .get_mut(entity)
            .ok_or(CoreError::MissingComponent { entity, kind: T::KIND })
    }

    /// Copy of every component on `entity`, for inspection
    pub fn get_all(&self, entity: Entity) -> Vec<ComponentSnapshot> {
        self.components.snapshot(entity)
    }

    /// All component columns
    pub const fn components(&self) -> &ComponentStore {
        &self.components
    }

    /// All component columns, mutably, for disjoint multi-column borrows
    pub fn components_mut(&mut self) -> &mut ComponentStore {
        &mut self.components
    }
}
