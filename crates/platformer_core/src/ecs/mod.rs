//! Entity-Component-System implementation
//!
//! Entities are slot-map keys, components live in typed columns of the
//! [`EntityRegistry`], and systems run in a fixed order driven by the
//! [`World`].

pub mod component;
pub mod components;
pub mod entity;
pub mod factory;
pub mod scheduler;
pub mod storage;
pub mod system;
pub mod systems;
pub mod world;

#[cfg(test)]
mod tests;

pub use component::{Component, ComponentKind, ComponentSnapshot};
pub use entity::Entity;
pub use factory::EntityFactory;
pub use scheduler::SystemScheduler;
pub use storage::EntityRegistry;
pub use system::{System, SystemPhase, TickContext, WorkingSet};
pub use world::{LevelRequest, World};
