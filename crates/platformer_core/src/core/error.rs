//! Error types shared by the simulation core

use crate::config::ConfigError;
use crate::ecs::{ComponentKind, Entity};

/// Errors raised by the registry, level loading and resource collaborators
#[derive(thiserror::Error, Debug)]
pub enum CoreError {
    /// A system asked for a component the entity does not carry
    #[error("entity {entity:?} has no {kind:?} component")]
    MissingComponent {
        /// Entity that was queried
        entity: Entity,
        /// Requested component kind
        kind: ComponentKind,
    },

    /// A component kind was added twice to one entity
    #[error("entity {entity:?} already has a {kind:?} component")]
    DuplicateComponent {
        /// Entity that already owns the component
        entity: Entity,
        /// Rejected component kind
        kind: ComponentKind,
    },

    /// The entity handle is stale or was never issued by this registry
    #[error("entity {0:?} is not registered")]
    UnknownEntity(Entity),

    /// No level with this identifier is known to the collaborator
    #[error("unknown level '{0}'")]
    UnknownLevel(String),

    /// A collaborator failed to provide level or texture data
    #[error("failed to load {resource}: {reason}")]
    ResourceLoad {
        /// Resource identifier
        resource: String,
        /// Human readable cause
        reason: String,
    },

    /// Configuration failure
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl CoreError {
    /// Shorthand for a resource load failure
    pub fn resource(resource: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ResourceLoad {
            resource: resource.into(),
            reason: reason.into(),
        }
    }
}
