//! Entity implementation
//!
//! Entities are generational slot-map keys. A key whose slot was reused by a
//! later spawn no longer resolves, so stale handles held by systems or
//! queued in events cannot alias a new entity.

slotmap::new_key_type! {
    /// Entity identifier
    pub struct Entity;
}

/// Per-entity bookkeeping kept next to the key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityMeta {
    /// Inactive entities stay registered but every system skips them
    pub active: bool,
}

impl Default for EntityMeta {
    fn default() -> Self {
        Self { active: true }
    }
}
