//! Entity kind tag used to pick a collision resolver

use serde::{Deserialize, Serialize};

/// What an entity is, as far as actor-vs-actor collisions care
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// The controlled character
    Player,
    /// A collectible
    Coin,
    /// A walking enemy that can be stomped
    RegularEnemy,
    /// Touching it advances to the next level
    PortalToNextLevel,
}
