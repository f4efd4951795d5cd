use serde::{Deserialize, Serialize};

/// Unique identifier for an entity in the scene.
/// Allocated by the scene and never reused within its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Demo-defined type tag (ship, rock, bullet, ...).
/// Collision policies match on this to decide what an entity reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityKind(pub u32);

/// A pair of entities whose boxes overlapped during an update.
/// Stored once per unordered pair, lower id first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CollisionPair {
    pub entity_a: EntityId,
    pub entity_b: EntityId,
}

impl CollisionPair {
    pub fn new(a: EntityId, b: EntityId) -> Self {
        if a <= b {
            Self { entity_a: a, entity_b: b }
        } else {
            Self { entity_a: b, entity_b: a }
        }
    }

    /// Whether `id` is one of the two entities.
    pub fn involves(&self, id: EntityId) -> bool {
        self.entity_a == id || self.entity_b == id
    }
}
