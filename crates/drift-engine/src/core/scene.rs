use std::collections::HashSet;

use crate::api::types::{EntityId, EntityKind};
use crate::components::entity::Entity;
use crate::components::policy::Resolution;
use crate::core::rng::Rng;

/// The live entity collection, in insertion order.
///
/// Ids are allocated here and never reused, so they stay valid as stable
/// keys while entities come and go. Removal preserves the order of the
/// remaining entities: physics processes entities in this order.
pub struct Scene {
    entities: Vec<Entity>,
    next_id: u32,
    rng: Rng,
}

/// Hands out ids and randomness to collision policies that spawn entities.
pub struct Spawner<'a> {
    next_id: &'a mut u32,
    rng: &'a mut Rng,
}

impl Spawner<'_> {
    /// Generate the next unique entity ID.
    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(*self.next_id);
        *self.next_id += 1;
        id
    }

    pub fn rng(&mut self) -> &mut Rng {
        &mut *self.rng
    }
}

impl Scene {
    pub const DEFAULT_SEED: u64 = 42;

    pub fn new() -> Self {
        Self::with_seed(Self::DEFAULT_SEED)
    }

    /// Create a scene whose random stream starts from `seed`.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            entities: Vec::with_capacity(256),
            next_id: 1,
            rng: Rng::new(seed),
        }
    }

    /// Generate the next unique entity ID.
    pub fn next_id(&mut self) -> EntityId {
        self.spawner().next_id()
    }

    /// Borrow the id allocator and rng, e.g. to build entities outside a policy.
    pub fn spawner(&mut self) -> Spawner<'_> {
        Spawner {
            next_id: &mut self.next_id,
            rng: &mut self.rng,
        }
    }

    pub fn rng(&mut self) -> &mut Rng {
        &mut self.rng
    }

    /// Append an entity. Returns its id.
    pub fn spawn(&mut self, entity: Entity) -> EntityId {
        let id = entity.id;
        // Keep the allocator ahead of ids chosen by the caller.
        if id.0 >= self.next_id {
            self.next_id = id.0 + 1;
        }
        self.entities.push(entity);
        id
    }

    /// Remove an entity by ID, keeping the others in order.
    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        let idx = self.index_of(id)?;
        Some(self.entities.remove(idx))
    }

    pub fn index_of(&self, id: EntityId) -> Option<usize> {
        self.entities.iter().position(|e| e.id == id)
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entities_mut(&mut self) -> &mut [Entity] {
        &mut self.entities
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.iter_mut()
    }

    /// All entities of the given kind.
    pub fn find_all_by_kind(&self, kind: EntityKind) -> Vec<&Entity> {
        self.entities.iter().filter(|e| e.kind == kind).collect()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Clear all entities. Ids keep counting up.
    pub fn clear(&mut self) {
        self.entities.clear();
    }

    /// Run the policy of the entity at `index` against `colliders`.
    pub(crate) fn resolve_at(&mut self, index: usize, colliders: &[Entity]) -> Resolution {
        let Scene {
            entities,
            next_id,
            rng,
        } = self;
        let mut spawner = Spawner { next_id, rng };
        entities[index].collision(colliders, &mut spawner)
    }

    /// Apply a batch of removals, then append spawned entities in order.
    pub(crate) fn splice(&mut self, removed: &HashSet<EntityId>, spawned: Vec<Entity>) {
        if !removed.is_empty() {
            self.entities.retain(|e| !removed.contains(&e.id));
        }
        for entity in spawned {
            self.spawn(entity);
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
