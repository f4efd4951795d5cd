use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::api::types::{CollisionPair, EntityId};
use crate::components::entity::Entity;
use crate::core::rect::Rect;
use crate::spatial::quadtree::{QuadTree, SpatialItem, DEFAULT_MAX_ITEMS, DEFAULT_MAX_LEVELS};

/// True unless `a` and `b` are strictly separated on some axis.
/// Touching edges count as a collision. Symmetric.
pub fn collides(a: &Rect, b: &Rect) -> bool {
    a.overlaps(b)
}

/// One entity's overlaps for this frame.
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionEntry {
    pub entity: EntityId,
    /// Overlapping entities in scene order. Always empty for expired entities.
    pub colliders: Vec<EntityId>,
}

/// Per-frame map from entity to the entities it overlaps, in scene order.
///
/// An entity with no overlaps has no entry at all, except expired
/// entities: they always get an entry with an empty list so resolution
/// visits (and removes) them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollisionMap {
    entries: Vec<CollisionEntry>,
}

impl CollisionMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entity: EntityId, colliders: Vec<EntityId>) {
        self.entries.push(CollisionEntry { entity, colliders });
    }

    pub fn get(&self, entity: EntityId) -> Option<&[EntityId]> {
        self.entries
            .iter()
            .find(|e| e.entity == entity)
            .map(|e| e.colliders.as_slice())
    }

    pub fn contains(&self, entity: EntityId) -> bool {
        self.entries.iter().any(|e| e.entity == entity)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CollisionEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every overlapping pair once, in first-seen order.
    pub fn pairs(&self) -> Vec<CollisionPair> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for entry in &self.entries {
            for &other in &entry.colliders {
                let pair = CollisionPair::new(entry.entity, other);
                if seen.insert(pair) {
                    out.push(pair);
                }
            }
        }
        out
    }
}

/// A way of finding overlapping entities.
///
/// Implementations must agree on the set of entries and the set of
/// colliders per entry; only the cost differs.
pub trait CollisionStrategy {
    fn collision_map(&mut self, entities: &[Entity], bounds: &Rect) -> CollisionMap;
}

/// Checks every pair. O(n²), the reference strategy.
#[derive(Debug, Clone, Copy, Default)]
pub struct BruteForce;

impl CollisionStrategy for BruteForce {
    fn collision_map(&mut self, entities: &[Entity], _bounds: &Rect) -> CollisionMap {
        let mut map = CollisionMap::new();
        for (i, entity) in entities.iter().enumerate() {
            if entity.expired {
                map.push(entity.id, Vec::new());
                continue;
            }
            let rect = entity.rect();
            let colliders: Vec<_> = entities
                .iter()
                .enumerate()
                .filter(|&(j, other)| j != i && collides(&rect, &other.rect()))
                .map(|(_, other)| other.id)
                .collect();
            if !colliders.is_empty() {
                map.push(entity.id, colliders);
            }
        }
        map
    }
}

/// What the quadtree strategy indexes: an entity's id, scene position and box.
#[derive(Debug, Clone, Copy)]
struct EntityProxy {
    id: EntityId,
    index: usize,
    rect: Rect,
}

impl SpatialItem for EntityProxy {
    type Key = EntityId;

    fn key(&self) -> EntityId {
        self.id
    }

    fn rect(&self) -> Rect {
        self.rect
    }
}

/// Rebuilds a quadtree from current positions each frame and only tests
/// entities that share a branch. Same results as [`BruteForce`].
pub struct QuadTreeStrategy {
    max_items: usize,
    max_levels: u32,
    tree: Option<QuadTree<EntityProxy>>,
}

impl QuadTreeStrategy {
    pub fn new(max_items: usize, max_levels: u32) -> Self {
        Self {
            max_items,
            max_levels,
            tree: None,
        }
    }

    fn prepare(&mut self, bounds: Rect) -> &mut QuadTree<EntityProxy> {
        let tree = match self.tree.take() {
            Some(mut tree) if tree.bounds() == bounds => {
                tree.clear();
                tree
            }
            _ => QuadTree::new(bounds, self.max_items, self.max_levels),
        };
        self.tree.insert(tree)
    }
}

impl Default for QuadTreeStrategy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ITEMS, DEFAULT_MAX_LEVELS)
    }
}

impl CollisionStrategy for QuadTreeStrategy {
    fn collision_map(&mut self, entities: &[Entity], bounds: &Rect) -> CollisionMap {
        let mut map = CollisionMap::new();
        if entities.is_empty() {
            return map;
        }

        let proxies: Vec<_> = entities
            .iter()
            .enumerate()
            .map(|(index, e)| EntityProxy {
                id: e.id,
                index,
                rect: e.rect(),
            })
            .collect();

        // Cover everything, including entities that drifted outside the world.
        let mut area = proxies.iter().fold(*bounds, |acc, p| acc.union(&p.rect));
        if area.width() <= 0.0 || area.height() <= 0.0 {
            area = Rect::new(area.top, area.left, area.left + 1.0, area.top + 1.0).union(&area);
        }

        let tree = self.prepare(area);
        for proxy in &proxies {
            tree.insert(*proxy);
        }

        for (entity, proxy) in entities.iter().zip(&proxies) {
            if entity.expired {
                map.push(entity.id, Vec::new());
                continue;
            }
            let mut hits: Vec<_> = tree
                .retrieve(proxy)
                .into_iter()
                .filter(|c| c.id != proxy.id && collides(&proxy.rect, &c.rect))
                .map(|c| c.index)
                .collect();
            if hits.is_empty() {
                continue;
            }
            hits.sort_unstable();
            hits.dedup();
            map.push(entity.id, hits.into_iter().map(|i| entities[i].id).collect());
        }
        map
    }
}

/// Selects a collision strategy from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    #[default]
    BruteForce,
    QuadTree,
}

impl StrategyKind {
    pub fn build(self, max_items: usize, max_levels: u32) -> Box<dyn CollisionStrategy> {
        match self {
            StrategyKind::BruteForce => Box::new(BruteForce),
            StrategyKind::QuadTree => Box::new(QuadTreeStrategy::new(max_items, max_levels)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::EntityKind;
    use crate::core::polygon::Polygon;
    use crate::core::rng::Rng;
    use crate::core::vector::Vector2;

    fn world() -> Rect {
        Rect::new(0.0, 0.0, 100.0, 100.0)
    }

    fn boxed(id: u32, x: f64, y: f64, size: f64) -> Entity {
        Entity::new(EntityId(id), EntityKind(0), Polygon::rectangle(size, size))
            .with_location(Vector2::new(x, y))
    }

    fn as_sets(map: &CollisionMap) -> Vec<(EntityId, Vec<EntityId>)> {
        let mut out: Vec<_> = map
            .iter()
            .map(|e| {
                let mut c = e.colliders.clone();
                c.sort();
                (e.entity, c)
            })
            .collect();
        out.sort_by_key(|(id, _)| *id);
        out
    }

    #[test]
    fn collides_is_symmetric_and_inclusive() {
        let a = Rect::from_origin_size(0.0, 0.0, 10.0, 10.0);
        assert!(collides(&a, &a));

        let touching = Rect::from_origin_size(10.0, 0.0, 10.0, 10.0);
        assert!(collides(&a, &touching));
        assert!(collides(&touching, &a));

        let below = Rect::from_origin_size(0.0, 10.0, 10.0, 10.0);
        assert!(collides(&a, &below));

        let apart_x = Rect::from_origin_size(10.001, 0.0, 10.0, 10.0);
        let apart_y = Rect::from_origin_size(0.0, -10.5, 10.0, 10.0);
        assert!(!collides(&a, &apart_x));
        assert!(!collides(&apart_x, &a));
        assert!(!collides(&a, &apart_y));
        assert!(!collides(&apart_y, &a));
    }

    #[test]
    fn brute_force_lists_overlaps_in_scene_order() {
        let entities = vec![
            boxed(1, 0.0, 0.0, 10.0),
            boxed(2, 50.0, 50.0, 10.0),
            boxed(3, 5.0, 5.0, 10.0),
            boxed(4, 8.0, 4.0, 4.0),
        ];
        let map = BruteForce.collision_map(&entities, &world());
        assert_eq!(map.get(EntityId(1)), Some(&[EntityId(3), EntityId(4)][..]));
        assert_eq!(map.get(EntityId(3)), Some(&[EntityId(1), EntityId(4)][..]));
        assert_eq!(map.get(EntityId(4)), Some(&[EntityId(1), EntityId(3)][..]));
        assert!(!map.contains(EntityId(2)), "isolated entities get no entry");
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn expired_entity_always_gets_empty_entry() {
        let mut lone = boxed(1, 0.0, 0.0, 10.0);
        lone.expired = true;
        let map = BruteForce.collision_map(&[lone], &world());
        assert_eq!(map.get(EntityId(1)), Some(&[][..]));

        let mut overlapping = boxed(1, 0.0, 0.0, 10.0);
        overlapping.expired = true;
        let entities = vec![overlapping, boxed(2, 2.0, 2.0, 10.0)];
        let map = BruteForce.collision_map(&entities, &world());
        assert_eq!(map.get(EntityId(1)), Some(&[][..]));
        // The live partner still sees the expired one.
        assert_eq!(map.get(EntityId(2)), Some(&[EntityId(1)][..]));
    }

    #[test]
    fn pairs_are_reported_once() {
        let entities = vec![boxed(1, 0.0, 0.0, 10.0), boxed(2, 5.0, 5.0, 10.0)];
        let map = BruteForce.collision_map(&entities, &world());
        assert_eq!(map.pairs(), vec![CollisionPair::new(EntityId(1), EntityId(2))]);
    }

    #[test]
    fn quadtree_matches_brute_force() {
        let mut rng = Rng::new(11);
        let mut entities: Vec<_> = (1..=120)
            .map(|id| {
                let size = rng.range(2.0, 9.0);
                boxed(id, rng.range(-10.0, 105.0), rng.range(-10.0, 105.0), size)
            })
            .collect();
        entities[7].expired = true;
        entities[50].expired = true;

        let brute = BruteForce.collision_map(&entities, &world());
        let mut strategy = QuadTreeStrategy::new(4, 5);
        let quad = strategy.collision_map(&entities, &world());
        assert_eq!(as_sets(&brute), as_sets(&quad));

        // Reusing the strategy next frame gives the same answer again.
        let again = strategy.collision_map(&entities, &world());
        assert_eq!(as_sets(&quad), as_sets(&again));
    }

    #[test]
    fn quadtree_handles_degenerate_extent() {
        let entities = vec![boxed(1, 0.0, 0.0, 0.0), boxed(2, 0.0, 0.0, 0.0)];
        let zero = Rect::new(0.0, 0.0, 0.0, 0.0);
        let map = QuadTreeStrategy::default().collision_map(&entities, &zero);
        assert_eq!(map.get(EntityId(1)), Some(&[EntityId(2)][..]));
    }

    #[test]
    fn strategy_kind_parses_snake_case() {
        let kind: StrategyKind = serde_json::from_str("\"quad_tree\"").unwrap();
        assert_eq!(kind, StrategyKind::QuadTree);
        assert_eq!(StrategyKind::default(), StrategyKind::BruteForce);
    }
}
