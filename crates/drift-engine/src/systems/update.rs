use std::collections::{HashMap, HashSet};

use crate::api::types::{CollisionPair, EntityId};
use crate::components::entity::Entity;
use crate::core::rect::Rect;
use crate::core::scene::Scene;
use crate::systems::collision::CollisionStrategy;
use crate::systems::motion::{move_entities, MoveOptions};

/// What one `update` call did to the scene.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateReport {
    /// Overlapping pairs found this frame, each once.
    pub collisions: Vec<CollisionPair>,
    /// Entities taken out of the scene, in resolution order.
    pub removed: Vec<EntityId>,
    /// Entities appended to the scene, in spawn order.
    pub spawned: Vec<EntityId>,
}

/// Advance the scene by one step: move, detect overlaps, resolve them.
///
/// Each entry of the collision map is resolved through its entity's policy
/// against snapshots of the colliders. Expired entities resolve against an
/// empty list and are always removed; whatever their policy spawns is kept.
/// Removals and spawns are applied after the pass, so entities spawned here
/// are first moved and resolved on the next call.
pub fn update(
    dt: f64,
    scene: &mut Scene,
    bounds: &Rect,
    options: &MoveOptions,
    strategy: &mut dyn CollisionStrategy,
) -> UpdateReport {
    move_entities(dt, scene.entities_mut(), bounds, options);

    let map = strategy.collision_map(scene.entities(), bounds);

    // The scene is only spliced after the pass, so positions stay valid.
    let index: HashMap<EntityId, usize> = scene
        .iter()
        .enumerate()
        .map(|(i, e)| (e.id, i))
        .collect();

    let mut removed = Vec::new();
    let mut spawned: Vec<Entity> = Vec::new();

    for entry in map.iter() {
        let Some(&at) = index.get(&entry.entity) else {
            continue;
        };
        let expired = scene.entities()[at].expired;
        let colliders: Vec<Entity> = if expired {
            Vec::new()
        } else {
            entry
                .colliders
                .iter()
                .filter_map(|id| index.get(id).map(|&i| scene.entities()[i].clone()))
                .collect()
        };

        let resolution = scene.resolve_at(at, &colliders);
        if expired || !resolution.survives {
            removed.push(entry.entity);
        }
        spawned.extend(resolution.spawned);
    }

    let report = UpdateReport {
        collisions: map.pairs(),
        spawned: spawned.iter().map(|e| e.id).collect(),
        removed,
    };

    let removed_set: HashSet<_> = report.removed.iter().copied().collect();
    scene.splice(&removed_set, spawned);

    if !report.removed.is_empty() || !report.spawned.is_empty() {
        log::debug!(
            "update: {} collisions, {} removed, {} spawned, {} live",
            report.collisions.len(),
            report.removed.len(),
            report.spawned.len(),
            scene.len()
        );
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::EntityKind;
    use crate::components::policy::Shatter;
    use crate::core::polygon::Polygon;
    use crate::core::vector::Vector2;
    use crate::systems::collision::{BruteForce, QuadTreeStrategy};

    const SHIP: EntityKind = EntityKind(1);
    const ROCK: EntityKind = EntityKind(2);
    const BULLET: EntityKind = EntityKind(3);

    fn world() -> Rect {
        Rect::new(0.0, 0.0, 100.0, 100.0)
    }

    fn spawn_box(scene: &mut Scene, kind: EntityKind, x: f64, y: f64, size: f64) -> EntityId {
        let id = scene.next_id();
        scene.spawn(
            Entity::new(id, kind, Polygon::rectangle(size, size)).with_location(Vector2::new(x, y)),
        )
    }

    #[test]
    fn bullet_and_ship_destroy_each_other() {
        let mut scene = Scene::new();
        let ship = spawn_box(&mut scene, SHIP, 10.0, 10.0, 10.0);
        let bullet = spawn_box(&mut scene, BULLET, 15.0, 15.0, 2.0);
        let bystander = spawn_box(&mut scene, ROCK, 60.0, 60.0, 10.0);
        scene.get_mut(ship).unwrap().collides_with.insert(BULLET);
        scene.get_mut(bullet).unwrap().collides_with.insert(SHIP);

        let report = update(0.0, &mut scene, &world(), &MoveOptions::default(), &mut BruteForce);

        assert_eq!(report.removed, vec![ship, bullet]);
        assert_eq!(report.collisions, vec![CollisionPair::new(ship, bullet)]);
        let live: Vec<_> = scene.iter().map(|e| e.id).collect();
        assert_eq!(live, vec![bystander]);
    }

    #[test]
    fn one_sided_reaction_only_removes_the_reactor() {
        let mut scene = Scene::new();
        let ship = spawn_box(&mut scene, SHIP, 10.0, 10.0, 10.0);
        let rock = spawn_box(&mut scene, ROCK, 12.0, 12.0, 10.0);
        scene.get_mut(ship).unwrap().collides_with.insert(ROCK);

        let report = update(0.0, &mut scene, &world(), &MoveOptions::default(), &mut BruteForce);
        assert_eq!(report.removed, vec![ship]);
        assert!(scene.get(rock).is_some());
    }

    #[test]
    fn expired_entity_is_removed_even_if_policy_keeps_it() {
        let mut scene = Scene::new();
        let id = scene.next_id();
        scene.spawn(
            Entity::new(id, SHIP, Polygon::rectangle(5.0, 5.0))
                .with_location(Vector2::new(50.0, 50.0))
                .with_expires(0.01),
        );
        let report = update(0.06, &mut scene, &world(), &MoveOptions::default(), &mut BruteForce);
        assert_eq!(report.removed, vec![id]);
        assert!(scene.is_empty());
    }

    #[test]
    fn out_of_bounds_entity_is_removed() {
        let mut scene = Scene::new();
        let id = spawn_box(&mut scene, SHIP, 95.0, 50.0, 10.0);
        scene.get_mut(id).unwrap().velocity = Vector2::new(100.0, 0.0);
        update(0.1, &mut scene, &world(), &MoveOptions::default(), &mut BruteForce);
        assert!(scene.is_empty());
    }

    #[test]
    fn spawned_debris_is_appended_and_not_resolved_this_frame() {
        let mut scene = Scene::new();
        let rock = scene.next_id();
        scene.spawn(
            Entity::new(rock, ROCK, Polygon::rectangle(40.0, 40.0))
                .with_location(Vector2::new(20.0, 20.0))
                .with_velocity(Vector2::new(5.0, 0.0))
                .with_collides_with([BULLET])
                .with_policy(Shatter::new(2, 20.0)),
        );
        let bullet = spawn_box(&mut scene, BULLET, 30.0, 30.0, 2.0);
        scene.get_mut(bullet).unwrap().collides_with.insert(ROCK);

        let report = update(0.0, &mut scene, &world(), &MoveOptions::default(), &mut BruteForce);

        assert_eq!(report.removed, vec![rock, bullet]);
        assert_eq!(report.spawned.len(), 2);
        let live: Vec<_> = scene.iter().map(|e| e.id).collect();
        assert_eq!(live, report.spawned);
        // Pieces overlap each other but are only rocks, which rocks ignore.
        let next = update(0.0, &mut scene, &world(), &MoveOptions::default(), &mut BruteForce);
        assert!(next.removed.is_empty());
        assert_eq!(scene.len(), 2);
    }

    #[test]
    fn expiry_spawns_when_policy_asks() {
        let mut scene = Scene::new();
        let rock = scene.next_id();
        scene.spawn(
            Entity::new(rock, ROCK, Polygon::rectangle(40.0, 40.0))
                .with_location(Vector2::new(20.0, 20.0))
                .with_expires(0.5)
                .with_policy(Shatter::new(3, 10.0).with_on_expiry(true)),
        );
        let report = update(1.0, &mut scene, &world(), &MoveOptions::default(), &mut BruteForce);
        assert_eq!(report.removed, vec![rock]);
        assert_eq!(report.spawned.len(), 3);
        assert_eq!(scene.len(), 3);
    }

    fn timed_update(n: u32) -> std::time::Duration {
        let mut scene = Scene::new();
        for i in 0..n {
            let id = scene.next_id();
            scene.spawn(
                Entity::new(id, SHIP, Polygon::rectangle(1.0, 1.0))
                    .with_location(Vector2::new((i % 200) as f64 * 2.0, (i / 200) as f64 * 2.0))
                    .with_expires(0.01),
            );
        }
        let bounds = Rect::new(0.0, 0.0, 400.0, 400.0);
        let mut strategy = QuadTreeStrategy::default();
        let start = std::time::Instant::now();
        let report = update(0.06, &mut scene, &bounds, &MoveOptions::default(), &mut strategy);
        let elapsed = start.elapsed();
        assert_eq!(report.removed.len(), n as usize);
        assert!(scene.is_empty());
        elapsed
    }

    #[test]
    fn resolution_cost_grows_linearly_with_entity_count() {
        // Best of three to damp scheduler noise.
        let best = |n| (0..3).map(|_| timed_update(n)).min().unwrap_or_default();
        let small = best(4_000).as_secs_f64().max(1e-4);
        let large = best(32_000).as_secs_f64();
        // 8x the entities; a quadratic pass would be ~64x slower.
        assert!(
            large / small < 32.0,
            "update scaled {:.1}x for 8x entities ({:.4}s vs {:.4}s)",
            large / small,
            small,
            large
        );
    }

    #[test]
    fn strategies_agree_on_outcome() {
        let build = || {
            let mut scene = Scene::with_seed(5);
            for i in 0..30 {
                let x = (i * 17 % 90) as f64;
                let y = (i * 29 % 90) as f64;
                let kind = if i % 2 == 0 { SHIP } else { ROCK };
                let id = spawn_box(&mut scene, kind, x, y, 8.0);
                let other = if kind == SHIP { ROCK } else { SHIP };
                scene.get_mut(id).unwrap().collides_with.insert(other);
            }
            scene
        };

        let mut a = build();
        let mut b = build();
        let ra = update(0.0, &mut a, &world(), &MoveOptions::default(), &mut BruteForce);
        let rb = update(0.0, &mut b, &world(), &MoveOptions::default(), &mut QuadTreeStrategy::new(3, 4));

        let mut removed_a = ra.removed.clone();
        let mut removed_b = rb.removed.clone();
        removed_a.sort();
        removed_b.sort();
        assert_eq!(removed_a, removed_b);
        let ids_a: Vec<_> = a.iter().map(|e| e.id).collect();
        let ids_b: Vec<_> = b.iter().map(|e| e.id).collect();
        assert_eq!(ids_a, ids_b);
    }
}
