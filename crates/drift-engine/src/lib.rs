pub mod api;
pub mod core;
pub mod components;
pub mod spatial;
pub mod systems;
pub mod bridge;

// Re-export key types at crate root for convenience
pub use api::config::{PhysicsConfig, QuadTreeConfig};
pub use api::types::{CollisionPair, EntityId, EntityKind};
pub use api::world::World;
pub use components::entity::{CollisionHook, Entity};
pub use components::policy::{CollisionPolicy, Deflecting, Destructible, Resolution, Shatter};
pub use core::polygon::Polygon;
pub use core::rect::Rect;
pub use core::rng::Rng;
pub use core::scene::{Scene, Spawner};
pub use core::time::FixedTimestep;
pub use core::vector::Vector2;
pub use spatial::quadtree::{QuadTree, SpatialItem};
pub use systems::collision::{
    collides, BruteForce, CollisionEntry, CollisionMap, CollisionStrategy, QuadTreeStrategy,
    StrategyKind,
};
pub use systems::constrain::constrain_entity;
pub use systems::motion::{move_entities, MoveOptions};
pub use systems::update::{update, UpdateReport};
pub use bridge::snapshot::{EntitySnapshot, SnapshotBuffer};
