use std::rc::Rc;

use crate::components::entity::Entity;
use crate::core::polygon::Polygon;
use crate::core::scene::Spawner;
use crate::core::vector::Vector2;

/// Outcome of resolving one entity's contacts.
///
/// `survives` says whether the entity stays in the scene; `spawned` holds new
/// entities to append once the resolution pass is over.
#[derive(Debug, Default)]
pub struct Resolution {
    pub survives: bool,
    pub spawned: Vec<Entity>,
}

impl Resolution {
    /// Keep the entity, spawn nothing.
    pub fn survive() -> Self {
        Self {
            survives: true,
            spawned: Vec::new(),
        }
    }

    /// Remove the entity, spawn nothing.
    pub fn destroy() -> Self {
        Self {
            survives: false,
            spawned: Vec::new(),
        }
    }

    /// Remove the entity and put `spawned` in its place.
    pub fn replace_with(spawned: Vec<Entity>) -> Self {
        Self {
            survives: false,
            spawned,
        }
    }
}

/// How an entity responds to the entities it overlaps.
///
/// `colliders` is every entity whose box touched this one this frame; it is
/// empty when the entity expired, which lets a policy leave something behind
/// even on a pure timeout.
pub trait CollisionPolicy {
    /// Short name for logs and `Debug` output.
    fn name(&self) -> &'static str;

    fn resolve(
        &self,
        entity: &mut Entity,
        colliders: &[Entity],
        spawner: &mut Spawner<'_>,
    ) -> Resolution;
}

/// Dies on contact with any kind in `collides_with`. The default policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct Destructible;

impl CollisionPolicy for Destructible {
    fn name(&self) -> &'static str {
        "destructible"
    }

    fn resolve(&self, entity: &mut Entity, colliders: &[Entity], _spawner: &mut Spawner<'_>) -> Resolution {
        let matches = entity.matching(colliders);
        if matches.is_empty() {
            return Resolution::survive();
        }
        entity.notify_collision(&matches);
        Resolution::destroy()
    }
}

/// Survives contact and bounces away: each velocity component heading
/// toward the matched colliders' centroid is reversed.
#[derive(Debug, Clone, Copy, Default)]
pub struct Deflecting;

impl CollisionPolicy for Deflecting {
    fn name(&self) -> &'static str {
        "deflecting"
    }

    fn resolve(&self, entity: &mut Entity, colliders: &[Entity], _spawner: &mut Spawner<'_>) -> Resolution {
        let matches = entity.matching(colliders);
        if matches.is_empty() {
            return Resolution::survive();
        }
        entity.notify_collision(&matches);

        let mut centroid = Vector2::ZERO;
        for other in &matches {
            centroid.add(other.rect().center());
        }
        centroid.divide(matches.len() as f64);

        let mut toward = centroid;
        toward.subtract(entity.rect().center());
        if toward.x * entity.velocity.x > 0.0 {
            entity.velocity.x = -entity.velocity.x;
        }
        if toward.y * entity.velocity.y > 0.0 {
            entity.velocity.y = -entity.velocity.y;
        }
        Resolution::survive()
    }
}

/// Breaks into smaller pieces on contact, asteroid style.
///
/// Each piece is half the parent's size, inherits its kind, reactions and
/// this policy, and flies off along the parent's velocity deflected by up to
/// `spread` degrees. Pieces smaller than `min_size` are not spawned, which
/// ends the chain.
#[derive(Debug, Clone, Copy)]
pub struct Shatter {
    pub pieces: u32,
    /// Maximum deflection of each piece's heading, in degrees.
    pub spread: f64,
    pub min_size: f64,
    /// Lifetime given to each piece.
    pub lifetime: Option<f64>,
    /// Also shatter when the entity times out or leaves the world.
    pub on_expiry: bool,
}

impl Shatter {
    /// Outline vertex count for spawned pieces.
    const PIECE_SIDES: usize = 7;
    const PIECE_JITTER: f64 = 0.35;
    const MAX_PIECE_TORQUE: f64 = 90.0;

    pub fn new(pieces: u32, spread: f64) -> Self {
        Self {
            pieces,
            spread,
            min_size: 4.0,
            lifetime: None,
            on_expiry: false,
        }
    }

    pub fn with_min_size(mut self, min_size: f64) -> Self {
        self.min_size = min_size;
        self
    }

    pub fn with_lifetime(mut self, lifetime: f64) -> Self {
        self.lifetime = Some(lifetime);
        self
    }

    pub fn with_on_expiry(mut self, on_expiry: bool) -> Self {
        self.on_expiry = on_expiry;
        self
    }

    fn debris(&self, parent: &Entity, spawner: &mut Spawner<'_>) -> Vec<Entity> {
        let size = parent.width().max(parent.height()) * 0.5;
        if size < self.min_size {
            return Vec::new();
        }
        let center = parent.rect().center();
        let policy = parent.policy();

        (0..self.pieces)
            .map(|_| {
                let shape = Polygon::jagged(Self::PIECE_SIDES, size * 0.5, Self::PIECE_JITTER, spawner.rng());
                let velocity = parent.velocity.split(self.spread, spawner.rng());
                let torque = spawner.rng().range(-Self::MAX_PIECE_TORQUE, Self::MAX_PIECE_TORQUE);
                let id = spawner.next_id();

                let mut piece = Entity::new(id, parent.kind, shape)
                    .with_velocity(velocity)
                    .with_torque(torque)
                    .with_rotation(parent.rotation())
                    .with_collides_with(parent.collides_with.iter().copied())
                    .with_shared_policy(Rc::clone(&policy));
                piece.location = Vector2::new(
                    center.x - piece.width() * 0.5,
                    center.y - piece.height() * 0.5,
                );
                if let Some(lifetime) = self.lifetime {
                    piece = piece.with_expires(lifetime);
                }
                piece
            })
            .collect()
    }
}

impl CollisionPolicy for Shatter {
    fn name(&self) -> &'static str {
        "shatter"
    }

    fn resolve(&self, entity: &mut Entity, colliders: &[Entity], spawner: &mut Spawner<'_>) -> Resolution {
        if entity.expired {
            if self.on_expiry {
                return Resolution::replace_with(self.debris(entity, spawner));
            }
            return Resolution::destroy();
        }

        let matches = entity.matching(colliders);
        if matches.is_empty() {
            return Resolution::survive();
        }
        entity.notify_collision(&matches);
        let pieces = self.debris(entity, spawner);
        log::trace!("entity {:?} shattered into {} pieces", entity.id, pieces.len());
        Resolution::replace_with(pieces)
    }
}
