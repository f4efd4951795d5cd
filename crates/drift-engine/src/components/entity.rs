use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

use crate::api::types::{EntityId, EntityKind};
use crate::components::policy::{CollisionPolicy, Destructible, Resolution};
use crate::core::polygon::Polygon;
use crate::core::rect::Rect;
use crate::core::scene::Spawner;
use crate::core::vector::Vector2;

/// Side-effect hook run when an entity is hit by something it reacts to.
/// Receives the entity and the colliders that matched its `collides_with` set.
pub type CollisionHook = Rc<dyn Fn(&Entity, &[&Entity])>;

/// Fat Entity: kinematic state plus its collision response, in one struct.
///
/// `width`/`height` come from the shape's bounds at construction and never
/// change afterwards, even if the entity rotates. `location` is the top-left
/// corner of the entity's box.
#[derive(Clone)]
pub struct Entity {
    /// Unique identifier.
    pub id: EntityId,
    /// Demo-defined type tag.
    pub kind: EntityKind,
    pub location: Vector2,
    pub velocity: Vector2,
    /// Added to velocity every step. Never cleared by the engine.
    pub acceleration: Vector2,
    /// Angular velocity in degrees per time unit.
    pub torque: f64,
    /// Remaining lifetime in caller time units.
    pub expires: Option<f64>,
    /// Sticky: set on timeout or when leaving unconstrained bounds.
    pub expired: bool,
    /// Kinds whose contact triggers this entity's response.
    pub collides_with: HashSet<EntityKind>,
    width: f64,
    height: f64,
    rotation: f64,
    shape: Polygon,
    policy: Rc<dyn CollisionPolicy>,
    on_collision: Option<CollisionHook>,
}

impl Entity {
    /// Create an entity at the origin, sized from `shape`, with the default
    /// destroy-on-contact policy.
    pub fn new(id: EntityId, kind: EntityKind, shape: Polygon) -> Self {
        let bounds = shape.rect();
        Self {
            id,
            kind,
            location: Vector2::ZERO,
            velocity: Vector2::ZERO,
            acceleration: Vector2::ZERO,
            torque: 0.0,
            expires: None,
            expired: false,
            collides_with: HashSet::new(),
            width: bounds.width(),
            height: bounds.height(),
            rotation: 0.0,
            shape,
            policy: Rc::new(Destructible),
            on_collision: None,
        }
    }

    // -- Builder pattern --

    pub fn with_location(mut self, location: Vector2) -> Self {
        self.location = location;
        self
    }

    pub fn with_velocity(mut self, velocity: Vector2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_acceleration(mut self, acceleration: Vector2) -> Self {
        self.acceleration = acceleration;
        self
    }

    pub fn with_rotation(mut self, degrees: f64) -> Self {
        self.set_rotation(degrees);
        self
    }

    pub fn with_torque(mut self, torque: f64) -> Self {
        self.torque = torque;
        self
    }

    pub fn with_expires(mut self, lifetime: f64) -> Self {
        self.expires = Some(lifetime);
        self
    }

    pub fn with_collides_with(mut self, kinds: impl IntoIterator<Item = EntityKind>) -> Self {
        self.collides_with.extend(kinds);
        self
    }

    pub fn with_policy(mut self, policy: impl CollisionPolicy + 'static) -> Self {
        self.policy = Rc::new(policy);
        self
    }

    /// Share an existing policy instance (debris inherits its parent's this way).
    pub fn with_shared_policy(mut self, policy: Rc<dyn CollisionPolicy>) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_on_collision(mut self, hook: impl Fn(&Entity, &[&Entity]) + 'static) -> Self {
        self.on_collision = Some(Rc::new(hook));
        self
    }

    // -- Accessors --

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn shape(&self) -> &Polygon {
        &self.shape
    }

    /// Rotation in degrees, always inside (-360, 360).
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    /// Values outside the open interval (-360, 360) reset to 0 rather than
    /// wrapping, so 360 and 720 both become 0 and 370 becomes 0 as well.
    pub fn set_rotation(&mut self, degrees: f64) {
        self.rotation = if degrees > -360.0 && degrees < 360.0 {
            degrees
        } else {
            0.0
        };
    }

    /// The entity's box, recomputed from the current location.
    pub fn rect(&self) -> Rect {
        Rect::from_origin_size(self.location.x, self.location.y, self.width, self.height)
    }

    pub fn policy(&self) -> Rc<dyn CollisionPolicy> {
        Rc::clone(&self.policy)
    }

    /// Whether contact with `other` triggers this entity's response.
    pub fn reacts_to(&self, other: &Entity) -> bool {
        self.collides_with.contains(&other.kind)
    }

    /// The subset of `others` this entity reacts to.
    pub fn matching<'a>(&self, others: &'a [Entity]) -> Vec<&'a Entity> {
        others.iter().filter(|o| self.reacts_to(o)).collect()
    }

    /// Run the `on_collision` hook, if any.
    pub fn notify_collision(&self, matches: &[&Entity]) {
        if let Some(hook) = &self.on_collision {
            hook(self, matches);
        }
    }

    /// Resolve a contact through this entity's policy.
    pub fn collision(&mut self, others: &[Entity], spawner: &mut Spawner<'_>) -> Resolution {
        let policy = Rc::clone(&self.policy);
        policy.resolve(self, others, spawner)
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("location", &self.location)
            .field("velocity", &self.velocity)
            .field("acceleration", &self.acceleration)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("rotation", &self.rotation)
            .field("torque", &self.torque)
            .field("expires", &self.expires)
            .field("expired", &self.expired)
            .field("policy", &self.policy.name())
            .finish()
    }
}
