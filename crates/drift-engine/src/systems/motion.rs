use serde::{Deserialize, Serialize};

use crate::components::entity::Entity;
use crate::core::rect::Rect;
use crate::core::vector::Vector2;
use crate::systems::constrain::constrain_entity;

/// Per-frame options recognised by the physics systems.
///
/// `constrain`, `deflect` and `wrap` pick the boundary policy; with none of
/// them set, entities that cross the bounds expire. `gravity` is added to
/// the vertical velocity every step, `v_limit` caps speed.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MoveOptions {
    pub constrain: bool,
    pub deflect: bool,
    pub wrap: bool,
    pub gravity: Option<f64>,
    pub v_limit: Option<f64>,
}

impl MoveOptions {
    /// Whether any boundary policy keeps entities inside the world.
    pub fn has_constraints(&self) -> bool {
        self.constrain || self.deflect || self.wrap
    }

    pub fn constrained() -> Self {
        Self {
            constrain: true,
            ..Self::default()
        }
    }

    pub fn deflecting() -> Self {
        Self {
            deflect: true,
            ..Self::default()
        }
    }

    pub fn wrapping() -> Self {
        Self {
            wrap: true,
            ..Self::default()
        }
    }

    pub fn with_gravity(mut self, gravity: f64) -> Self {
        self.gravity = Some(gravity);
        self
    }

    pub fn with_v_limit(mut self, v_limit: f64) -> Self {
        self.v_limit = Some(v_limit);
        self
    }
}

/// Integrate one step for every entity, in order, then apply the boundary
/// policy. Expired entities are left alone.
///
/// An entity whose `expires` countdown reaches zero is marked expired and
/// does not move this step.
pub fn move_entities(dt: f64, entities: &mut [Entity], bounds: &Rect, options: &MoveOptions) {
    if dt < 0.0 {
        log::warn!("move_entities: negative dt {}", dt);
    }

    for entity in entities.iter_mut() {
        if entity.expired {
            continue;
        }

        if let Some(remaining) = entity.expires.as_mut() {
            *remaining -= dt;
            if *remaining <= 0.0 {
                entity.expired = true;
                log::trace!("entity {:?} timed out", entity.id);
                continue;
            }
        }

        if let Some(gravity) = options.gravity {
            entity.velocity.add(Vector2::new(0.0, gravity));
        }

        let acceleration = entity.acceleration;
        entity.velocity.add(acceleration);

        if let Some(limit) = options.v_limit {
            if entity.velocity.magnitude() > limit {
                entity.velocity.normalize().multiply(limit);
            }
        }

        let mut step = entity.velocity;
        step.multiply(dt);
        entity.location.add(step);

        if entity.torque != 0.0 {
            let rotation = entity.rotation() + dt * entity.torque;
            entity.set_rotation(rotation);
        }

        constrain_entity(entity, bounds, options);
    }
}
