use crate::components::entity::Entity;
use crate::core::rect::Rect;
use crate::systems::motion::MoveOptions;

/// Apply the boundary policy in `options` to one entity.
///
/// - `wrap` wins over the others: once the entity is a full half-extent past
///   an edge it reappears just beyond the opposite edge, velocity untouched.
/// - `constrain` clamps the box to each edge it crosses; `deflect` also
///   reverses the velocity component for that edge.
/// - With no policy set, crossing any edge marks the entity expired.
pub fn constrain_entity(entity: &mut Entity, bounds: &Rect, options: &MoveOptions) {
    let mut location = entity.location;
    let mut velocity = entity.velocity;
    let width = entity.width();
    let height = entity.height();

    if options.wrap {
        let half_w = width * 0.5;
        let half_h = height * 0.5;
        if location.x - half_w > bounds.right {
            location.x = bounds.left - half_w;
        } else if location.x + half_w < bounds.left {
            location.x = bounds.right + half_w;
        }
        if location.y - half_h > bounds.bottom {
            location.y = bounds.top - half_h;
        } else if location.y + half_h < bounds.top {
            location.y = bounds.bottom + half_h;
        }
    } else {
        let clamps = options.has_constraints();
        let mut out_of_bounds = false;

        if location.x < bounds.left {
            if clamps {
                location.x = bounds.left;
                if options.deflect {
                    velocity.x = -velocity.x;
                }
            } else {
                out_of_bounds = true;
            }
        }
        if location.x + width > bounds.right {
            if clamps {
                location.x = bounds.right - width;
                if options.deflect {
                    velocity.x = -velocity.x;
                }
            } else {
                out_of_bounds = true;
            }
        }
        if location.y < bounds.top {
            if clamps {
                location.y = bounds.top;
                if options.deflect {
                    velocity.y = -velocity.y;
                }
            } else {
                out_of_bounds = true;
            }
        }
        if location.y + height > bounds.bottom {
            if clamps {
                location.y = bounds.bottom - height;
                if options.deflect {
                    velocity.y = -velocity.y;
                }
            } else {
                out_of_bounds = true;
            }
        }

        if out_of_bounds {
            entity.expired = true;
        }
    }

    entity.location = location;
    entity.velocity = velocity;
}
