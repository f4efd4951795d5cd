use serde::{Deserialize, Serialize};

use crate::core::rect::Rect;
use crate::core::rng::Rng;
use crate::core::vector::Vector2;

/// Closed outline described by its vertices; the last point connects back
/// to the first.
///
/// Polygons are immutable: `rotate` and `scale` return new outlines and do
/// not remember how they were derived.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Polygon {
    points: Vec<Vector2>,
}

impl Polygon {
    pub fn new(points: Vec<Vector2>) -> Self {
        Self { points }
    }

    pub fn from_points(points: &[[f64; 2]]) -> Self {
        Self::new(points.iter().map(|p| Vector2::new(p[0], p[1])).collect())
    }

    /// Axis-aligned box with its top-left corner at the origin.
    pub fn rectangle(width: f64, height: f64) -> Self {
        Self::from_points(&[[0.0, 0.0], [width, 0.0], [width, height], [0.0, height]])
    }

    /// Regular polygon centred on the origin, first vertex pointing along +x.
    pub fn regular(sides: usize, radius: f64) -> Self {
        let step = 360.0 / sides.max(1) as f64;
        Self::new(
            (0..sides)
                .map(|i| Vector2::from_angle(i as f64 * step, radius))
                .collect(),
        )
    }

    /// Rock-like outline: a regular polygon whose vertices are pulled inward
    /// by up to `jitter` (0..1) of the radius.
    pub fn jagged(sides: usize, radius: f64, jitter: f64, rng: &mut Rng) -> Self {
        let step = 360.0 / sides.max(1) as f64;
        let jitter = jitter.clamp(0.0, 1.0);
        Self::new(
            (0..sides)
                .map(|i| {
                    let r = radius * (1.0 - jitter * rng.next_f64());
                    Vector2::from_angle(i as f64 * step, r)
                })
                .collect(),
        )
    }

    pub fn points(&self) -> &[Vector2] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Axis-aligned bounding box. An empty polygon yields the zero rect.
    pub fn rect(&self) -> Rect {
        let Some(first) = self.points.first() else {
            return Rect::default();
        };
        self.points.iter().skip(1).fold(
            Rect::new(first.y, first.x, first.x, first.y),
            |r, p| Rect {
                top: r.top.min(p.y),
                left: r.left.min(p.x),
                right: r.right.max(p.x),
                bottom: r.bottom.max(p.y),
            },
        )
    }

    pub fn width(&self) -> f64 {
        self.rect().width()
    }

    pub fn height(&self) -> f64 {
        self.rect().height()
    }

    /// Copy rotated by `degrees` around the origin.
    pub fn rotate(&self, degrees: f64) -> Polygon {
        Self::new(self.points.iter().map(|p| p.rotate(degrees)).collect())
    }

    /// Copy scaled uniformly around the origin.
    pub fn scale(&self, factor: f64) -> Polygon {
        Self::new(
            self.points
                .iter()
                .map(|p| Vector2::new(p.x * factor, p.y * factor))
                .collect(),
        )
    }
}
