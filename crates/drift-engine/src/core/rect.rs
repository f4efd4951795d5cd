use serde::{Deserialize, Serialize};

use crate::core::vector::Vector2;

/// Axis-aligned rectangle in world space (y grows downward).
///
/// Used for entity boxes, polygon bounds, quadtree cells and world bounds.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub top: f64,
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    pub const fn new(top: f64, left: f64, right: f64, bottom: f64) -> Self {
        Self { top, left, right, bottom }
    }

    /// Rect whose top-left corner is `(x, y)`.
    pub fn from_origin_size(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            top: y,
            left: x,
            right: x + width,
            bottom: y + height,
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    pub fn center(&self) -> Vector2 {
        Vector2::new(
            (self.left + self.right) * 0.5,
            (self.top + self.bottom) * 0.5,
        )
    }

    /// True unless the two rects are strictly separated on some axis.
    /// Shared edges count as overlapping.
    pub fn overlaps(&self, other: &Rect) -> bool {
        !(self.left > other.right
            || self.right < other.left
            || self.bottom < other.top
            || self.top > other.bottom)
    }

    /// Whether `other` lies entirely inside this rect (edges inclusive).
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.left >= self.left
            && other.right <= self.right
            && other.top >= self.top
            && other.bottom <= self.bottom
    }

    /// Smallest rect covering both.
    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            top: self.top.min(other.top),
            left: self.left.min(other.left),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }

    /// The four equal quadrants: top-left, top-right, bottom-left, bottom-right.
    pub fn quadrants(&self) -> [Rect; 4] {
        let mid_x = (self.left + self.right) * 0.5;
        let mid_y = (self.top + self.bottom) * 0.5;
        [
            Rect::new(self.top, self.left, mid_x, mid_y),
            Rect::new(self.top, mid_x, self.right, mid_y),
            Rect::new(mid_y, self.left, mid_x, self.bottom),
            Rect::new(mid_y, mid_x, self.right, self.bottom),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_size_and_dimensions() {
        let r = Rect::from_origin_size(10.0, 20.0, 30.0, 40.0);
        assert_eq!(r, Rect::new(20.0, 10.0, 40.0, 60.0));
        assert_eq!(r.width(), 30.0);
        assert_eq!(r.height(), 40.0);
        assert_eq!(r.center(), Vector2::new(25.0, 40.0));
    }

    #[test]
    fn shared_edge_overlaps() {
        let a = Rect::from_origin_size(0.0, 0.0, 10.0, 10.0);
        let b = Rect::from_origin_size(10.0, 0.0, 10.0, 10.0);
        assert!(a.overlaps(&b));
        let c = Rect::from_origin_size(10.5, 0.0, 10.0, 10.0);
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn quadrants_tile_the_rect() {
        let r = Rect::new(0.0, 0.0, 100.0, 50.0);
        let q = r.quadrants();
        assert_eq!(q[0], Rect::new(0.0, 0.0, 50.0, 25.0));
        assert_eq!(q[3], Rect::new(25.0, 50.0, 100.0, 50.0));
        let total: f64 = q.iter().map(Rect::area).sum();
        assert!((total - r.area()).abs() < 1e-9);
    }

    #[test]
    fn contains_and_union() {
        let outer = Rect::new(0.0, 0.0, 100.0, 100.0);
        let inner = Rect::new(10.0, 10.0, 20.0, 20.0);
        assert!(outer.contains_rect(&inner));
        assert!(!inner.contains_rect(&outer));
        let far = Rect::new(150.0, 150.0, 160.0, 160.0);
        assert_eq!(outer.union(&far), Rect::new(0.0, 0.0, 160.0, 160.0));
    }
}
