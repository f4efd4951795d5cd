use std::ops::{AddAssign, MulAssign, Neg, SubAssign};

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::core::rng::Rng;

/// Minimal 2D vector with in-place arithmetic.
///
/// The mutating methods return `&mut Self` so calls can be chained:
/// `v.add(a).multiply(dt)`. Division and normalization by zero leave the
/// vector untouched instead of producing infinities.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector2 {
    pub x: f64,
    pub y: f64,
}

impl Vector2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Vector of the given length pointing at `degrees` (0 = +x, 90 = +y).
    pub fn from_angle(degrees: f64, length: f64) -> Self {
        (DVec2::from_angle(degrees.to_radians()) * length).into()
    }

    pub fn set(&mut self, x: f64, y: f64) -> &mut Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn add(&mut self, v: Vector2) -> &mut Self {
        self.x += v.x;
        self.y += v.y;
        self
    }

    pub fn subtract(&mut self, v: Vector2) -> &mut Self {
        self.x -= v.x;
        self.y -= v.y;
        self
    }

    pub fn multiply(&mut self, scalar: f64) -> &mut Self {
        self.x *= scalar;
        self.y *= scalar;
        self
    }

    /// Divide both components. A zero divisor is a no-op.
    pub fn divide(&mut self, scalar: f64) -> &mut Self {
        if scalar != 0.0 {
            self.x /= scalar;
            self.y /= scalar;
        }
        self
    }

    /// Euclidean length.
    pub fn magnitude(&self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Scale to unit length. The zero vector stays zero.
    pub fn normalize(&mut self) -> &mut Self {
        let m = self.magnitude();
        self.divide(m)
    }

    pub fn dot(&self, other: Vector2) -> f64 {
        self.x * other.x + self.y * other.y
    }

    pub fn distance(&self, other: Vector2) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Copy of this vector rotated by `degrees` around the origin.
    pub fn rotate(&self, degrees: f64) -> Vector2 {
        DVec2::from_angle(degrees.to_radians())
            .rotate(DVec2::from(*self))
            .into()
    }

    /// Copy of this vector deflected by a random angle in `[-angle, angle]` degrees.
    /// Used when spawning debris that should fan out from the parent's heading.
    pub fn split(&self, angle_degrees: f64, rng: &mut Rng) -> Vector2 {
        let spread = angle_degrees.abs();
        self.rotate(rng.range(-spread, spread))
    }
}

impl From<DVec2> for Vector2 {
    fn from(v: DVec2) -> Self {
        Self::new(v.x, v.y)
    }
}

impl From<Vector2> for DVec2 {
    fn from(v: Vector2) -> Self {
        DVec2::new(v.x, v.y)
    }
}

impl AddAssign for Vector2 {
    fn add_assign(&mut self, rhs: Vector2) {
        Vector2::add(self, rhs);
    }
}

impl SubAssign for Vector2 {
    fn sub_assign(&mut self, rhs: Vector2) {
        self.subtract(rhs);
    }
}

impl MulAssign<f64> for Vector2 {
    fn mul_assign(&mut self, rhs: f64) {
        self.multiply(rhs);
    }
}

impl Neg for Vector2 {
    type Output = Vector2;

    fn neg(self) -> Vector2 {
        Vector2::new(-self.x, -self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vector2, b: Vector2) -> bool {
        (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
    }

    #[test]
    fn divide_by_zero_is_noop() {
        let mut v = Vector2::new(4.0, 6.0);
        v.divide(0.0);
        assert_eq!(v, Vector2::new(4.0, 6.0));
        v.divide(2.0);
        assert_eq!(v, Vector2::new(2.0, 3.0));
    }

    #[test]
    fn chained_arithmetic() {
        let mut v = Vector2::new(1.0, 1.0);
        v.add(Vector2::new(2.0, 3.0)).multiply(2.0).subtract(Vector2::new(1.0, 1.0));
        assert_eq!(v, Vector2::new(5.0, 7.0));
    }

    #[test]
    fn set_overwrites_both_components() {
        let mut v = Vector2::new(1.0, 2.0);
        v.set(-3.0, 0.5).multiply(2.0);
        assert_eq!(v, Vector2::new(-6.0, 1.0));
    }

    #[test]
    fn dot_and_distance() {
        let a = Vector2::new(1.0, 2.0);
        let b = Vector2::new(4.0, 6.0);
        assert_eq!(a.dot(b), 16.0);
        assert_eq!(a.dot(Vector2::new(-2.0, 1.0)), 0.0);
        assert!((a.distance(b) - 5.0).abs() < 1e-12);
        assert_eq!(a.distance(b), b.distance(a));
        assert_eq!(a.distance(a), 0.0);
    }

    #[test]
    fn magnitude_and_normalize() {
        let mut v = Vector2::new(3.0, 4.0);
        assert!((v.magnitude() - 5.0).abs() < 1e-12);
        v.normalize();
        assert!(approx(v, Vector2::new(0.6, 0.8)));

        let mut zero = Vector2::ZERO;
        zero.normalize();
        assert_eq!(zero, Vector2::ZERO);
    }

    #[test]
    fn rotate_quarter_turn() {
        let v = Vector2::new(1.0, 0.0).rotate(90.0);
        assert!(approx(v, Vector2::new(0.0, 1.0)), "got {:?}", v);
    }

    #[test]
    fn from_angle_has_requested_length() {
        let v = Vector2::from_angle(180.0, 2.0);
        assert!(approx(v, Vector2::new(-2.0, 0.0)), "got {:?}", v);
    }

    #[test]
    fn split_preserves_speed_and_stays_within_spread() {
        let mut rng = Rng::new(9);
        let v = Vector2::new(10.0, 0.0);
        for _ in 0..50 {
            let s = v.split(30.0, &mut rng);
            assert!((s.magnitude() - 10.0).abs() < 1e-9);
            let angle = s.y.atan2(s.x).to_degrees();
            assert!(angle.abs() <= 30.0 + 1e-9, "deflection {} too wide", angle);
        }
        assert_eq!(v, Vector2::new(10.0, 0.0));
    }

    #[test]
    fn operator_assign_matches_methods() {
        let mut v = Vector2::new(1.0, 2.0);
        v += Vector2::new(1.0, 1.0);
        v *= 3.0;
        v -= Vector2::new(0.0, 1.0);
        assert_eq!(v, Vector2::new(6.0, 8.0));
        assert_eq!(-v, Vector2::new(-6.0, -8.0));
    }
}
