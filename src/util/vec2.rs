use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Mul, MulAssign, Sub, SubAssign};

/// 2D vector for arena positions and headings
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    #[inline]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Unit vector pointing along `angle` (radians, +x = 0, +y = PI/2)
    #[inline]
    pub fn from_angle(angle: f32) -> Self {
        Self {
            x: angle.cos(),
            y: angle.sin(),
        }
    }

    #[inline]
    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    #[inline]
    pub fn length_sq(&self) -> f32 {
        self.x * self.x + self.y * self.y
    }

    #[inline]
    pub fn distance_to(&self, other: Vec2) -> f32 {
        (*self - other).length()
    }

    #[inline]
    pub fn distance_sq_to(&self, other: Vec2) -> f32 {
        (*self - other).length_sq()
    }

    /// Check whether `other` lies strictly inside `radius` of this point
    #[inline]
    pub fn within(&self, other: Vec2, radius: f32) -> bool {
        self.distance_sq_to(other) < radius * radius
    }

    pub fn lerp(&self, other: Vec2, t: f32) -> Self {
        *self + (other - *self) * t
    }

    /// Wrap both components onto a `width` x `height` torus
    pub fn wrapped(&self, width: f32, height: f32) -> Self {
        Self {
            x: wrap_coordinate(self.x, width),
            y: wrap_coordinate(self.y, height),
        }
    }

    /// Clamp both components into `[inset, dim - inset]`.
    ///
    /// Never panics when the inset exceeds half a dimension; the upper bound wins.
    pub fn clamp_inset(&self, width: f32, height: f32, inset: f32) -> Self {
        Self {
            x: self.x.max(inset).min(width - inset),
            y: self.y.max(inset).min(height - inset),
        }
    }

    /// Check if vector is approximately equal to another
    pub fn approx_eq(&self, other: Vec2, epsilon: f32) -> bool {
        (self.x - other.x).abs() < epsilon && (self.y - other.y).abs() < epsilon
    }
}

/// Modular wraparound of a single coordinate into `[0, dim)`.
///
/// Values below zero re-enter from the far edge and values at or past `dim`
/// re-enter from zero. The result is never equal to `dim`, even when float
/// rounding of `dim + value` would land on it.
#[inline]
pub fn wrap_coordinate(value: f32, dim: f32) -> f32 {
    if dim <= 0.0 || !value.is_finite() {
        return 0.0;
    }
    let wrapped = value.rem_euclid(dim);
    if wrapped >= dim {
        0.0
    } else {
        wrapped
    }
}

impl Add for Vec2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl Sub for Vec2 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

impl Mul<f32> for Vec2 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self {
            x: self.x * rhs,
            y: self.y * rhs,
        }
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl SubAssign for Vec2 {
    fn sub_assign(&mut self, rhs: Self) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl MulAssign<f32> for Vec2 {
    fn mul_assign(&mut self, rhs: f32) {
        self.x *= rhs;
        self.y *= rhs;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    const EPSILON: f32 = 1e-5;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_from_angle() {
        let v = Vec2::from_angle(0.0);
        assert!(approx_eq(v.x, 1.0));
        assert!(approx_eq(v.y, 0.0));

        let v = Vec2::from_angle(PI / 2.0);
        assert!(approx_eq(v.x, 0.0));
        assert!(approx_eq(v.y, 1.0));
    }

    #[test]
    fn test_distance() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(3.0, 4.0);
        assert!(approx_eq(a.distance_to(b), 5.0));
        assert!(approx_eq(a.distance_sq_to(b), 25.0));
    }

    #[test]
    fn test_within_is_strict() {
        let a = Vec2::new(0.0, 0.0);
        assert!(a.within(Vec2::new(14.9, 0.0), 15.0));
        assert!(!a.within(Vec2::new(15.0, 0.0), 15.0));
    }

    #[test]
    fn test_lerp() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(10.0, 20.0);
        let c = a.lerp(b, 0.3);
        assert!(c.approx_eq(Vec2::new(3.0, 6.0), EPSILON));
    }

    #[test]
    fn test_wrap_negative_reenters_far_edge() {
        assert!(approx_eq(wrap_coordinate(-1.0, 1000.0), 999.0));
        assert!(approx_eq(wrap_coordinate(-3.0, 1000.0), 997.0));
    }

    #[test]
    fn test_wrap_at_or_past_dimension() {
        assert_eq!(wrap_coordinate(1000.0, 1000.0), 0.0);
        assert!(approx_eq(wrap_coordinate(1002.5, 1000.0), 2.5));
    }

    #[test]
    fn test_wrap_leaves_interior_alone() {
        assert_eq!(wrap_coordinate(0.0, 1000.0), 0.0);
        assert_eq!(wrap_coordinate(512.25, 1000.0), 512.25);
    }

    #[test]
    fn test_wrap_tiny_negative_never_equals_dimension() {
        let w = wrap_coordinate(-1e-8, 1000.0);
        assert!(w >= 0.0 && w < 1000.0);
    }

    #[test]
    fn test_wrapped_vec() {
        let v = Vec2::new(-2.0, 1001.0).wrapped(1000.0, 800.0);
        assert!(v.approx_eq(Vec2::new(998.0, 201.0), 1e-3));
    }

    #[test]
    fn test_clamp_inset() {
        let v = Vec2::new(10.0, 990.0).clamp_inset(1000.0, 1000.0, 50.0);
        assert_eq!(v, Vec2::new(50.0, 950.0));

        // Arena narrower than twice the inset: no panic
        let v = Vec2::new(10.0, 10.0).clamp_inset(60.0, 60.0, 50.0);
        assert_eq!(v, Vec2::new(10.0, 10.0));
    }

    #[test]
    fn test_add_sub_mul() {
        let a = Vec2::new(1.0, 2.0);
        let b = Vec2::new(3.0, 4.0);
        assert_eq!(a + b, Vec2::new(4.0, 6.0));
        assert_eq!(b - a, Vec2::new(2.0, 2.0));
        assert_eq!(a * 2.0, Vec2::new(2.0, 4.0));
    }

    #[test]
    fn test_assign_ops() {
        let mut a = Vec2::new(1.0, 2.0);
        a += Vec2::new(3.0, 4.0);
        assert_eq!(a, Vec2::new(4.0, 6.0));
        a -= Vec2::new(2.0, 3.0);
        assert_eq!(a, Vec2::new(2.0, 3.0));
        a *= 2.0;
        assert_eq!(a, Vec2::new(4.0, 6.0));
    }

    #[test]
    fn test_serde() {
        let v = Vec2::new(1.5, 2.5);
        let encoded =
            bincode::serde::encode_to_vec(v, bincode::config::standard()).unwrap();
        let (decoded, _): (Vec2, usize) =
            bincode::serde::decode_from_slice(&encoded, bincode::config::standard()).unwrap();
        assert_eq!(v, decoded);
    }
}
