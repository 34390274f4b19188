//! Displacement vectors.

use num_traits::Float;
use std::ops::Mul;

/// A displacement between two points, e.g. a segment direction or the
/// offset from an input vertex to its offset vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vec2<F> {
    pub x: F,
    pub y: F,
}

impl<F: Float> Vec2<F> {
    #[inline]
    pub fn new(x: F, y: F) -> Self {
        Self { x, y }
    }

    /// The vector of the given `length` at `angle` radians from the +X axis.
    #[inline]
    pub fn from_polar(length: F, angle: F) -> Self {
        Self::new(length * angle.cos(), length * angle.sin())
    }

    #[inline]
    pub fn dot(self, other: Self) -> F {
        self.x * other.x + self.y * other.y
    }

    #[inline]
    pub fn magnitude_squared(self) -> F {
        self.dot(self)
    }

    #[inline]
    pub fn magnitude(self) -> F {
        self.magnitude_squared().sqrt()
    }

    /// The vector rotated a quarter turn counter-clockwise, i.e. pointing to
    /// the left of `self`.
    #[inline]
    pub fn left_normal(self) -> Self {
        Self::new(-self.y, self.x)
    }

    /// Direction in radians, in (-pi, pi].
    #[inline]
    pub fn angle(self) -> F {
        self.y.atan2(self.x)
    }
}

impl<F: Float> Mul<F> for Vec2<F> {
    type Output = Self;

    #[inline]
    fn mul(self, scalar: F) -> Self {
        Self::new(self.x * scalar, self.y * scalar)
    }
}
