//! 2D line segment type.

use super::{Point2, Vec2};
use crate::tolerance::{orientation_index, Orientation};
use num_traits::Float;
use std::cmp::Ordering;

/// A 2D line segment defined by two endpoints.
///
/// Generic over floating-point types (`f32` or `f64`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment2<F> {
    pub start: Point2<F>,
    pub end: Point2<F>,
}

impl<F: Float> Segment2<F> {
    /// Creates a new segment from two points.
    #[inline]
    pub fn new(start: Point2<F>, end: Point2<F>) -> Self {
        Self { start, end }
    }

    /// Returns the direction vector from start to end.
    #[inline]
    pub fn direction(self) -> Vec2<F> {
        self.end - self.start
    }

    /// Returns this segment oriented so that it points upwards (non-decreasing Y),
    /// along with whether it had to be flipped.
    #[inline]
    pub fn upward(self) -> (Self, bool) {
        if self.start.y > self.end.y {
            (Self::new(self.end, self.start), true)
        } else {
            (self, false)
        }
    }

    /// Smallest X ordinate of the two endpoints.
    #[inline]
    pub fn min_x(self) -> F {
        self.start.x.min(self.end.x)
    }

    /// Largest X ordinate of the two endpoints.
    #[inline]
    pub fn max_x(self) -> F {
        self.start.x.max(self.end.x)
    }

    /// Returns `true` if both endpoints share the same Y ordinate.
    #[inline]
    pub fn is_horizontal(self) -> bool {
        self.start.y == self.end.y
    }

    /// Computes the closest point on the segment to the given point.
    ///
    /// Returns a tuple of (closest_point, parameter_t) where t is in [0, 1].
    pub fn closest_point(self, p: Point2<F>) -> (Point2<F>, F) {
        let v = self.direction();
        let len_sq = v.magnitude_squared();

        // Degenerate segment (start == end)
        if len_sq <= F::epsilon() {
            return (self.start, F::zero());
        }

        let t = (p - self.start).dot(v) / len_sq;
        let t_clamped = t.max(F::zero()).min(F::one());

        (self.start + v * t_clamped, t_clamped)
    }

    /// Computes the distance from a point to this segment.
    #[inline]
    pub fn distance_to_point(self, p: Point2<F>) -> F {
        let (closest, _) = self.closest_point(p);
        p.distance(closest)
    }

    /// Lexicographic comparison by start point, then end point.
    pub fn compare_lexicographic(self, other: Self) -> Ordering {
        match self.start.compare_xy(other.start) {
            Ordering::Equal => self.end.compare_xy(other.end),
            ord => ord,
        }
    }
}

impl Segment2<f64> {
    /// Determines the orientation of `other` relative to this segment's line.
    ///
    /// Returns `CounterClockwise` if `other` lies to the left (or is touching
    /// it from the left), `Clockwise` if it lies to the right, and `Collinear`
    /// if it straddles the line or lies on it.
    pub fn orientation_of(self, other: Self) -> Orientation {
        let o0 = orientation_index(self.start, self.end, other.start).sign();
        let o1 = orientation_index(self.start, self.end, other.end).sign();
        if o0 >= 0 && o1 >= 0 {
            return Orientation::from_sign(o0.max(o1));
        }
        if o0 <= 0 && o1 <= 0 {
            return Orientation::from_sign(o0.min(o1));
        }
        Orientation::Collinear
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn seg(x1: f64, y1: f64, x2: f64, y2: f64) -> Segment2<f64> {
        Segment2::new(Point2::new(x1, y1), Point2::new(x2, y2))
    }

    #[test]
    fn test_direction() {
        assert_eq!(seg(1.0, 2.0, 3.0, 4.0).direction(), Vec2::new(2.0, 2.0));
    }

    #[test]
    fn test_upward() {
        let s = seg(0.0, 5.0, 1.0, 0.0);
        let (up, flipped) = s.upward();
        assert!(flipped);
        assert_eq!(up.start, Point2::new(1.0, 0.0));

        let (same, flipped) = up.upward();
        assert!(!flipped);
        assert_eq!(same, up);
    }

    #[test]
    fn test_extent_and_horizontal() {
        let s = seg(3.0, 1.0, -2.0, 1.0);
        assert_eq!(s.min_x(), -2.0);
        assert_eq!(s.max_x(), 3.0);
        assert!(s.is_horizontal());
        assert!(!seg(0.0, 0.0, 0.0, 1.0).is_horizontal());
    }

    #[test]
    fn test_closest_point_clamps() {
        let s = seg(0.0, 0.0, 10.0, 0.0);

        let (c, t) = s.closest_point(Point2::new(5.0, 5.0));
        assert_relative_eq!(c.x, 5.0, epsilon = 1e-10);
        assert_relative_eq!(t, 0.5, epsilon = 1e-10);

        let (c, t) = s.closest_point(Point2::new(-5.0, 0.0));
        assert_relative_eq!(c.x, 0.0, epsilon = 1e-10);
        assert_relative_eq!(t, 0.0, epsilon = 1e-10);

        assert_relative_eq!(s.distance_to_point(Point2::new(13.0, 4.0)), 5.0, epsilon = 1e-10);
    }

    #[test]
    fn test_degenerate_closest_point() {
        let s = seg(5.0, 5.0, 5.0, 5.0);
        let (closest, t) = s.closest_point(Point2::new(0.0, 0.0));
        assert_eq!(closest, Point2::new(5.0, 5.0));
        assert_eq!(t, 0.0);
    }

    #[test]
    fn test_orientation_of() {
        let base = seg(0.0, 0.0, 0.0, 10.0);
        let left = seg(-1.0, 0.0, -2.0, 5.0);
        let right = seg(1.0, 0.0, 2.0, 5.0);
        let straddle = seg(-1.0, 0.0, 1.0, 5.0);
        let touching_left = seg(0.0, 2.0, -1.0, 5.0);

        assert_eq!(base.orientation_of(left), Orientation::CounterClockwise);
        assert_eq!(base.orientation_of(right), Orientation::Clockwise);
        assert_eq!(base.orientation_of(straddle), Orientation::Collinear);
        assert_eq!(base.orientation_of(touching_left), Orientation::CounterClockwise);
    }

    #[test]
    fn test_compare_lexicographic() {
        let a: Segment2<f64> = seg(0.0, 0.0, 1.0, 1.0);
        let b = seg(0.0, 0.0, 1.0, 2.0);
        assert_eq!(a.compare_lexicographic(b), Ordering::Less);
        assert_eq!(b.compare_lexicographic(a), Ordering::Greater);
        assert_eq!(a.compare_lexicographic(a), Ordering::Equal);
    }
}
