//! Robust orientation predicates.
//!
//! The orientation test uses a floating-point filter and falls back to
//! double-double arithmetic when the filter cannot certify the sign. This
//! keeps the result consistent for nearly collinear inputs, which the
//! topology graph relies on when sorting edge stars and locating depths.

use crate::primitives::Point2;

/// Result of an orientation test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Points are counter-clockwise (positive area).
    CounterClockwise,
    /// Points are clockwise (negative area).
    Clockwise,
    /// Points are collinear.
    Collinear,
}

impl Orientation {
    /// Returns `1`, `-1` or `0` for counter-clockwise, clockwise and collinear.
    #[inline]
    pub fn sign(self) -> i32 {
        match self {
            Orientation::CounterClockwise => 1,
            Orientation::Clockwise => -1,
            Orientation::Collinear => 0,
        }
    }

    /// Inverse of [`Orientation::sign`]; any positive value is counter-clockwise.
    #[inline]
    pub fn from_sign(sign: i32) -> Self {
        match sign.signum() {
            1 => Orientation::CounterClockwise,
            -1 => Orientation::Clockwise,
            _ => Orientation::Collinear,
        }
    }
}

/// Relative error bound of the floating-point filter.
const FILTER_EPSILON: f64 = 1e-15;

/// Returns the orientation of `q` relative to the directed line `p1 -> p2`.
///
/// `CounterClockwise` means `q` lies to the left of the line.
pub fn orientation_index(p1: Point2<f64>, p2: Point2<f64>, q: Point2<f64>) -> Orientation {
    if let Some(o) = orientation_filter(p1, p2, q) {
        return o;
    }

    let dx1 = DoubleDouble::difference(p2.x, p1.x);
    let dy1 = DoubleDouble::difference(p2.y, p1.y);
    let dx2 = DoubleDouble::difference(q.x, p2.x);
    let dy2 = DoubleDouble::difference(q.y, p2.y);

    let det = dx1.mul(dy2).sub(dy1.mul(dx2));
    Orientation::from_sign(det.signum())
}

/// Fast determinant evaluation that only answers when the sign is certain.
fn orientation_filter(pa: Point2<f64>, pb: Point2<f64>, pc: Point2<f64>) -> Option<Orientation> {
    let detleft = (pa.x - pc.x) * (pb.y - pc.y);
    let detright = (pa.y - pc.y) * (pb.x - pc.x);
    let det = detleft - detright;

    let detsum = if detleft > 0.0 {
        if detright <= 0.0 {
            return Some(Orientation::from_sign(signum(det)));
        }
        detleft + detright
    } else if detleft < 0.0 {
        if detright >= 0.0 {
            return Some(Orientation::from_sign(signum(det)));
        }
        -detleft - detright
    } else {
        return Some(Orientation::from_sign(signum(det)));
    };

    let errbound = FILTER_EPSILON * detsum;
    if det >= errbound || -det >= errbound {
        Some(Orientation::from_sign(signum(det)))
    } else {
        None
    }
}

#[inline]
fn signum(v: f64) -> i32 {
    if v > 0.0 {
        1
    } else if v < 0.0 {
        -1
    } else {
        0
    }
}

/// Unevaluated sum `hi + lo` carrying roughly 106 bits of precision.
#[derive(Debug, Clone, Copy)]
struct DoubleDouble {
    hi: f64,
    lo: f64,
}

impl DoubleDouble {
    /// Exact difference `a - b`.
    fn difference(a: f64, b: f64) -> Self {
        let (hi, lo) = two_sum(a, -b);
        Self { hi, lo }
    }

    fn mul(self, other: Self) -> Self {
        let (p, mut e) = two_prod(self.hi, other.hi);
        e += self.hi * other.lo + self.lo * other.hi;
        let (hi, lo) = quick_two_sum(p, e);
        Self { hi, lo }
    }

    fn sub(self, other: Self) -> Self {
        let (s, mut e) = two_sum(self.hi, -other.hi);
        e += self.lo - other.lo;
        let (hi, lo) = quick_two_sum(s, e);
        Self { hi, lo }
    }

    fn signum(self) -> i32 {
        match signum(self.hi) {
            0 => signum(self.lo),
            s => s,
        }
    }
}

#[inline]
fn two_sum(a: f64, b: f64) -> (f64, f64) {
    let s = a + b;
    let bb = s - a;
    let err = (a - (s - bb)) + (b - bb);
    (s, err)
}

#[inline]
fn quick_two_sum(a: f64, b: f64) -> (f64, f64) {
    let s = a + b;
    let err = b - (s - a);
    (s, err)
}

#[inline]
fn two_prod(a: f64, b: f64) -> (f64, f64) {
    let p = a * b;
    let err = a.mul_add(b, -p);
    (p, err)
}

/// Tests whether a closed ring is oriented counter-clockwise.
///
/// The ring must repeat its first point at the end. The orientation is
/// decided at the highest vertex, which keeps the test valid for rings with
/// self-touching or collinear stretches. Rings with fewer than three distinct
/// points report `false`.
pub fn ring_is_ccw(ring: &[Point2<f64>]) -> bool {
    if ring.len() < 4 {
        return false;
    }
    let n = ring.len() - 1;

    let mut hi_index = 0;
    for i in 1..=n {
        if ring[i].y > ring[hi_index].y {
            hi_index = i;
        }
    }
    let hi = ring[hi_index];

    let mut prev_index = hi_index;
    loop {
        prev_index = if prev_index == 0 { n } else { prev_index - 1 };
        if ring[prev_index] != hi || prev_index == hi_index {
            break;
        }
    }

    let mut next_index = hi_index;
    loop {
        next_index = (next_index + 1) % n;
        if ring[next_index] != hi || next_index == hi_index {
            break;
        }
    }

    let prev = ring[prev_index];
    let next = ring[next_index];
    if prev == hi || next == hi || prev == next {
        return false;
    }

    match orientation_index(prev, hi, next) {
        Orientation::Collinear => prev.x > next.x,
        o => o == Orientation::CounterClockwise,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point2<f64> {
        Point2::new(x, y)
    }

    #[test]
    fn test_orientation_basic() {
        let a = p(0.0, 0.0);
        let b = p(1.0, 0.0);
        assert_eq!(orientation_index(a, b, p(0.5, 1.0)), Orientation::CounterClockwise);
        assert_eq!(orientation_index(a, b, p(0.5, -1.0)), Orientation::Clockwise);
        assert_eq!(orientation_index(a, b, p(2.0, 0.0)), Orientation::Collinear);
    }

    #[test]
    fn test_orientation_tiny_offset() {
        // Far below any tolerance-based test, still resolved exactly.
        let a = p(0.0, 0.0);
        let b = p(1.0, 0.0);
        assert_eq!(orientation_index(a, b, p(0.5, 1e-300)), Orientation::CounterClockwise);
    }

    #[test]
    fn test_orientation_near_collinear_large_coords() {
        let a = p(1e15, 1e15);
        let b = p(1e15 + 2.0, 1e15 + 2.0);
        let c = p(1e15 + 1.0, 1e15 + 1.0);
        assert_eq!(orientation_index(a, b, c), Orientation::Collinear);
    }

    #[test]
    fn test_orientation_beyond_filter() {
        // The determinant is 3 * 2^-52, below the filter's error bound.
        let e = f64::EPSILON;
        let a = p(0.0, 0.0);
        let b = p(3.0, 3.0);
        assert_eq!(orientation_index(a, b, p(1.0, 1.0 + e)), Orientation::CounterClockwise);
        assert_eq!(orientation_index(b, a, p(1.0, 1.0 + e)), Orientation::Clockwise);
        assert_eq!(orientation_index(a, b, p(1.0, 1.0)), Orientation::Collinear);
    }

    #[test]
    fn test_sign_round_trip() {
        for o in [
            Orientation::CounterClockwise,
            Orientation::Clockwise,
            Orientation::Collinear,
        ] {
            assert_eq!(Orientation::from_sign(o.sign()), o);
        }
        assert_eq!(Orientation::from_sign(7), Orientation::CounterClockwise);
    }

    #[test]
    fn test_ring_is_ccw() {
        let ccw = [p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0), p(0.0, 1.0), p(0.0, 0.0)];
        let cw: Vec<_> = ccw.iter().rev().copied().collect();
        assert!(ring_is_ccw(&ccw));
        assert!(!ring_is_ccw(&cw));
    }

    #[test]
    fn test_ring_is_ccw_repeated_top_vertex() {
        let ring = [
            p(0.0, 0.0),
            p(2.0, 0.0),
            p(1.0, 2.0),
            p(1.0, 2.0),
            p(0.0, 0.0),
        ];
        assert!(ring_is_ccw(&ring));
    }

    #[test]
    fn test_ring_is_ccw_degenerate() {
        assert!(!ring_is_ccw(&[p(0.0, 0.0), p(1.0, 1.0), p(0.0, 0.0)]));
        assert!(!ring_is_ccw(&[]));
    }
}
