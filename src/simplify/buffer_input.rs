//! Buffer input simplification.
//!
//! Offsetting a line only ever moves it outward on one side, so small
//! concavities on that side are filled by the buffer anyway. Removing them up
//! front cuts the number of offset segments (and therefore noding work)
//! without visibly changing the result.
//!
//! A vertex is removed when it forms a concave turn on the buffered side and
//! lies within the tolerance of the segment joining its retained neighbours.
//! Convex vertices are never removed, so the buffer never shrinks.

use crate::primitives::{Point2, Segment2};
use crate::tolerance::{orientation_index, Orientation};

/// How many input vertices of a candidate span are checked for shallowness.
const SAMPLES_PER_SPAN: usize = 10;

/// Simplifies a buffer input line for offsetting on one side.
///
/// A positive `distance_tol` simplifies for the left side (concavities are
/// counter-clockwise turns), a negative one for the right side. The first and
/// last points are always kept.
///
/// # Example
///
/// ```
/// use bufferum::{simplify::simplify_buffer_input, Point2};
///
/// let line = vec![
///     Point2::new(0.0, 0.0),
///     Point2::new(1.0, -0.01),
///     Point2::new(2.0, 0.0),
/// ];
///
/// // The dip is concave for the left side and is removed.
/// assert_eq!(simplify_buffer_input(&line, 0.1).len(), 2);
/// // It is convex for the right side and is kept.
/// assert_eq!(simplify_buffer_input(&line, -0.1).len(), 3);
/// ```
pub fn simplify_buffer_input(points: &[Point2<f64>], distance_tol: f64) -> Vec<Point2<f64>> {
    let mut simplifier = Simplifier {
        points,
        tolerance: distance_tol.abs(),
        concave: if distance_tol < 0.0 {
            Orientation::Clockwise
        } else {
            Orientation::CounterClockwise
        },
        deleted: vec![false; points.len()],
    };
    while simplifier.delete_shallow_concavities() {}
    simplifier.collapse()
}

struct Simplifier<'a> {
    points: &'a [Point2<f64>],
    tolerance: f64,
    concave: Orientation,
    deleted: Vec<bool>,
}

impl Simplifier<'_> {
    /// One pass over the retained vertices. Returns `true` if any vertex was
    /// deleted.
    fn delete_shallow_concavities(&mut self) -> bool {
        let mut index = 0;
        let mut mid = self.next_retained(index);
        let mut last = self.next_retained(mid);
        let mut changed = false;

        while last < self.points.len() {
            let mut mid_deleted = false;
            if self.is_deletable(index, mid, last) {
                self.deleted[mid] = true;
                mid_deleted = true;
                changed = true;
            }
            index = if mid_deleted { last } else { mid };
            mid = self.next_retained(index);
            last = self.next_retained(mid);
        }
        changed
    }

    fn next_retained(&self, index: usize) -> usize {
        let mut next = index + 1;
        while next < self.points.len() && self.deleted[next] {
            next += 1;
        }
        next
    }

    fn is_deletable(&self, i0: usize, i1: usize, i2: usize) -> bool {
        let (p0, p1, p2) = (self.points[i0], self.points[i1], self.points[i2]);
        if orientation_index(p0, p1, p2) != self.concave {
            return false;
        }
        if !self.is_shallow(p0, p1, p2) {
            return false;
        }
        self.is_shallow_sampled(p0, p2, i0, i2)
    }

    /// `p` lies within the tolerance of the segment `p0 p2`.
    fn is_shallow(&self, p0: Point2<f64>, p: Point2<f64>, p2: Point2<f64>) -> bool {
        Segment2::new(p0, p2).distance_to_point(p) < self.tolerance
    }

    /// Checks a sample of the original vertices between `i0` and `i2`, so that
    /// repeated passes cannot creep away from the input line.
    fn is_shallow_sampled(&self, p0: Point2<f64>, p2: Point2<f64>, i0: usize, i2: usize) -> bool {
        let step = ((i2 - i0) / SAMPLES_PER_SPAN).max(1);
        (i0..i2)
            .step_by(step)
            .all(|i| self.is_shallow(p0, self.points[i], p2))
    }

    fn collapse(&self) -> Vec<Point2<f64>> {
        self.points
            .iter()
            .zip(&self.deleted)
            .filter(|(_, &deleted)| !deleted)
            .map(|(p, _)| *p)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(coords: &[(f64, f64)]) -> Vec<Point2<f64>> {
        coords.iter().map(|&(x, y)| Point2::new(x, y)).collect()
    }

    #[test]
    fn test_removes_shallow_concavity_on_buffered_side() {
        let line = pts(&[(0.0, 0.0), (1.0, -0.01), (2.0, 0.0), (3.0, -0.02), (4.0, 0.0)]);
        let simplified = simplify_buffer_input(&line, 0.1);
        assert_eq!(simplified, pts(&[(0.0, 0.0), (2.0, 0.0), (4.0, 0.0)]));
    }

    #[test]
    fn test_keeps_convex_vertices() {
        let line = pts(&[(0.0, 0.0), (1.0, -0.01), (2.0, 0.0)]);
        assert_eq!(simplify_buffer_input(&line, -0.1), line);
    }

    #[test]
    fn test_keeps_deep_concavity() {
        let line = pts(&[(0.0, 0.0), (1.0, -1.0), (2.0, 0.0)]);
        assert_eq!(simplify_buffer_input(&line, 0.1), line);
    }

    #[test]
    fn test_endpoints_are_kept() {
        let line = pts(&[(0.0, 0.0), (1.0, 0.0)]);
        assert_eq!(simplify_buffer_input(&line, 1.0), line);
        assert!(simplify_buffer_input(&[], 1.0).is_empty());
    }

    #[test]
    fn test_ring_closing_point_is_kept() {
        let ring = pts(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0), (0.0, 0.0)]);
        let simplified = simplify_buffer_input(&ring, 0.5);
        assert_eq!(simplified.first(), simplified.last());
        assert_eq!(simplified.len(), 5);
    }
}
