//! Robust segment intersection.
//!
//! Classification uses [`orientation_index`], so two segments are reported as
//! crossing exactly when the orientation predicate says they do. Only the
//! coordinates of a proper crossing are computed in floating point, and those
//! are clamped back into the segment envelopes when the computation is
//! ill-conditioned.

use super::predicates::{orientation_index, Orientation};
use crate::bounds::Aabb2;
use crate::precision::PrecisionModel;
use crate::primitives::{Point2, Segment2};

/// Kind of intersection between two segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntersectionKind {
    /// The segments do not meet.
    None,
    /// The segments meet in a single point.
    Point,
    /// The segments overlap along a collinear stretch.
    Collinear,
}

/// Outcome of intersecting two segments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineIntersection {
    kind: IntersectionKind,
    points: [Point2<f64>; 2],
    proper: bool,
    inputs: [Segment2<f64>; 2],
}

impl LineIntersection {
    fn none(inputs: [Segment2<f64>; 2]) -> Self {
        Self {
            kind: IntersectionKind::None,
            points: [Point2::origin(); 2],
            proper: false,
            inputs,
        }
    }

    /// The kind of intersection found.
    #[inline]
    pub fn kind(&self) -> IntersectionKind {
        self.kind
    }

    /// Returns `true` if the segments meet at all.
    #[inline]
    pub fn has_intersection(&self) -> bool {
        self.kind != IntersectionKind::None
    }

    /// Number of intersection points (0, 1 or 2).
    #[inline]
    pub fn count(&self) -> usize {
        match self.kind {
            IntersectionKind::None => 0,
            IntersectionKind::Point => 1,
            IntersectionKind::Collinear => 2,
        }
    }

    /// The `i`-th intersection point.
    #[inline]
    pub fn point(&self, i: usize) -> Point2<f64> {
        self.points[i]
    }

    /// Returns `true` if the segments cross at a point interior to both.
    #[inline]
    pub fn is_proper(&self) -> bool {
        self.proper
    }

    /// Returns `true` if some intersection point is not an endpoint of either
    /// segment.
    pub fn is_interior(&self) -> bool {
        self.is_interior_of(0) || self.is_interior_of(1)
    }

    /// Returns `true` if some intersection point is not an endpoint of input
    /// segment `index`.
    pub fn is_interior_of(&self, index: usize) -> bool {
        let seg = self.inputs[index];
        self.points[..self.count()]
            .iter()
            .any(|&p| p != seg.start && p != seg.end)
    }

    /// Returns `true` if `p` is one of the intersection points.
    pub fn is_intersection(&self, p: Point2<f64>) -> bool {
        self.points[..self.count()].iter().any(|&q| q == p)
    }
}

/// Intersects pairs of segments, rounding computed crossings to a precision
/// model.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineIntersector {
    precision: PrecisionModel,
}

impl LineIntersector {
    /// Creates an intersector that rounds computed points to `precision`.
    #[inline]
    pub fn new(precision: PrecisionModel) -> Self {
        Self { precision }
    }

    /// Tests whether `p` lies on the segment `p1 -> p2`.
    pub fn point_on_segment(p: Point2<f64>, p1: Point2<f64>, p2: Point2<f64>) -> bool {
        Aabb2::from_corners(p1, p2).contains_point(p)
            && orientation_index(p1, p2, p) == Orientation::Collinear
    }

    /// Intersects segment `p1 -> p2` with segment `q1 -> q2`.
    pub fn intersect(
        &self,
        p1: Point2<f64>,
        p2: Point2<f64>,
        q1: Point2<f64>,
        q2: Point2<f64>,
    ) -> LineIntersection {
        let inputs = [Segment2::new(p1, p2), Segment2::new(q1, q2)];
        let env_p = Aabb2::from_corners(p1, p2);
        let env_q = Aabb2::from_corners(q1, q2);
        if !env_p.intersects(env_q) {
            return LineIntersection::none(inputs);
        }

        let pq1 = orientation_index(p1, p2, q1).sign();
        let pq2 = orientation_index(p1, p2, q2).sign();
        if (pq1 > 0 && pq2 > 0) || (pq1 < 0 && pq2 < 0) {
            return LineIntersection::none(inputs);
        }

        let qp1 = orientation_index(q1, q2, p1).sign();
        let qp2 = orientation_index(q1, q2, p2).sign();
        if (qp1 > 0 && qp2 > 0) || (qp1 < 0 && qp2 < 0) {
            return LineIntersection::none(inputs);
        }

        if pq1 == 0 && pq2 == 0 && qp1 == 0 && qp2 == 0 {
            return collinear_intersection(inputs, env_p, env_q);
        }

        let mut result = LineIntersection {
            kind: IntersectionKind::Point,
            points: [Point2::origin(); 2],
            proper: false,
            inputs,
        };

        if pq1 == 0 || pq2 == 0 || qp1 == 0 || qp2 == 0 {
            // An endpoint touches the other segment; prefer exactly shared
            // endpoints so the result is symmetric.
            result.points[0] = if p1 == q1 || p1 == q2 {
                p1
            } else if p2 == q1 || p2 == q2 {
                p2
            } else if pq1 == 0 {
                q1
            } else if pq2 == 0 {
                q2
            } else if qp1 == 0 {
                p1
            } else {
                p2
            };
        } else {
            result.proper = true;
            result.points[0] = self.proper_intersection(p1, p2, q1, q2, env_p, env_q);
        }
        result
    }

    fn proper_intersection(
        &self,
        p1: Point2<f64>,
        p2: Point2<f64>,
        q1: Point2<f64>,
        q2: Point2<f64>,
        env_p: Aabb2<f64>,
        env_q: Aabb2<f64>,
    ) -> Point2<f64> {
        let mut pt = line_intersection(p1, p2, q1, q2, env_p, env_q)
            .unwrap_or_else(|| nearest_endpoint(p1, p2, q1, q2));
        if !(env_p.contains_point(pt) && env_q.contains_point(pt)) {
            pt = nearest_endpoint(p1, p2, q1, q2);
        }
        self.precision.make_precise(pt)
    }
}

fn collinear_intersection(
    inputs: [Segment2<f64>; 2],
    env_p: Aabb2<f64>,
    env_q: Aabb2<f64>,
) -> LineIntersection {
    let [Segment2 { start: p1, end: p2 }, Segment2 { start: q1, end: q2 }] = inputs;
    let q1_in_p = env_p.contains_point(q1);
    let q2_in_p = env_p.contains_point(q2);
    let p1_in_q = env_q.contains_point(p1);
    let p2_in_q = env_q.contains_point(p2);

    let (a, b, single) = if q1_in_p && q2_in_p {
        (q1, q2, false)
    } else if p1_in_q && p2_in_q {
        (p1, p2, false)
    } else if q1_in_p && p1_in_q {
        (q1, p1, q1 == p1 && !q2_in_p && !p2_in_q)
    } else if q1_in_p && p2_in_q {
        (q1, p2, q1 == p2 && !q2_in_p && !p1_in_q)
    } else if q2_in_p && p1_in_q {
        (q2, p1, q2 == p1 && !q1_in_p && !p2_in_q)
    } else if q2_in_p && p2_in_q {
        (q2, p2, q2 == p2 && !q1_in_p && !p1_in_q)
    } else {
        return LineIntersection::none(inputs);
    };

    LineIntersection {
        kind: if single {
            IntersectionKind::Point
        } else {
            IntersectionKind::Collinear
        },
        points: [a, b],
        proper: false,
        inputs,
    }
}

/// Intersection point of the infinite lines through `p1 p2` and `q1 q2`, or
/// `None` if they are parallel.
pub fn lines_intersection(
    p1: Point2<f64>,
    p2: Point2<f64>,
    q1: Point2<f64>,
    q2: Point2<f64>,
) -> Option<Point2<f64>> {
    line_intersection(
        p1,
        p2,
        q1,
        q2,
        Aabb2::from_corners(p1, p2),
        Aabb2::from_corners(q1, q2),
    )
}

/// Homogeneous line intersection, translated to the centre of the envelope
/// overlap to reduce cancellation. Returns `None` for parallel lines.
fn line_intersection(
    p1: Point2<f64>,
    p2: Point2<f64>,
    q1: Point2<f64>,
    q2: Point2<f64>,
    env_p: Aabb2<f64>,
    env_q: Aabb2<f64>,
) -> Option<Point2<f64>> {
    let int_min_x = env_p.min.x.max(env_q.min.x);
    let int_max_x = env_p.max.x.min(env_q.max.x);
    let int_min_y = env_p.min.y.max(env_q.min.y);
    let int_max_y = env_p.max.y.min(env_q.max.y);

    let mid_x = (int_min_x + int_max_x) / 2.0;
    let mid_y = (int_min_y + int_max_y) / 2.0;

    let p1x = p1.x - mid_x;
    let p1y = p1.y - mid_y;
    let p2x = p2.x - mid_x;
    let p2y = p2.y - mid_y;
    let q1x = q1.x - mid_x;
    let q1y = q1.y - mid_y;
    let q2x = q2.x - mid_x;
    let q2y = q2.y - mid_y;

    let px = p1y - p2y;
    let py = p2x - p1x;
    let pw = p1x * p2y - p2x * p1y;

    let qx = q1y - q2y;
    let qy = q2x - q1x;
    let qw = q1x * q2y - q2x * q1y;

    let x = py * qw - qy * pw;
    let y = qx * pw - px * qw;
    let w = px * qy - qx * py;

    let x_int = x / w;
    let y_int = y / w;
    if !x_int.is_finite() || !y_int.is_finite() {
        return None;
    }
    Some(Point2::new(x_int + mid_x, y_int + mid_y))
}

/// The input endpoint closest to the other segment.
fn nearest_endpoint(
    p1: Point2<f64>,
    p2: Point2<f64>,
    q1: Point2<f64>,
    q2: Point2<f64>,
) -> Point2<f64> {
    let seg_p = Segment2::new(p1, p2);
    let seg_q = Segment2::new(q1, q2);
    let candidates = [
        (p1, seg_q.distance_to_point(p1)),
        (p2, seg_q.distance_to_point(p2)),
        (q1, seg_p.distance_to_point(q1)),
        (q2, seg_p.distance_to_point(q2)),
    ];
    let mut best = candidates[0];
    for c in &candidates[1..] {
        if c.1 < best.1 {
            best = *c;
        }
    }
    best.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64) -> Point2<f64> {
        Point2::new(x, y)
    }

    #[test]
    fn test_proper_crossing() {
        let li = LineIntersector::default();
        let r = li.intersect(p(0.0, 0.0), p(10.0, 10.0), p(0.0, 10.0), p(10.0, 0.0));
        assert_eq!(r.kind(), IntersectionKind::Point);
        assert!(r.is_proper());
        assert!(r.is_interior());
        assert_relative_eq!(r.point(0).x, 5.0, epsilon = 1e-12);
        assert_relative_eq!(r.point(0).y, 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_proper_crossing_is_rounded() {
        let li = LineIntersector::new(PrecisionModel::fixed(1.0));
        let r = li.intersect(p(0.0, 0.0), p(3.0, 1.0), p(0.0, 1.0), p(3.0, 0.0));
        assert!(r.is_proper());
        assert_eq!(r.point(0), p(2.0, 1.0));
    }

    #[test]
    fn test_disjoint() {
        let li = LineIntersector::default();
        let r = li.intersect(p(0.0, 0.0), p(1.0, 0.0), p(0.0, 1.0), p(1.0, 1.0));
        assert!(!r.has_intersection());
        assert_eq!(r.count(), 0);
    }

    #[test]
    fn test_shared_endpoint() {
        let li = LineIntersector::default();
        let r = li.intersect(p(0.0, 0.0), p(5.0, 5.0), p(5.0, 5.0), p(10.0, 0.0));
        assert_eq!(r.kind(), IntersectionKind::Point);
        assert!(!r.is_proper());
        assert!(!r.is_interior());
        assert_eq!(r.point(0), p(5.0, 5.0));
    }

    #[test]
    fn test_t_junction() {
        let li = LineIntersector::default();
        let r = li.intersect(p(0.0, 0.0), p(10.0, 0.0), p(5.0, 0.0), p(5.0, 5.0));
        assert_eq!(r.point(0), p(5.0, 0.0));
        assert!(!r.is_proper());
        assert!(r.is_interior_of(0));
        assert!(!r.is_interior_of(1));
    }

    #[test]
    fn test_collinear_overlap() {
        let li = LineIntersector::default();
        let r = li.intersect(p(0.0, 0.0), p(10.0, 0.0), p(5.0, 0.0), p(15.0, 0.0));
        assert_eq!(r.kind(), IntersectionKind::Collinear);
        assert_eq!(r.count(), 2);
        assert!(r.is_intersection(p(5.0, 0.0)));
        assert!(r.is_intersection(p(10.0, 0.0)));
    }

    #[test]
    fn test_collinear_touching_end_to_end() {
        let li = LineIntersector::default();
        let r = li.intersect(p(0.0, 0.0), p(5.0, 0.0), p(5.0, 0.0), p(10.0, 0.0));
        assert_eq!(r.kind(), IntersectionKind::Point);
        assert_eq!(r.point(0), p(5.0, 0.0));
    }

    #[test]
    fn test_point_on_segment() {
        assert!(LineIntersector::point_on_segment(
            p(2.0, 2.0),
            p(0.0, 0.0),
            p(4.0, 4.0)
        ));
        assert!(!LineIntersector::point_on_segment(
            p(5.0, 5.0),
            p(0.0, 0.0),
            p(4.0, 4.0)
        ));
    }

    #[test]
    fn test_lines_intersection_beyond_segments() {
        let x = lines_intersection(p(0.0, 0.0), p(1.0, 0.0), p(3.0, 1.0), p(3.0, 2.0)).unwrap();
        assert_relative_eq!(x.x, 3.0, epsilon = 1e-12);
        assert_relative_eq!(x.y, 0.0, epsilon = 1e-12);
        assert!(lines_intersection(p(0.0, 0.0), p(1.0, 0.0), p(0.0, 1.0), p(1.0, 1.0)).is_none());
    }
}
