//! Ring measures and point-in-ring location.

use crate::graph::Location;
use crate::primitives::Point2;
use crate::tolerance::orientation_index;
use num_traits::Float;

/// Computes the signed area of a ring using the shoelace formula.
///
/// Positive for CCW winding, negative for CW winding. The ring may be given
/// open or closed (repeating the first point at the end). Coordinates are
/// taken relative to the first vertex so that rings far from the origin keep
/// their precision.
pub fn ring_signed_area<F: Float>(vertices: &[Point2<F>]) -> F {
    if vertices.len() < 3 {
        return F::zero();
    }

    let origin = vertices[0];
    let mut area = F::zero();
    let n = vertices.len();

    for i in 0..n {
        let j = (i + 1) % n;
        let (xi, yi) = (vertices[i].x - origin.x, vertices[i].y - origin.y);
        let (xj, yj) = (vertices[j].x - origin.x, vertices[j].y - origin.y);
        area = area + xi * yj - xj * yi;
    }

    area / (F::one() + F::one())
}

/// Counts crossings of a rightward ray from `p` with the segments of a ring.
#[derive(Debug, Clone, Copy)]
struct RayCrossingCounter {
    p: Point2<f64>,
    crossings: usize,
    on_segment: bool,
}

impl RayCrossingCounter {
    fn new(p: Point2<f64>) -> Self {
        Self {
            p,
            crossings: 0,
            on_segment: false,
        }
    }

    fn count_segment(&mut self, p1: Point2<f64>, p2: Point2<f64>) {
        let p = self.p;
        if p1.x < p.x && p2.x < p.x {
            return;
        }
        if p == p2 {
            self.on_segment = true;
            return;
        }
        if p1.y == p.y && p2.y == p.y {
            let min_x = p1.x.min(p2.x);
            let max_x = p1.x.max(p2.x);
            if p.x >= min_x && p.x <= max_x {
                self.on_segment = true;
            }
            return;
        }
        // Half-open rule: a segment counts if it straddles the ray with one
        // endpoint strictly above it.
        if (p1.y > p.y && p2.y <= p.y) || (p2.y > p.y && p1.y <= p.y) {
            let mut orient = orientation_index(p1, p2, p).sign();
            if orient == 0 {
                self.on_segment = true;
                return;
            }
            if p2.y < p1.y {
                orient = -orient;
            }
            if orient > 0 {
                self.crossings += 1;
            }
        }
    }

    fn location(&self) -> Location {
        if self.on_segment {
            Location::Boundary
        } else if self.crossings % 2 == 1 {
            Location::Interior
        } else {
            Location::Exterior
        }
    }
}

/// Locates a point relative to a closed ring.
pub fn locate_in_ring(p: Point2<f64>, ring: &[Point2<f64>]) -> Location {
    let mut counter = RayCrossingCounter::new(p);
    for w in ring.windows(2) {
        counter.count_segment(w[1], w[0]);
        if counter.on_segment {
            break;
        }
    }
    counter.location()
}

/// Tests whether a point lies inside or on a closed ring.
#[inline]
pub fn point_in_ring(p: Point2<f64>, ring: &[Point2<f64>]) -> bool {
    locate_in_ring(p, ring) != Location::Exterior
}

/// Returns the first point of `test` that does not occur in `pts`.
pub fn point_not_in_list(test: &[Point2<f64>], pts: &[Point2<f64>]) -> Option<Point2<f64>> {
    test.iter().copied().find(|t| !pts.contains(t))
}
