//! Vertex accumulation for a single offset curve.

use crate::precision::PrecisionModel;
use crate::primitives::Point2;

/// Collects the vertices of one offset curve.
///
/// Every point is rounded to the precision model, and a point closer than
/// the minimum vertex distance to the previous one is dropped, so the curve
/// never contains near-duplicate consecutive vertices.
#[derive(Debug, Clone)]
pub struct CurveAccumulator {
    pts: Vec<Point2<f64>>,
    precision: PrecisionModel,
    min_vertex_distance: f64,
}

impl CurveAccumulator {
    pub fn new(precision: PrecisionModel, min_vertex_distance: f64) -> Self {
        Self {
            pts: Vec::new(),
            precision,
            min_vertex_distance,
        }
    }

    /// Appends `pt` unless it is redundant with the last point.
    pub fn add_pt(&mut self, pt: Point2<f64>) {
        let pt = self.precision.make_precise(pt);
        if self.is_redundant(pt) {
            return;
        }
        self.pts.push(pt);
    }

    /// Appends a sequence of points, forwards or backwards.
    pub fn add_pts(&mut self, pts: &[Point2<f64>], forward: bool) {
        if forward {
            for &p in pts {
                self.add_pt(p);
            }
        } else {
            for &p in pts.iter().rev() {
                self.add_pt(p);
            }
        }
    }

    fn is_redundant(&self, pt: Point2<f64>) -> bool {
        match self.pts.last() {
            Some(&last) => pt.distance(last) < self.min_vertex_distance,
            None => false,
        }
    }

    /// Closes the curve by repeating the first point, if needed.
    pub fn close_ring(&mut self) {
        if let (Some(&first), Some(&last)) = (self.pts.first(), self.pts.last()) {
            if first != last {
                self.pts.push(first);
            }
        }
    }

    #[inline]
    pub fn coords(&self) -> &[Point2<f64>] {
        &self.pts
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pts.is_empty()
    }

    pub fn into_coords(self) -> Vec<Point2<f64>> {
        self.pts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skips_near_duplicates() {
        let mut acc = CurveAccumulator::new(PrecisionModel::Floating, 1e-6);
        acc.add_pt(Point2::new(0.0, 0.0));
        acc.add_pt(Point2::new(1e-7, 0.0));
        acc.add_pt(Point2::new(1.0, 0.0));
        assert_eq!(acc.coords(), &[Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)]);
    }

    #[test]
    fn test_points_are_made_precise() {
        let mut acc = CurveAccumulator::new(PrecisionModel::fixed(10.0), 0.0);
        acc.add_pt(Point2::new(0.123, 0.987));
        assert_eq!(acc.coords(), &[Point2::new(0.1, 1.0)]);
    }

    #[test]
    fn test_add_pts_reversed() {
        let mut acc = CurveAccumulator::new(PrecisionModel::Floating, 0.0);
        acc.add_pts(&[Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)], false);
        assert_eq!(acc.coords(), &[Point2::new(1.0, 0.0), Point2::new(0.0, 0.0)]);
    }

    #[test]
    fn test_close_ring() {
        let mut acc = CurveAccumulator::new(PrecisionModel::Floating, 0.0);
        acc.close_ring();
        assert!(acc.is_empty());

        acc.add_pt(Point2::new(0.0, 0.0));
        acc.add_pt(Point2::new(1.0, 0.0));
        acc.add_pt(Point2::new(0.0, 1.0));
        acc.close_ring();
        acc.close_ring();
        assert_eq!(acc.len(), 4);
        assert_eq!(acc.coords()[3], Point2::new(0.0, 0.0));
    }
}
