//! Raw offset curves for single lines, rings and points.
//!
//! The curves produced here may self-intersect; noding and polygon assembly
//! turn them into a valid buffer.

use super::parameters::{BufferParameters, EndCapStyle};
use super::segment_generator::OffsetSegmentGenerator;
use crate::graph::Position;
use crate::precision::PrecisionModel;
use crate::primitives::Point2;
use crate::simplify::simplify_buffer_input;

/// Builds offset curves with fixed parameters and precision.
#[derive(Debug, Clone, Copy)]
pub struct OffsetCurveBuilder {
    precision: PrecisionModel,
    params: BufferParameters,
}

impl OffsetCurveBuilder {
    pub fn new(precision: PrecisionModel, params: BufferParameters) -> Self {
        Self { precision, params }
    }

    #[inline]
    pub fn parameters(&self) -> &BufferParameters {
        &self.params
    }

    /// Returns `true` if a line buffered by `distance` is empty.
    #[inline]
    pub fn is_line_offset_empty(&self, distance: f64) -> bool {
        distance <= 0.0
    }

    /// The closed curve around a line (or a single point) at `distance`.
    ///
    /// Returns `None` for non-positive distances, for empty input, and for
    /// points with flat end caps.
    pub fn line_curve(&self, pts: &[Point2<f64>], distance: f64) -> Option<Vec<Point2<f64>>> {
        if self.is_line_offset_empty(distance) || pts.is_empty() {
            return None;
        }
        let distance = distance.abs();
        let mut gen = self.segment_generator(distance);
        if pts.len() <= 1 {
            match self.params.end_cap_style {
                EndCapStyle::Round => gen.create_circle(pts[0]),
                EndCapStyle::Square => gen.create_square(pts[0]),
                EndCapStyle::Flat => {}
            }
        } else {
            self.line_buffer_curve(pts, distance, &mut gen);
        }
        non_empty(gen.into_coords())
    }

    /// The offset curve of a closed ring on `side` at `distance`.
    ///
    /// A zero distance returns the ring itself; rings with fewer than three
    /// points are buffered as lines.
    pub fn ring_curve(
        &self,
        pts: &[Point2<f64>],
        side: Position,
        distance: f64,
    ) -> Option<Vec<Point2<f64>>> {
        if distance == 0.0 {
            return non_empty(pts.to_vec());
        }
        if pts.len() <= 2 {
            return self.line_curve(pts, distance);
        }
        let mut gen = self.segment_generator(distance.abs());
        self.ring_buffer_curve(pts, side, distance.abs(), &mut gen);
        non_empty(gen.into_coords())
    }

    fn segment_generator(&self, distance: f64) -> OffsetSegmentGenerator {
        OffsetSegmentGenerator::new(self.precision, &self.params, distance)
    }

    fn simplify_tolerance(&self, distance: f64) -> f64 {
        distance * self.params.simplify_factor
    }

    /// Left side forwards with the far cap, then the right side walked back
    /// as the left side of the reversed line with the near cap.
    fn line_buffer_curve(
        &self,
        pts: &[Point2<f64>],
        distance: f64,
        gen: &mut OffsetSegmentGenerator,
    ) {
        let tol = self.simplify_tolerance(distance);

        let simp1 = simplify_buffer_input(pts, tol);
        let n1 = simp1.len() - 1;
        gen.init_side_segments(simp1[0], simp1[1], Position::Left);
        for &p in &simp1[2..] {
            gen.add_next_segment(p, true);
        }
        gen.add_last_segment();
        gen.add_line_end_cap(simp1[n1 - 1], simp1[n1]);

        let simp2 = simplify_buffer_input(pts, -tol);
        let n2 = simp2.len() - 1;
        gen.init_side_segments(simp2[n2], simp2[n2 - 1], Position::Left);
        for &p in simp2[..n2 - 1].iter().rev() {
            gen.add_next_segment(p, true);
        }
        gen.add_last_segment();
        gen.add_line_end_cap(simp2[1], simp2[0]);

        gen.close_ring();
    }

    fn ring_buffer_curve(
        &self,
        pts: &[Point2<f64>],
        side: Position,
        distance: f64,
        gen: &mut OffsetSegmentGenerator,
    ) {
        let mut tol = self.simplify_tolerance(distance);
        if side == Position::Right {
            tol = -tol;
        }
        let simp = simplify_buffer_input(pts, tol);
        let n = simp.len() - 1;
        gen.init_side_segments(simp[n - 1], simp[0], side);
        for (i, &p) in simp.iter().enumerate().skip(1) {
            gen.add_next_segment(p, i != 1);
        }
        gen.close_ring();
    }
}

fn non_empty(pts: Vec<Point2<f64>>) -> Option<Vec<Point2<f64>>> {
    if pts.is_empty() {
        None
    } else {
        Some(pts)
    }
}
