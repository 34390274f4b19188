//! Offset segment generation.
//!
//! Walks an input line one vertex at a time, emitting the offset segments on
//! one side together with the joins between them into a
//! [`CurveAccumulator`]. Also produces end caps and the standalone point
//! shapes (circle and square).

use super::accumulator::CurveAccumulator;
use super::parameters::{BufferParameters, EndCapStyle, JoinStyle};
use crate::graph::Position;
use crate::precision::PrecisionModel;
use crate::primitives::{Point2, Segment2, Vec2};
use crate::tolerance::{lines_intersection, orientation_index, LineIntersector, Orientation};
use std::f64::consts::{FRAC_PI_2, PI};

/// Offset segment ends closer than this fraction of the distance are treated
/// as one vertex at outside turns.
const OFFSET_SEGMENT_SEPARATION_FACTOR: f64 = 1.0e-3;

/// As above, for inside turns whose offset segments do not intersect.
const INSIDE_TURN_VERTEX_SNAP_DISTANCE_FACTOR: f64 = 1.0e-3;

/// Minimum vertex spacing of generated curves, as a fraction of the distance.
const CURVE_VERTEX_SNAP_DISTANCE_FACTOR: f64 = 1.0e-6;

/// Closing segments at inside turns stop this many times closer to the
/// offset than to the input vertex.
const MAX_CLOSING_SEG_LEN_FACTOR: f64 = 80.0;

/// Generates the offset curve for one side of a line, or a point shape.
#[derive(Debug)]
pub struct OffsetSegmentGenerator {
    params: BufferParameters,
    distance: f64,
    fillet_angle_quantum: f64,
    closing_seg_length_factor: f64,
    li: LineIntersector,
    acc: CurveAccumulator,
    side: Position,
    s0: Point2<f64>,
    s1: Point2<f64>,
    s2: Point2<f64>,
    seg0: Segment2<f64>,
    seg1: Segment2<f64>,
    offset0: Segment2<f64>,
    offset1: Segment2<f64>,
}

impl OffsetSegmentGenerator {
    /// Creates a generator for a non-negative `distance`.
    pub fn new(precision: PrecisionModel, params: &BufferParameters, distance: f64) -> Self {
        let quadrant_segments = params.effective_quadrant_segments();
        let closing_seg_length_factor =
            if quadrant_segments >= 8 && params.join_style == JoinStyle::Round {
                MAX_CLOSING_SEG_LEN_FACTOR
            } else {
                1.0
            };
        let origin = Point2::origin();
        let degenerate = Segment2::new(origin, origin);
        Self {
            params: *params,
            distance,
            fillet_angle_quantum: FRAC_PI_2 / f64::from(quadrant_segments),
            closing_seg_length_factor,
            li: LineIntersector::default(),
            acc: CurveAccumulator::new(precision, distance * CURVE_VERTEX_SNAP_DISTANCE_FACTOR),
            side: Position::Left,
            s0: origin,
            s1: origin,
            s2: origin,
            seg0: degenerate,
            seg1: degenerate,
            offset0: degenerate,
            offset1: degenerate,
        }
    }

    /// Starts a side with the input segment `s1 s2`.
    pub fn init_side_segments(&mut self, s1: Point2<f64>, s2: Point2<f64>, side: Position) {
        self.s1 = s1;
        self.s2 = s2;
        self.side = side;
        self.seg1 = Segment2::new(s1, s2);
        self.offset1 = self.offset_segment(self.seg1, side);
    }

    /// Emits the start of the current offset segment.
    pub fn add_first_segment(&mut self) {
        self.acc.add_pt(self.offset1.start);
    }

    /// Emits the end of the current offset segment.
    pub fn add_last_segment(&mut self) {
        self.acc.add_pt(self.offset1.end);
    }

    pub fn close_ring(&mut self) {
        self.acc.close_ring();
    }

    pub fn into_coords(self) -> Vec<Point2<f64>> {
        self.acc.into_coords()
    }

    /// Advances to the next input vertex `p`, emitting the join at the
    /// previous vertex.
    pub fn add_next_segment(&mut self, p: Point2<f64>, add_start_point: bool) {
        self.s0 = self.s1;
        self.s1 = self.s2;
        self.s2 = p;
        self.seg0 = Segment2::new(self.s0, self.s1);
        self.offset0 = self.offset_segment(self.seg0, self.side);
        self.seg1 = Segment2::new(self.s1, self.s2);
        self.offset1 = self.offset_segment(self.seg1, self.side);

        if self.s1 == self.s2 {
            return;
        }
        let orientation = orientation_index(self.s0, self.s1, self.s2);
        let outside_turn = (orientation == Orientation::Clockwise && self.side == Position::Left)
            || (orientation == Orientation::CounterClockwise && self.side == Position::Right);

        if orientation == Orientation::Collinear {
            self.add_collinear(add_start_point);
        } else if outside_turn {
            self.add_outside_turn(orientation, add_start_point);
        } else {
            self.add_inside_turn();
        }
    }

    fn add_collinear(&mut self, add_start_point: bool) {
        // Two intersection points means the line doubles back on itself.
        let result = self.li.intersect(self.s0, self.s1, self.s1, self.s2);
        if result.count() < 2 {
            return;
        }
        match self.params.join_style {
            JoinStyle::Bevel | JoinStyle::Mitre => {
                if add_start_point {
                    self.acc.add_pt(self.offset0.end);
                }
                self.acc.add_pt(self.offset1.start);
            }
            JoinStyle::Round => {
                self.add_corner_fillet(
                    self.s1,
                    self.offset0.end,
                    self.offset1.start,
                    Orientation::Clockwise,
                    self.distance,
                );
            }
        }
    }

    fn add_outside_turn(&mut self, orientation: Orientation, add_start_point: bool) {
        if self.offset0.end.distance(self.offset1.start)
            < self.distance * OFFSET_SEGMENT_SEPARATION_FACTOR
        {
            self.acc.add_pt(self.offset0.end);
            return;
        }
        match self.params.join_style {
            JoinStyle::Mitre => self.add_mitre_join(self.s1, self.offset0, self.offset1),
            JoinStyle::Bevel => self.add_bevel_join(self.offset0, self.offset1),
            JoinStyle::Round => {
                if add_start_point {
                    self.acc.add_pt(self.offset0.end);
                }
                self.add_corner_fillet(
                    self.s1,
                    self.offset0.end,
                    self.offset1.start,
                    orientation,
                    self.distance,
                );
                self.acc.add_pt(self.offset1.start);
            }
        }
    }

    fn add_inside_turn(&mut self) {
        let (o0, o1) = (self.offset0, self.offset1);
        let result = self.li.intersect(o0.start, o0.end, o1.start, o1.end);
        if result.has_intersection() {
            self.acc.add_pt(result.point(0));
            return;
        }
        // The offset segments miss each other on a narrow concave angle.
        if o0.end.distance(o1.start) < self.distance * INSIDE_TURN_VERTEX_SNAP_DISTANCE_FACTOR {
            self.acc.add_pt(o0.end);
            return;
        }
        self.acc.add_pt(o0.end);
        let f = self.closing_seg_length_factor;
        let s1 = self.s1;
        let toward_corner = |p: Point2<f64>| {
            Point2::new((f * p.x + s1.x) / (f + 1.0), (f * p.y + s1.y) / (f + 1.0))
        };
        self.acc.add_pt(toward_corner(o0.end));
        self.acc.add_pt(toward_corner(o1.start));
        self.acc.add_pt(o1.start);
    }

    /// Offsets `seg` by the generator distance to the given side.
    fn offset_segment(&self, seg: Segment2<f64>, side: Position) -> Segment2<f64> {
        offset_segment(seg, side, self.distance)
    }

    /// Emits the end cap of a line that arrives at `p1` from `p0`.
    pub fn add_line_end_cap(&mut self, p0: Point2<f64>, p1: Point2<f64>) {
        let seg = Segment2::new(p0, p1);
        let offset_left = self.offset_segment(seg, Position::Left);
        let offset_right = self.offset_segment(seg, Position::Right);
        let angle = seg.direction().angle();

        match self.params.end_cap_style {
            EndCapStyle::Round => {
                self.acc.add_pt(offset_left.end);
                self.add_directed_fillet(
                    p1,
                    angle + FRAC_PI_2,
                    angle - FRAC_PI_2,
                    Orientation::Clockwise,
                    self.distance,
                );
                self.acc.add_pt(offset_right.end);
            }
            EndCapStyle::Flat => {
                self.acc.add_pt(offset_left.end);
                self.acc.add_pt(offset_right.end);
            }
            EndCapStyle::Square => {
                let extension = Vec2::from_polar(self.distance.abs(), angle);
                self.acc.add_pt(offset_left.end + extension);
                self.acc.add_pt(offset_right.end + extension);
            }
        }
    }

    fn add_mitre_join(
        &mut self,
        corner: Point2<f64>,
        offset0: Segment2<f64>,
        offset1: Segment2<f64>,
    ) {
        let mitre_limit_distance = self.params.mitre_limit * self.distance;
        let int_pt = lines_intersection(offset0.start, offset0.end, offset1.start, offset1.end);
        if let Some(p) = int_pt {
            if p.distance(corner) <= mitre_limit_distance {
                self.acc.add_pt(p);
                return;
            }
        }
        let bevel_distance = Segment2::new(offset0.end, offset1.start).distance_to_point(corner);
        if bevel_distance >= mitre_limit_distance {
            self.add_bevel_join(offset0, offset1);
            return;
        }
        self.add_limited_mitre_join(offset0, offset1, mitre_limit_distance);
    }

    /// Cuts the mitre off perpendicular to the corner bisector, at the mitre
    /// limit distance from the corner.
    fn add_limited_mitre_join(
        &mut self,
        offset0: Segment2<f64>,
        offset1: Segment2<f64>,
        mitre_limit_distance: f64,
    ) {
        let corner = self.seg0.end;
        let interior = angle_between_oriented(self.seg0.start, corner, self.seg1.end);
        let dir0 = angle(corner, self.seg0.start);
        let bisector = normalize_angle(dir0 + interior / 2.0);
        let bevel_mid = project(corner, -mitre_limit_distance, bisector);

        let bevel_dir = normalize_angle(bisector + FRAC_PI_2);
        let bevel0 = project(bevel_mid, self.distance, bevel_dir);
        let bevel1 = project(bevel_mid, self.distance, bevel_dir + PI);

        let int0 = lines_intersection(bevel0, bevel1, offset0.start, offset0.end);
        let int1 = lines_intersection(bevel0, bevel1, offset1.start, offset1.end);
        match (int0, int1) {
            (Some(a), Some(b)) => {
                self.acc.add_pt(a);
                self.acc.add_pt(b);
            }
            _ => self.add_bevel_join(offset0, offset1),
        }
    }

    fn add_bevel_join(&mut self, offset0: Segment2<f64>, offset1: Segment2<f64>) {
        self.acc.add_pt(offset0.end);
        self.acc.add_pt(offset1.start);
    }

    /// Adds a fillet from `p0` to `p1` around `p`, including both ends.
    fn add_corner_fillet(
        &mut self,
        p: Point2<f64>,
        p0: Point2<f64>,
        p1: Point2<f64>,
        direction: Orientation,
        radius: f64,
    ) {
        let mut start_angle = angle(p, p0);
        let end_angle = angle(p, p1);
        if direction == Orientation::Clockwise {
            if start_angle <= end_angle {
                start_angle += 2.0 * PI;
            }
        } else if start_angle >= end_angle {
            start_angle -= 2.0 * PI;
        }
        self.acc.add_pt(p0);
        self.add_directed_fillet(p, start_angle, end_angle, direction, radius);
        self.acc.add_pt(p1);
    }

    /// Adds the arc around `p` from `start_angle` towards `end_angle`,
    /// excluding the end point.
    fn add_directed_fillet(
        &mut self,
        p: Point2<f64>,
        start_angle: f64,
        end_angle: f64,
        direction: Orientation,
        radius: f64,
    ) {
        let direction_factor = if direction == Orientation::Clockwise {
            -1.0
        } else {
            1.0
        };
        let total_angle = (start_angle - end_angle).abs();
        let n_segs = (total_angle / self.fillet_angle_quantum + 0.5) as i64;
        if n_segs < 1 {
            return;
        }
        let angle_inc = total_angle / n_segs as f64;
        for i in 0..n_segs {
            let a = start_angle + direction_factor * i as f64 * angle_inc;
            self.acc.add_pt(p + Vec2::from_polar(radius, a));
        }
    }

    /// Emits a clockwise circle of the generator distance around `p`.
    pub fn create_circle(&mut self, p: Point2<f64>) {
        self.acc.add_pt(Point2::new(p.x + self.distance, p.y));
        self.add_directed_fillet(p, 0.0, 2.0 * PI, Orientation::Clockwise, self.distance);
        self.acc.close_ring();
    }

    /// Emits a clockwise square of half-width equal to the distance around `p`.
    pub fn create_square(&mut self, p: Point2<f64>) {
        let d = self.distance;
        self.acc.add_pt(Point2::new(p.x + d, p.y + d));
        self.acc.add_pt(Point2::new(p.x + d, p.y - d));
        self.acc.add_pt(Point2::new(p.x - d, p.y - d));
        self.acc.add_pt(Point2::new(p.x - d, p.y + d));
        self.acc.close_ring();
    }
}

/// Offsets a segment perpendicularly by `distance` to `side`.
pub(crate) fn offset_segment(seg: Segment2<f64>, side: Position, distance: f64) -> Segment2<f64> {
    let side_sign = if side == Position::Left { 1.0 } else { -1.0 };
    let dir = seg.direction();
    let shift = dir.left_normal() * (side_sign * distance / dir.magnitude());
    Segment2::new(seg.start + shift, seg.end + shift)
}

/// Angle of the vector from `p0` to `p1`.
#[inline]
fn angle(p0: Point2<f64>, p1: Point2<f64>) -> f64 {
    (p1 - p0).angle()
}

/// Signed angle from `tail -> tip1` to `tail -> tip2`, in (-pi, pi].
fn angle_between_oriented(tip1: Point2<f64>, tail: Point2<f64>, tip2: Point2<f64>) -> f64 {
    let delta = angle(tail, tip2) - angle(tail, tip1);
    if delta <= -PI {
        delta + 2.0 * PI
    } else if delta > PI {
        delta - 2.0 * PI
    } else {
        delta
    }
}

/// Normalizes an angle to (-pi, pi].
fn normalize_angle(mut a: f64) -> f64 {
    while a > PI {
        a -= 2.0 * PI;
    }
    while a <= -PI {
        a += 2.0 * PI;
    }
    a
}

#[inline]
fn project(p: Point2<f64>, d: f64, dir: f64) -> Point2<f64> {
    p + Vec2::from_polar(d, dir)
}
