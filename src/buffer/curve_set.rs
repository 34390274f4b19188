//! Labelled offset curves for every component of a geometry.
//!
//! Each curve is labelled with the locations to its left and right, so that
//! after noding the depth delta of every edge can be derived from its label.

use super::curve_builder::OffsetCurveBuilder;
use crate::bounds::Aabb2;
use crate::geometry::clean_coords;
use crate::graph::{Label, Location, Position};
use crate::noding::SegmentString;
use crate::primitives::{Point2, Segment2};
use crate::tolerance::ring_is_ccw;
use geo_types::{Geometry, LineString, Polygon};

/// Rings with this many points or more are never considered inverted.
const MAX_INVERTED_RING_SIZE: usize = 9;

/// An inverted ring curve has at most this many vertices per input vertex.
const INVERTED_CURVE_VERTEX_FACTOR: usize = 4;

/// Fraction of the distance within which an inverted curve lies entirely.
const NEARNESS_FACTOR: f64 = 0.99;

/// A ring needs at least this many points, the last repeating the first.
const MIN_RING_SIZE: usize = 4;

/// Collects the raw offset curves of a geometry.
#[derive(Debug)]
pub struct OffsetCurveSetBuilder<'a> {
    geometry: &'a Geometry<f64>,
    distance: f64,
    curve_builder: OffsetCurveBuilder,
    curves: Vec<SegmentString>,
}

impl<'a> OffsetCurveSetBuilder<'a> {
    pub fn new(
        geometry: &'a Geometry<f64>,
        distance: f64,
        curve_builder: OffsetCurveBuilder,
    ) -> Self {
        Self {
            geometry,
            distance,
            curve_builder,
            curves: Vec::new(),
        }
    }

    /// Generates the curves of every component.
    pub fn curves(mut self) -> Vec<SegmentString> {
        self.add(self.geometry);
        self.curves
    }

    fn add(&mut self, geometry: &Geometry<f64>) {
        match geometry {
            Geometry::Point(p) => self.add_point(p.0.into()),
            Geometry::Line(l) => {
                self.add_line_string(&LineString::new(vec![l.start, l.end]))
            }
            Geometry::LineString(ls) => self.add_line_string(ls),
            Geometry::Polygon(p) => self.add_polygon(p),
            Geometry::MultiPoint(mp) => {
                for p in mp {
                    self.add_point(p.0.into());
                }
            }
            Geometry::MultiLineString(mls) => {
                for ls in mls {
                    self.add_line_string(ls);
                }
            }
            Geometry::MultiPolygon(mp) => {
                for p in mp {
                    self.add_polygon(p);
                }
            }
            Geometry::GeometryCollection(gc) => {
                for g in gc {
                    self.add(g);
                }
            }
            Geometry::Rect(r) => self.add_polygon(&r.to_polygon()),
            Geometry::Triangle(t) => self.add_polygon(&t.to_polygon()),
        }
    }

    fn add_curve(&mut self, curve: Option<Vec<Point2<f64>>>, left: Location, right: Location) {
        let Some(pts) = curve else {
            return;
        };
        if pts.len() < 2 {
            return;
        }
        let label = Label::new_area(0, Location::Boundary, left, right);
        self.curves.push(SegmentString::new(pts, label));
    }

    fn add_point(&mut self, p: Point2<f64>) {
        if self.distance <= 0.0 || !p.is_finite() {
            return;
        }
        let curve = self.curve_builder.line_curve(&[p], self.distance);
        self.add_curve(curve, Location::Exterior, Location::Interior);
    }

    fn add_line_string(&mut self, line: &LineString<f64>) {
        if self.curve_builder.is_line_offset_empty(self.distance) {
            return;
        }
        let coords = clean_coords(&line.0);
        if is_ring(&coords) {
            self.add_ring_both_sides(&coords, self.distance);
        } else {
            let curve = self.curve_builder.line_curve(&coords, self.distance);
            self.add_curve(curve, Location::Exterior, Location::Interior);
        }
    }

    fn add_ring_both_sides(&mut self, coords: &[Point2<f64>], distance: f64) {
        self.add_ring_side(
            coords,
            distance,
            Position::Left,
            Location::Exterior,
            Location::Interior,
        );
        self.add_ring_side(
            coords,
            distance,
            Position::Right,
            Location::Interior,
            Location::Exterior,
        );
    }

    fn add_polygon(&mut self, polygon: &Polygon<f64>) {
        let mut offset_distance = self.distance;
        let mut offset_side = Position::Left;
        if self.distance < 0.0 {
            offset_distance = -self.distance;
            offset_side = Position::Right;
        }

        let shell = clean_coords(&polygon.exterior().0);
        if shell.is_empty() {
            return;
        }
        if self.distance < 0.0 && is_eroded_completely(&shell, self.distance) {
            return;
        }
        if self.distance <= 0.0 && shell.len() < 3 {
            return;
        }
        self.add_ring_side(
            &shell,
            offset_distance,
            offset_side,
            Location::Exterior,
            Location::Interior,
        );

        for interior in polygon.interiors() {
            let hole = clean_coords(&interior.0);
            if hole.is_empty() {
                continue;
            }
            if self.distance > 0.0 && is_eroded_completely(&hole, -self.distance) {
                continue;
            }
            // The polygon interior lies on the opposite side of a hole.
            self.add_ring_side(
                &hole,
                offset_distance,
                offset_side.opposite(),
                Location::Interior,
                Location::Exterior,
            );
        }
    }

    /// Adds the offset curve of a ring on one side. The locations are given
    /// for a clockwise ring and swapped for counter-clockwise ones.
    fn add_ring_side(
        &mut self,
        coords: &[Point2<f64>],
        offset_distance: f64,
        mut side: Position,
        cw_left: Location,
        cw_right: Location,
    ) {
        if offset_distance == 0.0 && coords.len() < MIN_RING_SIZE {
            return;
        }
        let (mut left, mut right) = (cw_left, cw_right);
        if coords.len() >= MIN_RING_SIZE && ring_is_ccw(coords) {
            left = cw_right;
            right = cw_left;
            side = side.opposite();
        }
        let curve = self.curve_builder.ring_curve(coords, side, offset_distance);
        if let Some(c) = &curve {
            if is_ring_curve_inverted(coords, offset_distance, c) {
                return;
            }
        }
        self.add_curve(curve, left, right);
    }
}

fn is_ring(coords: &[Point2<f64>]) -> bool {
    coords.len() >= MIN_RING_SIZE && coords.first() == coords.last()
}

/// Returns `true` if a negative buffer certainly removes the whole ring.
fn is_eroded_completely(ring: &[Point2<f64>], buffer_distance: f64) -> bool {
    if ring.len() < MIN_RING_SIZE {
        return buffer_distance < 0.0;
    }
    if ring.len() == MIN_RING_SIZE {
        return is_triangle_eroded_completely(ring, buffer_distance);
    }
    let Some(env) = Aabb2::from_points(ring.iter().copied()) else {
        return false;
    };
    let min_dimension = env.width().min(env.height());
    buffer_distance < 0.0 && 2.0 * buffer_distance.abs() > min_dimension
}

fn is_triangle_eroded_completely(tri: &[Point2<f64>], buffer_distance: f64) -> bool {
    let (p0, p1, p2) = (tri[0], tri[1], tri[2]);
    let len0 = p1.distance(p2);
    let len1 = p0.distance(p2);
    let len2 = p0.distance(p1);
    let circum = len0 + len1 + len2;
    let in_centre = Point2::new(
        (len0 * p0.x + len1 * p1.x + len2 * p2.x) / circum,
        (len0 * p0.y + len1 * p1.y + len2 * p2.y) / circum,
    );
    Segment2::new(p0, p1).distance_to_point(in_centre) < buffer_distance.abs()
}

/// Detects a ring curve that has turned inside out, which happens when a
/// small ring is buffered inward by more than its size. Such a curve lies
/// entirely within the distance of the input ring.
fn is_ring_curve_inverted(input: &[Point2<f64>], distance: f64, curve: &[Point2<f64>]) -> bool {
    if distance == 0.0 {
        return false;
    }
    if input.len() <= 3 || input.len() >= MAX_INVERTED_RING_SIZE {
        return false;
    }
    if curve.len() > INVERTED_CURVE_VERTEX_FACTOR * input.len() {
        return false;
    }
    !has_point_on_buffer(input, distance, curve)
}

fn has_point_on_buffer(input: &[Point2<f64>], distance: f64, curve: &[Point2<f64>]) -> bool {
    let tol = NEARNESS_FACTOR * distance.abs();
    for (i, &v) in curve.iter().enumerate() {
        if distance_to_line(v, input) > tol {
            return true;
        }
        let next = curve[(i + 1) % curve.len()];
        if distance_to_line(v.midpoint(next), input) > tol {
            return true;
        }
    }
    false
}

fn distance_to_line(p: Point2<f64>, line: &[Point2<f64>]) -> f64 {
    line.windows(2)
        .map(|w| Segment2::new(w[0], w[1]).distance_to_point(p))
        .fold(f64::INFINITY, f64::min)
}
