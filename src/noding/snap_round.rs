//! Snap-rounding noder.
//!
//! All vertices and intersection points are rounded to a grid of cell size
//! `1 / scale`. Each grid cell containing such a point is a *hot pixel*;
//! every segment passing through a hot pixel is noded at the pixel centre.
//! The output is fully noded and every coordinate lies on the grid, which
//! removes the near-coincidences that make floating-point noding fail.

use super::fast::{collect_segments, for_each_overlapping_pair};
use super::segment_string::{NodedSegmentString, SegmentString};
use crate::precision::PrecisionModel;
use crate::primitives::{Point2, Segment2};
use crate::tolerance::{orientation_index, LineIntersector};
use std::collections::BTreeMap;
use tracing::trace;

/// Intersections closer than this fraction of a grid cell to a vertex are
/// treated as touching it.
const INTERSECTION_NEARNESS_FACTOR: f64 = 100.0;

/// Half the side of a hot pixel, in scaled units.
const PIXEL_HALF: f64 = 0.5;

/// A grid cell around a rounded point.
#[derive(Debug, Clone, Copy)]
struct HotPixel {
    /// The rounded point at the pixel centre.
    coord: Point2<f64>,
    hpx: f64,
    hpy: f64,
    scale: f64,
    node: bool,
}

impl HotPixel {
    fn new(coord: Point2<f64>, scale: f64) -> Self {
        Self {
            coord,
            hpx: (coord.x * scale).round(),
            hpy: (coord.y * scale).round(),
            scale,
            node: false,
        }
    }

    /// Returns `true` if `p` lies in the half-open pixel square.
    fn contains(&self, p: Point2<f64>) -> bool {
        let x = p.x * self.scale;
        let y = p.y * self.scale;
        x < self.hpx + PIXEL_HALF
            && x >= self.hpx - PIXEL_HALF
            && y < self.hpy + PIXEL_HALF
            && y >= self.hpy - PIXEL_HALF
    }

    /// Returns `true` if segment `p0 -> p1` passes through the pixel.
    ///
    /// The pixel is half-open like [`HotPixel::contains`]: corner contacts
    /// are resolved by the segment direction so that a segment passing
    /// exactly through a pixel corner meets a single pixel.
    fn intersects_segment(&self, p0: Point2<f64>, p1: Point2<f64>) -> bool {
        let s0 = Point2::new(p0.x * self.scale, p0.y * self.scale);
        let s1 = Point2::new(p1.x * self.scale, p1.y * self.scale);
        let (p, q) = if s0.x > s1.x { (s1, s0) } else { (s0, s1) };

        let max_x = self.hpx + PIXEL_HALF;
        let min_x = self.hpx - PIXEL_HALF;
        let max_y = self.hpy + PIXEL_HALF;
        let min_y = self.hpy - PIXEL_HALF;

        if p.x.min(q.x) >= max_x || p.x.max(q.x) < min_x {
            return false;
        }
        if p.y.min(q.y) >= max_y || p.y.max(q.y) < min_y {
            return false;
        }
        if p.x == q.x || p.y == q.y {
            return true;
        }

        let orient = |cx: f64, cy: f64| orientation_index(p, q, Point2::new(cx, cy)).sign();

        let upper_left = orient(min_x, max_y);
        if upper_left == 0 {
            return p.y >= q.y;
        }
        let upper_right = orient(max_x, max_y);
        if upper_right == 0 {
            return p.y <= q.y;
        }
        if upper_left != upper_right {
            return true;
        }
        let lower_left = orient(min_x, min_y);
        if lower_left == 0 || lower_left != upper_left {
            return true;
        }
        let lower_right = orient(max_x, min_y);
        if lower_right == 0 {
            return p.y >= q.y;
        }
        lower_left != lower_right || lower_right != upper_right
    }
}

/// Hot pixels keyed by their integer grid position.
#[derive(Debug)]
struct HotPixelIndex {
    scale: f64,
    pixels: BTreeMap<(i64, i64), HotPixel>,
}

impl HotPixelIndex {
    fn new(scale: f64) -> Self {
        Self {
            scale,
            pixels: BTreeMap::new(),
        }
    }

    fn key(&self, rounded: Point2<f64>) -> (i64, i64) {
        (
            (rounded.x * self.scale).round() as i64,
            (rounded.y * self.scale).round() as i64,
        )
    }

    /// Adds a pixel for a vertex. A pixel hit a second time becomes a node.
    fn add(&mut self, rounded: Point2<f64>) -> &mut HotPixel {
        let key = self.key(rounded);
        let scale = self.scale;
        self.pixels
            .entry(key)
            .and_modify(|hp| hp.node = true)
            .or_insert_with(|| HotPixel::new(rounded, scale))
    }

    fn add_node(&mut self, rounded: Point2<f64>) {
        self.add(rounded).node = true;
    }

    /// Keys of pixels whose centres may lie within one cell of the segment
    /// envelope, in grid order.
    fn query(&self, p0: Point2<f64>, p1: Point2<f64>) -> Vec<(i64, i64)> {
        let min_x = (p0.x.min(p1.x) * self.scale).floor() as i64 - 1;
        let max_x = (p0.x.max(p1.x) * self.scale).ceil() as i64 + 1;
        let min_y = (p0.y.min(p1.y) * self.scale).floor() as i64 - 1;
        let max_y = (p0.y.max(p1.y) * self.scale).ceil() as i64 + 1;
        self.pixels
            .range((min_x, i64::MIN)..=(max_x, i64::MAX))
            .filter(|((_, y), _)| *y >= min_y && *y <= max_y)
            .map(|(k, _)| *k)
            .collect()
    }
}

/// Snap-rounds `strings` to the grid of the given scale.
pub(super) fn node(strings: Vec<SegmentString>, scale: f64) -> Vec<SegmentString> {
    let precision = PrecisionModel::fixed(scale);
    let noded: Vec<NodedSegmentString> = strings.into_iter().map(Into::into).collect();
    let mut index = HotPixelIndex::new(scale);

    add_intersection_pixels(&noded, &mut index, scale);
    for ss in &noded {
        for &p in ss.coords() {
            index.add(precision.make_precise(p));
        }
    }

    let mut snapped = Vec::with_capacity(noded.len());
    for ss in &noded {
        if let Some(s) = snap_segments(ss, &mut index, precision) {
            snapped.push(s);
        }
    }
    for ss in &mut snapped {
        add_vertex_node_snaps(ss, &index);
    }

    trace!(
        strings = snapped.len(),
        hot_pixels = index.pixels.len(),
        scale,
        "snap rounding complete"
    );

    snapped
        .into_iter()
        .flat_map(NodedSegmentString::into_substrings)
        .collect()
}

/// Finds interior intersections and near-vertex touches and turns them into
/// node pixels.
fn add_intersection_pixels(strings: &[NodedSegmentString], index: &mut HotPixelIndex, scale: f64) {
    let precision = PrecisionModel::fixed(scale);
    let tolerance = 1.0 / scale / INTERSECTION_NEARNESS_FACTOR;
    let li = LineIntersector::default();
    let mut points = Vec::new();

    let segs = collect_segments(strings, tolerance);
    for_each_overlapping_pair(segs, |a, b| {
        if a.string == b.string && a.index == b.index {
            return;
        }
        let pa = &strings[a.string].coords()[a.index..a.index + 2];
        let pb = &strings[b.string].coords()[b.index..b.index + 2];
        let (p00, p01, p10, p11) = (pa[0], pa[1], pb[0], pb[1]);

        let result = li.intersect(p00, p01, p10, p11);
        if result.has_intersection() && result.is_interior() {
            for i in 0..result.count() {
                points.push(result.point(i));
            }
            return;
        }

        for (p, s0, s1) in [
            (p00, p10, p11),
            (p01, p10, p11),
            (p10, p00, p01),
            (p11, p00, p01),
        ] {
            if is_near_vertex(p, s0, s1, tolerance) {
                points.push(p);
            }
        }
    });

    for p in points {
        index.add_node(precision.make_precise(p));
    }
}

/// A vertex lying within `tolerance` of the interior of another segment.
fn is_near_vertex(p: Point2<f64>, p0: Point2<f64>, p1: Point2<f64>, tolerance: f64) -> bool {
    if p.distance(p0) < tolerance || p.distance(p1) < tolerance {
        return false;
    }
    Segment2::new(p0, p1).distance_to_point(p) < tolerance
}

/// Rounds a string and nodes every rounded segment at the hot pixels its
/// original segment passes through. Returns `None` if the string collapses
/// to a single point.
fn snap_segments(
    ss: &NodedSegmentString,
    index: &mut HotPixelIndex,
    precision: PrecisionModel,
) -> Option<NodedSegmentString> {
    let pts = ss.coords();
    let mut rounded: Vec<Point2<f64>> = Vec::with_capacity(pts.len());
    for &p in pts {
        let r = precision.make_precise(p);
        if rounded.last() != Some(&r) {
            rounded.push(r);
        }
    }
    if rounded.len() <= 1 {
        return None;
    }

    let mut snapped = NodedSegmentString::new(rounded, *ss.label());
    let mut snap_index = 0;
    for w in pts.windows(2) {
        let (p0, p1) = (w[0], w[1]);
        let current = snapped.coords()[snap_index];
        if precision.make_precise(p1) == current {
            continue;
        }
        for key in index.query(p0, p1) {
            let Some(hp) = index.pixels.get_mut(&key) else {
                continue;
            };
            if !hp.node && (hp.contains(p0) || hp.contains(p1)) {
                continue;
            }
            if hp.intersects_segment(p0, p1) {
                snapped.add_intersection(hp.coord, snap_index);
                hp.node = true;
            }
        }
        snap_index += 1;
    }
    Some(snapped)
}

/// Nodes interior vertices that coincide with a node pixel.
fn add_vertex_node_snaps(ss: &mut NodedSegmentString, index: &HotPixelIndex) {
    let n = ss.coords().len();
    for i in 1..n.saturating_sub(1) {
        let p = ss.coords()[i];
        let is_node = index
            .pixels
            .get(&index.key(p))
            .map(|hp| hp.node && hp.coord == p)
            .unwrap_or(false);
        if is_node {
            ss.add_intersection(p, i);
        }
    }
}
