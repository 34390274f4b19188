//! Labelled coordinate sequences and their node lists.

use crate::graph::Label;
use crate::primitives::Point2;
use crate::tolerance::LineIntersection;
use std::cmp::Ordering;

/// A labelled sequence of coordinates, as produced by curve generation and
/// by noding.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentString {
    pts: Vec<Point2<f64>>,
    label: Label,
}

impl SegmentString {
    pub fn new(pts: Vec<Point2<f64>>, label: Label) -> Self {
        Self { pts, label }
    }

    #[inline]
    pub fn coords(&self) -> &[Point2<f64>] {
        &self.pts
    }

    #[inline]
    pub fn label(&self) -> &Label {
        &self.label
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pts.is_empty()
    }

    /// Returns `true` if the first and last points coincide.
    pub fn is_closed(&self) -> bool {
        match (self.pts.first(), self.pts.last()) {
            (Some(a), Some(b)) => self.pts.len() > 1 && a == b,
            _ => false,
        }
    }

    /// Splits into coordinates and label.
    pub fn into_parts(self) -> (Vec<Point2<f64>>, Label) {
        (self.pts, self.label)
    }
}

/// A node on a segment string: a point lying on segment `segment_index`.
#[derive(Debug, Clone, Copy)]
struct SegmentNode {
    coord: Point2<f64>,
    segment_index: usize,
    /// `false` when the node coincides with the segment's start vertex.
    interior: bool,
    /// Distance from the segment start, used to order nodes along a segment.
    offset: f64,
}

impl SegmentNode {
    fn compare(&self, other: &SegmentNode) -> Ordering {
        self.segment_index
            .cmp(&other.segment_index)
            .then_with(|| {
                if self.coord == other.coord {
                    Ordering::Equal
                } else {
                    self.offset
                        .total_cmp(&other.offset)
                        .then_with(|| self.coord.compare_xy(other.coord))
                }
            })
    }
}

/// A segment string that collects nodes and can be split at them.
#[derive(Debug, Clone)]
pub(crate) struct NodedSegmentString {
    pts: Vec<Point2<f64>>,
    label: Label,
    nodes: Vec<SegmentNode>,
}

impl NodedSegmentString {
    pub(crate) fn new(pts: Vec<Point2<f64>>, label: Label) -> Self {
        Self {
            pts,
            label,
            nodes: Vec::new(),
        }
    }

    #[inline]
    pub(crate) fn coords(&self) -> &[Point2<f64>] {
        &self.pts
    }

    #[inline]
    pub(crate) fn label(&self) -> &Label {
        &self.label
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.pts.len() > 1 && self.pts.first() == self.pts.last()
    }

    /// Records every intersection point of `li` as a node on segment
    /// `segment_index`.
    pub(crate) fn add_intersections(&mut self, li: &LineIntersection, segment_index: usize) {
        for i in 0..li.count() {
            self.add_intersection(li.point(i), segment_index);
        }
    }

    /// Records `pt` as a node on segment `segment_index`. A point equal to
    /// the segment's end vertex is recorded on the following segment.
    pub(crate) fn add_intersection(&mut self, pt: Point2<f64>, segment_index: usize) {
        let mut index = segment_index;
        if index + 1 < self.pts.len() && pt == self.pts[index + 1] {
            index += 1;
        }
        self.push_node(pt, index);
    }

    fn push_node(&mut self, coord: Point2<f64>, segment_index: usize) {
        let start = self.pts[segment_index];
        self.nodes.push(SegmentNode {
            coord,
            segment_index,
            interior: coord != start,
            offset: start.distance(coord),
        });
    }

    fn sort_nodes(&mut self) {
        self.nodes.sort_by(|a, b| a.compare(b));
        self.nodes.dedup_by(|a, b| a.compare(b) == Ordering::Equal);
    }

    /// Adds nodes at vertices where the string folds back on itself, so the
    /// zero-area spike becomes a separate edge.
    fn add_collapsed_nodes(&mut self) {
        let mut collapsed = Vec::new();

        for i in 0..self.pts.len().saturating_sub(2) {
            if self.pts[i] == self.pts[i + 2] {
                collapsed.push(i + 1);
            }
        }

        self.sort_nodes();
        for w in self.nodes.windows(2) {
            let (a, b) = (w[0], w[1]);
            if a.coord != b.coord {
                continue;
            }
            let mut between = b.segment_index - a.segment_index;
            if !b.interior {
                between = between.saturating_sub(1);
            }
            if between == 1 {
                collapsed.push(a.segment_index + 1);
            }
        }

        for i in collapsed {
            self.push_node(self.pts[i], i);
        }
    }

    /// Splits the string at its nodes (and its endpoints), returning the
    /// substrings in order. Each substring keeps the parent label.
    pub(crate) fn into_substrings(mut self) -> Vec<SegmentString> {
        if self.pts.is_empty() {
            return Vec::new();
        }
        let last = self.pts.len() - 1;
        self.push_node(self.pts[0], 0);
        self.push_node(self.pts[last], last);
        self.add_collapsed_nodes();
        self.sort_nodes();

        let mut result = Vec::with_capacity(self.nodes.len().saturating_sub(1));
        for w in self.nodes.windows(2) {
            result.push(SegmentString::new(
                self.split_points(&w[0], &w[1]),
                self.label,
            ));
        }
        result
    }

    fn split_points(&self, n0: &SegmentNode, n1: &SegmentNode) -> Vec<Point2<f64>> {
        if n0.segment_index == n1.segment_index {
            return vec![n0.coord, n1.coord];
        }
        let last_seg_start = self.pts[n1.segment_index];
        let use_end_node = n1.interior || n1.coord != last_seg_start;

        let mut pts = Vec::with_capacity(n1.segment_index - n0.segment_index + 2);
        pts.push(n0.coord);
        pts.extend_from_slice(&self.pts[n0.segment_index + 1..=n1.segment_index]);
        if use_end_node {
            pts.push(n1.coord);
        }
        pts
    }
}

impl From<SegmentString> for NodedSegmentString {
    fn from(ss: SegmentString) -> Self {
        NodedSegmentString::new(ss.pts, ss.label)
    }
}
