//! Depth of a point relative to already processed subgraphs.
//!
//! A ray is cast from the query point towards positive X. The closest
//! segment it crosses belongs to the subgraph immediately enclosing the
//! point, and the depth on the side of that segment facing the point is the
//! point's depth. Points stabbing nothing are outside everything: depth 0.

use super::subgraph::BufferSubgraph;
use crate::graph::{DirEdgeId, PlanarGraph, Position};
use crate::primitives::{Point2, Segment2};
use crate::tolerance::{orientation_index, Orientation};
use std::cmp::Ordering;

/// A stabbed segment, oriented upward, with the depth on its left.
#[derive(Debug, Clone, Copy)]
struct DepthSegment {
    upward: Segment2<f64>,
    left_depth: i32,
}

impl DepthSegment {
    /// Orders segments left to right along the stabbing ray.
    ///
    /// Segments with disjoint X extents compare by position. Otherwise one
    /// segment lying wholly to the left of the other's line is smaller. The
    /// final tie-break is lexicographic, which keeps the order total for
    /// collinear or crossing segments.
    fn compare(&self, other: &DepthSegment) -> Ordering {
        if self.upward.min_x() >= other.upward.max_x() {
            return Ordering::Greater;
        }
        if self.upward.max_x() <= other.upward.min_x() {
            return Ordering::Less;
        }
        let o = self.upward.orientation_of(other.upward).sign();
        if o != 0 {
            return o.cmp(&0);
        }
        let o = -other.upward.orientation_of(self.upward).sign();
        if o != 0 {
            return o.cmp(&0);
        }
        self.upward.compare_lexicographic(other.upward)
    }
}

/// Answers depth queries against the subgraphs processed so far.
#[derive(Debug, Clone, Copy)]
pub struct SubgraphDepthLocator<'a> {
    graph: &'a PlanarGraph,
    subgraphs: &'a [BufferSubgraph],
}

impl<'a> SubgraphDepthLocator<'a> {
    pub fn new(graph: &'a PlanarGraph, subgraphs: &'a [BufferSubgraph]) -> Self {
        Self { graph, subgraphs }
    }

    /// Depth at `p`, or 0 if no processed segment lies to its right.
    pub fn depth_at(&self, p: Point2<f64>) -> i32 {
        let stabbed = self.find_stabbed_segments(p);
        let mut iter = stabbed.iter();
        let Some(mut min) = iter.next() else {
            return 0;
        };
        for ds in iter {
            if ds.compare(min) == Ordering::Less {
                min = ds;
            }
        }
        min.left_depth
    }

    fn find_stabbed_segments(&self, p: Point2<f64>) -> Vec<DepthSegment> {
        let mut stabbed = Vec::new();
        for subgraph in self.subgraphs {
            if !subgraph.envelope().spans_y(p.y) {
                continue;
            }
            for &de in subgraph.dir_edges() {
                if self.graph.dir_edge(de).is_forward() {
                    self.stab_edge(p, de, &mut stabbed);
                }
            }
        }
        stabbed
    }

    fn stab_edge(&self, p: Point2<f64>, de: DirEdgeId, stabbed: &mut Vec<DepthSegment>) {
        let d = self.graph.dir_edge(de);
        for w in self.graph.dir_edge_coords(de).windows(2) {
            let (seg, flipped) = Segment2::new(w[0], w[1]).upward();
            if seg.max_x() < p.x {
                continue;
            }
            // A horizontal segment's depths are carried by its neighbours.
            if seg.is_horizontal() {
                continue;
            }
            if p.y < seg.start.y || p.y > seg.end.y {
                continue;
            }
            if orientation_index(seg.start, seg.end, p) == Orientation::Clockwise {
                continue;
            }
            let left_depth = if flipped {
                d.depth(Position::Right)
            } else {
                d.depth(Position::Left)
            };
            stabbed.push(DepthSegment {
                upward: seg,
                left_depth,
            });
        }
    }
}
