//! Undirected graph edges and the deduplicating edge list.

use super::Label;
use crate::bounds::Aabb2;
use crate::primitives::Point2;
use rustc_hash::FxHashMap;

/// An undirected edge: a coordinate sequence with a label and the summed
/// depth delta of every curve segment that was merged into it.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pts: Vec<Point2<f64>>,
    label: Label,
    depth_delta: i32,
}

impl Edge {
    /// Creates an edge with a zero depth delta.
    pub fn new(pts: Vec<Point2<f64>>, label: Label) -> Self {
        Self {
            pts,
            label,
            depth_delta: 0,
        }
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
    pub fn label_mut(&mut self) -> &mut Label {
        &mut self.label
    }

    #[inline]
    pub fn depth_delta(&self) -> i32 {
        self.depth_delta
    }

    #[inline]
    pub fn set_depth_delta(&mut self, delta: i32) {
        self.depth_delta = delta;
    }

    /// Returns `true` if both edges have the same coordinates in the same order.
    #[inline]
    pub fn is_pointwise_equal(&self, other: &Edge) -> bool {
        self.pts == other.pts
    }

    /// Bounding box of the edge coordinates.
    pub fn envelope(&self) -> Option<Aabb2<f64>> {
        Aabb2::from_points(self.pts.iter().copied())
    }
}

/// Hash key that is equal for a coordinate sequence and its reverse.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct OrientedKey(Vec<(u64, u64)>);

impl OrientedKey {
    fn new(pts: &[Point2<f64>]) -> Self {
        // Adding zero folds -0.0 into 0.0 so both hash alike.
        let bits = |p: &Point2<f64>| ((p.x + 0.0).to_bits(), (p.y + 0.0).to_bits());
        if increasing_direction(pts) {
            OrientedKey(pts.iter().map(bits).collect())
        } else {
            OrientedKey(pts.iter().rev().map(bits).collect())
        }
    }
}

/// Canonical orientation of a coordinate sequence: compares points from both
/// ends inward and keeps the direction whose first differing point is larger.
/// Palindromes count as increasing.
fn increasing_direction(pts: &[Point2<f64>]) -> bool {
    let n = pts.len();
    for i in 0..n / 2 {
        let j = n - 1 - i;
        match pts[i].compare_xy(pts[j]) {
            std::cmp::Ordering::Equal => continue,
            ord => return ord == std::cmp::Ordering::Greater,
        }
    }
    true
}

/// Edges indexed by their coordinates, so that a geometrically identical
/// edge (in either direction) is found in constant time.
#[derive(Debug, Clone, Default)]
pub struct EdgeList {
    edges: Vec<Edge>,
    index: FxHashMap<OrientedKey, usize>,
}

impl EdgeList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an edge and returns its index.
    pub fn add(&mut self, edge: Edge) -> usize {
        let id = self.edges.len();
        self.index.insert(OrientedKey::new(&edge.pts), id);
        self.edges.push(edge);
        id
    }

    /// Finds an edge with the same coordinates as `edge`, forwards or reversed.
    pub fn find_equal(&self, edge: &Edge) -> Option<usize> {
        self.index.get(&OrientedKey::new(&edge.pts)).copied()
    }

    #[inline]
    pub fn get(&self, id: usize) -> &Edge {
        &self.edges[id]
    }

    #[inline]
    pub fn get_mut(&mut self, id: usize) -> &mut Edge {
        &mut self.edges[id]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Consumes the list, returning edges in insertion order.
    pub fn into_edges(self) -> Vec<Edge> {
        self.edges
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Location;

    fn label() -> Label {
        Label::new_area(0, Location::Boundary, Location::Exterior, Location::Interior)
    }

    fn pts(coords: &[(f64, f64)]) -> Vec<Point2<f64>> {
        coords.iter().map(|&(x, y)| Point2::new(x, y)).collect()
    }

    #[test]
    fn test_find_forward_and_reverse() {
        let mut list = EdgeList::new();
        let id = list.add(Edge::new(pts(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]), label()));

        let same = Edge::new(pts(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]), label());
        let reversed = Edge::new(pts(&[(1.0, 1.0), (1.0, 0.0), (0.0, 0.0)]), label());
        let other = Edge::new(pts(&[(0.0, 0.0), (1.0, 1.0)]), label());

        assert_eq!(list.find_equal(&same), Some(id));
        assert_eq!(list.find_equal(&reversed), Some(id));
        assert_eq!(list.find_equal(&other), None);

        assert!(list.get(id).is_pointwise_equal(&same));
        assert!(!list.get(id).is_pointwise_equal(&reversed));
    }

    #[test]
    fn test_negative_zero_matches() {
        let mut list = EdgeList::new();
        list.add(Edge::new(pts(&[(0.0, 0.0), (1.0, 0.0)]), label()));
        let neg = Edge::new(pts(&[(-0.0, 0.0), (1.0, -0.0)]), label());
        assert_eq!(list.find_equal(&neg), Some(0));
    }

    #[test]
    fn test_closed_ring_matches_its_reverse() {
        let ring = pts(&[(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 0.0)]);
        let rev: Vec<_> = ring.iter().rev().copied().collect();
        let mut list = EdgeList::new();
        list.add(Edge::new(ring, label()));
        assert_eq!(list.find_equal(&Edge::new(rev, label())), Some(0));
    }
}
