//! Arena-backed planar graph.
//!
//! Every edge owns two directed edges (forward and reverse) that refer to
//! each other as `sym`. Nodes are created for every distinct edge endpoint
//! and hold the outgoing directed edges sorted counter-clockwise around the
//! node. All cross references are indices into the graph's arenas.

use super::{Edge, Label, Position};
use crate::error::{BufferError, Result};
use crate::primitives::Point2;
use crate::tolerance::{orientation_index, Orientation};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Sentinel for a side depth that has not been assigned.
pub const NULL_DEPTH: i32 = -999;

/// Index of an [`Edge`] in a [`PlanarGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(pub usize);

/// Index of a [`DirectedEdge`] in a [`PlanarGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DirEdgeId(pub usize);

/// Index of a [`Node`] in a [`PlanarGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// Quadrant of a direction vector, numbered counter-clockwise from north-east.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Quadrant {
    NorthEast = 0,
    NorthWest = 1,
    SouthWest = 2,
    SouthEast = 3,
}

impl Quadrant {
    /// Classifies a direction. Zero components count as positive.
    pub fn of(dx: f64, dy: f64) -> Self {
        match (dx >= 0.0, dy >= 0.0) {
            (true, true) => Quadrant::NorthEast,
            (true, false) => Quadrant::SouthEast,
            (false, true) => Quadrant::NorthWest,
            (false, false) => Quadrant::SouthWest,
        }
    }

    #[inline]
    pub fn is_northern(self) -> bool {
        matches!(self, Quadrant::NorthEast | Quadrant::NorthWest)
    }
}

/// One traversal direction of an edge.
#[derive(Debug, Clone)]
pub struct DirectedEdge {
    edge: EdgeId,
    forward: bool,
    p0: Point2<f64>,
    p1: Point2<f64>,
    quadrant: Quadrant,
    node: NodeId,
    label: Label,
    depth: [i32; 3],
    in_result: bool,
}

impl DirectedEdge {
    #[inline]
    pub fn edge(&self) -> EdgeId {
        self.edge
    }

    #[inline]
    pub fn is_forward(&self) -> bool {
        self.forward
    }

    /// The origin of this directed edge.
    #[inline]
    pub fn coordinate(&self) -> Point2<f64> {
        self.p0
    }

    /// The next point along the edge, which fixes its direction.
    #[inline]
    pub fn direction_point(&self) -> Point2<f64> {
        self.p1
    }

    #[inline]
    pub fn dx(&self) -> f64 {
        self.p1.x - self.p0.x
    }

    #[inline]
    pub fn dy(&self) -> f64 {
        self.p1.y - self.p0.y
    }

    #[inline]
    pub fn quadrant(&self) -> Quadrant {
        self.quadrant
    }

    /// The node this directed edge leaves from.
    #[inline]
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// The edge label, flipped for reverse directed edges.
    #[inline]
    pub fn label(&self) -> &Label {
        &self.label
    }

    #[inline]
    pub fn depth(&self, pos: Position) -> i32 {
        self.depth[pos.index()]
    }

    #[inline]
    pub fn is_in_result(&self) -> bool {
        self.in_result
    }

    #[inline]
    pub fn set_in_result(&mut self, in_result: bool) {
        self.in_result = in_result;
    }

    /// Assigns a side depth, failing if a different depth was already set.
    pub fn set_depth(&mut self, pos: Position, depth: i32) -> Result<()> {
        let slot = &mut self.depth[pos.index()];
        if *slot != NULL_DEPTH && *slot != depth {
            return Err(BufferError::topology_at(
                "assigned depths do not match",
                self.p0,
            ));
        }
        *slot = depth;
        Ok(())
    }

    /// Returns `true` if geometry interiors lie on both sides of this edge for
    /// every input geometry.
    pub fn is_interior_area_edge(&self) -> bool {
        (0..2).all(|geom| {
            self.label.is_area_of(geom)
                && self.label.location(geom, Position::Left) == Some(super::Location::Interior)
                && self.label.location(geom, Position::Right) == Some(super::Location::Interior)
        })
    }

    /// Orders directed edges counter-clockwise by angle, starting from the
    /// positive x-axis.
    pub fn compare_direction(&self, other: &DirectedEdge) -> Ordering {
        if self.dx() == other.dx() && self.dy() == other.dy() {
            return Ordering::Equal;
        }
        match self.quadrant.cmp(&other.quadrant) {
            Ordering::Equal => match orientation_index(other.p0, other.p1, self.p1) {
                Orientation::CounterClockwise => Ordering::Greater,
                Orientation::Clockwise => Ordering::Less,
                Orientation::Collinear => Ordering::Equal,
            },
            ord => ord,
        }
    }
}

/// A graph node with its outgoing directed edges in counter-clockwise order.
#[derive(Debug, Clone)]
pub struct Node {
    coord: Point2<f64>,
    star: Vec<DirEdgeId>,
}

impl Node {
    #[inline]
    pub fn coordinate(&self) -> Point2<f64> {
        self.coord
    }

    /// Outgoing directed edges sorted counter-clockwise.
    #[inline]
    pub fn star(&self) -> &[DirEdgeId] {
        &self.star
    }
}

/// Total order on coordinates used to key nodes.
#[derive(Debug, Clone, Copy)]
struct CoordKey(Point2<f64>);

impl PartialEq for CoordKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for CoordKey {}

impl PartialOrd for CoordKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CoordKey {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.0.x + 0.0)
            .total_cmp(&(other.0.x + 0.0))
            .then_with(|| (self.0.y + 0.0).total_cmp(&(other.0.y + 0.0)))
    }
}

/// A planar graph built from deduplicated edges.
#[derive(Debug, Clone, Default)]
pub struct PlanarGraph {
    edges: Vec<Edge>,
    dir_edges: Vec<DirectedEdge>,
    nodes: Vec<Node>,
    node_index: BTreeMap<CoordKey, NodeId>,
}

impl PlanarGraph {
    /// Builds the graph, creating both directed edges of every edge and the
    /// nodes at their origins.
    ///
    /// Edges must have at least two points.
    pub fn from_edges(edges: Vec<Edge>) -> Self {
        let mut graph = PlanarGraph {
            edges: Vec::with_capacity(edges.len()),
            dir_edges: Vec::with_capacity(edges.len() * 2),
            nodes: Vec::new(),
            node_index: BTreeMap::new(),
        };
        for edge in edges {
            graph.add_edge(edge);
        }
        graph.sort_stars();
        graph
    }

    fn add_edge(&mut self, edge: Edge) {
        let edge_id = EdgeId(self.edges.len());
        let pts = edge.coords();
        let n = pts.len();
        let ends = [(pts[0], pts[1], true), (pts[n - 1], pts[n - 2], false)];
        for (p0, p1, forward) in ends {
            let node = self.add_node(p0);
            let label = if forward {
                *edge.label()
            } else {
                edge.label().flipped()
            };
            let id = DirEdgeId(self.dir_edges.len());
            self.dir_edges.push(DirectedEdge {
                edge: edge_id,
                forward,
                p0,
                p1,
                quadrant: Quadrant::of(p1.x - p0.x, p1.y - p0.y),
                node,
                label,
                depth: [0, NULL_DEPTH, NULL_DEPTH],
                in_result: false,
            });
            self.nodes[node.0].star.push(id);
        }
        self.edges.push(edge);
    }

    fn add_node(&mut self, coord: Point2<f64>) -> NodeId {
        if let Some(&id) = self.node_index.get(&CoordKey(coord)) {
            return id;
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            coord,
            star: Vec::new(),
        });
        self.node_index.insert(CoordKey(coord), id);
        id
    }

    fn sort_stars(&mut self) {
        let dir_edges = &self.dir_edges;
        for node in &mut self.nodes {
            node.star
                .sort_by(|a, b| dir_edges[a.0].compare_direction(&dir_edges[b.0]));
        }
    }

    #[inline]
    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id.0]
    }

    #[inline]
    pub fn dir_edge(&self, id: DirEdgeId) -> &DirectedEdge {
        &self.dir_edges[id.0]
    }

    #[inline]
    pub fn dir_edge_mut(&mut self, id: DirEdgeId) -> &mut DirectedEdge {
        &mut self.dir_edges[id.0]
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// The opposite directed edge of the same edge.
    #[inline]
    pub fn sym(&self, id: DirEdgeId) -> DirEdgeId {
        DirEdgeId(id.0 ^ 1)
    }

    /// Coordinates of the edge underlying a directed edge, in edge order.
    #[inline]
    pub fn dir_edge_coords(&self, id: DirEdgeId) -> &[Point2<f64>] {
        self.edges[self.dir_edges[id.0].edge.0].coords()
    }

    /// Depth delta of a directed edge, negated for the reverse direction.
    pub fn dir_edge_depth_delta(&self, id: DirEdgeId) -> i32 {
        let de = &self.dir_edges[id.0];
        let delta = self.edges[de.edge.0].depth_delta();
        if de.forward {
            delta
        } else {
            -delta
        }
    }

    #[inline]
    pub fn dir_edge_count(&self) -> usize {
        self.dir_edges.len()
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Node ids in coordinate order (by x, then y).
    pub fn nodes_in_order(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.node_index.values().copied()
    }

    /// Sets the depth on side `pos` and the depth on the opposite side
    /// implied by the edge's depth delta.
    pub fn set_edge_depths(&mut self, id: DirEdgeId, pos: Position, depth: i32) -> Result<()> {
        let mut delta = self.dir_edge_depth_delta(id);
        if pos == Position::Left {
            delta = -delta;
        }
        let de = &mut self.dir_edges[id.0];
        de.set_depth(pos, depth)?;
        de.set_depth(pos.opposite(), depth + delta)
    }

    /// Mirrors the side depths of a directed edge onto its sym.
    pub fn copy_sym_depths(&mut self, id: DirEdgeId) -> Result<()> {
        let left = self.dir_edges[id.0].depth(Position::Left);
        let right = self.dir_edges[id.0].depth(Position::Right);
        let sym_id = self.sym(id);
        let sym = &mut self.dir_edges[sym_id.0];
        sym.set_depth(Position::Left, right)?;
        sym.set_depth(Position::Right, left)
    }

    /// Propagates depths around a node's star, starting from `start`, whose
    /// depths must already be known.
    ///
    /// Walking counter-clockwise, every edge's right depth is the previous
    /// edge's left depth. The walk must come back to the right depth of
    /// `start`.
    pub fn compute_star_depths(&mut self, node: NodeId, start: DirEdgeId) -> Result<()> {
        let star = self.nodes[node.0].star.clone();
        let index = star
            .iter()
            .position(|&e| e == start)
            .ok_or_else(|| BufferError::Invariant("start edge is not in node star".into()))?;

        let start_depth = self.dir_edges[start.0].depth(Position::Left);
        let target_last_depth = self.dir_edges[start.0].depth(Position::Right);

        let mut current = start_depth;
        for &de in star[index + 1..].iter().chain(star[..index].iter()) {
            self.set_edge_depths(de, Position::Right, current)?;
            current = self.dir_edges[de.0].depth(Position::Left);
        }

        if current != target_last_depth {
            return Err(BufferError::topology_at(
                "depth mismatch",
                self.nodes[node.0].coord,
            ));
        }
        Ok(())
    }

    /// Chooses the outgoing edge at a node whose right side faces the
    /// exterior, for a node that is the rightmost point of its component.
    pub fn rightmost_star_edge(&self, node: NodeId) -> Result<Option<DirEdgeId>> {
        let star = &self.nodes[node.0].star;
        let (first, last) = match (star.first(), star.last()) {
            (Some(&f), Some(&l)) => (f, l),
            _ => return Ok(None),
        };
        if star.len() == 1 {
            return Ok(Some(first));
        }

        let de0 = &self.dir_edges[first.0];
        let de_last = &self.dir_edges[last.0];
        let north0 = de0.quadrant.is_northern();
        let north_last = de_last.quadrant.is_northern();
        if north0 && north_last {
            return Ok(Some(first));
        }
        if !north0 && !north_last {
            return Ok(Some(last));
        }
        if de0.dy() != 0.0 {
            return Ok(Some(first));
        }
        if de_last.dy() != 0.0 {
            return Ok(Some(last));
        }
        Err(BufferError::Invariant(
            "found two horizontal edges incident on node".into(),
        ))
    }

    /// Outgoing edges at `node` that bound the result, either themselves or
    /// through their sym.
    pub fn result_area_edges(&self, node: NodeId) -> Vec<DirEdgeId> {
        self.nodes[node.0]
            .star
            .iter()
            .copied()
            .filter(|&de| {
                self.dir_edges[de.0].in_result || self.dir_edges[self.sym(de).0].in_result
            })
            .collect()
    }
}
