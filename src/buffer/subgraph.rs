//! Connected components of the buffer graph.
//!
//! Each subgraph is labelled independently: depths are seeded at its
//! rightmost edge from the depth of the surrounding, already processed
//! subgraphs and then flooded across its nodes.

use super::rightmost::{find_rightmost_edge, RightmostEdge};
use crate::bounds::Aabb2;
use crate::error::{BufferError, Result};
use crate::graph::{DirEdgeId, NodeId, PlanarGraph, Position};
use crate::primitives::Point2;
use rustc_hash::FxHashSet;
use std::collections::VecDeque;

/// A connected set of nodes and their outgoing directed edges.
#[derive(Debug, Clone)]
pub struct BufferSubgraph {
    dir_edges: Vec<DirEdgeId>,
    nodes: Vec<NodeId>,
    rightmost: RightmostEdge,
    envelope: Aabb2<f64>,
}

impl BufferSubgraph {
    /// Collects the component reachable from `start`, marking its nodes in
    /// `visited`.
    pub fn create(graph: &PlanarGraph, start: NodeId, visited: &mut [bool]) -> Result<Self> {
        let mut dir_edges = Vec::new();
        let mut nodes = Vec::new();
        let mut stack = vec![start];

        while let Some(node) = stack.pop() {
            if visited[node.0] {
                continue;
            }
            visited[node.0] = true;
            nodes.push(node);
            for &de in graph.node(node).star() {
                dir_edges.push(de);
                let sym_node = graph.dir_edge(graph.sym(de)).node();
                if !visited[sym_node.0] {
                    stack.push(sym_node);
                }
            }
        }

        let rightmost = find_rightmost_edge(graph, &dir_edges)?;
        let envelope = dir_edges
            .iter()
            .flat_map(|&de| graph.dir_edge_coords(de).iter().copied())
            .fold(Aabb2::from_point(rightmost.coordinate()), Aabb2::expand_to_include);

        Ok(Self {
            dir_edges,
            nodes,
            rightmost,
            envelope,
        })
    }

    #[inline]
    pub fn dir_edges(&self) -> &[DirEdgeId] {
        &self.dir_edges
    }

    #[inline]
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// The rightmost coordinate of the subgraph.
    #[inline]
    pub fn rightmost_coordinate(&self) -> Point2<f64> {
        self.rightmost.coordinate()
    }

    /// The directed edge whose right side faces the exterior.
    #[inline]
    pub fn rightmost_edge(&self) -> DirEdgeId {
        self.rightmost.edge()
    }

    #[inline]
    pub fn envelope(&self) -> Aabb2<f64> {
        self.envelope
    }

    /// Assigns side depths to every edge, given the depth outside the
    /// subgraph at its rightmost coordinate.
    ///
    /// Nodes are visited breadth first from the rightmost edge. At each node
    /// the depths are carried around the star from an edge whose depths are
    /// already known.
    pub fn compute_depth(&self, graph: &mut PlanarGraph, outside_depth: i32) -> Result<()> {
        let start = self.rightmost_edge();
        graph.set_edge_depths(start, Position::Right, outside_depth)?;
        graph.copy_sym_depths(start)?;

        let mut visited_edges: FxHashSet<DirEdgeId> = FxHashSet::default();
        let mut visited_nodes: FxHashSet<NodeId> = FxHashSet::default();
        let mut queue = VecDeque::new();

        let start_node = graph.dir_edge(start).node();
        queue.push_back(start_node);
        visited_nodes.insert(start_node);
        visited_edges.insert(start);

        while let Some(node) = queue.pop_front() {
            compute_node_depth(graph, node, &mut visited_edges)?;
            for &de in graph.node(node).star() {
                let sym = graph.sym(de);
                if visited_edges.contains(&sym) {
                    continue;
                }
                let adj = graph.dir_edge(sym).node();
                if visited_nodes.insert(adj) {
                    queue.push_back(adj);
                }
            }
        }
        Ok(())
    }

    /// Flags the edges that bound the buffer: interior on the right,
    /// exterior on the left, and not lying inside the area on both sides.
    pub fn find_result_edges(&self, graph: &mut PlanarGraph) {
        for &de in &self.dir_edges {
            let d = graph.dir_edge(de);
            if d.depth(Position::Right) >= 1
                && d.depth(Position::Left) <= 0
                && !d.is_interior_area_edge()
            {
                graph.dir_edge_mut(de).set_in_result(true);
            }
        }
    }
}

fn compute_node_depth(
    graph: &mut PlanarGraph,
    node: NodeId,
    visited: &mut FxHashSet<DirEdgeId>,
) -> Result<()> {
    let start = graph
        .node(node)
        .star()
        .iter()
        .copied()
        .find(|&de| visited.contains(&de) || visited.contains(&graph.sym(de)))
        .ok_or_else(|| {
            BufferError::topology_at(
                "unable to find edge to compute depths",
                graph.node(node).coordinate(),
            )
        })?;

    graph.compute_star_depths(node, start)?;

    let star = graph.node(node).star().to_vec();
    for de in star {
        visited.insert(de);
        graph.copy_sym_depths(de)?;
    }
    Ok(())
}

/// Splits the graph into subgraphs ordered by decreasing rightmost X. Ties
/// keep node order.
pub fn create_subgraphs(graph: &PlanarGraph) -> Result<Vec<BufferSubgraph>> {
    let mut visited = vec![false; graph.node_count()];
    let mut subgraphs = Vec::new();
    for node in graph.nodes_in_order() {
        if !visited[node.0] {
            subgraphs.push(BufferSubgraph::create(graph, node, &mut visited)?);
        }
    }
    subgraphs.sort_by(|a, b| {
        b.rightmost_coordinate()
            .x
            .total_cmp(&a.rightmost_coordinate().x)
    });
    Ok(subgraphs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::depth_locator::SubgraphDepthLocator;
    use crate::graph::{Edge, Label, Location};

    /// A closed ring edge with the interior on its right and its depth delta
    /// derived from the label.
    fn ring(coords: &[(f64, f64)], left: Location, right: Location) -> Edge {
        let pts = coords.iter().map(|&(x, y)| Point2::new(x, y)).collect();
        let label = Label::new_area(0, Location::Boundary, left, right);
        let mut e = Edge::new(pts, label);
        e.set_depth_delta(label.depth_delta());
        e
    }

    fn square(x0: f64, size: f64) -> Vec<(f64, f64)> {
        // Clockwise.
        vec![
            (x0, x0),
            (x0, x0 + size),
            (x0 + size, x0 + size),
            (x0 + size, x0),
            (x0, x0),
        ]
    }

    /// An outer shell, a hole inside it and an island inside the hole.
    fn shell_hole_island() -> Vec<Edge> {
        vec![
            ring(&square(2.0, 2.0), Location::Exterior, Location::Interior),
            ring(&square(0.0, 6.0), Location::Exterior, Location::Interior),
            ring(&square(1.0, 4.0), Location::Interior, Location::Exterior),
        ]
    }

    #[test]
    fn test_nested_rings_are_ordered_outermost_first() {
        let graph = PlanarGraph::from_edges(shell_hole_island());
        let subgraphs = create_subgraphs(&graph).unwrap();
        let xs: Vec<_> = subgraphs.iter().map(|s| s.rightmost_coordinate().x).collect();
        assert_eq!(xs, vec![6.0, 5.0, 4.0]);
    }

    #[test]
    fn test_nested_ring_depths() {
        let mut graph = PlanarGraph::from_edges(shell_hole_island());
        let subgraphs = create_subgraphs(&graph).unwrap();

        let mut outside_depths = Vec::new();
        for (i, sg) in subgraphs.iter().enumerate() {
            let outside = {
                let locator = SubgraphDepthLocator::new(&graph, &subgraphs[..i]);
                locator.depth_at(sg.rightmost_coordinate())
            };
            outside_depths.push(outside);
            sg.compute_depth(&mut graph, outside).unwrap();
            sg.find_result_edges(&mut graph);
        }
        assert_eq!(outside_depths, vec![0, 1, 0]);

        // The hole ring is inside the area on its outer side, so it bounds
        // the result in its reverse direction.
        let hole_forward = graph.dir_edge(DirEdgeId(4));
        assert_eq!(hole_forward.depth(Position::Left), 1);
        assert_eq!(hole_forward.depth(Position::Right), 0);

        let in_result: Vec<_> = (0..graph.dir_edge_count())
            .filter(|&i| graph.dir_edge(DirEdgeId(i)).is_in_result())
            .collect();
        assert_eq!(in_result, vec![0, 2, 5]);
    }

    #[test]
    fn test_envelope_and_members() {
        let graph = PlanarGraph::from_edges(vec![ring(
            &square(0.0, 3.0),
            Location::Exterior,
            Location::Interior,
        )]);
        let subgraphs = create_subgraphs(&graph).unwrap();
        assert_eq!(subgraphs.len(), 1);
        let sg = &subgraphs[0];
        assert_eq!(sg.nodes().len(), 1);
        assert_eq!(sg.dir_edges().len(), 2);
        assert_eq!(sg.envelope().min, Point2::new(0.0, 0.0));
        assert_eq!(sg.envelope().max, Point2::new(3.0, 3.0));
    }
}
