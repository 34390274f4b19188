//! Locating the rightmost edge of a connected subgraph.
//!
//! The exterior of the whole arrangement is known to lie to the right of the
//! rightmost coordinate, so the directed edge found here seeds depth
//! assignment for its subgraph.

use crate::error::{BufferError, Result};
use crate::graph::{DirEdgeId, PlanarGraph, Position};
use crate::primitives::Point2;
use crate::tolerance::{orientation_index, Orientation};

/// The rightmost directed edge of a set of edges, oriented so that its right
/// side faces the exterior.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RightmostEdge {
    edge: DirEdgeId,
    coordinate: Point2<f64>,
}

impl RightmostEdge {
    /// Directed edge whose right side is exterior to its subgraph.
    #[inline]
    pub fn edge(&self) -> DirEdgeId {
        self.edge
    }

    /// The rightmost coordinate.
    #[inline]
    pub fn coordinate(&self) -> Point2<f64> {
        self.coordinate
    }
}

/// Running maximum: forward edge, vertex index and coordinate.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    de: DirEdgeId,
    index: usize,
    coord: Point2<f64>,
}

/// Finds the rightmost edge among `dir_edges`.
pub fn find_rightmost_edge(graph: &PlanarGraph, dir_edges: &[DirEdgeId]) -> Result<RightmostEdge> {
    let mut best: Option<Candidate> = None;
    for &de in dir_edges {
        if graph.dir_edge(de).is_forward() {
            check_for_rightmost_coordinate(graph, de, &mut best);
        }
    }
    let mut min = best.ok_or_else(|| {
        BufferError::Invariant("no forward directed edge in subgraph".into())
    })?;

    if min.index == 0 && min.coord != graph.dir_edge(min.de).coordinate() {
        return Err(BufferError::Invariant(
            "inconsistency in rightmost processing".into(),
        ));
    }
    if min.index == 0 {
        rightmost_edge_at_node(graph, &mut min)?;
    } else {
        rightmost_edge_at_vertex(graph, &mut min)?;
    }

    let oriented = match rightmost_side(graph, &mut min) {
        Some(Position::Left) => graph.sym(min.de),
        _ => min.de,
    };
    Ok(RightmostEdge {
        edge: oriented,
        coordinate: min.coord,
    })
}

/// Updates `best` with every vertex but the last of a forward edge. Ties
/// keep the earlier vertex.
fn check_for_rightmost_coordinate(
    graph: &PlanarGraph,
    de: DirEdgeId,
    best: &mut Option<Candidate>,
) {
    let pts = graph.dir_edge_coords(de);
    for (i, &p) in pts[..pts.len() - 1].iter().enumerate() {
        let better = match best {
            Some(b) => p.x > b.coord.x,
            None => true,
        };
        if better {
            *best = Some(Candidate {
                de,
                index: i,
                coord: p,
            });
        }
    }
}

/// The rightmost point is a node: pick the star edge that has the exterior
/// on its right.
fn rightmost_edge_at_node(graph: &PlanarGraph, min: &mut Candidate) -> Result<()> {
    let node = graph.dir_edge(min.de).node();
    let de = graph
        .rightmost_star_edge(node)?
        .ok_or_else(|| BufferError::Invariant("rightmost node has an empty star".into()))?;
    if graph.dir_edge(de).is_forward() {
        min.de = de;
    } else {
        min.de = graph.sym(de);
        min.index = graph.dir_edge_coords(min.de).len() - 1;
    }
    Ok(())
}

/// The rightmost point is inside an edge: pick the adjacent segment that
/// lies on the outside of the turn.
fn rightmost_edge_at_vertex(graph: &PlanarGraph, min: &mut Candidate) -> Result<()> {
    let pts = graph.dir_edge_coords(min.de);
    if min.index == 0 || min.index + 1 >= pts.len() {
        return Err(BufferError::Invariant(
            "rightmost point expected to be interior vertex of edge".into(),
        ));
    }
    let p = min.coord;
    let prev = pts[min.index - 1];
    let next = pts[min.index + 1];
    let orientation = orientation_index(p, next, prev);
    let use_prev = (prev.y < p.y && next.y < p.y && orientation == Orientation::CounterClockwise)
        || (prev.y > p.y && next.y > p.y && orientation == Orientation::Clockwise);
    if use_prev {
        min.index -= 1;
    }
    Ok(())
}

/// Side of the edge facing right at the chosen segment, falling back to the
/// previous segment when it is horizontal.
fn rightmost_side(graph: &PlanarGraph, min: &mut Candidate) -> Option<Position> {
    let side = rightmost_side_of_segment(graph, min.de, Some(min.index))
        .or_else(|| rightmost_side_of_segment(graph, min.de, min.index.checked_sub(1)));
    if side.is_none() {
        // Both segments are horizontal; recompute the rightmost coordinate
        // from this edge alone.
        let mut rescan = None;
        check_for_rightmost_coordinate(graph, min.de, &mut rescan);
        if let Some(c) = rescan {
            *min = c;
        }
    }
    side
}

/// An upward segment has the exterior on its right, a downward one on its
/// left. Horizontal segments and out-of-range indices are undecided.
fn rightmost_side_of_segment(
    graph: &PlanarGraph,
    de: DirEdgeId,
    index: Option<usize>,
) -> Option<Position> {
    let pts = graph.dir_edge_coords(de);
    let i = index?;
    if i + 1 >= pts.len() {
        return None;
    }
    let (a, b) = (pts[i], pts[i + 1]);
    if a.y == b.y {
        None
    } else if a.y < b.y {
        Some(Position::Right)
    } else {
        Some(Position::Left)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Edge, Label, Location};

    fn edge(coords: &[(f64, f64)]) -> Edge {
        let pts = coords.iter().map(|&(x, y)| Point2::new(x, y)).collect();
        Edge::new(
            pts,
            Label::new_area(0, Location::Boundary, Location::Exterior, Location::Interior),
        )
    }

    fn all(graph: &PlanarGraph) -> Vec<DirEdgeId> {
        (0..graph.dir_edge_count()).map(DirEdgeId).collect()
    }

    #[test]
    fn test_clockwise_square_ring() {
        let graph = PlanarGraph::from_edges(vec![edge(&[
            (0.0, 0.0),
            (0.0, 2.0),
            (2.0, 2.0),
            (2.0, 0.0),
            (0.0, 0.0),
        ])]);
        let r = find_rightmost_edge(&graph, &all(&graph)).unwrap();
        // (2, 2) is the first vertex with the largest x. The segment leaving
        // it points down, so the exterior is on the left of the forward edge
        // and the reverse edge is returned.
        assert_eq!(r.coordinate(), Point2::new(2.0, 2.0));
        assert_eq!(r.edge(), DirEdgeId(1));
    }

    #[test]
    fn test_counter_clockwise_square_ring() {
        let graph = PlanarGraph::from_edges(vec![edge(&[
            (0.0, 0.0),
            (2.0, 0.0),
            (2.0, 2.0),
            (0.0, 2.0),
            (0.0, 0.0),
        ])]);
        let r = find_rightmost_edge(&graph, &all(&graph)).unwrap();
        assert_eq!(r.coordinate(), Point2::new(2.0, 0.0));
        // The segment (2, 0) -> (2, 2) points up, so the exterior is on the
        // right of the forward edge.
        assert_eq!(r.edge(), DirEdgeId(0));
    }

    #[test]
    fn test_rightmost_at_node() {
        // Two edges meet at the rightmost node (3, 0).
        let graph = PlanarGraph::from_edges(vec![
            edge(&[(3.0, 0.0), (0.0, 2.0), (0.0, 0.0)]),
            edge(&[(0.0, 0.0), (0.0, -2.0), (3.0, 0.0)]),
        ]);
        let r = find_rightmost_edge(&graph, &all(&graph)).unwrap();
        assert_eq!(r.coordinate(), Point2::new(3.0, 0.0));
        // The star edge leaving (3, 0) upwards has the exterior on its right.
        assert_eq!(r.edge(), DirEdgeId(0));
        assert_eq!(graph.dir_edge(r.edge()).direction_point(), Point2::new(0.0, 2.0));
    }
}
