//! Polygon assembly from the result edges of a planar graph.
//!
//! Directed edges flagged as bounding the result are linked around every
//! node into maximal rings. A maximal ring that touches itself at a node is
//! split into minimal rings there. Clockwise rings become shells and
//! counter-clockwise rings holes; holes that do not come out of a split ring
//! are assigned to the smallest shell containing them.

use super::core::{point_in_ring, point_not_in_list};
use crate::bounds::Aabb2;
use crate::error::{BufferError, Result};
use crate::geometry::to_line_string;
use crate::graph::{DirEdgeId, NodeId, PlanarGraph};
use crate::primitives::Point2;
use crate::tolerance::ring_is_ccw;
use geo_types::Polygon;

/// Linking walks a node star alternating between looking for an incoming
/// edge and the outgoing edge it continues into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LinkState {
    ScanningForIncoming,
    LinkingToOutgoing,
}

/// A closed ring of directed edges.
#[derive(Debug, Clone)]
struct EdgeRing {
    id: usize,
    edges: Vec<DirEdgeId>,
    pts: Vec<Point2<f64>>,
    envelope: Option<Aabb2<f64>>,
    is_hole: bool,
}

impl EdgeRing {
    fn first_point(&self) -> Option<Point2<f64>> {
        self.pts.first().copied()
    }
}

/// A shell ring together with the holes assigned to it.
#[derive(Debug, Clone)]
struct Shell {
    ring: EdgeRing,
    holes: Vec<EdgeRing>,
}

/// Assembles polygons from the result edges of successive subgraphs.
#[derive(Debug, Default)]
pub struct PolygonBuilder {
    next: Vec<Option<DirEdgeId>>,
    next_min: Vec<Option<DirEdgeId>>,
    max_ring: Vec<Option<usize>>,
    min_ring: Vec<Option<usize>>,
    ring_count: usize,
    shells: Vec<Shell>,
}

impl PolygonBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the result edges among `dir_edges`, linking them at `nodes`.
    pub fn add(
        &mut self,
        graph: &PlanarGraph,
        dir_edges: &[DirEdgeId],
        nodes: &[NodeId],
    ) -> Result<()> {
        self.ensure_capacity(graph.dir_edge_count());

        for &node in nodes {
            self.link_result_directed_edges(graph, node)?;
        }

        let max_rings = self.build_maximal_rings(graph, dir_edges)?;
        let mut free_holes = Vec::new();
        let mut rings = Vec::new();
        for ring in max_rings {
            if self.max_node_degree(graph, &ring) > 2 {
                self.link_minimal_directed_edges(graph, &ring)?;
                let min_rings = self.build_minimal_rings(graph, &ring)?;
                match find_shell(&min_rings)? {
                    Some(shell_index) => {
                        let mut shell = None;
                        let mut holes = Vec::new();
                        for (i, r) in min_rings.into_iter().enumerate() {
                            if i == shell_index {
                                shell = Some(r);
                            } else if r.is_hole {
                                holes.push(r);
                            }
                        }
                        if let Some(ring) = shell {
                            self.shells.push(Shell { ring, holes });
                        }
                    }
                    None => free_holes.extend(min_rings),
                }
            } else {
                rings.push(ring);
            }
        }

        for ring in rings {
            if ring.is_hole {
                free_holes.push(ring);
            } else {
                self.shells.push(Shell {
                    ring,
                    holes: Vec::new(),
                });
            }
        }
        self.place_free_holes(free_holes)
    }

    /// The assembled polygons, one per shell.
    pub fn polygons(self) -> Vec<Polygon<f64>> {
        self.shells
            .into_iter()
            .map(|shell| {
                Polygon::new(
                    to_line_string(&shell.ring.pts),
                    shell.holes.iter().map(|h| to_line_string(&h.pts)).collect(),
                )
            })
            .collect()
    }

    fn ensure_capacity(&mut self, n: usize) {
        if self.next.len() < n {
            self.next.resize(n, None);
            self.next_min.resize(n, None);
            self.max_ring.resize(n, None);
            self.min_ring.resize(n, None);
        }
    }

    /// Links every incoming result edge at `node` to the next outgoing
    /// result edge counter-clockwise.
    fn link_result_directed_edges(&mut self, graph: &PlanarGraph, node: NodeId) -> Result<()> {
        let area_edges = graph.result_area_edges(node);
        let mut first_out = None;
        let mut incoming = None;
        let mut state = LinkState::ScanningForIncoming;

        for &next_out in &area_edges {
            let next_in = graph.sym(next_out);
            let out_de = graph.dir_edge(next_out);
            if !out_de.label().is_area() {
                continue;
            }
            if first_out.is_none() && out_de.is_in_result() {
                first_out = Some(next_out);
            }
            match state {
                LinkState::ScanningForIncoming => {
                    if !graph.dir_edge(next_in).is_in_result() {
                        continue;
                    }
                    incoming = Some(next_in);
                    state = LinkState::LinkingToOutgoing;
                }
                LinkState::LinkingToOutgoing => {
                    if !out_de.is_in_result() {
                        continue;
                    }
                    if let Some(inc) = incoming {
                        self.next[inc.0] = Some(next_out);
                    }
                    state = LinkState::ScanningForIncoming;
                }
            }
        }

        if state == LinkState::LinkingToOutgoing {
            let Some(first) = first_out else {
                return Err(BufferError::topology_at(
                    "no outgoing dirEdge found",
                    graph.node(node).coordinate(),
                ));
            };
            if let Some(inc) = incoming {
                self.next[inc.0] = Some(first);
            }
        }
        Ok(())
    }

    /// Links the edges of one maximal ring at a node so that each minimal
    /// ring turns as sharply as possible, walking the star clockwise.
    fn link_minimal_at_node(
        &mut self,
        graph: &PlanarGraph,
        node: NodeId,
        ring: usize,
    ) -> Result<()> {
        let area_edges = graph.result_area_edges(node);
        let mut first_out = None;
        let mut incoming = None;
        let mut state = LinkState::ScanningForIncoming;

        for &next_out in area_edges.iter().rev() {
            let next_in = graph.sym(next_out);
            if first_out.is_none() && self.max_ring[next_out.0] == Some(ring) {
                first_out = Some(next_out);
            }
            match state {
                LinkState::ScanningForIncoming => {
                    if self.max_ring[next_in.0] != Some(ring) {
                        continue;
                    }
                    incoming = Some(next_in);
                    state = LinkState::LinkingToOutgoing;
                }
                LinkState::LinkingToOutgoing => {
                    if self.max_ring[next_out.0] != Some(ring) {
                        continue;
                    }
                    if let Some(inc) = incoming {
                        self.next_min[inc.0] = Some(next_out);
                    }
                    state = LinkState::ScanningForIncoming;
                }
            }
        }

        if state == LinkState::LinkingToOutgoing {
            let (Some(first), Some(inc)) = (first_out, incoming) else {
                return Err(BufferError::Invariant(
                    "found null for first outgoing dirEdge".into(),
                ));
            };
            self.next_min[inc.0] = Some(first);
        }
        Ok(())
    }

    fn link_minimal_directed_edges(&mut self, graph: &PlanarGraph, ring: &EdgeRing) -> Result<()> {
        for &de in &ring.edges {
            self.link_minimal_at_node(graph, graph.dir_edge(de).node(), ring.id)?;
        }
        Ok(())
    }

    fn build_maximal_rings(
        &mut self,
        graph: &PlanarGraph,
        dir_edges: &[DirEdgeId],
    ) -> Result<Vec<EdgeRing>> {
        let mut rings = Vec::new();
        for &de in dir_edges {
            let d = graph.dir_edge(de);
            if d.is_in_result() && d.label().is_area() && self.max_ring[de.0].is_none() {
                let id = self.next_ring_id();
                rings.push(build_ring(graph, de, id, &self.next, &mut self.max_ring)?);
            }
        }
        Ok(rings)
    }

    fn build_minimal_rings(
        &mut self,
        graph: &PlanarGraph,
        ring: &EdgeRing,
    ) -> Result<Vec<EdgeRing>> {
        let mut rings = Vec::new();
        for &de in &ring.edges {
            if self.min_ring[de.0].is_none() {
                let id = self.next_ring_id();
                rings.push(build_ring(graph, de, id, &self.next_min, &mut self.min_ring)?);
            }
        }
        Ok(rings)
    }

    fn next_ring_id(&mut self) -> usize {
        let id = self.ring_count;
        self.ring_count += 1;
        id
    }

    /// Twice the largest number of outgoing edges of `ring` at any of its
    /// nodes. A ring that passes through a node more than once has degree
    /// above two there.
    fn max_node_degree(&self, graph: &PlanarGraph, ring: &EdgeRing) -> usize {
        let degree = ring
            .edges
            .iter()
            .map(|&de| {
                let node = graph.dir_edge(de).node();
                graph
                    .node(node)
                    .star()
                    .iter()
                    .filter(|&&out| self.max_ring[out.0] == Some(ring.id))
                    .count()
            })
            .max()
            .unwrap_or(0);
        degree * 2
    }

    /// Assigns every free hole to the smallest shell that contains it.
    fn place_free_holes(&mut self, holes: Vec<EdgeRing>) -> Result<()> {
        for hole in holes {
            match find_containing_shell(&hole, &self.shells) {
                Some(index) => self.shells[index].holes.push(hole),
                None => {
                    let err = match hole.first_point() {
                        Some(p) => BufferError::topology_at("unable to assign hole to a shell", p),
                        None => BufferError::topology("unable to assign hole to a shell"),
                    };
                    return Err(err);
                }
            }
        }
        Ok(())
    }
}

/// Follows `next` from `start` until the ring closes, recording the ring in
/// `ring_of` and collecting its coordinates.
fn build_ring(
    graph: &PlanarGraph,
    start: DirEdgeId,
    id: usize,
    next: &[Option<DirEdgeId>],
    ring_of: &mut [Option<usize>],
) -> Result<EdgeRing> {
    let mut edges = Vec::new();
    let mut pts = Vec::new();
    let mut de = start;
    loop {
        let d = graph.dir_edge(de);
        if ring_of[de.0] == Some(id) {
            return Err(BufferError::topology_at(
                "Directed Edge visited twice during ring-building",
                d.coordinate(),
            ));
        }
        edges.push(de);
        add_points(&mut pts, graph.dir_edge_coords(de), d.is_forward(), de == start);
        ring_of[de.0] = Some(id);

        de = next[de.0].ok_or_else(|| {
            BufferError::topology_at("found null Directed Edge", d.coordinate())
        })?;
        if de == start {
            break;
        }
    }
    Ok(EdgeRing {
        id,
        edges,
        envelope: Aabb2::from_points(pts.iter().copied()),
        is_hole: ring_is_ccw(&pts),
        pts,
    })
}

/// Appends edge coordinates in traversal order. Only the first edge of a
/// ring contributes its start point.
fn add_points(pts: &mut Vec<Point2<f64>>, edge_pts: &[Point2<f64>], forward: bool, first: bool) {
    let skip = usize::from(!first);
    if forward {
        pts.extend(edge_pts.iter().skip(skip));
    } else {
        pts.extend(edge_pts.iter().rev().skip(skip));
    }
}

/// Index of the only non-hole ring, if any.
fn find_shell(rings: &[EdgeRing]) -> Result<Option<usize>> {
    let mut shell = None;
    for (i, ring) in rings.iter().enumerate() {
        if ring.is_hole {
            continue;
        }
        if shell.is_some() {
            return Err(BufferError::Invariant(
                "found two shells in minimal edge ring list".into(),
            ));
        }
        shell = Some(i);
    }
    Ok(shell)
}

/// The smallest shell whose envelope strictly contains the hole's and which
/// contains a hole vertex that is not on the shell itself.
fn find_containing_shell(hole: &EdgeRing, shells: &[Shell]) -> Option<usize> {
    let hole_env = hole.envelope?;
    let mut best: Option<(usize, Aabb2<f64>)> = None;
    for (i, shell) in shells.iter().enumerate() {
        let Some(shell_env) = shell.ring.envelope else {
            continue;
        };
        if shell_env == hole_env || !shell_env.contains(hole_env) {
            continue;
        }
        let Some(test) = point_not_in_list(&hole.pts, &shell.ring.pts) else {
            continue;
        };
        if !point_in_ring(test, &shell.ring.pts) {
            continue;
        }
        match best {
            Some((_, env)) if !env.contains(shell_env) => {}
            _ => best = Some((i, shell_env)),
        }
    }
    best.map(|(i, _)| i)
}
