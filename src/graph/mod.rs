//! Topology graph of noded offset curves.
//!
//! Curves are turned into [`Edge`]s carrying a [`Label`] and a depth delta,
//! deduplicated through an [`EdgeList`], and assembled into a
//! [`PlanarGraph`] whose nodes keep their incident directed edges in angular
//! order.

mod edge;
mod label;
mod planar;

pub use edge::{Edge, EdgeList};
pub use label::{Label, Location, Position, TopologyLocation};
pub use planar::{
    DirEdgeId, DirectedEdge, EdgeId, Node, NodeId, PlanarGraph, Quadrant, NULL_DEPTH,
};
