//! A single buffer attempt at a fixed precision.
//!
//! Offset curves are generated for every component, noded, merged into a
//! planar graph and split into connected subgraphs. Subgraphs are labelled
//! with depths from the outside in, and the edges separating depth 0 from
//! depth 1 are assembled into polygons.

use super::curve_builder::OffsetCurveBuilder;
use super::curve_set::OffsetCurveSetBuilder;
use super::depth_locator::SubgraphDepthLocator;
use super::parameters::BufferParameters;
use super::subgraph::{create_subgraphs, BufferSubgraph};
use crate::error::{BufferError, Result};
use crate::geometry::{build_geometry, empty_polygon};
use crate::graph::{Edge, EdgeList, PlanarGraph};
use crate::noding::{Noder, SegmentString};
use crate::polygon::PolygonBuilder;
use crate::precision::PrecisionModel;
use geo_types::Geometry;
use tracing::trace;

/// Runs the buffer pipeline once with a given precision model and noder.
///
/// Topology failures are returned to the caller, which may retry at a
/// coarser precision; see [`BufferOp`](super::BufferOp).
#[derive(Debug, Clone, Copy)]
pub struct BufferBuilder {
    params: BufferParameters,
    precision: PrecisionModel,
    noder: Option<Noder>,
}

impl BufferBuilder {
    pub fn new(params: BufferParameters) -> Self {
        Self {
            params,
            precision: PrecisionModel::Floating,
            noder: None,
        }
    }

    /// Sets the precision model for generated curve vertices. Unless a noder
    /// is set explicitly, intersections are rounded to it as well.
    pub fn with_precision_model(mut self, precision: PrecisionModel) -> Self {
        self.precision = precision;
        self
    }

    pub fn with_noder(mut self, noder: Noder) -> Self {
        self.noder = Some(noder);
        self
    }

    fn noder(&self) -> Noder {
        self.noder.unwrap_or(Noder::Fast {
            precision: self.precision,
        })
    }

    /// Computes the buffer of `geometry` by `distance`.
    pub fn buffer(&self, geometry: &Geometry<f64>, distance: f64) -> Result<Geometry<f64>> {
        check_distance(distance)?;
        self.params.validate()?;

        let curve_builder = OffsetCurveBuilder::new(self.precision, self.params);
        let curves = OffsetCurveSetBuilder::new(geometry, distance, curve_builder).curves();
        if curves.is_empty() {
            return Ok(empty_polygon());
        }
        let curve_count = curves.len();

        let noded = self.noder().node(curves);
        let edges = compute_noded_edges(noded);
        trace!(
            curves = curve_count,
            edges = edges.len(),
            "offset curves noded"
        );

        let mut graph = PlanarGraph::from_edges(edges.into_edges());
        let subgraphs = create_subgraphs(&graph)?;
        let mut polygon_builder = PolygonBuilder::new();
        build_subgraphs(&subgraphs, &mut graph, &mut polygon_builder)?;

        let polygons = polygon_builder.polygons();
        trace!(
            subgraphs = subgraphs.len(),
            polygons = polygons.len(),
            "buffer polygons assembled"
        );
        Ok(build_geometry(polygons))
    }
}

/// Rejects distances that cannot produce a buffer.
pub(crate) fn check_distance(distance: f64) -> Result<()> {
    if distance.is_finite() {
        Ok(())
    } else {
        Err(BufferError::InvalidInput(format!(
            "buffer distance must be finite, got {distance}"
        )))
    }
}

/// Builds deduplicated edges from noded curves, dropping collapsed ones.
fn compute_noded_edges(noded: Vec<SegmentString>) -> EdgeList {
    let mut edges = EdgeList::new();
    for ss in noded {
        let (pts, label) = ss.into_parts();
        if pts.len() < 2 || (pts.len() == 2 && pts[0] == pts[1]) {
            continue;
        }
        insert_unique_edge(&mut edges, Edge::new(pts, label));
    }
    edges
}

/// Adds `edge`, or merges it into an existing edge with the same
/// coordinates. A reversed duplicate has its label flipped before merging.
/// The merged edge's depth delta is the sum of all contributions.
pub(crate) fn insert_unique_edge(edges: &mut EdgeList, edge: Edge) {
    match edges.find_equal(&edge) {
        Some(id) => {
            let existing = edges.get_mut(id);
            let mut label = *edge.label();
            if !existing.is_pointwise_equal(&edge) {
                label.flip();
            }
            existing.label_mut().merge(&label);
            let delta = existing.depth_delta() + label.depth_delta();
            existing.set_depth_delta(delta);
        }
        None => {
            let delta = edge.label().depth_delta();
            let id = edges.add(edge);
            edges.get_mut(id).set_depth_delta(delta);
        }
    }
}

/// Labels subgraphs in order, each one seeing only those processed before
/// it, and hands their result edges to the polygon builder.
fn build_subgraphs(
    subgraphs: &[BufferSubgraph],
    graph: &mut PlanarGraph,
    polygon_builder: &mut PolygonBuilder,
) -> Result<()> {
    for (i, subgraph) in subgraphs.iter().enumerate() {
        let outside_depth = SubgraphDepthLocator::new(graph, &subgraphs[..i])
            .depth_at(subgraph.rightmost_coordinate());
        subgraph.compute_depth(graph, outside_depth)?;
        subgraph.find_result_edges(graph);
        polygon_builder.add(graph, subgraph.dir_edges(), subgraph.nodes())?;
    }
    Ok(())
}
