//! Ring measures and polygon assembly.
//!
//! [`PolygonBuilder`] turns the result edges of a labelled planar graph into
//! `geo-types` polygons; the ring helpers are shared with curve generation.

mod builder;
mod core;

pub use builder::PolygonBuilder;
pub use core::{locate_in_ring, point_in_ring, point_not_in_list, ring_signed_area};
