//! Robust geometric predicates.
//!
//! Orientation is decided exactly (a filtered determinant with a
//! double-double fallback); segment intersection is classified with the same
//! predicate so that topology derived from it stays consistent.

mod intersection;
mod predicates;

pub use intersection::{lines_intersection, IntersectionKind, LineIntersection, LineIntersector};
pub use predicates::{orientation_index, ring_is_ccw, Orientation};
