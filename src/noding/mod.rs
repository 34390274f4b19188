//! Noding: splitting curves at their mutual intersections.
//!
//! After noding, segment strings meet only at shared endpoints, which lets
//! them be assembled into a planar graph. The strategy is chosen per buffer
//! attempt: full-precision attempts use the fast noder, reduced-precision
//! attempts snap-round to the attempt's grid.

mod fast;
mod segment_string;
mod snap_round;

pub use segment_string::SegmentString;

use crate::precision::PrecisionModel;

/// Noding strategy for one buffer attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Noder {
    /// Intersect every pair of nearby segments, rounding intersection points
    /// to `precision`.
    Fast { precision: PrecisionModel },
    /// Snap-round all vertices and intersections to a grid of `1 / scale`.
    SnapRounding { scale: f64 },
}

impl Noder {
    /// Splits `strings` at all of their intersections.
    pub fn node(&self, strings: Vec<SegmentString>) -> Vec<SegmentString> {
        match *self {
            Noder::Fast { precision } => fast::node(strings, precision),
            Noder::SnapRounding { scale } => snap_round::node(strings, scale),
        }
    }

    /// The precision model coordinates produced by this noder conform to.
    pub fn precision(&self) -> PrecisionModel {
        match *self {
            Noder::Fast { precision } => precision,
            Noder::SnapRounding { scale } => PrecisionModel::fixed(scale),
        }
    }
}

impl Default for Noder {
    fn default() -> Self {
        Noder::Fast {
            precision: PrecisionModel::Floating,
        }
    }
}
