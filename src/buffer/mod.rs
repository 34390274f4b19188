//! Buffer computation.
//!
//! [`BufferOp`] is the entry point: it validates arguments and drives
//! [`BufferBuilder`] through a ladder of precision models until one attempt
//! yields a consistent topology. The remaining modules are the stages of a
//! single attempt, from offset curve generation to depth labelling.

mod accumulator;
mod builder;
mod curve_builder;
mod curve_set;
mod depth_locator;
mod op;
mod parameters;
mod rightmost;
mod segment_generator;
mod subgraph;

pub use accumulator::CurveAccumulator;
pub use builder::BufferBuilder;
pub use curve_builder::OffsetCurveBuilder;
pub use curve_set::OffsetCurveSetBuilder;
pub use depth_locator::SubgraphDepthLocator;
pub use op::{
    attempt_plans, precision_scale_factor, run_attempts, AttemptPlan, AttemptStage, BufferOp,
    MAX_PRECISION_DIGITS,
};
pub use parameters::{BufferParameters, EndCapStyle, JoinStyle};
pub use rightmost::{find_rightmost_edge, RightmostEdge};
pub use segment_generator::OffsetSegmentGenerator;
pub use subgraph::{create_subgraphs, BufferSubgraph};
