//! # FTSynth Route
//!
//! The mapping search and SWAP-insertion routing engine for
//! fault-tolerant circuit synthesis: dependency-graph-driven traversal,
//! the NNC/LAP cost evaluators, the forward/backward/forward synthesis
//! driver, redundancy cancellation, and post-synthesis checkup.
//!
//! Built on top of `ftsynth-core`'s chip/program/mapping data model; see
//! that crate for the types this engine consumes.

pub mod cancellation;
pub mod checkup;
pub mod cost;
pub mod driver;
pub mod engine;
pub mod initial_mapping;
pub mod physical_op;

pub use cost::{DecayTable, MoveTargets};
pub use driver::{synthesize, Analysis, CheckupStatus, SynthesisOutput};
pub use engine::{traverse, CostStrategy, Direction, TraversalOptions, TraversalOutput};
pub use initial_mapping::choose_initial_mapping;
pub use physical_op::PhysicalOp;
