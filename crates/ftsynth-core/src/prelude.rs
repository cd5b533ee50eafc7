//! Prelude module for convenient imports.
//!
//! # Usage
//!
//! ```rust
//! use ftsynth_core::prelude::*;
//! ```

pub use crate::config::{
    CostStrategy, InitialMappingOption, OptimalCriterion, SynthesisOptions,
};
pub use crate::error::{FtSynthError, Result};
pub use crate::types::{
    Chip, ChipDimension, Dag, DistanceMatrix, GateId, GateKind, GateRecord, MoveTarget, NodeId,
    QubitMapping, QubitStatus, Role,
};
