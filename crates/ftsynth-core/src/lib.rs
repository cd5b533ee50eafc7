//! # FTSynth Core
//!
//! Data model for fault-tolerant quantum circuit routing.
//!
//! This crate provides the chip topology, program/gate record model,
//! logical-qubit role derivation, dependency graph, and the mutable
//! logical/physical qubit mapping consumed by the `ftsynth-route`
//! traversal engine. It owns no routing logic itself — see
//! `ftsynth-route` for the SWAP-insertion search and synthesis driver.
//!
//! ## Example
//!
//! ```rust
//! use ftsynth_core::prelude::*;
//!
//! let chip = Chip::new(3, vec![vec![1], vec![0, 2], vec![1]], None).unwrap();
//! let distance = chip.distance_matrix();
//! assert_eq!(distance.get(0, 2), 2);
//! ```

pub mod config;
pub mod error;
pub mod prelude;
pub mod types;

pub use error::{FtSynthError, Result};
pub use types::{
    Chip, ChipDimension, Dag, DistanceMatrix, GateId, GateKind, GateRecord, MoveTarget, NodeId,
    QubitMapping, QubitStatus, Role,
};
