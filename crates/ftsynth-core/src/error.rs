//! Error types for FTSynth.

use thiserror::Error;

/// Unified error type for fault-tolerant circuit synthesis.
#[derive(Error, Debug)]
pub enum FtSynthError {
    // ============ Chip Model Errors ============
    /// Chip adjacency is not symmetric, or the chip is disconnected over
    /// the qubits in use.
    #[error("Invalid chip: {0}")]
    InvalidChip(String),

    // ============ Mapping Errors ============
    /// More logical qubits than physical qubits, or an infeasible fixed
    /// pin was supplied to the initial mapping chooser.
    #[error("Invalid mapping: {0}")]
    InvalidMapping(String),

    /// A candidate or emitted SWAP would act on non-adjacent physical
    /// qubits. Reaching this indicates an internal invariant breach.
    #[error("Non-adjacent swap requested: physical {0} and {1} are not connected")]
    NonAdjacentSwap(usize, usize),

    // ============ Traversal Errors ============
    /// `data_swap_count` exceeded `allowable_data_interaction` during a
    /// single traversal.
    #[error("Data interaction guard exceeded: {count} > {allowed}")]
    DataInteractionExceeded {
        /// Observed active-active swap count.
        count: usize,
        /// Configured ceiling.
        allowed: usize,
    },

    /// A data-typed logical qubit did not return to its home physical
    /// index after a traversal that contained Move instructions.
    #[error("Homebase violated for logical qubit '{0}': expected physical {1}, found {2}")]
    HomebaseViolated(String, usize, usize),

    /// Post-synthesis validation found a 2-qubit gate on non-adjacent
    /// physical qubits.
    #[error("Checkup failed at instruction {index}: physical {p1} and {p2} are not connected")]
    CheckupFailed {
        /// Index of the offending instruction in the emitted sequence.
        index: usize,
        p1: usize,
        p2: usize,
    },

    /// A traversal round did not finish within its wall-clock budget.
    /// Recovered internally by the synthesis driver; never escapes a
    /// top-level `synthesize` call under normal operation.
    #[error("Traversal timed out after {0:?}")]
    Timeout(std::time::Duration),

    // ============ Program Model Errors ============
    /// A gate record referenced a logical qubit name that is absent from
    /// the current mapping.
    #[error("Unknown logical qubit: '{0}'")]
    UnknownQubit(String),

    // ============ Config Errors ============
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    // ============ I/O Errors ============
    /// JSON serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for FTSynth operations.
pub type Result<T> = std::result::Result<T, FtSynthError>;

impl FtSynthError {
    /// Creates an `InvalidChip` error with the given message.
    pub fn invalid_chip(msg: impl Into<String>) -> Self {
        Self::InvalidChip(msg.into())
    }

    /// Creates an `InvalidMapping` error with the given message.
    pub fn invalid_mapping(msg: impl Into<String>) -> Self {
        Self::InvalidMapping(msg.into())
    }

    /// Creates a `Config` error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
