//! Synthesis configuration for FTSynth.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Cost evaluator strategy used by the traversal engine's SWAP selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CostStrategy {
    /// Nearest-neighbor cost: plain front-layer distance sum.
    Nnc,
    /// Look-ahead-and-parallelism: front-layer cost plus a weighted
    /// extended-set cost, scaled by per-qubit decay.
    Lap,
}

impl Default for CostStrategy {
    fn default() -> Self {
        CostStrategy::Lap
    }
}

/// Criterion used by the synthesis driver to pick the best completed
/// round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimalCriterion {
    /// Time-stratified layering of the emitted sequence.
    CircuitDepth,
    /// Raw emitted instruction count.
    NumberGates,
}

impl Default for OptimalCriterion {
    fn default() -> Self {
        OptimalCriterion::CircuitDepth
    }
}

/// Policy used by the initial mapping chooser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "policy")]
pub enum InitialMappingOption {
    /// Uniform random injection of logical names into physical indices.
    Random,
    /// Randomize within strides of `period`, giving approximate spatial
    /// locality for repeated-structure programs.
    PeriodicRandom {
        /// Stride length.
        period: usize,
    },
    /// Caller-supplied entries that must be preserved; the remainder is
    /// filled randomly avoiding collisions.
    Fixed {
        /// logical name -> physical index pins.
        pins: HashMap<String, usize>,
    },
}

impl Default for InitialMappingOption {
    fn default() -> Self {
        InitialMappingOption::Random
    }
}

/// Synthesis options, mirroring the external `Synthesis options` shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisOptions {
    /// Cost evaluator strategy.
    pub cost: CostStrategy,
    /// Extended-set look-ahead depth for LAP, in successor hops.
    pub lap_depth: usize,
    /// Per-swap decay increment added to a qubit's decay counter.
    pub decay_factor: f64,
    /// Weight applied to the LAP extended-set cost term.
    pub extended_set_weight: f64,
    /// Number of forward/backward/forward refinement rounds to attempt.
    pub iteration: usize,
    /// Criterion used to select the best completed round.
    pub optimal_criterion: OptimalCriterion,
    /// Initial mapping policy (ignored when a fixed mapping is supplied
    /// directly to the driver).
    pub initial_mapping_option: InitialMappingOption,
    /// Whether SWAP may be emitted as a native instruction (`true`) or
    /// must be decomposed into three CNOTs at emission time (`false`).
    pub allow_swap: bool,
    /// Maximum number of active-active SWAPs permitted in one traversal.
    pub allowable_data_interaction: usize,
    /// Whether data qubits must be routed back to their home position at
    /// the end of traversal.
    pub moveback: bool,
    /// Optional caller-supplied home physical index per logical name,
    /// used by move-back resolution in place of the qubit's initial
    /// mapping entry.
    pub homebase: Option<HashMap<String, usize>>,
    /// Per-traversal wall-clock budget. `None` selects the default
    /// derived from the program's CNOT count (see
    /// [`SynthesisOptions::default_budget`]).
    pub time_budget: Option<Duration>,
    /// Seed for the tie-breaking PRNG. Recorded in the output's
    /// `analysis` block for reproducibility. `None` derives a seed from
    /// entropy once per synthesis call.
    pub rng_seed: Option<u64>,
    /// Run independent refinement rounds concurrently across a `rayon`
    /// thread pool instead of sequentially. Off by default: the
    /// single-round restart-on-timeout semantics in the distilled
    /// design are defined sequentially.
    pub parallel_rounds: bool,
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        Self {
            cost: CostStrategy::default(),
            lap_depth: 1,
            decay_factor: 0.1,
            extended_set_weight: 0.5,
            iteration: 10,
            optimal_criterion: OptimalCriterion::default(),
            initial_mapping_option: InitialMappingOption::default(),
            allow_swap: true,
            allowable_data_interaction: 0,
            moveback: false,
            homebase: None,
            time_budget: None,
            rng_seed: None,
            parallel_rounds: false,
        }
    }
}

impl SynthesisOptions {
    /// Creates options with every default value.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads options from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(Into::into)
    }

    /// Serializes options to a pretty JSON string.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(Into::into)
    }

    /// Default per-traversal wall-clock budget: one second per CNOT gate
    /// in the program, falling back to 10 seconds for a CNOT-free
    /// program.
    pub fn default_budget(&self, cnot_count: usize) -> Duration {
        if let Some(budget) = self.time_budget {
            return budget;
        }
        if cnot_count == 0 {
            Duration::from_secs(10)
        } else {
            Duration::from_secs(cnot_count as u64)
        }
    }
}
