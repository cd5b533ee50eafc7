//! Synthesis driver: orchestrates the forward/backward/forward mapping
//! refinement across a configured number of traversal rounds under a
//! per-round wall-clock budget, selects the best completed round by the
//! configured criterion, applies redundancy cancellation, lays the
//! winner out in time-ordered form, and re-validates it against the chip.
//!
//! Grounded in `ftsynthesis.py::synthesize()`; the round/budget/restart
//! mechanics are realized as the Rust-idiomatic reading recorded in
//! `DESIGN.md` (coarse thread-boundary timeouts, since traversals are
//! pure and carry no internal cancellation points).

use std::collections::HashMap;
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use ftsynth_core::config::{OptimalCriterion, SynthesisOptions};
use ftsynth_core::error::Result;
use ftsynth_core::types::{Chip, Dag, DistanceMatrix, GateKind, GateRecord, NodeId, QubitMapping, Role};

use crate::cancellation::cancel_redundancy;
use crate::checkup::checkup;
use crate::engine::{self, CostStrategy as EngineCostStrategy, Direction, TraversalOptions};
use crate::initial_mapping::choose_initial_mapping;
use crate::physical_op::PhysicalOp;

/// Whether the final checkup re-validation passed. Reaching `Fail` is not
/// possible from a successful [`synthesize`] call: a checkup violation
/// is a fatal `FtSynthError::CheckupFailed` and is returned as `Err`
/// before a [`SynthesisOutput`] is ever constructed. The variant is kept
/// so the type mirrors the external `checkup: "ok"|"fail"` shape
/// verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckupStatus {
    Ok,
    Fail,
}

/// Per-(role, role) interaction counts, SWAP totals, and the parameters
/// that produced this result, reported alongside the synthesized
/// circuit.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub interactions: HashMap<(Role, Role), usize>,
    pub data_swap_count: usize,
    pub swaps_inserted: usize,
    pub circuit_depth: usize,
    pub number_gates: usize,
    pub rounds_attempted: usize,
    pub rounds_completed: usize,
    pub used_uncapped_fallback: bool,
    /// Seed used to derive every round's tie-breaking/initial-mapping
    /// RNG, recorded for reproducibility per the distilled spec's own
    /// recommendation (see DESIGN.md's RNG resolution).
    pub rng_seed: u64,
}

/// Result of a full synthesis run: the time-layered and flat emission,
/// the initial/final mapping of the winning round, and bookkeeping.
#[derive(Debug, Clone)]
pub struct SynthesisOutput {
    /// Emitted instructions grouped by time index, computed by advancing
    /// per-qubit clocks over the post-cancellation emission.
    pub circuit: Vec<Vec<PhysicalOp>>,
    /// The same emission as a flat, post-cancellation sequence.
    pub emitted: Vec<PhysicalOp>,
    pub initial_mapping: HashMap<String, usize>,
    pub final_mapping: HashMap<String, usize>,
    pub analysis: Analysis,
    pub checkup: CheckupStatus,
}

/// One completed round's raw result, prior to cancellation/layout.
struct RoundResult {
    initial_mapping: HashMap<String, usize>,
    final_mapping: QubitMapping,
    emitted: Vec<PhysicalOp>,
    interactions: HashMap<(Role, Role), usize>,
    data_swap_count: usize,
    swaps_inserted: usize,
}

/// Synthesizes a physically executable circuit for `program` on `chip`.
///
/// When `fixed_mapping` is supplied, every round is a single forward
/// traversal from that mapping (no refinement passes). Otherwise each
/// round runs the three-pass forward -> backward -> forward refinement
/// described by the traversal engine, starting from a freshly chosen
/// initial mapping.
pub fn synthesize(
    chip: &Chip,
    program: Vec<GateRecord>,
    options: &SynthesisOptions,
    fixed_mapping: Option<HashMap<String, usize>>,
) -> Result<SynthesisOutput> {
    let logical_names = collect_logical_names(&program);
    let cnot_count = program
        .iter()
        .filter(|g| matches!(g.kind, GateKind::Cnot { .. }))
        .count();
    let budget = options.default_budget(cnot_count);

    let (dag_forward, roots_forward) = Dag::build(program.clone());
    let backward_program: Vec<GateRecord> = program
        .into_iter()
        .rev()
        .filter(|g| !g.kind.is_move())
        .collect();
    let (dag_backward, roots_backward) = Dag::build(backward_program);

    let dag_forward = Arc::new(dag_forward);
    let roots_forward = Arc::new(roots_forward);
    let dag_backward = Arc::new(dag_backward);
    let roots_backward = Arc::new(roots_backward);
    let chip_arc = Arc::new(chip.clone());
    let distance = Arc::new(chip.distance_matrix());
    let logical_names = Arc::new(logical_names);
    let options_arc = Arc::new(options.clone());
    let fixed_mapping = Arc::new(fixed_mapping);

    let master_seed = options.rng_seed.unwrap_or_else(|| rand::thread_rng().gen());
    let mut master_rng = Pcg64::seed_from_u64(master_seed);

    // Round seeds are drawn up front from the single sequential RNG so the
    // recorded `rng_seed` reproduces the same per-round seeds whether
    // rounds are then run sequentially or handed to `rayon`.
    let round_seeds: Vec<u64> = (0..options.iteration).map(|_| master_rng.gen()).collect();
    let rounds_attempted = round_seeds.len();

    let mut completed: Vec<RoundResult> = if options.parallel_rounds {
        run_rounds_parallel(
            &round_seeds,
            budget,
            &dag_forward,
            &roots_forward,
            &dag_backward,
            &roots_backward,
            &chip_arc,
            &distance,
            &logical_names,
            &options_arc,
            &fixed_mapping,
        )?
    } else {
        run_rounds_sequential(
            &round_seeds,
            budget,
            &dag_forward,
            &roots_forward,
            &dag_backward,
            &roots_backward,
            &chip_arc,
            &distance,
            &logical_names,
            &options_arc,
            &fixed_mapping,
        )?
    };

    let mut used_uncapped_fallback = false;
    if completed.is_empty() {
        info!("no round finished within budget, running one uncapped round");
        used_uncapped_fallback = true;
        let result = run_round(
            &dag_forward,
            &roots_forward,
            &dag_backward,
            &roots_backward,
            &chip_arc,
            &distance,
            &logical_names,
            &options_arc,
            &fixed_mapping,
            master_rng.gen(),
        )?;
        completed.push(result);
    }

    let rounds_completed = completed.len();
    let best_idx = select_best(&completed, chip.num_qubits(), options.optimal_criterion);
    let best = completed.swap_remove(best_idx);

    let cancelled = cancel_redundancy(&best.emitted);
    let circuit = layer_by_time(&cancelled, chip.num_qubits());
    checkup(&cancelled, chip)?;

    let circuit_depth = circuit.len();
    let number_gates = cancelled.len();

    Ok(SynthesisOutput {
        circuit,
        emitted: cancelled,
        initial_mapping: best.initial_mapping,
        final_mapping: best.final_mapping.to_map(),
        analysis: Analysis {
            interactions: best.interactions,
            data_swap_count: best.data_swap_count,
            swaps_inserted: best.swaps_inserted,
            circuit_depth,
            number_gates,
            rounds_attempted,
            rounds_completed,
            used_uncapped_fallback,
            rng_seed: master_seed,
        },
        checkup: CheckupStatus::Ok,
    })
}

/// Runs every round one at a time, each bounded by `budget` on its own
/// thread. A round that times out is simply skipped; fatal errors abort
/// the whole run immediately.
#[allow(clippy::too_many_arguments)]
fn run_rounds_sequential(
    round_seeds: &[u64],
    budget: Duration,
    dag_forward: &Arc<Dag>,
    roots_forward: &Arc<Vec<NodeId>>,
    dag_backward: &Arc<Dag>,
    roots_backward: &Arc<Vec<NodeId>>,
    chip: &Arc<Chip>,
    distance: &Arc<DistanceMatrix>,
    logical_names: &Arc<Vec<String>>,
    options: &Arc<SynthesisOptions>,
    fixed_mapping: &Arc<Option<HashMap<String, usize>>>,
) -> Result<Vec<RoundResult>> {
    let mut completed = Vec::new();
    for (round, &seed) in round_seeds.iter().enumerate() {
        if let Some(result) = run_one_round_with_timeout(
            round,
            seed,
            budget,
            dag_forward,
            roots_forward,
            dag_backward,
            roots_backward,
            chip,
            distance,
            logical_names,
            options,
            fixed_mapping,
        )? {
            completed.push(result);
        }
    }
    Ok(completed)
}

/// Runs every round across a `rayon` thread pool: rounds themselves
/// execute concurrently, and each is still individually bounded by
/// `budget` on its own dedicated thread. Grounded in the live rewirer's
/// `RewireConfig::parallel` opt-in (`qns_rewire::live_rewirer`), which
/// dispatches independent variant scoring the same way.
#[allow(clippy::too_many_arguments)]
fn run_rounds_parallel(
    round_seeds: &[u64],
    budget: Duration,
    dag_forward: &Arc<Dag>,
    roots_forward: &Arc<Vec<NodeId>>,
    dag_backward: &Arc<Dag>,
    roots_backward: &Arc<Vec<NodeId>>,
    chip: &Arc<Chip>,
    distance: &Arc<DistanceMatrix>,
    logical_names: &Arc<Vec<String>>,
    options: &Arc<SynthesisOptions>,
    fixed_mapping: &Arc<Option<HashMap<String, usize>>>,
) -> Result<Vec<RoundResult>> {
    let outcomes: Result<Vec<Option<RoundResult>>> = round_seeds
        .par_iter()
        .enumerate()
        .map(|(round, &seed)| {
            run_one_round_with_timeout(
                round,
                seed,
                budget,
                dag_forward,
                roots_forward,
                dag_backward,
                roots_backward,
                chip,
                distance,
                logical_names,
                options,
                fixed_mapping,
            )
        })
        .collect();
    Ok(outcomes?.into_iter().flatten().collect())
}

/// Spawns one round on its own thread and waits up to `budget` for it,
/// returning `Ok(None)` on timeout rather than treating it as fatal.
#[allow(clippy::too_many_arguments)]
fn run_one_round_with_timeout(
    round: usize,
    round_seed: u64,
    budget: Duration,
    dag_forward: &Arc<Dag>,
    roots_forward: &Arc<Vec<NodeId>>,
    dag_backward: &Arc<Dag>,
    roots_backward: &Arc<Vec<NodeId>>,
    chip: &Arc<Chip>,
    distance: &Arc<DistanceMatrix>,
    logical_names: &Arc<Vec<String>>,
    options: &Arc<SynthesisOptions>,
    fixed_mapping: &Arc<Option<HashMap<String, usize>>>,
) -> Result<Option<RoundResult>> {
    let (tx, rx) = mpsc::channel();
    spawn_round(
        tx,
        Arc::clone(dag_forward),
        Arc::clone(roots_forward),
        Arc::clone(dag_backward),
        Arc::clone(roots_backward),
        Arc::clone(chip),
        Arc::clone(distance),
        Arc::clone(logical_names),
        Arc::clone(options),
        Arc::clone(fixed_mapping),
        round_seed,
    );

    match rx.recv_timeout(budget) {
        Ok(Ok(result)) => {
            debug!(round, swaps = result.swaps_inserted, "round completed");
            Ok(Some(result))
        }
        Ok(Err(e)) => Err(e),
        Err(_) => {
            warn!(round, ?budget, "round timed out, restarting");
            Ok(None)
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn spawn_round(
    tx: mpsc::Sender<Result<RoundResult>>,
    dag_forward: Arc<Dag>,
    roots_forward: Arc<Vec<NodeId>>,
    dag_backward: Arc<Dag>,
    roots_backward: Arc<Vec<NodeId>>,
    chip: Arc<Chip>,
    distance: Arc<DistanceMatrix>,
    logical_names: Arc<Vec<String>>,
    options: Arc<SynthesisOptions>,
    fixed_mapping: Arc<Option<HashMap<String, usize>>>,
    round_seed: u64,
) {
    thread::spawn(move || {
        let result = run_round(
            &dag_forward,
            &roots_forward,
            &dag_backward,
            &roots_backward,
            &chip,
            &distance,
            &logical_names,
            &options,
            &fixed_mapping,
            round_seed,
        );
        // The receiver may already have given up on this round (timeout);
        // a closed channel here is expected, not an error.
        let _ = tx.send(result);
    });
}

#[allow(clippy::too_many_arguments)]
fn run_round(
    dag_forward: &Dag,
    roots_forward: &[NodeId],
    dag_backward: &Dag,
    roots_backward: &[NodeId],
    chip: &Chip,
    distance: &DistanceMatrix,
    logical_names: &[String],
    options: &SynthesisOptions,
    fixed_mapping: &Option<HashMap<String, usize>>,
    round_seed: u64,
) -> Result<RoundResult> {
    let base_options = base_traversal_options(options);

    if let Some(fixed) = fixed_mapping {
        let mut mapping = QubitMapping::new(fixed.clone(), chip.num_qubits())?;
        let initial_mapping = mapping.to_map();
        let emit_options = TraversalOptions {
            write_syscode: true,
            ..base_options
        };
        let out = engine::traverse(
            dag_forward,
            roots_forward,
            &mut mapping,
            chip,
            distance,
            Direction::Forward,
            &emit_options,
        )?;
        return Ok(RoundResult {
            initial_mapping,
            final_mapping: mapping,
            emitted: out.emitted,
            interactions: out.interactions,
            data_swap_count: out.data_swap_count,
            swaps_inserted: out.swaps_inserted,
        });
    }

    let mut rng = Pcg64::seed_from_u64(round_seed);
    let mut mapping = choose_initial_mapping(
        logical_names,
        chip.num_qubits(),
        &options.initial_mapping_option,
        &mut rng,
    )?;
    let initial_mapping = mapping.to_map();

    let no_emit = TraversalOptions {
        write_syscode: false,
        ..base_options.clone()
    };
    engine::traverse(
        dag_forward,
        roots_forward,
        &mut mapping,
        chip,
        distance,
        Direction::Forward,
        &no_emit,
    )?;

    engine::traverse(
        dag_backward,
        roots_backward,
        &mut mapping,
        chip,
        distance,
        Direction::Backward,
        &no_emit,
    )?;

    let emit_options = TraversalOptions {
        write_syscode: true,
        ..base_options
    };
    let out = engine::traverse(
        dag_forward,
        roots_forward,
        &mut mapping,
        chip,
        distance,
        Direction::Forward,
        &emit_options,
    )?;

    Ok(RoundResult {
        initial_mapping,
        final_mapping: mapping,
        emitted: out.emitted,
        interactions: out.interactions,
        data_swap_count: out.data_swap_count,
        swaps_inserted: out.swaps_inserted,
    })
}

fn base_traversal_options(options: &SynthesisOptions) -> TraversalOptions {
    TraversalOptions {
        cost: match options.cost {
            ftsynth_core::config::CostStrategy::Nnc => EngineCostStrategy::Nnc,
            ftsynth_core::config::CostStrategy::Lap => EngineCostStrategy::Lap,
        },
        lap_depth: options.lap_depth,
        decay_factor: options.decay_factor,
        extended_set_weight: options.extended_set_weight,
        allow_swap: options.allow_swap,
        allowable_data_interaction: options.allowable_data_interaction,
        write_syscode: false,
        moveback: options.moveback,
        homebase: options.homebase.clone(),
    }
}

fn collect_logical_names(program: &[GateRecord]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut names = Vec::new();
    for gate in program {
        for q in gate.kind.qubits() {
            if seen.insert(q.to_string()) {
                names.push(q.to_string());
            }
        }
    }
    names
}

fn select_best(
    completed: &[RoundResult],
    num_qubits: usize,
    criterion: OptimalCriterion,
) -> usize {
    let mut best_idx = 0;
    let mut best_value = criterion_value(&completed[0].emitted, num_qubits, criterion);
    for (idx, result) in completed.iter().enumerate().skip(1) {
        let value = criterion_value(&result.emitted, num_qubits, criterion);
        if value < best_value {
            best_value = value;
            best_idx = idx;
        }
    }
    best_idx
}

fn criterion_value(emitted: &[PhysicalOp], num_qubits: usize, criterion: OptimalCriterion) -> usize {
    match criterion {
        OptimalCriterion::NumberGates => emitted.len(),
        OptimalCriterion::CircuitDepth => layer_by_time(emitted, num_qubits).len(),
    }
}

/// Lays a linear emission out into time-ordered layers by advancing a
/// per-physical-qubit clock: each instruction's time index is one past
/// the maximum clock of the qubits it touches, and a `BarrierAll`
/// synchronizes every qubit's clock (not just the ones it names, since
/// it names none).
fn layer_by_time(emitted: &[PhysicalOp], num_qubits: usize) -> Vec<Vec<PhysicalOp>> {
    let mut clocks = vec![0usize; num_qubits];
    let mut layers: Vec<Vec<PhysicalOp>> = Vec::new();

    for op in emitted {
        let touched = op.qubits();
        let t = if touched.is_empty() {
            clocks.iter().copied().max().unwrap_or(0)
        } else {
            touched.iter().map(|&q| clocks[q]).max().unwrap_or(0)
        };

        if layers.len() <= t {
            layers.resize(t + 1, Vec::new());
        }
        layers[t].push(op.clone());

        let next = t + 1;
        if touched.is_empty() {
            for c in clocks.iter_mut() {
                *c = next;
            }
        } else {
            for &q in &touched {
                clocks[q] = next;
            }
        }
    }

    layers
}
