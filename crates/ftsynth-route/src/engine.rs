//! Traversal engine: the front-layer walk that retires executable gates
//! and inserts scored SWAPs so every two-qubit gate eventually lands on
//! adjacent physical qubits.

use std::collections::HashMap;

use ftsynth_core::error::{FtSynthError, Result};
use ftsynth_core::types::{
    Chip, Dag, DistanceMatrix, GateKind, MoveTarget, NodeId, QubitMapping, QubitStatus, Role,
};
use tracing::{debug, trace};

use crate::cost::{lap_cost, nnc_cost, DecayTable, MoveTargets};

#[cfg(test)]
impl Default for TraversalOptions {
    fn default() -> Self {
        Self {
            cost: CostStrategy::Lap,
            lap_depth: 1,
            decay_factor: 0.1,
            extended_set_weight: 0.5,
            allow_swap: true,
            allowable_data_interaction: 0,
            write_syscode: true,
            moveback: false,
            homebase: None,
        }
    }
}

/// Direction a traversal runs in. A backward traversal consumes a DAG
/// built from the reversed program (Move instructions already excluded
/// by the caller) and interprets Prep/Meas status transitions in reverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Cost evaluator selection, mirrored from [`ftsynth_core::config::CostStrategy`]
/// so the engine does not need to depend on the full config type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CostStrategy {
    Nnc,
    Lap,
}

/// Per-traversal knobs the driver threads through from [`ftsynth_core::config::SynthesisOptions`].
#[derive(Debug, Clone)]
pub struct TraversalOptions {
    pub cost: CostStrategy,
    pub lap_depth: usize,
    pub decay_factor: f64,
    pub extended_set_weight: f64,
    pub allow_swap: bool,
    pub allowable_data_interaction: usize,
    /// Whether this run emits a physicalized instruction stream.
    pub write_syscode: bool,
    /// Whether data qubits must be routed back to their home position by
    /// the end of this traversal. Only meaningful when the program
    /// contains Move instructions; a program without any is unaffected
    /// either way.
    pub moveback: bool,
    /// Caller-supplied home physical index per logical name, used by
    /// move-back resolution in place of a data qubit's position at the
    /// start of this traversal.
    pub homebase: Option<HashMap<String, usize>>,
}

/// Result of one traversal: the emitted instruction stream (empty unless
/// `write_syscode` was set), per-(role,role) interaction counts, and the
/// active-active swap count observed.
#[derive(Debug, Clone, Default)]
pub struct TraversalOutput {
    pub emitted: Vec<crate::physical_op::PhysicalOp>,
    pub interactions: HashMap<(Role, Role), usize>,
    pub data_swap_count: usize,
    pub swaps_inserted: usize,
}

/// Runs the front-layer walk described by the traversal engine's Phases
/// A-D, mutating `mapping` in place and returning the emission (if any)
/// and interaction bookkeeping.
pub fn traverse(
    dag: &Dag,
    initial_front_layer: &[NodeId],
    mapping: &mut QubitMapping,
    chip: &Chip,
    distance: &DistanceMatrix,
    direction: Direction,
    options: &TraversalOptions,
) -> Result<TraversalOutput> {
    let mut homes: HashMap<String, usize> = HashMap::new();
    for name in mapping.logical_names() {
        if mapping.role_of(name) == Role::Data {
            let home = options
                .homebase
                .as_ref()
                .and_then(|h| h.get(name).copied())
                .unwrap_or_else(|| mapping.physical_of(name).unwrap());
            homes.insert(name.to_string(), home);
        }
    }

    let move_targets = resolve_move_targets(dag, &homes)?;

    let mut front_layer: Vec<NodeId> = initial_front_layer.to_vec();
    let mut executed: Vec<bool> = vec![false; dag.len()];
    let mut list_for_moveback: Vec<NodeId> = Vec::new();
    let mut list_for_barrier: HashMap<NodeId, Vec<NodeId>> = HashMap::new();
    let mut decay = DecayTable::new();
    let mut previous_best_swap: Option<(String, String)> = None;
    let mut data_swap_count = 0usize;
    let mut interactions: HashMap<(Role, Role), usize> = HashMap::new();
    let mut emitted = Vec::new();
    let mut swaps_inserted = 0usize;
    let mut saw_move = false;

    loop {
        if front_layer.is_empty() {
            for (_, mut queued) in list_for_barrier.drain() {
                front_layer.append(&mut queued);
            }
            if front_layer.is_empty() {
                front_layer.append(&mut list_for_moveback);
            }
            if front_layer.is_empty() {
                break;
            }
        }

        let executable = collect_executable(dag, &front_layer, mapping, chip, &move_targets);

        if !executable.is_empty() {
            trace!(front_layer = front_layer.len(), retiring = executable.len(), "phase B retire");
            let executable_set: std::collections::HashSet<NodeId> =
                executable.iter().copied().collect();
            let barriers_still_pending: Vec<NodeId> = front_layer
                .iter()
                .copied()
                .filter(|id| {
                    !executable_set.contains(id)
                        && matches!(
                            dag.node(*id).kind,
                            GateKind::BarrierAll | GateKind::Barrier(_)
                        )
                })
                .collect();

            let mut newly_released: Vec<NodeId> = Vec::new();

            for &id in &executable {
                let gate = dag.node(id);
                apply_status_transition(&gate.kind, mapping, direction);

                if gate.kind.is_barrier_all() || gate.kind.is_selective_barrier() {
                    if let Some(mut queued) = list_for_barrier.remove(&id) {
                        newly_released.append(&mut queued);
                    }
                }
                if gate.kind.is_move() {
                    saw_move = true;
                }

                if options.write_syscode {
                    emitted.push(physicalize(&gate.kind, mapping)?);
                }

                executed[id as usize] = true;

                for &succ in dag.successors(id) {
                    if dag
                        .predecessors(succ)
                        .iter()
                        .all(|p| executed[*p as usize])
                    {
                        let succ_gate = &dag.node(succ).kind;
                        if succ_gate.is_move() {
                            list_for_moveback.push(succ);
                            continue;
                        }
                        let blocking = barriers_still_pending.iter().find(|&&b| {
                            if dag.node(b).kind.is_barrier_all() {
                                true
                            } else if let GateKind::Barrier(qs) = &dag.node(b).kind {
                                succ_gate.qubits().iter().any(|q| qs.iter().any(|bq| bq == q))
                            } else {
                                false
                            }
                        });
                        if let Some(&barrier_id) = blocking {
                            list_for_barrier.entry(barrier_id).or_default().push(succ);
                        } else {
                            newly_released.push(succ);
                        }
                    }
                }
            }

            front_layer.retain(|id| !executable_set.contains(id));
            front_layer.append(&mut newly_released);
        } else {
            trace!(front_layer = front_layer.len(), "phase C swap insertion");
            let candidates = generate_candidates(
                dag,
                &front_layer,
                mapping,
                chip,
                direction,
                &move_targets,
                data_swap_count,
                options.allowable_data_interaction,
            );
            if candidates.swaps.is_empty() {
                if candidates.suppressed_data_interaction {
                    return Err(FtSynthError::DataInteractionExceeded {
                        count: data_swap_count + 1,
                        allowed: options.allowable_data_interaction,
                    });
                }
                return Err(FtSynthError::invalid_mapping(
                    "no SWAP candidate available to make progress (deadlocked front layer)",
                ));
            }

            let (chosen, _cost) = select_best_swap(
                &candidates.swaps,
                dag,
                &front_layer,
                mapping,
                distance,
                &move_targets,
                &decay,
                options,
                &previous_best_swap,
            );

            apply_swap(
                &chosen,
                mapping,
                chip,
                options,
                &mut decay,
                &mut data_swap_count,
                &mut interactions,
                &mut emitted,
            )?;
            swaps_inserted += 1;
            previous_best_swap = Some(chosen);
        }
    }

    if options.moveback && saw_move {
        for (name, &home) in &homes {
            let now = mapping.physical_of(name).ok_or_else(|| {
                FtSynthError::HomebaseViolated(name.clone(), home, usize::MAX)
            })?;
            if now != home {
                return Err(FtSynthError::HomebaseViolated(name.clone(), home, now));
            }
        }
    }

    debug!(swaps_inserted, data_swap_count, "traversal complete");

    Ok(TraversalOutput {
        emitted,
        interactions,
        data_swap_count,
        swaps_inserted,
    })
}

fn resolve_move_targets(dag: &Dag, homes: &HashMap<String, usize>) -> Result<MoveTargets> {
    let mut out = MoveTargets::new();
    for idx in 0..dag.len() as NodeId {
        if let GateKind::Move { trgt, .. } = &dag.node(idx).kind {
            let phys = match trgt {
                MoveTarget::Physical(p) => *p,
                MoveTarget::Symbolic(s) => {
                    let base = s.strip_suffix("-init").unwrap_or(s);
                    *homes.get(base).ok_or_else(|| {
                        FtSynthError::invalid_mapping(format!(
                            "move target '{s}' has no known home position"
                        ))
                    })?
                }
            };
            out.insert(idx, phys);
        }
    }
    Ok(out)
}

fn apply_status_transition(kind: &GateKind, mapping: &mut QubitMapping, direction: Direction) {
    match kind {
        GateKind::PrepZ(q) | GateKind::PrepX(q) => {
            let status = match direction {
                Direction::Forward => QubitStatus::Active,
                Direction::Backward => QubitStatus::Inactive,
            };
            mapping.set_status(q, status);
        }
        GateKind::MeasZ(q, _) | GateKind::MeasX(q, _) => {
            let status = match direction {
                Direction::Forward => QubitStatus::Inactive,
                Direction::Backward => QubitStatus::Active,
            };
            mapping.set_status(q, status);
        }
        _ => {}
    }
}

fn collect_executable(
    dag: &Dag,
    front_layer: &[NodeId],
    mapping: &QubitMapping,
    chip: &Chip,
    move_targets: &MoveTargets,
) -> Vec<NodeId> {
    let only_barriers = front_layer
        .iter()
        .all(|&id| dag.node(id).kind.is_barrier_all());

    front_layer
        .iter()
        .copied()
        .filter(|&id| {
            let kind = &dag.node(id).kind;
            match kind {
                GateKind::BarrierAll => only_barriers,
                GateKind::Barrier(qs) => !front_layer.iter().any(|&other| {
                    other != id
                        && (dag.node(other).kind.is_barrier_all()
                            || dag
                                .node(other)
                                .kind
                                .qubits()
                                .iter()
                                .any(|q| qs.iter().any(|bq| bq == q)))
                }),
                GateKind::Cnot { ctrl, trgt }
                | GateKind::Cz { ctrl, trgt }
                | GateKind::Swap { ctrl, trgt } => {
                    match (mapping.physical_of(ctrl), mapping.physical_of(trgt)) {
                        (Some(pc), Some(pt)) => chip.are_connected(pc, pt),
                        _ => false,
                    }
                }
                GateKind::Move { ctrl, .. } => {
                    match (mapping.physical_of(ctrl), move_targets.get(&id)) {
                        (Some(p), Some(&target)) => p == target,
                        _ => false,
                    }
                }
                _ => true,
            }
        })
        .collect()
}

fn physicalize(
    kind: &GateKind,
    mapping: &QubitMapping,
) -> Result<crate::physical_op::PhysicalOp> {
    use crate::physical_op::PhysicalOp as P;
    let phys = |q: &str| {
        mapping
            .physical_of(q)
            .ok_or_else(|| FtSynthError::UnknownQubit(q.to_string()))
    };
    Ok(match kind {
        GateKind::H(q) => P::H(phys(q)?),
        GateKind::X(q) => P::X(phys(q)?),
        GateKind::Y(q) => P::Y(phys(q)?),
        GateKind::Z(q) => P::Z(phys(q)?),
        GateKind::S(q) => P::S(phys(q)?),
        GateKind::T(q) => P::T(phys(q)?),
        GateKind::Tdag(q) => P::Tdag(phys(q)?),
        GateKind::Sx(q) => P::Sx(phys(q)?),
        GateKind::Rz(q, angle) => P::Rz(phys(q)?, *angle),
        GateKind::U(q, ax, ay, az) => P::U(phys(q)?, *ax, *ay, *az),
        GateKind::PrepZ(q) => P::PrepZ(phys(q)?),
        GateKind::PrepX(q) => P::PrepX(phys(q)?),
        GateKind::MeasZ(q, c) => P::MeasZ(phys(q)?, c.clone()),
        GateKind::MeasX(q, c) => P::MeasX(phys(q)?, c.clone()),
        GateKind::Cnot { ctrl, trgt } => P::Cnot { ctrl: phys(ctrl)?, trgt: phys(trgt)? },
        GateKind::Cz { ctrl, trgt } => P::Cz { ctrl: phys(ctrl)?, trgt: phys(trgt)? },
        GateKind::Swap { ctrl, trgt } => P::Swap { a: phys(ctrl)?, b: phys(trgt)? },
        GateKind::Move { ctrl, .. } => P::Move(phys(ctrl)?),
        GateKind::BarrierAll => P::BarrierAll,
        GateKind::Barrier(qs) => {
            let mut out = Vec::with_capacity(qs.len());
            for q in qs {
                out.push(phys(q)?);
            }
            P::Barrier(out)
        }
    })
}

/// An unordered pair of logical qubit names identifying a candidate SWAP.
type SwapCandidate = (String, String);

/// Candidate SWAPs for one Phase-C round, plus whether an active-active
/// SWAP was suppressed by the data-interaction guard (used to tell a
/// true deadlock apart from "only a guarded data-data swap exists").
struct Candidates {
    swaps: Vec<SwapCandidate>,
    suppressed_data_interaction: bool,
}

fn generate_candidates(
    dag: &Dag,
    front_layer: &[NodeId],
    mapping: &QubitMapping,
    chip: &Chip,
    direction: Direction,
    move_targets: &MoveTargets,
    data_swap_count: usize,
    allowable_data_interaction: usize,
) -> Candidates {
    let mut ordered: Vec<SwapCandidate> = Vec::new();
    let mut seen: std::collections::HashSet<(String, String)> = std::collections::HashSet::new();
    let mut suppressed_data_interaction = false;

    let mut push = |a: String, b: String| {
        if a == b {
            return;
        }
        let key = if a < b { (a.clone(), b.clone()) } else { (b.clone(), a.clone()) };
        if seen.insert(key.clone()) {
            ordered.push(key);
        }
    };

    for &id in front_layer {
        let kind = &dag.node(id).kind;
        if kind.is_barrier_all() || kind.is_selective_barrier() {
            continue;
        }
        if kind.is_move() && direction == Direction::Backward {
            continue;
        }

        let mut focus_qubits: Vec<String> = Vec::new();
        if let GateKind::Move { ctrl, .. } = kind {
            focus_qubits.push(ctrl.clone());
            if let Some(&target_phys) = move_targets.get(&id) {
                if let Some(occupant) = mapping.logical_at(target_phys) {
                    let role = mapping.role_of(occupant);
                    if role != Role::Data && role != Role::Magic {
                        focus_qubits.push(occupant.to_string());
                    }
                }
            }
        } else {
            focus_qubits = kind.qubits().into_iter().map(String::from).collect();
        }

        for q in &focus_qubits {
            let Some(p) = mapping.physical_of(q) else { continue };
            let status = mapping.status_of(q);
            match status {
                QubitStatus::Inactive => {
                    for n in chip.neighbors(p) {
                        if let Some(other) = mapping.logical_at(n) {
                            push(q.clone(), other.to_string());
                        }
                    }
                }
                QubitStatus::Active => {
                    for n in chip.neighbors(p) {
                        let Some(other) = mapping.logical_at(n) else { continue };
                        if mapping.status_of(other) == QubitStatus::Inactive {
                            push(q.clone(), other.to_string());
                        } else {
                            // both active: only offer the direct swap
                            // while still under the guard; otherwise the
                            // "step aside" alternative below is the only
                            // way to make progress.
                            if data_swap_count < allowable_data_interaction {
                                push(q.clone(), other.to_string());
                            } else {
                                suppressed_data_interaction = true;
                            }
                            for n2 in chip.neighbors(n) {
                                if n2 == p {
                                    continue;
                                }
                                if let Some(other2) = mapping.logical_at(n2) {
                                    if mapping.status_of(other2) == QubitStatus::Inactive {
                                        push(other.to_string(), other2.to_string());
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }

    // Dummy-only candidates never make progress on real qubits; drop them.
    ordered.retain(|(a, b)| {
        !(mapping.role_of(a) == Role::Dummy && mapping.role_of(b) == Role::Dummy)
    });

    Candidates {
        swaps: ordered,
        suppressed_data_interaction,
    }
}

#[allow(clippy::too_many_arguments)]
fn select_best_swap(
    candidates: &[SwapCandidate],
    dag: &Dag,
    front_layer: &[NodeId],
    mapping: &QubitMapping,
    distance: &DistanceMatrix,
    move_targets: &MoveTargets,
    decay: &DecayTable,
    options: &TraversalOptions,
    previous_best_swap: &Option<SwapCandidate>,
) -> (SwapCandidate, f64) {
    let mut scored: Vec<(SwapCandidate, f64)> = candidates
        .iter()
        .map(|(a, b)| {
            let mut tentative = mapping.clone();
            let (pa, pb) = (
                tentative.physical_of(a).unwrap(),
                tentative.physical_of(b).unwrap(),
            );
            tentative.swap_physical(pa, pb);
            let cost = match options.cost {
                CostStrategy::Nnc => nnc_cost(front_layer, dag, &tentative, distance, move_targets),
                CostStrategy::Lap => {
                    let mut tentative_decay = decay.clone();
                    tentative_decay.bump(a, 1.0 + options.decay_factor);
                    tentative_decay.bump(b, 1.0 + options.decay_factor);
                    lap_cost(
                        front_layer,
                        dag,
                        &tentative,
                        distance,
                        move_targets,
                        &tentative_decay,
                        (a.as_str(), b.as_str()),
                        options.lap_depth,
                        options.extended_set_weight,
                    )
                }
            };
            ((a.clone(), b.clone()), cost)
        })
        .collect();

    let min_idx = scored
        .iter()
        .enumerate()
        .min_by(|(_, (_, c1)), (_, (_, c2))| c1.partial_cmp(c2).unwrap())
        .map(|(i, _)| i)
        .expect("candidates is non-empty");
    let mut chosen = scored[min_idx].clone();

    if scored.len() > 1 {
        if let Some(prev) = previous_best_swap {
            if &chosen.0 == prev {
                scored.remove(min_idx);
                let next_idx = scored
                    .iter()
                    .enumerate()
                    .min_by(|(_, (_, c1)), (_, (_, c2))| c1.partial_cmp(c2).unwrap())
                    .map(|(i, _)| i)
                    .expect("scored is non-empty after removal");
                chosen = scored[next_idx].clone();
            }
        }
    }

    chosen
}

#[allow(clippy::too_many_arguments)]
fn apply_swap(
    swap: &SwapCandidate,
    mapping: &mut QubitMapping,
    chip: &Chip,
    options: &TraversalOptions,
    decay: &mut DecayTable,
    data_swap_count: &mut usize,
    interactions: &mut HashMap<(Role, Role), usize>,
    emitted: &mut Vec<crate::physical_op::PhysicalOp>,
) -> Result<()> {
    let (a, b) = swap;
    let pa = mapping
        .physical_of(a)
        .ok_or_else(|| FtSynthError::UnknownQubit(a.clone()))?;
    let pb = mapping
        .physical_of(b)
        .ok_or_else(|| FtSynthError::UnknownQubit(b.clone()))?;
    if !chip.are_connected(pa, pb) {
        return Err(FtSynthError::NonAdjacentSwap(pa, pb));
    }

    let status_a = mapping.status_of(a);
    let status_b = mapping.status_of(b);
    let role_a = mapping.role_of(a);
    let role_b = mapping.role_of(b);

    mapping.swap_physical(pa, pb);

    if options.cost == CostStrategy::Lap {
        decay.bump(a, 1.0 + options.decay_factor);
        decay.bump(b, 1.0 + options.decay_factor);
    }

    if role_a != Role::Dummy
        && role_b != Role::Dummy
        && status_a == QubitStatus::Active
        && status_b == QubitStatus::Active
    {
        *data_swap_count += 1;
        if *data_swap_count > options.allowable_data_interaction {
            return Err(FtSynthError::DataInteractionExceeded {
                count: *data_swap_count,
                allowed: options.allowable_data_interaction,
            });
        }
    }

    let key = if role_a <= role_b {
        (role_a, role_b)
    } else {
        (role_b, role_a)
    };
    *interactions.entry(key).or_insert(0) += 1;

    if options.write_syscode {
        if options.allow_swap {
            emitted.push(crate::physical_op::PhysicalOp::Swap { a: pa, b: pb });
        } else {
            emitted.push(crate::physical_op::PhysicalOp::Cnot { ctrl: pa, trgt: pb });
            emitted.push(crate::physical_op::PhysicalOp::Cnot { ctrl: pb, trgt: pa });
            emitted.push(crate::physical_op::PhysicalOp::Cnot { ctrl: pa, trgt: pb });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ftsynth_core::types::{Chip, GateRecord};
    use std::collections::HashMap as Map;

    fn linear_chip(n: usize) -> Chip {
        let adjacency: Vec<Vec<usize>> = (0..n)
            .map(|i| {
                let mut v = vec![];
                if i > 0 {
                    v.push(i - 1);
                }
                if i + 1 < n {
                    v.push(i + 1);
                }
                v
            })
            .collect();
        Chip::new(n, adjacency, None).unwrap()
    }

    fn qubit_mapping(pairs: &[(&str, usize)], n: usize) -> QubitMapping {
        let mut m = Map::new();
        for &(name, phys) in pairs {
            m.insert(name.to_string(), phys);
        }
        QubitMapping::new(m, n).unwrap()
    }

    /// Scenario A: linear chain, trivial CNOT needing exactly one SWAP.
    #[test]
    fn test_linear_chain_trivial_cnot_inserts_one_swap() {
        let chip = linear_chip(3);
        let distance = chip.distance_matrix();
        let program = vec![GateRecord::new(
            0,
            GateKind::Cnot {
                ctrl: "data0".into(),
                trgt: "data1".into(),
            },
        )];
        let (dag, roots) = Dag::build(program);
        let mut mapping = qubit_mapping(&[("data0", 0), ("data1", 2)], 3);

        let options = TraversalOptions {
            cost: CostStrategy::Lap,
            ..TraversalOptions::default()
        };
        let out = traverse(
            &dag,
            &roots,
            &mut mapping,
            &chip,
            &distance,
            Direction::Forward,
            &options,
        )
        .unwrap();

        assert_eq!(out.swaps_inserted, 1);
        crate::checkup::checkup(&out.emitted, &chip).unwrap();
        let has_cnot = out
            .emitted
            .iter()
            .any(|op| matches!(op, crate::physical_op::PhysicalOp::Cnot { .. }));
        assert!(has_cnot);
    }

    /// Scenario B: already-adjacent CNOT needs no SWAP under either
    /// cost strategy.
    #[test]
    fn test_nnc_and_lap_agree_when_already_adjacent() {
        let chip = linear_chip(2);
        let distance = chip.distance_matrix();
        for cost in [CostStrategy::Nnc, CostStrategy::Lap] {
            let program = vec![GateRecord::new(
                0,
                GateKind::Cnot {
                    ctrl: "data0".into(),
                    trgt: "data1".into(),
                },
            )];
            let (dag, roots) = Dag::build(program);
            let mut mapping = qubit_mapping(&[("data0", 0), ("data1", 1)], 2);
            let options = TraversalOptions {
                cost,
                ..TraversalOptions::default()
            };
            let out = traverse(
                &dag,
                &roots,
                &mut mapping,
                &chip,
                &distance,
                Direction::Forward,
                &options,
            )
            .unwrap();
            assert_eq!(out.swaps_inserted, 0);
            assert_eq!(
                out.emitted,
                vec![crate::physical_op::PhysicalOp::Cnot { ctrl: 0, trgt: 1 }]
            );
        }
    }

    /// Scenario D: move-back returns a data qubit to its home position
    /// after a swap has displaced it.
    #[test]
    fn test_moveback_returns_data_qubit_home() {
        use ftsynth_core::types::MoveTarget;

        let chip = linear_chip(3);
        let distance = chip.distance_matrix();
        let program = vec![
            GateRecord::new(
                0,
                GateKind::Cnot {
                    ctrl: "data0".into(),
                    trgt: "data1".into(),
                },
            ),
            GateRecord::new(
                1,
                GateKind::Move {
                    ctrl: "data0".into(),
                    trgt: MoveTarget::Symbolic("data0-init".into()),
                },
            ),
            GateRecord::new(
                2,
                GateKind::Move {
                    ctrl: "data1".into(),
                    trgt: MoveTarget::Symbolic("data1-init".into()),
                },
            ),
        ];
        let (dag, roots) = Dag::build(program);
        let mut mapping = qubit_mapping(&[("data0", 0), ("data1", 2), ("ancilla0", 1)], 3);

        let options = TraversalOptions {
            cost: CostStrategy::Lap,
            moveback: true,
            ..TraversalOptions::default()
        };
        traverse(
            &dag,
            &roots,
            &mut mapping,
            &chip,
            &distance,
            Direction::Forward,
            &options,
        )
        .unwrap();

        assert_eq!(mapping.physical_of("data0"), Some(0));
        assert_eq!(mapping.physical_of("data1"), Some(2));
    }

    /// Scenario E: data-interaction guard forces routing through a
    /// non-data neighbor instead of swapping two active data qubits.
    #[test]
    fn test_data_interaction_guard_routes_through_ancilla() {
        let chip = linear_chip(3);
        let distance = chip.distance_matrix();
        let program = vec![GateRecord::new(
            0,
            GateKind::Cnot {
                ctrl: "data0".into(),
                trgt: "data1".into(),
            },
        )];
        let (dag, roots) = Dag::build(program);
        let mut mapping = qubit_mapping(&[("data0", 0), ("data1", 2), ("ancilla0", 1)], 3);
        let options = TraversalOptions {
            cost: CostStrategy::Lap,
            allowable_data_interaction: 0,
            ..TraversalOptions::default()
        };
        let out = traverse(
            &dag,
            &roots,
            &mut mapping,
            &chip,
            &distance,
            Direction::Forward,
            &options,
        )
        .unwrap();
        assert_eq!(out.data_swap_count, 0);
    }

    /// Scenario E (failure branch): with no non-data neighbor available,
    /// two active data qubits cannot be routed together under a zero
    /// data-interaction allowance.
    #[test]
    fn test_data_interaction_guard_fails_without_escape_route() {
        let chip = linear_chip(3);
        let distance = chip.distance_matrix();
        let program = vec![GateRecord::new(
            0,
            GateKind::Cnot {
                ctrl: "data0".into(),
                trgt: "data1".into(),
            },
        )];
        let (dag, roots) = Dag::build(program);
        let mut mapping = qubit_mapping(&[("data0", 0), ("data2", 1), ("data1", 2)], 3);
        let options = TraversalOptions {
            cost: CostStrategy::Lap,
            allowable_data_interaction: 0,
            ..TraversalOptions::default()
        };
        let err = traverse(
            &dag,
            &roots,
            &mut mapping,
            &chip,
            &distance,
            Direction::Forward,
            &options,
        )
        .unwrap_err();
        assert!(matches!(err, FtSynthError::DataInteractionExceeded { .. }));
    }

    #[test]
    fn test_mapping_remains_bijective_after_traversal() {
        let chip = linear_chip(3);
        let distance = chip.distance_matrix();
        let program = vec![GateRecord::new(
            0,
            GateKind::Cnot {
                ctrl: "data0".into(),
                trgt: "data1".into(),
            },
        )];
        let (dag, roots) = Dag::build(program);
        let mut mapping = qubit_mapping(&[("data0", 0), ("data1", 2)], 3);
        let options = TraversalOptions::default();
        traverse(
            &dag,
            &roots,
            &mut mapping,
            &chip,
            &distance,
            Direction::Forward,
            &options,
        )
        .unwrap();

        let mut seen: std::collections::HashSet<usize> = std::collections::HashSet::new();
        for name in mapping.logical_names() {
            assert!(seen.insert(mapping.physical_of(name).unwrap()));
        }
    }
}
