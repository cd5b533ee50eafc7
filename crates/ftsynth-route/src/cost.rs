//! Cost evaluators (NNC, LAP) used by the traversal engine's SWAP
//! selection, plus the per-qubit decay table LAP uses to penalize
//! repeatedly swapping the same qubit.

use std::collections::{HashMap, HashSet};

use ftsynth_core::types::{Dag, DistanceMatrix, GateKind, NodeId, QubitMapping};

/// Per-qubit decay counter. Absent entries default to `0.0`, matching the
/// distilled spec's `defaultdict`-style policy.
#[derive(Debug, Clone, Default)]
pub struct DecayTable {
    values: HashMap<String, f64>,
}

impl DecayTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, logical: &str) -> f64 {
        self.values.get(logical).copied().unwrap_or(0.0)
    }

    pub fn bump(&mut self, logical: &str, amount: f64) {
        *self.values.entry(logical.to_string()).or_insert(0.0) += amount;
    }
}

/// Resolved physical destination of every Move node seen by a traversal,
/// keyed by [`NodeId`]. Populated once at the start of a forward
/// traversal by move-back resolution (see `engine::resolve_move_targets`).
pub type MoveTargets = HashMap<NodeId, usize>;

/// Distance contribution of a single non-barrier front-layer node under
/// the current mapping, or `0` for nodes with no meaningful two-position
/// distance (1-qubit gates, prepares, measures).
fn node_distance(
    dag: &Dag,
    node: NodeId,
    mapping: &QubitMapping,
    distance: &DistanceMatrix,
    move_targets: &MoveTargets,
) -> usize {
    let gate = dag.node(node);
    match &gate.kind {
        GateKind::Cnot { ctrl, trgt } | GateKind::Cz { ctrl, trgt } | GateKind::Swap { ctrl, trgt } => {
            let (Some(pc), Some(pt)) = (mapping.physical_of(ctrl), mapping.physical_of(trgt)) else {
                return 0;
            };
            distance.get(pc, pt)
        }
        GateKind::Move { ctrl, .. } => {
            let (Some(pc), Some(&target)) =
                (mapping.physical_of(ctrl), move_targets.get(&node))
            else {
                return 0;
            };
            distance.get(pc, target)
        }
        _ => 0,
    }
}

fn non_barrier<'a>(dag: &Dag, nodes: impl IntoIterator<Item = &'a NodeId>) -> Vec<NodeId> {
    nodes
        .into_iter()
        .copied()
        .filter(|&id| !matches!(dag.node(id).kind, GateKind::BarrierAll | GateKind::Barrier(_)))
        .collect()
}

/// Nearest-neighbor cost: sum of chip distances over every non-barrier
/// front-layer node under the current (tentative) mapping.
pub fn nnc_cost(
    front_layer: &[NodeId],
    dag: &Dag,
    mapping: &QubitMapping,
    distance: &DistanceMatrix,
    move_targets: &MoveTargets,
) -> f64 {
    non_barrier(dag, front_layer)
        .iter()
        .map(|&id| node_distance(dag, id, mapping, distance, move_targets) as f64)
        .sum()
}

/// Look-ahead-and-parallelism cost: front-layer cost plus a weighted
/// extended-set cost (successors within `lap_depth` hops of any
/// front-layer node), scaled by the max decay of the two swap endpoints.
#[allow(clippy::too_many_arguments)]
pub fn lap_cost(
    front_layer: &[NodeId],
    dag: &Dag,
    mapping: &QubitMapping,
    distance: &DistanceMatrix,
    move_targets: &MoveTargets,
    decay: &DecayTable,
    swap_endpoints: (&str, &str),
    lap_depth: usize,
    extended_set_weight: f64,
) -> f64 {
    let fl_nodes = non_barrier(dag, front_layer);
    let cost_fl = if fl_nodes.is_empty() {
        0.0
    } else {
        let sum: f64 = fl_nodes
            .iter()
            .map(|&id| node_distance(dag, id, mapping, distance, move_targets) as f64)
            .sum();
        sum / fl_nodes.len() as f64
    };

    let mut extended: HashSet<NodeId> = HashSet::new();
    for &id in front_layer {
        extended.extend(dag.descendants_within(id, lap_depth));
    }
    let extended_nodes = non_barrier(dag, extended.iter());
    let cost_e = if extended_nodes.is_empty() {
        0.0
    } else {
        let sum: f64 = extended_nodes
            .iter()
            .map(|&id| node_distance(dag, id, mapping, distance, move_targets) as f64)
            .sum();
        sum / extended_nodes.len() as f64
    };

    let (a, b) = swap_endpoints;
    let decay_of_swap = decay.get(a).max(decay.get(b));

    (cost_fl + extended_set_weight * cost_e) * decay_of_swap
}

#[cfg(test)]
mod tests {
    use super::*;
    use ftsynth_core::types::GateRecord;
    use std::collections::HashMap as Map;

    fn linear_chip_distance(n: usize) -> DistanceMatrix {
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
        ftsynth_core::types::Chip::new(n, adjacency, None)
            .unwrap()
            .distance_matrix()
    }

    fn mapping(a_phys: usize, b_phys: usize, n: usize) -> QubitMapping {
        let mut m = Map::new();
        m.insert("a".to_string(), a_phys);
        m.insert("b".to_string(), b_phys);
        QubitMapping::new(m, n).unwrap()
    }

    #[test]
    fn test_nnc_cost_sums_distances() {
        let program = vec![GateRecord::new(
            0,
            GateKind::Cnot {
                ctrl: "a".into(),
                trgt: "b".into(),
            },
        )];
        let (dag, roots) = Dag::build(program);
        let dist = linear_chip_distance(4);
        let map = mapping(0, 3, 4);
        let cost = nnc_cost(&roots, &dag, &map, &dist, &MoveTargets::new());
        assert_eq!(cost, 3.0);
    }

    #[test]
    fn test_nnc_zero_on_adjacent() {
        let program = vec![GateRecord::new(
            0,
            GateKind::Cnot {
                ctrl: "a".into(),
                trgt: "b".into(),
            },
        )];
        let (dag, roots) = Dag::build(program);
        let dist = linear_chip_distance(2);
        let map = mapping(0, 1, 2);
        let cost = nnc_cost(&roots, &dag, &map, &dist, &MoveTargets::new());
        assert_eq!(cost, 0.0);
    }

    #[test]
    fn test_lap_zero_with_no_recorded_decay() {
        let program = vec![GateRecord::new(
            0,
            GateKind::Cnot {
                ctrl: "a".into(),
                trgt: "b".into(),
            },
        )];
        let (dag, roots) = Dag::build(program);
        let dist = linear_chip_distance(4);
        let map = mapping(0, 3, 4);
        let decay = DecayTable::new();
        // decay defaults to 0 for both endpoints, so the weighted cost
        // term is scaled to zero regardless of distance.
        let cost = lap_cost(
            &roots,
            &dag,
            &map,
            &dist,
            &MoveTargets::new(),
            &decay,
            ("a", "b"),
            1,
            0.5,
        );
        assert_eq!(cost, 0.0);
    }

    #[test]
    fn test_lap_scales_with_decay() {
        let program = vec![GateRecord::new(
            0,
            GateKind::Cnot {
                ctrl: "a".into(),
                trgt: "b".into(),
            },
        )];
        let (dag, roots) = Dag::build(program);
        let dist = linear_chip_distance(4);
        let map = mapping(0, 3, 4);
        let mut decay = DecayTable::new();
        decay.bump("a", 1.1);
        let cost = lap_cost(
            &roots,
            &dag,
            &map,
            &dist,
            &MoveTargets::new(),
            &decay,
            ("a", "b"),
            1,
            0.5,
        );
        assert_eq!(cost, 3.0 * 1.1);
    }

    #[test]
    fn test_decay_table_defaults_to_zero() {
        let decay = DecayTable::new();
        assert_eq!(decay.get("unused"), 0.0);
    }
}
