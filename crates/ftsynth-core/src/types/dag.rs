//! Dependency graph over gate records, built once per traversal direction
//! and read-only thereafter.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::types::gate::{GateId, GateKind, GateRecord};

/// Index into a [`Dag`]'s node arena. Distinct from [`GateId`]: a node id
/// is the record's position in the arena, while `GateId` is the stable
/// identifier carried by the [`GateRecord`] itself (used for emission and
/// external bookkeeping). The two coincide when a program is built once
/// and never reordered, which holds for every `Dag::build` caller in this
/// workspace, but the distinction is kept so the arena never has to
/// assume it.
pub type NodeId = u32;

/// Directed acyclic graph over a linearized program. Nodes are gate
/// records; edges encode per-qubit (and barrier) ordering.
#[derive(Debug, Clone)]
pub struct Dag {
    nodes: Vec<GateRecord>,
    successors: Vec<Vec<NodeId>>,
    predecessors: Vec<Vec<NodeId>>,
}

impl Dag {
    /// Builds a DAG from a linearized program and returns it along with
    /// the initial front layer (the DAG roots, in arena order).
    ///
    /// Edge policy: for each logical qubit, a chain of every gate that
    /// touches it in program order. A `BarrierAll` depends on the
    /// then-last gate of every qubit seen so far and becomes the implicit
    /// predecessor of every gate that follows it (including gates on
    /// qubits not yet seen), matching the "every later gate depends on
    /// the Barrier-all" rule. A selective barrier is the same
    /// construction restricted to its declared qubit set.
    pub fn build(program: Vec<GateRecord>) -> (Self, Vec<NodeId>) {
        let n = program.len();
        let mut successors: Vec<Vec<NodeId>> = vec![Vec::new(); n];
        let mut predecessors: Vec<Vec<NodeId>> = vec![Vec::new(); n];

        let mut last_for: HashMap<String, NodeId> = HashMap::new();
        let mut barrier_floor: Option<NodeId> = None;

        fn add_edge(
            predecessors: &mut [Vec<NodeId>],
            successors: &mut [Vec<NodeId>],
            from: NodeId,
            to: NodeId,
        ) {
            successors[from as usize].push(to);
            predecessors[to as usize].push(from);
        }

        for (idx, gate) in program.iter().enumerate() {
            let node = idx as NodeId;
            match &gate.kind {
                GateKind::BarrierAll => {
                    let mut preds_here: HashSet<NodeId> = HashSet::new();
                    for &last in last_for.values() {
                        preds_here.insert(last);
                    }
                    for p in preds_here {
                        add_edge(&mut predecessors, &mut successors, p, node);
                    }
                    last_for.clear();
                    barrier_floor = Some(node);
                }
                GateKind::Barrier(qubits) => {
                    let mut preds_here: HashSet<NodeId> = HashSet::new();
                    for q in qubits {
                        let pred = last_for.get(q).copied().or(barrier_floor);
                        if let Some(p) = pred {
                            preds_here.insert(p);
                        }
                    }
                    for p in preds_here {
                        add_edge(&mut predecessors, &mut successors, p, node);
                    }
                    for q in qubits {
                        last_for.insert(q.clone(), node);
                    }
                }
                _ => {
                    let mut preds_here: HashSet<NodeId> = HashSet::new();
                    for q in gate.kind.qubits() {
                        let pred = last_for.get(q).copied().or(barrier_floor);
                        if let Some(p) = pred {
                            preds_here.insert(p);
                        }
                    }
                    for p in preds_here {
                        add_edge(&mut predecessors, &mut successors, p, node);
                    }
                    for q in gate.kind.qubits() {
                        last_for.insert(q.to_string(), node);
                    }
                }
            }
        }

        let roots: Vec<NodeId> = (0..n as NodeId)
            .filter(|&id| predecessors[id as usize].is_empty())
            .collect();

        (
            Dag {
                nodes: program,
                successors,
                predecessors,
            },
            roots,
        )
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &GateRecord {
        &self.nodes[id as usize]
    }

    pub fn gate_id(&self, id: NodeId) -> GateId {
        self.nodes[id as usize].id
    }

    pub fn successors(&self, id: NodeId) -> &[NodeId] {
        &self.successors[id as usize]
    }

    pub fn predecessors(&self, id: NodeId) -> &[NodeId] {
        &self.predecessors[id as usize]
    }

    /// The set of descendants of `id` reachable within `depth` successor
    /// hops, excluding `id` itself. Depth 0 returns an empty set. Used by
    /// LAP's extended look-ahead set.
    pub fn descendants_within(&self, id: NodeId, depth: usize) -> HashSet<NodeId> {
        let mut out = HashSet::new();
        if depth == 0 {
            return out;
        }
        let mut frontier: VecDeque<(NodeId, usize)> = VecDeque::new();
        frontier.push_back((id, 0));
        let mut seen: HashSet<NodeId> = HashSet::new();
        seen.insert(id);
        while let Some((node, d)) = frontier.pop_front() {
            if d >= depth {
                continue;
            }
            for &succ in self.successors(node) {
                if seen.insert(succ) {
                    out.insert(succ);
                    frontier.push_back((succ, d + 1));
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::gate::MoveTarget;

    fn g(id: GateId, kind: GateKind) -> GateRecord {
        GateRecord::new(id, kind)
    }

    #[test]
    fn test_linear_chain_per_qubit() {
        let program = vec![
            g(0, GateKind::H("a".into())),
            g(1, GateKind::Cnot { ctrl: "a".into(), trgt: "b".into() }),
            g(2, GateKind::X("a".into())),
        ];
        let (dag, roots) = Dag::build(program);
        assert_eq!(roots, vec![0]);
        assert_eq!(dag.successors(0), &[1]);
        assert_eq!(dag.successors(1), &[2]);
        assert!(dag.predecessors(2).contains(&1));
    }

    #[test]
    fn test_independent_qubits_both_roots() {
        let program = vec![
            g(0, GateKind::H("a".into())),
            g(1, GateKind::H("b".into())),
        ];
        let (_dag, mut roots) = Dag::build(program);
        roots.sort();
        assert_eq!(roots, vec![0, 1]);
    }

    #[test]
    fn test_barrier_all_synchronizes() {
        let program = vec![
            g(0, GateKind::H("a".into())),
            g(1, GateKind::H("b".into())),
            g(2, GateKind::BarrierAll),
            g(3, GateKind::X("a".into())),
            g(4, GateKind::X("c".into())),
        ];
        let (dag, roots) = Dag::build(program);
        assert_eq!(roots, vec![0, 1]);
        let mut barrier_preds = dag.predecessors(2).to_vec();
        barrier_preds.sort();
        assert_eq!(barrier_preds, vec![0, 1]);
        // gate on a new qubit 'c' still depends on the barrier
        assert!(dag.predecessors(4).contains(&2));
        assert!(dag.predecessors(3).contains(&2));
    }

    #[test]
    fn test_selective_barrier_restricted() {
        let program = vec![
            g(0, GateKind::H("a".into())),
            g(1, GateKind::H("b".into())),
            g(2, GateKind::Barrier(vec!["a".into()])),
            g(3, GateKind::X("a".into())),
            g(4, GateKind::X("b".into())),
        ];
        let (dag, roots) = Dag::build(program);
        let mut roots_sorted = roots.clone();
        roots_sorted.sort();
        assert_eq!(roots_sorted, vec![0, 1]);
        assert_eq!(dag.predecessors(2), &[0]);
        assert!(dag.predecessors(3).contains(&2));
        // 'b' is untouched by the selective barrier
        assert!(dag.predecessors(4).contains(&1));
        assert!(!dag.predecessors(4).contains(&2));
    }

    #[test]
    fn test_descendants_within_depth() {
        let program = vec![
            g(0, GateKind::H("a".into())),
            g(1, GateKind::X("a".into())),
            g(2, GateKind::Y("a".into())),
            g(3, GateKind::Z("a".into())),
        ];
        let (dag, _roots) = Dag::build(program);
        assert!(dag.descendants_within(0, 0).is_empty());
        let within_1 = dag.descendants_within(0, 1);
        assert_eq!(within_1, HashSet::from([1]));
        let within_2 = dag.descendants_within(0, 2);
        assert_eq!(within_2, HashSet::from([1, 2]));
    }

    #[test]
    fn test_move_record_participates_like_single_qubit() {
        let program = vec![
            g(0, GateKind::PrepZ("data0".into())),
            g(
                1,
                GateKind::Move {
                    ctrl: "data0".into(),
                    trgt: MoveTarget::Symbolic("data0-init".into()),
                },
            ),
        ];
        let (dag, roots) = Dag::build(program);
        assert_eq!(roots, vec![0]);
        assert!(dag.predecessors(1).contains(&0));
    }
}
