//! Gate record: a single instruction in the program model, expressed
//! over logical qubit names rather than physical indices.

use serde::{Deserialize, Serialize};

/// Stable identifier for a gate record, used as the dependency graph's
/// node index.
pub type GateId = u32;

/// Resolution target of a Move instruction's destination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MoveTarget {
    /// Already-resolved physical index.
    Physical(usize),
    /// Symbolic home reference, e.g. `"data0-init"` or a bare home name,
    /// resolved against the current (or caller-supplied) home position
    /// of the named data qubit at the start of a forward traversal.
    Symbolic(String),
}

/// The operation carried by a gate record, over logical qubit names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GateKind {
    H(String),
    X(String),
    Y(String),
    Z(String),
    S(String),
    T(String),
    Tdag(String),
    Sx(String),
    /// Rz(angle) target
    Rz(String, f64),
    /// U(ax, ay, az) target
    U(String, f64, f64, f64),
    PrepZ(String),
    PrepX(String),
    /// MeasZ target, optional classical-bit tag
    MeasZ(String, Option<String>),
    /// MeasX target, optional classical-bit tag
    MeasX(String, Option<String>),
    Cnot { ctrl: String, trgt: String },
    Cz { ctrl: String, trgt: String },
    Swap { ctrl: String, trgt: String },
    /// Move(ctrl, destination)
    Move { ctrl: String, trgt: MoveTarget },
    BarrierAll,
    /// Selective barrier over the named logical qubits.
    Barrier(Vec<String>),
}

impl GateKind {
    /// Number of logical-qubit operands this kind carries (0, 1, or 2).
    /// Barrier-all carries none; a selective barrier's operand count is
    /// reported as 0 here too since it is not a single-/two-qubit gate —
    /// use [`GateKind::qubits`] to enumerate the qubits it touches.
    pub fn qubit_count(&self) -> usize {
        match self {
            GateKind::BarrierAll | GateKind::Barrier(_) => 0,
            GateKind::Cnot { .. }
            | GateKind::Cz { .. }
            | GateKind::Swap { .. } => 2,
            GateKind::Move { .. } => 1,
            _ => 1,
        }
    }

    pub fn is_two_qubit(&self) -> bool {
        matches!(
            self,
            GateKind::Cnot { .. } | GateKind::Cz { .. } | GateKind::Swap { .. }
        )
    }

    pub fn is_move(&self) -> bool {
        matches!(self, GateKind::Move { .. })
    }

    pub fn is_barrier_all(&self) -> bool {
        matches!(self, GateKind::BarrierAll)
    }

    pub fn is_selective_barrier(&self) -> bool {
        matches!(self, GateKind::Barrier(_))
    }

    pub fn is_prep(&self) -> bool {
        matches!(self, GateKind::PrepZ(_) | GateKind::PrepX(_))
    }

    pub fn is_meas(&self) -> bool {
        matches!(self, GateKind::MeasZ(_, _) | GateKind::MeasX(_, _))
    }

    /// Every logical qubit name this gate touches, in a stable order
    /// (ctrl before trgt for two-qubit gates). Used to build per-qubit
    /// dependency chains and to resolve the qubits a selective barrier
    /// blocks.
    pub fn qubits(&self) -> Vec<&str> {
        match self {
            GateKind::H(q)
            | GateKind::X(q)
            | GateKind::Y(q)
            | GateKind::Z(q)
            | GateKind::S(q)
            | GateKind::T(q)
            | GateKind::Tdag(q)
            | GateKind::Sx(q)
            | GateKind::PrepZ(q)
            | GateKind::PrepX(q)
            | GateKind::Rz(q, _)
            | GateKind::U(q, _, _, _)
            | GateKind::MeasZ(q, _)
            | GateKind::MeasX(q, _) => vec![q.as_str()],
            GateKind::Cnot { ctrl, trgt }
            | GateKind::Cz { ctrl, trgt }
            | GateKind::Swap { ctrl, trgt } => vec![ctrl.as_str(), trgt.as_str()],
            GateKind::Move { ctrl, .. } => vec![ctrl.as_str()],
            GateKind::BarrierAll => vec![],
            GateKind::Barrier(qs) => qs.iter().map(String::as_str).collect(),
        }
    }
}

/// A single instruction in the program model, uniquely identified and
/// carrying the operation it performs over logical qubit names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateRecord {
    pub id: GateId,
    pub kind: GateKind,
}

impl GateRecord {
    pub fn new(id: GateId, kind: GateKind) -> Self {
        Self { id, kind }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_qubit_classification() {
        let g = GateKind::Cnot {
            ctrl: "data0".into(),
            trgt: "data1".into(),
        };
        assert!(g.is_two_qubit());
        assert_eq!(g.qubits(), vec!["data0", "data1"]);
    }

    #[test]
    fn test_barrier_all_has_no_qubits() {
        assert!(GateKind::BarrierAll.qubits().is_empty());
        assert!(GateKind::BarrierAll.is_barrier_all());
    }

    #[test]
    fn test_selective_barrier_qubits() {
        let g = GateKind::Barrier(vec!["ancilla0".into(), "ancilla1".into()]);
        assert!(g.is_selective_barrier());
        assert_eq!(g.qubits(), vec!["ancilla0", "ancilla1"]);
    }

    #[test]
    fn test_move_symbolic_target() {
        let g = GateKind::Move {
            ctrl: "data0".into(),
            trgt: MoveTarget::Symbolic("data0-init".into()),
        };
        assert!(g.is_move());
        assert_eq!(g.qubits(), vec!["data0"]);
    }

    #[test]
    fn test_prep_meas_classification() {
        assert!(GateKind::PrepZ("ancilla0".into()).is_prep());
        assert!(GateKind::MeasZ("ancilla0".into(), Some("c0".into())).is_meas());
        assert!(!GateKind::PrepZ("ancilla0".into()).is_meas());
    }
}
