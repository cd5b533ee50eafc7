//! Physicalized emission: a gate record with logical qubit names resolved
//! to physical indices via the mapping in effect at execution time.

use serde::{Deserialize, Serialize};

/// A single emitted instruction, addressed by physical qubit index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PhysicalOp {
    H(usize),
    X(usize),
    Y(usize),
    Z(usize),
    S(usize),
    T(usize),
    Tdag(usize),
    Sx(usize),
    Rz(usize, f64),
    U(usize, f64, f64, f64),
    PrepZ(usize),
    PrepX(usize),
    MeasZ(usize, Option<String>),
    MeasX(usize, Option<String>),
    Cnot { ctrl: usize, trgt: usize },
    Cz { ctrl: usize, trgt: usize },
    Swap { a: usize, b: usize },
    /// A logical Move that has reached its destination; carried through
    /// to the emission for callers that want to record the event, but
    /// contributes no quantum operation of its own.
    Move(usize),
    BarrierAll,
    Barrier(Vec<usize>),
}

impl PhysicalOp {
    /// The physical qubits this op touches, in emission order.
    pub fn qubits(&self) -> Vec<usize> {
        match self {
            PhysicalOp::H(q)
            | PhysicalOp::X(q)
            | PhysicalOp::Y(q)
            | PhysicalOp::Z(q)
            | PhysicalOp::S(q)
            | PhysicalOp::T(q)
            | PhysicalOp::Tdag(q)
            | PhysicalOp::Sx(q)
            | PhysicalOp::PrepZ(q)
            | PhysicalOp::PrepX(q)
            | PhysicalOp::Rz(q, _)
            | PhysicalOp::U(q, _, _, _)
            | PhysicalOp::MeasZ(q, _)
            | PhysicalOp::MeasX(q, _)
            | PhysicalOp::Move(q) => vec![*q],
            PhysicalOp::Cnot { ctrl, trgt } | PhysicalOp::Cz { ctrl, trgt } => vec![*ctrl, *trgt],
            PhysicalOp::Swap { a, b } => vec![*a, *b],
            PhysicalOp::BarrierAll => vec![],
            PhysicalOp::Barrier(qs) => qs.clone(),
        }
    }

    pub fn is_two_qubit(&self) -> bool {
        matches!(
            self,
            PhysicalOp::Cnot { .. } | PhysicalOp::Cz { .. } | PhysicalOp::Swap { .. }
        )
    }
}
