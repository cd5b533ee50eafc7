//! Post-synthesis validation: confirms every emitted 2-qubit operation
//! acts on chip-adjacent physical qubits. Grounded in the distilled
//! spec's `CheckupFailed` error and the original `checkup.py` module,
//! which the driver's final validation step folds into.

use ftsynth_core::error::{FtSynthError, Result};
use ftsynth_core::types::Chip;

use crate::physical_op::PhysicalOp;

/// Walks the emitted, physicalized instruction sequence and confirms
/// every 2-qubit operation's two physical operands are chip-adjacent.
/// Returns the index and offending pair of the first violation.
pub fn checkup(emitted: &[PhysicalOp], chip: &Chip) -> Result<()> {
    for (index, op) in emitted.iter().enumerate() {
        let pair = match op {
            PhysicalOp::Cnot { ctrl, trgt } => Some((*ctrl, *trgt)),
            PhysicalOp::Cz { ctrl, trgt } => Some((*ctrl, *trgt)),
            PhysicalOp::Swap { a, b } => Some((*a, *b)),
            _ => None,
        };
        if let Some((p1, p2)) = pair {
            if !chip.are_connected(p1, p2) {
                return Err(FtSynthError::CheckupFailed { index, p1, p2 });
            }
        }
    }
    Ok(())
}
