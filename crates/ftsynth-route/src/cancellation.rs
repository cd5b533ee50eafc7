//! Redundancy cancellation: a per-qubit stack-based pass over a linear
//! emission that cancels adjacent inverse/identical gates and fuses
//! adjacent parameterized gates. Grounded in `formatconversion.py`'s
//! `cancel_redundancy`.

use std::collections::HashMap;

use crate::physical_op::PhysicalOp;

#[derive(Debug, Clone, Copy, PartialEq)]
enum SingleKind {
    H,
    X,
    Y,
    Z,
    S,
    T,
    Tdag,
    Sx,
}

fn single_qubit_kind(op: &PhysicalOp) -> Option<SingleKind> {
    match op {
        PhysicalOp::H(_) => Some(SingleKind::H),
        PhysicalOp::X(_) => Some(SingleKind::X),
        PhysicalOp::Y(_) => Some(SingleKind::Y),
        PhysicalOp::Z(_) => Some(SingleKind::Z),
        PhysicalOp::S(_) => Some(SingleKind::S),
        PhysicalOp::T(_) => Some(SingleKind::T),
        PhysicalOp::Tdag(_) => Some(SingleKind::Tdag),
        PhysicalOp::Sx(_) => Some(SingleKind::Sx),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum TwoKind {
    Cnot,
    Cz,
}

/// One entry in a qubit's cancellation stack: which output slot it came
/// from, and enough of a descriptor to decide whether the next op on
/// this qubit matches it.
#[derive(Debug, Clone)]
enum StackEntry {
    Single(SingleKind, usize),
    Rz(usize),
    U(usize),
    TwoQubit { kind: TwoKind, ctrl: usize, trgt: usize, slot: usize },
    Swap { a: usize, b: usize, slot: usize },
    Barrier,
}

/// Cancels adjacent redundant instructions in a linear emission.
///
/// - Adjacent identical CNOT/CZ on the same `(ctrl, trgt)` order cancel.
/// - Adjacent identical SWAP on the same unordered pair cancels.
/// - Adjacent identical 1-qubit non-parameterized gates on the same
///   qubit cancel.
/// - Adjacent Rz on the same qubit fuse (angles summed) — the fused
///   gate is kept even when the sum is zero; only an exact inverse pair
///   collapses to a literal zero-angle rotation, never removed outright.
/// - Adjacent U on the same qubit fuse (Euler components summed
///   component-wise).
/// - Barriers are preserved verbatim and act as a cancellation fence: a
///   barrier marker sits at the top of every qubit stack it touches, so
///   cancellation never reaches through it.
pub fn cancel_redundancy(emitted: &[PhysicalOp]) -> Vec<PhysicalOp> {
    let mut output: Vec<Option<PhysicalOp>> = Vec::with_capacity(emitted.len());
    let mut stacks: HashMap<usize, Vec<StackEntry>> = HashMap::new();

    for op in emitted {
        match op {
            PhysicalOp::Rz(q, angle) => {
                let stack = stacks.entry(*q).or_default();
                if let Some(&StackEntry::Rz(slot)) = stack.last() {
                    if let Some(Some(PhysicalOp::Rz(_, existing))) = output.get_mut(slot) {
                        *existing += angle;
                    }
                } else {
                    let slot = output.len();
                    output.push(Some(op.clone()));
                    stack.push(StackEntry::Rz(slot));
                }
            }
            PhysicalOp::U(q, ax, ay, az) => {
                let stack = stacks.entry(*q).or_default();
                if let Some(&StackEntry::U(slot)) = stack.last() {
                    if let Some(Some(PhysicalOp::U(_, ex, ey, ez))) = output.get_mut(slot) {
                        *ex += ax;
                        *ey += ay;
                        *ez += az;
                    }
                } else {
                    let slot = output.len();
                    output.push(Some(op.clone()));
                    stack.push(StackEntry::U(slot));
                }
            }
            _ if single_qubit_kind(op).is_some() => {
                let kind = single_qubit_kind(op).unwrap();
                let q = match op {
                    PhysicalOp::H(q)
                    | PhysicalOp::X(q)
                    | PhysicalOp::Y(q)
                    | PhysicalOp::Z(q)
                    | PhysicalOp::S(q)
                    | PhysicalOp::T(q)
                    | PhysicalOp::Tdag(q)
                    | PhysicalOp::Sx(q) => *q,
                    _ => unreachable!(),
                };
                let stack = stacks.entry(q).or_default();
                if let Some(&StackEntry::Single(top_kind, slot)) = stack.last() {
                    if top_kind == kind {
                        output[slot] = None;
                        stack.pop();
                        continue;
                    }
                }
                let slot = output.len();
                output.push(Some(op.clone()));
                stack.push(StackEntry::Single(kind, slot));
            }
            PhysicalOp::Cnot { ctrl, trgt } | PhysicalOp::Cz { ctrl, trgt } => {
                let kind = if matches!(op, PhysicalOp::Cnot { .. }) {
                    TwoKind::Cnot
                } else {
                    TwoKind::Cz
                };
                let ctrl_top = stacks.get(ctrl).and_then(|s| s.last()).cloned();
                let trgt_top = stacks.get(trgt).and_then(|s| s.last()).cloned();
                let matched = match (&ctrl_top, &trgt_top) {
                    (
                        Some(StackEntry::TwoQubit { kind: k1, ctrl: c1, trgt: t1, slot: s1 }),
                        Some(StackEntry::TwoQubit { kind: k2, ctrl: c2, trgt: t2, slot: s2 }),
                    ) => *k1 == kind && *k2 == kind && c1 == ctrl && t1 == trgt && s1 == s2 && c1 == c2 && t1 == t2,
                    _ => false,
                };
                if matched {
                    if let Some(StackEntry::TwoQubit { slot, .. }) = &ctrl_top {
                        output[*slot] = None;
                    }
                    stacks.get_mut(ctrl).unwrap().pop();
                    stacks.get_mut(trgt).unwrap().pop();
                } else {
                    let slot = output.len();
                    output.push(Some(op.clone()));
                    stacks.entry(*ctrl).or_default().push(StackEntry::TwoQubit {
                        kind,
                        ctrl: *ctrl,
                        trgt: *trgt,
                        slot,
                    });
                    stacks.entry(*trgt).or_default().push(StackEntry::TwoQubit {
                        kind,
                        ctrl: *ctrl,
                        trgt: *trgt,
                        slot,
                    });
                }
            }
            PhysicalOp::Swap { a, b } => {
                let a_top = stacks.get(a).and_then(|s| s.last()).cloned();
                let b_top = stacks.get(b).and_then(|s| s.last()).cloned();
                let matched = match (&a_top, &b_top) {
                    (
                        Some(StackEntry::Swap { a: a1, b: b1, slot: s1 }),
                        Some(StackEntry::Swap { a: a2, b: b2, slot: s2 }),
                    ) => s1 == s2 && same_unordered_pair((*a1, *b1), (*a, *b)) && same_unordered_pair((*a2, *b2), (*a, *b)),
                    _ => false,
                };
                if matched {
                    if let Some(StackEntry::Swap { slot, .. }) = &a_top {
                        output[*slot] = None;
                    }
                    stacks.get_mut(a).unwrap().pop();
                    stacks.get_mut(b).unwrap().pop();
                } else {
                    let slot = output.len();
                    output.push(Some(op.clone()));
                    stacks.entry(*a).or_default().push(StackEntry::Swap { a: *a, b: *b, slot });
                    stacks.entry(*b).or_default().push(StackEntry::Swap { a: *a, b: *b, slot });
                }
            }
            PhysicalOp::BarrierAll => {
                output.push(Some(op.clone()));
                let keys: Vec<usize> = stacks.keys().copied().collect();
                for q in keys {
                    stacks.get_mut(&q).unwrap().push(StackEntry::Barrier);
                }
            }
            PhysicalOp::Barrier(qs) => {
                output.push(Some(op.clone()));
                for &q in qs {
                    stacks.entry(q).or_default().push(StackEntry::Barrier);
                }
            }
            // Prepare, measure, and move events are never cancelable; they
            // still occupy the top of their qubit's stack so a later
            // single-qubit gate does not spuriously match through them,
            // but as a non-matching `Barrier`-like fence rather than a
            // cancelable entry (re-using the same marker for simplicity
            // since neither kind ever equals a `Single`/`Rz`/`U` top).
            PhysicalOp::PrepZ(q) | PhysicalOp::PrepX(q) | PhysicalOp::MeasZ(q, _)
            | PhysicalOp::MeasX(q, _) | PhysicalOp::Move(q) => {
                output.push(Some(op.clone()));
                stacks.entry(*q).or_default().push(StackEntry::Barrier);
            }
        }
    }

    output.into_iter().flatten().collect()
}

fn same_unordered_pair(p: (usize, usize), q: (usize, usize)) -> bool {
    (p.0 == q.0 && p.1 == q.1) || (p.0 == q.1 && p.1 == q.0)
}
