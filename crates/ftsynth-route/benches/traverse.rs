//! Traversal engine benchmark.
//!
//! Target: sub-millisecond routing for small linear-chain programs, used
//! as a regression guard on the front-layer walk's hot loop.

use std::collections::HashMap;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use ftsynth_core::types::{Chip, Dag, GateKind, GateRecord, QubitMapping};
use ftsynth_route::engine::{traverse, CostStrategy, Direction, TraversalOptions};

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

/// Two physical qubits are reserved as ancillas (born inactive) so the
/// wrap-around CNOT (`data{n-1},data0`) has somewhere inactive to step
/// aside through under a zero data-interaction allowance, instead of
/// deadlocking on an active-active swap it is not permitted to make.
const NUM_ANCILLA: usize = 2;

fn cnot_chain(num_data: usize, num_gates: usize) -> Vec<GateRecord> {
    (0..num_gates)
        .map(|i| {
            let ctrl = format!("data{}", i % num_data);
            let trgt = format!("data{}", (i + 1) % num_data);
            GateRecord::new(i as u32, GateKind::Cnot { ctrl, trgt })
        })
        .collect()
}

fn initial_mapping(num_qubits: usize) -> QubitMapping {
    let num_data = num_qubits - NUM_ANCILLA;
    let mut assignment = HashMap::with_capacity(num_qubits);
    for i in 0..num_data {
        assignment.insert(format!("data{i}"), num_data - 1 - i);
    }
    for a in 0..NUM_ANCILLA {
        assignment.insert(format!("ancilla{a}"), num_data + a);
    }
    QubitMapping::new(assignment, num_qubits).unwrap()
}

fn bench_traverse_linear_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("traverse_linear_chain");

    for num_gates in [10, 25, 50] {
        let num_qubits = 8;
        let chip = linear_chip(num_qubits);
        let distance = chip.distance_matrix();
        let program = cnot_chain(num_qubits - NUM_ANCILLA, num_gates);

        group.bench_with_input(
            BenchmarkId::new("gates", num_gates),
            &program,
            |b, program| {
                b.iter(|| {
                    let (dag, roots) = Dag::build(program.clone());
                    let mut mapping = initial_mapping(num_qubits);
                    let options = TraversalOptions {
                        cost: CostStrategy::Lap,
                        lap_depth: 1,
                        decay_factor: 0.1,
                        extended_set_weight: 0.5,
                        allow_swap: true,
                        allowable_data_interaction: 0,
                        write_syscode: true,
                        moveback: false,
                        homebase: None,
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
                    .unwrap()
                })
            },
        );
    }

    group.finish();
}

fn bench_traverse_nnc_vs_lap(c: &mut Criterion) {
    let mut group = c.benchmark_group("traverse_cost_strategy");
    let num_qubits = 8;
    let chip = linear_chip(num_qubits);
    let distance = chip.distance_matrix();
    let program = cnot_chain(num_qubits - NUM_ANCILLA, 30);

    for cost in [CostStrategy::Nnc, CostStrategy::Lap] {
        let label = match cost {
            CostStrategy::Nnc => "nnc",
            CostStrategy::Lap => "lap",
        };
        group.bench_function(label, |b| {
            b.iter(|| {
                let (dag, roots) = Dag::build(program.clone());
                let mut mapping = initial_mapping(num_qubits);
                let options = TraversalOptions {
                    cost,
                    lap_depth: 1,
                    decay_factor: 0.1,
                    extended_set_weight: 0.5,
                    allow_swap: true,
                    allowable_data_interaction: 0,
                    write_syscode: true,
                    moveback: false,
                    homebase: None,
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
                .unwrap()
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_traverse_linear_chain, bench_traverse_nnc_vs_lap);
criterion_main!(benches);
