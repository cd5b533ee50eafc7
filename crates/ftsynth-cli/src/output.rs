//! Renders a `SynthesisOutput` into the external result shape:
//! `{ system_code: { circuit, initial_mapping, final_mapping },
//! analysis: {…}, checkup: "ok"|"fail" }`, with circuit commands
//! rendered as the documented mnemonic text (`G q`, `Rz(θ) q`, `MeasZ q
//! -> c`, `Barrier-All`, …).

use std::collections::BTreeMap;

use serde::Serialize;

use ftsynth_core::types::Role;
use ftsynth_route::{Analysis, CheckupStatus, PhysicalOp, SynthesisOutput};

#[derive(Debug, Serialize)]
pub struct OutputDto {
    pub system_code: SystemCodeDto,
    pub analysis: AnalysisDto,
    pub checkup: String,
}

#[derive(Debug, Serialize)]
pub struct SystemCodeDto {
    /// Keyed by time index, stringified, since JSON object keys must be
    /// strings; matches the external "time_index -> commands" shape.
    pub circuit: BTreeMap<String, Vec<String>>,
    pub initial_mapping: std::collections::HashMap<String, usize>,
    pub final_mapping: std::collections::HashMap<String, usize>,
}

#[derive(Debug, Serialize)]
pub struct AnalysisDto {
    pub interactions: Vec<InteractionCountDto>,
    pub data_swap_count: usize,
    pub swaps_inserted: usize,
    pub circuit_depth: usize,
    pub number_gates: usize,
    pub rounds_attempted: usize,
    pub rounds_completed: usize,
    pub used_uncapped_fallback: bool,
    pub rng_seed: u64,
}

#[derive(Debug, Serialize)]
pub struct InteractionCountDto {
    pub role_a: Role,
    pub role_b: Role,
    pub count: usize,
}

impl From<&SynthesisOutput> for OutputDto {
    fn from(out: &SynthesisOutput) -> Self {
        let circuit = out
            .circuit
            .iter()
            .enumerate()
            .map(|(t, ops)| (t.to_string(), ops.iter().map(render_op).collect()))
            .collect();

        OutputDto {
            system_code: SystemCodeDto {
                circuit,
                initial_mapping: out.initial_mapping.clone(),
                final_mapping: out.final_mapping.clone(),
            },
            analysis: render_analysis(&out.analysis),
            checkup: match out.checkup {
                CheckupStatus::Ok => "ok".to_string(),
                CheckupStatus::Fail => "fail".to_string(),
            },
        }
    }
}

fn render_analysis(analysis: &Analysis) -> AnalysisDto {
    let mut interactions: Vec<InteractionCountDto> = analysis
        .interactions
        .iter()
        .map(|(&(a, b), &count)| InteractionCountDto {
            role_a: a,
            role_b: b,
            count,
        })
        .collect();
    interactions.sort_by_key(|entry| (entry.role_a, entry.role_b));

    AnalysisDto {
        interactions,
        data_swap_count: analysis.data_swap_count,
        swaps_inserted: analysis.swaps_inserted,
        circuit_depth: analysis.circuit_depth,
        number_gates: analysis.number_gates,
        rounds_attempted: analysis.rounds_attempted,
        rounds_completed: analysis.rounds_completed,
        used_uncapped_fallback: analysis.used_uncapped_fallback,
        rng_seed: analysis.rng_seed,
    }
}

fn render_op(op: &PhysicalOp) -> String {
    match op {
        PhysicalOp::H(q) => format!("H {q}"),
        PhysicalOp::X(q) => format!("X {q}"),
        PhysicalOp::Y(q) => format!("Y {q}"),
        PhysicalOp::Z(q) => format!("Z {q}"),
        PhysicalOp::S(q) => format!("S {q}"),
        PhysicalOp::T(q) => format!("T {q}"),
        PhysicalOp::Tdag(q) => format!("Tdag {q}"),
        PhysicalOp::Sx(q) => format!("Sx {q}"),
        PhysicalOp::Rz(q, theta) => format!("Rz({theta}) {q}"),
        PhysicalOp::U(q, x, y, z) => format!("U({x},{y},{z}) {q}"),
        PhysicalOp::PrepZ(q) => format!("PrepZ {q}"),
        PhysicalOp::PrepX(q) => format!("PrepX {q}"),
        PhysicalOp::MeasZ(q, Some(c)) => format!("MeasZ {q} -> {c}"),
        PhysicalOp::MeasZ(q, None) => format!("MeasZ {q}"),
        PhysicalOp::MeasX(q, Some(c)) => format!("MeasX {q} -> {c}"),
        PhysicalOp::MeasX(q, None) => format!("MeasX {q}"),
        PhysicalOp::Cnot { ctrl, trgt } => format!("CNOT {ctrl},{trgt}"),
        PhysicalOp::Cz { ctrl, trgt } => format!("CZ {ctrl},{trgt}"),
        PhysicalOp::Swap { a, b } => format!("SWAP {a},{b}"),
        PhysicalOp::Move(q) => format!("Move {q}"),
        PhysicalOp::BarrierAll => "Barrier-All".to_string(),
        PhysicalOp::Barrier(qs) => {
            let names = qs.iter().map(usize::to_string).collect::<Vec<_>>().join(",");
            format!("Barrier [{names}]")
        }
    }
}
