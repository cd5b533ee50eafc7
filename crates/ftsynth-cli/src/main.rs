//! FTSynth CLI - fault-tolerant circuit routing front end.
//!
//! Reads a chip topology, a gate program, and (optionally) synthesis
//! options and a fixed initial mapping, all as JSON, runs the
//! mapping/SWAP-insertion engine, and reports the routed circuit.

mod chip_dto;
mod output;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use ftsynth_core::config::SynthesisOptions;
use ftsynth_core::types::GateRecord;

use chip_dto::ChipDto;
use output::OutputDto;

/// FTSynth - fault-tolerant circuit routing engine.
#[derive(Parser)]
#[command(name = "ftsynth")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose (debug-level) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Route a program onto a chip, emitting a checkup-validated circuit
    Route {
        /// Path to Chip JSON (`{qubit_connectivity, dimension?}`)
        #[arg(long, value_name = "FILE")]
        chip: PathBuf,

        /// Path to a JSON array of gate records
        #[arg(long, value_name = "FILE")]
        program: PathBuf,

        /// Path to a `SynthesisOptions` JSON file; defaults are used if
        /// omitted
        #[arg(long, value_name = "FILE")]
        options: Option<PathBuf>,

        /// Path to a JSON object pinning logical names to physical
        /// indices; when given, every round is a single forward pass
        /// from that mapping
        #[arg(long = "fixed-mapping", value_name = "FILE")]
        fixed_mapping: Option<PathBuf>,
    },

    /// Print the default `SynthesisOptions` as JSON, for use as a
    /// starting point for `--options`
    DefaultOptions,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let _ = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .without_time()
        .try_init();

    match cli.command {
        Commands::Route {
            chip,
            program,
            options,
            fixed_mapping,
        } => cmd_route(&chip, &program, options.as_deref(), fixed_mapping.as_deref(), cli.format),
        Commands::DefaultOptions => cmd_default_options(cli.format),
    }
}

fn cmd_route(
    chip_path: &Path,
    program_path: &Path,
    options_path: Option<&Path>,
    fixed_mapping_path: Option<&Path>,
    format: OutputFormat,
) -> Result<()> {
    let chip_dto: ChipDto = read_json(chip_path)?;
    let chip = chip_dto
        .into_chip()
        .with_context(|| format!("invalid chip topology in {}", chip_path.display()))?;

    let program: Vec<GateRecord> = read_json(program_path)?;
    info!(gates = program.len(), qubits = chip.num_qubits(), "loaded program");

    let options: SynthesisOptions = match options_path {
        Some(path) => read_json(path)?,
        None => SynthesisOptions::default(),
    };

    let fixed_mapping: Option<HashMap<String, usize>> = match fixed_mapping_path {
        Some(path) => Some(read_json(path)?),
        None => None,
    };

    let result = ftsynth_route::synthesize(&chip, program, &options, fixed_mapping)
        .context("synthesis failed")?;
    let dto = OutputDto::from(&result);

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&dto)?);
        }
        OutputFormat::Text => print_route_summary(&dto),
    }

    Ok(())
}

fn print_route_summary(dto: &OutputDto) {
    println!("\n=== FTSynth Route Result ===");
    println!("Checkup:       {}", dto.checkup);
    println!("Gates emitted: {}", dto.analysis.number_gates);
    println!("Circuit depth: {}", dto.analysis.circuit_depth);
    println!("SWAPs:         {}", dto.analysis.swaps_inserted);
    println!("Data SWAPs:    {}", dto.analysis.data_swap_count);
    println!(
        "Rounds:        {}/{} completed{}",
        dto.analysis.rounds_completed,
        dto.analysis.rounds_attempted,
        if dto.analysis.used_uncapped_fallback {
            " (uncapped fallback used)"
        } else {
            ""
        }
    );
    println!("RNG seed:      {}", dto.analysis.rng_seed);
    println!();
    for t in 0..dto.system_code.circuit.len() {
        if let Some(ops) = dto.system_code.circuit.get(&t.to_string()) {
            println!("t={t}: {}", ops.join("; "));
        }
    }
}

fn cmd_default_options(format: OutputFormat) -> Result<()> {
    let options = SynthesisOptions::default();
    match format {
        OutputFormat::Json => println!("{}", options.to_json()?),
        OutputFormat::Text => println!("{}", options.to_json()?),
    }
    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse {} as JSON", path.display()))
}
