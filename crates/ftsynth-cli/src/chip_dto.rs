//! The external Chip JSON shape: `{ qubit_connectivity: { "<int>": [int,
//! …] }, dimension?: {height, width} }`. Kept as a CLI-local DTO rather
//! than taught to `ftsynth_core::types::Chip` directly, since the wire
//! shape (string-keyed map, caller-declared qubit count) is an
//! interface concern, not a data-model one.

use std::collections::HashMap;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use ftsynth_core::types::{Chip, ChipDimension};

#[derive(Debug, Deserialize)]
pub struct ChipDto {
    pub qubit_connectivity: HashMap<String, Vec<usize>>,
    #[serde(default)]
    pub dimension: Option<ChipDimension>,
}

impl ChipDto {
    /// Converts the wire shape into a validated `Chip`. The qubit count
    /// is taken to be the number of distinct keys; every key must parse
    /// as a decimal integer in `[0, num_qubits)` with no duplicates.
    pub fn into_chip(self) -> Result<Chip> {
        let num_qubits = self.qubit_connectivity.len();
        let mut adjacency: Vec<Option<Vec<usize>>> = vec![None; num_qubits];

        for (key, neighbors) in self.qubit_connectivity {
            let q: usize = key
                .parse()
                .with_context(|| format!("qubit_connectivity key '{key}' is not an integer"))?;
            if q >= num_qubits {
                bail!("qubit_connectivity key {q} is out of range for {num_qubits} declared qubits");
            }
            if adjacency[q].replace(neighbors).is_some() {
                bail!("qubit_connectivity key {q} is listed more than once");
            }
        }

        let adjacency: Vec<Vec<usize>> = adjacency
            .into_iter()
            .enumerate()
            .map(|(q, entry)| entry.with_context(|| format!("qubit_connectivity is missing key {q}")))
            .collect::<Result<_>>()?;

        Chip::new(num_qubits, adjacency, self.dimension).map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chip_dto_parses_linear_chain() {
        let json = r#"{"qubit_connectivity": {"0": [1], "1": [0, 2], "2": [1]}}"#;
        let dto: ChipDto = serde_json::from_str(json).unwrap();
        let chip = dto.into_chip().unwrap();
        assert_eq!(chip.num_qubits(), 3);
        assert!(chip.are_connected(0, 1));
        assert!(!chip.are_connected(0, 2));
    }

    #[test]
    fn test_chip_dto_with_dimension() {
        let json = r#"{
            "qubit_connectivity": {"0": [1], "1": [0]},
            "dimension": {"height": 1, "width": 2}
        }"#;
        let dto: ChipDto = serde_json::from_str(json).unwrap();
        let chip = dto.into_chip().unwrap();
        assert_eq!(chip.dimension().unwrap().width, 2);
    }

    #[test]
    fn test_chip_dto_rejects_out_of_range_key() {
        let json = r#"{"qubit_connectivity": {"0": [], "5": []}}"#;
        let dto: ChipDto = serde_json::from_str(json).unwrap();
        assert!(dto.into_chip().is_err());
    }

    #[test]
    fn test_chip_dto_rejects_missing_key() {
        let json = r#"{"qubit_connectivity": {"0": [1], "2": [1]}}"#;
        let dto: ChipDto = serde_json::from_str(json).unwrap();
        assert!(dto.into_chip().is_err());
    }
}
