//! Physical chip topology and the all-pairs distance matrix.

use std::collections::{BTreeSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::error::{FtSynthError, Result};

/// Optional 2-D layout hint for a chip, carried through unused by the
/// routing engine itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChipDimension {
    pub height: usize,
    pub width: usize,
}

/// Immutable description of physical qubits and their adjacency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chip {
    num_qubits: usize,
    adjacency: Vec<BTreeSet<usize>>,
    dimension: Option<ChipDimension>,
}

impl Chip {
    /// Builds a chip from an adjacency list (`adjacency[i]` = neighbors
    /// of physical qubit `i`). Symmetrizes the list before validating:
    /// the caller's connectivity is normalized so a one-directional edge
    /// listing is accepted, matching the source JSON's unordered
    /// neighbor-list shape.
    pub fn new(
        num_qubits: usize,
        adjacency: Vec<Vec<usize>>,
        dimension: Option<ChipDimension>,
    ) -> Result<Self> {
        if adjacency.len() != num_qubits {
            return Err(FtSynthError::invalid_chip(format!(
                "adjacency list has {} entries, expected {}",
                adjacency.len(),
                num_qubits
            )));
        }

        let mut sets: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); num_qubits];
        for (q, neighbors) in adjacency.into_iter().enumerate() {
            for n in neighbors {
                if n >= num_qubits {
                    return Err(FtSynthError::invalid_chip(format!(
                        "neighbor {n} of qubit {q} is out of range [0, {num_qubits})"
                    )));
                }
                if n == q {
                    return Err(FtSynthError::invalid_chip(format!(
                        "qubit {q} lists itself as a neighbor"
                    )));
                }
                sets[q].insert(n);
                sets[n].insert(q);
            }
        }

        let chip = Self {
            num_qubits,
            adjacency: sets,
            dimension,
        };
        chip.validate_connected()?;
        Ok(chip)
    }

    fn validate_connected(&self) -> Result<()> {
        if self.num_qubits == 0 {
            return Ok(());
        }
        let mut seen = vec![false; self.num_qubits];
        let mut queue = VecDeque::new();
        queue.push_back(0usize);
        seen[0] = true;
        let mut visited = 1;
        while let Some(q) = queue.pop_front() {
            for &n in &self.adjacency[q] {
                if !seen[n] {
                    seen[n] = true;
                    visited += 1;
                    queue.push_back(n);
                }
            }
        }
        if visited != self.num_qubits {
            return Err(FtSynthError::invalid_chip(
                "chip adjacency graph is disconnected",
            ));
        }
        Ok(())
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    pub fn dimension(&self) -> Option<ChipDimension> {
        self.dimension
    }

    /// Neighbors of a physical qubit, as a sorted slice view.
    pub fn neighbors(&self, q: usize) -> impl Iterator<Item = usize> + '_ {
        self.adjacency[q].iter().copied()
    }

    pub fn are_connected(&self, a: usize, b: usize) -> bool {
        self.adjacency[a].contains(&b)
    }

    /// Builds the all-pairs shortest-path distance matrix via BFS from
    /// every vertex.
    pub fn distance_matrix(&self) -> DistanceMatrix {
        let n = self.num_qubits;
        let mut table = vec![vec![usize::MAX; n]; n];
        for src in 0..n {
            table[src][src] = 0;
            let mut queue = VecDeque::new();
            queue.push_back(src);
            while let Some(q) = queue.pop_front() {
                let d = table[src][q];
                for &nb in &self.adjacency[q] {
                    if table[src][nb] == usize::MAX {
                        table[src][nb] = d + 1;
                        queue.push_back(nb);
                    }
                }
            }
        }
        DistanceMatrix { table }
    }
}

/// Nq x Nq table of shortest hop counts. `D[i][i] == 0`; `D` is
/// symmetric; entries are finite iff the chip is connected (enforced at
/// construction of [`Chip`]).
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    table: Vec<Vec<usize>>,
}

impl DistanceMatrix {
    pub fn get(&self, a: usize, b: usize) -> usize {
        self.table[a][b]
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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

    #[test]
    fn test_linear_chip_adjacency() {
        let chip = linear_chip(3);
        assert!(chip.are_connected(0, 1));
        assert!(chip.are_connected(1, 2));
        assert!(!chip.are_connected(0, 2));
    }

    #[test]
    fn test_distance_matrix_symmetry_and_triangle_inequality() {
        let chip = linear_chip(5);
        let d = chip.distance_matrix();
        for i in 0..5 {
            for j in 0..5 {
                assert_eq!(d.get(i, j), d.get(j, i));
                for k in 0..5 {
                    assert!(d.get(i, k) <= d.get(i, j) + d.get(j, k));
                }
            }
        }
        assert_eq!(d.get(0, 4), 4);
        assert_eq!(d.get(0, 0), 0);
    }

    #[test]
    fn test_disconnected_chip_rejected() {
        // qubit 2 is isolated
        let adjacency = vec![vec![1], vec![0], vec![]];
        let err = Chip::new(3, adjacency, None).unwrap_err();
        assert!(matches!(err, FtSynthError::InvalidChip(_)));
    }

    #[test]
    fn test_asymmetric_input_is_symmetrized() {
        // only 0 -> 1 listed, not the reverse
        let adjacency = vec![vec![1], vec![], vec![1]];
        let chip = Chip::new(3, adjacency, None).unwrap();
        assert!(chip.are_connected(1, 0));
        assert!(chip.are_connected(1, 2));
    }
}
