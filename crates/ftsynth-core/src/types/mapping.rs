//! Bijective logical/physical qubit mapping and per-qubit usage status.

use std::collections::HashMap;

use crate::error::{FtSynthError, Result};
use crate::types::role::Role;

/// Whether a logical qubit currently holds live quantum information that
/// must be preserved. Active<->active SWAPs are regulated by
/// `allowable_data_interaction`; see [`crate::config::SynthesisOptions`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QubitStatus {
    Active,
    Inactive,
}

impl QubitStatus {
    /// Initial status for a freshly mapped logical qubit, derived from its
    /// role: "data" and "magic" are born active, everything else inactive.
    pub fn initial_for(role: Role) -> Self {
        if role.starts_active() {
            QubitStatus::Active
        } else {
            QubitStatus::Inactive
        }
    }

    pub fn flip(self) -> Self {
        match self {
            QubitStatus::Active => QubitStatus::Inactive,
            QubitStatus::Inactive => QubitStatus::Active,
        }
    }
}

/// Bijective mapping between logical qubit names and physical qubit
/// indices, mutated only by applying a SWAP (exchanging two entries).
///
/// Maintains the forward (`logical -> physical`) table and its inverse
/// together so `inverse(physical)` is O(1) in the traversal engine's hot
/// loop, matching the distilled spec's `inverse_mapping` state.
#[derive(Debug, Clone)]
pub struct QubitMapping {
    logical_to_physical: HashMap<String, usize>,
    physical_to_logical: Vec<Option<String>>,
    status: HashMap<String, QubitStatus>,
    roles: HashMap<String, Role>,
}

impl QubitMapping {
    /// Builds a mapping from an explicit logical -> physical assignment.
    /// Every physical index must be `< num_qubits` and assignments must be
    /// injective; status is derived per-name from [`Role::from_name`].
    pub fn new(assignment: HashMap<String, usize>, num_qubits: usize) -> Result<Self> {
        if assignment.len() > num_qubits {
            return Err(FtSynthError::invalid_mapping(format!(
                "{} logical qubits cannot fit on {} physical qubits",
                assignment.len(),
                num_qubits
            )));
        }
        let mut physical_to_logical: Vec<Option<String>> = vec![None; num_qubits];
        let mut status = HashMap::with_capacity(assignment.len());
        let mut roles = HashMap::with_capacity(assignment.len());
        for (name, &phys) in &assignment {
            if phys >= num_qubits {
                return Err(FtSynthError::invalid_mapping(format!(
                    "physical index {phys} out of range [0, {num_qubits}) for '{name}'"
                )));
            }
            if physical_to_logical[phys].is_some() {
                return Err(FtSynthError::invalid_mapping(format!(
                    "physical index {phys} is assigned to more than one logical qubit"
                )));
            }
            physical_to_logical[phys] = Some(name.clone());
            let role = Role::from_name(name);
            roles.insert(name.clone(), role);
            status.insert(name.clone(), QubitStatus::initial_for(role));
        }
        Ok(Self {
            logical_to_physical: assignment,
            physical_to_logical,
            status,
            roles,
        })
    }

    pub fn num_qubits(&self) -> usize {
        self.physical_to_logical.len()
    }

    pub fn physical_of(&self, logical: &str) -> Option<usize> {
        self.logical_to_physical.get(logical).copied()
    }

    pub fn logical_at(&self, physical: usize) -> Option<&str> {
        self.physical_to_logical[physical].as_deref()
    }

    pub fn role_of(&self, logical: &str) -> Role {
        self.roles
            .get(logical)
            .copied()
            .unwrap_or_else(|| Role::from_name(logical))
    }

    pub fn status_of(&self, logical: &str) -> QubitStatus {
        self.status
            .get(logical)
            .copied()
            .unwrap_or(QubitStatus::Inactive)
    }

    pub fn set_status(&mut self, logical: &str, status: QubitStatus) {
        if let Some(slot) = self.status.get_mut(logical) {
            *slot = status;
        }
    }

    /// All logical qubit names currently present in the mapping, in no
    /// particular order.
    pub fn logical_names(&self) -> impl Iterator<Item = &str> {
        self.logical_to_physical.keys().map(String::as_str)
    }

    /// Exchanges the physical positions of two logical qubits named by
    /// their current physical indices. Both indices must be occupied.
    pub fn swap_physical(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        let name_a = self.physical_to_logical[a].take();
        let name_b = self.physical_to_logical[b].take();
        if let Some(ref n) = name_a {
            self.logical_to_physical.insert(n.clone(), b);
        }
        if let Some(ref n) = name_b {
            self.logical_to_physical.insert(n.clone(), a);
        }
        self.physical_to_logical[a] = name_b;
        self.physical_to_logical[b] = name_a;
    }

    /// A shallow snapshot of the forward table, suitable for emission in
    /// the `initial_mapping`/`final_mapping` output fields.
    pub fn to_map(&self) -> HashMap<String, usize> {
        self.logical_to_physical.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping() -> QubitMapping {
        let mut m = HashMap::new();
        m.insert("data0".to_string(), 0);
        m.insert("data1".to_string(), 2);
        m.insert("ancilla0".to_string(), 1);
        QubitMapping::new(m, 3).unwrap()
    }

    #[test]
    fn test_bijection_roundtrip() {
        let m = mapping();
        assert_eq!(m.physical_of("data0"), Some(0));
        assert_eq!(m.logical_at(0), Some("data0"));
        assert_eq!(m.logical_at(2), Some("data1"));
    }

    #[test]
    fn test_initial_status_by_role() {
        let m = mapping();
        assert_eq!(m.status_of("data0"), QubitStatus::Active);
        assert_eq!(m.status_of("ancilla0"), QubitStatus::Inactive);
    }

    #[test]
    fn test_swap_physical_preserves_bijection() {
        let mut m = mapping();
        m.swap_physical(0, 1);
        assert_eq!(m.physical_of("data0"), Some(1));
        assert_eq!(m.physical_of("ancilla0"), Some(0));
        assert_eq!(m.logical_at(1), Some("data0"));
        assert_eq!(m.logical_at(0), Some("ancilla0"));
    }

    #[test]
    fn test_collision_rejected() {
        let mut m = HashMap::new();
        m.insert("a".to_string(), 0);
        m.insert("b".to_string(), 0);
        let err = QubitMapping::new(m, 2).unwrap_err();
        assert!(matches!(err, FtSynthError::InvalidMapping(_)));
    }

    #[test]
    fn test_too_many_logical_qubits() {
        let mut m = HashMap::new();
        m.insert("a".to_string(), 0);
        m.insert("b".to_string(), 1);
        let err = QubitMapping::new(m, 1).unwrap_err();
        assert!(matches!(err, FtSynthError::InvalidMapping(_)));
    }
}
