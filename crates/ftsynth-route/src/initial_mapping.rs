//! Initial mapping chooser: picks a starting logical->physical assignment
//! according to a configured policy.

use std::collections::HashMap;

use ftsynth_core::config::InitialMappingOption;
use ftsynth_core::error::{FtSynthError, Result};
use ftsynth_core::types::QubitMapping;
use rand::seq::SliceRandom;
use rand::Rng;

/// Picks an initial [`QubitMapping`] for `logical_names` over `num_qubits`
/// physical qubits according to `option`, using `rng` for every random
/// choice so a synthesis round is reproducible given a seeded generator.
pub fn choose_initial_mapping(
    logical_names: &[String],
    num_qubits: usize,
    option: &InitialMappingOption,
    rng: &mut impl Rng,
) -> Result<QubitMapping> {
    if logical_names.len() > num_qubits {
        return Err(FtSynthError::invalid_mapping(format!(
            "{} logical qubits cannot fit on {} physical qubits",
            logical_names.len(),
            num_qubits
        )));
    }

    let assignment = match option {
        InitialMappingOption::Random => random_assignment(logical_names, num_qubits, rng),
        InitialMappingOption::PeriodicRandom { period } => {
            periodic_random_assignment(logical_names, num_qubits, *period, rng)
        }
        InitialMappingOption::Fixed { pins } => {
            fixed_assignment(logical_names, num_qubits, pins, rng)?
        }
    };

    QubitMapping::new(assignment, num_qubits)
}

fn random_assignment(
    logical_names: &[String],
    num_qubits: usize,
    rng: &mut impl Rng,
) -> HashMap<String, usize> {
    let mut physical: Vec<usize> = (0..num_qubits).collect();
    physical.shuffle(rng);
    logical_names
        .iter()
        .cloned()
        .zip(physical.into_iter())
        .collect()
}

/// Partitions `logical_names` into strides of `period` and randomizes the
/// physical assignment within each stride independently, giving
/// approximate spatial locality for circuits with repeated structure.
fn periodic_random_assignment(
    logical_names: &[String],
    num_qubits: usize,
    period: usize,
    rng: &mut impl Rng,
) -> HashMap<String, usize> {
    let period = period.max(1);
    let mut assignment = HashMap::with_capacity(logical_names.len());
    for (stride_idx, chunk) in logical_names.chunks(period).enumerate() {
        let base = stride_idx * period;
        let mut slots: Vec<usize> = (base..(base + chunk.len()).min(num_qubits)).collect();
        // If the stride would overflow the chip, wrap into the remaining
        // free range at the top; callers are expected to size chips so
        // this degrades gracefully rather than panicking.
        while slots.len() < chunk.len() {
            slots.push(slots.len() % num_qubits);
        }
        slots.shuffle(rng);
        for (name, phys) in chunk.iter().zip(slots.into_iter()) {
            assignment.insert(name.clone(), phys);
        }
    }
    assignment
}

fn fixed_assignment(
    logical_names: &[String],
    num_qubits: usize,
    pins: &HashMap<String, usize>,
    rng: &mut impl Rng,
) -> Result<HashMap<String, usize>> {
    let mut used: Vec<bool> = vec![false; num_qubits];
    let mut assignment = HashMap::with_capacity(logical_names.len());

    for (name, &phys) in pins {
        if !logical_names.iter().any(|n| n == name) {
            continue;
        }
        if phys >= num_qubits {
            return Err(FtSynthError::invalid_mapping(format!(
                "fixed pin '{name}' -> {phys} is out of range [0, {num_qubits})"
            )));
        }
        if used[phys] {
            return Err(FtSynthError::invalid_mapping(format!(
                "fixed pin collision at physical index {phys}"
            )));
        }
        used[phys] = true;
        assignment.insert(name.clone(), phys);
    }

    let mut free: Vec<usize> = (0..num_qubits).filter(|&p| !used[p]).collect();
    free.shuffle(rng);
    let mut free_iter = free.into_iter();

    for name in logical_names {
        if assignment.contains_key(name) {
            continue;
        }
        let phys = free_iter.next().ok_or_else(|| {
            FtSynthError::invalid_mapping("ran out of free physical qubits for unpinned names")
        })?;
        assignment.insert(name.clone(), phys);
    }

    Ok(assignment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_pcg::Pcg64;
    use rand::SeedableRng;

    fn names(ns: &[&str]) -> Vec<String> {
        ns.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_random_assignment_is_bijective() {
        let mut rng = Pcg64::seed_from_u64(7);
        let mapping = choose_initial_mapping(
            &names(&["data0", "data1", "ancilla0"]),
            4,
            &InitialMappingOption::Random,
            &mut rng,
        )
        .unwrap();
        let mut phys: Vec<usize> = ["data0", "data1", "ancilla0"]
            .iter()
            .map(|n| mapping.physical_of(n).unwrap())
            .collect();
        phys.sort();
        phys.dedup();
        assert_eq!(phys.len(), 3);
    }

    #[test]
    fn test_too_many_logical_names_rejected() {
        let mut rng = Pcg64::seed_from_u64(1);
        let err = choose_initial_mapping(
            &names(&["a", "b", "c"]),
            2,
            &InitialMappingOption::Random,
            &mut rng,
        )
        .unwrap_err();
        assert!(matches!(err, FtSynthError::InvalidMapping(_)));
    }

    #[test]
    fn test_fixed_pins_preserved() {
        let mut rng = Pcg64::seed_from_u64(3);
        let mut pins = HashMap::new();
        pins.insert("data0".to_string(), 2);
        let mapping = choose_initial_mapping(
            &names(&["data0", "data1"]),
            4,
            &InitialMappingOption::Fixed { pins },
            &mut rng,
        )
        .unwrap();
        assert_eq!(mapping.physical_of("data0"), Some(2));
        assert_ne!(mapping.physical_of("data1"), Some(2));
    }

    #[test]
    fn test_fixed_pin_collision_fails() {
        let mut rng = Pcg64::seed_from_u64(3);
        let mut pins = HashMap::new();
        pins.insert("data0".to_string(), 10);
        let err = choose_initial_mapping(
            &names(&["data0"]),
            4,
            &InitialMappingOption::Fixed { pins },
            &mut rng,
        )
        .unwrap_err();
        assert!(matches!(err, FtSynthError::InvalidMapping(_)));
    }

    #[test]
    fn test_periodic_random_respects_period() {
        let mut rng = Pcg64::seed_from_u64(9);
        let mapping = choose_initial_mapping(
            &names(&["a0", "a1", "a2", "a3"]),
            4,
            &InitialMappingOption::PeriodicRandom { period: 2 },
            &mut rng,
        )
        .unwrap();
        // first stride {a0,a1} must land within physical [0,2)
        assert!(mapping.physical_of("a0").unwrap() < 2);
        assert!(mapping.physical_of("a1").unwrap() < 2);
        // second stride {a2,a3} must land within physical [2,4)
        assert!(mapping.physical_of("a2").unwrap() >= 2);
        assert!(mapping.physical_of("a3").unwrap() >= 2);
    }
}
