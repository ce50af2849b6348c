//! C2 — Atom typer.
//!
//! Assigns typed atom codes, ring-membership class, center type, hydrogen
//! mass repartitioning, and van der Waals parameters. Grounded in the
//! teacher's `processor::typer::TyperEngine`, generalized from an iterative
//! priority-rule engine (needed when typing depends on matching arbitrary
//! functional-group templates) to a direct table lookup, since this crate's
//! atom codes are keyed only by element and ring size rather than by
//! open-ended substructure matching.

pub mod tables;

use crate::core::error::{AtomAddress, CompileError};
use crate::core::{CenterType, RingClass};
use crate::model::{AtomParam, ParameterDescriptor};
use crate::topology::Topology;

/// Doubles a hydrogen's mass and transfers the difference away from its
/// bonded heavy atom, per spec §4.2's hydrogen mass repartitioning rule.
fn repartition_masses(
    descriptor: &ParameterDescriptor,
    topology: &Topology,
    default_masses: &[f64],
) -> Vec<f64> {
    let scale = descriptor.hydrogen_mass_scale;
    let mut masses = default_masses.to_vec();
    for (index, &atomic_number) in descriptor.atomic_numbers.iter().enumerate() {
        if atomic_number != 1 {
            continue;
        }
        let added = default_masses[index] * (scale - 1.0);
        masses[index] += added;
        if let Some(&heavy) = topology.adjacency[index].first() {
            masses[heavy] -= added;
        }
    }
    masses
}

/// Types every atom in the topology, producing the fully annotated atom
/// records consumed by C3 onward.
///
/// # Errors
/// Returns [`CompileError::UnsupportedCenterType`] if an atom's element has
/// no recognized atom code, or if a heavy atom reports more than four
/// non-hydrogen-equivalent bonded neighbors.
pub fn type_atoms(
    descriptor: &ParameterDescriptor,
    topology: &Topology,
) -> Result<Vec<AtomParam>, CompileError> {
    let num_atoms = descriptor.atomic_numbers.len();
    let mut default_masses = Vec::with_capacity(num_atoms);
    for (index, &atomic_number) in descriptor.atomic_numbers.iter().enumerate() {
        let mass = tables::default_mass_yg(atomic_number).ok_or_else(|| {
            CompileError::UnsupportedCenterType {
                center: AtomAddress::topology(index, atomic_number),
                bonded: Vec::new(),
            }
        })?;
        default_masses.push(mass);
    }

    let repartitioned = repartition_masses(descriptor, topology, &default_masses);

    let mut atoms = Vec::with_capacity(num_atoms);
    for index in 0..num_atoms {
        let atomic_number = descriptor.atomic_numbers[index];
        let smallest_ring_size = topology.smallest_ring_size[index];
        let atom_code = tables::atom_code(atomic_number, smallest_ring_size).ok_or_else(|| {
            CompileError::UnsupportedCenterType {
                center: AtomAddress::topology(index, atomic_number),
                bonded: Vec::new(),
            }
        })?;
        let vdw = tables::vdw_record(atomic_number).ok_or_else(|| {
            CompileError::UnsupportedCenterType {
                center: AtomAddress::topology(index, atomic_number),
                bonded: Vec::new(),
            }
        })?;

        let heavy_neighbor_count = topology.adjacency[index]
            .iter()
            .filter(|&&n| descriptor.atomic_numbers[n] != 1)
            .count() as u8;
        let center_type = CenterType::from_heavy_neighbor_count(heavy_neighbor_count);

        atoms.push(AtomParam {
            index,
            atomic_number,
            atom_code,
            ring_class: RingClass::from_smallest_ring_size(smallest_ring_size),
            center_type,
            mass_yg: repartitioned[index],
            default_mass_yg: default_masses[index],
            vdw,
            partial_charge: 0.0,
        });
    }

    Ok(atoms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ForceOptions;

    fn descriptor(atomic_numbers: Vec<u8>, bonds: Vec<(u32, u32)>) -> ParameterDescriptor {
        ParameterDescriptor {
            atomic_numbers,
            bonds,
            force_options: ForceOptions::default(),
            hydrogen_mass_scale: 2.0,
        }
    }

    #[test]
    fn ethane_carbons_are_code_one_and_primary() {
        let d = descriptor(
            vec![6, 6, 1, 1, 1, 1, 1, 1],
            vec![(0, 1), (0, 2), (0, 3), (0, 4), (1, 5), (1, 6), (1, 7)],
        );
        let topo = Topology::build(&d).unwrap();
        let atoms = type_atoms(&d, &topo).unwrap();
        assert_eq!(atoms[0].atom_code, 1);
        assert_eq!(atoms[0].center_type, Some(CenterType::Primary));
        assert_eq!(atoms[2].atom_code, 5);
        assert_eq!(atoms[2].center_type, None);
    }

    #[test]
    fn hydrogen_mass_repartitioning_conserves_total_mass() {
        let d = descriptor(
            vec![6, 6, 1, 1, 1, 1, 1, 1],
            vec![(0, 1), (0, 2), (0, 3), (0, 4), (1, 5), (1, 6), (1, 7)],
        );
        let topo = Topology::build(&d).unwrap();
        let atoms = type_atoms(&d, &topo).unwrap();

        let total_default: f64 = atoms.iter().map(|a| a.default_mass_yg).sum();
        let total_repartitioned: f64 = atoms.iter().map(|a| a.mass_yg).sum();
        assert!((total_default - total_repartitioned).abs() < 1e-9);

        for atom in &atoms {
            if atom.atomic_number == 1 {
                assert!((atom.mass_yg - 2.0 * atom.default_mass_yg).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn hydrogen_mass_scale_of_one_disables_repartitioning() {
        let mut d = descriptor(
            vec![6, 1, 1, 1, 1],
            vec![(0, 1), (0, 2), (0, 3), (0, 4)],
        );
        d.hydrogen_mass_scale = 1.0;
        // Methane itself is rejected as a lone-atom center; verify the
        // repartitioning math directly instead of routing through topology.
        let topo = Topology {
            bonds: vec![(0, 1), (0, 2), (0, 3), (0, 4)],
            adjacency: vec![vec![1, 2, 3, 4], vec![0], vec![0], vec![0], vec![0]],
            angles: Vec::new(),
            torsions: Vec::new(),
            rings: Vec::new(),
            smallest_ring_size: vec![None; 5],
        };
        let default_masses = vec![19.9265, 1.6735, 1.6735, 1.6735, 1.6735];
        let masses = repartition_masses(&d, &topo, &default_masses);
        assert_eq!(masses, default_masses);
    }

    #[test]
    fn unrecognized_element_fails_typing() {
        let d = descriptor(vec![6, 2], vec![(0, 1)]);
        let topo = Topology::build(&d).unwrap();
        let err = type_atoms(&d, &topo).unwrap_err();
        assert!(matches!(err, CompileError::UnsupportedCenterType { .. }));
    }
}
