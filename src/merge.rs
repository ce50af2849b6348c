//! C8 — Parameter merger.
//!
//! Concatenates two immutable [`ParameterSet`]s into a fresh third, rebasing
//! every atom-index reference in `b` by `|a.atoms|`. Grounded in the same
//! "consume immutable inputs, produce a fresh owned output" shape the
//! teacher's `builder::build_topology` uses to assemble a `MolecularTopology`
//! from a `ProcessingGraph` and its derived atom types, without mutating
//! either input.

use std::collections::HashMap;

use crate::model::{AtomParam, BondParam, NonbondedException, ParameterSet};

/// Merges two parameter sets, concatenating atoms and rebasing every other
/// entity's atom indices in `b` by `a.atoms.len()`.
///
/// Neither input is mutated; masses, resolved parameters, and ring classes
/// carry through unchanged (spec §4.8).
pub fn merge_parameter_sets(a: &ParameterSet, b: &ParameterSet) -> ParameterSet {
    let offset = a.atoms.len();

    let mut atoms = a.atoms.clone();
    atoms.extend(b.atoms.iter().cloned().map(|atom| offset_atom(atom, offset)));

    let mut bonds = a.bonds.clone();
    bonds.extend(b.bonds.iter().cloned().map(|bond| offset_bond(bond, offset)));

    let mut angles = a.angles.clone();
    angles.extend(b.angles.iter().cloned().map(|mut angle| {
        angle.atoms = (angle.atoms.0 + offset, angle.atoms.1 + offset, angle.atoms.2 + offset);
        angle
    }));

    let mut torsions = a.torsions.clone();
    torsions.extend(b.torsions.iter().cloned().map(|mut torsion| {
        torsion.atoms = (
            torsion.atoms.0 + offset,
            torsion.atoms.1 + offset,
            torsion.atoms.2 + offset,
            torsion.atoms.3 + offset,
        );
        torsion
    }));

    let mut rings = a.rings.clone();
    rings.extend(b.rings.iter().map(|ring| ring.offset(offset)));

    let mut exceptions = a.exceptions.clone();
    exceptions.extend(b.exceptions.iter().cloned().map(|exc| offset_exception(exc, offset)));

    let bond_index: HashMap<(usize, usize), usize> =
        bonds.iter().enumerate().map(|(i, bond)| (bond.atoms, i)).collect();

    ParameterSet {
        atoms,
        bonds,
        angles,
        torsions,
        rings,
        exceptions,
        bond_index,
    }
}

fn offset_atom(mut atom: AtomParam, offset: usize) -> AtomParam {
    atom.index += offset;
    atom
}

fn offset_bond(mut bond: BondParam, offset: usize) -> BondParam {
    bond.atoms = (bond.atoms.0 + offset, bond.atoms.1 + offset);
    bond
}

fn offset_exception(mut exception: NonbondedException, offset: usize) -> NonbondedException {
    exception.atoms = (exception.atoms.0 + offset, exception.atoms.1 + offset);
    exception
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CenterType, RingClass};
    use crate::model::{ExceptionKind, Ring, VdwRecord};

    fn atom(index: usize, atomic_number: u8) -> AtomParam {
        AtomParam {
            index,
            atomic_number,
            atom_code: 1,
            ring_class: RingClass::None,
            center_type: CenterType::from_heavy_neighbor_count(1),
            mass_yg: 1.0,
            default_mass_yg: 1.0,
            vdw: VdwRecord {
                epsilon_default: 0.0,
                radius_default: 0.0,
                hydrogen_variant: None,
            },
            partial_charge: 0.0,
        }
    }

    fn tiny_set(atom_count: usize) -> ParameterSet {
        let atoms: Vec<AtomParam> = (0..atom_count).map(|i| atom(i, 6)).collect();
        let bonds = if atom_count >= 2 {
            vec![BondParam {
                atoms: (0, 1),
                ring_class: RingClass::None,
                well_depth_aj: 1.0,
                stiffness_mdyn_per_angstrom: 4.56,
                length_angstrom: 1.527,
                dipole_debye: None,
            }]
        } else {
            Vec::new()
        };
        let bond_index = bonds.iter().enumerate().map(|(i, b)| (b.atoms, i)).collect();
        ParameterSet {
            atoms,
            bonds,
            angles: Vec::new(),
            torsions: Vec::new(),
            rings: if atom_count >= 5 {
                vec![Ring::new(&(0..5).collect::<Vec<_>>())]
            } else {
                Vec::new()
            },
            exceptions: if atom_count >= 2 {
                vec![NonbondedException::new(0, 1, ExceptionKind::OneThree)]
            } else {
                Vec::new()
            },
            bond_index,
        }
    }

    #[test]
    fn merge_concatenates_atoms_and_rebases_bonds() {
        let a = tiny_set(2);
        let b = tiny_set(2);
        let merged = merge_parameter_sets(&a, &b);
        assert_eq!(merged.atoms.len(), 4);
        assert_eq!(merged.bonds.len(), 2);
        assert_eq!(merged.bonds[1].atoms, (2, 3));
        assert_eq!(merged.bond_index.get(&(2, 3)), Some(&1));
    }

    #[test]
    fn merge_rebases_exceptions_and_rings() {
        let a = tiny_set(5);
        let b = tiny_set(5);
        let merged = merge_parameter_sets(&a, &b);
        assert_eq!(merged.exceptions[1].atoms, (5, 6));
        assert_eq!(merged.rings[1].atoms(), &[5, 6, 7, 8, 9]);
    }

    #[test]
    fn merge_is_associative_on_atom_order() {
        let a = tiny_set(2);
        let b = tiny_set(2);
        let c = tiny_set(2);

        let left = merge_parameter_sets(&merge_parameter_sets(&a, &b), &c);
        let right = merge_parameter_sets(&a, &merge_parameter_sets(&b, &c));

        let left_numbers: Vec<u8> = left.atoms.iter().map(|atom| atom.atomic_number).collect();
        let right_numbers: Vec<u8> = right.atoms.iter().map(|atom| atom.atomic_number).collect();
        assert_eq!(left_numbers, right_numbers);
        assert_eq!(left.atoms.len(), right.atoms.len());
    }

    #[test]
    fn merging_with_empty_set_is_identity_on_atom_count() {
        let a = tiny_set(3);
        let empty = tiny_set(0);
        let merged = merge_parameter_sets(&a, &empty);
        assert_eq!(merged.atoms.len(), a.atoms.len());
        assert_eq!(merged.bonds.len(), a.bonds.len());
    }
}
