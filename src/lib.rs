#![doc = include_str!("../README.md")]

pub mod core;
mod merge;
pub mod model;
mod params;
pub mod rigid_body;
mod topology;
mod typing;

pub use crate::core::error::{AtomAddress, CompileError, ImplementationFault};
pub use crate::core::{CenterType, Element, ForceOptions, RingClass};
pub use crate::merge::merge_parameter_sets;
pub use crate::model::{
    AngleExtended, AngleParam, AtomParam, BondParam, ExceptionKind, NonbondedException,
    ParameterDescriptor, ParameterSet, Ring, TorsionExtended, TorsionForm, TorsionParam,
    TorsionStandard, TorsionTriple, VdwPair, VdwRecord,
};
pub use crate::rigid_body::{Eigendecomposition, MomentOfInertia, RigidBody};

use crate::topology::Topology;

/// Compiles a [`ParameterDescriptor`] into a fully resolved [`ParameterSet`],
/// running the C1-C8 pipeline in the fixed order the modules are documented
/// in: topology, typing, bonds, electronegativity correction, angles,
/// torsions, and nonbonded exceptions.
///
/// # Errors
/// Returns [`CompileError::OpenValenceShell`] or
/// [`CompileError::UnsupportedCenterType`] for a structurally invalid
/// molecule, [`CompileError::UnsupportedRing`] for a 3- or 4-membered ring,
/// and [`CompileError::MissingParameter`] when a resolver exhausts its
/// fallback chain.
///
/// # Panics
/// Panics if the electronegativity corrector's per-bond contribution count
/// overflows its bound — a compiler sizing-contract violation, not a
/// consequence of the caller's molecule (spec §5/§9).
pub fn compile_parameters(descriptor: &ParameterDescriptor) -> Result<ParameterSet, CompileError> {
    let topology = Topology::build(descriptor)?;
    let mut atoms = typing::type_atoms(descriptor, &topology)?;

    let options = &descriptor.force_options;

    let mut bonds = params::bonds::resolve_bonds(
        &topology.bonds,
        &atoms,
        options.stretch,
        options.nonbonded,
    )?;

    params::electroneg::correct_bond_lengths(
        &mut bonds,
        &atoms,
        &topology.adjacency,
        options.nonbonded,
    );

    let bond_index: std::collections::HashMap<(usize, usize), usize> =
        bonds.iter().enumerate().map(|(i, bond)| (bond.atoms, i)).collect();

    let angles = params::angles::resolve_angles(
        &topology.angles,
        &atoms,
        options.bend,
        options.bend_bend,
        options.stretch_bend,
        options.stretch_stretch,
    )?;

    let torsions = params::torsions::resolve_torsions(
        &topology.torsions,
        &atoms,
        &bond_index,
        &bonds,
        options.torsion,
        options.torsion_bend,
        options.torsion_stretch,
    )?;

    let exceptions = params::nonbonded::build_exceptions(&angles, &torsions, &atoms);

    if options.nonbonded {
        params::nonbonded::project_partial_charges(&mut atoms, &bonds);
    }

    Ok(ParameterSet {
        atoms,
        bonds,
        angles,
        torsions,
        rings: topology.rings,
        exceptions,
        bond_index,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(atomic_numbers: Vec<u8>, bonds: Vec<(u32, u32)>) -> ParameterDescriptor {
        ParameterDescriptor {
            atomic_numbers,
            bonds,
            force_options: ForceOptions::default(),
            hydrogen_mass_scale: 2.0,
        }
    }

    #[test]
    fn empty_descriptor_compiles_to_an_empty_parameter_set() {
        let descriptor = descriptor(Vec::new(), Vec::new());
        let params = compile_parameters(&descriptor).unwrap();
        assert!(params.atoms.is_empty());
        assert!(params.bonds.is_empty());
        assert!(params.rings.is_empty());
    }

    #[test]
    fn ethane_compiles_with_bonds_angles_and_torsions_but_no_rings() {
        let descriptor = descriptor(
            vec![6, 6, 1, 1, 1, 1, 1, 1],
            vec![(0, 1), (0, 2), (0, 3), (0, 4), (1, 5), (1, 6), (1, 7)],
        );
        let params = compile_parameters(&descriptor).unwrap();
        assert_eq!(params.atoms.len(), 8);
        assert_eq!(params.bonds.len(), 7);
        assert!(!params.angles.is_empty());
        assert!(!params.torsions.is_empty());
        assert!(params.rings.is_empty());
        assert!(!params.exceptions.is_empty());
    }

    #[test]
    fn a_three_membered_ring_is_rejected() {
        let descriptor = descriptor(vec![6, 6, 6], vec![(0, 1), (1, 2), (2, 0)]);
        let err = compile_parameters(&descriptor).unwrap_err();
        assert!(matches!(err, CompileError::UnsupportedRing { ring_size: 3, .. }));
    }

    #[test]
    fn disabling_stretch_zeroes_stiffness_but_keeps_length() {
        let mut descriptor = descriptor(
            vec![6, 6, 1, 1, 1, 1, 1, 1],
            vec![(0, 1), (0, 2), (0, 3), (0, 4), (1, 5), (1, 6), (1, 7)],
        );
        descriptor.force_options.stretch = false;
        let params = compile_parameters(&descriptor).unwrap();
        assert!(params.bonds.iter().all(|b| b.stiffness_mdyn_per_angstrom == 0.0));
        assert!(params.bonds.iter().all(|b| b.length_angstrom > 0.0));
    }

    #[test]
    fn disabling_nonbonded_clears_dipoles_and_partial_charges() {
        let mut descriptor = descriptor(
            vec![6, 6, 1, 1, 1, 1, 1, 1],
            vec![(0, 1), (0, 2), (0, 3), (0, 4), (1, 5), (1, 6), (1, 7)],
        );
        descriptor.force_options.nonbonded = false;
        let params = compile_parameters(&descriptor).unwrap();
        assert!(params.bonds.iter().all(|b| b.dipole_debye.is_none()));
        assert!(params.atoms.iter().all(|a| a.partial_charge == 0.0));
    }

    #[test]
    fn compiled_parameter_set_can_seed_a_rigid_body() {
        let descriptor = descriptor(
            vec![6, 6, 1, 1, 1, 1, 1, 1],
            vec![(0, 1), (0, 2), (0, 3), (0, 4), (1, 5), (1, 6), (1, 7)],
        );
        let params = compile_parameters(&descriptor).unwrap();
        let atom_count = params.atoms.len();
        let positions = vec![nalgebra::Vector3::zeros(); atom_count];
        let body = RigidBody::new(std::sync::Arc::new(params), positions, None);
        assert_eq!(body.atom_count(), atom_count);
        assert!(body.mass() > 0.0);
    }
}
