
use harness::assert_close;
use harness::cases::cage::{cage_descriptor, CAGE_ATOM_COUNT, CAGE_BOND_COUNT};
use mm4_compiler::{
    compile_parameters, CompileError, ForceOptions, ParameterDescriptor, RigidBody,
};
use nalgebra::Vector3;
use std::sync::Arc;

/// Scenario 1 (spec §8): an empty descriptor compiles to an empty, fault-free
/// parameter set.
#[test]
fn empty_molecule_compiles_to_empty_parameter_set() {
    let descriptor = ParameterDescriptor {
        atomic_numbers: Vec::new(),
        bonds: Vec::new(),
        force_options: ForceOptions::default(),
        hydrogen_mass_scale: 2.0,
    };
    let params = compile_parameters(&descriptor).unwrap();
    assert_eq!(params.atoms.len(), 0);
    assert_eq!(params.bonds.len(), 0);
    assert_eq!(params.angles.len(), 0);
    assert_eq!(params.torsions.len(), 0);
    assert_eq!(params.rings.len(), 0);
    assert_eq!(params.exceptions.len(), 0);
}

/// Scenario 2 (spec §8): a carbon cage of two fused five-membered rings
/// compiles with both rings found, ring-class-5 carbon-carbon bonds resolved
/// to the stiffened/shortened variant, and every carbon-hydrogen bond at the
/// standard 1.112 Angstrom length.
#[test]
fn carbon_cage_compiles_with_two_five_membered_rings() {
    let descriptor = cage_descriptor(6);
    let params = compile_parameters(&descriptor).unwrap();

    assert_eq!(params.atoms.len(), CAGE_ATOM_COUNT);
    assert_eq!(params.bonds.len(), CAGE_BOND_COUNT);
    assert_eq!(params.rings.len(), 2);
    assert!(params.rings.iter().all(|r| r.size() == 5));

    for bond in &params.bonds {
        let (a, b) = bond.atoms;
        let both_carbon = params.atoms[a].atomic_number == 6 && params.atoms[b].atomic_number == 6;
        if both_carbon {
            assert_close("C-C stiffness", bond.stiffness_mdyn_per_angstrom, 4.99, 1e-9);
            assert_close("C-C length", bond.length_angstrom, 1.529, 1e-9);
        } else {
            assert_close("C-H stiffness", bond.stiffness_mdyn_per_angstrom, 4.74, 1e-9);
            assert_close("C-H length", bond.length_angstrom, 1.112, 1e-9);
        }
    }

    assert!(!params.angles.is_empty());
    assert!(!params.torsions.is_empty());
    assert!(!params.exceptions.is_empty());
}

/// Scenario 3 (spec §8): the same skeleton with silicon centers resolves
/// Si-Si and Si-H bonds to their own table rows directly (no five-ring
/// remap needed, since silicon's atom code doesn't vary by ring size).
#[test]
fn sila_cage_resolves_silicon_bond_table_rows() {
    let descriptor = cage_descriptor(14);
    let params = compile_parameters(&descriptor).unwrap();

    assert_eq!(params.atoms.len(), CAGE_ATOM_COUNT);
    for bond in &params.bonds {
        let (a, b) = bond.atoms;
        let both_silicon = params.atoms[a].atomic_number == 14 && params.atoms[b].atomic_number == 14;
        if both_silicon {
            assert_close("Si-Si stiffness", bond.stiffness_mdyn_per_angstrom, 1.65, 1e-9);
            assert_close("Si-Si length", bond.length_angstrom, 2.332, 1e-9);
        } else {
            assert_close("Si-H stiffness", bond.stiffness_mdyn_per_angstrom, 2.65, 1e-9);
            assert_close("Si-H length", bond.length_angstrom, 1.493, 1e-9);
        }
    }
}

/// Scenario 4 (spec §8): a hydrogen-saturated three-membered carbon ring is
/// rejected with `UnsupportedRing` naming the three ring atoms.
#[test]
fn three_membered_saturated_ring_is_rejected() {
    let descriptor = ParameterDescriptor {
        atomic_numbers: vec![6, 6, 6, 1, 1, 1, 1, 1, 1],
        bonds: vec![
            (0, 1),
            (1, 2),
            (2, 0),
            (0, 3),
            (0, 4),
            (1, 5),
            (1, 6),
            (2, 7),
            (2, 8),
        ],
        force_options: ForceOptions::default(),
        hydrogen_mass_scale: 2.0,
    };
    let err = compile_parameters(&descriptor).unwrap_err();
    match err {
        CompileError::UnsupportedRing { ring_size, atoms } => {
            assert_eq!(ring_size, 3);
            assert_eq!(atoms.len(), 3);
        }
        other => panic!("expected UnsupportedRing, got {other:?}"),
    }
}

/// Scenario 5 (spec §8): setting linear momentum on the cage rewrites every
/// velocity to `p / M` (all positions held at the origin, so the residual
/// term this setter preserves is zero for every atom).
#[test]
fn linear_momentum_setter_yields_uniform_velocity() {
    let descriptor = cage_descriptor(6);
    let params = compile_parameters(&descriptor).unwrap();
    let mass: f64 = params.atoms.iter().map(|a| a.mass_yg).sum();
    let atom_count = params.atoms.len();

    let positions = vec![Vector3::zeros(); atom_count];
    let mut body = RigidBody::new(Arc::new(params), positions, None);

    body.set_linear_momentum(Vector3::new(1.0, 0.0, 0.0));

    let expected = Vector3::new(1.0 / mass, 0.0, 0.0);
    for v in body.get_velocities() {
        assert_close("vx", v.x, expected.x, 1e-5);
        assert_close("vy", v.y, expected.y, 1e-5);
        assert_close("vz", v.z, expected.z, 1e-5);
    }
}

/// Scenario 6 (spec §8): velocities prescribed as `omega x (r - com)` are
/// recovered bit-close after reading `angular_momentum` back through
/// `set_angular_momentum`.
#[test]
fn angular_momentum_round_trips_through_setter() {
    let descriptor = cage_descriptor(6);
    let params = compile_parameters(&descriptor).unwrap();
    let atom_count = params.atoms.len();

    let positions: Vec<Vector3<f64>> = (0..atom_count)
        .map(|i| {
            let t = i as f64;
            Vector3::new(
                (t * 0.41).sin() * 2.0 + t * 0.05,
                (t * 0.29).cos() * 1.7 - t * 0.03,
                (t * 0.13).sin() * 1.3,
            )
        })
        .collect();

    let mut body = RigidBody::new(Arc::new(params), positions.clone(), None);
    let com = body.center_of_mass();
    let omega = Vector3::new(0.0, 0.0, 1.0);
    let velocities: Vec<Vector3<f64>> = positions.iter().map(|r| omega.cross(&(*r - com))).collect();
    body.set_velocities(&velocities);

    let l = body.angular_momentum().unwrap();
    body.set_angular_momentum(l).unwrap();

    for (expected, actual) in velocities.iter().zip(body.get_velocities()) {
        assert_close("vx", actual.x, expected.x, 1e-4);
        assert_close("vy", actual.y, expected.y, 1e-4);
        assert_close("vz", actual.z, expected.z, 1e-4);
    }
}

/// Mass conservation invariant (spec §8): hydrogen mass repartitioning never
/// changes the total mass of the molecule.
#[test]
fn hydrogen_mass_repartitioning_conserves_total_mass_on_the_cage() {
    let descriptor = cage_descriptor(6);
    let params = compile_parameters(&descriptor).unwrap();
    let total_default: f64 = params.atoms.iter().map(|a| a.default_mass_yg).sum();
    let total_repartitioned: f64 = params.atoms.iter().map(|a| a.mass_yg).sum();
    assert_close("total mass", total_repartitioned, total_default, 1e-3);
}

/// Canonicalization invariants (spec §8) hold across every resolved entity.
#[test]
fn canonicalization_invariants_hold_across_the_cage() {
    let descriptor = cage_descriptor(6);
    let params = compile_parameters(&descriptor).unwrap();

    for bond in &params.bonds {
        assert!(bond.atoms.0 < bond.atoms.1);
    }
    for angle in &params.angles {
        assert!(angle.atoms.0 <= angle.atoms.2);
    }
    for torsion in &params.torsions {
        let (a, b, c, d) = torsion.atoms;
        assert!(b < c || (b == c && a <= d));
    }
    for ring in &params.rings {
        assert!(ring.size() >= 5);
    }
}

/// Merger associativity invariant (spec §8), checked over three independent
/// compiles of the same cage rather than on handwritten fixtures.
#[test]
fn merger_is_associative_on_atom_order_for_real_parameter_sets() {
    let a = compile_parameters(&cage_descriptor(6)).unwrap();
    let b = compile_parameters(&cage_descriptor(6)).unwrap();
    let c = compile_parameters(&cage_descriptor(14)).unwrap();

    let left = mm4_compiler::merge_parameter_sets(&mm4_compiler::merge_parameter_sets(&a, &b), &c);
    let right = mm4_compiler::merge_parameter_sets(&a, &mm4_compiler::merge_parameter_sets(&b, &c));

    let left_numbers: Vec<u8> = left.atoms.iter().map(|atom| atom.atomic_number).collect();
    let right_numbers: Vec<u8> = right.atoms.iter().map(|atom| atom.atomic_number).collect();
    assert_eq!(left_numbers, right_numbers);
}
