//! C7 — Nonbonded exception builder.
//!
//! Enumerates the unique 1-3 pairs (sharing an angle) and 1-4 pairs (sharing
//! a torsion) excluded from the nonbonded evaluator, applies the hydrogen
//! virtual-site reordering of spec §4.7, and projects each resolved bond
//! dipole into per-atom partial charge. Grounded in the same deduplicated-set
//! idiom [`crate::topology`] uses for torsion enumeration (a `HashSet` of
//! canonical pairs claims each exception exactly once).

use std::collections::HashSet;

use crate::core::units::E_ANGSTROM_PER_DEBYE;
use crate::model::{AngleParam, AtomParam, BondParam, ExceptionKind, NonbondedException, TorsionParam};

/// Maps an atom's own index to the index its nonbonded virtual site is keyed
/// under. Hydrogens reorder to `index + 1` (spec §4.7: "hydrogen exclusions
/// reference the virtual-site index"); every other atom is unchanged.
pub fn virtual_site_index(atom_index: usize, atomic_number: u8) -> usize {
    if atomic_number == 1 {
        atom_index + 1
    } else {
        atom_index
    }
}

/// Enumerates the deduplicated 1-3 exceptions (angle outer atoms) and 1-4
/// exceptions (torsion outer atoms), each reordered through
/// [`virtual_site_index`] before dedup and storage.
pub fn build_exceptions(
    angles: &[AngleParam],
    torsions: &[TorsionParam],
    atoms: &[AtomParam],
) -> Vec<NonbondedException> {
    let mut one_three_seen = HashSet::new();
    let mut one_four_seen = HashSet::new();
    let mut exceptions = Vec::with_capacity(angles.len() + torsions.len());

    for angle in angles {
        let (a, _, c) = angle.atoms;
        push_unique(&mut one_three_seen, &mut exceptions, a, c, ExceptionKind::OneThree, atoms);
    }
    for torsion in torsions {
        let (a, _, _, d) = torsion.atoms;
        push_unique(&mut one_four_seen, &mut exceptions, a, d, ExceptionKind::OneFour, atoms);
    }

    exceptions
}

fn push_unique(
    seen: &mut HashSet<(usize, usize)>,
    out: &mut Vec<NonbondedException>,
    a: usize,
    b: usize,
    kind: ExceptionKind,
    atoms: &[AtomParam],
) {
    let va = virtual_site_index(a, atoms[a].atomic_number);
    let vb = virtual_site_index(b, atoms[b].atomic_number);
    let key = if va < vb { (va, vb) } else { (vb, va) };
    if seen.insert(key) {
        out.push(NonbondedException::new(va, vb, kind));
    }
}

/// Projects every resolved bond's dipole onto its two atoms as partial
/// charge, accumulating into [`AtomParam::partial_charge`].
///
/// `q = |mu| * (eA/Debye) / L`; the sign lands `+q` on the electropositive
/// atom of the pair and `-q` on the electronegative one, per [`BondParam`]'s
/// stored sign convention (positive dipole means `atoms.0` is electropositive,
/// matching [`crate::params::bonds::resolve_bonds`]'s sign resolution).
pub fn project_partial_charges(atoms: &mut [AtomParam], bonds: &[BondParam]) {
    for bond in bonds {
        let Some(dipole) = bond.dipole_debye else {
            continue;
        };
        if dipole == 0.0 || bond.length_angstrom <= 0.0 {
            continue;
        }
        let magnitude = dipole.abs() * E_ANGSTROM_PER_DEBYE / bond.length_angstrom;
        let (a, b) = bond.atoms;
        if dipole > 0.0 {
            atoms[a].partial_charge += magnitude;
            atoms[b].partial_charge -= magnitude;
        } else {
            atoms[a].partial_charge -= magnitude;
            atoms[b].partial_charge += magnitude;
        }
    }
}
