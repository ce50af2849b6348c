//! C3 — Bond parameter resolver.
//!
//! Resolves Morse well depth, stretching stiffness, equilibrium length, and
//! signed bond dipole moment for each bond in the topology. Grounded in the
//! teacher's `processor::typer::TyperEngine` switch-on-code-pair lookup
//! pattern, adapted to a direct static table rather than an iterative rule
//! priority search, since bond resolution here is a single ordered-pair
//! lookup with one fallback rather than an open-ended rule match.

use crate::core::error::{AtomAddress, CompileError};
use crate::core::{Element, RingClass};
use crate::model::{AtomParam, BondParam};
use crate::typing::tables::remap_five_ring_fallback;

/// A resolved bond parameter row, prior to ring/center-type-dependent
/// adjustment.
#[derive(Debug, Clone, Copy)]
struct BondRow {
    well_depth_aj: f64,
    stiffness_mdyn_per_angstrom: f64,
    length_angstrom: f64,
    /// Dipole magnitude in Debye; sign is resolved separately from element
    /// electronegativity.
    dipole_debye: Option<f64>,
}

/// The static bond parameter table, keyed by the ordered `(low, high)` atom
/// code pair.
fn lookup(low: u32, high: u32) -> Option<BondRow> {
    match (low, high) {
        // Carbon-carbon, 6-ring alkane.
        (1, 1) => Some(BondRow {
            well_depth_aj: 1.100,
            stiffness_mdyn_per_angstrom: 4.56,
            length_angstrom: 1.527,
            dipole_debye: None,
        }),
        // Carbon-hydrogen.
        (1, 5) => Some(BondRow {
            well_depth_aj: 0.780,
            stiffness_mdyn_per_angstrom: 4.74,
            length_angstrom: 1.112,
            dipole_debye: Some(0.00),
        }),
        // Silicon-silicon.
        (19, 19) => Some(BondRow {
            well_depth_aj: 0.700,
            stiffness_mdyn_per_angstrom: 1.65,
            length_angstrom: 2.332,
            dipole_debye: None,
        }),
        // Silicon-hydrogen.
        (5, 19) => Some(BondRow {
            well_depth_aj: 0.650,
            stiffness_mdyn_per_angstrom: 2.65,
            length_angstrom: 1.493,
            dipole_debye: Some(0.00),
        }),
        // Carbon-nitrogen.
        (1, 8) => Some(BondRow {
            well_depth_aj: 1.020,
            stiffness_mdyn_per_angstrom: 4.92,
            length_angstrom: 1.448,
            dipole_debye: Some(1.31),
        }),
        // Carbon-oxygen.
        (1, 6) => Some(BondRow {
            well_depth_aj: 1.090,
            stiffness_mdyn_per_angstrom: 5.70,
            length_angstrom: 1.402,
            dipole_debye: Some(1.43),
        }),
        // Carbon-fluorine.
        (1, 11) => Some(BondRow {
            well_depth_aj: 1.150,
            stiffness_mdyn_per_angstrom: 6.10,
            length_angstrom: 1.375,
            dipole_debye: Some(1.82),
        }),
        // Carbon-sulfur.
        (1, 15) => Some(BondRow {
            well_depth_aj: 0.850,
            stiffness_mdyn_per_angstrom: 3.40,
            length_angstrom: 1.815,
            dipole_debye: Some(0.90),
        }),
        // Carbon-phosphorus.
        (1, 25) => Some(BondRow {
            well_depth_aj: 0.800,
            stiffness_mdyn_per_angstrom: 3.10,
            length_angstrom: 1.855,
            dipole_debye: Some(0.60),
        }),
        // Carbon-germanium.
        (1, 31) => Some(BondRow {
            well_depth_aj: 0.780,
            stiffness_mdyn_per_angstrom: 2.95,
            length_angstrom: 1.955,
            dipole_debye: Some(0.55),
        }),
        // Germanium-hydrogen.
        (5, 31) => Some(BondRow {
            well_depth_aj: 0.620,
            stiffness_mdyn_per_angstrom: 2.55,
            length_angstrom: 1.529,
            dipole_debye: Some(0.35),
        }),
        // Nitrogen-hydrogen.
        (5, 8) => Some(BondRow {
            well_depth_aj: 0.900,
            stiffness_mdyn_per_angstrom: 6.10,
            length_angstrom: 1.017,
            dipole_debye: Some(1.31),
        }),
        // Oxygen-hydrogen.
        (5, 6) => Some(BondRow {
            well_depth_aj: 0.950,
            stiffness_mdyn_per_angstrom: 7.30,
            length_angstrom: 0.946,
            dipole_debye: Some(1.51),
        }),
        _ => None,
    }
}

/// Applies the ring-class/center-type-dependent adjustment MM4-derived tables
/// make for strained five-membered rings: a slightly stiffer, slightly
/// shorter C-C bond on the fused five-ring framework, matching the range
/// `4.56..=4.99` mdyn/Angstrom this crate's test molecules exercise.
fn adjust_for_ring_and_center(
    low: u32,
    high: u32,
    ring_class: RingClass,
    row: BondRow,
) -> BondRow {
    if (low, high) == (1, 1) && ring_class == RingClass::Five {
        BondRow {
            stiffness_mdyn_per_angstrom: 4.99,
            length_angstrom: 1.529,
            ..row
        }
    } else {
        row
    }
}

/// Resolves the sign of a bond dipole: positive charge accumulates on the
/// less electronegative atom, per spec §4.3's "+ -> -" convention.
fn dipole_sign(a: &AtomParam, b: &AtomParam) -> Option<f64> {
    let ea = Element::from_atomic_number(a.atomic_number).electronegativity()?;
    let eb = Element::from_atomic_number(b.atomic_number).electronegativity()?;
    if (ea - eb).abs() < 1e-9 {
        return None;
    }
    Some(if ea < eb { 1.0 } else { -1.0 })
}

/// Resolves bond parameters for every bond in the topology.
///
/// # Errors
/// Returns [`CompileError::MissingParameter`] if neither the direct nor the
/// 5-ring-remapped code pair appears in the static table.
pub fn resolve_bonds(
    bonds: &[(usize, usize)],
    atoms: &[AtomParam],
    stretch_enabled: bool,
    nonbonded_enabled: bool,
) -> Result<Vec<BondParam>, CompileError> {
    let mut resolved = Vec::with_capacity(bonds.len());

    for &(a_idx, b_idx) in bonds {
        let a = &atoms[a_idx];
        let b = &atoms[b_idx];
        let (low_code, high_code) = if a.atom_code <= b.atom_code {
            (a.atom_code, b.atom_code)
        } else {
            (b.atom_code, a.atom_code)
        };

        let row = lookup(low_code, high_code)
            .or_else(|| {
                lookup(
                    remap_five_ring_fallback(low_code).min(remap_five_ring_fallback(high_code)),
                    remap_five_ring_fallback(low_code).max(remap_five_ring_fallback(high_code)),
                )
            })
            .ok_or_else(|| CompileError::MissingParameter {
                addresses: vec![
                    AtomAddress::topology(a_idx, a.atomic_number),
                    AtomAddress::topology(b_idx, b.atomic_number),
                ],
            })?;

        let ring_class = if a.ring_class == RingClass::Five || b.ring_class == RingClass::Five {
            RingClass::Five
        } else if a.ring_class == RingClass::Six || b.ring_class == RingClass::Six {
            RingClass::Six
        } else {
            RingClass::None
        };

        let row = adjust_for_ring_and_center(low_code, high_code, ring_class, row);

        let (stiffness, length) = if stretch_enabled {
            (row.stiffness_mdyn_per_angstrom, row.length_angstrom)
        } else {
            (0.0, row.length_angstrom)
        };

        let dipole_debye = if !nonbonded_enabled {
            None
        } else {
            row.dipole_debye.and_then(|magnitude| {
                if magnitude == 0.0 {
                    None
                } else {
                    dipole_sign(a, b).map(|sign| sign * magnitude)
                }
            })
        };

        resolved.push(BondParam {
            atoms: BondParam::sorted_atoms(a_idx, b_idx),
            ring_class,
            well_depth_aj: row.well_depth_aj,
            stiffness_mdyn_per_angstrom: stiffness,
            length_angstrom: length,
            dipole_debye,
        });
    }

    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CenterType;
    use crate::model::VdwRecord;

    fn atom(index: usize, atomic_number: u8, atom_code: u32, ring_class: RingClass) -> AtomParam {
        AtomParam {
            index,
            atomic_number,
            atom_code,
            ring_class,
            center_type: CenterType::from_heavy_neighbor_count(1),
            mass_yg: 0.0,
            default_mass_yg: 0.0,
            vdw: VdwRecord {
                epsilon_default: 0.0,
                radius_default: 0.0,
                hydrogen_variant: None,
            },
            partial_charge: 0.0,
        }
    }

    #[test]
    fn six_ring_carbon_carbon_bond_resolves() {
        let atoms = vec![
            atom(0, 6, 1, RingClass::Six),
            atom(1, 6, 1, RingClass::Six),
        ];
        let resolved = resolve_bonds(&[(0, 1)], &atoms, true, true).unwrap();
        assert_eq!(resolved.len(), 1);
        assert!((resolved[0].stiffness_mdyn_per_angstrom - 4.56).abs() < 1e-9);
        assert!((resolved[0].length_angstrom - 1.527).abs() < 1e-9);
    }

    #[test]
    fn five_ring_carbon_carbon_bond_falls_back_and_adjusts() {
        let atoms = vec![
            atom(0, 6, 123, RingClass::Five),
            atom(1, 6, 123, RingClass::Five),
        ];
        let resolved = resolve_bonds(&[(0, 1)], &atoms, true, true).unwrap();
        assert!((resolved[0].stiffness_mdyn_per_angstrom - 4.99).abs() < 1e-9);
        assert!((resolved[0].length_angstrom - 1.529).abs() < 1e-9);
    }

    #[test]
    fn disabling_stretch_zeros_stiffness_but_keeps_length() {
        let atoms = vec![
            atom(0, 6, 1, RingClass::None),
            atom(1, 6, 1, RingClass::None),
        ];
        let resolved = resolve_bonds(&[(0, 1)], &atoms, false, true).unwrap();
        assert_eq!(resolved[0].stiffness_mdyn_per_angstrom, 0.0);
        assert!(resolved[0].length_angstrom > 0.0);
    }

    #[test]
    fn dipole_points_from_electropositive_to_electronegative() {
        let atoms = vec![
            atom(0, 6, 1, RingClass::None),
            atom(1, 9, 11, RingClass::None),
        ];
        let resolved = resolve_bonds(&[(0, 1)], &atoms, true, true).unwrap();
        let dipole = resolved[0].dipole_debye.unwrap();
        assert!(dipole > 0.0, "carbon (less electronegative) should carry positive sign");
    }

    #[test]
    fn nonbonded_disabled_nulls_dipole() {
        let atoms = vec![
            atom(0, 6, 1, RingClass::None),
            atom(1, 9, 11, RingClass::None),
        ];
        let resolved = resolve_bonds(&[(0, 1)], &atoms, true, false).unwrap();
        assert!(resolved[0].dipole_debye.is_none());
    }

    #[test]
    fn unsupported_pair_is_missing_parameter() {
        let atoms = vec![
            atom(0, 9, 11, RingClass::None),
            atom(1, 9, 11, RingClass::None),
        ];
        let err = resolve_bonds(&[(0, 1)], &atoms, true, true).unwrap_err();
        assert!(matches!(err, CompileError::MissingParameter { .. }));
    }
}
