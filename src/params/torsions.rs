//! C5 — Torsion parameter resolver.
//!
//! Resolves standard or extended torsion coefficients depending on whether
//! any of the four atoms is an electronegative heteroatom. Grounded in the
//! same code-pair switch idiom as [`crate::params::bonds`] and
//! [`crate::params::angles`], keyed here by the central `(b, c)` bond's atom
//! codes since the torsion's outer atoms only gate standard-vs-extended
//! selection rather than indexing the table themselves.

use std::collections::HashMap;

use crate::core::error::{AtomAddress, CompileError};
use crate::core::{Element, RingClass};
use crate::model::{
    AtomParam, BondParam, TorsionExtended, TorsionForm, TorsionParam, TorsionStandard,
    TorsionTriple,
};
use crate::topology::TorsionTopo;

#[derive(Debug, Clone, Copy)]
struct StandardRow {
    v1: f64,
    vn: f64,
    v3: f64,
    n: u8,
    torsion_stretch_raw: f64,
}

#[derive(Debug, Clone, Copy)]
struct ExtendedRow {
    v1: f64,
    v2: f64,
    v3: f64,
    v4: f64,
    v6: f64,
    stretch_stretch: [TorsionTriple; 3],
    torsion_bend: [TorsionTriple; 2],
    bend_torsion_bend: f64,
}

fn lookup_standard(low: u32, high: u32) -> Option<StandardRow> {
    match (low, high) {
        (1, 1) => Some(StandardRow {
            v1: 0.0,
            vn: 0.0,
            v3: 0.648,
            n: 2,
            torsion_stretch_raw: 0.120,
        }),
        (1, 5) => Some(StandardRow {
            v1: 0.0,
            vn: 0.0,
            v3: 0.530,
            n: 2,
            torsion_stretch_raw: 0.0,
        }),
        (5, 5) => Some(StandardRow {
            v1: 0.0,
            vn: 0.0,
            v3: 0.236,
            n: 2,
            torsion_stretch_raw: 0.0,
        }),
        (19, 19) => Some(StandardRow {
            v1: 0.0,
            vn: 0.0,
            v3: 0.186,
            n: 2,
            torsion_stretch_raw: 0.050,
        }),
        (5, 19) => Some(StandardRow {
            v1: 0.0,
            vn: 0.0,
            v3: 0.160,
            n: 2,
            torsion_stretch_raw: 0.0,
        }),
        (1, 19) => Some(StandardRow {
            v1: 0.0,
            vn: 0.0,
            v3: 0.200,
            n: 2,
            torsion_stretch_raw: 0.030,
        }),
        _ => None,
    }
}

fn lookup_extended(low: u32, high: u32) -> Option<ExtendedRow> {
    match (low, high) {
        (1, 8) => Some(ExtendedRow {
            v1: 0.150,
            v2: 0.050,
            v3: 0.420,
            v4: 0.0,
            v6: 0.0,
            stretch_stretch: [TorsionTriple::default(); 3],
            torsion_bend: [TorsionTriple::default(); 2],
            bend_torsion_bend: 0.0,
        }),
        (1, 6) => Some(ExtendedRow {
            v1: 0.200,
            v2: 0.080,
            v3: 0.390,
            v4: 0.0,
            v6: 0.0,
            stretch_stretch: [TorsionTriple::default(); 3],
            torsion_bend: [TorsionTriple::default(); 2],
            bend_torsion_bend: 0.0,
        }),
        (1, 11) => Some(ExtendedRow {
            v1: 0.250,
            v2: 0.100,
            v3: 0.300,
            v4: 0.0,
            v6: 0.0,
            stretch_stretch: [TorsionTriple::default(); 3],
            torsion_bend: [TorsionTriple::default(); 2],
            bend_torsion_bend: 0.0,
        }),
        _ => None,
    }
}

/// Resolves torsion parameters for every torsion enumerated by C1.
///
/// # Errors
/// Returns [`CompileError::MissingParameter`] if the central bond's code
/// pair has no table entry in the applicable (standard or extended) table.
pub fn resolve_torsions(
    torsions: &[TorsionTopo],
    atoms: &[AtomParam],
    bond_index: &HashMap<(usize, usize), usize>,
    bonds: &[BondParam],
    torsion_enabled: bool,
    torsion_bend_enabled: bool,
    torsion_stretch_enabled: bool,
) -> Result<Vec<TorsionParam>, CompileError> {
    let mut resolved = Vec::with_capacity(torsions.len());

    for torsion in torsions {
        let (a_idx, b_idx, c_idx, d_idx) = torsion.atoms;
        let a = &atoms[a_idx];
        let b = &atoms[b_idx];
        let c = &atoms[c_idx];
        let d = &atoms[d_idx];

        let is_extended = [a, b, c, d]
            .iter()
            .any(|atom| Element::from_atomic_number(atom.atomic_number).is_electronegative());

        let (low, high) = if b.atom_code <= c.atom_code {
            (b.atom_code, c.atom_code)
        } else {
            (c.atom_code, b.atom_code)
        };

        let missing = || CompileError::MissingParameter {
            addresses: vec![
                AtomAddress::topology(a_idx, a.atomic_number),
                AtomAddress::topology(b_idx, b.atomic_number),
                AtomAddress::topology(c_idx, c.atomic_number),
                AtomAddress::topology(d_idx, d.atomic_number),
            ],
        };

        let ring_class = ring_class_of(&[a, b, c, d]);

        let form = if is_extended {
            let row = lookup_extended(low, high).ok_or_else(missing)?;
            let scale = |v: f64| if torsion_enabled { v / 2.0 } else { 0.0 };
            TorsionForm::Extended(TorsionExtended {
                v1: scale(row.v1),
                v2: scale(row.v2),
                v3: scale(row.v3),
                v4: scale(row.v4),
                v6: scale(row.v6),
                stretch_stretch: row.stretch_stretch,
                torsion_bend: if torsion_bend_enabled {
                    row.torsion_bend
                } else {
                    [TorsionTriple::default(); 2]
                },
                bend_torsion_bend: row.bend_torsion_bend,
            })
        } else {
            let row = lookup_standard(low, high).ok_or_else(missing)?;
            let center_stiffness = bond_index
                .get(&BondParam::sorted_atoms(b_idx, c_idx))
                .map(|&i| bonds[i].stiffness_mdyn_per_angstrom)
                .filter(|&s| s > 0.0);

            let torsion_stretch = if torsion_stretch_enabled {
                center_stiffness
                    .map(|stiffness| row.torsion_stretch_raw / stiffness)
                    .unwrap_or(0.0)
            } else {
                0.0
            };

            let scale = |v: f64| if torsion_enabled { v / 2.0 } else { 0.0 };
            TorsionForm::Standard(TorsionStandard {
                v1: scale(row.v1),
                vn: scale(row.vn),
                v3: scale(row.v3),
                n: row.n,
                torsion_stretch,
            })
        };

        resolved.push(TorsionParam {
            atoms: (a_idx, b_idx, c_idx, d_idx),
            ring_class,
            form,
        });
    }

    Ok(resolved)
}

fn ring_class_of(atoms: &[&AtomParam; 4]) -> RingClass {
    if atoms.iter().any(|a| a.ring_class == RingClass::Five) {
        RingClass::Five
    } else if atoms.iter().any(|a| a.ring_class == RingClass::Six) {
        RingClass::Six
    } else {
        RingClass::None
    }
}
