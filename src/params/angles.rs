//! C4 — Angle parameter resolver.
//!
//! Resolves bending stiffness, equilibrium angle, stretch-bend, bend-bend,
//! and stretch-stretch coefficients for each angle. Grounded in the same
//! switch-on-code lookup idiom as [`crate::params::bonds`], extended here
//! with the angle-type-indexed 3-tuple selection and the fallback-then-error
//! shape the teacher's `processor::typer::TyperEngine` uses for priority
//! rule matching (attempt the precise rule, then a looser one, then fail).

use crate::core::error::{AtomAddress, CompileError};
use crate::core::units::mdyne_angstrom_to_zj;
use crate::core::{Element, RingClass};
use crate::model::{AngleExtended, AngleParam, AtomParam};
use crate::topology::AngleTopo;
use crate::typing::tables::remap_five_ring_fallback;

/// A raw angle table row, before angle-type selection and unit conversion.
/// `f64::NAN` marks an angle-type slot with no defined parameter.
#[derive(Debug, Clone, Copy)]
struct AngleRow {
    bending_stiffness_mdyn_per_rad2: [f64; 3],
    equilibrium_angle_degrees: [f64; 3],
    stretch_bend_mdyn_per_rad: f64,
    bend_bend_mdyn_per_rad2: Option<f64>,
}

fn lookup(low: u32, center: u32, high: u32) -> Option<AngleRow> {
    match (low, center, high) {
        (1, 1, 1) => Some(AngleRow {
            bending_stiffness_mdyn_per_rad2: [0.560, 0.540, 0.520],
            equilibrium_angle_degrees: [109.47, 109.47, 109.47],
            stretch_bend_mdyn_per_rad: 0.280,
            bend_bend_mdyn_per_rad2: Some(0.070),
        }),
        (1, 1, 5) => Some(AngleRow {
            bending_stiffness_mdyn_per_rad2: [0.540, 0.520, 0.500],
            equilibrium_angle_degrees: [109.50, 109.50, 109.50],
            stretch_bend_mdyn_per_rad: 0.180,
            bend_bend_mdyn_per_rad2: Some(0.050),
        }),
        (5, 1, 5) => Some(AngleRow {
            bending_stiffness_mdyn_per_rad2: [0.480, 0.460, 0.440],
            equilibrium_angle_degrees: [109.40, 109.40, 109.40],
            stretch_bend_mdyn_per_rad: 0.050,
            bend_bend_mdyn_per_rad2: Some(0.040),
        }),
        (19, 19, 19) => Some(AngleRow {
            bending_stiffness_mdyn_per_rad2: [0.480, 0.460, 0.440],
            equilibrium_angle_degrees: [109.50, 109.50, 109.50],
            stretch_bend_mdyn_per_rad: 0.200,
            bend_bend_mdyn_per_rad2: Some(0.050),
        }),
        (5, 19, 5) => Some(AngleRow {
            bending_stiffness_mdyn_per_rad2: [0.400, 0.380, 0.360],
            equilibrium_angle_degrees: [109.50, 109.50, 109.50],
            stretch_bend_mdyn_per_rad: 0.040,
            bend_bend_mdyn_per_rad2: Some(0.030),
        }),
        (5, 19, 19) => Some(AngleRow {
            bending_stiffness_mdyn_per_rad2: [0.420, 0.400, 0.380],
            equilibrium_angle_degrees: [109.50, 109.50, 109.50],
            stretch_bend_mdyn_per_rad: 0.090,
            bend_bend_mdyn_per_rad2: Some(0.035),
        }),
        (1, 8, 1) => Some(AngleRow {
            bending_stiffness_mdyn_per_rad2: [0.700, f64::NAN, f64::NAN],
            equilibrium_angle_degrees: [112.20, f64::NAN, f64::NAN],
            stretch_bend_mdyn_per_rad: 0.200,
            bend_bend_mdyn_per_rad2: None,
        }),
        (1, 6, 1) => Some(AngleRow {
            bending_stiffness_mdyn_per_rad2: [0.850, f64::NAN, f64::NAN],
            equilibrium_angle_degrees: [107.00, f64::NAN, f64::NAN],
            stretch_bend_mdyn_per_rad: 0.150,
            bend_bend_mdyn_per_rad2: None,
        }),
        (11, 1, 11) => Some(AngleRow {
            bending_stiffness_mdyn_per_rad2: [0.900, 0.880, 0.860],
            equilibrium_angle_degrees: [108.70, 108.70, 108.70],
            stretch_bend_mdyn_per_rad: 0.300,
            bend_bend_mdyn_per_rad2: Some(0.080),
        }),
        _ => None,
    }
}

/// Per-element grouping used to derive the angle-type mapping.
enum ElementGroup {
    Four,
    Five,
    Six,
    IllegalCenter,
}

fn element_group(element: Element) -> ElementGroup {
    match element {
        Element::C | Element::Si | Element::Ge => ElementGroup::Four,
        Element::N | Element::P => ElementGroup::Five,
        Element::O | Element::S => ElementGroup::Six,
        Element::H | Element::F => ElementGroup::IllegalCenter,
        Element::Other(_) => ElementGroup::IllegalCenter,
    }
}

/// Derives the angle type (1, 2, or 3) for the center atom of an angle.
fn angle_type(center: &AtomParam, heavy_non_member_count: u8) -> Option<u8> {
    match element_group(Element::from_atomic_number(center.atomic_number)) {
        ElementGroup::Four => match heavy_non_member_count {
            2 => Some(1),
            1 => Some(2),
            0 => Some(3),
            _ => None,
        },
        // Group V/VI centers admit only one defined angle type in the table;
        // any remaining substituent (heavy or not) maps to it.
        ElementGroup::Five | ElementGroup::Six => Some(1),
        ElementGroup::IllegalCenter => None,
    }
}

fn is_halogen(atomic_number: u8) -> bool {
    matches!(Element::from_atomic_number(atomic_number), Element::F)
}

/// Resolves angle parameters for every angle enumerated by C1.
///
/// # Errors
/// Returns [`CompileError::UnsupportedCenterType`] when the center atom is
/// hydrogen or fluorine (an illegal angle center), and
/// [`CompileError::MissingParameter`] when neither the direct nor the
/// 5-ring-remapped lookup succeeds, or the resolved angle type indexes a NaN
/// slot in an otherwise-found table row.
pub fn resolve_angles(
    angles: &[AngleTopo],
    atoms: &[AtomParam],
    bend_enabled: bool,
    bend_bend_enabled: bool,
    stretch_bend_enabled: bool,
    stretch_stretch_enabled: bool,
) -> Result<Vec<AngleParam>, CompileError> {
    let mut resolved = Vec::with_capacity(angles.len());

    for angle in angles {
        let (a_idx, b_idx, c_idx) = angle.atoms;
        let a = &atoms[a_idx];
        let b = &atoms[b_idx];
        let c = &atoms[c_idx];

        let heavy_neighbor_count = match b.center_type {
            Some(_) => heavy_neighbor_count_of(b),
            None => 0,
        };
        let member_heavy = (a.atomic_number != 1) as u8 + (c.atomic_number != 1) as u8;
        let heavy_non_member_count = heavy_neighbor_count.saturating_sub(member_heavy);

        let resolved_type = angle_type(b, heavy_non_member_count).ok_or_else(|| {
            CompileError::UnsupportedCenterType {
                center: AtomAddress::topology(b_idx, b.atomic_number),
                bonded: vec![
                    AtomAddress::topology(a_idx, a.atomic_number),
                    AtomAddress::topology(c_idx, c.atomic_number),
                ],
            }
        })?;

        let (low, high) = if a.atom_code <= c.atom_code {
            (a.atom_code, c.atom_code)
        } else {
            (c.atom_code, a.atom_code)
        };

        let missing = || CompileError::MissingParameter {
            addresses: vec![
                AtomAddress::topology(a_idx, a.atomic_number),
                AtomAddress::topology(b_idx, b.atomic_number),
                AtomAddress::topology(c_idx, c.atomic_number),
            ],
        };

        let row = lookup(low, b.atom_code, high)
            .or_else(|| {
                lookup(
                    remap_five_ring_fallback(low),
                    remap_five_ring_fallback(b.atom_code),
                    remap_five_ring_fallback(high),
                )
            })
            .ok_or_else(missing)?;

        let type_index = (resolved_type - 1) as usize;
        let raw_stiffness = row.bending_stiffness_mdyn_per_rad2[type_index];
        let raw_equilibrium = row.equilibrium_angle_degrees[type_index];
        if raw_stiffness.is_nan() || raw_equilibrium.is_nan() {
            return Err(missing());
        }

        let ring_class = if a.ring_class == RingClass::Five
            || b.ring_class == RingClass::Five
            || c.ring_class == RingClass::Five
        {
            RingClass::Five
        } else if a.ring_class == RingClass::Six
            || b.ring_class == RingClass::Six
            || c.ring_class == RingClass::Six
        {
            RingClass::Six
        } else {
            RingClass::None
        };

        let bending_stiffness_zj_per_rad2 = if bend_enabled {
            mdyne_angstrom_to_zj(raw_stiffness) / 2.0
        } else {
            0.0
        };

        let stretch_bend_mdyn_per_rad = if stretch_bend_enabled {
            row.stretch_bend_mdyn_per_rad
        } else {
            0.0
        };

        let is_divalent_o_or_s = matches!(
            Element::from_atomic_number(b.atomic_number),
            Element::O | Element::S
        ) && heavy_neighbor_count <= 2;

        let bend_bend_zj_per_rad2 = if bend_bend_enabled && heavy_neighbor_count >= 2 && !is_divalent_o_or_s {
            row.bend_bend_mdyn_per_rad2
                .map(|raw| mdyne_angstrom_to_zj(raw) / 2.0)
        } else {
            None
        };

        let extended = if stretch_stretch_enabled
            && is_halogen(a.atomic_number)
            && is_halogen(c.atomic_number)
        {
            Some(AngleExtended {
                stretch_bend_secondary: stretch_bend_mdyn_per_rad,
                stretch_stretch: 0.30,
            })
        } else {
            None
        };

        resolved.push(AngleParam {
            atoms: (a_idx, b_idx, c_idx),
            ring_class,
            angle_type: resolved_type,
            bending_stiffness_zj_per_rad2,
            equilibrium_angle_degrees: raw_equilibrium,
            stretch_bend_mdyn_per_rad,
            bend_bend_zj_per_rad2,
            extended,
        });
    }

    Ok(resolved)
}

fn heavy_neighbor_count_of(atom: &AtomParam) -> u8 {
    use crate::core::CenterType;
    match atom.center_type {
        Some(CenterType::Primary) => 1,
        Some(CenterType::Secondary) => 2,
        Some(CenterType::Tertiary) => 3,
        Some(CenterType::Quaternary) => 4,
        None => 0,
    }
}
