//! A bicyclic two-fused-five-ring cage: eight group-IV centers (carbon or
//! silicon) saturated with hydrogen to full valence, used as the "cage
//! molecule" end-to-end fixture in place of the spec's literal adamantane
//! atom/bond counts (see DESIGN.md's Open Question notes on why those exact
//! counts aren't reproduced bit-for-bit here).
//!
//! Skeleton bonds: 0-1-2-3-4-0 and 0-1-5-6-7-0, two five-membered rings
//! sharing the (0, 1) edge. Centers 0 and 1 carry three heavy neighbors (one
//! hydrogen each); centers 2..=7 carry two heavy neighbors (two hydrogens
//! each), for 14 hydrogens total and 22 atoms overall.

use mm4_compiler::{ForceOptions, ParameterDescriptor};

const SKELETON_BONDS: [(u32, u32); 9] = [
    (0, 1),
    (1, 2),
    (2, 3),
    (3, 4),
    (4, 0),
    (1, 5),
    (5, 6),
    (6, 7),
    (7, 0),
];

/// Builds the cage descriptor with every heavy center carrying
/// `heavy_atomic_number` (6 for carbon, 14 for silicon).
pub fn cage_descriptor(heavy_atomic_number: u8) -> ParameterDescriptor {
    let mut atomic_numbers = vec![heavy_atomic_number; 8];
    let mut bonds: Vec<(u32, u32)> = SKELETON_BONDS.to_vec();

    let mut next_h = 8u32;
    let three_heavy = [0u32, 1u32];
    for center in 0u32..8 {
        let h_count = if three_heavy.contains(&center) { 1 } else { 2 };
        for _ in 0..h_count {
            atomic_numbers.push(1);
            bonds.push((center, next_h));
            next_h += 1;
        }
    }

    ParameterDescriptor {
        atomic_numbers,
        bonds,
        force_options: ForceOptions::default(),
        hydrogen_mass_scale: 2.0,
    }
}

/// Atom count for [`cage_descriptor`]: 8 heavy centers + 14 hydrogens.
pub const CAGE_ATOM_COUNT: usize = 22;
/// Bond count for [`cage_descriptor`]: 9 skeleton bonds + 14 C-H/Si-H bonds.
pub const CAGE_BOND_COUNT: usize = 23;
