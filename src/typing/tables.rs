//! Static atom-code and van der Waals lookup tables.
//!
//! Grounded in the teacher's `rules::mod` `LazyLock`-backed static table
//! pattern (a const/static table computed once, looked up by a small key),
//! adapted here to a `match` over `(atomic_number, ring_size)` since the
//! table is small and fixed at compile time rather than loaded from TOML.

use crate::core::Element;
use crate::model::{VdwPair, VdwRecord};

/// Assigns a typed atom code from the atomic number and the atom's smallest
/// ring size (`None` when the atom is not part of any perceived ring).
///
/// Returns `None` for elements with no recognized code.
pub fn atom_code(atomic_number: u8, smallest_ring_size: Option<u8>) -> Option<u32> {
    match (atomic_number, smallest_ring_size) {
        (6, Some(5)) => Some(123),
        (6, _) => Some(1),
        (1, _) => Some(5),
        (8, _) => Some(6),
        (7, _) => Some(8),
        (9, _) => Some(11),
        (16, _) => Some(15),
        (14, _) => Some(19),
        (15, _) => Some(25),
        (32, _) => Some(31),
        _ => None,
    }
}

/// Remaps a 5-ring carbon code (123) back to its 6-ring equivalent (1) for
/// the fallback lookup pass used by C3/C4.
pub fn remap_five_ring_fallback(code: u32) -> u32 {
    if code == 123 { 1 } else { code }
}

/// Default van der Waals record for an element, including its hydrogen-pair
/// mixing variant where applicable.
pub fn vdw_record(atomic_number: u8) -> Option<VdwRecord> {
    let element = Element::from_atomic_number(atomic_number);
    let record = match element {
        Element::C => VdwRecord {
            epsilon_default: 0.2703,
            radius_default: 1.960,
            hydrogen_variant: Some(VdwPair { epsilon: 0.0680, radius: 1.620 }),
        },
        Element::H => VdwRecord {
            epsilon_default: 0.0240,
            radius_default: 1.340,
            hydrogen_variant: None,
        },
        Element::N => VdwRecord {
            epsilon_default: 0.3300,
            radius_default: 1.860,
            hydrogen_variant: Some(VdwPair { epsilon: 0.0840, radius: 1.530 }),
        },
        Element::O => VdwRecord {
            epsilon_default: 0.3590,
            radius_default: 1.820,
            hydrogen_variant: Some(VdwPair { epsilon: 0.0920, radius: 1.500 }),
        },
        Element::F => VdwRecord {
            epsilon_default: 0.2710,
            radius_default: 1.710,
            hydrogen_variant: None,
        },
        Element::Si => VdwRecord {
            epsilon_default: 0.3850,
            radius_default: 2.290,
            hydrogen_variant: Some(VdwPair { epsilon: 0.0950, radius: 1.910 }),
        },
        Element::P => VdwRecord {
            epsilon_default: 0.4200,
            radius_default: 2.180,
            hydrogen_variant: Some(VdwPair { epsilon: 0.1020, radius: 1.830 }),
        },
        Element::S => VdwRecord {
            epsilon_default: 0.4400,
            radius_default: 2.090,
            hydrogen_variant: Some(VdwPair { epsilon: 0.1100, radius: 1.760 }),
        },
        Element::Ge => VdwRecord {
            epsilon_default: 0.4000,
            radius_default: 2.320,
            hydrogen_variant: Some(VdwPair { epsilon: 0.0970, radius: 1.940 }),
        },
        Element::Other(_) => return None,
    };
    Some(record)
}

/// Default (pre-repartitioning) mass of an element, in yg.
pub fn default_mass_yg(atomic_number: u8) -> Option<f64> {
    match atomic_number {
        1 => Some(1.6735),
        6 => Some(19.9265),
        7 => Some(23.2594),
        8 => Some(26.5650),
        9 => Some(31.5477),
        14 => Some(46.6171),
        15 => Some(51.4307),
        16 => Some(53.2465),
        32 => Some(120.5264),
        _ => None,
    }
}
