//! Unit conversion constants used at the internal/external boundary.
//!
//! Internally, equilibrium bond lengths and angles are stored the way the tables in
//! §4.3-§4.5 were originally tabulated (Angstrom, degrees); externally the crate's
//! public API reports nm and radians (see spec §6's unit system). Energies are
//! stored and reported in zJ; the constants below convert between the
//! kJ/mol-and-mdyn/Angstrom units the tables are transcribed from and the
//! internal zJ/aJ representation.

/// 1 kJ/mol expressed in attojoules per molecule.
pub const MM4_AJ_PER_KJ_PER_MOL: f64 = 1.660539e-3;
/// 1 kJ/mol expressed in zeptojoules per molecule.
pub const MM4_ZJ_PER_KJ_PER_MOL: f64 = 1.660539;
/// 1 attojoule per molecule expressed in kJ/mol.
pub const MM4_KJ_PER_MOL_PER_AJ: f64 = 602.214;
/// 1 zeptojoule per molecule expressed in kJ/mol.
pub const MM4_KJ_PER_MOL_PER_ZJ: f64 = 0.602214;
/// Attojoules per zeptojoule (zJ = aJ / 1000).
pub const AJ_PER_ZJ: f64 = 1.0 / 1000.0;
/// Zeptojoules per attojoule.
pub const ZJ_PER_AJ: f64 = 1000.0;

/// Elementary charge per Debye per Angstrom, used to project a bond dipole moment
/// (Debye) over a bond length (Angstrom) into a partial charge (elementary charge).
pub const E_ANGSTROM_PER_DEBYE: f64 = 0.2081943;

/// Nanometers per Angstrom.
pub const NM_PER_ANGSTROM: f64 = 0.1;
/// Angstrom per nanometer.
pub const ANGSTROM_PER_NM: f64 = 10.0;

/// Converts degrees to radians.
pub fn degrees_to_radians(degrees: f64) -> f64 {
    degrees.to_radians()
}

/// Converts radians to degrees.
pub fn radians_to_degrees(radians: f64) -> f64 {
    radians.to_degrees()
}

/// Converts a millidyne·Angstrom/rad^2 bending force constant into zJ/rad^2,
/// per spec §4.4's unit conversion note: 1 mdyn·Å is numerically 1 aJ, and the
/// aJ->zJ conversion is carried through the `MM4_KJ_PER_MOL_PER_AJ *
/// MM4_ZJ_PER_KJ_PER_MOL` round trip rather than the flat `AJ_PER_ZJ` factor,
/// matching how the constant is quoted in the original tables.
pub fn mdyne_angstrom_to_zj(mdyne_angstrom: f64) -> f64 {
    mdyne_angstrom * MM4_KJ_PER_MOL_PER_AJ * MM4_ZJ_PER_KJ_PER_MOL
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degree_radian_round_trip() {
        let deg = 109.5;
        let rad = degrees_to_radians(deg);
        assert!((radians_to_degrees(rad) - deg).abs() < 1e-9);
    }

    #[test]
    fn nm_angstrom_are_inverse_scales() {
        assert!((NM_PER_ANGSTROM * ANGSTROM_PER_NM - 1.0).abs() < 1e-12);
    }
}
