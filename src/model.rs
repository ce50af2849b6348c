//! The data model of the compiled parameter set: atoms, bonds, angles, torsions,
//! rings, and nonbonded exceptions, plus the input descriptor that seeds the
//! pipeline. Mirrors the teacher's `core/graph.rs`/`core/topology.rs` split
//! between a lightweight input graph and a richly annotated output topology,
//! with canonicalization performed in each `new`-style constructor.

use crate::core::{CenterType, Element, ForceOptions, RingClass};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Sentinel for unused adjacency/ring lanes, matching spec §4.1's "-1 sentinel"
/// convention but expressed as `usize::MAX` since indices are unsigned.
pub const SENTINEL: usize = usize::MAX;

/// Input to the compiler: atomic numbers, bond connectivity, and the knobs
/// described in spec §6.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDescriptor {
    /// Atomic number of every atom, in index order.
    pub atomic_numbers: Vec<u8>,
    /// Unordered covalent bonds, as atom index pairs.
    pub bonds: Vec<(u32, u32)>,
    /// Which energy term families to compile coefficients for.
    pub force_options: ForceOptions,
    /// Hydrogen mass repartitioning scale factor (2.0 = standard HMR, 1.0 = off).
    pub hydrogen_mass_scale: f64,
}

impl Default for ParameterDescriptor {
    fn default() -> Self {
        Self {
            atomic_numbers: Vec::new(),
            bonds: Vec::new(),
            force_options: ForceOptions::default(),
            hydrogen_mass_scale: 2.0,
        }
    }
}

/// Default hydrogen/heavy-atom pair vdW mixing record. A hydrogen atom carries
/// no hydrogen-variant of its own (sentinel `None`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VdwRecord {
    /// Default well depth, in zJ.
    pub epsilon_default: f64,
    /// Default van der Waals radius, in Angstrom.
    pub radius_default: f64,
    /// Hydrogen-pair mixing variant, absent for hydrogen atoms themselves.
    pub hydrogen_variant: Option<VdwPair>,
}

/// A single (epsilon, radius) pair used for the heteroatom-hydrogen mixing rule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VdwPair {
    /// Well depth, in zJ.
    pub epsilon: f64,
    /// Radius, in Angstrom.
    pub radius: f64,
}

/// A fully typed atom in the compiled parameter set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtomParam {
    /// Index in `[0, N)`.
    pub index: usize,
    /// Atomic number.
    pub atomic_number: u8,
    /// Typed atom code (see glossary: 1, 5, 123, ...).
    pub atom_code: u32,
    /// Ring-membership classification.
    pub ring_class: RingClass,
    /// Substitution level, `None` for atoms with zero or more than four heavy
    /// neighbors (hydrogens report `None`).
    pub center_type: Option<CenterType>,
    /// Mass after hydrogen mass repartitioning, in yg.
    pub mass_yg: f64,
    /// Default mass (no HMR), in yg — retained to verify mass conservation.
    pub default_mass_yg: f64,
    /// van der Waals parameters.
    pub vdw: VdwRecord,
    /// Accumulated partial charge, in elementary charge units.
    pub partial_charge: f64,
}

/// A bond between two atoms, sorted ascending per spec §3's bond invariant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BondParam {
    /// Sorted atom index pair.
    pub atoms: (usize, usize),
    /// Ring-membership classification.
    pub ring_class: RingClass,
    /// Morse well depth, in aJ.
    pub well_depth_aj: f64,
    /// Stretching stiffness, in mdyn/Angstrom.
    pub stiffness_mdyn_per_angstrom: f64,
    /// Equilibrium length, in Angstrom (internal storage unit per spec §6).
    pub length_angstrom: f64,
    /// Signed bond dipole moment, in Debye. `None` when the bond carries no
    /// dipole (homonuclear) or nonbonded terms are disabled.
    pub dipole_debye: Option<f64>,
}

impl BondParam {
    /// Builds a bond record, sorting the atom pair ascending.
    pub fn sorted_atoms(a: usize, b: usize) -> (usize, usize) {
        if a < b { (a, b) } else { (b, a) }
    }
}

/// Optional secondary stretch-bend / stretch-stretch coefficients carried by
/// some angles, per spec §3's "optional extended" attribute.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AngleExtended {
    /// Secondary stretch-bend stiffness, in mdyn/rad.
    pub stretch_bend_secondary: f64,
    /// Stretch-stretch stiffness, in mdyn/Angstrom (only present for angles
    /// with a halogen on both sides, e.g. F-C-F).
    pub stretch_stretch: f64,
}

/// An angle `(a, b, c)` with middle atom `b`, canonicalized so `a <= c`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AngleParam {
    /// Canonicalized atom triple.
    pub atoms: (usize, usize, usize),
    /// Ring-membership classification.
    pub ring_class: RingClass,
    /// Angle type in `{1, 2, 3}`, derived from the center atom's heavy
    /// non-member neighbor count.
    pub angle_type: u8,
    /// Bending stiffness, in zJ/rad^2 (already selected for `angle_type`).
    pub bending_stiffness_zj_per_rad2: f64,
    /// Equilibrium angle, in radians (externally) — stored internally in
    /// degrees per spec §6 and converted at the public accessor boundary.
    pub equilibrium_angle_degrees: f64,
    /// Stretch-bend stiffness, in mdyn/rad.
    pub stretch_bend_mdyn_per_rad: f64,
    /// Bend-bend applicability: `Some(stiffness)` when the center has at
    /// least two heavy neighbors and is not a divalent O/S.
    pub bend_bend_zj_per_rad2: Option<f64>,
    /// Present only for halogen-both-sides angles (e.g. F-C-F).
    pub extended: Option<AngleExtended>,
}

/// Standard (non-extended) torsion coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TorsionStandard {
    /// V1 term, in zJ.
    pub v1: f64,
    /// Vn term (n-fold), in zJ.
    pub vn: f64,
    /// V3 term, in zJ.
    pub v3: f64,
    /// Periodicity of the Vn term; must be even.
    pub n: u8,
    /// Torsion-stretch coupling, pre-divided by the center bond's stretching
    /// stiffness per spec §4.5.
    pub torsion_stretch: f64,
}

/// A left/center/right (or left/right) triple of stretch-stretch or
/// torsion-bend coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TorsionTriple {
    /// Left-side coefficient.
    pub left: f64,
    /// Center coefficient (zero for torsion-bend triples, which have no
    /// center term).
    pub center: f64,
    /// Right-side coefficient.
    pub right: f64,
}

/// Extended torsion coefficients, present when any of the four atoms is an
/// electronegative "extended" heteroatom.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TorsionExtended {
    /// V1 term, in zJ.
    pub v1: f64,
    /// V2 term, in zJ.
    pub v2: f64,
    /// V3 term, in zJ.
    pub v3: f64,
    /// V4 term, in zJ.
    pub v4: f64,
    /// V6 term, in zJ.
    pub v6: f64,
    /// Three stretch-stretch triples (Kts1, Kts2, Kts3).
    pub stretch_stretch: [TorsionTriple; 3],
    /// Two torsion-bend triples (Ktb1, Ktb2); `center` is unused.
    pub torsion_bend: [TorsionTriple; 2],
    /// Bend-torsion-bend coefficient.
    pub bend_torsion_bend: f64,
}

/// Standard or extended torsion record, per spec §3's sum-type representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TorsionForm {
    /// Simple V1/Vn/V3 torsion.
    Standard(TorsionStandard),
    /// Fully coupled extended torsion.
    Extended(TorsionExtended),
}

/// A torsion `(a, b, c, d)`, canonicalized per spec §3.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TorsionParam {
    /// Canonicalized atom quadruple.
    pub atoms: (usize, usize, usize, usize),
    /// Ring-membership classification.
    pub ring_class: RingClass,
    /// The resolved coefficient form.
    pub form: TorsionForm,
}

/// A ring of up to eight atoms, unused lanes marked with [`SENTINEL`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ring {
    atoms: [usize; 8],
    size: u8,
}

impl Ring {
    /// Builds a ring from its member atoms (already ordered along the cycle).
    ///
    /// # Panics
    /// Panics if `members.len()` is not in `3..=8` — callers must have already
    /// rejected out-of-range rings per spec §4.1 before constructing one.
    pub fn new(members: &[usize]) -> Self {
        assert!(
            (3..=8).contains(&members.len()),
            "ring size {} out of supported range",
            members.len()
        );
        let mut atoms = [SENTINEL; 8];
        atoms[..members.len()].copy_from_slice(members);
        Self {
            atoms,
            size: members.len() as u8,
        }
    }

    /// The ring's size (3..=8).
    pub fn size(&self) -> u8 {
        self.size
    }

    /// The ring's member atoms, in cycle order.
    pub fn atoms(&self) -> &[usize] {
        &self.atoms[..self.size as usize]
    }

    /// Shifts every member atom index by `delta`, used by the parameter
    /// merger (C8) to rebase a ring onto a concatenated atom list.
    pub fn offset(&self, delta: usize) -> Self {
        Self::new(&self.atoms().iter().map(|&a| a + delta).collect::<Vec<_>>())
    }
}

/// Tags whether a nonbonded exception pair is separated by two bonds (1-3) or
/// three bonds (1-4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExceptionKind {
    /// Atoms separated by exactly two bonds (share a common angle).
    OneThree,
    /// Atoms separated by exactly three bonds (share a common torsion).
    OneFour,
}

/// A deduplicated nonbonded exception pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NonbondedException {
    /// Sorted atom index pair.
    pub atoms: (usize, usize),
    /// Whether this is a 1-3 or 1-4 exception.
    pub kind: ExceptionKind,
}

impl NonbondedException {
    /// Builds an exception record, sorting the atom pair ascending.
    pub fn new(a: usize, b: usize, kind: ExceptionKind) -> Self {
        let atoms = if a < b { (a, b) } else { (b, a) };
        Self { atoms, kind }
    }
}

/// The complete compiled parameter set: the output of the C1-C7 pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParameterSet {
    /// Typed atoms.
    pub atoms: Vec<AtomParam>,
    /// Resolved bonds.
    pub bonds: Vec<BondParam>,
    /// Resolved angles.
    pub angles: Vec<AngleParam>,
    /// Resolved torsions.
    pub torsions: Vec<TorsionParam>,
    /// Perceived rings of size 5..=8.
    pub rings: Vec<Ring>,
    /// Deduplicated 1-3/1-4 nonbonded exceptions.
    pub exceptions: Vec<NonbondedException>,
    /// Sorted-pair -> bond index lookup.
    pub bond_index: HashMap<(usize, usize), usize>,
}

impl ParameterSet {
    /// Looks up the bond between two atoms, if one was compiled.
    pub fn find_bond(&self, a: usize, b: usize) -> Option<&BondParam> {
        let key = BondParam::sorted_atoms(a, b);
        self.bond_index.get(&key).map(|&i| &self.bonds[i])
    }
}
