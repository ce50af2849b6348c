//! Core types shared across the parameter compiler and the rigid-body state manager.
//!
//! This module defines the element enumeration, the ring/center classifications used
//! throughout atom typing and parameter resolution, the force-option bitfield that
//! gates individual energy terms, and the unit-conversion constants that cross the
//! external boundary described in the crate's unit system.

use serde::{Deserialize, Serialize};
use std::fmt;

pub mod error;
pub mod units;

/// A chemical element recognized by the parameter tables.
///
/// Mirrors the atomic number directly so `Element::from(atomic_number)` and
/// `element as u8` round-trip. Unsupported atomic numbers are represented as
/// [`Element::Other`] and are rejected wherever a table lookup is required.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Element {
    /// Hydrogen (Z = 1).
    H = 1,
    /// Carbon (Z = 6).
    C = 6,
    /// Nitrogen (Z = 7).
    N = 7,
    /// Oxygen (Z = 8).
    O = 8,
    /// Fluorine (Z = 9).
    F = 9,
    /// Silicon (Z = 14).
    Si = 14,
    /// Phosphorus (Z = 15).
    P = 15,
    /// Sulfur (Z = 16).
    S = 16,
    /// Germanium (Z = 32).
    Ge = 32,
    /// Any atomic number not covered by a dedicated variant.
    Other(u8),
}

impl Element {
    /// Converts a raw atomic number into an [`Element`].
    pub fn from_atomic_number(z: u8) -> Self {
        match z {
            1 => Element::H,
            6 => Element::C,
            7 => Element::N,
            8 => Element::O,
            9 => Element::F,
            14 => Element::Si,
            15 => Element::P,
            16 => Element::S,
            32 => Element::Ge,
            other => Element::Other(other),
        }
    }

    /// Returns the atomic number.
    pub fn atomic_number(self) -> u8 {
        match self {
            Element::H => 1,
            Element::C => 6,
            Element::N => 7,
            Element::O => 8,
            Element::F => 9,
            Element::Si => 14,
            Element::P => 15,
            Element::S => 16,
            Element::Ge => 32,
            Element::Other(z) => z,
        }
    }

    /// Whether this element is carbon or silicon (the group-IV centers this crate
    /// specializes in: they admit up to four heavy-atom neighbors).
    pub fn is_group_iv(self) -> bool {
        matches!(self, Element::C | Element::Si | Element::Ge)
    }

    /// Whether this element is a recognized electronegative heteroatom for the
    /// electronegativity corrector (C6) and bond-dipole projection (C7).
    pub fn is_electronegative(self) -> bool {
        matches!(self, Element::N | Element::O | Element::F)
    }

    /// The element's Pauling-scale electronegativity, used to orient bond dipole
    /// signs. Elements without a recognized value return `None`.
    pub fn electronegativity(self) -> Option<f64> {
        match self {
            Element::H => Some(2.20),
            Element::C => Some(2.55),
            Element::Si => Some(1.90),
            Element::Ge => Some(2.01),
            Element::N => Some(3.04),
            Element::O => Some(3.44),
            Element::F => Some(3.98),
            Element::P => Some(2.19),
            Element::S => Some(2.58),
            Element::Other(_) => None,
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Element::H => "H",
            Element::C => "C",
            Element::N => "N",
            Element::O => "O",
            Element::F => "F",
            Element::Si => "Si",
            Element::P => "P",
            Element::S => "S",
            Element::Ge => "Ge",
            Element::Other(_) => "?",
        };
        write!(f, "{symbol}")
    }
}

/// Ring-membership classification shared by atoms, bonds, and angles.
///
/// A structural element belongs to [`RingClass::Five`] if it participates in at
/// least one five-membered ring, [`RingClass::Six`] if it participates only in
/// six-membered rings, and [`RingClass::None`] otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RingClass {
    /// Part of at least one five-membered ring.
    Five,
    /// Part of six-membered ring(s) only.
    Six,
    /// Not part of any ring relevant to parameter lookup.
    None,
}

impl RingClass {
    /// Derives a ring class from the smallest ring size containing a structural
    /// element, or `None` if it is not part of any ring.
    pub fn from_smallest_ring_size(size: Option<u8>) -> Self {
        match size {
            Some(5) => RingClass::Five,
            Some(_) => RingClass::Six,
            None => RingClass::None,
        }
    }
}

/// Center type classification: how many covalent bonds an atom's heavy-atom
/// framework supports, expressed the way MM4-derived atom typing classifies the
/// substitution level of a carbon/silicon center.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CenterType {
    /// One heavy-atom neighbor (e.g. a methyl carbon).
    Primary,
    /// Two heavy-atom neighbors.
    Secondary,
    /// Three heavy-atom neighbors.
    Tertiary,
    /// Four heavy-atom neighbors.
    Quaternary,
}

impl CenterType {
    /// Classifies a center from its count of non-hydrogen bonded neighbors.
    ///
    /// Returns `None` if `heavy_neighbor_count` is zero or exceeds four; callers
    /// are expected to have already rejected such centers as structural errors
    /// (see [`crate::core::error::CompileError::UnsupportedCenterType`]).
    pub fn from_heavy_neighbor_count(heavy_neighbor_count: u8) -> Option<Self> {
        match heavy_neighbor_count {
            1 => Some(CenterType::Primary),
            2 => Some(CenterType::Secondary),
            3 => Some(CenterType::Tertiary),
            4 => Some(CenterType::Quaternary),
            _ => None,
        }
    }
}

/// Bitfield controlling which force-field energy terms are compiled.
///
/// Each flag gates a family of parameters described in spec §4.3-§4.5: when a
/// flag is cleared, the corresponding resolver still runs (to preserve topology
/// bookkeeping and canonicalization) but zeroes or nulls the associated
/// coefficients rather than skipping the pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForceOptions {
    /// Angle-bending term.
    pub bend: bool,
    /// Bend-bend cross term.
    pub bend_bend: bool,
    /// Nonbonded (van der Waals + electrostatic) terms, including dipole
    /// projection.
    pub nonbonded: bool,
    /// Bond-stretching term.
    pub stretch: bool,
    /// Stretch-bend cross term.
    pub stretch_bend: bool,
    /// Stretch-stretch cross term.
    pub stretch_stretch: bool,
    /// Torsional term.
    pub torsion: bool,
    /// Torsion-bend cross term.
    pub torsion_bend: bool,
    /// Torsion-stretch cross term.
    pub torsion_stretch: bool,
}

impl Default for ForceOptions {
    /// All terms enabled, matching the default a caller gets by omitting
    /// `force_options` entirely.
    fn default() -> Self {
        Self {
            bend: true,
            bend_bend: true,
            nonbonded: true,
            stretch: true,
            stretch_bend: true,
            stretch_stretch: true,
            torsion: true,
            torsion_bend: true,
            torsion_stretch: true,
        }
    }
}
