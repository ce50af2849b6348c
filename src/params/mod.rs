//! C3-C7 — the parameter resolver passes.
//!
//! Each submodule resolves one family of coefficients over a topology
//! already typed by [`crate::typing`], consuming only the immutable outputs
//! of earlier passes per the pipeline order fixed in spec §5.

pub mod angles;
pub mod bonds;
pub mod electroneg;
pub mod nonbonded;
pub mod torsions;
