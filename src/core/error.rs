//! Error types describing the failure modes of the parameter compiler.
//!
//! Mirrors the teacher's `core/error.rs` shape: a root error enum that wraps more
//! specific variants, each annotated with the atom/bond addresses a caller needs to
//! diagnose the failure, per spec §6's "Errors at the boundary" taxonomy and §7's
//! error handling design (structural violations surface immediately; missing
//! parameters only after all lookup fallbacks are exhausted; implementation faults
//! are reported distinctly from user-recoverable faults).

use thiserror::Error;

/// Identifies a single atom for error reporting, per spec §6's address contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtomAddress {
    /// Index of the rigid body the atom belongs to, when known (topology-only
    /// compiles that never reach C9 report `None`).
    pub rigid_body_index: Option<usize>,
    /// The atom's index within the molecular graph.
    pub atom_index: usize,
    /// The atom's atomic number.
    pub atomic_number: u8,
}

impl AtomAddress {
    /// Builds an address for a compile-time (pre-rigid-body) atom.
    pub fn topology(atom_index: usize, atomic_number: u8) -> Self {
        Self {
            rigid_body_index: None,
            atom_index,
            atomic_number,
        }
    }
}

/// Root error emitted by every fallible operation in the parameter compiler.
#[derive(Debug, Error)]
pub enum CompileError {
    /// A parameter table lookup failed for every fallback rule.
    #[error("missing force-field parameter for {addresses:?}")]
    MissingParameter {
        /// Atoms whose local environment could not be resolved.
        addresses: Vec<AtomAddress>,
    },

    /// A center atom has no covalent bonds, or a covalent-bond invariant failed
    /// (e.g. a heteroatom bonded only to other heteroatoms).
    #[error("open valence shell at {center:?}, bonded to {bonded:?}")]
    OpenValenceShell {
        /// The atom whose valence is structurally invalid.
        center: AtomAddress,
        /// The atom's bonded neighbors.
        bonded: Vec<AtomAddress>,
    },

    /// A center's heavy-neighbor count or element does not admit any known
    /// atom type (e.g. a center with more than four heavy neighbors, or an
    /// illegal hydrogen/fluorine angle center).
    #[error("unsupported center type at {center:?}, bonded to {bonded:?}")]
    UnsupportedCenterType {
        /// The atom whose local environment is not representable.
        center: AtomAddress,
        /// The atom's bonded neighbors.
        bonded: Vec<AtomAddress>,
    },

    /// A detected ring falls outside the supported size range (rings of size 3
    /// or 4 are rejected outright per spec §4.1).
    #[error("unsupported ring of size {ring_size} containing {atoms:?}")]
    UnsupportedRing {
        /// Atoms composing the rejected ring.
        atoms: Vec<AtomAddress>,
        /// The ring's size.
        ring_size: usize,
    },

    /// An invariant internal to the compiler was violated — a defect in the
    /// implementation, not a consequence of the caller's input. Distinct from
    /// the user-facing variants above per spec §7.
    #[error("internal compiler fault: {0}")]
    Internal(#[from] ImplementationFault),
}

/// Faults that indicate a bug in the compiler rather than a problem with the
/// caller's molecule.
#[derive(Debug, Error)]
pub enum ImplementationFault {
    /// The 3x3 symmetric eigendecomposition (C10) failed to converge after
    /// exhausting its retry budget.
    #[error("moment-of-inertia eigendecomposition failed to converge after {attempts} attempts")]
    EigendecompositionFailed {
        /// Number of perturb-and-retry attempts made.
        attempts: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_parameter_reports_addresses() {
        let err = CompileError::MissingParameter {
            addresses: vec![AtomAddress::topology(2, 6)],
        };
        let msg = err.to_string();
        assert!(msg.contains("missing force-field parameter"));
    }

    #[test]
    fn internal_fault_wraps_eigendecomposition_failure() {
        let err: CompileError = ImplementationFault::EigendecompositionFailed { attempts: 4 }.into();
        assert!(matches!(err, CompileError::Internal(_)));
    }
}
