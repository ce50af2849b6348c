//! C1 — Topology builder.
//!
//! Turns a flat atom/bond list into adjacency maps, enumerated angles and
//! torsions, and a bounded-depth ring perception pass. Grounded in the
//! teacher's `processor::graph::ProcessingGraph::new` (bounds-checked adjacency
//! construction from a bond list) and `perception::rings`'s reusable
//! `RingSearchWorkspace` scratch-buffer pattern, generalized from SSSR-via-BFS
//! to the bounded depth-first ring search this crate's spec calls for.

mod rings;

use crate::core::error::{AtomAddress, CompileError};
use crate::model::{ParameterDescriptor, Ring};
use std::collections::HashSet;

/// Maximum heavy-or-hydrogen covalent bond count an atom may carry.
pub const MAX_VALENCE: usize = 4;

/// An angle `(a, b, c)` with `b` the vertex, canonicalized so `a <= c`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AngleTopo {
    /// The angle's atom triple, vertex in the middle.
    pub atoms: (usize, usize, usize),
}

/// A torsion `(a, b, c, d)` about the central `b-c` bond, canonicalized so
/// the central pair orders with `b < c` (ties broken by `a <= d`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TorsionTopo {
    /// The torsion's atom quadruple.
    pub atoms: (usize, usize, usize, usize),
}

/// The connectivity derived from a [`ParameterDescriptor`]: adjacency maps,
/// enumerated angles and torsions, and perceived rings.
#[derive(Debug, Clone)]
pub struct Topology {
    /// Sorted bond-atom pairs, ascending.
    pub bonds: Vec<(usize, usize)>,
    /// `adjacency[i]` lists the atoms covalently bonded to atom `i`.
    pub adjacency: Vec<Vec<usize>>,
    /// All enumerated angles.
    pub angles: Vec<AngleTopo>,
    /// All enumerated torsions.
    pub torsions: Vec<TorsionTopo>,
    /// Rings of size 5 through 8 found by the bounded DFS.
    pub rings: Vec<Ring>,
    /// For each atom, the size of the smallest ring it participates in.
    pub smallest_ring_size: Vec<Option<u8>>,
}

impl Topology {
    /// Builds the topology for a descriptor, enumerating angles, torsions, and
    /// rings, and rejecting structurally invalid molecules.
    ///
    /// # Errors
    /// Returns [`CompileError::OpenValenceShell`] for an atom with zero bonds,
    /// [`CompileError::UnsupportedCenterType`] for an atom with more than
    /// [`MAX_VALENCE`] bonds, and [`CompileError::UnsupportedRing`] for any
    /// detected ring of size 3 or 4.
    pub fn build(descriptor: &ParameterDescriptor) -> Result<Self, CompileError> {
        let num_atoms = descriptor.atomic_numbers.len();
        let mut adjacency = vec![Vec::new(); num_atoms];
        let mut bonds: Vec<(usize, usize)> = Vec::with_capacity(descriptor.bonds.len());

        for &(a, b) in &descriptor.bonds {
            let (a, b) = (a as usize, b as usize);
            let (lo, hi) = if a < b { (a, b) } else { (b, a) };
            adjacency[lo].push(hi);
            adjacency[hi].push(lo);
            bonds.push((lo, hi));
        }
        bonds.sort_unstable();
        bonds.dedup();
        for neighbors in &mut adjacency {
            neighbors.sort_unstable();
            neighbors.dedup();
        }

        for (index, neighbors) in adjacency.iter().enumerate() {
            let address = AtomAddress::topology(index, descriptor.atomic_numbers[index]);
            if neighbors.is_empty() && num_atoms > 1 {
                return Err(CompileError::OpenValenceShell {
                    center: address,
                    bonded: Vec::new(),
                });
            }
            if neighbors.len() > MAX_VALENCE {
                let bonded = neighbors
                    .iter()
                    .map(|&n| AtomAddress::topology(n, descriptor.atomic_numbers[n]))
                    .collect();
                return Err(CompileError::UnsupportedCenterType {
                    center: address,
                    bonded,
                });
            }

            // A lone-atom center: a heavy atom whose every neighbor is hydrogen
            // (e.g. methane's carbon) sits outside any extended framework this
            // compiler targets, and is rejected the same way an unrepresentable
            // center type is.
            let atomic_number = descriptor.atomic_numbers[index];
            if atomic_number != 1 && !neighbors.is_empty() {
                let heavy_neighbors = neighbors
                    .iter()
                    .filter(|&&n| descriptor.atomic_numbers[n] != 1)
                    .count();
                if heavy_neighbors == 0 {
                    let bonded = neighbors
                        .iter()
                        .map(|&n| AtomAddress::topology(n, descriptor.atomic_numbers[n]))
                        .collect();
                    return Err(CompileError::UnsupportedCenterType {
                        center: address,
                        bonded,
                    });
                }
            }
        }

        let angles = enumerate_angles(&adjacency);
        let torsions = enumerate_torsions(&adjacency, &bonds);
        let rings = rings::find_rings(&adjacency, descriptor.atomic_numbers.as_slice())?;

        let mut smallest_ring_size = vec![None; num_atoms];
        for ring in &rings {
            for &atom in ring.atoms() {
                let size = ring.size();
                smallest_ring_size[atom] = Some(match smallest_ring_size[atom] {
                    Some(existing) if existing <= size => existing,
                    _ => size,
                });
            }
        }

        Ok(Self {
            bonds,
            adjacency,
            angles,
            torsions,
            rings,
            smallest_ring_size,
        })
    }

    /// The number of covalent bonds at atom `index`.
    pub fn degree(&self, index: usize) -> usize {
        self.adjacency[index].len()
    }
}

/// Enumerates every angle `(a, b, c)` as an unordered pair of bonds sharing
/// vertex `b`, canonicalizing the outer atoms so `a <= c`.
fn enumerate_angles(adjacency: &[Vec<usize>]) -> Vec<AngleTopo> {
    let mut angles = Vec::new();
    for (b, neighbors) in adjacency.iter().enumerate() {
        for i in 0..neighbors.len() {
            for j in (i + 1)..neighbors.len() {
                let (a, c) = (neighbors[i], neighbors[j]);
                let (a, c) = if a < c { (a, c) } else { (c, a) };
                angles.push(AngleTopo { atoms: (a, b, c) });
            }
        }
    }
    angles
}

/// Enumerates every torsion `(a, b, c, d)` about each bond `(b, c)`, taking
/// every neighbor of `b` other than `c` as `a` and every neighbor of `c` other
/// than `b` as `d`, deduplicated and canonicalized so the central pair orders
/// with `b < c` (ties broken by `a <= d`).
fn enumerate_torsions(adjacency: &[Vec<usize>], bonds: &[(usize, usize)]) -> Vec<TorsionTopo> {
    let mut seen = HashSet::new();
    let mut torsions = Vec::new();
    for &(b, c) in bonds {
        for &a in &adjacency[b] {
            if a == c {
                continue;
            }
            for &d in &adjacency[c] {
                if d == b || d == a {
                    continue;
                }
                let canonical = canonicalize_torsion(a, b, c, d);
                if seen.insert(canonical) {
                    torsions.push(TorsionTopo { atoms: canonical });
                }
            }
        }
    }
    torsions
}

fn canonicalize_torsion(
    a: usize,
    b: usize,
    c: usize,
    d: usize,
) -> (usize, usize, usize, usize) {
    if b < c || (b == c && a <= d) { (a, b, c, d) } else { (d, c, b, a) }
}
