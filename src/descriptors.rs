//! Molecular graph and topological index calculations.
//!
//! This module holds the computational core of the crate:
//!
//! - [`graph`]: the hydrogen-suppressed molecular graph built from a bond list
//! - [`distance`]: all-pairs shortest path distances (BFS from every atom)
//! - [`topological`]: the ten degree-based topological indices
//!
//! Everything here is a pure function of the bond list: no I/O, no global
//! state, and the same graph always yields bit-identical results.
use thiserror::Error;

pub mod distance;
pub mod graph;
pub mod topological;

pub use distance::DistanceMatrix;
pub use graph::MolecularGraph;
pub use topological::{compute_indices, GraphSummary, IndexKind, IndexRecord};

/// Errors returned when a bond list cannot be turned into a molecular graph.
///
/// Any of these aborts the record of the compound it belongs to; callers in a
/// batch skip the compound and carry on with the next one.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// A bond references an atom index outside `0..atom_count`.
    #[error("bond ({0}, {1}) references an atom outside 0..{2}")]
    MalformedGraph(usize, usize, usize),

    /// A bond connects an atom to itself.
    #[error("bond ({0}, {0}) is a self-loop")]
    SelfLoop(usize),

    /// The molecule has no bonds at all (single atom or empty input).
    #[error("bond list is empty")]
    EmptyBondList,
}

/// A single index formula hit a zero denominator.
///
/// This never escapes the kernel: the affected cell becomes `NaN` and the
/// record is flagged, the remaining indices are still reported.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("{index} has a zero denominator on edge ({u}, {v})")]
pub struct DegenerateIndexError {
    /// Index whose formula degenerated.
    pub index: IndexKind,
    /// First endpoint of the offending edge.
    pub u: usize,
    /// Second endpoint of the offending edge.
    pub v: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graph_error_messages_name_the_bond() {
        let err = GraphError::MalformedGraph(2, 7, 5);
        assert_eq!(err.to_string(), "bond (2, 7) references an atom outside 0..5");
        assert_eq!(GraphError::SelfLoop(3).to_string(), "bond (3, 3) is a self-loop");
    }

    #[test]
    fn degenerate_error_names_the_index() {
        let err = DegenerateIndexError {
            index: IndexKind::ModifiedSecondZagreb,
            u: 0,
            v: 1,
        };
        assert_eq!(err.to_string(), "mM2 has a zero denominator on edge (0, 1)");
    }
}
