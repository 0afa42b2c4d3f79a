// src/descriptors/distance.rs
//! All-pairs topological distances.
//!
//! Distances are hop counts found by a breadth-first search from every atom,
//! `O(n·(n+m))` overall. Pairs in different fragments of a disconnected graph
//! (salts, mixtures) hold the [`UNREACHABLE`] sentinel and are reported as
//! `None`; they never leak into sums as a large finite number.

use std::collections::VecDeque;

use ndarray::Array2;

use super::MolecularGraph;

/// Sentinel stored for atom pairs with no connecting path.
pub const UNREACHABLE: u32 = u32::MAX;

/// Symmetric `n × n` matrix of shortest path lengths with a zero diagonal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistanceMatrix {
    dist: Array2<u32>,
}

impl DistanceMatrix {
    /// Run a BFS from every atom of `graph`.
    pub fn compute(graph: &MolecularGraph) -> Self {
        let n = graph.atom_count();
        let mut dist = Array2::from_elem((n, n), UNREACHABLE);
        let mut queue = VecDeque::with_capacity(n);

        for start in 0..n {
            dist[[start, start]] = 0;
            queue.clear();
            queue.push_back(start);
            while let Some(curr) = queue.pop_front() {
                let next_dist = dist[[start, curr]] + 1;
                for &neighbor in graph.neighbors(curr) {
                    if dist[[start, neighbor]] == UNREACHABLE {
                        dist[[start, neighbor]] = next_dist;
                        queue.push_back(neighbor);
                    }
                }
            }
        }

        Self { dist }
    }

    /// Number of atoms (rows).
    pub fn len(&self) -> usize {
        self.dist.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Distance between atoms `i` and `j`, `None` when they are not connected.
    pub fn get(&self, i: usize, j: usize) -> Option<u32> {
        match self.dist[[i, j]] {
            UNREACHABLE => None,
            d => Some(d),
        }
    }

    /// `true` when every pair of atoms is joined by a path.
    pub fn is_connected(&self) -> bool {
        self.dist.iter().all(|&d| d != UNREACHABLE)
    }

    /// Largest finite distance, `None` for graphs with fewer than two atoms.
    pub fn diameter(&self) -> Option<u32> {
        if self.len() < 2 {
            return None;
        }
        self.finite_pairs().max()
    }

    /// Wiener index: sum of distances over unordered atom pairs.
    ///
    /// Unreachable pairs are left out of the sum.
    pub fn wiener_index(&self) -> u64 {
        self.finite_pairs().map(u64::from).sum()
    }

    /// Raw matrix, with [`UNREACHABLE`] in place of missing paths.
    pub fn as_array(&self) -> &Array2<u32> {
        &self.dist
    }

    // Upper triangle only, unreachable pairs skipped.
    fn finite_pairs(&self) -> impl Iterator<Item = u32> + '_ {
        let n = self.len();
        (0..n)
            .flat_map(move |i| (i + 1..n).map(move |j| self.dist[[i, j]]))
            .filter(|&d| d != UNREACHABLE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path4() -> MolecularGraph {
        MolecularGraph::from_bonds(4, &[(0, 1), (1, 2), (2, 3)]).unwrap()
    }

    #[test]
    fn path_of_four() {
        let d = DistanceMatrix::compute(&path4());
        assert_eq!(d.len(), 4);
        assert_eq!(d.get(0, 3), Some(3));
        assert_eq!(d.get(3, 0), Some(3));
        assert_eq!(d.get(1, 3), Some(2));
        assert_eq!(d.diameter(), Some(3));
        // 1+2+3 + 1+2 + 1
        assert_eq!(d.wiener_index(), 10);
        assert!(d.is_connected());
    }

    #[test]
    fn symmetric_with_zero_diagonal() {
        // cyclohexane
        let g = MolecularGraph::from_bonds(
            6,
            &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (5, 0)],
        )
        .unwrap();
        let d = DistanceMatrix::compute(&g);
        for i in 0..6 {
            assert_eq!(d.get(i, i), Some(0));
            for j in 0..6 {
                assert_eq!(d.get(i, j), d.get(j, i));
            }
        }
        assert_eq!(d.get(0, 3), Some(3));
        assert_eq!(d.wiener_index(), 27);
    }

    #[test]
    fn disconnected_pairs_are_unreachable() {
        let g = MolecularGraph::from_bonds(5, &[(0, 1), (1, 2), (3, 4)]).unwrap();
        let d = DistanceMatrix::compute(&g);
        assert_eq!(d.get(0, 4), None);
        assert_eq!(d.get(3, 4), Some(1));
        assert!(!d.is_connected());
        // (1 + 2 + 1) from the first fragment, 1 from the second
        assert_eq!(d.wiener_index(), 5);
        assert_eq!(d.diameter(), Some(2));
        assert_eq!(d.as_array()[[2, 3]], UNREACHABLE);
    }

    #[test]
    fn deterministic() {
        let g = path4();
        assert_eq!(DistanceMatrix::compute(&g), DistanceMatrix::compute(&g));
    }
}
