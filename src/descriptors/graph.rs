// src/descriptors/graph.rs
//! Hydrogen-suppressed molecular graph.
//!
//! Vertices are atom indices `0..n`, edges are bonds. The graph is simple and
//! undirected: self-loops are rejected and repeated bonds (in either direction)
//! collapse into a single edge.
//!
//! ```
//! use drug_indices::descriptors::MolecularGraph;
//!
//! // n-butane carbon skeleton
//! let g = MolecularGraph::from_bonds(4, &[(0, 1), (1, 2), (2, 3)]).unwrap();
//! assert_eq!(g.degrees(), vec![1, 2, 2, 1]);
//! assert_eq!(g.bond_count(), 3);
//! ```

use std::collections::HashSet;

use super::GraphError;

/// Undirected simple graph over atom indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MolecularGraph {
    adjacency: Vec<Vec<usize>>,
    edges: Vec<(usize, usize)>,
}

impl MolecularGraph {
    /// Build a graph from a declared atom count and a list of bonds.
    ///
    /// Edges are stored as `(min, max)` in order of first occurrence, and
    /// neighbour lists keep insertion order, which keeps every traversal over
    /// the graph deterministic.
    ///
    /// # Errors
    ///
    /// - [`GraphError::EmptyBondList`] if `bonds` is empty
    /// - [`GraphError::SelfLoop`] if a bond joins an atom to itself
    /// - [`GraphError::MalformedGraph`] if an index is `>= atom_count`
    pub fn from_bonds(atom_count: usize, bonds: &[(usize, usize)]) -> Result<Self, GraphError> {
        if bonds.is_empty() {
            return Err(GraphError::EmptyBondList);
        }

        let mut adjacency = vec![Vec::new(); atom_count];
        let mut edges = Vec::with_capacity(bonds.len());
        let mut seen = HashSet::with_capacity(bonds.len());

        for &(i, j) in bonds {
            if i >= atom_count || j >= atom_count {
                return Err(GraphError::MalformedGraph(i, j, atom_count));
            }
            if i == j {
                return Err(GraphError::SelfLoop(i));
            }

            let key = (i.min(j), i.max(j));
            if !seen.insert(key) {
                continue;
            }
            adjacency[i].push(j);
            adjacency[j].push(i);
            edges.push(key);
        }

        Ok(Self { adjacency, edges })
    }

    /// Build a graph from a stored edge list, inferring `max index + 1` atoms.
    ///
    /// Unbonded atoms after the largest index cannot be recovered this way.
    /// The inferred count may be at most twice the number of distinct atoms
    /// the bonds reference; anything larger is treated as corrupt data.
    ///
    /// # Errors
    ///
    /// [`GraphError::MalformedGraph`] names the bond holding the offending
    /// index and the largest atom count accepted for this list.
    pub fn from_edge_list(bonds: &[(usize, usize)]) -> Result<Self, GraphError> {
        let &(i, j) = bonds
            .iter()
            .max_by_key(|&&(i, j)| i.max(j))
            .ok_or(GraphError::EmptyBondList)?;

        let referenced: HashSet<usize> = bonds.iter().flat_map(|&(i, j)| [i, j]).collect();
        let limit = 2 * referenced.len();
        let max_index = i.max(j);
        if max_index >= limit {
            return Err(GraphError::MalformedGraph(i, j, limit));
        }
        Self::from_bonds(max_index + 1, bonds)
    }

    pub fn atom_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn bond_count(&self) -> usize {
        self.edges.len()
    }

    /// Distinct bonds as `(min, max)` pairs.
    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    pub fn neighbors(&self, atom: usize) -> &[usize] {
        &self.adjacency[atom]
    }

    pub fn degree(&self, atom: usize) -> usize {
        self.adjacency[atom].len()
    }

    /// Degree of every atom, recomputed from the adjacency lists.
    pub fn degrees(&self) -> Vec<usize> {
        self.adjacency.iter().map(Vec::len).collect()
    }

    /// Number of connected components, isolated atoms included.
    pub fn component_count(&self) -> usize {
        let n = self.atom_count();
        let mut visited = vec![false; n];
        let mut components = 0;

        for start in 0..n {
            if visited[start] {
                continue;
            }
            components += 1;
            visited[start] = true;
            let mut stack = vec![start];
            while let Some(curr) = stack.pop() {
                for &next in &self.adjacency[curr] {
                    if !visited[next] {
                        visited[next] = true;
                        stack.push(next);
                    }
                }
            }
        }

        components
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_of_four_degrees() {
        let g = MolecularGraph::from_bonds(4, &[(0, 1), (1, 2), (2, 3)]).unwrap();
        assert_eq!(g.atom_count(), 4);
        assert_eq!(g.degrees(), vec![1, 2, 2, 1]);
        assert_eq!(g.neighbors(1), &[0, 2]);
        assert_eq!(g.component_count(), 1);
    }

    #[test]
    fn duplicate_bonds_collapse() {
        let g = MolecularGraph::from_bonds(3, &[(0, 1), (1, 0), (1, 2), (0, 1)]).unwrap();
        assert_eq!(g.bond_count(), 2);
        assert_eq!(g.edges(), &[(0, 1), (1, 2)]);
        assert_eq!(g.degrees(), vec![1, 2, 1]);
    }

    #[test]
    fn reversed_bond_is_normalised() {
        let g = MolecularGraph::from_bonds(2, &[(1, 0)]).unwrap();
        assert_eq!(g.edges(), &[(0, 1)]);
    }

    #[test]
    fn out_of_range_index_is_malformed() {
        let err = MolecularGraph::from_bonds(3, &[(0, 1), (1, 3)]).unwrap_err();
        assert_eq!(err, GraphError::MalformedGraph(1, 3, 3));
    }

    #[test]
    fn self_loop_is_rejected() {
        let err = MolecularGraph::from_bonds(3, &[(0, 1), (2, 2)]).unwrap_err();
        assert_eq!(err, GraphError::SelfLoop(2));
    }

    #[test]
    fn empty_bond_list_is_rejected() {
        assert_eq!(
            MolecularGraph::from_bonds(1, &[]).unwrap_err(),
            GraphError::EmptyBondList
        );
        assert_eq!(
            MolecularGraph::from_edge_list(&[]).unwrap_err(),
            GraphError::EmptyBondList
        );
    }

    #[test]
    fn edge_list_infers_atom_count() {
        let g = MolecularGraph::from_edge_list(&[(0, 1), (1, 4)]).unwrap();
        assert_eq!(g.atom_count(), 5);
        // atoms 2 and 3 are isolated
        assert_eq!(g.degrees(), vec![1, 2, 0, 0, 1]);
        assert_eq!(g.component_count(), 3);
    }

    #[test]
    fn edge_list_with_leading_counterion() {
        // "[Na+].CC": atom 0 has no bond
        let g = MolecularGraph::from_edge_list(&[(1, 2)]).unwrap();
        assert_eq!(g.atom_count(), 3);
        assert_eq!(g.component_count(), 2);
    }

    #[test]
    fn edge_list_with_absurd_index_is_malformed() {
        assert_eq!(
            MolecularGraph::from_edge_list(&[(0, 200_000)]).unwrap_err(),
            GraphError::MalformedGraph(0, 200_000, 4)
        );
        assert_eq!(
            MolecularGraph::from_edge_list(&[(0, 1), (usize::MAX, 1)]).unwrap_err(),
            GraphError::MalformedGraph(usize::MAX, 1, 6)
        );
    }

    #[test]
    fn two_fragments_count_as_two_components() {
        // "CC.CC"
        let g = MolecularGraph::from_bonds(4, &[(0, 1), (2, 3)]).unwrap();
        assert_eq!(g.component_count(), 2);
    }
}
