//! Node-link rendering of a molecular graph.
//!
//! The graph is emitted as Graphviz DOT, atoms labelled by their index, so
//! it can be laid out with any Graphviz engine (`neato -Tsvg` gives a
//! spring layout similar to the usual ball-and-stick sketch).
use std::fs;
use std::path::Path;

use petgraph::dot::{Config, Dot};
use petgraph::graph::UnGraph;

use crate::descriptors::MolecularGraph;

/// Copy the molecular graph into a `petgraph` graph, node weight = atom index.
pub fn to_petgraph(graph: &MolecularGraph) -> UnGraph<usize, ()> {
    let mut g = UnGraph::with_capacity(graph.atom_count(), graph.bond_count());
    let nodes: Vec<_> = (0..graph.atom_count()).map(|i| g.add_node(i)).collect();
    for &(u, v) in graph.edges() {
        g.add_edge(nodes[u], nodes[v], ());
    }
    g
}

/// DOT source for `graph`, titled `title`.
pub fn to_dot(graph: &MolecularGraph, title: &str) -> String {
    let g = to_petgraph(graph);
    let body = format!("{:?}", Dot::with_config(&g, &[Config::EdgeNoLabel]));

    // splice the graph attributes in after the opening brace
    let attrs = format!(
        "    label=\"Graph for {}\"\n    labelloc=t\n    node [shape=circle, style=filled, fillcolor=lightblue, fontsize=10]\n",
        title.replace('"', "\\\"")
    );
    match body.find('\n') {
        Some(pos) => format!("{}\n{}{}", &body[..pos], attrs, &body[pos + 1..]),
        None => body,
    }
}

/// Write the DOT rendering of `graph` to `path`.
pub fn write_dot(graph: &MolecularGraph, title: &str, path: &Path) -> std::io::Result<()> {
    fs::write(path, to_dot(graph, title))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn propane() -> MolecularGraph {
        MolecularGraph::from_bonds(3, &[(0, 1), (1, 2)]).unwrap()
    }

    #[test]
    fn petgraph_copy() {
        let g = to_petgraph(&propane());
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.edge_count(), 2);
    }

    #[test]
    fn dot_lists_atoms_and_bonds() {
        let dot = to_dot(&propane(), "propane");
        assert!(dot.starts_with("graph {\n"));
        assert!(dot.contains("label=\"Graph for propane\""));
        assert!(dot.contains("0 [ label = \"0\" ]"));
        assert!(dot.contains("2 [ label = \"2\" ]"));
        assert!(dot.contains("0 -- 1"));
        assert!(dot.contains("1 -- 2"));
        assert!(dot.trim_end().ends_with('}'));
    }

    #[test]
    fn write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("propane.dot");
        write_dot(&propane(), "propane", &path).unwrap();
        assert!(fs::read_to_string(path).unwrap().contains("1 -- 2"));
    }
}
