//! drug_indices: topological indices of drug molecules from their names.
//!
//! This crate looks drugs up by name, turns their SMILES into a molecular
//! graph and computes ten classic degree-based topological indices:
//!
//! - **descriptors**: molecular graph, distance matrix and the index kernel
//!   (M1, M2, mM2, F, ISI, H, SC, HZ, AZ, SDD)
//! - **smiles**: SMILES → bond list, backed by `purr`
//! - **retrieval**: compound name → SMILES via PubChem PUG-REST
//! - **pipeline**: per-compound flow and the batch accumulator
//! - **data_io**: edge-relation JSON and index-table CSV
//! - **models**: index table → `ndarray` feature matrix
//! - **visualization**: Graphviz DOT rendering of a molecular graph
//! - **config**: TOML batch configuration
//!
//! # Quick examples
//!
//! ### Indices of a bond list
//! ```
//! use drug_indices::descriptors::{compute_indices, IndexKind, MolecularGraph};
//!
//! let graph = MolecularGraph::from_bonds(4, &[(0, 1), (1, 2), (2, 3)]).unwrap();
//! let rec = compute_indices(&graph);
//! assert_eq!(rec.get(IndexKind::FirstZagreb), 10.0);
//! assert_eq!(rec.get(IndexKind::SecondZagreb), 8.0);
//! ```
//!
//! ### A small offline batch
//! ```
//! use drug_indices::{IndexTable, Pipeline, PurrParser, StaticSource};
//!
//! let source = StaticSource::new()
//!     .with("ethanol", "CCO")
//!     .with("aspirin", "CC(=O)Oc1ccccc1C(=O)O");
//! let batch = Pipeline::new(source, PurrParser)
//!     .run(["aspirin", "ethanol"])
//!     .finish()?;
//! let table = IndexTable::from_batch(&batch, 3);
//! assert_eq!(table.len(), 2);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ### Straight from PubChem
//! ```no_run
//! use std::time::Duration;
//! use drug_indices::{EdgeRelations, Pipeline, PubChemClient, PurrParser, PUBCHEM_BASE_URL};
//!
//! let client = PubChemClient::new(PUBCHEM_BASE_URL, Duration::from_secs(5))?;
//! let batch = Pipeline::new(client, PurrParser).run(["afatinib", "mitomycin c"]).finish()?;
//! EdgeRelations::from_batch(&batch).save("edge_relations.json".as_ref())?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod data_io;
pub mod descriptors;
pub mod models;
pub mod pipeline;
pub mod retrieval;
pub mod smiles;
pub mod visualization;

// ─────────────────────────────────────────────────────────────────────────────
// Convenience re-exports
// ─────────────────────────────────────────────────────────────────────────────
pub use config::{BatchConfig, ConfigError};
pub use data_io::{EdgeEntry, EdgeRelations, ExportError, IndexTable};
pub use descriptors::{
    compute_indices, DistanceMatrix, GraphError, GraphSummary, IndexKind, IndexRecord,
    MolecularGraph,
};
pub use models::to_feature_matrix;
pub use pipeline::{
    analyze_bonds, compute_from_edges, BatchError, BatchResults, CompoundError, Pipeline,
};
pub use retrieval::{CompoundSource, PubChemClient, RetrievalError, StaticSource, PUBCHEM_BASE_URL};
pub use smiles::{ParseError, PurrParser, SmilesParser};
