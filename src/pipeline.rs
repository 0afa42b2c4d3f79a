//! Per-compound pipeline and batch accumulator.
//!
//! Each compound runs to completion on its own:
//!
//! ```text
//! name → fetch SMILES → parse → build graph → distances + indices
//! ```
//!
//! Any failure along the way skips that compound only; it is logged and kept
//! in [`BatchResults`] with its reason. The batch as a whole fails only when
//! no compound at all could be computed.
use std::collections::HashSet;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::data_io::{EdgeEntry, EdgeRelations};
use crate::descriptors::{
    compute_indices, DistanceMatrix, GraphError, GraphSummary, IndexRecord, MolecularGraph,
};
use crate::retrieval::{CompoundSource, RetrievalError};
use crate::smiles::{ParseError, SmilesParser};

/// Why a compound was left out of the batch output.
#[derive(Debug, Error)]
pub enum CompoundError {
    #[error(transparent)]
    Retrieval(#[from] RetrievalError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Graph(#[from] GraphError),

    /// Stored edge data for the compound was an error marker.
    #[error("no edge relations stored: {0}")]
    Missing(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BatchError {
    #[error("no compound could be computed ({skipped} skipped)")]
    NoCompounds { skipped: usize },
}

/// A compound whose indices were computed.
#[derive(Debug, Clone)]
pub struct ComputedCompound {
    pub name: String,
    /// `None` when the compound came from stored edge data.
    pub smiles: Option<String>,
    pub bonds: Vec<(usize, usize)>,
    pub record: IndexRecord,
    pub summary: GraphSummary,
}

/// A compound that was skipped, with the reason.
#[derive(Debug)]
pub struct SkippedCompound {
    pub name: String,
    pub reason: CompoundError,
}

#[derive(Debug)]
pub enum BatchEntry {
    Computed(ComputedCompound),
    Skipped(SkippedCompound),
}

impl BatchEntry {
    pub fn name(&self) -> &str {
        match self {
            BatchEntry::Computed(c) => &c.name,
            BatchEntry::Skipped(s) => &s.name,
        }
    }
}

/// Results of one batch, in processing order.
///
/// Created empty at batch start, appended to once per compound, and handed
/// to the exporters by [`finish`](BatchResults::finish).
#[derive(Debug, Default)]
pub struct BatchResults {
    entries: Vec<BatchEntry>,
}

impl BatchResults {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome for `name`, logging skips.
    pub fn record(&mut self, name: &str, outcome: Result<ComputedCompound, CompoundError>) {
        match outcome {
            Ok(computed) => {
                debug!(
                    compound = name,
                    atoms = computed.summary.atoms,
                    bonds = computed.summary.bonds,
                    "indices computed"
                );
                if !computed.record.degenerate().is_empty() {
                    warn!(
                        compound = name,
                        indices = ?computed.record.degenerate(),
                        "degenerate index values"
                    );
                }
                self.entries.push(BatchEntry::Computed(computed));
            }
            Err(reason) => {
                warn!(compound = name, %reason, "skipping compound");
                self.entries.push(BatchEntry::Skipped(SkippedCompound {
                    name: name.to_string(),
                    reason,
                }));
            }
        }
    }

    pub fn entries(&self) -> &[BatchEntry] {
        &self.entries
    }

    pub fn computed(&self) -> impl Iterator<Item = &ComputedCompound> {
        self.entries.iter().filter_map(|e| match e {
            BatchEntry::Computed(c) => Some(c),
            BatchEntry::Skipped(_) => None,
        })
    }

    pub fn skipped(&self) -> impl Iterator<Item = &SkippedCompound> {
        self.entries.iter().filter_map(|e| match e {
            BatchEntry::Skipped(s) => Some(s),
            BatchEntry::Computed(_) => None,
        })
    }

    pub fn computed_count(&self) -> usize {
        self.computed().count()
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped().count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Close the batch.
    ///
    /// # Errors
    ///
    /// [`BatchError::NoCompounds`] if not a single compound was computed.
    pub fn finish(self) -> Result<Self, BatchError> {
        let computed = self.computed_count();
        let skipped = self.skipped_count();
        info!(computed, skipped, "batch finished");
        if computed == 0 {
            return Err(BatchError::NoCompounds { skipped });
        }
        Ok(self)
    }
}

/// Build the graph of a bond list and compute everything reported for it.
///
/// With `atom_count = None` the count is inferred from the largest index.
pub fn analyze_bonds(
    name: &str,
    atom_count: Option<usize>,
    bonds: Vec<(usize, usize)>,
) -> Result<ComputedCompound, GraphError> {
    let graph = match atom_count {
        Some(n) => MolecularGraph::from_bonds(n, &bonds)?,
        None => MolecularGraph::from_edge_list(&bonds)?,
    };
    let distances = DistanceMatrix::compute(&graph);
    let summary = GraphSummary::new(&graph, &distances);
    if summary.components > 1 {
        debug!(compound = name, components = summary.components, "disconnected molecular graph");
    }

    Ok(ComputedCompound {
        name: name.to_string(),
        smiles: None,
        bonds,
        record: compute_indices(&graph),
        summary,
    })
}

/// Fetch → parse → compute, one compound at a time.
#[derive(Debug, Clone)]
pub struct Pipeline<S, P> {
    source: S,
    parser: P,
}

impl<S: CompoundSource, P: SmilesParser> Pipeline<S, P> {
    pub fn new(source: S, parser: P) -> Self {
        Self { source, parser }
    }

    /// Run the full pipeline for one compound.
    pub fn process(&self, name: &str) -> Result<ComputedCompound, CompoundError> {
        let smiles = self.source.fetch_smiles(name)?;
        debug!(compound = name, %smiles, "SMILES retrieved");
        let parsed = self.parser.parse(&smiles)?;
        let mut computed = analyze_bonds(name, Some(parsed.atom_count), parsed.bonds)?;
        computed.smiles = Some(smiles);
        Ok(computed)
    }

    /// Molecular graph of one compound, for rendering.
    pub fn graph(&self, name: &str) -> Result<MolecularGraph, CompoundError> {
        let smiles = self.source.fetch_smiles(name)?;
        let parsed = self.parser.parse(&smiles)?;
        Ok(MolecularGraph::from_bonds(parsed.atom_count, &parsed.bonds)?)
    }

    /// Process every name in order. Never fails; see [`BatchResults::finish`].
    ///
    /// A name seen earlier in the same batch is logged and skipped, so every
    /// exported row and edge entry belongs to exactly one compound.
    pub fn run<I>(&self, names: I) -> BatchResults
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut results = BatchResults::new();
        for name in names {
            let name = name.as_ref();
            if !seen.insert(name.to_string()) {
                warn!(compound = name, "duplicate compound name, ignored");
                continue;
            }
            results.record(name, self.process(name));
        }
        results
    }
}

/// Compute a batch from stored edge relations, in file order.
///
/// Error markers left by a failed retrieval are skipped like any other failure.
/// The atom count is inferred from each bond list, so unbonded atoms after
/// the last bonded one (a trailing counterion) are absent from the summary.
/// The indices do not depend on them.
pub fn compute_from_edges(relations: &EdgeRelations) -> BatchResults {
    info!(compounds = relations.len(), "computing indices from stored edge relations");
    let mut results = BatchResults::new();
    for (name, entry) in relations.iter() {
        let outcome = match entry {
            EdgeEntry::Edges(pairs) => {
                let bonds = pairs.iter().map(|&[i, j]| (i, j)).collect();
                analyze_bonds(name, None, bonds).map_err(CompoundError::from)
            }
            EdgeEntry::Failed { error } => Err(CompoundError::Missing(error.clone())),
        };
        results.record(name, outcome);
    }
    results
}
