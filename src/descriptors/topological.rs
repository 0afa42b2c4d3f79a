// src/descriptors/topological.rs
//! Topological indices: degree-based graph invariants for drug molecules.
//!
//! Every index below is a sum over the bonds `(u, v)` of the hydrogen-suppressed
//! molecular graph, with `dᵤ`, `dᵥ` the vertex degrees of the two atoms.
//!
//! | Index                        | Key  | Contribution per bond          |
//! |------------------------------|------|--------------------------------|
//! | First Zagreb                 | M1   | dᵤ + dᵥ  (= Σ d² over atoms)   |
//! | Second Zagreb                | M2   | dᵤ·dᵥ                          |
//! | Modified second Zagreb       | mM2  | 1 / (dᵤ·dᵥ)                    |
//! | Forgotten                    | F    | dᵤ² + dᵥ²  (= Σ d³ over atoms) |
//! | Inverse sum indeg            | ISI  | dᵤ·dᵥ / (dᵤ + dᵥ)              |
//! | Harmonic                     | H    | 2 / (dᵤ + dᵥ)                  |
//! | Sum-connectivity             | SC   | 1 / √(dᵤ + dᵥ)                 |
//! | Hyper-Zagreb                 | HZ   | (dᵤ + dᵥ)²                     |
//! | Augmented Zagreb             | AZ   | (dᵤ·dᵥ / (dᵤ + dᵥ − 2))³       |
//! | Symmetric division deg       | SDD  | dᵤ/dᵥ + dᵥ/dᵤ                  |
//!
//! # Degenerate cases
//!
//! AZ is undefined on an isolated bond (`dᵤ = dᵥ = 1`). Such a bond adds
//! nothing to AZ and the record is flagged, the value itself stays finite.
//! The other denominators cannot vanish for a real bond; if one ever does,
//! that single index becomes `NaN` and is flagged, the rest of the record is
//! unaffected.
//!
//! # Quick Start
//!
//! ```
//! use drug_indices::descriptors::{compute_indices, IndexKind, MolecularGraph};
//! use approx::assert_relative_eq;
//!
//! // n-butane skeleton: degrees [1, 2, 2, 1]
//! let g = MolecularGraph::from_bonds(4, &[(0, 1), (1, 2), (2, 3)]).unwrap();
//! let rec = compute_indices(&g);
//! assert_eq!(rec.get(IndexKind::FirstZagreb), 10.0);
//! assert_eq!(rec.get(IndexKind::SecondZagreb), 8.0);
//! assert_relative_eq!(rec.get(IndexKind::Harmonic), 2.0 / 3.0 + 2.0 / 4.0 + 2.0 / 3.0);
//! ```

use std::fmt;

use super::{DegenerateIndexError, DistanceMatrix, MolecularGraph};

/// The ten indices, in column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IndexKind {
    FirstZagreb,
    SecondZagreb,
    ModifiedSecondZagreb,
    Forgotten,
    InverseSumIndeg,
    Harmonic,
    SumConnectivity,
    HyperZagreb,
    AugmentedZagreb,
    SymmetricDivisionDeg,
}

impl IndexKind {
    /// All indices in the fixed output order.
    pub const ALL: [IndexKind; 10] = [
        IndexKind::FirstZagreb,
        IndexKind::SecondZagreb,
        IndexKind::ModifiedSecondZagreb,
        IndexKind::Forgotten,
        IndexKind::InverseSumIndeg,
        IndexKind::Harmonic,
        IndexKind::SumConnectivity,
        IndexKind::HyperZagreb,
        IndexKind::AugmentedZagreb,
        IndexKind::SymmetricDivisionDeg,
    ];

    /// Short column key, e.g. `"mM2"`.
    pub fn key(self) -> &'static str {
        match self {
            IndexKind::FirstZagreb => "M1",
            IndexKind::SecondZagreb => "M2",
            IndexKind::ModifiedSecondZagreb => "mM2",
            IndexKind::Forgotten => "F",
            IndexKind::InverseSumIndeg => "ISI",
            IndexKind::Harmonic => "H",
            IndexKind::SumConnectivity => "SC",
            IndexKind::HyperZagreb => "HZ",
            IndexKind::AugmentedZagreb => "AZ",
            IndexKind::SymmetricDivisionDeg => "SDD",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            IndexKind::FirstZagreb => "first Zagreb index",
            IndexKind::SecondZagreb => "second Zagreb index",
            IndexKind::ModifiedSecondZagreb => "modified second Zagreb index",
            IndexKind::Forgotten => "forgotten index",
            IndexKind::InverseSumIndeg => "inverse sum indeg index",
            IndexKind::Harmonic => "harmonic index",
            IndexKind::SumConnectivity => "sum-connectivity index",
            IndexKind::HyperZagreb => "hyper-Zagreb index",
            IndexKind::AugmentedZagreb => "augmented Zagreb index",
            IndexKind::SymmetricDivisionDeg => "symmetric division deg index",
        }
    }

    /// Look an index up by its column key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.key() == key)
    }

    fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// The ten index values of one compound.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexRecord {
    values: [f64; 10],
    degenerate: Vec<IndexKind>,
}

impl IndexRecord {
    /// Assemble a record from values in [`IndexKind::ALL`] order.
    pub fn from_values(values: [f64; 10]) -> Self {
        Self {
            values,
            degenerate: Vec::new(),
        }
    }

    pub fn get(&self, kind: IndexKind) -> f64 {
        self.values[kind.slot()]
    }

    /// `(kind, value)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (IndexKind, f64)> + '_ {
        IndexKind::ALL.into_iter().zip(self.values.iter().copied())
    }

    pub fn values(&self) -> [f64; 10] {
        self.values
    }

    /// `true` if `kind` hit a degenerate case while being computed.
    pub fn is_degenerate(&self, kind: IndexKind) -> bool {
        self.degenerate.contains(&kind)
    }

    /// Flagged indices, in column order.
    pub fn degenerate(&self) -> &[IndexKind] {
        &self.degenerate
    }

    /// Copy of the record with every finite value rounded to `places` decimals.
    ///
    /// Values that cannot be scaled without overflowing are kept as they are,
    /// so rounding never turns a finite value into `NaN` or infinity.
    pub fn rounded(&self, places: u32) -> Self {
        let scale = i32::try_from(places).map_or(f64::INFINITY, |p| 10f64.powi(p));
        let mut values = self.values;
        if scale.is_finite() {
            for v in values.iter_mut().filter(|v| v.is_finite()) {
                let r = (*v * scale).round() / scale;
                if r.is_finite() {
                    *v = r;
                }
            }
        }
        Self {
            values,
            degenerate: self.degenerate.clone(),
        }
    }

    fn flag(&mut self, kind: IndexKind) {
        if let Err(pos) = self.degenerate.binary_search(&kind) {
            self.degenerate.insert(pos, kind);
        }
    }

    fn add(&mut self, kind: IndexKind, contribution: f64) {
        self.values[kind.slot()] += contribution;
    }

    fn add_ratio(&mut self, kind: IndexKind, num: f64, den: f64, edge: (usize, usize)) {
        match ratio(kind, num, den, edge) {
            Ok(x) => self.add(kind, x),
            Err(_) => {
                self.values[kind.slot()] = f64::NAN;
                self.flag(kind);
            }
        }
    }
}

/// Compute all ten indices of `graph`.
///
/// This never fails: degenerate formulas are reported through
/// [`IndexRecord::degenerate`] instead of aborting the record.
pub fn compute_indices(graph: &MolecularGraph) -> IndexRecord {
    use IndexKind::*;

    let degrees = graph.degrees();
    let mut rec = IndexRecord::from_values([0.0; 10]);

    for &(u, v) in graph.edges() {
        let du = degrees[u] as f64;
        let dv = degrees[v] as f64;
        let sum = du + dv;
        let prod = du * dv;

        rec.add(FirstZagreb, sum);
        rec.add(SecondZagreb, prod);
        rec.add(Forgotten, du * du + dv * dv);
        rec.add(HyperZagreb, sum * sum);

        rec.add_ratio(ModifiedSecondZagreb, 1.0, prod, (u, v));
        rec.add_ratio(InverseSumIndeg, prod, sum, (u, v));
        rec.add_ratio(Harmonic, 2.0, sum, (u, v));
        rec.add_ratio(SumConnectivity, 1.0, sum.sqrt(), (u, v));
        rec.add_ratio(SymmetricDivisionDeg, du, dv, (u, v));
        rec.add_ratio(SymmetricDivisionDeg, dv, du, (u, v));

        // isolated bond: skipped, record flagged
        match ratio(AugmentedZagreb, prod, sum - 2.0, (u, v)) {
            Ok(x) => rec.add(AugmentedZagreb, x.powi(3)),
            Err(_) => rec.flag(AugmentedZagreb),
        }
    }

    rec
}

fn ratio(
    index: IndexKind,
    num: f64,
    den: f64,
    (u, v): (usize, usize),
) -> Result<f64, DegenerateIndexError> {
    if den == 0.0 {
        Err(DegenerateIndexError { index, u, v })
    } else {
        Ok(num / den)
    }
}

/// Size and distance figures reported next to the index table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphSummary {
    pub atoms: usize,
    pub bonds: usize,
    pub components: usize,
    /// Largest finite distance between two atoms.
    pub diameter: Option<u32>,
    /// Sum of finite distances over all atom pairs.
    pub wiener: u64,
}

impl GraphSummary {
    pub fn new(graph: &MolecularGraph, distances: &DistanceMatrix) -> Self {
        Self {
            atoms: graph.atom_count(),
            bonds: graph.bond_count(),
            components: graph.component_count(),
            diameter: distances.diameter(),
            wiener: distances.wiener_index(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────
// Tests: small graphs with hand-computed values
// ────────────────────────────────────────────────────────────────────────
