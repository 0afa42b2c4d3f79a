//! JSON/CSV export and import of batch results.
//!
//! Two files come out of a batch:
//!
//! - **edge relations**: one JSON object mapping each compound name to its
//!   bond list, e.g. `{"ethanol": [[0, 1], [1, 2]]}`
//! - **index table**: one CSV row per compound, a `compound` column followed
//!   by the ten index columns in their fixed order
//!
//! Both can be read back, so the expensive retrieval step and the cheap
//! computation step can run separately.
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::descriptors::{IndexKind, IndexRecord};
use crate::pipeline::BatchResults;

/// Name of the first column of the index table.
pub const COMPOUND_COLUMN: &str = "compound";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("cannot access {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid edge relations JSON")]
    Json(#[from] serde_json::Error),

    #[error("invalid index table CSV")]
    Csv(#[from] csv::Error),

    #[error("index table: {0}")]
    Table(String),
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> ExportError + '_ {
    move |source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn create_file(path: &Path) -> Result<BufWriter<File>, ExportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_error(parent))?;
    }
    File::create(path).map(BufWriter::new).map_err(io_error(path))
}

fn open_file(path: &Path) -> Result<BufReader<File>, ExportError> {
    File::open(path).map(BufReader::new).map_err(io_error(path))
}

// ─────────────────────────────────────────────────────────────────────────────
// Edge relations (JSON)
// ─────────────────────────────────────────────────────────────────────────────

/// Stored bond list of one compound.
///
/// Files written by older tooling mark failed lookups with an
/// `{"error": "..."}` object instead of a bond list; those are accepted when
/// reading and never written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EdgeEntry {
    Edges(Vec<[usize; 2]>),
    Failed { error: String },
}

/// Compound name → bond list, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeRelations {
    entries: IndexMap<String, EdgeEntry>,
}

impl EdgeRelations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bond lists of every computed compound of `batch`.
    pub fn from_batch(batch: &BatchResults) -> Self {
        let mut relations = Self::new();
        for c in batch.computed() {
            let pairs = c.bonds.iter().map(|&(i, j)| [i, j]).collect();
            relations.insert(c.name.clone(), EdgeEntry::Edges(pairs));
        }
        relations
    }

    pub fn insert(&mut self, name: impl Into<String>, entry: EdgeEntry) {
        self.entries.insert(name.into(), entry);
    }

    pub fn get(&self, name: &str) -> Option<&EdgeEntry> {
        self.entries.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &EdgeEntry)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_writer(&self, writer: impl Write) -> Result<(), ExportError> {
        serde_json::to_writer(writer, self)?;
        Ok(())
    }

    pub fn from_reader(reader: impl Read) -> Result<Self, ExportError> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), ExportError> {
        let mut writer = create_file(path)?;
        self.to_writer(&mut writer)?;
        writer.flush().map_err(io_error(path))
    }

    pub fn load(path: &Path) -> Result<Self, ExportError> {
        Self::from_reader(open_file(path)?)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Index table (CSV)
// ─────────────────────────────────────────────────────────────────────────────

/// One row per compound, ten index columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexTable {
    rows: Vec<(String, IndexRecord)>,
}

impl IndexTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows for every computed compound of `batch`, rounded to `decimals`.
    pub fn from_batch(batch: &BatchResults, decimals: u32) -> Self {
        let rows = batch
            .computed()
            .map(|c| (c.name.clone(), c.record.rounded(decimals)))
            .collect();
        Self { rows }
    }

    pub fn push(&mut self, name: impl Into<String>, record: IndexRecord) {
        self.rows.push((name.into(), record));
    }

    pub fn rows(&self) -> &[(String, IndexRecord)] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Header row: `compound,M1,M2,...,SDD`.
    pub fn header() -> Vec<&'static str> {
        std::iter::once(COMPOUND_COLUMN)
            .chain(IndexKind::ALL.iter().map(|k| k.key()))
            .collect()
    }

    pub fn to_writer(&self, writer: impl Write) -> Result<(), ExportError> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(Self::header())?;
        for (name, record) in &self.rows {
            let mut row = Vec::with_capacity(IndexKind::ALL.len() + 1);
            row.push(name.clone());
            row.extend(record.values().iter().map(f64::to_string));
            wtr.write_record(&row)?;
        }
        wtr.flush().map_err(csv::Error::from)?;
        Ok(())
    }

    pub fn save(&self, path: &Path) -> Result<(), ExportError> {
        self.to_writer(create_file(path)?)
    }

    /// Read a table written by [`to_writer`](Self::to_writer).
    ///
    /// Columns are located by header name, so their order in the file does
    /// not matter; all ten index columns must be present.
    pub fn from_reader(reader: impl Read) -> Result<Self, ExportError> {
        let mut rdr = csv::Reader::from_reader(reader);
        let headers = rdr.headers()?.clone();

        let position = |col: &str| {
            headers
                .iter()
                .position(|h| h == col)
                .ok_or_else(|| ExportError::Table(format!("column '{}' not found in CSV headers", col)))
        };
        let name_idx = position(COMPOUND_COLUMN)?;
        let mut index_idxs = [0usize; 10];
        for (slot, kind) in index_idxs.iter_mut().zip(IndexKind::ALL) {
            *slot = position(kind.key())?;
        }

        let mut table = Self::new();
        for result in rdr.records() {
            let record = result?;
            let name = record
                .get(name_idx)
                .ok_or_else(|| ExportError::Table(format!("missing field at index {}", name_idx)))?;

            let mut values = [0.0; 10];
            for (value, &idx) in values.iter_mut().zip(&index_idxs) {
                let v = record
                    .get(idx)
                    .ok_or_else(|| ExportError::Table(format!("missing field at index {}", idx)))?;
                *value = v.trim().parse().map_err(|e| {
                    ExportError::Table(format!(
                        "failed to parse value '{}' in column index {}: {}",
                        v, idx, e
                    ))
                })?;
            }
            table.push(name, IndexRecord::from_values(values));
        }

        Ok(table)
    }

    pub fn load(path: &Path) -> Result<Self, ExportError> {
        Self::from_reader(open_file(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_json_shape() {
        let mut relations = EdgeRelations::new();
        relations.insert("propane", EdgeEntry::Edges(vec![[0, 1], [1, 2]]));
        relations.insert("ethane", EdgeEntry::Edges(vec![[0, 1]]));

        let mut buf = Vec::new();
        relations.to_writer(&mut buf).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            r#"{"propane":[[0,1],[1,2]],"ethane":[[0,1]]}"#
        );
    }

    #[test]
    fn legacy_error_entries_are_read() {
        let data = r#"{"afatinib": [[0, 1]], "orgovyx": {"error": "edge relations not found"}}"#;
        let relations = EdgeRelations::from_reader(data.as_bytes()).unwrap();
        assert_eq!(relations.len(), 2);
        assert_eq!(relations.get("afatinib"), Some(&EdgeEntry::Edges(vec![[0, 1]])));
        assert!(matches!(relations.get("orgovyx"), Some(EdgeEntry::Failed { .. })));
        let names: Vec<_> = relations.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["afatinib", "orgovyx"]);
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(matches!(
            EdgeRelations::from_reader(r#"{"x": [[0]]}"#.as_bytes()),
            Err(ExportError::Json(_))
        ));
    }

    #[test]
    fn table_csv_layout() {
        let mut table = IndexTable::new();
        let mut values = [1.5; 10];
        values[0] = 10.0;
        values[9] = f64::NAN;
        table.push("butane", IndexRecord::from_values(values));

        let mut buf = Vec::new();
        table.to_writer(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("compound,M1,M2,mM2,F,ISI,H,SC,HZ,AZ,SDD"));
        assert_eq!(lines.next(), Some("butane,10,1.5,1.5,1.5,1.5,1.5,1.5,1.5,1.5,NaN"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn read_table_from_reader() {
        let data = "compound,M1,M2,mM2,F,ISI,H,SC,HZ,AZ,SDD\n\
                    butane,10,8,1.25,18,2.333,1.833,1.655,34,24,7\n";
        let table = IndexTable::from_reader(data.as_bytes()).unwrap();
        assert_eq!(table.len(), 1);
        let (name, rec) = &table.rows()[0];
        assert_eq!(name, "butane");
        assert_eq!(rec.get(IndexKind::SecondZagreb), 8.0);
        assert_eq!(rec.get(IndexKind::SymmetricDivisionDeg), 7.0);
    }

    #[test]
    fn missing_column_is_reported() {
        let data = "compound,M1\nbutane,10\n";
        let err = IndexTable::from_reader(data.as_bytes()).unwrap_err();
        assert_eq!(err.to_string(), "index table: column 'M2' not found in CSV headers");
    }

    #[test]
    fn save_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("edges.json");
        let mut relations = EdgeRelations::new();
        relations.insert("ethane", EdgeEntry::Edges(vec![[0, 1]]));
        relations.save(&path).unwrap();
        assert_eq!(EdgeRelations::load(&path).unwrap(), relations);
    }

    #[test]
    fn unwritable_destination() {
        let dir = tempfile::tempdir().unwrap();
        // a directory cannot be opened as a file
        let err = IndexTable::new().save(dir.path()).unwrap_err();
        assert!(matches!(err, ExportError::Io { .. }));
    }
}
