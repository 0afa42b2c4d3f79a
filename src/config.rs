//! Batch configuration.
//!
//! A [`BatchConfig`] can be written as TOML; every field is optional and falls
//! back to the defaults below.
//!
//! ```toml
//! compounds = ["afatinib", "mitomycin c"]
//! edges_path = "out/edge_relations.json"
//! table_path = "out/drug_indices.csv"
//! timeout_secs = 10.0
//! decimals = 4
//! sort = true
//! ```
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use indexmap::IndexSet;
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use crate::retrieval::PUBCHEM_BASE_URL;

/// The thirty oncology drugs of the reference study.
pub const DEFAULT_COMPOUNDS: [&str; 30] = [
    "afatinib",
    "alpelisib",
    "anastrozole",
    "busulfan",
    "dasatinib",
    "daunorubicin",
    "erdafitinib",
    "melphalan",
    "mitomycin c",
    "nilotinib",
    "olaparib",
    "orgovyx",
    "plerixafor",
    "prednisone",
    "zanubrutinib",
    "belinostat",
    "bortezomib",
    "carmustine",
    "flutamide",
    "futibatinib",
    "granisetron",
    "ibrutinib",
    "lenalidomide",
    "lomustine",
    "midostaurin",
    "olutasidenib",
    "pomalidomide",
    "pralatrexate",
    "repotrectinib",
    "ribociclib",
];

/// Most decimal places an `f64` index value can meaningfully keep.
pub const MAX_DECIMALS: u32 = 15;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("timeout must be a positive number of seconds, got {0}")]
    Timeout(f64),

    #[error("decimals must be between 0 and {max}, got {0}", max = MAX_DECIMALS)]
    Decimals(u32),
}

/// Everything a batch run needs besides the compound source itself.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatchConfig {
    /// Compound names, processed in this order unless `sort` is set.
    pub compounds: Vec<String>,
    /// Edge-relation JSON output.
    pub edges_path: PathBuf,
    /// Index table CSV output.
    pub table_path: PathBuf,
    pub base_url: String,
    pub timeout_secs: f64,
    /// Decimal places kept in the index table.
    pub decimals: u32,
    /// Sort compound names alphabetically before processing.
    pub sort: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            compounds: DEFAULT_COMPOUNDS.iter().map(|s| s.to_string()).collect(),
            edges_path: PathBuf::from("edge_relations.json"),
            table_path: PathBuf::from("drug_indices.csv"),
            base_url: PUBCHEM_BASE_URL.to_string(),
            timeout_secs: 5.0,
            decimals: 3,
            sort: false,
        }
    }
}

impl BatchConfig {
    /// Parse a TOML document.
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Load and parse a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Request timeout, validated.
    pub fn timeout(&self) -> Result<Duration, ConfigError> {
        if self.timeout_secs.is_finite() && self.timeout_secs > 0.0 {
            Ok(Duration::from_secs_f64(self.timeout_secs))
        } else {
            Err(ConfigError::Timeout(self.timeout_secs))
        }
    }

    /// Decimal places for the index table, validated.
    pub fn decimals(&self) -> Result<u32, ConfigError> {
        if self.decimals <= MAX_DECIMALS {
            Ok(self.decimals)
        } else {
            Err(ConfigError::Decimals(self.decimals))
        }
    }

    /// Check every value that has a restricted range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.timeout()?;
        self.decimals()?;
        Ok(())
    }

    /// Compound names in processing order, each name once.
    pub fn ordered_compounds(&self) -> Vec<String> {
        let mut names = IndexSet::with_capacity(self.compounds.len());
        for name in &self.compounds {
            if !names.insert(name.clone()) {
                warn!(compound = %name, "compound listed twice, keeping the first");
            }
        }
        let mut names: Vec<_> = names.into_iter().collect();
        if self.sort {
            names.sort();
        }
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults() {
        let cfg = BatchConfig::default();
        assert_eq!(cfg.compounds.len(), 30);
        assert_eq!(cfg.decimals, 3);
        assert_eq!(cfg.timeout().unwrap(), Duration::from_secs(5));
        assert_eq!(cfg.edges_path, PathBuf::from("edge_relations.json"));
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg = BatchConfig::from_toml("compounds = [\"b\", \"a\"]\nsort = true\n").unwrap();
        assert_eq!(cfg.ordered_compounds(), vec!["a", "b"]);
        assert_eq!(cfg.base_url, PUBCHEM_BASE_URL);
        assert_eq!(cfg.decimals, 3);
    }

    #[test]
    fn input_order_is_kept_without_sort() {
        let cfg = BatchConfig::from_toml("compounds = [\"b\", \"a\"]").unwrap();
        assert_eq!(cfg.ordered_compounds(), vec!["b", "a"]);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(BatchConfig::from_toml("compunds = []").is_err());
    }

    #[test]
    fn bad_timeout() {
        let cfg = BatchConfig::from_toml("timeout_secs = 0.0").unwrap();
        assert!(matches!(cfg.timeout(), Err(ConfigError::Timeout(_))));
    }

    #[test]
    fn decimals_are_range_checked() {
        let cfg = BatchConfig::from_toml("decimals = 15").unwrap();
        assert_eq!(cfg.decimals().unwrap(), 15);
        assert!(cfg.validate().is_ok());

        let cfg = BatchConfig::from_toml("decimals = 309").unwrap();
        assert!(matches!(cfg.decimals(), Err(ConfigError::Decimals(309))));
        assert!(matches!(cfg.validate(), Err(ConfigError::Decimals(309))));
    }

    #[test]
    fn repeated_compounds_are_listed_once() {
        let cfg = BatchConfig::from_toml("compounds = [\"b\", \"a\", \"b\"]").unwrap();
        assert_eq!(cfg.ordered_compounds(), vec!["b", "a"]);
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "decimals = 5\ntable_path = \"t.csv\"").unwrap();
        file.flush().unwrap();
        let cfg = BatchConfig::load(file.path()).unwrap();
        assert_eq!(cfg.decimals, 5);
        assert_eq!(cfg.table_path, PathBuf::from("t.csv"));
    }

    #[test]
    fn missing_file() {
        let err = BatchConfig::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
