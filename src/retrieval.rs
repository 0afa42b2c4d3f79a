//! Compound name → SMILES lookup.
//!
//! [`PubChemClient`] asks the PubChem PUG-REST service for the `SMILES`
//! property of a compound name with a single blocking GET. [`StaticSource`]
//! answers from an in-memory table and is what offline runs and tests use.
//! Neither retries: a failed lookup excludes the compound from the batch.
use std::collections::HashMap;
use std::io::BufRead;
use std::time::Duration;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use thiserror::Error;
use tracing::debug;

/// Default PUG-REST endpoint.
pub const PUBCHEM_BASE_URL: &str = "https://pubchem.ncbi.nlm.nih.gov/rest/pug";

// Same safe set as Python's `urllib.parse.quote`.
const NAME_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'/');

/// Errors returned by a [`CompoundSource`].
#[derive(Debug, Error)]
pub enum RetrievalError {
    /// The database has no compound of that name.
    #[error("compound '{0}' not found")]
    NotFound(String),

    /// The server answered with a non-success status.
    #[error("request for '{name}' failed with HTTP {status}")]
    Status { name: String, status: u16 },

    /// The request never got an answer (DNS, TLS, timeout, ...).
    #[error("request for '{name}' failed")]
    Transport {
        name: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with an empty body.
    #[error("empty SMILES returned for '{0}'")]
    Empty(String),
}

/// Anything that can resolve a compound name to a SMILES string.
pub trait CompoundSource {
    fn fetch_smiles(&self, name: &str) -> Result<String, RetrievalError>;
}

impl<T: CompoundSource + ?Sized> CompoundSource for Box<T> {
    fn fetch_smiles(&self, name: &str) -> Result<String, RetrievalError> {
        (**self).fetch_smiles(name)
    }
}

/// Percent-encode a compound name, but only when it contains a space.
///
/// Simple names such as `afatinib` are sent as-is.
pub fn encode_name(name: &str) -> String {
    if name.contains(' ') {
        utf8_percent_encode(name, NAME_ENCODE_SET).to_string()
    } else {
        name.to_string()
    }
}

/// Blocking PubChem PUG-REST client.
#[derive(Debug, Clone)]
pub struct PubChemClient {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl PubChemClient {
    /// Client against `base_url` with a per-request `timeout`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("drug-indices/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// URL of the SMILES property of `name`.
    pub fn smiles_url(&self, name: &str) -> String {
        format!(
            "{}/compound/name/{}/property/SMILES/TXT",
            self.base_url,
            encode_name(name)
        )
    }
}

impl CompoundSource for PubChemClient {
    fn fetch_smiles(&self, name: &str) -> Result<String, RetrievalError> {
        let url = self.smiles_url(name);
        debug!(%url, "querying PubChem");

        let transport = |source| RetrievalError::Transport {
            name: name.to_string(),
            source,
        };
        let resp = self.client.get(&url).send().map_err(transport)?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(RetrievalError::NotFound(name.to_string()));
        }
        if !status.is_success() {
            return Err(RetrievalError::Status {
                name: name.to_string(),
                status: status.as_u16(),
            });
        }

        let body = resp.text().map_err(transport)?;
        // multi-CID answers carry one SMILES per line; keep the first
        match body.lines().map(str::trim).find(|l| !l.is_empty()) {
            Some(smiles) => Ok(smiles.to_string()),
            None => Err(RetrievalError::Empty(name.to_string())),
        }
    }
}

/// In-memory name → SMILES table.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    entries: HashMap<String, String>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, smiles: impl Into<String>) {
        self.entries.insert(name.into(), smiles.into());
    }

    pub fn with(mut self, name: impl Into<String>, smiles: impl Into<String>) -> Self {
        self.insert(name, smiles);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Read `name<TAB>smiles` lines. Blank lines and `#` comments are skipped.
    pub fn from_reader(reader: impl BufRead) -> std::io::Result<Self> {
        let mut source = Self::new();
        for (lineno, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (name, smiles) = line.split_once('\t').ok_or_else(|| {
                std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    format!("line {}: expected 'name<TAB>smiles'", lineno + 1),
                )
            })?;
            source.insert(name.trim(), smiles.trim());
        }
        Ok(source)
    }
}

impl CompoundSource for StaticSource {
    fn fetch_smiles(&self, name: &str) -> Result<String, RetrievalError> {
        self.entries
            .get(name)
            .cloned()
            .ok_or_else(|| RetrievalError::NotFound(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_names_are_not_encoded() {
        assert_eq!(encode_name("afatinib"), "afatinib");
        assert_eq!(encode_name("mitomycin c"), "mitomycin%20c");
        assert_eq!(encode_name("n,n'-x y"), "n%2Cn%27-x%20y");
    }

    #[test]
    fn pubchem_url_layout() {
        let client = PubChemClient::new("http://localhost:9/pug/", Duration::from_secs(1)).unwrap();
        assert_eq!(
            client.smiles_url("mitomycin c"),
            "http://localhost:9/pug/compound/name/mitomycin%20c/property/SMILES/TXT"
        );
    }

    #[test]
    fn static_source_lookup() {
        let source = StaticSource::new().with("ethanol", "CCO");
        assert_eq!(source.fetch_smiles("ethanol").unwrap(), "CCO");
        assert!(matches!(
            source.fetch_smiles("unobtainium"),
            Err(RetrievalError::NotFound(name)) if name == "unobtainium"
        ));
    }

    #[test]
    fn static_source_from_tab_separated_lines() {
        let data = "# name\tsmiles\nethanol\tCCO\n\nmitomycin c\tCOC12C(COC(N)=O)C3=C(N1CC1NC12)C(=O)C(C)=C(N)C3=O\n";
        let source = StaticSource::from_reader(data.as_bytes()).unwrap();
        assert_eq!(source.len(), 2);
        assert!(source.fetch_smiles("mitomycin c").is_ok());
    }

    #[test]
    fn static_source_rejects_lines_without_tab() {
        let err = StaticSource::from_reader("ethanol CCO\n".as_bytes()).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
    }

    #[test]
    fn unreachable_host_is_a_transport_error() {
        // port 9 (discard) is closed on any sane test machine
        let client = PubChemClient::new("http://127.0.0.1:9", Duration::from_millis(500)).unwrap();
        assert!(matches!(
            client.fetch_smiles("afatinib"),
            Err(RetrievalError::Transport { .. })
        ));
    }
}
