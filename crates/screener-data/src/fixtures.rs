//! Loading collaborator stores from a data directory.
//!
//! Layout:
//! - `securities.json`: array of raw security documents
//! - `screeners.json`: array of screener specs
//! - `preferences.json`: object of username to preferences
//! - `intraday.csv`, `daily.csv`: bars with a symbol column (optional)

use screener_core::{DataError, FilterSpec, Granularity, UserPreferences};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::csv_source::CsvBarSource;
use crate::memory::{MemoryBarStore, MemoryPreferenceStore, MemorySecurityStore, MemorySpecStore};
use crate::normalize::normalize_security;

/// A directory of fixture files.
pub struct DataDir {
    root: PathBuf,
}

impl DataDir {
    /// Open a data directory.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, DataError> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(DataError::Unavailable(format!(
                "data directory {} does not exist",
                root.display()
            )));
        }
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    /// Load and normalize `securities.json`. Records that fail to normalize
    /// are skipped.
    pub fn securities(&self) -> Result<MemorySecurityStore, DataError> {
        let raw: Vec<Map<String, Value>> = self.read_json("securities.json")?;
        let total = raw.len();
        let securities: Vec<_> = raw
            .iter()
            .filter_map(|doc| match normalize_security(doc) {
                Ok(security) => Some(security),
                Err(e) => {
                    warn!(error = %e, "Skipping security record");
                    None
                }
            })
            .collect();
        info!(loaded = securities.len(), total, "Loaded securities");
        Ok(MemorySecurityStore::new(securities))
    }

    /// Load `screeners.json`.
    pub fn screeners(&self) -> Result<MemorySpecStore, DataError> {
        let specs: Vec<FilterSpec> = self.read_json("screeners.json")?;
        info!(count = specs.len(), "Loaded screeners");
        Ok(MemorySpecStore::new(specs))
    }

    /// Load `preferences.json`.
    pub fn preferences(&self) -> Result<MemoryPreferenceStore, DataError> {
        let prefs: HashMap<String, UserPreferences> = self.read_json("preferences.json")?;
        Ok(MemoryPreferenceStore::new(prefs))
    }

    /// Load a bar file; a missing file gives an empty store.
    pub fn bars(&self, granularity: Granularity) -> Result<MemoryBarStore, DataError> {
        let file = match granularity {
            Granularity::Intraday => "intraday.csv",
            Granularity::Daily => "daily.csv",
        };
        let path = self.root.join(file);
        if !path.exists() {
            warn!(file, "Bar file missing, using an empty store");
            return Ok(MemoryBarStore::new(granularity));
        }
        let bars = CsvBarSource::new(&path)?.load_all()?;
        let store = MemoryBarStore::from_bars(granularity, bars);
        info!(%granularity, symbols = store.symbols(), "Loaded bars");
        Ok(store)
    }

    fn read_json<T: DeserializeOwned>(&self, file: &str) -> Result<T, DataError> {
        let path = self.root.join(file);
        let text = std::fs::read_to_string(&path)
            .map_err(|e| DataError::Unavailable(format!("{}: {}", path.display(), e)))?;
        serde_json::from_str(&text)
            .map_err(|e| DataError::ParseError(format!("{}: {}", path.display(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use screener_core::{BarStore, FilterSpecStore, PreferenceStore};

    fn fixture_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("screener-fixtures-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("securities.json"),
            r#"[{"symbol": "AAPL", "PERatio": "28.1"}, {"PERatio": 3}]"#,
        )
        .unwrap();
        std::fs::write(
            dir.join("screeners.json"),
            r#"[{"username": "alice", "name": "value", "include": true, "criteria": {"PE": [0, 30]}}]"#,
        )
        .unwrap();
        std::fs::write(
            dir.join("preferences.json"),
            r#"{"alice": {"hidden_symbols": ["TSLA"], "columns": ["symbol", "price"]}}"#,
        )
        .unwrap();
        std::fs::write(
            dir.join("daily.csv"),
            "symbol,date,open,high,low,close,volume\nAAPL,2024-01-16,1,2,0.5,1.5,100\n",
        )
        .unwrap();
        dir
    }

    #[tokio::test]
    async fn test_load_fixture_dir() {
        let dir = fixture_dir();
        let data = DataDir::open(&dir).unwrap();

        assert_eq!(data.securities().unwrap().len(), 1);
        assert!(data.screeners().unwrap().get("alice", "value").await.unwrap().is_some());
        let prefs = data.preferences().unwrap().get("alice").await.unwrap().unwrap();
        assert!(prefs.hidden_symbols.contains("TSLA"));

        let daily = data.bars(Granularity::Daily).unwrap();
        assert!(daily.most_recent("AAPL").await.unwrap().is_some());
        let intraday = data.bars(Granularity::Intraday).unwrap();
        assert!(intraday.most_recent("AAPL").await.unwrap().is_none());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_dir() {
        assert!(DataDir::open("/nonexistent/screener-data").is_err());
    }
}
