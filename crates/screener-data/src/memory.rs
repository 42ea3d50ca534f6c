//! In-memory collaborator stores.

use async_trait::async_trait;
use screener_core::{
    Bar, BarStore, DataError, Extremum, FilterSpec, FilterSpecStore, Granularity, Operand,
    Predicate, PreferenceStore, Security, SecurityStore, UserPreferences, Window,
};
use serde_json::json;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::RwLock;
use tracing::debug;

/// Security store over a fixed set of records, ordered by symbol.
pub struct MemorySecurityStore {
    securities: Vec<Security>,
}

impl MemorySecurityStore {
    /// Create a store. Later records replace earlier ones with the same symbol.
    pub fn new(securities: Vec<Security>) -> Self {
        let by_symbol: BTreeMap<String, Security> = securities
            .into_iter()
            .map(|s| (s.symbol.clone(), s))
            .collect();
        Self {
            securities: by_symbol.into_values().collect(),
        }
    }

    /// Number of stored securities.
    pub fn len(&self) -> usize {
        self.securities.len()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.securities.is_empty()
    }
}

#[async_trait]
impl SecurityStore for MemorySecurityStore {
    async fn find(
        &self,
        predicate: &Predicate,
        window: Window,
    ) -> Result<Vec<Security>, DataError> {
        let matching = self
            .securities
            .iter()
            .filter(|s| predicate.matches(s))
            .skip(window.skip);
        Ok(match window.limit {
            Some(limit) => matching.take(limit).cloned().collect(),
            None => matching.cloned().collect(),
        })
    }

    async fn count(&self, predicate: &Predicate) -> Result<usize, DataError> {
        Ok(self.securities.iter().filter(|s| predicate.matches(s)).count())
    }

    async fn distinct(&self, attribute: &str) -> Result<BTreeSet<String>, DataError> {
        Ok(self
            .securities
            .iter()
            .filter_map(|s| s.text(attribute))
            .map(str::to_string)
            .collect())
    }

    async fn extremum(
        &self,
        operand: &Operand,
        which: Extremum,
    ) -> Result<Option<f64>, DataError> {
        let values = self.securities.iter().filter_map(|s| operand.resolve(s));
        Ok(match which {
            Extremum::Min => values.reduce(f64::min),
            Extremum::Max => values.reduce(f64::max),
        })
    }
}

/// Bar store keyed by symbol.
pub struct MemoryBarStore {
    granularity: Granularity,
    bars: HashMap<String, Vec<Bar>>,
}

impl MemoryBarStore {
    /// Create an empty store.
    pub fn new(granularity: Granularity) -> Self {
        Self {
            granularity,
            bars: HashMap::new(),
        }
    }

    /// Create a store from bars in any order.
    pub fn from_bars(granularity: Granularity, bars: impl IntoIterator<Item = Bar>) -> Self {
        let mut store = Self::new(granularity);
        for bar in bars {
            store.push(bar);
        }
        store
    }

    /// Add a bar.
    pub fn push(&mut self, bar: Bar) {
        self.bars.entry(bar.symbol.clone()).or_default().push(bar);
    }

    /// Number of symbols with bars.
    pub fn symbols(&self) -> usize {
        self.bars.len()
    }
}

#[async_trait]
impl BarStore for MemoryBarStore {
    async fn most_recent(&self, symbol: &str) -> Result<Option<Bar>, DataError> {
        Ok(self
            .bars
            .get(symbol)
            .and_then(|bars| bars.iter().max_by_key(|b| b.timestamp))
            .cloned())
    }

    fn granularity(&self) -> Granularity {
        self.granularity
    }
}

/// Screener spec store keyed by (username, screener name).
pub struct MemorySpecStore {
    specs: RwLock<BTreeMap<(String, String), FilterSpec>>,
}

impl MemorySpecStore {
    /// Create a store. Later specs replace earlier ones with the same key.
    pub fn new(specs: Vec<FilterSpec>) -> Self {
        Self {
            specs: RwLock::new(
                specs
                    .into_iter()
                    .map(|s| ((s.username.clone(), s.name.clone()), s))
                    .collect(),
            ),
        }
    }
}

fn poisoned<T>(_: T) -> DataError {
    DataError::Internal("spec store lock poisoned".into())
}

#[async_trait]
impl FilterSpecStore for MemorySpecStore {
    async fn get(&self, username: &str, screener: &str) -> Result<Option<FilterSpec>, DataError> {
        let specs = self.specs.read().map_err(poisoned)?;
        Ok(specs
            .get(&(username.to_string(), screener.to_string()))
            .cloned())
    }

    async fn list(&self, username: &str) -> Result<Vec<FilterSpec>, DataError> {
        let specs = self.specs.read().map_err(poisoned)?;
        Ok(specs
            .values()
            .filter(|s| s.username == username)
            .cloned()
            .collect())
    }

    async fn set_resolved_range(
        &self,
        username: &str,
        screener: &str,
        field: &str,
        range: [f64; 2],
    ) -> Result<(), DataError> {
        let mut specs = self.specs.write().map_err(poisoned)?;
        let spec = specs
            .get_mut(&(username.to_string(), screener.to_string()))
            .ok_or_else(|| {
                DataError::Internal(format!("no screener '{}' for '{}'", screener, username))
            })?;
        spec.criteria
            .insert(field.to_string(), json!([range[0], range[1]]));
        debug!(username, screener, field, ?range, "Stored resolved range");
        Ok(())
    }
}

/// Preference store keyed by username.
pub struct MemoryPreferenceStore {
    preferences: HashMap<String, UserPreferences>,
}

impl MemoryPreferenceStore {
    /// Create a store.
    pub fn new(preferences: HashMap<String, UserPreferences>) -> Self {
        Self { preferences }
    }
}

#[async_trait]
impl PreferenceStore for MemoryPreferenceStore {
    async fn get(&self, username: &str) -> Result<Option<UserPreferences>, DataError> {
        Ok(self.preferences.get(username).cloned())
    }
}
