//! Persisted screener criteria and user preferences.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// The stored filter criteria of one screener.
///
/// Criteria are kept in their stored form; the filter compiler reads and
/// normalizes each one according to the field it is keyed by.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FilterSpec {
    /// Owner of the screener
    pub username: String,
    /// Screener name, unique per owner
    pub name: String,
    /// Whether the screener takes part in the aggregate view
    #[serde(default)]
    pub include: bool,
    /// Stored criteria keyed by field name
    #[serde(default)]
    pub criteria: BTreeMap<String, Value>,
}

impl FilterSpec {
    /// Create an empty spec.
    pub fn new(username: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            name: name.into(),
            include: true,
            criteria: BTreeMap::new(),
        }
    }

    /// Set a criterion.
    pub fn with(mut self, field: &str, value: Value) -> Self {
        self.criteria.insert(field.to_string(), value);
        self
    }

    /// Set the aggregate-view flag.
    pub fn included(mut self, include: bool) -> Self {
        self.include = include;
        self
    }
}

/// Per-user display and visibility preferences.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UserPreferences {
    /// Symbols the user has hidden from every view
    #[serde(default)]
    pub hidden_symbols: BTreeSet<String>,
    /// Selected columns, in display order
    #[serde(default)]
    pub columns: Vec<String>,
}
