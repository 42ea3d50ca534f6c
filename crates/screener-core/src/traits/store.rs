//! Collaborator store trait definitions.

use crate::error::DataError;
use crate::types::{
    Bar, FilterSpec, Granularity, Operand, Predicate, Security, UserPreferences,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Which end of an attribute's population to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Extremum {
    Min,
    Max,
}

/// Skip/limit window over an ordered result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    /// Records to skip
    pub skip: usize,
    /// Maximum records to return; `None` returns everything
    pub limit: Option<usize>,
}

impl Window {
    /// A window covering the whole result set.
    pub fn all() -> Self {
        Self {
            skip: 0,
            limit: None,
        }
    }
}

/// Trait for the security metadata store.
///
/// Results are ordered by symbol so that windows are stable.
#[async_trait]
pub trait SecurityStore: Send + Sync {
    /// Fetch matching securities within a window.
    async fn find(&self, predicate: &Predicate, window: Window)
        -> Result<Vec<Security>, DataError>;

    /// Count matching securities.
    async fn count(&self, predicate: &Predicate) -> Result<usize, DataError>;

    /// Distinct text values of an attribute.
    async fn distinct(&self, attribute: &str) -> Result<BTreeSet<String>, DataError>;

    /// Smallest or largest value of an operand across all securities.
    async fn extremum(
        &self,
        operand: &Operand,
        which: Extremum,
    ) -> Result<Option<f64>, DataError>;
}

/// Trait for intraday and daily bar stores.
#[async_trait]
pub trait BarStore: Send + Sync {
    /// Get the most recent bar for a symbol.
    async fn most_recent(&self, symbol: &str) -> Result<Option<Bar>, DataError>;

    /// Granularity of the stored bars.
    fn granularity(&self) -> Granularity;
}

/// Trait for persisted screener criteria.
#[async_trait]
pub trait FilterSpecStore: Send + Sync {
    /// Get one screener's spec.
    async fn get(&self, username: &str, screener: &str)
        -> Result<Option<FilterSpec>, DataError>;

    /// All screeners owned by a user, ordered by name.
    async fn list(&self, username: &str) -> Result<Vec<FilterSpec>, DataError>;

    /// Persist a resolved closed range for one field.
    async fn set_resolved_range(
        &self,
        username: &str,
        screener: &str,
        field: &str,
        range: [f64; 2],
    ) -> Result<(), DataError>;
}

/// Trait for per-user preferences.
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    /// Get a user's preferences; `None` for an unknown user.
    async fn get(&self, username: &str) -> Result<Option<UserPreferences>, DataError>;
}
