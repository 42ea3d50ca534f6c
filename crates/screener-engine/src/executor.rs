//! Predicate execution against the security store.

use screener_core::{DataError, Predicate, SecurityStore, Window};
use std::sync::Arc;
use tracing::debug;

use crate::projection::{ProjectedSecurity, Projection};

/// Runs compiled predicates and projects the matches.
#[derive(Clone)]
pub struct SecurityQueryExecutor {
    store: Arc<dyn SecurityStore>,
}

impl SecurityQueryExecutor {
    /// Create an executor over a security store.
    pub fn new(store: Arc<dyn SecurityStore>) -> Self {
        Self { store }
    }

    /// Fetch one window of matches and the total match count.
    pub async fn execute(
        &self,
        predicate: &Predicate,
        projection: &Projection,
        window: Window,
    ) -> Result<(Vec<ProjectedSecurity>, usize), DataError> {
        let (records, total) = tokio::try_join!(
            self.store.find(predicate, window),
            self.store.count(predicate)
        )?;

        debug!(
            returned = records.len(),
            total,
            skip = window.skip,
            "Executed predicate"
        );
        Ok((records.iter().map(|s| projection.apply(s)).collect(), total))
    }
}
