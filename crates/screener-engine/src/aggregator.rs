//! Multi-screener aggregation.
//!
//! Runs every included screener of a user, merges the result sets, drops
//! exact duplicates and ranks by the number of screeners each symbol
//! appeared in.

use futures::future::join_all;
use screener_core::{
    EnrichedSecurity, FilterSpec, RankedSecurity, ScreenerResult, UserPreferences, Window,
};
use screener_filters::FilterCompiler;
use std::cmp::Reverse;
use std::collections::HashMap;
use tracing::{debug, info, warn};

use crate::enricher::PriceVolumeEnricher;
use crate::executor::SecurityQueryExecutor;
use crate::projection::Projection;

/// Merges the results of a user's included screeners.
pub struct ResultAggregator<'a> {
    compiler: &'a FilterCompiler,
    executor: &'a SecurityQueryExecutor,
    enricher: &'a PriceVolumeEnricher,
    parallel: bool,
}

impl<'a> ResultAggregator<'a> {
    /// Create an aggregator.
    pub fn new(
        compiler: &'a FilterCompiler,
        executor: &'a SecurityQueryExecutor,
        enricher: &'a PriceVolumeEnricher,
    ) -> Self {
        Self {
            compiler,
            executor,
            enricher,
            parallel: true,
        }
    }

    /// Run screeners concurrently (default) or one after another.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Aggregate all included screeners in `specs`.
    ///
    /// A screener that fails to compile or execute is logged and contributes
    /// nothing. The result is sorted by membership count, descending, then
    /// by symbol.
    pub async fn aggregate(
        &self,
        specs: &[FilterSpec],
        preferences: &UserPreferences,
    ) -> Vec<RankedSecurity> {
        let included: Vec<&FilterSpec> = specs.iter().filter(|s| s.include).collect();
        let projection = Projection::from_columns(&preferences.columns);

        let outcomes = if self.parallel {
            join_all(
                included
                    .iter()
                    .map(|spec| self.run_screener(spec, preferences, &projection)),
            )
            .await
        } else {
            let mut outcomes = Vec::with_capacity(included.len());
            for spec in &included {
                outcomes.push(self.run_screener(spec, preferences, &projection).await);
            }
            outcomes
        };

        let mut results = Vec::with_capacity(outcomes.len());
        for (spec, outcome) in included.iter().zip(outcomes) {
            match outcome {
                Ok(records) => results.push((spec.name.clone(), records)),
                Err(e) => warn!(
                    username = %spec.username,
                    screener = %spec.name,
                    error = %e,
                    "Skipping screener in aggregate view"
                ),
            }
        }

        let skipped = included.len() - results.len();
        let ranked = merge(results);
        info!(
            screeners = included.len(),
            skipped,
            results = ranked.len(),
            "Aggregated screeners"
        );
        ranked
    }

    async fn run_screener(
        &self,
        spec: &FilterSpec,
        preferences: &UserPreferences,
        projection: &Projection,
    ) -> ScreenerResult<Vec<EnrichedSecurity>> {
        let predicate = self.compiler.compile(spec, &preferences.hidden_symbols)?;
        let (items, total) = self
            .executor
            .execute(&predicate, projection, Window::all())
            .await?;
        debug!(screener = %spec.name, total, "Screener matched");
        Ok(self.enricher.enrich(items).await)
    }
}

/// Merge per-screener result sets, given in screener order.
fn merge(results: Vec<(String, Vec<EnrichedSecurity>)>) -> Vec<RankedSecurity> {
    let mut records: Vec<EnrichedSecurity> = Vec::new();
    let mut variants: HashMap<String, Vec<usize>> = HashMap::new();
    let mut membership: HashMap<String, Vec<String>> = HashMap::new();

    for (screener, items) in results {
        for item in items {
            let members = membership.entry(item.symbol.clone()).or_default();
            if !members.contains(&screener) {
                members.push(screener.clone());
            }

            let indexes = variants.entry(item.symbol.clone()).or_default();
            if !indexes.iter().any(|&i| records[i] == item) {
                indexes.push(records.len());
                records.push(item);
            }
        }
    }

    let mut ranked: Vec<RankedSecurity> = records
        .into_iter()
        .map(|security| RankedSecurity {
            screeners: membership
                .get(&security.symbol)
                .cloned()
                .unwrap_or_default(),
            security,
        })
        .collect();

    // Stable, so variants of one symbol keep first-seen order.
    ranked.sort_by(|a, b| {
        (Reverse(a.screeners.len()), &a.security.symbol)
            .cmp(&(Reverse(b.screeners.len()), &b.security.symbol))
    });
    ranked
}
