//! Price, volume and percent-change enrichment.
//!
//! Each security is enriched independently and all lookups in a batch are
//! issued together. A failed or slow lookup degrades only the fields it
//! feeds, and only for that security.

use futures::future::join_all;
use screener_core::{
    Bar, BarStore, Clock, DataError, EnrichedSecurity, MarketSession, SessionState,
    INTRADAY_VOLUME_NOTE,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::projection::ProjectedSecurity;

/// Overlays live figures onto projected securities.
#[derive(Clone)]
pub struct PriceVolumeEnricher {
    intraday: Arc<dyn BarStore>,
    daily: Arc<dyn BarStore>,
    session: MarketSession,
    clock: Arc<dyn Clock>,
    lookup_timeout: Duration,
}

impl PriceVolumeEnricher {
    /// Create an enricher.
    pub fn new(
        intraday: Arc<dyn BarStore>,
        daily: Arc<dyn BarStore>,
        session: MarketSession,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            intraday,
            daily,
            session,
            clock,
            lookup_timeout: Duration::from_secs(2),
        }
    }

    /// Set the per-lookup timeout.
    pub fn with_lookup_timeout(mut self, timeout: Duration) -> Self {
        self.lookup_timeout = timeout;
        self
    }

    /// Current session state.
    pub fn session_state(&self) -> SessionState {
        self.session.state_at(self.clock.now())
    }

    /// Enrich a batch using the current session state.
    pub async fn enrich(&self, batch: Vec<ProjectedSecurity>) -> Vec<EnrichedSecurity> {
        let state = self.session_state();
        self.enrich_in(batch, state).await
    }

    /// Enrich a batch under a given session state. Output order matches input.
    pub async fn enrich_in(
        &self,
        batch: Vec<ProjectedSecurity>,
        state: SessionState,
    ) -> Vec<EnrichedSecurity> {
        debug!(count = batch.len(), %state, "Enriching batch");
        join_all(batch.into_iter().map(|item| self.enrich_one(item, state))).await
    }

    async fn enrich_one(&self, item: ProjectedSecurity, state: SessionState) -> EnrichedSecurity {
        let symbol = item.symbol.as_str();

        let (price_bar, volume, volume_note, percent_change) = match state {
            SessionState::Open => {
                let (intraday, prior) = tokio::join!(
                    self.lookup(self.intraday.as_ref(), symbol),
                    self.lookup(self.daily.as_ref(), symbol)
                );
                let percent_change = match (&intraday, &prior) {
                    (Some(now), Some(prior)) => now.change_from(prior.close),
                    _ => None,
                };
                (
                    intraday,
                    None,
                    Some(INTRADAY_VOLUME_NOTE.to_string()),
                    percent_change,
                )
            }
            SessionState::Closed => {
                // Price stays on the last intraday close even after the
                // daily bar is written.
                let (intraday, daily) = tokio::join!(
                    self.lookup(self.intraday.as_ref(), symbol),
                    self.lookup(self.daily.as_ref(), symbol)
                );
                (
                    intraday,
                    daily.map(|b| b.volume),
                    None,
                    item.stored_percent_change,
                )
            }
        };

        EnrichedSecurity {
            price: price_bar.map(|b| b.close),
            volume,
            volume_note,
            percent_change,
            symbol: item.symbol,
            fields: item.fields,
        }
    }

    async fn lookup(&self, store: &dyn BarStore, symbol: &str) -> Option<Bar> {
        match self.most_recent(store, symbol).await {
            Ok(bar) => bar,
            Err(e) => {
                warn!(symbol, store = %store.granularity(), error = %e, "Bar lookup failed");
                None
            }
        }
    }

    /// Most recent bar, with the lookup bounded by the configured timeout.
    async fn most_recent(
        &self,
        store: &dyn BarStore,
        symbol: &str,
    ) -> Result<Option<Bar>, DataError> {
        tokio::time::timeout(self.lookup_timeout, store.most_recent(symbol))
            .await
            .map_err(|_| DataError::Timeout {
                millis: self.lookup_timeout.as_millis() as u64,
            })?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use screener_core::{FixedClock, Granularity};
    use screener_data::MemoryBarStore;
    use serde_json::Map;

    struct FailingStore;

    #[async_trait]
    impl BarStore for FailingStore {
        async fn most_recent(&self, _symbol: &str) -> Result<Option<Bar>, DataError> {
            Err(DataError::Unavailable("bar store down".into()))
        }

        fn granularity(&self) -> Granularity {
            Granularity::Daily
        }
    }

    struct SlowStore;

    #[async_trait]
    impl BarStore for SlowStore {
        async fn most_recent(&self, symbol: &str) -> Result<Option<Bar>, DataError> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(Some(Bar::new(symbol, 1, 1.0, 1.0, 1.0, 1.0, 1.0)))
        }

        fn granularity(&self) -> Granularity {
            Granularity::Intraday
        }
    }

    fn item(symbol: &str, stored: Option<f64>) -> ProjectedSecurity {
        ProjectedSecurity {
            symbol: symbol.to_string(),
            fields: Map::new(),
            stored_percent_change: stored,
        }
    }

    fn stores() -> (Arc<dyn BarStore>, Arc<dyn BarStore>) {
        let intraday = MemoryBarStore::from_bars(
            Granularity::Intraday,
            vec![Bar::new("X", 2, 104.0, 106.0, 103.0, 105.0, 900.0)],
        );
        let daily = MemoryBarStore::from_bars(
            Granularity::Daily,
            vec![
                Bar::new("X", 1, 99.0, 101.0, 98.0, 100.0, 50_000.0),
                Bar::new("Y", 1, 10.0, 10.0, 10.0, 10.0, 7_000.0),
            ],
        );
        (Arc::new(intraday), Arc::new(daily))
    }

    fn enricher(intraday: Arc<dyn BarStore>, daily: Arc<dyn BarStore>) -> PriceVolumeEnricher {
        // 2024-01-17 is a Wednesday
        let clock = FixedClock(Utc.with_ymd_and_hms(2024, 1, 17, 15, 0, 0).unwrap());
        PriceVolumeEnricher::new(intraday, daily, MarketSession::default(), Arc::new(clock))
    }

    #[tokio::test]
    async fn test_open_session() {
        let (intraday, daily) = stores();
        let enricher = enricher(intraday, daily);
        assert_eq!(enricher.session_state(), SessionState::Open);

        let out = enricher
            .enrich(vec![item("X", Some(9.9)), item("Y", Some(1.0)), item("Z", None)])
            .await;

        assert_eq!(out[0].symbol, "X");
        assert_eq!(out[0].price, Some(105.0));
        assert!((out[0].percent_change.unwrap() - 0.05).abs() < 1e-12);
        for record in &out {
            assert!(record.volume.is_none());
            assert_eq!(record.volume_note.as_deref(), Some(INTRADAY_VOLUME_NOTE));
        }
        // Y has a daily bar but no intraday bar
        assert!(out[1].price.is_none());
        assert!(out[1].percent_change.is_none());
        assert!(out[2].percent_change.is_none());
    }

    #[tokio::test]
    async fn test_open_without_prior_daily_bar() {
        let (intraday, _) = stores();
        let enricher = enricher(intraday, Arc::new(MemoryBarStore::new(Granularity::Daily)));

        let out = enricher.enrich_in(vec![item("X", None)], SessionState::Open).await;
        assert_eq!(out[0].price, Some(105.0));
        assert!(out[0].percent_change.is_none());
    }

    #[tokio::test]
    async fn test_closed_session() {
        let (intraday, daily) = stores();
        let enricher = enricher(intraday, daily);

        let out = enricher
            .enrich_in(vec![item("X", Some(2.5)), item("Y", None)], SessionState::Closed)
            .await;

        assert_eq!(out[0].price, Some(105.0));
        assert_eq!(out[0].volume, Some(50_000.0));
        assert_eq!(out[0].percent_change, Some(2.5));
        assert!(out.iter().all(|r| r.volume_note.is_none()));
        assert_eq!(out[1].volume, Some(7_000.0));
        assert!(out[1].price.is_none());
    }

    #[tokio::test]
    async fn test_failing_daily_store_degrades_fields() {
        let (intraday, _) = stores();
        let enricher = enricher(intraday, Arc::new(FailingStore));

        let open = enricher.enrich_in(vec![item("X", None)], SessionState::Open).await;
        assert_eq!(open[0].price, Some(105.0));
        assert!(open[0].percent_change.is_none());

        let closed = enricher.enrich_in(vec![item("X", Some(1.0))], SessionState::Closed).await;
        assert!(closed[0].volume.is_none());
        assert_eq!(closed[0].percent_change, Some(1.0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_lookup_times_out() {
        let (_, daily) = stores();
        let enricher = enricher(Arc::new(SlowStore), daily)
            .with_lookup_timeout(Duration::from_millis(100));

        let out = enricher.enrich_in(vec![item("X", None)], SessionState::Closed).await;
        assert!(out[0].price.is_none());
        assert_eq!(out[0].volume, Some(50_000.0));

        let err = enricher.most_recent(&SlowStore, "X").await.unwrap_err();
        assert_eq!(err, DataError::Timeout { millis: 100 });
    }
}
