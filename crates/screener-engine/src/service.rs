//! The screener service: single-screener listing, the aggregate view and
//! range maintenance over a set of collaborator stores.

use screener_core::{
    BarStore, Clock, EnrichedSecurity, FilterSpec, FilterSpecStore, MarketSession, Page,
    PreferenceStore, Predicate, RankedSecurity, ScreenerError, ScreenerResult, SecurityStore,
    SessionState, SystemClock, UserPreferences,
};
use screener_filters::{FilterCompiler, RangeResolver};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::aggregator::ResultAggregator;
use crate::enricher::PriceVolumeEnricher;
use crate::executor::SecurityQueryExecutor;
use crate::paginator::{paginate, PageLimits, PageRequest};
use crate::projection::Projection;

/// Collaborator stores backing the service.
#[derive(Clone)]
pub struct Stores {
    pub securities: Arc<dyn SecurityStore>,
    pub intraday: Arc<dyn BarStore>,
    pub daily: Arc<dyn BarStore>,
    pub specs: Arc<dyn FilterSpecStore>,
    pub preferences: Arc<dyn PreferenceStore>,
    pub clock: Arc<dyn Clock>,
}

impl Stores {
    /// Bundle stores with the system clock.
    pub fn new(
        securities: Arc<dyn SecurityStore>,
        intraday: Arc<dyn BarStore>,
        daily: Arc<dyn BarStore>,
        specs: Arc<dyn FilterSpecStore>,
        preferences: Arc<dyn PreferenceStore>,
    ) -> Self {
        Self {
            securities,
            intraday,
            daily,
            specs,
            preferences,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the clock.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}

/// Tunables for the service.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineSettings {
    pub session: MarketSession,
    pub lookup_timeout: Duration,
    pub limits: PageLimits,
    pub parallel_screeners: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            session: MarketSession::default(),
            lookup_timeout: Duration::from_millis(2000),
            limits: PageLimits::default(),
            parallel_screeners: true,
        }
    }
}

/// Screener service.
pub struct ScreenerService {
    stores: Stores,
    compiler: FilterCompiler,
    executor: SecurityQueryExecutor,
    enricher: PriceVolumeEnricher,
    settings: EngineSettings,
}

impl ScreenerService {
    /// Create a service over the given stores.
    pub fn new(stores: Stores, settings: EngineSettings) -> Self {
        let executor = SecurityQueryExecutor::new(stores.securities.clone());
        let enricher = PriceVolumeEnricher::new(
            stores.intraday.clone(),
            stores.daily.clone(),
            settings.session,
            stores.clock.clone(),
        )
        .with_lookup_timeout(settings.lookup_timeout);

        Self {
            stores,
            compiler: FilterCompiler::new(),
            executor,
            enricher,
            settings,
        }
    }

    /// Page bounds in effect.
    pub fn limits(&self) -> &PageLimits {
        &self.settings.limits
    }

    /// The compiler and its field registry.
    pub fn compiler(&self) -> &FilterCompiler {
        &self.compiler
    }

    /// Session state right now.
    pub fn session_state(&self) -> SessionState {
        self.enricher.session_state()
    }

    /// List one page of a screener's matches, or of every visible security
    /// when no screener is named.
    pub async fn filter_and_list(
        &self,
        username: &str,
        screener: Option<&str>,
        request: PageRequest,
    ) -> ScreenerResult<Page<EnrichedSecurity>> {
        let preferences = self.preferences(username).await?;
        let spec = match screener {
            Some(name) => self.spec(username, name).await?,
            None => FilterSpec::new(username, ""),
        };

        let predicate = self.compiler.compile(&spec, &preferences.hidden_symbols)?;
        let projection = Projection::from_columns(&preferences.columns);
        let (items, total) = self
            .executor
            .execute(&predicate, &projection, request.window())
            .await?;
        let data = self.enricher.enrich(items).await;

        info!(
            username,
            screener = screener.unwrap_or("-"),
            page = request.page,
            returned = data.len(),
            total,
            "Listed screener"
        );
        Ok(Page::new(request.page, request.page_size, total, data))
    }

    /// One page of the merged, ranked view over all included screeners.
    pub async fn aggregate_all(
        &self,
        username: &str,
        request: PageRequest,
    ) -> ScreenerResult<Page<RankedSecurity>> {
        let preferences = self.preferences(username).await?;
        let specs = self.stores.specs.list(username).await?;

        let ranked = ResultAggregator::new(&self.compiler, &self.executor, &self.enricher)
            .parallel(self.settings.parallel_screeners)
            .aggregate(&specs, &preferences)
            .await;
        Ok(paginate(ranked, request))
    }

    /// Close a partially supplied range and persist it on the screener.
    pub async fn resolve_range(
        &self,
        username: &str,
        screener: &str,
        field: &str,
        min: Option<f64>,
        max: Option<f64>,
    ) -> ScreenerResult<[f64; 2]> {
        self.spec(username, screener).await?;
        let range = RangeResolver::new(self.compiler.registry())
            .resolve(self.stores.securities.as_ref(), field, min, max)
            .await?;
        self.stores
            .specs
            .set_resolved_range(username, screener, field, range)
            .await?;

        info!(username, screener, field, min = range[0], max = range[1], "Stored resolved range");
        Ok(range)
    }

    /// Distinct stored values of a text attribute.
    pub async fn distinct_values(&self, attribute: &str) -> ScreenerResult<BTreeSet<String>> {
        Ok(self.stores.securities.distinct(attribute).await?)
    }

    /// The predicate a screener compiles to for its owner.
    pub async fn explain(&self, username: &str, screener: &str) -> ScreenerResult<Predicate> {
        let preferences = self.preferences(username).await?;
        let spec = self.spec(username, screener).await?;
        Ok(self.compiler.compile(&spec, &preferences.hidden_symbols)?)
    }

    async fn preferences(&self, username: &str) -> ScreenerResult<UserPreferences> {
        self.stores
            .preferences
            .get(username)
            .await?
            .ok_or_else(|| ScreenerError::NotFound(format!("user {}", username)))
    }

    async fn spec(&self, username: &str, screener: &str) -> ScreenerResult<FilterSpec> {
        self.stores
            .specs
            .get(username, screener)
            .await?
            .ok_or_else(|| {
                ScreenerError::NotFound(format!("screener {} for user {}", screener, username))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use screener_core::{
        Bar, FilterError, FixedClock, Granularity, Security, INTRADAY_VOLUME_NOTE,
    };
    use screener_data::{
        MemoryBarStore, MemoryPreferenceStore, MemorySecurityStore, MemorySpecStore,
    };
    use serde_json::json;
    use std::collections::HashMap;

    fn service_at(hour: u32) -> ScreenerService {
        let securities = MemorySecurityStore::new(vec![
            Security::new("AAPL")
                .with_text("Sector", "Technology")
                .with_number("PERatio", 28.0)
                .with_number("PercChange1D", 1.2),
            Security::new("MSFT")
                .with_text("Sector", "Technology")
                .with_number("PERatio", 35.0)
                .with_number("PercChange1D", -0.4),
            Security::new("XOM")
                .with_text("Sector", "Energy")
                .with_number("PERatio", 12.0),
            Security::new("GME")
                .with_text("Sector", "Consumer")
                .with_number("PERatio", 80.0),
        ]);
        let intraday = MemoryBarStore::from_bars(
            Granularity::Intraday,
            vec![
                Bar::new("AAPL", 2, 0.0, 0.0, 0.0, 202.0, 10.0),
                Bar::new("MSFT", 2, 0.0, 0.0, 0.0, 396.0, 10.0),
            ],
        );
        let daily = MemoryBarStore::from_bars(
            Granularity::Daily,
            vec![
                Bar::new("AAPL", 1, 0.0, 0.0, 0.0, 200.0, 5_000.0),
                Bar::new("MSFT", 1, 0.0, 0.0, 0.0, 400.0, 6_000.0),
            ],
        );
        let specs = MemorySpecStore::new(vec![
            FilterSpec::new("alice", "tech").with("Sector", json!(["Technology"])),
            FilterSpec::new("alice", "value").with("PE", json!([0, 30])),
            FilterSpec::new("alice", "bad").with("PE", json!([50, 10])),
        ]);
        let preferences = MemoryPreferenceStore::new(HashMap::from([(
            "alice".to_string(),
            UserPreferences {
                hidden_symbols: ["GME".to_string()].into_iter().collect(),
                columns: vec!["sector".into(), "pe".into()],
            },
        )]));

        // 2024-01-17 is a Wednesday
        let clock = FixedClock(Utc.with_ymd_and_hms(2024, 1, 17, hour, 0, 0).unwrap());
        let stores = Stores::new(
            Arc::new(securities),
            Arc::new(intraday),
            Arc::new(daily),
            Arc::new(specs),
            Arc::new(preferences),
        )
        .with_clock(Arc::new(clock));
        ScreenerService::new(stores, EngineSettings::default())
    }

    fn symbols<'a, I: IntoIterator<Item = &'a EnrichedSecurity>>(items: I) -> Vec<&'a str> {
        items.into_iter().map(|s| s.symbol.as_str()).collect()
    }

    #[tokio::test]
    async fn test_list_without_screener_hides_symbols() {
        let service = service_at(22);
        let request = PageRequest::new(1, 10, service.limits());
        let page = service.filter_and_list("alice", None, request).await.unwrap();

        assert_eq!(page.total_count, 3);
        assert_eq!(symbols(&page.data), vec!["AAPL", "MSFT", "XOM"]);
    }

    #[tokio::test]
    async fn test_list_screener_closed_session() {
        let service = service_at(22);
        assert_eq!(service.session_state(), SessionState::Closed);

        let request = PageRequest::new(1, 1, service.limits());
        let page = service
            .filter_and_list("alice", Some("tech"), request)
            .await
            .unwrap();

        assert_eq!(page.total_count, 2);
        assert_eq!(page.total_pages, 2);
        let first = &page.data[0];
        assert_eq!(first.symbol, "AAPL");
        assert_eq!(first.price, Some(202.0));
        assert_eq!(first.volume, Some(5_000.0));
        assert_eq!(first.percent_change, Some(1.2));
        assert_eq!(first.fields["sector"], "Technology");
        assert_eq!(first.fields["pe"], 28.0);

        let request = PageRequest::new(2, 1, service.limits());
        let page = service
            .filter_and_list("alice", Some("tech"), request)
            .await
            .unwrap();
        assert_eq!(symbols(&page.data), vec!["MSFT"]);
    }

    #[tokio::test]
    async fn test_list_screener_open_session() {
        let service = service_at(15);
        let request = PageRequest::new(1, 10, service.limits());
        let page = service
            .filter_and_list("alice", Some("tech"), request)
            .await
            .unwrap();

        let msft = &page.data[1];
        assert!(msft.volume.is_none());
        assert_eq!(msft.volume_note.as_deref(), Some(INTRADAY_VOLUME_NOTE));
        assert!((msft.percent_change.unwrap() + 0.01).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_unknown_user_or_screener() {
        let service = service_at(22);
        let request = PageRequest::new(1, 10, service.limits());

        let err = service.filter_and_list("bob", None, request).await.unwrap_err();
        assert!(matches!(err, ScreenerError::NotFound(_)));

        let err = service
            .filter_and_list("alice", Some("missing"), request)
            .await
            .unwrap_err();
        assert!(matches!(err, ScreenerError::NotFound(_)));

        let err = service.aggregate_all("bob", request).await.unwrap_err();
        assert!(matches!(err, ScreenerError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_inverted_range_is_invalid_spec() {
        let service = service_at(22);
        let request = PageRequest::new(1, 10, service.limits());
        let err = service
            .filter_and_list("alice", Some("bad"), request)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ScreenerError::InvalidSpec(FilterError::InvalidRange { .. })
        ));
    }

    #[tokio::test]
    async fn test_aggregate_all() {
        let service = service_at(22);
        let request = PageRequest::new(1, 2, service.limits());
        let page = service.aggregate_all("alice", request).await.unwrap();

        assert_eq!(page.total_count, 3);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.data[0].security.symbol, "AAPL");
        assert_eq!(page.data[0].screeners, vec!["tech", "value"]);
        assert_eq!(page.data[1].security.symbol, "MSFT");

        let request = PageRequest::new(2, 2, service.limits());
        let page = service.aggregate_all("alice", request).await.unwrap();
        assert_eq!(page.data[0].security.symbol, "XOM");
        assert_eq!(page.data[0].screeners, vec!["value"]);
    }

    #[tokio::test]
    async fn test_resolve_range_persists() {
        let service = service_at(22);
        let range = service
            .resolve_range("alice", "value", "PE", Some(20.0), None)
            .await
            .unwrap();
        assert_eq!(range, [20.0, 80.0]);

        let request = PageRequest::new(1, 10, service.limits());
        let page = service
            .filter_and_list("alice", Some("value"), request)
            .await
            .unwrap();
        assert_eq!(symbols(&page.data), vec!["AAPL", "MSFT"]);

        let err = service
            .resolve_range("alice", "nope", "PE", Some(1.0), None)
            .await
            .unwrap_err();
        assert!(matches!(err, ScreenerError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_distinct_and_explain() {
        let service = service_at(22);
        let sectors = service.distinct_values("Sector").await.unwrap();
        assert_eq!(sectors.len(), 3);
        assert!(sectors.contains("Energy"));

        let predicate = service.explain("alice", "value").await.unwrap();
        assert_eq!(predicate.clauses.len(), 1);
        assert!(predicate.excluded_symbols.contains("GME"));
    }
}
