//! Query execution, enrichment and aggregation for screeners.

mod aggregator;
mod enricher;
mod executor;
mod paginator;
mod projection;
mod service;

pub use aggregator::ResultAggregator;
pub use enricher::PriceVolumeEnricher;
pub use executor::SecurityQueryExecutor;
pub use paginator::{paginate, PageLimits, PageRequest, MAX_PAGE_SIZE};
pub use projection::{ColumnSource, ProjectedSecurity, Projection, STORED_PERCENT_CHANGE};
pub use service::{EngineSettings, ScreenerService, Stores};
