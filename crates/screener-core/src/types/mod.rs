//! Core data types for the screener.

mod bar;
mod enriched;
mod filter_spec;
mod granularity;
mod page;
mod predicate;
mod security;

pub use bar::Bar;
pub use enriched::{EnrichedSecurity, RankedSecurity, INTRADAY_VOLUME_NOTE};
pub use filter_spec::{FilterSpec, UserPreferences};
pub use granularity::Granularity;
pub use page::{total_pages, Page};
pub use predicate::{Clause, Comparison, Operand, Predicate};
pub use security::{normalize_number, AttrValue, QuarterlyRecord, Security};
