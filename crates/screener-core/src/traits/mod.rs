//! Core traits for the screener.

mod clock;
mod store;

pub use clock::{Clock, FixedClock, SystemClock};
pub use store::{BarStore, Extremum, FilterSpecStore, PreferenceStore, SecurityStore, Window};
