//! Core types and traits for the screener.
//!
//! This crate provides the foundational building blocks including:
//! - Market data types (Bar, Granularity)
//! - Security records, filter specs and the compiled Predicate AST
//! - Enriched and ranked result records, result pages
//! - The market session clock
//! - Collaborator traits for security, bar, filter spec and preference stores

pub mod error;
pub mod session;
pub mod traits;
pub mod types;

pub use error::{DataError, FilterError, ScreenerError, ScreenerResult};
pub use session::{MarketSession, SessionState};
pub use traits::*;
pub use types::*;
