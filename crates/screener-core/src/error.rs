//! Error types for the screener.

use thiserror::Error;

/// Top-level screener error.
#[derive(Error, Debug)]
pub enum ScreenerError {
    #[error("Invalid screener spec: {0}")]
    InvalidSpec(#[from] FilterError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Filter compilation and range resolution errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    #[error("Invalid range for {field}: min {min} must be less than max {max}")]
    InvalidRange { field: String, min: f64, max: f64 },

    #[error("Unknown filter field: {0}")]
    UnknownField(String),

    #[error("No bounds supplied for {0}")]
    MissingBounds(String),

    #[error("Field {0} does not take a numeric range")]
    NotResolvable(String),

    #[error("No values for {0} to resolve a bound against")]
    NoPopulation(String),
}

/// Collaborator store errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Lookup timed out after {millis}ms")]
    Timeout { millis: u64 },

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Data source error: {0}")]
    Internal(String),
}

/// Result type alias for screener operations.
pub type ScreenerResult<T> = Result<T, ScreenerError>;
