//! Bar granularity definitions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Granularity of a bar store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Granularity {
    /// Minute bars
    #[serde(rename = "1m")]
    Intraday,
    /// Daily bars
    #[serde(rename = "1d")]
    #[default]
    Daily,
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Granularity::Intraday => "1m",
            Granularity::Daily => "1d",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_granularity_display() {
        assert_eq!(Granularity::Intraday.to_string(), "1m");
        assert_eq!(Granularity::Daily.to_string(), "1d");
    }
}
