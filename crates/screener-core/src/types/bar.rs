//! OHLCV (Open, High, Low, Close, Volume) bar records.

use serde::{Deserialize, Serialize};

/// One bar from the intraday or daily store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Symbol the bar belongs to
    pub symbol: String,
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
    /// Opening price
    pub open: f64,
    /// Highest price
    pub high: f64,
    /// Lowest price
    pub low: f64,
    /// Closing price
    pub close: f64,
    /// Trading volume
    pub volume: f64,
}

impl Bar {
    /// Create a new bar.
    pub fn new(
        symbol: impl Into<String>,
        timestamp: i64,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Fractional change of this bar's close against a reference close.
    ///
    /// Returns `None` when the reference is zero or not finite.
    pub fn change_from(&self, reference_close: f64) -> Option<f64> {
        if reference_close == 0.0 || !reference_close.is_finite() {
            return None;
        }
        Some((self.close - reference_close) / reference_close)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_from() {
        let bar = Bar::new("AAPL", 1000, 100.0, 106.0, 99.0, 105.0, 1_000.0);

        assert!((bar.change_from(100.0).unwrap() - 0.05).abs() < 1e-12);
        assert!(bar.change_from(0.0).is_none());
        assert!(bar.change_from(f64::NAN).is_none());
    }
}
