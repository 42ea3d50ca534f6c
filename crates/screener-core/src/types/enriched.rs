//! Enriched result records.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Note attached to volume while the session is open.
pub const INTRADAY_VOLUME_NOTE: &str = "intraday volume unavailable, final volume after close";

/// A security projected to the user's columns, with live figures overlaid.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedSecurity {
    /// Symbol
    pub symbol: String,
    /// Projected columns keyed by user-facing name
    #[serde(flatten)]
    pub fields: Map<String, Value>,
    /// Latest intraday close
    pub price: Option<f64>,
    /// Latest daily volume; null while the session is open
    pub volume: Option<f64>,
    /// Explains a null volume
    pub volume_note: Option<String>,
    /// Fractional change against the prior daily close
    pub percent_change: Option<f64>,
}

/// An aggregate-view record with the screeners that matched it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedSecurity {
    #[serde(flatten)]
    pub security: EnrichedSecurity,
    /// Names of the screeners whose result sets contained the symbol
    pub screeners: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialized_shape() {
        let mut fields = Map::new();
        fields.insert("sector".into(), Value::String("Technology".into()));
        let record = EnrichedSecurity {
            symbol: "AAPL".into(),
            fields,
            price: Some(101.5),
            volume: None,
            volume_note: Some(INTRADAY_VOLUME_NOTE.into()),
            percent_change: None,
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["symbol"], "AAPL");
        assert_eq!(json["sector"], "Technology");
        assert_eq!(json["volumeNote"], INTRADAY_VOLUME_NOTE);
        assert!(json["volume"].is_null());
        assert!(json["percentChange"].is_null());
    }
}
