//! Projection of security records onto user-selected columns.

use screener_core::Security;
use serde_json::{Map, Value};
use tracing::debug;

/// Stored attribute carrying the static daily percent change.
pub const STORED_PERCENT_CHANGE: &str = "PercChange1D";

/// Where a column's value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnSource {
    /// Stored attribute
    Attribute(&'static str),
    /// Most recent quarterly financials record, null if absent
    Quarterly(&'static str),
    /// Filled by enrichment, never read from storage
    Overlay,
}

/// User-facing column key to its source.
const COLUMNS: &[(&str, ColumnSource)] = &[
    ("symbol", ColumnSource::Overlay),
    ("price", ColumnSource::Overlay),
    ("volume", ColumnSource::Overlay),
    ("percentChange", ColumnSource::Overlay),
    ("name", ColumnSource::Attribute("Name")),
    ("sector", ColumnSource::Attribute("Sector")),
    ("industry", ColumnSource::Attribute("Industry")),
    ("assetType", ColumnSource::Attribute("AssetType")),
    ("exchange", ColumnSource::Attribute("Exchange")),
    ("country", ColumnSource::Attribute("Country")),
    ("marketCap", ColumnSource::Attribute("MarketCapitalization")),
    ("pe", ColumnSource::Attribute("PERatio")),
    ("peg", ColumnSource::Attribute("PEGRatio")),
    ("eps", ColumnSource::Attribute("EPS")),
    ("ps", ColumnSource::Attribute("PriceToSalesRatioTTM")),
    ("pb", ColumnSource::Attribute("PriceToBookRatio")),
    ("beta", ColumnSource::Attribute("Beta")),
    ("dividendYield", ColumnSource::Attribute("DividendYield")),
    ("revenueGrowth", ColumnSource::Attribute("QuarterlyRevenueGrowthYOY")),
    ("earningsGrowth", ColumnSource::Attribute("QuarterlyEarningsGrowthYOY")),
    ("ev", ColumnSource::Attribute("EV")),
    ("rsi", ColumnSource::Attribute("RSI")),
    ("gap", ColumnSource::Attribute("Gap")),
    ("intrinsicValue", ColumnSource::Attribute("IntrinsicValue")),
    ("ipo", ColumnSource::Attribute("IPO")),
    ("ma10", ColumnSource::Attribute("MA10")),
    ("ma20", ColumnSource::Attribute("MA20")),
    ("ma50", ColumnSource::Attribute("MA50")),
    ("ma200", ColumnSource::Attribute("MA200")),
    ("weekHigh52", ColumnSource::Attribute("WeekHigh52")),
    ("weekLow52", ColumnSource::Attribute("WeekLow52")),
    ("allTimeHigh", ColumnSource::Attribute("AllTimeHigh")),
    ("allTimeLow", ColumnSource::Attribute("AllTimeLow")),
    ("percOffWeekHigh", ColumnSource::Attribute("PercOffWeekHigh")),
    ("relVolume1w", ColumnSource::Attribute("RelVolume1W")),
    ("relVolume1m", ColumnSource::Attribute("RelVolume1M")),
    ("relVolume4m", ColumnSource::Attribute("RelVolume4M")),
    ("avgVolume1w", ColumnSource::Attribute("AvgVolume1W")),
    ("avgVolume1m", ColumnSource::Attribute("AvgVolume1M")),
    ("avgVolume4m", ColumnSource::Attribute("AvgVolume4M")),
    ("adv1w", ColumnSource::Attribute("ADV1W")),
    ("adv1m", ColumnSource::Attribute("ADV1M")),
    ("adv4m", ColumnSource::Attribute("ADV4M")),
    ("rs1w", ColumnSource::Attribute("RS1W")),
    ("rs4w", ColumnSource::Attribute("RS4W")),
    ("rs13w", ColumnSource::Attribute("RS13W")),
    ("rs26w", ColumnSource::Attribute("RS26W")),
    ("rs52w", ColumnSource::Attribute("RS52W")),
    ("percChange1w", ColumnSource::Attribute("PercChange1W")),
    ("percChange1m", ColumnSource::Attribute("PercChange1M")),
    ("percChange4m", ColumnSource::Attribute("PercChange4M")),
    ("percChange6m", ColumnSource::Attribute("PercChange6M")),
    ("percChange1y", ColumnSource::Attribute("PercChange1Y")),
    ("percChangeYtd", ColumnSource::Attribute("PercChangeYTD")),
    ("freeCashFlow", ColumnSource::Quarterly("freeCashFlow")),
    ("cash", ColumnSource::Quarterly("cash")),
    ("currentDebt", ColumnSource::Quarterly("currentDebt")),
    ("currentAssets", ColumnSource::Quarterly("currentAssets")),
    ("currentLiabilities", ColumnSource::Quarterly("currentLiabilities")),
    ("currentRatio", ColumnSource::Quarterly("currentRatio")),
    ("roe", ColumnSource::Quarterly("roe")),
    ("roa", ColumnSource::Quarterly("roa")),
];

/// A security reduced to its projected columns.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedSecurity {
    /// Symbol
    pub symbol: String,
    /// Projected columns in selection order
    pub fields: Map<String, Value>,
    /// Stored daily percent change, reported while the session is closed
    pub stored_percent_change: Option<f64>,
}

/// An ordered column selection.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Projection {
    columns: Vec<(String, ColumnSource)>,
}

impl Projection {
    /// Build a projection from user column keys. Unknown keys are dropped and
    /// repeated keys kept once.
    pub fn from_columns<S: AsRef<str>>(keys: &[S]) -> Self {
        let mut columns: Vec<(String, ColumnSource)> = Vec::with_capacity(keys.len());
        for key in keys {
            let key = key.as_ref();
            match COLUMNS.iter().find(|(k, _)| *k == key) {
                Some((_, source)) => {
                    if !columns.iter().any(|(k, _)| k == key) {
                        columns.push((key.to_string(), *source));
                    }
                }
                None => debug!(column = key, "Dropping unknown column"),
            }
        }
        Self { columns }
    }

    /// Selected columns.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(k, _)| k.as_str())
    }

    /// Project one security.
    pub fn apply(&self, security: &Security) -> ProjectedSecurity {
        let mut fields = Map::new();
        for (key, source) in &self.columns {
            let value = match source {
                ColumnSource::Overlay => continue,
                ColumnSource::Attribute(name) => security
                    .attribute(name)
                    .map(|v| v.to_json())
                    .unwrap_or(Value::Null),
                ColumnSource::Quarterly(name) => security
                    .latest_quarterly(name)
                    .and_then(serde_json::Number::from_f64)
                    .map(Value::Number)
                    .unwrap_or(Value::Null),
            };
            fields.insert(key.clone(), value);
        }

        ProjectedSecurity {
            symbol: security.symbol.clone(),
            fields,
            stored_percent_change: security.number(STORED_PERCENT_CHANGE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use screener_core::QuarterlyRecord;

    fn security() -> Security {
        let mut q1 = QuarterlyRecord::default();
        q1.values.insert("cash".into(), 10.0);
        let mut q2 = QuarterlyRecord::default();
        q2.values.insert("roe".into(), 0.25);
        Security::new("AAPL")
            .with_text("Sector", "Technology")
            .with_number("PERatio", 28.0)
            .with_number("Price", 1.0)
            .with_number(STORED_PERCENT_CHANGE, 1.5)
            .with_quarter(q1)
            .with_quarter(q2)
    }

    #[test]
    fn test_unknown_columns_dropped() {
        let projection = Projection::from_columns(&["sector", "bogus", "pe", "sector"]);
        let cols: Vec<_> = projection.columns().collect();
        assert_eq!(cols, vec!["sector", "pe"]);
    }

    #[test]
    fn test_apply() {
        let projection =
            Projection::from_columns(&["pe", "sector", "beta", "price", "volume", "roe", "cash"]);
        let projected = projection.apply(&security());

        assert_eq!(projected.fields["pe"], 28.0);
        assert_eq!(projected.fields["sector"], "Technology");
        assert!(projected.fields["beta"].is_null());
        assert!(!projected.fields.contains_key("price"));
        assert!(!projected.fields.contains_key("volume"));
        assert_eq!(projected.fields["roe"], 0.25);
        // cash is only in an older quarter
        assert!(projected.fields["cash"].is_null());
        assert_eq!(projected.stored_percent_change, Some(1.5));

        let keys: Vec<_> = projected.fields.keys().cloned().collect();
        assert_eq!(keys, vec!["pe", "sector", "beta", "roe", "cash"]);
    }
}
