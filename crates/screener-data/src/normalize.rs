//! Normalization of raw stored security records.

use chrono::NaiveDate;
use screener_core::{normalize_number, AttrValue, Bar, DataError, QuarterlyRecord, Security};
use serde_json::{Map, Value};
use tracing::warn;

/// Attributes stored as dates and kept as epoch milliseconds.
const DATE_ATTRIBUTES: &[&str] = &["IPO"];

/// Normalize one stored scalar.
///
/// Returns `None` for unset sentinels, nulls and nested values.
pub fn normalize_value(name: &str, value: &Value) -> Option<AttrValue> {
    if DATE_ATTRIBUTES.contains(&name) {
        if let Some(s) = value.as_str() {
            return match NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d") {
                Ok(d) => d
                    .and_hms_opt(0, 0, 0)
                    .map(|dt| AttrValue::Number(dt.and_utc().timestamp_millis() as f64)),
                Err(_) => normalize_number(value).map(AttrValue::Number),
            };
        }
    }

    match value {
        Value::Bool(b) => Some(AttrValue::Flag(*b)),
        Value::Number(_) => normalize_number(value).map(AttrValue::Number),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() || trimmed == "-" || trimmed.eq_ignore_ascii_case("none") {
                None
            } else if let Some(n) = normalize_number(value) {
                Some(AttrValue::Number(n))
            } else {
                Some(AttrValue::Text(trimmed.to_string()))
            }
        }
        _ => None,
    }
}

/// Normalize one raw stored security document.
///
/// `symbol` is required. `quarterly` and `history` are read as time series;
/// every other key becomes an attribute.
pub fn normalize_security(raw: &Map<String, Value>) -> Result<Security, DataError> {
    let symbol = raw
        .get("symbol")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| DataError::ParseError("security record without symbol".into()))?;

    let mut security = Security::new(symbol);

    for (key, value) in raw {
        match key.as_str() {
            "symbol" => {}
            "quarterly" => security.quarterly = quarterly_series(symbol, value),
            "history" => security.history = history_series(symbol, value),
            _ => {
                if let Some(attr) = normalize_value(key, value) {
                    security.attributes.insert(key.clone(), attr);
                }
            }
        }
    }

    Ok(security)
}

fn quarterly_series(symbol: &str, value: &Value) -> Vec<QuarterlyRecord> {
    let Some(items) = value.as_array() else {
        warn!(symbol, "Quarterly series is not an array, ignoring");
        return Vec::new();
    };

    items
        .iter()
        .filter_map(Value::as_object)
        .map(|item| QuarterlyRecord {
            period: item
                .get("period")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            values: item
                .get("values")
                .and_then(Value::as_object)
                .map(|values| {
                    values
                        .iter()
                        .filter_map(|(k, v)| normalize_number(v).map(|n| (k.clone(), n)))
                        .collect()
                })
                .unwrap_or_default(),
        })
        .collect()
}

fn history_series(symbol: &str, value: &Value) -> Vec<Bar> {
    let Some(items) = value.as_array() else {
        warn!(symbol, "History series is not an array, ignoring");
        return Vec::new();
    };

    let mut bars: Vec<Bar> = items
        .iter()
        .filter_map(Value::as_object)
        .filter_map(|item| {
            let num = |k: &str| item.get(k).and_then(normalize_number);
            let timestamp = item.get("timestamp").and_then(Value::as_i64)?;
            let close = num("close")?;
            Some(Bar::new(
                symbol,
                timestamp,
                num("open").unwrap_or(close),
                num("high").unwrap_or(close),
                num("low").unwrap_or(close),
                close,
                num("volume").unwrap_or_default(),
            ))
        })
        .collect();

    bars.sort_by_key(|b| b.timestamp);
    bars
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_sentinels_become_absent() {
        let sec = normalize_security(&raw(json!({
            "symbol": "AAPL",
            "PERatio": "None",
            "PEGRatio": "-",
            "Beta": "1.2",
            "Sector": "Technology",
            "MarketCapitalization": 2.5e12,
            "Shortable": true
        })))
        .unwrap();

        assert!(sec.attribute("PERatio").is_none());
        assert!(sec.attribute("PEGRatio").is_none());
        assert_eq!(sec.number("Beta"), Some(1.2));
        assert_eq!(sec.text("Sector"), Some("Technology"));
        assert_eq!(sec.number("MarketCapitalization"), Some(2.5e12));
        assert_eq!(sec.attribute("Shortable"), Some(&AttrValue::Flag(true)));
    }

    #[test]
    fn test_ipo_date_is_epoch_millis() {
        let sec = normalize_security(&raw(json!({"symbol": "X", "IPO": "1970-01-02"}))).unwrap();
        assert_eq!(sec.number("IPO"), Some(86_400_000.0));
    }

    #[test]
    fn test_series() {
        let sec = normalize_security(&raw(json!({
            "symbol": "X",
            "quarterly": [
                {"period": "2024-Q1", "values": {"roe": "0.1", "cash": "None"}},
                {"period": "2024-Q2", "values": {"roe": 0.2}}
            ],
            "history": [
                {"timestamp": 2, "close": 11.0},
                {"timestamp": 1, "close": 10.0, "volume": 500}
            ]
        })))
        .unwrap();

        assert_eq!(sec.quarterly.len(), 2);
        assert!(sec.quarterly[0].values.get("cash").is_none());
        assert_eq!(sec.latest_quarterly("roe"), Some(0.2));
        assert_eq!(sec.latest_close(), Some(11.0));
        assert_eq!(sec.history[0].volume, 500.0);
    }

    #[test]
    fn test_symbol_required() {
        assert!(normalize_security(&raw(json!({"PERatio": 3}))).is_err());
    }
}
