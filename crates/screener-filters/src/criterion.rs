//! Reading stored criterion values.
//!
//! Stored criteria come from a less-trusted mutation path. Everything here
//! reads leniently: a value that cannot be understood is logged and treated
//! as unset so the rest of the screener still compiles.

use screener_core::normalize_number;
use serde_json::Value;
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Outcome of reading a stored numeric range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RangeRead {
    /// No constraint
    Unset,
    /// Both bounds present
    Bounds { min: f64, max: f64 },
}

/// Read a stored `[min, max]` range.
///
/// `[0, 0]` is the stored "unset" sentinel. Anything that is not a pair of
/// numbers is malformed and also reads as unset.
pub fn read_range(field: &str, value: &Value) -> RangeRead {
    let pair = match value {
        Value::Null => return RangeRead::Unset,
        Value::Array(items) if items.len() == 2 => (&items[0], &items[1]),
        other => {
            warn!(field, value = %other, "Malformed stored range, ignoring");
            return RangeRead::Unset;
        }
    };

    match (normalize_number(pair.0), normalize_number(pair.1)) {
        (Some(min), Some(max)) if min == 0.0 && max == 0.0 => {
            debug!(field, "Zero-zero range treated as unset");
            RangeRead::Unset
        }
        (Some(min), Some(max)) => RangeRead::Bounds { min, max },
        _ => {
            warn!(field, value = %value, "Non-numeric range bound, ignoring");
            RangeRead::Unset
        }
    }
}

/// Read a stored categorical set.
///
/// A bare string counts as a one-element set. Non-string members are skipped.
pub fn read_set(field: &str, value: &Value) -> BTreeSet<String> {
    match value {
        Value::String(s) if !s.is_empty() => [s.clone()].into_iter().collect(),
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) if !s.is_empty() => Some(s.clone()),
                other => {
                    warn!(field, value = %other, "Skipping non-string set member");
                    None
                }
            })
            .collect(),
        Value::Null | Value::String(_) => BTreeSet::new(),
        other => {
            warn!(field, value = %other, "Malformed stored set, ignoring");
            BTreeSet::new()
        }
    }
}

/// Read a stored mode tag.
pub fn read_mode<'a>(field: &str, value: &'a Value) -> Option<&'a str> {
    match value {
        Value::String(s) => Some(s.trim()),
        Value::Null => None,
        other => {
            warn!(field, value = %other, "Malformed stored mode, ignoring");
            None
        }
    }
}

/// Read a stored percent-change criterion into its window tag and range.
///
/// Accepts `{"window": tag, "range": [min, max]}` or `[min, max, tag]`.
pub fn read_windowed_range<'a>(field: &str, value: &'a Value) -> Option<(&'a str, RangeRead)> {
    match value {
        Value::Object(map) => {
            let window = map.get("window").and_then(Value::as_str)?;
            let range = map
                .get("range")
                .map(|r| read_range(field, r))
                .unwrap_or(RangeRead::Unset);
            Some((window.trim(), range))
        }
        Value::Array(items) if items.len() == 3 => {
            let window = items[2].as_str()?;
            let range = read_range(field, &Value::Array(items[..2].to_vec()));
            Some((window.trim(), range))
        }
        Value::Null => None,
        other => {
            warn!(field, value = %other, "Malformed percent change criterion, ignoring");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_zero_zero_is_unset() {
        assert_eq!(read_range("PE", &json!([0, 0])), RangeRead::Unset);
        assert_eq!(read_range("PE", &json!([0.0, "0"])), RangeRead::Unset);
    }

    #[test]
    fn test_bounds() {
        assert_eq!(
            read_range("PE", &json!([0, 25])),
            RangeRead::Bounds { min: 0.0, max: 25.0 }
        );
        assert_eq!(
            read_range("PE", &json!(["5", 25])),
            RangeRead::Bounds { min: 5.0, max: 25.0 }
        );
    }

    #[test]
    fn test_malformed_range_is_unset() {
        assert_eq!(read_range("PE", &json!(["abc", 25])), RangeRead::Unset);
        assert_eq!(read_range("PE", &json!(["None", 25])), RangeRead::Unset);
        assert_eq!(read_range("PE", &json!([1, 2, 3])), RangeRead::Unset);
        assert_eq!(read_range("PE", &json!("10-20")), RangeRead::Unset);
        assert_eq!(read_range("PE", &json!({"min": 1})), RangeRead::Unset);
    }

    #[test]
    fn test_read_set() {
        let set = read_set("Sector", &json!(["Technology", 3, "", "Energy"]));
        assert_eq!(set.len(), 2);
        assert!(set.contains("Energy"));

        assert_eq!(read_set("Sector", &json!("Utilities")).len(), 1);
        assert!(read_set("Sector", &json!([])).is_empty());
        assert!(read_set("Sector", &json!(7)).is_empty());
    }

    #[test]
    fn test_read_windowed_range() {
        let tagged = json!({"window": "1W", "range": [1, 5]});
        let (window, range) = read_windowed_range("PercentChange", &tagged).unwrap();
        assert_eq!(window, "1W");
        assert_eq!(range, RangeRead::Bounds { min: 1.0, max: 5.0 });

        let positional = json!([0, 0, "YTD"]);
        let (window, range) = read_windowed_range("PercentChange", &positional).unwrap();
        assert_eq!(window, "YTD");
        assert_eq!(range, RangeRead::Unset);

        assert!(read_windowed_range("PercentChange", &json!({"range": [1, 5]})).is_none());
    }
}
