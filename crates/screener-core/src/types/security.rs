//! Security records and their attribute values.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::Bar;

/// A single stored attribute value.
///
/// Sentinel literals never reach this type: the storage-read boundary maps
/// them to an absent attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Number(f64),
    Flag(bool),
    Text(String),
}

impl AttrValue {
    /// Numeric view of the value, if it is a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttrValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// String view of the value, if it is text.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Convert into a JSON value for projection.
    pub fn to_json(&self) -> Value {
        match self {
            AttrValue::Number(n) => serde_json::Number::from_f64(*n)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            AttrValue::Flag(b) => Value::Bool(*b),
            AttrValue::Text(s) => Value::String(s.clone()),
        }
    }
}

/// Read a stored scalar as a number.
///
/// Numbers pass through, numeric strings are parsed, and the unset sentinels
/// (`"None"`, `"-"`, empty string, `null`) read as `None`. Non-finite values
/// read as `None`.
pub fn normalize_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() || s == "-" || s.eq_ignore_ascii_case("none") {
                return None;
            }
            s.parse::<f64>().ok()?
        }
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// One quarterly financials record.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QuarterlyRecord {
    /// Fiscal period label, e.g. `2024-Q3`
    pub period: String,
    /// Reported values keyed by storage name
    #[serde(default)]
    pub values: BTreeMap<String, f64>,
}

/// One tradable instrument.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Security {
    /// Unique symbol, the join key across all stores
    pub symbol: String,
    /// Fundamentals, categories and technicals keyed by storage name
    #[serde(default)]
    pub attributes: BTreeMap<String, AttrValue>,
    /// Quarterly financials, oldest first
    #[serde(default)]
    pub quarterly: Vec<QuarterlyRecord>,
    /// Historical daily bars, oldest first
    #[serde(default)]
    pub history: Vec<Bar>,
}

impl Security {
    /// Create an empty security record.
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            ..Default::default()
        }
    }

    /// Set a numeric attribute.
    pub fn with_number(mut self, name: &str, value: f64) -> Self {
        self.attributes
            .insert(name.to_string(), AttrValue::Number(value));
        self
    }

    /// Set a text attribute.
    pub fn with_text(mut self, name: &str, value: &str) -> Self {
        self.attributes
            .insert(name.to_string(), AttrValue::Text(value.to_string()));
        self
    }

    /// Append a quarterly record.
    pub fn with_quarter(mut self, record: QuarterlyRecord) -> Self {
        self.quarterly.push(record);
        self
    }

    /// Append a historical bar.
    pub fn with_bar(mut self, bar: Bar) -> Self {
        self.history.push(bar);
        self
    }

    /// Get an attribute value.
    pub fn attribute(&self, name: &str) -> Option<&AttrValue> {
        self.attributes.get(name)
    }

    /// Get a numeric attribute.
    pub fn number(&self, name: &str) -> Option<f64> {
        self.attributes.get(name).and_then(AttrValue::as_f64)
    }

    /// Get a text attribute.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).and_then(AttrValue::as_str)
    }

    /// Value of a quarterly field from the most recent record.
    pub fn latest_quarterly(&self, name: &str) -> Option<f64> {
        self.quarterly.last()?.values.get(name).copied()
    }

    /// Close of the most recent historical bar.
    pub fn latest_close(&self) -> Option<f64> {
        self.history.last().map(|b| b.close)
    }
}
