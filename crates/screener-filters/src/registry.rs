//! Registry of supported filter fields.

use std::collections::BTreeMap;

use crate::field::{FieldDef, FieldKind, Source};

macro_rules! range {
    ($key:literal => $attr:literal) => {
        FieldDef {
            key: $key,
            kind: FieldKind::Range {
                source: Source::Attribute($attr),
            },
        }
    };
    ($key:literal => quarterly $name:literal) => {
        FieldDef {
            key: $key,
            kind: FieldKind::Range {
                source: Source::Quarterly($name),
            },
        }
    };
}

macro_rules! field {
    ($key:literal => score) => {
        FieldDef {
            key: $key,
            kind: FieldKind::Score { attribute: $key },
        }
    };
    ($key:literal => set) => {
        FieldDef {
            key: $key,
            kind: FieldKind::Set { attribute: $key },
        }
    };
    ($key:literal => ma $window:literal) => {
        FieldDef {
            key: $key,
            kind: FieldKind::MovingAverage { window: $window },
        }
    };
    ($key:literal => $kind:ident) => {
        FieldDef {
            key: $key,
            kind: FieldKind::$kind,
        }
    };
}

const FIELDS: &[FieldDef] = &[
    range!("MarketCap" => "MarketCapitalization"),
    range!("PE" => "PERatio"),
    range!("PEG" => "PEGRatio"),
    range!("EPS" => "EPS"),
    range!("PS" => "PriceToSalesRatioTTM"),
    range!("PB" => "PriceToBookRatio"),
    range!("Beta" => "Beta"),
    range!("DivYield" => "DividendYield"),
    range!("RevenueGrowth" => "QuarterlyRevenueGrowthYOY"),
    range!("EarningsGrowth" => "QuarterlyEarningsGrowthYOY"),
    range!("RelVolume1W" => "RelVolume1W"),
    range!("RelVolume1M" => "RelVolume1M"),
    range!("RelVolume4M" => "RelVolume4M"),
    range!("AvgVolume1W" => "AvgVolume1W"),
    range!("AvgVolume1M" => "AvgVolume1M"),
    range!("AvgVolume4M" => "AvgVolume4M"),
    range!("ADV1W" => "ADV1W"),
    range!("ADV1M" => "ADV1M"),
    range!("ADV4M" => "ADV4M"),
    range!("EV" => "EV"),
    range!("RSI" => "RSI"),
    range!("Gap" => "Gap"),
    range!("IntrinsicValue" => "IntrinsicValue"),
    range!("IPO" => "IPO"),
    range!("PercOffWeekHigh" => "PercOffWeekHigh"),
    range!("CurrentRatio" => quarterly "currentRatio"),
    range!("QuickRatio" => quarterly "quickRatio"),
    range!("ROE" => quarterly "roe"),
    range!("ROA" => quarterly "roa"),
    field!("RS1W" => score),
    field!("RS4W" => score),
    field!("RS13W" => score),
    field!("RS26W" => score),
    field!("RS52W" => score),
    field!("Sector" => set),
    field!("AssetType" => set),
    field!("Exchange" => set),
    field!("Country" => set),
    field!("MA10" => ma 10),
    field!("MA20" => ma 20),
    field!("MA50" => ma 50),
    field!("MA200" => ma 200),
    field!("CurrentPrice" => PriceVsAverage),
    field!("NewHigh" => NewHigh),
    field!("NewLow" => NewLow),
    field!("PercentChange" => PercentChange),
];

/// Registry of filter fields keyed by stored field name.
#[derive(Debug, Clone)]
pub struct FilterRegistry {
    fields: BTreeMap<&'static str, FieldDef>,
}

impl FilterRegistry {
    /// Create a registry with all built-in fields.
    pub fn new() -> Self {
        Self {
            fields: FIELDS.iter().map(|def| (def.key, *def)).collect(),
        }
    }

    /// List all fields, ordered by name.
    pub fn list(&self) -> Vec<&FieldDef> {
        self.fields.values().collect()
    }

    /// Get a field by name.
    pub fn get(&self, key: &str) -> Option<&FieldDef> {
        self.fields.get(key)
    }

    /// Check if a field exists.
    pub fn exists(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Get all field names.
    pub fn names(&self) -> Vec<&'static str> {
        self.fields.keys().copied().collect()
    }
}

impl Default for FilterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_list() {
        let registry = FilterRegistry::new();
        assert_eq!(registry.list().len(), FIELDS.len());
    }

    #[test]
    fn test_registry_get() {
        let registry = FilterRegistry::new();

        assert!(registry.get("MarketCap").is_some());
        assert!(registry.exists("RS52W"));
        assert!(registry.get("unknown").is_none());
    }

    #[test]
    fn test_quarterly_family() {
        let registry = FilterRegistry::new();
        let def = registry.get("CurrentRatio").unwrap();
        assert_eq!(
            def.kind,
            FieldKind::Range {
                source: Source::Quarterly("currentRatio")
            }
        );
    }

    #[test]
    fn test_field_kinds() {
        let registry = FilterRegistry::new();
        let kind = |key: &str| registry.get(key).unwrap().kind;

        assert_eq!(kind("RS4W"), FieldKind::Score { attribute: "RS4W" });
        assert_eq!(kind("Sector"), FieldKind::Set { attribute: "Sector" });
        assert_eq!(kind("MA200"), FieldKind::MovingAverage { window: 200 });
        assert_eq!(kind("CurrentPrice"), FieldKind::PriceVsAverage);
        assert_eq!(kind("NewLow"), FieldKind::NewLow);
    }

    #[test]
    fn test_keys_unique() {
        let registry = FilterRegistry::new();
        assert_eq!(registry.names().len(), FIELDS.len());
    }
}
