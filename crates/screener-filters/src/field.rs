//! Filter field definitions.
//!
//! Each field is a tagged variant that knows how to compile its own stored
//! value into at most one [`Clause`].

use screener_core::{Clause, Comparison, FilterError, Operand};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::criterion::{read_mode, read_range, read_set, read_windowed_range, RangeRead};

/// Moving-average windows with a stored `MA<n>` attribute.
pub const MA_WINDOWS: [u32; 4] = [10, 20, 50, 200];

/// Percent-change window tags and the attribute each selects.
pub const PERCENT_CHANGE_WINDOWS: [(&str, &str); 7] = [
    ("1D", "PercChange1D"),
    ("1W", "PercChange1W"),
    ("1M", "PercChange1M"),
    ("4M", "PercChange4M"),
    ("6M", "PercChange6M"),
    ("1Y", "PercChange1Y"),
    ("YTD", "PercChangeYTD"),
];

const SCORE_FLOOR: f64 = 1.0;
const SCORE_CEILING: f64 = 100.0;

/// Where a range field reads its value from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "from", content = "name", rename_all = "snake_case")]
pub enum Source {
    /// Stored attribute
    Attribute(&'static str),
    /// Most recent quarterly financials record
    Quarterly(&'static str),
}

impl Source {
    /// The operand this source resolves through.
    pub fn operand(&self) -> Operand {
        match self {
            Source::Attribute(name) => Operand::Attribute((*name).to_string()),
            Source::Quarterly(name) => Operand::Quarterly((*name).to_string()),
        }
    }
}

/// How a field's stored value compiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldKind {
    /// `[min, max]`, strict on both ends
    Range { source: Source },
    /// Relative-strength score, inclusive and clamped to `[1, 100]`
    Score { attribute: &'static str },
    /// Set membership on a text attribute
    Set { attribute: &'static str },
    /// `MA<window>` against the latest close or another MA
    MovingAverage { window: u32 },
    /// Latest close against an MA
    PriceVsAverage,
    /// Latest close at or above a stored high
    NewHigh,
    /// Latest close at or below a stored low
    NewLow,
    /// Strict range on the attribute selected by a window tag
    PercentChange,
}

/// One registered filter field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldDef {
    /// Field name as stored in a screener spec
    pub key: &'static str,
    /// How the field compiles
    #[serde(flatten)]
    pub kind: FieldKind,
}

impl FieldDef {
    /// Operand a numeric range on this field constrains, if any.
    pub fn range_operand(&self) -> Option<Operand> {
        match self.kind {
            FieldKind::Range { source } => Some(source.operand()),
            FieldKind::Score { attribute } => Some(Operand::Attribute(attribute.to_string())),
            _ => None,
        }
    }

    /// Compile a stored value.
    ///
    /// `Ok(None)` means the value imposes no constraint.
    pub fn compile(&self, value: &Value) -> Result<Option<Clause>, FilterError> {
        match self.kind {
            FieldKind::Range { source } => {
                self.strict_range(source.operand(), read_range(self.key, value))
            }
            FieldKind::Score { attribute } => match read_range(self.key, value) {
                RangeRead::Unset => Ok(None),
                RangeRead::Bounds { min, max } => {
                    self.check_order(min, max)?;
                    Ok(Some(Clause::Between {
                        operand: Operand::Attribute(attribute.to_string()),
                        min: min.max(SCORE_FLOOR),
                        max: max.min(SCORE_CEILING),
                        inclusive: true,
                    }))
                }
            },
            FieldKind::Set { attribute } => {
                let values = read_set(self.key, value);
                if values.is_empty() {
                    return Ok(None);
                }
                Ok(Some(Clause::In {
                    attribute: attribute.to_string(),
                    values,
                }))
            }
            FieldKind::MovingAverage { window } => {
                Ok(read_mode(self.key, value).and_then(|mode| self.moving_average(window, mode)))
            }
            FieldKind::PriceVsAverage => Ok(read_mode(self.key, value).and_then(|mode| {
                let (cmp, other) = self.direction(mode)?;
                Some(Clause::Compare {
                    left: Operand::LatestClose,
                    cmp,
                    right: ma_operand(other.parse().ok()?)?,
                })
            })),
            FieldKind::NewHigh => Ok(read_mode(self.key, value).and_then(|mode| {
                let attribute = match mode {
                    "52-week" => "WeekHigh52",
                    "all-time" => "AllTimeHigh",
                    _ => return self.unknown_mode(mode),
                };
                Some(Clause::Compare {
                    left: Operand::LatestClose,
                    cmp: Comparison::Ge,
                    right: Operand::Attribute(attribute.to_string()),
                })
            })),
            FieldKind::NewLow => Ok(read_mode(self.key, value).and_then(|mode| {
                let attribute = match mode {
                    "52-week" => "WeekLow52",
                    "all-time" => "AllTimeLow",
                    _ => return self.unknown_mode(mode),
                };
                Some(Clause::Compare {
                    left: Operand::LatestClose,
                    cmp: Comparison::Le,
                    right: Operand::Attribute(attribute.to_string()),
                })
            })),
            FieldKind::PercentChange => {
                let Some((window, range)) = read_windowed_range(self.key, value) else {
                    return Ok(None);
                };
                let attribute = PERCENT_CHANGE_WINDOWS
                    .iter()
                    .find(|(tag, _)| tag.eq_ignore_ascii_case(window))
                    .map(|(_, attribute)| *attribute);
                match attribute {
                    Some(attribute) => {
                        self.strict_range(Operand::Attribute(attribute.to_string()), range)
                    }
                    None => Ok(self.unknown_mode(window)),
                }
            }
        }
    }

    fn strict_range(
        &self,
        operand: Operand,
        range: RangeRead,
    ) -> Result<Option<Clause>, FilterError> {
        match range {
            RangeRead::Unset => Ok(None),
            RangeRead::Bounds { min, max } => {
                self.check_order(min, max)?;
                Ok(Some(Clause::Between {
                    operand,
                    min,
                    max,
                    inclusive: false,
                }))
            }
        }
    }

    fn check_order(&self, min: f64, max: f64) -> Result<(), FilterError> {
        if min >= max {
            return Err(FilterError::InvalidRange {
                field: self.key.to_string(),
                min,
                max,
            });
        }
        Ok(())
    }

    fn moving_average(&self, window: u32, mode: &str) -> Option<Clause> {
        let (cmp, other) = self.direction(mode)?;
        let right = if other == "price" {
            Operand::LatestClose
        } else {
            let other: u32 = other.parse().ok()?;
            if other == window {
                return self.unknown_mode(mode);
            }
            ma_operand(other)?
        };
        Some(Clause::Compare {
            left: ma_operand(window)?,
            cmp,
            right,
        })
    }

    /// Split `above-<x>` / `below-<x>` into a comparison and `<x>`.
    fn direction<'m>(&self, mode: &'m str) -> Option<(Comparison, &'m str)> {
        let parsed = if let Some(rest) = mode.strip_prefix("above-") {
            Some((Comparison::Gt, rest))
        } else {
            mode.strip_prefix("below-").map(|rest| (Comparison::Lt, rest))
        };
        match parsed {
            Some((cmp, rest)) if rest == "price" || rest.parse::<u32>().is_ok() => Some((cmp, rest)),
            _ => self.unknown_mode(mode),
        }
    }

    fn unknown_mode<T>(&self, mode: &str) -> Option<T> {
        debug!(field = self.key, mode, "Unrecognized mode, no clause");
        None
    }
}

fn ma_operand(window: u32) -> Option<Operand> {
    MA_WINDOWS
        .contains(&window)
        .then(|| Operand::Attribute(format!("MA{}", window)))
}
