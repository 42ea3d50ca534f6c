//! Storage-agnostic predicate AST.
//!
//! A compiled screener is a conjunction of [`Clause`]s plus a set of excluded
//! symbols. Clauses compare [`Operand`]s, which resolve against a
//! [`Security`] to an optional scalar. A clause whose operand cannot be
//! resolved does not match.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::Security;

/// A scalar reference resolved against a security.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "ref", content = "name", rename_all = "snake_case")]
pub enum Operand {
    /// Stored numeric attribute
    Attribute(String),
    /// Field of the most recent quarterly financials record
    Quarterly(String),
    /// Close of the most recent historical bar
    LatestClose,
}

impl Operand {
    /// Resolve the operand for a security.
    pub fn resolve(&self, security: &Security) -> Option<f64> {
        match self {
            Operand::Attribute(name) => security.number(name),
            Operand::Quarterly(name) => security.latest_quarterly(name),
            Operand::LatestClose => security.latest_close(),
        }
    }
}

/// Binary comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    Gt,
    Ge,
    Lt,
    Le,
}

impl Comparison {
    /// Apply the comparison.
    #[inline]
    pub fn apply(&self, left: f64, right: f64) -> bool {
        match self {
            Comparison::Gt => left > right,
            Comparison::Ge => left >= right,
            Comparison::Lt => left < right,
            Comparison::Le => left <= right,
        }
    }
}

/// One compiled condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Clause {
    /// `min < v < max`, or `min <= v <= max` when inclusive
    Between {
        operand: Operand,
        min: f64,
        max: f64,
        inclusive: bool,
    },
    /// Text attribute is one of `values`
    In {
        attribute: String,
        values: BTreeSet<String>,
    },
    /// `left cmp right`
    Compare {
        left: Operand,
        cmp: Comparison,
        right: Operand,
    },
}

impl Clause {
    /// Evaluate the clause against a security.
    pub fn matches(&self, security: &Security) -> bool {
        match self {
            Clause::Between {
                operand,
                min,
                max,
                inclusive,
            } => match operand.resolve(security) {
                Some(v) if *inclusive => *min <= v && v <= *max,
                Some(v) => *min < v && v < *max,
                None => false,
            },
            Clause::In { attribute, values } => security
                .text(attribute)
                .is_some_and(|v| values.contains(v)),
            Clause::Compare { left, cmp, right } => {
                match (left.resolve(security), right.resolve(security)) {
                    (Some(l), Some(r)) => cmp.apply(l, r),
                    _ => false,
                }
            }
        }
    }
}

/// A compiled screener: all clauses must hold and the symbol must not be
/// excluded.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Predicate {
    /// Conjoined clauses
    pub clauses: Vec<Clause>,
    /// Symbols that never match
    pub excluded_symbols: BTreeSet<String>,
}

impl Predicate {
    /// A predicate matching every security.
    pub fn match_all() -> Self {
        Self::default()
    }

    /// Exclude the given symbols.
    pub fn excluding(mut self, symbols: impl IntoIterator<Item = String>) -> Self {
        self.excluded_symbols.extend(symbols);
        self
    }

    /// Add a clause.
    pub fn push(&mut self, clause: Clause) {
        self.clauses.push(clause);
    }

    /// Whether the predicate has no clauses.
    pub fn is_unconstrained(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Evaluate the predicate against a security.
    pub fn matches(&self, security: &Security) -> bool {
        !self.excluded_symbols.contains(&security.symbol)
            && self.clauses.iter().all(|c| c.matches(security))
    }
}
