//! Screener compiler.

use screener_core::{FilterError, FilterSpec, Predicate};
use std::collections::BTreeSet;
use tracing::debug;

use crate::registry::FilterRegistry;

/// Compiles stored screener specs into predicates.
#[derive(Debug, Clone, Default)]
pub struct FilterCompiler {
    registry: FilterRegistry,
}

impl FilterCompiler {
    /// Create a compiler over the built-in field registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The field registry in use.
    pub fn registry(&self) -> &FilterRegistry {
        &self.registry
    }

    /// Compile a spec.
    ///
    /// Every populated field contributes at most one clause and all clauses
    /// are conjoined. `hidden` symbols never match. Fields the registry does
    /// not know are skipped. An inverted range aborts compilation.
    pub fn compile(
        &self,
        spec: &FilterSpec,
        hidden: &BTreeSet<String>,
    ) -> Result<Predicate, FilterError> {
        let mut predicate = Predicate::match_all().excluding(hidden.iter().cloned());

        for (key, value) in &spec.criteria {
            let Some(def) = self.registry.get(key) else {
                debug!(screener = %spec.name, field = %key, "Unknown field, skipping");
                continue;
            };
            if let Some(clause) = def.compile(value)? {
                predicate.push(clause);
            }
        }

        debug!(
            screener = %spec.name,
            clauses = predicate.clauses.len(),
            excluded = predicate.excluded_symbols.len(),
            "Compiled screener"
        );
        Ok(predicate)
    }
}
