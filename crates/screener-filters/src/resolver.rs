//! Resolution of partially supplied ranges.
//!
//! Open ranges are never persisted. A missing bound is replaced by the live
//! extremum of the field across the security population.

use screener_core::{Extremum, FilterError, ScreenerResult, SecurityStore};
use tracing::debug;

use crate::registry::FilterRegistry;

/// Closes open ranges against the security population.
#[derive(Debug, Clone, Copy)]
pub struct RangeResolver<'a> {
    registry: &'a FilterRegistry,
}

impl<'a> RangeResolver<'a> {
    /// Create a resolver over a field registry.
    pub fn new(registry: &'a FilterRegistry) -> Self {
        Self { registry }
    }

    /// Resolve `[min, max]` for a range field.
    pub async fn resolve(
        &self,
        securities: &dyn SecurityStore,
        field: &str,
        min: Option<f64>,
        max: Option<f64>,
    ) -> ScreenerResult<[f64; 2]> {
        let def = self
            .registry
            .get(field)
            .ok_or_else(|| FilterError::UnknownField(field.to_string()))?;
        let operand = def
            .range_operand()
            .ok_or_else(|| FilterError::NotResolvable(field.to_string()))?;

        let (min, max) = match (min, max) {
            (None, None) => return Err(FilterError::MissingBounds(field.to_string()).into()),
            (Some(min), Some(max)) => (min, max),
            (Some(min), None) => {
                let max = securities
                    .extremum(&operand, Extremum::Max)
                    .await?
                    .ok_or_else(|| FilterError::NoPopulation(field.to_string()))?;
                (min, max)
            }
            (None, Some(max)) => {
                let min = securities
                    .extremum(&operand, Extremum::Min)
                    .await?
                    .ok_or_else(|| FilterError::NoPopulation(field.to_string()))?;
                (min, max)
            }
        };

        if min >= max {
            return Err(FilterError::InvalidRange {
                field: field.to_string(),
                min,
                max,
            }
            .into());
        }

        debug!(field, min, max, "Resolved range");
        Ok([min, max])
    }
}
