//! Filter field registry and screener compiler.
//!
//! Every supported criterion is a [`FieldDef`] in the [`FilterRegistry`],
//! tagged with the [`FieldKind`] that decides how its stored value compiles.
//! The [`FilterCompiler`] conjoins the clauses of all populated fields into a
//! [`screener_core::Predicate`].

mod compiler;
mod criterion;
mod field;
mod registry;
mod resolver;

pub use compiler::FilterCompiler;
pub use criterion::{read_range, RangeRead};
pub use field::{FieldDef, FieldKind, Source, MA_WINDOWS, PERCENT_CHANGE_WINDOWS};
pub use registry::FilterRegistry;
pub use resolver::RangeResolver;
