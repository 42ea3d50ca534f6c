//! Storage boundary and in-memory collaborator stores.
//!
//! Raw stored records are normalized here, before any compiler or engine
//! logic sees them: sentinel literals become absent values and numeric
//! strings become numbers.

mod csv_source;
mod fixtures;
mod memory;
mod normalize;

pub use csv_source::CsvBarSource;
pub use fixtures::DataDir;
pub use memory::{MemoryBarStore, MemoryPreferenceStore, MemorySecurityStore, MemorySpecStore};
pub use normalize::{normalize_security, normalize_value};
