//! Logging setup for the screener binary.

mod logging;

pub use logging::{setup_logging, LogFormat, WorkerGuard};
