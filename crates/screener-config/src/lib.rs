//! Configuration management.

mod settings;

pub use settings::{
    AggregationSettings, AppConfig, AppSettings, DataSettings, EnrichmentSettings,
    LoggingConfig, PaginationSettings, SessionSettings, ValidationError,
};

use config::{Config, ConfigError, Environment, File};
use std::path::Path;

/// Load configuration from file and environment.
///
/// Environment variables use the `SCREENER` prefix and `__` between
/// sections, e.g. `SCREENER__SESSION__OPEN=14:30`.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from(path).required(true))
        .add_source(
            Environment::with_prefix("SCREENER")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    config.try_deserialize()
}
