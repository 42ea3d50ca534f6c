//! Configuration structures.

use screener_core::MarketSession;
use screener_engine::{EngineSettings, PageLimits, MAX_PAGE_SIZE};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Configuration that loaded but cannot be used.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid session window: {0}")]
    Session(String),

    #[error("Invalid pagination: {0}")]
    Pagination(String),

    #[error("Invalid enrichment: {0}")]
    Enrichment(String),

    #[error("Unknown log format: {0}")]
    LogFormat(String),

    #[error("Cannot render configuration: {0}")]
    Render(#[from] toml::ser::Error),
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub session: SessionSettings,
    #[serde(default)]
    pub pagination: PaginationSettings,
    #[serde(default)]
    pub enrichment: EnrichmentSettings,
    #[serde(default)]
    pub aggregation: AggregationSettings,
    #[serde(default)]
    pub data: DataSettings,
}

impl AppConfig {
    /// Check values that deserialize fine but are unusable.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.session.market_session()?;

        let pagination = &self.pagination;
        if pagination.max_page_size == 0 || pagination.max_page_size > MAX_PAGE_SIZE {
            return Err(ValidationError::Pagination(format!(
                "max_page_size {} must be within 1..={}",
                pagination.max_page_size, MAX_PAGE_SIZE
            )));
        }
        if pagination.default_page_size == 0
            || pagination.default_page_size > pagination.max_page_size
        {
            return Err(ValidationError::Pagination(format!(
                "default_page_size {} must be within 1..={}",
                pagination.default_page_size, pagination.max_page_size
            )));
        }

        if self.enrichment.lookup_timeout_ms == 0 {
            return Err(ValidationError::Enrichment(
                "lookup_timeout_ms must be positive".to_string(),
            ));
        }

        match self.logging.format.as_str() {
            "pretty" | "json" => Ok(()),
            other => Err(ValidationError::LogFormat(other.to_string())),
        }
    }

    /// Render the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ValidationError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Engine tunables derived from this configuration.
    pub fn engine_settings(&self) -> Result<EngineSettings, ValidationError> {
        Ok(EngineSettings {
            session: self.session.market_session()?,
            lookup_timeout: Duration::from_millis(self.enrichment.lookup_timeout_ms),
            limits: self.pagination.limits(),
            parallel_screeners: self.aggregation.parallel,
        })
    }
}

/// General app settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "screener".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
    /// Directory for daily rolling log files
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: None,
        }
    }
}

/// Regular trading window in UTC, `HH:MM`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    pub open: String,
    pub close: String,
}

impl SessionSettings {
    /// Parse into a market session.
    pub fn market_session(&self) -> Result<MarketSession, ValidationError> {
        MarketSession::from_hhmm(&self.open, &self.close)
            .map_err(|e| ValidationError::Session(e.to_string()))
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            open: "13:00".to_string(),
            close: "20:00".to_string(),
        }
    }
}

/// Page size bounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationSettings {
    pub default_page_size: usize,
    pub max_page_size: usize,
}

impl PaginationSettings {
    pub fn limits(&self) -> PageLimits {
        PageLimits {
            default_page_size: self.default_page_size,
            max_page_size: self.max_page_size,
        }
    }
}

impl Default for PaginationSettings {
    fn default() -> Self {
        let limits = PageLimits::default();
        Self {
            default_page_size: limits.default_page_size,
            max_page_size: limits.max_page_size,
        }
    }
}

/// Bar lookup settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichmentSettings {
    pub lookup_timeout_ms: u64,
}

impl Default for EnrichmentSettings {
    fn default() -> Self {
        Self {
            lookup_timeout_ms: 2000,
        }
    }
}

/// Aggregate view settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationSettings {
    /// Screener cap per user, enforced by screener management
    pub max_screeners: usize,
    pub parallel: bool,
}

impl Default for AggregationSettings {
    fn default() -> Self {
        Self {
            max_screeners: 20,
            parallel: true,
        }
    }
}

/// Fixture data location.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    pub dir: PathBuf,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("data"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());

        let settings = config.engine_settings().unwrap();
        assert_eq!(settings, EngineSettings::default());
    }

    #[test]
    fn test_rejects_bad_session() {
        let mut config = AppConfig::default();
        config.session.open = "21:00".to_string();
        assert!(matches!(config.validate(), Err(ValidationError::Session(_))));

        config.session.open = "9am".to_string();
        assert!(matches!(config.validate(), Err(ValidationError::Session(_))));
    }

    #[test]
    fn test_rejects_bad_pagination() {
        let mut config = AppConfig::default();
        config.pagination.default_page_size = 0;
        assert!(matches!(config.validate(), Err(ValidationError::Pagination(_))));

        config.pagination.default_page_size = 600;
        assert!(matches!(config.validate(), Err(ValidationError::Pagination(_))));
    }

    #[test]
    fn test_rejects_page_size_over_ceiling() {
        let mut config = AppConfig::default();
        config.pagination.max_page_size = 1000;
        assert!(matches!(config.validate(), Err(ValidationError::Pagination(_))));

        config.pagination.max_page_size = MAX_PAGE_SIZE;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_sections_take_field_defaults() {
        let config: AppConfig = toml::from_str(
            "[session]\nopen = \"14:30\"\n\n[pagination]\nmax_page_size = 200\n\n[logging]\nlevel = \"debug\"\n",
        )
        .unwrap();

        assert_eq!(config.session.open, "14:30");
        assert_eq!(config.session.close, "20:00");
        assert_eq!(config.pagination.default_page_size, 50);
        assert_eq!(config.pagination.max_page_size, 200);
        assert_eq!(config.logging.format, "pretty");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_to_toml_round_trips() {
        let mut config = AppConfig::default();
        config.logging.format = "json".to_string();

        let rendered = config.to_toml().unwrap();
        assert!(rendered.contains("[session]"));

        let parsed: AppConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed.logging.format, "json");
        assert_eq!(parsed.session.close, "20:00");
    }
}
