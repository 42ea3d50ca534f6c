//! CLI command implementations.

pub mod aggregate;
pub mod distinct;
pub mod explain;
pub mod fields;
pub mod list;
pub mod resolve;
pub mod session;
pub mod validate;

use anyhow::{Context, Result};
use screener_config::AppConfig;
use screener_core::Granularity;
use screener_data::DataDir;
use screener_engine::{ScreenerService, Stores};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// Build the service over the configured data directory.
pub(crate) fn open_service(config: &AppConfig) -> Result<ScreenerService> {
    let settings = config.engine_settings()?;
    let dir = DataDir::open(&config.data.dir).context("Failed to open data directory")?;

    let securities = dir.securities().context("Failed to load securities")?;
    info!(securities = securities.len(), dir = %config.data.dir.display(), "Loaded data");

    let stores = Stores::new(
        Arc::new(securities),
        Arc::new(dir.bars(Granularity::Intraday).context("Failed to load intraday bars")?),
        Arc::new(dir.bars(Granularity::Daily).context("Failed to load daily bars")?),
        Arc::new(dir.screeners().context("Failed to load screeners")?),
        Arc::new(dir.preferences().context("Failed to load preferences")?),
    );
    Ok(ScreenerService::new(stores, settings))
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
