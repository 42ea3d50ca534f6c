//! Session state command.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use screener_config::AppConfig;

use crate::cli::SessionArgs;

pub async fn run(args: SessionArgs, config: &AppConfig) -> Result<()> {
    let session = config.session.market_session()?;
    let at = match &args.at {
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .with_context(|| format!("Invalid instant '{}'", raw))?
            .with_timezone(&Utc),
        None => Utc::now(),
    };

    println!(
        "{} at {} (window {}-{} UTC, weekdays)",
        session.state_at(at),
        at.to_rfc3339(),
        session.open().format("%H:%M"),
        session.close().format("%H:%M")
    );
    Ok(())
}
