//! Resolve range command.

use anyhow::{Context, Result};
use screener_config::AppConfig;

use super::open_service;
use crate::cli::ResolveRangeArgs;

pub async fn run(args: ResolveRangeArgs, config: &AppConfig) -> Result<()> {
    let service = open_service(config)?;
    let [min, max] = service
        .resolve_range(&args.user, &args.screener, &args.field, args.min, args.max)
        .await
        .with_context(|| format!("Failed to resolve {} on '{}'", args.field, args.screener))?;

    // Fixture stores are in memory, the stored range lasts for this run only.
    println!("{}: [{}, {}]", args.field, min, max);
    Ok(())
}
