//! Explain command.

use anyhow::{Context, Result};
use screener_config::AppConfig;

use super::{open_service, print_json};
use crate::cli::ExplainArgs;

pub async fn run(args: ExplainArgs, config: &AppConfig) -> Result<()> {
    let service = open_service(config)?;
    let predicate = service
        .explain(&args.user, &args.screener)
        .await
        .with_context(|| format!("Failed to compile screener '{}'", args.screener))?;
    print_json(&predicate)
}
