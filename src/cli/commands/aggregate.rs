//! Aggregate view command.

use anyhow::{Context, Result};
use screener_config::AppConfig;
use screener_engine::PageRequest;

use super::{open_service, print_json};
use crate::cli::AggregateArgs;

pub async fn run(args: AggregateArgs, config: &AppConfig) -> Result<()> {
    let service = open_service(config)?;
    let request = PageRequest::parse(
        args.page.page.as_deref(),
        args.page.limit.as_deref(),
        service.limits(),
    );

    let page = service
        .aggregate_all(&args.user, request)
        .await
        .with_context(|| format!("Failed to aggregate screeners for {}", args.user))?;
    print_json(&page)
}
