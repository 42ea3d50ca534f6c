//! List command.

use anyhow::{Context, Result};
use screener_config::AppConfig;
use screener_engine::PageRequest;

use super::{open_service, print_json};
use crate::cli::ListArgs;

pub async fn run(args: ListArgs, config: &AppConfig) -> Result<()> {
    let service = open_service(config)?;
    let request = PageRequest::parse(
        args.page.page.as_deref(),
        args.page.limit.as_deref(),
        service.limits(),
    );

    let page = service
        .filter_and_list(&args.user, args.screener.as_deref(), request)
        .await
        .context("Failed to list screener")?;
    print_json(&page)
}
