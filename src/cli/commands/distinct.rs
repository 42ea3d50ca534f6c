//! Distinct values command.

use anyhow::Result;
use screener_config::AppConfig;

use super::open_service;
use crate::cli::DistinctArgs;

pub async fn run(args: DistinctArgs, config: &AppConfig) -> Result<()> {
    let service = open_service(config)?;
    for value in service.distinct_values(&args.attribute).await? {
        println!("{}", value);
    }
    Ok(())
}
