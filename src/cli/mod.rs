//! CLI definitions.

pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "screener")]
#[command(author, version, about = "Stock screener with market-session-aware enrichment")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Log level, overrides the configured one
    #[arg(short, long)]
    pub log_level: Option<LogLevel>,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    /// Data directory, overrides the configured one
    #[arg(short, long, env = "SCREENER_DATA")]
    pub data: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// List one screener's matches, or every visible security
    List(ListArgs),
    /// Merged view over all included screeners of a user
    Aggregate(AggregateArgs),
    /// Print the market session state
    Session(SessionArgs),
    /// Print the predicate a screener compiles to
    Explain(ExplainArgs),
    /// Close a partially supplied range and store it on a screener
    ResolveRange(ResolveRangeArgs),
    /// List supported filter fields
    Fields,
    /// Distinct values of a text attribute
    Distinct(DistinctArgs),
    /// Validate configuration
    ValidateConfig,
}

#[derive(clap::Args)]
pub struct PageArgs {
    /// Page number (1-based)
    #[arg(short, long)]
    pub page: Option<String>,

    /// Page size
    #[arg(long)]
    pub limit: Option<String>,
}

#[derive(clap::Args)]
pub struct ListArgs {
    /// Owner of the screener
    #[arg(short, long)]
    pub user: String,

    /// Screener name; omit to list every visible security
    #[arg(short, long)]
    pub screener: Option<String>,

    #[command(flatten)]
    pub page: PageArgs,
}

#[derive(clap::Args)]
pub struct AggregateArgs {
    /// User whose screeners are merged
    #[arg(short, long)]
    pub user: String,

    #[command(flatten)]
    pub page: PageArgs,
}

#[derive(clap::Args)]
pub struct SessionArgs {
    /// Instant to evaluate (RFC 3339), defaults to now
    #[arg(long)]
    pub at: Option<String>,
}

#[derive(clap::Args)]
pub struct ExplainArgs {
    /// Owner of the screener
    #[arg(short, long)]
    pub user: String,

    /// Screener name
    #[arg(short, long)]
    pub screener: String,
}

#[derive(clap::Args)]
pub struct ResolveRangeArgs {
    /// Owner of the screener
    #[arg(short, long)]
    pub user: String,

    /// Screener name
    #[arg(short, long)]
    pub screener: String,

    /// Field to resolve
    #[arg(short, long)]
    pub field: String,

    /// Lower bound; omit to use the population minimum
    #[arg(long, allow_negative_numbers = true)]
    pub min: Option<f64>,

    /// Upper bound; omit to use the population maximum
    #[arg(long, allow_negative_numbers = true)]
    pub max: Option<f64>,
}

#[derive(clap::Args)]
pub struct DistinctArgs {
    /// Stored attribute, e.g. Sector
    pub attribute: String,
}
