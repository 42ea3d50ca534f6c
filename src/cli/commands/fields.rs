//! List filter fields command.

use anyhow::Result;
use screener_filters::{FieldKind, FilterRegistry, Source};

pub async fn run() -> Result<()> {
    let registry = FilterRegistry::new();

    println!("Filter Fields");
    println!("═══════════════════════════════════════════════════════════");
    println!();

    for def in registry.list() {
        println!("  {:<16} {}", def.key, describe(&def.kind));
    }

    println!();
    println!("Ranges are stored as [min, max]; [0, 0] leaves a field unset.");

    Ok(())
}

fn describe(kind: &FieldKind) -> String {
    match kind {
        FieldKind::Range { source: Source::Attribute(name) } => format!("range on {}", name),
        FieldKind::Range { source: Source::Quarterly(name) } => {
            format!("range on latest quarterly {}", name)
        }
        FieldKind::Score { attribute } => format!("score 1-100 on {}", attribute),
        FieldKind::Set { attribute } => format!("one of a set of {} values", attribute),
        FieldKind::MovingAverage { window } => {
            format!("MA{} vs price (above-price, below-price, above-N, below-N)", window)
        }
        FieldKind::PriceVsAverage => "price vs MA (above-N, below-N)".to_string(),
        FieldKind::NewHigh => "new high (52-week, all-time)".to_string(),
        FieldKind::NewLow => "new low (52-week, all-time)".to_string(),
        FieldKind::PercentChange => {
            "range on percent change over 1D, 1W, 1M, 4M, 6M, 1Y or YTD".to_string()
        }
    }
}
