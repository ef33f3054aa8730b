//! Summary command implementation

use anyhow::{Context, Result};
use chrono::Utc;
use fintrack_core::{parse_target_date, Database, Granularity, SummaryView};

pub fn cmd_summary(
    db: &Database,
    granularity: &str,
    date: Option<&str>,
    view: Option<&str>,
    json: bool,
) -> Result<()> {
    let granularity: Granularity = granularity.parse()?;
    let view: SummaryView = view.unwrap_or("").parse()?;
    let target = parse_target_date(date, granularity, Utc::now().date_naive())?;

    let summary = db
        .get_or_create_summary(granularity, target, view)
        .context("Failed to build summary")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!();
    println!("📊 {} Summary ({})", capitalize(granularity.as_str()), view);
    println!(
        "   Period: {} to {}",
        summary.period_start, summary.period_end
    );
    println!("   ─────────────────────────────");
    println!("   {:<10} {:>15.2}", "Income", summary.total_income);
    println!("   {:<10} {:>15.2}", "Expenses", summary.total_expenses);
    println!("   ─────────────────────────────");
    println!("   {:<10} {:>15.2}", "Net", summary.net_balance);
    if let Some(created) = summary.created_at {
        println!("   Cached at {}", created.format("%Y-%m-%d %H:%M:%S UTC"));
    }

    Ok(())
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
