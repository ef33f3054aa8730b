//! Manual summary invalidation

use anyhow::{Context, Result};
use fintrack_core::{Database, Granularity};

use super::parse_date;

/// Drop cached summaries containing `date`; an empty `granularities` means all
pub fn cmd_invalidate(db: &Database, date: &str, granularities: &[String]) -> Result<()> {
    let date = parse_date(date, "--date")?;

    let granularities = if granularities.is_empty() {
        Granularity::ALL.to_vec()
    } else {
        granularities
            .iter()
            .map(|g| g.parse::<Granularity>())
            .collect::<Result<Vec<_>, _>>()?
    };

    let deleted = db
        .invalidate_for_date(date, &granularities)
        .context("Failed to invalidate summaries")?;

    let names: Vec<&str> = granularities.iter().map(|g| g.as_str()).collect();
    println!(
        "🧹 Invalidated {} cached summary(ies) containing {} ({})",
        deleted,
        date,
        names.join(", ")
    );

    Ok(())
}
