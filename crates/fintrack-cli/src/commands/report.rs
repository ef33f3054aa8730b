//! Report command implementations

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use fintrack_core::{report_filename, Database, ReportFormat};

use super::parse_date;

fn parse_range(from: &str, to: &str) -> Result<(NaiveDate, NaiveDate)> {
    let start = parse_date(from, "--from")?;
    let end = parse_date(to, "--to")?;
    if start > end {
        anyhow::bail!("--from {} is after --to {}", start, end);
    }
    Ok((start, end))
}

/// Write the income/expense CSV for `[from, to]` to `output`, or stdout
pub fn cmd_report_csv(db: &Database, from: &str, to: &str, output: Option<&Path>) -> Result<()> {
    let (start, end) = parse_range(from, to)?;

    let csv = db
        .transactions_csv(start, end)
        .context("Failed to build CSV report")?;

    match output {
        Some(path) => {
            std::fs::write(path, &csv)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("📄 Wrote {} ({} rows)", path.display(), csv.lines().count().saturating_sub(1));
            println!("   Suggested name: {}", report_filename(start, end, ReportFormat::Csv));
        }
        None => print!("{}", csv),
    }

    Ok(())
}

/// Write the PDF report for `[from, to]` to `output`, or to its suggested
/// name in the current directory
pub fn cmd_report_pdf(db: &Database, from: &str, to: &str, output: Option<&Path>) -> Result<()> {
    let (start, end) = parse_range(from, to)?;

    let pdf = db
        .transactions_pdf(start, end)
        .context("Failed to build PDF report")?;

    let path = match output {
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(report_filename(start, end, ReportFormat::Pdf)),
    };
    std::fs::write(&path, &pdf).with_context(|| format!("Failed to write {}", path.display()))?;
    println!("📄 Wrote {} ({} bytes)", path.display(), pdf.len());

    Ok(())
}
