//! Analytics command implementations

use anyhow::{Context, Result};
use chrono::Utc;
use fintrack_core::{parse_target_date, Database, Granularity};

pub fn cmd_analytics_categories(db: &Database, month: Option<&str>) -> Result<()> {
    let target = parse_target_date(month, Granularity::Monthly, Utc::now().date_naive())?;
    let stats = db
        .expense_breakdown(target)
        .context("Failed to compute expense breakdown")?;

    println!();
    println!("🏷️  Expenses by Category ({})", target.format("%Y-%m"));
    println!("   ─────────────────────────────────────────");

    if stats.is_empty() {
        println!("   No expenses found.");
        return Ok(());
    }

    let total: f64 = stats.iter().map(|s| s.total_amount).sum();
    for stat in &stats {
        let share = if total > 0.0 {
            stat.total_amount / total * 100.0
        } else {
            0.0
        };
        println!(
            "   {:24} │ {:>10.2} │ {:>5.1}%",
            stat.category, stat.total_amount, share
        );
    }
    println!("   ─────────────────────────┼────────────┼───────");
    println!("   {:24} │ {:>10.2} │", "Total", total);

    Ok(())
}

pub fn cmd_analytics_trend(db: &Database, months: u32) -> Result<()> {
    let trend = db
        .income_expense_trend(Utc::now().date_naive(), months)
        .context("Failed to compute income/expense trend")?;

    println!();
    println!("📈 Income vs Expenses (last {} months)", months);
    println!("   {:8} │ {:>10} │ {:>10} │ {:>10}", "Month", "Income", "Expenses", "Net");
    println!("   ─────────┼────────────┼────────────┼───────────");
    for row in &trend {
        println!(
            "   {:8} │ {:>10.2} │ {:>10.2} │ {:>10.2}",
            row.month,
            row.total_income,
            row.total_expenses,
            row.total_income - row.total_expenses
        );
    }

    Ok(())
}
