//! Reminder scan command

use anyhow::{Context, Result};
use chrono::Utc;
use fintrack_core::Database;

pub fn cmd_reminders(db: &Database, days: u32) -> Result<()> {
    let scan = db
        .scan_reminders(Utc::now().date_naive(), days)
        .context("Failed to scan reminders")?;

    println!();
    println!("⏰ Due between {} and {}", scan.window_start, scan.window_end);
    println!("   ─────────────────────────────────────────────");

    if scan.total() == 0 {
        println!("   Nothing due. 🎉");
        return Ok(());
    }

    for debt in &scan.debts {
        println!(
            "   💸 {} owes {:.2} by {}",
            debt.debtor_name, debt.amount, debt.due_date
        );
    }

    for goal in &scan.savings_goals {
        let remaining = goal.goal_amount - goal.current_amount;
        let target = goal
            .target_date
            .map(|d| d.to_string())
            .unwrap_or_default();
        println!(
            "   🎯 {}: {:.2} to go by {}",
            goal.goal_name, remaining, target
        );
    }

    Ok(())
}
