//! Due-date reminder scan
//!
//! Findings are reported as log lines; nothing is persisted or delivered.

use chrono::{Days, NaiveDate};
use tracing::info;

use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::ReminderScan;

/// Default look-ahead window in days
pub const DEFAULT_WINDOW_DAYS: u32 = 7;

impl Database {
    /// Pending debts and unmet savings goals falling due within
    /// `[today, today + window_days]`
    pub fn scan_reminders(&self, today: NaiveDate, window_days: u32) -> Result<ReminderScan> {
        let window_end = today
            .checked_add_days(Days::new(u64::from(window_days)))
            .ok_or_else(|| {
                Error::InvalidData(format!("Reminder window of {} days is too large", window_days))
            })?;

        let debts = self.pending_debts_due_between(today, window_end)?;
        for debt in &debts {
            info!(
                debt_id = debt.id,
                debtor = %debt.debtor_name,
                amount = debt.amount,
                due_date = %debt.due_date,
                "Reminder: debt due soon"
            );
        }

        let savings_goals = self.unmet_goals_due_between(today, window_end)?;
        for goal in &savings_goals {
            info!(
                goal_id = goal.id,
                goal = %goal.goal_name,
                current = goal.current_amount,
                target = goal.goal_amount,
                target_date = ?goal.target_date,
                "Reminder: savings goal target date approaching"
            );
        }

        info!(
            debts = debts.len(),
            savings_goals = savings_goals.len(),
            window_start = %today,
            window_end = %window_end,
            "Reminder scan complete"
        );

        Ok(ReminderScan {
            window_start: today,
            window_end,
            debts,
            savings_goals,
        })
    }
}
