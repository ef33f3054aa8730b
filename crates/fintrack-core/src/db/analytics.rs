//! Spending analytics

use chrono::{Months, NaiveDate};
use rusqlite::params;

use super::Database;
use crate::error::{Error, Result};
use crate::models::{CategoryExpenseStat, Granularity, MonthlyTrendStat, TransactionKind};
use crate::period::calculate_period;

/// Longest trend window, ten years of months
pub const MAX_TREND_MONTHS: u32 = 120;

impl Database {
    /// Expense totals per category for the calendar month containing
    /// `month_date`, largest first
    pub fn expense_breakdown(&self, month_date: NaiveDate) -> Result<Vec<CategoryExpenseStat>> {
        let period = calculate_period(month_date, Granularity::Monthly)?;
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT category, SUM(amount) AS total
             FROM expenses
             WHERE date BETWEEN ? AND ?
             GROUP BY category
             ORDER BY total DESC, category ASC",
        )?;

        let stats = stmt
            .query_map(
                params![period.start.to_string(), period.end.to_string()],
                |row| {
                    Ok(CategoryExpenseStat {
                        category: row.get(0)?,
                        total_amount: row.get(1)?,
                    })
                },
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(stats)
    }

    /// Income and expense totals for the `months` calendar months ending with
    /// the month of `today`, oldest first
    pub fn income_expense_trend(
        &self,
        today: NaiveDate,
        months: u32,
    ) -> Result<Vec<MonthlyTrendStat>> {
        if months == 0 || months > MAX_TREND_MONTHS {
            return Err(Error::InvalidData(format!(
                "months must be between 1 and {} (got {})",
                MAX_TREND_MONTHS, months
            )));
        }

        let current = calculate_period(today, Granularity::Monthly)?;
        let first = current
            .start
            .checked_sub_months(Months::new(months - 1))
            .ok_or_else(|| Error::InvalidData(format!("{} months is too far back", months)))?;

        let mut stats = Vec::with_capacity(months as usize);
        let mut month_start = first;
        for _ in 0..months {
            let period = calculate_period(month_start, Granularity::Monthly)?;
            stats.push(MonthlyTrendStat {
                month: period.start.format("%Y-%m").to_string(),
                total_income: self.sum_amount(TransactionKind::Income, period.start, period.end)?,
                total_expenses: self.sum_amount(
                    TransactionKind::Expense,
                    period.start,
                    period.end,
                )?,
            });
            month_start = match period.end.succ_opt() {
                Some(next) => next,
                None => break,
            };
        }

        Ok(stats)
    }
}
