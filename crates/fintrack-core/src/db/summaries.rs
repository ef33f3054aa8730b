//! Cached period summary rows
//!
//! Rows are keyed by `(granularity, period_start)` and are never updated in
//! place: they are inserted once and deleted on invalidation.

use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension};

use super::{parse_date, parse_datetime, Database};
use crate::error::Result;
use crate::models::{FinancialSummary, Granularity};

const COLUMNS: &str = "id, granularity, period_start, period_end, total_income, \
                       total_expenses, net_balance, created_at";

impl Database {
    /// Read the cached row for a bucket
    pub fn fetch_summary(
        &self,
        granularity: Granularity,
        period_start: NaiveDate,
    ) -> Result<Option<FinancialSummary>> {
        let conn = self.conn()?;
        let summary = conn
            .query_row(
                &format!(
                    "SELECT {} FROM financial_summaries WHERE granularity = ? AND period_start = ?",
                    COLUMNS
                ),
                params![granularity.as_str(), period_start.to_string()],
                Self::row_to_summary,
            )
            .optional()?;
        Ok(summary)
    }

    /// Insert a computed summary and return the stored row.
    ///
    /// A second insert for the same bucket fails with a UNIQUE violation
    /// (see `Error::is_unique_violation`).
    pub fn insert_summary(&self, summary: &FinancialSummary) -> Result<FinancialSummary> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO financial_summaries
                (granularity, period_start, period_end, total_income, total_expenses, net_balance)
             VALUES (?, ?, ?, ?, ?, ?)",
            params![
                summary.granularity.as_str(),
                summary.period_start.to_string(),
                summary.period_end.to_string(),
                summary.total_income,
                summary.total_expenses,
                summary.net_balance,
            ],
        )?;
        let id = conn.last_insert_rowid();

        let stored = conn.query_row(
            &format!("SELECT {} FROM financial_summaries WHERE id = ?", COLUMNS),
            params![id],
            Self::row_to_summary,
        )?;
        Ok(stored)
    }

    /// Delete the cached row for a bucket; returns the number of rows removed
    pub fn delete_summary(
        &self,
        granularity: Granularity,
        period_start: NaiveDate,
    ) -> Result<usize> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM financial_summaries WHERE granularity = ? AND period_start = ?",
            params![granularity.as_str(), period_start.to_string()],
        )?;
        Ok(deleted)
    }

    /// All cached rows, newest period first
    pub fn list_cached_summaries(&self) -> Result<Vec<FinancialSummary>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM financial_summaries ORDER BY period_start DESC, granularity ASC",
            COLUMNS
        ))?;

        let rows = stmt
            .query_map([], Self::row_to_summary)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn row_to_summary(row: &rusqlite::Row) -> rusqlite::Result<FinancialSummary> {
        let granularity_str: String = row.get(1)?;
        let period_start_str: String = row.get(2)?;
        let period_end_str: String = row.get(3)?;
        let created_at_str: String = row.get(7)?;

        let granularity = granularity_str.parse::<Granularity>().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
        })?;

        Ok(FinancialSummary {
            id: Some(row.get(0)?),
            granularity,
            period_start: parse_date(2, &period_start_str)?,
            period_end: parse_date(3, &period_end_str)?,
            total_income: row.get(4)?,
            total_expenses: row.get(5)?,
            net_balance: row.get(6)?,
            created_at: Some(parse_datetime(&created_at_str)),
        })
    }
}
