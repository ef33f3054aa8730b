//! Income and expense operations
//!
//! Both kinds share one implementation; `TransactionKind` picks the table.

use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension};

use super::{parse_date, parse_datetime, require_positive, require_text, Database};
use crate::error::{Error, Result};
use crate::models::{NewTransaction, Transaction, TransactionKind, TransactionUpdate};

const COLUMNS: &str = "id, amount, category, date, note, created_at, updated_at";

impl Database {
    /// Insert an income or expense record
    pub fn create_transaction(
        &self,
        kind: TransactionKind,
        tx: &NewTransaction,
    ) -> Result<Transaction> {
        require_positive("amount", tx.amount)?;
        require_text("category", &tx.category)?;

        let conn = self.conn()?;
        conn.execute(
            &format!(
                "INSERT INTO {} (amount, category, date, note) VALUES (?, ?, ?, ?)",
                kind.table()
            ),
            params![tx.amount, tx.category.trim(), tx.date.to_string(), tx.note],
        )?;
        let id = conn.last_insert_rowid();

        self.get_transaction(kind, id)?
            .ok_or_else(|| Error::NotFound(format!("{} {} vanished after insert", kind, id)))
    }

    /// Get a single record by ID
    pub fn get_transaction(&self, kind: TransactionKind, id: i64) -> Result<Option<Transaction>> {
        let conn = self.conn()?;
        let tx = conn
            .query_row(
                &format!("SELECT {} FROM {} WHERE id = ?", COLUMNS, kind.table()),
                params![id],
                Self::row_to_transaction,
            )
            .optional()?;
        Ok(tx)
    }

    /// List records, newest date first
    pub fn list_transactions(
        &self,
        kind: TransactionKind,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM {} ORDER BY date DESC, created_at DESC, id DESC LIMIT ? OFFSET ?",
            COLUMNS,
            kind.table()
        ))?;

        let rows = stmt
            .query_map(params![limit, offset], Self::row_to_transaction)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn count_transactions(&self, kind: TransactionKind) -> Result<i64> {
        let conn = self.conn()?;
        let count = conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", kind.table()),
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Records dated within `[start, end]`, oldest first
    pub fn list_transactions_in_range(
        &self,
        kind: TransactionKind,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM {} WHERE date BETWEEN ? AND ? ORDER BY date ASC, id ASC",
            COLUMNS,
            kind.table()
        ))?;

        let rows = stmt
            .query_map(
                params![start.to_string(), end.to_string()],
                Self::row_to_transaction,
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Sum of `amount` over records dated within `[start, end]`; 0 when none
    pub fn sum_amount(
        &self,
        kind: TransactionKind,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<f64> {
        let conn = self.conn()?;
        let total: f64 = conn.query_row(
            &format!(
                "SELECT COALESCE(SUM(amount), 0.0) FROM {} WHERE date BETWEEN ? AND ?",
                kind.table()
            ),
            params![start.to_string(), end.to_string()],
            |row| row.get(0),
        )?;
        Ok(total)
    }

    /// Apply a partial update.
    ///
    /// Returns `(before, after)` so callers can react to a moved date, or
    /// `None` when no record has that ID.
    pub fn update_transaction(
        &self,
        kind: TransactionKind,
        id: i64,
        update: &TransactionUpdate,
    ) -> Result<Option<(Transaction, Transaction)>> {
        if update.is_empty() {
            return Err(Error::InvalidData(
                "At least one field must be provided for update".to_string(),
            ));
        }

        let Some(before) = self.get_transaction(kind, id)? else {
            return Ok(None);
        };

        let amount = update.amount.unwrap_or(before.amount);
        let category = update
            .category
            .as_deref()
            .map(str::trim)
            .unwrap_or(&before.category)
            .to_string();
        let date = update.date.unwrap_or(before.date);
        let note = update.note.clone().or_else(|| before.note.clone());

        require_positive("amount", amount)?;
        require_text("category", &category)?;

        let conn = self.conn()?;
        conn.execute(
            &format!(
                "UPDATE {} SET amount = ?, category = ?, date = ?, note = ?,
                        updated_at = CURRENT_TIMESTAMP
                 WHERE id = ?",
                kind.table()
            ),
            params![amount, category, date.to_string(), note, id],
        )?;

        let after = self
            .get_transaction(kind, id)?
            .ok_or_else(|| Error::NotFound(format!("{} {}", kind, id)))?;
        Ok(Some((before, after)))
    }

    /// Delete a record, returning what was removed
    pub fn delete_transaction(
        &self,
        kind: TransactionKind,
        id: i64,
    ) -> Result<Option<Transaction>> {
        let Some(existing) = self.get_transaction(kind, id)? else {
            return Ok(None);
        };

        let conn = self.conn()?;
        conn.execute(
            &format!("DELETE FROM {} WHERE id = ?", kind.table()),
            params![id],
        )?;
        Ok(Some(existing))
    }

    fn row_to_transaction(row: &rusqlite::Row) -> rusqlite::Result<Transaction> {
        let date_str: String = row.get(3)?;
        let created_at_str: String = row.get(5)?;
        let updated_at_str: String = row.get(6)?;

        Ok(Transaction {
            id: row.get(0)?,
            amount: row.get(1)?,
            category: row.get(2)?,
            date: parse_date(3, &date_str)?,
            note: row.get(4)?,
            created_at: parse_datetime(&created_at_str),
            updated_at: parse_datetime(&updated_at_str),
        })
    }
}
