//! Debt operations

use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension};

use super::{parse_date, parse_datetime, require_positive, require_text, Database};
use crate::error::{Error, Result};
use crate::models::{Debt, DebtStatus, DebtUpdate, NewDebt};

const COLUMNS: &str =
    "id, debtor_name, description, amount, due_date, status, created_at, updated_at";

impl Database {
    /// Record a new debt (status defaults to Pending)
    pub fn create_debt(&self, debt: &NewDebt) -> Result<Debt> {
        require_text("debtor_name", &debt.debtor_name)?;
        require_positive("amount", debt.amount)?;

        let status = debt.status.unwrap_or_default();
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO debts (debtor_name, description, amount, due_date, status)
             VALUES (?, ?, ?, ?, ?)",
            params![
                debt.debtor_name.trim(),
                debt.description,
                debt.amount,
                debt.due_date.to_string(),
                status.as_str(),
            ],
        )?;
        let id = conn.last_insert_rowid();

        self.get_debt(id)?
            .ok_or_else(|| Error::NotFound(format!("debt {} vanished after insert", id)))
    }

    pub fn get_debt(&self, id: i64) -> Result<Option<Debt>> {
        let conn = self.conn()?;
        let debt = conn
            .query_row(
                &format!("SELECT {} FROM debts WHERE id = ?", COLUMNS),
                params![id],
                Self::row_to_debt,
            )
            .optional()?;
        Ok(debt)
    }

    /// List debts by due date, optionally filtered by status
    pub fn list_debts(
        &self,
        status: Option<DebtStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Debt>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM debts
             WHERE (?1 IS NULL OR status = ?1)
             ORDER BY due_date ASC, id ASC
             LIMIT ?2 OFFSET ?3",
            COLUMNS
        ))?;

        let debts = stmt
            .query_map(
                params![status.map(|s| s.as_str()), limit, offset],
                Self::row_to_debt,
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(debts)
    }

    /// Pending debts due within `[from, to]`
    pub fn pending_debts_due_between(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<Debt>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM debts
             WHERE status = 'Pending' AND due_date BETWEEN ? AND ?
             ORDER BY due_date ASC, id ASC",
            COLUMNS
        ))?;

        let debts = stmt
            .query_map(params![from.to_string(), to.to_string()], Self::row_to_debt)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(debts)
    }

    /// Apply a partial update; `None` when no debt has that ID
    pub fn update_debt(&self, id: i64, update: &DebtUpdate) -> Result<Option<Debt>> {
        if update.is_empty() {
            return Err(Error::InvalidData(
                "At least one field must be provided for update".to_string(),
            ));
        }

        let Some(existing) = self.get_debt(id)? else {
            return Ok(None);
        };

        let debtor_name = update
            .debtor_name
            .as_deref()
            .map(str::trim)
            .unwrap_or(&existing.debtor_name)
            .to_string();
        let description = update
            .description
            .clone()
            .or_else(|| existing.description.clone());
        let amount = update.amount.unwrap_or(existing.amount);
        let due_date = update.due_date.unwrap_or(existing.due_date);
        let status = update.status.unwrap_or(existing.status);

        require_text("debtor_name", &debtor_name)?;
        require_positive("amount", amount)?;

        let conn = self.conn()?;
        conn.execute(
            "UPDATE debts SET debtor_name = ?, description = ?, amount = ?, due_date = ?,
                    status = ?, updated_at = CURRENT_TIMESTAMP
             WHERE id = ?",
            params![
                debtor_name,
                description,
                amount,
                due_date.to_string(),
                status.as_str(),
                id
            ],
        )?;

        self.get_debt(id)
    }

    /// Delete a debt; returns false when it did not exist
    pub fn delete_debt(&self, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM debts WHERE id = ?", params![id])?;
        Ok(deleted > 0)
    }

    fn row_to_debt(row: &rusqlite::Row) -> rusqlite::Result<Debt> {
        let due_date_str: String = row.get(4)?;
        let status_str: String = row.get(5)?;
        let created_at_str: String = row.get(6)?;
        let updated_at_str: String = row.get(7)?;

        Ok(Debt {
            id: row.get(0)?,
            debtor_name: row.get(1)?,
            description: row.get(2)?,
            amount: row.get(3)?,
            due_date: parse_date(4, &due_date_str)?,
            status: status_str.parse().map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(5, rusqlite::types::Type::Text, Box::new(e))
            })?,
            created_at: parse_datetime(&created_at_str),
            updated_at: parse_datetime(&updated_at_str),
        })
    }
}
