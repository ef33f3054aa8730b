//! Savings goal operations

use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension};

use super::{parse_date, parse_datetime, require_positive, require_text, Database};
use crate::error::{Error, Result};
use crate::models::{NewSavingsGoal, SavingsGoal, SavingsGoalUpdate};

const COLUMNS: &str = "id, goal_name, goal_amount, current_amount, start_date, target_date, \
                       notes, created_at, updated_at";

fn require_non_negative(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(Error::InvalidData(format!(
            "{} cannot be negative (got {})",
            field, value
        )));
    }
    Ok(())
}

impl Database {
    pub fn create_savings_goal(&self, goal: &NewSavingsGoal) -> Result<SavingsGoal> {
        require_text("goal_name", &goal.goal_name)?;
        require_positive("goal_amount", goal.goal_amount)?;
        let current_amount = goal.current_amount.unwrap_or(0.0);
        require_non_negative("current_amount", current_amount)?;

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO savings_goals (goal_name, goal_amount, current_amount, start_date, target_date, notes)
             VALUES (?, ?, ?, ?, ?, ?)",
            params![
                goal.goal_name.trim(),
                goal.goal_amount,
                current_amount,
                goal.start_date.map(|d| d.to_string()),
                goal.target_date.map(|d| d.to_string()),
                goal.notes,
            ],
        )?;
        let id = conn.last_insert_rowid();

        self.get_savings_goal(id)?
            .ok_or_else(|| Error::NotFound(format!("savings goal {} vanished after insert", id)))
    }

    pub fn get_savings_goal(&self, id: i64) -> Result<Option<SavingsGoal>> {
        let conn = self.conn()?;
        let goal = conn
            .query_row(
                &format!("SELECT {} FROM savings_goals WHERE id = ?", COLUMNS),
                params![id],
                Self::row_to_savings_goal,
            )
            .optional()?;
        Ok(goal)
    }

    /// List goals by target date; goals without one come last
    pub fn list_savings_goals(&self, limit: i64, offset: i64) -> Result<Vec<SavingsGoal>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM savings_goals
             ORDER BY target_date IS NULL, target_date ASC, id ASC
             LIMIT ? OFFSET ?",
            COLUMNS
        ))?;

        let goals = stmt
            .query_map(params![limit, offset], Self::row_to_savings_goal)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(goals)
    }

    /// Unmet goals whose target date falls within `[from, to]`
    pub fn unmet_goals_due_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<SavingsGoal>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM savings_goals
             WHERE target_date IS NOT NULL
               AND target_date BETWEEN ? AND ?
               AND current_amount < goal_amount
             ORDER BY target_date ASC, id ASC",
            COLUMNS
        ))?;

        let goals = stmt
            .query_map(
                params![from.to_string(), to.to_string()],
                Self::row_to_savings_goal,
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(goals)
    }

    /// Apply a partial update; `None` when no goal has that ID.
    ///
    /// An explicit `Some(None)` clears a date.
    pub fn update_savings_goal(
        &self,
        id: i64,
        update: &SavingsGoalUpdate,
    ) -> Result<Option<SavingsGoal>> {
        if update.is_empty() {
            return Err(Error::InvalidData(
                "At least one field must be provided for update".to_string(),
            ));
        }

        let Some(existing) = self.get_savings_goal(id)? else {
            return Ok(None);
        };

        let goal_name = update
            .goal_name
            .as_deref()
            .map(str::trim)
            .unwrap_or(&existing.goal_name)
            .to_string();
        let goal_amount = update.goal_amount.unwrap_or(existing.goal_amount);
        let current_amount = update.current_amount.unwrap_or(existing.current_amount);
        let start_date = update.start_date.unwrap_or(existing.start_date);
        let target_date = update.target_date.unwrap_or(existing.target_date);
        let notes = update.notes.clone().or_else(|| existing.notes.clone());

        require_text("goal_name", &goal_name)?;
        require_positive("goal_amount", goal_amount)?;
        require_non_negative("current_amount", current_amount)?;

        let conn = self.conn()?;
        conn.execute(
            "UPDATE savings_goals SET goal_name = ?, goal_amount = ?, current_amount = ?,
                    start_date = ?, target_date = ?, notes = ?, updated_at = CURRENT_TIMESTAMP
             WHERE id = ?",
            params![
                goal_name,
                goal_amount,
                current_amount,
                start_date.map(|d| d.to_string()),
                target_date.map(|d| d.to_string()),
                notes,
                id
            ],
        )?;

        self.get_savings_goal(id)
    }

    pub fn delete_savings_goal(&self, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM savings_goals WHERE id = ?", params![id])?;
        Ok(deleted > 0)
    }

    fn row_to_savings_goal(row: &rusqlite::Row) -> rusqlite::Result<SavingsGoal> {
        let start_date: Option<String> = row.get(4)?;
        let target_date: Option<String> = row.get(5)?;
        let created_at_str: String = row.get(7)?;
        let updated_at_str: String = row.get(8)?;

        Ok(SavingsGoal {
            id: row.get(0)?,
            goal_name: row.get(1)?,
            goal_amount: row.get(2)?,
            current_amount: row.get(3)?,
            start_date: start_date.as_deref().map(|s| parse_date(4, s)).transpose()?,
            target_date: target_date.as_deref().map(|s| parse_date(5, s)).transpose()?,
            notes: row.get(6)?,
            created_at: parse_datetime(&created_at_str),
            updated_at: parse_datetime(&updated_at_str),
        })
    }
}
