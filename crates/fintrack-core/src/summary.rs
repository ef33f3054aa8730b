//! Period summaries: get-or-create cache and invalidation
//!
//! Only the `overall` view is cached. A cached row is returned verbatim until
//! a write to a record dated inside its period invalidates (deletes) it; the
//! next request then recomputes from the income and expense tables.
//!
//! There are no in-process locks. Two concurrent first requests for the same
//! bucket may both compute, but the UNIQUE constraint on
//! `(granularity, period_start)` lets exactly one insert win and the loser
//! re-reads the winner's row.

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::{FinancialSummary, Granularity, SummaryView, TransactionKind};
use crate::period::{calculate_period, Period};

impl Database {
    /// Summary of the `granularity` bucket containing `target` for `view`
    pub fn get_or_create_summary(
        &self,
        granularity: Granularity,
        target: NaiveDate,
        view: SummaryView,
    ) -> Result<FinancialSummary> {
        let period = calculate_period(target, granularity)?;

        let (total_income, total_expenses) = match view {
            SummaryView::Overall => {
                if let Some(cached) = self.fetch_summary(granularity, period.start)? {
                    debug!(%granularity, period_start = %period.start, "Summary cache hit");
                    return Ok(cached);
                }
                return self.compute_and_store_summary(granularity, period);
            }
            SummaryView::Income => (
                self.sum_amount(TransactionKind::Income, period.start, period.end)?,
                0.0,
            ),
            SummaryView::Expenses => (
                0.0,
                self.sum_amount(TransactionKind::Expense, period.start, period.end)?,
            ),
            SummaryView::Savings | SummaryView::Debts => {
                return Err(Error::NotImplemented(format!(
                    "'{}' summary view",
                    view
                )));
            }
        };

        Ok(FinancialSummary {
            id: None,
            granularity,
            period_start: period.start,
            period_end: period.end,
            total_income,
            total_expenses,
            net_balance: total_income - total_expenses,
            created_at: None,
        })
    }

    /// Compute the overall totals for `period` and persist them.
    ///
    /// Losing an insert race to another writer is not an error: the row that
    /// won is read back and returned instead.
    pub(crate) fn compute_and_store_summary(
        &self,
        granularity: Granularity,
        period: Period,
    ) -> Result<FinancialSummary> {
        let total_income = self.sum_amount(TransactionKind::Income, period.start, period.end)?;
        let total_expenses = self.sum_amount(TransactionKind::Expense, period.start, period.end)?;

        let computed = FinancialSummary {
            id: None,
            granularity,
            period_start: period.start,
            period_end: period.end,
            total_income,
            total_expenses,
            net_balance: total_income - total_expenses,
            created_at: None,
        };

        match self.insert_summary(&computed) {
            Ok(stored) => {
                debug!(%granularity, period_start = %period.start, "Stored new summary");
                Ok(stored)
            }
            Err(e) if e.is_unique_violation() => {
                debug!(
                    %granularity,
                    period_start = %period.start,
                    "Summary inserted concurrently, re-reading"
                );
                let winner = self.fetch_summary(granularity, period.start)?;
                conflict_winner(winner, granularity, period)
            }
            Err(e) => Err(e),
        }
    }

    /// Delete the cached summary of every bucket in `granularities` that
    /// contains `date`.
    ///
    /// Each granularity is attempted even if an earlier one fails. Returns the
    /// number of rows deleted, or `PartialInvalidation` describing the first
    /// failure.
    pub fn invalidate_for_date(
        &self,
        date: NaiveDate,
        granularities: &[Granularity],
    ) -> Result<usize> {
        let mut deleted = 0;
        let mut failed = 0;
        let mut first: Option<String> = None;

        for &granularity in granularities {
            let outcome = calculate_period(date, granularity)
                .and_then(|period| Ok((period, self.delete_summary(granularity, period.start)?)));

            match outcome {
                Ok((period, rows)) => {
                    deleted += rows;
                    if rows > 0 {
                        info!(
                            %granularity,
                            period_start = %period.start,
                            "Invalidated cached summary"
                        );
                    }
                }
                Err(e) => {
                    warn!(%granularity, %date, error = %e, "Failed to invalidate summary");
                    failed += 1;
                    first.get_or_insert_with(|| format!("{}: {}", granularity, e));
                }
            }
        }

        match first {
            Some(first) => Err(Error::PartialInvalidation { failed, first }),
            None => Ok(deleted),
        }
    }
}

/// The row that won an insert race. An invalidation can delete it before the
/// re-read; that surfaces as a storage error, not a missing resource.
fn conflict_winner(
    winner: Option<FinancialSummary>,
    granularity: Granularity,
    period: Period,
) -> Result<FinancialSummary> {
    winner.ok_or_else(|| {
        warn!(
            %granularity,
            period_start = %period.start,
            "Summary vanished between insert conflict and re-read"
        );
        Error::Database(rusqlite::Error::QueryReturnedNoRows)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewTransaction;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn add(db: &Database, kind: TransactionKind, amount: f64, date: &str) {
        db.create_transaction(
            kind,
            &NewTransaction {
                amount,
                category: "Test".to_string(),
                date: d(date),
                note: None,
            },
        )
        .unwrap();
    }

    /// April 2023: 1500 income, 500 expenses, plus records outside the month
    fn seeded() -> Database {
        let db = Database::in_memory().unwrap();
        add(&db, TransactionKind::Income, 1000.0, "2023-04-01");
        add(&db, TransactionKind::Income, 500.0, "2023-04-30");
        add(&db, TransactionKind::Expense, 200.0, "2023-04-10");
        add(&db, TransactionKind::Expense, 300.0, "2023-04-15");
        add(&db, TransactionKind::Income, 9999.0, "2023-03-31");
        add(&db, TransactionKind::Expense, 9999.0, "2023-05-01");
        db
    }

    #[test]
    fn test_overall_monthly_computes_and_caches() {
        let db = seeded();

        let first = db
            .get_or_create_summary(Granularity::Monthly, d("2023-04-10"), SummaryView::Overall)
            .unwrap();
        assert!(first.id.is_some());
        assert_eq!(first.period_start, d("2023-04-01"));
        assert_eq!(first.period_end, d("2023-04-30"));
        assert_eq!(first.total_income, 1500.0);
        assert_eq!(first.total_expenses, 500.0);
        assert_eq!(first.net_balance, 1000.0);

        // New data without invalidation: the cached row is returned verbatim
        add(&db, TransactionKind::Income, 250.0, "2023-04-20");
        let second = db
            .get_or_create_summary(Granularity::Monthly, d("2023-04-25"), SummaryView::Overall)
            .unwrap();
        assert_eq!(second, first);
        assert_eq!(db.list_cached_summaries().unwrap().len(), 1);
    }

    #[test]
    fn test_invalidation_forces_recompute() {
        let db = seeded();
        db.get_or_create_summary(Granularity::Monthly, d("2023-04-10"), SummaryView::Overall)
            .unwrap();

        add(&db, TransactionKind::Income, 250.0, "2023-04-20");
        let deleted = db
            .invalidate_for_date(d("2023-04-20"), &Granularity::ALL)
            .unwrap();
        assert_eq!(deleted, 1);

        let fresh = db
            .get_or_create_summary(Granularity::Monthly, d("2023-04-10"), SummaryView::Overall)
            .unwrap();
        assert_eq!(fresh.total_income, 1750.0);
        assert_eq!(fresh.net_balance, 1250.0);
    }

    #[test]
    fn test_empty_period_is_zero() {
        let db = Database::in_memory().unwrap();
        let summary = db
            .get_or_create_summary(Granularity::Weekly, d("2023-11-15"), SummaryView::Overall)
            .unwrap();
        assert_eq!(summary.period_start, d("2023-11-13"));
        assert_eq!(summary.period_end, d("2023-11-19"));
        assert_eq!(summary.total_income, 0.0);
        assert_eq!(summary.total_expenses, 0.0);
        assert_eq!(summary.net_balance, 0.0);
    }

    #[test]
    fn test_income_and_expense_views_are_not_persisted() {
        let db = seeded();

        let income = db
            .get_or_create_summary(Granularity::Monthly, d("2023-04-10"), SummaryView::Income)
            .unwrap();
        assert_eq!(income.id, None);
        assert_eq!(income.total_income, 1500.0);
        assert_eq!(income.total_expenses, 0.0);
        assert_eq!(income.net_balance, 1500.0);

        let expenses = db
            .get_or_create_summary(Granularity::Monthly, d("2023-04-10"), SummaryView::Expenses)
            .unwrap();
        assert_eq!(expenses.id, None);
        assert_eq!(expenses.total_income, 0.0);
        assert_eq!(expenses.total_expenses, 500.0);
        assert_eq!(expenses.net_balance, -500.0);

        assert!(db.list_cached_summaries().unwrap().is_empty());
    }

    #[test]
    fn test_views_do_not_disturb_cached_overall() {
        let db = seeded();
        let overall = db
            .get_or_create_summary(Granularity::Monthly, d("2023-04-10"), SummaryView::Overall)
            .unwrap();

        db.get_or_create_summary(Granularity::Monthly, d("2023-04-10"), SummaryView::Income)
            .unwrap();

        let cached = db.list_cached_summaries().unwrap();
        assert_eq!(cached, vec![overall]);
    }

    #[test]
    fn test_reserved_views_are_not_implemented() {
        let db = seeded();
        for view in [SummaryView::Savings, SummaryView::Debts] {
            let result = db.get_or_create_summary(Granularity::Monthly, d("2023-04-10"), view);
            assert!(matches!(result, Err(Error::NotImplemented(_))));
        }
        assert!(db.list_cached_summaries().unwrap().is_empty());
    }

    #[test]
    fn test_unknown_view_string_is_rejected() {
        let err = "weekly".parse::<SummaryView>().unwrap_err();
        assert!(matches!(err, Error::InvalidView(ref v) if v == "weekly"));
        let err = "daily".parse::<Granularity>().unwrap_err();
        assert!(matches!(err, Error::InvalidGranularity(ref g) if g == "daily"));
    }

    #[test]
    fn test_insert_race_rereads_existing_row() {
        let db = seeded();
        let period = calculate_period(d("2023-04-10"), Granularity::Monthly).unwrap();

        // Another writer stored the bucket between our read and our insert
        let winner = db
            .insert_summary(&FinancialSummary {
                id: None,
                granularity: Granularity::Monthly,
                period_start: period.start,
                period_end: period.end,
                total_income: 42.0,
                total_expenses: 2.0,
                net_balance: 40.0,
                created_at: None,
            })
            .unwrap();

        let result = db
            .compute_and_store_summary(Granularity::Monthly, period)
            .unwrap();
        assert_eq!(result, winner);
        assert_eq!(db.list_cached_summaries().unwrap().len(), 1);
    }

    #[test]
    fn test_insert_race_winner_deleted_before_reread() {
        let period = calculate_period(d("2023-04-10"), Granularity::Monthly).unwrap();

        let result = conflict_winner(None, Granularity::Monthly, period);
        assert!(matches!(
            result,
            Err(Error::Database(rusqlite::Error::QueryReturnedNoRows))
        ));
        assert!(!matches!(result, Err(Error::NotFound(_))));
    }

    #[test]
    fn test_concurrent_first_requests_converge() {
        let db = seeded();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let db = db.clone();
                std::thread::spawn(move || {
                    db.get_or_create_summary(
                        Granularity::Monthly,
                        d("2023-04-10"),
                        SummaryView::Overall,
                    )
                    .unwrap()
                })
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let first_id = results[0].id;
        assert!(results.iter().all(|s| s.id == first_id));
        assert!(results.iter().all(|s| s.total_income == 1500.0));
        assert_eq!(db.list_cached_summaries().unwrap().len(), 1);
    }

    #[test]
    fn test_invalidate_single_granularity_leaves_others() {
        let db = seeded();
        for g in Granularity::ALL {
            db.get_or_create_summary(g, d("2023-04-10"), SummaryView::Overall)
                .unwrap();
        }

        let deleted = db
            .invalidate_for_date(d("2023-04-12"), &[Granularity::Monthly])
            .unwrap();
        assert_eq!(deleted, 1);

        let remaining: Vec<Granularity> = db
            .list_cached_summaries()
            .unwrap()
            .into_iter()
            .map(|s| s.granularity)
            .collect();
        assert_eq!(remaining.len(), 2);
        assert!(remaining.contains(&Granularity::Weekly));
        assert!(remaining.contains(&Granularity::Yearly));
    }

    #[test]
    fn test_invalidate_only_touches_buckets_containing_date() {
        let db = seeded();
        db.get_or_create_summary(Granularity::Monthly, d("2023-04-10"), SummaryView::Overall)
            .unwrap();
        db.get_or_create_summary(Granularity::Monthly, d("2023-05-10"), SummaryView::Overall)
            .unwrap();

        db.invalidate_for_date(d("2023-05-02"), &Granularity::ALL)
            .unwrap();

        let remaining = db.list_cached_summaries().unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].period_start, d("2023-04-01"));
    }

    #[test]
    fn test_invalidate_edge_cases_succeed() {
        let db = seeded();
        db.get_or_create_summary(Granularity::Weekly, d("2023-04-10"), SummaryView::Overall)
            .unwrap();

        // Empty set deletes nothing
        assert_eq!(db.invalidate_for_date(d("2023-04-10"), &[]).unwrap(), 0);
        assert_eq!(db.list_cached_summaries().unwrap().len(), 1);

        // Nothing cached for that date is still a success
        assert_eq!(
            db.invalidate_for_date(d("2021-01-01"), &Granularity::ALL)
                .unwrap(),
            0
        );

        // Repeated invalidation is a no-op the second time
        assert_eq!(
            db.invalidate_for_date(d("2023-04-10"), &Granularity::ALL)
                .unwrap(),
            1
        );
        assert_eq!(
            db.invalidate_for_date(d("2023-04-10"), &Granularity::ALL)
                .unwrap(),
            0
        );
    }

    #[test]
    fn test_invalidate_reports_first_failure_and_continues() {
        let db = seeded();
        // The monthly bucket of the last representable date overflows; the
        // yearly one does not.
        let result = db.invalidate_for_date(
            NaiveDate::MAX,
            &[Granularity::Monthly, Granularity::Yearly, Granularity::Monthly],
        );
        match result {
            Err(Error::PartialInvalidation { failed, first }) => {
                assert_eq!(failed, 2);
                assert!(first.starts_with("monthly"));
            }
            other => panic!("expected PartialInvalidation, got {:?}", other),
        }
    }
}
