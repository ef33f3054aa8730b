//! Spending analytics handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use super::today;
use crate::{AppError, AppState};
use fintrack_core::models::{CategoryExpenseStat, MonthlyTrendStat};
use fintrack_core::{parse_target_date, Granularity};

/// Months covered by the trend when `months` is absent
pub const DEFAULT_TREND_MONTHS: u32 = 6;

#[derive(Debug, Deserialize)]
pub struct CategoryQuery {
    /// Month as YYYY-MM; defaults to the current month
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TrendQuery {
    pub months: Option<String>,
}

/// GET /api/v1/analytics/expense-categories
pub async fn expense_categories(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CategoryQuery>,
) -> Result<Json<Vec<CategoryExpenseStat>>, AppError> {
    let month = parse_target_date(query.date.as_deref(), Granularity::Monthly, today())?;
    Ok(Json(state.db.expense_breakdown(month)?))
}

/// GET /api/v1/analytics/income-expense-trend
pub async fn income_expense_trend(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TrendQuery>,
) -> Result<Json<Vec<MonthlyTrendStat>>, AppError> {
    let months = match query.months.as_deref().map(str::trim) {
        None | Some("") => DEFAULT_TREND_MONTHS,
        Some(raw) => raw.parse::<u32>().ok().filter(|n| *n > 0).ok_or_else(|| {
            AppError::bad_request(
                "Invalid number of months specified. Must be a positive integer.",
            )
        })?,
    };

    Ok(Json(state.db.income_expense_trend(today(), months)?))
}
