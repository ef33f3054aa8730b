//! Period summary handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use super::today;
use crate::{AppError, AppState};
use fintrack_core::models::FinancialSummary;
use fintrack_core::{parse_target_date, Granularity, SummaryView};

#[derive(Debug, Default, Deserialize)]
pub struct SummaryQuery {
    /// Target date; format depends on the granularity. Defaults to today.
    pub date: Option<String>,
    /// overall (default), income or expenses
    pub view: Option<String>,
}

fn summary_for(
    state: &AppState,
    granularity: Granularity,
    query: &SummaryQuery,
) -> Result<Json<FinancialSummary>, AppError> {
    let view: SummaryView = query.view.as_deref().unwrap_or("").parse()?;
    let target = parse_target_date(query.date.as_deref(), granularity, today())?;

    Ok(Json(state.db.get_or_create_summary(granularity, target, view)?))
}

/// GET /api/v1/summary/weekly?date=YYYY-MM-DD
pub async fn weekly_summary(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<FinancialSummary>, AppError> {
    summary_for(&state, Granularity::Weekly, &query)
}

/// GET /api/v1/summary/monthly?date=YYYY-MM
pub async fn monthly_summary(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<FinancialSummary>, AppError> {
    summary_for(&state, Granularity::Monthly, &query)
}

/// GET /api/v1/summary/yearly?date=YYYY
pub async fn yearly_summary(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<FinancialSummary>, AppError> {
    summary_for(&state, Granularity::Yearly, &query)
}
