//! Report download handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::header::{self, HeaderName},
    response::IntoResponse,
};
use chrono::NaiveDate;
use serde::Deserialize;

use super::parse_query_date;
use crate::{AppError, AppState};
use fintrack_core::{report_filename, ReportFormat};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

fn parse_range(query: &ReportQuery) -> Result<(NaiveDate, NaiveDate), AppError> {
    let start = parse_query_date(query.start_date.as_deref(), "startDate")?;
    let end = parse_query_date(query.end_date.as_deref(), "endDate")?;
    if start > end {
        return Err(AppError::bad_request("startDate cannot be after endDate"));
    }
    Ok((start, end))
}

fn attachment(start: NaiveDate, end: NaiveDate, format: ReportFormat) -> [(HeaderName, String); 2] {
    [
        (header::CONTENT_TYPE, format.content_type().to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", report_filename(start, end, format)),
        ),
    ]
}

/// GET /api/v1/reports/csv?startDate=YYYY-MM-DD&endDate=YYYY-MM-DD
pub async fn csv_report(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ReportQuery>,
) -> Result<impl IntoResponse, AppError> {
    let (start, end) = parse_range(&query)?;
    let csv = state.db.transactions_csv(start, end)?;
    Ok((attachment(start, end, ReportFormat::Csv), csv))
}

/// GET /api/v1/reports/pdf?startDate=YYYY-MM-DD&endDate=YYYY-MM-DD
pub async fn pdf_report(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ReportQuery>,
) -> Result<impl IntoResponse, AppError> {
    let (start, end) = parse_range(&query)?;

    let db = state.db.clone();
    let pdf = tokio::task::spawn_blocking(move || db.transactions_pdf(start, end))
        .await
        .map_err(|e| AppError::internal(&format!("PDF render task failed: {}", e)))??;

    Ok((attachment(start, end, ReportFormat::Pdf), pdf))
}
