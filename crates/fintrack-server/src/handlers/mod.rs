//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod advice;
pub mod analytics;
pub mod debts;
pub mod health;
pub mod reports;
pub mod savings;
pub mod summary;
pub mod transactions;

// Re-export all handlers for use in router
pub use advice::*;
pub use analytics::*;
pub use debts::*;
pub use health::*;
pub use reports::*;
pub use savings::*;
pub use summary::*;
pub use transactions::*;

use axum::{extract::rejection::JsonRejection, Json};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;

use crate::{AppError, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};

/// `page` / `limit` query parameters. Unparseable or non-positive values fall
/// back to the defaults.
#[derive(Debug, Default, Deserialize)]
pub struct Pagination {
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl Pagination {
    /// `(limit, offset)` for the requested page
    pub fn limit_offset(&self) -> (i64, i64) {
        let parse = |raw: &Option<String>| {
            raw.as_deref()
                .and_then(|s| s.trim().parse::<i64>().ok())
                .filter(|n| *n >= 1)
        };

        let page = parse(&self.page).unwrap_or(1);
        let limit = parse(&self.limit)
            .unwrap_or(DEFAULT_PAGE_LIMIT)
            .min(MAX_PAGE_LIMIT);
        (limit, (page - 1).saturating_mul(limit))
    }
}

/// Parse a record ID path segment; non-numeric and non-positive IDs are rejected
pub(crate) fn parse_id(raw: &str, what: &str) -> Result<i64, AppError> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| AppError::bad_request(&format!("Invalid {} ID format", what)))
}

/// Unwrap a JSON body, turning extractor rejections into 400s
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(body)| body)
        .map_err(|e| AppError::bad_request(&format!("Invalid request body: {}", e.body_text())))
}

/// Parse a required `YYYY-MM-DD` query parameter
pub(crate) fn parse_query_date(raw: Option<&str>, name: &str) -> Result<NaiveDate, AppError> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty()).ok_or_else(|| {
        AppError::bad_request(&format!(
            "{} query parameter is required in YYYY-MM-DD format",
            name
        ))
    })?;

    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        AppError::bad_request(&format!("Invalid {} '{}'. Use YYYY-MM-DD", name, raw))
    })
}

pub(crate) fn today() -> NaiveDate {
    Utc::now().date_naive()
}
