//! Debt handlers

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use super::{json_body, parse_id, Pagination};
use crate::{AppError, AppState};
use fintrack_core::models::{Debt, DebtStatus, DebtUpdate, NewDebt};

#[derive(Debug, Deserialize)]
pub struct DebtFilter {
    /// Pending, Paid or Overdue
    pub status: Option<String>,
}

/// POST /api/v1/debts
pub async fn create_debt(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewDebt>, JsonRejection>,
) -> Result<(StatusCode, Json<Debt>), AppError> {
    let new = json_body(payload)?;
    let debt = state.db.create_debt(&new)?;
    Ok((StatusCode::CREATED, Json(debt)))
}

/// GET /api/v1/debts - List debts by due date
pub async fn list_debts(
    State(state): State<Arc<AppState>>,
    Query(pagination): Query<Pagination>,
    Query(filter): Query<DebtFilter>,
) -> Result<Json<Vec<Debt>>, AppError> {
    let status = filter
        .status
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(str::parse::<DebtStatus>)
        .transpose()?;
    let (limit, offset) = pagination.limit_offset();

    Ok(Json(state.db.list_debts(status, limit, offset)?))
}

/// GET /api/v1/debts/:id
pub async fn get_debt(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Debt>, AppError> {
    let id = parse_id(&id, "debt")?;
    state
        .db
        .get_debt(id)?
        .map(Json)
        .ok_or_else(|| AppError::not_found(&format!("debt record {} not found", id)))
}

/// PUT /api/v1/debts/:id
pub async fn update_debt(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<DebtUpdate>, JsonRejection>,
) -> Result<Json<Debt>, AppError> {
    let id = parse_id(&id, "debt")?;
    let update = json_body(payload)?;
    if update.is_empty() {
        return Err(AppError::bad_request(
            "At least one field must be provided for update",
        ));
    }

    state
        .db
        .update_debt(id, &update)?
        .map(Json)
        .ok_or_else(|| AppError::not_found(&format!("debt record {} not found", id)))
}

/// DELETE /api/v1/debts/:id
pub async fn delete_debt(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&id, "debt")?;
    if !state.db.delete_debt(id)? {
        return Err(AppError::not_found(&format!("debt record {} not found", id)));
    }
    Ok(StatusCode::NO_CONTENT)
}
