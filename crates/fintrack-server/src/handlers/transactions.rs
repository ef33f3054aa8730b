//! Income and expense handlers
//!
//! Both resources share one implementation keyed by `TransactionKind`. Every
//! write invalidates the cached summaries covering the affected dates.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use super::{json_body, parse_id, Pagination};
use crate::{AppError, AppState};
use fintrack_core::models::{NewTransaction, Transaction, TransactionUpdate};
use fintrack_core::TransactionKind;

fn resource(kind: TransactionKind) -> &'static str {
    match kind {
        TransactionKind::Income => "income",
        TransactionKind::Expense => "expense",
    }
}

async fn create_record(
    state: &AppState,
    kind: TransactionKind,
    payload: Result<Json<NewTransaction>, JsonRejection>,
) -> Result<(StatusCode, Json<Transaction>), AppError> {
    let new = json_body(payload)?;
    let created = state.db.create_transaction(kind, &new)?;
    info!(kind = %kind, id = created.id, date = %created.date, "Recorded transaction");

    state.invalidate_summaries(vec![created.date]).await;

    Ok((StatusCode::CREATED, Json(created)))
}

fn list_records(
    state: &AppState,
    kind: TransactionKind,
    pagination: &Pagination,
) -> Result<Json<Vec<Transaction>>, AppError> {
    let (limit, offset) = pagination.limit_offset();
    Ok(Json(state.db.list_transactions(kind, limit, offset)?))
}

fn get_record(
    state: &AppState,
    kind: TransactionKind,
    raw_id: &str,
) -> Result<Json<Transaction>, AppError> {
    let id = parse_id(raw_id, resource(kind))?;
    state
        .db
        .get_transaction(kind, id)?
        .map(Json)
        .ok_or_else(|| AppError::not_found(&format!("{} record {} not found", resource(kind), id)))
}

async fn update_record(
    state: &AppState,
    kind: TransactionKind,
    raw_id: &str,
    payload: Result<Json<TransactionUpdate>, JsonRejection>,
) -> Result<Json<Transaction>, AppError> {
    let id = parse_id(raw_id, resource(kind))?;
    let update = json_body(payload)?;
    if update.is_empty() {
        return Err(AppError::bad_request(
            "At least one field must be provided for update",
        ));
    }

    let (before, after) = state
        .db
        .update_transaction(kind, id, &update)?
        .ok_or_else(|| AppError::not_found(&format!("{} record {} not found", resource(kind), id)))?;

    state
        .invalidate_summaries(vec![before.date, after.date])
        .await;

    Ok(Json(after))
}

async fn delete_record(
    state: &AppState,
    kind: TransactionKind,
    raw_id: &str,
) -> Result<StatusCode, AppError> {
    let id = parse_id(raw_id, resource(kind))?;
    let removed = state
        .db
        .delete_transaction(kind, id)?
        .ok_or_else(|| AppError::not_found(&format!("{} record {} not found", resource(kind), id)))?;
    info!(kind = %kind, id, date = %removed.date, "Deleted transaction");

    state.invalidate_summaries(vec![removed.date]).await;

    Ok(StatusCode::NO_CONTENT)
}

// ----------------------------------------------------------------------------
// Income
// ----------------------------------------------------------------------------

/// POST /api/v1/income
pub async fn create_income(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewTransaction>, JsonRejection>,
) -> Result<(StatusCode, Json<Transaction>), AppError> {
    create_record(&state, TransactionKind::Income, payload).await
}

/// GET /api/v1/income
pub async fn list_income(
    State(state): State<Arc<AppState>>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Vec<Transaction>>, AppError> {
    list_records(&state, TransactionKind::Income, &pagination)
}

/// GET /api/v1/income/:id
pub async fn get_income(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Transaction>, AppError> {
    get_record(&state, TransactionKind::Income, &id)
}

/// PUT /api/v1/income/:id
pub async fn update_income(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<TransactionUpdate>, JsonRejection>,
) -> Result<Json<Transaction>, AppError> {
    update_record(&state, TransactionKind::Income, &id, payload).await
}

/// DELETE /api/v1/income/:id
pub async fn delete_income(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    delete_record(&state, TransactionKind::Income, &id).await
}

// ----------------------------------------------------------------------------
// Expenses
// ----------------------------------------------------------------------------

/// POST /api/v1/expenses
pub async fn create_expense(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewTransaction>, JsonRejection>,
) -> Result<(StatusCode, Json<Transaction>), AppError> {
    create_record(&state, TransactionKind::Expense, payload).await
}

/// GET /api/v1/expenses
pub async fn list_expenses(
    State(state): State<Arc<AppState>>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Vec<Transaction>>, AppError> {
    list_records(&state, TransactionKind::Expense, &pagination)
}

/// GET /api/v1/expenses/:id
pub async fn get_expense(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Transaction>, AppError> {
    get_record(&state, TransactionKind::Expense, &id)
}

/// PUT /api/v1/expenses/:id
pub async fn update_expense(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<TransactionUpdate>, JsonRejection>,
) -> Result<Json<Transaction>, AppError> {
    update_record(&state, TransactionKind::Expense, &id, payload).await
}

/// DELETE /api/v1/expenses/:id
pub async fn delete_expense(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    delete_record(&state, TransactionKind::Expense, &id).await
}
