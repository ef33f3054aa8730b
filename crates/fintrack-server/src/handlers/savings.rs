//! Savings goal handlers

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};

use super::{json_body, parse_id, Pagination};
use crate::{AppError, AppState};
use fintrack_core::models::{NewSavingsGoal, SavingsGoal, SavingsGoalUpdate};

/// POST /api/v1/savings
pub async fn create_savings_goal(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewSavingsGoal>, JsonRejection>,
) -> Result<(StatusCode, Json<SavingsGoal>), AppError> {
    let new = json_body(payload)?;
    let goal = state.db.create_savings_goal(&new)?;
    Ok((StatusCode::CREATED, Json(goal)))
}

/// GET /api/v1/savings
pub async fn list_savings_goals(
    State(state): State<Arc<AppState>>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Vec<SavingsGoal>>, AppError> {
    let (limit, offset) = pagination.limit_offset();
    Ok(Json(state.db.list_savings_goals(limit, offset)?))
}

/// GET /api/v1/savings/:id
pub async fn get_savings_goal(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SavingsGoal>, AppError> {
    let id = parse_id(&id, "savings goal")?;
    state
        .db
        .get_savings_goal(id)?
        .map(Json)
        .ok_or_else(|| AppError::not_found(&format!("savings goal {} not found", id)))
}

/// PUT /api/v1/savings/:id - Partial update; `null` clears a date
pub async fn update_savings_goal(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<SavingsGoalUpdate>, JsonRejection>,
) -> Result<Json<SavingsGoal>, AppError> {
    let id = parse_id(&id, "savings goal")?;
    let update = json_body(payload)?;
    if update.is_empty() {
        return Err(AppError::bad_request(
            "At least one field must be provided for update",
        ));
    }

    state
        .db
        .update_savings_goal(id, &update)?
        .map(Json)
        .ok_or_else(|| AppError::not_found(&format!("savings goal {} not found", id)))
}

/// DELETE /api/v1/savings/:id
pub async fn delete_savings_goal(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&id, "savings goal")?;
    if !state.db.delete_savings_goal(id)? {
        return Err(AppError::not_found(&format!("savings goal {} not found", id)));
    }
    Ok(StatusCode::NO_CONTENT)
}
