//! AI advice handler

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use super::today;
use crate::{AppError, AppState};
use fintrack_core::{AdviceBackend, Granularity, SummaryView};

#[derive(Serialize)]
pub struct AdviceResponse {
    pub advice: String,
}

/// GET /api/v1/advice - Advice for the current month's overall summary
pub async fn get_advice(
    State(state): State<Arc<AppState>>,
) -> Result<Json<AdviceResponse>, AppError> {
    let client = state
        .advice
        .as_ref()
        .ok_or_else(|| AppError::service_unavailable("AI advice feature is not configured."))?;

    let summary =
        state
            .db
            .get_or_create_summary(Granularity::Monthly, today(), SummaryView::Overall)?;

    let advice = client.advise(&summary).await?;
    Ok(Json(AdviceResponse { advice }))
}
