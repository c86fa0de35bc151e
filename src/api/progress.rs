use axum::{
    Json,
    extract::{Path, State},
};
use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, AppState, ProgressDto, validation};

#[derive(Debug, Deserialize)]
pub struct CreateProgressRequest {
    pub habit_id: i32,
    pub date_tracked: Option<NaiveDate>,
    pub amount_done: i32,
}

/// POST /progress
/// Records an entry against a habit; the date defaults to today (UTC)
pub async fn create_progress(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateProgressRequest>,
) -> Result<Json<ProgressDto>, ApiError> {
    let habit_id = validation::validate_habit_id(payload.habit_id)?;
    let amount_done = validation::validate_non_negative("amount_done", payload.amount_done)?;

    let entry = state
        .store()
        .create_progress(habit_id, payload.date_tracked, amount_done)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?
        .ok_or_else(|| ApiError::validation(format!("Unknown habit ID: {habit_id}")))?;

    Ok(Json(ProgressDto::from(entry)))
}

/// GET /progress
pub async fn list_all_progress(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ProgressDto>>, ApiError> {
    let entries = state
        .store()
        .list_all_progress()
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;

    Ok(Json(entries.into_iter().map(ProgressDto::from).collect()))
}

/// GET /habits/{id}/progress
/// Entries for one habit; an unknown habit simply yields an empty list
pub async fn list_habit_progress(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<ProgressDto>>, ApiError> {
    let entries = state
        .store()
        .list_progress_for_habit(id)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;

    Ok(Json(entries.into_iter().map(ProgressDto::from).collect()))
}
