use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;

use super::auth::CurrentUser;
use super::{ApiError, AppState, HabitDto, validation};
use crate::db::HabitChanges;

#[derive(Debug, Deserialize)]
pub struct CreateHabitRequest {
    pub name: String,
    pub category: Option<String>,
    pub target_per_day: i32,
}

#[derive(Debug, Deserialize)]
pub struct UpdateHabitRequest {
    pub name: Option<String>,
    pub category: Option<String>,
    pub target_per_day: Option<i32>,
}

/// POST /habits
pub async fn create_habit(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(payload): Json<CreateHabitRequest>,
) -> Result<Json<HabitDto>, ApiError> {
    let name = validation::validate_habit_name(&payload.name)?;
    let target_per_day = validation::validate_non_negative("target_per_day", payload.target_per_day)?;

    let habit = state
        .store()
        .create_habit(user.id, name.to_string(), payload.category, target_per_day)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;

    Ok(Json(HabitDto::from(habit)))
}

/// GET /habits
pub async fn list_habits(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<Vec<HabitDto>>, ApiError> {
    let habits = state
        .store()
        .list_habits(user.id)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;

    Ok(Json(habits.into_iter().map(HabitDto::from).collect()))
}

/// GET /habits/{id}
pub async fn get_habit(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> Result<Json<HabitDto>, ApiError> {
    let habit = state
        .store()
        .get_habit(user.id, id)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?
        .ok_or_else(ApiError::habit_not_found)?;

    Ok(Json(HabitDto::from(habit)))
}

/// PUT /habits/{id}
/// Partial update: absent fields keep their stored values
pub async fn update_habit(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateHabitRequest>,
) -> Result<Json<HabitDto>, ApiError> {
    let name = payload
        .name
        .as_deref()
        .map(validation::validate_habit_name)
        .transpose()?
        .map(str::to_string);

    let target_per_day = payload
        .target_per_day
        .map(|t| validation::validate_non_negative("target_per_day", t))
        .transpose()?;

    let changes = HabitChanges {
        name,
        category: payload.category,
        target_per_day,
    };

    let habit = state
        .store()
        .update_habit(user.id, id, changes)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?
        .ok_or_else(ApiError::habit_not_found)?;

    Ok(Json(HabitDto::from(habit)))
}

/// DELETE /habits/{id}
/// Removes the habit and its progress entries, responds 204 on success
pub async fn delete_habit(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let deleted = state
        .store()
        .delete_habit(user.id, id)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;

    if !deleted {
        return Err(ApiError::habit_not_found());
    }

    Ok(StatusCode::NO_CONTENT)
}
