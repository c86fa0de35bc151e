use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::db::User;
use crate::entities::{habits, progress};

/// Error payload returned by every failing endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Public view of an account. The password hash never leaves the store.
/// Deserialize is derived so the CLI client can read it back off the wire.
#[derive(Debug, Serialize, Deserialize)]
pub struct UserDto {
    pub id: i32,
    pub username: String,
    pub email: String,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HabitDto {
    pub id: i32,
    pub name: String,
    pub category: Option<String>,
    pub target_per_day: i32,
}

impl From<habits::Model> for HabitDto {
    fn from(model: habits::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            category: model.category,
            target_per_day: model.target_per_day,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProgressDto {
    pub id: i32,
    pub habit_id: i32,
    pub date_tracked: NaiveDate,
    pub amount_done: i32,
}

impl From<progress::Model> for ProgressDto {
    fn from(model: progress::Model) -> Self {
        Self {
            id: model.id,
            habit_id: model.habit_id,
            date_tracked: model.date_tracked,
            amount_done: model.amount_done,
        }
    }
}
