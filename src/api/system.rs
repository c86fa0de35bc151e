use axum::Json;

use super::MessageResponse;

/// GET /
pub async fn welcome() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Welcome to the habit tracker API".to_string(),
    })
}
