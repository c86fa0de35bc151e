use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{delete, get, post, put},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::auth::TokenService;
use crate::config::{AuthConfig, Config};
use crate::state::SharedState;

pub mod auth;
mod error;
mod habits;
mod progress;
mod system;
mod types;
mod validation;

pub use error::ApiError;
pub use types::*;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.shared.config
    }

    #[must_use]
    pub fn auth_config(&self) -> &AuthConfig {
        &self.shared.config.auth
    }

    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }

    #[must_use]
    pub fn tokens(&self) -> &TokenService {
        &self.shared.tokens
    }
}

pub async fn create_app_state_from_config(config: Config) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(Arc::new(AppState { shared }))
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors_origins = state.config().server.cors_allowed_origins.clone();

    let protected_routes = create_protected_router(state.clone());

    // The progress endpoints sit outside the auth layer: the wire
    // contract exposes them without a token, so gating them here would
    // break every existing client.
    let api_router = Router::new()
        .merge(protected_routes)
        .route("/", get(system::welcome))
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/progress", post(progress::create_progress))
        .route("/progress", get(progress::list_all_progress))
        .route("/habits/{id}/progress", get(progress::list_habit_progress))
        .with_state(state);

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    api_router
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}

fn create_protected_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/habits", post(habits::create_habit))
        .route("/habits", get(habits::list_habits))
        .route("/habits/{id}", get(habits::get_habit))
        .route("/habits/{id}", put(habits::update_habit))
        .route("/habits/{id}", delete(habits::delete_habit))
        .route_layer(middleware::from_fn_with_state(state, auth::auth_middleware))
}
