pub mod health;
pub mod profiles;

use axum::{routing::get, routing::post, Router};
use std::sync::Arc;

use crate::app::AppState;

/// Build the API router with all routes
pub fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        // Public routes
        .route("/health", get(health::health_check))
        // Protected routes
        .route("/api/save-user", post(profiles::save_user))
        .route("/api/user-profile", get(profiles::get_user_profile))
}
