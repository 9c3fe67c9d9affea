//! API route handlers

pub mod chain;
pub mod health;
pub mod treasury;

use axum::{routing::get, Router};

use crate::AppState;

/// Create the API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .nest("/chain", chain::router())
        .nest("/treasury", treasury::router())
        .with_state(state)
}
