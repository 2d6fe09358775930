//! API route handlers

pub mod health;
pub mod loans;
pub mod node;
pub mod portfolio;
pub mod reserves;

use axum::{routing::get, Router};

use crate::AppState;

/// Create the API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .nest("/node", node::router())
        .nest("/portfolio", portfolio::router())
        .nest("/loans", loans::router())
        .nest("/reserves", reserves::router())
        .with_state(state)
}
