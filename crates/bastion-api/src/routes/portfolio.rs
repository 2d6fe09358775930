//! Portfolio API Routes
//!
//! - GET /portfolio - current view model (never blocks on a build)
//! - POST /portfolio/refresh - trigger a snapshot rebuild for an account
//!
//! A refresh runs in the background; the view stays in its loading state
//! until the build publishes. Triggering again before it lands supersedes
//! it: the older build's result is discarded on arrival.

use alloy::primitives::Address;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::dto::{ApiError, PortfolioResponse, RefreshRequest, RefreshResponse};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_portfolio))
        .route("/refresh", post(refresh_portfolio))
}

/// GET /portfolio - the latest published view
async fn get_portfolio(State(state): State<AppState>) -> Json<PortfolioResponse> {
    let view = state.portfolio().view().await;
    Json(PortfolioResponse::from(&view))
}

/// POST /portfolio/refresh - start a snapshot build for an account
async fn refresh_portfolio(
    State(state): State<AppState>,
    Json(request): Json<RefreshRequest>,
) -> Result<Json<RefreshResponse>, (StatusCode, Json<ApiError>)> {
    let account: Address = request
        .account
        .parse()
        .map_err(|_| ApiError::bad_request(format!("Invalid account address: {}", request.account)))?;

    let token = state.portfolio().begin_refresh(account).await;

    let worker = state.clone();
    tokio::spawn(async move {
        let result = worker.build_portfolio(account).await;
        worker.portfolio().publish(token, result).await;
    });

    Ok(Json(RefreshResponse { generation: token }))
}
