//! Reserve Registry Routes
//!
//! - GET /reserves - all registered reserves with assets, age, and TVL

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use crate::dto::{ApiError, ReserveInfo};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_reserves))
}

/// GET /reserves
async fn get_reserves(
    State(state): State<AppState>,
) -> Result<Json<Vec<ReserveInfo>>, (StatusCode, Json<ApiError>)> {
    let overviews = state
        .reserve_overviews()
        .await
        .map_err(|e| ApiError::from_protocol(&e))?;

    Ok(Json(overviews.iter().map(ReserveInfo::from).collect()))
}
