//! Collection Loan Search Routes
//!
//! - GET /loans/collections - collections searchable for active loans
//! - GET /loans/collection/{address} - active loans of one collection,
//!   with the collection's max collateralization and per-loan health

use alloy::primitives::Address;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use crate::dto::{ApiError, CollectionInfo, CollectionLoansResponse};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/collections", get(list_collections))
        .route("/collection/:address", get(get_collection_loans))
}

/// GET /loans/collections - the active chain's supported collections
async fn list_collections(
    State(state): State<AppState>,
) -> Result<Json<Vec<CollectionInfo>>, (StatusCode, Json<ApiError>)> {
    let config = state.config().await;
    let deployment = config
        .deployments
        .for_chain(config.chain)
        .ok_or_else(|| {
            ApiError::from_protocol(&bastion_core::ProtocolError::ChainNotSupported {
                chain_id: config.chain.as_u64(),
            })
        })?;

    Ok(Json(
        deployment
            .supported_collections
            .iter()
            .map(CollectionInfo::from)
            .collect(),
    ))
}

/// GET /loans/collection/{address}
async fn get_collection_loans(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<CollectionLoansResponse>, (StatusCode, Json<ApiError>)> {
    let collection: Address = address
        .parse()
        .map_err(|_| ApiError::bad_request(format!("Invalid collection address: {}", address)))?;

    let view = state
        .collection_loans(collection)
        .await
        .map_err(|e| ApiError::from_protocol(&e))?;

    Ok(Json(CollectionLoansResponse::from(&view)))
}
