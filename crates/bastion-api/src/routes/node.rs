//! Provider status and configuration routes
//!
//! - GET /node/status - RPC reachability and current block
//! - GET /node/config - active provider settings
//! - POST /node/config - update provider settings (drops the cached client)
//! - POST /node/chain - switch the active chain

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use bastion_core::{ChainId, ProviderConfig};

use crate::dto::{NodeConfigResponse, NodeStatusResponse, SetChainRequest};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/status", get(get_status))
        .route("/config", get(get_config).post(set_config))
        .route("/chain", post(set_chain))
}

/// GET /node/status
async fn get_status(State(state): State<AppState>) -> Json<NodeStatusResponse> {
    let chain = state.chain().await;

    let (online, current_block) = match state.chain_client().await {
        Some(client) => match client.current_block().await {
            Ok(height) => (true, Some(height)),
            Err(e) => {
                tracing::debug!(error = %e, "RPC status probe failed");
                (false, None)
            }
        },
        None => (false, None),
    };

    Json(NodeStatusResponse {
        online,
        current_block,
        chain_id: chain.as_u64(),
        network: chain.name().to_string(),
    })
}

/// GET /node/config
async fn get_config(State(state): State<AppState>) -> Json<NodeConfigResponse> {
    let config = state.config().await;
    Json(NodeConfigResponse {
        rpc_url: config.provider.rpc_url,
        indexer_url: config.provider.indexer_url,
        chain_id: config.chain.as_u64(),
    })
}

/// POST /node/config
async fn set_config(
    State(state): State<AppState>,
    Json(provider): Json<ProviderConfig>,
) -> Json<NodeConfigResponse> {
    state.set_provider_config(provider).await;
    get_config(State(state)).await
}

/// POST /node/chain
async fn set_chain(
    State(state): State<AppState>,
    Json(request): Json<SetChainRequest>,
) -> Json<NodeConfigResponse> {
    state.set_chain(ChainId::new(request.chain_id)).await;
    get_config(State(state)).await
}
