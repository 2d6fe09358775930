//! evm-node-client: Chain-data provider for Bastion
//!
//! Wraps an alloy JSON-RPC provider for contract reads and block queries,
//! plus the NFT-indexer HTTP API for owned-asset enumeration and the
//! reserve registry. All outbound calls share one timeout policy.

pub mod indexer;

use alloy::eips::BlockNumberOrTag;
use alloy::providers::{Provider, RootProvider};
use bastion_core::{BlockHeight, ProviderError};

pub use indexer::{OwnedAsset, ReserveHandle};

/// Concrete provider type: alloy HTTP provider over Ethereum network.
pub type HttpProvider = RootProvider;

/// Default timeout for provider calls (30 seconds).
/// Long enough for slow RPC endpoints, short enough to avoid perpetual spinners.
const PROVIDER_REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

/// Result type for provider operations
pub type Result<T> = std::result::Result<T, ProviderError>;

/// High-level chain client: RPC provider + indexer API
#[derive(Clone, Debug)]
pub struct ChainClient {
    provider: HttpProvider,
    http: reqwest::Client,
    config: bastion_core::ProviderConfig,
}

impl ChainClient {
    /// Create a new chain client from provider configuration
    pub fn new(config: bastion_core::ProviderConfig) -> Result<Self> {
        let url: reqwest::Url =
            config
                .rpc_url
                .parse()
                .map_err(|e| ProviderError::Unreachable {
                    url: format!("{}: {}", config.rpc_url, e),
                })?;

        Ok(Self {
            provider: RootProvider::new_http(url),
            http: reqwest::Client::new(),
            config,
        })
    }

    /// Get the underlying alloy provider (for contract instances)
    pub fn provider(&self) -> &HttpProvider {
        &self.provider
    }

    /// Get the current provider configuration
    pub fn config(&self) -> &bastion_core::ProviderConfig {
        &self.config
    }

    /// Get current block height
    pub async fn current_block(&self) -> Result<BlockHeight> {
        timed_request(self.provider.get_block_number()).await
    }

    /// Check if the RPC endpoint is reachable
    pub async fn is_online(&self) -> bool {
        timed_request(self.provider.get_block_number()).await.is_ok()
    }

    /// Get the timestamp of a block by height
    pub async fn block_timestamp(&self, height: BlockHeight) -> Result<u64> {
        let block = timed_request(
            self.provider
                .get_block_by_number(BlockNumberOrTag::Number(height)),
        )
        .await?
        .ok_or_else(|| ProviderError::ApiError {
            message: format!("Block {} not found", height),
        })?;

        Ok(block.header.timestamp)
    }
}

/// Wrap a provider call with a timeout. Converts both timeout and call errors
/// to ProviderError.
pub(crate) async fn timed_request<T, E: std::fmt::Display>(
    fut: impl std::future::IntoFuture<Output = std::result::Result<T, E>>,
) -> Result<T> {
    tokio::time::timeout(PROVIDER_REQUEST_TIMEOUT, fut)
        .await
        .map_err(|_| ProviderError::Timeout {
            seconds: PROVIDER_REQUEST_TIMEOUT.as_secs(),
        })?
        .map_err(|e| ProviderError::ApiError {
            message: e.to_string(),
        })
}
