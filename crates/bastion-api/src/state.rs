//! Application state shared across API handlers

use std::sync::Arc;

use alloy::primitives::Address;
use bastion_core::{AppConfig, ChainId, DeploymentConfig, ProtocolError, ProviderConfig};
use evm_node_client::ChainClient;
use nftlend::reserves::ReserveOverview;
use nftlend::{CollectionLoansView, OnChainSource, PortfolioSnapshot};
use tokio::sync::RwLock;

use crate::portfolio::PortfolioService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: RwLock<AppConfig>,
    chain_client: RwLock<Option<ChainClient>>,
    portfolio: PortfolioService,
}

impl AppState {
    /// Create a new application state with default config
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Create with a specific config
    pub fn with_config(config: AppConfig) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config: RwLock::new(config),
                chain_client: RwLock::new(None),
                portfolio: PortfolioService::new(),
            }),
        }
    }

    /// Get current config
    pub async fn config(&self) -> AppConfig {
        self.inner.config.read().await.clone()
    }

    /// Update provider configuration and drop the cached client
    pub async fn set_provider_config(&self, provider: ProviderConfig) {
        let mut config = self.inner.config.write().await;
        config.provider = provider;

        let mut client = self.inner.chain_client.write().await;
        *client = None;
    }

    /// Switch the active chain and drop the cached client
    pub async fn set_chain(&self, chain: ChainId) {
        let mut config = self.inner.config.write().await;
        config.chain = chain;

        let mut client = self.inner.chain_client.write().await;
        *client = None;
    }

    /// Get current chain
    pub async fn chain(&self) -> ChainId {
        self.inner.config.read().await.chain
    }

    /// The portfolio view service
    pub fn portfolio(&self) -> &PortfolioService {
        &self.inner.portfolio
    }

    /// Get or create the chain client
    pub async fn chain_client(&self) -> Option<ChainClient> {
        {
            let client = self.inner.chain_client.read().await;
            if client.is_some() {
                return client.clone();
            }
        }

        let config = self.inner.config.read().await;
        tracing::info!("Creating chain client for RPC: {}", config.provider.rpc_url);
        match ChainClient::new(config.provider.clone()) {
            Ok(client) => {
                let mut cached = self.inner.chain_client.write().await;
                *cached = Some(client.clone());
                Some(client)
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to create chain client for {}: {}",
                    config.provider.rpc_url,
                    e
                );
                None
            }
        }
    }

    /// Resolve the active chain's deployment, honoring the default-chain fallback
    async fn deployment(&self) -> Result<(ChainId, DeploymentConfig), ProtocolError> {
        let config = self.inner.config.read().await;
        let deployment = config.deployments.for_chain(config.chain).cloned().ok_or(
            ProtocolError::ChainNotSupported {
                chain_id: config.chain.as_u64(),
            },
        )?;
        Ok((config.chain, deployment))
    }

    /// Assemble the on-chain data source for the active chain
    async fn data_source(&self) -> Result<(OnChainSource, DeploymentConfig), ProtocolError> {
        let (chain, deployment) = self.deployment().await?;
        let client = self
            .chain_client()
            .await
            .ok_or(ProtocolError::AggregationFailed {
                reason: "chain client unavailable".to_string(),
            })?;
        Ok((
            OnChainSource::new(client, chain, &deployment),
            deployment,
        ))
    }

    /// Build a fresh portfolio snapshot for an account
    pub async fn build_portfolio(
        &self,
        account: Address,
    ) -> Result<PortfolioSnapshot, ProtocolError> {
        let (source, deployment) = self.data_source().await?;
        let aggregation = self.config().await.aggregation;
        nftlend::build_portfolio(&source, &deployment, account, &aggregation).await
    }

    /// Fetch the active loans of one collection
    pub async fn collection_loans(
        &self,
        collection: Address,
    ) -> Result<CollectionLoansView, ProtocolError> {
        let (source, _) = self.data_source().await?;
        let aggregation = self.config().await.aggregation;
        nftlend::fetch_collection_loans(&source, collection, aggregation.concurrency_limit).await
    }

    /// Fetch overviews of all registered reserves
    pub async fn reserve_overviews(&self) -> Result<Vec<ReserveOverview>, ProtocolError> {
        let chain = self.chain().await;
        let client = self
            .chain_client()
            .await
            .ok_or(ProtocolError::AggregationFailed {
                reason: "chain client unavailable".to_string(),
            })?;

        let now_unix = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        nftlend::reserves::fetch_reserve_overviews(&client, chain, now_unix).await
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
