//! Configuration types for Bastion

use std::collections::HashMap;

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

use crate::ChainId;

/// Chain-data provider connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// JSON-RPC endpoint (e.g., "http://127.0.0.1:8545")
    pub rpc_url: String,

    /// NFT indexer API base URL (owned-asset enumeration, reserve registry)
    pub indexer_url: String,

    /// API key for the indexer (optional)
    #[serde(default)]
    pub indexer_api_key: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://127.0.0.1:8545".to_string(),
            indexer_url: "https://deep-index.moralis.io/api/v2".to_string(),
            indexer_api_key: String::new(),
        }
    }
}

/// Aggregation pipeline tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregationConfig {
    /// Maximum per-asset fetch chains in flight at once.
    /// Upstream providers rate-limit, so this stays small.
    #[serde(default = "default_concurrency_limit")]
    pub concurrency_limit: usize,
}

fn default_concurrency_limit() -> usize {
    8
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            concurrency_limit: default_concurrency_limit(),
        }
    }
}

/// A collection accepted as collateral by the protocol
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupportedCollection {
    pub address: Address,
    pub name: String,
}

/// Deployed contract addresses for one chain
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentConfig {
    /// Loan registry contract (loan records, debt accounting)
    pub loan_center: Address,

    /// NFT price oracle contract
    pub nft_oracle: Address,

    /// Debt-token contract. Holding one of its tokens means holding a loan;
    /// the tokenId is the loan id, not an NFT id.
    pub debt_token: Address,

    /// Collections accepted as collateral
    pub supported_collections: Vec<SupportedCollection>,
}

/// Per-chain deployments with a designated fallback chain.
///
/// Lookups for a chain without an entry fall back to the default chain's
/// deployment, matching how the frontend resolves unknown networks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deployments {
    #[serde(default)]
    pub chains: HashMap<u64, DeploymentConfig>,

    #[serde(default = "default_chain")]
    pub default_chain: ChainId,
}

fn default_chain() -> ChainId {
    ChainId::MAINNET
}

impl Default for Deployments {
    fn default() -> Self {
        Self {
            chains: HashMap::new(),
            default_chain: default_chain(),
        }
    }
}

impl Deployments {
    /// Resolve the deployment for a chain, falling back to the default chain
    pub fn for_chain(&self, chain: ChainId) -> Option<&DeploymentConfig> {
        self.chains
            .get(&chain.as_u64())
            .or_else(|| self.chains.get(&self.default_chain.as_u64()))
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Provider connection settings
    pub provider: ProviderConfig,

    /// Active chain
    #[serde(default = "default_chain")]
    pub chain: ChainId,

    /// API server port
    #[serde(default = "default_api_port")]
    pub api_port: u16,

    /// Aggregation tuning
    #[serde(default)]
    pub aggregation: AggregationConfig,

    /// Per-chain contract deployments
    #[serde(default)]
    pub deployments: Deployments,
}

fn default_api_port() -> u16 {
    19545
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            provider: ProviderConfig::default(),
            chain: default_chain(),
            api_port: default_api_port(),
            aggregation: AggregationConfig::default(),
            deployments: Deployments::default(),
        }
    }
}
