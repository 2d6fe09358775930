//! Fact Fetching
//!
//! `LendingDataSource` is the seam between aggregation logic and the chain:
//! production wires `OnChainSource` (alloy contract instances plus the
//! indexer), tests wire an in-memory fake. Each call is independent and
//! side-effect-free; retry/skip policy belongs to the builders, not here.

use alloy::primitives::{Address, U256};
use async_trait::async_trait;
use bastion_core::{ChainId, DeploymentConfig, LoanId, ProtocolError, ProviderError};
use evm_node_client::{ChainClient, HttpProvider, OwnedAsset};
use futures::stream::{self, StreamExt};

use crate::calculator;
use crate::contracts::{ILoanCenter, INftOracle};
use crate::state::{
    AssetCategory, AssetDiagnostic, AssetRecord, CollectionLoansView, CollectionRiskParams,
    LoanRecord, PriceQuote,
};

/// Raw loan fields as returned by the loan registry
#[derive(Debug, Clone)]
pub struct RawLoan {
    pub nft_asset: Address,
    pub nft_token_id: U256,
    pub amount: U256,
    pub max_ltv_bps: U256,
    pub boost_bps: U256,
}

/// Read access to the protocol's on-chain facts.
///
/// Whole-portfolio reads fail with `ProviderError`; per-asset reads fail
/// with the `ProtocolError` variant the builders record as diagnostics.
#[async_trait]
pub trait LendingDataSource: Send + Sync {
    /// Enumerate NFTs owned by an account
    async fn owned_assets(&self, account: Address) -> Result<Vec<OwnedAsset>, ProviderError>;

    /// Enumerate NFTs of a collection currently locked in the loan registry
    async fn collateral_assets(&self, collection: Address)
        -> Result<Vec<OwnedAsset>, ProviderError>;

    /// Oracle valuation of one NFT
    async fn token_price(&self, collection: Address, token_id: U256)
        -> Result<PriceQuote, ProtocolError>;

    /// Loan record by id
    async fn loan(&self, loan_id: LoanId) -> Result<RawLoan, ProtocolError>;

    /// Outstanding debt of a loan
    async fn loan_debt(&self, loan_id: LoanId) -> Result<U256, ProtocolError>;

    /// Loan id backing a locked NFT
    async fn loan_id_of(&self, collection: Address, token_id: U256)
        -> Result<LoanId, ProtocolError>;

    /// Collection risk parameters from the oracle
    async fn collection_risk_params(
        &self,
        collection: Address,
    ) -> Result<CollectionRiskParams, ProtocolError>;
}

/// Production data source: loan registry + oracle contracts over the
/// chain client's provider, asset enumeration over its indexer.
pub struct OnChainSource {
    client: ChainClient,
    chain: ChainId,
    loan_center_address: Address,
    loan_center: ILoanCenter::ILoanCenterInstance<HttpProvider>,
    oracle: INftOracle::INftOracleInstance<HttpProvider>,
}

impl OnChainSource {
    pub fn new(client: ChainClient, chain: ChainId, deployment: &DeploymentConfig) -> Self {
        let provider = client.provider().clone();
        Self {
            loan_center_address: deployment.loan_center,
            loan_center: ILoanCenter::new(deployment.loan_center, provider.clone()),
            oracle: INftOracle::new(deployment.nft_oracle, provider),
            client,
            chain,
        }
    }
}

#[async_trait]
impl LendingDataSource for OnChainSource {
    async fn owned_assets(&self, account: Address) -> Result<Vec<OwnedAsset>, ProviderError> {
        self.client.get_owned_assets(account, self.chain).await
    }

    async fn collateral_assets(
        &self,
        collection: Address,
    ) -> Result<Vec<OwnedAsset>, ProviderError> {
        // The registry custodies locked NFTs, so its holdings filtered by
        // collection are exactly that collection's active collateral.
        let held = self
            .client
            .get_owned_assets(self.loan_center_address, self.chain)
            .await?;
        Ok(held
            .into_iter()
            .filter(|asset| asset.collection == collection)
            .collect())
    }

    async fn token_price(
        &self,
        collection: Address,
        token_id: U256,
    ) -> Result<PriceQuote, ProtocolError> {
        let value = self
            .oracle
            .getTokenPrice(collection, token_id)
            .call()
            .await
            .map_err(|e| {
                tracing::debug!(collection = %collection, token_id = %token_id, error = %e,
                    "Oracle price call failed");
                ProtocolError::PriceUnavailable {
                    collection: collection.to_string(),
                    token_id: token_id.to_string(),
                }
            })?;

        Ok(PriceQuote {
            collection,
            token_id,
            value,
        })
    }

    async fn loan(&self, loan_id: LoanId) -> Result<RawLoan, ProtocolError> {
        let raw = self
            .loan_center
            .getLoan(U256::from(loan_id.as_u64()))
            .call()
            .await
            .map_err(|e| {
                tracing::debug!(loan_id = %loan_id, error = %e, "getLoan call failed");
                ProtocolError::LoanNotFound {
                    loan_id: loan_id.as_u64(),
                }
            })?;

        Ok(RawLoan {
            nft_asset: raw.nftAsset,
            nft_token_id: raw.nftTokenId,
            amount: raw.amount,
            max_ltv_bps: raw.maxLTV,
            boost_bps: raw.boost,
        })
    }

    async fn loan_debt(&self, loan_id: LoanId) -> Result<U256, ProtocolError> {
        self.loan_center
            .getLoanDebt(U256::from(loan_id.as_u64()))
            .call()
            .await
            .map_err(|e| {
                tracing::debug!(loan_id = %loan_id, error = %e, "getLoanDebt call failed");
                ProtocolError::LoanNotFound {
                    loan_id: loan_id.as_u64(),
                }
            })
    }

    async fn loan_id_of(
        &self,
        collection: Address,
        token_id: U256,
    ) -> Result<LoanId, ProtocolError> {
        let raw = self
            .loan_center
            .getNFTLoanId(collection, token_id)
            .call()
            .await
            .map_err(|e| ProtocolError::DataParseError {
                message: format!(
                    "getNFTLoanId failed for {} #{}: {}",
                    collection, token_id, e
                ),
            })?;

        let id = u64::try_from(raw).map_err(|_| ProtocolError::DataParseError {
            message: format!("loan id {} out of range", raw),
        })?;
        Ok(LoanId::new(id))
    }

    async fn collection_risk_params(
        &self,
        collection: Address,
    ) -> Result<CollectionRiskParams, ProtocolError> {
        let bps = self
            .oracle
            .getCollectionMaxCollaterization(collection)
            .call()
            .await
            .map_err(|e| {
                tracing::debug!(collection = %collection, error = %e,
                    "getCollectionMaxCollaterization call failed");
                ProtocolError::RiskParamsUnavailable {
                    collection: collection.to_string(),
                }
            })?;

        Ok(CollectionRiskParams {
            collection,
            max_collateralization_bps: bps,
        })
    }
}

/// Fetch all active loans of one collection.
///
/// Per-asset fetch chains run concurrently up to `concurrency_limit`;
/// results keep enumeration order. A failed chain drops that asset into
/// the diagnostics list instead of aborting the view.
pub async fn fetch_collection_loans<S: LendingDataSource>(
    source: &S,
    collection: Address,
    concurrency_limit: usize,
) -> Result<CollectionLoansView, ProtocolError> {
    let risk = source.collection_risk_params(collection).await?;

    let assets = source
        .collateral_assets(collection)
        .await
        .map_err(|e| ProtocolError::AggregationFailed {
            reason: e.to_string(),
        })?;

    let total = assets.len();
    let outcomes: Vec<_> = stream::iter(assets.into_iter().enumerate())
        .map(|(index, asset)| async move {
            let outcome = fetch_one_collection_loan(source, asset).await;
            tracing::debug!(
                collection = %collection,
                processed = index + 1,
                total,
                "collection loan processed"
            );
            outcome
        })
        .buffered(concurrency_limit.max(1))
        .collect()
        .await;

    let mut loans = Vec::new();
    let mut diagnostics = Vec::new();
    for outcome in outcomes {
        match outcome {
            Ok(loan) => loans.push(loan),
            Err(diagnostic) => {
                tracing::warn!(
                    collection = %diagnostic.collection,
                    token_id = %diagnostic.token_id,
                    reason = %diagnostic.reason,
                    "Dropping collateral asset from loan view"
                );
                diagnostics.push(diagnostic);
            }
        }
    }

    Ok(CollectionLoansView {
        collection,
        max_collateralization_bps: risk.max_collateralization_bps,
        loans,
        diagnostics,
    })
}

async fn fetch_one_collection_loan<S: LendingDataSource>(
    source: &S,
    asset: OwnedAsset,
) -> Result<LoanRecord, AssetDiagnostic> {
    let diagnose = |e: ProtocolError| AssetDiagnostic {
        collection: asset.collection,
        token_id: asset.token_id,
        reason: e.to_string(),
    };

    let loan_id = source
        .loan_id_of(asset.collection, asset.token_id)
        .await
        .map_err(&diagnose)?;
    let debt = source.loan_debt(loan_id).await.map_err(&diagnose)?;
    let raw = source.loan(loan_id).await.map_err(&diagnose)?;
    let quote = source
        .token_price(asset.collection, asset.token_id)
        .await
        .map_err(&diagnose)?;

    let collateral_value =
        calculator::collateral_value(raw.max_ltv_bps, raw.boost_bps, quote.value);

    Ok(LoanRecord {
        loan_id,
        principal: raw.amount,
        debt,
        collateral: AssetRecord::from_owned(&asset, AssetCategory::Loan),
        max_ltv_bps: raw.max_ltv_bps,
        boost_bps: raw.boost_bps,
        price: quote.value,
        collateral_value,
        health_level: calculator::health_level(debt, collateral_value),
    })
}
