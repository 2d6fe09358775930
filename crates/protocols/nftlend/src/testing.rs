//! In-memory `LendingDataSource` for scenario tests

use std::collections::HashMap;

use alloy::primitives::{Address, U256};
use async_trait::async_trait;
use bastion_core::{LoanId, ProtocolError, ProviderError};
use evm_node_client::OwnedAsset;

use crate::fetch::{LendingDataSource, RawLoan};
use crate::state::{CollectionRiskParams, PriceQuote};

/// Fake data source backed by hash maps. Missing entries turn into the
/// same per-asset errors the chain would produce.
#[derive(Default)]
pub(crate) struct FakeSource {
    pub assets: Vec<OwnedAsset>,
    pub collateral: HashMap<Address, Vec<OwnedAsset>>,
    pub prices: HashMap<(Address, U256), U256>,
    pub loans: HashMap<u64, RawLoan>,
    pub debts: HashMap<u64, U256>,
    pub loan_ids: HashMap<(Address, U256), u64>,
    pub risk_params: HashMap<Address, U256>,
    pub fail_enumeration: bool,
}

#[async_trait]
impl LendingDataSource for FakeSource {
    async fn owned_assets(&self, _account: Address) -> Result<Vec<OwnedAsset>, ProviderError> {
        if self.fail_enumeration {
            return Err(ProviderError::ApiError {
                message: "indexer down".to_string(),
            });
        }
        Ok(self.assets.clone())
    }

    async fn collateral_assets(
        &self,
        collection: Address,
    ) -> Result<Vec<OwnedAsset>, ProviderError> {
        if self.fail_enumeration {
            return Err(ProviderError::ApiError {
                message: "indexer down".to_string(),
            });
        }
        Ok(self.collateral.get(&collection).cloned().unwrap_or_default())
    }

    async fn token_price(
        &self,
        collection: Address,
        token_id: U256,
    ) -> Result<PriceQuote, ProtocolError> {
        self.prices
            .get(&(collection, token_id))
            .map(|value| PriceQuote {
                collection,
                token_id,
                value: *value,
            })
            .ok_or(ProtocolError::PriceUnavailable {
                collection: collection.to_string(),
                token_id: token_id.to_string(),
            })
    }

    async fn loan(&self, loan_id: LoanId) -> Result<RawLoan, ProtocolError> {
        self.loans
            .get(&loan_id.as_u64())
            .cloned()
            .ok_or(ProtocolError::LoanNotFound {
                loan_id: loan_id.as_u64(),
            })
    }

    async fn loan_debt(&self, loan_id: LoanId) -> Result<U256, ProtocolError> {
        self.debts
            .get(&loan_id.as_u64())
            .copied()
            .ok_or(ProtocolError::LoanNotFound {
                loan_id: loan_id.as_u64(),
            })
    }

    async fn loan_id_of(
        &self,
        collection: Address,
        token_id: U256,
    ) -> Result<LoanId, ProtocolError> {
        self.loan_ids
            .get(&(collection, token_id))
            .map(|id| LoanId::new(*id))
            .ok_or(ProtocolError::DataParseError {
                message: format!("no loan for {} #{}", collection, token_id),
            })
    }

    async fn collection_risk_params(
        &self,
        collection: Address,
    ) -> Result<CollectionRiskParams, ProtocolError> {
        self.risk_params
            .get(&collection)
            .map(|bps| CollectionRiskParams {
                collection,
                max_collateralization_bps: *bps,
            })
            .ok_or(ProtocolError::RiskParamsUnavailable {
                collection: collection.to_string(),
            })
    }
}
