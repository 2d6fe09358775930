//! Lending Read-Model Types
//!
//! Data structures for the portfolio snapshot, collection loan views, and
//! per-asset diagnostics. Everything here is immutable once built; a refresh
//! replaces the whole snapshot.

use alloy::primitives::{Address, U256};
use bastion_core::LoanId;
use serde::{Deserialize, Serialize};

use evm_node_client::OwnedAsset;

/// Category an owned asset falls into, in classification priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetCategory {
    /// A debt-token holding; the tokenId is a loan id
    Loan,
    /// An NFT from a collection the protocol accepts as collateral
    SupportedCollateral,
    /// Anything else
    Unsupported,
}

/// An NFT identified by (collection, tokenId), tagged with its category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRecord {
    pub collection: Address,
    pub token_id: U256,
    pub token_uri: Option<String>,
    pub name: Option<String>,
    pub category: AssetCategory,
}

impl AssetRecord {
    /// Build from an indexer asset and its classification
    pub fn from_owned(asset: &OwnedAsset, category: AssetCategory) -> Self {
        Self {
            collection: asset.collection,
            token_id: asset.token_id,
            token_uri: asset.token_uri.clone(),
            name: asset.name.clone(),
            category,
        }
    }
}

/// An active loan with its collateral and computed risk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanRecord {
    pub loan_id: LoanId,
    /// Borrowed principal
    pub principal: U256,
    /// Outstanding debt (principal plus accrued interest)
    pub debt: U256,
    pub collateral: AssetRecord,
    /// Collection LTV cap at loan creation, in basis points
    pub max_ltv_bps: U256,
    /// Additive LTV bonus granted to this loan, in basis points
    pub boost_bps: U256,
    /// Oracle valuation of the collateral NFT
    pub price: U256,
    /// (max_ltv + boost) * price / 10000
    pub collateral_value: U256,
    /// Margin left before liquidation, 0-100
    pub health_level: u8,
}

impl LoanRecord {
    /// Health status for UI color coding
    pub fn health_status(&self) -> HealthStatus {
        crate::calculator::health_status(self.health_level)
    }
}

/// Health level status for UI color coding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Warning,
    Danger,
}

/// Per-collection risk parameters from the oracle.
///
/// Fetched once per distinct collection within a build, never cached across
/// builds: the cap is an on-chain value governance can move at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionRiskParams {
    pub collection: Address,
    pub max_collateralization_bps: U256,
}

/// A fresh oracle valuation for one NFT
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceQuote {
    pub collection: Address,
    pub token_id: U256,
    pub value: U256,
}

/// A per-asset fetch failure recorded during aggregation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetDiagnostic {
    pub collection: Address,
    pub token_id: U256,
    pub reason: String,
}

/// One account's fully-assembled position view.
///
/// Every enumerated asset lands in exactly one of the three sequences;
/// sequences preserve enumeration order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PortfolioSnapshot {
    pub loans: Vec<LoanRecord>,
    pub supported_assets: Vec<AssetRecord>,
    /// Capped at MAX_UNSUPPORTED_ASSETS entries
    pub unsupported_assets: Vec<AssetRecord>,
    /// Sum of max_ltv * price / 10000 over supported assets
    pub wallet_max_borrowable: U256,
    /// Unsupported assets beyond the cap
    pub dropped_unsupported: usize,
    /// Assets dropped because a per-asset fetch failed
    pub diagnostics: Vec<AssetDiagnostic>,
}

impl PortfolioSnapshot {
    /// Total assets represented, including capped and dropped ones
    pub fn total_assets(&self) -> usize {
        self.loans.len()
            + self.supported_assets.len()
            + self.unsupported_assets.len()
            + self.dropped_unsupported
            + self.diagnostics.len()
    }
}

/// Active loans of one collection, for the loan-search view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionLoansView {
    pub collection: Address,
    /// Collection LTV cap, in basis points
    pub max_collateralization_bps: U256,
    pub loans: Vec<LoanRecord>,
    pub diagnostics: Vec<AssetDiagnostic>,
}
