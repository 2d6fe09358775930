//! API response bodies
//!
//! Amounts are decimal strings: U256 does not fit JSON numbers, and the
//! frontend formats them with its own big-number library anyway.

use axum::http::StatusCode;
use axum::Json;
use bastion_core::ProtocolError;
use nftlend::reserves::ReserveOverview;
use nftlend::{
    AssetDiagnostic, AssetRecord, CollectionLoansView, HealthStatus, LoanRecord,
};
use serde::{Deserialize, Serialize};

use crate::portfolio::PortfolioView;

/// GET /health response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Error body returned by all routes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
}

impl ApiError {
    /// Map a protocol error to its HTTP response
    pub fn from_protocol(e: &ProtocolError) -> (StatusCode, Json<ApiError>) {
        let status =
            StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (
            status,
            Json(ApiError {
                error: e.to_string(),
                code: e.error_code().to_string(),
            }),
        )
    }

    /// A 400 with a free-form message
    pub fn bad_request(message: impl Into<String>) -> (StatusCode, Json<ApiError>) {
        (
            StatusCode::BAD_REQUEST,
            Json(ApiError {
                error: message.into(),
                code: "bad_request".to_string(),
            }),
        )
    }
}

/// GET /node/status response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeStatusResponse {
    pub online: bool,
    pub current_block: Option<u64>,
    pub chain_id: u64,
    pub network: String,
}

/// GET /node/config response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeConfigResponse {
    pub rpc_url: String,
    pub indexer_url: String,
    pub chain_id: u64,
}

/// POST /node/chain request
#[derive(Debug, Clone, Deserialize)]
pub struct SetChainRequest {
    pub chain_id: u64,
}

/// One supported collection, for the loan-search dropdown
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionInfo {
    pub address: String,
    pub name: String,
}

impl From<&bastion_core::SupportedCollection> for CollectionInfo {
    fn from(collection: &bastion_core::SupportedCollection) -> Self {
        Self {
            address: collection.address.to_string(),
            name: collection.name.clone(),
        }
    }
}

/// One NFT in a wallet or loan view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetInfo {
    pub collection: String,
    pub token_id: String,
    pub name: Option<String>,
    pub token_uri: Option<String>,
}

impl From<&AssetRecord> for AssetInfo {
    fn from(record: &AssetRecord) -> Self {
        Self {
            collection: record.collection.to_string(),
            token_id: record.token_id.to_string(),
            name: record.name.clone(),
            token_uri: record.token_uri.clone(),
        }
    }
}

/// One active loan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanInfo {
    pub loan_id: u64,
    pub principal: String,
    pub debt: String,
    pub collateral: AssetInfo,
    pub max_ltv_bps: String,
    pub boost_bps: String,
    pub price: String,
    pub collateral_value: String,
    pub health_level: u8,
    pub health_status: HealthStatus,
}

impl From<&LoanRecord> for LoanInfo {
    fn from(loan: &LoanRecord) -> Self {
        Self {
            loan_id: loan.loan_id.as_u64(),
            principal: loan.principal.to_string(),
            debt: loan.debt.to_string(),
            collateral: AssetInfo::from(&loan.collateral),
            max_ltv_bps: loan.max_ltv_bps.to_string(),
            boost_bps: loan.boost_bps.to_string(),
            price: loan.price.to_string(),
            collateral_value: loan.collateral_value.to_string(),
            health_level: loan.health_level,
            health_status: loan.health_status(),
        }
    }
}

/// A per-asset fetch failure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosticInfo {
    pub collection: String,
    pub token_id: String,
    pub reason: String,
}

impl From<&AssetDiagnostic> for DiagnosticInfo {
    fn from(diagnostic: &AssetDiagnostic) -> Self {
        Self {
            collection: diagnostic.collection.to_string(),
            token_id: diagnostic.token_id.to_string(),
            reason: diagnostic.reason.clone(),
        }
    }
}

/// GET /portfolio response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioResponse {
    pub account: Option<String>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub generation: u64,
    pub loans: Vec<LoanInfo>,
    pub supported_assets: Vec<AssetInfo>,
    pub unsupported_assets: Vec<AssetInfo>,
    pub wallet_max_borrowable: String,
    pub dropped_unsupported: usize,
    pub diagnostics: Vec<DiagnosticInfo>,
}

impl From<&PortfolioView> for PortfolioResponse {
    fn from(view: &PortfolioView) -> Self {
        let snapshot = view.snapshot.as_ref();
        Self {
            account: view.account.map(|a| a.to_string()),
            is_loading: view.is_loading,
            error: view.error.clone(),
            generation: view.generation,
            loans: snapshot
                .map(|s| s.loans.iter().map(LoanInfo::from).collect())
                .unwrap_or_default(),
            supported_assets: snapshot
                .map(|s| s.supported_assets.iter().map(AssetInfo::from).collect())
                .unwrap_or_default(),
            unsupported_assets: snapshot
                .map(|s| s.unsupported_assets.iter().map(AssetInfo::from).collect())
                .unwrap_or_default(),
            wallet_max_borrowable: snapshot
                .map(|s| s.wallet_max_borrowable.to_string())
                .unwrap_or_else(|| "0".to_string()),
            dropped_unsupported: snapshot.map(|s| s.dropped_unsupported).unwrap_or(0),
            diagnostics: snapshot
                .map(|s| s.diagnostics.iter().map(DiagnosticInfo::from).collect())
                .unwrap_or_default(),
        }
    }
}

/// POST /portfolio/refresh request
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshRequest {
    pub account: String,
}

/// POST /portfolio/refresh response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub generation: u64,
}

/// GET /loans/collection/{address} response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionLoansResponse {
    pub collection: String,
    pub max_collateralization_bps: String,
    pub active_loans: usize,
    pub loans: Vec<LoanInfo>,
    pub diagnostics: Vec<DiagnosticInfo>,
}

impl From<&CollectionLoansView> for CollectionLoansResponse {
    fn from(view: &CollectionLoansView) -> Self {
        Self {
            collection: view.collection.to_string(),
            max_collateralization_bps: view.max_collateralization_bps.to_string(),
            active_loans: view.loans.len(),
            loans: view.loans.iter().map(LoanInfo::from).collect(),
            diagnostics: view.diagnostics.iter().map(DiagnosticInfo::from).collect(),
        }
    }
}

/// One reserve row in GET /reserves
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReserveInfo {
    pub address: String,
    pub asset_names: Vec<String>,
    pub age_days: u64,
    pub tvl: String,
    pub underlying_symbol: String,
}

impl From<&ReserveOverview> for ReserveInfo {
    fn from(overview: &ReserveOverview) -> Self {
        Self {
            address: overview.address.to_string(),
            asset_names: overview.asset_names.clone(),
            age_days: overview.age_days,
            tvl: overview.tvl.to_string(),
            underlying_symbol: overview.underlying_symbol.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{address, U256};
    use bastion_core::LoanId;
    use nftlend::{AssetCategory, PortfolioSnapshot};

    fn sample_loan() -> LoanRecord {
        LoanRecord {
            loan_id: LoanId::new(3),
            principal: U256::from(40u64),
            debt: U256::from(50u64),
            collateral: AssetRecord {
                collection: address!("00000000000000000000000000000000000000c1"),
                token_id: U256::from(99u64),
                token_uri: None,
                name: None,
                category: AssetCategory::Loan,
            },
            max_ltv_bps: U256::from(5000u64),
            boost_bps: U256::ZERO,
            price: U256::from(200u64),
            collateral_value: U256::from(100u64),
            health_level: 50,
        }
    }

    #[test]
    fn test_loan_info_conversion() {
        let info = LoanInfo::from(&sample_loan());
        assert_eq!(info.loan_id, 3);
        assert_eq!(info.debt, "50");
        assert_eq!(info.collateral_value, "100");
        assert_eq!(info.health_level, 50);
        assert_eq!(info.health_status, HealthStatus::Warning);
    }

    #[test]
    fn test_portfolio_response_without_snapshot() {
        let view = PortfolioView {
            is_loading: true,
            ..Default::default()
        };
        let response = PortfolioResponse::from(&view);
        assert!(response.is_loading);
        assert!(response.loans.is_empty());
        assert_eq!(response.wallet_max_borrowable, "0");
    }

    #[test]
    fn test_portfolio_response_flattens_snapshot() {
        let view = PortfolioView {
            account: Some(address!("00000000000000000000000000000000000000aa")),
            is_loading: false,
            error: None,
            snapshot: Some(PortfolioSnapshot {
                loans: vec![sample_loan()],
                wallet_max_borrowable: U256::from(100u64),
                ..Default::default()
            }),
            generation: 4,
        };

        let response = PortfolioResponse::from(&view);
        assert_eq!(response.generation, 4);
        assert_eq!(response.loans.len(), 1);
        assert_eq!(response.wallet_max_borrowable, "100");
    }

    #[test]
    fn test_health_response_default() {
        let health = HealthResponse::default();
        assert_eq!(health.status, "ok");
        assert!(!health.version.is_empty());
    }

    #[test]
    fn test_loan_info_json_shape() {
        let value = serde_json::to_value(LoanInfo::from(&sample_loan())).unwrap();
        assert_eq!(value["debt"], "50");
        assert_eq!(value["health_level"], 50);
        assert_eq!(value["health_status"], "warning");
    }
}
