//! Reserve Overviews
//!
//! Read model for the protocol's liquidity reserves: which collections a
//! reserve accepts, how old it is, how much underlying it holds, and what
//! that underlying is.

use alloy::primitives::{Address, U256};
use bastion_core::{ChainId, ProtocolError};
use evm_node_client::{ChainClient, ReserveHandle};
use serde::{Deserialize, Serialize};

use crate::constants::SECONDS_IN_DAY;
use crate::contracts::{IErc20, IErc721, IReserve};

/// One reserve's display row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReserveOverview {
    pub address: Address,
    /// Names of the collections whitelisted as collateral
    pub asset_names: Vec<String>,
    /// Days since the reserve's creation block
    pub age_days: u64,
    /// Underlying tokens held
    pub tvl: U256,
    /// Symbol of the underlying ERC-20
    pub underlying_symbol: String,
}

/// Fetch overviews for every registered reserve.
///
/// A reserve whose reads fail is skipped with a warning; the rest of the
/// registry still renders.
pub async fn fetch_reserve_overviews(
    client: &ChainClient,
    chain: ChainId,
    now_unix: u64,
) -> Result<Vec<ReserveOverview>, ProtocolError> {
    let reserves =
        client
            .get_reserves(chain)
            .await
            .map_err(|e| ProtocolError::AggregationFailed {
                reason: e.to_string(),
            })?;

    let mut overviews = Vec::with_capacity(reserves.len());
    for handle in reserves {
        match fetch_reserve_overview(client, &handle, now_unix).await {
            Ok(overview) => overviews.push(overview),
            Err(e) => {
                tracing::warn!(reserve = %handle.address, error = %e, "Failed to fetch reserve");
                // Continue with other reserves
            }
        }
    }

    Ok(overviews)
}

/// Fetch a single reserve's overview
async fn fetch_reserve_overview(
    client: &ChainClient,
    handle: &ReserveHandle,
    now_unix: u64,
) -> Result<ReserveOverview, ProtocolError> {
    let provider = client.provider().clone();

    let mut asset_names = Vec::with_capacity(handle.assets.len());
    for asset in &handle.assets {
        let name = IErc721::new(*asset, provider.clone())
            .name()
            .call()
            .await
            .map_err(|e| ProtocolError::DataParseError {
                message: format!("name() failed for {}: {}", asset, e),
            })?;
        asset_names.push(name);
    }

    let created_at = client
        .block_timestamp(handle.created_block)
        .await
        .map_err(|e| ProtocolError::DataParseError {
            message: format!("creation block {}: {}", handle.created_block, e),
        })?;

    let reserve = IReserve::new(handle.address, provider.clone());
    let tvl = reserve
        .getUnderlyingBalance()
        .call()
        .await
        .map_err(|e| ProtocolError::DataParseError {
            message: format!("getUnderlyingBalance failed: {}", e),
        })?;
    let underlying: Address =
        reserve
            .getAsset()
            .call()
            .await
            .map_err(|e| ProtocolError::DataParseError {
                message: format!("getAsset failed: {}", e),
            })?;

    let underlying_symbol = IErc20::new(underlying, provider)
        .symbol()
        .call()
        .await
        .map_err(|e| ProtocolError::DataParseError {
            message: format!("symbol() failed for {}: {}", underlying, e),
        })?;

    Ok(ReserveOverview {
        address: handle.address,
        asset_names,
        age_days: age_in_days(now_unix, created_at),
        tvl,
        underlying_symbol,
    })
}

/// Whole days elapsed between a creation timestamp and now
pub fn age_in_days(now_unix: u64, created_unix: u64) -> u64 {
    now_unix.saturating_sub(created_unix) / SECONDS_IN_DAY
}
