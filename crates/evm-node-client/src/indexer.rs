//! NFT-indexer API access
//!
//! The indexer answers the two questions a node cannot answer cheaply:
//! which NFTs an account owns, and which reserves the protocol has
//! registered. Responses are JSON; token ids arrive as decimal strings.

use alloy::primitives::{Address, U256};
use bastion_core::{ChainId, ProviderError};
use serde::Deserialize;

use crate::{timed_request, ChainClient, Result};

/// An NFT owned by an account, as reported by the indexer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedAsset {
    pub collection: Address,
    pub token_id: U256,
    pub token_uri: Option<String>,
    pub name: Option<String>,
}

/// A protocol reserve, as reported by the registry endpoint
#[derive(Debug, Clone)]
pub struct ReserveHandle {
    pub address: Address,
    /// Collections whitelisted as collateral for this reserve
    pub assets: Vec<Address>,
    /// Block in which the reserve was created
    pub created_block: u64,
}

#[derive(Debug, Deserialize)]
struct OwnedAssetsResponse {
    result: Vec<OwnedAssetDto>,
}

#[derive(Debug, Deserialize)]
struct OwnedAssetDto {
    token_address: String,
    token_id: String,
    #[serde(default)]
    token_uri: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ReservesResponse {
    result: Vec<ReserveDto>,
}

#[derive(Debug, Deserialize)]
struct ReserveDto {
    address: String,
    #[serde(default)]
    assets: Vec<String>,
    created_block: u64,
}

impl ChainClient {
    /// Enumerate NFTs owned by an account.
    ///
    /// Queries `GET {indexer}/{account}/nft?chain=0x{chain_id:x}`.
    /// Assets whose addresses or token ids fail to parse are skipped with a
    /// warning rather than failing the whole enumeration.
    pub async fn get_owned_assets(
        &self,
        account: Address,
        chain: ChainId,
    ) -> Result<Vec<OwnedAsset>> {
        let url = format!(
            "{}/{}/nft?chain=0x{:x}",
            self.config().indexer_url,
            account,
            chain.as_u64()
        );

        let response: OwnedAssetsResponse = self.indexer_get(&url).await?;

        let mut assets = Vec::with_capacity(response.result.len());
        for dto in response.result {
            match parse_owned_asset(&dto) {
                Ok(asset) => assets.push(asset),
                Err(e) => {
                    tracing::warn!(
                        token_address = %dto.token_address,
                        token_id = %dto.token_id,
                        error = %e,
                        "Skipping unparseable indexer asset"
                    );
                }
            }
        }

        Ok(assets)
    }

    /// Fetch the protocol's reserve registry.
    ///
    /// Queries `GET {indexer}/reserves?chain=0x{chain_id:x}`.
    pub async fn get_reserves(&self, chain: ChainId) -> Result<Vec<ReserveHandle>> {
        let url = format!(
            "{}/reserves?chain=0x{:x}",
            self.config().indexer_url,
            chain.as_u64()
        );

        let response: ReservesResponse = self.indexer_get(&url).await?;

        let mut reserves = Vec::with_capacity(response.result.len());
        for dto in response.result {
            match parse_reserve(&dto) {
                Ok(reserve) => reserves.push(reserve),
                Err(e) => {
                    tracing::warn!(
                        address = %dto.address,
                        error = %e,
                        "Skipping unparseable reserve entry"
                    );
                }
            }
        }

        Ok(reserves)
    }

    /// Issue an authenticated GET against the indexer and decode the JSON body
    async fn indexer_get<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        let request = self
            .http
            .get(url)
            .header("X-API-Key", &self.config().indexer_api_key)
            .send();

        let response = timed_request(request).await.map_err(|e| match e {
            ProviderError::ApiError { message } => ProviderError::Unreachable {
                url: format!("{}: {}", url, message),
            },
            other => other,
        })?;

        if !response.status().is_success() {
            return Err(ProviderError::ApiError {
                message: format!("Indexer returned {} for {}", response.status(), url),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))
    }
}

fn parse_owned_asset(dto: &OwnedAssetDto) -> std::result::Result<OwnedAsset, ProviderError> {
    let collection: Address = dto
        .token_address
        .parse()
        .map_err(|e| ProviderError::ParseError(format!("token_address: {}", e)))?;

    let token_id: U256 = dto
        .token_id
        .parse()
        .map_err(|e| ProviderError::ParseError(format!("token_id: {}", e)))?;

    Ok(OwnedAsset {
        collection,
        token_id,
        token_uri: dto.token_uri.clone().filter(|u| !u.is_empty()),
        name: dto.name.clone().filter(|n| !n.is_empty()),
    })
}

fn parse_reserve(dto: &ReserveDto) -> std::result::Result<ReserveHandle, ProviderError> {
    let address: Address = dto
        .address
        .parse()
        .map_err(|e| ProviderError::ParseError(format!("reserve address: {}", e)))?;

    let mut assets = Vec::with_capacity(dto.assets.len());
    for raw in &dto.assets {
        let parsed = raw
            .parse()
            .map_err(|e| ProviderError::ParseError(format!("reserve asset: {}", e)))?;
        assets.push(parsed);
    }

    Ok(ReserveHandle {
        address,
        assets,
        created_block: dto.created_block,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    #[test]
    fn test_parse_owned_asset() {
        let dto = OwnedAssetDto {
            token_address: "0xbb4CdB9CBd36B01bD1cBaEBF2De08d9173bc095c".to_string(),
            token_id: "12345".to_string(),
            token_uri: Some("ipfs://Qm".to_string()),
            name: Some("Test Collection".to_string()),
        };

        let asset = parse_owned_asset(&dto).unwrap();
        assert_eq!(
            asset.collection,
            address!("bb4CdB9CBd36B01bD1cBaEBF2De08d9173bc095c")
        );
        assert_eq!(asset.token_id, U256::from(12345u64));
        assert_eq!(asset.name.as_deref(), Some("Test Collection"));
    }

    #[test]
    fn test_parse_owned_asset_empty_uri_becomes_none() {
        let dto = OwnedAssetDto {
            token_address: "0xbb4CdB9CBd36B01bD1cBaEBF2De08d9173bc095c".to_string(),
            token_id: "1".to_string(),
            token_uri: Some(String::new()),
            name: None,
        };

        let asset = parse_owned_asset(&dto).unwrap();
        assert!(asset.token_uri.is_none());
    }

    #[test]
    fn test_parse_owned_asset_bad_address() {
        let dto = OwnedAssetDto {
            token_address: "zzzz".to_string(),
            token_id: "1".to_string(),
            token_uri: None,
            name: None,
        };
        assert!(parse_owned_asset(&dto).is_err());
    }

    #[test]
    fn test_parse_reserve() {
        let dto = ReserveDto {
            address: "0x55d398326f99059fF775485246999027B3197955".to_string(),
            assets: vec!["0xbb4CdB9CBd36B01bD1cBaEBF2De08d9173bc095c".to_string()],
            created_block: 17_000_000,
        };

        let reserve = parse_reserve(&dto).unwrap();
        assert_eq!(reserve.assets.len(), 1);
        assert_eq!(reserve.created_block, 17_000_000);
    }
}
