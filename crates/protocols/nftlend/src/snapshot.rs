//! Aggregate Builder
//!
//! Assembles one account's `PortfolioSnapshot`: enumerate, classify,
//! prefetch per-collection risk params, fan out per-asset fetch chains
//! under a concurrency cap, and fold results back in enumeration order.
//! Only the enumeration step can fail the build; every per-asset failure
//! is recorded as a diagnostic and the aggregation continues.

use std::collections::{HashMap, HashSet};

use alloy::primitives::{Address, U256};
use bastion_core::{AggregationConfig, DeploymentConfig, LoanId, ProtocolError};
use evm_node_client::OwnedAsset;
use futures::stream::{self, StreamExt};

use crate::calculator;
use crate::classify::{classify, supported_set};
use crate::constants::MAX_UNSUPPORTED_ASSETS;
use crate::fetch::LendingDataSource;
use crate::state::{AssetCategory, AssetDiagnostic, AssetRecord, LoanRecord, PortfolioSnapshot};

/// Per-asset enrichment outcome, folded into the snapshot in order
enum Enriched {
    Loan(LoanRecord),
    Supported {
        asset: AssetRecord,
        contribution: U256,
    },
    Unsupported(AssetRecord),
    Failed(AssetDiagnostic),
}

/// Build a fresh portfolio snapshot for an account.
///
/// Fails with `AggregationFailed` only when the owned-asset enumeration
/// itself fails; nothing can be built without it.
pub async fn build_portfolio<S: LendingDataSource>(
    source: &S,
    deployment: &DeploymentConfig,
    account: Address,
    aggregation: &AggregationConfig,
) -> Result<PortfolioSnapshot, ProtocolError> {
    let owned = source
        .owned_assets(account)
        .await
        .map_err(|e| ProtocolError::AggregationFailed {
            reason: e.to_string(),
        })?;

    let supported = supported_set(deployment);
    let classified: Vec<(OwnedAsset, AssetCategory)> = owned
        .into_iter()
        .map(|asset| {
            let category = classify(asset.collection, deployment.debt_token, &supported);
            (asset, category)
        })
        .collect();

    // Risk params are fetched once per distinct supported collection and
    // held for this build only; the cap is volatile on-chain state.
    let distinct: HashSet<Address> = classified
        .iter()
        .filter(|(_, category)| *category == AssetCategory::SupportedCollateral)
        .map(|(asset, _)| asset.collection)
        .collect();

    let mut risk_params: HashMap<Address, U256> = HashMap::new();
    let mut risk_errors: HashMap<Address, ProtocolError> = HashMap::new();
    for collection in distinct {
        match source.collection_risk_params(collection).await {
            Ok(params) => {
                risk_params.insert(collection, params.max_collateralization_bps);
            }
            Err(e) => {
                tracing::warn!(collection = %collection, error = %e,
                    "Failed to fetch collection risk params");
                risk_errors.insert(collection, e);
            }
        }
    }

    let outcomes: Vec<Enriched> = stream::iter(classified)
        .map(|(asset, category)| enrich_asset(source, &risk_params, &risk_errors, asset, category))
        .buffered(aggregation.concurrency_limit.max(1))
        .collect()
        .await;

    let mut snapshot = PortfolioSnapshot::default();
    for outcome in outcomes {
        match outcome {
            Enriched::Loan(loan) => snapshot.loans.push(loan),
            Enriched::Supported {
                asset,
                contribution,
            } => {
                snapshot.wallet_max_borrowable =
                    snapshot.wallet_max_borrowable.saturating_add(contribution);
                snapshot.supported_assets.push(asset);
            }
            Enriched::Unsupported(asset) => {
                if snapshot.unsupported_assets.len() < MAX_UNSUPPORTED_ASSETS {
                    snapshot.unsupported_assets.push(asset);
                } else {
                    snapshot.dropped_unsupported += 1;
                }
            }
            Enriched::Failed(diagnostic) => {
                tracing::warn!(
                    collection = %diagnostic.collection,
                    token_id = %diagnostic.token_id,
                    reason = %diagnostic.reason,
                    "Dropping asset from snapshot"
                );
                snapshot.diagnostics.push(diagnostic);
            }
        }
    }

    tracing::info!(
        account = %account,
        loans = snapshot.loans.len(),
        supported = snapshot.supported_assets.len(),
        unsupported = snapshot.unsupported_assets.len(),
        dropped = snapshot.dropped_unsupported,
        failed = snapshot.diagnostics.len(),
        "Portfolio snapshot built"
    );

    Ok(snapshot)
}

/// Fetch what one asset's category needs; never fails, only downgrades
async fn enrich_asset<S: LendingDataSource>(
    source: &S,
    risk_params: &HashMap<Address, U256>,
    risk_errors: &HashMap<Address, ProtocolError>,
    asset: OwnedAsset,
    category: AssetCategory,
) -> Enriched {
    match category {
        AssetCategory::Loan => enrich_loan(source, asset).await,
        AssetCategory::SupportedCollateral => {
            enrich_supported(source, risk_params, risk_errors, asset).await
        }
        AssetCategory::Unsupported => {
            Enriched::Unsupported(AssetRecord::from_owned(&asset, AssetCategory::Unsupported))
        }
    }
}

async fn enrich_loan<S: LendingDataSource>(source: &S, asset: OwnedAsset) -> Enriched {
    let diagnose = |reason: String| {
        Enriched::Failed(AssetDiagnostic {
            collection: asset.collection,
            token_id: asset.token_id,
            reason,
        })
    };

    // The debt token's tokenId is the loan id
    let loan_id = match u64::try_from(asset.token_id) {
        Ok(id) => LoanId::new(id),
        Err(_) => return diagnose(format!("debt token id {} out of range", asset.token_id)),
    };

    let raw = match source.loan(loan_id).await {
        Ok(raw) => raw,
        Err(e) => return diagnose(e.to_string()),
    };
    let debt = match source.loan_debt(loan_id).await {
        Ok(debt) => debt,
        Err(e) => return diagnose(e.to_string()),
    };
    let quote = match source.token_price(raw.nft_asset, raw.nft_token_id).await {
        Ok(quote) => quote,
        Err(e) => return diagnose(e.to_string()),
    };

    let collateral_value =
        calculator::collateral_value(raw.max_ltv_bps, raw.boost_bps, quote.value);

    Enriched::Loan(LoanRecord {
        loan_id,
        principal: raw.amount,
        debt,
        collateral: AssetRecord {
            collection: raw.nft_asset,
            token_id: raw.nft_token_id,
            token_uri: None,
            name: None,
            category: AssetCategory::Loan,
        },
        max_ltv_bps: raw.max_ltv_bps,
        boost_bps: raw.boost_bps,
        price: quote.value,
        collateral_value,
        health_level: calculator::health_level(debt, collateral_value),
    })
}

async fn enrich_supported<S: LendingDataSource>(
    source: &S,
    risk_params: &HashMap<Address, U256>,
    risk_errors: &HashMap<Address, ProtocolError>,
    asset: OwnedAsset,
) -> Enriched {
    let quote = match source.token_price(asset.collection, asset.token_id).await {
        Ok(quote) => quote,
        Err(e) => {
            return Enriched::Failed(AssetDiagnostic {
                collection: asset.collection,
                token_id: asset.token_id,
                reason: e.to_string(),
            })
        }
    };

    let max_ltv = match risk_params.get(&asset.collection) {
        Some(bps) => *bps,
        None => {
            let reason = risk_errors
                .get(&asset.collection)
                .map(|e| e.to_string())
                .unwrap_or_else(|| {
                    ProtocolError::RiskParamsUnavailable {
                        collection: asset.collection.to_string(),
                    }
                    .to_string()
                });
            return Enriched::Failed(AssetDiagnostic {
                collection: asset.collection,
                token_id: asset.token_id,
                reason,
            });
        }
    };

    Enriched::Supported {
        contribution: calculator::max_borrowable(max_ltv, quote.value),
        asset: AssetRecord::from_owned(&asset, AssetCategory::SupportedCollateral),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::RawLoan;
    use crate::testing::FakeSource;
    use alloy::primitives::address;
    use bastion_core::SupportedCollection;

    const DEBT_TOKEN: Address = address!("00000000000000000000000000000000000000d1");
    const PUNKS: Address = address!("00000000000000000000000000000000000000c1");
    const OTHER: Address = address!("00000000000000000000000000000000000000e1");

    fn deployment() -> DeploymentConfig {
        DeploymentConfig {
            loan_center: address!("00000000000000000000000000000000000000a1"),
            nft_oracle: address!("00000000000000000000000000000000000000a2"),
            debt_token: DEBT_TOKEN,
            supported_collections: vec![SupportedCollection {
                address: PUNKS,
                name: "Punks".to_string(),
            }],
        }
    }

    fn owned(collection: Address, token_id: u64) -> OwnedAsset {
        OwnedAsset {
            collection,
            token_id: U256::from(token_id),
            token_uri: None,
            name: None,
        }
    }

    fn account() -> Address {
        address!("00000000000000000000000000000000000000f1")
    }

    fn config() -> AggregationConfig {
        AggregationConfig::default()
    }

    /// One loan, one supported asset, one unsupported asset
    fn mixed_wallet_source() -> FakeSource {
        let mut source = FakeSource::default();
        source.assets = vec![
            owned(DEBT_TOKEN, 1),
            owned(PUNKS, 7),
            owned(OTHER, 3),
        ];
        source.loans.insert(
            1,
            RawLoan {
                nft_asset: PUNKS,
                nft_token_id: U256::from(99u64),
                amount: U256::from(40u64),
                max_ltv_bps: U256::from(5000u64),
                boost_bps: U256::ZERO,
            },
        );
        source.debts.insert(1, U256::from(50u64));
        // Loan collateral price: 5000 bps of 200 = collateral value 100
        source
            .prices
            .insert((PUNKS, U256::from(99u64)), U256::from(200u64));
        // Supported asset price and collection cap: contributes 100
        source
            .prices
            .insert((PUNKS, U256::from(7u64)), U256::from(200u64));
        source.risk_params.insert(PUNKS, U256::from(5000u64));
        source
    }

    #[tokio::test]
    async fn test_mixed_wallet_snapshot() {
        let source = mixed_wallet_source();
        let snapshot = build_portfolio(&source, &deployment(), account(), &config())
            .await
            .unwrap();

        assert_eq!(snapshot.loans.len(), 1);
        assert_eq!(snapshot.loans[0].health_level, 50);
        assert_eq!(snapshot.supported_assets.len(), 1);
        assert_eq!(snapshot.wallet_max_borrowable, U256::from(100u64));
        assert_eq!(snapshot.unsupported_assets.len(), 1);
        assert!(snapshot.diagnostics.is_empty());
    }

    #[tokio::test]
    async fn test_every_asset_lands_in_exactly_one_bucket() {
        let source = mixed_wallet_source();
        let snapshot = build_portfolio(&source, &deployment(), account(), &config())
            .await
            .unwrap();
        assert_eq!(snapshot.total_assets(), 3);
    }

    #[tokio::test]
    async fn test_unsupported_assets_capped_at_nine() {
        let mut source = FakeSource::default();
        source.assets = (0..11).map(|i| owned(OTHER, i)).collect();

        let snapshot = build_portfolio(&source, &deployment(), account(), &config())
            .await
            .unwrap();

        assert_eq!(snapshot.unsupported_assets.len(), 9);
        assert_eq!(snapshot.dropped_unsupported, 2);
        assert_eq!(snapshot.wallet_max_borrowable, U256::ZERO);
    }

    #[tokio::test]
    async fn test_price_failure_drops_one_of_five() {
        let mut source = FakeSource::default();
        source.assets = (0..5).map(|i| owned(PUNKS, i)).collect();
        source.risk_params.insert(PUNKS, U256::from(4000u64));
        for i in 0..5u64 {
            if i != 2 {
                source
                    .prices
                    .insert((PUNKS, U256::from(i)), U256::from(100u64));
            }
        }

        let snapshot = build_portfolio(&source, &deployment(), account(), &config())
            .await
            .unwrap();

        assert_eq!(snapshot.supported_assets.len(), 4);
        assert_eq!(snapshot.diagnostics.len(), 1);
        assert_eq!(snapshot.diagnostics[0].token_id, U256::from(2u64));
        // 4 assets at 4000 bps of 100 each
        assert_eq!(snapshot.wallet_max_borrowable, U256::from(160u64));
    }

    #[tokio::test]
    async fn test_borrowable_matches_per_asset_sum() {
        let mut source = FakeSource::default();
        source.assets = vec![owned(PUNKS, 1), owned(PUNKS, 2), owned(PUNKS, 3)];
        source.risk_params.insert(PUNKS, U256::from(3333u64));
        source
            .prices
            .insert((PUNKS, U256::from(1u64)), U256::from(100u64));
        source
            .prices
            .insert((PUNKS, U256::from(2u64)), U256::from(250u64));
        source
            .prices
            .insert((PUNKS, U256::from(3u64)), U256::from(7u64));

        let snapshot = build_portfolio(&source, &deployment(), account(), &config())
            .await
            .unwrap();

        // floor(3333*100/10000) + floor(3333*250/10000) + floor(3333*7/10000)
        let expected = U256::from(33u64 + 83 + 2);
        assert_eq!(snapshot.wallet_max_borrowable, expected);
    }

    #[tokio::test]
    async fn test_sequences_preserve_enumeration_order() {
        let mut source = FakeSource::default();
        source.assets = vec![owned(PUNKS, 5), owned(PUNKS, 1), owned(PUNKS, 9)];
        source.risk_params.insert(PUNKS, U256::from(5000u64));
        for i in [5u64, 1, 9] {
            source
                .prices
                .insert((PUNKS, U256::from(i)), U256::from(10u64));
        }

        let snapshot = build_portfolio(&source, &deployment(), account(), &config())
            .await
            .unwrap();

        let order: Vec<u64> = snapshot
            .supported_assets
            .iter()
            .map(|a| u64::try_from(a.token_id).unwrap())
            .collect();
        assert_eq!(order, vec![5, 1, 9]);
    }

    #[tokio::test]
    async fn test_enumeration_failure_aborts_build() {
        let source = FakeSource {
            fail_enumeration: true,
            ..Default::default()
        };

        let err = build_portfolio(&source, &deployment(), account(), &config())
            .await
            .unwrap_err();
        assert!(matches!(err, ProtocolError::AggregationFailed { .. }));
    }

    #[tokio::test]
    async fn test_missing_risk_params_drop_supported_asset() {
        let mut source = FakeSource::default();
        source.assets = vec![owned(PUNKS, 1)];
        source
            .prices
            .insert((PUNKS, U256::from(1u64)), U256::from(100u64));
        // No risk params for PUNKS

        let snapshot = build_portfolio(&source, &deployment(), account(), &config())
            .await
            .unwrap();

        assert!(snapshot.supported_assets.is_empty());
        assert_eq!(snapshot.diagnostics.len(), 1);
        assert_eq!(snapshot.wallet_max_borrowable, U256::ZERO);
    }
}
