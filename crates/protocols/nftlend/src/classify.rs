//! Asset Classifier
//!
//! Pure membership rules, no I/O. The debt-token check runs first: a
//! configuration must never list the debt token as a supported collection,
//! so rule order is the only disambiguation needed.

use std::collections::HashSet;

use alloy::primitives::Address;
use bastion_core::DeploymentConfig;

use crate::state::AssetCategory;

/// Classify an asset's contract address.
///
/// Priority order: debt token, then supported collection, then unsupported.
pub fn classify(
    collection: Address,
    debt_token: Address,
    supported: &HashSet<Address>,
) -> AssetCategory {
    if collection == debt_token {
        AssetCategory::Loan
    } else if supported.contains(&collection) {
        AssetCategory::SupportedCollateral
    } else {
        AssetCategory::Unsupported
    }
}

/// Collect a deployment's supported collections into a lookup set
pub fn supported_set(deployment: &DeploymentConfig) -> HashSet<Address> {
    deployment
        .supported_collections
        .iter()
        .map(|c| c.address)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    const DEBT_TOKEN: Address = address!("00000000000000000000000000000000000000d1");
    const SUPPORTED: Address = address!("00000000000000000000000000000000000000c1");
    const OTHER: Address = address!("00000000000000000000000000000000000000e1");

    fn supported() -> HashSet<Address> {
        [SUPPORTED].into_iter().collect()
    }

    #[test]
    fn test_debt_token_classifies_as_loan() {
        assert_eq!(
            classify(DEBT_TOKEN, DEBT_TOKEN, &supported()),
            AssetCategory::Loan
        );
    }

    #[test]
    fn test_supported_collection() {
        assert_eq!(
            classify(SUPPORTED, DEBT_TOKEN, &supported()),
            AssetCategory::SupportedCollateral
        );
    }

    #[test]
    fn test_unknown_collection_is_unsupported() {
        assert_eq!(
            classify(OTHER, DEBT_TOKEN, &supported()),
            AssetCategory::Unsupported
        );
    }

    #[test]
    fn test_debt_token_wins_over_membership() {
        // Misconfigured set containing the debt token: rule order decides
        let set: HashSet<Address> = [DEBT_TOKEN, SUPPORTED].into_iter().collect();
        assert_eq!(classify(DEBT_TOKEN, DEBT_TOKEN, &set), AssetCategory::Loan);
    }

    #[test]
    fn test_classification_partitions_inputs() {
        // Every address gets exactly one category
        let set = supported();
        for addr in [DEBT_TOKEN, SUPPORTED, OTHER] {
            let category = classify(addr, DEBT_TOKEN, &set);
            let matches = [
                category == AssetCategory::Loan,
                category == AssetCategory::SupportedCollateral,
                category == AssetCategory::Unsupported,
            ]
            .iter()
            .filter(|m| **m)
            .count();
            assert_eq!(matches, 1);
        }
    }
}
