//! Core type definitions for Bastion

use std::fmt;

use serde::{Deserialize, Serialize};

/// EVM chain identifier (1 = Ethereum mainnet, 5 = Goerli)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainId(pub u64);

impl ChainId {
    pub const MAINNET: ChainId = ChainId(1);
    pub const GOERLI: ChainId = ChainId(5);

    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// Human-readable network name for known chains
    pub fn name(&self) -> &'static str {
        match self.0 {
            1 => "mainnet",
            5 => "goerli",
            _ => "unknown",
        }
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Loan identifier as issued by the loan registry.
///
/// The registry mints one debt token per loan; the debt token's tokenId
/// doubles as the loan id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LoanId(pub u64);

impl LoanId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for LoanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Block height
pub type BlockHeight = u64;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_id_names() {
        assert_eq!(ChainId::MAINNET.name(), "mainnet");
        assert_eq!(ChainId::GOERLI.name(), "goerli");
        assert_eq!(ChainId::new(42161).name(), "unknown");
    }

    #[test]
    fn test_chain_id_display() {
        assert_eq!(ChainId::MAINNET.to_string(), "1");
        assert_eq!(ChainId::new(5).to_string(), "5");
    }

    #[test]
    fn test_loan_id_roundtrip() {
        let id = LoanId::new(42);
        assert_eq!(id.as_u64(), 42);
        assert_eq!(id.to_string(), "42");
    }
}
