//! Error types for Bastion

use thiserror::Error;

/// Core errors that can occur in Bastion
#[derive(Debug, Error)]
pub enum Error {
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Chain-data provider errors (RPC node or indexer API)
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("Provider unreachable at {url}")]
    Unreachable { url: String },

    #[error("Provider returned error: {message}")]
    ApiError { message: String },

    #[error("Request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

/// Protocol-level errors
#[derive(Debug, Clone, Error)]
pub enum ProtocolError {
    #[error("No deployment configured for chain {chain_id}")]
    ChainNotSupported { chain_id: u64 },

    #[error("No price quote for {collection} #{token_id}")]
    PriceUnavailable { collection: String, token_id: String },

    #[error("Loan not found: {loan_id}")]
    LoanNotFound { loan_id: u64 },

    #[error("No risk parameters for collection {collection}")]
    RiskParamsUnavailable { collection: String },

    #[error("Aggregation failed: {reason}")]
    AggregationFailed { reason: String },

    #[error("Failed to parse on-chain data: {message}")]
    DataParseError { message: String },
}

/// Result type alias for Bastion operations
pub type Result<T> = std::result::Result<T, Error>;

impl ProtocolError {
    /// Get an HTTP-friendly error code
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ChainNotSupported { .. } => "chain_not_supported",
            Self::PriceUnavailable { .. } => "price_unavailable",
            Self::LoanNotFound { .. } => "loan_not_found",
            Self::RiskParamsUnavailable { .. } => "risk_params_unavailable",
            Self::AggregationFailed { .. } => "aggregation_failed",
            Self::DataParseError { .. } => "data_parse_error",
        }
    }

    /// Get HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::ChainNotSupported { .. } => 422,
            Self::LoanNotFound { .. } => 404,
            Self::PriceUnavailable { .. } | Self::RiskParamsUnavailable { .. } => 503,
            Self::AggregationFailed { .. } | Self::DataParseError { .. } => 503,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_error_codes() {
        let err = ProtocolError::LoanNotFound { loan_id: 7 };
        assert_eq!(err.error_code(), "loan_not_found");
        assert_eq!(err.status_code(), 404);

        let err = ProtocolError::AggregationFailed {
            reason: "enumeration failed".into(),
        };
        assert_eq!(err.error_code(), "aggregation_failed");
        assert_eq!(err.status_code(), 503);
    }

    #[test]
    fn test_provider_error_display() {
        let err = ProviderError::Timeout { seconds: 30 };
        assert_eq!(err.to_string(), "Request timed out after 30s");
    }
}
