//! Compile-time ABI definitions for on-chain contracts via Alloy `sol!`.

use alloy::sol;

sol! {
    /// Loan registry — loan records and debt accounting.
    #[sol(rpc)]
    interface ILoanCenter {
        /// Get a loan record by id.
        function getLoan(uint256 loanId) external view returns (
            address nftAsset,
            uint256 nftTokenId,
            uint256 amount,
            uint256 maxLTV,
            uint256 boost
        );

        /// Get the outstanding debt (principal plus accrued interest).
        function getLoanDebt(uint256 loanId) external view returns (uint256);

        /// Look up the loan id backing a locked NFT.
        function getNFTLoanId(address nftAddress, uint256 nftTokenId)
            external view returns (uint256);
    }
}

sol! {
    /// NFT price oracle — per-asset valuations and per-collection risk caps.
    #[sol(rpc)]
    interface INftOracle {
        /// Protocol valuation of one NFT, in debt-token base units.
        function getTokenPrice(address collection, uint256 tokenId)
            external view returns (uint256);

        /// Maximum collateralization for a collection, in basis points.
        function getCollectionMaxCollaterization(address collection)
            external view returns (uint256);
    }
}

sol! {
    /// Minimal ERC-721 surface used for display metadata.
    #[sol(rpc)]
    interface IErc721 {
        function name() external view returns (string);
    }
}

sol! {
    /// Minimal ERC-20 surface used for display metadata.
    #[sol(rpc)]
    interface IErc20 {
        function symbol() external view returns (string);
    }
}

sol! {
    /// Reserve vault — pooled liquidity backing loans.
    #[sol(rpc)]
    interface IReserve {
        /// Total underlying tokens held by the reserve.
        function getUnderlyingBalance() external view returns (uint256);

        /// The underlying ERC-20 asset.
        function getAsset() external view returns (address);
    }
}
