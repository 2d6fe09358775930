//! NFT-Collateral Lending Protocol Implementation
//!
//! This crate implements the read side of the lending protocol for Bastion.
//!
//! # Protocol Overview
//!
//! Borrowers lock NFTs from whitelisted collections as collateral and
//! receive a debt token whose tokenId is the loan id. The loan registry
//! tracks principal and accrued debt; an oracle prices individual NFTs and
//! caps each collection's collateralization.
//!
//! # Architecture
//!
//! Aggregation pipeline: enumerate owned assets, classify them, fetch the
//! facts each category needs, compute health, and assemble one immutable
//! snapshot per request.

pub mod calculator;
pub mod classify;
pub mod constants;
pub mod contracts;
pub mod fetch;
pub mod reserves;
pub mod snapshot;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;

// Re-exports
pub use calculator::*;
pub use classify::*;
pub use fetch::*;
pub use snapshot::*;
pub use state::*;
