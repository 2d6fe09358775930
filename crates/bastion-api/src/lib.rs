//! Bastion-api: HTTP API layer for Bastion
//!
//! Provides a RESTful API for the frontend to read aggregated protocol
//! state. The frontend triggers snapshot refreshes and polls the view;
//! it never observes a partially-built or superseded snapshot.

pub mod dto;
pub mod portfolio;
pub mod routes;
pub mod server;
pub mod state;

pub use portfolio::{PortfolioService, PortfolioView};
pub use server::*;
pub use state::AppState;
