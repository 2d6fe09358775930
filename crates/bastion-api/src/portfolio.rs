//! Generation-guarded portfolio view publication
//!
//! Each refresh gets a generation token when it begins; only the build
//! holding the latest token may publish its result. A build superseded by
//! a newer trigger (account or network change) is discarded on arrival,
//! so "whatever lands last wins" races cannot occur.

use std::sync::atomic::{AtomicU64, Ordering};

use alloy::primitives::Address;
use bastion_core::ProtocolError;
use nftlend::PortfolioSnapshot;
use serde::Serialize;
use tokio::sync::RwLock;

/// The read-only view handed to the presentation layer.
///
/// `is_loading` is true from refresh start until that refresh's build
/// publishes or is superseded by a newer one; a published view is never
/// patched in place.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PortfolioView {
    pub account: Option<Address>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub snapshot: Option<PortfolioSnapshot>,
    pub generation: u64,
}

/// Holds the latest view and the generation counter guarding it
pub struct PortfolioService {
    generation: AtomicU64,
    view: RwLock<PortfolioView>,
}

impl PortfolioService {
    pub fn new() -> Self {
        Self {
            generation: AtomicU64::new(0),
            view: RwLock::new(PortfolioView::default()),
        }
    }

    /// Begin a refresh for an account: allocate the next generation token
    /// and switch the view to its loading state.
    pub async fn begin_refresh(&self, account: Address) -> u64 {
        let token = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let mut view = self.view.write().await;
        view.account = Some(account);
        view.is_loading = true;
        view.error = None;
        view.generation = token;

        token
    }

    /// Publish a build result for the given token.
    ///
    /// Returns false, leaving the view untouched, when a newer refresh has
    /// begun since the token was issued.
    pub async fn publish(
        &self,
        token: u64,
        result: Result<PortfolioSnapshot, ProtocolError>,
    ) -> bool {
        let mut view = self.view.write().await;
        if view.generation != token {
            tracing::debug!(
                token,
                latest = view.generation,
                "Discarding superseded snapshot"
            );
            return false;
        }

        view.is_loading = false;
        match result {
            Ok(snapshot) => {
                view.snapshot = Some(snapshot);
                view.error = None;
            }
            Err(e) => {
                tracing::warn!(token, error = %e, "Portfolio build failed");
                view.snapshot = None;
                view.error = Some(e.to_string());
            }
        }

        true
    }

    /// Current view, cloned for the caller
    pub async fn view(&self) -> PortfolioView {
        self.view.read().await.clone()
    }
}

impl Default for PortfolioService {
    fn default() -> Self {
        Self::new()
    }
}
