//! High-level client — `ExplorerClient` with nested sub-client accessors.
//!
//! Each domain has its own sub-client in `domain/<name>/client.rs`.
//! This module keeps the builder and the accessor methods.

use crate::domain::chart::client::Charts;
use crate::domain::market::client::Markets;
use crate::error::ExplorerError;
use crate::http::{CoinGeckoHttp, HttpConfig};
use crate::source::MarketDataSource;

use std::sync::Arc;
use std::time::Duration;

// Re-export sub-client types for convenience.
pub use crate::domain::chart::client::Charts as ChartsClient;
pub use crate::domain::market::client::Markets as MarketsClient;
pub use crate::domain::trending::client::TrendingClient;

/// The primary entry point for talking to CoinGecko.
///
/// Provides nested sub-client accessors for each domain:
/// `client.markets()`, `client.charts()`, `client.trending()`. Stores take the
/// client as a [`MarketDataSource`] via [`source`](Self::source).
#[derive(Clone)]
pub struct ExplorerClient {
    pub(crate) http: CoinGeckoHttp,
}

impl ExplorerClient {
    pub fn builder() -> ExplorerClientBuilder {
        ExplorerClientBuilder::default()
    }

    // ── Sub-client accessors ─────────────────────────────────────────────

    pub fn markets(&self) -> Markets<'_> {
        Markets { client: self }
    }

    pub fn charts(&self) -> Charts<'_> {
        Charts { client: self }
    }

    pub fn trending(&self) -> TrendingClient<'_> {
        TrendingClient { client: self }
    }

    /// The underlying HTTP client as a store data source.
    pub fn source(&self) -> Arc<dyn MarketDataSource> {
        Arc::new(self.http.clone())
    }

    pub fn base_url(&self) -> &str {
        self.http.base_url()
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// Builder
// ═════════════════════════════════════════════════════════════════════════════

#[derive(Default)]
pub struct ExplorerClientBuilder {
    config: HttpConfig,
}

impl ExplorerClientBuilder {
    pub fn base_url(mut self, url: &str) -> Self {
        self.config.base_url = url.to_string();
        self
    }

    /// Per-request timeout. Ignored on wasm, where the browser owns timeouts.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, user_agent: &str) -> Self {
        self.config.user_agent = user_agent.to_string();
        self
    }

    pub fn build(self) -> Result<ExplorerClient, ExplorerError> {
        if self.config.base_url.trim().is_empty() {
            return Err(ExplorerError::Validation("base_url must not be empty".to_string()));
        }
        tracing::debug!(base_url = %self.config.base_url, "Building explorer client");
        Ok(ExplorerClient {
            http: CoinGeckoHttp::with_config(&self.config)?,
        })
    }
}
