//! `MarketDataSource` — the seam between stores and the HTTP client.
//!
//! Stores only ever talk to a `dyn MarketDataSource`. The HTTP client
//! implements it for production; tests plug in in-memory fakes.

use crate::domain::chart::{ChartParams, MarketChart};
use crate::domain::market::{MarketEntry, SearchParameters};
use crate::domain::trending::{Page, Paginated, Trending, TrendingItem};
use crate::error::ExplorerError;
use crate::shared::CoinId;
use async_trait::async_trait;

/// Anything that can answer the three upstream queries.
///
/// Every call maps to exactly one upstream round trip. Implementations must
/// not retry or cache.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// `GET /coins/markets`
    async fn fetch_markets(
        &self,
        params: &SearchParameters,
    ) -> Result<Vec<MarketEntry>, ExplorerError>;

    /// `GET /coins/{id}/market_chart`
    async fn fetch_chart(
        &self,
        coin_id: &CoinId,
        params: &ChartParams,
    ) -> Result<MarketChart, ExplorerError>;

    /// `GET /search/trending`
    async fn fetch_trending(&self) -> Result<Trending, ExplorerError>;

    /// Client-side pagination over the trending coin list.
    ///
    /// The upstream endpoint has no paging, so this performs one
    /// [`fetch_trending`](Self::fetch_trending) and slices the result.
    /// Pages past the end are empty, never an error.
    async fn fetch_trending_page(
        &self,
        page: usize,
        per_page: usize,
    ) -> Result<Paginated<TrendingItem>, ExplorerError> {
        let trending = self.fetch_trending().await?;
        Ok(Page::new(&trending.coins, page, per_page).to_paginated())
    }
}
