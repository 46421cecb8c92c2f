//! Trending sub-client.

use crate::client::ExplorerClient;
use crate::domain::trending::{Paginated, Trending, TrendingItem};
use crate::error::ExplorerError;
use crate::source::MarketDataSource;

/// Sub-client for `/search/trending`.
pub struct TrendingClient<'a> {
    pub(crate) client: &'a ExplorerClient,
}

impl<'a> TrendingClient<'a> {
    pub async fn get(&self) -> Result<Trending, ExplorerError> {
        Ok(self.client.http.get_trending().await?)
    }

    /// One page of trending coins, sliced client-side from a single fetch.
    pub async fn page(
        &self,
        page: usize,
        per_page: usize,
    ) -> Result<Paginated<TrendingItem>, ExplorerError> {
        self.client.http.fetch_trending_page(page, per_page).await
    }
}
