//! Trending store — one snapshot of `/search/trending`, paged client-side.

use super::{Paginated, Trending, TrendingItem};
use crate::error::ExplorerError;
use crate::source::MarketDataSource;
use crate::store::{Changes, FetchState, RefreshOutcome, Resource, Store, Subscription};
use async_trait::async_trait;
use std::sync::Arc;

/// The trending snapshot. Takes no parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrendingResource;

#[async_trait]
impl Resource for TrendingResource {
    type Params = ();
    type Data = Trending;

    fn name(&self) -> &'static str {
        "trending"
    }

    async fn fetch(&self, source: &dyn MarketDataSource, _: &()) -> Result<Trending, ExplorerError> {
        source.fetch_trending().await
    }
}

pub type TrendingState = FetchState<(), Trending>;

pub struct TrendingStore {
    store: Store<TrendingResource>,
}

impl TrendingStore {
    pub fn new(source: Arc<dyn MarketDataSource>) -> Self {
        Self {
            store: Store::new(TrendingResource, source, ()),
        }
    }

    pub fn store(&self) -> &Store<TrendingResource> {
        &self.store
    }

    pub fn state(&self) -> TrendingState {
        self.store.state()
    }

    /// The whole snapshot. Borrow pages from it with [`Trending::page`].
    pub fn data(&self) -> Option<Arc<Trending>> {
        self.store.data()
    }

    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&TrendingState, Changes) + Send + Sync + 'static,
    {
        self.store.subscribe(listener)
    }

    pub fn subscribe_fields<F>(&self, fields: Changes, listener: F) -> Subscription
    where
        F: Fn(&TrendingState, Changes) + Send + Sync + 'static,
    {
        self.store.subscribe_fields(fields, listener)
    }

    pub async fn refresh(&self) -> RefreshOutcome {
        self.store.refresh().await
    }

    /// Owned copy of one page. Empty (with zero totals) before the first
    /// fetch.
    pub fn page(&self, page: usize, per_page: usize) -> Paginated<TrendingItem> {
        match self.store.data() {
            Some(trending) => trending.page(page, per_page).to_paginated(),
            None => Paginated {
                data: Vec::new(),
                page,
                per_page,
                total: 0,
                total_pages: 0,
            },
        }
    }

    /// Number of fetched coins.
    pub fn len(&self) -> usize {
        self.store.data().map_or(0, |t| t.coins.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
