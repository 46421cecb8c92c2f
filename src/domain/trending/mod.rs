//! Trending domain — `/search/trending` coins, NFTs and categories.
//!
//! The upstream endpoint returns one fixed-size snapshot with no paging.
//! Pagination is done client-side over the owned coin list: [`Page`] borrows
//! a window of it, [`Paginated`] is the owned form handed across APIs.

#[cfg(feature = "http")]
pub mod client;
mod convert;
pub mod state;
pub mod wire;

use crate::shared::{page_slice, total_pages};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub use state::{TrendingResource, TrendingStore};

// ─── Items ───────────────────────────────────────────────────────────────────

/// One trending coin.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendingItem {
    pub id: String,
    pub coin_id: u64,
    pub name: String,
    pub symbol: String,
    pub market_cap_rank: Option<u32>,
    pub thumb: String,
    pub small: String,
    pub large: String,
    pub slug: String,
    pub price_btc: f64,
    pub score: u32,
    pub data: Option<TrendingItemData>,
}

/// Pre-formatted market figures attached to a trending coin.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendingItemData {
    pub price: Option<f64>,
    #[serde(deserialize_with = "crate::shared::serde_util::string_or_number::deserialize")]
    pub price_btc: String,
    pub price_change_percentage_24h: BTreeMap<String, f64>,
    #[serde(deserialize_with = "crate::shared::serde_util::string_or_number::deserialize")]
    pub market_cap: String,
    #[serde(deserialize_with = "crate::shared::serde_util::string_or_number::deserialize")]
    pub market_cap_btc: String,
    #[serde(deserialize_with = "crate::shared::serde_util::string_or_number::deserialize")]
    pub total_volume: String,
    #[serde(deserialize_with = "crate::shared::serde_util::string_or_number::deserialize")]
    pub total_volume_btc: String,
    /// URL of a sparkline image.
    pub sparkline: String,
}

impl TrendingItemData {
    /// 24h change against `currency` (e.g. `"usd"`).
    pub fn change_24h(&self, currency: &str) -> Option<f64> {
        self.price_change_percentage_24h.get(currency).copied()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendingNft {
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub thumb: String,
    pub floor_price_in_native_currency: f64,
    pub floor_price_24h_percentage_change: f64,
    pub data: Option<TrendingNftData>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendingNftData {
    pub floor_price: String,
    pub h24_volume: String,
    pub h24_average_sale_price: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendingCategory {
    pub id: u64,
    pub name: String,
    #[serde(deserialize_with = "crate::shared::serde_util::string_or_number::deserialize")]
    pub coins_count: String,
    pub market_cap_change_percentage_24h: BTreeMap<String, f64>,
}

/// Everything `/search/trending` returns, with the coin wrappers removed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Trending {
    pub coins: Vec<TrendingItem>,
    pub nfts: Vec<TrendingNft>,
    pub categories: Vec<TrendingCategory>,
}

impl Trending {
    /// Borrowed page over the coin list. One-based; past-the-end is empty.
    pub fn page(&self, page: usize, per_page: usize) -> Page<'_, TrendingItem> {
        Page::new(&self.coins, page, per_page)
    }
}

// ─── Pagination ──────────────────────────────────────────────────────────────

/// A window into a slice someone else owns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    pub total_pages: usize,
}

impl<'a, T> Page<'a, T> {
    pub fn new(all: &'a [T], page: usize, per_page: usize) -> Self {
        Self {
            items: page_slice(all, page, per_page),
            page,
            per_page,
            total: all.len(),
            total_pages: total_pages(all.len(), per_page),
        }
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

impl<T: Clone> Page<'_, T> {
    pub fn to_paginated(&self) -> Paginated<T> {
        Paginated {
            data: self.items.to_vec(),
            page: self.page,
            per_page: self.per_page,
            total: self.total,
            total_pages: self.total_pages,
        }
    }
}

/// Owned page with its pagination metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    pub total_pages: usize,
}
