//! Wire types for `/search/trending` (REST).

use super::{TrendingCategory, TrendingItem, TrendingNft};
use serde::{Deserialize, Serialize};

/// Coins arrive wrapped as `{ "item": { ... } }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrendingCoin {
    pub item: TrendingItem,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendingResponse {
    pub coins: Vec<TrendingCoin>,
    pub nfts: Vec<TrendingNft>,
    pub categories: Vec<TrendingCategory>,
}
