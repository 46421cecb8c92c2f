//! Conversions: wire trending → domain trending.

use super::wire::TrendingResponse;
use super::Trending;

impl From<TrendingResponse> for Trending {
    fn from(r: TrendingResponse) -> Self {
        Self {
            coins: r.coins.into_iter().map(|c| c.item).collect(),
            nfts: r.nfts,
            categories: r.categories,
        }
    }
}
