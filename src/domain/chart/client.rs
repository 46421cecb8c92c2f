//! Charts sub-client — market chart queries.

use crate::client::ExplorerClient;
use crate::domain::chart::{ChartParams, MarketChart};
use crate::error::ExplorerError;
use crate::shared::CoinId;

/// Sub-client for `/coins/{id}/market_chart`.
pub struct Charts<'a> {
    pub(crate) client: &'a ExplorerClient,
}

impl<'a> Charts<'a> {
    pub async fn get(
        &self,
        coin_id: impl Into<CoinId>,
        params: &ChartParams,
    ) -> Result<MarketChart, ExplorerError> {
        let coin_id = coin_id.into();
        Ok(self.client.http.get_market_chart(&coin_id, params).await?)
    }
}
