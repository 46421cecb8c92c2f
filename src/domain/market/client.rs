//! Markets sub-client — paginated market rows.

use crate::client::ExplorerClient;
use crate::domain::market::{MarketEntry, SearchParameters};
use crate::error::ExplorerError;

/// Sub-client for `/coins/markets`.
pub struct Markets<'a> {
    pub(crate) client: &'a ExplorerClient,
}

impl<'a> Markets<'a> {
    /// One page of market rows for `params`.
    pub async fn list(&self, params: &SearchParameters) -> Result<Vec<MarketEntry>, ExplorerError> {
        params.validate()?;
        Ok(self.client.http.get_markets(params).await?)
    }

    /// First page with default parameters.
    pub async fn top(&self) -> Result<Vec<MarketEntry>, ExplorerError> {
        self.list(&SearchParameters::default()).await
    }
}
