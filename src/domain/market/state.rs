//! Markets store — paginated `/coins/markets` with persisted search parameters.

use super::{MarketEntry, SearchParam, SearchParameters};
use crate::error::ExplorerError;
use crate::network::MARKETS_STORAGE_KEY;
use crate::source::MarketDataSource;
use crate::storage::{load_json, save_json, ParamStorage};
use crate::store::{Changes, FetchState, RefreshOutcome, Resource, Store, Subscription};
use async_trait::async_trait;
use std::sync::Arc;

/// The markets list resource. Re-fetches on every refresh.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarketsResource;

#[async_trait]
impl Resource for MarketsResource {
    type Params = SearchParameters;
    type Data = Vec<MarketEntry>;

    fn name(&self) -> &'static str {
        "markets"
    }

    async fn fetch(
        &self,
        source: &dyn MarketDataSource,
        params: &SearchParameters,
    ) -> Result<Vec<MarketEntry>, ExplorerError> {
        source.fetch_markets(params).await
    }
}

pub type MarketsState = FetchState<SearchParameters, Vec<MarketEntry>>;

/// Markets store with persisted parameters and `reset`.
///
/// On construction the last persisted parameters are restored; every
/// parameter change and every reset is written back.
pub struct MarketsStore {
    store: Store<MarketsResource>,
    defaults: SearchParameters,
    storage: Arc<dyn ParamStorage>,
}

impl MarketsStore {
    pub fn new(source: Arc<dyn MarketDataSource>, storage: Arc<dyn ParamStorage>) -> Self {
        Self::with_defaults(source, storage, SearchParameters::default())
    }

    pub fn with_defaults(
        source: Arc<dyn MarketDataSource>,
        storage: Arc<dyn ParamStorage>,
        defaults: SearchParameters,
    ) -> Self {
        let initial = restore(storage.as_ref()).unwrap_or_else(|| defaults.clone());
        Self {
            store: Store::new(MarketsResource, source, initial),
            defaults,
            storage,
        }
    }

    /// Underlying generic store.
    pub fn store(&self) -> &Store<MarketsResource> {
        &self.store
    }

    pub fn state(&self) -> MarketsState {
        self.store.state()
    }

    pub fn parameters(&self) -> SearchParameters {
        self.store.parameters()
    }

    pub fn defaults(&self) -> &SearchParameters {
        &self.defaults
    }

    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&MarketsState, Changes) + Send + Sync + 'static,
    {
        self.store.subscribe(listener)
    }

    pub fn subscribe_fields<F>(&self, fields: Changes, listener: F) -> Subscription
    where
        F: Fn(&MarketsState, Changes) + Send + Sync + 'static,
    {
        self.store.subscribe_fields(fields, listener)
    }

    /// Write one parameter. Does not fetch.
    pub fn update_parameter(&self, param: SearchParam) -> Result<(), ExplorerError> {
        let key = param.key();
        self.store.update_parameters(|p| p.apply(param))?;
        tracing::debug!(key, "Markets parameter updated");
        self.persist();
        Ok(())
    }

    pub async fn refresh(&self) -> RefreshOutcome {
        self.store.refresh().await
    }

    /// Restore default parameters and clear data, loading and error.
    pub fn reset(&self) {
        self.store.reset_to(self.defaults.clone());
        self.persist();
    }

    /// True when no rows have been loaded (absent or empty list).
    pub fn is_empty(&self) -> bool {
        self.store.data().map_or(true, |rows| rows.is_empty())
    }

    fn persist(&self) {
        let params = self.store.parameters();
        if let Err(e) = save_json(self.storage.as_ref(), MARKETS_STORAGE_KEY, &params) {
            tracing::warn!(error = %e, "Failed to persist markets parameters");
        }
    }
}

fn restore(storage: &dyn ParamStorage) -> Option<SearchParameters> {
    match load_json::<SearchParameters>(storage, MARKETS_STORAGE_KEY) {
        Ok(Some(params)) => match params.validate() {
            Ok(()) => {
                tracing::debug!(page = params.page, "Restored markets parameters");
                Some(params)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring invalid persisted markets parameters");
                None
            }
        },
        Ok(None) => None,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to restore markets parameters");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::market::SortOrder;
    use crate::error::HttpError;
    use crate::storage::MemoryStorage;
    use crate::store::testing::FakeSource;

    fn markets_store() -> (MarketsStore, Arc<FakeSource>, Arc<MemoryStorage>) {
        let source = Arc::new(FakeSource::new());
        let storage = Arc::new(MemoryStorage::new());
        let store = MarketsStore::new(source.clone(), storage.clone());
        (store, source, storage)
    }

    #[test]
    fn test_update_parameter_does_not_fetch() {
        let (store, source, _) = markets_store();
        store.update_parameter(SearchParam::Page(2)).unwrap();
        assert_eq!(store.parameters().page, 2);
        assert_eq!(source.markets_calls(), 0);
    }

    #[test]
    fn test_refresh_uses_current_parameters() {
        let (store, source, _) = markets_store();
        store.update_parameter(SearchParam::PerPage(10)).unwrap();
        store.update_parameter(SearchParam::Page(3)).unwrap();
        tokio_test::block_on(store.refresh());

        let sent = source.last_markets_params().unwrap();
        assert_eq!(sent.per_page, 10);
        assert_eq!(sent.page, 3);
        let rows = store.state().data.unwrap();
        assert_eq!(rows.len(), 10);
        assert_eq!(rows[0].id, "coin-20");
    }

    #[test]
    fn test_per_page_change_resets_page() {
        let (store, _, _) = markets_store();
        store.update_parameter(SearchParam::Page(9)).unwrap();
        store.update_parameter(SearchParam::PerPage(100)).unwrap();
        assert_eq!(store.parameters().page, 1);
        assert_eq!(store.parameters().per_page, 100);
    }

    #[test]
    fn test_not_found_keeps_rows() {
        let (store, source, _) = markets_store();
        tokio_test::block_on(store.refresh());
        let before = store.state().data.unwrap();

        source.fail_with(HttpError::Status {
            status: 404,
            status_text: "Not Found".to_string(),
        });
        assert_eq!(tokio_test::block_on(store.refresh()), RefreshOutcome::Failed);

        let state = store.state();
        assert!(!state.loading);
        assert!(state.error.unwrap().contains("Not Found"));
        assert!(Arc::ptr_eq(&state.data.unwrap(), &before));
    }

    #[test]
    fn test_reset_restores_defaults_and_clears() {
        let (store, source, _) = markets_store();
        store.update_parameter(SearchParam::Order(SortOrder::IdAsc)).unwrap();
        store.update_parameter(SearchParam::Page(5)).unwrap();
        tokio_test::block_on(store.refresh());
        source.fail_with(HttpError::Decode("bad".into()));
        tokio_test::block_on(store.refresh());

        store.reset();

        let state = store.state();
        assert_eq!(state.parameters, SearchParameters::default());
        assert!(state.data.is_none());
        assert!(!state.loading);
        assert!(state.error.is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_parameters_persist_across_instances() {
        let (store, source, storage) = markets_store();
        store.update_parameter(SearchParam::VsCurrency("eur".into())).unwrap();
        store.update_parameter(SearchParam::Page(4)).unwrap();
        drop(store);

        let restored = MarketsStore::new(source, storage);
        let params = restored.parameters();
        assert_eq!(params.vs_currency, "eur");
        assert_eq!(params.page, 4);
        assert!(restored.state().data.is_none());
    }

    #[test]
    fn test_reset_persists_defaults() {
        let (store, source, storage) = markets_store();
        store.update_parameter(SearchParam::Page(4)).unwrap();
        store.reset();
        let restored = MarketsStore::new(source, storage);
        assert_eq!(restored.parameters(), SearchParameters::default());
    }

    #[test]
    fn test_invalid_persisted_parameters_fall_back_to_defaults() {
        let source = Arc::new(FakeSource::new());
        let storage = Arc::new(MemoryStorage::new());
        storage
            .save(
                MARKETS_STORAGE_KEY,
                r#"{"vs_currency":"usd","order":"id_asc","per_page":50,"page":0}"#,
            )
            .unwrap();
        let store = MarketsStore::new(source, storage);
        assert_eq!(store.parameters(), SearchParameters::default());
    }

    #[test]
    fn test_custom_defaults() {
        let defaults = SearchParameters {
            vs_currency: "jpy".to_string(),
            per_page: 25,
            ..SearchParameters::default()
        };
        let store = MarketsStore::with_defaults(
            Arc::new(FakeSource::new()),
            Arc::new(MemoryStorage::new()),
            defaults.clone(),
        );
        store.update_parameter(SearchParam::Page(2)).unwrap();
        store.reset();
        assert_eq!(store.parameters(), defaults);
    }
}
