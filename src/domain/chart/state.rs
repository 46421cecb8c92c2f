//! Chart store — fetch-once market chart with a memoized display projection.

use super::{ChartDisplay, ChartQuery, MarketChart};
use crate::error::ExplorerError;
use crate::source::MarketDataSource;
use crate::store::{Changes, FetchState, RefreshOutcome, Resource, Store, Subscription};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Market chart for one coin. Fetched once; later refreshes are no-ops.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChartResource;

#[async_trait]
impl Resource for ChartResource {
    type Params = ChartQuery;
    type Data = MarketChart;

    fn name(&self) -> &'static str {
        "chart"
    }

    fn fetch_once(&self) -> bool {
        true
    }

    async fn fetch(
        &self,
        source: &dyn MarketDataSource,
        query: &ChartQuery,
    ) -> Result<MarketChart, ExplorerError> {
        source.fetch_chart(&query.coin_id, &query.params).await
    }
}

pub type ChartState = FetchState<ChartQuery, MarketChart>;

/// Chart store plus its derived [`ChartDisplay`].
///
/// The display series are recomputed only when `data_version` moves.
pub struct ChartStore {
    store: Store<ChartResource>,
    display: Mutex<Option<(u64, Arc<ChartDisplay>)>>,
}

impl ChartStore {
    pub fn new(source: Arc<dyn MarketDataSource>, query: ChartQuery) -> Self {
        Self {
            store: Store::new(ChartResource, source, query),
            display: Mutex::new(None),
        }
    }

    pub fn store(&self) -> &Store<ChartResource> {
        &self.store
    }

    pub fn state(&self) -> ChartState {
        self.store.state()
    }

    pub fn query(&self) -> ChartQuery {
        self.store.parameters()
    }

    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&ChartState, Changes) + Send + Sync + 'static,
    {
        self.store.subscribe(listener)
    }

    pub fn subscribe_fields<F>(&self, fields: Changes, listener: F) -> Subscription
    where
        F: Fn(&ChartState, Changes) + Send + Sync + 'static,
    {
        self.store.subscribe_fields(fields, listener)
    }

    pub async fn refresh(&self) -> RefreshOutcome {
        self.store.refresh().await
    }

    /// Display series for the current data, or `None` before the first fetch.
    pub fn display(&self) -> Option<Arc<ChartDisplay>> {
        let state = self.store.state();
        let chart = state.data?;
        Some(self.display_for(state.data_version, &chart))
    }

    /// Memoized projection keyed by data version.
    pub(crate) fn display_for(&self, version: u64, chart: &MarketChart) -> Arc<ChartDisplay> {
        let mut memo = self.display.lock().unwrap_or_else(|poisoned| {
            tracing::warn!("Chart display memo was poisoned, recovering");
            poisoned.into_inner()
        });
        if let Some((cached, display)) = memo.as_ref() {
            if *cached == version {
                return display.clone();
            }
        }
        let built = Arc::new(ChartDisplay::from(chart));
        let points = built.prices.len();
        tracing::debug!(version, points, "Chart display rebuilt");
        *memo = Some((version, built.clone()));
        built
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chart::{ChartParams, Metric};
    use crate::error::HttpError;
    use crate::store::testing::{chart_fixture, FakeSource};

    fn chart_store(source: Arc<FakeSource>) -> ChartStore {
        ChartStore::new(source, ChartQuery::new("bitcoin", ChartParams::usd_days(7)))
    }

    #[test]
    fn test_display_absent_before_fetch() {
        let store = chart_store(Arc::new(FakeSource::new()));
        assert!(store.display().is_none());
    }

    #[test]
    fn test_second_refresh_is_noop() {
        let source = Arc::new(FakeSource::new());
        source.set_chart(chart_fixture(4));
        let store = chart_store(source.clone());

        assert_eq!(tokio_test::block_on(store.refresh()), RefreshOutcome::Fetched);
        assert_eq!(
            tokio_test::block_on(store.refresh()),
            RefreshOutcome::AlreadyLoaded
        );
        assert_eq!(
            tokio_test::block_on(store.refresh()),
            RefreshOutcome::AlreadyLoaded
        );
        assert_eq!(source.chart_calls(), 1);
    }

    #[test]
    fn test_failed_fetch_allows_retry() {
        let source = Arc::new(FakeSource::new());
        source.fail_with(HttpError::Status {
            status: 429,
            status_text: "Too Many Requests".to_string(),
        });
        let store = chart_store(source.clone());
        assert_eq!(tokio_test::block_on(store.refresh()), RefreshOutcome::Failed);
        assert!(store.state().error.unwrap().contains("Too Many Requests"));

        source.succeed();
        source.set_chart(chart_fixture(2));
        assert_eq!(tokio_test::block_on(store.refresh()), RefreshOutcome::Fetched);
        assert_eq!(source.chart_calls(), 2);
    }

    #[test]
    fn test_display_is_memoized() {
        let source = Arc::new(FakeSource::new());
        source.set_chart(chart_fixture(5));
        let store = chart_store(source);
        tokio_test::block_on(store.refresh());

        let first = store.display().unwrap();
        let second = store.display().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.series(Metric::Price).len(), 5);
        assert_eq!(first.prices[0].date.timestamp_millis(), 1_700_000_000_000);
        assert_eq!(first.range(Metric::Price), Some((100.0, 500.0)));
    }

    #[test]
    fn test_display_rebuilt_on_new_version() {
        let store = chart_store(Arc::new(FakeSource::new()));
        let a = store.display_for(1, &chart_fixture(2));
        let b = store.display_for(1, &chart_fixture(9));
        assert!(Arc::ptr_eq(&a, &b));

        let c = store.display_for(2, &chart_fixture(3));
        assert!(!Arc::ptr_eq(&a, &c));
        assert_eq!(c.prices.len(), 3);
    }
}
