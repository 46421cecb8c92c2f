//! `Dashboard` — the composition root.
//!
//! Builds one store and one view per tab over a shared data source and
//! tracks which tab is active. There are no globals; callers own the
//! dashboard and everything hangs off it.

use crate::domain::chart::ChartStore;
use crate::domain::market::MarketsStore;
use crate::domain::trending::TrendingStore;
use crate::source::MarketDataSource;
use crate::storage::ParamStorage;
use crate::store::RefreshOutcome;
use crate::view::{ChartView, MarketsView, Tab, TrendingView};
use std::sync::{Arc, Mutex};

pub const APP_TITLE: &str = "CoinGecko Explorer";

pub struct Dashboard {
    markets: MarketsView,
    chart: ChartView,
    trending: TrendingView,
    active: Mutex<Tab>,
}

impl Dashboard {
    pub fn new(source: Arc<dyn MarketDataSource>, storage: Arc<dyn ParamStorage>) -> Self {
        let markets = Arc::new(MarketsStore::new(source.clone(), storage));
        let chart = Arc::new(ChartStore::new(source.clone(), ChartView::default_query()));
        let trending = Arc::new(TrendingStore::new(source));
        Self {
            markets: MarketsView::new(markets),
            chart: ChartView::new(chart),
            trending: TrendingView::new(trending),
            active: Mutex::new(Tab::default()),
        }
    }

    /// Dashboard over the live API.
    #[cfg(feature = "http")]
    pub fn from_client(
        client: &crate::client::ExplorerClient,
        storage: Arc<dyn ParamStorage>,
    ) -> Self {
        Self::new(client.source(), storage)
    }

    pub fn title(&self) -> &'static str {
        APP_TITLE
    }

    pub fn tabs(&self) -> &'static [Tab] {
        &Tab::ALL
    }

    pub fn active_tab(&self) -> Tab {
        *crate::view::lock(&self.active)
    }

    pub fn markets(&self) -> &MarketsView {
        &self.markets
    }

    pub fn chart(&self) -> &ChartView {
        &self.chart
    }

    pub fn trending(&self) -> &TrendingView {
        &self.trending
    }

    /// Activate the initial tab.
    pub async fn start(&self) -> Option<RefreshOutcome> {
        self.activate(self.active_tab()).await
    }

    /// Switch tabs and activate the newly selected view.
    pub async fn select_tab(&self, tab: Tab) -> Option<RefreshOutcome> {
        {
            let mut active = crate::view::lock(&self.active);
            let previous = *active;
            if previous != tab {
                tracing::debug!(from = %previous, to = %tab, "Tab selected");
                *active = tab;
            }
        }
        self.activate(tab).await
    }

    async fn activate(&self, tab: Tab) -> Option<RefreshOutcome> {
        match tab {
            Tab::Markets => self.markets.activate().await,
            Tab::Charts => self.chart.activate().await,
            Tab::Trending => self.trending.activate().await,
        }
    }
}
