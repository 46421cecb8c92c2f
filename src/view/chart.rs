//! Bitcoin price chart view.

use super::{lock, Render};
use crate::domain::chart::{ChartDisplay, ChartParams, ChartQuery, ChartStore, Metric};
use crate::store::{Changes, RefreshOutcome, Subscription};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

pub const CHART_COIN: &str = "bitcoin";
pub const CHART_DAYS: u32 = 7;
pub const CHART_TITLE: &str = "Bitcoin Price (Last 7 Days)";
pub const X_AXIS_TITLE: &str = "Date";
pub const Y_AXIS_TITLE: &str = "Price (USD)";
pub const SERIES_NAME: &str = "Bitcoin Price";

/// What the chart tab draws once data is ready.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartModel {
    pub title: &'static str,
    pub x_axis: &'static str,
    pub y_axis: &'static str,
    pub series_name: &'static str,
    pub display: Arc<ChartDisplay>,
    /// Value-axis bounds of the price series.
    pub y_range: Option<(f64, f64)>,
}

struct Series {
    display: Arc<ChartDisplay>,
    builds: u64,
}

/// Binding between the chart store and a line chart of prices.
pub struct ChartView {
    store: Arc<ChartStore>,
    series: Arc<Mutex<Series>>,
    activated: AtomicBool,
    _subscription: Subscription,
}

impl ChartView {
    /// Query the chart tab shows.
    pub fn default_query() -> ChartQuery {
        ChartQuery::new(CHART_COIN, ChartParams::usd_days(CHART_DAYS))
    }

    pub fn new(store: Arc<ChartStore>) -> Self {
        let series = Arc::new(Mutex::new(Series {
            display: store.display().unwrap_or_default(),
            builds: 0,
        }));

        // Weak: the store owns this listener.
        let weak_store = Arc::downgrade(&store);
        let target = series.clone();
        let subscription = store.subscribe_fields(Changes::DATA, move |state, _| {
            let (Some(store), Some(chart)) = (weak_store.upgrade(), state.data.as_ref()) else {
                return;
            };
            let display = store.display_for(state.data_version, chart);
            let mut series = lock(&target);
            series.display = display;
            series.builds += 1;
        });

        Self {
            store,
            series,
            activated: AtomicBool::new(false),
            _subscription: subscription,
        }
    }

    pub fn store(&self) -> &Arc<ChartStore> {
        &self.store
    }

    /// First activation fetches. The store's fetch-once guard makes any
    /// later refresh a no-op.
    pub async fn activate(&self) -> Option<RefreshOutcome> {
        if self.activated.swap(true, Ordering::SeqCst) {
            return None;
        }
        Some(self.store.refresh().await)
    }

    pub fn render(&self) -> Render<ChartModel> {
        let state = self.store.state();
        Render::from_state(&state, || {
            let display = lock(&self.series).display.clone();
            ChartModel {
                title: CHART_TITLE,
                x_axis: X_AXIS_TITLE,
                y_axis: Y_AXIS_TITLE,
                series_name: SERIES_NAME,
                y_range: display.range(Metric::Price),
                display,
            }
        })
    }

    /// How many times the series have been rebuilt from new data.
    pub fn series_builds(&self) -> u64 {
        lock(&self.series).builds
    }
}
