//! In-memory `MarketDataSource` for unit tests.

use crate::domain::chart::{ChartParams, MarketChart, SeriesPoint};
use crate::domain::market::{MarketEntry, SearchParameters};
use crate::domain::trending::{Trending, TrendingItem};
use crate::error::{ExplorerError, HttpError};
use crate::shared::CoinId;
use crate::source::MarketDataSource;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

enum Failure {
    Status(u16, String),
    Other(String),
}

impl Failure {
    fn to_error(&self) -> ExplorerError {
        match self {
            Failure::Status(status, text) => HttpError::Status {
                status: *status,
                status_text: text.clone(),
            }
            .into(),
            Failure::Other(msg) => HttpError::Decode(msg.clone()).into(),
        }
    }
}

/// Holds fetches until released, so tests can observe the in-flight state.
#[derive(Default)]
pub(crate) struct Gate {
    entered: AtomicBool,
    entered_notify: Notify,
    released: AtomicBool,
    release_notify: Notify,
}

impl Gate {
    pub(crate) async fn wait_until_entered(&self) {
        loop {
            let notified = self.entered_notify.notified();
            if self.entered.load(Ordering::SeqCst) {
                return;
            }
            notified.await;
        }
    }

    pub(crate) fn release(&self) {
        self.released.store(true, Ordering::SeqCst);
        self.release_notify.notify_waiters();
    }

    async fn pass(&self) {
        self.entered.store(true, Ordering::SeqCst);
        self.entered_notify.notify_waiters();
        loop {
            let notified = self.release_notify.notified();
            if self.released.load(Ordering::SeqCst) {
                return;
            }
            notified.await;
        }
    }
}

/// Fake upstream with per-endpoint call counters.
#[derive(Default)]
pub(crate) struct FakeSource {
    markets_calls: AtomicUsize,
    chart_calls: AtomicUsize,
    trending_calls: AtomicUsize,
    failure: Mutex<Option<Failure>>,
    gate: Mutex<Option<Arc<Gate>>>,
    chart: Mutex<MarketChart>,
    trending: Mutex<Trending>,
    last_markets_params: Mutex<Option<SearchParameters>>,
}

impl FakeSource {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Every later call fails with `err` until [`succeed`](Self::succeed).
    pub(crate) fn fail_with(&self, err: HttpError) {
        let failure = match err {
            HttpError::Status {
                status,
                status_text,
            } => Failure::Status(status, status_text),
            other => Failure::Other(other.to_string()),
        };
        *self.failure.lock().unwrap() = Some(failure);
    }

    pub(crate) fn succeed(&self) {
        *self.failure.lock().unwrap() = None;
    }

    /// Arm a gate that holds every fetch until released.
    pub(crate) fn gate(&self) -> Arc<Gate> {
        let gate = Arc::new(Gate::default());
        *self.gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    pub(crate) fn set_chart(&self, chart: MarketChart) {
        *self.chart.lock().unwrap() = chart;
    }

    pub(crate) fn set_trending_coins(&self, count: usize) {
        self.trending.lock().unwrap().coins = (0..count).map(trending_item).collect();
    }

    pub(crate) fn markets_calls(&self) -> usize {
        self.markets_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn chart_calls(&self) -> usize {
        self.chart_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn trending_calls(&self) -> usize {
        self.trending_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn last_markets_params(&self) -> Option<SearchParameters> {
        self.last_markets_params.lock().unwrap().clone()
    }

    async fn enter(&self, counter: &AtomicUsize) -> Result<(), ExplorerError> {
        counter.fetch_add(1, Ordering::SeqCst);
        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.pass().await;
        }
        match self.failure.lock().unwrap().as_ref() {
            Some(failure) => Err(failure.to_error()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl MarketDataSource for FakeSource {
    async fn fetch_markets(
        &self,
        params: &SearchParameters,
    ) -> Result<Vec<MarketEntry>, ExplorerError> {
        *self.last_markets_params.lock().unwrap() = Some(params.clone());
        self.enter(&self.markets_calls).await?;
        let offset = (params.page.saturating_sub(1) * params.per_page) as usize;
        Ok((0..params.per_page as usize)
            .map(|i| market_entry(offset + i))
            .collect())
    }

    async fn fetch_chart(
        &self,
        _coin_id: &CoinId,
        _params: &ChartParams,
    ) -> Result<MarketChart, ExplorerError> {
        self.enter(&self.chart_calls).await?;
        Ok(self.chart.lock().unwrap().clone())
    }

    async fn fetch_trending(&self) -> Result<Trending, ExplorerError> {
        self.enter(&self.trending_calls).await?;
        Ok(self.trending.lock().unwrap().clone())
    }
}

pub(crate) fn market_entry(rank: usize) -> MarketEntry {
    MarketEntry {
        id: format!("coin-{rank}"),
        symbol: format!("c{rank}"),
        name: format!("Coin {rank}"),
        image: format!("https://img.example/{rank}.png"),
        current_price: Some(1000.0 - rank as f64),
        market_cap: Some(1_000_000.0),
        market_cap_rank: Some(rank as u32 + 1),
        total_volume: Some(50_000.0),
        price_change_percentage_24h: Some(if rank % 2 == 0 { 1.25 } else { -0.75 }),
        ..MarketEntry::default()
    }
}

pub(crate) fn trending_item(i: usize) -> TrendingItem {
    TrendingItem {
        id: format!("trend-{i}"),
        coin_id: i as u64,
        name: format!("Trend {i}"),
        symbol: format!("T{i}"),
        score: i as u32,
        ..TrendingItem::default()
    }
}

pub(crate) fn chart_fixture(points: usize) -> MarketChart {
    let series = |scale: f64| {
        (0..points)
            .map(|i| SeriesPoint {
                timestamp_ms: 1_700_000_000_000 + i as i64 * 3_600_000,
                value: scale * (i as f64 + 1.0),
            })
            .collect::<Vec<_>>()
    };
    MarketChart {
        prices: series(100.0),
        market_caps: series(1_000_000.0),
        total_volumes: series(5_000.0),
    }
}
