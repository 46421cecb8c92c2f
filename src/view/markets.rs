//! Markets table view with server-side pagination.

use super::{lock, Render};
use crate::domain::market::{MarketEntry, MarketsStore, SearchParam, SearchParameters};
use crate::error::ExplorerError;
use crate::shared::fmt::{display_percent, display_usd};
use crate::shared::Trend;
use crate::store::{Changes, RefreshOutcome, Subscription};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Page sizes offered by the per-page selector.
pub const PAGE_SIZE_OPTIONS: [u32; 4] = [10, 25, 50, 100];

/// One formatted table row.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketRow {
    pub id: String,
    pub rank: String,
    pub image: String,
    pub name: String,
    pub symbol: String,
    pub price: String,
    pub change_24h: String,
    pub trend: Option<Trend>,
    pub market_cap: String,
    pub volume: String,
}

impl From<&MarketEntry> for MarketRow {
    fn from(e: &MarketEntry) -> Self {
        Self {
            id: e.id.clone(),
            rank: e
                .market_cap_rank
                .map_or_else(|| "-".to_string(), |r| r.to_string()),
            image: e.image.clone(),
            name: e.name.clone(),
            symbol: e.symbol.to_uppercase(),
            price: display_usd(e.current_price),
            change_24h: display_percent(e.price_change_percentage_24h),
            trend: e.price_change_percentage_24h.map(Trend::of),
            market_cap: display_usd(e.market_cap),
            volume: display_usd(e.total_volume),
        }
    }
}

/// Pagination controls state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
    pub previous_enabled: bool,
    /// The markets endpoint reports no total, so next is always offered.
    pub next_enabled: bool,
}

impl From<&SearchParameters> for Pagination {
    fn from(p: &SearchParameters) -> Self {
        Self {
            page: p.page,
            per_page: p.per_page,
            previous_enabled: p.page > 1,
            next_enabled: true,
        }
    }
}

/// Everything the markets tab draws once data is ready.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketsTable {
    pub rows: Arc<Vec<MarketRow>>,
    pub pagination: Pagination,
    pub page_size_options: &'static [u32],
}

struct Model {
    rows: Arc<Vec<MarketRow>>,
    pagination: Pagination,
    table_builds: u64,
}

impl Model {
    fn rebuild_rows(&mut self, entries: Option<&Vec<MarketEntry>>) {
        self.rows = Arc::new(entries.map_or_else(Vec::new, |e| e.iter().map(MarketRow::from).collect()));
        self.table_builds += 1;
    }
}

/// Binding between the markets store and the markets table.
///
/// Rows are rebuilt only when the store's data changes; parameter changes
/// only touch the pagination controls.
pub struct MarketsView {
    store: Arc<MarketsStore>,
    model: Arc<Mutex<Model>>,
    activated: AtomicBool,
    _subscriptions: Vec<Subscription>,
}

impl MarketsView {
    pub fn new(store: Arc<MarketsStore>) -> Self {
        let state = store.state();
        let mut model = Model {
            rows: Arc::new(Vec::new()),
            pagination: Pagination::from(&state.parameters),
            table_builds: 0,
        };
        model.rebuild_rows(state.data.as_deref());
        let model = Arc::new(Mutex::new(model));

        let rows_model = model.clone();
        let rows = store.subscribe_fields(Changes::DATA, move |state, _| {
            lock(&rows_model).rebuild_rows(state.data.as_deref());
        });
        let pagination_model = model.clone();
        let pagination = store.subscribe_fields(Changes::PARAMETERS, move |state, _| {
            lock(&pagination_model).pagination = Pagination::from(&state.parameters);
        });

        Self {
            store,
            model,
            activated: AtomicBool::new(false),
            _subscriptions: vec![rows, pagination],
        }
    }

    pub fn store(&self) -> &Arc<MarketsStore> {
        &self.store
    }

    /// First activation fetches when no rows are loaded. Later activations
    /// do nothing.
    pub async fn activate(&self) -> Option<RefreshOutcome> {
        if self.activated.swap(true, Ordering::SeqCst) {
            return None;
        }
        if !self.store.is_empty() {
            return None;
        }
        tracing::debug!("Markets view activated with no rows, fetching");
        Some(self.store.refresh().await)
    }

    pub fn render(&self) -> Render<MarketsTable> {
        let state = self.store.state();
        Render::from_state(&state, || {
            let model = lock(&self.model);
            MarketsTable {
                rows: model.rows.clone(),
                pagination: model.pagination,
                page_size_options: &PAGE_SIZE_OPTIONS,
            }
        })
    }

    pub fn pagination(&self) -> Pagination {
        lock(&self.model).pagination
    }

    /// How many times the rows have been built. Used to check that only
    /// data changes rebuild the table.
    pub fn table_builds(&self) -> u64 {
        lock(&self.model).table_builds
    }

    // ── Actions ──────────────────────────────────────────────────────────

    pub async fn next_page(&self) -> Result<RefreshOutcome, ExplorerError> {
        let page = self.store.parameters().page;
        self.go_to(SearchParam::Page(page.saturating_add(1))).await
    }

    /// `None` when already on the first page.
    pub async fn previous_page(&self) -> Result<Option<RefreshOutcome>, ExplorerError> {
        let page = self.store.parameters().page;
        if page <= 1 {
            return Ok(None);
        }
        self.go_to(SearchParam::Page(page - 1)).await.map(Some)
    }

    /// Change the page size. Always lands back on page 1.
    pub async fn set_page_size(&self, per_page: u32) -> Result<RefreshOutcome, ExplorerError> {
        self.go_to(SearchParam::PerPage(per_page)).await
    }

    async fn go_to(&self, param: SearchParam) -> Result<RefreshOutcome, ExplorerError> {
        self.store.update_parameter(param)?;
        Ok(self.store.refresh().await)
    }
}
