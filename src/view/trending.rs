//! Trending coins view with client-side pagination.

use super::{lock, Render};
use crate::domain::trending::{Page, TrendingItem, TrendingStore};
use crate::shared::fmt::display;
use crate::store::{Changes, RefreshOutcome, Subscription};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

pub const DEFAULT_TRENDING_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct TrendingRow {
    pub id: String,
    pub rank: String,
    pub thumb: String,
    pub name: String,
    pub symbol: String,
    pub price_btc: String,
    pub score: u32,
}

impl From<&TrendingItem> for TrendingRow {
    fn from(item: &TrendingItem) -> Self {
        Self {
            id: item.id.clone(),
            rank: item
                .market_cap_rank
                .map_or_else(|| "-".to_string(), |r| r.to_string()),
            thumb: item.thumb.clone(),
            name: item.name.clone(),
            symbol: item.symbol.to_uppercase(),
            price_btc: format!("₿{}", display(item.price_btc)),
            score: item.score,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrendingTable {
    pub rows: Vec<TrendingRow>,
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    pub total_pages: usize,
    pub previous_enabled: bool,
    pub next_enabled: bool,
}

impl TrendingTable {
    fn from_page(page: Page<'_, TrendingRow>) -> Self {
        Self {
            rows: page.items.to_vec(),
            page: page.page,
            per_page: page.per_page,
            total: page.total,
            total_pages: page.total_pages,
            previous_enabled: page.has_previous(),
            next_enabled: page.has_next(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Cursor {
    page: usize,
    per_page: usize,
}

struct Model {
    rows: Arc<Vec<TrendingRow>>,
    row_builds: u64,
}

impl Model {
    fn rebuild_rows(&mut self, items: Option<&[TrendingItem]>) {
        self.rows = Arc::new(items.map_or_else(Vec::new, |i| i.iter().map(TrendingRow::from).collect()));
        self.row_builds += 1;
    }
}

/// Binding between the trending store and a paged table.
///
/// Rows are formatted once per fetched snapshot. Paging never refetches
/// and never reformats; pages are windows over the cached rows.
pub struct TrendingView {
    store: Arc<TrendingStore>,
    model: Arc<Mutex<Model>>,
    cursor: Mutex<Cursor>,
    activated: AtomicBool,
    _subscription: Subscription,
}

impl TrendingView {
    pub fn new(store: Arc<TrendingStore>) -> Self {
        Self::with_page_size(store, DEFAULT_TRENDING_PAGE_SIZE)
    }

    pub fn with_page_size(store: Arc<TrendingStore>, per_page: usize) -> Self {
        let mut model = Model {
            rows: Arc::new(Vec::new()),
            row_builds: 0,
        };
        model.rebuild_rows(store.data().as_deref().map(|t| t.coins.as_slice()));
        let model = Arc::new(Mutex::new(model));

        let rows_model = model.clone();
        let subscription = store.subscribe_fields(Changes::DATA, move |state, _| {
            lock(&rows_model).rebuild_rows(state.data.as_deref().map(|t| t.coins.as_slice()));
        });

        Self {
            store,
            model,
            cursor: Mutex::new(Cursor {
                page: 1,
                per_page: per_page.max(1),
            }),
            activated: AtomicBool::new(false),
            _subscription: subscription,
        }
    }

    pub fn store(&self) -> &Arc<TrendingStore> {
        &self.store
    }

    /// First activation fetches when nothing is loaded.
    pub async fn activate(&self) -> Option<RefreshOutcome> {
        if self.activated.swap(true, Ordering::SeqCst) {
            return None;
        }
        if !self.store.is_empty() {
            return None;
        }
        Some(self.store.refresh().await)
    }

    pub fn render(&self) -> Render<TrendingTable> {
        let state = self.store.state();
        let cursor = *lock(&self.cursor);
        Render::from_state(&state, || {
            let rows = lock(&self.model).rows.clone();
            TrendingTable::from_page(Page::new(rows.as_slice(), cursor.page, cursor.per_page))
        })
    }

    pub fn page(&self) -> usize {
        lock(&self.cursor).page
    }

    /// How many times the cached rows have been formatted.
    pub fn row_builds(&self) -> u64 {
        lock(&self.model).row_builds
    }

    /// Returns false when already on the last page.
    pub fn next_page(&self) -> bool {
        let last = self.total_pages();
        let mut cursor = lock(&self.cursor);
        if cursor.page >= last {
            return false;
        }
        cursor.page += 1;
        true
    }

    /// Returns false when already on the first page.
    pub fn previous_page(&self) -> bool {
        let mut cursor = lock(&self.cursor);
        if cursor.page <= 1 {
            return false;
        }
        cursor.page -= 1;
        true
    }

    /// Change the page size and return to page 1. Zero is ignored.
    pub fn set_page_size(&self, per_page: usize) {
        if per_page == 0 {
            return;
        }
        let mut cursor = lock(&self.cursor);
        cursor.per_page = per_page;
        cursor.page = 1;
    }

    /// Refetch the snapshot and return to page 1.
    pub async fn reload(&self) -> RefreshOutcome {
        let outcome = self.store.refresh().await;
        if outcome == RefreshOutcome::Fetched {
            lock(&self.cursor).page = 1;
        }
        outcome
    }

    fn total_pages(&self) -> usize {
        let per_page = lock(&self.cursor).per_page;
        let total = lock(&self.model).rows.len();
        crate::shared::total_pages(total, per_page)
    }
}
