//! Headless view bindings.
//!
//! A view owns an `Arc` of its store, subscribes to the fields it draws, and
//! keeps a render-ready model that a UI layer reads through `render()`.
//! Views never fetch on their own except through `activate()` and their
//! user actions (pagination), which always go through the store.

pub mod chart;
pub mod markets;
pub mod tabs;
pub mod trending;

use crate::store::FetchState;
use std::sync::{Mutex, MutexGuard};

pub use chart::{ChartModel, ChartView};
pub use markets::{MarketRow, MarketsTable, MarketsView, Pagination, PAGE_SIZE_OPTIONS};
pub use tabs::Tab;
pub use trending::{TrendingRow, TrendingTable, TrendingView};

/// What a view should draw right now.
///
/// Loading wins over error, and an error replaces the data entirely.
#[derive(Debug, Clone, PartialEq)]
pub enum Render<T> {
    Loading,
    Error(String),
    Ready(T),
}

impl<T> Render<T> {
    /// Pick the variant for `state`, building the ready model lazily.
    pub fn from_state<P, D>(state: &FetchState<P, D>, ready: impl FnOnce() -> T) -> Self {
        if state.loading {
            Render::Loading
        } else if let Some(error) = &state.error {
            Render::Error(error.clone())
        } else {
            Render::Ready(ready())
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Render::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Render::Error(e) => Some(e),
            _ => None,
        }
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Render::Ready(model) => Some(model),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Render<U> {
        match self {
            Render::Loading => Render::Loading,
            Render::Error(e) => Render::Error(e),
            Render::Ready(model) => Render::Ready(f(model)),
        }
    }
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| {
        tracing::warn!("View model mutex was poisoned, recovering");
        poisoned.into_inner()
    })
}
