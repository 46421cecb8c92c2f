//! # CoinGecko Explorer
//!
//! Core of a cryptocurrency market dashboard built on the public CoinGecko v3
//! REST API. Targets both native and WASM.
//!
//! ## Architecture
//!
//! The crate is organized in layers:
//!
//! 1. **Core** — Domain types, wire types, formatting (always available, WASM-safe)
//! 2. **HTTP API** — `CoinGeckoHttp`, one round trip per call, no retry
//! 3. **High-Level Client** — `ExplorerClient` with nested sub-clients
//! 4. **Stores** — observable fetch state per resource (`loading` / `error` / `data`)
//! 5. **Views** — headless bindings that turn store state into render models
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use coingecko_explorer::prelude::*;
//!
//! let client = ExplorerClient::builder().build()?;
//! let top = client.markets().top().await?;
//!
//! let storage = std::sync::Arc::new(MemoryStorage::new());
//! let dashboard = Dashboard::from_client(&client, storage);
//! dashboard.start().await;
//! if let Render::Ready(table) = dashboard.markets().render() {
//!     for row in table.rows.iter() {
//!         println!("{} {} {}", row.rank, row.name, row.price);
//!     }
//! }
//! ```

// ── Layer 1: Core ────────────────────────────────────────────────────────────

/// Shared newtypes, pagination helpers and number formatting.
pub mod shared;

/// Domain modules (vertical slices): types, wire types, conversions, state.
pub mod domain;

/// Unified error types.
pub mod error;

/// Network and storage constants.
pub mod network;

/// The data-source seam between stores and the HTTP client.
pub mod source;

/// Key-value persistence for UI parameters.
pub mod storage;

// ── Layer 2: HTTP API ────────────────────────────────────────────────────────

/// Low-level CoinGecko HTTP client.
#[cfg(feature = "http")]
pub mod http;

// ── Layer 3: High-Level Client ───────────────────────────────────────────────

/// `ExplorerClient` — the primary entry point for direct API access.
#[cfg(feature = "http")]
pub mod client;

// ── Layer 4: Stores ──────────────────────────────────────────────────────────

/// Generic observable fetch-state store.
pub mod store;

// ── Layer 5: Views ───────────────────────────────────────────────────────────

/// Headless view bindings and tabs.
pub mod view;

/// `Dashboard` — composition root.
pub mod app;

// ── Prelude ──────────────────────────────────────────────────────────────────

pub mod prelude {
    // Shared
    pub use crate::shared::{CoinId, Trend};

    // Domain types — markets
    pub use crate::domain::market::{
        MarketEntry, MarketsStore, SearchParam, SearchParameters, SortOrder,
    };

    // Domain types — chart
    pub use crate::domain::chart::{
        ChartDisplay, ChartParams, ChartQuery, ChartStore, Days, DisplayPoint, Interval,
        MarketChart, Metric, SeriesPoint,
    };

    // Domain types — trending
    pub use crate::domain::trending::{
        Page, Paginated, Trending, TrendingCategory, TrendingItem, TrendingNft, TrendingStore,
    };

    // Errors
    pub use crate::error::{ExplorerError, HttpError};

    // Network
    pub use crate::network::{DEFAULT_API_URL, MARKETS_STORAGE_KEY};

    // Data source + storage
    pub use crate::source::MarketDataSource;
    #[cfg(not(target_arch = "wasm32"))]
    pub use crate::storage::JsonFileStorage;
    pub use crate::storage::{MemoryStorage, ParamStorage};

    // Stores
    pub use crate::store::{Changes, FetchState, RefreshOutcome, Resource, Store, Subscription};

    // Views
    pub use crate::app::Dashboard;
    pub use crate::view::{
        ChartView, MarketRow, MarketsTable, MarketsView, Render, Tab, TrendingTable, TrendingView,
    };

    // HTTP client + sub-clients
    #[cfg(feature = "http")]
    pub use crate::client::{
        ChartsClient, ExplorerClient, ExplorerClientBuilder, MarketsClient, TrendingClient,
    };
    #[cfg(feature = "http")]
    pub use crate::http::CoinGeckoHttp;
}
