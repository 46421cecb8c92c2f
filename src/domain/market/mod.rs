//! Market domain — `/coins/markets` search parameters and rows.

#[cfg(feature = "http")]
pub mod client;
pub mod state;
pub mod wire;

use crate::error::ExplorerError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use state::{MarketsResource, MarketsStore};
pub use wire::{MarketEntry, Roi, SparklineIn7d};

// ─── SortOrder ───────────────────────────────────────────────────────────────

/// Sort order accepted by `/coins/markets`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    MarketCapDesc,
    MarketCapAsc,
    VolumeDesc,
    VolumeAsc,
    IdDesc,
    IdAsc,
}

impl SortOrder {
    pub const ALL: [SortOrder; 6] = [
        SortOrder::MarketCapDesc,
        SortOrder::MarketCapAsc,
        SortOrder::VolumeDesc,
        SortOrder::VolumeAsc,
        SortOrder::IdDesc,
        SortOrder::IdAsc,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::MarketCapDesc => "market_cap_desc",
            SortOrder::MarketCapAsc => "market_cap_asc",
            SortOrder::VolumeDesc => "volume_desc",
            SortOrder::VolumeAsc => "volume_asc",
            SortOrder::IdDesc => "id_desc",
            SortOrder::IdAsc => "id_asc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = ExplorerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortOrder::ALL
            .into_iter()
            .find(|o| o.as_str() == s)
            .ok_or_else(|| ExplorerError::Validation(format!("Unknown sort order: {s}")))
    }
}

// ─── SearchParameters ────────────────────────────────────────────────────────

/// Query for the markets list.
///
/// Field names double as query keys and as the persisted JSON schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchParameters {
    pub vs_currency: String,
    pub order: SortOrder,
    pub per_page: u32,
    pub page: u32,
    #[serde(default)]
    pub sparkline: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_change_percentage: Option<String>,
}

impl Default for SearchParameters {
    fn default() -> Self {
        Self {
            vs_currency: "usd".to_string(),
            order: SortOrder::MarketCapDesc,
            per_page: 50,
            page: 1,
            sparkline: false,
            price_change_percentage: None,
        }
    }
}

impl SearchParameters {
    /// Apply one keyed update.
    ///
    /// Changing `per_page` resets `page` to 1 so the current page can never
    /// point past the end of the new page size. Invalid values are rejected
    /// and leave `self` untouched.
    pub fn apply(&mut self, param: SearchParam) -> Result<(), ExplorerError> {
        match param {
            SearchParam::VsCurrency(currency) => {
                let currency = currency.trim();
                if currency.is_empty() {
                    return Err(ExplorerError::Validation(
                        "vs_currency must not be empty".to_string(),
                    ));
                }
                self.vs_currency = currency.to_string();
            }
            SearchParam::Order(order) => self.order = order,
            SearchParam::PerPage(per_page) => {
                if per_page == 0 {
                    return Err(ExplorerError::Validation(
                        "per_page must be greater than 0".to_string(),
                    ));
                }
                self.per_page = per_page;
                self.page = 1;
            }
            SearchParam::Page(page) => {
                if page == 0 {
                    return Err(ExplorerError::Validation(
                        "page must be at least 1".to_string(),
                    ));
                }
                self.page = page;
            }
            SearchParam::Sparkline(sparkline) => self.sparkline = sparkline,
            SearchParam::PriceChangePercentage(windows) => {
                self.price_change_percentage = windows.filter(|w| !w.trim().is_empty());
            }
        }
        Ok(())
    }

    /// Check the invariants on a value restored from storage.
    pub fn validate(&self) -> Result<(), ExplorerError> {
        if self.vs_currency.trim().is_empty() {
            return Err(ExplorerError::Validation("vs_currency must not be empty".to_string()));
        }
        if self.per_page == 0 {
            return Err(ExplorerError::Validation("per_page must be greater than 0".to_string()));
        }
        if self.page == 0 {
            return Err(ExplorerError::Validation("page must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// A single keyed update to [`SearchParameters`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchParam {
    VsCurrency(String),
    Order(SortOrder),
    PerPage(u32),
    Page(u32),
    Sparkline(bool),
    PriceChangePercentage(Option<String>),
}

impl SearchParam {
    /// Query / storage key this update writes.
    pub fn key(&self) -> &'static str {
        match self {
            SearchParam::VsCurrency(_) => "vs_currency",
            SearchParam::Order(_) => "order",
            SearchParam::PerPage(_) => "per_page",
            SearchParam::Page(_) => "page",
            SearchParam::Sparkline(_) => "sparkline",
            SearchParam::PriceChangePercentage(_) => "price_change_percentage",
        }
    }
}
