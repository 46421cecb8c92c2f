//! Wire types for `/coins/markets` (REST).
//!
//! Rows are passed through untransformed. Numeric fields are optional because
//! the API sends `null` for unranked or newly listed coins.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Return on investment since ICO, when the API knows it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Roi {
    pub times: f64,
    pub currency: String,
    pub percentage: f64,
}

/// Seven-day sparkline, present only when `sparkline=true` was requested.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SparklineIn7d {
    #[serde(default)]
    pub price: Vec<f64>,
}

/// One row of the markets list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketEntry {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub image: String,
    pub current_price: Option<f64>,
    pub market_cap: Option<f64>,
    pub market_cap_rank: Option<u32>,
    pub fully_diluted_valuation: Option<f64>,
    pub total_volume: Option<f64>,
    pub high_24h: Option<f64>,
    pub low_24h: Option<f64>,
    pub price_change_24h: Option<f64>,
    pub price_change_percentage_24h: Option<f64>,
    pub market_cap_change_24h: Option<f64>,
    pub market_cap_change_percentage_24h: Option<f64>,
    pub circulating_supply: Option<f64>,
    pub total_supply: Option<f64>,
    pub max_supply: Option<f64>,
    pub ath: Option<f64>,
    pub ath_change_percentage: Option<f64>,
    pub ath_date: Option<DateTime<Utc>>,
    pub atl: Option<f64>,
    pub atl_change_percentage: Option<f64>,
    pub atl_date: Option<DateTime<Utc>>,
    pub roi: Option<Roi>,
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sparkline_in_7d: Option<SparklineIn7d>,
    /// Extra columns such as `price_change_percentage_7d_in_currency`,
    /// returned when `price_change_percentage` is requested.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl MarketEntry {
    /// Percentage change for a requested window (e.g. `"7d"`), read from the
    /// matching `price_change_percentage_<window>_in_currency` column.
    pub fn price_change_in_currency(&self, window: &str) -> Option<f64> {
        self.extra
            .get(&format!("price_change_percentage_{window}_in_currency"))
            .and_then(|v| v.as_f64())
    }
}
