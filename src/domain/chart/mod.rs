//! Chart domain — `/coins/{id}/market_chart` series and their display form.

#[cfg(feature = "http")]
pub mod client;
mod convert;
pub mod state;
pub mod wire;

use crate::shared::CoinId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

pub use state::{ChartResource, ChartStore};

// ─── Request parameters ──────────────────────────────────────────────────────

/// History window: a number of days, or everything the API has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Days {
    Count(u32),
    Max,
}

impl Days {
    pub fn as_query(&self) -> String {
        match self {
            Days::Count(n) => n.to_string(),
            Days::Max => "max".to_string(),
        }
    }
}

impl fmt::Display for Days {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_query())
    }
}

impl Serialize for Days {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.as_query())
    }
}

impl<'de> Deserialize<'de> for Days {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Num(u32),
            Str(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Num(n) => Ok(Days::Count(n)),
            Raw::Str(s) if s == "max" => Ok(Days::Max),
            Raw::Str(s) => s
                .parse::<u32>()
                .map(Days::Count)
                .map_err(|_| serde::de::Error::custom(format!("Invalid days: {s}"))),
        }
    }
}

/// Data-point granularity. Only `daily` is accepted by the public API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interval {
    Daily,
}

/// Query for one coin's market chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartParams {
    pub vs_currency: String,
    pub days: Days,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<Interval>,
}

impl ChartParams {
    pub fn usd_days(days: u32) -> Self {
        Self {
            vs_currency: "usd".to_string(),
            days: Days::Count(days),
            interval: None,
        }
    }

    pub fn daily(mut self) -> Self {
        self.interval = Some(Interval::Daily);
        self
    }
}

/// Store parameters for the chart resource: which coin, which window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartQuery {
    pub coin_id: CoinId,
    pub params: ChartParams,
}

impl ChartQuery {
    pub fn new(coin_id: impl Into<CoinId>, params: ChartParams) -> Self {
        Self {
            coin_id: coin_id.into(),
            params,
        }
    }
}

// ─── Raw series ──────────────────────────────────────────────────────────────

/// One raw `[epoch_ms, value]` sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub timestamp_ms: i64,
    pub value: f64,
}

/// Prices, market caps and volumes for one coin, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketChart {
    pub prices: Vec<SeriesPoint>,
    pub market_caps: Vec<SeriesPoint>,
    pub total_volumes: Vec<SeriesPoint>,
}

impl MarketChart {
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty() && self.market_caps.is_empty() && self.total_volumes.is_empty()
    }

    pub fn series(&self, metric: Metric) -> &[SeriesPoint] {
        match metric {
            Metric::Price => &self.prices,
            Metric::MarketCap => &self.market_caps,
            Metric::Volume => &self.total_volumes,
        }
    }
}

/// The three metrics a market chart carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Price,
    MarketCap,
    Volume,
}

// ─── Display series ──────────────────────────────────────────────────────────

/// A sample ready for a date axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DisplayPoint {
    pub date: DateTime<Utc>,
    pub value: f64,
}

pub type DisplaySeries = Vec<DisplayPoint>;

/// Display form of a whole [`MarketChart`]. Always derived, never edited.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartDisplay {
    pub prices: DisplaySeries,
    pub market_caps: DisplaySeries,
    pub total_volumes: DisplaySeries,
}

impl ChartDisplay {
    pub fn series(&self, metric: Metric) -> &[DisplayPoint] {
        match metric {
            Metric::Price => &self.prices,
            Metric::MarketCap => &self.market_caps,
            Metric::Volume => &self.total_volumes,
        }
    }

    /// Lowest and highest value of a series, for axis bounds.
    pub fn range(&self, metric: Metric) -> Option<(f64, f64)> {
        self.series(metric).iter().fold(None, |acc, p| match acc {
            None => Some((p.value, p.value)),
            Some((lo, hi)) => Some((lo.min(p.value), hi.max(p.value))),
        })
    }
}
