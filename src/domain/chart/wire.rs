//! Wire types for `/coins/{id}/market_chart` (REST).

use serde::{Deserialize, Serialize};

/// Raw market chart body: each series is a list of `[epoch_ms, value]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketChartResponse {
    #[serde(default, deserialize_with = "crate::shared::serde_util::timestamp_pair::deserialize")]
    pub prices: Vec<(i64, f64)>,
    #[serde(default, deserialize_with = "crate::shared::serde_util::timestamp_pair::deserialize")]
    pub market_caps: Vec<(i64, f64)>,
    #[serde(default, deserialize_with = "crate::shared::serde_util::timestamp_pair::deserialize")]
    pub total_volumes: Vec<(i64, f64)>,
}
