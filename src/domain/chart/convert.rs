//! Conversions: wire chart → raw series → display series.

use super::wire::MarketChartResponse;
use super::{ChartDisplay, DisplayPoint, DisplaySeries, MarketChart, SeriesPoint};
use chrono::DateTime;

impl From<MarketChartResponse> for MarketChart {
    fn from(r: MarketChartResponse) -> Self {
        let points = |raw: Vec<(i64, f64)>| {
            raw.into_iter()
                .map(|(timestamp_ms, value)| SeriesPoint {
                    timestamp_ms,
                    value,
                })
                .collect()
        };
        Self {
            prices: points(r.prices),
            market_caps: points(r.market_caps),
            total_volumes: points(r.total_volumes),
        }
    }
}

/// Project raw samples onto calendar time. Samples whose timestamp is out of
/// chrono's range are dropped.
pub fn to_display(points: &[SeriesPoint]) -> DisplaySeries {
    points
        .iter()
        .filter_map(|p| {
            DateTime::from_timestamp_millis(p.timestamp_ms).map(|date| DisplayPoint {
                date,
                value: p.value,
            })
        })
        .collect()
}

impl From<&MarketChart> for ChartDisplay {
    fn from(chart: &MarketChart) -> Self {
        Self {
            prices: to_display(&chart.prices),
            market_caps: to_display(&chart.market_caps),
            total_volumes: to_display(&chart.total_volumes),
        }
    }
}
