//! Low-level HTTP client — `CoinGeckoHttp`.
//!
//! One method per API endpoint. Each call is exactly one round trip: no retry,
//! no caching. Bodies are decoded into wire types and converted to domain
//! types before they leave this module.

use crate::domain::chart::wire::MarketChartResponse;
use crate::domain::chart::{ChartParams, MarketChart};
use crate::domain::market::{MarketEntry, SearchParameters};
use crate::domain::trending::wire::TrendingResponse;
use crate::domain::trending::Trending;
use crate::error::{ExplorerError, HttpError};
use crate::network::{DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};
use crate::shared::CoinId;
use crate::source::MarketDataSource;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// Transport settings for [`CoinGeckoHttp`].
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Low-level HTTP client for the CoinGecko v3 REST API.
#[derive(Clone)]
pub struct CoinGeckoHttp {
    base_url: String,
    client: Client,
}

impl CoinGeckoHttp {
    /// Client for `base_url` with default timeout and user agent.
    pub fn new(base_url: &str) -> Result<Self, HttpError> {
        Self::with_config(&HttpConfig {
            base_url: base_url.to_string(),
            ..HttpConfig::default()
        })
    }

    pub fn with_config(config: &HttpConfig) -> Result<Self, HttpError> {
        #[allow(unused_mut)]
        let mut builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        {
            builder = builder
                .timeout(config.timeout)
                .user_agent(config.user_agent.as_str())
                .pool_max_idle_per_host(10);
        }

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client: builder.build()?,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ── Markets ──────────────────────────────────────────────────────────

    pub async fn get_markets(
        &self,
        params: &SearchParameters,
    ) -> Result<Vec<MarketEntry>, HttpError> {
        let url = self.markets_url(params)?;
        self.get(&url).await
    }

    // ── Charts ───────────────────────────────────────────────────────────

    pub async fn get_market_chart(
        &self,
        coin_id: &CoinId,
        params: &ChartParams,
    ) -> Result<MarketChart, HttpError> {
        let url = self.chart_url(coin_id, params)?;
        let resp: MarketChartResponse = self.get(&url).await?;
        Ok(resp.into())
    }

    // ── Trending ─────────────────────────────────────────────────────────

    pub async fn get_trending(&self) -> Result<Trending, HttpError> {
        let url = self.trending_url();
        let resp: TrendingResponse = self.get(&url).await?;
        Ok(resp.into())
    }

    // ── URLs ─────────────────────────────────────────────────────────────

    fn markets_url(&self, params: &SearchParameters) -> Result<String, HttpError> {
        Ok(format!(
            "{}/coins/markets?{}",
            self.base_url,
            query_string(params)?
        ))
    }

    fn chart_url(&self, coin_id: &CoinId, params: &ChartParams) -> Result<String, HttpError> {
        Ok(format!(
            "{}/coins/{}/market_chart?{}",
            self.base_url,
            coin_id.path_segment(),
            query_string(params)?
        ))
    }

    fn trending_url(&self) -> String {
        format!("{}/search/trending", self.base_url)
    }

    // ── Internal HTTP methods ────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T, HttpError> {
        tracing::debug!(url, "GET");
        let resp = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            tracing::debug!(url, status = status.as_u16(), "Request rejected");
            return Err(status_error(status));
        }

        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|e| HttpError::Decode(e.to_string()))
    }
}

fn query_string<T: Serialize>(params: &T) -> Result<String, HttpError> {
    serde_urlencoded::to_string(params).map_err(|e| HttpError::Query(e.to_string()))
}

/// Non-2xx responses carry only the status text; the body is not read.
fn status_error(status: StatusCode) -> HttpError {
    HttpError::Status {
        status: status.as_u16(),
        status_text: status
            .canonical_reason()
            .map(str::to_string)
            .unwrap_or_else(|| status.as_u16().to_string()),
    }
}

#[async_trait]
impl MarketDataSource for CoinGeckoHttp {
    async fn fetch_markets(
        &self,
        params: &SearchParameters,
    ) -> Result<Vec<MarketEntry>, ExplorerError> {
        Ok(self.get_markets(params).await?)
    }

    async fn fetch_chart(
        &self,
        coin_id: &CoinId,
        params: &ChartParams,
    ) -> Result<MarketChart, ExplorerError> {
        Ok(self.get_market_chart(coin_id, params).await?)
    }

    async fn fetch_trending(&self) -> Result<Trending, ExplorerError> {
        Ok(self.get_trending().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chart::Days;
    use crate::domain::market::SortOrder;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn http() -> CoinGeckoHttp {
        CoinGeckoHttp::new("https://api.example.test/api/v3/").unwrap()
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        assert_eq!(http().base_url(), "https://api.example.test/api/v3");
    }

    #[test]
    fn test_markets_url_includes_every_defined_field() {
        let params = SearchParameters {
            order: SortOrder::VolumeDesc,
            per_page: 25,
            page: 3,
            sparkline: true,
            price_change_percentage: Some("1h,24h".to_string()),
            ..SearchParameters::default()
        };
        assert_eq!(
            http().markets_url(&params).unwrap(),
            "https://api.example.test/api/v3/coins/markets?vs_currency=usd&order=volume_desc\
             &per_page=25&page=3&sparkline=true&price_change_percentage=1h%2C24h"
        );
    }

    #[test]
    fn test_markets_url_omits_undefined_fields() {
        let url = http().markets_url(&SearchParameters::default()).unwrap();
        assert!(!url.contains("price_change_percentage"));
        assert!(url.ends_with("sparkline=false"));
    }

    #[test]
    fn test_chart_url_encodes_coin_id() {
        let params = ChartParams {
            vs_currency: "usd".to_string(),
            days: Days::Max,
            interval: None,
        }
        .daily();
        assert_eq!(
            http().chart_url(&CoinId::new("weird id/x"), &params).unwrap(),
            "https://api.example.test/api/v3/coins/weird%20id%2Fx/market_chart\
             ?vs_currency=usd&days=max&interval=daily"
        );
    }

    #[test]
    fn test_trending_url() {
        assert_eq!(
            http().trending_url(),
            "https://api.example.test/api/v3/search/trending"
        );
    }

    #[test]
    fn test_status_error_uses_reason_phrase() {
        let err = status_error(StatusCode::NOT_FOUND);
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.to_string(), "CoinGecko API error: Not Found");

        let err = status_error(StatusCode::from_u16(599).unwrap());
        assert_eq!(err.to_string(), "CoinGecko API error: 599");
    }

    /// Serve exactly one canned HTTP response on a local port.
    async fn serve_once(status_line: &'static str, body: &'static str) -> CoinGeckoHttp {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request: Vec<u8> = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });
        CoinGeckoHttp::new(&format!("http://{addr}/api/v3")).unwrap()
    }

    #[tokio::test]
    async fn test_non_success_status_reports_status_text() {
        let http = serve_once("404 Not Found", r#"{"error":"coin not found"}"#).await;
        let err = http
            .get_market_chart(&CoinId::new("nope"), &ChartParams::usd_days(7))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.to_string(), "CoinGecko API error: Not Found");
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let http = serve_once("200 OK", "{bad ").await;
        let err = http.get_trending().await.unwrap_err();
        assert!(matches!(err, HttpError::Decode(_)), "got {err:?}");
        assert_eq!(err.status(), None);
    }

    #[tokio::test]
    async fn test_success_body_is_decoded() {
        let http = serve_once("200 OK", r#"{"coins":[{"item":{"id":"pepe","score":0}}]}"#).await;
        let trending = http.get_trending().await.unwrap();
        assert_eq!(trending.coins.len(), 1);
        assert_eq!(trending.coins[0].id, "pepe");
    }
}
