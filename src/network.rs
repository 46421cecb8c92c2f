//! Network constants for the CoinGecko public API.

/// Default REST API base URL.
pub const DEFAULT_API_URL: &str = "https://api.coingecko.com/api/v3";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default `User-Agent` sent with every request.
pub const DEFAULT_USER_AGENT: &str = concat!("coingecko-explorer/", env!("CARGO_PKG_VERSION"));

/// Storage key under which the markets search parameters are persisted.
pub const MARKETS_STORAGE_KEY: &str = "markets-storage";
