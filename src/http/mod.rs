//! HTTP client layer — `CoinGeckoHttp`.

pub mod client;

pub use client::{CoinGeckoHttp, HttpConfig};
