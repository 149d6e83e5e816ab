//! Upstream market data providers
//!
//! Each provider answers a quote request for one symbol on one exchange.
//! The fallback chain in `quote_fetcher` tries them in priority order.
//!
//! ## Providers (priority order)
//! - Yahoo quoteSummary: full quote plus fundamentals
//! - Yahoo chart meta: price snapshot, also serves daily history
//! - NSE website: raw `quote-equity` JSON, NSE listings only

use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde_json::Value;

use crate::config::AppConfig;
use crate::models::{Exchange, Quote, TimeSeries};

pub mod nse;
pub mod yahoo;

pub use nse::NseWebsiteProvider;
pub use yahoo::{YahooChartProvider, YahooSummaryProvider};

/// Source of point-in-time quotes
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Stable identifier used in logs and in `StockInfo::source`
    fn id(&self) -> &'static str;

    /// Whether this provider lists symbols of the given exchange
    fn supports(&self, _exchange: Exchange) -> bool {
        true
    }

    async fn fetch_quote(&self, symbol: &str, exchange: Exchange) -> Result<Quote>;
}

/// Source of trailing daily candles
#[async_trait]
pub trait HistoryProvider: Send + Sync {
    async fn fetch_history(&self, symbol: &str, exchange: Exchange) -> Result<TimeSeries>;
}

/// Build the shared HTTP client
///
/// Cookies are kept so providers that need a session (Yahoo crumb, NSE)
/// can prime it once.
pub fn build_http_client(config: &AppConfig) -> Result<Client> {
    let client = Client::builder()
        .user_agent(config.providers.user_agent.clone())
        .timeout(config.request_timeout())
        .connect_timeout(config.connect_timeout())
        .pool_idle_timeout(Duration::from_secs(90))
        .cookie_store(true)
        .gzip(true)
        .build()?;
    Ok(client)
}

/// Fail on non-2xx and return the body as text.
pub(crate) async fn read_success_body(response: Response, what: &str) -> Result<String> {
    let status = response.status();
    if !status.is_success() {
        return Err(anyhow!("{} request failed: HTTP {}", what, status));
    }
    Ok(response.text().await?)
}

/// Best-effort numeric lookup: accepts JSON numbers and numeric strings
/// (NSE sends both, sometimes with thousands separators).
pub(crate) fn number_at(value: &Value, pointer: &str) -> Option<f64> {
    match value.pointer(pointer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', "").parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite())
}

/// Best-effort non-empty string lookup
pub(crate) fn text_at(value: &Value, pointer: &str) -> Option<String> {
    value
        .pointer(pointer)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty() && *s != "-")
        .map(str::to_string)
}
