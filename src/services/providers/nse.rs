//! NSE India website scrape
//!
//! Last resort: the JSON endpoint behind the nseindia.com quote page,
//! `GET /api/quote-equity?symbol=<SYMBOL>`. Fields are looked up
//! best-effort since the payload shape shifts between releases.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use super::{number_at, read_success_body, text_at, QuoteProvider};
use crate::models::{Exchange, Quote};

/// Tertiary provider, NSE listings only
pub struct NseWebsiteProvider {
    client: Client,
    base_url: String,
}

impl NseWebsiteProvider {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl QuoteProvider for NseWebsiteProvider {
    fn id(&self) -> &'static str {
        "nse_website"
    }

    fn supports(&self, exchange: Exchange) -> bool {
        exchange == Exchange::Nse
    }

    async fn fetch_quote(&self, symbol: &str, _exchange: Exchange) -> Result<Quote> {
        let payload = self.quote_equity(symbol, None).await?;
        let mut quote = parse_quote_equity(&payload);
        if quote.is_empty() {
            return Ok(quote);
        }

        // Day volume only comes with the trade_info section
        match self.quote_equity(symbol, Some("trade_info")).await {
            Ok(trade_info) => quote.volume = traded_volume(&trade_info),
            Err(e) => log::debug!("nse trade_info for {} unavailable: {:#}", symbol, e),
        }
        Ok(quote)
    }
}

impl NseWebsiteProvider {
    async fn quote_equity(&self, symbol: &str, section: Option<&str>) -> Result<Value> {
        let url = format!("{}/api/quote-equity", self.base_url);
        let mut request = self.client.get(&url).query(&[("symbol", symbol)]);
        if let Some(section) = section {
            request = request.query(&[("section", section)]);
        }

        let response = request
            .header("Accept", "application/json, text/plain, */*")
            .header("Accept-Language", "en-US,en;q=0.9")
            .header("Referer", format!("{}/get-quotes/equity?symbol={}", self.base_url, symbol))
            .send()
            .await
            .context("quote-equity request failed")?;

        let body = read_success_body(response, "quote-equity").await?;
        serde_json::from_str(&body).context("quote-equity returned non-JSON body")
    }
}

/// Shares traded today from the trade_info section
fn traded_volume(trade_info: &Value) -> Option<f64> {
    number_at(trade_info, "/securityWiseDP/quantityTraded")
        .or_else(|| number_at(trade_info, "/marketDeptOrderBook/tradeInfo/totalTradedVolume"))
}

/// Map the quote-equity payload; missing sections simply leave fields empty.
fn parse_quote_equity(payload: &Value) -> Quote {
    let last_price = number_at(payload, "/priceInfo/lastPrice");
    let issued_size = number_at(payload, "/securityInfo/issuedSize");

    Quote {
        company_name: text_at(payload, "/info/companyName"),
        last_price,
        open: number_at(payload, "/priceInfo/open"),
        day_high: number_at(payload, "/priceInfo/intraDayHighLow/max"),
        day_low: number_at(payload, "/priceInfo/intraDayHighLow/min"),
        previous_close: number_at(payload, "/priceInfo/previousClose"),
        market_cap: last_price.zip(issued_size).map(|(price, shares)| price * shares),
        fifty_two_week_high: number_at(payload, "/priceInfo/weekHighLow/max"),
        fifty_two_week_low: number_at(payload, "/priceInfo/weekHighLow/min"),
        trailing_pe: number_at(payload, "/metadata/pdSymbolPe"),
        ..Quote::default()
    }
}
