//! Yahoo Finance providers
//!
//! Two endpoints on the same host:
//! - `/v10/finance/quoteSummary/{ticker}` (needs cookie + crumb), primary quote source
//! - `/v8/finance/chart/{ticker}`, secondary quote source and daily history

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use chrono_tz::Asia::Kolkata;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::Mutex;
use url::Url;

use super::{read_success_body, HistoryProvider, QuoteProvider};
use crate::models::{Exchange, PricePoint, Quote, TimeSeries};

// ==================== Yahoo endpoint constants ====================

/// Sets the session cookie the crumb endpoint checks
const YAHOO_COOKIE_URL: &str = "https://fc.yahoo.com";
const YAHOO_REFERER: &str = "https://finance.yahoo.com/";
/// quoteSummary modules covering price, valuation and fundamentals
const SUMMARY_MODULES: &str = "price,summaryDetail,financialData,defaultKeyStatistics";

fn yahoo_ticker(symbol: &str, exchange: Exchange) -> String {
    format!("{}{}", symbol, exchange.yahoo_suffix())
}

fn endpoint(base_url: &str, segments: &[&str]) -> Result<Url> {
    let mut url = Url::parse(base_url).with_context(|| format!("invalid base url {}", base_url))?;
    url.path_segments_mut()
        .map_err(|_| anyhow!("base url {} cannot carry a path", base_url))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

// ==================== quoteSummary ====================

/// Primary provider: Yahoo quoteSummary
pub struct YahooSummaryProvider {
    client: Client,
    base_url: String,
    crumb: Mutex<Option<String>>,
}

impl YahooSummaryProvider {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            crumb: Mutex::new(None),
        }
    }

    /// Cached crumb, fetched on first use
    async fn crumb(&self) -> Result<String> {
        let mut cached = self.crumb.lock().await;
        if let Some(crumb) = cached.as_ref() {
            return Ok(crumb.clone());
        }

        // The cookie host answers 404 but still sets the session cookie
        if let Err(e) = self
            .client
            .get(YAHOO_COOKIE_URL)
            .header("Referer", YAHOO_REFERER)
            .send()
            .await
        {
            log::debug!("yahoo cookie priming failed: {}", e);
        }

        let url = endpoint(&self.base_url, &["v1", "test", "getcrumb"])?;
        let response = self
            .client
            .get(url)
            .header("Referer", YAHOO_REFERER)
            .send()
            .await
            .context("crumb request failed")?;
        let body = read_success_body(response, "crumb").await?;
        let crumb = body.trim();

        if crumb.is_empty() || crumb.len() > 100 || crumb.contains(' ') || crumb.contains('<') {
            return Err(anyhow!("yahoo returned an unusable crumb"));
        }

        *cached = Some(crumb.to_string());
        Ok(crumb.to_string())
    }

    async fn invalidate_crumb(&self) {
        *self.crumb.lock().await = None;
    }
}

#[async_trait]
impl QuoteProvider for YahooSummaryProvider {
    fn id(&self) -> &'static str {
        "yahoo_summary"
    }

    async fn fetch_quote(&self, symbol: &str, exchange: Exchange) -> Result<Quote> {
        let ticker = yahoo_ticker(symbol, exchange);
        let crumb = self.crumb().await?;

        let mut url = endpoint(&self.base_url, &["v10", "finance", "quoteSummary", &ticker])?;
        url.query_pairs_mut()
            .append_pair("modules", SUMMARY_MODULES)
            .append_pair("crumb", &crumb);

        let response = self
            .client
            .get(url)
            .header("Referer", YAHOO_REFERER)
            .send()
            .await
            .context("quoteSummary request failed")?;

        if matches!(
            response.status(),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
        ) {
            self.invalidate_crumb().await;
        }

        let body = read_success_body(response, "quoteSummary").await?;
        parse_quote_summary(&body)
    }
}

#[derive(Debug, Deserialize)]
struct SummaryEnvelope {
    #[serde(rename = "quoteSummary")]
    quote_summary: SummaryBody,
}

#[derive(Debug, Deserialize)]
struct SummaryBody {
    #[serde(default)]
    result: Option<Vec<SummaryResult>>,
    #[serde(default)]
    error: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryResult {
    #[serde(default)]
    price: Option<PriceModule>,
    #[serde(default)]
    summary_detail: Option<SummaryDetailModule>,
    #[serde(default)]
    financial_data: Option<FinancialDataModule>,
    #[serde(default)]
    default_key_statistics: Option<KeyStatisticsModule>,
}

/// Yahoo wraps most numbers as `{"raw": 1.0, "fmt": "1.00"}`, or `{}` when absent.
#[derive(Debug, Default, Clone, Copy, Deserialize)]
struct RawValue {
    #[serde(default)]
    raw: Option<f64>,
}

fn raw(value: &Option<RawValue>) -> Option<f64> {
    value.and_then(|v| v.raw).filter(|v| v.is_finite())
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct PriceModule {
    long_name: Option<String>,
    short_name: Option<String>,
    regular_market_price: Option<RawValue>,
    regular_market_open: Option<RawValue>,
    regular_market_day_high: Option<RawValue>,
    regular_market_day_low: Option<RawValue>,
    regular_market_previous_close: Option<RawValue>,
    regular_market_volume: Option<RawValue>,
    market_cap: Option<RawValue>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct SummaryDetailModule {
    previous_close: Option<RawValue>,
    volume: Option<RawValue>,
    market_cap: Option<RawValue>,
    fifty_two_week_high: Option<RawValue>,
    fifty_two_week_low: Option<RawValue>,
    #[serde(rename = "trailingPE")]
    trailing_pe: Option<RawValue>,
    dividend_yield: Option<RawValue>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct FinancialDataModule {
    current_price: Option<RawValue>,
    total_revenue: Option<RawValue>,
    gross_profits: Option<RawValue>,
    operating_margins: Option<RawValue>,
    return_on_equity: Option<RawValue>,
    debt_to_equity: Option<RawValue>,
    current_ratio: Option<RawValue>,
}

/// Share count and EPS, used when the valuation fields above are missing
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct KeyStatisticsModule {
    shares_outstanding: Option<RawValue>,
    trailing_eps: Option<RawValue>,
}

fn describe_error(error: &Value) -> String {
    error
        .get("description")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| error.to_string())
}

fn parse_quote_summary(body: &str) -> Result<Quote> {
    let envelope: SummaryEnvelope =
        serde_json::from_str(body).context("malformed quoteSummary payload")?;

    if let Some(error) = envelope.quote_summary.error.as_ref().filter(|e| !e.is_null()) {
        return Err(anyhow!("quoteSummary error: {}", describe_error(error)));
    }

    let result = envelope
        .quote_summary
        .result
        .unwrap_or_default()
        .into_iter()
        .next()
        .ok_or_else(|| anyhow!("quoteSummary returned no result"))?;

    let price = result.price.unwrap_or_default();
    let detail = result.summary_detail.unwrap_or_default();
    let financial = result.financial_data.unwrap_or_default();
    let stats = result.default_key_statistics.unwrap_or_default();

    let last_price = raw(&price.regular_market_price).or(raw(&financial.current_price));
    let derived_market_cap = last_price
        .zip(raw(&stats.shares_outstanding))
        .map(|(price, shares)| price * shares);
    let derived_pe = last_price
        .zip(raw(&stats.trailing_eps).filter(|eps| *eps > 0.0))
        .map(|(price, eps)| price / eps);

    Ok(Quote {
        company_name: price.long_name.or(price.short_name),
        last_price,
        open: raw(&price.regular_market_open),
        day_high: raw(&price.regular_market_day_high),
        day_low: raw(&price.regular_market_day_low),
        previous_close: raw(&price.regular_market_previous_close).or(raw(&detail.previous_close)),
        volume: raw(&price.regular_market_volume).or(raw(&detail.volume)),
        market_cap: raw(&price.market_cap)
            .or(raw(&detail.market_cap))
            .or(derived_market_cap),
        fifty_two_week_high: raw(&detail.fifty_two_week_high),
        fifty_two_week_low: raw(&detail.fifty_two_week_low),
        trailing_pe: raw(&detail.trailing_pe).or(derived_pe),
        dividend_yield: raw(&detail.dividend_yield),
        total_revenue: raw(&financial.total_revenue),
        gross_profits: raw(&financial.gross_profits),
        operating_margins: raw(&financial.operating_margins),
        return_on_equity: raw(&financial.return_on_equity),
        debt_to_equity: raw(&financial.debt_to_equity),
        current_ratio: raw(&financial.current_ratio),
    })
}

// ==================== chart ====================

/// Secondary quote provider and history source: Yahoo chart endpoint
pub struct YahooChartProvider {
    client: Client,
    base_url: String,
}

impl YahooChartProvider {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    async fn chart(&self, ticker: &str, range: &str) -> Result<ChartResult> {
        let mut url = endpoint(&self.base_url, &["v8", "finance", "chart", ticker])?;
        url.query_pairs_mut()
            .append_pair("range", range)
            .append_pair("interval", "1d");

        let response = self
            .client
            .get(url)
            .header("Referer", YAHOO_REFERER)
            .send()
            .await
            .context("chart request failed")?;
        let body = read_success_body(response, "chart").await?;
        parse_chart(&body)
    }
}

#[async_trait]
impl QuoteProvider for YahooChartProvider {
    fn id(&self) -> &'static str {
        "yahoo_chart"
    }

    async fn fetch_quote(&self, symbol: &str, exchange: Exchange) -> Result<Quote> {
        let chart = self.chart(&yahoo_ticker(symbol, exchange), "1d").await?;
        Ok(quote_from_meta(&chart.meta))
    }
}

#[async_trait]
impl HistoryProvider for YahooChartProvider {
    async fn fetch_history(&self, symbol: &str, exchange: Exchange) -> Result<TimeSeries> {
        let chart = self.chart(&yahoo_ticker(symbol, exchange), "1y").await?;
        Ok(candles_from_chart(&chart))
    }
}

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
struct ChartResult {
    #[serde(default)]
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    #[serde(default)]
    indicators: ChartIndicators,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ChartMeta {
    long_name: Option<String>,
    short_name: Option<String>,
    regular_market_price: Option<f64>,
    chart_previous_close: Option<f64>,
    previous_close: Option<f64>,
    regular_market_day_high: Option<f64>,
    regular_market_day_low: Option<f64>,
    regular_market_volume: Option<f64>,
    fifty_two_week_high: Option<f64>,
    fifty_two_week_low: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<ChartQuote>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ChartQuote {
    open: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    close: Vec<Option<f64>>,
    volume: Vec<Option<f64>>,
}

fn parse_chart(body: &str) -> Result<ChartResult> {
    let envelope: ChartEnvelope = serde_json::from_str(body).context("malformed chart payload")?;

    if let Some(error) = envelope.chart.error.as_ref().filter(|e| !e.is_null()) {
        return Err(anyhow!("chart error: {}", describe_error(error)));
    }

    envelope
        .chart
        .result
        .unwrap_or_default()
        .into_iter()
        .next()
        .ok_or_else(|| anyhow!("chart returned no result"))
}

fn quote_from_meta(meta: &ChartMeta) -> Quote {
    Quote {
        company_name: meta.long_name.clone().or_else(|| meta.short_name.clone()),
        last_price: meta.regular_market_price,
        day_high: meta.regular_market_day_high,
        day_low: meta.regular_market_day_low,
        previous_close: meta.previous_close.or(meta.chart_previous_close),
        volume: meta.regular_market_volume,
        fifty_two_week_high: meta.fifty_two_week_high,
        fifty_two_week_low: meta.fifty_two_week_low,
        ..Quote::default()
    }
}

/// Trading date of a unix timestamp in India time
fn trading_date(timestamp: i64) -> Option<String> {
    Utc.timestamp_opt(timestamp, 0)
        .single()
        .map(|dt| dt.with_timezone(&Kolkata).format("%Y-%m-%d").to_string())
}

fn candles_from_chart(chart: &ChartResult) -> TimeSeries {
    let Some(quote) = chart.indicators.quote.first() else {
        return Vec::new();
    };
    let at = |series: &[Option<f64>], i: usize| series.get(i).copied().flatten();

    chart
        .timestamp
        .iter()
        .enumerate()
        .filter_map(|(i, ts)| {
            Some(PricePoint {
                date: trading_date(*ts)?,
                open: at(&quote.open, i)?,
                high: at(&quote.high, i)?,
                low: at(&quote.low, i)?,
                close: at(&quote.close, i)?,
                volume: at(&quote.volume, i).unwrap_or(0.0).max(0.0) as u64,
            })
        })
        .collect()
}
