//! Stock data service
//!
//! Normalizes the request, consults the result cache, runs the provider
//! chain and the history fetch, and folds everything into a `StockResult`.

use std::sync::Arc;

use anyhow::Result;

use crate::config::AppConfig;
use crate::error::FetchError;
use crate::models::{normalize_symbol, Exchange, StockData, StockInfo, StockResult, TimeSeries};
use crate::services::cache::TtlCache;
use crate::services::metrics::change_percent;
use crate::services::providers::{
    build_http_client, HistoryProvider, NseWebsiteProvider, QuoteProvider, YahooChartProvider,
    YahooSummaryProvider,
};
use crate::services::quote_fetcher::{FetchedQuote, QuoteFetcher};

pub struct StockService {
    fetcher: QuoteFetcher,
    history: Arc<dyn HistoryProvider>,
    cache: TtlCache<StockData>,
}

impl StockService {
    pub fn new(
        fetcher: QuoteFetcher,
        history: Arc<dyn HistoryProvider>,
        cache: TtlCache<StockData>,
    ) -> Self {
        Self {
            fetcher,
            history,
            cache,
        }
    }

    /// Wire the production providers from configuration
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let client = build_http_client(config)?;
        let providers = &config.providers;
        let chart = Arc::new(YahooChartProvider::new(
            client.clone(),
            providers.yahoo_base_url.clone(),
        ));

        let chain: Vec<Arc<dyn QuoteProvider>> = vec![
            Arc::new(YahooSummaryProvider::new(
                client.clone(),
                providers.yahoo_base_url.clone(),
            )),
            chart.clone(),
            Arc::new(NseWebsiteProvider::new(client, providers.nse_base_url.clone())),
        ];
        let fetcher = QuoteFetcher::new(chain);
        log::info!("quote providers: {}", fetcher.provider_ids().join(" -> "));

        Ok(Self::new(fetcher, chart, TtlCache::new(config.cache_ttl())))
    }

    /// Resolve one symbol on one exchange; never fails, errors become
    /// `StockResult::Invalid`.
    pub async fn get_stock_data(&self, raw_symbol: &str, exchange: Exchange) -> StockResult {
        let symbol = normalize_symbol(raw_symbol);
        let key = format!("{}:{}", exchange, symbol);

        if let Some(data) = self.cache.get(&key).await {
            log::debug!("cache hit for {}", key);
            return StockResult::Valid(data);
        }

        match self.fetch_stock_data(&symbol, exchange).await {
            Ok(data) => {
                self.cache.put(key, data.clone()).await;
                StockResult::Valid(data)
            }
            Err(e) => {
                log::warn!("{} {}: {}", exchange, symbol, e);
                StockResult::invalid(format!("{} data error: {}", exchange, e))
            }
        }
    }

    async fn fetch_stock_data(&self, symbol: &str, exchange: Exchange) -> Result<StockData, FetchError> {
        if symbol.is_empty() {
            return Err(FetchError::InvalidSymbol);
        }

        let fetched = self.fetcher.fetch(symbol, exchange).await?;
        // A missing chart degrades to the no-history warning, the quote still stands
        let history = match self.history.fetch_history(symbol, exchange).await {
            Ok(history) => history,
            Err(e) => {
                let err = FetchError::History {
                    symbol: symbol.to_string(),
                    reason: format!("{:#}", e),
                };
                log::warn!("{} {}: {}", exchange, symbol, err);
                TimeSeries::new()
            }
        };

        log::info!(
            "{} {}: quote from {}, {} candle(s)",
            exchange,
            symbol,
            fetched.provider,
            history.len()
        );
        if !fetched.skipped.is_empty() {
            log::debug!("{} {}: skipped {}", exchange, symbol, fetched.skipped.join("; "));
        }

        Ok(StockData {
            info: build_info(symbol, exchange, fetched),
            history,
            exchange,
        })
    }
}

fn build_info(symbol: &str, exchange: Exchange, fetched: FetchedQuote) -> StockInfo {
    let quote = fetched.quote;
    let name = quote
        .company_name
        .clone()
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| symbol.to_string());

    StockInfo {
        symbol: symbol.to_string(),
        name,
        exchange,
        source: fetched.provider.to_string(),
        change_percent: change_percent(quote.last_price, quote.previous_close),
        quote,
    }
}
