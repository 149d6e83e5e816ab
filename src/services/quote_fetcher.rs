//! Provider fallback chain
//!
//! Providers are tried in priority order; the first one returning a
//! non-empty quote wins wholesale. Individual failures are logged and
//! swallowed, only exhausting the chain is an error.

use std::sync::Arc;

use crate::error::FetchError;
use crate::models::{Exchange, Quote};
use crate::services::providers::QuoteProvider;

/// Quote plus the provider that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedQuote {
    pub quote: Quote,
    pub provider: &'static str,
    /// Failures swallowed before the winning provider answered
    pub skipped: Vec<String>,
}

pub struct QuoteFetcher {
    providers: Vec<Arc<dyn QuoteProvider>>,
}

impl QuoteFetcher {
    pub fn new(providers: Vec<Arc<dyn QuoteProvider>>) -> Self {
        Self { providers }
    }

    pub fn provider_ids(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.id()).collect()
    }

    pub async fn fetch(&self, symbol: &str, exchange: Exchange) -> Result<FetchedQuote, FetchError> {
        let mut attempts = Vec::new();

        for provider in &self.providers {
            if !provider.supports(exchange) {
                log::debug!("{} does not cover {}, skipping", provider.id(), exchange);
                continue;
            }

            match provider.fetch_quote(symbol, exchange).await {
                Ok(quote) if quote.is_empty() => {
                    let err = FetchError::ProviderUnavailable {
                        provider: provider.id().to_string(),
                        reason: "empty quote payload".to_string(),
                    };
                    log::warn!("{} {}: {}", exchange, symbol, err);
                    attempts.push(err.to_string());
                }
                Ok(quote) => {
                    if !attempts.is_empty() {
                        log::info!(
                            "{} {} served by {} after {} failed attempt(s)",
                            exchange,
                            symbol,
                            provider.id(),
                            attempts.len()
                        );
                    }
                    return Ok(FetchedQuote {
                        quote,
                        provider: provider.id(),
                        skipped: attempts,
                    });
                }
                Err(e) => {
                    let err = FetchError::provider(provider.id(), e);
                    log::warn!("{} {}: {}", exchange, symbol, err);
                    attempts.push(err.to_string());
                }
            }
        }

        if attempts.is_empty() {
            attempts.push(format!("no provider covers {}", exchange));
        }

        Err(FetchError::AllProvidersExhausted {
            exchange,
            symbol: symbol.to_string(),
            attempts,
        })
    }
}
