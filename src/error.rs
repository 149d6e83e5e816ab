//! Error types
//!
//! Provider internals use `anyhow`; these are the errors that cross the
//! service boundary.

use thiserror::Error;

use crate::models::Exchange;

/// Failure while resolving a stock request
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("symbol must not be empty")]
    InvalidSymbol,

    /// A single provider failed; swallowed by the fallback chain
    #[error("provider {provider} unavailable: {reason}")]
    ProviderUnavailable { provider: String, reason: String },

    #[error("unable to fetch data for {symbol} on {exchange}: {}", .attempts.join("; "))]
    AllProvidersExhausted {
        exchange: Exchange,
        symbol: String,
        attempts: Vec<String>,
    },

    #[error("history unavailable for {symbol}: {reason}")]
    History { symbol: String, reason: String },

    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl FetchError {
    pub fn provider(provider: &str, err: anyhow::Error) -> Self {
        Self::ProviderUnavailable {
            provider: provider.to_string(),
            reason: format!("{:#}", err),
        }
    }
}

/// Rejected layout update
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error("layout must contain at least one item")]
    Empty,

    #[error("layout item key must not be empty")]
    EmptyKey,

    #[error("duplicate layout key '{0}'")]
    DuplicateKey(String),

    #[error("layout item '{0}' must have a positive width and height")]
    ZeroSize(String),

    #[error("layout item '{key}' overflows the {columns}-column grid")]
    OutOfBounds { key: String, columns: u32 },
}
