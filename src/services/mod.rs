//! Business logic services
//!
//! Data fetching, derivation and per-session state

pub mod cache;          // time-windowed result cache
pub mod dashboard;      // page assembly
pub mod export;         // CSV export
pub mod layout_store;   // per-session grid layout
pub mod metrics;        // display metric formatting
pub mod providers;      // upstream data providers
pub mod quote_fetcher;  // provider fallback chain
pub mod stock_service;  // stock data service

use layout_store::LayoutStore;
use stock_service::StockService;

/// Shared application state handed to every handler
pub struct AppState {
    pub stocks: StockService,
    pub layouts: LayoutStore,
}

impl AppState {
    pub fn new(stocks: StockService) -> Self {
        Self {
            stocks,
            layouts: LayoutStore::new(),
        }
    }
}
