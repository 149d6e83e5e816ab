//! Indian stock dashboard backend
//!
//! Serves NSE/BSE quotes, one year of daily history, derived metrics,
//! dashboard layouts and CSV exports over a RESTful API.
//! Data sources: Yahoo Finance, falling back to the NSE website.

mod config;     // configuration file and env overrides
mod error;      // error taxonomy
mod handlers;   // HTTP request handlers
mod middleware; // middleware
mod models;     // data models
mod services;   // business logic

use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;

use crate::config::AppConfig;
use crate::middleware::ApiKeyMiddleware;
use crate::services::stock_service::StockService;
use crate::services::AppState;

/// Application entry point
///
/// Loads the configuration, builds the provider chain and starts the HTTP server.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let (config, origin) = AppConfig::load();
    let config = config.with_env_overrides();

    // RUST_LOG overrides the configured level
    env_logger::init_from_env(Env::default().default_filter_or(config.log_level().as_str()));
    origin.log();

    if config.api.api_key.is_empty() {
        log::warn!("API_KEY is not set, authentication is disabled");
    }

    let stocks = StockService::from_config(&config).map_err(|e| {
        log::error!("failed to initialise stock service: {:#}", e);
        std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
    })?;
    let state = web::Data::new(AppState::new(stocks));

    let bind_addr = config.bind_addr();
    let api_key = config.api.api_key.clone();
    log::info!("starting stock dashboard service on {}", bind_addr);

    let mut server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(ApiKeyMiddleware::new(api_key.clone()))
            .app_data(state.clone())
            .configure(handlers::config)
    });
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server.bind(bind_addr)?.run().await
}
