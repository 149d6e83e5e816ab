//! Configuration module
//!
//! Loads system configuration from a JSON file

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    #[serde(default = "default_host")]
    pub host: String,
    /// Listen port
    #[serde(default = "default_port")]
    pub port: u16,
    /// Worker threads (0 means one per CPU core)
    #[serde(default)]
    pub workers: usize,
}

/// API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API key (authentication disabled when empty)
    #[serde(default)]
    pub api_key: String,
    /// Upstream request timeout (seconds)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Upstream connect timeout (seconds)
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Result cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// How long a fetched stock result stays fresh (seconds, 0 disables)
    #[serde(default = "default_cache_ttl")]
    pub ttl_secs: u64,
}

/// Upstream data provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// User-Agent sent to every provider
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Yahoo Finance query host
    #[serde(default = "default_yahoo_base_url")]
    pub yahoo_base_url: String,
    /// NSE India website
    #[serde(default = "default_nse_base_url")]
    pub nse_base_url: String,
}

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub providers: ProviderConfig,
}

// Defaults
fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }
fn default_timeout() -> u64 { 30 }
fn default_connect_timeout() -> u64 { 10 }
fn default_log_level() -> String { "info".to_string() }
fn default_cache_ttl() -> u64 { 300 }
fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36".to_string()
}
fn default_yahoo_base_url() -> String { "https://query2.finance.yahoo.com".to_string() }
fn default_nse_base_url() -> String { "https://www.nseindia.com".to_string() }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: 0,
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_cache_ttl(),
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            yahoo_base_url: default_yahoo_base_url(),
            nse_base_url: default_nse_base_url(),
        }
    }
}

/// Where `AppConfig::load` found its values
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOrigin {
    File(&'static str),
    /// The file exists but could not be parsed; defaults are used
    Rejected { path: &'static str, reason: String },
    Defaults,
}

impl ConfigOrigin {
    /// Report the origin once logging is up
    pub fn log(&self) {
        match self {
            Self::File(path) => log::info!("loaded configuration from {}", path),
            Self::Rejected { path, reason } => {
                log::warn!("failed to load configuration file {}: {}, using defaults", path, reason)
            }
            Self::Defaults => log::info!("using default configuration"),
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration, preferring a file and falling back to defaults
    ///
    /// Runs before the logger exists, so where the values came from is
    /// returned rather than logged.
    pub fn load() -> (Self, ConfigOrigin) {
        let config_paths = ["config.json", "config/config.json"];
        let mut origin = ConfigOrigin::Defaults;

        for path in config_paths {
            if Path::new(path).exists() {
                match Self::from_file(path) {
                    Ok(config) => return (config, ConfigOrigin::File(path)),
                    Err(e) => {
                        origin = ConfigOrigin::Rejected {
                            path,
                            reason: format!("{:#}", e),
                        };
                    }
                }
            }
        }

        (Self::default(), origin)
    }

    /// Apply environment overrides (API_KEY)
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(key) = std::env::var("API_KEY") {
            self.api.api_key = key;
        }
        self
    }

    /// Server bind address
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.api.connect_timeout_secs)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache.ttl_secs)
    }

    /// Configured log level; unknown names fall back to info
    pub fn log_level(&self) -> log::LevelFilter {
        self.log.level.parse().unwrap_or(log::LevelFilter::Info)
    }
}
