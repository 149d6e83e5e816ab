//! Dashboard grid layout model

use serde::{Deserialize, Serialize};

/// Number of columns in the drag-and-drop grid
pub const GRID_COLUMNS: u32 = 12;

/// Position and size of one widget in the grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutItem {
    /// Widget key (price_chart, market_metrics, financial_info)
    pub key: String,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub title: String,
}

impl LayoutItem {
    fn new(key: &str, x: u32, y: u32, width: u32, height: u32, title: &str) -> Self {
        Self {
            key: key.to_string(),
            x,
            y,
            width,
            height,
            title: title.to_string(),
        }
    }
}

pub const PRICE_CHART: &str = "price_chart";
pub const MARKET_METRICS: &str = "market_metrics";
pub const FINANCIAL_INFO: &str = "financial_info";

/// Arrangement a new session starts with
pub fn default_layout() -> Vec<LayoutItem> {
    vec![
        LayoutItem::new(PRICE_CHART, 0, 0, 12, 3, "Stock Price Chart"),
        LayoutItem::new(MARKET_METRICS, 0, 3, 6, 2, "Market Metrics"),
        LayoutItem::new(FINANCIAL_INFO, 6, 3, 6, 2, "Financial Information"),
    ]
}
