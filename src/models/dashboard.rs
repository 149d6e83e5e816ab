//! Dashboard view models
//!
//! Render-ready description of the page. The front end draws the chart,
//! cards and table straight from these values.

use serde::{Deserialize, Serialize};

use super::layout::LayoutItem;
use super::stock::{Exchange, PricePoint};

/// How widgets are arranged on the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DashboardMode {
    /// Fixed top-to-bottom order
    #[default]
    Standard,
    /// Drag-and-drop grid driven by the session layout
    Grid,
}

/// Label/value pair shown on a metric card or table row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricRow {
    #[serde(rename = "Metric")]
    pub metric: String,
    #[serde(rename = "Value")]
    pub value: String,
}

impl MetricRow {
    pub fn new(metric: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            metric: metric.into(),
            value: value.into(),
        }
    }
}

/// Headline card with an optional change delta
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadlineMetric {
    pub label: String,
    pub value: String,
    pub delta: Option<String>,
}

/// Candlestick chart payload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandlestickChart {
    pub name: String,
    pub x_axis_title: String,
    pub y_axis_title: String,
    pub height: u32,
    pub candles: Vec<PricePoint>,
}

/// Content of a single widget
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WidgetContent {
    PriceChart(CandlestickChart),
    MarketMetrics { metrics: Vec<MetricRow> },
    FinancialInfo {
        rows: Vec<MetricRow>,
        csv_file_name: String,
        csv_url: String,
    },
}

/// A widget plus its grid position (grid mode only)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Widget {
    pub key: String,
    pub title: String,
    pub layout: Option<LayoutItem>,
    pub content: WidgetContent,
}

/// Whole page state for one request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DashboardView {
    /// No symbol entered yet
    Prompt {
        exchange: Exchange,
        message: String,
        placeholder: String,
    },
    /// Fetch failed for the chosen exchange
    Error {
        symbol: String,
        exchange: Exchange,
        message: String,
        detail: String,
    },
    Ready {
        /// Page heading
        title: String,
        symbol: String,
        exchange: Exchange,
        company: String,
        mode: DashboardMode,
        headline: Vec<HeadlineMetric>,
        /// Set when history is empty; widgets are then omitted
        warning: Option<String>,
        widgets: Vec<Widget>,
    },
}
