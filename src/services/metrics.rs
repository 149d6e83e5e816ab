//! Display metric derivation
//!
//! Pure formatting over `StockInfo`. Missing inputs render as "N/A"
//! instead of failing.

use crate::models::{HeadlineMetric, MetricRow, StockInfo};

pub const NOT_AVAILABLE: &str = "N/A";

const MAGNITUDE_SUFFIXES: [&str; 5] = ["", "K", "M", "B", "T"];

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

fn non_zero(value: Option<f64>) -> Option<f64> {
    finite(value).filter(|v| *v != 0.0)
}

/// Day change in percent; `None` without both prices or when the
/// previous close is zero.
pub fn change_percent(last: Option<f64>, previous_close: Option<f64>) -> Option<f64> {
    let last = finite(last)?;
    let previous = non_zero(previous_close)?;
    Some((last - previous) / previous * 100.0)
}

/// 1500 -> "1.50K", 2_500_000 -> "2.50M"
pub fn format_large_number(value: Option<f64>) -> String {
    let Some(mut num) = finite(value) else {
        return NOT_AVAILABLE.to_string();
    };
    let mut magnitude = 0;
    while num.abs() >= 1000.0 && magnitude < MAGNITUDE_SUFFIXES.len() - 1 {
        magnitude += 1;
        num /= 1000.0;
    }
    format!("{:.2}{}", num, MAGNITUDE_SUFFIXES[magnitude])
}

/// Fraction as percent: 0.1234 -> "12.34%"
pub fn format_percent(value: Option<f64>) -> String {
    non_zero(value)
        .map(|v| format!("{:.2}%", v * 100.0))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

pub fn format_ratio(value: Option<f64>) -> String {
    non_zero(value)
        .map(|v| format!("{:.2}", v))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

pub fn format_price(value: Option<f64>) -> String {
    finite(value)
        .map(|v| format!("₹{:.2}", v))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Integer part with thousands separators: 1234567.8 -> "1,234,567"
pub fn format_number(value: Option<f64>) -> String {
    let Some(num) = finite(value) else {
        return NOT_AVAILABLE.to_string();
    };
    let digits = (num.trunc() as i64).unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if num <= -1.0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

pub fn format_change(change: Option<f64>) -> Option<String> {
    finite(change).map(|v| format!("{:.2}%", v))
}

/// Current price, previous close and volume cards
pub fn headline_metrics(info: &StockInfo) -> Vec<HeadlineMetric> {
    vec![
        HeadlineMetric {
            label: "Current Price".to_string(),
            value: format_price(info.quote.last_price),
            delta: format_change(info.change_percent),
        },
        HeadlineMetric {
            label: "Previous Close".to_string(),
            value: format_price(info.quote.previous_close),
            delta: None,
        },
        HeadlineMetric {
            label: "Today's Volume".to_string(),
            value: format_number(info.quote.volume),
            delta: None,
        },
    ]
}

/// The six market metric cards, in display order
pub fn market_metrics(info: &StockInfo) -> Vec<MetricRow> {
    let quote = &info.quote;
    vec![
        MetricRow::new("Market Cap", format_large_number(quote.market_cap)),
        MetricRow::new("PE Ratio", format_ratio(quote.trailing_pe)),
        MetricRow::new("Dividend Yield", format_percent(quote.dividend_yield)),
        MetricRow::new("52 Week High", format_price(quote.fifty_two_week_high)),
        MetricRow::new("52 Week Low", format_price(quote.fifty_two_week_low)),
        MetricRow::new("Volume", format_large_number(quote.volume)),
    ]
}

/// The six financial health rows, in table order
pub fn financial_metrics(info: &StockInfo) -> Vec<MetricRow> {
    let quote = &info.quote;
    vec![
        MetricRow::new("Revenue", format_large_number(quote.total_revenue)),
        MetricRow::new("Gross Profit", format_large_number(quote.gross_profits)),
        MetricRow::new("Operating Margin", format_percent(quote.operating_margins)),
        MetricRow::new("Return on Equity", format_percent(quote.return_on_equity)),
        MetricRow::new("Debt to Equity", format_ratio(quote.debt_to_equity)),
        MetricRow::new("Current Ratio", format_ratio(quote.current_ratio)),
    ]
}
