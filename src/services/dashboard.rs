//! Dashboard view assembly
//!
//! Turns a `StockResult` into the page description. The layout is passed
//! in explicitly so the whole thing stays a pure function.

use crate::models::{
    default_layout, CandlestickChart, DashboardMode, DashboardView, Exchange, LayoutItem,
    StockData, StockResult, Widget, WidgetContent, FINANCIAL_INFO, MARKET_METRICS, PRICE_CHART,
};
use crate::services::export::csv_file_name;
use crate::services::metrics::{financial_metrics, headline_metrics, market_metrics};

const PAGE_TITLE: &str = "Indian Stock Market Analytics";
const PROMPT_MESSAGE: &str = "Enter a stock symbol above to get started!";
const NO_HISTORY_WARNING: &str = "Historical data is not available for this stock.";

/// Landing state before a symbol is entered
pub fn prompt(exchange: Exchange) -> DashboardView {
    DashboardView::Prompt {
        exchange,
        message: PROMPT_MESSAGE.to_string(),
        placeholder: exchange.placeholder().to_string(),
    }
}

pub fn build_dashboard(
    symbol: &str,
    exchange: Exchange,
    mode: DashboardMode,
    result: &StockResult,
    layout: &[LayoutItem],
) -> DashboardView {
    match result {
        StockResult::Invalid { error } => DashboardView::Error {
            symbol: symbol.to_string(),
            exchange,
            message: format!(
                "Error fetching data for {}. Please check the symbol and try again.",
                symbol
            ),
            detail: error.clone(),
        },
        StockResult::Valid(data) => ready_view(data, mode, layout),
    }
}

fn ready_view(data: &StockData, mode: DashboardMode, layout: &[LayoutItem]) -> DashboardView {
    let info = &data.info;
    let (warning, widgets) = if data.history.is_empty() {
        (Some(NO_HISTORY_WARNING.to_string()), Vec::new())
    } else {
        (None, widgets(data, mode, layout))
    };

    DashboardView::Ready {
        title: PAGE_TITLE.to_string(),
        symbol: info.symbol.clone(),
        exchange: data.exchange,
        company: info.name.clone(),
        mode,
        headline: headline_metrics(info),
        warning,
        widgets,
    }
}

/// Layout entry for `key`; sessions that dropped a widget get its default slot
fn slot(layout: &[LayoutItem], key: &str) -> Option<LayoutItem> {
    layout
        .iter()
        .find(|item| item.key == key)
        .cloned()
        .or_else(|| default_layout().into_iter().find(|item| item.key == key))
}

fn widgets(data: &StockData, mode: DashboardMode, layout: &[LayoutItem]) -> Vec<Widget> {
    let info = &data.info;
    let contents = [
        (
            PRICE_CHART,
            WidgetContent::PriceChart(CandlestickChart {
                name: "Price".to_string(),
                x_axis_title: "Date".to_string(),
                y_axis_title: "Price (₹)".to_string(),
                height: 500,
                candles: data.history.clone(),
            }),
        ),
        (
            MARKET_METRICS,
            WidgetContent::MarketMetrics {
                metrics: market_metrics(info),
            },
        ),
        (
            FINANCIAL_INFO,
            WidgetContent::FinancialInfo {
                rows: financial_metrics(info),
                csv_file_name: csv_file_name(&info.symbol),
                csv_url: format!(
                    "/api/v1/stocks/{}/{}/financials.csv",
                    data.exchange, info.symbol
                ),
            },
        ),
    ];

    contents
        .into_iter()
        .map(|(key, content)| {
            let placed = match mode {
                DashboardMode::Grid => slot(layout, key),
                DashboardMode::Standard => None,
            };
            let title = slot(layout, key)
                .map(|item| item.title)
                .unwrap_or_else(|| key.to_string());
            Widget {
                key: key.to_string(),
                title,
                layout: placed,
                content,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MetricRow, Quote, StockInfo};
    use crate::services::stock_service::tests::candles;

    fn data(history_len: usize) -> StockData {
        let mut history = candles();
        history.truncate(history_len);
        StockData {
            info: StockInfo {
                symbol: "RELIANCE".to_string(),
                name: "Reliance Industries Limited".to_string(),
                exchange: Exchange::Nse,
                source: "yahoo_summary".to_string(),
                change_percent: Some(1.74),
                quote: Quote {
                    last_price: Some(2950.5),
                    previous_close: Some(2900.0),
                    ..Quote::default()
                },
            },
            history,
            exchange: Exchange::Nse,
        }
    }

    #[test]
    fn prompt_uses_exchange_placeholder() {
        match prompt(Exchange::Bse) {
            DashboardView::Prompt { placeholder, message, .. } => {
                assert_eq!(placeholder, "TATAMOTORS");
                assert_eq!(message, PROMPT_MESSAGE);
            }
            other => panic!("unexpected view {:?}", other),
        }
    }

    #[test]
    fn invalid_result_becomes_error_banner() {
        let result = StockResult::invalid("NSE data error: boom");
        let view = build_dashboard("XYZ", Exchange::Nse, DashboardMode::Standard, &result, &[]);
        match view {
            DashboardView::Error { message, detail, .. } => {
                assert_eq!(
                    message,
                    "Error fetching data for XYZ. Please check the symbol and try again."
                );
                assert_eq!(detail, "NSE data error: boom");
            }
            other => panic!("unexpected view {:?}", other),
        }
    }

    #[test]
    fn standard_mode_has_fixed_widgets_without_positions() {
        let result = StockResult::Valid(data(1));
        let view = build_dashboard(
            "RELIANCE",
            Exchange::Nse,
            DashboardMode::Standard,
            &result,
            &default_layout(),
        );
        let DashboardView::Ready { title, widgets, warning, headline, company, .. } = view else {
            panic!("expected ready view");
        };
        assert_eq!(title, PAGE_TITLE);
        assert!(warning.is_none());
        assert_eq!(company, "Reliance Industries Limited");
        assert_eq!(headline[0].delta.as_deref(), Some("1.74%"));
        let keys: Vec<&str> = widgets.iter().map(|w| w.key.as_str()).collect();
        assert_eq!(keys, [PRICE_CHART, MARKET_METRICS, FINANCIAL_INFO]);
        assert!(widgets.iter().all(|w| w.layout.is_none()));

        match &widgets[2].content {
            WidgetContent::FinancialInfo { rows, csv_file_name, csv_url } => {
                assert_eq!(rows.len(), 6);
                assert_eq!(rows[0], MetricRow::new("Revenue", "N/A"));
                assert_eq!(csv_file_name, "RELIANCE_financial_data.csv");
                assert_eq!(csv_url, "/api/v1/stocks/NSE/RELIANCE/financials.csv");
            }
            other => panic!("unexpected content {:?}", other),
        }
    }

    #[test]
    fn grid_mode_places_widgets_from_session_layout() {
        let mut layout = default_layout();
        layout[1].x = 6;
        layout[1].title = "Metrics".to_string();
        layout.remove(2);

        let result = StockResult::Valid(data(1));
        let view = build_dashboard("RELIANCE", Exchange::Nse, DashboardMode::Grid, &result, &layout);
        let DashboardView::Ready { widgets, .. } = view else {
            panic!("expected ready view");
        };
        assert_eq!(widgets[1].layout.as_ref().map(|l| l.x), Some(6));
        assert_eq!(widgets[1].title, "Metrics");
        assert_eq!(widgets[2].layout, slot(&default_layout(), FINANCIAL_INFO));
        assert_eq!(widgets[2].title, "Financial Information");
    }

    #[test]
    fn empty_history_shows_warning_instead_of_widgets() {
        let result = StockResult::Valid(data(0));
        let view = build_dashboard("RELIANCE", Exchange::Nse, DashboardMode::Grid, &result, &[]);
        let DashboardView::Ready { widgets, warning, headline, .. } = view else {
            panic!("expected ready view");
        };
        assert_eq!(warning.as_deref(), Some(NO_HISTORY_WARNING));
        assert!(widgets.is_empty());
        assert_eq!(headline.len(), 3);
    }
}
