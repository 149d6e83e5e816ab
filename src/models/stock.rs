//! Stock data models
//!
//! Exchange selector, provider quote snapshot, daily history and the
//! two-variant fetch outcome served to the dashboard.

use std::fmt;
use std::str::FromStr;

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

/// Indian exchange the user picked in the selector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Exchange {
    #[default]
    Nse,
    Bse,
}

impl Exchange {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Nse => "NSE",
            Self::Bse => "BSE",
        }
    }

    /// Ticker suffix Yahoo Finance uses for this exchange
    pub fn yahoo_suffix(self) -> &'static str {
        match self {
            Self::Nse => ".NS",
            Self::Bse => ".BO",
        }
    }

    /// Example symbol shown in the empty input box
    pub fn placeholder(self) -> &'static str {
        match self {
            Self::Nse => "RELIANCE",
            Self::Bse => "TATAMOTORS",
        }
    }
}

impl fmt::Display for Exchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Exchange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NSE" => Ok(Self::Nse),
            "BSE" => Ok(Self::Bse),
            other => Err(format!("unsupported exchange '{}', expected NSE or BSE", other)),
        }
    }
}

/// Uppercase the user input and drop any `.NS` / `.BO` suffix.
pub fn normalize_symbol(raw: &str) -> String {
    let mut symbol = raw.trim().to_uppercase();
    loop {
        let stripped = symbol
            .strip_suffix(".NS")
            .or_else(|| symbol.strip_suffix(".BO"))
            .map(str::to_string);
        match stripped {
            Some(s) => symbol = s,
            None => return symbol,
        }
    }
}

/// Point-in-time quote snapshot
///
/// Every field is optional: each provider fills what it knows and the
/// derivation layer renders the gaps as "N/A".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub company_name: Option<String>,
    pub last_price: Option<f64>,
    pub open: Option<f64>,
    pub day_high: Option<f64>,
    pub day_low: Option<f64>,
    pub previous_close: Option<f64>,
    pub volume: Option<f64>,
    pub market_cap: Option<f64>,
    pub fifty_two_week_high: Option<f64>,
    pub fifty_two_week_low: Option<f64>,
    pub trailing_pe: Option<f64>,
    pub dividend_yield: Option<f64>,
    pub total_revenue: Option<f64>,
    pub gross_profits: Option<f64>,
    pub operating_margins: Option<f64>,
    pub return_on_equity: Option<f64>,
    pub debt_to_equity: Option<f64>,
    pub current_ratio: Option<f64>,
}

impl Quote {
    /// True when the provider answered but carried no usable field.
    pub fn is_empty(&self) -> bool {
        self.company_name.as_deref().map_or(true, |n| n.trim().is_empty())
            && [
                self.last_price,
                self.open,
                self.day_high,
                self.day_low,
                self.previous_close,
                self.volume,
                self.market_cap,
                self.fifty_two_week_high,
                self.fifty_two_week_low,
                self.trailing_pe,
                self.dividend_yield,
                self.total_revenue,
                self.gross_profits,
                self.operating_margins,
                self.return_on_equity,
                self.debt_to_equity,
                self.current_ratio,
            ]
            .iter()
            .all(Option::is_none)
    }
}

/// Display info built from the winning provider's quote
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockInfo {
    /// Normalized ticker symbol
    pub symbol: String,
    /// Company long name, falls back to the symbol
    pub name: String,
    pub exchange: Exchange,
    /// Provider that answered the quote request
    pub source: String,
    /// Day change against previous close, in percent
    pub change_percent: Option<f64>,
    #[serde(flatten)]
    pub quote: Quote,
}

/// One daily OHLCV candle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Trading date (YYYY-MM-DD, India time)
    pub date: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Trailing year of daily candles, oldest first
pub type TimeSeries = Vec<PricePoint>;

/// Payload of a successful fetch
#[derive(Debug, Clone, PartialEq)]
pub struct StockData {
    pub info: StockInfo,
    pub history: TimeSeries,
    pub exchange: Exchange,
}

/// Outcome of a stock data request
///
/// Serialized as `{"valid": true, "info", "history", "exchange"}` or
/// `{"valid": false, "error"}`.
#[derive(Debug, Clone, PartialEq)]
pub enum StockResult {
    Valid(StockData),
    Invalid { error: String },
}

impl StockResult {
    pub fn invalid(error: impl Into<String>) -> Self {
        let error = error.into();
        let error = if error.trim().is_empty() {
            "unknown error".to_string()
        } else {
            error
        };
        Self::Invalid { error }
    }

    #[cfg(test)]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Valid(_) => None,
            Self::Invalid { error } => Some(error),
        }
    }
}

impl Serialize for StockResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Valid(data) => {
                let mut state = serializer.serialize_struct("StockResult", 4)?;
                state.serialize_field("valid", &true)?;
                state.serialize_field("info", &data.info)?;
                state.serialize_field("history", &data.history)?;
                state.serialize_field("exchange", &data.exchange)?;
                state.end()
            }
            Self::Invalid { error } => {
                let mut state = serializer.serialize_struct("StockResult", 2)?;
                state.serialize_field("valid", &false)?;
                state.serialize_field("error", error)?;
                state.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exchange_parses_case_insensitively() {
        assert_eq!("nse".parse::<Exchange>(), Ok(Exchange::Nse));
        assert_eq!(" BSE ".parse::<Exchange>(), Ok(Exchange::Bse));
        assert!("NYSE".parse::<Exchange>().is_err());
    }

    #[test]
    fn exchange_defaults_to_nse() {
        assert_eq!(Exchange::default(), Exchange::Nse);
        assert_eq!(Exchange::default().placeholder(), "RELIANCE");
    }

    #[test]
    fn normalize_symbol_strips_exchange_suffixes() {
        assert_eq!(normalize_symbol(" reliance.ns "), "RELIANCE");
        assert_eq!(normalize_symbol("tatamotors.bo"), "TATAMOTORS");
        assert_eq!(normalize_symbol("INFY"), "INFY");
        assert_eq!(normalize_symbol(""), "");
    }

    #[test]
    fn empty_quote_detection() {
        assert!(Quote::default().is_empty());
        let named_only = Quote {
            company_name: Some("  ".to_string()),
            ..Quote::default()
        };
        assert!(named_only.is_empty());
        let priced = Quote {
            last_price: Some(10.0),
            ..Quote::default()
        };
        assert!(!priced.is_empty());
    }

    #[test]
    fn invalid_result_serializes_without_payload() {
        let value = serde_json::to_value(StockResult::invalid("boom")).unwrap();
        assert_eq!(value["valid"], false);
        assert_eq!(value["error"], "boom");
        assert!(value.get("info").is_none());
        assert!(value.get("history").is_none());
    }

    #[test]
    fn invalid_result_never_carries_empty_error() {
        let result = StockResult::invalid("   ");
        assert!(!result.is_valid());
        assert!(!result.error().unwrap().is_empty());
    }

    #[test]
    fn valid_result_serializes_without_error() {
        let info = StockInfo {
            symbol: "INFY".to_string(),
            name: "Infosys Limited".to_string(),
            exchange: Exchange::Nse,
            source: "yahoo_summary".to_string(),
            change_percent: Some(1.0),
            quote: Quote {
                last_price: Some(101.0),
                ..Quote::default()
            },
        };
        let result = StockResult::Valid(StockData {
            info,
            history: Vec::new(),
            exchange: Exchange::Nse,
        });
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["valid"], true);
        assert_eq!(value["exchange"], "NSE");
        assert_eq!(value["info"]["last_price"], 101.0);
        assert!(value.get("error").is_none());
        assert!(result.error().is_none());
    }
}
