//! Quote domain: latest price snapshot for a single stock.

#[cfg(feature = "http")]
pub mod client;
mod convert;
pub mod wire;

use crate::query::QueryKey;
use crate::shared::{PriceDirection, StockCode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Latest quote for one stock. Prices are whole won.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StockQuote {
    pub code: StockCode,
    pub name: String,
    pub current_price: i64,
    pub change_price: i64,
    /// Percent change versus the previous close.
    pub change_rate: f64,
    pub open: i64,
    pub high: i64,
    pub low: i64,
    pub volume: i64,
    pub timestamp: DateTime<Utc>,
}

impl StockQuote {
    pub fn direction(&self) -> PriceDirection {
        PriceDirection::from_change(self.change_rate)
    }

    /// Previous close implied by the current price and the change.
    pub fn previous_close(&self) -> i64 {
        self.current_price - self.change_price
    }

    /// Intraday range (`high - low`).
    pub fn day_range(&self) -> i64 {
        self.high - self.low
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuoteValidationError {
    #[error("Missing stock code")]
    MissingCode,
    #[error("Quote for {code} has negative {field}")]
    NegativeValue { code: String, field: &'static str },
    #[error("Quote for {code} has high {high} below low {low}")]
    InvertedRange { code: String, high: i64, low: i64 },
}

/// Cache key for the quote of `code`.
pub fn quote_key(code: &StockCode) -> QueryKey {
    QueryKey::new("quote").with(code)
}
