//! Theme domain: curated stock groupings.

#[cfg(feature = "http")]
pub mod client;
mod convert;
pub mod wire;

use crate::query::QueryKey;
use crate::shared::{StockCode, ThemeId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lowest and highest accepted stock weight inside a theme.
pub const WEIGHT_RANGE: std::ops::RangeInclusive<u8> = 1..=10;

/// A theme (sector/category) as curated on the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Theme {
    pub id: ThemeId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A member stock of a theme.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StockInTheme {
    pub code: StockCode,
    pub name: String,
    /// Listing venue label as sent by the backend (e.g. `KOSPI`).
    pub market: String,
    /// 1 (peripheral) to 10 (core).
    pub weight: u8,
}

/// A theme with its member stocks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ThemeDetail {
    pub theme: Theme,
    pub stocks: Vec<StockInTheme>,
}

impl ThemeDetail {
    /// Member stocks ordered by descending weight (stable for equal weights).
    pub fn stocks_by_weight(&self) -> Vec<&StockInTheme> {
        let mut stocks: Vec<&StockInTheme> = self.stocks.iter().collect();
        stocks.sort_by(|a, b| b.weight.cmp(&a.weight));
        stocks
    }

    pub fn contains(&self, code: &StockCode) -> bool {
        self.stocks.iter().any(|s| &s.code == code)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ThemeValidationError {
    #[error("Missing theme id")]
    MissingId,
    #[error("Missing theme name ({0})")]
    MissingName(String),
    #[error("Missing stock code in theme {0}")]
    MissingStockCode(String),
    #[error("Stock {code} has weight {weight}, expected 1-10")]
    InvalidWeight { code: String, weight: i32 },
}

/// Cache key for the theme list.
pub fn list_key() -> QueryKey {
    QueryKey::new("themes")
}

/// Cache key for one theme's detail.
pub fn detail_key(id: &ThemeId) -> QueryKey {
    QueryKey::new("theme").with(id)
}
