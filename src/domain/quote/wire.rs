//! Wire types for quote responses (REST).

use crate::shared::serde_util::kst_timestamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// `GET /api/quotes/{code}` response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StockQuoteResponse {
    pub stock_code: String,
    #[serde(default)]
    pub stock_name: String,
    pub current_price: i64,
    pub change_price: i64,
    pub change_rate: f64,
    pub opening_price: i64,
    pub high_price: i64,
    pub low_price: i64,
    pub volume: i64,
    #[serde(with = "kst_timestamp")]
    pub timestamp: DateTime<Utc>,
}
