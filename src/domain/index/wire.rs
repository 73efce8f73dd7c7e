//! Wire types for `GET /api/indices`.

use crate::shared::serde_util::kst_timestamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndexQuoteResponse {
    pub index_code: String,
    pub current_price: f64,
    pub change_price: f64,
    pub change_rate: f64,
    #[serde(with = "kst_timestamp")]
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndicesResponse {
    #[serde(default)]
    pub items: Vec<IndexQuoteResponse>,
}
