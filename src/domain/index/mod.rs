//! Index domain: KOSPI / KOSDAQ index quotes.

#[cfg(feature = "http")]
pub mod client;
pub mod wire;

use crate::query::QueryKey;
use crate::shared::PriceDirection;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Market indices the backend reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarketIndex {
    Kospi,
    Kosdaq,
}

impl MarketIndex {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Kospi => "0001",
            Self::Kosdaq => "1001",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Kospi => "코스피",
            Self::Kosdaq => "코스닥",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "0001" => Some(Self::Kospi),
            "1001" => Some(Self::Kosdaq),
            _ => None,
        }
    }
}

/// One index level. Values are index points, not won.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndexQuote {
    pub index_code: String,
    pub current_price: f64,
    pub change_price: f64,
    pub change_rate: f64,
    pub timestamp: DateTime<Utc>,
}

impl IndexQuote {
    pub fn index(&self) -> Option<MarketIndex> {
        MarketIndex::from_code(&self.index_code)
    }

    /// Display name, falling back to the raw code for unknown indices.
    pub fn display_name(&self) -> &str {
        match self.index() {
            Some(index) => index.display_name(),
            None => &self.index_code,
        }
    }

    pub fn direction(&self) -> PriceDirection {
        PriceDirection::from_change(self.change_price)
    }
}

impl From<wire::IndexQuoteResponse> for IndexQuote {
    fn from(source: wire::IndexQuoteResponse) -> Self {
        Self {
            index_code: source.index_code,
            current_price: source.current_price,
            change_price: source.change_price,
            change_rate: source.change_rate,
            timestamp: source.timestamp,
        }
    }
}

/// All reported indices in backend order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Indices {
    pub items: Vec<IndexQuote>,
}

impl Indices {
    pub fn get(&self, index: MarketIndex) -> Option<&IndexQuote> {
        self.items.iter().find(|q| q.index() == Some(index))
    }

    /// Most recent quote timestamp across all items.
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.items.iter().map(|q| q.timestamp).max()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl From<wire::IndicesResponse> for Indices {
    fn from(source: wire::IndicesResponse) -> Self {
        Self {
            items: source.items.into_iter().map(IndexQuote::from).collect(),
        }
    }
}

pub fn indices_key() -> QueryKey {
    QueryKey::new("indices")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn indices() -> Indices {
        let resp: wire::IndicesResponse = serde_json::from_str(
            r#"{"items": [
                {"index_code": "0001", "current_price": 2650.3, "change_price": 12.5,
                 "change_rate": 0.47, "timestamp": "2026-02-09T10:15:00"},
                {"index_code": "1001", "current_price": 870.12, "change_price": -3.4,
                 "change_rate": -0.39, "timestamp": "2026-02-09T10:16:00"}
            ]}"#,
        )
        .unwrap();
        Indices::from(resp)
    }

    #[test]
    fn test_lookup_by_index() {
        let indices = indices();
        let kospi = indices.get(MarketIndex::Kospi).unwrap();
        assert_eq!(kospi.display_name(), "코스피");
        assert_eq!(kospi.direction(), PriceDirection::Up);
        let kosdaq = indices.get(MarketIndex::Kosdaq).unwrap();
        assert_eq!(kosdaq.direction(), PriceDirection::Down);
    }

    #[test]
    fn test_updated_at_is_latest() {
        let indices = indices();
        // 10:16 KST is 01:16 UTC.
        assert_eq!(
            indices.updated_at().unwrap().to_rfc3339(),
            "2026-02-09T01:16:00+00:00"
        );
        assert!(Indices::default().updated_at().is_none());
    }

    #[test]
    fn test_unknown_code_falls_back() {
        let mut quote = indices().items[0].clone();
        quote.index_code = "2001".to_string();
        assert!(quote.index().is_none());
        assert_eq!(quote.display_name(), "2001");
    }
}
