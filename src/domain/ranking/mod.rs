//! Ranking domain: per-theme trading-value leaders.
//!
//! Ranking lists arrive sorted by descending trading value and are kept in
//! that order. Nothing here sorts a cached list in place; derived orderings
//! are returned as copies.

#[cfg(feature = "http")]
pub mod client;
mod convert;
pub mod wire;

use crate::error::SdkError;
use crate::query::QueryKey;
use crate::shared::{MarketSegment, PriceDirection, StockCode};
use serde::{Deserialize, Serialize};

/// One ranked stock inside a theme.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StockRanking {
    pub code: StockCode,
    pub name: String,
    /// Position in the backend's overall ranking (1-based).
    pub rank: u32,
    pub current_price: i64,
    pub change_price: i64,
    pub change_rate: f64,
    pub volume: i64,
    /// Traded value in won.
    pub trading_value: i64,
    /// Day-over-day change of the trading value, in percent.
    pub trading_value_change_rate: Option<f64>,
}

impl StockRanking {
    pub fn direction(&self) -> PriceDirection {
        PriceDirection::from_change(self.change_rate)
    }
}

/// The ranked stocks of one theme.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ThemeRanking {
    pub name: String,
    pub stocks: Vec<StockRanking>,
}

impl ThemeRanking {
    /// First `n` stocks in backend order.
    pub fn top_n(&self, n: usize) -> &[StockRanking] {
        &self.stocks[..n.min(self.stocks.len())]
    }

    /// Sum of trading value across every listed stock.
    pub fn total_trading_value(&self) -> i64 {
        self.stocks.iter().map(|s| s.trading_value).sum()
    }

    /// A copy sorted by descending trading value (stable for ties).
    pub fn sorted_by_trading_value(&self) -> Vec<StockRanking> {
        let mut sorted = self.stocks.clone();
        sorted.sort_by(|a, b| b.trading_value.cmp(&a.trading_value));
        sorted
    }

    pub fn len(&self) -> usize {
        self.stocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stocks.is_empty()
    }
}

/// Per-theme rankings for one market segment, themes in backend order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ThemeRankings {
    pub segment: MarketSegment,
    pub themes: Vec<ThemeRanking>,
}

impl ThemeRankings {
    pub fn get(&self, theme: &str) -> Option<&ThemeRanking> {
        self.themes.iter().find(|t| t.name == theme)
    }

    /// Like [`get`](Self::get), but an unknown theme is [`SdkError::NotFound`].
    pub fn require(&self, theme: &str) -> Result<&ThemeRanking, SdkError> {
        self.get(theme)
            .ok_or_else(|| SdkError::NotFound(format!("theme not in ranking: {}", theme)))
    }

    pub fn top_n(&self, theme: &str, n: usize) -> Option<&[StockRanking]> {
        self.get(theme).map(|t| t.top_n(n))
    }

    pub fn total_trading_value(&self, theme: &str) -> Option<i64> {
        self.get(theme).map(ThemeRanking::total_trading_value)
    }

    pub fn theme_names(&self) -> impl Iterator<Item = &str> {
        self.themes.iter().map(|t| t.name.as_str())
    }

    /// Themes ordered by descending aggregate trading value (copy).
    pub fn themes_by_trading_value(&self) -> Vec<&ThemeRanking> {
        let mut themes: Vec<&ThemeRanking> = self.themes.iter().collect();
        themes.sort_by(|a, b| b.total_trading_value().cmp(&a.total_trading_value()));
        themes
    }

    pub fn len(&self) -> usize {
        self.themes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.themes.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RankingValidationError {
    #[error("Empty theme name")]
    EmptyThemeName,
    #[error("Missing stock code in theme {0}")]
    MissingStockCode(String),
    #[error("Stock {code} in theme {theme} has negative trading value")]
    NegativeTradingValue { theme: String, code: String },
}

/// Cache key for the rankings of `segment`.
pub fn rankings_key(segment: MarketSegment) -> QueryKey {
    QueryKey::new("volume-rank-by-theme").with(segment)
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn stock(code: &str, trading_value: i64, change_rate: f64) -> StockRanking {
        StockRanking {
            code: StockCode::new(code),
            name: format!("종목{}", code),
            rank: 0,
            current_price: 10_000,
            change_price: 0,
            change_rate,
            volume: 1_000,
            trading_value,
            trading_value_change_rate: None,
        }
    }

    pub fn theme(name: &str, values: &[i64]) -> ThemeRanking {
        ThemeRanking {
            name: name.to_string(),
            stocks: values
                .iter()
                .enumerate()
                .map(|(i, v)| stock(&format!("{:06}", i + 1), *v, 0.0))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::theme;
    use super::*;

    fn rankings() -> ThemeRankings {
        ThemeRankings {
            segment: MarketSegment::All,
            themes: vec![
                theme("반도체", &[900, 700, 500, 300, 100]),
                theme("2차전지", &[50, 2_000]),
            ],
        }
    }

    #[test]
    fn test_top_n_is_backend_order() {
        let r = rankings();
        let top: Vec<_> = r
            .top_n("반도체", 4)
            .unwrap()
            .iter()
            .map(|s| s.trading_value)
            .collect();
        assert_eq!(top, [900, 700, 500, 300]);
        assert_eq!(r.top_n("2차전지", 4).unwrap().len(), 2);
        assert_eq!(r.top_n("2차전지", 0).unwrap().len(), 0);
    }

    #[test]
    fn test_sorted_copy_leaves_original() {
        let r = rankings();
        let t = r.get("2차전지").unwrap();
        let sorted: Vec<_> = t.sorted_by_trading_value().iter().map(|s| s.trading_value).collect();
        assert_eq!(sorted, [2_000, 50]);
        assert_eq!(t.stocks[0].trading_value, 50);
    }

    #[test]
    fn test_totals_and_theme_order() {
        let r = rankings();
        assert_eq!(r.total_trading_value("반도체"), Some(2_500));
        assert_eq!(r.theme_names().collect::<Vec<_>>(), ["반도체", "2차전지"]);
        let by_value: Vec<_> = r.themes_by_trading_value().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(by_value, ["반도체", "2차전지"]);
    }

    #[test]
    fn test_unknown_theme_is_not_found() {
        let r = rankings();
        assert!(r.get("조선").is_none());
        assert!(matches!(r.require("조선"), Err(SdkError::NotFound(_))));
    }

    #[test]
    fn test_rankings_key_per_segment() {
        assert_eq!(rankings_key(MarketSegment::Krx).to_string(), "volume-rank-by-theme:KRX");
    }
}
