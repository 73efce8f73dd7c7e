//! Conversion: ranking wire types → domain types.

use super::wire::{StockRankingResponse, ThemeRankingsResponse};
use super::{RankingValidationError, StockRanking, ThemeRanking, ThemeRankings};
use crate::shared::{MarketSegment, StockCode};

fn stock_from_wire(
    theme: &str,
    source: StockRankingResponse,
) -> Result<StockRanking, RankingValidationError> {
    let code = source.code.trim();
    if code.is_empty() {
        return Err(RankingValidationError::MissingStockCode(theme.to_string()));
    }
    if source.trading_value < 0 {
        return Err(RankingValidationError::NegativeTradingValue {
            theme: theme.to_string(),
            code: code.to_string(),
        });
    }
    Ok(StockRanking {
        code: StockCode::new(code),
        name: source.name,
        rank: source.rank,
        current_price: source.current_price,
        change_price: source.change_price,
        change_rate: source.change_rate,
        volume: source.volume,
        trading_value: source.trading_value,
        trading_value_change_rate: source.trading_value_change_rate,
    })
}

impl TryFrom<(MarketSegment, ThemeRankingsResponse)> for ThemeRankings {
    type Error = RankingValidationError;

    fn try_from(
        (segment, source): (MarketSegment, ThemeRankingsResponse),
    ) -> Result<Self, Self::Error> {
        let themes = source
            .0
            .into_iter()
            .map(|(name, stocks)| {
                if name.trim().is_empty() {
                    return Err(RankingValidationError::EmptyThemeName);
                }
                let stocks = stocks
                    .into_iter()
                    .map(|s| stock_from_wire(&name, s))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(ThemeRanking { name, stocks })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { segment, themes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(json: &str) -> ThemeRankingsResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_conversion_keeps_order_and_segment() {
        let resp = response(
            r#"{
                "반도체": [
                    {"code": "005930", "name": "삼성전자", "rank": 1, "current_price": 70000,
                     "change_price": 1000, "change_rate": 1.45, "volume": 100,
                     "trading_value": 7000000, "trading_value_change_rate": 12.5},
                    {"code": "000660", "name": "SK하이닉스", "rank": 3, "current_price": 180000,
                     "change_price": -2000, "change_rate": -1.1, "volume": 10,
                     "trading_value": 1800000}
                ],
                "2차전지": []
            }"#,
        );
        let rankings = ThemeRankings::try_from((MarketSegment::Nxt, resp)).unwrap();
        assert_eq!(rankings.segment, MarketSegment::Nxt);
        assert_eq!(rankings.themes[0].name, "반도체");
        assert_eq!(rankings.themes[0].stocks[1].code.as_str(), "000660");
        assert_eq!(rankings.themes[0].stocks[0].trading_value_change_rate, Some(12.5));
        assert!(rankings.themes[1].is_empty());
    }

    #[test]
    fn test_empty_theme_name_rejected() {
        let resp = ThemeRankingsResponse(vec![(" ".to_string(), vec![])]);
        assert_eq!(
            ThemeRankings::try_from((MarketSegment::All, resp)),
            Err(RankingValidationError::EmptyThemeName)
        );
    }
}
