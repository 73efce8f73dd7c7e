//! Conversion: StockQuoteResponse → StockQuote.

use super::wire::StockQuoteResponse;
use super::{QuoteValidationError, StockQuote};
use crate::shared::StockCode;

impl TryFrom<StockQuoteResponse> for StockQuote {
    type Error = QuoteValidationError;

    fn try_from(source: StockQuoteResponse) -> Result<Self, Self::Error> {
        let code = source.stock_code.trim().to_string();
        if code.is_empty() {
            return Err(QuoteValidationError::MissingCode);
        }

        for (field, value) in [
            ("current_price", source.current_price),
            ("opening_price", source.opening_price),
            ("high_price", source.high_price),
            ("low_price", source.low_price),
            ("volume", source.volume),
        ] {
            if value < 0 {
                return Err(QuoteValidationError::NegativeValue { code, field });
            }
        }
        if source.high_price < source.low_price {
            return Err(QuoteValidationError::InvertedRange {
                code,
                high: source.high_price,
                low: source.low_price,
            });
        }

        Ok(Self {
            code: StockCode::new(&code),
            name: source.stock_name,
            current_price: source.current_price,
            change_price: source.change_price,
            change_rate: source.change_rate,
            open: source.opening_price,
            high: source.high_price,
            low: source.low_price,
            volume: source.volume,
            timestamp: source.timestamp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::PriceDirection;

    fn sample() -> StockQuoteResponse {
        serde_json::from_str(
            r#"{
                "stock_code": "005930",
                "stock_name": "삼성전자",
                "current_price": 70000,
                "change_price": 1000,
                "change_rate": 1.45,
                "opening_price": 69500,
                "high_price": 70500,
                "low_price": 69000,
                "volume": 12345678,
                "timestamp": "2026-02-07T18:00:00"
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_quote_conversion() {
        let quote = StockQuote::try_from(sample()).unwrap();
        assert_eq!(quote.code.as_str(), "005930");
        assert_eq!(quote.previous_close(), 69000);
        assert_eq!(quote.day_range(), 1500);
        assert_eq!(quote.direction(), PriceDirection::Up);
    }

    #[test]
    fn test_missing_name_defaults_to_empty() {
        let resp: StockQuoteResponse = serde_json::from_str(
            r#"{
                "stock_code": "000660",
                "current_price": 0, "change_price": 0, "change_rate": 0.0,
                "opening_price": 0, "high_price": 0, "low_price": 0, "volume": 0,
                "timestamp": "2026-02-07T08:00:00+09:00"
            }"#,
        )
        .unwrap();
        let quote = StockQuote::try_from(resp).unwrap();
        assert!(quote.name.is_empty());
        assert_eq!(quote.direction(), PriceDirection::Flat);
    }

    #[test]
    fn test_inverted_range_rejected() {
        let mut resp = sample();
        resp.high_price = 68000;
        assert!(matches!(
            StockQuote::try_from(resp),
            Err(QuoteValidationError::InvertedRange { .. })
        ));
    }

    #[test]
    fn test_negative_volume_rejected() {
        let mut resp = sample();
        resp.volume = -1;
        assert_eq!(
            StockQuote::try_from(resp),
            Err(QuoteValidationError::NegativeValue {
                code: "005930".to_string(),
                field: "volume"
            })
        );
    }
}
