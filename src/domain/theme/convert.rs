//! Conversion: theme wire types → domain types (TryFrom + validation).

use super::wire::{StockInThemeResponse, ThemeResponse, ThemeWithStocksResponse};
use super::{StockInTheme, Theme, ThemeDetail, ThemeValidationError, WEIGHT_RANGE};
use crate::shared::{StockCode, ThemeId};

impl TryFrom<ThemeResponse> for Theme {
    type Error = ThemeValidationError;

    fn try_from(source: ThemeResponse) -> Result<Self, Self::Error> {
        if source.id.trim().is_empty() {
            return Err(ThemeValidationError::MissingId);
        }
        if source.name.trim().is_empty() {
            return Err(ThemeValidationError::MissingName(source.id));
        }
        Ok(Self {
            id: ThemeId::new(source.id),
            name: source.name,
            description: source.description.filter(|d| !d.trim().is_empty()),
            created_at: source.created_at,
            updated_at: source.updated_at,
        })
    }
}

fn stock_from_wire(
    theme_id: &str,
    source: StockInThemeResponse,
) -> Result<StockInTheme, ThemeValidationError> {
    if source.code.trim().is_empty() {
        return Err(ThemeValidationError::MissingStockCode(theme_id.to_string()));
    }
    let weight = u8::try_from(source.weight)
        .ok()
        .filter(|w| WEIGHT_RANGE.contains(w))
        .ok_or_else(|| ThemeValidationError::InvalidWeight {
            code: source.code.clone(),
            weight: source.weight,
        })?;
    Ok(StockInTheme {
        code: StockCode::new(source.code.trim()),
        name: source.name,
        market: source.market,
        weight,
    })
}

impl TryFrom<ThemeWithStocksResponse> for ThemeDetail {
    type Error = ThemeValidationError;

    fn try_from(source: ThemeWithStocksResponse) -> Result<Self, Self::Error> {
        let theme_id = source.theme.id.clone();
        let theme = Theme::try_from(source.theme)?;
        let stocks = source
            .stocks
            .into_iter()
            .map(|s| stock_from_wire(&theme_id, s))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { theme, stocks })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn theme_response(id: &str, name: &str) -> ThemeResponse {
        let at = Utc.with_ymd_and_hms(2026, 2, 7, 9, 0, 0).unwrap();
        ThemeResponse {
            id: id.to_string(),
            name: name.to_string(),
            description: Some("  ".to_string()),
            created_at: at,
            updated_at: at,
        }
    }

    fn stock(code: &str, weight: i32) -> StockInThemeResponse {
        StockInThemeResponse {
            code: code.to_string(),
            name: "삼성전자".to_string(),
            market: "KOSPI".to_string(),
            weight,
        }
    }

    #[test]
    fn test_theme_conversion() {
        let theme = Theme::try_from(theme_response("t1", "반도체")).unwrap();
        assert_eq!(theme.id.as_str(), "t1");
        assert!(theme.description.is_none());
    }

    #[test]
    fn test_missing_fields_rejected() {
        assert_eq!(
            Theme::try_from(theme_response("", "반도체")),
            Err(ThemeValidationError::MissingId)
        );
        assert_eq!(
            Theme::try_from(theme_response("t1", " ")),
            Err(ThemeValidationError::MissingName("t1".to_string()))
        );
    }

    #[test]
    fn test_weight_out_of_range() {
        let resp = ThemeWithStocksResponse {
            theme: theme_response("t1", "반도체"),
            stocks: vec![stock("005930", 10), stock("000660", 11)],
        };
        let err = ThemeDetail::try_from(resp).unwrap_err();
        assert_eq!(
            err,
            ThemeValidationError::InvalidWeight {
                code: "000660".to_string(),
                weight: 11
            }
        );
    }

    #[test]
    fn test_detail_keeps_backend_order() {
        let resp = ThemeWithStocksResponse {
            theme: theme_response("t1", "반도체"),
            stocks: vec![stock("000660", 3), stock("005930", 9), stock("042700", 9)],
        };
        let detail = ThemeDetail::try_from(resp).unwrap();
        let codes: Vec<_> = detail.stocks.iter().map(|s| s.code.as_str()).collect();
        assert_eq!(codes, ["000660", "005930", "042700"]);
        let by_weight: Vec<_> = detail
            .stocks_by_weight()
            .iter()
            .map(|s| s.code.as_str())
            .collect();
        assert_eq!(by_weight, ["005930", "042700", "000660"]);
    }
}
