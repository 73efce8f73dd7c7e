//! Wire types for theme responses (REST).

use crate::shared::serde_util::kst_timestamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A theme as listed by `GET /api/themes`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ThemeResponse {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(with = "kst_timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "kst_timestamp")]
    pub updated_at: DateTime<Utc>,
}

/// A stock entry inside `GET /api/themes/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StockInThemeResponse {
    pub code: String,
    pub name: String,
    pub market: String,
    pub weight: i32,
}

/// `GET /api/themes/{id}` response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ThemeWithStocksResponse {
    #[serde(flatten)]
    pub theme: ThemeResponse,
    #[serde(default)]
    pub stocks: Vec<StockInThemeResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_detail_deserializes_naive_timestamps() {
        let json = r#"{
            "id": "3f2b6c1e-8a4d-4e8f-9a61-0c2d7b5e9f10",
            "name": "반도체",
            "description": null,
            "created_at": "2026-02-07T18:00:00",
            "updated_at": "2026-02-08T09:30:00.123456",
            "stocks": [
                {"code": "005930", "name": "삼성전자", "market": "KOSPI", "weight": 10}
            ]
        }"#;
        let resp: ThemeWithStocksResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.theme.name, "반도체");
        assert!(resp.theme.description.is_none());
        assert_eq!(resp.stocks.len(), 1);
        // 18:00 KST is 09:00 UTC.
        assert_eq!(resp.theme.created_at.to_rfc3339(), "2026-02-07T09:00:00+00:00");
    }

    #[test]
    fn test_theme_list_without_stocks() {
        let json = r#"[{
            "id": "a",
            "name": "2차전지",
            "created_at": "2026-02-07T18:00:00+09:00",
            "updated_at": "2026-02-07T18:00:00+09:00"
        }]"#;
        let resp: Vec<ThemeResponse> = serde_json::from_str(json).unwrap();
        assert_eq!(resp[0].name, "2차전지");
    }
}
