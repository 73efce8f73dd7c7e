//! Wire types for `GET /api/volume-rank-by-theme`.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// One ranked stock inside a theme.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StockRankingResponse {
    pub code: String,
    pub name: String,
    pub rank: u32,
    pub current_price: i64,
    pub change_price: i64,
    pub change_rate: f64,
    pub volume: i64,
    pub trading_value: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trading_value_change_rate: Option<f64>,
}

/// Theme name → ranked stocks, as a JSON object.
///
/// Entries keep the order the backend wrote them in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThemeRankingsResponse(pub Vec<(String, Vec<StockRankingResponse>)>);

impl<'de> Deserialize<'de> for ThemeRankingsResponse {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct OrderedVisitor;

        impl<'de> Visitor<'de> for OrderedVisitor {
            type Value = ThemeRankingsResponse;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of theme name to ranking list")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut themes = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((name, stocks)) =
                    map.next_entry::<String, Vec<StockRankingResponse>>()?
                {
                    match themes.iter_mut().find(|(n, _)| *n == name) {
                        // Duplicate keys: last one wins, first position kept.
                        Some((_, existing)) => *existing = stocks,
                        None => themes.push((name, stocks)),
                    }
                }
                Ok(ThemeRankingsResponse(themes))
            }
        }

        deserializer.deserialize_map(OrderedVisitor)
    }
}

impl Serialize for ThemeRankingsResponse {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, stocks) in &self.0 {
            map.serialize_entry(name, stocks)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_order_preserved() {
        let json = r#"{
            "반도체": [],
            "2차전지": [],
            "인공지능(AI)": [],
            "바이오/헬스케어": []
        }"#;
        let resp: ThemeRankingsResponse = serde_json::from_str(json).unwrap();
        let names: Vec<_> = resp.0.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["반도체", "2차전지", "인공지능(AI)", "바이오/헬스케어"]);
    }

    #[test]
    fn test_optional_change_rate() {
        let json = r#"{"반도체": [{
            "code": "005930", "name": "삼성전자", "rank": 1,
            "current_price": 70000, "change_price": -500, "change_rate": -0.71,
            "volume": 15000000, "trading_value": 1050000000000
        }]}"#;
        let resp: ThemeRankingsResponse = serde_json::from_str(json).unwrap();
        let stock = &resp.0[0].1[0];
        assert!(stock.trading_value_change_rate.is_none());
        assert_eq!(stock.trading_value, 1_050_000_000_000);
    }

    #[test]
    fn test_non_object_rejected() {
        assert!(serde_json::from_str::<ThemeRankingsResponse>("[]").is_err());
    }
}
