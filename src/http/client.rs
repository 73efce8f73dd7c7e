//! Low-level HTTP client: `ThemeBoardHttp`.
//!
//! One method per API endpoint. Returns wire types (conversion to domain types
//! happens in the domain sub-clients). Each call is exactly one request;
//! retries belong to the query layer.

use crate::domain::health::Health;
use crate::domain::index::wire::IndicesResponse;
use crate::domain::quote::wire::StockQuoteResponse;
use crate::domain::ranking::wire::ThemeRankingsResponse;
use crate::domain::theme::wire::{ThemeResponse, ThemeWithStocksResponse};
use crate::error::HttpError;
use crate::network::API_PREFIX;
use crate::shared::MarketSegment;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Low-level HTTP client for the ThemeBoard REST API.
#[derive(Debug, Clone)]
pub struct ThemeBoardHttp {
    base_url: String,
    client: Client,
}

impl ThemeBoardHttp {
    pub fn new(base_url: &str) -> Result<Self, HttpError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, HttpError> {
        let client = Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(10)
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, API_PREFIX, path)
    }

    // ── Health ───────────────────────────────────────────────────────────

    pub async fn health(&self) -> Result<Health, HttpError> {
        self.get(&self.url("/health")).await
    }

    // ── Themes ───────────────────────────────────────────────────────────

    pub async fn get_themes(&self) -> Result<Vec<ThemeResponse>, HttpError> {
        self.get(&self.url("/themes")).await
    }

    pub async fn get_theme(&self, theme_id: &str) -> Result<ThemeWithStocksResponse, HttpError> {
        let url = self.url(&format!("/themes/{}", urlencoding::encode(theme_id)));
        self.get(&url).await
    }

    // ── Quotes ───────────────────────────────────────────────────────────

    pub async fn get_stock_quote(&self, code: &str) -> Result<StockQuoteResponse, HttpError> {
        let url = self.url(&format!("/quotes/{}", urlencoding::encode(code)));
        self.get(&url).await
    }

    // ── Rankings ─────────────────────────────────────────────────────────

    pub async fn get_volume_rank_by_theme(
        &self,
        segment: MarketSegment,
    ) -> Result<ThemeRankingsResponse, HttpError> {
        let url = self.url(&format!("/volume-rank-by-theme?market={}", segment.as_str()));
        self.get(&url).await
    }

    // ── Indices ──────────────────────────────────────────────────────────

    pub async fn get_indices(&self) -> Result<IndicesResponse, HttpError> {
        self.get(&self.url("/indices")).await
    }

    // ── Internal HTTP methods ────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T, HttpError> {
        tracing::debug!(url, "GET");
        let resp = self.client.get(url).send().await.map_err(classify_send_error)?;
        let status = resp.status();
        let body = resp.text().await.map_err(classify_send_error)?;
        decode_response(url, status, &body)
    }
}

fn classify_send_error(err: reqwest::Error) -> HttpError {
    if err.is_timeout() {
        HttpError::Timeout
    } else {
        HttpError::Network(err)
    }
}

/// Maps a status + body pair onto a typed payload or an [`HttpError`].
fn decode_response<T: DeserializeOwned>(
    url: &str,
    status: StatusCode,
    body: &str,
) -> Result<T, HttpError> {
    if status.is_success() {
        return serde_json::from_str(body).map_err(|source| HttpError::Decode {
            url: url.to_string(),
            source,
        });
    }

    match status.as_u16() {
        404 => Err(HttpError::NotFound(body.to_string())),
        code => Err(HttpError::Status {
            status: code,
            body: body.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_building_trims_trailing_slash() {
        let http = ThemeBoardHttp::new("http://localhost:8000/").unwrap();
        assert_eq!(http.base_url(), "http://localhost:8000");
        assert_eq!(http.url("/themes"), "http://localhost:8000/api/themes");
    }

    #[test]
    fn test_decode_success() {
        let health: Health = decode_response(
            "http://x/api/health",
            StatusCode::OK,
            r#"{"status":"healthy","environment":"development"}"#,
        )
        .unwrap();
        assert!(health.is_healthy());
        assert_eq!(health.environment, "development");
    }

    #[test]
    fn test_decode_malformed_body() {
        let err = decode_response::<Health>("http://x/api/health", StatusCode::OK, "<html>")
            .unwrap_err();
        assert!(matches!(err, HttpError::Decode { ref url, .. } if url == "http://x/api/health"));
    }

    #[test]
    fn test_status_classification() {
        let not_found =
            decode_response::<Health>("u", StatusCode::NOT_FOUND, "theme missing").unwrap_err();
        assert!(matches!(not_found, HttpError::NotFound(ref b) if b == "theme missing"));

        let unavailable =
            decode_response::<Health>("u", StatusCode::SERVICE_UNAVAILABLE, "busy").unwrap_err();
        assert!(matches!(unavailable, HttpError::Status { status: 503, .. }));

        let bad_request =
            decode_response::<Health>("u", StatusCode::BAD_REQUEST, "").unwrap_err();
        assert!(matches!(bad_request, HttpError::Status { status: 400, .. }));
    }
}
