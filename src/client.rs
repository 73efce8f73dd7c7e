//! High-level client: `ThemeBoardClient` with nested sub-client accessors.
//!
//! Each domain has its own sub-client in `domain/<name>/client.rs`.
//! This module keeps the builder, the shared query cache, and accessor methods.

use crate::clock::{Clock, MarketClock, TradingCalendar};
use crate::config::SyncConfig;
use crate::domain::health::Health;
use crate::domain::index::client::IndicesClient;
use crate::domain::quote::client::Quotes;
use crate::domain::ranking::client::Rankings;
use crate::domain::theme::client::Themes;
use crate::error::SdkError;
use crate::http::{ThemeBoardHttp, DEFAULT_TIMEOUT};
use crate::query::QueryCache;

use std::sync::Arc;
use std::time::Duration;

// Re-export sub-client types for convenience.
pub use crate::domain::index::client::IndicesClient as IndexClient;
pub use crate::domain::quote::client::Quotes as QuotesClient;
pub use crate::domain::ranking::client::Rankings as RankingsClient;
pub use crate::domain::theme::client::Themes as ThemesClient;

/// The primary entry point for the ThemeBoard SDK.
///
/// Provides nested sub-client accessors for each domain:
/// `client.themes()`, `client.rankings()`, etc. Clones share the HTTP
/// connection pool and the query cache.
#[derive(Clone)]
pub struct ThemeBoardClient {
    pub(crate) http: ThemeBoardHttp,
    pub(crate) cache: QueryCache,
    pub(crate) sync: SyncConfig,
}

impl ThemeBoardClient {
    pub fn builder() -> ThemeBoardClientBuilder {
        ThemeBoardClientBuilder::default()
    }

    // ── Sub-client accessors ─────────────────────────────────────────────

    pub fn themes(&self) -> Themes<'_> {
        Themes { client: self }
    }

    pub fn quotes(&self) -> Quotes<'_> {
        Quotes { client: self }
    }

    pub fn rankings(&self) -> Rankings<'_> {
        Rankings { client: self }
    }

    pub fn indices(&self) -> IndicesClient<'_> {
        IndicesClient { client: self }
    }

    // ── Shared state ─────────────────────────────────────────────────────

    pub async fn health(&self) -> Result<Health, SdkError> {
        Ok(self.http.health().await?)
    }

    /// The query cache backing every `watch*` subscription.
    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub fn market(&self) -> &MarketClock {
        self.cache.market()
    }

    pub fn sync_config(&self) -> &SyncConfig {
        &self.sync
    }

    pub fn http(&self) -> &ThemeBoardHttp {
        &self.http
    }

    /// Drop every cached query. Live subscriptions end in an `Error`
    /// snapshot and must be re-created.
    pub fn clear_all_caches(&self) {
        self.cache.clear();
    }
}

impl std::fmt::Debug for ThemeBoardClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeBoardClient")
            .field("base_url", &self.http.base_url())
            .field("cache", &self.cache)
            .finish()
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// Builder
// ═════════════════════════════════════════════════════════════════════════════

pub struct ThemeBoardClientBuilder {
    base_url: Option<String>,
    timeout: Duration,
    clock: Option<Arc<dyn Clock>>,
    calendar: TradingCalendar,
    sync: SyncConfig,
}

impl Default for ThemeBoardClientBuilder {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: DEFAULT_TIMEOUT,
            clock: None,
            calendar: TradingCalendar::default(),
            sync: SyncConfig::default(),
        }
    }
}

impl ThemeBoardClientBuilder {
    pub fn base_url(mut self, url: &str) -> Self {
        self.base_url = Some(url.to_string());
        self
    }

    /// Per-request timeout (default 30s).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Time source for market-hours gating. Defaults to the system clock.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn calendar(mut self, calendar: TradingCalendar) -> Self {
        self.calendar = calendar;
        self
    }

    pub fn sync_config(mut self, sync: SyncConfig) -> Self {
        self.sync = sync;
        self
    }

    /// Layer `THEMEBOARD_*` environment overrides onto the current sync config.
    pub fn from_env(mut self) -> Result<Self, SdkError> {
        self.sync = self.sync.apply_env_overrides()?;
        Ok(self)
    }

    pub fn build(self) -> Result<ThemeBoardClient, SdkError> {
        let base_url = self
            .base_url
            .or_else(|| self.sync.api_url.clone())
            .unwrap_or_else(|| crate::network::DEFAULT_API_URL.to_string());
        if base_url.trim().is_empty() {
            return Err(SdkError::Validation("base URL must not be empty".to_string()));
        }

        let market = match self.clock {
            Some(clock) => MarketClock::new(clock, self.calendar),
            None => MarketClock::new(Arc::new(crate::clock::SystemClock), self.calendar),
        };

        tracing::debug!(base_url = %base_url, timeout_ms = self.timeout.as_millis() as u64, "building client");

        Ok(ThemeBoardClient {
            http: ThemeBoardHttp::with_timeout(&base_url, self.timeout)?,
            cache: QueryCache::new(market),
            sync: self.sync,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::shared::MarketSegment;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_builder_defaults() {
        let client = ThemeBoardClient::builder().build().unwrap();
        assert_eq!(client.http().base_url(), crate::network::DEFAULT_API_URL);
        assert!(client.cache().is_empty());
    }

    #[test]
    fn test_explicit_base_url_beats_sync_config() {
        let sync = SyncConfig {
            api_url: Some("http://from-env:8000".to_string()),
            ..SyncConfig::default()
        };
        let client = ThemeBoardClient::builder()
            .sync_config(sync.clone())
            .base_url("http://explicit:8000/")
            .build()
            .unwrap();
        assert_eq!(client.http().base_url(), "http://explicit:8000");

        let client = ThemeBoardClient::builder().sync_config(sync).build().unwrap();
        assert_eq!(client.http().base_url(), "http://from-env:8000");
    }

    #[test]
    fn test_empty_base_url_rejected() {
        let err = ThemeBoardClient::builder().base_url("  ").build().unwrap_err();
        assert!(matches!(err, SdkError::Validation(_)));
    }

    #[test]
    fn test_injected_clock_drives_market() {
        // Saturday.
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2026, 10, 17, 1, 0, 0).unwrap());
        let client = ThemeBoardClient::builder().clock(clock).build().unwrap();
        assert!(client.market().is_market_closed(MarketSegment::All));
    }
}
