//! Synchronization settings: per-resource polling, staleness, GC, retry.

use crate::error::SdkError;
use crate::query::{QueryOptions, RefreshInterval, RetryPolicy};
use crate::shared::MarketSegment;
use std::time::Duration;

pub const ENV_API_URL: &str = "THEMEBOARD_API_URL";
pub const ENV_REFRESH_MS: &str = "THEMEBOARD_REFRESH_MS";
pub const ENV_GC_SECS: &str = "THEMEBOARD_GC_SECS";

/// Default polling settings for the resources the client exposes.
///
/// Rankings and indices poll every 3 s and single quotes every 10 s, each
/// only while the relevant market segment is trading. Theme metadata is
/// fetched on mount and never polled.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Overrides the client's base URL when the builder was not given one.
    pub api_url: Option<String>,
    pub ranking_interval: Duration,
    pub index_interval: Duration,
    pub quote_interval: Duration,
    /// Segment whose session gates index and quote polling.
    pub quote_segment: MarketSegment,
    pub stale_time: Duration,
    pub gc_time: Duration,
    pub retry: RetryPolicy,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            ranking_interval: Duration::from_secs(3),
            index_interval: Duration::from_secs(3),
            quote_interval: Duration::from_secs(10),
            quote_segment: MarketSegment::All,
            stale_time: Duration::ZERO,
            gc_time: Duration::from_secs(5 * 60),
            retry: RetryPolicy::Never,
        }
    }
}

impl SyncConfig {
    /// Apply `THEMEBOARD_*` environment variables on top of `self`.
    ///
    /// `THEMEBOARD_REFRESH_MS` replaces the ranking and index intervals;
    /// `THEMEBOARD_GC_SECS` replaces `gc_time`.
    pub fn apply_env_overrides(self) -> Result<Self, SdkError> {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    pub(crate) fn apply_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, SdkError> {
        if let Some(url) = lookup(ENV_API_URL).filter(|u| !u.trim().is_empty()) {
            self.api_url = Some(url.trim().to_string());
        }

        if let Some(raw) = lookup(ENV_REFRESH_MS) {
            let ms: u64 = raw
                .trim()
                .parse()
                .map_err(|e| SdkError::Validation(format!("Invalid {}: {}", ENV_REFRESH_MS, e)))?;
            if ms == 0 {
                return Err(SdkError::Validation(format!(
                    "Invalid {}: must be positive",
                    ENV_REFRESH_MS
                )));
            }
            self.ranking_interval = Duration::from_millis(ms);
            self.index_interval = Duration::from_millis(ms);
        }

        if let Some(raw) = lookup(ENV_GC_SECS) {
            let secs: u64 = raw
                .trim()
                .parse()
                .map_err(|e| SdkError::Validation(format!("Invalid {}: {}", ENV_GC_SECS, e)))?;
            self.gc_time = Duration::from_secs(secs);
        }

        Ok(self)
    }

    fn base_options(&self) -> QueryOptions {
        QueryOptions::default()
            .stale_time(self.stale_time)
            .gc_time(self.gc_time)
            .retry(self.retry.clone())
    }

    /// Options for theme list/detail queries: no polling.
    pub fn theme_options(&self) -> QueryOptions {
        self.base_options()
    }

    /// Options for the per-theme ranking of `segment`.
    pub fn ranking_options(&self, segment: MarketSegment) -> QueryOptions {
        self.base_options().refresh_interval(RefreshInterval::market_hours(
            segment,
            self.ranking_interval,
        ))
    }

    pub fn index_options(&self) -> QueryOptions {
        self.base_options().refresh_interval(RefreshInterval::market_hours(
            self.quote_segment,
            self.index_interval,
        ))
    }

    pub fn quote_options(&self) -> QueryOptions {
        self.base_options().refresh_interval(RefreshInterval::market_hours(
            self.quote_segment,
            self.quote_interval,
        ))
    }
}
