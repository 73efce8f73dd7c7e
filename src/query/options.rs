//! Per-query options: enablement, refresh policy, staleness, GC, retry.

use crate::clock::MarketClock;
use crate::query::retry::RetryPolicy;
use crate::shared::MarketSegment;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// How often an entry refreshes itself after each fetch settles.
#[derive(Clone, Default)]
pub enum RefreshInterval {
    /// Never refresh automatically.
    #[default]
    Disabled,
    /// Refresh `d` after every completion.
    Fixed(Duration),
    /// Refresh `interval` after every completion while `segment` is trading;
    /// no automatic refresh while it is closed.
    MarketHours {
        segment: MarketSegment,
        interval: Duration,
    },
    /// Arbitrary policy evaluated at scheduling time.
    Dynamic(Arc<dyn Fn(&MarketClock) -> Option<Duration> + Send + Sync>),
}

impl RefreshInterval {
    pub fn market_hours(segment: MarketSegment, interval: Duration) -> Self {
        Self::MarketHours { segment, interval }
    }

    pub fn dynamic(f: impl Fn(&MarketClock) -> Option<Duration> + Send + Sync + 'static) -> Self {
        Self::Dynamic(Arc::new(f))
    }

    /// The delay to arm now, or `None` when no timer should run.
    pub fn resolve(&self, market: &MarketClock) -> Option<Duration> {
        match self {
            RefreshInterval::Disabled => None,
            RefreshInterval::Fixed(d) => Some(*d),
            RefreshInterval::MarketHours { segment, interval } => {
                if market.is_market_closed(*segment) {
                    None
                } else {
                    Some(*interval)
                }
            }
            RefreshInterval::Dynamic(f) => f(market),
        }
    }
}

impl fmt::Debug for RefreshInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefreshInterval::Disabled => write!(f, "Disabled"),
            RefreshInterval::Fixed(d) => f.debug_tuple("Fixed").field(d).finish(),
            RefreshInterval::MarketHours { segment, interval } => f
                .debug_struct("MarketHours")
                .field("segment", segment)
                .field("interval", interval)
                .finish(),
            RefreshInterval::Dynamic(_) => write!(f, "Dynamic(..)"),
        }
    }
}

/// Options supplied with a subscription.
#[derive(Debug, Clone)]
pub struct QueryOptions {
    pub(crate) enabled: bool,
    pub(crate) refresh_interval: RefreshInterval,
    pub(crate) stale_time: Duration,
    pub(crate) gc_time: Duration,
    pub(crate) retry: RetryPolicy,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            refresh_interval: RefreshInterval::Disabled,
            stale_time: Duration::ZERO,
            gc_time: Duration::from_secs(5 * 60),
            retry: RetryPolicy::Never,
        }
    }
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// When false, no fetch is issued for this subscriber.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn refresh_interval(mut self, interval: RefreshInterval) -> Self {
        self.refresh_interval = interval;
        self
    }

    /// How long fetched data counts as fresh; fresh data is not refetched
    /// when a new subscriber arrives.
    pub fn stale_time(mut self, stale_time: Duration) -> Self {
        self.stale_time = stale_time;
        self
    }

    /// Grace period between the last unsubscribe and eviction.
    pub fn gc_time(mut self, gc_time: Duration) -> Self {
        self.gc_time = gc_time;
        self
    }

    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{ManualClock, TradingCalendar};
    use chrono::{TimeZone, Utc};

    fn market_at(y: i32, m: u32, d: u32, h: u32) -> MarketClock {
        // Hours are UTC; KST is UTC+9.
        let clock = ManualClock::new(Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap());
        MarketClock::new(clock, TradingCalendar::default())
    }

    #[test]
    fn test_market_hours_resolves_while_open() {
        // Wednesday 10:00 KST.
        let market = market_at(2026, 10, 14, 1);
        let interval = RefreshInterval::market_hours(MarketSegment::Krx, Duration::from_secs(3));
        assert_eq!(interval.resolve(&market), Some(Duration::from_secs(3)));
    }

    #[test]
    fn test_market_hours_disabled_while_closed() {
        // Saturday 10:00 KST.
        let market = market_at(2026, 10, 17, 1);
        let interval = RefreshInterval::market_hours(MarketSegment::All, Duration::from_secs(3));
        assert_eq!(interval.resolve(&market), None);
    }

    #[test]
    fn test_dynamic_policy() {
        let market = market_at(2026, 10, 14, 1);
        let interval = RefreshInterval::dynamic(|m| {
            if m.is_market_closed(MarketSegment::Krx) {
                Some(Duration::from_secs(60))
            } else {
                Some(Duration::from_secs(10))
            }
        });
        assert_eq!(interval.resolve(&market), Some(Duration::from_secs(10)));
        assert_eq!(RefreshInterval::Disabled.resolve(&market), None);
    }

    #[test]
    fn test_default_options() {
        let opts = QueryOptions::default();
        assert!(opts.is_enabled());
        assert_eq!(opts.stale_time, Duration::ZERO);
        assert_eq!(opts.gc_time, Duration::from_secs(300));
        assert!(matches!(opts.refresh_interval, RefreshInterval::Disabled));
    }
}
