//! Market clock: decides whether a venue is trading right now.
//!
//! Every polling decision in the query layer goes through [`MarketClock`].
//! The answer depends on wall-clock time, so it is recomputed on each call.

pub mod calendar;

pub use calendar::{Session, TradingCalendar};

use crate::shared::MarketSegment;
use chrono::{DateTime, Duration, Utc};
use std::sync::{Arc, Mutex};

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    current: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Arc<Self> {
        Arc::new(Self {
            current: Mutex::new(start),
        })
    }

    pub fn set(&self, time: DateTime<Utc>) {
        *self.current.lock().unwrap_or_else(|e| e.into_inner()) = time;
    }

    pub fn advance(&self, by: Duration) {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        *current += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.current.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Clock + trading calendar. Cheap to clone.
#[derive(Clone)]
pub struct MarketClock {
    clock: Arc<dyn Clock>,
    calendar: Arc<TradingCalendar>,
}

impl MarketClock {
    pub fn new(clock: Arc<dyn Clock>, calendar: TradingCalendar) -> Self {
        Self {
            clock,
            calendar: Arc::new(calendar),
        }
    }

    /// System time against the default KRX/NXT calendar.
    pub fn system() -> Self {
        Self::new(Arc::new(SystemClock), TradingCalendar::default())
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn calendar(&self) -> &TradingCalendar {
        &self.calendar
    }

    /// Whether `segment` is outside its trading window at the current time.
    pub fn is_market_closed(&self, segment: MarketSegment) -> bool {
        self.is_market_closed_at(segment, self.clock.now())
    }

    pub fn is_market_closed_at(&self, segment: MarketSegment, at: DateTime<Utc>) -> bool {
        !self.calendar.is_open(segment, at)
    }
}

impl Default for MarketClock {
    fn default() -> Self {
        Self::system()
    }
}

impl std::fmt::Debug for MarketClock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarketClock")
            .field("now", &self.clock.now())
            .field("calendar", &self.calendar)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::Asia::Seoul;

    fn kst(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Seoul
            .with_ymd_and_hms(y, m, d, h, min, 0)
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_reevaluated_on_every_call() {
        // 2026-10-14 is a Wednesday.
        let clock = ManualClock::new(kst(2026, 10, 14, 10, 0));
        let market = MarketClock::new(clock.clone(), TradingCalendar::default());
        assert!(!market.is_market_closed(MarketSegment::Krx));

        clock.set(kst(2026, 10, 14, 15, 30));
        assert!(market.is_market_closed(MarketSegment::Krx));
        assert!(!market.is_market_closed(MarketSegment::Nxt));
        assert!(!market.is_market_closed(MarketSegment::All));

        clock.advance(Duration::hours(5));
        assert!(market.is_market_closed(MarketSegment::All));
    }

    #[test]
    fn test_weekend_closed_everywhere() {
        // 2026-10-17 is a Saturday.
        let market = MarketClock::new(
            ManualClock::new(kst(2026, 10, 17, 11, 0)),
            TradingCalendar::default(),
        );
        for segment in MarketSegment::ALL_SEGMENTS {
            assert!(market.is_market_closed(segment), "{segment} should be closed");
        }
    }
}
