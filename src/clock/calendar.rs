//! Trading calendar: per-venue session windows, weekends and holidays.

use crate::shared::MarketSegment;
use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc, Weekday};
use chrono_tz::Tz;
use std::collections::BTreeSet;

/// A daily trading window, `[open, close)` in exchange-local time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    pub open: NaiveTime,
    pub close: NaiveTime,
}

impl Session {
    pub fn new(open: NaiveTime, close: NaiveTime) -> Self {
        Self { open, close }
    }

    pub fn contains(&self, time: NaiveTime) -> bool {
        time >= self.open && time < self.close
    }
}

fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or_default()
}

/// Weekday sessions for KRX and NXT in Korea Standard Time.
#[derive(Debug, Clone)]
pub struct TradingCalendar {
    pub timezone: Tz,
    /// KRX regular session, 09:00–15:30.
    pub krx: Session,
    /// NXT pre-market through after-market, 08:00–20:00.
    pub nxt: Session,
    holidays: BTreeSet<NaiveDate>,
}

impl Default for TradingCalendar {
    fn default() -> Self {
        Self {
            timezone: chrono_tz::Asia::Seoul,
            krx: Session::new(hm(9, 0), hm(15, 30)),
            nxt: Session::new(hm(8, 0), hm(20, 0)),
            holidays: BTreeSet::new(),
        }
    }
}

impl TradingCalendar {
    pub fn with_holidays(mut self, dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        self.holidays.extend(dates);
        self
    }

    pub fn add_holiday(&mut self, date: NaiveDate) {
        self.holidays.insert(date);
    }

    pub fn holidays(&self) -> impl Iterator<Item = &NaiveDate> {
        self.holidays.iter()
    }

    /// Weekday and not a listed holiday, in exchange-local time.
    pub fn is_trading_day(&self, at: DateTime<Utc>) -> bool {
        let local = at.with_timezone(&self.timezone).date_naive();
        !matches!(local.weekday(), Weekday::Sat | Weekday::Sun) && !self.holidays.contains(&local)
    }

    pub fn session(&self, segment: MarketSegment) -> Option<Session> {
        match segment {
            MarketSegment::Krx => Some(self.krx),
            MarketSegment::Nxt => Some(self.nxt),
            MarketSegment::All => None,
        }
    }

    /// `All` is open while any venue is open.
    pub fn is_open(&self, segment: MarketSegment, at: DateTime<Utc>) -> bool {
        if !self.is_trading_day(at) {
            return false;
        }
        let time = at.with_timezone(&self.timezone).time();
        match self.session(segment) {
            Some(session) => session.contains(time),
            None => self.krx.contains(time) || self.nxt.contains(time),
        }
    }
}
