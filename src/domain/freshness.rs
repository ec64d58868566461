//! Freshness predicate and the clock it is evaluated against.

use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};
use std::sync::{Arc, Mutex, PoisonError};

/// `true` while `now - cached_at` is strictly below `max_age`.
///
/// A non-positive `max_age` is never fresh.
#[must_use]
pub fn is_fresh(cached_at: DateTime<Utc>, max_age: TimeDelta, now: DateTime<Utc>) -> bool {
    max_age > TimeDelta::zero() && now.signed_duration_since(cached_at) < max_age
}

/// Fixed-width RFC 3339 rendering used for every stored timestamp.
///
/// Lexical order of these strings matches chronological order, which the
/// repositories rely on for `ORDER BY cached_at`.
#[must_use]
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(raw).map(|t| t.with_timezone(&Utc))
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    #[must_use]
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    pub fn advance(&self, by: TimeDelta) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }

    pub fn set(&self, to: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = to;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, hour, 0, 0).unwrap()
    }

    #[test]
    fn fresh_within_window() {
        assert!(is_fresh(at(0), TimeDelta::hours(24), at(23)));
    }

    #[test]
    fn stale_exactly_at_boundary() {
        let cached = at(0);
        let now = cached + TimeDelta::hours(24);
        assert!(!is_fresh(cached, TimeDelta::hours(24), now));
        assert!(is_fresh(
            cached,
            TimeDelta::hours(24),
            now - TimeDelta::microseconds(1)
        ));
    }

    #[test]
    fn zero_or_negative_max_age_is_never_fresh() {
        assert!(!is_fresh(at(1), TimeDelta::zero(), at(1)));
        assert!(!is_fresh(at(1), TimeDelta::hours(-1), at(0)));
    }

    #[test]
    fn timestamps_sort_lexically() {
        let early = format_timestamp(at(2));
        let late = format_timestamp(at(10));
        assert!(early < late);
        assert_eq!(early, "2025-03-01T02:00:00.000000Z");
        assert_eq!(parse_timestamp(&late).unwrap(), at(10));
    }

    #[test]
    fn manual_clock_advances() {
        let clock = ManualClock::new(at(0));
        clock.advance(TimeDelta::hours(25));
        assert_eq!(clock.now(), at(0) + TimeDelta::hours(25));
        clock.set(at(3));
        assert_eq!(clock.now(), at(3));
    }
}
