//! Wall-clock abstraction.
//!
//! Urgency classification and slot search depend on "now". Every engine entry
//! point takes a `&dyn Clock` so tests pin time instead of reading the host clock.

use chrono::{Local, NaiveDateTime, Utc};
use chrono_tz::Tz;

/// Source of the current local wall time.
pub trait Clock: Send + Sync {
    /// Returns the current time in the scheduling actor's local zone.
    fn now(&self) -> NaiveDateTime;
}

/// Host clock (production use).
///
/// With a timezone, "now" is read in that zone; otherwise host local time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock {
    pub timezone: Option<Tz>,
}

impl SystemClock {
    pub fn new(timezone: Option<Tz>) -> Self {
        Self { timezone }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        match self.timezone {
            Some(tz) => Utc::now().with_timezone(&tz).naive_local(),
            None => Local::now().naive_local(),
        }
    }
}

/// Clock pinned to a single instant, for tests and replays.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    pub current_time: NaiveDateTime,
}

impl FixedClock {
    pub fn new(time: NaiveDateTime) -> Self {
        Self { current_time: time }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.current_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn fixed_clock_never_moves() {
        let t = NaiveDate::from_ymd_opt(2026, 3, 4)
            .unwrap()
            .and_hms_opt(11, 30, 0)
            .unwrap();
        let clock = FixedClock::new(t);
        assert_eq!(clock.now(), t);
        assert_eq!(clock.now(), clock.now());
    }

    #[test]
    fn system_clock_in_zone_is_close_to_utc_offset() {
        let clock = SystemClock::new(Some(chrono_tz::UTC));
        let drift = (clock.now() - Utc::now().naive_utc()).num_seconds().abs();
        assert!(drift < 5, "UTC-pinned clock drifted {}s", drift);
    }
}
